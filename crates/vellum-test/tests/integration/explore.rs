//! Tests for `/explore` viewer providers.

use salvo::http::StatusCode;

use super::helpers::*;

fn repository() -> (TestRepository, uuid::Uuid) {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    let bitstream = repo.add_content(tree.item.id, "ORIGINAL", "notes.txt", "text/plain", "hello");
    repo.store.set_bitstream_legacy_id(bitstream.id, 11);
    (repo, bitstream.id)
}

#[test_log::test(tokio::test)]
async fn info_provider_describes_the_bitstream() {
    let (repo, id) = repository();
    let service = repo.service().await;

    let json = TestRequest::get(&format!("/explore?bitstream_id={id}&provider=info"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["name"], "notes.txt");
    assert_eq!(json["size_bytes"], 5);
    assert_eq!(json["item_handle"], "123456789/3");
    assert_eq!(json["retrieve_url"], "/retrieve/11");
}

#[test_log::test(tokio::test)]
async fn default_provider_downloads() {
    let (repo, _) = repository();
    let service = repo.service().await;

    let response = TestRequest::get("/explore?bitstream_id=11&handle=123456789/3")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("Content-Length", "5")
        .assert_header_contains("Content-Disposition", "attachment");
    assert_eq!(response.body_string(), "hello");
}

#[test_log::test(tokio::test)]
async fn unknown_provider_falls_back_to_download() {
    let (repo, _) = repository();
    let service = repo.service().await;

    let _ = TestRequest::get("/explore?bitstream_id=11&provider=hologram")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header_contains("Content-Disposition", "attachment");
}

#[test_log::test(tokio::test)]
async fn inline_provider_is_inline() {
    let (repo, _) = repository();
    let service = repo.service().await;

    let _ = TestRequest::get("/explore?bitstream_id=11&provider=inline")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header_contains("Content-Disposition", "inline");
}

#[test_log::test(tokio::test)]
async fn handle_mismatch_is_not_found() {
    let (repo, _) = repository();
    let service = repo.service().await;

    let _ = TestRequest::get("/explore?bitstream_id=11&handle=123456789/99")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("invalid_id");
}

#[test_log::test(tokio::test)]
async fn missing_or_malformed_reference_is_invalid() {
    let (repo, _) = repository();
    let service = repo.service().await;

    for path in ["/explore", "/explore?bitstream_id=eleven"] {
        let _ = TestRequest::get(path)
            .send(&service)
            .await
            .assert_status(StatusCode::NOT_FOUND)
            .assert_error("invalid_id");
    }
}
