//! Tests for `/community-list`, `/handle` pages and the utility routes.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn community_list_nests_collections() {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    let child = repo
        .store
        .add_sub_community(tree.community.id, "123456789/20", "Physics");
    repo.store.add_collection(child.id, "123456789/21", "Preprints");
    let service = repo.service().await;

    let json = TestRequest::get("/community-list")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let top = &json["communities"][0];
    assert_eq!(top["handle"], "123456789/1");
    assert_eq!(top["collections"][0]["name"], "Theses");
    assert_eq!(top["sub_communities"][0]["handle"], "123456789/20");
    assert_eq!(
        top["sub_communities"][0]["collections"][0]["handle"],
        "123456789/21"
    );
}

#[test_log::test(tokio::test)]
async fn community_cycle_is_an_integrity_error() {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    let child = repo
        .store
        .add_sub_community(tree.community.id, "123456789/20", "Loop");
    repo.store.link_community(child.id, tree.community.id);
    let service = repo.service().await;

    let _ = TestRequest::get("/handle/123456789/1")
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error("integrity_error");
}

#[test_log::test(tokio::test)]
async fn item_page_lists_readable_bitstreams() {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    repo.add_content(tree.item.id, "ORIGINAL", "paper.pdf", "application/pdf", "pdf");
    repo.add_content(tree.item.id, "LICENSE", "license.txt", "text/plain", "terms");
    repo.settings.delivery.show_license_bitstreams = false;
    let service = repo.service().await;

    let json = TestRequest::get("/handle/123456789/3")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["type"], "item");
    assert_eq!(json["title"], "Streams and sinks");
    let bitstreams = json["bitstreams"].as_array().expect("bitstreams array");
    assert_eq!(bitstreams.len(), 1);
    assert_eq!(bitstreams[0]["url"], "/bitstream/123456789/3/1/paper.pdf");
}

#[test_log::test(tokio::test)]
async fn collection_page_and_extra_path_info() {
    let mut repo = TestRepository::new();
    repo.seed_tree();
    let service = repo.service().await;

    let json = TestRequest::get("/handle/123456789/2/browse-title")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["type"], "collection");
    assert_eq!(json["name"], "Theses");
}

#[test_log::test(tokio::test)]
async fn unknown_handle_is_not_found() {
    let mut repo = TestRepository::new();
    repo.seed_tree();
    let service = repo.service().await;

    let _ = TestRequest::get("/handle/123456789/404")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("invalid_id");
}

#[test_log::test(tokio::test)]
async fn healthcheck_is_ok() {
    let service = TestRepository::new().service().await;

    let _ = TestRequest::get("/healthcheck")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("OK");
}

#[test_log::test(tokio::test)]
async fn whoami_reports_the_actor() {
    let mut repo = TestRepository::new();
    let admin = repo.add_admin();
    let service = repo.service().await;

    let json = TestRequest::get("/whoami")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["status"], "anonymous");

    let json = TestRequest::get("/whoami")
        .as_admin()
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["email"], ADMIN_EMAIL);
    assert_eq!(json["id"], admin.id.to_string());
}
