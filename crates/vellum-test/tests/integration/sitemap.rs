//! Tests for `/sitemap` and `/htmlmap`.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn sitemap_index_is_sent_gzip_encoded() {
    let repo = TestRepository::new();
    repo.write_sitemap("sitemap_index.xml.gz", b"\x1f\x8bcompressed");
    let service = repo.service().await;

    let response = TestRequest::get("/sitemap")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("Content-Type", "text/xml")
        .assert_header("Content-Encoding", "gzip")
        .assert_header("Content-Length", "12")
        .assert_header_absent("Content-Disposition");
    assert_eq!(response.body, b"\x1f\x8bcompressed");
}

#[test_log::test(tokio::test)]
async fn numbered_sitemap_is_served() {
    let repo = TestRepository::new();
    repo.write_sitemap("sitemap2.xml.gz", b"second");
    let service = repo.service().await;

    let response = TestRequest::get("/sitemap?map=2")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.body_string(), "second");
}

#[test_log::test(tokio::test)]
async fn htmlmap_is_plain_html() {
    let repo = TestRepository::new();
    repo.write_sitemap("sitemap0.html", b"<html></html>");
    let service = repo.service().await;

    let _ = TestRequest::get("/htmlmap?map=0")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("Content-Type", "text/html")
        .assert_header_absent("Content-Encoding")
        .assert_body_contains("<html>");
}

#[test_log::test(tokio::test)]
async fn traversal_is_an_invalid_identifier() {
    let repo = TestRepository::new();
    repo.write_sitemap("sitemap_index.xml.gz", b"index");
    let service = repo.service().await;

    for path in ["/sitemap?map=../x", "/htmlmap?map=-3"] {
        let _ = TestRequest::get(path)
            .send(&service)
            .await
            .assert_status(StatusCode::NOT_FOUND)
            .assert_error("invalid_id");
    }
}

#[test_log::test(tokio::test)]
async fn missing_file_is_not_found() {
    let service = TestRepository::new().service().await;

    let _ = TestRequest::get("/sitemap?map=5")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn sitemap_honours_if_modified_since() {
    let repo = TestRepository::new();
    repo.write_sitemap("sitemap_index.xml.gz", b"index");
    let service = repo.service().await;

    let _ = TestRequest::get("/sitemap")
        .if_modified_since("Fri, 31 Dec 9999 23:59:59 GMT")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_MODIFIED)
        .assert_body_empty();
}
