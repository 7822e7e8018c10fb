#![allow(clippy::unused_async)]
//! Tests for `/retrieve` and `/bitstream` content delivery.

use salvo::http::StatusCode;
use vellum_test::db::store::memory::MemoryFault;

use super::helpers::*;

fn repository_with_pdf(size: usize) -> (TestRepository, uuid::Uuid) {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    let bitstream = repo.add_content(
        tree.item.id,
        "ORIGINAL",
        "thesis.pdf",
        "application/pdf",
        vec![b'x'; size],
    );
    repo.store.set_bitstream_legacy_id(bitstream.id, 42);
    (repo, bitstream.id)
}

// ============================================================================
// Conditional requests
// ============================================================================

#[test_log::test(tokio::test)]
async fn exact_if_modified_since_is_not_modified() {
    let (repo, _) = repository_with_pdf(10);
    let service = repo.service().await;

    TestRequest::get("/retrieve/42")
        .if_modified_since(SEEDED_LAST_MODIFIED)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_MODIFIED)
        .assert_header("Last-Modified", SEEDED_LAST_MODIFIED)
        .assert_body_empty();
}

#[test_log::test(tokio::test)]
async fn earlier_if_modified_since_sends_content() {
    let (repo, _) = repository_with_pdf(10);
    let service = repo.service().await;

    let response = TestRequest::get("/retrieve/42/thesis.pdf")
        .if_modified_since("Sun, 31 Dec 2023 23:59:59 GMT")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("Last-Modified", SEEDED_LAST_MODIFIED);
    assert_eq!(response.body, vec![b'x'; 10]);
}

#[test_log::test(tokio::test)]
async fn unparseable_if_modified_since_is_ignored() {
    let (repo, _) = repository_with_pdf(10);
    let service = repo.service().await;

    let _ = TestRequest::get("/retrieve/42")
        .if_modified_since("yesterday-ish")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
}

// ============================================================================
// Disposition and headers
// ============================================================================

#[test_log::test(tokio::test)]
async fn large_content_is_an_attachment() {
    let (repo, _) = repository_with_pdf(5000);
    let service = repo.service().await;

    let response = TestRequest::get("/retrieve/42")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("Content-Type", "application/pdf")
        .assert_header("Content-Length", "5000")
        .assert_header_contains("Content-Disposition", "attachment; filename=\"thesis.pdf\"");
    assert_eq!(response.body.len(), 5000);
}

#[test_log::test(tokio::test)]
async fn threshold_boundary_is_inclusive() {
    for (size, expected) in [(999, "inline"), (1000, "attachment")] {
        let (mut repo, _) = repository_with_pdf(size);
        repo.settings.delivery.disposition_threshold = 1000;
        let service = repo.service().await;

        let _ = TestRequest::get("/retrieve/42")
            .send(&service)
            .await
            .assert_status(StatusCode::OK)
            .assert_header_contains("Content-Disposition", expected);
    }
}

#[test_log::test(tokio::test)]
async fn disabled_threshold_is_always_inline() {
    let (mut repo, _) = repository_with_pdf(5000);
    repo.settings.delivery.disposition_threshold = -1;
    let service = repo.service().await;

    let _ = TestRequest::get("/retrieve/42")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header_contains("Content-Disposition", "inline");
}

#[test_log::test(tokio::test)]
async fn empty_content_has_zero_length_and_no_disposition() {
    let (repo, _) = repository_with_pdf(0);
    let service = repo.service().await;

    let _ = TestRequest::get("/retrieve/42")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("Content-Length", "0")
        .assert_header_absent("Content-Disposition")
        .assert_body_empty();
}

#[test_log::test(tokio::test)]
async fn head_sends_headers_without_body() {
    let (repo, _) = repository_with_pdf(5000);
    let service = repo.service().await;

    let _ = TestRequest::head("/retrieve/42")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("Content-Length", "5000")
        .assert_body_empty();
}

// ============================================================================
// Identifiers
// ============================================================================

#[test_log::test(tokio::test)]
async fn malformed_ids_are_invalid() {
    let (repo, _) = repository_with_pdf(10);
    let service = repo.service().await;

    for path in ["/retrieve/12abc", "/retrieve/-1"] {
        let response = TestRequest::get(path)
            .send(&service)
            .await
            .assert_status(StatusCode::NOT_FOUND)
            .assert_error("invalid_id");
        assert_eq!(response.json()["path"], path);
    }
}

#[test_log::test(tokio::test)]
async fn unknown_id_is_not_found() {
    let (repo, _) = repository_with_pdf(10);
    let service = repo.service().await;

    let _ = TestRequest::get("/retrieve/9999")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("invalid_id");
}

#[test_log::test(tokio::test)]
async fn deleted_bitstream_is_not_found() {
    let (mut repo, id) = repository_with_pdf(10);
    repo.store.mark_bitstream_deleted(id);
    let service = repo.service().await;

    let _ = TestRequest::get("/retrieve/42")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn missing_stored_bytes_are_not_found() {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    let bitstream = repo
        .store
        .add_bitstream(tree.item.id, "ORIGINAL", "ghost.txt", "text/plain", 4);
    let service = repo.service().await;

    let _ = TestRequest::get(&format!("/retrieve/{}", bitstream.legacy_id))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Handle-addressed bitstreams
// ============================================================================

#[test_log::test(tokio::test)]
async fn bitstream_path_by_sequence() {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    repo.add_content(tree.item.id, "ORIGINAL", "a.txt", "text/plain", "first");
    repo.add_content(tree.item.id, "ORIGINAL", "b.txt", "text/plain", "second");
    let service = repo.service().await;

    let response = TestRequest::get("/bitstream/123456789/3/2/whatever.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header_contains("Content-Disposition", "filename=\"b.txt\"");
    assert_eq!(response.body_string(), "second");
}

#[test_log::test(tokio::test)]
async fn bitstream_path_falls_back_to_name() {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    repo.add_content(tree.item.id, "ORIGINAL", "a.txt", "text/plain", "first");
    repo.add_content(tree.item.id, "ORIGINAL", "b.txt", "text/plain", "second");
    let service = repo.service().await;

    let response = TestRequest::get("/bitstream/123456789/3/a.txt")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.body_string(), "first");
}

#[test_log::test(tokio::test)]
async fn bitstream_path_with_unknown_handle_is_not_found() {
    let (repo, _) = repository_with_pdf(10);
    let service = repo.service().await;

    let _ = TestRequest::get("/bitstream/123456789/999/1/thesis.pdf")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Authorization
// ============================================================================

fn repository_with_license(show: bool, disclose: bool) -> TestRepository {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    let license = repo.add_content(tree.item.id, "LICENSE", "license.txt", "text/plain", "terms");
    repo.store.set_bitstream_legacy_id(license.id, 7);
    repo.add_admin();
    repo.settings.delivery.show_license_bitstreams = show;
    repo.settings.delivery.disclose_existence = disclose;
    repo
}

#[test_log::test(tokio::test)]
async fn hidden_license_is_not_found_for_anonymous() {
    let service = repository_with_license(false, false).service().await;

    let _ = TestRequest::get("/retrieve/7")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("invalid_id");
}

#[test_log::test(tokio::test)]
async fn hidden_license_is_served_to_administrators() {
    let service = repository_with_license(false, false).service().await;

    let response = TestRequest::get("/retrieve/7")
        .as_admin()
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.body_string(), "terms");
}

#[test_log::test(tokio::test)]
async fn hidden_license_is_forbidden_when_disclosing() {
    let service = repository_with_license(false, true).service().await;

    let _ = TestRequest::get("/retrieve/7")
        .send(&service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("forbidden");
}

#[test_log::test(tokio::test)]
async fn visible_license_is_served_to_anyone() {
    let service = repository_with_license(true, false).service().await;

    let _ = TestRequest::get("/retrieve/7")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn withdrawn_item_content_is_hidden() {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    let bitstream = repo.add_content(tree.item.id, "ORIGINAL", "a.txt", "text/plain", "x");
    repo.store.set_item_state(tree.item.id, true, true);
    repo.add_admin();
    let service = repo.service().await;
    let path = format!("/retrieve/{}", bitstream.legacy_id);

    let _ = TestRequest::get(&path)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    let _ = TestRequest::get(&path)
        .as_admin()
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn bad_credentials_are_challenged() {
    let (mut repo, _) = repository_with_pdf(10);
    repo.add_admin();
    let service = repo.service().await;

    let _ = TestRequest::get("/retrieve/42")
        .basic_auth(ADMIN_EMAIL, "wrong")
        .send(&service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_header_contains("WWW-Authenticate", "Basic")
        .assert_error("not_authenticated");
}

// ============================================================================
// Collaborator failures
// ============================================================================

#[test_log::test(tokio::test)]
async fn store_timeout_is_gateway_timeout() {
    let (mut repo, _) = repository_with_pdf(10);
    repo.fail_store(MemoryFault::Timeout);
    let service = repo.service().await;

    let _ = TestRequest::get("/retrieve/42")
        .send(&service)
        .await
        .assert_status(StatusCode::GATEWAY_TIMEOUT)
        .assert_error("internal_error");
}

#[test_log::test(tokio::test)]
async fn store_unavailable_is_service_unavailable() {
    let (mut repo, _) = repository_with_pdf(10);
    repo.fail_store(MemoryFault::Unavailable);
    let service = repo.service().await;

    let _ = TestRequest::get("/retrieve/42")
        .send(&service)
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
