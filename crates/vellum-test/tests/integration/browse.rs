//! Tests for `/browse` listings and CSV export.

use salvo::http::StatusCode;

use super::helpers::*;

fn repository() -> TestRepository {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    repo.store.add_item(
        tree.collection.id,
        Some("123456789/4"),
        &[("dc.title", "zebra crossings"), ("dc.date.issued", "1999")],
    );
    repo.store.add_item(
        tree.collection.id,
        Some("123456789/5"),
        &[("dc.title", "Apples"), ("dc.date.issued", "2010")],
    );
    repo.add_admin();
    repo
}

fn titles(json: &serde_json::Value) -> Vec<String> {
    json["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test_log::test(tokio::test)]
async fn browse_by_title_is_sorted_case_insensitively() {
    let service = repository().service().await;

    let response = TestRequest::get("/browse?type=title")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    let json = response.json();
    assert_eq!(json["index"], "title");
    assert_eq!(json["order"], "ASC");
    assert_eq!(json["total"], 3);
    assert_eq!(
        titles(&json),
        ["Apples", "Streams and sinks", "zebra crossings"]
    );
}

#[test_log::test(tokio::test)]
async fn browse_descending_with_paging() {
    let service = repository().service().await;

    let json = TestRequest::get("/browse?type=title&order=desc&offset=1&rpp=1")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["total"], 3);
    assert_eq!(json["results_per_page"], 1);
    assert_eq!(titles(&json), ["Streams and sinks"]);
}

#[test_log::test(tokio::test)]
async fn malformed_paging_falls_back_to_defaults() {
    let service = repository().service().await;

    let json = TestRequest::get("/browse?type=title&offset=abc&rpp=-5")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["offset"], 0);
    assert_eq!(json["results_per_page"], 20);
    assert_eq!(titles(&json).len(), 3);
}

#[test_log::test(tokio::test)]
async fn browse_scoped_to_collection() {
    let mut repo = repository();
    let other = repo.store.add_community("123456789/10", "Elsewhere");
    let other_collection = repo
        .store
        .add_collection(other.id, "123456789/11", "Elsewhere papers");
    repo.store.add_item(
        other_collection.id,
        Some("123456789/12"),
        &[("dc.title", "Outside the scope")],
    );
    let service = repo.service().await;

    let json = TestRequest::get("/browse?type=title&scope=123456789/11")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["scope"], "123456789/11");
    assert_eq!(titles(&json), ["Outside the scope"]);
}

#[test_log::test(tokio::test)]
async fn unknown_index_is_an_integrity_error() {
    let service = repository().service().await;

    let _ = TestRequest::get("/browse?type=nonsense")
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error("integrity_error");
}

#[test_log::test(tokio::test)]
async fn unknown_order_is_an_integrity_error() {
    let service = repository().service().await;

    let _ = TestRequest::get("/browse?type=title&order=sideways")
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error("integrity_error");
}

#[test_log::test(tokio::test)]
async fn administrator_export_is_a_csv_attachment() {
    let service = repository().service().await;

    let response = TestRequest::get("/browse?type=title&scope=123456789/2&submit_export_metadata=1")
        .as_admin()
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header_contains("Content-Type", "text/csv")
        .assert_header_contains("Content-Disposition", "attachment; filename=\"123456789-2.csv\"");

    let body = response.body_string();
    assert_eq!(body.lines().count(), 4, "header plus three items:\n{body}");
    assert!(body.contains("zebra crossings"));
}

#[test_log::test(tokio::test)]
async fn anonymous_export_is_denied() {
    let service = repository().service().await;

    let _ = TestRequest::get("/browse?type=title&submit_export_metadata=1")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_header_absent("Content-Disposition");
}

#[test_log::test(tokio::test)]
async fn failed_export_writes_no_attachment() {
    let service = repository().service().await;

    let _ = TestRequest::get("/browse?type=nonsense&submit_export_metadata=1")
        .as_admin()
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_header_absent("Content-Disposition")
        .assert_error("integrity_error");
}

#[test_log::test(tokio::test)]
async fn unreadable_items_are_not_counted() {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    let zebra = repo.store.add_item(
        tree.collection.id,
        Some("123456789/4"),
        &[("dc.title", "zebra crossings")],
    );
    repo.store.add_item(
        tree.collection.id,
        Some("123456789/5"),
        &[("dc.title", "Apples")],
    );
    repo.restrict_items_to(&[tree.item.id, zebra.id]);
    let service = repo.service().await;

    let json = TestRequest::get("/browse?type=title&rpp=1")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["total"], 2);
    assert_eq!(titles(&json), ["Streams and sinks"]);
}
