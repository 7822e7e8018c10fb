//! Tests for `/simple-search` and `/advanced-search`.

use salvo::http::StatusCode;

use super::helpers::*;

fn repository() -> TestRepository {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    repo.store.add_item(
        tree.collection.id,
        Some("123456789/4"),
        &[
            ("dc.title", "Sinks of heat"),
            ("dc.contributor.author", "Babbage, Charles"),
        ],
    );
    let hidden = repo.store.add_item(
        tree.collection.id,
        Some("123456789/5"),
        &[("dc.title", "Withdrawn sinks")],
    );
    repo.store.set_item_state(hidden.id, true, true);
    repo
}

fn handles(json: &serde_json::Value) -> Vec<String> {
    let mut handles: Vec<String> = json["items"]
        .as_array()
        .expect("items array")
        .iter()
        .filter_map(|item| item["handle"].as_str().map(ToString::to_string))
        .collect();
    handles.sort();
    handles
}

#[test_log::test(tokio::test)]
async fn simple_search_matches_any_field() {
    let service = repository().service().await;

    let json = TestRequest::get("/simple-search?query=sinks")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["processor"], "metadata-scan");
    assert_eq!(handles(&json), ["123456789/3", "123456789/4"]);
}

#[test_log::test(tokio::test)]
async fn simple_search_requires_every_word() {
    let service = repository().service().await;

    let json = TestRequest::get("/simple-search?query=sinks%20lovelace")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(handles(&json), ["123456789/3"]);
}

#[test_log::test(tokio::test)]
async fn empty_query_returns_nothing() {
    let service = repository().service().await;

    let json = TestRequest::get("/simple-search?query=")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["total"], 0);
}

#[test_log::test(tokio::test)]
async fn advanced_search_combines_fielded_terms() {
    let service = repository().service().await;

    let json = TestRequest::get(
        "/advanced-search?field1=dc.title&query1=sinks&field2=dc.contributor.author&query2=babbage",
    )
    .send(&service)
    .await
    .assert_status(StatusCode::OK)
    .json();
    assert_eq!(handles(&json), ["123456789/4"]);
}

#[test_log::test(tokio::test)]
async fn advanced_search_any_field() {
    let service = repository().service().await;

    let json = TestRequest::get("/advanced-search?field1=ANY&query1=lovelace")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(handles(&json), ["123456789/3"]);
}

#[test_log::test(tokio::test)]
async fn unreadable_matches_are_not_counted() {
    let mut repo = TestRepository::new();
    let tree = repo.seed_tree();
    repo.store.add_item(
        tree.collection.id,
        Some("123456789/4"),
        &[("dc.title", "Sinks of heat")],
    );
    repo.restrict_items_to(&[tree.item.id]);
    let service = repo.service().await;

    let json = TestRequest::get("/simple-search?query=sinks")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["total"], 1);
    assert_eq!(handles(&json), ["123456789/3"]);
}
