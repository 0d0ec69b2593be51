//! End-to-end tests for the search → reduce → delete pipeline.

mod support;

use artrm_core::Error;
use artrm_core::delete::DeleteParamsImpl;
use artrm_core::search::FileSpec;
use reqwest::StatusCode;
use support::{BASE_URL, Method, aql_body, manager};

fn folder_tree_body() -> String {
    aql_body(&[
        ("libs", "a", "b.txt", "file"),
        ("libs", ".", "a", "folder"),
        ("libs", "a/c", "d.txt", "file"),
        ("libs", "a", "c", "folder"),
        ("libs", ".", "x.txt", "file"),
    ])
}

#[tokio::test]
async fn delete_matching_removes_only_top_chain() {
    let (transport, manager) = manager(false);
    transport.on_post(StatusCode::OK, &folder_tree_body());

    let report = manager
        .delete_matching(DeleteParamsImpl::new(FileSpec::pattern("libs/")))
        .await
        .unwrap();

    assert_eq!(report.deleted_count(), 2);
    assert_eq!(
        transport.deleted_urls(),
        vec![format!("{BASE_URL}libs/a"), format!("{BASE_URL}libs/x.txt")]
    );
}

#[tokio::test]
async fn structured_search_always_includes_directories() {
    let (transport, manager) = manager(false);
    transport.on_post(StatusCode::OK, r#"{"results":[]}"#);

    let plan = manager
        .search_paths_to_delete(DeleteParamsImpl::new(FileSpec::pattern("libs/a/*")))
        .await
        .unwrap();

    assert!(plan.is_empty());
    let body = transport.requests_of(Method::Post)[0].body.clone().unwrap();
    assert!(body.contains(r#""type":"any""#));
}

#[tokio::test]
async fn literal_query_results_are_reduced() {
    let query = r#"items.find({"repo":"libs"}).include("repo","path","name","type")"#;
    let (transport, manager) = manager(false);
    transport.on_post(StatusCode::OK, &folder_tree_body());

    let plan = manager
        .search_paths_to_delete(DeleteParamsImpl::new(FileSpec::aql(query)))
        .await
        .unwrap();

    let paths: Vec<String> = plan.iter().map(|item| item.full_path()).collect();
    assert_eq!(paths, vec!["libs/a", "libs/x.txt"]);
    assert_eq!(
        transport.requests_of(Method::Post)[0].body.as_deref(),
        Some(query)
    );
}

#[tokio::test]
async fn dry_run_searches_but_never_deletes() {
    let (transport, manager) = manager(true);
    transport.on_post(StatusCode::OK, &folder_tree_body());

    let report = manager
        .delete_matching(DeleteParamsImpl::new(FileSpec::pattern("libs/")))
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.deleted_count(), 2);
    assert_eq!(transport.requests_of(Method::Post).len(), 1);
    assert!(transport.requests_of(Method::Delete).is_empty());
}

#[tokio::test]
async fn search_failure_prevents_deletion() {
    let (transport, manager) = manager(false);
    transport.on_post(StatusCode::UNAUTHORIZED, r#"{"errors":[{"status":401}]}"#);

    let err = manager
        .delete_matching(DeleteParamsImpl::new(FileSpec::pattern("libs/")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Query { .. }));
    assert!(transport.requests_of(Method::Delete).is_empty());
}

/// A retry after partial failure re-plans from a fresh search, but a path
/// deleted by the first run and still returned by the server fails again.
#[tokio::test]
async fn rerun_after_partial_failure_is_not_idempotent() {
    let (transport, manager) = manager(false);
    transport
        .on_post(StatusCode::OK, &folder_tree_body())
        .on_delete(StatusCode::NO_CONTENT, "")
        .on_delete(StatusCode::INTERNAL_SERVER_ERROR, "boom");

    let first = manager
        .delete_matching(DeleteParamsImpl::new(FileSpec::pattern("libs/")))
        .await
        .unwrap_err();
    assert!(matches!(first, Error::Delete { completed: 1, .. }));

    transport
        .on_post(StatusCode::OK, &folder_tree_body())
        .on_delete(StatusCode::NOT_FOUND, "");

    let second = manager
        .delete_matching(DeleteParamsImpl::new(FileSpec::pattern("libs/")))
        .await
        .unwrap_err();
    match second {
        Error::Delete { path, status, .. } => {
            assert_eq!(path, "libs/a");
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        other => panic!("expected delete error, got {other:?}"),
    }
}
