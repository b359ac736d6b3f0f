//! End-to-end catalog add / get / replace / delete through the service

mod common;

use catalogd_core::catalog::{ConnectorId, DEFAULT_MASK};
use catalogd_core::{CatalogError, CoordinatorConfig};
use common::{request, start};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn ids(names: &[&str]) -> BTreeSet<ConnectorId> {
    names.iter().map(|n| ConnectorId::new(*n)).collect()
}

#[tokio::test]
async fn test_add_then_replace_with_other_connector() {
    let t = start(CoordinatorConfig::default()).await;
    assert!(t.service.list_all().await.is_empty());

    let results = t
        .service
        .add(vec![request("t1", "mysql", &[("mysql.url", "x")])])
        .await
        .unwrap();
    assert!(results[0].succeeded);

    let first = t.service.get_info("t1").await.unwrap();
    assert_eq!(first.catalog.connector_name, "mysql");
    assert_eq!(
        first.catalog.properties.get("mysql.url").map(String::as_str),
        Some("x")
    );

    let results = t
        .service
        .add(vec![request("t1", "postgres", &[])])
        .await
        .unwrap();
    assert!(results[0].succeeded);
    assert!(
        results[0].message.contains("replaced"),
        "trace was: {}",
        results[0].message
    );

    let second = t.service.get_info("t1").await.unwrap();
    assert_eq!(second.catalog.connector_name, "postgres");
    assert!(second.catalog.create_time >= first.catalog.create_time);
    assert_eq!(t.service.directory().len().await, 1);
}

#[tokio::test]
async fn test_partial_failure_keeps_order_and_successes() {
    let t = start(CoordinatorConfig::default()).await;
    t.connectors.fail_on("b", "connection refused").await;

    let results = t
        .service
        .add(vec![
            request("a", "mysql", &[]),
            request("b", "mysql", &[]),
        ])
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].catalog_name, "a");
    assert!(results[0].succeeded);
    assert_eq!(results[1].catalog_name, "b");
    assert!(!results[1].succeeded);
    assert!(results[1].message.contains("connection refused"));

    assert!(t.service.get_info("a").await.is_ok());
    assert_eq!(
        t.service.get_info("b").await.unwrap_err(),
        CatalogError::NotFound {
            name: "b".to_string()
        }
    );
    assert_eq!(t.service.synchronizer().published().await, ids(&["a"]));
}

#[tokio::test]
async fn test_nth_item_failure_in_larger_batch() {
    let t = start(CoordinatorConfig::default()).await;
    t.connectors.fail_on("c3", "bad credentials").await;

    let requests = (0..6)
        .map(|i| request(&format!("c{i}"), "mysql", &[]))
        .collect();
    let results = t.service.add(requests).await.unwrap();

    let flags: Vec<bool> = results.iter().map(|r| r.succeeded).collect();
    assert_eq!(flags, vec![true, true, true, false, true, true]);
    let names: Vec<&str> = results.iter().map(|r| r.catalog_name.as_str()).collect();
    assert_eq!(names, vec!["c0", "c1", "c2", "c3", "c4", "c5"]);
    assert_eq!(t.service.directory().len().await, 5);
}

#[tokio::test]
async fn test_password_is_masked_but_stored_intact() {
    let t = start(CoordinatorConfig::default()).await;
    t.service
        .add(vec![request(
            "t1",
            "mysql",
            &[("db-password", "secret"), ("db-user", "admin")],
        )])
        .await
        .unwrap();

    for _ in 0..3 {
        let view = t.service.get_info("t1").await.unwrap();
        assert_eq!(
            view.catalog.properties.get("db-password").map(String::as_str),
            Some(DEFAULT_MASK)
        );
        assert_eq!(
            view.catalog.properties.get("db-user").map(String::as_str),
            Some("admin")
        );
    }

    let listed = t.service.list_all().await;
    assert_eq!(
        listed[0].catalog.properties.get("db-password").map(String::as_str),
        Some(DEFAULT_MASK)
    );

    let raw = t.service.directory().get("t1").await.unwrap();
    assert_eq!(
        raw.properties().get("db-password").map(String::as_str),
        Some("secret")
    );
}

#[tokio::test]
async fn test_prefix_listing_is_exact() {
    let t = start(CoordinatorConfig::default()).await;
    t.service
        .add(vec![
            request("teamA_sales", "mysql", &[]),
            request("teamA_hr", "postgres", &[]),
            request("teamAB_x", "mysql", &[]),
            request("teamB_sales", "mysql", &[]),
        ])
        .await
        .unwrap();

    let names: Vec<String> = t
        .service
        .list_by_prefix("teamA_")
        .await
        .into_iter()
        .map(|v| v.catalog.catalog_name)
        .collect();
    assert_eq!(names, vec!["teamA_hr", "teamA_sales"]);
    assert!(t.service.list_by_prefix("teamC_").await.is_empty());
}

#[tokio::test]
async fn test_delete_updates_directory_and_announcement() {
    let t = start(CoordinatorConfig::default()).await;
    t.service
        .add(vec![request("a", "mysql", &[]), request("b", "mysql", &[])])
        .await
        .unwrap();

    t.service.delete("a").await.unwrap();

    assert!(t.service.get_info("a").await.unwrap_err().is_not_found());
    assert_eq!(t.service.synchronizer().published().await, ids(&["b"]));
    assert!(t
        .connectors
        .live()
        .await
        .iter()
        .all(|(name, _)| name != "a"));

    let err = t.service.delete("a").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_lifecycle_failure_is_surfaced() {
    let t = start(CoordinatorConfig::default()).await;
    t.service
        .add(vec![request("a", "mysql", &[])])
        .await
        .unwrap();
    t.connectors.fail_on("a", "in use").await;

    let err = t.service.delete("a").await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(t.service.get_info("a").await.is_ok());
}

#[tokio::test]
async fn test_active_nodes_follow_announcement() {
    let t = start(CoordinatorConfig::default()).await;
    t.service
        .add(vec![request("teamA_sales", "mysql", &[])])
        .await
        .unwrap();

    let view = t.service.get_info("teamA_sales").await.unwrap();
    assert_eq!(view.nodes.len(), 1);
    assert_eq!(view.nodes[0].identifier, "local");
    assert!(view.nodes[0].coordinator);
}
