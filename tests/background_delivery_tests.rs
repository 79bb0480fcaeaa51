//! Integration tests for background delivery on the Tokio runtime.
//!
//! The caller never sees the result of a queued write, so these tests watch
//! the mock server instead.

use std::time::Duration;

use commerce_graph::clients::{Delivery, HttpClient, SpawnDispatcher};
use commerce_graph::{AccessToken, GraphClient, GraphConfig, GraphHost, PostOutcome};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> GraphConfig {
    GraphConfig::builder()
        .host(GraphHost::new(server.uri()).unwrap())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

async fn wait_for_requests(server: &MockServer, count: usize) -> usize {
    for _ in 0..100 {
        let received = server.received_requests().await.unwrap_or_default().len();
        if received >= count {
            return received;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    server.received_requests().await.unwrap_or_default().len()
}

#[tokio::test]
async fn test_background_delivery_is_selected_inside_runtime() {
    let delivery = Delivery::background(&GraphConfig::default());
    assert!(delivery.is_asynchronous());
}

#[tokio::test]
async fn test_queued_create_is_delivered_later() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.9/catalog1/product_groups"))
        .and(header("Authorization", "Bearer tok"))
        .and(body_string_contains("retailer_id=sku-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "g1"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = GraphClient::builder(AccessToken::new("tok").unwrap())
        .delivery(Delivery::background(&config))
        .config(config)
        .build();

    let outcome = client
        .create_product_group(
            "catalog1",
            json!({"retailer_id": "sku-1"}).as_object().unwrap().clone(),
        )
        .await;

    assert_eq!(outcome, PostOutcome::Queued);
    assert_eq!(wait_for_requests(&server, 1).await, 1);
}

#[tokio::test]
async fn test_failed_background_delivery_is_invisible_to_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": {"message": "boom"}})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let dispatcher = SpawnDispatcher::new(HttpClient::new(&config), tokio::runtime::Handle::current());
    let client = GraphClient::builder(AccessToken::new("tok").unwrap())
        .delivery(Delivery::asynchronous(dispatcher))
        .config(config)
        .build();

    let first = client
        .update_product_item("item1", json!({"price": 1}).as_object().unwrap().clone())
        .await;
    let second = client.log_event("ems1", "oops", true).await;

    assert!(first.is_queued());
    assert!(second.is_queued());
    assert_eq!(wait_for_requests(&server, 2).await, 2);
}
