use std::sync::Arc;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use subscription_aggregator::{model::Subscription, storage::InMemoryStorage};

use crate::helpers::{error_message, TestApp, UnreachableStorage};

fn netflix() -> Value {
    json!({
        "user_id": "u1",
        "service_name": "Netflix",
        "price": 999,
        "start_date": "2024-01-15"
    })
}

#[tokio::test]
async fn create_returns_201_and_the_record_shows_up_in_the_list() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_subscriptions(&netflix()).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.json::<Value>().await?, json!({ "status": "created" }));

    let res = app.get_subscriptions().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let subscriptions: Vec<Subscription> = res.json().await?;

    assert_eq!(subscriptions.len(), 1);
    let sub = &subscriptions[0];
    assert!(sub.id > 0);
    assert_eq!(sub.user_id, "u1");
    assert_eq!(sub.service_name, "Netflix");
    assert_eq!(sub.price, 999);
    assert_eq!(sub.start_date, "2024-01-15");

    Ok(())
}

#[tokio::test]
async fn get_by_id_returns_the_created_record() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.create(&netflix()).await?;

    let res = app.get_subscription(id).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await?,
        json!({
            "id": id,
            "user_id": "u1",
            "service_name": "Netflix",
            "price": 999,
            "start_date": "2024-01-15"
        })
    );

    Ok(())
}

#[tokio::test]
async fn create_returns_400_for_invalid_fields_and_stores_nothing() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (
            json!({ "user_id": "u1", "service_name": "Netflix", "price": 0, "start_date": "2024-01-15" }),
            "price must be greater than 0",
        ),
        (
            json!({ "user_id": "u1", "service_name": "Netflix", "price": -999, "start_date": "2024-01-15" }),
            "price must be greater than 0",
        ),
        (
            json!({ "user_id": "u1", "service_name": "Netflix", "price": 999, "start_date": "not-a-date" }),
            "start date must be in format YYYY-MM-DD",
        ),
        (
            json!({ "user_id": "", "service_name": "Netflix", "price": 999, "start_date": "2024-01-15" }),
            "user ID cannot be empty",
        ),
        (
            json!({ "user_id": "u1", "price": 999, "start_date": "2024-01-15" }),
            "service name cannot be empty",
        ),
        (json!({}), "user ID cannot be empty"),
    ];

    for (body, expected) in cases {
        let res = app.post_subscriptions(&body).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "The API did not return a 400 BAD REQUEST for payload {body}"
        );
        assert_eq!(error_message(res).await?, expected);
    }
    assert!(app.storage.is_empty());

    Ok(())
}

#[tokio::test]
async fn create_returns_400_for_undecodable_bodies() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        ("{\"user_id\": ", "application/json"),
        ("{\"price\": \"a lot\"}", "application/json"),
        ("user_id=u1", "application/x-www-form-urlencoded"),
    ];

    for (body, content_type) in cases {
        let res = app
            .http_client
            .post(app.url("/subscriptions"))
            .header("content-type", content_type)
            .body(body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert!(!error_message(res).await?.is_empty());
    }
    assert!(app.storage.is_empty());

    Ok(())
}

#[tokio::test]
async fn get_unknown_id_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get_subscription(999_999).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(res).await?, "Subscription not found");

    Ok(())
}

#[tokio::test]
async fn malformed_ids_return_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    for (id, expected) in [
        ("abc", "invalid subscription ID"),
        ("0", "ID must be greater than 0"),
        ("-3", "ID must be greater than 0"),
    ] {
        let res = app.get_subscription(id).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "id: {id}");
        assert_eq!(error_message(res).await?, expected);

        let res = app.delete_subscription(id).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "id: {id}");

        let res = app.put_subscription(id, &netflix()).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "id: {id}");
    }

    Ok(())
}

#[tokio::test]
async fn list_on_empty_table_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get_subscriptions().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(res).await?, "Subscriptions not found");

    Ok(())
}

#[tokio::test]
async fn update_replaces_every_field() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.create(&netflix()).await?;

    let body = json!({
        "user_id": "u2",
        "service_name": "Netflix Premium",
        "price": 1299,
        "start_date": "2024-06-01"
    });
    let res = app.put_subscription(id, &body).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "status": "updated" }));

    let sub: Subscription = app.get_subscription(id).await?.json().await?;
    assert_eq!(
        sub,
        Subscription {
            id,
            user_id: "u2".into(),
            service_name: "Netflix Premium".into(),
            price: 1299,
            start_date: "2024-06-01".into(),
        }
    );

    Ok(())
}

#[tokio::test]
async fn update_with_mismatched_id_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.create(&netflix()).await?;

    let mut body = netflix();
    body["id"] = json!(id + 1);
    body["price"] = json!(1);

    let res = app.put_subscription(id, &body).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(res).await?,
        "subscription ID in body does not match the path"
    );

    let sub: Subscription = app.get_subscription(id).await?.json().await?;
    assert_eq!(sub.price, 999);

    Ok(())
}

#[tokio::test]
async fn update_unknown_id_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.put_subscription(999_999, &netflix()).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(res).await?, "Subscription not found");

    Ok(())
}

#[tokio::test]
async fn update_with_invalid_body_returns_400() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.create(&netflix()).await?;

    let mut body = netflix();
    body["start_date"] = json!("2024-1-5");

    let res = app.put_subscription(id, &body).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(res).await?,
        "start date must be in format YYYY-MM-DD"
    );

    Ok(())
}

#[tokio::test]
async fn delete_returns_204_then_404() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.create(&netflix()).await?;
    let other = app
        .create(&json!({
            "user_id": "u2",
            "service_name": "Spotify",
            "price": 199,
            "start_date": "2024-02-01"
        }))
        .await?;

    let res = app.delete_subscription(id).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    for _ in 0..2 {
        let res = app.delete_subscription(id).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(res).await?, "Subscription not found");
    }

    let res = app.get_subscription(other).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(app.storage.len(), 1);

    Ok(())
}

#[tokio::test]
async fn delete_unknown_id_returns_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    for _ in 0..2 {
        let res = app.delete_subscription(999_999).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    Ok(())
}

#[tokio::test]
async fn sum_of_prices() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get_sum().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "total_sum": 0 }));

    for (service_name, price) in [("Netflix", 100), ("Spotify", 250)] {
        app.create(&json!({
            "user_id": "u1",
            "service_name": service_name,
            "price": price,
            "start_date": "2024-01-15"
        }))
        .await?;
    }

    let res = app.get_sum().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "total_sum": 350 }));

    Ok(())
}

#[tokio::test]
async fn storage_failures_return_a_generic_500() -> Result<()> {
    let app = TestApp::spawn_with(
        Arc::new(UnreachableStorage),
        Arc::new(InMemoryStorage::new()),
    )
    .await?;

    let responses = [
        app.post_subscriptions(&netflix()).await?,
        app.get_subscriptions().await?,
        app.get_subscription(1).await?,
        app.put_subscription(1, &netflix()).await?,
        app.delete_subscription(1).await?,
        app.get_sum().await?,
    ];

    for res in responses {
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_message(res).await?, "Internal Server Error");
    }

    Ok(())
}
