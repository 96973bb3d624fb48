use anyhow::Result;
use fake::{
    faker::{internet::en::SafeEmail, name::en::Name},
    Fake,
};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::{
    matchers::{any, body_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{message, TestApp, WEBHOOK_PATH};

#[tokio::test]
async fn waitlist_valid_signup_is_relayed() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "Ada", "email": "ada@example.com"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.webhook_server)
        .await;

    let res = app
        .post_waitlist(&json!({"name": "Ada", "email": "ada@example.com"}))
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!("Successfully joined waitlist", message(res).await?);

    Ok(())
}

#[tokio::test]
async fn waitlist_response_body_is_only_the_message() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.webhook_server)
        .await;

    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    let res = app
        .post_waitlist(&json!({"name": name, "email": email}))
        .await?;
    let body: serde_json::Value = res.json().await?;

    assert_eq!(json!({"message": "Successfully joined waitlist"}), body);

    Ok(())
}

#[tokio::test]
async fn waitlist_returns_400_when_name_or_email_missing() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.webhook_server)
        .await;

    let cases = [
        (json!({"name": "Ada"}), "Missing email"),
        (json!({"email": "ada@example.com"}), "Missing name"),
        (json!({"name": "", "email": "ada@example.com"}), "Empty name"),
        (json!({"name": "Ada", "email": ""}), "Empty email"),
        (json!({"name": null, "email": "ada@example.com"}), "Null name"),
        (json!({}), "Empty json"),
        (json!(["Ada", "ada@example.com"]), "Array instead of object"),
        (json!("hello"), "String instead of object"),
        (json!(5), "Number instead of object"),
    ];

    for (body, description) in cases {
        let res = app.post_waitlist(&body).await?;
        assert_eq!(
            400,
            res.status().as_u16(),
            "The API did not return a 400 BAD REQUEST when the payload was: {description}."
        );
        assert_eq!("Missing name or email", message(res).await?);
    }

    Ok(())
}

#[tokio::test]
async fn waitlist_without_webhook_returns_configuration_error() -> Result<()> {
    let app = TestApp::spawn_without_webhook().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.webhook_server)
        .await;

    let res = app
        .post_waitlist(&json!({"name": "Ada", "email": "ada@example.com"}))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!("Server configuration error", message(res).await?);

    Ok(())
}

#[tokio::test]
async fn waitlist_blank_webhook_url_returns_configuration_error() -> Result<()> {
    let app = TestApp::spawn_with_blank_webhook().await?;

    let res = app
        .post_waitlist(&json!({"name": "Ada", "email": "ada@example.com"}))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!("Server configuration error", message(res).await?);

    Ok(())
}

#[tokio::test]
async fn waitlist_upstream_non_2xx_returns_failed_to_submit() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("Queue is full."))
        .expect(1)
        .mount(&app.webhook_server)
        .await;

    let res = app
        .post_waitlist(&json!({"name": "Ada", "email": "ada@example.com"}))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(json!({"message": "Failed to submit data"}), body);

    Ok(())
}

#[tokio::test]
async fn waitlist_unreachable_webhook_returns_internal_server_error() -> Result<()> {
    let app = TestApp::spawn_with_unreachable_webhook().await?;

    let res = app
        .post_waitlist(&json!({"name": "Ada", "email": "ada@example.com"}))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!("Internal Server Error", message(res).await?);

    Ok(())
}

#[tokio::test]
async fn waitlist_malformed_body_returns_internal_server_error() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.webhook_server)
        .await;

    for body in [
        "",
        "null",
        "{\"name\": \"Ada\"",
        "name=Ada&email=ada@example.com",
    ] {
        let res = app.post_waitlist_raw(body).await?;
        assert_eq!(
            res.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Wrong status for body: {body}"
        );
        assert_eq!("Internal Server Error", message(res).await?);
    }

    Ok(())
}

#[tokio::test]
async fn waitlist_accepts_json_without_content_type() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.webhook_server)
        .await;

    let res = app
        .post_waitlist_raw(r#"{"name":"Ada","email":"ada@example.com"}"#)
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn waitlist_same_signup_twice_is_relayed_twice() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.webhook_server)
        .await;

    let body = json!({"name": "Ada", "email": "ada@example.com"});
    for _ in 0..2 {
        let res = app.post_waitlist(&body).await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    Ok(())
}

#[tokio::test]
async fn waitlist_only_accepts_post() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .get(format!("{}/api/waitlist", app.address()))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}

#[tokio::test]
async fn waitlist_error_responses_carry_a_request_id() -> Result<()> {
    let app = TestApp::spawn_without_webhook().await?;

    let cases = [
        (json!({"name": "Ada"}), StatusCode::BAD_REQUEST),
        (
            json!({"name": "Ada", "email": "ada@example.com"}),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (body, status) in cases {
        let res = app.post_waitlist(&body).await?;
        assert_eq!(res.status(), status);

        let req_id = res
            .headers()
            .get("x-request-id")
            .map(|id| id.to_str())
            .transpose()?;
        assert!(
            req_id.is_some_and(|id| !id.is_empty()),
            "No x-request-id on a {status} response"
        );
    }

    Ok(())
}
