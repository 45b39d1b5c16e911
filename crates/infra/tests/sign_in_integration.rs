//! Integration tests for flow selection and the sign-in trigger
//!
//! Wires configuration, platform selection and the trigger together against
//! mock collaborators and a wiremock stand-in for Google.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use butterfly_common::auth::{AuthError, GoogleEndpoints};
use butterfly_common::testing::{MockBrowserSession, MockIdentityScript};
use butterfly_domain::{AuthConfiguration, ClientIds, Platform};
use butterfly_infra::{select_flow, FlowCollaborators, SignInTrigger};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config() -> Arc<AuthConfiguration> {
    Arc::new(AuthConfiguration {
        client_ids: ClientIds {
            ios: Some("abc.apps.googleusercontent.com".to_string()),
            android: None,
            web: Some("web.apps.googleusercontent.com".to_string()),
        },
        client_secret: Some("GOCSPX-secret".to_string()),
        scheme: Some("butterfly".to_string()),
    })
}

#[tokio::test]
async fn test_native_trigger_signs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.access",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v2/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "123",
            "email": "a@x.com"
        })))
        .mount(&server)
        .await;

    let collaborators = FlowCollaborators::default()
        .with_browser(Arc::new(MockBrowserSession::approving("xyz")))
        .with_endpoints(GoogleEndpoints::with_base_url(&server.uri()));
    let flow = select_flow(Platform::Ios, config(), collaborators).expect("flow selected");
    let trigger = SignInTrigger::new(Arc::from(flow));

    let result = trigger.press().await.expect("press accepted").expect("sign in");

    assert_eq!(result.access_token, "ya29.access");
    assert!(result.refresh_token.is_none());
    assert_eq!(result.user.id, "123");
    assert!(trigger.error().is_none());
    assert!(!trigger.is_loading());

    let requests = server.received_requests().await.expect("recording enabled");
    let body = String::from_utf8_lossy(&requests[0].body).into_owned();
    assert!(body.contains("client_secret=GOCSPX-secret"));
}

#[tokio::test]
async fn test_token_endpoint_error_surfaces_as_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Bad Request"
        })))
        .mount(&server)
        .await;

    let collaborators = FlowCollaborators::default()
        .with_browser(Arc::new(MockBrowserSession::approving("xyz")))
        .with_endpoints(GoogleEndpoints::with_base_url(&server.uri()));
    let flow = select_flow(Platform::Ios, config(), collaborators).expect("flow selected");
    let trigger = SignInTrigger::new(Arc::from(flow));

    let err = trigger.press().await.expect("press accepted").expect_err("exchange rejected");

    assert!(matches!(err, AuthError::Provider(_)));
    assert!(trigger.error().expect("error recorded").contains("invalid_grant"));
}

#[tokio::test]
async fn test_web_trigger_signs_in() {
    let payload =
        r#"{"sub":"123","name":"Ana","email":"a@x.com","picture":"http://img.example/ana.png"}"#;
    let credential = format!("eyJhbGciOiJSUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload));
    let script = MockIdentityScript::ready().respond_on_initialize(&credential);

    let collaborators = FlowCollaborators::default()
        .with_identity_script(Arc::new(script.clone()))
        .with_page_origin("https://app.butterfly.example");
    let flow = select_flow(Platform::Web, config(), collaborators).expect("flow selected");
    let trigger = SignInTrigger::new(Arc::from(flow));

    let result = trigger.press().await.expect("press accepted").expect("sign in");

    assert_eq!(result.platform, Platform::Web);
    assert_eq!(result.user.name.as_deref(), Some("Ana"));
    assert_eq!(
        script.initialized_with().map(|c| c.client_id),
        Some("web.apps.googleusercontent.com".to_string())
    );
}
