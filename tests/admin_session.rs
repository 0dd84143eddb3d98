//! Admin login and SAML application against the mock admin endpoint.

mod common;

use axum::http::StatusCode;
use common::{MockAdmin, MockBehavior, TENANT_ID, admin_client, identity_provider, token};
use std::time::Duration;
use vault_sso_config::admin::{AdminClient, OrganizationSpec, SsoSettings, TransportOptions};
use vault_sso_config::error::{AuthError, ConfigError};

#[tokio::test]
async fn test_login_and_apply_saml_settings() {
    let mock = MockAdmin::start().await;
    let client = admin_client(&mock.base_url);
    let idp = identity_provider(&mock.base_url);

    let session = client
        .login(&token("correct-admin-token"))
        .await
        .expect("login should succeed");
    let applied = session.apply_saml_config(&idp).await.unwrap();
    assert!(applied);

    let stored: SsoSettings = serde_json::from_value(mock.stored_settings().unwrap()).unwrap();
    assert!(stored.sso_enabled);
    assert_eq!(stored.saml.idp_tenant_id, TENANT_ID);
    assert_eq!(stored.saml.idp_sso_url, idp.sso_url().as_str());
    assert!(stored.organization.is_none());

    assert_eq!(
        mock.requests(),
        vec![
            "POST /admin",
            "POST /admin/config/sso",
            "GET /admin/config/sso"
        ]
    );
}

#[tokio::test]
async fn test_login_rejected_with_forbidden() {
    let mock = MockAdmin::start().await;
    let result = admin_client(&mock.base_url)
        .login(&token("wrong-token"))
        .await;

    match result {
        Err(AuthError::Rejected { status_code }) => assert_eq!(status_code, 403),
        other => panic!("Expected Rejected, got: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_login_rejected_with_unauthorized() {
    let mock = MockAdmin::start_with(MockBehavior {
        login_reject_status: StatusCode::UNAUTHORIZED,
        ..MockBehavior::default()
    })
    .await;
    let result = admin_client(&mock.base_url)
        .login(&token("wrong-token"))
        .await;

    assert!(matches!(
        result,
        Err(AuthError::Rejected { status_code: 401 })
    ));
    assert_eq!(mock.requests(), vec!["POST /admin"]);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = url::Url::parse(&format!("http://{}", addr)).unwrap();
    let result = admin_client(&base).login(&token("any")).await;
    assert!(matches!(result, Err(AuthError::Transport { .. })));
}

#[tokio::test]
async fn test_rejected_settings_carry_status_and_reason() {
    let mock = MockAdmin::start_with(MockBehavior {
        apply_status: StatusCode::BAD_REQUEST,
        ..MockBehavior::default()
    })
    .await;
    let session = admin_client(&mock.base_url)
        .login(&token("correct-admin-token"))
        .await
        .unwrap();

    let err = session
        .apply_saml_config(&identity_provider(&mock.base_url))
        .await
        .unwrap_err();
    match err {
        ConfigError::Rejected {
            status_code,
            reason,
        } => {
            assert_eq!(status_code, 400);
            assert!(reason.contains("does not allow SSO"));
        }
        other => panic!("Expected Rejected, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_tampered_read_back_fails_verification() {
    let mock = MockAdmin::start_with(MockBehavior {
        tamper_read_back: true,
        ..MockBehavior::default()
    })
    .await;
    let session = admin_client(&mock.base_url)
        .login(&token("correct-admin-token"))
        .await
        .unwrap();

    let err = session
        .apply_saml_config(&identity_provider(&mock.base_url))
        .await
        .unwrap_err();
    match err {
        ConfigError::VerificationFailed { reason } => assert!(reason.contains("idpSsoUrl")),
        other => panic!("Expected VerificationFailed, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_verification_can_be_disabled() {
    let mock = MockAdmin::start_with(MockBehavior {
        tamper_read_back: true,
        ..MockBehavior::default()
    })
    .await;
    let client = AdminClient::new(
        mock.base_url.clone(),
        TransportOptions::default().verify_after_apply(false),
    )
    .unwrap();
    let session = client.login(&token("correct-admin-token")).await.unwrap();

    let applied = session
        .apply_saml_config(&identity_provider(&mock.base_url))
        .await
        .unwrap();
    assert!(applied);
    assert!(!mock.requests().contains(&"GET /admin/config/sso".to_string()));
}

#[tokio::test]
async fn test_organization_sent_with_settings() {
    let mock = MockAdmin::start().await;
    let client = admin_client(&mock.base_url).with_organization(OrganizationSpec {
        name: "Example Org".to_string(),
        billing_email: "billing@example.com".to_string(),
        plan_type: "2".to_string(),
    });
    let session = client.login(&token("correct-admin-token")).await.unwrap();
    session
        .apply_saml_config(&identity_provider(&mock.base_url))
        .await
        .unwrap();

    let stored = mock.stored_settings().unwrap();
    assert_eq!(stored["organization"]["billingEmail"], "billing@example.com");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let mock = MockAdmin::start().await;
    let session = admin_client(&mock.base_url)
        .login(&token("correct-admin-token"))
        .await
        .unwrap();

    session.logout().await.unwrap();
    assert_eq!(mock.requests(), vec!["POST /admin", "GET /admin/logout"]);
}

#[tokio::test]
async fn test_logout_rejected_returns_status() {
    let mock = MockAdmin::start_with(MockBehavior {
        logout_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..MockBehavior::default()
    })
    .await;
    let session = admin_client(&mock.base_url)
        .login(&token("correct-admin-token"))
        .await
        .unwrap();

    let err = session.logout().await.unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Rejected {
            status_code: 500,
            ..
        }
    ));
}

#[tokio::test]
async fn test_concurrent_calls_on_one_session_are_serialized() {
    let mock = MockAdmin::start_with(MockBehavior {
        sso_delay: Duration::from_millis(100),
        ..MockBehavior::default()
    })
    .await;
    let session = admin_client(&mock.base_url)
        .login(&token("correct-admin-token"))
        .await
        .unwrap();
    let idp = identity_provider(&mock.base_url);

    let (first, second) = tokio::join!(
        session.apply_saml_config(&idp),
        session.apply_saml_config(&idp)
    );

    assert!(first.unwrap());
    assert!(second.unwrap());
    assert_eq!(mock.max_in_flight(), 1);
    assert_eq!(
        mock.requests()
            .iter()
            .filter(|r| r.as_str() == "POST /admin/config/sso")
            .count(),
        2
    );
}

#[tokio::test]
async fn test_sessions_do_not_share_cookies() {
    let mock = MockAdmin::start().await;
    let client = admin_client(&mock.base_url);

    let _session = client.login(&token("correct-admin-token")).await.unwrap();
    let second = client.login(&token("wrong-token")).await;
    assert!(matches!(
        second,
        Err(AuthError::Rejected { status_code: 403 })
    ));
}

#[test]
fn test_default_transport_validates_certificates() {
    let options = TransportOptions::default();
    assert!(!options.accepts_invalid_certs());
    assert!(options.verifies_after_apply());
}
