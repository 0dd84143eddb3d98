//! Mock admin endpoint served by axum on an ephemeral local port.

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const SESSION_COOKIE: &str = "VW_ADMIN=mock-session";

/// How the mock responds.
#[derive(Debug, Clone)]
pub struct MockBehavior {
    /// Token accepted by `POST /admin`.
    pub admin_token: String,
    /// Status returned for a wrong token.
    pub login_reject_status: StatusCode,
    /// Status returned by `POST /admin/config/sso`.
    pub apply_status: StatusCode,
    /// Return a different SSO URL on read-back than was stored.
    pub tamper_read_back: bool,
    /// Time each SSO settings request takes to answer.
    pub sso_delay: Duration,
    /// Status returned by `GET /admin/logout`.
    pub logout_status: StatusCode,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            admin_token: "correct-admin-token".to_string(),
            login_reject_status: StatusCode::FORBIDDEN,
            apply_status: StatusCode::OK,
            tamper_read_back: false,
            sso_delay: Duration::ZERO,
            logout_status: StatusCode::OK,
        }
    }
}

#[derive(Debug, Default)]
struct Recorded {
    requests: Vec<String>,
    stored: Option<Value>,
    in_flight: usize,
    max_in_flight: usize,
}

#[derive(Clone)]
struct MockState {
    behavior: MockBehavior,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockState {
    fn record(&self, request: &str) {
        self.recorded.lock().unwrap().requests.push(request.to_string());
    }

    /// Hold the request open for the configured delay, tracking overlap.
    async fn linger(&self) {
        {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.in_flight += 1;
            recorded.max_in_flight = recorded.max_in_flight.max(recorded.in_flight);
        }
        tokio::time::sleep(self.behavior.sso_delay).await;
        self.recorded.lock().unwrap().in_flight -= 1;
    }
}

/// Handle to a running mock server.
pub struct MockAdmin {
    pub base_url: Url,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockAdmin {
    pub async fn start() -> Self {
        Self::start_with(MockBehavior::default()).await
    }

    pub async fn start_with(behavior: MockBehavior) -> Self {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let state = MockState {
            behavior,
            recorded: recorded.clone(),
        };

        let app = Router::new()
            .route("/admin", post(login))
            .route("/admin/config/sso", post(apply_sso).get(read_sso))
            .route("/admin/logout", get(logout))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{}", addr)).unwrap(),
            recorded,
        }
    }

    /// Requests received so far, as `"METHOD /path"`.
    pub fn requests(&self) -> Vec<String> {
        self.recorded.lock().unwrap().requests.clone()
    }

    /// Most SSO settings requests the mock was handling at once.
    pub fn max_in_flight(&self) -> usize {
        self.recorded.lock().unwrap().max_in_flight
    }

    /// The SSO settings body last accepted by the mock.
    pub fn stored_settings(&self) -> Option<Value> {
        self.recorded.lock().unwrap().stored.clone()
    }
}

#[derive(Deserialize)]
struct LoginForm {
    token: String,
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(';').any(|c| c.trim() == SESSION_COOKIE))
}

async fn login(State(state): State<MockState>, Form(form): Form<LoginForm>) -> Response {
    state.record("POST /admin");
    if form.token != state.behavior.admin_token {
        return state.behavior.login_reject_status.into_response();
    }
    (
        StatusCode::OK,
        [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
        "logged in",
    )
        .into_response()
}

async fn apply_sso(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST /admin/config/sso");
    state.linger().await;
    if !has_session(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if !state.behavior.apply_status.is_success() {
        return (state.behavior.apply_status, "organization plan does not allow SSO")
            .into_response();
    }
    state.recorded.lock().unwrap().stored = Some(body);
    StatusCode::OK.into_response()
}

async fn read_sso(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.record("GET /admin/config/sso");
    state.linger().await;
    if !has_session(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let stored = state.recorded.lock().unwrap().stored.clone();
    match stored {
        Some(mut body) => {
            if state.behavior.tamper_read_back {
                body["saml"]["idpSsoUrl"] = Value::from("https://attacker.example.com/saml2");
            }
            Json(body).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn logout(State(state): State<MockState>) -> StatusCode {
    state.record("GET /admin/logout");
    state.behavior.logout_status
}
