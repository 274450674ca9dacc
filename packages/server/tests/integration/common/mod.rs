use std::net::SocketAddr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;
use tokio::sync::OnceCell;

use study_hub::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, RuntimeEnv, ServerConfig,
};
use study_hub::database::{self, Collections};
use study_hub::state::AppState;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

/// MongoDB container shared across all tests in this binary.
static SHARED_MONGO: OnceCell<(ContainerAsync<Mongo>, u16)> = OnceCell::const_new();

/// Monotonic counter for unique database names.
static DB_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Container ID for atexit cleanup.
static CONTAINER_ID: OnceLock<String> = OnceLock::new();

extern "C" fn cleanup_container() {
    if let Some(id) = CONTAINER_ID.get() {
        let _ = std::process::Command::new("docker")
            .args(["rm", "-f", "-v", id])
            .output();
    }
}

/// Start (or reuse) the shared MongoDB container and return the host port.
async fn shared_mongo_port() -> u16 {
    let (_, port) = SHARED_MONGO
        .get_or_init(|| async {
            let container = Mongo::default()
                .start()
                .await
                .expect("Failed to start MongoDB container");
            let port = container
                .get_host_port_ipv4(27017)
                .await
                .expect("Failed to get MongoDB port");

            let _ = CONTAINER_ID.set(container.id().to_string());

            // The `watchdog` feature handles signal-based
            // cleanup (Ctrl+C), but normal process exit doesn't trigger `Drop` on statics.
            unsafe { libc::atexit(cleanup_container) };

            (container, port)
        })
        .await;
    *port
}

pub mod routes {
    pub const ROOT: &str = "/";
    pub const JWT: &str = "/jwt";
    pub const LOGOUT: &str = "/logout";
    pub const ASSIGNMENTS: &str = "/assignments";
    pub const ASSIGNMENT: &str = "/assignment";
    pub const REVIEWS: &str = "/reviews";
    pub const SUBMITTED_ASSIGNMENT: &str = "/submitted-assignment";

    pub fn assignment(id: &str) -> String {
        format!("/assignment/{id}")
    }

    pub fn assignments_filtered(level: &str) -> String {
        format!("/assignments?filter={level}")
    }

    pub fn update(id: &str) -> String {
        format!("/update/{id}")
    }

    pub fn my_submission(email: &str) -> String {
        format!("/my-submission/{email}")
    }

    pub fn pending_submission(status: &str) -> String {
        format!("/pending-submission/{status}")
    }

    pub fn assignment_result(id: &str) -> String {
        format!("/assignment-result/{id}")
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub collections: Collections,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    /// Every `Set-Cookie` header, verbatim.
    pub set_cookies: Vec<String>,
}

pub fn test_config(db_uri: String, db_name: String) -> AppConfig {
    AppConfig {
        environment: RuntimeEnv::Development,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec!["http://localhost:5173".to_string()],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            uri: db_uri,
            user: None,
            password: None,
            name: db_name,
            app_name: "study-hub-tests".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            token_ttl_days: 365,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let port = shared_mongo_port().await;
        let db_name = format!("test_{}", DB_COUNTER.fetch_add(1, Ordering::Relaxed));

        let app_config = test_config(format!("mongodb://127.0.0.1:{port}"), db_name);
        let db = database::init_db(&app_config.database)
            .await
            .expect("Failed to build database client");

        let state = AppState::new(&db, app_config);
        let collections = state.collections.clone();

        let app = study_hub::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            collections,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn send(&self, req: RequestBuilder, token: Option<&str>) -> TestResponse {
        let req = match token {
            Some(token) => req.header("Cookie", format!("token={token}")),
            None => req,
        };
        let res = req.send().await.expect("Failed to send request");
        TestResponse::from_response(res).await
    }

    pub async fn get_without_cookie(&self, path: &str) -> TestResponse {
        self.send(self.client.get(self.url(path)), None).await
    }

    pub async fn get_with_cookie(&self, path: &str, token: &str) -> TestResponse {
        self.send(self.client.get(self.url(path)), Some(token)).await
    }

    pub async fn post_without_cookie(&self, path: &str, body: &Value) -> TestResponse {
        self.send(self.client.post(self.url(path)).json(body), None)
            .await
    }

    pub async fn post_with_cookie(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        self.send(self.client.post(self.url(path)).json(body), Some(token))
            .await
    }

    pub async fn put_without_cookie(&self, path: &str, body: &Value) -> TestResponse {
        self.send(self.client.put(self.url(path)).json(body), None)
            .await
    }

    pub async fn put_with_cookie(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        self.send(self.client.put(self.url(path)).json(body), Some(token))
            .await
    }

    pub async fn delete_without_cookie(&self, path: &str) -> TestResponse {
        self.send(self.client.delete(self.url(path)), None).await
    }

    pub async fn delete_with_cookie(&self, path: &str, token: &str) -> TestResponse {
        self.send(self.client.delete(self.url(path)), Some(token))
            .await
    }

    /// Issue a session for `email` and return the raw token from the cookie.
    pub async fn login(&self, email: &str) -> String {
        let res = self
            .post_without_cookie(routes::JWT, &serde_json::json!({ "email": email }))
            .await;
        assert_eq!(res.status, 200, "Issuing token failed: {}", res.text);

        res.cookie("token")
            .expect("Response should set the token cookie")
    }

    /// Create an assignment via the API and return its id.
    pub async fn create_assignment(&self, token: &str, body: &Value) -> String {
        let res = self.post_with_cookie(routes::ASSIGNMENT, body, token).await;
        assert_eq!(res.status, 200, "create_assignment failed: {}", res.text);
        res.inserted_id()
    }

    /// Create a submission via the API and return its id.
    pub async fn create_submission(&self, token: &str, body: &Value) -> String {
        let res = self
            .post_with_cookie(routes::SUBMITTED_ASSIGNMENT, body, token)
            .await;
        assert_eq!(res.status, 200, "create_submission failed: {}", res.text);
        res.inserted_id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let set_cookies = res
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_owned)
            .collect();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            set_cookies,
        }
    }

    /// Value of the named cookie set by this response, if any.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookie_header(name).map(|header| {
            header
                .split(';')
                .next()
                .and_then(|pair| pair.split_once('='))
                .map(|(_, value)| value.to_string())
                .unwrap_or_default()
        })
    }

    /// Full `Set-Cookie` header for the named cookie, if any.
    pub fn set_cookie_header(&self, name: &str) -> Option<&str> {
        let prefix = format!("{name}=");
        self.set_cookies
            .iter()
            .map(String::as_str)
            .find(|h| h.starts_with(&prefix))
    }

    pub fn inserted_id(&self) -> String {
        self.body["insertedId"]
            .as_str()
            .expect("response body should contain 'insertedId'")
            .to_string()
    }
}
