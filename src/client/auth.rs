//! Authentication endpoints

use serde::Serialize;
use serde_json::Value;

use super::error::ClientResult;
use super::models::{AuthCheck, AuthResponse, CurrentUser};
use super::request::RequestOptions;
use super::ApiClient;

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// `/auth/*` operations
pub struct Auth<'a> {
    client: &'a ApiClient,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.client
            .request("/auth/register", RequestOptions::post().json(request)?)
            .await
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> ClientResult<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            remember_me,
        };
        self.client
            .request("/auth/login", RequestOptions::post().json(&body)?)
            .await
    }

    /// Invalidate the server-side session.
    pub async fn logout(&self) -> ClientResult<Value> {
        self.client
            .request("/auth/logout", RequestOptions::post())
            .await
    }

    /// Current user; fails with 401 when there is no session.
    pub async fn me(&self) -> ClientResult<CurrentUser> {
        self.client.request("/auth/me", RequestOptions::get()).await
    }

    /// Whether the stored session is still valid. Never fails with 401.
    pub async fn check(&self) -> ClientResult<AuthCheck> {
        self.client
            .request("/auth/check", RequestOptions::get())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientConfig, ClientError};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(ClientConfig::new(&server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_login_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "email": "ada@example.com",
                "password": "secret1",
                "rememberMe": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Login successful",
                "user": {"id": 1, "email": "ada@example.com", "first_name": "Ada", "last_name": "Lovelace"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .auth()
            .login("ada@example.com", "secret1", true)
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.user.unwrap().first_name, "Ada");
    }

    #[tokio::test]
    async fn test_login_rejection_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "error": "Invalid password. Please try again."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .auth()
            .login("ada@example.com", "wrong", false)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Invalid password. Please try again.");
    }

    #[tokio::test]
    async fn test_register_uses_camel_case_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .and(body_json(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "secret1"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "user": {"id": 2, "email": "ada@example.com", "first_name": "Ada", "last_name": "Lovelace"}
            })))
            .mount(&server)
            .await;

        let request = RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
        };
        let response = client_for(&server).auth().register(&request).await.unwrap();
        assert_eq!(response.user.unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_check_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"authenticated": false})))
            .mount(&server)
            .await;

        let check = client_for(&server).auth().check().await.unwrap();
        assert!(!check.authenticated);
        assert!(check.user.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Reserve a port, then free it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = ApiClient::new(ClientConfig::new(&format!("http://{addr}"))).unwrap();

        let err = client.auth().logout().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(
            err.user_message(),
            "Cannot connect to server. Please make sure the backend is running."
        );
    }
}
