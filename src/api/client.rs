use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, SET_COOKIE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{
    accept_loan_path, Authenticator, LendingApi, Session, ACTIVE_LOANS_PATH, LOGIN_PATH,
    MARKETPLACE_LOANS_PATH, TRANSACTIONS_PATH, USER_STATS_PATH,
};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::{Loan, LoanId, Transaction, UserStats};

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.session_token {
            let value = HeaderValue::from_str(token)
                .map_err(|e| Error::ConfigError(format!("Invalid session token: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            error!("{} {} failed: {}", method, url, e);
            Error::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(status, &text);
        warn!("{} {} returned {}", method, url, message);

        Err(match status {
            StatusCode::UNAUTHORIZED => Error::ApiAuthFailed(message),
            StatusCode::NOT_FOUND => Error::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimitExceeded(message),
            StatusCode::SERVICE_UNAVAILABLE => Error::ApiMaintenance(message),
            _ => Error::ApiError(message),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path, None).await?;
        parse_json(response).await
    }
}

/// Prefer the server's `{"message": ...}` body, falling back to the raw text.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if detail.is_empty() {
        format!("{}: {}", status.as_u16(), status.canonical_reason().unwrap_or("Unknown"))
    } else {
        format!("{}: {}", status.as_u16(), detail)
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        error!("Failed to parse response: {}", e);
        Error::ApiInvalidFormat(format!("Failed to parse response: {}", e))
    })
}

#[async_trait]
impl LendingApi for HttpApiClient {
    async fn get_user_stats(&self) -> Result<UserStats> {
        self.get_json(USER_STATS_PATH).await
    }

    async fn get_active_loans(&self) -> Result<Vec<Loan>> {
        self.get_json(ACTIVE_LOANS_PATH).await
    }

    async fn get_marketplace_loans(&self) -> Result<Vec<Loan>> {
        self.get_json(MARKETPLACE_LOANS_PATH).await
    }

    async fn get_transactions(&self) -> Result<Vec<Transaction>> {
        self.get_json(TRANSACTIONS_PATH).await
    }

    async fn accept_loan(&self, id: LoanId) -> Result<serde_json::Value> {
        let response = self
            .request(Method::POST, &accept_loan_path(id), Some(json!({})))
            .await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Authenticator for HttpApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .request(
                Method::POST,
                LOGIN_PATH,
                Some(json!({ "email": email, "password": password })),
            )
            .await?;
        // Only the name=value pair is replayed; attributes stay with the server.
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|pair| pair.trim().to_string())
            .filter(|pair| !pair.is_empty());
        Ok(Session { cookie })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoanType;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> HttpApiClient {
        HttpApiClient::new(&ApiConfig {
            base_url: format!("{}/", server.uri()),
            timeout_secs: 5,
            session_token: token.map(str::to_string),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_marketplace_loans() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/loans/marketplace"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "type": "request", "amount": 0.5, "interest": 6, "durationMonths": 6, "status": "pending", "hasCollateral": true},
                {"id": 2, "type": "offer", "amount": "1.2", "interest": 4.5, "durationMonths": 12, "status": "pending", "hasCollateral": false}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let loans = client_for(&server, None).get_marketplace_loans().await.unwrap();
        assert_eq!(loans.len(), 2);
        assert_eq!(loans[0].loan_type, LoanType::Request);
        assert_eq!(loans[1].amount, 1.2);
    }

    #[tokio::test]
    async fn test_session_cookie_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/stats"))
            .and(header("cookie", "connect.sid=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalBorrowed": 1.0, "totalLent": 2.0, "activeLoans": 1, "interestEarned": 0.1
            })))
            .mount(&server)
            .await;

        let stats = client_for(&server, Some("connect.sid=abc")).get_user_stats().await.unwrap();
        assert_eq!(stats.total_lent, 2.0);
    }

    #[tokio::test]
    async fn test_accept_loan_posts_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/loans/42/accept"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "status": "active"})))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server, None).accept_loan(42).await.unwrap();
        assert_eq!(body["status"], "active");
    }

    #[tokio::test]
    async fn test_error_status_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/loans/9/accept"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Insufficient balance"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/loans/active"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.accept_loan(9).await.unwrap_err();
        assert!(matches!(err, Error::ApiError(_)));
        assert_eq!(err.user_message(), "400: Insufficient balance");

        let err = client.get_active_loans().await.unwrap_err();
        assert!(matches!(err, Error::ApiAuthFailed(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_format() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/transactions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, None).get_transactions().await.unwrap_err();
        assert!(matches!(err, Error::ApiInvalidFormat(_)));
    }

    #[tokio::test]
    async fn test_login_returns_session_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"email": "satoshi@example.com", "password": "hunter22"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "connect.sid=s%3Aabc; Path=/; HttpOnly")
                    .set_body_json(json!({"id": 1})),
            )
            .mount(&server)
            .await;

        let session = client_for(&server, None)
            .login("satoshi@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(session.cookie.as_deref(), Some("connect.sid=s%3Aabc"));
    }

    #[test]
    fn test_error_message_without_body() {
        assert_eq!(error_message(StatusCode::SERVICE_UNAVAILABLE, ""), "503: Service Unavailable");
        assert_eq!(error_message(StatusCode::BAD_REQUEST, "plain text\n"), "400: plain text");
    }
}
