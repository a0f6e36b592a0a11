//! Matching API HTTP client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use tracing::{debug, warn};

use super::dto::{ErrorResponse, PageResponse};
use crate::domain::entities::{Person, PersonId};
use crate::domain::errors::ApiError;
use crate::domain::ports::PeoplePort;

/// Default API base, matching the development server.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

const USER_AGENT: &str = concat!("emberdeck/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Pass-through HTTP client for the matching service.
///
/// No retry, caching, or offline semantics; every call is one request.
pub struct MatchApiClient {
    client: Client,
    base_url: String,
}

impl MatchApiClient {
    /// Creates new client with the default base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Creates client with a custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::unexpected(format!("failed to create HTTP client: {e}")))?;

        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_request_error(e: &reqwest::Error) -> ApiError {
        warn!(error = %e, "Request to matching API failed");
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::network("failed to connect to the matching API")
        } else {
            ApiError::network(e.to_string())
        }
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> ApiError {
        let error_message = match response.json::<ErrorResponse>().await {
            Ok(error) => error.message,
            Err(_) => format!("HTTP {status}"),
        };

        match status {
            StatusCode::NOT_FOUND => ApiError::not_found(error_message),
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited {
                retry_after_ms: 5000,
            },
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                ApiError::unavailable(error_message)
            }
            _ => ApiError::unexpected(format!("unexpected response: {status} - {error_message}")),
        }
    }

    async fn fetch_people(&self, url: String) -> Result<Vec<Person>, ApiError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::map_request_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, response).await);
        }

        let page: PageResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse people response");
            ApiError::invalid_response(format!("failed to parse response: {e}"))
        })?;

        Ok(page
            .data
            .into_iter()
            .map(|p| Person::new(p.id, p.name, p.age, p.location).with_pictures(p.pictures))
            .collect())
    }

    async fn post_decision(&self, person_id: PersonId, action: &str) -> Result<(), ApiError> {
        let url = format!("{}/people/{}/{}", self.base_url, person_id.as_u64(), action);

        debug!(person_id = %person_id, action, "Posting swipe decision");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| Self::map_request_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, response).await);
        }

        Ok(())
    }
}

#[async_trait]
impl PeoplePort for MatchApiClient {
    async fn fetch_recommended(&self, per_page: u8) -> Result<Vec<Person>, ApiError> {
        let url = format!(
            "{}/people/recommended?per_page={per_page}",
            self.base_url
        );

        debug!(per_page, "Fetching recommended people");
        self.fetch_people(url).await
    }

    async fn like(&self, person_id: PersonId) -> Result<(), ApiError> {
        self.post_decision(person_id, "like").await
    }

    async fn dislike(&self, person_id: PersonId) -> Result<(), ApiError> {
        self.post_decision(person_id, "dislike").await
    }

    async fn fetch_liked(&self) -> Result<Vec<Person>, ApiError> {
        let url = format!("{}/people/liked", self.base_url);

        debug!("Fetching liked people");
        self.fetch_people(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_BODY: &str = r#"{
        "data": [
            {"id": 1, "name": "Maya", "age": 27, "location": "Berlin",
             "pictures": ["https://example.com/a.jpg"]}
        ]
    }"#;

    #[test]
    fn test_client_creation() {
        let client = MatchApiClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = MatchApiClient::with_base_url("http://localhost:8000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[tokio::test]
    async fn test_fetch_recommended_parses_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/people/recommended")
            .match_query(mockito::Matcher::UrlEncoded(
                "per_page".into(),
                "10".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PAGE_BODY)
            .create_async()
            .await;

        let client = MatchApiClient::with_base_url(server.url()).unwrap();
        let people = client.fetch_recommended(10).await.unwrap();

        mock.assert_async().await;
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].name(), "Maya");
        assert_eq!(people[0].primary_picture(), Some("https://example.com/a.jpg"));
    }

    #[tokio::test]
    async fn test_like_posts_to_like_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/people/7/like")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = MatchApiClient::with_base_url(server.url()).unwrap();
        client.like(PersonId(7)).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_dislike_posts_to_dislike_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/people/9/dislike")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = MatchApiClient::with_base_url(server.url()).unwrap();
        client.dislike(PersonId(9)).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_liked_uses_liked_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/people/liked")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PAGE_BODY)
            .create_async()
            .await;

        let client = MatchApiClient::with_base_url(server.url()).unwrap();
        let people = client.fetch_liked().await.unwrap();

        mock.assert_async().await;
        assert_eq!(people.len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/people/404/like")
            .with_status(404)
            .with_body(r#"{"message": "person not found"}"#)
            .create_async()
            .await;

        let client = MatchApiClient::with_base_url(server.url()).unwrap();
        let result = client.like(PersonId(404)).await;

        assert!(matches!(result, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/people/liked")
            .with_status(429)
            .create_async()
            .await;

        let client = MatchApiClient::with_base_url(server.url()).unwrap();
        let result = client.fetch_liked().await;

        assert!(matches!(result, Err(ApiError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_service_unavailable_maps_to_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/people/recommended")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = MatchApiClient::with_base_url(server.url()).unwrap();
        let result = client.fetch_recommended(10).await;

        assert!(matches!(result, Err(ApiError::ServiceUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/people/liked")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = MatchApiClient::with_base_url(server.url()).unwrap();
        let result = client.fetch_liked().await;

        assert!(matches!(result, Err(ApiError::InvalidResponse { .. })));
    }
}
