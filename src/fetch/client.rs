//! HTTP client for the remote users endpoint.
//!
//! A single GET returns `{ "users": [...] }`. Any failure is logged and
//! turned into an absent result at this boundary; callers never see the
//! error unless they ask for it through [`UserClient::try_fetch_users`].

use crate::analysis::aggregate;
use crate::models::{DepartmentSummaries, UserRecord, UsersResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Default users endpoint.
pub const DEFAULT_USERS_URL: &str = "https://dummyjson.com/users";

/// Why a fetch produced no data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("users endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode users response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Settings for [`UserClient`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub users_url: String,
    pub timeout_seconds: u64,
    /// Page size passed as `?limit=`; `0` leaves the server default.
    pub limit: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            users_url: DEFAULT_USERS_URL.to_string(),
            timeout_seconds: 30,
            limit: 0,
        }
    }
}

impl From<&crate::config::FetchSettings> for FetchConfig {
    fn from(settings: &crate::config::FetchSettings) -> Self {
        Self {
            users_url: settings.users_url.clone(),
            timeout_seconds: settings.timeout_seconds,
            limit: settings.limit,
        }
    }
}

/// Client for the users endpoint.
#[derive(Debug, Clone)]
pub struct UserClient {
    http_client: Client,
    config: FetchConfig,
}

impl UserClient {
    /// Create a new client.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|source| FetchError::Transport {
                url: config.users_url.clone(),
                source,
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn users_url(&self) -> &str {
        &self.config.users_url
    }

    /// Fetch users, or `None` if anything went wrong.
    pub async fn fetch_users(&self) -> Option<Vec<UserRecord>> {
        match self.try_fetch_users().await {
            Ok(users) => Some(users),
            Err(e) => {
                error!("Error fetching data: {}", e);
                None
            }
        }
    }

    /// Fetch users, surfacing the failure reason.
    pub async fn try_fetch_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        let url = &self.config.users_url;
        info!("Fetching users from {}", url);

        let mut request = self.http_client.get(url);
        if self.config.limit > 0 {
            request = request.query(&[("limit", self.config.limit)]);
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body: UsersResponse = response.json().await.map_err(FetchError::Decode)?;
        debug!("Received {} users", body.users.len());

        Ok(body.users)
    }

    /// Fetch users and aggregate them by department.
    ///
    /// The aggregator is not invoked when the fetch fails.
    #[allow(dead_code)] // The CLI fetches and aggregates separately to keep the user count
    pub async fn fetch_and_aggregate(&self) -> Option<DepartmentSummaries> {
        let users = self.fetch_users().await?;
        Some(aggregate(&users))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const USERS_BODY: &str = r#"{
        "users": [
            {
                "id": 1, "firstName": "A", "lastName": "B", "gender": "male", "age": 30,
                "hair": { "color": "black" }, "address": { "postalCode": "100" },
                "company": { "department": "Eng" }
            },
            {
                "id": 2, "firstName": "C", "lastName": "D", "gender": "female", "age": 25,
                "hair": { "color": "black" }, "address": { "postalCode": "200" },
                "company": { "department": "Eng" }
            }
        ],
        "total": 2, "skip": 0, "limit": 30
    }"#;

    fn client_for(url: String) -> UserClient {
        UserClient::new(FetchConfig {
            users_url: url,
            timeout_seconds: 5,
            limit: 0,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_users_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/users");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(USERS_BODY);
            })
            .await;

        let client = client_for(server.url("/users"));
        let users = client.fetch_users().await.unwrap();

        mock.assert_async().await;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].full_name(), "AB");
    }

    #[tokio::test]
    async fn test_fetch_and_aggregate() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users");
                then.status(200).body(USERS_BODY);
            })
            .await;

        let client = client_for(server.url("/users"));
        let summaries = client.fetch_and_aggregate().await.unwrap();

        let eng = &summaries["Eng"];
        assert_eq!((eng.male, eng.female), (1, 1));
        assert_eq!(eng.age_range, "25-30");
    }

    #[tokio::test]
    async fn test_limit_is_sent_as_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/users").query_param("limit", "0");
                then.status(200).body(r#"{"users": []}"#);
            })
            .await;

        // limit = 0 means "don't send it", so this mock must not match
        let client = client_for(server.url("/users"));
        let _ = client.fetch_users().await;
        assert_eq!(mock.hits_async().await, 0);

        let limited = server
            .mock_async(|when, then| {
                when.method(GET).path("/users").query_param("limit", "100");
                then.status(200).body(r#"{"users": []}"#);
            })
            .await;

        let client = UserClient::new(FetchConfig {
            users_url: server.url("/users"),
            timeout_seconds: 5,
            limit: 100,
        })
        .unwrap();
        let users = client.fetch_users().await.unwrap();

        limited.assert_async().await;
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_absent() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users");
                then.status(500).body("boom");
            })
            .await;

        let client = client_for(server.url("/users"));

        let err = client.try_fetch_users().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
        assert!(client.fetch_and_aggregate().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_absent() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users");
                then.status(200).body("not json");
            })
            .await;

        let client = client_for(server.url("/users"));

        let err = client.try_fetch_users().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(client.fetch_users().await.is_none());
    }

    #[tokio::test]
    async fn test_transport_error_is_absent() {
        // Nothing listens on port 9
        let client = client_for("http://127.0.0.1:9/users".to_string());

        let err = client.try_fetch_users().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert!(client.fetch_users().await.is_none());
    }
}
