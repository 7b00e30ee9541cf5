use super::endpoints::{Resource, LOCATION_SEARCH_PATH};
use super::envelope::{decode_envelope, decode_page, PageEnvelope};
use super::raw::{Location, RawFeedItem};
use crate::query::QueryState;
use crate::util::{single_line, strip_control_chars};
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Fallback text shown when a failure carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Could not load results. Please try again.";

/// Errors from a single request to the platform API.
///
/// Every variant is terminal for the request that produced it. Nothing here
/// retries; the view decides what to show.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[source] reqwest::Error),
    /// The transport gave up waiting for a response
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not the JSON shape we expect
    #[error("Invalid response: {0}")]
    Decode(String),
    /// The server answered with `succeeded: false`
    #[error("Request rejected{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Application {
        code: Option<String>,
        message: Option<String>,
    },
    /// The configured base URL or an endpoint path could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e)
        }
    }
}

impl FetchError {
    /// Text for the inline error affordance.
    ///
    /// Server-provided messages are shown as sent, minus control sequences
    /// and line breaks; everything else gets the generic fallback.
    pub fn user_message(&self) -> String {
        if let FetchError::Application {
            message: Some(message),
            ..
        } = self
        {
            let message = single_line(&strip_control_chars(message));
            if !message.is_empty() {
                return message;
            }
        }
        GENERIC_ERROR_MESSAGE.to_string()
    }
}

/// Client for the platform's listing endpoints.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiClient {
    /// Build a client with its own connection pool.
    ///
    /// `timeout` is applied at the transport level to every request.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        token: Option<SecretString>,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(timeout)
            .build()?;
        Self::with_http_client(http, base_url, token)
    }

    /// Use an existing `reqwest::Client`.
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        token: Option<SecretString>,
    ) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch one page of `resource` for the given query.
    ///
    /// Issues exactly one GET. An envelope with `succeeded: false` is returned
    /// as `Ok`; use [`PageEnvelope::into_checked`] to treat it as an error.
    pub async fn fetch_page(
        &self,
        resource: Resource,
        query: &QueryState,
    ) -> Result<PageEnvelope<RawFeedItem>, FetchError> {
        let params = query.to_params(resource.category_sentinel());
        let url = self.endpoint_url(resource.path(), &params)?;
        tracing::debug!(
            resource = resource.name(),
            page = query.page_number(),
            url = %url,
            "Fetching page"
        );

        let bytes = self.get_bytes(url).await?;
        let envelope = decode_page(&bytes, query)?;
        tracing::debug!(
            resource = resource.name(),
            items = envelope.items.len(),
            total = envelope.total_count,
            succeeded = envelope.succeeded,
            "Page received"
        );
        Ok(envelope)
    }

    /// Location typeahead.
    ///
    /// Accepts either a bare JSON array or a paged envelope.
    pub async fn search_locations(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Location>, FetchError> {
        let params = [("Query", query.to_string()), ("Limit", limit.to_string())];
        let url = self.endpoint_url(LOCATION_SEARCH_PATH, &params)?;
        tracing::debug!(query, limit, "Searching locations");

        let bytes = self.get_bytes(url).await?;
        if let Ok(locations) = serde_json::from_slice::<Vec<Location>>(&bytes) {
            return Ok(locations);
        }
        let envelope = decode_envelope::<Location>(&bytes, &QueryState::new(limit, None))?
            .into_checked()?;
        Ok(envelope.items)
    }

    fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, FetchError> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let mut request = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Request failed with HTTP status");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        read_limited_bytes(response, MAX_RESPONSE_SIZE).await
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Filter;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5), None).unwrap()
    }

    fn page_body(n: usize) -> serde_json::Value {
        let items: Vec<_> = (0..n)
            .map(|i| json!({ "id": i, "title": format!("Item {i}") }))
            .collect();
        json!({ "succeeded": true, "data": items, "page": 1, "pageSize": 12, "totalCount": n, "totalPages": 1 })
    }

    #[tokio::test]
    async fn sends_only_present_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/housing"))
            .and(query_param("Page", "1"))
            .and(query_param("PageSize", "12"))
            .and(query_param("Category", "4"))
            .and(query_param_is_missing("LocationId"))
            .and(query_param_is_missing("Search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(2)))
            .expect(1)
            .mount(&server)
            .await;

        let query = QueryState::new(12, Some(4));
        let env = client_for(&server)
            .fetch_page(Resource::Housing, &query)
            .await
            .unwrap();
        assert_eq!(env.items.len(), 2);
    }

    #[tokio::test]
    async fn posts_endpoint_sends_category_sentinel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .and(query_param("Category", "0"))
            .and(query_param("Search", "garden"))
            .and(query_param("LocationId", "17"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0)))
            .expect(1)
            .mount(&server)
            .await;

        let mut query = QueryState::new(12, None);
        query.set_filter(Filter::Search("garden".into()));
        query.set_filter(Filter::Location(Some(17)));
        client_for(&server)
            .fetch_page(Resource::Posts, &query)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_page(Resource::Jobs, &QueryState::default())
            .await
            .unwrap_err();
        match err {
            FetchError::HttpStatus(503) => {}
            e => panic!("Expected HttpStatus(503), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn attaches_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1)))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(
            &server.uri(),
            Duration::from_secs(5),
            Some(SecretString::from("s3cret".to_string())),
        )
        .unwrap();
        client
            .fetch_page(Resource::Events, &QueryState::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn base_url_with_path_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/api/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1)))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(
            &format!("{}/v2", server.uri()),
            Duration::from_secs(5),
            None,
        )
        .unwrap();
        client
            .fetch_page(Resource::Jobs, &QueryState::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_page(Resource::Posts, &QueryState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn locations_from_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations/search"))
            .and(query_param("Query", "park"))
            .and(query_param("Limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "borough": "Brooklyn", "neighborhood": "Park Slope", "zipCode": "11215" },
                { "Id": 2, "Borough": "Queens", "Neighborhood": "Forest Park", "ZipCode": "11421" }
            ])))
            .mount(&server)
            .await;

        let locations = client_for(&server)
            .search_locations("park", 5)
            .await
            .unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[1].neighborhood, "Forest Park");
    }

    #[tokio::test]
    async fn locations_from_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Succeeded": true,
                "Data": [{ "Id": 4, "Borough": "Bronx", "Neighborhood": "Mott Haven", "ZipCode": "10454" }]
            })))
            .mount(&server)
            .await;

        let locations = client_for(&server)
            .search_locations("mott", 10)
            .await
            .unwrap();
        assert_eq!(locations[0].id, 4);
    }

    #[test]
    fn user_message_prefers_server_text() {
        let e = FetchError::Application {
            code: None,
            message: Some("Listing expired".into()),
        };
        assert_eq!(e.user_message(), "Listing expired");

        let blank = FetchError::Application {
            code: Some("X".into()),
            message: Some("  ".into()),
        };
        assert_eq!(blank.user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(FetchError::Timeout.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn user_message_strips_terminal_sequences() {
        let e = FetchError::Application {
            code: None,
            message: Some("\x1b]0;pwned\x07Listing\r\nexpired\x1b[0m".into()),
        };
        assert_eq!(e.user_message(), "Listing expired");

        let only_escapes = FetchError::Application {
            code: None,
            message: Some("\x1b[2J".into()),
        };
        assert_eq!(only_escapes.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn debug_masks_token() {
        let client = ApiClient::new(
            "https://api.example.org",
            Duration::from_secs(5),
            Some(SecretString::from("hunter2".to_string())),
        )
        .unwrap();
        let out = format!("{:?}", client);
        assert!(!out.contains("hunter2"));
        assert!(out.contains("[REDACTED]"));
    }
}
