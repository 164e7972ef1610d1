use crate::api::models::{Asset, MapDocument, ParentsListResponse, Project, ProjectsListResponse};
use crate::core::services::traits::AssetService;
use crate::core::services::types::{AssetKind, ParentsPage, PublishedVersion};
use crate::error::ApiError;
use crate::utils::error_helpers::*;
use crate::utils::retry::{RetryConfig, RetryExecutor};
use crate::{map_api_error, map_json_error};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/mapsengine/v1";
const USER_AGENT: &str = concat!("gme-cli/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct MapsEngineClient {
    client: Client,
    pub base_url: String,
    pub access_token: Option<String>,
    retry: RetryExecutor,
}

/// Human readable form of a request path, used in logs and error context.
fn endpoint_label(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

impl MapsEngineClient {
    // Create base client with default settings
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init"))?;

        Ok(MapsEngineClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
            retry: RetryExecutor::default(),
        })
    }

    pub fn with_access_token(base_url: String, access_token: String) -> Result<Self, ApiError> {
        let mut client = MapsEngineClient::new(base_url)?;
        client.access_token = Some(access_token);
        Ok(client)
    }

    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry = RetryExecutor::new(config);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Append `segments` to the base URL, one path segment each.
    ///
    /// Every segment is percent-encoded on its own, so `/`, `?` and `%`
    /// inside an asset id never leave that id's segment. Empty and dot
    /// segments are refused since they would address a different resource.
    pub fn endpoint_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let endpoint = endpoint_label(segments);

        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(convert_url_error(
                &endpoint,
                format!("'{}' is not a usable path segment", bad),
            ));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| convert_url_error(&endpoint, format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| convert_url_error(&endpoint, "base URL cannot have a path"))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    pub fn build_request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint_url(segments)?;
        let mut request = self.client.request(method, url);

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        Ok(request)
    }

    /// Send a request and turn every non-2xx answer into an [`ApiError`].
    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, ApiError> {
        log::debug!("-> {}", endpoint);
        let response = map_api_error!(request.send().await, endpoint)?;
        let status = response.status();
        log::debug!("<- {} {}", status.as_u16(), endpoint);

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(convert_status_error(status.as_u16(), endpoint, body))
    }

    pub async fn handle_response<T>(response: Response, endpoint: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        map_json_error!(response.json::<T>().await, endpoint)
    }

    async fn get_json<T>(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let endpoint = endpoint_label(segments);
        let request = self.build_request(Method::GET, segments)?.query(query);
        let response = self.send(request, &endpoint).await?;
        Self::handle_response(response, &endpoint).await
    }

    // Deletes answer 204 with an empty body
    async fn post_delete(&self, kind: AssetKind, id: &str) -> Result<(), ApiError> {
        let segments = [kind.collection(), id, "delete"];
        let endpoint = endpoint_label(&segments);
        let attempts = AtomicU32::new(0);
        let (segments, endpoint, attempts) = (&segments[..], endpoint.as_str(), &attempts);

        self.retry
            .execute(move || async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                let request = self.build_request(Method::POST, segments)?;
                match self.send(request, endpoint).await {
                    Ok(_) => Ok(()),
                    // An earlier attempt reached the server even though its answer was lost.
                    Err(e) if attempt > 1 && e.is_not_found() => {
                        log::debug!("{} already deleted (attempt {})", endpoint, attempt);
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            })
            .await
    }

    /// List the projects visible to the current token.
    /// Used to check that the URL and token work together.
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let response: ProjectsListResponse = self
            .retry
            .execute(|| self.get_json(&["projects"], &[]))
            .await?;
        Ok(response.projects)
    }
}

#[async_trait]
impl AssetService for MapsEngineClient {
    async fn get_asset(&self, id: &str) -> Result<Asset, ApiError> {
        let segments = ["assets", id];
        let segments = &segments[..];
        self.retry.execute(move || self.get_json(segments, &[])).await
    }

    async fn list_parents(
        &self,
        kind: AssetKind,
        child_id: &str,
        page_token: Option<&str>,
    ) -> Result<ParentsPage, ApiError> {
        let segments = [kind.collection(), child_id, "parents"];
        let query: Vec<(&str, &str)> = page_token
            .filter(|t| !t.is_empty())
            .map(|t| vec![("pageToken", t)])
            .unwrap_or_default();

        let (segments, query) = (&segments[..], query.as_slice());
        let response: ParentsListResponse = self
            .retry
            .execute(move || self.get_json(segments, query))
            .await?;

        Ok(ParentsPage {
            parent_ids: response.parents.into_iter().map(|p| p.id).collect(),
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn get_published_version(
        &self,
        id: &str,
        kind: AssetKind,
    ) -> Result<PublishedVersion, ApiError> {
        let segments = [kind.collection(), id];
        let endpoint = endpoint_label(&segments);
        let (segments, endpoint) = (&segments[..], endpoint.as_str());
        let result = self
            .retry
            .execute(move || async move {
                let request = self
                    .build_request(Method::GET, segments)?
                    .query(&[("version", "published")]);
                self.send(request, endpoint).await.map(|_| ())
            })
            .await;

        match result {
            Ok(()) => Ok(PublishedVersion::Published),
            Err(e) if e.is_not_found() => Ok(PublishedVersion::NotPublished),
            Err(e) => Err(e),
        }
    }

    async fn get_map_content(&self, map_id: &str) -> Result<MapDocument, ApiError> {
        let segments = ["maps", map_id];
        let segments = &segments[..];
        self.retry.execute(move || self.get_json(segments, &[])).await
    }

    async fn delete_layer(&self, id: &str) -> Result<(), ApiError> {
        self.post_delete(AssetKind::Layer, id).await
    }

    async fn delete_map(&self, id: &str) -> Result<(), ApiError> {
        self.post_delete(AssetKind::Map, id).await
    }

    async fn delete_table(&self, id: &str) -> Result<(), ApiError> {
        self.post_delete(AssetKind::Table, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MapsEngineClient::new("http://example.test".to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn test_not_authenticated_without_token() {
        let client = MapsEngineClient::new("http://example.test".to_string())
            .expect("client creation failed");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_with_access_token() {
        let client = MapsEngineClient::with_access_token(
            "http://example.test".to_string(),
            "token".to_string(),
        );
        assert!(client.is_ok());
        if let Ok(client) = client {
            assert!(client.is_authenticated());
            assert_eq!(Some("token".to_string()), client.access_token);
        }
    }

    #[test]
    fn test_build_request_without_auth() {
        let client = MapsEngineClient::new("http://example.test".to_string())
            .expect("client creation failed");
        let request = client
            .build_request(Method::GET, &["assets", "T1"])
            .expect("Failed to build request");

        let built_request = request.build().expect("Failed to build request");

        assert_eq!(built_request.url().as_str(), "http://example.test/assets/T1");
        assert_eq!(built_request.method(), Method::GET);
        assert!(built_request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_build_request_with_bearer_token() {
        let client = MapsEngineClient::with_access_token(
            "http://example.test".to_string(),
            "ya29.token".to_string(),
        )
        .expect("client creation failed");

        let request = client
            .build_request(Method::POST, &["tables", "T1", "delete"])
            .expect("Failed to build request");
        let built_request = request.build().expect("Failed to build request");

        assert_eq!(
            built_request
                .headers()
                .get("authorization")
                .unwrap()
                .to_str()
                .unwrap(),
            "Bearer ya29.token"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let client = MapsEngineClient::new(DEFAULT_BASE_URL.to_string())
            .expect("client creation failed");
        let url = client
            .endpoint_url(&["tables", "T1", "parents"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/mapsengine/v1/tables/T1/parents"
        );
    }

    #[test]
    fn test_endpoint_url_encodes_id_within_its_segment() {
        let client = MapsEngineClient::new("http://example.test".to_string())
            .expect("client creation failed");
        let url = client
            .endpoint_url(&["layers", "L1/../../tables/OTHER?x=1#y", "delete"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://example.test/layers/L1%2F..%2F..%2Ftables%2FOTHER%3Fx=1%23y/delete"
        );
        assert!(url.query().is_none());
    }

    #[test]
    fn test_endpoint_url_rejects_dot_and_empty_segments() {
        let client = MapsEngineClient::new("http://example.test".to_string())
            .expect("client creation failed");
        for id in ["", ".", ".."] {
            let err = client
                .endpoint_url(&["maps", id, "delete"])
                .expect_err("segment should be refused");
            assert!(matches!(err, ApiError::InvalidUrl { .. }));
        }
    }

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let client = MapsEngineClient::new("http://example.test/".to_string())
            .expect("client creation failed");
        assert_eq!(client.base_url, "http://example.test");
    }

    #[test]
    fn test_with_retry_config() {
        let client = MapsEngineClient::new("http://example.test".to_string())
            .expect("client creation failed")
            .with_retry_config(RetryConfig::none());
        assert_eq!(client.retry.config().max_retries, 1);
    }
}
