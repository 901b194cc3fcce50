use std::time::Duration;

use curator_core::{Curation, FailureKind, FetchError, LinkPreview, Page, Profile};
use curator_logging::{curator_debug, curator_warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::envelope::{decode_envelope, envelope_message, SuccessPolicy, SUCCESS_CODE};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub page_size: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Application codes accepted from member and curation endpoints.
    pub success_codes: Vec<String>,
    /// Sent as `Authorization: Bearer <key>` when present.
    pub api_key: Option<String>,
    pub max_concurrent_previews: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            page_size: curator_core::DEFAULT_PAGE_SIZE,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            success_codes: vec![SUCCESS_CODE.to_string()],
            api_key: None,
            max_concurrent_previews: 8,
        }
    }
}

/// Read side of the backend the feed controller depends on.
#[async_trait::async_trait]
pub trait CurationApi: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, FetchError>;

    /// Member behind the configured api key.
    async fn fetch_current_member(&self) -> Result<Profile, FetchError>;

    async fn fetch_curation_page(
        &self,
        author: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Curation>, FetchError>;

    async fn fetch_link_preview(&self, url: &str) -> Result<LinkPreview, FetchError>;
}

#[derive(Debug, Deserialize)]
struct PageBody<T> {
    content: Vec<T>,
    last: bool,
}

#[derive(Debug, Serialize)]
struct PreviewBody<'a> {
    url: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReqwestCurationApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestCurationApi {
    pub fn new(settings: ApiSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::transport(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.settings.base_url).map_err(|err| {
            FetchError::transport(format!("invalid base url {}: {err}", self.settings.base_url))
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                FetchError::transport(format!("base url {} cannot hold a path", self.settings.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        curator_debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match self.settings.api_key.as_deref() {
            Some(key) => builder.header(AUTHORIZATION, format!("Bearer {key}")),
            None => builder,
        }
    }

    pub(crate) fn with_json<B: Serialize + ?Sized>(
        builder: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<reqwest::RequestBuilder, FetchError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|err| FetchError::malformed(format!("cannot encode request: {err}")))?;
        Ok(builder.header(CONTENT_TYPE, "application/json").body(bytes))
    }

    /// Sends the request and returns the body of a 2xx response.
    pub(crate) async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, FetchError> {
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            let message = envelope_message(&body)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            curator_warn!("Request failed with status {}: {}", status, message);
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }
        Ok(body)
    }

    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        policy: SuccessPolicy<'_>,
    ) -> Result<T, FetchError> {
        let body = self.send(builder).await?;
        decode_envelope(&body, policy)
    }

    async fn get_exact<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let builder = self.request(Method::GET, url);
        self.execute(builder, SuccessPolicy::Exact(&self.settings.success_codes))
            .await
    }
}

#[async_trait::async_trait]
impl CurationApi for ReqwestCurationApi {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, FetchError> {
        let url = self.endpoint(&["api", "v1", "members", username])?;
        self.get_exact(url).await
    }

    async fn fetch_current_member(&self) -> Result<Profile, FetchError> {
        let url = self.endpoint(&["api", "v1", "members", "me"])?;
        self.get_exact(url).await
    }

    async fn fetch_curation_page(
        &self,
        author: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Curation>, FetchError> {
        let mut url = self.endpoint(&["api", "v1", "curations", "members", author])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("size", &size.to_string());
        let body: PageBody<Curation> = self.get_exact(url).await?;
        Ok(Page::new(page, body.content, body.last))
    }

    async fn fetch_link_preview(&self, url: &str) -> Result<LinkPreview, FetchError> {
        let endpoint = self.endpoint(&["api", "v1", "link", "preview"])?;
        let builder = Self::with_json(self.request(Method::POST, endpoint), &PreviewBody { url })?;
        self.execute(builder, SuccessPolicy::Exact(&self.settings.success_codes))
            .await
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::transport(format!("request timed out: {err}"));
    }
    FetchError::transport(err.to_string())
}
