pub mod report_portal_api;

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION}, Client, StatusCode, Url};
use thiserror::Error;

const APPLICATION_JSON: &str = "application/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SNIPPET_LEN: usize = 256;
pub const PROJECT_PATH_PARAM: &str = "project";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Api error {0}: {1}")]
    Api(StatusCode, String),
    #[error("Deserialization error: {source}. Payload: {snippet}")]
    Decode {
        source: serde_json::Error,
        snippet: String,
    },
    #[error("Filter with name == {0} not found")]
    FilterNotFound(String),
    #[error("URL parse error: {0}")]
    Parse(String),
    #[error("Missing value for path parameter {{{0}}}")]
    MissingPathParam(String),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("The string entered must be a URL")]
    InvalidUrl,
    #[error("Your token failed validation, please try again")]
    InvalidToken,
    #[error("The project name must not be empty")]
    EmptyProject,
    #[error("Failed to retrieve the user's directories")]
    NotFoundUserDir,
    #[error("Config not found at path: <{0}>. Run `rpq init` first")]
    ConfigNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ApiError {
    /// Status code of an error response, `None` for every other failure
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Api(status, _) => Some(*status),
            _ => None,
        }
    }
}

/// Query string attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParams {
    Pairs(BTreeMap<String, String>),
    /// Already encoded, sent as is
    Raw(String),
}

impl QueryParams {
    fn apply(&self, url: &mut Url) {
        match self {
            QueryParams::Pairs(pairs) if pairs.is_empty() => {}
            QueryParams::Pairs(pairs) => {
                url.query_pairs_mut().extend_pairs(pairs);
            }
            QueryParams::Raw(raw) => {
                let raw = raw.trim_start_matches('?');
                if !raw.is_empty() {
                    url.set_query(Some(raw));
                }
            }
        }
    }
}

impl From<BTreeMap<String, String>> for QueryParams {
    fn from(value: BTreeMap<String, String>) -> Self {
        QueryParams::Pairs(value)
    }
}

impl From<&str> for QueryParams {
    fn from(value: &str) -> Self {
        QueryParams::Raw(value.to_string())
    }
}

impl From<String> for QueryParams {
    fn from(value: String) -> Self {
        QueryParams::Raw(value)
    }
}

/// Basic api client bound to one server and one project.
///
/// Holds no per-request state, clones share the connection pool.
#[derive(Debug, Clone)]
pub struct BaseApiClient {
    client: Client,
    base_url: Url,
    project: String,
}

impl BaseApiClient {
    pub fn new(base_url: &str, project: &str, api_key: &str) -> Result<Self, ApiError> {
        let default_headers = Self::get_default_headers(api_key)?;

        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let parse_base_url = Url::parse(base_url).map_err(|e| ApiError::Parse(e.to_string()))?;
        if parse_base_url.cannot_be_a_base() {
            return Err(ApiError::Parse(format!("{base_url} cannot be a base URL")));
        }

        Ok(Self {
            client,
            base_url: parse_base_url,
            project: project.to_string(),
        })
    }

    fn get_default_headers(api_key: &str) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| ApiError::InvalidApiKey)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        Ok(headers)
    }

    /// Resolve `endpoint` like `/api/v1/{project}/launch` against the base url.
    ///
    /// `{project}` is always available, other placeholders come from
    /// `path_params`. Values are percent-encoded as single path segments.
    fn build_url(&self, endpoint: &str, path_params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::Parse(self.base_url.to_string()))?;
            segments.pop_if_empty();
            for segment in endpoint.split('/').filter(|s| !s.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = self.path_param(name, path_params)?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        Ok(url)
    }

    fn path_param<'a>(&'a self, name: &str, path_params: &[(&str, &'a str)]) -> Result<&'a str, ApiError> {
        path_params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .or_else(|| (name == PROJECT_PATH_PARAM).then_some(self.project.as_str()))
            .ok_or_else(|| ApiError::MissingPathParam(name.to_string()))
    }

    /// Check status before anything reads the body as data.
    ///
    /// The body is read as raw bytes and converted lossily: invalid UTF-8
    /// sequences become U+FFFD, charset headers are ignored.
    async fn handle_response(&self, response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        if status.as_u16() / 100 >= 4 {
            tracing::warn!(status = status.as_u16(), "error response from server");
            return Err(ApiError::Api(status, body));
        }
        Ok(body)
    }

    /// GET and return the raw body of a successful response
    pub async fn get_raw(
        &self,
        endpoint: &str,
        path_params: &[(&str, &str)],
        query: Option<&QueryParams>,
    ) -> Result<String, ApiError> {
        let mut url = self.build_url(endpoint, path_params)?;
        if let Some(query) = query {
            query.apply(&mut url);
        }
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        self.handle_response(response).await
    }

    pub async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        path_params: &[(&str, &str)],
        query: Option<&QueryParams>,
    ) -> Result<T, ApiError> {
        let body = self.get_raw(endpoint, path_params, query).await?;
        decode(&body)
    }
}

/// Parse a JSON body, keeping the head of the payload on failure
pub fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        source,
        snippet: body.chars().take(SNIPPET_LEN).collect(),
    })
}
