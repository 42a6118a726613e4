use super::Client;
use crate::Error;
use base64::Engine;
use derivative::Derivative;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::env;
use tracing::instrument;

pub const ELASTICSEARCH_URL: &str = "ELASTICSEARCH_URL";
pub const ELASTICSEARCH_USERNAME: &str = "ELASTICSEARCH_USERNAME";
pub const ELASTICSEARCH_PASSWORD: &str = "ELASTICSEARCH_PASSWORD";
pub const ELASTICSEARCH_API_KEY: &str = "ELASTICSEARCH_API_KEY";
pub const JSON_CONTENT_TYPE: HeaderValue = HeaderValue::from_static("application/json");

#[derive(Derivative)]
#[derivative(Debug)]
pub struct ClientBuilder {
    url: Option<String>,
    reqwest_builder: Option<reqwest::ClientBuilder>,
    username: Option<String>,
    #[derivative(Debug = "ignore")]
    password: Option<String>,
    #[derivative(Debug = "ignore")]
    api_key: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            reqwest_builder: None,
            url: env::var(ELASTICSEARCH_URL).ok(),
            username: env::var(ELASTICSEARCH_USERNAME).ok(),
            password: env::var(ELASTICSEARCH_PASSWORD).ok(),
            api_key: env::var(ELASTICSEARCH_API_KEY).ok(),
        }
    }

    pub fn url(mut self, url: impl ToString) -> Self {
        self.url.replace(url.to_string());
        self
    }

    pub fn basic_auth(mut self, username: impl ToString, password: impl ToString) -> Self {
        self.username.replace(username.to_string());
        self.password.replace(password.to_string());
        self
    }

    /// Base64 encoded API key, as returned in the `encoded` field on creation.
    pub fn api_key(mut self, encoded: impl ToString) -> Self {
        self.api_key.replace(encoded.to_string());
        self
    }

    pub fn api_key_id(self, id: impl AsRef<str>, api_key: impl AsRef<str>) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", id.as_ref(), api_key.as_ref()));
        self.api_key(encoded)
    }

    pub fn reqwest_builder(mut self, builder: reqwest::ClientBuilder) -> Self {
        self.reqwest_builder.replace(builder);
        self
    }

    #[instrument]
    pub fn build(self) -> Result<Client, Error> {
        let url = self.url.as_deref().ok_or(Error::UrlNotFound)?;
        let authorization = self.authorization()?;

        let mut builder = self.reqwest_builder.unwrap_or_default();

        let mut header_map = HeaderMap::new();
        if let Some(authorization) = authorization {
            header_map.insert(AUTHORIZATION, authorization);
        }
        // raw bodies in `put_raw` rely on this default
        header_map.insert(CONTENT_TYPE, JSON_CONTENT_TYPE);
        builder = builder.default_headers(header_map);

        let reqwest = builder.build().map_err(Error::ReqwestBuilderFailed)?;

        Ok(Client {
            reqwest,
            url: url.trim_end_matches('/').into(),
        })
    }

    fn authorization(&self) -> Result<Option<HeaderValue>, Error> {
        let (scheme, credentials) = match (&self.api_key, &self.username) {
            (Some(api_key), _) => ("ApiKey", api_key.to_owned()),
            (None, Some(username)) => {
                let password = self.password.as_deref().unwrap_or_default();
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{password}"));
                ("Basic", encoded)
            }
            (None, None) => return Ok(None),
        };

        let mut value = HeaderValue::from_str(&format!("{scheme} {credentials}"))
            .map_err(|e| Error::InvalidCredentials { scheme, source: e })?;
        value.set_sensitive(true);

        Ok(Some(value))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
