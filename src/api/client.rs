//! HTTP transport for the catalog REST API.
//!
//! The access token is held as a [`SecretString`] and only exposed when the
//! `Authorization` header is built; reqwest marks bearer headers as sensitive
//! so they are redacted from its own debug output.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::config::Config;
use crate::error::{CatalogError, Result};

use super::{ApiError, ApiRequest, CatalogBackend, FormValue, RequestBody};

pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl HttpBackend {
    /// Create a backend from configuration.
    ///
    /// Requires an API URL and an access token, from the config file or the
    /// `CATALOG_API_URL` / `CATALOG_TOKEN` environment variables.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_url = config.api_url().ok_or_else(|| {
            CatalogError::Config(
                "API URL not configured. Set CATALOG_API_URL or run: catalog config set api_url <url>"
                    .to_string(),
            )
        })?;
        let token = config.token().ok_or_else(|| {
            CatalogError::Auth(
                "access token not configured. Set CATALOG_TOKEN or run: catalog config set auth.token <token>"
                    .to_string(),
            )
        })?;
        Self::new(&api_url, Some(token), config.timeout())
    }

    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        Url::parse(base_url).map_err(|e| {
            CatalogError::Config(format!("invalid API URL '{base_url}': {e}"))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(SecretString::from),
        })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path))
            .map_err(|e| CatalogError::Config(format!("invalid request URL: {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    fn multipart(fields: &[super::FormField]) -> Form {
        fields.iter().fold(Form::new(), |form, field| match &field.value {
            FormValue::Text(text) => form.text(field.name.clone(), text.clone()),
            FormValue::File { file_name, bytes } => form.part(
                field.name.clone(),
                Part::bytes(bytes.clone()).file_name(file_name.clone()),
            ),
        })
    }
}

#[async_trait]
impl CatalogBackend for HttpBackend {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value> {
        let endpoint = request.endpoint();
        let url = self.url_for(&request)?;

        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Form(fields) => builder.multipart(Self::multipart(fields)),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::new(endpoint.clone(), e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::with_status(endpoint.clone(), status, e.to_string()))?;

        if !status.is_success() {
            let message = ApiError::message_from_body(status, &text);
            return Err(ApiError::with_status(endpoint, status, message).into());
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|source| CatalogError::Decode { endpoint, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_url_joins_base_path_and_query() {
        let backend =
            HttpBackend::new("https://api.catalog.test/v1/", None, Duration::from_secs(5))
                .unwrap();
        let request = ApiRequest::get("/organisations/").with_query([("search", "acme")]);
        let url = backend.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.catalog.test/v1/organisations/?search=acme"
        );
    }

    #[test]
    fn test_invalid_base_url_is_a_config_error() {
        let result = HttpBackend::new("not a url", None, Duration::from_secs(5));
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_from_config_requires_api_url_and_token() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe {
            std::env::remove_var("CATALOG_API_URL");
            std::env::remove_var("CATALOG_TOKEN");
        }
        let mut config = Config::default();
        assert!(matches!(
            HttpBackend::from_config(&config),
            Err(CatalogError::Config(_))
        ));

        config.api_url = Some("https://api.catalog.test".to_string());
        assert!(matches!(
            HttpBackend::from_config(&config),
            Err(CatalogError::Auth(_))
        ));

        config.auth.token = Some("token".to_string());
        assert!(HttpBackend::from_config(&config).is_ok());
    }
}
