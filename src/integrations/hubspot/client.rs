//! HTTP client for the HubSpot OAuth and CRM endpoints.
//!
//! Every call is single-attempt: a failed vendor call is reported to the
//! caller immediately rather than retried.

use std::time::Duration;

use serde::Deserialize;

use crate::config::HubSpotConfig;
use crate::errors::AppError;
use crate::models::credentials::Credentials;

use super::contacts::ContactRecord;

/// One page of the contacts list endpoint. Paging cursors are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ContactPage {
    #[serde(default)]
    pub results: Vec<ContactRecord>,
}

#[derive(Clone)]
pub struct HubSpotClient {
    client: reqwest::Client,
    settings: HubSpotConfig,
}

impl HubSpotClient {
    pub fn new(settings: HubSpotConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &HubSpotConfig {
        &self.settings
    }

    /// Build the consent-screen URL carrying `state` back to our callback.
    pub fn authorization_url(&self, state: &str) -> anyhow::Result<String> {
        let url = url::Url::parse_with_params(
            &self.settings.authorize_url,
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("scope", self.settings.scope.as_str()),
                ("state", state),
                ("response_type", "code"),
            ],
        )?;
        Ok(url.into())
    }

    /// Exchange a one-time authorization code for credentials.
    ///
    /// Non-success responses are returned as `TokenExchangeFailure` so they
    /// never get mistaken for credentials.
    pub async fn exchange_code(&self, code: &str) -> Result<Credentials, AppError> {
        let url = self.api_url("/oauth/v1/token");
        let resp = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "hubspot token exchange rejected");
            return Err(AppError::TokenExchangeFailure {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<Credentials>(&body).map_err(|e| {
            tracing::warn!("hubspot token exchange returned unreadable body: {}", e);
            AppError::TokenExchangeFailure {
                status: status.as_u16(),
                body,
            }
        })
    }

    /// Fetch the first page of contacts visible to `access_token`.
    pub async fn list_contacts(&self, access_token: &str) -> Result<ContactPage, AppError> {
        let url = self.api_url("/crm/v3/objects/contacts");
        let resp = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "hubspot contacts request failed");
            return Err(AppError::VendorRequestFailure {
                status: status.as_u16(),
                body,
            });
        }

        let page = resp.json::<ContactPage>().await?;
        Ok(page)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_base_url.trim_end_matches('/'), path)
    }
}
