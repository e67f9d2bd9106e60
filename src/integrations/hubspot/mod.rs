//! HubSpot integration — OAuth authorization-code flow and contact loading.
//!
//! Flow:
//! 1. `authorize` mints a random `state` token, parks the caller's user/org
//!    under it and returns the consent URL.
//! 2. HubSpot redirects the browser to `oauth2_callback` with `code` and
//!    `state`. The state is looked up and consumed, the code is exchanged
//!    and the credentials are cached per org/user.
//! 3. The host application reads them back with `get_credentials` and
//!    passes them to `get_items`.
//!
//! Both the pending state and the cached credentials expire on their own.
//! Credentials in particular live only a few minutes; hosts that need them
//! longer must copy them to their own storage right after the callback.

pub mod client;
pub mod contacts;

use std::sync::Arc;
use std::time::Duration;

use axum::response::Html;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::Deserialize;

use crate::cache::{credentials_key, state_key, EphemeralStore};
use crate::errors::AppError;
use crate::models::credentials::Credentials;
use crate::models::integration_item::IntegrationItem;
use crate::models::oauth_state::PendingAuthState;

pub use client::HubSpotClient;

pub const PROVIDER: &str = "hubspot";

/// Bytes of entropy in a `state` token.
const STATE_TOKEN_BYTES: usize = 32;

const AUTH_COMPLETE_PAGE: &str = r#"<html>
  <head><title>HubSpot Auth Complete</title></head>
  <body>
    <h1>HubSpot Auth Complete!</h1>
    <p>You can close this window now.</p>
  </body>
</html>
"#;

/// Query parameters HubSpot appends to the redirect.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Clone)]
pub struct HubSpotIntegration {
    store: Arc<dyn EphemeralStore>,
    client: HubSpotClient,
    state_ttl: Duration,
    credentials_ttl: Duration,
}

impl HubSpotIntegration {
    pub fn new(
        store: Arc<dyn EphemeralStore>,
        client: HubSpotClient,
        state_ttl: Duration,
        credentials_ttl: Duration,
    ) -> Self {
        Self {
            store,
            client,
            state_ttl,
            credentials_ttl,
        }
    }

    /// Start an authorization for `user_id` in `org_id` and return the URL
    /// the browser should open.
    pub async fn authorize(&self, user_id: &str, org_id: &str) -> Result<String, AppError> {
        let user_id = user_id.trim();
        let org_id = org_id.trim();
        if user_id.is_empty() || org_id.is_empty() {
            return Err(AppError::InvalidRequest(
                "user_id and org_id are required".to_string(),
            ));
        }

        let token = generate_state_token();
        let pending = PendingAuthState {
            user_id: user_id.to_string(),
            org_id: org_id.to_string(),
        };
        let value = serde_json::to_string(&pending).map_err(anyhow::Error::from)?;
        self.store
            .set_ex(&state_key(PROVIDER, &token), value, self.state_ttl)
            .await?;

        tracing::info!(
            user_id = %user_id,
            org_id = %org_id,
            state = %token_prefix(&token),
            "hubspot authorization started"
        );

        Ok(self.client.authorization_url(&token)?)
    }

    /// Complete the redirect leg of the flow.
    ///
    /// The state token is single-use: its record is removed by the same
    /// store call that reads it, so of two callbacks racing on one token
    /// only one reaches the token endpoint. Replays fail with
    /// `InvalidOrExpiredState`.
    pub async fn oauth2_callback(
        &self,
        params: CallbackParams,
    ) -> Result<Html<&'static str>, AppError> {
        if let Some(error) = params.error {
            let description = params.error_description.unwrap_or(error);
            tracing::warn!(reason = %description, "hubspot authorization denied");
            return Err(AppError::AuthorizationDenied { description });
        }

        let token = params
            .state
            .filter(|s| !s.is_empty())
            .ok_or(AppError::MissingState)?;
        let code = params
            .code
            .filter(|c| !c.is_empty())
            .ok_or(AppError::MissingCode)?;

        let key = state_key(PROVIDER, &token);
        let Some(raw) = self.store.take(&key).await? else {
            tracing::warn!(state = %token_prefix(&token), "unknown or expired hubspot state");
            return Err(AppError::InvalidOrExpiredState);
        };

        // The record is already gone from the store; failures below leave
        // nothing to clean up.
        let pending = PendingAuthState::decode(&raw).map_err(|e| {
            tracing::error!(state = %token_prefix(&token), "stored hubspot state is corrupt");
            e
        })?;

        let credentials = self.client.exchange_code(&code).await?;

        let value = serde_json::to_string(&credentials).map_err(anyhow::Error::from)?;
        let cred_key = credentials_key(PROVIDER, &pending.org_id, &pending.user_id);
        self.store
            .set_ex(&cred_key, value, self.credentials_ttl)
            .await?;

        tracing::info!(
            user_id = %pending.user_id,
            org_id = %pending.org_id,
            "hubspot authorization complete"
        );

        Ok(Html(AUTH_COMPLETE_PAGE))
    }

    /// Cached credentials for `user_id` in `org_id`. Read-only.
    pub async fn get_credentials(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> Result<Credentials, AppError> {
        let key = credentials_key(PROVIDER, org_id.trim(), user_id.trim());
        let raw = self
            .store
            .get(&key)
            .await?
            .ok_or(AppError::CredentialsNotFound)?;
        serde_json::from_str(&raw).map_err(AppError::CredentialsParse)
    }

    /// Load the first page of contacts as integration items.
    pub async fn get_items(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<IntegrationItem>, AppError> {
        let access_token = credentials
            .access_token()
            .ok_or(AppError::MissingAccessToken)?;

        let page = self.client.list_contacts(access_token).await?;
        let items =
            contacts::to_integration_items(&page.results, &self.client.settings().app_base_url);

        tracing::debug!(count = items.len(), "loaded hubspot contacts");
        for item in &items {
            tracing::trace!(?item, "hubspot integration item");
        }

        Ok(items)
    }
}

/// URL-safe random token with `STATE_TOKEN_BYTES` bytes of OS entropy.
fn generate_state_token() -> String {
    let mut bytes = [0u8; STATE_TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Enough of a state token to correlate log lines without exposing it.
fn token_prefix(token: &str) -> &str {
    token.get(..6).unwrap_or("****")
}
