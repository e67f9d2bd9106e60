//! Shared fixtures: an in-memory store and a config pointing HubSpot at a mock server.

#![allow(dead_code)]

use std::sync::Arc;

use crmlink::cache::MemoryStore;
use crmlink::config::{Config, HubSpotConfig, StoreBackend};
use crmlink::AppState;

pub const APP_BASE: &str = "https://app.hubspot.com";

pub fn test_config(api_base_url: &str) -> Config {
    Config {
        port: 0,
        store: StoreBackend::Memory,
        redis_url: String::new(),
        state_ttl_secs: 600,
        credentials_ttl_secs: 600,
        http_timeout_secs: 5,
        dashboard_origin: "http://localhost:3000".to_string(),
        hubspot: HubSpotConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_uri: "http://localhost:8000/integrations/hubspot/oauth2callback".to_string(),
            scope: "oauth crm.objects.contacts.read".to_string(),
            authorize_url: format!("{}/oauth/authorize", APP_BASE),
            api_base_url: api_base_url.to_string(),
            app_base_url: APP_BASE.to_string(),
        },
    }
}

/// State wired to a fresh `MemoryStore`; the store handle is returned so
/// tests can inspect or seed entries directly.
pub fn test_state(api_base_url: &str) -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::new(test_config(api_base_url), Arc::new(store.clone()))
        .expect("state should build");
    (state, store)
}

/// Pull the `state` query parameter out of an authorization URL.
pub fn state_param(auth_url: &str) -> String {
    url::Url::parse(auth_url)
        .expect("authorization URL should parse")
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .expect("authorization URL should carry state")
}
