use std::time::Duration;

const PLACEHOLDER_CLIENT_ID: &str = "CHANGE_ME_HUBSPOT_CLIENT_ID";
const PLACEHOLDER_CLIENT_SECRET: &str = "CHANGE_ME_HUBSPOT_CLIENT_SECRET";

/// Which backend holds pending OAuth state and cached credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    /// Process-local map. Only suitable for a single instance.
    Memory,
}

impl StoreBackend {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Some(Self::Redis),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// OAuth app registration and endpoints for the HubSpot integration.
#[derive(Debug, Clone)]
pub struct HubSpotConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Space-separated scope list sent on the authorize URL.
    pub scope: String,
    pub authorize_url: String,
    /// Base for the token exchange and CRM endpoints.
    pub api_base_url: String,
    /// Base for human-facing record links.
    pub app_base_url: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreBackend,
    pub redis_url: String,
    /// Lifetime of an unconsumed authorization `state` token.
    /// Set via CRMLINK_STATE_TTL_SECS. Default: 600.
    pub state_ttl_secs: u64,
    /// Lifetime of cached credentials after a successful callback.
    /// Deliberately short: hosts that need credentials longer must copy
    /// them out right after the callback completes.
    /// Set via CRMLINK_CREDENTIALS_TTL_SECS. Default: 600.
    pub credentials_ttl_secs: u64,
    pub http_timeout_secs: u64,
    pub dashboard_origin: String,
    pub hubspot: HubSpotConfig,
}

impl Config {
    pub fn state_ttl(&self) -> Duration {
        Duration::from_secs(self.state_ttl_secs)
    }

    pub fn credentials_ttl(&self) -> Duration {
        Duration::from_secs(self.credentials_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let client_id =
        std::env::var("HUBSPOT_CLIENT_ID").unwrap_or_else(|_| PLACEHOLDER_CLIENT_ID.into());
    let client_secret = std::env::var("HUBSPOT_CLIENT_SECRET")
        .unwrap_or_else(|_| PLACEHOLDER_CLIENT_SECRET.into());

    if client_id == PLACEHOLDER_CLIENT_ID || client_secret == PLACEHOLDER_CLIENT_SECRET {
        let env_mode = std::env::var("CRMLINK_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        if env_mode == "production" {
            anyhow::bail!(
                "HUBSPOT_CLIENT_ID / HUBSPOT_CLIENT_SECRET are still placeholders. \
                 Set the HubSpot app credentials before running in production."
            );
        }
        eprintln!("⚠️  HUBSPOT_CLIENT_ID or HUBSPOT_CLIENT_SECRET is not set; the authorize flow will be rejected by HubSpot.");
    }

    let store = match std::env::var("CRMLINK_STORE") {
        Ok(raw) => StoreBackend::parse(&raw)
            .ok_or_else(|| anyhow::anyhow!("invalid CRMLINK_STORE: {} (expected redis or memory)", raw))?,
        Err(_) => StoreBackend::Redis,
    };

    Ok(Config {
        port: env_parse("CRMLINK_PORT", 8000),
        store,
        redis_url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into()),
        state_ttl_secs: env_parse("CRMLINK_STATE_TTL_SECS", 600),
        credentials_ttl_secs: env_parse("CRMLINK_CREDENTIALS_TTL_SECS", 600),
        http_timeout_secs: env_parse("CRMLINK_HTTP_TIMEOUT_SECS", 30),
        dashboard_origin: std::env::var("DASHBOARD_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".into()),
        hubspot: HubSpotConfig {
            client_id,
            client_secret,
            redirect_uri: std::env::var("HUBSPOT_REDIRECT_URI").unwrap_or_else(|_| {
                "http://localhost:8000/integrations/hubspot/oauth2callback".into()
            }),
            scope: std::env::var("HUBSPOT_SCOPE")
                .unwrap_or_else(|_| "oauth crm.objects.contacts.read".into()),
            authorize_url: std::env::var("HUBSPOT_AUTHORIZE_URL")
                .unwrap_or_else(|_| "https://app.hubspot.com/oauth/authorize".into()),
            api_base_url: std::env::var("HUBSPOT_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.hubapi.com".into()),
            app_base_url: std::env::var("HUBSPOT_APP_BASE_URL")
                .unwrap_or_else(|_| "https://app.hubspot.com".into()),
        },
    })
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
