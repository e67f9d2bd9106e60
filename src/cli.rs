use clap::{Parser, Subcommand};

use crate::config::StoreBackend;

/// CRMLink — HubSpot OAuth connector and contact loader
#[derive(Parser)]
#[command(name = "crmlink", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind (defaults to CRMLINK_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start an authorization and print the HubSpot consent URL
    AuthUrl {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        org_id: String,
    },

    /// Fetch contacts with an access token and print them as JSON
    Contacts {
        #[arg(long, env = "HUBSPOT_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,
    },
}

/// `auth-url` parks the pending state in the store and exits. With the
/// in-memory backend that state dies with the process, so the printed URL
/// could never complete.
pub fn ensure_auth_url_store(store: StoreBackend) -> anyhow::Result<()> {
    if store == StoreBackend::Memory {
        anyhow::bail!(
            "auth-url needs a shared store: set CRMLINK_STORE=redis so the running \
             server can find the state when HubSpot redirects back"
        );
    }
    Ok(())
}
