use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crmlink::models::credentials::Credentials;
use crmlink::{api, cli, config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "crmlink=debug,tower_http=debug".into()),
    );
    // CRMLINK_LOG_FORMAT=json for log shippers, human-readable otherwise
    if std::env::var("CRMLINK_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => {
            let port = port.unwrap_or(cfg.port);
            run_server(cfg, port).await
        }
        Some(cli::Commands::AuthUrl { user_id, org_id }) => {
            cli::ensure_auth_url_store(cfg.store)?;
            let state = AppState::from_config(cfg).await?;
            let url = state.hubspot.authorize(&user_id, &org_id).await?;
            println!("{}", url);
            Ok(())
        }
        Some(cli::Commands::Contacts { access_token }) => {
            let state = AppState::from_config(cfg).await?;
            let credentials = Credentials {
                access_token: Some(access_token),
                ..Default::default()
            };
            let items = state.hubspot.get_items(&credentials).await?;
            println!("{}", serde_json::to_string_pretty(&items)?);
            Ok(())
        }
        None => {
            let port = cfg.port;
            run_server(cfg, port).await
        }
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

async fn run_server(cfg: config::Config, port: u16) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(cfg).await?);
    let app = api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("CRMLink listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
