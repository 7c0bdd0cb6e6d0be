use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use realmwatch::Error;
use realmwatch::api;
use realmwatch::auth::{self, OAuthConfig};
use realmwatch::config::{self, Args, Secrets};
use realmwatch::http::BearerClient;
use realmwatch::notify::DesktopNotifier;
use realmwatch::tasks::watch::watch_until_up;

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("realmwatch=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("Fatal: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let secrets = Secrets::load(&args.secrets_dir)?;
    let oauth = OAuthConfig {
        client_id: secrets.client_id,
        client_secret: secrets.client_secret,
        callback_port: args.callback_port,
    };
    let token = auth::get_token(&oauth, &config::token_path(&args.secrets_dir)).await?;

    let client = BearerClient::new(token.access_token);

    let realm_id = api::realm_id(&client, &args.realm).await?;
    info!("Realm {:?} has id {}", args.realm, realm_id);

    let href = api::connected_realm_href(&client, realm_id).await?;

    watch_until_up(
        &client,
        &href,
        Duration::from_secs(args.poll_interval_secs),
        &DesktopNotifier,
    )
    .await
}
