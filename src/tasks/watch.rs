// src/tasks/watch.rs
//
// The polling loop. Two states: polling while the connected realm reports
// "DOWN", done once it reports anything else. Unbounded; any fetch or
// notification failure ends the process instead of being retried.

use std::time::Duration;

use tracing::info;

use crate::Error;
use crate::api;
use crate::http::ApiClient;
use crate::notify::Notifier;

const DOWN: &str = "DOWN";

pub const NOTIFY_TITLE: &str = "WoW servers are up";
pub const NOTIFY_BODY: &str = "Log on!";

/// Polls the connected-realm status at `href` every `interval` until it is
/// anything other than "DOWN", then fires exactly one notification.
pub async fn watch_until_up(
    client: &dyn ApiClient,
    href: &str,
    interval: Duration,
    notifier: &dyn Notifier,
) -> Result<(), Error> {
    loop {
        info!("Fetching server status...");
        let status = api::connected_realm_status(client, href).await?;
        if status.status.kind != DOWN {
            info!("Servers are up (status {}); notifying", status.status.kind);
            notifier.notify(NOTIFY_TITLE, NOTIFY_BODY)?;
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}
