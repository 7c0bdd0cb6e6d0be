// src/notify.rs

use crate::Error;

/// Seam over the desktop notification call so the watch loop can be tested
/// without a display server.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> Result<(), Error>;
}

/// Best-effort OS notification via the desktop notification daemon.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), Error> {
        notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .show()
            .map(|_| ())
            .map_err(|e| Error::Notification(e.to_string()))
    }
}
