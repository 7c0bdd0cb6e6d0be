use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use axum_server::{Handle, Server};
use serde::Deserialize;
use tokio::sync::{Mutex, oneshot};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::Error;

/// Structure to hold the final result from the OAuth redirect.
#[derive(Debug, Clone)]
pub struct CallbackResult {
    pub code: String,
    pub state: Option<String>,
}

/// Query string we expect from the provider: ?code=xxx&state=...
#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Shared state for the redirect route.
#[derive(Clone)]
struct CallbackServerState {
    /// Single-use slot; only the first request carrying a code resolves it.
    done_tx: Arc<Mutex<Option<oneshot::Sender<CallbackResult>>>>,
}

/// Starts the one-shot redirect listener on 127.0.0.1:`port`.
///
/// Returns the receiver the authorization code arrives on, plus a shutdown
/// trigger the caller fires once the code is in hand so the listener does not
/// outlive the handshake.
pub async fn start_callback_server(
    port: u16,
) -> Result<(oneshot::Receiver<CallbackResult>, oneshot::Sender<()>), Error> {
    let (done_tx, done_rx) = oneshot::channel::<CallbackResult>();
    let done_tx = Arc::new(Mutex::new(Some(done_tx)));

    let state = CallbackServerState { done_tx };

    let app = Router::new()
        .route("/redirect", get(handle_redirect))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let (shutdown_send, shutdown_recv) = oneshot::channel::<()>();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("OAuth redirect listener on http://{}", addr);

    let handle = Handle::new();
    let handle_clone = handle.clone();

    tokio::spawn(async move {
        let _ = shutdown_recv.await;
        handle_clone.graceful_shutdown(None);
    });

    let server = Server::bind(addr).handle(handle).serve(app.into_make_service());

    tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Redirect listener error: {}", e);
        }
        info!("Redirect listener shut down.");
    });

    Ok((done_rx, shutdown_send))
}

async fn handle_redirect(
    State(state): State<CallbackServerState>,
    Query(query): Query<AuthQuery>,
) -> (StatusCode, Html<String>) {
    if let Some(err) = query.error.as_ref() {
        let desc = query.error_description.clone().unwrap_or_default();
        let msg = format!("<h2>OAuth Error</h2><p>{}</p><p>{}</p>", err, desc);
        return (StatusCode::OK, Html(msg));
    }

    if let Some(code) = query.code.clone() {
        if let Some(tx) = state.done_tx.lock().await.take() {
            let _ = tx.send(CallbackResult {
                code,
                state: query.state.clone(),
            });
        }

        let success = "<h2>Authentication Successful</h2>\
            <p>Received the authorization code; you can close this page now.</p>";
        return (StatusCode::OK, Html(success.to_string()));
    }

    let msg = "<h2>Missing 'code' query param</h2><p>Check the URL and try again.</p>";
    (StatusCode::OK, Html(msg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> (
        CallbackServerState,
        oneshot::Receiver<CallbackResult>,
    ) {
        let (done_tx, done_rx) = oneshot::channel();
        let state = CallbackServerState {
            done_tx: Arc::new(Mutex::new(Some(done_tx))),
        };
        (state, done_rx)
    }

    #[tokio::test]
    async fn request_without_code_does_not_resolve_the_handoff() {
        let (state, mut done_rx) = slot();

        let query = AuthQuery {
            code: None,
            state: None,
            error: None,
            error_description: None,
        };
        handle_redirect(State(state.clone()), Query(query)).await;
        assert!(done_rx.try_recv().is_err());

        // The slot is still armed; a later request with a code resolves it.
        let query = AuthQuery {
            code: Some("ABC".into()),
            state: Some("xyz".into()),
            error: None,
            error_description: None,
        };
        handle_redirect(State(state), Query(query)).await;

        let result = done_rx.await.unwrap();
        assert_eq!(result.code, "ABC");
        assert_eq!(result.state.as_deref(), Some("xyz"));
    }

    #[tokio::test]
    async fn only_the_first_code_delivery_resolves() {
        let (state, done_rx) = slot();

        let query = AuthQuery {
            code: Some("first".into()),
            state: None,
            error: None,
            error_description: None,
        };
        handle_redirect(State(state.clone()), Query(query)).await;

        let query = AuthQuery {
            code: Some("second".into()),
            state: None,
            error: None,
            error_description: None,
        };
        handle_redirect(State(state), Query(query)).await;

        assert_eq!(done_rx.await.unwrap().code, "first");
    }

    #[tokio::test]
    async fn provider_error_renders_without_resolving() {
        let (state, mut done_rx) = slot();

        let query = AuthQuery {
            code: None,
            state: None,
            error: Some("access_denied".into()),
            error_description: Some("User denied access".into()),
        };
        let (status, Html(body)) = handle_redirect(State(state), Query(query)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("access_denied"));
        assert!(done_rx.try_recv().is_err());
    }
}
