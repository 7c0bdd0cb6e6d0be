// src/auth/mod.rs
//
// OAuth2 authorization-code flow against the Battle.net endpoints. The flow
// runs at most once per process: a stored, unexpired token short-circuits it
// entirely.

pub mod callback_server;
pub mod token_store;

use std::path::Path;

use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use serde::Deserialize;
use tracing::info;

use crate::Error;
use crate::config::{AUTH_URL, SCOPE, TOKEN_URL};
use callback_server::start_callback_server;
use token_store::StoredToken;

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_port: u16,
}

impl OAuthConfig {
    fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/redirect", self.callback_port)
    }

    fn build_auth_url(&self, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}&access_type=offline",
            AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri()),
            urlencoding::encode(SCOPE),
            urlencoding::encode(state),
        )
    }
}

/// Wire shape of the token endpoint's response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: u64,
    refresh_token: Option<String>,
    scope: Option<String>,
}

/// Returns a usable token: the stored one when present and unexpired,
/// otherwise the result of the interactive authorization-code flow, persisted
/// before returning.
pub async fn get_token(config: &OAuthConfig, token_path: &Path) -> Result<StoredToken, Error> {
    match token_store::load(token_path) {
        Ok(token) => {
            info!("Reusing stored token from {}", token_path.display());
            return Ok(token);
        }
        Err(e) => info!("No usable stored token ({e}); starting OAuth2 flow"),
    }

    // Fresh state per run; the redirect must echo it back.
    let state: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();

    let auth_url = config.build_auth_url(&state);
    println!("Open this URL in your browser to authorize:\n{auth_url}");

    let (done_rx, shutdown_tx) = start_callback_server(config.callback_port).await?;
    let result = done_rx
        .await
        .map_err(|_| Error::Auth("redirect listener dropped before delivering a code".into()))?;
    let _ = shutdown_tx.send(());

    verify_state(&state, result.state.as_deref())?;

    let token = exchange_code(config, &result.code).await?;
    token_store::save(token_path, &token)?;
    info!("Token saved to {}", token_path.display());
    Ok(token)
}

/// The redirect must echo the state nonce back verbatim; anything else means
/// the code did not come from the flow we started.
fn verify_state(expected: &str, got: Option<&str>) -> Result<(), Error> {
    if got != Some(expected) {
        return Err(Error::Auth("state mismatch on OAuth redirect".into()));
    }
    Ok(())
}

async fn exchange_code(config: &OAuthConfig, code: &str) -> Result<StoredToken, Error> {
    let http_client = reqwest::Client::new();
    let params = [
        ("client_id", config.client_id.clone()),
        ("client_secret", config.client_secret.clone()),
        ("code", code.to_string()),
        ("grant_type", "authorization_code".to_string()),
        ("redirect_uri", config.redirect_uri()),
    ];

    let resp = http_client
        .post(TOKEN_URL)
        .form(&params)
        .send()
        .await
        .map_err(|e| Error::Auth(format!("HTTP error exchanging code: {e}")))?
        .error_for_status()
        .map_err(|e| Error::Auth(format!("token endpoint error: {e}")))?
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::Auth(format!("parse error on token JSON: {e}")))?;

    Ok(StoredToken {
        access_token: resp.access_token,
        token_type: resp.token_type,
        refresh_token: resp.refresh_token,
        scope: resp.scope,
        expires_at: Some(Utc::now() + chrono::Duration::seconds(resp.expires_in as i64)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn stored_token_short_circuits_the_interactive_flow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let token = StoredToken {
            access_token: "stored".into(),
            token_type: "bearer".into(),
            refresh_token: None,
            scope: Some("wow.profile".into()),
            expires_at: Some(Utc::now() + Duration::hours(1)),
        };
        token_store::save(&path, &token).unwrap();

        // Port 1 cannot be bound unprivileged. If the short-circuit ever
        // regressed, the listener task would fail to bind, drop the handoff
        // slot, and `get_token` would return an Auth error instead of the
        // stored token.
        let config = OAuthConfig {
            client_id: "id".into(),
            client_secret: "secret".into(),
            callback_port: 1,
        };
        let got = get_token(&config, &path).await.unwrap();
        assert_eq!(got, token);
    }

    #[test]
    fn redirect_state_must_echo_the_nonce() {
        assert!(verify_state("st4te", Some("st4te")).is_ok());

        let err = verify_state("st4te", Some("forged")).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        let err = verify_state("st4te", None).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn auth_url_carries_scope_state_and_redirect() {
        let config = OAuthConfig {
            client_id: "my id".into(),
            client_secret: "secret".into(),
            callback_port: 8080,
        };
        let url = config.build_auth_url("st4te");
        assert!(url.starts_with("https://oauth.battle.net/authorize?response_type=code"));
        assert!(url.contains("client_id=my%20id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8080%2Fredirect"));
        assert!(url.contains("scope=wow.profile"));
        assert!(url.contains("state=st4te"));
        assert!(url.contains("access_type=offline"));
    }
}
