// src/auth/token_store.rs
//
// Disk persistence for the OAuth token. An expired token counts as absent so
// the caller falls back to the interactive flow instead of calling the API
// with a stale credential.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

pub fn load(path: &Path) -> Result<StoredToken, Error> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "no token file at {}",
            path.display()
        )));
    }
    let bytes = fs::read(path)?;
    let token: StoredToken = serde_json::from_slice(&bytes)?;
    if token.is_expired(Utc::now()) {
        return Err(Error::NotFound(format!(
            "token at {} has expired",
            path.display()
        )));
    }
    Ok(token)
}

pub fn save(path: &Path, token: &StoredToken) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(token)?)?;
    Ok(())
}
