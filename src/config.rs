// src/config.rs
//
// Command-line arguments plus the fixed Battle.net endpoints. Region and
// locale are deliberately hardcoded; only the realm name, secrets location,
// poll interval and callback port are configurable.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::Error;

pub const AUTH_URL: &str = "https://oauth.battle.net/authorize";
pub const TOKEN_URL: &str = "https://oauth.battle.net/token";
pub const API_BASE: &str = "https://us.api.blizzard.com";
pub const NAMESPACE: &str = "dynamic-us";
pub const LOCALE: &str = "en_US";
pub const SCOPE: &str = "wow.profile";

#[derive(Parser, Debug, Clone)]
#[command(name = "realmwatch")]
#[command(author, version, about = "Watches a WoW realm and notifies once its servers come back up")]
pub struct Args {
    /// Realm name to watch (exact, case-sensitive)
    #[arg(long, default_value = "Area 52")]
    pub realm: String,

    /// Directory holding client_id.txt, client_secret.txt and token.json
    #[arg(long, default_value = "secrets")]
    pub secrets_dir: PathBuf,

    /// Seconds to wait between status checks
    #[arg(long, default_value_t = 60)]
    pub poll_interval_secs: u64,

    /// Local port for the OAuth redirect listener
    #[arg(long, default_value_t = 8080)]
    pub callback_port: u16,
}

#[derive(Debug, Clone)]
pub struct Secrets {
    pub client_id: String,
    pub client_secret: String,
}

impl Secrets {
    pub fn load(dir: &Path) -> Result<Self, Error> {
        Ok(Self {
            client_id: read_trimmed(&dir.join("client_id.txt"))?,
            client_secret: read_trimmed(&dir.join("client_secret.txt"))?,
        })
    }
}

fn read_trimmed(path: &Path) -> Result<String, Error> {
    let contents = fs::read_to_string(path)?;
    Ok(contents.trim_end().to_string())
}

pub fn token_path(dir: &Path) -> PathBuf {
    dir.join("token.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_trims_credential_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("client_id.txt"), "my-client-id\n").unwrap();
        fs::write(dir.path().join("client_secret.txt"), "my-secret").unwrap();

        let secrets = Secrets::load(dir.path()).unwrap();
        assert_eq!(secrets.client_id, "my-client-id");
        assert_eq!(secrets.client_secret, "my-secret");
    }

    #[test]
    fn missing_credential_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Secrets::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
