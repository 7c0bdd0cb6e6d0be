// src/api.rs
//
// The three read-only Battle.net endpoints: realm index, realm detail and
// connected-realm status. All responses are transient; nothing here is
// cached.

use serde::Deserialize;

use crate::Error;
use crate::config::{API_BASE, LOCALE, NAMESPACE};
use crate::http::{ApiClient, fetch_json};

#[derive(Debug, Clone, Deserialize)]
pub struct Realm {
    pub name: String,
    pub id: u64,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct RealmIndex {
    pub realms: Vec<Realm>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub struct RealmDetail {
    pub connected_realm: Link,
}

#[derive(Debug, Deserialize)]
pub struct RealmStatus {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectedRealmStatus {
    pub status: RealmStatus,
}

fn dynamic_url(path: &str) -> String {
    format!("{API_BASE}{path}?namespace={NAMESPACE}&locale={LOCALE}")
}

/// Resolves a realm name to its numeric id by scanning the realm index.
/// The match is exact and case-sensitive; exactly one realm must match.
pub async fn realm_id(client: &dyn ApiClient, name: &str) -> Result<u64, Error> {
    let index: RealmIndex = fetch_json(client, &dynamic_url("/data/wow/realm/index")).await?;
    index
        .realms
        .iter()
        .find(|realm| realm.name == name)
        .map(|realm| realm.id)
        .ok_or_else(|| Error::NotFound(format!("no realm named {name:?}")))
}

/// Fetches the realm detail record and returns the connected-realm href the
/// status lives under.
pub async fn connected_realm_href(client: &dyn ApiClient, realm_id: u64) -> Result<String, Error> {
    let url = dynamic_url(&format!("/data/wow/realm/{realm_id}"));
    let detail: RealmDetail = fetch_json(client, &url).await?;
    Ok(detail.connected_realm.href)
}

pub async fn connected_realm_status(
    client: &dyn ApiClient,
    href: &str,
) -> Result<ConnectedRealmStatus, Error> {
    fetch_json(client, href).await
}
