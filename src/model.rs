//! The configuration tree consumed by the DDNS update agent.
//!
//! Every type decodes strictly: unknown keys in a request body or the config
//! file are an error, never silently dropped. Identifiers are opaque uuid
//! strings assigned server-side; `SubDomainCreate`/`ZoneCreate` are the
//! id-less payload shapes used at creation time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fresh opaque identifier for a newly created entity.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_ttl() -> u32 {
    300
}

fn default_true() -> bool {
    true
}

/// A DNS record within a zone that the update agent keeps in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubDomain {
    #[serde(default = "new_id")]
    pub id: String,
    /// Record name relative to the zone; `@` means the zone apex.
    pub name: String,
    /// Route traffic through the Cloudflare proxy.
    #[serde(default)]
    pub proxied: bool,
    /// Record TTL in seconds, 60-86400.
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

/// Subdomain as supplied inside a zone-create payload. No id: the store
/// always assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubDomainCreate {
    pub name: String,
    #[serde(default)]
    pub proxied: bool,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

/// A Cloudflare DNS zone and the subdomains managed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Zone {
    #[serde(default = "new_id")]
    pub id: String,
    /// Cloudflare-assigned zone identifier, 32 lowercase hex chars.
    pub zone_id: String,
    pub domain: String,
    #[serde(default)]
    pub subdomains: Vec<SubDomain>,
}

/// Zone-create payload. Subdomains are recreated with fresh ids on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneCreate {
    pub zone_id: String,
    pub domain: String,
    #[serde(default)]
    pub subdomains: Vec<SubDomainCreate>,
}

/// Cloudflare API key credential pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiKey {
    pub api_key: String,
    pub account_email: String,
}

/// Credentials the update agent presents to the Cloudflare API. Either form
/// may be present; the schema does not require one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Authentication {
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub api_key: Option<ApiKey>,
}

/// One Cloudflare account and the zones managed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudflareAccount {
    #[serde(default = "new_id")]
    pub id: String,
    pub authentication: Authentication,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// Root of the configuration tree, persisted as a single JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub cloudflare: Vec<CloudflareAccount>,
    /// Keep A (IPv4) records updated.
    #[serde(default = "default_true")]
    pub a: bool,
    /// Keep AAAA (IPv6) records updated.
    #[serde(default = "default_true")]
    pub aaaa: bool,
    /// Delete records the agent does not recognize.
    #[serde(rename = "purgeUnknownRecords", default)]
    pub purge_unknown_records: bool,
    /// Default record TTL in seconds, 60-86400.
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cloudflare: Vec::new(),
            a: true,
            aaaa: true,
            purge_unknown_records: false,
            ttl: default_ttl(),
        }
    }
}

impl ZoneCreate {
    /// Materialize a zone from a create payload, assigning fresh ids to the
    /// zone and every supplied subdomain.
    pub fn into_zone(self) -> Zone {
        Zone {
            id: new_id(),
            zone_id: self.zone_id,
            domain: self.domain,
            subdomains: self
                .subdomains
                .into_iter()
                .map(|s| SubDomain {
                    id: new_id(),
                    name: s.name,
                    proxied: s.proxied,
                    ttl: s.ttl,
                })
                .collect(),
        }
    }
}
