//! Validation of the configuration tree.
//!
//! Checks compose in a fixed order: structural field constraints first,
//! then uniqueness against sibling entities. The first violation fails the
//! whole candidate.

use regex::Regex;
use std::collections::HashSet;

use crate::model::{CloudflareAccount, Config, SubDomain, Zone};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("subdomain name '{0}' is not a valid record name (labels of letters, digits and internal '-', or '@' for the apex)")]
    InvalidName(String),
    #[error("subdomain name '{0}' is too long (max 63 characters)")]
    NameTooLong(String),
    #[error("TTL must be between 60 and 86400 seconds, got {0}")]
    TtlOutOfRange(u32),
    #[error("zone ID '{0}' must be a 32-character lowercase hexadecimal string")]
    InvalidZoneId(String),
    #[error("duplicate subdomain name: {0}")]
    DuplicateSubdomainName(String),
    #[error("duplicate zone ID: {0}")]
    DuplicateZoneId(String),
}

impl ValidationError {
    /// Duplicates are conflicts with sibling entities rather than malformed
    /// input; the API layer maps them to a different status code.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ValidationError::DuplicateSubdomainName(_) | ValidationError::DuplicateZoneId(_)
        )
    }
}

lazy_static::lazy_static! {
    /// Dotted labels: alphanumeric with internal hyphens only.
    static ref RECORD_NAME_RE: Regex = Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?)*$"
    ).unwrap();
    static ref ZONE_ID_RE: Regex = Regex::new(r"^[a-f0-9]{32}$").unwrap();
}

/// Record names are dotted label sequences, or the single literal `@` for
/// the zone apex. Whole name capped at 63 characters.
pub fn validate_record_name(name: &str) -> Result<(), ValidationError> {
    if name.len() > 63 {
        return Err(ValidationError::NameTooLong(name.to_string()));
    }
    if name == "@" {
        return Ok(());
    }
    if !RECORD_NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub fn validate_ttl(ttl: u32) -> Result<(), ValidationError> {
    if !(60..=86400).contains(&ttl) {
        return Err(ValidationError::TtlOutOfRange(ttl));
    }
    Ok(())
}

pub fn validate_zone_id(zone_id: &str) -> Result<(), ValidationError> {
    if !ZONE_ID_RE.is_match(zone_id) {
        return Err(ValidationError::InvalidZoneId(zone_id.to_string()));
    }
    Ok(())
}

pub fn validate_subdomain(subdomain: &SubDomain) -> Result<(), ValidationError> {
    validate_record_name(&subdomain.name)?;
    validate_ttl(subdomain.ttl)?;
    Ok(())
}

/// Zone id format, then each subdomain, then name uniqueness within the zone.
pub fn validate_zone(zone: &Zone) -> Result<(), ValidationError> {
    validate_zone_id(&zone.zone_id)?;
    for subdomain in &zone.subdomains {
        validate_subdomain(subdomain)?;
    }
    let mut names = HashSet::new();
    for subdomain in &zone.subdomains {
        if !names.insert(subdomain.name.as_str()) {
            return Err(ValidationError::DuplicateSubdomainName(
                subdomain.name.clone(),
            ));
        }
    }
    Ok(())
}

/// Each zone, then zone-id uniqueness within the account.
pub fn validate_account(account: &CloudflareAccount) -> Result<(), ValidationError> {
    for zone in &account.zones {
        validate_zone(zone)?;
    }
    let mut zone_ids = HashSet::new();
    for zone in &account.zones {
        if !zone_ids.insert(zone.zone_id.as_str()) {
            return Err(ValidationError::DuplicateZoneId(zone.zone_id.clone()));
        }
    }
    Ok(())
}

/// Whole-tree validation, run after loading a config file from disk.
pub fn validate_config(config: &Config) -> Result<(), ValidationError> {
    validate_ttl(config.ttl)?;
    for account in &config.cloudflare {
        validate_account(account)?;
    }
    Ok(())
}
