//! The authoritative in-memory config tree and its CRUD surfaces.
//!
//! One `ConfigStore` exists per process. Mutations run under the write lock
//! for their whole read-check-mutate-persist sequence, so concurrent writers
//! serialize and memory never diverges from disk: the mutated tree is saved
//! first and committed to memory only when the save succeeds.

use std::path::PathBuf;

use anyhow::Context;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::AppError;
use crate::model::{Authentication, CloudflareAccount, Config, Zone, ZoneCreate};
use crate::persist;
use crate::validation::{validate_account, validate_zone};

pub struct ConfigStore {
    path: PathBuf,
    tree: RwLock<Config>,
}

impl ConfigStore {
    /// Load the tree from `path`, or start from defaults when the file does
    /// not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let tree = persist::load(&path)
            .with_context(|| format!("failed to open config store at {}", path.display()))?;
        Ok(ConfigStore {
            path,
            tree: RwLock::new(tree),
        })
    }

    /// Apply `mutate` to a copy of the tree, persist the copy, then commit
    /// it. A failed check or save leaves memory and disk untouched. The file
    /// write runs on the blocking pool; the write lock stays held across it.
    async fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Config) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut guard = self.tree.write().await;
        let mut candidate = guard.clone();
        let out = mutate(&mut candidate)?;

        let path = self.path.clone();
        let (candidate, saved) =
            tokio::task::spawn_blocking(move || {
                let saved = persist::save(&path, &candidate);
                (candidate, saved)
            })
            .await
            .map_err(|err| AppError::Internal(err.into()))?;
        saved?;

        *guard = candidate;
        Ok(out)
    }

    pub async fn list_accounts(&self) -> Vec<CloudflareAccount> {
        self.tree.read().await.cloudflare.clone()
    }

    pub async fn create_account(
        &self,
        account: CloudflareAccount,
    ) -> Result<CloudflareAccount, AppError> {
        validate_account(&account)?;

        let created = self
            .commit(|tree| {
                check_credential_collision(&tree.cloudflare, &account.authentication)?;
                tree.cloudflare.push(account.clone());
                Ok(account)
            })
            .await?;

        info!(account_id = %created.id, "account created");
        Ok(created)
    }

    pub async fn get_account(&self, account_id: &str) -> Result<CloudflareAccount, AppError> {
        self.tree
            .read()
            .await
            .cloudflare
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Account not found"))
    }

    /// Full replacement of the matched account. The stored id always wins
    /// over whatever id the caller supplied. Credential uniqueness is not
    /// re-checked on update.
    pub async fn update_account(
        &self,
        account_id: &str,
        mut account: CloudflareAccount,
    ) -> Result<CloudflareAccount, AppError> {
        validate_account(&account)?;
        account.id = account_id.to_string();

        let updated = self
            .commit(|tree| {
                let slot = tree
                    .cloudflare
                    .iter_mut()
                    .find(|a| a.id == account_id)
                    .ok_or_else(|| AppError::not_found("Account not found"))?;
                *slot = account.clone();
                Ok(account)
            })
            .await?;

        info!(account_id = %account_id, "account updated");
        Ok(updated)
    }

    pub async fn delete_account(&self, account_id: &str) -> Result<(), AppError> {
        self.commit(|tree| {
            let idx = tree
                .cloudflare
                .iter()
                .position(|a| a.id == account_id)
                .ok_or_else(|| AppError::not_found("Account not found"))?;
            tree.cloudflare.remove(idx);
            Ok(())
        })
        .await?;

        info!(account_id = %account_id, "account deleted");
        Ok(())
    }

    /// Replace only the authentication sub-object of the matched account.
    pub async fn update_authentication(
        &self,
        account_id: &str,
        auth: Authentication,
    ) -> Result<Authentication, AppError> {
        let updated = self
            .commit(|tree| {
                let account = tree
                    .cloudflare
                    .iter_mut()
                    .find(|a| a.id == account_id)
                    .ok_or_else(|| AppError::not_found("Account not found"))?;
                account.authentication = auth.clone();
                Ok(auth)
            })
            .await?;

        info!(account_id = %account_id, "authentication updated");
        Ok(updated)
    }

    pub async fn list_zones(&self, account_id: &str) -> Result<Vec<Zone>, AppError> {
        Ok(self.get_account(account_id).await?.zones)
    }

    /// Insert a new zone under the account. The zone and every supplied
    /// subdomain get fresh server-assigned ids.
    pub async fn create_zone(
        &self,
        account_id: &str,
        candidate: ZoneCreate,
    ) -> Result<Zone, AppError> {
        let zone = candidate.into_zone();
        validate_zone(&zone)?;

        let created = self
            .commit(|tree| {
                let account = tree
                    .cloudflare
                    .iter_mut()
                    .find(|a| a.id == account_id)
                    .ok_or_else(|| AppError::not_found("Account not found"))?;
                if account.zones.iter().any(|z| z.zone_id == zone.zone_id) {
                    return Err(AppError::conflict(format!(
                        "Zone {} already exists",
                        zone.zone_id
                    )));
                }
                account.zones.push(zone.clone());
                Ok(zone)
            })
            .await?;

        info!(account_id = %account_id, zone_id = %created.id, "zone created");
        Ok(created)
    }

    pub async fn get_zone(&self, account_id: &str, zone_id: &str) -> Result<Zone, AppError> {
        let account = self.get_account(account_id).await?;
        account
            .zones
            .into_iter()
            .find(|z| z.id == zone_id)
            .ok_or_else(|| AppError::not_found("Zone not found"))
    }

    /// Full replacement of the matched zone, id pinned to the original. As
    /// with accounts, updates skip the sibling `zone_id` duplicate check.
    pub async fn update_zone(
        &self,
        account_id: &str,
        zone_id: &str,
        mut zone: Zone,
    ) -> Result<Zone, AppError> {
        validate_zone(&zone)?;
        zone.id = zone_id.to_string();

        let updated = self
            .commit(|tree| {
                let account = tree
                    .cloudflare
                    .iter_mut()
                    .find(|a| a.id == account_id)
                    .ok_or_else(|| AppError::not_found("Account not found"))?;
                let slot = account
                    .zones
                    .iter_mut()
                    .find(|z| z.id == zone_id)
                    .ok_or_else(|| AppError::not_found("Zone not found"))?;
                *slot = zone.clone();
                Ok(zone)
            })
            .await?;

        info!(account_id = %account_id, zone_id = %zone_id, "zone updated");
        Ok(updated)
    }

    pub async fn delete_zone(&self, account_id: &str, zone_id: &str) -> Result<(), AppError> {
        self.commit(|tree| {
            let account = tree
                .cloudflare
                .iter_mut()
                .find(|a| a.id == account_id)
                .ok_or_else(|| AppError::not_found("Account not found"))?;
            let idx = account
                .zones
                .iter()
                .position(|z| z.id == zone_id)
                .ok_or_else(|| AppError::not_found("Zone not found"))?;
            account.zones.remove(idx);
            Ok(())
        })
        .await?;

        info!(account_id = %account_id, zone_id = %zone_id, "zone deleted");
        Ok(())
    }
}

/// Credential collision against every existing account, checked in order:
/// token, then key, then email. Fields absent on either side never collide.
fn check_credential_collision(
    accounts: &[CloudflareAccount],
    auth: &Authentication,
) -> Result<(), AppError> {
    for existing in accounts {
        if let (Some(token), Some(existing_token)) =
            (&auth.api_token, &existing.authentication.api_token)
            && token == existing_token
        {
            return Err(AppError::conflict("API Token already exists"));
        }
        if let (Some(key), Some(existing_key)) = (&auth.api_key, &existing.authentication.api_key)
        {
            if key.api_key == existing_key.api_key {
                return Err(AppError::conflict("API Key already exists"));
            }
            if key.account_email == existing_key.account_email {
                return Err(AppError::conflict("Account email already exists"));
            }
        }
    }
    Ok(())
}
