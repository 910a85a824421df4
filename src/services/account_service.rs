use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::auth_dto::LoginPayload;
use crate::error::{Error, Result};
use crate::utils::time;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
    pub auth_date: DateTime<Utc>,
    pub registration_date: DateTime<Utc>,
    pub balance: f64,
}

/// Account and balance state for logged-in users. Held in memory and shared
/// through `AppState`; persistence is explicit — nothing is written unless
/// `save` runs, and `save` is a no-op without a configured state file.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<RwLock<HashMap<i64, Account>>>,
    state_file: Option<PathBuf>,
}

impl AccountService {
    pub fn new(state_file: Option<PathBuf>) -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            state_file,
        }
    }

    /// Loads previously saved accounts. A missing state file is a fresh
    /// start, not an error.
    pub async fn load(&self) -> Result<()> {
        let Some(path) = &self.state_file else {
            return Ok(());
        };
        let raw = match tokio::fs::read(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        let loaded: Vec<Account> = serde_json::from_slice(&raw)?;

        let mut accounts = self.accounts.write().expect("account store lock poisoned");
        *accounts = loaded
            .into_iter()
            .map(|account| (account.telegram_id, account))
            .collect();
        Ok(())
    }

    pub async fn save(&self) -> Result<()> {
        let Some(path) = &self.state_file else {
            return Ok(());
        };
        let snapshot: Vec<Account> = {
            let accounts = self.accounts.read().expect("account store lock poisoned");
            let mut all: Vec<Account> = accounts.values().cloned().collect();
            all.sort_by_key(|account| account.telegram_id);
            all
        };
        let raw = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(path, raw).await?;
        Ok(())
    }

    /// Creates or refreshes the account for a verified login. Profile fields
    /// follow the latest payload; the registration date of a returning user
    /// is preserved.
    pub async fn upsert_from_login(&self, payload: &LoginPayload) -> Result<Account> {
        let telegram_id = payload
            .id
            .ok_or_else(|| Error::Internal("login payload missing id".to_string()))?;
        let first_name = payload
            .first_name
            .clone()
            .ok_or_else(|| Error::Internal("login payload missing first_name".to_string()))?;
        let auth_date = payload
            .auth_date
            .and_then(time::from_unix_seconds)
            .ok_or_else(|| Error::BadRequest("Invalid auth_date".to_string()))?;

        let account = {
            let mut accounts = self.accounts.write().expect("account store lock poisoned");
            let registration_date = accounts
                .get(&telegram_id)
                .map(|existing| existing.registration_date)
                .unwrap_or_else(time::now);
            let balance = accounts
                .get(&telegram_id)
                .map(|existing| existing.balance)
                .unwrap_or(0.0);

            let account = Account {
                telegram_id,
                first_name,
                last_name: payload.last_name.clone(),
                username: payload.username.clone(),
                photo_url: payload.photo_url.clone(),
                auth_date,
                registration_date,
                balance,
            };
            accounts.insert(telegram_id, account.clone());
            account
        };

        self.save().await?;
        Ok(account)
    }

    pub fn get(&self, telegram_id: i64) -> Option<Account> {
        self.accounts
            .read()
            .expect("account store lock poisoned")
            .get(&telegram_id)
            .cloned()
    }

    pub async fn credit(&self, telegram_id: i64, amount: f64) -> Result<Account> {
        let account = {
            let mut accounts = self.accounts.write().expect("account store lock poisoned");
            let account = accounts
                .get_mut(&telegram_id)
                .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;
            account.balance += amount;
            account.clone()
        };

        self.save().await?;
        Ok(account)
    }

    /// Fails without touching the balance when funds are insufficient.
    pub async fn debit(&self, telegram_id: i64, amount: f64) -> Result<Account> {
        let account = {
            let mut accounts = self.accounts.write().expect("account store lock poisoned");
            let account = accounts
                .get_mut(&telegram_id)
                .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;
            if account.balance < amount {
                return Err(Error::BadRequest("Insufficient balance".to_string()));
            }
            account.balance -= amount;
            account.clone()
        };

        self.save().await?;
        Ok(account)
    }
}
