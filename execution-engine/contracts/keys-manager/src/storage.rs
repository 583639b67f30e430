use std::collections::BTreeMap;

use engine_shared::account::Account;
use types::{
    account::AccountHash,
    bytesrepr::{self, ToBytes},
    ApiError,
};

/// Persistent storage of accounts, keyed by account hash.
pub trait AccountStore {
    /// Reads the account stored under `account_hash`, if any.
    fn read(&self, account_hash: AccountHash) -> Result<Option<Account>, ApiError>;

    /// Stores `account` under its own hash, replacing any previous value.
    fn write(&mut self, account: Account) -> Result<(), ApiError>;
}

/// Account store holding serialized accounts in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: BTreeMap<AccountHash, Vec<u8>>,
}

impl InMemoryAccountStore {
    /// Creates an empty store.
    pub fn empty() -> Self {
        Default::default()
    }

    /// Creates a store from a given set of accounts.
    pub fn from_pairs(pairs: &[(AccountHash, Account)]) -> Result<Self, ApiError> {
        let mut store = InMemoryAccountStore::empty();
        for (account_hash, account) in pairs {
            store.accounts.insert(*account_hash, account.to_bytes()?);
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn read(&self, account_hash: AccountHash) -> Result<Option<Account>, ApiError> {
        match self.accounts.get(&account_hash) {
            None => Ok(None),
            Some(bytes) => Ok(Some(bytesrepr::deserialize(bytes.clone())?)),
        }
    }

    fn write(&mut self, account: Account) -> Result<(), ApiError> {
        let bytes = account.to_bytes()?;
        self.accounts.insert(account.account_hash(), bytes);
        Ok(())
    }
}
