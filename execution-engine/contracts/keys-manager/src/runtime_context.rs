use std::collections::BTreeSet;

use engine_shared::{account::Account, engine_config::EngineConfig};
use types::{
    account::{AccountHash, Weight},
    ApiError,
};

use crate::{error::Error, storage::AccountStore};

/// Holds the state of a single keys manager invocation: the account it runs against, the keys
/// which signed the request and the store the account lives in.
pub struct RuntimeContext<'a, S> {
    store: &'a mut S,
    account_hash: AccountHash,
    authorization_keys: BTreeSet<AccountHash>,
    config: EngineConfig,
}

impl<'a, S> RuntimeContext<'a, S>
where
    S: AccountStore,
{
    pub fn new(
        store: &'a mut S,
        account_hash: AccountHash,
        authorization_keys: BTreeSet<AccountHash>,
        config: EngineConfig,
    ) -> Self {
        RuntimeContext {
            store,
            account_hash,
            authorization_keys,
            config,
        }
    }

    pub fn account_hash(&self) -> AccountHash {
        self.account_hash
    }

    /// Reads the account this invocation runs against.
    pub fn read_account(&self) -> Result<Account, ApiError> {
        self.store
            .read(self.account_hash)?
            .ok_or(ApiError::ValueNotFound)
    }

    /// Weight the signing keys carry on `account`. Keys not associated with it count as zero.
    pub fn caller_weight(&self, account: &Account) -> Weight {
        account.authorization_weight(&self.authorization_keys)
    }

    /// Applies `action` to a working copy of the account and writes the copy back only if the
    /// action succeeds.
    ///
    /// The action receives the caller weight, computed once against the account as stored on
    /// entry, and the configured key limit.
    pub fn modify_account<F>(&mut self, action: F) -> Result<(), ApiError>
    where
        F: FnOnce(&mut Account, Weight, usize) -> Result<(), Error>,
    {
        let mut account = self.read_account()?;
        let caller_weight = self.caller_weight(&account);
        action(
            &mut account,
            caller_weight,
            self.config.max_associated_keys(),
        )?;
        self.store.write(account)
    }
}
