use engine_shared::account::Account;
use types::account::{AccountHash, AddKeyFailure, RemoveKeyFailure, UpdateKeyFailure, Weight};

use crate::error::Error;

/// Adds, updates and removes the associated keys of an account on behalf of a caller.
///
/// Every change requires the caller's weight to reach the key management threshold the account
/// had when the manager was created. A weight of zero means the key should be removed, so no
/// zero-weight key is ever stored.
pub struct KeyManager<'a> {
    account: &'a mut Account,
    can_manage_keys: bool,
    max_keys: usize,
}

impl<'a> KeyManager<'a> {
    pub fn new(account: &'a mut Account, caller_weight: Weight, max_keys: usize) -> Self {
        let can_manage_keys = account.can_manage_keys(caller_weight);
        KeyManager {
            account,
            can_manage_keys,
            max_keys,
        }
    }

    /// Creates a manager for a caller already found to hold key management permission.
    pub(crate) fn authorized(account: &'a mut Account, max_keys: usize) -> Self {
        KeyManager {
            account,
            can_manage_keys: true,
            max_keys,
        }
    }

    /// Sets the weight of `key`, adding it if absent and removing it if `weight` is zero.
    pub fn set_key_weight(&mut self, key: AccountHash, weight: Weight) -> Result<(), Error> {
        if !self.can_manage_keys {
            return Err(Error::PermissionDenied);
        }
        if weight.is_zero() {
            self.remove_key_if_exists(key)
        } else {
            self.add_or_update_key(key, weight)
        }
    }

    fn add_or_update_key(&mut self, key: AccountHash, weight: Weight) -> Result<(), Error> {
        match self.account.update_associated_key(key, weight) {
            Ok(()) => Ok(()),
            Err(UpdateKeyFailure::MissingKey) => self.add_key(key, weight),
            Err(UpdateKeyFailure::ThresholdViolation) => Err(Error::ThresholdViolation),
        }
    }

    fn add_key(&mut self, key: AccountHash, weight: Weight) -> Result<(), Error> {
        self.account
            .add_associated_key(key, weight, self.max_keys)
            .map_err(|failure| match failure {
                AddKeyFailure::MaxKeysLimit => Error::MaxKeysLimit,
                // Unreachable after a failed update, kept to report corrupted state.
                AddKeyFailure::DuplicateKey => Error::DuplicateKey,
            })
    }

    fn remove_key_if_exists(&mut self, key: AccountHash) -> Result<(), Error> {
        match self.account.remove_associated_key(key) {
            Ok(()) | Err(RemoveKeyFailure::MissingKey) => Ok(()),
            Err(RemoveKeyFailure::ThresholdViolation) => Err(Error::ThresholdViolation),
        }
    }
}
