//! Some functions to use in tests.
use std::collections::BTreeMap;

use types::account::{AccountHash, PublicKey, Weight};

use crate::account::{Account, ActionThresholds, AssociatedKeys};

/// Returns a freshly created account for the given public key, paired with its hash.
pub fn mocked_account(public_key: PublicKey) -> (AccountHash, Account) {
    let account_hash = AccountHash::from_public_key(&public_key);
    (account_hash, Account::create(account_hash))
}

/// Returns an account holding exactly the given keys and thresholds.
///
/// Panics on inconsistent input, since it only builds fixtures.
pub fn account_with_keys(
    account_hash: AccountHash,
    keys: &[(AccountHash, Weight)],
    deployment: Weight,
    key_management: Weight,
) -> Account {
    let associated_keys: AssociatedKeys = keys.iter().cloned().collect::<BTreeMap<_, _>>().into();
    let action_thresholds =
        ActionThresholds::new(deployment, key_management).expect("thresholds should be ordered");
    Account::new(account_hash, associated_keys, action_thresholds)
}
