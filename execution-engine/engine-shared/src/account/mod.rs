mod action_thresholds;
mod associated_keys;

use std::collections::BTreeSet;

use types::{
    account::{
        AccountHash, ActionType, AddKeyFailure, RemoveKeyFailure, SetThresholdFailure,
        UpdateKeyFailure, Weight,
    },
    bytesrepr::{Error, FromBytes, ToBytes},
};

pub use action_thresholds::ActionThresholds;
pub use associated_keys::AssociatedKeys;

/// The access-control record of one account: its weighted associated keys and the thresholds
/// guarding deployments and key management.
///
/// Every mutator checks its invariants before touching state, so a failed call leaves the
/// account exactly as it was.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Account {
    account_hash: AccountHash,
    associated_keys: AssociatedKeys,
    action_thresholds: ActionThresholds,
}

impl Account {
    pub fn new(
        account_hash: AccountHash,
        associated_keys: AssociatedKeys,
        action_thresholds: ActionThresholds,
    ) -> Self {
        Account {
            account_hash,
            associated_keys,
            action_thresholds,
        }
    }

    /// Creates a fresh account whose own key carries the maximal weight and both thresholds
    /// are 1.
    pub fn create(account_hash: AccountHash) -> Self {
        let associated_keys = AssociatedKeys::new(account_hash, Weight::MAX);
        let action_thresholds: ActionThresholds = Default::default();
        Account::new(account_hash, associated_keys, action_thresholds)
    }

    pub fn account_hash(&self) -> AccountHash {
        self.account_hash
    }

    pub fn get_associated_keys(&self) -> impl Iterator<Item = (&AccountHash, &Weight)> {
        self.associated_keys.iter()
    }

    pub fn associated_keys(&self) -> &AssociatedKeys {
        &self.associated_keys
    }

    pub fn action_thresholds(&self) -> &ActionThresholds {
        &self.action_thresholds
    }

    pub fn get_associated_key_weight(&self, account_hash: AccountHash) -> Option<&Weight> {
        self.associated_keys.get(&account_hash)
    }

    pub fn add_associated_key(
        &mut self,
        account_hash: AccountHash,
        weight: Weight,
        max_keys: usize,
    ) -> Result<(), AddKeyFailure> {
        self.associated_keys.add_key(account_hash, weight, max_keys)
    }

    /// Checks if removing given key would properly satisfy thresholds.
    fn can_remove_key(&self, account_hash: AccountHash) -> bool {
        let total_weight_without = self
            .associated_keys
            .total_keys_weight_excluding(account_hash);

        // Returns true if the total weight calculated without given public key would be greater or
        // equal to all of the thresholds.
        total_weight_without >= *self.action_thresholds().deployment()
            && total_weight_without >= *self.action_thresholds().key_management()
    }

    /// Checks if adding a weight to a sum of all weights excluding the given key would make the
    /// resulting value to fall below any of the thresholds on account.
    fn can_update_key(&self, account_hash: AccountHash, weight: Weight) -> bool {
        // Calculates total weight of all keys excluding the given key
        let total_weight = self
            .associated_keys
            .total_keys_weight_excluding(account_hash);

        // Safely calculate new weight by adding the updated weight
        let new_weight = total_weight.value().saturating_add(weight.value());

        // Returns true if the new weight would be greater or equal to all of
        // the thresholds.
        new_weight >= self.action_thresholds().deployment().value()
            && new_weight >= self.action_thresholds().key_management().value()
    }

    pub fn remove_associated_key(
        &mut self,
        account_hash: AccountHash,
    ) -> Result<(), RemoveKeyFailure> {
        if self.associated_keys.contains_key(&account_hash) {
            // Check if removing this weight would fall below thresholds
            if !self.can_remove_key(account_hash) {
                return Err(RemoveKeyFailure::ThresholdViolation);
            }
        }
        self.associated_keys.remove_key(&account_hash)
    }

    pub fn update_associated_key(
        &mut self,
        account_hash: AccountHash,
        weight: Weight,
    ) -> Result<(), UpdateKeyFailure> {
        if let Some(current_weight) = self.associated_keys.get(&account_hash) {
            if weight < *current_weight {
                // New weight is smaller than current weight
                if !self.can_update_key(account_hash, weight) {
                    return Err(UpdateKeyFailure::ThresholdViolation);
                }
            }
        }
        self.associated_keys.update_key(account_hash, weight)
    }

    pub fn set_action_threshold(
        &mut self,
        action_type: ActionType,
        weight: Weight,
    ) -> Result<(), SetThresholdFailure> {
        // Verify if new threshold weight exceeds total weight of all associated
        // keys.
        self.can_set_threshold(weight)?;
        // Set new weight for given action
        self.action_thresholds.set_threshold(action_type, weight)
    }

    /// Verifies if user can set action threshold
    pub fn can_set_threshold(&self, new_threshold: Weight) -> Result<(), SetThresholdFailure> {
        let total_weight = self.associated_keys.total_keys_weight();
        if new_threshold > total_weight {
            return Err(SetThresholdFailure::InsufficientTotalWeight);
        }
        Ok(())
    }

    /// Sum of the weights of those authorization keys associated with this account.
    pub fn authorization_weight(&self, authorization_keys: &BTreeSet<AccountHash>) -> Weight {
        self.associated_keys
            .calculate_keys_weight(authorization_keys)
    }

    /// Checks whether a caller of the given weight may change keys or thresholds.
    pub fn can_manage_keys(&self, caller_weight: Weight) -> bool {
        caller_weight >= *self.action_thresholds().key_management()
    }
}

impl ToBytes for Account {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result: Vec<u8> = Vec::new();
        result.append(&mut self.account_hash.to_bytes()?);
        result.append(&mut self.associated_keys.to_bytes()?);
        result.append(&mut self.action_thresholds.to_bytes()?);
        Ok(result)
    }
}

impl FromBytes for Account {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (account_hash, rem): (AccountHash, &[u8]) = FromBytes::from_bytes(bytes)?;
        let (associated_keys, rem): (AssociatedKeys, &[u8]) = FromBytes::from_bytes(rem)?;
        let (action_thresholds, rem): (ActionThresholds, &[u8]) = FromBytes::from_bytes(rem)?;
        Ok((
            Account {
                account_hash,
                associated_keys,
                action_thresholds,
            },
            rem,
        ))
    }
}

#[cfg(any(feature = "gens", test))]
pub mod gens {
    use proptest::prelude::*;

    use types::{
        account::{Weight, MAX_ASSOCIATED_KEYS},
        gens::account_hash_arb,
    };

    use super::*;
    use crate::account::{
        action_thresholds::gens::action_thresholds_arb, associated_keys::gens::associated_keys_arb,
    };

    prop_compose! {
        pub fn account_arb()(
            account_hash in account_hash_arb(),
            thresholds in action_thresholds_arb(),
            mut associated_keys in associated_keys_arb(MAX_ASSOCIATED_KEYS - 1),
        ) -> Account {
            // An arbitrary hash colliding with a generated key is harmless here.
            let _ = associated_keys.add_key(account_hash, Weight::new(1), MAX_ASSOCIATED_KEYS);
            Account::new(
                account_hash,
                associated_keys,
                thresholds,
            )
        }
    }
}


#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, iter::FromIterator};

    use types::account::{
        AccountHash, ActionType, RemoveKeyFailure, SetThresholdFailure, UpdateKeyFailure, Weight,
        MAX_ASSOCIATED_KEYS,
    };

    use super::*;

    fn keys_with(identity_key: AccountHash, weights: &[(AccountHash, u8)]) -> AssociatedKeys {
        let mut res = AssociatedKeys::new(identity_key, Weight::new(1));
        for (key, weight) in weights {
            res.add_key(*key, Weight::new(*weight), MAX_ASSOCIATED_KEYS)
                .expect("should add key");
        }
        res
    }

    #[test]
    fn created_account_has_single_maximal_key() {
        let account_hash = AccountHash::new([7u8; 32]);
        let account = Account::create(account_hash);
        let keys: Vec<(AccountHash, Weight)> = account
            .get_associated_keys()
            .map(|(key, weight)| (*key, *weight))
            .collect();
        assert_eq!(keys, vec![(account_hash, Weight::MAX)]);
        assert_eq!(*account.action_thresholds(), ActionThresholds::default());
    }

    #[test]
    fn caller_weight_counts_only_associated_signers() {
        let associated_keys = keys_with(
            AccountHash::new([1u8; 32]),
            &[
                (AccountHash::new([2u8; 32]), 11),
                (AccountHash::new([3u8; 32]), 11),
                (AccountHash::new([4u8; 32]), 11),
            ],
        );
        let account = Account::new(
            AccountHash::new([0u8; 32]),
            associated_keys,
            ActionThresholds::new(Weight::new(11), Weight::new(33))
                .expect("should create thresholds"),
        );

        // sum: 22, required 33 - can't manage
        let weight = account.authorization_weight(&BTreeSet::from_iter(vec![
            AccountHash::new([3u8; 32]),
            AccountHash::new([2u8; 32]),
            AccountHash::new([42u8; 32]),
        ]));
        assert_eq!(weight, Weight::new(22));
        assert!(!account.can_manage_keys(weight));

        // sum: 34, required 33 - can manage
        let weight = account.authorization_weight(&BTreeSet::from_iter(vec![
            AccountHash::new([2u8; 32]),
            AccountHash::new([1u8; 32]),
            AccountHash::new([4u8; 32]),
            AccountHash::new([3u8; 32]),
        ]));
        assert_eq!(weight, Weight::new(34));
        assert!(account.can_manage_keys(weight));

        assert_eq!(account.authorization_weight(&BTreeSet::new()), Weight::new(0));
        assert!(account.can_manage_keys(Weight::new(33)));
        assert!(!account.can_manage_keys(Weight::new(32)));
    }

    #[test]
    fn set_action_threshold_higher_than_total_weight() {
        let associated_keys = keys_with(
            AccountHash::new([1u8; 32]),
            &[
                (AccountHash::new([2u8; 32]), 2),
                (AccountHash::new([3u8; 32]), 3),
                (AccountHash::new([4u8; 32]), 4),
            ],
        );
        let mut account = Account::new(
            AccountHash::new([0u8; 32]),
            associated_keys,
            ActionThresholds::new(Weight::new(1), Weight::new(1))
                .expect("should create thresholds"),
        );

        assert_eq!(
            account
                .set_action_threshold(ActionType::KeyManagement, Weight::new(1 + 2 + 3 + 4 + 1))
                .unwrap_err(),
            SetThresholdFailure::InsufficientTotalWeight,
        );
        assert_eq!(
            account
                .set_action_threshold(ActionType::Deployment, Weight::new(1 + 2 + 3 + 4 + 245))
                .unwrap_err(),
            SetThresholdFailure::InsufficientTotalWeight,
        );
        account
            .set_action_threshold(ActionType::KeyManagement, Weight::new(1 + 2 + 3 + 4))
            .expect("threshold equal to total weight is reachable");
    }

    #[test]
    fn set_action_threshold_checks_weight_before_ordering() {
        let mut account = Account::new(
            AccountHash::new([0u8; 32]),
            keys_with(AccountHash::new([1u8; 32]), &[]),
            ActionThresholds::default(),
        );
        // Both rules are broken: 5 > total weight 1, and 5 > key management 1.
        assert_eq!(
            account
                .set_action_threshold(ActionType::Deployment, Weight::new(5))
                .unwrap_err(),
            SetThresholdFailure::InsufficientTotalWeight,
        );
    }

    #[test]
    fn remove_key_would_violate_action_thresholds() {
        let key_3 = AccountHash::new([4u8; 32]);
        let associated_keys = keys_with(
            AccountHash::new([1u8; 32]),
            &[
                (AccountHash::new([2u8; 32]), 2),
                (AccountHash::new([3u8; 32]), 3),
                (key_3, 4),
            ],
        );
        let mut account = Account::new(
            AccountHash::new([0u8; 32]),
            associated_keys,
            ActionThresholds::new(Weight::new(1 + 2 + 3 + 4), Weight::new(1 + 2 + 3 + 4))
                .expect("should create thresholds"),
        );

        assert_eq!(
            account.remove_associated_key(key_3).unwrap_err(),
            RemoveKeyFailure::ThresholdViolation,
        )
    }

    #[test]
    fn remove_missing_key_reports_missing_key() {
        let mut account = Account::create(AccountHash::new([1u8; 32]));
        let before = account.clone();
        assert_eq!(
            account
                .remove_associated_key(AccountHash::new([9u8; 32]))
                .unwrap_err(),
            RemoveKeyFailure::MissingKey,
        );
        assert_eq!(account, before);
    }

    #[test]
    fn updating_key_would_violate_action_thresholds() {
        let identity_key = AccountHash::new([1u8; 32]);
        let identity_key_weight = Weight::new(1);
        let key_1 = AccountHash::new([2u8; 32]);
        let key_1_weight = Weight::new(2);
        let key_2 = AccountHash::new([3u8; 32]);
        let key_2_weight = Weight::new(3);
        let key_3 = AccountHash::new([4u8; 32]);
        let key_3_weight = Weight::new(4);
        let associated_keys = {
            let mut res = AssociatedKeys::new(identity_key, identity_key_weight);
            res.add_key(key_1, key_1_weight, MAX_ASSOCIATED_KEYS)
                .expect("should add key 1");
            res.add_key(key_2, key_2_weight, MAX_ASSOCIATED_KEYS)
                .expect("should add key 2");
            res.add_key(key_3, key_3_weight, MAX_ASSOCIATED_KEYS)
                .expect("should add key 3");
            // 1 + 2 + 3 + 4
            res
        };

        let deployment_threshold = Weight::new(
            identity_key_weight.value()
                + key_1_weight.value()
                + key_2_weight.value()
                + key_3_weight.value(),
        );
        let key_management_threshold = Weight::new(deployment_threshold.value());
        let mut account = Account::new(
            identity_key,
            associated_keys,
            ActionThresholds::new(deployment_threshold, key_management_threshold)
                .expect("should create thresholds"),
        );

        // Decreases by 3
        assert_eq!(
            account
                .clone()
                .update_associated_key(key_3, Weight::new(1))
                .unwrap_err(),
            UpdateKeyFailure::ThresholdViolation,
        );

        // increase total weight (12)
        account
            .update_associated_key(identity_key, Weight::new(3))
            .unwrap();

        // variant a) decrease total weight by 1 (total 11)
        account
            .clone()
            .update_associated_key(key_3, Weight::new(3))
            .unwrap();
        // variant b) decrease total weight by 3 (total 9) - fail
        assert_eq!(
            account
                .update_associated_key(key_3, Weight::new(1))
                .unwrap_err(),
            UpdateKeyFailure::ThresholdViolation
        );
    }

    #[test]
    fn overflowing_should_allow_removal() {
        let identity_key = AccountHash::new([42; 32]);
        let key_1 = AccountHash::new([2u8; 32]);
        let key_2 = AccountHash::new([3u8; 32]);

        let associated_keys = {
            // Identity
            let mut res = AssociatedKeys::new(identity_key, Weight::new(1));

            // Spare key
            res.add_key(key_1, Weight::new(2), MAX_ASSOCIATED_KEYS)
                .expect("should add key 1");
            // Big key
            res.add_key(key_2, Weight::new(255), MAX_ASSOCIATED_KEYS)
                .expect("should add key 2");

            res
        };

        let mut account = Account::new(
            identity_key,
            associated_keys,
            ActionThresholds::new(Weight::new(1), Weight::new(254))
                .expect("should create thresholds"),
        );

        account.remove_associated_key(key_1).expect("should work")
    }

    #[test]
    fn overflowing_should_allow_updating() {
        let identity_key = AccountHash::new([1; 32]);
        let identity_key_weight = Weight::new(1);
        let key_1 = AccountHash::new([2u8; 32]);
        let key_1_weight = Weight::new(3);
        let key_2 = AccountHash::new([3u8; 32]);
        let key_2_weight = Weight::new(255);
        let deployment_threshold = Weight::new(1);
        let key_management_threshold = Weight::new(254);

        let associated_keys = {
            // Identity
            let mut res = AssociatedKeys::new(identity_key, identity_key_weight);

            // Spare key
            res.add_key(key_1, key_1_weight, MAX_ASSOCIATED_KEYS)
                .expect("should add key 1");
            // Big key
            res.add_key(key_2, key_2_weight, MAX_ASSOCIATED_KEYS)
                .expect("should add key 2");

            res
        };

        let mut account = Account::new(
            identity_key,
            associated_keys,
            ActionThresholds::new(deployment_threshold, key_management_threshold)
                .expect("should create thresholds"),
        );

        // decrease so total weight would be changed from 1 + 3 + 255 to 1 + 1 + 255
        account
            .update_associated_key(key_1, Weight::new(1))
            .expect("should work");
    }
}
