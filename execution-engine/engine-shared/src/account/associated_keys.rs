use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

use types::{
    account::{AccountHash, AddKeyFailure, RemoveKeyFailure, UpdateKeyFailure, Weight},
    bytesrepr::{Error, FromBytes, ToBytes},
};

/// Map of signing keys associated with an account to the weight each contributes.
#[derive(Default, PartialOrd, Ord, PartialEq, Eq, Clone, Debug)]
pub struct AssociatedKeys(BTreeMap<AccountHash, Weight>);

impl AssociatedKeys {
    pub fn new(key: AccountHash, weight: Weight) -> AssociatedKeys {
        let mut bt: BTreeMap<AccountHash, Weight> = BTreeMap::new();
        bt.insert(key, weight);
        AssociatedKeys(bt)
    }

    /// Adds new AssociatedKey to the set, refusing once `max_keys` keys are held.
    pub fn add_key(
        &mut self,
        key: AccountHash,
        weight: Weight,
        max_keys: usize,
    ) -> Result<(), AddKeyFailure> {
        if self.0.len() >= max_keys {
            return Err(AddKeyFailure::MaxKeysLimit);
        }
        match self.0.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(weight);
                Ok(())
            }
            Entry::Occupied(_) => Err(AddKeyFailure::DuplicateKey),
        }
    }

    /// Removes key from the associated keys set.
    pub fn remove_key(&mut self, key: &AccountHash) -> Result<(), RemoveKeyFailure> {
        self.0
            .remove(key)
            .map(|_| ())
            .ok_or(RemoveKeyFailure::MissingKey)
    }

    /// Replaces the weight of an existing key.
    pub fn update_key(&mut self, key: AccountHash, weight: Weight) -> Result<(), UpdateKeyFailure> {
        match self.0.get_mut(&key) {
            Some(current) => {
                *current = weight;
                Ok(())
            }
            None => Err(UpdateKeyFailure::MissingKey),
        }
    }

    pub fn get(&self, key: &AccountHash) -> Option<&Weight> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &AccountHash) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AccountHash, &Weight)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Helper method that calculates weight for keys that comes from any source.
    ///
    /// This method is not concerned about uniqueness of the passed iterable. Uniqueness is
    /// determined based on the input collection properties, which is either BTreeSet (in
    /// [`AssociatedKeys::calculate_keys_weight`]) or BTreeMap (in
    /// [`AssociatedKeys::total_keys_weight`]). Sums saturate at [`Weight::MAX`].
    fn calculate_any_keys_weight<'a>(&self, keys: impl Iterator<Item = &'a AccountHash>) -> Weight {
        let total = keys
            .filter_map(|key| self.0.get(key))
            .fold(0u8, |acc, w| acc.saturating_add(w.value()));

        Weight::new(total)
    }

    /// Calculates total weight of authorization keys provided by an argument
    pub fn calculate_keys_weight(&self, authorization_keys: &BTreeSet<AccountHash>) -> Weight {
        self.calculate_any_keys_weight(authorization_keys.iter())
    }

    /// Calculates total weight of all authorization keys
    pub fn total_keys_weight(&self) -> Weight {
        self.calculate_any_keys_weight(self.0.keys())
    }

    /// Calculates total weight of all authorization keys excluding a given key
    pub fn total_keys_weight_excluding(&self, account_hash: AccountHash) -> Weight {
        self.calculate_any_keys_weight(self.0.keys().filter(|&&element| element != account_hash))
    }
}

impl From<BTreeMap<AccountHash, Weight>> for AssociatedKeys {
    fn from(associated_keys: BTreeMap<AccountHash, Weight>) -> Self {
        AssociatedKeys(associated_keys)
    }
}

impl ToBytes for AssociatedKeys {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.0.to_bytes()
    }
}

impl FromBytes for AssociatedKeys {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (keys_map, rem): (BTreeMap<AccountHash, Weight>, &[u8]) =
            FromBytes::from_bytes(bytes)?;
        if keys_map.values().any(|weight| weight.is_zero()) {
            return Err(Error::FormattingError);
        }
        Ok((AssociatedKeys(keys_map), rem))
    }
}

#[cfg(any(feature = "gens", test))]
pub mod gens {
    use proptest::prelude::*;

    use types::gens::{account_hash_arb, non_zero_weight_arb};

    use super::AssociatedKeys;

    pub fn associated_keys_arb(size: usize) -> impl Strategy<Value = AssociatedKeys> {
        proptest::collection::btree_map(account_hash_arb(), non_zero_weight_arb(), size)
            .prop_map(AssociatedKeys::from)
    }
}
