//! Contains functions for generating arbitrary values for use by [`Proptest`](https://crates.io/crates/proptest).

use proptest::{collection::vec, prelude::*};

use crate::account::{AccountHash, PublicKey, Weight};

pub fn u8_slice_32() -> impl Strategy<Value = [u8; 32]> {
    vec(any::<u8>(), 32).prop_map(|b| {
        let mut res = [0u8; 32];
        res.clone_from_slice(b.as_slice());
        res
    })
}

pub fn public_key_arb() -> impl Strategy<Value = PublicKey> {
    u8_slice_32().prop_map(PublicKey::ed25519_from)
}

pub fn account_hash_arb() -> impl Strategy<Value = AccountHash> {
    u8_slice_32().prop_map(AccountHash::new)
}

pub fn weight_arb() -> impl Strategy<Value = Weight> {
    any::<u8>().prop_map(Weight::new)
}

/// Weights which may legally be stored against a key.
pub fn non_zero_weight_arb() -> impl Strategy<Value = Weight> {
    (1..=u8::max_value()).prop_map(Weight::new)
}
