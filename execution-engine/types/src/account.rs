//! Contains types and constants associated with user accounts.

use std::fmt::{Debug, Display, Formatter};

use blake2::{
    digest::{Input, VariableOutput},
    VarBlake2b,
};
use failure::Fail;
use hex_fmt::HexFmt;

use crate::bytesrepr::{Error, FromBytes, ToBytes, U8_SERIALIZED_LENGTH};

/// The two classes of action an account guards with a threshold.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ActionType {
    /// Ordinary deploys signed on behalf of the account.
    Deployment,
    /// Changes to the associated keys or to either threshold.
    KeyManagement,
}

/// Reasons a threshold change is refused by the registry.
#[derive(Debug, Fail, PartialEq, Eq, Copy, Clone)]
pub enum SetThresholdFailure {
    /// The key management threshold would drop below the deployment threshold.
    #[fail(display = "New threshold should be greater than or equal to deployment threshold")]
    KeyManagementThreshold,
    /// The deployment threshold would rise above the key management threshold.
    #[fail(display = "New threshold should be lower than or equal to key management threshold")]
    DeploymentThreshold,
    /// No combination of associated keys could reach the new threshold.
    #[fail(
        display = "New threshold should be lower or equal than total weight of associated keys"
    )]
    InsufficientTotalWeight,
}

/// Maximum number of associated keys (i.e. map of [`AccountHash`]es to [`Weight`]s) for a
/// single account.
pub const MAX_ASSOCIATED_KEYS: usize = 10;

/// The number of bytes in a serialized [`Weight`].
pub const WEIGHT_SERIALIZED_LENGTH: usize = U8_SERIALIZED_LENGTH;

/// The weight attributed to a given [`AccountHash`] in an account's associated keys.
#[derive(PartialOrd, Ord, PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct Weight(u8);

impl Weight {
    /// The largest weight a single key can carry.
    pub const MAX: Weight = Weight(u8::max_value());

    /// Constructs a new `Weight`.
    pub const fn new(weight: u8) -> Weight {
        Weight(weight)
    }

    /// Returns the value of `self` as a `u8`.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Returns `true` for the zero weight, which is never stored against a key.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Display for Weight {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToBytes for Weight {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.0.to_bytes()
    }
}

impl FromBytes for Weight {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (byte, rem) = u8::from_bytes(bytes)?;
        Ok((Weight::new(byte), rem))
    }
}

/// The length in bytes of a [`PublicKey`].
pub const ED25519_LENGTH: usize = 32;

/// A type alias for the raw bytes of an Ed25519 public key.
pub type Ed25519Bytes = [u8; ED25519_LENGTH];

const ED25519_ALGORITHM_NAME: &str = "ed25519";

/// The public key of an Ed25519 key pair.
#[derive(PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy)]
pub struct PublicKey(Ed25519Bytes);

impl PublicKey {
    /// Constructs a new `PublicKey` using Ed25519 bytes.
    pub const fn ed25519_from(key: Ed25519Bytes) -> PublicKey {
        PublicKey(key)
    }

    /// Returns the raw bytes of the public key as a `slice`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "PublicKey(Ed25519({}))", HexFmt(&self.0))
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl ToBytes for PublicKey {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.0.to_bytes()
    }
}

impl FromBytes for PublicKey {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (bytes, rem) = <[u8; ED25519_LENGTH]>::from_bytes(bytes)?;
        Ok((PublicKey::ed25519_from(bytes), rem))
    }
}

/// The length in bytes of an [`AccountHash`].
pub const ACCOUNT_HASH_LENGTH: usize = 32;

/// Opaque identifier of an account or an associated key, derived from a [`PublicKey`].
#[derive(PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy)]
pub struct AccountHash([u8; ACCOUNT_HASH_LENGTH]);

impl AccountHash {
    /// Constructs a new `AccountHash` instance from the raw bytes of a hash.
    pub const fn new(value: [u8; ACCOUNT_HASH_LENGTH]) -> AccountHash {
        AccountHash(value)
    }

    /// Returns the raw bytes of the account hash as an array.
    pub fn value(&self) -> [u8; ACCOUNT_HASH_LENGTH] {
        self.0
    }

    /// Derives the account hash of a public key: BLAKE2b-256 over the algorithm name, a zero
    /// separator and the raw key bytes.
    pub fn from_public_key(public_key: &PublicKey) -> AccountHash {
        let algorithm_name = ED25519_ALGORITHM_NAME.as_bytes();
        let mut data = Vec::with_capacity(algorithm_name.len() + 1 + ED25519_LENGTH);
        data.extend_from_slice(algorithm_name);
        data.push(0);
        data.extend_from_slice(public_key.as_bytes());

        let mut ret = [0u8; ACCOUNT_HASH_LENGTH];
        // Safe to unwrap here because our digest length is constant and valid
        let mut hasher = VarBlake2b::new(ACCOUNT_HASH_LENGTH).unwrap();
        hasher.input(data);
        hasher.variable_result(|hash| ret.clone_from_slice(hash));
        AccountHash(ret)
    }
}

impl From<&PublicKey> for AccountHash {
    fn from(public_key: &PublicKey) -> Self {
        AccountHash::from_public_key(public_key)
    }
}

impl Display for AccountHash {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", HexFmt(&self.0))
    }
}

impl Debug for AccountHash {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "AccountHash({})", HexFmt(&self.0))
    }
}

impl ToBytes for AccountHash {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.0.to_bytes()
    }
}

impl FromBytes for AccountHash {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (bytes, rem) = <[u8; ACCOUNT_HASH_LENGTH]>::from_bytes(bytes)?;
        Ok((AccountHash::new(bytes), rem))
    }
}

/// Reasons a new key is refused by the registry.
#[derive(PartialEq, Eq, Fail, Debug, Copy, Clone)]
pub enum AddKeyFailure {
    /// The account already holds as many keys as it may.
    #[fail(display = "Unable to add new associated key because maximum amount of keys is reached")]
    MaxKeysLimit,
    /// The key is already associated with the account.
    #[fail(display = "Unable to add new associated key because given key already exists")]
    DuplicateKey,
}

/// Reasons a key removal is refused by the registry.
#[derive(Fail, Debug, Eq, PartialEq, Copy, Clone)]
pub enum RemoveKeyFailure {
    /// The key is not associated with the account.
    #[fail(display = "Unable to remove a key that does not exist")]
    MissingKey,
    /// The remaining keys could no longer reach one of the thresholds.
    #[fail(display = "Unable to remove a key which would violate action threshold constraints")]
    ThresholdViolation,
}

/// Reasons a weight change is refused by the registry.
#[derive(PartialEq, Eq, Fail, Debug, Copy, Clone)]
pub enum UpdateKeyFailure {
    /// The key is not associated with the account.
    #[fail(display = "Unable to update the value under an associated key that does not exist")]
    MissingKey,
    /// The lowered weight would leave the keys unable to reach one of the thresholds.
    #[fail(display = "Unable to update weight that would fall below any of action thresholds")]
    ThresholdViolation,
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::{bytesrepr, gens};

    proptest! {
        #[test]
        fn test_public_key(public_key in gens::public_key_arb()) {
            bytesrepr::test_serialization_roundtrip(&public_key);
            prop_assert_eq!(
                AccountHash::from_public_key(&public_key),
                AccountHash::from(&public_key)
            );
        }

        #[test]
        fn test_account_hash(account_hash in gens::account_hash_arb()) {
            bytesrepr::test_serialization_roundtrip(&account_hash);
        }

        #[test]
        fn test_weight(weight in gens::weight_arb()) {
            bytesrepr::test_serialization_roundtrip(&weight);
            prop_assert_eq!(weight.is_zero(), weight.value() == 0);
        }
    }
}
