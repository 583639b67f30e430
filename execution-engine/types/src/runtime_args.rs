//! Home of RuntimeArgs for calling contracts

use crate::bytesrepr::{self, Error, FromBytes, ToBytes};

/// Named argument to a contract: a name and the serialized bytes of its value.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Named(String, Vec<u8>);

impl Named {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn value_bytes(&self) -> &[u8] {
        &self.1
    }
}

impl ToBytes for Named {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = self.0.to_bytes()?;
        result.append(&mut self.1.to_bytes()?);
        Ok(result)
    }
}

impl FromBytes for Named {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (name, rem) = String::from_bytes(bytes)?;
        let (value, rem) = Vec::<u8>::from_bytes(rem)?;
        Ok((Named(name, value), rem))
    }
}

/// Represents a collection of named arguments passed to a smart contract.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct RuntimeArgs(Vec<Named>);

impl RuntimeArgs {
    /// Create an empty [`RuntimeArgs`] instance.
    pub fn new() -> RuntimeArgs {
        RuntimeArgs::default()
    }

    /// Gets the serialized bytes of an argument by its name.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.0
            .iter()
            .find(|named| named.name() == name)
            .map(Named::value_bytes)
    }

    /// Gets an argument by its name and deserializes it, rejecting trailing bytes.
    ///
    /// Returns `None` if the argument is absent.
    pub fn get_typed<T: FromBytes>(&self, name: &str) -> Option<Result<T, Error>> {
        self.get(name)
            .map(|bytes| bytesrepr::deserialize(bytes.to_vec()))
    }

    /// Get length of the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if collection of arguments is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert new named argument into the collection.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Result<(), Error>
    where
        K: Into<String>,
        V: ToBytes,
    {
        let bytes = value.into_bytes()?;
        self.0.push(Named(key.into(), bytes));
        Ok(())
    }

    /// Insert a named argument whose value is already serialized.
    pub fn insert_bytes<K: Into<String>>(&mut self, key: K, bytes: Vec<u8>) {
        self.0.push(Named(key.into(), bytes));
    }
}

impl ToBytes for RuntimeArgs {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.0.to_bytes()
    }
}

impl FromBytes for RuntimeArgs {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (args, rem) = Vec::<Named>::from_bytes(bytes)?;
        Ok((RuntimeArgs(args), rem))
    }
}

/// Builds [`RuntimeArgs`] from `name => value` pairs.
///
/// Panics if a value cannot be serialized, so it is meant for callers assembling requests
/// from known-good values.
#[macro_export]
macro_rules! runtime_args {
    () => ($crate::RuntimeArgs::new());
    ( $($key:expr => $value:expr,)+ ) => ($crate::runtime_args!($($key => $value),+));
    ( $($key:expr => $value:expr),* ) => {
        {
            let mut named_args = $crate::RuntimeArgs::new();
            $(
                named_args
                    .insert($key, $value)
                    .expect("should serialize runtime argument");
            )*
            named_args
        }
    };
}
