//! Types shared by the keys manager: account primitives, the failures raised while managing
//! associated keys and action thresholds, and the byte representation used at the call
//! boundary.

pub mod account;
pub mod api_error;
pub mod bytesrepr;
#[cfg(any(feature = "gens", test))]
pub mod gens;
mod runtime_args;

pub use api_error::ApiError;
pub use runtime_args::{Named, RuntimeArgs};
