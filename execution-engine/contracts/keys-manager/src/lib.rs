//! Manages the weighted keys associated with an account and the thresholds those keys must
//! reach to deploy or to manage keys.

pub mod api;
pub mod error;
pub mod key_manager;
pub mod keys_manager;
pub mod runtime_context;
pub mod storage;
pub mod threshold_manager;

pub use error::Error;
pub use keys_manager::execute;
