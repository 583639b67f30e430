#[macro_use]
extern crate lazy_static;

pub mod account;
pub mod engine_config;
pub mod logging;
pub mod test_utils;
pub mod utils;
