use types::account::MAX_ASSOCIATED_KEYS;

/// The runtime configuration of the keys manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    max_associated_keys: usize,
}

impl EngineConfig {
    /// Creates a new engine configuration with default parameters.
    pub fn new() -> EngineConfig {
        Default::default()
    }

    /// Sets the upper bound on the number of keys an account may hold.
    pub fn with_max_associated_keys(mut self, max_associated_keys: usize) -> EngineConfig {
        self.max_associated_keys = max_associated_keys;
        self
    }

    pub fn max_associated_keys(&self) -> usize {
        self.max_associated_keys
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_associated_keys: MAX_ASSOCIATED_KEYS,
        }
    }
}
