//! Configuration for the map layout.

/// Configuration for [`MapLayout`](super::MapLayout).
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Re-check every structural invariant after each mutation and panic on
    /// the first violation.
    ///
    /// The check is a linear pass over the collection. Enabled by default in
    /// debug builds.
    pub verify_invariants: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl LayoutConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable invariant verification.
    pub fn with_verify_invariants(mut self, verify: bool) -> Self {
        self.verify_invariants = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_follows_build_profile() {
        assert_eq!(LayoutConfig::default().verify_invariants, cfg!(debug_assertions));
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new().with_verify_invariants(true);
        assert!(config.verify_invariants);

        let config = config.with_verify_invariants(false);
        assert!(!config.verify_invariants);
    }
}
