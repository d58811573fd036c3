//! Table sizing policy and its validation.

use thiserror::Error;

/// Bucket count of a freshly built table; also the floor for shrinking.
pub const INITIAL_CAPACITY: usize = 16;

/// Grow (double) once `len / capacity` reaches this ratio.
pub const LOAD_FACTOR: f64 = 0.75;

/// Shrink (halve) once `len / capacity` falls to this ratio.
pub const SHRINK_FACTOR: f64 = 0.25;

/// Rejected table configurations.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("initial capacity must be non-zero")]
    ZeroCapacity,
    #[error("initial capacity {0} is not a power of two")]
    CapacityNotPowerOfTwo(usize),
    #[error("load factor {0} must be finite and positive")]
    InvalidLoadFactor(f64),
    #[error("load factor {load} over {capacity} buckets must allow more than half a key")]
    LoadFactorBelowOneKey { load: f64, capacity: usize },
    #[error("shrink factor {shrink} must be finite, non-negative and below {load} / 2")]
    InvalidShrinkFactor { shrink: f64, load: f64 },
}

/// Resize policy for a `ChainedHashTable`.
///
/// `initial_capacity` is both the starting bucket count and the smallest
/// capacity a shrink may reach. Capacities move only by doubling and
/// halving, so the table capacity is always `initial_capacity * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub load_factor: f64,
    pub shrink_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: INITIAL_CAPACITY,
            load_factor: LOAD_FACTOR,
            shrink_factor: SHRINK_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn with_shrink_factor(mut self, shrink_factor: f64) -> Self {
        self.shrink_factor = shrink_factor;
        self
    }

    /// Checks the policy can never oscillate: a grow leaves the table at
    /// `load / 2`, a shrink at `2 * shrink`, and both must land strictly
    /// inside `(shrink, load)`.
    ///
    /// A grow fires at `ceil(load * c)` keys and moves one step, to `2c`.
    /// That lands below `load` only while `load * c > 0.5`, and `c` never
    /// drops below `initial_capacity`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.initial_capacity.is_power_of_two() {
            return Err(ConfigError::CapacityNotPowerOfTwo(self.initial_capacity));
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        if self.load_factor * self.initial_capacity as f64 <= 0.5 {
            return Err(ConfigError::LoadFactorBelowOneKey {
                load: self.load_factor,
                capacity: self.initial_capacity,
            });
        }
        if !self.shrink_factor.is_finite()
            || self.shrink_factor < 0.0
            || 2.0 * self.shrink_factor >= self.load_factor
        {
            return Err(ConfigError::InvalidShrinkFactor {
                shrink: self.shrink_factor,
                load: self.load_factor,
            });
        }
        Ok(())
    }

    pub(crate) fn should_grow(&self, len: usize, capacity: usize) -> bool {
        len as f64 >= self.load_factor * capacity as f64
    }

    pub(crate) fn should_shrink(&self, len: usize, capacity: usize) -> bool {
        capacity > self.initial_capacity && len as f64 <= self.shrink_factor * capacity as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let c = TableConfig::default();
        assert_eq!(c.initial_capacity, 16);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_zero_and_non_power_of_two_capacity() {
        let zero = TableConfig::new().with_initial_capacity(0);
        assert_eq!(zero.validate(), Err(ConfigError::ZeroCapacity));

        let odd = TableConfig::new().with_initial_capacity(12);
        assert_eq!(odd.validate(), Err(ConfigError::CapacityNotPowerOfTwo(12)));

        assert!(TableConfig::new().with_initial_capacity(1).validate().is_ok());
    }

    #[test]
    fn rejects_bad_load_factors() {
        for lf in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let c = TableConfig::new().with_load_factor(lf);
            assert!(
                matches!(c.validate(), Err(ConfigError::InvalidLoadFactor(_))),
                "load factor {lf} should be rejected"
            );
        }
        // Chaining tolerates more keys than buckets.
        let dense = TableConfig::new().with_load_factor(2.0);
        assert!(dense.validate().is_ok());
    }

    /// Invariant: one doubling after the first key brings the load back
    /// under the load factor.
    #[test]
    fn rejects_load_factor_one_doubling_cannot_satisfy() {
        let tiny = TableConfig::new()
            .with_load_factor(0.01)
            .with_shrink_factor(0.0);
        assert_eq!(
            tiny.validate(),
            Err(ConfigError::LoadFactorBelowOneKey {
                load: 0.01,
                capacity: 16
            })
        );

        // 0.5 * 1 == 0.5: the first key fills the lone bucket's budget and
        // two buckets leave it exactly at the bound.
        let edge = TableConfig::new()
            .with_initial_capacity(1)
            .with_load_factor(0.5)
            .with_shrink_factor(0.0);
        assert!(matches!(
            edge.validate(),
            Err(ConfigError::LoadFactorBelowOneKey { .. })
        ));

        let ok = TableConfig::new()
            .with_initial_capacity(1)
            .with_load_factor(0.6)
            .with_shrink_factor(0.0);
        assert!(ok.validate().is_ok());
        assert!(TableConfig::new()
            .with_load_factor(0.04)
            .with_shrink_factor(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_shrink_factor_that_would_oscillate() {
        let c = TableConfig::new().with_shrink_factor(0.375);
        assert_eq!(
            c.validate(),
            Err(ConfigError::InvalidShrinkFactor {
                shrink: 0.375,
                load: 0.75
            })
        );
        assert!(TableConfig::new()
            .with_shrink_factor(-0.1)
            .validate()
            .is_err());
        // Zero disables shrinking entirely.
        assert!(TableConfig::new().with_shrink_factor(0.0).validate().is_ok());
    }

    #[test]
    fn grow_and_shrink_thresholds() {
        let c = TableConfig::default();
        assert!(!c.should_grow(11, 16));
        assert!(c.should_grow(12, 16));

        assert!(!c.should_shrink(4, 16), "never below the initial capacity");
        assert!(c.should_shrink(8, 32));
        assert!(!c.should_shrink(9, 32));
    }

    #[test]
    fn error_messages_name_the_offending_value() {
        let msg = ConfigError::CapacityNotPowerOfTwo(12).to_string();
        assert!(msg.contains("12"), "{msg}");
    }
}
