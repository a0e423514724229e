//! Configuration for a queueing network run
//!
//! This module provides the parameters that control one simulation run:
//! the horizon, the random seed and the tolerance applied when checking
//! route probabilities.

use super::errors::ConfigError;
use super::types::SimTime;

/// Default tolerance when checking that route probabilities sum to one
pub const DEFAULT_PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Configuration for simulation execution
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// End-of-simulation timestamp; no arrival is generated after it
    pub end_time: SimTime,
    /// Seed for the run's random source. A fresh seed is drawn when None.
    pub seed: Option<u64>,
    /// Allowed distance of a station's probability total from 1.0
    pub probability_tolerance: f64,
}

impl SimulationConfig {
    /// Create a new configuration ending at `end_time`
    ///
    /// Defaults to an unseeded run and a tolerance of 1e-9
    pub fn new(end_time: SimTime) -> Self {
        Self {
            end_time,
            seed: None,
            probability_tolerance: DEFAULT_PROBABILITY_TOLERANCE,
        }
    }

    /// Set the random seed for the run
    ///
    /// # Arguments
    /// * `seed` - Seed for the run's `StdRng`
    ///
    /// # Returns
    /// A new configuration with the specified seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the tolerance used when validating route probabilities
    pub fn with_probability_tolerance(mut self, tolerance: f64) -> Self {
        self.probability_tolerance = tolerance;
        self
    }

    /// Check that the parameters can drive a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.end_time.is_finite() || self.end_time < 0.0 {
            return Err(ConfigError::InvalidEndTime(self.end_time));
        }
        if !self.probability_tolerance.is_finite() || self.probability_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.probability_tolerance));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.end_time, 0.0);
        assert_eq!(config.seed, None);
        assert_eq!(config.probability_tolerance, DEFAULT_PROBABILITY_TOLERANCE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SimulationConfig::new(100.0)
            .with_seed(7)
            .with_probability_tolerance(1e-6);

        assert_eq!(config.end_time, 100.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.probability_tolerance, 1e-6);
    }

    #[test]
    fn test_validate_rejects_bad_end_time() {
        assert_eq!(
            SimulationConfig::new(-1.0).validate(),
            Err(ConfigError::InvalidEndTime(-1.0))
        );
        assert!(SimulationConfig::new(f64::INFINITY).validate().is_err());
        assert!(SimulationConfig::new(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_tolerance() {
        let config = SimulationConfig::new(10.0).with_probability_tolerance(-0.1);
        assert_eq!(config.validate(), Err(ConfigError::InvalidTolerance(-0.1)));
    }
}
