//! Configuration for the IV solver and option analytics

use serde::{Deserialize, Serialize};

use super::black76::ThetaConvention;
use crate::core::{B76Error, B76Result};

/// Lowest volatility in the default bisection bracket
pub const DEFAULT_LOWER_VOL: f64 = 0.0001;
/// Highest volatility in the default bisection bracket
pub const DEFAULT_UPPER_VOL: f64 = 500.0;
/// Default price tolerance
pub const DEFAULT_TOLERANCE: f64 = 1e-5;
/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Bisection settings for the implied volatility solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Lower end of the volatility bracket
    /// Default: 0.0001
    pub lower_vol: f64,

    /// Upper end of the volatility bracket
    /// Default: 500.0
    pub upper_vol: f64,

    /// Stop once |model price - observed price| < tolerance
    /// Default: 1e-5
    pub tolerance: f64,

    /// Give up with NonConvergence after this many iterations
    /// Default: 100
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            lower_vol: DEFAULT_LOWER_VOL,
            upper_vol: DEFAULT_UPPER_VOL,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Tighter tolerance with a larger iteration budget
    pub fn strict() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 200,
            ..Default::default()
        }
    }

    pub fn with_bracket(mut self, lower_vol: f64, upper_vol: f64) -> Self {
        self.lower_vol = lower_vol;
        self.upper_vol = upper_vol;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> B76Result<()> {
        if !(self.lower_vol.is_finite() && self.lower_vol > 0.0) {
            return Err(B76Error::invalid_input(format!(
                "lower_vol must be finite and > 0, got {}",
                self.lower_vol
            )));
        }
        if !(self.upper_vol.is_finite() && self.upper_vol > self.lower_vol) {
            return Err(B76Error::invalid_input(format!(
                "upper_vol must be finite and > lower_vol ({}), got {}",
                self.lower_vol, self.upper_vol
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(B76Error::invalid_input(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(B76Error::invalid_input("max_iterations must be > 0"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> B76Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| B76Error::serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> B76Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| B76Error::serialization(e.to_string()))
    }
}

/// Settings for the solve-then-Greeks flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub solver: SolverConfig,
    pub theta: ThetaConvention,
}

impl AnalyticsConfig {
    /// Default solver, textbook theta
    pub fn standard_theta() -> Self {
        Self {
            theta: ThetaConvention::Standard,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> B76Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| B76Error::serialization(e.to_string()))?;
        config.solver.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> B76Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| B76Error::serialization(e.to_string()))
    }
}
