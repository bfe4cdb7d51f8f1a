//! Option Greeks
//!
//! First and second order sensitivities of a Black-76 price.

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dF (sensitivity to the forward)
    pub delta: f64,
    /// Gamma: d²V/dF²
    pub gamma: f64,
    /// Vega: dV/dσ, per unit of vol
    pub vega: f64,
    /// Theta: time decay, per year
    pub theta: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, vega: f64, theta: f64) -> Self {
        Self {
            delta,
            gamma,
            vega,
            theta,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.delta.is_finite()
            && self.gamma.is_finite()
            && self.vega.is_finite()
            && self.theta.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_finite() {
        let g = Greeks::new(0.5, 0.001, 400.0, -20.0);
        assert_eq!(g.delta, 0.5);
        assert!(g.is_finite());
        assert!(!Greeks::new(f64::NAN, 0.0, 0.0, 0.0).is_finite());
    }
}
