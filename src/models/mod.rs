//! Pricing Models
//!
//! Implements:
//! - Black-76 (futures option pricing, Greeks)
//! - Implied volatility by bisection, and IV surfaces built from it
//! - Solver and analytics configuration

pub mod black76;
pub mod config;
pub mod implied_vol;

pub use black76::*;
pub use config::*;
pub use implied_vol::*;
