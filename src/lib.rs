//! # B76 Options - Black-76 Implied Volatility
//!
//! Futures option analytics under the Black-76 model.
//!
//! ## Overview
//!
//! Given an observed premium on an option on a future, the IV solver inverts
//! the Black-76 price to recover the volatility that reproduces it, then the
//! pricer evaluates the Greeks at that volatility.
//!
//! ## Key Components
//!
//! - **Black-76**: closed-form price, delta, gamma, vega, theta
//! - **IV Solver**: bisection over a fixed volatility bracket with an
//!   explicit iteration cap
//! - **IV Surface**: solves a whole options chain into
//!   `(rank, strike, expiry, vol)` records
//!
//! ## Usage
//!
//! ```rust
//! use b76_options::prelude::*;
//!
//! // ES future at 4300, ATM call, 30 days, 1% rate, quoted at 55.00
//! let quote = MarketQuote::from_days(4300.0, 4300.0, 0.01, 30.0, 55.0, OptionType::Call);
//!
//! let iv = implied_volatility(&quote).unwrap();
//! assert!(iv > 0.10 && iv < 0.25);
//!
//! let greeks = b76_greeks(&quote, iv).unwrap();
//! assert!(greeks.delta > 0.5);
//! ```
//!
//! ## What This Library Does NOT Do
//!
//! - Fetch, parse or persist market data
//! - Cache solved surfaces
//! - Parallelize solves (all types are plain data; callers can)

pub mod core;
pub mod models;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        B76Error, B76Result, ExpiryChain, Greeks, MarketQuote, OptionType, QuoteSurface,
        StrikeQuote, VolGrid, VolPoint, VolSurface,
    };

    // Models
    pub use crate::models::{
        analyze,
        compute_iv_surface,
        greeks as b76_greeks,
        greeks_with as b76_greeks_with,
        implied_volatility,
        implied_volatility_with,
        norm_cdf,
        norm_pdf,

        // Black-76
        price as b76_price,
        AnalyticsConfig,
        IvSolution,
        OptionAnalytics,
        SolverConfig,
        ThetaConvention,
    };
}

// Re-export main types at crate root
pub use crate::core::{B76Error, B76Result, MarketQuote, OptionType};
pub use crate::models::{implied_volatility, SolverConfig};
