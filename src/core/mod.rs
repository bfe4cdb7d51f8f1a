//! Core data types for Black-76 option analytics
//!
//! Defines fundamental types:
//! - OptionType: call/put flag
//! - MarketQuote: one observed futures option premium
//! - ExpiryChain / QuoteSurface: options chains by expiry
//! - Greeks: price sensitivities
//! - VolSurface: implied volatility records by strike and expiry

pub mod option;
pub mod quote;
pub mod surface;
pub mod greeks;
pub mod error;

pub use option::*;
pub use quote::*;
pub use surface::*;
pub use greeks::*;
pub use error::*;
