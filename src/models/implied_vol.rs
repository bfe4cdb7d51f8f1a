//! Implied Volatility
//!
//! Provides:
//! - Bisection IV solver over a fixed volatility bracket
//! - Solve-then-Greeks analytics for a single quote
//! - IV surface construction from an options chain
//!
//! Bisection is used instead of Newton-Raphson because Black-76 vega
//! collapses for deep in/out-of-the-money and very short-dated options.
//! It only needs the price to be monotonic in vol on the bracket, which
//! holds for calls and puts alike.

use serde::{Deserialize, Serialize};

use super::black76::{greeks_with, price_unchecked};
use super::config::{AnalyticsConfig, SolverConfig};
use crate::core::{
    B76Error, B76Result, Greeks, MarketQuote, OptionType, QuoteSurface, VolPoint, VolSurface,
};

/// A converged IV solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IvSolution {
    /// Implied volatility
    pub vol: f64,
    /// Bisection iterations used
    pub iterations: u32,
    /// Model price minus observed price at `vol`
    pub residual: f64,
}

/// Implied volatility with the default bracket, tolerance and iteration cap.
///
/// Returns `NonConvergence` if the observed price cannot be matched within
/// the iteration cap, e.g. when it lies outside the prices reachable on the
/// bracket.
pub fn implied_volatility(quote: &MarketQuote) -> B76Result<f64> {
    implied_volatility_with(quote, &SolverConfig::default()).map(|s| s.vol)
}

/// Implied volatility by bisection with an explicit solver configuration
pub fn implied_volatility_with(
    quote: &MarketQuote,
    config: &SolverConfig,
) -> B76Result<IvSolution> {
    config.validate()?;
    quote.validate()?;

    let target = quote.price;
    let mut lower_vol = config.lower_vol;
    let mut higher_vol = config.upper_vol;
    let mut candidate = (higher_vol + lower_vol) / 2.0;
    let mut residual = f64::INFINITY;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        iterations += 1;

        candidate = (higher_vol + lower_vol) / 2.0;
        let candidate_price = price_unchecked(quote, candidate);
        residual = candidate_price - target;

        match quote.option_type {
            OptionType::Call => {
                let lower_price = price_unchecked(quote, lower_vol);
                if (lower_price - target) * residual > 0.0 {
                    lower_vol = candidate;
                } else {
                    higher_vol = candidate;
                }
            }
            OptionType::Put => {
                let higher_price = price_unchecked(quote, higher_vol);
                if (higher_price - target) * residual > 0.0 {
                    higher_vol = candidate;
                } else {
                    lower_vol = candidate;
                }
            }
        }

        if residual.abs() < config.tolerance {
            tracing::debug!(
                "IV converged for {} K={} after {} iterations: vol={:.6}",
                quote.option_type,
                quote.strike,
                iterations,
                candidate
            );
            return Ok(IvSolution {
                vol: candidate,
                iterations,
                residual,
            });
        }
    }

    tracing::debug!(
        "IV did not converge for {} K={} price={}: last vol={:.6}, residual={:.2e}",
        quote.option_type,
        quote.strike,
        target,
        candidate,
        residual
    );
    Err(B76Error::non_convergence(iterations, residual.abs(), candidate))
}

/// Result of solving a quote's IV and evaluating Greeks at it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionAnalytics {
    pub quote: MarketQuote,
    pub implied_vol: f64,
    pub iterations: u32,
    /// Model price at the implied vol
    pub model_price: f64,
    pub greeks: Greeks,
}

/// Solve IV, then compute Greeks at the solved vol
pub fn analyze(quote: &MarketQuote, config: &AnalyticsConfig) -> B76Result<OptionAnalytics> {
    let solution = implied_volatility_with(quote, &config.solver)?;
    let greeks = greeks_with(quote, solution.vol, config.theta)?;

    Ok(OptionAnalytics {
        quote: *quote,
        implied_vol: solution.vol,
        iterations: solution.iterations,
        model_price: quote.price + solution.residual,
        greeks,
    })
}

/// Compute an IV surface from a quote surface.
///
/// Chains are solved in expiry order, strikes in strike order. Quotes that
/// are missing, malformed or fail to converge are left as `None` in the
/// resulting records.
pub fn compute_iv_surface(quotes: &QuoteSurface, config: &SolverConfig) -> VolSurface {
    let mut surface = VolSurface::new(quotes.underlying.clone());

    // Chains and strikes are public and may arrive unsorted (e.g. deserialized)
    let mut chains: Vec<_> = quotes.chains.iter().collect();
    chains.sort_by(|a, b| a.days_to_expiry.total_cmp(&b.days_to_expiry));

    for chain in chains {
        let mut strikes: Vec<_> = chain.strikes.iter().collect();
        strikes.sort_by(|a, b| a.strike.total_cmp(&b.strike));

        for (idx, strike_quote) in strikes.into_iter().enumerate() {
            let solve = |option_type: OptionType| -> Option<f64> {
                let quote = chain.market_quote(strike_quote, option_type)?;
                match implied_volatility_with(&quote, config) {
                    Ok(solution) => Some(solution.vol),
                    Err(e) => {
                        tracing::warn!(
                            "Skipping {} K={} at {} DTE: {}",
                            option_type,
                            strike_quote.strike,
                            chain.days_to_expiry,
                            e
                        );
                        None
                    }
                }
            };

            surface.push(VolPoint {
                rank: idx + 1,
                strike: strike_quote.strike,
                expiry: chain.expiry,
                days_to_expiry: chain.days_to_expiry,
                time_to_expiry: chain.time_to_expiry(),
                call_vol: solve(OptionType::Call),
                put_vol: solve(OptionType::Put),
            });
        }
    }

    tracing::debug!(
        "Built IV surface for {}: {} points from {} quotes, {} call / {} put vols",
        surface.underlying,
        surface.len(),
        quotes.total_quotes(),
        surface.solved_count(OptionType::Call),
        surface.solved_count(OptionType::Put)
    );

    surface
}
