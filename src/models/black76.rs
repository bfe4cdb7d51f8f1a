//! Black-76 Model
//!
//! Provides:
//! - European futures option pricing
//! - Greeks computation (delta, gamma, vega, theta)
//!
//! Prices are discounted at the risk-free rate and quoted off the forward,
//! so there is no carry or dividend term.

use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

use crate::core::error::ensure_positive;
use crate::core::{B76Result, Greeks, MarketQuote, OptionType};

/// Which theta formula `greeks_with` applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThetaConvention {
    /// `-(F·σ·φ(d1))/2·√T - R·K·e^(-RT)·Φ(d2)` for both calls and puts.
    /// Multiplies by √T where the textbook divides; kept for compatibility
    /// with existing greeks tables.
    #[default]
    Legacy,
    /// Textbook Black-76 theta (per year), with separate call and put terms
    Standard,
}

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-76 d1 parameter
pub fn d1(forward: f64, strike: f64, vol: f64, time: f64) -> f64 {
    ((forward / strike).ln() + 0.5 * vol * vol * time) / (vol * time.sqrt())
}

/// Black-76 d2 parameter
pub fn d2(forward: f64, strike: f64, vol: f64, time: f64) -> f64 {
    d1(forward, strike, vol, time) - vol * time.sqrt()
}

fn check_inputs(quote: &MarketQuote, sigma: f64) -> B76Result<()> {
    ensure_positive("sigma", sigma)?;
    quote.validate_terms()
}

/// Black-76 option price at volatility `sigma`.
///
/// Only the contract terms of `quote` are used; its observed premium is ignored.
/// Fails with `Domain` if `sigma`, the time to expiry, the forward or the
/// strike is not strictly positive.
pub fn price(quote: &MarketQuote, sigma: f64) -> B76Result<f64> {
    check_inputs(quote, sigma)?;
    Ok(price_unchecked(quote, sigma))
}

/// Pricing kernel. Callers must have validated the inputs.
pub(crate) fn price_unchecked(quote: &MarketQuote, sigma: f64) -> f64 {
    let MarketQuote {
        forward: f,
        strike: k,
        time_to_expiry: t,
        ..
    } = *quote;

    let d1 = d1(f, k, sigma, t);
    let d2 = d1 - sigma * t.sqrt();
    let df = quote.discount_factor();

    match quote.option_type {
        OptionType::Call => df * (f * norm_cdf(d1) - k * norm_cdf(d2)),
        OptionType::Put => df * (k * norm_cdf(-d2) - f * norm_cdf(-d1)),
    }
}

/// Black-76 Greeks with the legacy theta convention
pub fn greeks(quote: &MarketQuote, sigma: f64) -> B76Result<Greeks> {
    greeks_with(quote, sigma, ThetaConvention::Legacy)
}

/// Black-76 Greeks with an explicit theta convention
pub fn greeks_with(
    quote: &MarketQuote,
    sigma: f64,
    theta: ThetaConvention,
) -> B76Result<Greeks> {
    check_inputs(quote, sigma)?;

    let MarketQuote {
        forward: f,
        strike: k,
        rate: r,
        time_to_expiry: t,
        ..
    } = *quote;

    let sqrt_t = t.sqrt();
    let d1 = d1(f, k, sigma, t);
    let d2 = d1 - sigma * sqrt_t;
    let df = quote.discount_factor();
    let pdf_d1 = norm_pdf(d1);

    // Delta is scaled by e^(rT), not discounted
    let delta = match quote.option_type {
        OptionType::Call => (r * t).exp() * norm_cdf(d1),
        OptionType::Put => (r * t).exp() * (norm_cdf(d1) - 1.0),
    };

    // Gamma and vega are the same for call and put
    let gamma = pdf_d1 / (f * sigma * sqrt_t);
    let vega = f * sqrt_t * pdf_d1;

    let theta = match theta {
        ThetaConvention::Legacy => {
            -(f * sigma * pdf_d1) / 2.0 * sqrt_t - r * k * df * norm_cdf(d2)
        }
        ThetaConvention::Standard => {
            let decay = -df * f * pdf_d1 * sigma / (2.0 * sqrt_t);
            let carry = match quote.option_type {
                OptionType::Call => r * df * (f * norm_cdf(d1) - k * norm_cdf(d2)),
                OptionType::Put => r * df * (k * norm_cdf(-d2) - f * norm_cdf(-d1)),
            };
            decay + carry
        }
    };

    Ok(Greeks::new(delta, gamma, vega, theta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::B76Error;
    use approx::assert_relative_eq;
    use statrs::distribution::{ContinuousCDF, Normal};

    fn atm_call() -> MarketQuote {
        MarketQuote::call(4300.0, 4300.0, 0.01, 30.0 / 365.0, 55.0)
    }

    #[test]
    fn test_norm_cdf() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-10);
        assert!((norm_cdf(1.96) - 0.975).abs() < 0.001);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 0.001);
        assert_relative_eq!(norm_pdf(0.0), 1.0 / (2.0 * PI).sqrt(), epsilon = 1e-15);

        let normal = Normal::new(0.0, 1.0).unwrap();
        for x in [-6.0, -2.5, -0.3, 0.7, 3.0, 8.0] {
            assert_relative_eq!(norm_cdf(x), normal.cdf(x), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_b76_price() {
        // F = K = 100, 20% vol, 1 year, 5% rate: e^-0.05 * 100 * (2Φ(0.1) - 1) ≈ 7.577
        let q = MarketQuote::call(100.0, 100.0, 0.05, 1.0, 1.0);
        let call = price(&q, 0.20).unwrap();
        assert!((call - 7.577).abs() < 0.01);

        // ATM put equals ATM call under Black-76
        let put = price(&q.with_option_type(OptionType::Put), 0.20).unwrap();
        assert_relative_eq!(call, put, epsilon = 1e-10);
    }

    #[test]
    fn test_put_call_parity_off_the_money() {
        let q = MarketQuote::call(4300.0, 4200.0, 0.03, 0.5, 1.0);
        let call = price(&q, 0.25).unwrap();
        let put = price(&q.with_option_type(OptionType::Put), 0.25).unwrap();
        let parity = q.discount_factor() * (q.forward - q.strike);
        assert_relative_eq!(call - put, parity, epsilon = 1e-8);
    }

    #[test]
    fn test_price_domain_errors() {
        let q = atm_call();
        assert!(matches!(
            price(&q, 0.0),
            Err(B76Error::Domain { parameter: "sigma", .. })
        ));
        assert!(price(&q, -0.2).is_err());

        let expired = MarketQuote { time_to_expiry: 0.0, ..q };
        assert!(matches!(
            price(&expired, 0.2),
            Err(B76Error::Domain { parameter: "time_to_expiry", .. })
        ));

        let no_forward = MarketQuote { forward: 0.0, ..q };
        assert!(price(&no_forward, 0.2).is_err());
        let no_strike = MarketQuote { strike: -10.0, ..q };
        assert!(greeks(&no_strike, 0.2).is_err());
    }

    #[test]
    fn test_greeks_formulas() {
        let q = atm_call();
        let sigma = 0.2;
        let g = greeks(&q, sigma).unwrap();

        let t = q.time_to_expiry;
        let d1 = d1(q.forward, q.strike, sigma, t);
        let growth = (q.rate * t).exp();

        assert_relative_eq!(g.delta, growth * norm_cdf(d1), epsilon = 1e-12);
        assert!(g.delta > 0.5 && g.delta < growth);
        assert_relative_eq!(
            g.gamma,
            norm_pdf(d1) / (q.forward * sigma * t.sqrt()),
            epsilon = 1e-15
        );
        assert_relative_eq!(g.vega, q.forward * t.sqrt() * norm_pdf(d1), epsilon = 1e-9);
        assert!(g.theta < 0.0);

        let put = greeks(&q.with_option_type(OptionType::Put), sigma).unwrap();
        assert_relative_eq!(put.delta, growth * (norm_cdf(d1) - 1.0), epsilon = 1e-12);
        assert_relative_eq!(put.gamma, g.gamma);
        assert_relative_eq!(put.vega, g.vega);
        assert_relative_eq!(put.theta, g.theta);
    }

    #[test]
    fn test_legacy_theta_literal() {
        let q = atm_call();
        let sigma = 0.2;
        let t = q.time_to_expiry;
        let d1 = d1(q.forward, q.strike, sigma, t);
        let d2 = d1 - sigma * t.sqrt();

        let expected = -(q.forward * sigma * norm_pdf(d1)) / 2.0 * t.sqrt()
            - q.rate * q.strike * (-q.rate * t).exp() * norm_cdf(d2);

        let g = greeks(&q, sigma).unwrap();
        assert_relative_eq!(g.theta, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_standard_theta() {
        let q = atm_call();
        let sigma = 0.2;

        let legacy = greeks_with(&q, sigma, ThetaConvention::Legacy).unwrap();
        let call = greeks_with(&q, sigma, ThetaConvention::Standard).unwrap();
        let put_quote = q.with_option_type(OptionType::Put);
        let put = greeks_with(&put_quote, sigma, ThetaConvention::Standard).unwrap();

        assert!(call.theta < 0.0);
        assert!(put.theta < 0.0);
        assert!((call.theta - legacy.theta).abs() > 1.0);
        // ATM: call and put prices agree, so do their thetas
        assert_relative_eq!(call.theta, put.theta, epsilon = 1e-8);
        // Only theta depends on the convention
        assert_eq!(call.delta, legacy.delta);
        assert_eq!(call.vega, legacy.vega);

        // Standard theta matches -dV/dT by finite difference
        let h = 1e-6;
        let later = MarketQuote { time_to_expiry: q.time_to_expiry + h, ..q };
        let earlier = MarketQuote { time_to_expiry: q.time_to_expiry - h, ..q };
        let fd = -(price(&later, sigma).unwrap() - price(&earlier, sigma).unwrap()) / (2.0 * h);
        assert_relative_eq!(call.theta, fd, max_relative = 1e-4);
    }

    #[test]
    fn test_vega_matches_finite_difference() {
        let q = MarketQuote::put(4300.0, 4100.0, 0.02, 0.25, 1.0);
        let sigma = 0.3;
        let h = 1e-5;
        let fd = (price(&q, sigma + h).unwrap() - price(&q, sigma - h).unwrap()) / (2.0 * h);
        let g = greeks(&q, sigma).unwrap();

        // Vega here is undiscounted: F·√T·φ(d1)
        assert_relative_eq!(g.vega * q.discount_factor(), fd, max_relative = 1e-5);
    }
}
