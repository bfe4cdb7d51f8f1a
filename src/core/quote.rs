//! Option quote data
//!
//! `MarketQuote` is the single-option input to the pricer and the IV solver.
//! `ExpiryChain` and `QuoteSurface` carry a whole options chain the way it
//! arrives from a market data table: one row per expiry, a forward and a
//! rate per row, and a ranked list of strikes with call/put premiums.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{ensure_positive, B76Error, B76Result};
use super::option::OptionType;

/// Calendar days per year used to turn days-to-expiry into years
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Observed premium for one futures option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Forward / futures price
    pub forward: f64,
    /// Strike price
    pub strike: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Time to expiry in years
    pub time_to_expiry: f64,
    /// Observed option premium
    pub price: f64,
    /// Option type (Call/Put)
    pub option_type: OptionType,
}

impl MarketQuote {
    pub fn new(
        forward: f64,
        strike: f64,
        rate: f64,
        time_to_expiry: f64,
        price: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            forward,
            strike,
            rate,
            time_to_expiry,
            price,
            option_type,
        }
    }

    pub fn call(forward: f64, strike: f64, rate: f64, time_to_expiry: f64, price: f64) -> Self {
        Self::new(forward, strike, rate, time_to_expiry, price, OptionType::Call)
    }

    pub fn put(forward: f64, strike: f64, rate: f64, time_to_expiry: f64, price: f64) -> Self {
        Self::new(forward, strike, rate, time_to_expiry, price, OptionType::Put)
    }

    /// Build a quote from calendar days to expiry (ACT/365)
    pub fn from_days(
        forward: f64,
        strike: f64,
        rate: f64,
        days_to_expiry: f64,
        price: f64,
        option_type: OptionType,
    ) -> Self {
        Self::new(
            forward,
            strike,
            rate,
            days_to_expiry / DAYS_PER_YEAR,
            price,
            option_type,
        )
    }

    /// Same contract with a different observed premium
    pub fn with_price(&self, price: f64) -> Self {
        Self { price, ..*self }
    }

    /// Same contract terms with the other option type
    pub fn with_option_type(&self, option_type: OptionType) -> Self {
        Self {
            option_type,
            ..*self
        }
    }

    /// Check the contract terms the pricer needs (forward, strike, time, rate)
    pub fn validate_terms(&self) -> B76Result<()> {
        ensure_positive("forward", self.forward)?;
        ensure_positive("strike", self.strike)?;
        ensure_positive("time_to_expiry", self.time_to_expiry)?;
        if !self.rate.is_finite() {
            return Err(B76Error::invalid_input(format!(
                "rate must be finite, got {}",
                self.rate
            )));
        }
        Ok(())
    }

    /// Check the contract terms plus the observed premium
    pub fn validate(&self) -> B76Result<()> {
        self.validate_terms()?;
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(B76Error::invalid_input(format!(
                "option price must be finite and > 0, got {}",
                self.price
            )));
        }
        Ok(())
    }

    /// Discount factor e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.time_to_expiry).exp()
    }
}

/// Call and put premiums quoted at one strike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeQuote {
    pub strike: f64,
    pub call_premium: Option<f64>,
    pub put_premium: Option<f64>,
}

impl StrikeQuote {
    pub fn new(strike: f64, call_premium: Option<f64>, put_premium: Option<f64>) -> Self {
        Self {
            strike,
            call_premium,
            put_premium,
        }
    }

    pub fn premium(&self, option_type: OptionType) -> Option<f64> {
        match option_type {
            OptionType::Call => self.call_premium,
            OptionType::Put => self.put_premium,
        }
    }
}

/// Chain of quotes for a single expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiryChain {
    /// Expiry date, when the source provides one
    pub expiry: Option<NaiveDate>,
    /// Calendar days until expiration
    pub days_to_expiry: f64,
    /// Forward / futures price for this expiry
    pub forward: f64,
    /// Risk-free rate for this expiry
    pub rate: f64,
    /// Quotes, sorted by strike when added through `add_strike`
    pub strikes: Vec<StrikeQuote>,
}

impl ExpiryChain {
    pub fn new(days_to_expiry: f64, forward: f64, rate: f64) -> Self {
        Self {
            expiry: None,
            days_to_expiry,
            forward,
            rate,
            strikes: Vec::new(),
        }
    }

    /// Chain for a dated expiry, days counted from `as_of`
    pub fn dated(expiry: NaiveDate, as_of: NaiveDate, forward: f64, rate: f64) -> Self {
        let days = (expiry - as_of).num_days() as f64;
        Self {
            expiry: Some(expiry),
            ..Self::new(days, forward, rate)
        }
    }

    /// Add a strike, keeping strikes sorted. A repeated strike replaces the old quote.
    pub fn add_strike(&mut self, quote: StrikeQuote) {
        if let Some(existing) = self
            .strikes
            .iter_mut()
            .find(|q| (q.strike - quote.strike).abs() < 1e-9)
        {
            *existing = quote;
            return;
        }
        self.strikes.push(quote);
        self.strikes.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }

    pub fn with_strike(
        mut self,
        strike: f64,
        call_premium: Option<f64>,
        put_premium: Option<f64>,
    ) -> Self {
        self.add_strike(StrikeQuote::new(strike, call_premium, put_premium));
        self
    }

    /// Time to expiry in years
    pub fn time_to_expiry(&self) -> f64 {
        self.days_to_expiry / DAYS_PER_YEAR
    }

    /// Market quote for one strike and type, if that premium was quoted
    pub fn market_quote(
        &self,
        strike: &StrikeQuote,
        option_type: OptionType,
    ) -> Option<MarketQuote> {
        strike.premium(option_type).map(|premium| {
            MarketQuote::new(
                self.forward,
                strike.strike,
                self.rate,
                self.time_to_expiry(),
                premium,
                option_type,
            )
        })
    }
}

/// Full quote surface (all expiries)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSurface {
    /// Underlying symbol
    pub underlying: String,
    /// Chains, sorted by days to expiry when added through `add_chain`
    pub chains: Vec<ExpiryChain>,
}

impl QuoteSurface {
    pub fn new(underlying: impl Into<String>) -> Self {
        Self {
            underlying: underlying.into(),
            chains: Vec::new(),
        }
    }

    /// Add a chain
    pub fn add_chain(&mut self, chain: ExpiryChain) {
        self.chains.push(chain);
        self.chains
            .sort_by(|a, b| a.days_to_expiry.total_cmp(&b.days_to_expiry));
    }

    pub fn with_chain(mut self, chain: ExpiryChain) -> Self {
        self.add_chain(chain);
        self
    }

    /// Total number of quoted premiums
    pub fn total_quotes(&self) -> usize {
        self.chains
            .iter()
            .flat_map(|c| c.strikes.iter())
            .map(|q| q.call_premium.is_some() as usize + q.put_premium.is_some() as usize)
            .sum()
    }
}
