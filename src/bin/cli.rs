//! B76 Options CLI
//!
//! Command-line demo of the Black-76 IV solver and surface builder.
//! Set `RUST_LOG=b76_options=debug` to see solver diagnostics.

use b76_options::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    println!("Black-76 Implied Volatility");
    println!("===========================\n");

    // ES futures option, ATM, 30 days
    let forward = 4300.0;
    let strike = 4300.0;
    let rate = 0.01;
    let days = 30.0;
    let call_premium = 55.0;
    let put_premium = 54.5;

    println!("Inputs:");
    println!("  Forward: {:.2}", forward);
    println!("  Strike: {:.2}", strike);
    println!("  Time: {:.0} days", days);
    println!("  Rate: {:.2}%", rate * 100.0);
    println!("  Call premium: {:.2}", call_premium);
    println!("  Put premium: {:.2}\n", put_premium);

    let call = MarketQuote::from_days(forward, strike, rate, days, call_premium, OptionType::Call);
    let put = MarketQuote::from_days(forward, strike, rate, days, put_premium, OptionType::Put);

    for config in [AnalyticsConfig::default(), AnalyticsConfig::standard_theta()] {
        println!("Theta convention: {:?}", config.theta);
        for quote in [&call, &put] {
            match analyze(quote, &config) {
                Ok(a) => {
                    println!(
                        "  {} @ {:.0}: IV {:.2}% ({} iterations)",
                        quote.option_type,
                        quote.strike,
                        a.implied_vol * 100.0,
                        a.iterations
                    );
                    println!("    Delta: {:.4}", a.greeks.delta);
                    println!("    Gamma: {:.6}", a.greeks.gamma);
                    println!("    Vega: {:.4}", a.greeks.vega);
                    println!("    Theta: {:.4}", a.greeks.theta);
                }
                Err(e) => println!("  {} @ {:.0}: {}", quote.option_type, quote.strike, e),
            }
        }
        println!();
    }

    // Recover a known vol
    let sigma = 0.18;
    println!("Round trip at {:.0}% vol:", sigma * 100.0);
    match b76_price(&call, sigma).and_then(|p| implied_volatility(&call.with_price(p))) {
        Ok(iv) => println!(
            "  Recovered IV: {:.4}% (expected: {:.4}%)\n",
            iv * 100.0,
            sigma * 100.0
        ),
        Err(e) => println!("  IV solve failed: {}\n", e),
    }

    // Synthetic chain: three expiries, a small skew, one unreachable premium
    println!("--- IV Surface ---\n");
    let surface = compute_iv_surface(&synthetic_chain(forward, rate), &SolverConfig::default());

    println!("{:>6} {:>8} {:>6} {:>9} {:>9}", "rank", "strike", "DTE", "call IV", "put IV");
    for p in &surface.points {
        println!(
            "{:>6} {:>8.0} {:>6.0} {:>9} {:>9}",
            p.rank,
            p.strike,
            p.days_to_expiry,
            fmt_vol(p.call_vol),
            fmt_vol(p.put_vol)
        );
    }

    let grid = surface.call_grid();
    if let Some(v) = grid.interpolate(4275.0, 45.0) {
        println!("\nInterpolated call IV at K=4275, 45 DTE: {:.2}%", v * 100.0);
    }

    println!("\n--- Done ---");
}

fn fmt_vol(vol: Option<f64>) -> String {
    vol.map(|v| format!("{:.2}%", v * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

fn synthetic_chain(forward: f64, rate: f64) -> QuoteSurface {
    let mut surface = QuoteSurface::new("ES");

    for days in [30.0, 60.0, 90.0] {
        let mut chain = ExpiryChain::new(days, forward, rate);
        for strike in [4100.0, 4200.0, 4300.0, 4400.0, 4500.0] {
            let vol = 0.18 - 0.4 * (strike / forward).ln();
            let premium = |option_type| {
                let q = MarketQuote::from_days(forward, strike, rate, days, 1.0, option_type);
                b76_price(&q, vol).ok()
            };
            chain.add_strike(StrikeQuote::new(
                strike,
                premium(OptionType::Call),
                premium(OptionType::Put),
            ));
        }
        surface.add_chain(chain);
    }

    if let Some(chain) = surface.chains.first_mut() {
        chain.add_strike(StrikeQuote::new(4600.0, Some(1.0e4), None));
    }

    surface
}
