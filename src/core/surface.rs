//! Volatility Surface
//!
//! Implied volatility surface as a list of `(rank, strike, expiry, vol)`
//! records, one per strike per expiry. Grid views for rendering and
//! interpolation are derived from the records on demand.

use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::option::OptionType;

/// Implied vols solved at one strike of one expiry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolPoint {
    /// 1-based position of the strike within its chain
    pub rank: usize,
    pub strike: f64,
    pub expiry: Option<NaiveDate>,
    pub days_to_expiry: f64,
    /// Time to expiry in years
    pub time_to_expiry: f64,
    /// Call IV, `None` if not quoted or the solve failed
    pub call_vol: Option<f64>,
    /// Put IV, `None` if not quoted or the solve failed
    pub put_vol: Option<f64>,
}

impl VolPoint {
    pub fn vol(&self, option_type: OptionType) -> Option<f64> {
        match option_type {
            OptionType::Call => self.call_vol,
            OptionType::Put => self.put_vol,
        }
    }
}

/// Implied volatility surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolSurface {
    /// Underlying symbol
    pub underlying: String,
    /// Records ordered by expiry, then strike
    pub points: Vec<VolPoint>,
}

impl VolSurface {
    pub fn new(underlying: impl Into<String>) -> Self {
        Self {
            underlying: underlying.into(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, point: VolPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct days to expiry, ascending
    pub fn expiries(&self) -> Vec<f64> {
        distinct_sorted(self.points.iter().map(|p| p.days_to_expiry))
    }

    /// Distinct strikes across all expiries, ascending
    pub fn strikes(&self) -> Vec<f64> {
        distinct_sorted(self.points.iter().map(|p| p.strike))
    }

    /// Records of a single expiry (the smile)
    pub fn smile(&self, days_to_expiry: f64) -> Vec<&VolPoint> {
        self.points
            .iter()
            .filter(|p| (p.days_to_expiry - days_to_expiry).abs() < AXIS_EPS)
            .collect()
    }

    /// Records sharing a rank across expiries
    pub fn term_structure(&self, rank: usize) -> Vec<&VolPoint> {
        self.points.iter().filter(|p| p.rank == rank).collect()
    }

    /// Number of solved vols of the given type
    pub fn solved_count(&self, option_type: OptionType) -> usize {
        self.points
            .iter()
            .filter(|p| p.vol(option_type).is_some())
            .count()
    }

    /// (strike, days to expiry, iv) triples for every solved vol of a type
    pub fn triples(&self, option_type: OptionType) -> Vec<(f64, f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.vol(option_type).map(|v| (p.strike, p.days_to_expiry, v)))
            .collect()
    }

    pub fn call_triples(&self) -> Vec<(f64, f64, f64)> {
        self.triples(OptionType::Call)
    }

    pub fn put_triples(&self) -> Vec<(f64, f64, f64)> {
        self.triples(OptionType::Put)
    }

    /// Dense strike x expiry grid of one vol type, NaN where missing
    pub fn grid(&self, option_type: OptionType) -> VolGrid {
        let strikes = self.strikes();
        let expiries = self.expiries();
        let mut vols = Array2::from_elem((strikes.len(), expiries.len()), f64::NAN);

        for p in &self.points {
            let (Some(si), Some(ti)) = (
                axis_index(&strikes, p.strike),
                axis_index(&expiries, p.days_to_expiry),
            ) else {
                continue;
            };
            if let Some(v) = p.vol(option_type) {
                vols[[si, ti]] = v;
            }
        }

        VolGrid {
            strikes,
            expiries,
            vols,
        }
    }

    pub fn call_grid(&self) -> VolGrid {
        self.grid(OptionType::Call)
    }

    pub fn put_grid(&self) -> VolGrid {
        self.grid(OptionType::Put)
    }
}

const AXIS_EPS: f64 = 1e-9;

fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.collect();
    out.sort_by(|a, b| a.total_cmp(b));
    out.dedup_by(|a, b| (*a - *b).abs() < AXIS_EPS);
    out
}

fn axis_index(axis: &[f64], value: f64) -> Option<usize> {
    axis.iter().position(|&x| (x - value).abs() < AXIS_EPS)
}

/// Strike x expiry grid view of a surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolGrid {
    /// X-axis: strikes, ascending
    pub strikes: Vec<f64>,
    /// Y-axis: days to expiry, ascending
    pub expiries: Vec<f64>,
    /// Volatility grid [strike, expiry] -> vol
    pub vols: Array2<f64>,
}

impl VolGrid {
    /// Vol at an exact grid node
    pub fn get(&self, strike: f64, days_to_expiry: f64) -> Option<f64> {
        let si = axis_index(&self.strikes, strike)?;
        let ti = axis_index(&self.expiries, days_to_expiry)?;
        let v = self.vols[[si, ti]];
        (!v.is_nan()).then_some(v)
    }

    /// Bilinear interpolation, clamped to the grid edges.
    /// Returns `None` if any bracketing node is missing.
    pub fn interpolate(&self, strike: f64, days_to_expiry: f64) -> Option<f64> {
        let (xi_lo, xi_hi, x_frac) = find_bracket(&self.strikes, strike)?;
        let (yi_lo, yi_hi, y_frac) = find_bracket(&self.expiries, days_to_expiry)?;

        let v00 = self.vols[[xi_lo, yi_lo]];
        let v10 = self.vols[[xi_hi, yi_lo]];
        let v01 = self.vols[[xi_lo, yi_hi]];
        let v11 = self.vols[[xi_hi, yi_hi]];
        if [v00, v10, v01, v11].iter().any(|v| v.is_nan()) {
            return None;
        }

        let v0 = v00 * (1.0 - x_frac) + v10 * x_frac;
        let v1 = v01 * (1.0 - x_frac) + v11 * x_frac;

        Some(v0 * (1.0 - y_frac) + v1 * y_frac)
    }
}

/// Find bracketing indices and interpolation fraction
fn find_bracket(axis: &[f64], value: f64) -> Option<(usize, usize, f64)> {
    let last = axis.len().checked_sub(1)?;

    if value <= axis[0] {
        return Some((0, 0, 0.0));
    }
    if value >= axis[last] {
        return Some((last, last, 0.0));
    }

    axis.windows(2).enumerate().find_map(|(i, w)| {
        (value >= w[0] && value <= w[1]).then(|| (i, i + 1, (value - w[0]) / (w[1] - w[0])))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(rank: usize, strike: f64, days: f64, call: Option<f64>, put: Option<f64>) -> VolPoint {
        VolPoint {
            rank,
            strike,
            expiry: None,
            days_to_expiry: days,
            time_to_expiry: days / 365.0,
            call_vol: call,
            put_vol: put,
        }
    }

    fn sample() -> VolSurface {
        let mut s = VolSurface::new("ES");
        s.push(point(1, 4200.0, 30.0, Some(0.20), Some(0.22)));
        s.push(point(2, 4300.0, 30.0, Some(0.18), None));
        s.push(point(1, 4200.0, 60.0, Some(0.21), Some(0.23)));
        s.push(point(2, 4300.0, 60.0, Some(0.19), Some(0.20)));
        s
    }

    #[test]
    fn test_axes_and_queries() {
        let s = sample();
        assert_eq!(s.expiries(), vec![30.0, 60.0]);
        assert_eq!(s.strikes(), vec![4200.0, 4300.0]);
        assert_eq!(s.smile(30.0).len(), 2);
        assert_eq!(s.term_structure(2).len(), 2);
        assert_eq!(s.solved_count(OptionType::Put), 3);

        let puts = s.put_triples();
        assert_eq!(puts.len(), 3);
        assert_eq!(puts[0], (4200.0, 30.0, 0.22));
        assert_eq!(s.call_triples().len(), 4);
    }

    #[test]
    fn test_grid_marks_missing() {
        let grid = sample().put_grid();
        assert_eq!(grid.vols.dim(), (2, 2));
        assert_eq!(grid.get(4200.0, 30.0), Some(0.22));
        assert_eq!(grid.get(4300.0, 30.0), None);
        assert_eq!(grid.get(4250.0, 30.0), None);
    }

    #[test]
    fn test_grid_interpolation() {
        let grid = sample().call_grid();

        let mid = grid.interpolate(4250.0, 45.0).unwrap();
        assert!((mid - 0.195).abs() < 1e-12);

        // Clamped outside the grid
        let edge = grid.interpolate(4000.0, 10.0).unwrap();
        assert!((edge - 0.20).abs() < 1e-12);

        // A missing corner poisons the interpolation
        let puts = sample().put_grid();
        assert!(puts.interpolate(4250.0, 30.0).is_none());
        assert!(puts.interpolate(4200.0, 45.0).is_some());
    }

    #[test]
    fn test_empty_surface() {
        let s = VolSurface::new("ES");
        assert!(s.is_empty());
        assert!(s.call_grid().interpolate(4300.0, 30.0).is_none());
    }
}
