//! Rate and dividend inputs to the finite-difference grid.

use crate::error::{MathError, MathResult};

/// Continuously compounded zero rates on a year-fraction time axis.
pub trait ZeroRateCurve: Send + Sync {
    /// Zero rate to time `t`.
    fn zero_rate(&self, t: f64) -> f64;

    /// Continuously compounded forward rate between `t1` and `t2`.
    fn forward_rate(&self, t1: f64, t2: f64) -> f64 {
        if (t2 - t1).abs() < 1e-12 {
            return self.zero_rate(t1);
        }
        (self.zero_rate(t2) * t2 - self.zero_rate(t1) * t1) / (t2 - t1)
    }

    /// Discount factor to time `t`.
    fn discount_factor(&self, t: f64) -> f64 {
        (-self.zero_rate(t) * t).exp()
    }
}

/// Pillar zero curve with linear interpolation and flat ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroCurve {
    times: Vec<f64>,
    rates: Vec<f64>,
}

impl ZeroCurve {
    /// Creates a zero curve from strictly increasing pillar times.
    pub fn new(times: Vec<f64>, rates: Vec<f64>) -> MathResult<Self> {
        if times.is_empty() || times.len() != rates.len() {
            return Err(MathError::invalid_input(
                "zero curve needs matching, non-empty times and rates",
            ));
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "zero curve times must be strictly increasing",
            ));
        }
        Ok(Self { times, rates })
    }

    /// A curve with the same rate at every tenor.
    #[must_use]
    pub fn flat(rate: f64) -> Self {
        Self {
            times: vec![1.0],
            rates: vec![rate],
        }
    }
}

impl ZeroRateCurve for ZeroCurve {
    fn zero_rate(&self, t: f64) -> f64 {
        let n = self.times.len();
        if t <= self.times[0] {
            return self.rates[0];
        }
        if t >= self.times[n - 1] {
            return self.rates[n - 1];
        }
        let i = self.times.partition_point(|x| *x <= t);
        let (t0, t1) = (self.times[i - 1], self.times[i]);
        let (r0, r1) = (self.rates[i - 1], self.rates[i]);
        r0 + (r1 - r0) * (t - t0) / (t1 - t0)
    }
}

/// A curve shifted in parallel, used for rho.
pub(crate) struct ShiftedCurve<'a, C: ZeroRateCurve + ?Sized> {
    pub(crate) base: &'a C,
    pub(crate) shift: f64,
}

impl<C: ZeroRateCurve + ?Sized> ZeroRateCurve for ShiftedCurve<'_, C> {
    fn zero_rate(&self, t: f64) -> f64 {
        self.base.zero_rate(t) + self.shift
    }

    fn forward_rate(&self, t1: f64, t2: f64) -> f64 {
        self.base.forward_rate(t1, t2) + self.shift
    }
}

/// A discrete cash dividend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dividend {
    /// Ex-date as a year fraction from valuation.
    pub time: f64,
    /// Cash amount.
    pub amount: f64,
}

/// Discrete dividends sorted by time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DividendSchedule {
    dividends: Vec<Dividend>,
}

impl DividendSchedule {
    /// Creates a schedule from `(time, amount)` pairs in any order.
    pub fn new(pairs: impl IntoIterator<Item = (f64, f64)>) -> MathResult<Self> {
        let mut dividends: Vec<Dividend> = pairs
            .into_iter()
            .map(|(time, amount)| Dividend { time, amount })
            .collect();
        if let Some(bad) = dividends.iter().find(|d| !d.amount.is_finite() || d.amount < 0.0) {
            return Err(MathError::invalid_input(format!(
                "dividend amount must be non-negative, got {}",
                bad.amount
            )));
        }
        dividends.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { dividends })
    }

    /// A schedule with no dividends.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// The dividends in time order.
    #[must_use]
    pub fn dividends(&self) -> &[Dividend] {
        &self.dividends
    }

    /// The first dividend with `t1 <= time < t2`.
    pub(crate) fn first_in(&self, t1: f64, t2: f64) -> Option<Dividend> {
        self.dividends
            .iter()
            .find(|d| t1 <= d.time && d.time < t2)
            .copied()
    }

    /// Value at `from` of the dividends strictly between `from` and `to`.
    pub(crate) fn present_value_between<C: ZeroRateCurve + ?Sized>(
        &self,
        from: f64,
        to: f64,
        curve: &C,
    ) -> f64 {
        self.dividends
            .iter()
            .filter(|d| from < d.time && d.time < to)
            .map(|d| d.amount * (-curve.forward_rate(from, d.time) * (d.time - from)).exp())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_curve_interpolation() {
        let curve = ZeroCurve::new(vec![1.0, 2.0], vec![0.04, 0.05]).unwrap();
        assert_relative_eq!(curve.zero_rate(0.5), 0.04, epsilon = 1e-15);
        assert_relative_eq!(curve.zero_rate(1.5), 0.045, epsilon = 1e-15);
        assert_relative_eq!(curve.zero_rate(3.0), 0.05, epsilon = 1e-15);
    }

    #[test]
    fn test_forward_rate_consistency() {
        let curve = ZeroCurve::new(vec![1.0, 2.0], vec![0.04, 0.05]).unwrap();
        let fwd = curve.forward_rate(1.0, 2.0);
        assert_relative_eq!(fwd, 0.06, epsilon = 1e-12);
        let df = curve.discount_factor(1.0) * (-fwd).exp();
        assert_relative_eq!(df, curve.discount_factor(2.0), epsilon = 1e-14);
    }

    #[test]
    fn test_dividend_lookup() {
        let divs = DividendSchedule::new([(0.75, 1.0), (0.25, 2.0)]).unwrap();
        assert_eq!(divs.dividends()[0].time, 0.25);
        assert_eq!(divs.first_in(0.2, 0.3).map(|d| d.amount), Some(2.0));
        assert!(divs.first_in(0.3, 0.75).is_none());

        let flat = ZeroCurve::flat(0.05);
        let pv = divs.present_value_between(0.0, 1.0, &flat);
        let expected = 2.0 * (-0.05_f64 * 0.25).exp() + (-0.05_f64 * 0.75).exp();
        assert_relative_eq!(pv, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_dividend_rejected() {
        assert!(DividendSchedule::new([(0.5, -1.0)]).is_err());
    }
}
