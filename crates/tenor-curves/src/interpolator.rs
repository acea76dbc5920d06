//! Dated interpolation over term functions.
//!
//! A [`TermCurveInterpolator`] maps a date to curve time with the curve's
//! day count, interpolates the stored values with a method from
//! [`tenor_math::interpolation`], and optionally turns the result from a
//! rate into a factor. [`SpreadInterpolator`] layers a zero spread on any
//! other [`CurveView`].
//!
//! A knot at curve time zero is always present when the first pillar lies
//! after the base date:
//!
//! | Stored values | Method | Front knot |
//! |---------------|--------|------------|
//! | zero rates | log-linear | `-ln DF = 0` |
//! | zero rates | other | first rate, flat |
//! | direct | any | the anchor, or the first value flat |

use std::fmt;
use std::sync::Arc;

use tenor_core::daycounts::{DayCount, DayCountConvention};
use tenor_core::types::Compounding;
use tenor_core::Date;
use tenor_math::interpolation::{
    bracketing_indices, CubicSpline, FlatInterpolator, Interpolator, LinearInterpolator,
    LogLinearInterpolator,
};

use crate::config::InterpolationMethod;
use crate::error::{CurveError, CurveResult};
use crate::term::{TermFunction, TermPoint};

/// Knots closer than this to a domain edge count as inside it.
const DOMAIN_EPSILON: f64 = 1e-12;

/// Anything that gives a value per date.
pub trait CurveView: Send + Sync {
    /// Valuation date.
    fn base_date(&self) -> Date;

    /// Curve value at `date`.
    fn value_at(&self, date: Date) -> CurveResult<f64>;
}

impl<T: CurveView + ?Sized> CurveView for &T {
    fn base_date(&self) -> Date {
        (**self).base_date()
    }

    fn value_at(&self, date: Date) -> CurveResult<f64> {
        (**self).value_at(date)
    }
}

impl<T: CurveView + ?Sized> CurveView for Arc<T> {
    fn base_date(&self) -> Date {
        (**self).base_date()
    }

    fn value_at(&self, date: Date) -> CurveResult<f64> {
        (**self).value_at(date)
    }
}

/// Discount factor for a zero rate over `t` years.
#[must_use]
pub fn zero_rate_to_discount_factor(rate: f64, t: f64, compounding: Compounding) -> f64 {
    compounding.discount_factor(rate, t)
}

/// Zero rate for a discount factor over `t` years; zero at `t <= 0`.
#[must_use]
pub fn discount_factor_to_zero_rate(df: f64, t: f64, compounding: Compounding) -> f64 {
    compounding.zero_rate(df, t)
}

/// Conversion applied to interpolated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueTransform {
    /// Values are returned as interpolated.
    #[default]
    None,
    /// Values are zero (or hazard) rates returned as discount (or survival) factors.
    ZeroRateToDiscountFactor(Compounding),
}

/// How a term function is turned into a continuous curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationSettings {
    /// Interpolation method.
    pub method: InterpolationMethod,
    /// Day count for curve time.
    pub day_count: DayCountConvention,
    /// Post-interpolation transform.
    pub transform: ValueTransform,
    /// Known value at the base date, for direct curves.
    pub anchor: Option<f64>,
    /// Whether queries may leave the knot range.
    pub extrapolation_permitted: bool,
}

impl InterpolationSettings {
    /// Linear, ACT/365F, no transform, no anchor, extrapolating.
    #[must_use]
    pub fn new(method: InterpolationMethod) -> Self {
        Self {
            method,
            day_count: DayCountConvention::Act365Fixed,
            transform: ValueTransform::None,
            anchor: None,
            extrapolation_permitted: true,
        }
    }

    /// Sets the day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: ValueTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the base-date anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Option<f64>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the extrapolation flag.
    #[must_use]
    pub fn with_extrapolation(mut self, permitted: bool) -> Self {
        self.extrapolation_permitted = permitted;
        self
    }
}

/// Knot-space representation chosen from the settings.
#[derive(Debug, Clone, Copy, PartialEq)]
enum KnotSpace {
    /// Interpolate the stored values directly.
    Direct,
    /// Interpolate zero rates, then convert.
    ZeroRate(Compounding),
    /// Interpolate `-ln DF` linearly, then exponentiate.
    LogDiscount(Compounding),
}

#[derive(Clone)]
enum Engine {
    Constant(f64),
    Knots(Arc<dyn Interpolator>),
}

/// A term function made continuous.
#[derive(Clone)]
pub struct TermCurveInterpolator {
    base_date: Date,
    settings: InterpolationSettings,
    function: TermFunction,
    times: Vec<f64>,
    space: KnotSpace,
    engine: Engine,
    domain: (f64, f64),
}

impl fmt::Debug for TermCurveInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermCurveInterpolator")
            .field("base_date", &self.base_date)
            .field("settings", &self.settings)
            .field("points", &self.function.len())
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

impl TermCurveInterpolator {
    /// Builds an interpolator over `function`.
    ///
    /// An empty function is allowed when the value at every date is known:
    /// a zero-rate curve (factor 1) or a direct curve with an anchor.
    pub fn new(
        function: TermFunction,
        base_date: Date,
        settings: InterpolationSettings,
    ) -> CurveResult<Self> {
        let times = function.times(base_date, &settings.day_count);
        let space = match settings.transform {
            ValueTransform::None => KnotSpace::Direct,
            ValueTransform::ZeroRateToDiscountFactor(c)
                if matches!(
                    settings.method,
                    InterpolationMethod::LogLinear | InterpolationMethod::FlatForward
                ) =>
            {
                KnotSpace::LogDiscount(c)
            }
            ValueTransform::ZeroRateToDiscountFactor(c) => KnotSpace::ZeroRate(c),
        };

        let mut xs = Vec::with_capacity(times.len() + 1);
        let mut ys = Vec::with_capacity(times.len() + 1);
        if let (Some(&t0), Some(first)) = (times.first(), function.first()) {
            if t0 > 0.0 {
                let front = match space {
                    KnotSpace::Direct => settings.anchor.unwrap_or(first.value),
                    KnotSpace::ZeroRate(_) => first.value,
                    KnotSpace::LogDiscount(_) => 0.0,
                };
                xs.push(0.0);
                ys.push(front);
            }
        }
        for (t, point) in times.iter().zip(function.points()) {
            xs.push(*t);
            ys.push(match space {
                KnotSpace::LogDiscount(c) => -c.discount_factor(point.value, *t).ln(),
                _ => point.value,
            });
        }

        let (engine, domain) = match xs.len() {
            0 => {
                let value = match (space, settings.anchor) {
                    (KnotSpace::Direct, Some(anchor)) => anchor,
                    (KnotSpace::Direct, None) => {
                        return Err(CurveError::validation(
                            "cannot interpolate an empty term function without an anchor",
                        ))
                    }
                    (KnotSpace::ZeroRate(_), _) => 0.0,
                    (KnotSpace::LogDiscount(_), _) => 0.0,
                };
                (Engine::Constant(value), (0.0, 0.0))
            }
            1 => (Engine::Constant(ys[0]), (xs[0], xs[0])),
            _ => {
                let domain = (xs[0], xs[xs.len() - 1]);
                (Engine::Knots(build_engine(settings.method, space, xs, ys)?), domain)
            }
        };

        Ok(Self {
            base_date,
            settings,
            function,
            times,
            space,
            engine,
            domain,
        })
    }

    /// The term function behind the curve.
    #[must_use]
    pub fn term_function(&self) -> &TermFunction {
        &self.function
    }

    /// Settings used to build this interpolator.
    #[must_use]
    pub fn settings(&self) -> &InterpolationSettings {
        &self.settings
    }

    /// Curve time of `date`.
    #[must_use]
    pub fn time(&self, date: Date) -> f64 {
        self.settings
            .day_count
            .year_fraction_f64(self.base_date, date)
    }

    /// Value at curve time `t`.
    pub fn value_at_time(&self, t: f64) -> CurveResult<f64> {
        let empty = self.function.is_empty();
        if !empty && !self.settings.extrapolation_permitted {
            let (min, max) = self.domain;
            if t < min - DOMAIN_EPSILON || t > max + DOMAIN_EPSILON {
                return Err(CurveError::domain(t, min, max));
            }
        }
        let raw = match &self.engine {
            Engine::Constant(v) => *v,
            Engine::Knots(engine) => engine.interpolate(t)?,
        };
        Ok(match self.space {
            KnotSpace::Direct => raw,
            KnotSpace::ZeroRate(c) => c.discount_factor(raw, t),
            KnotSpace::LogDiscount(_) => (-raw).exp(),
        })
    }

    /// The stored (untransformed) quantity at curve time `t`.
    ///
    /// For zero-rate curves this is the zero rate, otherwise the same as
    /// [`value_at_time`](Self::value_at_time).
    pub fn raw_value_at_time(&self, t: f64) -> CurveResult<f64> {
        match self.space {
            KnotSpace::Direct => self.value_at_time(t),
            KnotSpace::ZeroRate(c) | KnotSpace::LogDiscount(c) => {
                if t <= 0.0 {
                    return Ok(self.function.first().map_or(0.0, |p| p.value));
                }
                let df = self.value_at_time(t)?;
                Ok(discount_factor_to_zero_rate(df, t, c))
            }
        }
    }

    /// The two stored points strictly bracketing `date`.
    ///
    /// `None` when the date falls on a pillar or outside the pillar range.
    #[must_use]
    pub fn closest_values(&self, date: Date) -> Option<(TermPoint, TermPoint)> {
        let points = self.function.points();
        bracketing_indices(&self.times, self.time(date))
            .map(|(lo, hi)| (points[lo].clone(), points[hi].clone()))
    }
}

impl CurveView for TermCurveInterpolator {
    fn base_date(&self) -> Date {
        self.base_date
    }

    fn value_at(&self, date: Date) -> CurveResult<f64> {
        self.value_at_time(self.time(date))
    }
}

fn build_engine(
    method: InterpolationMethod,
    space: KnotSpace,
    xs: Vec<f64>,
    ys: Vec<f64>,
) -> CurveResult<Arc<dyn Interpolator>> {
    // -ln DF is always interpolated linearly; that is what log-linear on DF means
    let method = match space {
        KnotSpace::LogDiscount(_) => InterpolationMethod::Linear,
        _ => method,
    };
    let engine: Arc<dyn Interpolator> = match method {
        InterpolationMethod::Linear => {
            Arc::new(LinearInterpolator::new(xs, ys)?.with_extrapolation())
        }
        InterpolationMethod::LogLinear | InterpolationMethod::FlatForward => {
            Arc::new(LogLinearInterpolator::new(xs, ys)?.with_extrapolation())
        }
        InterpolationMethod::CubicSpline if xs.len() >= 3 => {
            Arc::new(CubicSpline::new(xs, ys)?.with_extrapolation())
        }
        InterpolationMethod::CubicSpline => {
            Arc::new(LinearInterpolator::new(xs, ys)?.with_extrapolation())
        }
        InterpolationMethod::Flat => Arc::new(FlatInterpolator::new(xs, ys)?.with_extrapolation()),
    };
    Ok(engine)
}

/// A zero spread layered on a base curve: `base(d) * exp(-s(t) * t)`.
#[derive(Debug, Clone)]
pub struct SpreadInterpolator<B> {
    base: B,
    spread: TermCurveInterpolator,
}

impl<B: CurveView> SpreadInterpolator<B> {
    /// Combines a base curve with a spread interpolator.
    pub fn new(base: B, spread: TermCurveInterpolator) -> Self {
        Self { base, spread }
    }

    /// The spread component.
    pub fn spread(&self) -> &TermCurveInterpolator {
        &self.spread
    }

    /// The base component.
    pub fn base(&self) -> &B {
        &self.base
    }

    /// Spread at `date`.
    pub fn spread_at(&self, date: Date) -> CurveResult<f64> {
        self.spread.value_at(date)
    }
}

impl<B: CurveView> CurveView for SpreadInterpolator<B> {
    fn base_date(&self) -> Date {
        self.spread.base_date()
    }

    fn value_at(&self, date: Date) -> CurveResult<f64> {
        let t = self.spread.time(date);
        let s = self.spread.value_at_time(t)?;
        Ok(self.base.value_at(date)? * (-s * t).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    fn zero_function() -> TermFunction {
        TermFunction::from_points(vec![
            TermPoint::new(base().add_days(365), 0.04),
            TermPoint::new(base().add_days(730), 0.05),
        ])
        .unwrap()
    }

    fn zero_settings(method: InterpolationMethod) -> InterpolationSettings {
        InterpolationSettings::new(method)
            .with_transform(ValueTransform::ZeroRateToDiscountFactor(Compounding::Continuous))
    }

    #[test]
    fn test_linear_zero_to_discount_factor() {
        let curve =
            TermCurveInterpolator::new(zero_function(), base(), zero_settings(InterpolationMethod::Linear))
                .unwrap();
        assert_relative_eq!(curve.value_at(base()).unwrap(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(
            curve.value_at(base().add_days(365)).unwrap(),
            (-0.04_f64).exp(),
            epsilon = 1e-14
        );
        // halfway in time: zero rate 0.045 over 1.5 years
        assert_relative_eq!(
            curve.value_at_time(1.5).unwrap(),
            (-0.045_f64 * 1.5).exp(),
            epsilon = 1e-14
        );
        // flat front
        assert_relative_eq!(curve.raw_value_at_time(0.5).unwrap(), 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_log_linear_zero_is_constant_forward() {
        let curve = TermCurveInterpolator::new(
            zero_function(),
            base(),
            zero_settings(InterpolationMethod::LogLinear),
        )
        .unwrap();
        let df1 = (-0.04_f64).exp();
        let df2 = (-0.10_f64).exp();
        let mid = curve.value_at_time(1.5).unwrap();
        assert_relative_eq!(mid, (df1 * df2).sqrt(), epsilon = 1e-14);
        assert_relative_eq!(curve.value_at_time(0.0).unwrap(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_flat_forward_on_zero_and_discount_functions() {
        let curve = TermCurveInterpolator::new(
            zero_function(),
            base(),
            zero_settings(InterpolationMethod::FlatForward),
        )
        .unwrap();
        // forward between the 1Y and 2Y pillars is (0.10 - 0.04) / 1
        let forward = (curve.value_at_time(1.25).unwrap() / curve.value_at_time(1.75).unwrap())
            .ln()
            / 0.5;
        assert_relative_eq!(forward, 0.06, epsilon = 1e-12);

        let discount = TermFunction::from_points(vec![
            TermPoint::new(base().add_days(365), (-0.04_f64).exp()),
            TermPoint::new(base().add_days(730), (-0.10_f64).exp()),
        ])
        .unwrap();
        let settings =
            InterpolationSettings::new(InterpolationMethod::FlatForward).with_anchor(Some(1.0));
        let direct = TermCurveInterpolator::new(discount, base(), settings).unwrap();
        assert_relative_eq!(
            direct.value_at_time(1.5).unwrap(),
            curve.value_at_time(1.5).unwrap(),
            epsilon = 1e-14
        );
        assert_relative_eq!(direct.value_at_time(0.5).unwrap(), (-0.02_f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn test_direct_with_anchor() {
        let function = TermFunction::from_points(vec![
            TermPoint::new(base().add_days(365), 102.0),
            TermPoint::new(base().add_days(730), 104.0),
        ])
        .unwrap();
        let settings = InterpolationSettings::new(InterpolationMethod::Linear).with_anchor(Some(100.0));
        let curve = TermCurveInterpolator::new(function, base(), settings).unwrap();
        assert_relative_eq!(curve.value_at(base()).unwrap(), 100.0);
        assert_relative_eq!(curve.value_at_time(0.5).unwrap(), 101.0, epsilon = 1e-12);
    }

    #[test]
    fn test_domain_error_without_extrapolation() {
        let settings = zero_settings(InterpolationMethod::Linear).with_extrapolation(false);
        let curve = TermCurveInterpolator::new(zero_function(), base(), settings).unwrap();
        assert!(curve.value_at(base().add_days(500)).is_ok());
        match curve.value_at(base().add_days(3650)) {
            Err(CurveError::Domain { requested, max, .. }) => {
                assert!(requested > max);
                assert_relative_eq!(max, 2.0, epsilon = 1e-12);
            }
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_functions() {
        let zero = TermCurveInterpolator::new(
            TermFunction::new(),
            base(),
            zero_settings(InterpolationMethod::Linear),
        )
        .unwrap();
        assert_eq!(zero.value_at(base().add_days(100)).unwrap(), 1.0);

        let anchored = TermCurveInterpolator::new(
            TermFunction::new(),
            base(),
            InterpolationSettings::new(InterpolationMethod::Linear).with_anchor(Some(1.0)),
        )
        .unwrap();
        assert_eq!(anchored.value_at(base().add_days(100)).unwrap(), 1.0);

        assert!(TermCurveInterpolator::new(
            TermFunction::new(),
            base(),
            InterpolationSettings::new(InterpolationMethod::Linear),
        )
        .is_err());
    }

    #[test]
    fn test_cubic_falls_back_with_few_knots() {
        let function =
            TermFunction::from_points(vec![TermPoint::new(base().add_days(365), 0.04)]).unwrap();
        let curve = TermCurveInterpolator::new(
            function,
            base(),
            zero_settings(InterpolationMethod::CubicSpline),
        )
        .unwrap();
        assert_relative_eq!(
            curve.value_at_time(3.0).unwrap(),
            (-0.12_f64).exp(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_closest_values() {
        let curve =
            TermCurveInterpolator::new(zero_function(), base(), zero_settings(InterpolationMethod::Linear))
                .unwrap();
        let (lo, hi) = curve.closest_values(base().add_days(500)).unwrap();
        assert_eq!(lo.date, base().add_days(365));
        assert_eq!(hi.date, base().add_days(730));
        assert!(curve.closest_values(base().add_days(365)).is_none());
        assert!(curve.closest_values(base().add_days(100)).is_none());
        assert!(curve.closest_values(base().add_days(1000)).is_none());
    }

    #[test]
    fn test_spread_over_base() {
        let base_curve =
            TermCurveInterpolator::new(zero_function(), base(), zero_settings(InterpolationMethod::Linear))
                .unwrap();
        let spread_fn =
            TermFunction::from_points(vec![TermPoint::new(base().add_days(730), 0.001)]).unwrap();
        let spread = TermCurveInterpolator::new(
            spread_fn,
            base(),
            InterpolationSettings::new(InterpolationMethod::Linear),
        )
        .unwrap();
        let composite = SpreadInterpolator::new(&base_curve, spread);
        let d = base().add_days(730);
        assert_relative_eq!(
            composite.value_at(d).unwrap(),
            base_curve.value_at(d).unwrap() * (-0.002_f64).exp(),
            epsilon = 1e-14
        );
        assert_relative_eq!(composite.value_at(base()).unwrap(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_rate_factor_conversions() {
        let df = zero_rate_to_discount_factor(0.05, 2.0, Compounding::Annual);
        assert_relative_eq!(df, 1.05_f64.powi(-2), epsilon = 1e-14);
        assert_relative_eq!(
            discount_factor_to_zero_rate(df, 2.0, Compounding::Annual),
            0.05,
            epsilon = 1e-12
        );
    }
}
