//! Sequential curve bootstrapping.
//!
//! Instruments are solved one pillar at a time, shortest first. Earlier
//! pillars stay fixed; the value at the new maturity is chosen so that the
//! instrument's implied quote matches its market quote:
//!
//! 1. if the instrument has a closed form and the curve stands alone, it is
//!    tried first and kept when it reprices within tolerance;
//! 2. otherwise the guess is bracketed and solved with Brent;
//! 3. a Brent result outside tolerance is retried with bisection on the
//!    same bracket.
//!
//! The partial curve is interpolated exactly as the finished curve will be,
//! with extrapolation always on.

mod credit;
mod forward;
mod rate;
mod spread;

pub use credit::CreditBootstrapper;
pub use forward::{EquityBootstrapper, ForwardLevelBootstrapper};
pub use rate::RateBootstrapper;
pub use spread::RateSpreadBootstrapper;

use std::cell::RefCell;
use std::sync::Arc;

use tenor_core::daycounts::{DayCount, DayCountConvention};
use tenor_core::Date;
use tenor_math::solvers::{bisection, brent, expand_bracket, SolverConfig, SolverResult};
use tracing::{debug, info};

use crate::config::{CurveConfig, InterpolationMethod, UnderlyingCurve};
use crate::error::{CurveError, CurveResult};
use crate::instruments::{PriceableInstrument, PricingContext};
use crate::interpolator::{
    discount_factor_to_zero_rate, CurveView, InterpolationSettings, SpreadInterpolator,
    TermCurveInterpolator, ValueTransform,
};
use crate::term::{TermFunction, TermPoint};

/// Attempts at widening a bracket before giving up.
const MAX_BRACKET_EXPANSIONS: u32 = 60;

/// Smallest half-width of the initial bracket.
const MIN_BRACKET_HALF_WIDTH: f64 = 1e-3;

/// Numerical policy for a bootstrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapSettings {
    /// Interpolation of the partial curve.
    pub interpolation: InterpolationMethod,
    /// Carried into the finished curve; partial curves always extrapolate.
    pub extrapolation_permitted: bool,
    /// Tolerance on `|implied - market|`.
    pub tolerance: f64,
    /// Iteration budget per pillar.
    pub max_iterations: u32,
    /// Day count for curve time.
    pub day_count: DayCountConvention,
    /// Space the solved values live in.
    pub transform: ValueTransform,
    /// Known value at the base date.
    pub anchor: Option<f64>,
}

impl BootstrapSettings {
    /// Settings read from a resolved curve configuration.
    ///
    /// Zero and hazard curves store rates; discount and survival curves
    /// store factors anchored at 1 on the base date.
    #[must_use]
    pub fn from_config(config: &CurveConfig) -> Self {
        let transform = if config.underlying_curve.is_rate_space() {
            ValueTransform::ZeroRateToDiscountFactor(config.compounding)
        } else {
            ValueTransform::None
        };
        let anchor = match config.underlying_curve {
            UnderlyingCurve::DiscountCurve | UnderlyingCurve::SurvivalCurve => Some(1.0),
            _ => None,
        };
        Self {
            interpolation: config.bootstrapper_interpolation,
            extrapolation_permitted: config.extrapolation_permitted,
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            day_count: config.day_count,
            transform,
            anchor,
        }
    }

    /// Replaces the base-date anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Option<f64>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Replaces the value transform.
    #[must_use]
    pub fn with_transform(mut self, transform: ValueTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Interpolation settings for a partial curve.
    #[must_use]
    pub fn partial_interpolation(&self) -> InterpolationSettings {
        InterpolationSettings::new(self.interpolation)
            .with_day_count(self.day_count)
            .with_transform(self.transform)
            .with_anchor(self.anchor)
            .with_extrapolation(true)
    }

    fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }
}

/// Solves a term function from instruments.
pub trait Bootstrapper {
    /// Solves one point per instrument.
    ///
    /// Instruments must be non-empty and strictly ascending by maturity.
    fn bootstrap(
        &self,
        instruments: &[Arc<dyn PriceableInstrument>],
        base_date: Date,
        settings: &BootstrapSettings,
    ) -> CurveResult<TermFunction>;
}

/// How the curve being solved relates to other curves while pricing.
#[derive(Clone, Copy)]
pub(crate) enum Layering<'a> {
    /// The curve prices on its own.
    Standalone,
    /// Values are zero spreads over `base`; instruments see the composite
    /// and `base` as the discount curve.
    Spread(&'a dyn CurveView),
    /// Instruments need `discount` alongside the curve.
    Discounted(&'a dyn CurveView),
}

/// Checks the instrument list: non-empty, after the base date, strictly
/// ascending by maturity.
pub(crate) fn validate_instruments(
    instruments: &[Arc<dyn PriceableInstrument>],
    base_date: Date,
) -> CurveResult<()> {
    let first = instruments
        .first()
        .ok_or_else(|| CurveError::validation("cannot bootstrap from no instruments"))?;
    if first.risk_maturity_date() <= base_date {
        return Err(CurveError::validation(format!(
            "{} matures on or before the base date {base_date}",
            first.id()
        )));
    }
    for pair in instruments.windows(2) {
        if pair[1].risk_maturity_date() <= pair[0].risk_maturity_date() {
            return Err(CurveError::validation(format!(
                "instruments not strictly ascending by maturity: {} ({}) then {} ({})",
                pair[0].id(),
                pair[0].risk_maturity_date(),
                pair[1].id(),
                pair[1].risk_maturity_date()
            )));
        }
    }
    Ok(())
}

/// Reprices `instrument` with `value` appended at its maturity.
fn pillar_residual(
    solved: &TermFunction,
    point: TermPoint,
    instrument: &dyn PriceableInstrument,
    base_date: Date,
    settings: &BootstrapSettings,
    layering: Layering<'_>,
) -> CurveResult<f64> {
    let mut trial = solved.clone();
    trial.push(point)?;
    let partial = TermCurveInterpolator::new(trial, base_date, settings.partial_interpolation())?;
    let implied = match layering {
        Layering::Standalone => instrument.implied_quote(&PricingContext::new(&partial))?,
        Layering::Discounted(discount) => instrument
            .implied_quote(&PricingContext::new(&partial).with_discount(discount))?,
        Layering::Spread(base) => {
            let composite = SpreadInterpolator::new(base, partial);
            instrument.implied_quote(&PricingContext::new(&composite).with_discount(base))?
        }
    };
    Ok(implied - instrument.market_quote())
}

/// Shared pillar-by-pillar solver behind every bootstrapper.
pub(crate) fn bootstrap_sequential(
    instruments: &[Arc<dyn PriceableInstrument>],
    base_date: Date,
    settings: &BootstrapSettings,
    layering: Layering<'_>,
) -> CurveResult<TermFunction> {
    validate_instruments(instruments, base_date)?;
    let positive_only = settings.transform == ValueTransform::None
        && !matches!(layering, Layering::Spread(_));

    let mut solved = TermFunction::new();
    for instrument in instruments {
        let instrument = instrument.as_ref();
        let maturity = instrument.risk_maturity_date();
        let t = settings.day_count.year_fraction_f64(base_date, maturity);
        let point = |value: f64| TermPoint::new(maturity, value).with_id(instrument.id());

        let closed_form = match layering {
            Layering::Standalone => {
                closed_form_guess(&solved, instrument, base_date, settings, t)?
            }
            _ => None,
        };
        if let Some(value) = closed_form {
            let residual =
                pillar_residual(&solved, point(value), instrument, base_date, settings, layering)?;
            if residual.abs() <= settings.tolerance {
                debug!(
                    instrument = instrument.id(),
                    %maturity,
                    value,
                    "pillar solved in closed form"
                );
                solved.push(point(value))?;
                continue;
            }
        }

        let guess = closed_form
            .or_else(|| solved.last().map(|p| p.value))
            .unwrap_or_else(|| match (settings.transform, settings.anchor) {
                (ValueTransform::None, Some(anchor)) if positive_only => anchor,
                _ => instrument.market_quote(),
            });

        let failure: RefCell<Option<CurveError>> = RefCell::new(None);
        let objective = |value: f64| -> f64 {
            match pillar_residual(&solved, point(value), instrument, base_date, settings, layering)
            {
                Ok(r) => r,
                Err(e) => {
                    failure.borrow_mut().get_or_insert(e);
                    f64::NAN
                }
            }
        };

        let result = solve_pillar(&objective, guess, positive_only, settings);
        if let Some(e) = failure.take() {
            return Err(e);
        }
        let result = result.map_err(|e| match e {
            CurveError::Math(math) => {
                let (iterations, residual) = match math {
                    tenor_math::MathError::ConvergenceFailed {
                        iterations,
                        residual,
                    } => (iterations, residual),
                    tenor_math::MathError::InvalidBracket { fa, fb, .. } => {
                        (0, fa.abs().min(fb.abs()))
                    }
                    _ => (0, f64::NAN),
                };
                CurveError::convergence(instrument.id(), iterations, residual)
            }
            other => other,
        })?;

        debug!(
            instrument = instrument.id(),
            %maturity,
            value = result.root,
            iterations = result.iterations,
            residual = result.residual,
            "pillar solved"
        );
        solved.push(point(result.root))?;
    }

    info!(%base_date, points = solved.len(), "bootstrap complete");
    Ok(solved)
}

/// Closed-form value converted into the stored space.
fn closed_form_guess(
    solved: &TermFunction,
    instrument: &dyn PriceableInstrument,
    base_date: Date,
    settings: &BootstrapSettings,
    t: f64,
) -> CurveResult<Option<f64>> {
    let partial =
        TermCurveInterpolator::new(solved.clone(), base_date, settings.partial_interpolation())?;
    let value = instrument.closed_form_value(&PricingContext::new(&partial))?;
    Ok(value.map(|v| match settings.transform {
        ValueTransform::None => v,
        ValueTransform::ZeroRateToDiscountFactor(c) => discount_factor_to_zero_rate(v, t, c),
    }))
}

/// Brackets around `guess`, solves with Brent and retries with bisection.
fn solve_pillar<F>(
    objective: &F,
    guess: f64,
    positive_only: bool,
    settings: &BootstrapSettings,
) -> CurveResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let half_width = (0.1 * guess.abs()).max(MIN_BRACKET_HALF_WIDTH);
    let mut lo = guess - half_width;
    if positive_only {
        lo = lo.max(0.5 * guess);
    }
    let hi = guess + half_width;
    let lower_limit = positive_only.then_some(0.0);
    let (a, b) = expand_bracket(objective, lo, hi, lower_limit, MAX_BRACKET_EXPANSIONS)?;

    let config = settings.solver_config();
    match brent(objective, a, b, &config) {
        Ok(result) if result.is_within(settings.tolerance) => Ok(result),
        _ => {
            let result = bisection(objective, a, b, &config)?;
            if result.is_within(settings.tolerance) {
                Ok(result)
            } else {
                Err(CurveError::Math(tenor_math::MathError::convergence_failed(
                    result.iterations,
                    result.residual.abs(),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurveConfig;
    use crate::identifier::PricingStructureType;
    use crate::instruments::{DefaultInstrumentFactory, InstrumentFactory};
    use crate::quotes::{QuoteUnits, QuotedAsset};
    use tenor_core::calendars::WeekendCalendar;

    fn base() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    fn instrument(id: &str, value: f64) -> Arc<dyn PriceableInstrument> {
        let asset = QuotedAsset::with_market_quote(id, value, QuoteUnits::DecimalRate);
        DefaultInstrumentFactory
            .create(&asset, base(), &WeekendCalendar)
            .unwrap()
    }

    #[test]
    fn test_settings_from_config() {
        let rate = BootstrapSettings::from_config(&CurveConfig::default_for(
            PricingStructureType::RateCurve,
        ));
        assert!(matches!(rate.transform, ValueTransform::ZeroRateToDiscountFactor(_)));
        assert_eq!(rate.anchor, None);

        let discount = BootstrapSettings::from_config(
            &CurveConfig::default_for(PricingStructureType::RateCurve)
                .with_underlying_curve(UnderlyingCurve::DiscountCurve),
        );
        assert_eq!(discount.transform, ValueTransform::None);
        assert_eq!(discount.anchor, Some(1.0));
    }

    #[test]
    fn test_validation() {
        assert!(validate_instruments(&[], base()).is_err());

        let unsorted = vec![instrument("AUD-IRSwap-2Y", 0.04), instrument("AUD-IRSwap-1Y", 0.04)];
        assert!(matches!(
            validate_instruments(&unsorted, base()),
            Err(CurveError::Validation { .. })
        ));

        let duplicate = vec![instrument("AUD-Deposit-12M", 0.04), instrument("AUD-IRSwap-1Y", 0.04)];
        assert!(validate_instruments(&duplicate, base()).is_err());

        let sorted = vec![instrument("AUD-Deposit-3M", 0.04), instrument("AUD-IRSwap-1Y", 0.04)];
        assert!(validate_instruments(&sorted, base()).is_ok());
    }
}
