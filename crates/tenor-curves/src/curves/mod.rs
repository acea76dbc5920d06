//! Built term structures.
//!
//! Every curve goes through the same life cycle:
//!
//! ```text
//! Unbuilt --build--> Bootstrapped --interpolator--> Interpolated
//! ```
//!
//! `build` creates instruments from the quoted assets, runs the
//! bootstrapper matching the curve type and attaches the interpolator.
//! Queries on a curve that is not `Interpolated` fail with
//! [`CurveError::NotBuilt`](crate::error::CurveError::NotBuilt).
//!
//! # Variants
//!
//! | Curve | Instruments | Stored quantity | Parent |
//! |-------|-------------|-----------------|--------|
//! | [`RateCurve`] | deposits, FRAs, futures, swaps | zero rate or discount factor | none |
//! | [`RateBasisCurve`] | basis swaps | zero spread | [`RateCurve`] |
//! | [`SurvivalProbabilityCurve`] | CDS | hazard rate or survival probability | discount [`RateCurve`] |
//! | [`EquityCurve`] | equity forwards | forward level | none |
//! | [`FxCurve`] | FX forwards | forward level | none |

mod common;
mod equity;
mod fx;
mod rate;
mod rate_basis;
mod survival;

pub use equity::EquityCurve;
pub use fx::FxCurve;
pub use rate::RateCurve;
pub use rate_basis::RateBasisCurve;
pub use survival::SurvivalProbabilityCurve;

pub(crate) use common::CurveCore;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tenor_core::calendars::Calendar;
use tenor_core::Date;

use crate::config::CurveConfig;
use crate::error::{CurveError, CurveResult};
use crate::identifier::{CurveIdentifier, PricingStructureType};
use crate::instruments::PriceableInstrument;
use crate::interpolator::CurveView;
use crate::quotes::QuotedAsset;
use crate::risk::PerturbedCurve;
use crate::term::TermFunction;

/// Build progress of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurveState {
    /// No term function yet.
    #[default]
    Unbuilt,
    /// Term function solved, interpolator not attached.
    Bootstrapped,
    /// Ready for queries.
    Interpolated,
}

impl fmt::Display for CurveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unbuilt => "Unbuilt",
            Self::Bootstrapped => "Bootstrapped",
            Self::Interpolated => "Interpolated",
        };
        f.write_str(name)
    }
}

/// How [`PricingStructure::forward_between`] reads the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvolutionType {
    /// Ratio of values: `value(to) / value(from)`.
    SpotToForward,
    /// The value at the target date itself.
    ForwardToSpot,
}

/// Common interface of the curve variants.
pub trait PricingStructure: Send + Sync {
    /// Curve identifier.
    fn identifier(&self) -> &CurveIdentifier;

    /// Stable string id, see [`CurveIdentifier::id`].
    fn id(&self) -> String {
        self.identifier().id()
    }

    /// Resolved configuration.
    fn config(&self) -> &CurveConfig;

    /// Build progress.
    fn state(&self) -> CurveState;

    /// Forward semantics of the curve.
    fn evolution_type(&self) -> EvolutionType;

    /// The quoted assets the curve is built from.
    fn quoted_assets(&self) -> &[QuotedAsset];

    /// Instruments from the last build; empty before the first.
    fn instruments(&self) -> &[Arc<dyn PriceableInstrument>];

    /// Solved term function, once bootstrapped.
    fn term_function(&self) -> Option<&TermFunction>;

    /// Creates instruments, bootstraps and attaches the interpolator.
    ///
    /// Building again from the same quotes gives the same curve.
    fn build(&mut self, calendar: &dyn Calendar) -> CurveResult<()>;

    /// Curve value at `date`.
    fn value(&self, date: Date) -> CurveResult<f64>;

    /// Forward between two dates according to [`evolution_type`](Self::evolution_type).
    fn forward_between(&self, from: Date, to: Date) -> CurveResult<f64> {
        match self.evolution_type() {
            EvolutionType::SpotToForward => {
                let start = self.value(from)?;
                if start == 0.0 {
                    return Err(CurveError::validation(format!(
                        "{}: zero value at {from}",
                        self.id()
                    )));
                }
                Ok(self.value(to)? / start)
            }
            EvolutionType::ForwardToSpot => self.value(to),
        }
    }

    /// Forward from the base date to `target`.
    fn forward(&self, target: Date) -> CurveResult<f64> {
        self.forward_between(self.identifier().base_date, target)
    }

    /// Survival probability to `date`.
    fn survival_probability(&self, date: Date) -> CurveResult<f64>;

    /// Adds `values[i]` to the `measure_type` quotation of asset `i`, then
    /// rebuilds in place.
    fn perturb_curve(
        &mut self,
        values: &[f64],
        measure_type: &str,
        calendar: &dyn Calendar,
    ) -> CurveResult<()>;

    /// One rebuilt curve per bumped instrument, leaving this curve untouched.
    fn create_curve_risk_set(
        &self,
        bp: f64,
        calendar: &dyn Calendar,
    ) -> CurveResult<Vec<PerturbedCurve>>;

    /// Unbuilt copy carrying a `.Clone` identity.
    fn clone_curve(&self) -> Self
    where
        Self: Sized;
}

/// Any curve, for code that handles them uniformly.
#[derive(Debug, Clone)]
pub enum CurveVariant {
    /// Discount curve.
    Rate(RateCurve),
    /// Spread curve over a discount curve.
    RateBasis(RateBasisCurve),
    /// Credit curve.
    Survival(SurvivalProbabilityCurve),
    /// Equity forward curve.
    Equity(EquityCurve),
    /// FX forward curve.
    Fx(FxCurve),
}

macro_rules! dispatch {
    ($self:ident, $curve:ident => $body:expr) => {
        match $self {
            CurveVariant::Rate($curve) => $body,
            CurveVariant::RateBasis($curve) => $body,
            CurveVariant::Survival($curve) => $body,
            CurveVariant::Equity($curve) => $body,
            CurveVariant::Fx($curve) => $body,
        }
    };
}

impl CurveVariant {
    /// Kind of the wrapped curve.
    #[must_use]
    pub fn pricing_structure_type(&self) -> PricingStructureType {
        self.identifier().pricing_structure_type
    }

    pub(crate) fn core_mut(&mut self) -> &mut CurveCore {
        dispatch!(self, c => c.core_mut())
    }

    /// The rate curve, if this is one.
    #[must_use]
    pub fn as_rate(&self) -> Option<&RateCurve> {
        match self {
            Self::Rate(curve) => Some(curve),
            _ => None,
        }
    }
}

impl PricingStructure for CurveVariant {
    fn identifier(&self) -> &CurveIdentifier {
        dispatch!(self, c => c.identifier())
    }

    fn config(&self) -> &CurveConfig {
        dispatch!(self, c => c.config())
    }

    fn state(&self) -> CurveState {
        dispatch!(self, c => c.state())
    }

    fn evolution_type(&self) -> EvolutionType {
        dispatch!(self, c => c.evolution_type())
    }

    fn quoted_assets(&self) -> &[QuotedAsset] {
        dispatch!(self, c => c.quoted_assets())
    }

    fn instruments(&self) -> &[Arc<dyn PriceableInstrument>] {
        dispatch!(self, c => c.instruments())
    }

    fn term_function(&self) -> Option<&TermFunction> {
        dispatch!(self, c => c.term_function())
    }

    fn build(&mut self, calendar: &dyn Calendar) -> CurveResult<()> {
        dispatch!(self, c => c.build(calendar))
    }

    fn value(&self, date: Date) -> CurveResult<f64> {
        dispatch!(self, c => c.value(date))
    }

    fn forward_between(&self, from: Date, to: Date) -> CurveResult<f64> {
        dispatch!(self, c => c.forward_between(from, to))
    }

    fn survival_probability(&self, date: Date) -> CurveResult<f64> {
        dispatch!(self, c => c.survival_probability(date))
    }

    fn perturb_curve(
        &mut self,
        values: &[f64],
        measure_type: &str,
        calendar: &dyn Calendar,
    ) -> CurveResult<()> {
        dispatch!(self, c => c.perturb_curve(values, measure_type, calendar))
    }

    fn create_curve_risk_set(
        &self,
        bp: f64,
        calendar: &dyn Calendar,
    ) -> CurveResult<Vec<PerturbedCurve>> {
        dispatch!(self, c => c.create_curve_risk_set(bp, calendar))
    }

    fn clone_curve(&self) -> Self {
        match self {
            Self::Rate(c) => Self::Rate(c.clone_curve()),
            Self::RateBasis(c) => Self::RateBasis(c.clone_curve()),
            Self::Survival(c) => Self::Survival(c.clone_curve()),
            Self::Equity(c) => Self::Equity(c.clone_curve()),
            Self::Fx(c) => Self::Fx(c.clone_curve()),
        }
    }
}

macro_rules! impl_curve_view {
    ($($curve:ty),+ $(,)?) => {
        $(
            impl CurveView for $curve {
                fn base_date(&self) -> Date {
                    self.identifier().base_date
                }

                fn value_at(&self, date: Date) -> CurveResult<f64> {
                    self.value(date)
                }
            }
        )+
    };
}

impl_curve_view!(
    RateCurve,
    RateBasisCurve,
    SurvivalProbabilityCurve,
    EquityCurve,
    FxCurve,
    CurveVariant,
);

macro_rules! impl_from_curve {
    ($($curve:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$curve> for CurveVariant {
                fn from(curve: $curve) -> Self {
                    Self::$variant(curve)
                }
            }
        )+
    };
}

impl_from_curve!(
    RateCurve => Rate,
    RateBasisCurve => RateBasis,
    SurvivalProbabilityCurve => Survival,
    EquityCurve => Equity,
    FxCurve => Fx,
);
