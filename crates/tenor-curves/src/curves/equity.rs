//! Equity forward curve.

use std::sync::Arc;

use tenor_core::calendars::Calendar;
use tenor_core::Date;

use super::common::{build_forward_levels, no_survival};
use super::{CurveCore, CurveState, CurveVariant, EvolutionType, PricingStructure};
use crate::config::CurveConfig;
use crate::error::{CurveError, CurveResult};
use crate::identifier::CurveIdentifier;
use crate::instruments::{InstrumentFactory, PriceableInstrument};
use crate::quotes::QuotedAsset;
use crate::risk::{bump_each, PerturbedCurve};
use crate::term::TermFunction;

/// Forward levels of an equity underlying.
///
/// With a spot level the curve starts at spot on the base date; without
/// one it is flat back from the first forward.
#[derive(Debug, Clone)]
pub struct EquityCurve {
    core: CurveCore,
    spot: Option<f64>,
}

impl EquityCurve {
    /// Unbuilt equity curve.
    #[must_use]
    pub fn new(identifier: CurveIdentifier, config: CurveConfig, assets: Vec<QuotedAsset>) -> Self {
        Self {
            core: CurveCore::new(identifier, config, assets, EvolutionType::ForwardToSpot),
            spot: None,
        }
    }

    /// Anchors the curve at `spot` on the base date.
    #[must_use]
    pub fn with_spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Replaces the instrument factory.
    #[must_use]
    pub fn with_factory(mut self, factory: Arc<dyn InstrumentFactory>) -> Self {
        self.core.factory = factory;
        self
    }

    /// Replaces the evolution type.
    #[must_use]
    pub fn with_evolution_type(mut self, evolution: EvolutionType) -> Self {
        self.core.evolution = evolution;
        self
    }

    /// Spot level, if set.
    #[must_use]
    pub fn spot(&self) -> Option<f64> {
        self.spot
    }

    /// Continuously compounded carry implied by spot and the forward at
    /// `date`: `ln(F / S) / t`.
    pub fn implied_carry(&self, date: Date) -> CurveResult<f64> {
        let spot = self.spot.ok_or_else(|| {
            CurveError::validation(format!("{} has no spot level", self.core.identifier))
        })?;
        let interpolator = self.core.interpolator()?;
        let t = interpolator.time(date);
        if t <= 0.0 {
            return Err(CurveError::validation(format!(
                "carry needs a date after the base date, got {date}"
            )));
        }
        Ok((interpolator.value_at_time(t)? / spot).ln() / t)
    }

    pub(crate) fn core_mut(&mut self) -> &mut CurveCore {
        &mut self.core
    }
}

impl PricingStructure for EquityCurve {
    fn identifier(&self) -> &CurveIdentifier {
        &self.core.identifier
    }

    fn config(&self) -> &CurveConfig {
        &self.core.config
    }

    fn state(&self) -> CurveState {
        self.core.state
    }

    fn evolution_type(&self) -> EvolutionType {
        self.core.evolution
    }

    fn quoted_assets(&self) -> &[QuotedAsset] {
        &self.core.assets
    }

    fn instruments(&self) -> &[Arc<dyn PriceableInstrument>] {
        &self.core.instruments
    }

    fn term_function(&self) -> Option<&TermFunction> {
        self.core.term_function.as_ref()
    }

    fn build(&mut self, calendar: &dyn Calendar) -> CurveResult<()> {
        build_forward_levels(&mut self.core, self.spot, calendar)
    }

    fn value(&self, date: Date) -> CurveResult<f64> {
        self.core.value(date)
    }

    fn survival_probability(&self, _date: Date) -> CurveResult<f64> {
        Err(no_survival(&self.core))
    }

    fn perturb_curve(
        &mut self,
        values: &[f64],
        measure_type: &str,
        calendar: &dyn Calendar,
    ) -> CurveResult<()> {
        self.core.perturb_assets(values, measure_type)?;
        self.build(calendar)
    }

    fn create_curve_risk_set(
        &self,
        bp: f64,
        calendar: &dyn Calendar,
    ) -> CurveResult<Vec<PerturbedCurve>> {
        let bumped = bump_each(&self.core.assets, bp, |assets| {
            let mut curve = Self {
                core: self.core.with_assets(assets),
                spot: self.spot,
            };
            curve.build(calendar)?;
            Ok(CurveVariant::Equity(curve))
        })?;
        Ok(PerturbedCurve::tag_all(&self.core.identifier, bp, bumped))
    }

    fn clone_curve(&self) -> Self {
        Self {
            core: self.core.cloned(),
            spot: self.spot,
        }
    }
}
