//! FX forward curve.

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

/// Outright forward rates of a currency pair, e.g. `AUDUSD`.
#[derive(Debug, Clone)]
pub struct FxCurve {
    core: CurveCore,
    spot: Option<f64>,
}

impl FxCurve {
    /// Unbuilt FX curve.
    #[must_use]
    pub fn new(identifier: CurveIdentifier, config: CurveConfig, assets: Vec<QuotedAsset>) -> Self {
        Self {
            core: CurveCore::new(identifier, config, assets, EvolutionType::ForwardToSpot),
            spot: None,
        }
    }

    /// Anchors the curve at the spot rate on the base date.
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

    /// Spot rate, if set.
    #[must_use]
    pub fn spot(&self) -> Option<f64> {
        self.spot
    }

    /// Forward minus spot at `date`, in rate units.
    pub fn forward_points(&self, date: Date) -> CurveResult<f64> {
        let spot = self.spot.ok_or_else(|| {
            CurveError::validation(format!("{} has no spot rate", self.core.identifier))
        })?;
        Ok(self.core.value(date)? - spot)
    }

    pub(crate) fn core_mut(&mut self) -> &mut CurveCore {
        &mut self.core
    }
}

impl PricingStructure for FxCurve {
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
            Ok(CurveVariant::Fx(curve))
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
