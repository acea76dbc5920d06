//! Credit curve.

use std::sync::Arc;

use tenor_core::calendars::Calendar;
use tenor_core::Date;

use super::{CurveCore, CurveState, CurveVariant, EvolutionType, PricingStructure, RateCurve};
use crate::bootstrap::{BootstrapSettings, Bootstrapper, CreditBootstrapper};
use crate::config::CurveConfig;
use crate::error::{CurveError, CurveResult};
use crate::identifier::CurveIdentifier;
use crate::instruments::{InstrumentFactory, PriceableInstrument};
use crate::quotes::QuotedAsset;
use crate::risk::{bump_each, PerturbedCurve};
use crate::term::TermFunction;

/// Survival probabilities bootstrapped from CDS par spreads.
///
/// The discount curve prices the premium and protection legs; it does
/// not enter the curve values.
#[derive(Debug, Clone)]
pub struct SurvivalProbabilityCurve {
    core: CurveCore,
    discount: Arc<RateCurve>,
}

impl SurvivalProbabilityCurve {
    /// Unbuilt credit curve discounting on `discount`.
    #[must_use]
    pub fn new(
        identifier: CurveIdentifier,
        config: CurveConfig,
        assets: Vec<QuotedAsset>,
        discount: Arc<RateCurve>,
    ) -> Self {
        Self {
            core: CurveCore::new(identifier, config, assets, EvolutionType::SpotToForward),
            discount,
        }
    }

    /// Replaces the instrument factory.
    #[must_use]
    pub fn with_factory(mut self, factory: Arc<dyn InstrumentFactory>) -> Self {
        self.core.factory = factory;
        self
    }

    /// The discount curve.
    #[must_use]
    pub fn discount_curve(&self) -> &Arc<RateCurve> {
        &self.discount
    }

    /// Average hazard rate to `date`: `-ln Q(t) / t`.
    pub fn hazard_rate(&self, date: Date) -> CurveResult<f64> {
        let interpolator = self.core.interpolator()?;
        let t = interpolator.time(date);
        if t <= 0.0 {
            return Err(CurveError::validation(format!(
                "hazard rate needs a date after the base date, got {date}"
            )));
        }
        Ok(-interpolator.value_at_time(t)?.ln() / t)
    }

    pub(crate) fn core_mut(&mut self) -> &mut CurveCore {
        &mut self.core
    }
}

impl PricingStructure for SurvivalProbabilityCurve {
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
        self.core.reset();
        if self.discount.state() != CurveState::Interpolated {
            return Err(CurveError::not_built(self.discount.identifier().unique_id()));
        }
        let instruments = self.core.create_instruments(calendar)?;
        let settings = BootstrapSettings::from_config(&self.core.config);
        let discount: &RateCurve = &self.discount;
        let function = CreditBootstrapper::new(discount).bootstrap(
            &instruments,
            self.core.base_date(),
            &settings,
        )?;
        self.core.attach(instruments, function, &settings)
    }

    fn value(&self, date: Date) -> CurveResult<f64> {
        self.core.value(date)
    }

    fn survival_probability(&self, date: Date) -> CurveResult<f64> {
        self.core.value(date)
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
                discount: Arc::clone(&self.discount),
            };
            curve.build(calendar)?;
            Ok(CurveVariant::Survival(curve))
        })?;
        Ok(PerturbedCurve::tag_all(&self.core.identifier, bp, bumped))
    }

    fn clone_curve(&self) -> Self {
        Self {
            core: self.core.cloned(),
            discount: Arc::clone(&self.discount),
        }
    }
}
