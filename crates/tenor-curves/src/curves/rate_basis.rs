//! Basis curve layered on a parent rate curve.

use std::sync::Arc;

use tenor_core::calendars::Calendar;
use tenor_core::Date;

use super::{CurveCore, CurveState, CurveVariant, EvolutionType, PricingStructure, RateCurve};
use crate::bootstrap::{BootstrapSettings, Bootstrapper, RateSpreadBootstrapper};
use crate::config::CurveConfig;
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};
use crate::identifier::CurveIdentifier;
use crate::instruments::{InstrumentFactory, PriceableInstrument};
use crate::interpolator::{CurveView, SpreadInterpolator, ValueTransform};
use crate::quotes::QuotedAsset;
use crate::risk::{bump_each, PerturbedCurve, PricingStructureRiskSetType};
use crate::term::TermFunction;

/// Discount factors of a parent rate curve shifted by a bootstrapped zero
/// spread: `DF(t) = DF_parent(t) * exp(-s(t) t)`.
///
/// The term function holds the spreads. Basis swap quotes are sorted by
/// maturity before each build.
#[derive(Debug, Clone)]
pub struct RateBasisCurve {
    core: CurveCore,
    parent: Arc<RateCurve>,
    composite: Option<SpreadInterpolator<Arc<RateCurve>>>,
}

impl RateBasisCurve {
    /// Unbuilt basis curve over `parent`.
    #[must_use]
    pub fn new(
        identifier: CurveIdentifier,
        config: CurveConfig,
        assets: Vec<QuotedAsset>,
        parent: Arc<RateCurve>,
    ) -> Self {
        Self {
            core: CurveCore::new(identifier, config, assets, EvolutionType::SpotToForward),
            parent,
            composite: None,
        }
    }

    /// Unbuilt basis curve whose parent is the rate curve `parent_name` in
    /// `environment`.
    pub fn from_environment(
        identifier: CurveIdentifier,
        config: CurveConfig,
        assets: Vec<QuotedAsset>,
        environment: &MarketEnvironment,
        parent_name: &str,
    ) -> CurveResult<Self> {
        let parent = environment.rate_curve(parent_name)?.clone();
        Ok(Self::new(identifier, config, assets, Arc::new(parent)))
    }

    /// Replaces the instrument factory.
    #[must_use]
    pub fn with_factory(mut self, factory: Arc<dyn InstrumentFactory>) -> Self {
        self.core.factory = factory;
        self
    }

    /// The parent rate curve.
    #[must_use]
    pub fn parent(&self) -> &Arc<RateCurve> {
        &self.parent
    }

    /// Zero spread over the parent at `date`.
    pub fn spread(&self, date: Date) -> CurveResult<f64> {
        self.core.interpolator()?.value_at(date)
    }

    /// Bump-and-rebuild risk set for the chosen instruments.
    ///
    /// `Parent` rebuilds the parent for each of its instruments and then
    /// this curve on top; `Child` bumps this curve's basis swaps; `All`
    /// returns the parent set followed by the child set.
    pub fn create_curve_risk_set_for(
        &self,
        bp: f64,
        risk_type: PricingStructureRiskSetType,
        calendar: &dyn Calendar,
    ) -> CurveResult<Vec<PerturbedCurve>> {
        let mut bumped = Vec::new();
        if matches!(
            risk_type,
            PricingStructureRiskSetType::Parent | PricingStructureRiskSetType::All
        ) {
            bumped.extend(bump_each(self.parent.quoted_assets(), bp, |assets| {
                let parent = Arc::new(self.parent.rebuilt_with(assets, calendar)?);
                let child = self.rebuilt_over(parent, self.core.assets.clone(), calendar)?;
                Ok(CurveVariant::RateBasis(child))
            })?);
        }
        if matches!(
            risk_type,
            PricingStructureRiskSetType::Child | PricingStructureRiskSetType::All
        ) {
            bumped.extend(bump_each(&self.core.assets, bp, |assets| {
                let child = self.rebuilt_over(Arc::clone(&self.parent), assets, calendar)?;
                Ok(CurveVariant::RateBasis(child))
            })?);
        }
        Ok(PerturbedCurve::tag_all(&self.core.identifier, bp, bumped))
    }

    fn rebuilt_over(
        &self,
        parent: Arc<RateCurve>,
        assets: Vec<QuotedAsset>,
        calendar: &dyn Calendar,
    ) -> CurveResult<Self> {
        let mut curve = Self {
            core: self.core.with_assets(assets),
            parent,
            composite: None,
        };
        curve.build(calendar)?;
        Ok(curve)
    }

    pub(crate) fn core_mut(&mut self) -> &mut CurveCore {
        &mut self.core
    }
}

impl PricingStructure for RateBasisCurve {
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
        self.composite = None;
        if self.parent.state() != CurveState::Interpolated {
            return Err(CurveError::not_built(self.parent.identifier().unique_id()));
        }

        let instruments = self.core.create_instruments(calendar)?;
        let mut paired: Vec<_> = std::mem::take(&mut self.core.assets)
            .into_iter()
            .zip(instruments)
            .collect();
        paired.sort_by_key(|(_, instrument)| instrument.risk_maturity_date());
        let (assets, instruments): (Vec<_>, Vec<_>) = paired.into_iter().unzip();
        self.core.assets = assets;

        let settings = BootstrapSettings::from_config(&self.core.config)
            .with_transform(ValueTransform::None)
            .with_anchor(None);
        let base: &RateCurve = &self.parent;
        let function = RateSpreadBootstrapper::new(base).bootstrap(
            &instruments,
            self.core.base_date(),
            &settings,
        )?;
        self.core.attach(instruments, function, &settings)?;

        let spread = self.core.interpolator()?.clone();
        self.composite = Some(SpreadInterpolator::new(Arc::clone(&self.parent), spread));
        Ok(())
    }

    fn value(&self, date: Date) -> CurveResult<f64> {
        match &self.composite {
            Some(composite) if self.core.state == CurveState::Interpolated => {
                composite.value_at(date)
            }
            _ => Err(CurveError::not_built(self.core.identifier.unique_id())),
        }
    }

    fn survival_probability(&self, date: Date) -> CurveResult<f64> {
        self.value(date)
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
        self.create_curve_risk_set_for(bp, PricingStructureRiskSetType::default(), calendar)
    }

    fn clone_curve(&self) -> Self {
        Self {
            core: self.core.cloned(),
            parent: Arc::clone(&self.parent),
            composite: None,
        }
    }
}
