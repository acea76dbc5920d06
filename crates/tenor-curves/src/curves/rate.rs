//! Discount curve.

use std::sync::Arc;

use tenor_core::calendars::Calendar;
use tenor_core::Date;

use super::{CurveCore, CurveState, CurveVariant, EvolutionType, PricingStructure};
use crate::bootstrap::{BootstrapSettings, Bootstrapper, RateBootstrapper};
use crate::config::{AlgorithmProvider, CurveConfig};
use crate::error::CurveResult;
use crate::identifier::CurveIdentifier;
use crate::instruments::{InstrumentFactory, PriceableInstrument};
use crate::quotes::QuotedAsset;
use crate::risk::{bump_each, PerturbedCurve};
use crate::term::TermFunction;

/// Interest rate curve bootstrapped from deposits, FRAs, futures and swaps.
///
/// Values are discount factors. Assets must be given in ascending maturity.
#[derive(Debug, Clone)]
pub struct RateCurve {
    core: CurveCore,
}

impl RateCurve {
    /// Unbuilt curve with an explicit configuration.
    #[must_use]
    pub fn new(identifier: CurveIdentifier, config: CurveConfig, assets: Vec<QuotedAsset>) -> Self {
        Self {
            core: CurveCore::new(identifier, config, assets, EvolutionType::SpotToForward),
        }
    }

    /// Unbuilt curve with configuration resolved from `provider`.
    pub fn from_provider(
        identifier: CurveIdentifier,
        assets: Vec<QuotedAsset>,
        provider: &dyn AlgorithmProvider,
    ) -> CurveResult<Self> {
        let config = CurveConfig::resolve(
            identifier.pricing_structure_type,
            &identifier.algorithm,
            provider,
        )?;
        Ok(Self::new(identifier, config, assets))
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

    /// Continuously compounded zero rate to `date` on the curve's day count.
    pub fn zero_rate(&self, date: Date) -> CurveResult<f64> {
        let interpolator = self.core.interpolator()?;
        let t = interpolator.time(date);
        let df = interpolator.value_at_time(t)?;
        if t <= 0.0 {
            return Ok(0.0);
        }
        Ok(-df.ln() / t)
    }

    pub(crate) fn from_core(core: CurveCore) -> Self {
        Self { core }
    }

    pub(crate) fn core_mut(&mut self) -> &mut CurveCore {
        &mut self.core
    }

    /// Fresh curve over `assets`, built with `calendar`.
    pub(crate) fn rebuilt_with(
        &self,
        assets: Vec<QuotedAsset>,
        calendar: &dyn Calendar,
    ) -> CurveResult<Self> {
        let mut curve = Self::from_core(self.core.with_assets(assets));
        curve.build(calendar)?;
        Ok(curve)
    }
}

impl PricingStructure for RateCurve {
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
        let instruments = self.core.create_instruments(calendar)?;
        let settings = BootstrapSettings::from_config(&self.core.config);
        let function = RateBootstrapper.bootstrap(&instruments, self.core.base_date(), &settings)?;
        self.core.attach(instruments, function, &settings)
    }

    fn value(&self, date: Date) -> CurveResult<f64> {
        self.core.value(date)
    }

    /// The discount factor, as a risk-free survival probability.
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
            Ok(CurveVariant::Rate(self.rebuilt_with(assets, calendar)?))
        })?;
        Ok(PerturbedCurve::tag_all(&self.core.identifier, bp, bumped))
    }

    fn clone_curve(&self) -> Self {
        Self::from_core(self.core.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::PricingStructureType;
    use crate::quotes::QuoteUnits;
    use approx::assert_relative_eq;
    use tenor_core::calendars::WeekendCalendar;

    fn base() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    fn curve() -> RateCurve {
        let identifier =
            CurveIdentifier::new(PricingStructureType::RateCurve, "Default", base(), "AUD");
        RateCurve::new(
            identifier,
            CurveConfig::default_for(PricingStructureType::RateCurve),
            vec![
                QuotedAsset::with_market_quote("AUD-Deposit-1M", 0.053, QuoteUnits::DecimalRate),
                QuotedAsset::with_market_quote("AUD-IRSwap-1Y", 0.0495, QuoteUnits::DecimalRate),
            ],
        )
    }

    #[test]
    fn test_build_and_query() {
        let mut curve = curve();
        assert_eq!(curve.state(), CurveState::Unbuilt);
        assert!(curve.value(base()).is_err());

        curve.build(&WeekendCalendar).unwrap();
        assert_eq!(curve.state(), CurveState::Interpolated);
        assert_eq!(curve.term_function().unwrap().len(), 2);
        assert_relative_eq!(curve.forward(base()).unwrap(), 1.0, epsilon = 1e-14);

        let one_year = base().add_months(12).unwrap();
        let df = curve.value(one_year).unwrap();
        assert!(df > 0.94 && df < 0.96);
        assert_relative_eq!(curve.survival_probability(one_year).unwrap(), df);
        assert!((curve.zero_rate(one_year).unwrap() - 0.048).abs() < 0.005);
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut curve = curve();
        curve.build(&WeekendCalendar).unwrap();
        let first = curve.term_function().cloned();
        curve.build(&WeekendCalendar).unwrap();
        assert_eq!(curve.term_function().cloned(), first);
    }

    #[test]
    fn test_forward_between_is_ratio() {
        let mut curve = curve();
        curve.build(&WeekendCalendar).unwrap();
        let d1 = base().add_days(90);
        let d2 = base().add_days(300);
        let expected = curve.value(d2).unwrap() / curve.value(d1).unwrap();
        assert_relative_eq!(curve.forward_between(d1, d2).unwrap(), expected);
    }

    #[test]
    fn test_clone_is_unbuilt() {
        let mut curve = curve();
        curve.build(&WeekendCalendar).unwrap();
        let copy = curve.clone_curve();
        assert_eq!(copy.state(), CurveState::Unbuilt);
        assert_eq!(copy.term_function(), curve.term_function());
        assert!(copy.value(base()).is_err());
        assert_ne!(copy.identifier().unique_id(), curve.identifier().unique_id());
    }
}
