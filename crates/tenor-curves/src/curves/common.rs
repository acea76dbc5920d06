//! State shared by every curve variant.

use std::fmt;
use std::sync::Arc;

use tenor_core::calendars::Calendar;
use tenor_core::Date;
use tracing::info;

use super::{CurveState, EvolutionType};
use crate::bootstrap::{BootstrapSettings, Bootstrapper, ForwardLevelBootstrapper};
use crate::config::CurveConfig;
use crate::error::{CurveError, CurveResult};
use crate::identifier::CurveIdentifier;
use crate::instruments::{DefaultInstrumentFactory, InstrumentFactory, PriceableInstrument};
use crate::interpolator::{CurveView, InterpolationSettings, TermCurveInterpolator};
use crate::quotes::{add_and_replace_quotation_by_measure_type, QuotedAsset};
use crate::term::TermFunction;

/// Identity, inputs and build products of a curve.
#[derive(Clone)]
pub(crate) struct CurveCore {
    pub(crate) identifier: CurveIdentifier,
    pub(crate) config: CurveConfig,
    pub(crate) assets: Vec<QuotedAsset>,
    pub(crate) evolution: EvolutionType,
    pub(crate) factory: Arc<dyn InstrumentFactory>,
    pub(crate) state: CurveState,
    pub(crate) instruments: Vec<Arc<dyn PriceableInstrument>>,
    pub(crate) term_function: Option<TermFunction>,
    pub(crate) interpolator: Option<TermCurveInterpolator>,
}

impl fmt::Debug for CurveCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveCore")
            .field("identifier", &self.identifier)
            .field("state", &self.state)
            .field("assets", &self.assets.len())
            .field("points", &self.term_function.as_ref().map(TermFunction::len))
            .finish_non_exhaustive()
    }
}

impl CurveCore {
    pub(crate) fn new(
        identifier: CurveIdentifier,
        config: CurveConfig,
        assets: Vec<QuotedAsset>,
        evolution: EvolutionType,
    ) -> Self {
        Self {
            identifier,
            config,
            assets,
            evolution,
            factory: Arc::new(DefaultInstrumentFactory),
            state: CurveState::Unbuilt,
            instruments: Vec::new(),
            term_function: None,
            interpolator: None,
        }
    }

    pub(crate) fn base_date(&self) -> Date {
        self.identifier.base_date
    }

    /// The attached interpolator, or `NotBuilt`.
    pub(crate) fn interpolator(&self) -> CurveResult<&TermCurveInterpolator> {
        match (&self.state, &self.interpolator) {
            (CurveState::Interpolated, Some(interpolator)) => Ok(interpolator),
            _ => Err(CurveError::not_built(self.identifier.unique_id())),
        }
    }

    pub(crate) fn value(&self, date: Date) -> CurveResult<f64> {
        self.interpolator()?.value_at(date)
    }

    /// Drops build products ahead of a rebuild.
    pub(crate) fn reset(&mut self) {
        self.state = CurveState::Unbuilt;
        self.instruments.clear();
        self.term_function = None;
        self.interpolator = None;
    }

    /// One instrument per asset, in asset order.
    pub(crate) fn create_instruments(
        &self,
        calendar: &dyn Calendar,
    ) -> CurveResult<Vec<Arc<dyn PriceableInstrument>>> {
        self.assets
            .iter()
            .map(|asset| self.factory.create(asset, self.base_date(), calendar))
            .collect()
    }

    /// Stores the solved function and attaches the curve interpolator.
    pub(crate) fn attach(
        &mut self,
        instruments: Vec<Arc<dyn PriceableInstrument>>,
        function: TermFunction,
        settings: &BootstrapSettings,
    ) -> CurveResult<()> {
        self.instruments = instruments;
        self.term_function = Some(function.clone());
        self.state = CurveState::Bootstrapped;

        let interpolation = InterpolationSettings::new(self.config.curve_interpolation)
            .with_day_count(settings.day_count)
            .with_transform(settings.transform)
            .with_anchor(settings.anchor)
            .with_extrapolation(self.config.extrapolation_permitted);
        self.interpolator = Some(TermCurveInterpolator::new(
            function,
            self.base_date(),
            interpolation,
        )?);
        self.state = CurveState::Interpolated;

        info!(
            curve = %self.identifier,
            points = self.instruments.len(),
            "curve built"
        );
        Ok(())
    }

    /// Adds `values[i]` to the `measure_type` quotation of asset `i`.
    pub(crate) fn perturb_assets(&mut self, values: &[f64], measure_type: &str) -> CurveResult<()> {
        if values.len() != self.assets.len() {
            return Err(CurveError::validation(format!(
                "{} perturbation values for {} assets",
                values.len(),
                self.assets.len()
            )));
        }
        for (asset, value) in self.assets.iter_mut().zip(values) {
            add_and_replace_quotation_by_measure_type(&mut asset.quotes, measure_type, *value)?;
        }
        Ok(())
    }

    /// Unbuilt copy over `assets`, sharing identity and policy.
    pub(crate) fn with_assets(&self, assets: Vec<QuotedAsset>) -> Self {
        Self {
            identifier: self.identifier.clone(),
            config: self.config.clone(),
            assets,
            evolution: self.evolution,
            factory: Arc::clone(&self.factory),
            state: CurveState::Unbuilt,
            instruments: Vec::new(),
            term_function: None,
            interpolator: None,
        }
    }

    /// Copy keeping the solved function but no interpolator.
    pub(crate) fn cloned(&self) -> Self {
        let mut copy = self.with_assets(self.assets.clone());
        copy.identifier = self.identifier.cloned_identity();
        copy.term_function = self.term_function.clone();
        copy
    }
}

/// Builds a forward-level curve, anchored at `spot` when known.
pub(crate) fn build_forward_levels(
    core: &mut CurveCore,
    spot: Option<f64>,
    calendar: &dyn Calendar,
) -> CurveResult<()> {
    core.reset();
    let instruments = core.create_instruments(calendar)?;
    let settings = BootstrapSettings::from_config(&core.config).with_anchor(spot);
    let function =
        ForwardLevelBootstrapper::new().bootstrap(&instruments, core.base_date(), &settings)?;
    core.attach(instruments, function, &settings)
}

/// Forward curves carry no default probability.
pub(crate) fn no_survival(core: &CurveCore) -> CurveError {
    CurveError::validation(format!(
        "{} is a {} and has no survival probability",
        core.identifier.unique_id(),
        core.identifier.pricing_structure_type
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurveConfig;
    use crate::identifier::PricingStructureType;
    use crate::quotes::QuoteUnits;

    fn core() -> CurveCore {
        let base = Date::from_ymd(2024, 1, 2).unwrap();
        CurveCore::new(
            CurveIdentifier::new(PricingStructureType::RateCurve, "Default", base, "AUD"),
            CurveConfig::default_for(PricingStructureType::RateCurve),
            vec![
                QuotedAsset::with_market_quote("AUD-Deposit-1M", 0.053, QuoteUnits::DecimalRate),
                QuotedAsset::with_market_quote("AUD-IRSwap-1Y", 0.0495, QuoteUnits::DecimalRate),
            ],
            EvolutionType::SpotToForward,
        )
    }

    #[test]
    fn test_unbuilt_queries_fail() {
        let core = core();
        let date = core.base_date().add_days(10);
        assert!(matches!(core.value(date), Err(CurveError::NotBuilt { .. })));
    }

    #[test]
    fn test_perturb_assets_length_mismatch() {
        let mut core = core();
        assert!(matches!(
            core.perturb_assets(&[0.0001], "MarketQuote"),
            Err(CurveError::Validation { .. })
        ));
        core.perturb_assets(&[0.0001, 0.0], "MarketQuote").unwrap();
        let bumped = core.assets[0].market_quote().unwrap().value;
        assert!((bumped - 0.0531).abs() < 1e-12);
        assert_eq!(core.assets[1].market_quote().unwrap().value, 0.0495);
    }

    #[test]
    fn test_cloned_identity() {
        let core = core();
        let copy = core.cloned();
        assert_eq!(copy.state, CurveState::Unbuilt);
        assert!(copy.identifier.unique_id().ends_with(".Clone"));
        assert_eq!(copy.assets, core.assets);
    }
}
