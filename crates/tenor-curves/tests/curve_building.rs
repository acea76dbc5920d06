//! Integration test: build every curve type from quoted assets.
//!
//! Market data: 2 January 2024
//!
//! | Asset | Quote | Units |
//! |-------|-------|-------|
//! | AUD-Deposit-1M | 0.0530 | DecimalRate |
//! | AUD-IRSwap-1Y | 0.0495 | DecimalRate |
//! | AUD-IRFuture-IR-H4 | 9500 | IRFuturesPrice |
//! | AUD-IRFuture-IR-M4 | 9510 | IRFuturesPrice |
//! | AUD-CDS-3Y | 120 bp | DecimalRate |
//! | BHP-EquityForward-1Y | 47.00 | ForwardValue |

use std::sync::Arc;

use approx::assert_relative_eq;
use tenor_core::calendars::WeekendCalendar;
use tenor_core::{Date, Period};
use tenor_curves::prelude::*;
use tenor_curves::quotes::{denormalise, normalise};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn base() -> Date {
    Date::from_ymd(2024, 1, 2).unwrap()
}

fn rate_identifier() -> CurveIdentifier {
    CurveIdentifier::new(PricingStructureType::RateCurve, "Default", base(), "AUD")
        .with_index("BBR-BBSW", Period::months(3))
}

fn reprice_all<C: PricingStructure + CurveView>(curve: &C, discount: Option<&dyn CurveView>) {
    for instrument in curve.instruments() {
        let mut ctx = PricingContext::new(curve);
        if let Some(discount) = discount {
            ctx = ctx.with_discount(discount);
        }
        let implied = instrument.implied_quote(&ctx).unwrap();
        assert!(
            (implied - instrument.market_quote()).abs() <= curve.config().tolerance,
            "{} implied {implied} vs market {}",
            instrument.id(),
            instrument.market_quote()
        );
    }
}

#[test]
fn test_deposit_swap_curve() {
    init_tracing();
    let mut curve = RateCurve::new(
        rate_identifier(),
        CurveConfig::default_for(PricingStructureType::RateCurve).with_tolerance(1e-10),
        vec![
            QuotedAsset::with_market_quote("AUD-Deposit-1M", 0.0530, QuoteUnits::DecimalRate),
            QuotedAsset::with_market_quote("AUD-IRSwap-1Y", 0.0495, QuoteUnits::DecimalRate),
        ],
    );
    curve.build(&WeekendCalendar).unwrap();

    assert_eq!(curve.id(), "RateCurve.AUD-BBR-BBSW-3M.2024-01-02");
    assert_eq!(curve.state(), CurveState::Interpolated);
    assert_eq!(curve.term_function().unwrap().len(), 2);
    assert_eq!(curve.forward(base()).unwrap(), 1.0);
    reprice_all(&curve, None);

    let points = curve.term_function().unwrap().points();
    assert_eq!(points[0].id.as_deref(), Some("AUD-Deposit-1M"));
    assert_eq!(points[1].id.as_deref(), Some("AUD-IRSwap-1Y"));
}

#[test]
fn test_futures_strip() {
    init_tracing();

    let quote = BasicQuotation::market_quote(9500.0, QuoteUnits::IRFuturesPrice);
    let decimal = normalise(&quote, QuoteUnits::DecimalRate);
    assert_relative_eq!(decimal.value, 0.05);
    assert_eq!(denormalise(&decimal, QuoteUnits::IRFuturesPrice).value, 9500.0);

    let mut curve = RateCurve::new(
        rate_identifier(),
        CurveConfig::default_for(PricingStructureType::RateCurve),
        vec![
            QuotedAsset::with_market_quote("AUD-Deposit-1M", 5.30, QuoteUnits::Rate),
            QuotedAsset::with_market_quote("AUD-IRFuture-IR-H4", 9500.0, QuoteUnits::IRFuturesPrice),
            QuotedAsset::with_market_quote("AUD-IRFuture-IR-M4", 9510.0, QuoteUnits::IRFuturesPrice),
            QuotedAsset::with_market_quote("AUD-IRSwap-2Y", 0.0480, QuoteUnits::DecimalRate),
        ],
    );
    curve.build(&WeekendCalendar).unwrap();
    assert_eq!(curve.term_function().unwrap().len(), 4);
    assert_relative_eq!(curve.instruments()[1].market_quote(), 0.05);
    reprice_all(&curve, None);
}

#[test]
fn test_discount_factor_underlying() {
    let config = CurveConfig::default_for(PricingStructureType::RateCurve)
        .with_underlying_curve(UnderlyingCurve::DiscountCurve)
        .with_interpolation(InterpolationMethod::LogLinear);
    let mut curve = RateCurve::new(
        rate_identifier(),
        config,
        vec![
            QuotedAsset::with_market_quote("AUD-Deposit-3M", 0.0440, QuoteUnits::DecimalRate),
            QuotedAsset::with_market_quote("AUD-IRSwap-3Y", 0.0420, QuoteUnits::DecimalRate),
            QuotedAsset::with_market_quote("AUD-IRSwap-10Y", 0.0450, QuoteUnits::DecimalRate),
        ],
    );
    curve.build(&WeekendCalendar).unwrap();
    reprice_all(&curve, None);

    let values = curve.term_function().unwrap().values();
    assert!(values.windows(2).all(|w| w[1] < w[0]));
    assert!(values.iter().all(|df| *df > 0.0 && *df < 1.0));
}

#[test]
fn test_extrapolation_disabled() {
    let config = CurveConfig::default_for(PricingStructureType::RateCurve).with_extrapolation(false);
    let mut curve = RateCurve::new(
        rate_identifier(),
        config,
        vec![
            QuotedAsset::with_market_quote("AUD-Deposit-1M", 0.0530, QuoteUnits::DecimalRate),
            QuotedAsset::with_market_quote("AUD-IRSwap-1Y", 0.0495, QuoteUnits::DecimalRate),
        ],
    );
    curve.build(&WeekendCalendar).unwrap();
    let err = curve.value(base().add_months(24).unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
}

#[test]
fn test_credit_and_forward_curves() {
    init_tracing();
    let mut discount = RateCurve::new(
        rate_identifier(),
        CurveConfig::default_for(PricingStructureType::RateCurve),
        vec![
            QuotedAsset::with_market_quote("AUD-Deposit-6M", 0.0440, QuoteUnits::DecimalRate),
            QuotedAsset::with_market_quote("AUD-IRSwap-5Y", 0.0420, QuoteUnits::DecimalRate),
        ],
    );
    discount.build(&WeekendCalendar).unwrap();
    let discount = Arc::new(discount);

    let mut credit = SurvivalProbabilityCurve::new(
        CurveIdentifier::new(PricingStructureType::CreditCurve, "Default", base(), "AUD")
            .with_index_name("QANTAS"),
        CurveConfig::default_for(PricingStructureType::CreditCurve),
        vec![
            QuotedAsset::with_market_quote("AUD-CDS-1Y", 0.0080, QuoteUnits::DecimalRate),
            QuotedAsset::with_market_quote("AUD-CDS-3Y", 0.0120, QuoteUnits::DecimalRate)
                .with_property("RecoveryRate", "0.35"),
        ],
        Arc::clone(&discount),
    );
    credit.build(&WeekendCalendar).unwrap();
    reprice_all(&credit, Some(discount.as_ref()));
    let q3 = credit.survival_probability(base().add_months(36).unwrap()).unwrap();
    assert!(q3 > 0.9 && q3 < 1.0);

    let mut equity = EquityCurve::new(
        CurveIdentifier::new(PricingStructureType::EquityCurve, "Default", base(), "BHP"),
        CurveConfig::default_for(PricingStructureType::EquityCurve),
        vec![
            QuotedAsset::with_market_quote("BHP-EquityForward-6M", 46.00, QuoteUnits::ForwardValue),
            QuotedAsset::with_market_quote("BHP-EquityForward-1Y", 47.00, QuoteUnits::ForwardValue),
        ],
    )
    .with_spot(45.00);
    equity.build(&WeekendCalendar).unwrap();
    reprice_all(&equity, None);
    assert_eq!(equity.evolution_type(), EvolutionType::ForwardToSpot);
    assert!(equity.survival_probability(base()).is_err());
}

#[test]
fn test_configuration_fallback() {
    init_tracing();
    let store = AlgorithmStore::from_toml_str(
        r#"
        [RateCurve.Default]
        Bootstrapper = "FastBootstrapper"
        BootstrapperInterpolation = "LinearRateInterpolation"
        ExtrapolationPermitted = true
        DayCounter = "ACT/365.FIXED"
        CompoundingFrequency = "Continuous"
        CurveInterpolation = "LinearRateInterpolation"
        UnderlyingCurve = "ZeroCurve"
        Tolerance = 1e-10

        [RateCurve.LogLinearDiscount]
        Bootstrapper = "FastBootstrapper"
        BootstrapperInterpolation = "LogLinearInterpolation"
        ExtrapolationPermitted = true
        DayCounter = "ACT/365.FIXED"
        CompoundingFrequency = "Continuous"
        CurveInterpolation = "LogLinearInterpolation"
        UnderlyingCurve = "DiscountCurve"
        Tolerance = 1e-9
        "#,
    )
    .unwrap();

    let assets = vec![
        QuotedAsset::with_market_quote("AUD-Deposit-1M", 0.0530, QuoteUnits::DecimalRate),
        QuotedAsset::with_market_quote("AUD-IRSwap-1Y", 0.0495, QuoteUnits::DecimalRate),
    ];

    let mut identifier = rate_identifier();
    identifier.algorithm = "NoSuchAlgorithm".to_string();
    let fallback = RateCurve::from_provider(identifier, assets.clone(), &store).unwrap();
    assert_eq!(fallback.config().tolerance, 1e-10);
    assert_eq!(fallback.config().underlying_curve, UnderlyingCurve::ZeroCurve);

    let mut identifier = rate_identifier();
    identifier.algorithm = "LogLinearDiscount".to_string();
    let mut named = RateCurve::from_provider(identifier, assets, &store).unwrap();
    assert_eq!(named.config().underlying_curve, UnderlyingCurve::DiscountCurve);
    named.build(&WeekendCalendar).unwrap();
    reprice_all(&named, None);

    let miss = CurveConfig::resolve(PricingStructureType::FxCurve, "Missing", &store).unwrap_err();
    assert_eq!(miss.kind(), ErrorKind::Configuration);
}

#[test]
fn test_environment_parent_lookup() {
    let mut parent = RateCurve::new(
        rate_identifier(),
        CurveConfig::default_for(PricingStructureType::RateCurve),
        vec![
            QuotedAsset::with_market_quote("AUD-Deposit-3M", 0.0440, QuoteUnits::DecimalRate),
            QuotedAsset::with_market_quote("AUD-IRSwap-5Y", 0.0420, QuoteUnits::DecimalRate),
        ],
    );
    parent.build(&WeekendCalendar).unwrap();
    let environment = MarketEnvironment::new("EOD").with_curve(parent);

    let basis_id = CurveIdentifier::new(PricingStructureType::RateBasisCurve, "Default", base(), "AUD")
        .with_index("BBR-BBSW", Period::months(6));
    let assets = vec![QuotedAsset::with_market_quote(
        "AUD-BasisSwap-2Y",
        0.0008,
        QuoteUnits::DecimalSpread,
    )];

    let missing = RateBasisCurve::from_environment(
        basis_id.clone(),
        CurveConfig::default_for(PricingStructureType::RateBasisCurve),
        assets.clone(),
        &environment,
        "RateCurve.AUD-BBR-BBSW-6M.2024-01-02",
    )
    .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Validation);

    let mut basis = RateBasisCurve::from_environment(
        basis_id,
        CurveConfig::default_for(PricingStructureType::RateBasisCurve),
        assets,
        &environment,
        "RateCurve.AUD-BBR-BBSW-3M.2024-01-02",
    )
    .unwrap();
    basis.build(&WeekendCalendar).unwrap();
    let parent: &RateCurve = basis.parent();
    reprice_all(&basis, Some(parent));
}
