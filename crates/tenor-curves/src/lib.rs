//! # Tenor Curves
//!
//! Bootstrapped term structures for derivatives pricing.
//!
//! This crate turns market quotes into curves:
//!
//! - **Quotes**: unit normalization of market quotes (`9500` futures price to
//!   `0.05`, `5.30` percent to `0.053`)
//! - **Configuration**: algorithm records resolved into typed curve policy
//! - **Instruments**: deposits, FRAs, futures, swaps, basis swaps, CDS and
//!   forwards, all repriceable off any curve
//! - **Bootstrapping**: pillar-by-pillar solving so every instrument
//!   reprices to its quote
//! - **Curves**: rate, basis, credit, equity and FX curves
//! - **Risk**: one rebuilt curve per bumped instrument
//!
//! # Quick Start
//!
//! ```rust
//! use tenor_core::calendars::WeekendCalendar;
//! use tenor_core::Date;
//! use tenor_curves::prelude::*;
//!
//! let base = Date::from_ymd(2024, 1, 2).unwrap();
//! let identifier = CurveIdentifier::new(PricingStructureType::RateCurve, "Default", base, "AUD");
//! let mut curve = RateCurve::new(
//!     identifier,
//!     CurveConfig::default_for(PricingStructureType::RateCurve),
//!     vec![
//!         QuotedAsset::with_market_quote("AUD-Deposit-1M", 0.0530, QuoteUnits::DecimalRate),
//!         QuotedAsset::with_market_quote("AUD-IRSwap-1Y", 0.0495, QuoteUnits::DecimalRate),
//!     ],
//! );
//! curve.build(&WeekendCalendar).unwrap();
//!
//! assert!((curve.forward(base).unwrap() - 1.0).abs() < 1e-14);
//! let risk = curve.create_curve_risk_set(1.0, &WeekendCalendar).unwrap();
//! assert_eq!(risk.len(), 2);
//! ```
//!
//! # Features
//!
//! - `parallel`: build risk-set curves on the rayon thread pool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod bootstrap;
pub mod config;
pub mod curves;
pub mod environment;
pub mod error;
pub mod identifier;
pub mod instruments;
pub mod interpolator;
pub mod quotes;
pub mod risk;
pub mod term;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{
        BootstrapSettings, Bootstrapper, CreditBootstrapper, EquityBootstrapper,
        ForwardLevelBootstrapper, RateBootstrapper, RateSpreadBootstrapper,
    };
    pub use crate::config::{
        AlgorithmProvider, AlgorithmRecord, AlgorithmStore, CacheMiss, CurveConfig,
        InterpolationMethod, UnderlyingCurve,
    };
    pub use crate::curves::{
        CurveState, CurveVariant, EquityCurve, EvolutionType, FxCurve, PricingStructure,
        RateBasisCurve, RateCurve, SurvivalProbabilityCurve,
    };
    pub use crate::environment::MarketEnvironment;
    pub use crate::error::{CurveError, CurveResult, ErrorKind};
    pub use crate::identifier::{CurveIdentifier, PricingStructureType};
    pub use crate::instruments::{
        DefaultInstrumentFactory, InstrumentFactory, InstrumentKind, PriceableInstrument,
        PricingContext,
    };
    pub use crate::interpolator::{CurveView, TermCurveInterpolator};
    pub use crate::quotes::{BasicQuotation, MeasureType, QuoteUnits, QuotedAsset};
    pub use crate::risk::{create_curve_risk_set, PerturbedCurve, PricingStructureRiskSetType};
    pub use crate::term::{TermFunction, TermPoint};
}

pub use curves::{CurveVariant, PricingStructure};
pub use error::{CurveError, CurveResult};
