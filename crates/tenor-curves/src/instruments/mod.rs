//! Priceable instruments for curve bootstrapping.
//!
//! Each instrument wraps a [`QuotedAsset`], resolves its dates once at
//! creation and reprices against whatever curve it is handed. The
//! bootstrappers only ever see the [`PriceableInstrument`] trait.
//!
//! # Available Instruments
//!
//! | Kind | Identifier | Implied quote |
//! |------|------------|---------------|
//! | [`Deposit`] | `AUD-Deposit-1M` | simple rate |
//! | [`Fra`] | `AUD-Fra-3M-6M` | simple forward rate |
//! | [`RateFuture`] | `AUD-IRFuture-IR-H4` | simple forward rate over the IMM quarter |
//! | [`InterestRateSwap`] | `AUD-IRSwap-5Y` | par fixed rate |
//! | [`BasisSwap`] | `AUD-BasisSwap-2Y` | par rate over the discount par rate |
//! | [`CreditDefaultSwap`] | `AUD-CDS-5Y` | par spread |
//! | [`ForwardContract`] | `BHP-EquityForward-6M`, `AUDUSD-FxForward-3M` | forward level |

mod basis_swap;
mod cds;
mod deposit;
mod factory;
mod forward;
mod fra;
mod future;
mod swap;

pub use basis_swap::BasisSwap;
pub use cds::CreditDefaultSwap;
pub use deposit::Deposit;
pub use factory::{DefaultInstrumentFactory, InstrumentFactory};
pub use forward::ForwardContract;
pub use fra::Fra;
pub use future::{imm_date, RateFuture};
pub use swap::InterestRateSwap;

use std::fmt;
use std::str::FromStr;

use tenor_core::calendars::{BusinessDayConvention, Calendar};
use tenor_core::daycounts::{DayCount, DayCountConvention};
use tenor_core::Date;

use crate::error::{CurveError, CurveResult};
use crate::interpolator::CurveView;
use crate::quotes::{market_quote_add_spread_and_normalise, QuotedAsset};

/// Instrument property selecting the accrual day count.
pub const DAY_COUNT_PROPERTY: &str = "DayCount";

/// Instrument property selecting the fixed or premium leg frequency.
pub const FREQUENCY_PROPERTY: &str = "FixedFrequency";

/// Instrument property holding the CDS recovery rate.
pub const RECOVERY_PROPERTY: &str = "RecoveryRate";

/// Instrument kind, parsed from the second field of an asset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstrumentKind {
    /// Money market deposit.
    Deposit,
    /// Forward rate agreement.
    Fra,
    /// Interest rate future.
    IrFuture,
    /// Fixed-for-floating swap.
    IrSwap,
    /// Floating-for-floating basis swap.
    BasisSwap,
    /// Credit default swap.
    Cds,
    /// Equity forward.
    EquityForward,
    /// FX forward outright.
    FxForward,
}

impl InstrumentKind {
    /// Name as written in asset identifiers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Fra => "Fra",
            Self::IrFuture => "IRFuture",
            Self::IrSwap => "IRSwap",
            Self::BasisSwap => "BasisSwap",
            Self::Cds => "CDS",
            Self::EquityForward => "EquityForward",
            Self::FxForward => "FxForward",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentKind {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" | "cash" => Ok(Self::Deposit),
            "fra" => Ok(Self::Fra),
            "irfuture" | "future" => Ok(Self::IrFuture),
            "irswap" | "swap" => Ok(Self::IrSwap),
            "basisswap" => Ok(Self::BasisSwap),
            "cds" => Ok(Self::Cds),
            "equityforward" => Ok(Self::EquityForward),
            "fxforward" | "fxoutright" => Ok(Self::FxForward),
            _ => Err(CurveError::validation(format!("unknown instrument type '{s}'"))),
        }
    }
}

/// Curves an instrument is priced against.
///
/// `curve` is the curve being solved (or its composite with a parent);
/// `discount` is the separate discount curve that spread and credit
/// instruments need.
#[derive(Clone, Copy)]
pub struct PricingContext<'a> {
    /// The curve under construction.
    pub curve: &'a dyn CurveView,
    /// Discount curve, when distinct from `curve`.
    pub discount: Option<&'a dyn CurveView>,
}

impl<'a> PricingContext<'a> {
    /// Context with a single curve.
    #[must_use]
    pub fn new(curve: &'a dyn CurveView) -> Self {
        Self {
            curve,
            discount: None,
        }
    }

    /// Adds a discount curve.
    #[must_use]
    pub fn with_discount(mut self, discount: &'a dyn CurveView) -> Self {
        self.discount = Some(discount);
        self
    }

    /// The discount curve, which must be present.
    pub fn discount_curve(&self, instrument: &str) -> CurveResult<&'a dyn CurveView> {
        self.discount.ok_or_else(|| {
            CurveError::validation(format!("{instrument} needs a discount curve to price"))
        })
    }
}

/// An instrument that can be repriced off a curve.
pub trait PriceableInstrument: Send + Sync + fmt::Debug {
    /// Asset identifier.
    fn id(&self) -> &str;

    /// Instrument kind.
    fn kind(&self) -> InstrumentKind;

    /// Date the instrument pins on the curve.
    fn risk_maturity_date(&self) -> Date;

    /// The quoted asset this instrument was built from.
    fn quoted_asset(&self) -> &QuotedAsset;

    /// Effective quote in decimal units: market quote plus any spread.
    fn market_quote(&self) -> f64;

    /// Quote implied by the curves in `ctx`.
    fn implied_quote(&self, ctx: &PricingContext<'_>) -> CurveResult<f64>;

    /// Curve value at the maturity that reprices the instrument exactly,
    /// when it can be written down without iteration.
    fn closed_form_value(&self, _ctx: &PricingContext<'_>) -> CurveResult<Option<f64>> {
        Ok(None)
    }
}

/// The quoted asset plus its effective decimal quote.
#[derive(Debug, Clone)]
pub(crate) struct InstrumentQuote {
    pub(crate) asset: QuotedAsset,
    pub(crate) value: f64,
}

impl InstrumentQuote {
    /// Fails when the asset has no `MarketQuote`.
    pub(crate) fn new(asset: QuotedAsset) -> CurveResult<Self> {
        asset.market_quote()?;
        let value = market_quote_add_spread_and_normalise(&asset.quotes)?;
        Ok(Self { asset, value })
    }
}

/// Day count from the asset's `DayCount` property, ACT/365F when absent.
pub(crate) fn asset_day_count(asset: &QuotedAsset) -> CurveResult<DayCountConvention> {
    match asset.property(DAY_COUNT_PROPERTY) {
        Some(text) => Ok(text.parse()?),
        None => Ok(DayCountConvention::Act365Fixed),
    }
}

/// Simple forward rate between two dates.
pub(crate) fn simple_forward_rate(
    curve: &dyn CurveView,
    start: Date,
    end: Date,
    accrual: f64,
) -> CurveResult<f64> {
    let df_start = curve.value_at(start)?;
    let df_end = curve.value_at(end)?;
    if df_end <= 0.0 {
        return Err(CurveError::validation(format!(
            "non-positive discount factor {df_end} at {end}"
        )));
    }
    Ok((df_start / df_end - 1.0) / accrual)
}

/// Regular schedule from `start` to `end` in steps of `months`, adjusted
/// modified-following. The last date is always `end`.
pub(crate) fn roll_schedule(
    start: Date,
    end: Date,
    months: i32,
    calendar: &dyn Calendar,
) -> CurveResult<Vec<Date>> {
    let mut dates = Vec::new();
    let mut k = 1;
    loop {
        let date = calendar.adjust(
            start.add_months(months * k)?,
            BusinessDayConvention::ModifiedFollowing,
        );
        if date >= end {
            break;
        }
        dates.push(date);
        k += 1;
    }
    dates.push(end);
    Ok(dates)
}

/// Accrual fractions between consecutive schedule dates.
pub(crate) fn accruals(start: Date, schedule: &[Date], day_count: &dyn DayCount) -> Vec<f64> {
    let mut previous = start;
    schedule
        .iter()
        .map(|&date| {
            let tau = day_count.year_fraction_f64(previous, date);
            previous = date;
            tau
        })
        .collect()
}
