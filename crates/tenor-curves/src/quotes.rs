//! Market quotes and unit normalization.
//!
//! Instruments arrive quoted in market conventions: futures as prices,
//! deposits in percent, spreads in decimals. Bootstrappers work in decimal
//! units throughout, so every quote passes through [`normalise`] first.
//!
//! | Units | To decimal |
//! |-------|------------|
//! | `IRFuturesPrice` (9500 = 95.00) | `(10000 - v) / 10000` |
//! | `FuturesPrice` (95.00) | `(100 - v) / 100` |
//! | `Rate`, `Volatility` (percent) | `v / 100` |
//! | everything else | `v` |
//!
//! Conversions run in `rust_decimal` so that round trips such as
//! `9500 -> 0.05 -> 9500` are exact.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Units a quotation value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuoteUnits {
    /// Interest-rate futures price scaled by 100 (9500 is 95.00).
    IRFuturesPrice,
    /// Futures price in percent of par.
    FuturesPrice,
    /// Rate in percent.
    Rate,
    /// Volatility in percent.
    Volatility,
    /// Rate as a decimal.
    DecimalRate,
    /// Generic decimal value.
    DecimalValue,
    /// Spread as a decimal.
    DecimalSpread,
    /// Clean price.
    Price,
    /// Dirty price.
    DirtyPrice,
    /// Upfront premium.
    Premium,
    /// Forward level.
    ForwardValue,
    /// FX rate.
    FxRate,
    /// Volatility as a decimal.
    DecimalVolatility,
}

impl QuoteUnits {
    /// All supported units.
    pub const ALL: [QuoteUnits; 13] = [
        QuoteUnits::IRFuturesPrice,
        QuoteUnits::FuturesPrice,
        QuoteUnits::Rate,
        QuoteUnits::Volatility,
        QuoteUnits::DecimalRate,
        QuoteUnits::DecimalValue,
        QuoteUnits::DecimalSpread,
        QuoteUnits::Price,
        QuoteUnits::DirtyPrice,
        QuoteUnits::Premium,
        QuoteUnits::ForwardValue,
        QuoteUnits::FxRate,
        QuoteUnits::DecimalVolatility,
    ];

    /// Market name of the units.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IRFuturesPrice => "IRFuturesPrice",
            Self::FuturesPrice => "FuturesPrice",
            Self::Rate => "Rate",
            Self::Volatility => "Volatility",
            Self::DecimalRate => "DecimalRate",
            Self::DecimalValue => "DecimalValue",
            Self::DecimalSpread => "DecimalSpread",
            Self::Price => "Price",
            Self::DirtyPrice => "DirtyPrice",
            Self::Premium => "Premium",
            Self::ForwardValue => "ForwardValue",
            Self::FxRate => "FxRate",
            Self::DecimalVolatility => "DecimalVolatility",
        }
    }

    /// True for the decimal targets that normalization converts into.
    #[must_use]
    pub fn is_decimal_target(&self) -> bool {
        matches!(self, Self::DecimalRate | Self::DecimalValue)
    }

    fn is_scaled(self) -> bool {
        matches!(
            self,
            Self::IRFuturesPrice | Self::FuturesPrice | Self::Rate | Self::Volatility
        )
    }

    fn to_decimal(self, value: Decimal) -> Decimal {
        match self {
            Self::IRFuturesPrice => (dec!(10000) - value) / dec!(10000),
            Self::FuturesPrice => (dec!(100) - value) / dec!(100),
            Self::Rate | Self::Volatility => value / dec!(100),
            _ => value,
        }
    }

    fn from_decimal(self, value: Decimal) -> Decimal {
        match self {
            Self::IRFuturesPrice => dec!(10000) - value * dec!(10000),
            Self::FuturesPrice => dec!(100) - value * dec!(100),
            Self::Rate | Self::Volatility => value * dec!(100),
            _ => value,
        }
    }

    /// Converts a value in these units to decimal.
    #[must_use]
    pub fn to_decimal_value(self, value: f64) -> f64 {
        if !self.is_scaled() {
            return value;
        }
        exact(value, |d| self.to_decimal(d)).unwrap_or_else(|| match self {
            Self::IRFuturesPrice => (10_000.0 - value) / 10_000.0,
            Self::FuturesPrice => (100.0 - value) / 100.0,
            Self::Rate | Self::Volatility => value / 100.0,
            _ => value,
        })
    }

    /// Converts a decimal value into these units.
    #[must_use]
    pub fn from_decimal_value(self, value: f64) -> f64 {
        if !self.is_scaled() {
            return value;
        }
        exact(value, |d| self.from_decimal(d)).unwrap_or_else(|| match self {
            Self::IRFuturesPrice => 10_000.0 - value * 10_000.0,
            Self::FuturesPrice => 100.0 - value * 100.0,
            Self::Rate | Self::Volatility => value * 100.0,
            _ => value,
        })
    }
}

fn exact(value: f64, op: impl Fn(Decimal) -> Decimal) -> Option<f64> {
    Decimal::from_f64(value).and_then(|d| op(d).to_f64())
}

impl fmt::Display for QuoteUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteUnits {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quote_units(s)
    }
}

impl TryFrom<String> for QuoteUnits {
    type Error = CurveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_quote_units(&value)
    }
}

impl From<QuoteUnits> for String {
    fn from(units: QuoteUnits) -> Self {
        units.as_str().to_string()
    }
}

/// Parses a quote unit name, ignoring case.
pub fn parse_quote_units(s: &str) -> CurveResult<QuoteUnits> {
    let s = s.trim();
    QuoteUnits::ALL
        .iter()
        .copied()
        .find(|u| u.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| CurveError::unrecognized_units(s))
}

/// What a quotation measures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MeasureType {
    /// The traded quote.
    MarketQuote,
    /// A spread added to the market quote.
    Spread,
    /// Volatility quote.
    Volatility,
    /// Any other measure, kept verbatim.
    Other(String),
}

impl MeasureType {
    /// Name of the measure.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MarketQuote => "MarketQuote",
            Self::Spread => "Spread",
            Self::Volatility => "Volatility",
            Self::Other(name) => name,
        }
    }

    /// Case-insensitive comparison against a measure name.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for MeasureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MeasureType {
    fn from(s: &str) -> Self {
        let s = s.trim();
        [Self::MarketQuote, Self::Spread, Self::Volatility]
            .into_iter()
            .find(|m| m.matches(s))
            .unwrap_or_else(|| Self::Other(s.to_string()))
    }
}

impl From<String> for MeasureType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<MeasureType> for String {
    fn from(m: MeasureType) -> Self {
        m.as_str().to_string()
    }
}

/// A single quoted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicQuotation {
    /// What the value measures.
    pub measure_type: MeasureType,
    /// Units of `value`.
    pub quote_units: QuoteUnits,
    /// The quoted number.
    pub value: f64,
}

impl BasicQuotation {
    /// Creates a quotation.
    #[must_use]
    pub fn new(measure_type: MeasureType, quote_units: QuoteUnits, value: f64) -> Self {
        Self {
            measure_type,
            quote_units,
            value,
        }
    }

    /// A `MarketQuote` quotation.
    #[must_use]
    pub fn market_quote(value: f64, quote_units: QuoteUnits) -> Self {
        Self::new(MeasureType::MarketQuote, quote_units, value)
    }

    /// A `Spread` quotation.
    #[must_use]
    pub fn spread(value: f64, quote_units: QuoteUnits) -> Self {
        Self::new(MeasureType::Spread, quote_units, value)
    }
}

/// An instrument identifier with its quotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedAsset {
    /// Instrument identifier, e.g. `AUD-IRSwap-5Y`.
    pub id: String,
    /// At most one quotation per measure type.
    pub quotes: Vec<BasicQuotation>,
    /// Calibration weight.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Free-form instrument properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

fn default_weight() -> f64 {
    1.0
}

impl QuotedAsset {
    /// Creates an asset with no quotations.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            quotes: Vec::new(),
            weight: default_weight(),
            properties: BTreeMap::new(),
        }
    }

    /// Shorthand for an asset with one `MarketQuote`.
    #[must_use]
    pub fn with_market_quote(id: impl Into<String>, value: f64, units: QuoteUnits) -> Self {
        Self::new(id).with_quote(BasicQuotation::market_quote(value, units))
    }

    /// Adds a quotation.
    #[must_use]
    pub fn with_quote(mut self, quote: BasicQuotation) -> Self {
        self.quotes.push(quote);
        self
    }

    /// Sets an instrument property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Looks up a property, ignoring key case.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The `MarketQuote` quotation.
    pub fn market_quote(&self) -> CurveResult<&BasicQuotation> {
        find_quotation_by_measure_type(MeasureType::MarketQuote.as_str(), &self.quotes)?
            .ok_or_else(|| CurveError::missing_quote(&self.id, MeasureType::MarketQuote.as_str()))
    }
}

/// Converts a `MarketQuote` into decimal units.
///
/// Only `MarketQuote` quotations with a `DecimalRate` or `DecimalValue`
/// target are converted; anything else comes back unchanged.
#[must_use]
pub fn normalise(quote: &BasicQuotation, target: QuoteUnits) -> BasicQuotation {
    if quote.measure_type != MeasureType::MarketQuote || !target.is_decimal_target() {
        return quote.clone();
    }
    BasicQuotation {
        measure_type: quote.measure_type.clone(),
        quote_units: target,
        value: quote.quote_units.to_decimal_value(quote.value),
    }
}

/// Converts a decimal `MarketQuote` back into `source` units.
///
/// Inverse of [`normalise`].
#[must_use]
pub fn denormalise(quote: &BasicQuotation, source: QuoteUnits) -> BasicQuotation {
    if quote.measure_type != MeasureType::MarketQuote || !quote.quote_units.is_decimal_target() {
        return quote.clone();
    }
    BasicQuotation {
        measure_type: quote.measure_type.clone(),
        quote_units: source,
        value: source.from_decimal_value(quote.value),
    }
}

/// The quotation with the given measure type, ignoring case.
///
/// # Errors
///
/// Returns `DuplicateMeasureType` when more than one quotation matches.
pub fn find_quotation_by_measure_type<'a>(
    measure_type: &str,
    quotes: &'a [BasicQuotation],
) -> CurveResult<Option<&'a BasicQuotation>> {
    let mut matches = quotes.iter().filter(|q| q.measure_type.matches(measure_type));
    let first = matches.next();
    if matches.next().is_some() {
        return Err(CurveError::duplicate_measure_type(measure_type));
    }
    Ok(first)
}

/// Normalized `MarketQuote` plus `Spread`, each zero when absent.
///
/// This is the effective quote the bootstrappers target. The spread is
/// converted through its own units like the market quote, so a spread of
/// `0.25` quoted in `Rate` adds `0.0025`; decimal spread units are added
/// unchanged.
pub fn market_quote_add_spread_and_normalise(quotes: &[BasicQuotation]) -> CurveResult<f64> {
    let market = find_quotation_by_measure_type(MeasureType::MarketQuote.as_str(), quotes)?
        .map_or(0.0, |q| normalise(q, QuoteUnits::DecimalRate).value);
    let spread = find_quotation_by_measure_type(MeasureType::Spread.as_str(), quotes)?
        .map_or(0.0, |q| q.quote_units.to_decimal_value(q.value));
    Ok(market + spread)
}

/// Adds `value` (in decimal units) to the quotation of `measure_type`.
///
/// The existing quotation keeps its units; a futures price moves by the
/// price equivalent of the decimal change. A zero `value` leaves the
/// quotes untouched, and a missing measure type is appended as a
/// `DecimalRate` quotation.
pub fn add_and_replace_quotation_by_measure_type(
    quotes: &mut Vec<BasicQuotation>,
    measure_type: &str,
    value: f64,
) -> CurveResult<()> {
    if value == 0.0 {
        return Ok(());
    }
    find_quotation_by_measure_type(measure_type, quotes)?;
    match quotes.iter_mut().find(|q| q.measure_type.matches(measure_type)) {
        Some(existing) => {
            let units = existing.quote_units;
            let bumped = units.to_decimal_value(existing.value) + value;
            existing.value = units.from_decimal_value(bumped);
        }
        None => quotes.push(BasicQuotation::new(
            MeasureType::from(measure_type),
            QuoteUnits::DecimalRate,
            value,
        )),
    }
    Ok(())
}

/// Replaces the quotation sharing `quote`'s measure type, or appends it.
pub fn replace_quotation_by_measure_type(
    quotes: &mut Vec<BasicQuotation>,
    quote: BasicQuotation,
) -> CurveResult<()> {
    let name = quote.measure_type.as_str().to_string();
    find_quotation_by_measure_type(&name, quotes)?;
    match quotes.iter_mut().find(|q| q.measure_type.matches(&name)) {
        Some(existing) => *existing = quote,
        None => quotes.push(quote),
    }
    Ok(())
}
