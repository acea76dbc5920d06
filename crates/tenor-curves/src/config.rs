//! Curve algorithm configuration.
//!
//! A curve names an algorithm; the algorithm is a bag of string properties
//! held by an [`AlgorithmProvider`]. [`CurveConfig::resolve`] turns that bag
//! into typed policy, retrying under the `Default` algorithm when the named
//! one is missing.
//!
//! Stores load from TOML or JSON documents keyed by curve type and algorithm:
//!
//! ```toml
//! [RateCurve.FastLinearZero]
//! Bootstrapper = "FastBootstrapper"
//! BootstrapperInterpolation = "LinearRateInterpolation"
//! ExtrapolationPermitted = true
//! DayCounter = "ACT/365.FIXED"
//! CompoundingFrequency = "Continuous"
//! CurveInterpolation = "LinearRateInterpolation"
//! UnderlyingCurve = "ZeroCurve"
//! Tolerance = 1e-10
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tenor_core::daycounts::DayCountConvention;
use tenor_core::types::Compounding;
use thiserror::Error;
use tracing::debug;

use crate::error::{CurveError, CurveResult};
use crate::identifier::PricingStructureType;

/// Name of the fallback algorithm registered for every curve type.
pub const DEFAULT_ALGORITHM: &str = "Default";

/// Iteration budget used when a record has no `MaxIterations`.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

// =============================================================================
// PROPERTY KEYS
// =============================================================================

/// Property names read from an algorithm record.
pub mod keys {
    /// Bootstrapper name.
    pub const BOOTSTRAPPER: &str = "Bootstrapper";
    /// Interpolation used on the partial curve while solving.
    pub const BOOTSTRAPPER_INTERPOLATION: &str = "BootstrapperInterpolation";
    /// Whether queries may leave the pillar range.
    pub const EXTRAPOLATION_PERMITTED: &str = "ExtrapolationPermitted";
    /// Day count for curve time.
    pub const DAY_COUNTER: &str = "DayCounter";
    /// Compounding of zero rates.
    pub const COMPOUNDING_FREQUENCY: &str = "CompoundingFrequency";
    /// Interpolation of the built curve.
    pub const CURVE_INTERPOLATION: &str = "CurveInterpolation";
    /// Space the term function values live in.
    pub const UNDERLYING_CURVE: &str = "UnderlyingCurve";
    /// Repricing tolerance.
    pub const TOLERANCE: &str = "Tolerance";
    /// Optional solver iteration budget.
    pub const MAX_ITERATIONS: &str = "MaxIterations";
}

// =============================================================================
// INTERPOLATION METHOD
// =============================================================================

/// Interpolation method for term functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Linear on the stored values.
    #[default]
    Linear,
    /// Linear on the logarithm of the stored values.
    LogLinear,
    /// Natural cubic spline.
    CubicSpline,
    /// Piecewise constant forward rates: log-linear on discount factors.
    FlatForward,
    /// Piecewise constant, backward flat.
    Flat,
}

impl FromStr for InterpolationMethod {
    type Err = CurveError;

    /// Accepts the long algorithm names (`LinearRateInterpolation`,
    /// `LogLinearInterpolation`, `FlatForwardInterpolation`) as well as the
    /// bare method names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase().replace(['-', ' ', '_'], "");
        if name.contains("loglinear") {
            Ok(Self::LogLinear)
        } else if name.contains("linear") {
            Ok(Self::Linear)
        } else if name.contains("cubic") || name.contains("spline") {
            Ok(Self::CubicSpline)
        } else if name.contains("flatforward") {
            Ok(Self::FlatForward)
        } else if name.contains("flat") || name.contains("piecewiseconstant") {
            Ok(Self::Flat)
        } else {
            Err(CurveError::configuration(
                keys::CURVE_INTERPOLATION,
                format!("unknown interpolation '{s}'"),
            ))
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "Linear",
            Self::LogLinear => "LogLinear",
            Self::CubicSpline => "CubicSpline",
            Self::FlatForward => "FlatForward",
            Self::Flat => "Flat",
        };
        f.write_str(name)
    }
}

// =============================================================================
// UNDERLYING CURVE
// =============================================================================

/// The quantity a term function stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnderlyingCurve {
    /// Zero rates, converted to discount factors on query.
    ZeroCurve,
    /// Discount factors.
    DiscountCurve,
    /// Hazard rates, converted to survival probabilities on query.
    HazardCurve,
    /// Survival probabilities.
    SurvivalCurve,
    /// Forward levels.
    ForwardCurve,
}

impl UnderlyingCurve {
    /// True when values are rates that must be turned into factors.
    #[must_use]
    pub fn is_rate_space(&self) -> bool {
        matches!(self, Self::ZeroCurve | Self::HazardCurve)
    }
}

impl FromStr for UnderlyingCurve {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zerocurve" | "zero" => Ok(Self::ZeroCurve),
            "discountcurve" | "discount" => Ok(Self::DiscountCurve),
            "hazardcurve" | "hazard" => Ok(Self::HazardCurve),
            "survivalcurve" | "survival" => Ok(Self::SurvivalCurve),
            "forwardcurve" | "forward" => Ok(Self::ForwardCurve),
            _ => Err(CurveError::configuration(
                keys::UNDERLYING_CURVE,
                format!("unknown underlying curve '{s}'"),
            )),
        }
    }
}

// =============================================================================
// ALGORITHM RECORDS AND PROVIDERS
// =============================================================================

/// Scalar as written in a configuration document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PropertyValue {
    Text(String),
    Flag(bool),
    Integer(i64),
    Number(f64),
}

impl PropertyValue {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Flag(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Number(x) => x.to_string(),
        }
    }
}

/// A named algorithm: property name to string value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmRecord {
    #[serde(deserialize_with = "deserialize_properties")]
    properties: BTreeMap<String, String>,
}

fn deserialize_properties<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, PropertyValue>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into_text())).collect())
}

impl AlgorithmRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.properties.insert(key.into(), value.to_string());
        self
    }

    /// Looks a property up, ignoring case in the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True if the record has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// An algorithm that is not registered. Expected control flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no algorithm '{algorithm}' registered for {curve_type}")]
pub struct CacheMiss {
    /// Curve type looked up.
    pub curve_type: PricingStructureType,
    /// Algorithm name looked up.
    pub algorithm: String,
}

/// Source of algorithm records.
pub trait AlgorithmProvider: Send + Sync {
    /// Returns the record for `(curve_type, algorithm)`.
    fn algorithm(
        &self,
        curve_type: PricingStructureType,
        algorithm: &str,
    ) -> Result<AlgorithmRecord, CacheMiss>;
}

/// In-memory algorithm store.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmStore {
    records: HashMap<(PricingStructureType, String), AlgorithmRecord>,
}

type Document = BTreeMap<String, BTreeMap<String, AlgorithmRecord>>;

impl AlgorithmStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a `Default` algorithm for every curve type.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        for curve_type in PricingStructureType::ALL {
            store.insert(curve_type, DEFAULT_ALGORITHM, default_record(curve_type));
        }
        store
    }

    /// Registers or replaces an algorithm.
    pub fn insert(
        &mut self,
        curve_type: PricingStructureType,
        algorithm: impl Into<String>,
        record: AlgorithmRecord,
    ) {
        self.records.insert((curve_type, algorithm.into()), record);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_algorithm(
        mut self,
        curve_type: PricingStructureType,
        algorithm: impl Into<String>,
        record: AlgorithmRecord,
    ) -> Self {
        self.insert(curve_type, algorithm, record);
        self
    }

    /// Adds every record of `other`, replacing clashes.
    pub fn merge(&mut self, other: AlgorithmStore) {
        self.records.extend(other.records);
    }

    /// Loads a store from a TOML document.
    pub fn from_toml_str(text: &str) -> CurveResult<Self> {
        let document: Document = toml::from_str(text)
            .map_err(|e| CurveError::configuration("toml", e.to_string()))?;
        Self::from_document(document)
    }

    /// Loads a store from a JSON document of the same shape.
    pub fn from_json_str(text: &str) -> CurveResult<Self> {
        let document: Document = serde_json::from_str(text)
            .map_err(|e| CurveError::configuration("json", e.to_string()))?;
        Self::from_document(document)
    }

    fn from_document(document: Document) -> CurveResult<Self> {
        let mut store = Self::new();
        for (curve_type, algorithms) in document {
            let curve_type: PricingStructureType = curve_type
                .parse()
                .map_err(|_| CurveError::configuration("curve type", curve_type.clone()))?;
            for (name, record) in algorithms {
                store.insert(curve_type, name, record);
            }
        }
        Ok(store)
    }

    /// Number of registered algorithms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AlgorithmProvider for AlgorithmStore {
    fn algorithm(
        &self,
        curve_type: PricingStructureType,
        algorithm: &str,
    ) -> Result<AlgorithmRecord, CacheMiss> {
        self.records
            .get(&(curve_type, algorithm.to_string()))
            .cloned()
            .ok_or_else(|| CacheMiss {
                curve_type,
                algorithm: algorithm.to_string(),
            })
    }
}

fn default_record(curve_type: PricingStructureType) -> AlgorithmRecord {
    let (interpolation, underlying) = match curve_type {
        PricingStructureType::RateCurve | PricingStructureType::RateBasisCurve => {
            ("LinearRateInterpolation", UnderlyingCurve::ZeroCurve)
        }
        PricingStructureType::CreditCurve => {
            ("LogLinearInterpolation", UnderlyingCurve::HazardCurve)
        }
        PricingStructureType::EquityCurve | PricingStructureType::FxCurve => {
            ("LinearInterpolation", UnderlyingCurve::ForwardCurve)
        }
    };
    AlgorithmRecord::new()
        .with(keys::BOOTSTRAPPER, "FastBootstrapper")
        .with(keys::BOOTSTRAPPER_INTERPOLATION, interpolation)
        .with(keys::EXTRAPOLATION_PERMITTED, true)
        .with(keys::DAY_COUNTER, "ACT/365.FIXED")
        .with(keys::COMPOUNDING_FREQUENCY, "Continuous")
        .with(keys::CURVE_INTERPOLATION, interpolation)
        .with(keys::UNDERLYING_CURVE, format!("{underlying:?}"))
        .with(keys::TOLERANCE, "1e-10")
}

// =============================================================================
// CURVE CONFIGURATION
// =============================================================================

/// Resolved, typed curve policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Bootstrapper name.
    pub bootstrapper: String,
    /// Interpolation of the partial curve during the solve.
    pub bootstrapper_interpolation: InterpolationMethod,
    /// Whether queries may leave the pillar range.
    pub extrapolation_permitted: bool,
    /// Day count for curve time.
    pub day_count: DayCountConvention,
    /// Compounding of stored zero rates.
    pub compounding: Compounding,
    /// Interpolation of the built curve.
    pub curve_interpolation: InterpolationMethod,
    /// Quantity the term function stores.
    pub underlying_curve: UnderlyingCurve,
    /// Repricing tolerance on `|implied - market|`.
    pub tolerance: f64,
    /// Solver iteration budget per pillar.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl CurveConfig {
    /// Resolves the policy for `(curve_type, algorithm)`.
    ///
    /// A miss on the named algorithm is retried under [`DEFAULT_ALGORITHM`];
    /// a miss there, a missing key or an unparseable value is a
    /// configuration error.
    pub fn resolve(
        curve_type: PricingStructureType,
        algorithm: &str,
        provider: &dyn AlgorithmProvider,
    ) -> CurveResult<Self> {
        let record = match provider.algorithm(curve_type, algorithm) {
            Ok(record) => record,
            Err(miss) if algorithm != DEFAULT_ALGORITHM => {
                debug!(%miss, fallback = DEFAULT_ALGORITHM, "algorithm not registered");
                provider
                    .algorithm(curve_type, DEFAULT_ALGORITHM)
                    .map_err(|miss| CurveError::configuration("Algorithm", miss.to_string()))?
            }
            Err(miss) => return Err(CurveError::configuration("Algorithm", miss.to_string())),
        };
        Self::from_record(&record)
    }

    /// Parses a record into a configuration.
    pub fn from_record(record: &AlgorithmRecord) -> CurveResult<Self> {
        let max_iterations = match record.get(keys::MAX_ITERATIONS) {
            Some(text) => parse_value(keys::MAX_ITERATIONS, text)?,
            None => DEFAULT_MAX_ITERATIONS,
        };
        let tolerance: f64 = parse_value(keys::TOLERANCE, required(record, keys::TOLERANCE)?)?;
        if tolerance.is_nan() || tolerance <= 0.0 {
            return Err(CurveError::configuration(
                keys::TOLERANCE,
                "tolerance must be positive",
            ));
        }

        Ok(Self {
            bootstrapper: required(record, keys::BOOTSTRAPPER)?.to_string(),
            bootstrapper_interpolation: required(record, keys::BOOTSTRAPPER_INTERPOLATION)?
                .parse()?,
            extrapolation_permitted: parse_value(
                keys::EXTRAPOLATION_PERMITTED,
                &required(record, keys::EXTRAPOLATION_PERMITTED)?.to_lowercase(),
            )?,
            day_count: parse_value(keys::DAY_COUNTER, required(record, keys::DAY_COUNTER)?)?,
            compounding: parse_value(
                keys::COMPOUNDING_FREQUENCY,
                required(record, keys::COMPOUNDING_FREQUENCY)?,
            )?,
            curve_interpolation: required(record, keys::CURVE_INTERPOLATION)?.parse()?,
            underlying_curve: required(record, keys::UNDERLYING_CURVE)?.parse()?,
            tolerance,
            max_iterations,
        })
    }

    /// Built-in default policy for a curve type.
    #[must_use]
    pub fn default_for(curve_type: PricingStructureType) -> Self {
        let (interpolation, underlying_curve) = match curve_type {
            PricingStructureType::RateCurve | PricingStructureType::RateBasisCurve => {
                (InterpolationMethod::Linear, UnderlyingCurve::ZeroCurve)
            }
            PricingStructureType::CreditCurve => {
                (InterpolationMethod::LogLinear, UnderlyingCurve::HazardCurve)
            }
            PricingStructureType::EquityCurve | PricingStructureType::FxCurve => {
                (InterpolationMethod::Linear, UnderlyingCurve::ForwardCurve)
            }
        };
        Self {
            bootstrapper: "FastBootstrapper".to_string(),
            bootstrapper_interpolation: interpolation,
            extrapolation_permitted: true,
            day_count: DayCountConvention::Act365Fixed,
            compounding: Compounding::Continuous,
            curve_interpolation: interpolation,
            underlying_curve,
            tolerance: 1e-10,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Replaces the underlying curve.
    #[must_use]
    pub fn with_underlying_curve(mut self, underlying: UnderlyingCurve) -> Self {
        self.underlying_curve = underlying;
        self
    }

    /// Replaces both interpolation methods.
    #[must_use]
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.bootstrapper_interpolation = method;
        self.curve_interpolation = method;
        self
    }

    /// Replaces the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the extrapolation flag.
    #[must_use]
    pub fn with_extrapolation(mut self, permitted: bool) -> Self {
        self.extrapolation_permitted = permitted;
        self
    }
}

fn required<'a>(record: &'a AlgorithmRecord, key: &str) -> CurveResult<&'a str> {
    record
        .get(key)
        .ok_or_else(|| CurveError::configuration(key, "missing"))
}

fn parse_value<T>(key: &str, text: &str) -> CurveResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.trim()
        .parse()
        .map_err(|e: T::Err| CurveError::configuration(key, format!("cannot parse '{text}': {e}")))
}
