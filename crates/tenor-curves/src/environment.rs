//! Named curve collections.

use std::collections::BTreeMap;

use crate::curves::{CurveVariant, PricingStructure, RateCurve};
use crate::error::{CurveError, CurveResult};

/// Curves of one market snapshot, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct MarketEnvironment {
    name: String,
    curves: BTreeMap<String, CurveVariant>,
}

impl MarketEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: BTreeMap::new(),
        }
    }

    /// Name of the environment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a curve under `name`, replacing any curve already there.
    pub fn insert(&mut self, name: impl Into<String>, curve: impl Into<CurveVariant>) {
        self.curves.insert(name.into(), curve.into());
    }

    /// Adds a curve under its own unique id.
    #[must_use]
    pub fn with_curve(mut self, curve: impl Into<CurveVariant>) -> Self {
        let curve = curve.into();
        self.curves.insert(curve.identifier().unique_id(), curve);
        self
    }

    /// The curve named `name`.
    pub fn curve(&self, name: &str) -> CurveResult<&CurveVariant> {
        self.curves
            .get(name)
            .ok_or_else(|| CurveError::curve_not_found(name))
    }

    /// The rate curve named `name`.
    pub fn rate_curve(&self, name: &str) -> CurveResult<&RateCurve> {
        let curve = self.curve(name)?;
        curve.as_rate().ok_or_else(|| {
            CurveError::validation(format!(
                "curve '{name}' is a {}, not a rate curve",
                curve.pricing_structure_type()
            ))
        })
    }

    /// Removes and returns the curve named `name`.
    pub fn remove(&mut self, name: &str) -> Option<CurveVariant> {
        self.curves.remove(name)
    }

    /// Curve names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }

    /// Number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// True if there are no curves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}
