//! Discount curve bootstrapping.

use std::sync::Arc;

use tenor_core::Date;

use super::{bootstrap_sequential, BootstrapSettings, Bootstrapper, Layering};
use crate::error::CurveResult;
use crate::instruments::PriceableInstrument;
use crate::term::TermFunction;

/// Solves discount factors (or zero rates) from deposits, FRAs, futures
/// and swaps.
///
/// Values are solved in the curve's own interpolation space: a linear-zero
/// configuration solves zero rates, a discount-curve configuration solves
/// discount factors directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateBootstrapper;

impl RateBootstrapper {
    /// Creates the bootstrapper.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Bootstrapper for RateBootstrapper {
    fn bootstrap(
        &self,
        instruments: &[Arc<dyn PriceableInstrument>],
        base_date: Date,
        settings: &BootstrapSettings,
    ) -> CurveResult<TermFunction> {
        bootstrap_sequential(instruments, base_date, settings, Layering::Standalone)
    }
}
