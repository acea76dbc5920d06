//! Forward level bootstrapping for equity and FX curves.

use std::sync::Arc;

use tenor_core::Date;

use super::{bootstrap_sequential, BootstrapSettings, Bootstrapper, Layering};
use crate::error::CurveResult;
use crate::instruments::PriceableInstrument;
use crate::term::TermFunction;

/// Solves forward levels from forward quotes.
///
/// Each forward's level is its own closed form, so this reduces to reading
/// the quotes; the repricing check still runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct EquityBootstrapper;

/// FX curves use the same bootstrapper.
pub type ForwardLevelBootstrapper = EquityBootstrapper;

impl EquityBootstrapper {
    /// Creates the bootstrapper.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Bootstrapper for EquityBootstrapper {
    fn bootstrap(
        &self,
        instruments: &[Arc<dyn PriceableInstrument>],
        base_date: Date,
        settings: &BootstrapSettings,
    ) -> CurveResult<TermFunction> {
        bootstrap_sequential(instruments, base_date, settings, Layering::Standalone)
    }
}
