//! Finite-difference pricing of equity options on a log-price lattice.
//!
//! The Black-Scholes equation in `x = ln(S)` is stepped back from expiry
//! with a theta scheme (`theta = 0.5` is Crank-Nicolson). Each implicit
//! half-step is solved by SOR, with values projected onto intrinsic value
//! for American exercise. Discrete cash dividends shorten the time step so
//! that a step ends exactly on the ex-date, after which the lattice values
//! are re-mapped from `S` to `S - D`.
//!
//! # Example
//!
//! ```rust
//! use tenor_math::pde::{
//!     DividendSchedule, ExerciseStyle, FiniteDifferencePricer, GridSpec, OptionSpec, Payoff,
//!     ZeroCurve,
//! };
//!
//! let option = OptionSpec::new(Payoff::Call, ExerciseStyle::European, 100.0, 100.0, 1.0, 0.2);
//! let pricer = FiniteDifferencePricer::new(GridSpec::around_spot(100.0, 0.2, 1.0));
//! let price = pricer
//!     .price(&option, &ZeroCurve::flat(0.05), &DividendSchedule::none())
//!     .unwrap();
//! assert!((price - 10.45).abs() < 0.05);
//! ```

mod curve;
mod lattice;
mod sor;

pub use curve::{Dividend, DividendSchedule, ZeroCurve, ZeroRateCurve};

use std::cell::RefCell;

use curve::ShiftedCurve;
use lattice::roll_back;

use crate::error::{MathError, MathResult};
use crate::solvers::{secant, SolverConfig};

/// Default number of lattice nodes in log-price.
pub const DEFAULT_SPACE_STEPS: usize = 401;

/// Default number of time steps to expiry.
pub const DEFAULT_TIME_STEPS: usize = 200;

/// Convergence threshold on the SOR update norm.
pub const SOR_TOLERANCE: f64 = 1e-6;

/// Sweep cap for a single time step.
pub const SOR_MAX_ITERATIONS: u32 = 10_000;

/// Terminal payoff of the option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payoff {
    /// `max(S - K, 0)`.
    Call,
    /// `max(K - S, 0)`.
    Put,
    /// Pays 1 when `S > K`.
    BinaryCall,
    /// Pays 1 when `S <= K`.
    BinaryPut,
    /// Pays 1 at expiry unless either lattice edge is reached first.
    Touch,
}

impl Payoff {
    /// Payoff at price `spot` for strike `strike`.
    #[must_use]
    pub fn terminal_value(self, spot: f64, strike: f64) -> f64 {
        match self {
            Self::Call => (spot - strike).max(0.0),
            Self::Put => (strike - spot).max(0.0),
            Self::BinaryCall => {
                if spot > strike {
                    1.0
                } else {
                    0.0
                }
            }
            Self::BinaryPut => {
                if spot > strike {
                    0.0
                } else {
                    1.0
                }
            }
            Self::Touch => 1.0,
        }
    }
}

/// Exercise style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExerciseStyle {
    /// Exercise at expiry only.
    #[default]
    European,
    /// Exercise at any time up to expiry.
    American,
}

/// Lattice layout and solver settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    /// Number of nodes in log-price.
    pub space_steps: usize,
    /// Nominal number of time steps to expiry.
    pub time_steps: usize,
    /// Lowest log-price node.
    pub x_lower: f64,
    /// Highest log-price node.
    pub x_upper: f64,
    /// Implicitness: 0 explicit, 0.5 Crank-Nicolson, 1 fully implicit.
    pub theta: f64,
    /// SOR relaxation factor in `(0, 2)`.
    pub sor_omega: f64,
    /// SOR convergence threshold.
    pub sor_tolerance: f64,
    /// SOR sweep cap per time step.
    pub sor_max_iterations: u32,
}

impl GridSpec {
    /// Creates a grid on `[x_lower, x_upper]` in log-price.
    #[must_use]
    pub fn new(space_steps: usize, time_steps: usize, x_lower: f64, x_upper: f64) -> Self {
        Self {
            space_steps,
            time_steps,
            x_lower,
            x_upper,
            theta: 0.5,
            sor_omega: 1.0,
            sor_tolerance: SOR_TOLERANCE,
            sor_max_iterations: SOR_MAX_ITERATIONS,
        }
    }

    /// Default grid spanning five standard deviations either side of spot.
    #[must_use]
    pub fn around_spot(spot: f64, volatility: f64, expiry: f64) -> Self {
        let width = (5.0 * volatility * expiry.max(0.0).sqrt()).max(0.5);
        let centre = spot.ln();
        Self::new(
            DEFAULT_SPACE_STEPS,
            DEFAULT_TIME_STEPS,
            centre - width,
            centre + width,
        )
    }

    /// Sets the implicitness of the scheme.
    #[must_use]
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Sets the SOR relaxation factor.
    #[must_use]
    pub fn with_sor_omega(mut self, omega: f64) -> Self {
        self.sor_omega = omega;
        self
    }

    /// Sets the number of time steps.
    #[must_use]
    pub fn with_time_steps(mut self, time_steps: usize) -> Self {
        self.time_steps = time_steps;
        self
    }

    fn validate(&self) -> MathResult<()> {
        if self.space_steps < 5 {
            return Err(MathError::insufficient_data(5, self.space_steps));
        }
        if self.time_steps == 0 {
            return Err(MathError::invalid_input("time_steps must be positive"));
        }
        if !(self.x_lower < self.x_upper) {
            return Err(MathError::invalid_input(format!(
                "grid bounds [{}, {}] are not increasing",
                self.x_lower, self.x_upper
            )));
        }
        if !(0.0..=1.0).contains(&self.theta) {
            return Err(MathError::invalid_input(format!(
                "theta must lie in [0, 1], got {}",
                self.theta
            )));
        }
        if !(self.sor_omega > 0.0 && self.sor_omega < 2.0) {
            return Err(MathError::invalid_input(format!(
                "SOR omega must lie in (0, 2), got {}",
                self.sor_omega
            )));
        }
        Ok(())
    }
}

/// Contract and market inputs for one option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    /// Terminal payoff.
    pub payoff: Payoff,
    /// Exercise style.
    pub style: ExerciseStyle,
    /// Spot price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to expiry in years.
    pub expiry: f64,
    /// Lognormal volatility.
    pub volatility: f64,
    /// Continuous carry (dividend yield or foreign rate).
    pub carry_yield: f64,
    /// Value is zero at the lower edge.
    pub lower_knock_out: bool,
    /// Value is zero at the upper edge.
    pub upper_knock_out: bool,
}

impl OptionSpec {
    /// Creates an option with no carry and no knock-outs.
    #[must_use]
    pub fn new(
        payoff: Payoff,
        style: ExerciseStyle,
        spot: f64,
        strike: f64,
        expiry: f64,
        volatility: f64,
    ) -> Self {
        Self {
            payoff,
            style,
            spot,
            strike,
            expiry,
            volatility,
            carry_yield: 0.0,
            lower_knock_out: false,
            upper_knock_out: false,
        }
    }

    /// Sets the continuous carry.
    #[must_use]
    pub fn with_carry_yield(mut self, carry_yield: f64) -> Self {
        self.carry_yield = carry_yield;
        self
    }

    /// Knocks the option out at either lattice edge.
    #[must_use]
    pub fn with_knock_outs(mut self, lower: bool, upper: bool) -> Self {
        self.lower_knock_out = lower;
        self.upper_knock_out = upper;
        self
    }

    #[must_use]
    fn with_volatility(&self, volatility: f64) -> Self {
        Self {
            volatility,
            ..self.clone()
        }
    }

    fn validate(&self) -> MathResult<()> {
        let positive = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("expiry", self.expiry),
            ("volatility", self.volatility),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(MathError::invalid_input(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Sensitivities at valuation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Greeks {
    /// dV/dS.
    pub delta: f64,
    /// d2V/dS2.
    pub gamma: f64,
    /// Change in value per calendar day.
    pub theta: f64,
    /// Change in value per volatility point.
    pub vega: f64,
    /// Change in value per basis point parallel rate shift.
    pub rho: f64,
}

/// Prices options on a fixed lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct FiniteDifferencePricer {
    grid: GridSpec,
}

impl FiniteDifferencePricer {
    /// Creates a pricer on the given grid.
    #[must_use]
    pub fn new(grid: GridSpec) -> Self {
        Self { grid }
    }

    /// The lattice layout.
    #[must_use]
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Present value of the option.
    pub fn price<C: ZeroRateCurve + ?Sized>(
        &self,
        option: &OptionSpec,
        curve: &C,
        dividends: &DividendSchedule,
    ) -> MathResult<f64> {
        self.validate(option)?;
        roll_back(&self.grid, option, curve, dividends)?.value_at(option.spot)
    }

    /// Present value with delta, gamma, theta, vega and rho.
    ///
    /// Delta, gamma and theta come from the lattice itself. Vega bumps
    /// volatility by one point and rho shifts the curve by one basis point,
    /// both by central difference.
    pub fn price_with_greeks<C: ZeroRateCurve + ?Sized>(
        &self,
        option: &OptionSpec,
        curve: &C,
        dividends: &DividendSchedule,
    ) -> MathResult<(f64, Greeks)> {
        self.validate(option)?;
        let lattice = roll_back(&self.grid, option, curve, dividends)?;
        let price = lattice.value_at(option.spot)?;
        let (delta, gamma) = lattice.delta_gamma(option.spot)?;

        let vol_bump = 0.01;
        let vol_up = self.price(&option.with_volatility(option.volatility + vol_bump), curve, dividends)?;
        let vega = if option.volatility > vol_bump {
            let vol_down =
                self.price(&option.with_volatility(option.volatility - vol_bump), curve, dividends)?;
            0.5 * (vol_up - vol_down)
        } else {
            vol_up - price
        };

        let rate_bump = 1e-4;
        let rate_up = self.price(option, &ShiftedCurve { base: curve, shift: rate_bump }, dividends)?;
        let rate_down =
            self.price(option, &ShiftedCurve { base: curve, shift: -rate_bump }, dividends)?;

        Ok((
            price,
            Greeks {
                delta,
                gamma,
                theta: lattice.theta(price),
                vega,
                rho: 0.5 * (rate_up - rate_down),
            },
        ))
    }

    /// Volatility at which the lattice reproduces `target_price`.
    ///
    /// Secant iteration from `initial_guess`, stopping once the price error
    /// is below 1e-4, within 20 iterations.
    pub fn implied_volatility<C: ZeroRateCurve + ?Sized>(
        &self,
        option: &OptionSpec,
        target_price: f64,
        initial_guess: f64,
        curve: &C,
        dividends: &DividendSchedule,
    ) -> MathResult<f64> {
        self.validate(&option.with_volatility(initial_guess))?;
        let failure = RefCell::new(None);
        let objective = |sigma: f64| {
            match self.price(&option.with_volatility(sigma), curve, dividends) {
                Ok(price) => price - target_price,
                Err(e) => {
                    failure.borrow_mut().get_or_insert(e);
                    f64::NAN
                }
            }
        };
        let config = SolverConfig::new(1e-4, 20);
        let result = secant(objective, initial_guess, initial_guess * 1.01, &config);
        if let Some(e) = failure.into_inner() {
            return Err(e);
        }
        let root = result?.root;
        log::debug!("implied volatility {root:.6} for target price {target_price}");
        Ok(root)
    }

    /// Forward level at `t`: spot net of dividends paid by `t`, grown at the zero rate.
    pub fn atm_forward<C: ZeroRateCurve + ?Sized>(
        spot: f64,
        t: f64,
        curve: &C,
        dividends: &DividendSchedule,
    ) -> f64 {
        let paid: f64 = dividends
            .dividends()
            .iter()
            .filter(|d| d.time > 0.0 && d.time <= t)
            .map(|d| d.amount * curve.discount_factor(d.time))
            .sum();
        (spot - paid) / curve.discount_factor(t)
    }

    fn validate(&self, option: &OptionSpec) -> MathResult<()> {
        self.grid.validate()?;
        option.validate()?;
        let ln_spot = option.spot.ln();
        if ln_spot <= self.grid.x_lower || ln_spot >= self.grid.x_upper {
            return Err(MathError::invalid_input(format!(
                "spot {} lies outside the grid",
                option.spot
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Black-Scholes, S = K = 100, r = 5%, sigma = 20%, T = 1
    const BS_CALL: f64 = 10.450583572185565;
    const BS_PUT: f64 = 5.573526022256971;
    const BS_CALL_DELTA: f64 = 0.6368306511756191;
    const BS_GAMMA: f64 = 0.018762017345846895;

    fn pricer() -> FiniteDifferencePricer {
        FiniteDifferencePricer::new(GridSpec::around_spot(100.0, 0.2, 1.0))
    }

    fn option(payoff: Payoff, style: ExerciseStyle) -> OptionSpec {
        OptionSpec::new(payoff, style, 100.0, 100.0, 1.0, 0.2)
    }

    #[test]
    fn test_european_matches_black_scholes() {
        let curve = ZeroCurve::flat(0.05);
        let none = DividendSchedule::none();
        let call = pricer()
            .price(&option(Payoff::Call, ExerciseStyle::European), &curve, &none)
            .unwrap();
        let put = pricer()
            .price(&option(Payoff::Put, ExerciseStyle::European), &curve, &none)
            .unwrap();
        assert_relative_eq!(call, BS_CALL, epsilon = 0.05);
        assert_relative_eq!(put, BS_PUT, epsilon = 0.05);
    }

    #[test]
    fn test_american_put_premium() {
        let curve = ZeroCurve::flat(0.05);
        let none = DividendSchedule::none();
        let european = pricer()
            .price(&option(Payoff::Put, ExerciseStyle::European), &curve, &none)
            .unwrap();
        let american = pricer()
            .price(&option(Payoff::Put, ExerciseStyle::American), &curve, &none)
            .unwrap();
        assert!(american > european + 0.1);
        assert!(american >= 0.0);
    }

    #[test]
    fn test_dividend_lowers_call() {
        let curve = ZeroCurve::flat(0.05);
        let call = option(Payoff::Call, ExerciseStyle::European);
        let plain = pricer().price(&call, &curve, &DividendSchedule::none()).unwrap();
        let divs = DividendSchedule::new([(0.5, 3.0)]).unwrap();
        let with_div = pricer().price(&call, &curve, &divs).unwrap();
        assert!(with_div < plain - 1.0);
    }

    #[test]
    fn test_binaries_sum_to_discount() {
        let curve = ZeroCurve::flat(0.05);
        let none = DividendSchedule::none();
        let up = pricer()
            .price(&option(Payoff::BinaryCall, ExerciseStyle::European), &curve, &none)
            .unwrap();
        let down = pricer()
            .price(&option(Payoff::BinaryPut, ExerciseStyle::European), &curve, &none)
            .unwrap();
        assert_relative_eq!(up + down, (-0.05_f64).exp(), epsilon = 1e-3);
    }

    #[test]
    fn test_greeks_close_to_black_scholes() {
        let curve = ZeroCurve::flat(0.05);
        let (price, greeks) = pricer()
            .price_with_greeks(
                &option(Payoff::Call, ExerciseStyle::European),
                &curve,
                &DividendSchedule::none(),
            )
            .unwrap();
        assert_relative_eq!(price, BS_CALL, epsilon = 0.05);
        assert_relative_eq!(greeks.delta, BS_CALL_DELTA, epsilon = 0.01);
        assert_relative_eq!(greeks.gamma, BS_GAMMA, epsilon = 0.002);
        // vega ~ 0.375 per point, rho ~ 0.0532 per bp, theta ~ -0.0176 per day
        assert_relative_eq!(greeks.vega, 0.3752, epsilon = 0.01);
        assert_relative_eq!(greeks.rho, 0.005323, epsilon = 0.0005);
        assert!(greeks.theta < 0.0);
    }

    #[test]
    fn test_implied_volatility_round_trip() {
        let curve = ZeroCurve::flat(0.05);
        let none = DividendSchedule::none();
        let call = option(Payoff::Call, ExerciseStyle::European);
        let target = pricer().price(&call, &curve, &none).unwrap();
        let sigma = pricer()
            .implied_volatility(&call, target, 0.3, &curve, &none)
            .unwrap();
        assert_relative_eq!(sigma, 0.2, epsilon = 1e-3);
    }

    #[test]
    fn test_atm_forward() {
        let curve = ZeroCurve::flat(0.05);
        let plain = FiniteDifferencePricer::atm_forward(100.0, 1.0, &curve, &DividendSchedule::none());
        assert_relative_eq!(plain, 100.0 * 0.05_f64.exp(), epsilon = 1e-10);

        let divs = DividendSchedule::new([(0.5, 2.0), (1.5, 2.0)]).unwrap();
        let fwd = FiniteDifferencePricer::atm_forward(100.0, 1.0, &curve, &divs);
        let expected = (100.0 - 2.0 * (-0.025_f64).exp()) * 0.05_f64.exp();
        assert_relative_eq!(fwd, expected, epsilon = 1e-10);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let curve = ZeroCurve::flat(0.05);
        let none = DividendSchedule::none();
        let bad_vol = OptionSpec::new(Payoff::Call, ExerciseStyle::European, 100.0, 100.0, 1.0, 0.0);
        assert!(pricer().price(&bad_vol, &curve, &none).is_err());

        let outside = OptionSpec::new(Payoff::Call, ExerciseStyle::European, 1e6, 100.0, 1.0, 0.2);
        assert!(pricer().price(&outside, &curve, &none).is_err());

        let coarse = FiniteDifferencePricer::new(GridSpec::new(3, 10, 4.0, 5.0));
        assert!(matches!(
            coarse.price(&option(Payoff::Call, ExerciseStyle::European), &curve, &none),
            Err(MathError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_payoffs() {
        assert_eq!(Payoff::Call.terminal_value(110.0, 100.0), 10.0);
        assert_eq!(Payoff::Put.terminal_value(110.0, 100.0), 0.0);
        assert_eq!(Payoff::BinaryCall.terminal_value(100.0, 100.0), 0.0);
        assert_eq!(Payoff::BinaryPut.terminal_value(100.0, 100.0), 1.0);
        assert_eq!(Payoff::Touch.terminal_value(1.0, 100.0), 1.0);
    }
}
