//! Backward induction on the log-price lattice.

use ndarray::Array1;

use super::curve::{DividendSchedule, ZeroRateCurve};
use super::sor::{solve_projected, Relaxation, Tridiagonal};
use super::{ExerciseStyle, GridSpec, OptionSpec, Payoff};
use crate::error::{MathError, MathResult};
use crate::linear_algebra::polynomial_through;

/// Option values on the lattice at valuation time.
#[derive(Debug, Clone)]
pub(crate) struct Lattice {
    x: Array1<f64>,
    values: Array1<f64>,
    dx: f64,
    /// Value at spot one time step after valuation.
    value_one_step_out: f64,
    /// Length of that step in years.
    last_dt: f64,
}

impl Lattice {
    fn locate(&self, spot: f64) -> MathResult<(usize, f64)> {
        let n = self.x.len();
        let ln_spot = spot.ln();
        let position = (ln_spot - self.x[0]) / self.dx;
        if !position.is_finite() || position < 0.0 || position > (n - 1) as f64 {
            return Err(MathError::invalid_input(format!(
                "spot {spot} is outside the lattice [{:.4}, {:.4}]",
                self.x[0].exp(),
                self.x[n - 1].exp()
            )));
        }
        let k = (position.floor() as usize).min(n - 2);
        Ok((k, position - k as f64))
    }

    /// Linear interpolation in log-price.
    pub(crate) fn value_at(&self, spot: f64) -> MathResult<f64> {
        let (k, w) = self.locate(spot)?;
        Ok(self.values[k] * (1.0 - w) + self.values[k + 1] * w)
    }

    /// Delta and gamma from a cubic in price through the four nodes around spot.
    pub(crate) fn delta_gamma(&self, spot: f64) -> MathResult<(f64, f64)> {
        let (k, _) = self.locate(spot)?;
        if k == 0 || k + 2 >= self.x.len() {
            return Err(MathError::invalid_input(
                "spot is too close to the lattice edge for delta and gamma",
            ));
        }
        let offsets: Vec<f64> = (k - 1..=k + 2).map(|i| self.x[i].exp() - spot).collect();
        let ys: Vec<f64> = (k - 1..=k + 2).map(|i| self.values[i]).collect();
        let c = polynomial_through(&offsets, &ys)?;
        Ok((c[1], 2.0 * c[2]))
    }

    /// Time decay per calendar day.
    pub(crate) fn theta(&self, price: f64) -> f64 {
        (self.value_one_step_out - price) / (365.0 * self.last_dt)
    }
}

/// Carries the terminal payoff back to valuation time.
pub(crate) fn roll_back<C: ZeroRateCurve + ?Sized>(
    grid: &GridSpec,
    option: &OptionSpec,
    curve: &C,
    dividends: &DividendSchedule,
) -> MathResult<Lattice> {
    let n = grid.space_steps;
    let dx = (grid.x_upper - grid.x_lower) / (n - 1) as f64;
    let x = Array1::from_shape_fn(n, |i| grid.x_lower + i as f64 * dx);
    let prices = x.mapv(f64::exp);
    let intrinsic = prices.mapv(|s| option.payoff.terminal_value(s, option.strike));
    let floor = match option.style {
        ExerciseStyle::American => Some(&intrinsic),
        ExerciseStyle::European => None,
    };
    let relaxation = Relaxation {
        omega: grid.sor_omega,
        tolerance: grid.sor_tolerance,
        max_iterations: grid.sor_max_iterations,
    };

    let expiry = option.expiry;
    let dt_nominal = expiry / grid.time_steps as f64;
    let mut values = intrinsic.clone();
    let mut t = expiry;
    let mut dt = dt_nominal;
    let mut value_one_step_out = f64::NAN;
    let mut sweeps = 0u64;
    let mut steps = 0u32;

    let sigma2 = option.volatility * option.volatility;
    let n1_coeff = 1.0 / (dx * dx);
    let n2_coeff = 1.0 / dx;

    while t > 0.0 {
        let t_start = if t - dt_nominal < dt_nominal * 1e-9 {
            0.0
        } else {
            t - dt_nominal
        };
        let paid = dividends.first_in(t_start, t);
        dt = match paid {
            Some(div) => t - div.time,
            None => t - t_start,
        };
        t = if paid.is_some() { t - dt } else { t_start };
        let tau = expiry - t;
        steps += 1;

        let r = curve.forward_rate(t, t + dt);
        let r_boundary = curve.forward_rate(t, expiry);
        let pending = dividends.present_value_between(t, expiry, curve);

        value_one_step_out = interpolate(&x, &values, dx, option.spot.ln());

        let a = 0.5 * sigma2;
        let b = r - option.carry_yield - 0.5 * sigma2;
        let c = -r;
        let n1 = dt * n1_coeff;
        let n2 = dt * n2_coeff;
        let lower = n1 * a - 0.5 * n2 * b;
        let centre = -2.0 * n1 * a + dt * c;
        let upper = n1 * a + 0.5 * n2 * b;

        let explicit = 1.0 - grid.theta;
        let rhs_operator = Tridiagonal::constant(
            n,
            explicit * lower,
            1.0 + explicit * centre,
            explicit * upper,
        );
        let lhs_operator = Tridiagonal::constant(
            n,
            -grid.theta * lower,
            1.0 - grid.theta * centre,
            -grid.theta * upper,
        );

        let rhs = rhs_operator.apply_interior(&values);
        let edges = Edges {
            option,
            tau,
            rate: r_boundary,
            pending_dividends: pending,
        };
        values[0] = edges.lower(prices[0]);
        values[n - 1] = edges.upper(prices[n - 1]);

        sweeps += u64::from(solve_projected(
            &lhs_operator,
            &rhs,
            &mut values,
            floor,
            relaxation,
        )?);

        if let Some(div) = paid {
            values = shift_for_dividend(&x, &values, dx, div.amount, &edges, &intrinsic);
        }
    }

    log::debug!(
        "lattice rolled back over {} steps with {} SOR sweeps",
        steps,
        sweeps
    );

    Ok(Lattice {
        x,
        values,
        dx,
        value_one_step_out,
        last_dt: dt,
    })
}

/// Boundary conditions at the lattice edges.
struct Edges<'a> {
    option: &'a OptionSpec,
    tau: f64,
    rate: f64,
    pending_dividends: f64,
}

impl Edges<'_> {
    fn discount(&self) -> f64 {
        (-self.rate * self.tau).exp()
    }

    fn lower(&self, s: f64) -> f64 {
        let option = self.option;
        if option.lower_knock_out {
            return 0.0;
        }
        match option.payoff {
            Payoff::Put => match option.style {
                ExerciseStyle::European => {
                    self.discount() * option.strike - (s - self.pending_dividends).max(0.0)
                }
                ExerciseStyle::American => option.strike - s,
            },
            Payoff::BinaryPut => self.discount(),
            Payoff::Call | Payoff::BinaryCall | Payoff::Touch => 0.0,
        }
    }

    fn upper(&self, s: f64) -> f64 {
        let option = self.option;
        if option.upper_knock_out {
            return 0.0;
        }
        match option.payoff {
            Payoff::Call => {
                let carry = (-option.carry_yield * self.tau).exp();
                let european =
                    s * carry - self.pending_dividends - self.discount() * option.strike;
                match option.style {
                    ExerciseStyle::European => european,
                    ExerciseStyle::American => european.max(s - option.strike),
                }
            }
            Payoff::BinaryCall => self.discount(),
            Payoff::Put | Payoff::BinaryPut | Payoff::Touch => 0.0,
        }
    }
}

/// Re-maps values across an ex-dividend date: a node at price `S` just
/// before the ex-date takes the value at `S - D` just after it.
fn shift_for_dividend(
    x: &Array1<f64>,
    values: &Array1<f64>,
    dx: f64,
    amount: f64,
    edges: &Edges<'_>,
    intrinsic: &Array1<f64>,
) -> Array1<f64> {
    let american = edges.option.style == ExerciseStyle::American;
    let x_lower = x[0];
    let mut shifted = Array1::zeros(x.len());

    for i in 0..x.len() {
        let ex_price = (x[i].exp() - amount).max(0.0);
        let value = if i > 0 && ex_price > 0.0 && ex_price.ln() >= x_lower {
            interpolate(x, values, dx, ex_price.ln())
        } else {
            edges.lower(ex_price)
        };
        shifted[i] = if american {
            value.max(intrinsic[i])
        } else {
            value
        };
    }
    shifted
}

fn interpolate(x: &Array1<f64>, values: &Array1<f64>, dx: f64, at: f64) -> f64 {
    let n = x.len();
    let position = ((at - x[0]) / dx).clamp(0.0, (n - 1) as f64);
    let k = (position.floor() as usize).min(n - 2);
    let w = position - k as f64;
    values[k] * (1.0 - w) + values[k + 1] * w
}
