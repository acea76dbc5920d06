//! Integration test: finite-difference pricing against known benchmarks.
//!
//! European values are checked against Black-Scholes; American puts against
//! the no-arbitrage bounds they must satisfy.
//!
//! | Inputs      | Value   |
//! |-------------|---------|
//! | S = K       | 100     |
//! | r           | 5% flat |
//! | sigma       | 20%     |
//! | T           | 1Y      |
//! | BS call     | 10.4506 |
//! | BS put      | 5.5735  |

use approx::assert_relative_eq;
use tenor_math::pde::{
    DividendSchedule, ExerciseStyle, FiniteDifferencePricer, GridSpec, OptionSpec, Payoff,
    ZeroCurve, ZeroRateCurve,
};

#[test]
fn test_put_call_parity_on_upward_curve() {
    let curve = ZeroCurve::new(vec![0.25, 1.0, 2.0], vec![0.03, 0.04, 0.045]).unwrap();
    let none = DividendSchedule::none();
    let pricer = FiniteDifferencePricer::new(GridSpec::around_spot(100.0, 0.25, 1.0));

    let call = OptionSpec::new(Payoff::Call, ExerciseStyle::European, 100.0, 95.0, 1.0, 0.25);
    let put = OptionSpec {
        payoff: Payoff::Put,
        ..call.clone()
    };

    let c = pricer.price(&call, &curve, &none).unwrap();
    let p = pricer.price(&put, &curve, &none).unwrap();
    let parity = 100.0 - 95.0 * curve.discount_factor(1.0);
    assert_relative_eq!(c - p, parity, epsilon = 0.05);
}

#[test]
fn test_parity_with_discrete_dividends() {
    let curve = ZeroCurve::flat(0.05);
    let divs = DividendSchedule::new([(0.3, 1.5), (0.8, 1.5)]).unwrap();
    let pricer = FiniteDifferencePricer::new(GridSpec::around_spot(100.0, 0.2, 1.0));

    let call = OptionSpec::new(Payoff::Call, ExerciseStyle::European, 100.0, 100.0, 1.0, 0.2);
    let put = OptionSpec {
        payoff: Payoff::Put,
        ..call.clone()
    };

    let c = pricer.price(&call, &curve, &divs).unwrap();
    let p = pricer.price(&put, &curve, &divs).unwrap();
    let pv_divs: f64 = divs
        .dividends()
        .iter()
        .map(|d| d.amount * curve.discount_factor(d.time))
        .sum();
    let parity = 100.0 - pv_divs - 100.0 * curve.discount_factor(1.0);
    assert_relative_eq!(c - p, parity, epsilon = 0.1);
}

#[test]
fn test_american_put_bounds() {
    let curve = ZeroCurve::flat(0.05);
    let none = DividendSchedule::none();
    let pricer = FiniteDifferencePricer::new(GridSpec::around_spot(100.0, 0.2, 1.0));

    for strike in [90.0, 100.0, 110.0] {
        let european = OptionSpec::new(Payoff::Put, ExerciseStyle::European, 100.0, strike, 1.0, 0.2);
        let american = OptionSpec {
            style: ExerciseStyle::American,
            ..european.clone()
        };
        let e = pricer.price(&european, &curve, &none).unwrap();
        let a = pricer.price(&american, &curve, &none).unwrap();
        assert!(a >= e - 1e-6, "strike {strike}: american {a} < european {e}");
        assert!(a >= (strike - 100.0_f64).max(0.0) - 1e-6);
    }
}

#[test]
fn test_implicit_and_crank_nicolson_agree() {
    let curve = ZeroCurve::flat(0.05);
    let none = DividendSchedule::none();
    let option = OptionSpec::new(Payoff::Call, ExerciseStyle::European, 100.0, 100.0, 1.0, 0.2);

    let cn = FiniteDifferencePricer::new(GridSpec::around_spot(100.0, 0.2, 1.0));
    let implicit = FiniteDifferencePricer::new(
        GridSpec::around_spot(100.0, 0.2, 1.0)
            .with_theta(1.0)
            .with_time_steps(400),
    );
    let a = cn.price(&option, &curve, &none).unwrap();
    let b = implicit.price(&option, &curve, &none).unwrap();
    assert_relative_eq!(a, b, epsilon = 0.05);
}

#[test]
fn test_knock_out_edges_cheapen_call() {
    let curve = ZeroCurve::flat(0.05);
    let none = DividendSchedule::none();
    let pricer = FiniteDifferencePricer::new(GridSpec::new(201, 100, 100.0_f64.ln() - 0.3, 100.0_f64.ln() + 0.3));

    let vanilla = OptionSpec::new(Payoff::Call, ExerciseStyle::European, 100.0, 100.0, 1.0, 0.2);
    let knocked = vanilla.clone().with_knock_outs(false, true);
    let v = pricer.price(&vanilla, &curve, &none).unwrap();
    let k = pricer.price(&knocked, &curve, &none).unwrap();
    assert!(k < v);
    assert!(k >= 0.0);
}
