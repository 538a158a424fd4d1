//! End-to-end scenarios across the workspace crates.
//!
//! These mirror the acceptance scenarios the library is validated
//! against: KTB price/yield round trips, par-curve bootstrap repricing,
//! OIS and dual-curve IBOR round trips, the basis-swap spread solver,
//! key-rate reconciliation, and the futures engine identities.

use std::sync::Arc;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ficc::prelude::*;

fn d(s: &str) -> Date {
    Date::parse(s).unwrap()
}

fn cal() -> Arc<dyn Calendar> {
    Arc::new(WeekendCalendar)
}

/// Dirty price from a 3% yield inverts back to 3% within 1e-6.
#[test]
fn ktb_price_yield_round_trip() {
    let bond = Ktb::new(d("2020-03-10"), d("2030-03-10"), 2.75).unwrap();
    let settlement = d("2023-09-01");

    let dirty = bond.dirty_price(0.03, settlement).unwrap();
    let ytm = bond.ytm_from_dirty_price(dirty, settlement, None).unwrap();
    assert_abs_diff_eq!(ytm, 0.03, epsilon = 1e-6);

    // Clean + accrued = dirty on the same call
    let clean = bond.clean_price(0.03, settlement).unwrap();
    assert_relative_eq!(clean + bond.accrued_interest(settlement), dirty, epsilon = 1e-10);
}

/// Every par quote used to build the KTB zero curve reprices to par
/// within 1e-8.
#[test]
fn ktb_par_bootstrap_reprices() {
    let par_nodes = [
        (0.25, 3.00),
        (0.5, 3.10),
        (1.0, 3.20),
        (2.0, 3.30),
        (3.0, 3.40),
        (5.0, 3.50),
    ];
    let curve = ZeroCurve::from_par_yields(
        d("2025-06-30"),
        &par_nodes,
        Compounding::Continuous,
        2,
    )
    .unwrap();

    // The 3M anchor maps the quote straight into the zero
    assert_relative_eq!(curve.zero(0.25), (1.0_f64 + 0.030).ln(), epsilon = 1e-12);

    for &(tenor, rate) in &par_nodes {
        if tenor < 0.5 {
            continue;
        }
        let pv = reprice_par_quote(curve.nodes(), rate, tenor, 2).unwrap();
        assert_relative_eq!(pv, 1.0, epsilon = 1e-8);
    }
}

fn estr_quotes() -> Vec<OisQuote> {
    [
        ("1W", 3.80),
        ("1M", 3.82),
        ("3M", 3.85),
        ("6M", 3.87),
        ("1Y", 3.80),
        ("2Y", 3.50),
        ("5Y", 3.20),
        ("10Y", 3.10),
        ("30Y", 3.00),
    ]
    .iter()
    .map(|&(tenor, rate)| OisQuote::new(tenor.parse().unwrap(), rate))
    .collect()
}

/// Each OIS quote reprices to itself off the bootstrapped curve
/// within 1e-8 in rate.
#[test]
fn ois_curve_round_trip() {
    let curve_date = d("2025-08-08");
    let bootstrapper = OisBootstrapper::new(curve_date, cal());
    let quotes = estr_quotes();
    let curve = bootstrapper.bootstrap(&quotes).unwrap();

    for quote in &quotes {
        let implied = implied_par_rate(&bootstrapper, &curve, quote.tenor).unwrap();
        assert_relative_eq!(implied, quote.rate / 100.0, max_relative = 1e-8);
    }

    // Property 3: df positive, df(0) = 1, weakly decreasing
    assert_relative_eq!(curve.df(0.0), 1.0);
    let mut prev = 1.0;
    for i in 1..=300 {
        let df = curve.df(f64::from(i) * 0.1);
        assert!(df > 0.0);
        assert!(df <= prev + 1e-6);
        prev = df;
    }
}

fn euribor_6m_quotes() -> Vec<Quote> {
    let mut quotes = vec![Quote::deposit(
        "6M".parse().unwrap(),
        3.92,
        euribor_6m_deposit(cal()),
    )];
    for &(tenor, rate) in &[
        ("1Y", 3.88),
        ("2Y", 3.60),
        ("3Y", 3.45),
        ("5Y", 3.30),
        ("7Y", 3.25),
        ("10Y", 3.20),
        ("15Y", 3.15),
        ("20Y", 3.12),
        ("30Y", 3.10),
    ] {
        quotes.push(Quote::swap(
            tenor.parse().unwrap(),
            rate,
            euribor_6m_floating(cal()),
        ));
    }
    quotes
}

fn euribor_3m_quotes() -> Vec<Quote> {
    let mut quotes = vec![Quote::deposit(
        "3M".parse().unwrap(),
        3.85,
        euribor_3m_deposit(cal()),
    )];
    for &(tenor, rate) in &[
        ("1Y", 3.80),
        ("2Y", 3.52),
        ("3Y", 3.38),
        ("5Y", 3.22),
        ("7Y", 3.17),
        ("10Y", 3.12),
        ("15Y", 3.07),
        ("20Y", 3.04),
        ("30Y", 3.02),
    ] {
        quotes.push(Quote::swap(
            tenor.parse().unwrap(),
            rate,
            euribor_3m_floating(cal()),
        ));
    }
    quotes
}

/// The dual-curve bootstrap reprices its swap quotes exactly and
/// carries one pillar per instrument plus the spot stub.
#[test]
fn dual_curve_ibor_bootstrap() {
    let curve_date = d("2025-08-08");
    let ois = OisBootstrapper::new(curve_date, cal())
        .bootstrap(&estr_quotes())
        .unwrap();

    let result = IborCurveBuilder::new(curve_date, ois.clone())
        .with_quotes(euribor_6m_quotes())
        .build()
        .unwrap();

    // 1 spot + 1 deposit + 9 swap maturities
    assert_eq!(result.curve.pillar_times().len(), 11);

    let convention = euribor_6m_floating(cal());
    for &(tenor, rate) in &[("1Y", 3.88), ("5Y", 3.30), ("10Y", 3.20), ("30Y", 3.10)] {
        let implied = implied_swap_rate(
            curve_date,
            &result.curve,
            &ois,
            tenor.parse().unwrap(),
            &convention,
        )
        .unwrap();
        assert_relative_eq!(implied, rate / 100.0, max_relative = 1e-8);
    }
}

/// The 3M/6M basis swap par spread solves within tolerance and
/// stays below 50bp in magnitude.
#[test]
fn basis_swap_par_spread() {
    let curve_date = d("2025-08-08");
    let ois = OisBootstrapper::new(curve_date, cal())
        .bootstrap(&estr_quotes())
        .unwrap();
    let e6m = IborCurveBuilder::new(curve_date, ois.clone())
        .with_quotes(euribor_6m_quotes())
        .build()
        .unwrap();
    let e3m = IborCurveBuilder::new(curve_date, ois.clone())
        .with_quotes(euribor_3m_quotes())
        .build()
        .unwrap();

    let curves = CurveSet::new(ois)
        .with_euribor3m(e3m.curve)
        .with_euribor6m(e6m.curve);

    let spot = spot_date(curve_date, &cal(), 2);
    let spec = SwapSpec::new(
        10_000_000.0,
        spot.add_months(120).unwrap(),
        spot.add_months(240).unwrap(),
        euribor_6m_floating(cal()),
        euribor_3m_floating(cal()),
    );

    let config = SpreadSolverConfig::default().with_tolerance(1e-3);
    let (spread_bp, result) =
        solve_receive_leg_spread(&spec, &curves, curve_date, &config).unwrap();

    assert!(spread_bp.is_finite());
    assert!(spread_bp.abs() <= 50.0, "spread = {spread_bp} bp");
    assert!(result.pv_total.abs() <= 1e-3, "pv = {}", result.pv_total);
}

/// The 5Y key-rate delta of a 5Y par bond reconciles with modified
/// duration times the quote bump within 1%.
#[test]
fn krd_reconciles_with_duration() {
    let curve_date = d("2025-06-30");
    let curve = ZeroCurve::from_par_yields(
        curve_date,
        &[
            (0.25, 3.00),
            (0.5, 3.10),
            (1.0, 3.20),
            (2.0, 3.30),
            (3.0, 3.40),
            (5.0, 3.50),
        ],
        Compounding::Continuous,
        2,
    )
    .unwrap();
    let bond = Ktb::new(curve_date, d("2030-06-30"), 3.5).unwrap();

    let p0 = price_from_par_curve(&bond, &curve, curve_date).unwrap();
    let y0 = bond.ytm_from_dirty_price(p0, curve_date, None).unwrap();
    let duration = bond.modified_duration(y0, curve_date, Some(p0)).unwrap();

    let delta = key_rate_delta(&bond, &curve, curve_date, 5.0, 1.0).unwrap();
    assert_relative_eq!(delta, p0 * duration * 1e-4, max_relative = 0.01);
}

/// Futures: expiry rule, forward-yield inversion identity, fair-value
/// formula.
#[test]
fn futures_engine_identities() {
    let engine = FuturesEngine::new(d("2025-10-29"), 2.60, cal());

    // KRX rule: October trades against the December expiry
    let basket = FuturesBasket::new(vec![
        UnderlyingBond::new(d("2025-03-10"), d("2035-03-10"), 2.875, 3.00),
        UnderlyingBond::new(d("2024-09-10"), d("2034-09-10"), 3.125, 3.08),
        UnderlyingBond::new(d("2024-03-10"), d("2034-03-10"), 3.250, 3.12),
    ]);

    let fv = engine.fair_value(&basket, 10).unwrap();
    // Forward yields near 3.1%: the 5% notional bond prices well above par
    assert!(fv > 110.0 && fv < 125.0, "fair value = {fv}");

    // Fair value is exactly the notional bond at the average forward yield
    let mut avg = 0.0;
    for underlying in &basket.underlyings {
        avg += engine.forward_yield(underlying).unwrap();
    }
    avg /= basket.underlyings.len() as f64;
    assert_relative_eq!(
        fv,
        notional_bond_price(avg, 10),
        epsilon = 1e-12
    );
}

/// Curve artifacts serialize with decimal values and round-trip.
#[test]
fn curve_artifact_round_trip() {
    let curve_date = d("2025-08-08");
    let curve = OisBootstrapper::new(curve_date, cal())
        .bootstrap(&estr_quotes())
        .unwrap();

    let artifact = CurveArtifact::from_discount_curve(&curve);
    assert!(artifact.pillars.iter().all(|p| p.value > 0.0 && p.value <= 1.0));

    let rebuilt = artifact.to_discount_curve().unwrap();
    for t in [0.5, 1.0, 5.0, 17.3, 30.0] {
        assert_relative_eq!(rebuilt.df(t), curve.df(t), epsilon = 1e-14);
    }
}
