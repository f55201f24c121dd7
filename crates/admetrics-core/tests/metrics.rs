use polars::prelude::*;

use admetrics_core::metrics::{derive_metrics, safe_div};

fn merged_fixture() -> DataFrame {
    df!(
        "date" => &["2024-01-02", "2024-01-01"],
        "impressions" => &[0.0f64, 100.0],
        "clicks" => &[0.0f64, 10.0],
        "spend" => &[0.0f64, 50.0],
        "attributed_revenue" => &[0.0f64, 200.0],
        "total_revenue" => &[100.0f64, 500.0],
        "gross_profit" => &[0.0f64, 100.0],
        "#_of_orders" => &[0.0f64, 20.0],
        "new_customers" => &[0.0f64, 5.0],
    )
    .unwrap()
}

#[test]
fn safe_div_substitutes_zero_for_undefined_results() {
    assert_eq!(safe_div(Some(10.0), Some(2.0)), 5.0);
    assert_eq!(safe_div(Some(10.0), Some(0.0)), 0.0);
    assert_eq!(safe_div(None, Some(2.0)), 0.0);
    assert_eq!(safe_div(Some(10.0), None), 0.0);
    assert_eq!(safe_div(Some(f64::NAN), Some(2.0)), 0.0);
}

#[test]
fn derives_the_six_metrics() {
    let result = derive_metrics(&merged_fixture()).expect("metrics derived");

    // sorted ascending by date, so the active day comes first
    let row = 0;
    let metric = |name: &str| result.column(name).unwrap().f64().unwrap().get(row).unwrap();

    assert!((metric("ctr") - 0.1).abs() < 1e-12);
    assert!((metric("cpc") - 5.0).abs() < 1e-12);
    assert!((metric("roas") - 4.0).abs() < 1e-12);
    assert!((metric("gross_margin_pct") - 20.0).abs() < 1e-12);
    assert!((metric("spend_per_order") - 2.5).abs() < 1e-12);
    assert!((metric("customer_acquisition_cost") - 10.0).abs() < 1e-12);
}

#[test]
fn zero_denominators_yield_zero_metrics() {
    let result = derive_metrics(&merged_fixture()).expect("metrics derived");

    // the zero-activity day sorts second
    for name in [
        "ctr",
        "cpc",
        "roas",
        "gross_margin_pct",
        "spend_per_order",
        "customer_acquisition_cost",
    ] {
        let value = result.column(name).unwrap().f64().unwrap().get(1).unwrap();
        assert_eq!(value, 0.0, "{name} should substitute 0 for undefined");
    }
}

#[test]
fn no_nan_or_infinity_survives() {
    let nan_heavy = df!(
        "date" => &["2024-01-01"],
        "impressions" => &[None::<f64>],
        "clicks" => &[Some(10.0f64)],
        "spend" => &[Some(50.0f64)],
        "attributed_revenue" => &[Some(f64::NAN)],
        "total_revenue" => &[Some(500.0f64)],
        "gross_profit" => &[Some(100.0f64)],
        "#_of_orders" => &[Some(20.0f64)],
        "new_customers" => &[Some(5.0f64)],
    )
    .unwrap();

    let result = derive_metrics(&nan_heavy).expect("metrics derived");
    for name in [
        "ctr",
        "cpc",
        "roas",
        "gross_margin_pct",
        "spend_per_order",
        "customer_acquisition_cost",
    ] {
        let value = result.column(name).unwrap().f64().unwrap().get(0).unwrap();
        assert!(value.is_finite(), "{name} produced a non-finite value");
    }
}

#[test]
fn raw_joined_columns_are_untouched() {
    let result = derive_metrics(&merged_fixture()).expect("metrics derived");

    let spend = result.column("spend").unwrap().f64().unwrap();
    assert_eq!(spend.get(0), Some(50.0));
    assert_eq!(spend.get(1), Some(0.0));
}

#[test]
fn output_is_sorted_ascending_by_date() {
    let result = derive_metrics(&merged_fixture()).expect("metrics derived");

    let dates = result.column("date").unwrap().str().unwrap();
    assert_eq!(dates.get(0), Some("2024-01-01"));
    assert_eq!(dates.get(1), Some("2024-01-02"));
}
