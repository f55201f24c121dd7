use polars::prelude::*;

use admetrics_core::align::parse_dates;
use admetrics_core::error::{PipelineError, SchemaError};
use admetrics_core::join::join_daily;

fn daily() -> DataFrame {
    let table = df!(
        "date" => &["2024-01-01", "2024-01-02", "2024-01-03"],
        "impressions" => &[100.0f64, 200.0, 300.0],
        "spend" => &[50.0f64, 60.0, 70.0],
    )
    .unwrap();
    parse_dates(&table).unwrap()
}

fn business() -> DataFrame {
    let table = df!(
        "date" => &["2024-01-02", "2024-01-03", "2024-01-04"],
        "total_revenue" => &[500.0f64, 600.0, 700.0],
        "#_of_orders" => &[20i64, 30, 40],
    )
    .unwrap();
    parse_dates(&table).unwrap()
}

#[test]
fn inner_join_keeps_only_dates_present_on_both_sides() {
    let merged = join_daily(&daily(), &business()).expect("join succeeded");

    // 2024-01-01 (marketing only) and 2024-01-04 (business only) are dropped
    assert_eq!(merged.height(), 2);

    let revenue = merged.column("total_revenue").unwrap().f64().unwrap();
    assert_eq!(revenue.get(0), Some(500.0));
    assert_eq!(revenue.get(1), Some(600.0));
}

#[test]
fn join_preserves_columns_from_both_sides() {
    let merged = join_daily(&daily(), &business()).expect("join succeeded");

    for name in ["date", "impressions", "spend", "total_revenue", "#_of_orders"] {
        assert!(merged.column(name).is_ok(), "missing column {name}");
    }
}

#[test]
fn non_key_column_collision_is_rejected() {
    let clashing = df!(
        "date" => &["2024-01-02"],
        "spend" => &[999.0f64],
    )
    .unwrap();
    let clashing = parse_dates(&clashing).unwrap();

    let err = join_daily(&daily(), &clashing).unwrap_err();
    match err {
        PipelineError::Schema(SchemaError::JoinCollision { column }) => {
            assert_eq!(column, "spend");
        }
        other => panic!("expected JoinCollision, got {other:?}"),
    }
}

#[test]
fn disjoint_dates_produce_an_empty_result() {
    let far_future = df!(
        "date" => &["2030-01-01"],
        "total_revenue" => &[1.0f64],
    )
    .unwrap();
    let far_future = parse_dates(&far_future).unwrap();

    let merged = join_daily(&daily(), &far_future).expect("join succeeded");
    assert_eq!(merged.height(), 0);
}
