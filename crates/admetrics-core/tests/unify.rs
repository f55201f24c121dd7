use polars::prelude::*;

use admetrics_core::error::{PipelineError, SchemaError};
use admetrics_core::unify::unify_channels;

fn facebook() -> DataFrame {
    df!(
        "date" => &["2024-01-01", "2024-01-02"],
        "impressions" => &[100i64, 200],
        "spend" => &[50.0f64, 60.0],
        "campaign" => &["brand", "retarget"],
        "channel" => &["Facebook", "Facebook"],
    )
    .unwrap()
}

fn google() -> DataFrame {
    df!(
        "date" => &["2024-01-01"],
        "impressions" => &[300i64],
        "spend" => &[75.0f64],
        "channel" => &["Google"],
    )
    .unwrap()
}

#[test]
fn row_count_is_sum_of_inputs_and_columns_are_the_union() {
    let unified = unify_channels(&[facebook(), google()]).expect("unify succeeded");

    assert_eq!(unified.height(), 3);

    let mut names = unified.get_column_names_str();
    names.sort_unstable();
    assert_eq!(names, vec!["campaign", "channel", "date", "impressions", "spend"]);
}

#[test]
fn absent_columns_are_null_not_zero() {
    let unified = unify_channels(&[facebook(), google()]).expect("unify succeeded");

    // google has no campaign column; its single row must be the null sentinel
    let campaign = unified.column("campaign").unwrap();
    assert_eq!(campaign.null_count(), 1);
    assert_eq!(campaign.str().unwrap().get(0), Some("brand"));
}

#[test]
fn channel_order_and_row_order_are_preserved() {
    let unified = unify_channels(&[facebook(), google()]).expect("unify succeeded");

    let channel = unified.column("channel").unwrap();
    let channel = channel.str().unwrap();
    assert_eq!(channel.get(0), Some("Facebook"));
    assert_eq!(channel.get(1), Some("Facebook"));
    assert_eq!(channel.get(2), Some("Google"));
}

#[test]
fn input_without_date_column_is_rejected() {
    let dateless = df!(
        "impressions" => &[1i64],
        "spend" => &[1.0f64],
    )
    .unwrap();

    let err = unify_channels(&[facebook(), dateless]).unwrap_err();
    match err {
        PipelineError::Schema(SchemaError::MissingColumn { column }) => {
            assert_eq!(column, "date");
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn empty_channel_list_is_rejected() {
    let err = unify_channels(&[]).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Schema(SchemaError::NoChannels)
    ));
}
