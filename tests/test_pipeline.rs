//! Integration tests for the full preparation pipeline

use loanprep::pipeline::*;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_scenario_end_to_end() {
    let df = loan_frame(&scenario_rows());
    let pipeline = PrepPipeline::from_config(PrepConfig::default()).unwrap();

    let output = pipeline.run(df).unwrap();

    // "In Progress" removed by target derivation
    let target_record = output
        .records
        .iter()
        .find(|r| r.name == "derive_target")
        .unwrap();
    assert_eq!(target_record.rows_out, 4);

    // 2013 and 2014 train, 2016 test, 2017 in neither
    assert_eq!(ids(&output.train), vec![1001.0, 1002.0]);
    assert_eq!(ids(&output.oos), vec![1004.0]);
    assert_eq!(output.unassigned_rows, 1);
}

#[test]
fn test_scenario_targets() {
    let output = PrepPipeline::from_config(PrepConfig::default())
        .unwrap()
        .run(loan_frame(&scenario_rows()))
        .unwrap();

    let train_target: Vec<i32> = output.train.column("target").unwrap().i32().unwrap().into_no_null_iter().collect();
    let oos_target: Vec<i32> = output.oos.column("target").unwrap().i32().unwrap().into_no_null_iter().collect();

    assert_eq!(train_target, vec![0, 1]);
    assert_eq!(oos_target, vec![0]);
}

#[test]
fn test_output_schema_is_allow_list_plus_duration() {
    let config = PrepConfig::default();
    let output = PrepPipeline::from_config(config.clone())
        .unwrap()
        .run(loan_frame(&scenario_rows()))
        .unwrap();

    let mut expected = config.selected_columns();
    expected.push(config.duration_column.clone());
    assert_eq!(column_names(&output.train), expected);
    assert_eq!(column_names(&output.oos), expected);

    assert_missing_columns(&output.train, &["funded_amnt", "desc", "mths_since_last_delinq", "loan_status"]);
}

#[test]
fn test_high_missing_columns_dropped_before_selection() {
    let output = PrepPipeline::from_config(PrepConfig::default())
        .unwrap()
        .run(loan_frame(&scenario_rows()))
        .unwrap();

    let missing = output
        .records
        .iter()
        .find(|r| r.name == "drop_high_missing")
        .unwrap();
    assert_eq!(missing.dropped_columns.len(), 2);
    assert!(missing.dropped_columns.contains(&"desc".to_string()));
    assert!(missing.dropped_columns.contains(&"mths_since_last_delinq".to_string()));
}

#[test]
fn test_numeric_columns_from_training_partition() {
    let config = PrepConfig::default();
    let output = PrepPipeline::from_config(config.clone())
        .unwrap()
        .run(loan_frame(&scenario_rows()))
        .unwrap();

    assert!(!output.numeric_columns.contains(&"id".to_string()));
    assert!(!output.numeric_columns.contains(&"target".to_string()));

    // Text and date columns from the raw allow-list are not numeric
    for excluded in ["emp_title", "title", "issue_d", "earliest_cr_line", "grade", "addr_state"] {
        assert!(!output.numeric_columns.contains(&excluded.to_string()), "{} leaked", excluded);
    }

    let expected: Vec<String> = output
        .train
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_primitive_numeric())
        .map(|c| c.name().to_string())
        .filter(|n| n != "id" && n != "target")
        .collect();
    assert_eq!(output.numeric_columns, expected);
    assert_eq!(expected.len(), 14 + 1);
    assert_eq!(expected.last().unwrap(), &config.duration_column);
}

#[test]
fn test_allow_listed_column_lost_to_missingness_is_fatal() {
    let mut df = loan_frame(&scenario_rows());
    df.with_column(Column::new(
        "mort_acc".into(),
        [None::<f64>, None, None, None, Some(1.0)],
    ))
    .unwrap();

    let err = PrepPipeline::from_config(PrepConfig::default())
        .unwrap()
        .run(df)
        .unwrap_err();

    match err.downcast_ref::<PrepError>() {
        Some(PrepError::MissingColumns { stage, missing }) => {
            assert_eq!(stage, "select_features");
            assert_eq!(missing, &vec!["mort_acc".to_string()]);
        }
        other => panic!("Expected MissingColumns, got {:?}", other),
    }
}

#[test]
fn test_bad_date_aborts_run() {
    let rows = vec![
        row("1", "Fully Paid", "Mar-2013", "Jan-2001"),
        row("2", "Charged Off", "2014-07", "Jun-1999"),
    ];

    let err = PrepPipeline::from_config(PrepConfig::default())
        .unwrap()
        .run(loan_frame(&rows))
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PrepError>(),
        Some(PrepError::DateParse { row: 1, .. })
    ));
}

#[test]
fn test_ordinal_ranks_reach_numeric_list() {
    let mut config = PrepConfig::default();
    config.ordinal_ranks.insert(
        "grade".to_string(),
        ["A", "B", "C", "D", "E", "F", "G"].iter().map(|s| s.to_string()).collect(),
    );

    let output = PrepPipeline::from_config(config)
        .unwrap()
        .run(loan_frame(&scenario_rows()))
        .unwrap();

    assert!(output.numeric_columns.contains(&"grade_rank".to_string()));
    let ranks: Vec<u32> = output.train.column("grade_rank").unwrap().u32().unwrap().into_no_null_iter().collect();
    assert_eq!(ranks, vec![0, 1]);
}

#[test]
fn test_stage_order() {
    let pipeline = PrepPipeline::from_config(PrepConfig::default()).unwrap();

    assert_eq!(
        pipeline.stage_names(),
        vec![
            "normalize_ids",
            "derive_target",
            "drop_high_missing",
            "select_features",
            "derive_dates",
            "type_categoricals",
        ]
    );
}

#[test]
fn test_invalid_config_rejected_before_run() {
    let config = PrepConfig {
        oos_years: vec![2015, 2016],
        ..PrepConfig::default()
    };

    let result = PrepPipeline::from_config(config);

    assert!(matches!(
        result.err().and_then(|e| e.downcast::<PrepError>().ok()),
        Some(PrepError::InvalidConfig(_))
    ));
}

#[test]
fn test_pipeline_from_csv() {
    let mut df = loan_frame(&scenario_rows());
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let config = PrepConfig {
        input: csv_path,
        ..config_in(&temp_dir)
    };
    let pipeline = PrepPipeline::from_config(config).unwrap();

    let loaded = load_dataset(
        &pipeline.config().input,
        pipeline.config().infer_schema_length,
        &pipeline.text_columns(),
    )
    .unwrap();
    let output = pipeline.run(loaded).unwrap();

    assert_eq!(ids(&output.train), vec![1001.0, 1002.0]);
    assert_eq!(ids(&output.oos), vec![1004.0]);
}

#[test]
fn test_large_random_frame() {
    let df = create_large_loan_frame(2_000);
    let config = PrepConfig {
        raw_numeric_columns: vec![
            "annual_inc".to_string(),
            "issue_d".to_string(),
            "earliest_cr_line".to_string(),
        ],
        nominal_columns: vec![],
        ordinal_columns: vec![],
        ..PrepConfig::default()
    };

    let output = PrepPipeline::from_config(config).unwrap().run(df).unwrap();

    let resolved = output.records[1].rows_out;
    assert_eq!(
        output.train.height() + output.oos.height() + output.unassigned_rows,
        resolved
    );
    assert_eq!(
        output.numeric_columns,
        vec!["annual_inc", "days_from_issue_to_earliest_cr"]
    );
}
