//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

use loanprep::pipeline::PrepConfig;

/// One synthetic loan record; every other column is filled in deterministically
#[derive(Debug, Clone)]
pub struct LoanRow {
    pub id: &'static str,
    pub status: &'static str,
    pub issue_d: &'static str,
    pub earliest_cr_line: &'static str,
}

pub fn row(
    id: &'static str,
    status: &'static str,
    issue_d: &'static str,
    earliest_cr_line: &'static str,
) -> LoanRow {
    LoanRow {
        id,
        status,
        issue_d,
        earliest_cr_line,
    }
}

/// The five-loan scenario: one unresolved loan, issue years 2013, 2014, 2016, 2016, 2017
pub fn scenario_rows() -> Vec<LoanRow> {
    vec![
        row("1001", "Fully Paid", "Mar-2013", "Jan-2001"),
        row("Total amount funded in policy code 1: 1002", "Charged Off", "Jul-2014", "Jun-1999"),
        row("1003", "In Progress", "Feb-2016", "Apr-2005"),
        row("1004", "Fully Paid", "Dec-2016", "Jan-2010"),
        row("1005", "Charged Off", "Jan-2017", "Sep-2008"),
    ]
}

/// Build a raw loan frame carrying every column of the default configuration.
///
/// Besides the allow-listed columns it has `funded_amnt` (not allow-listed),
/// `desc` (100% missing) and `mths_since_last_delinq` (60% missing on five rows).
pub fn loan_frame(rows: &[LoanRow]) -> DataFrame {
    let n = rows.len();
    let config = PrepConfig::default();
    let mut columns: Vec<Column> = Vec::new();

    columns.push(Column::new(
        "id".into(),
        rows.iter().map(|r| r.id).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "loan_status".into(),
        rows.iter().map(|r| r.status).collect::<Vec<_>>(),
    ));

    for (k, name) in config.raw_numeric_columns.iter().enumerate() {
        let col = match name.as_str() {
            "issue_d" => Column::new(
                name.as_str().into(),
                rows.iter().map(|r| r.issue_d).collect::<Vec<_>>(),
            ),
            "earliest_cr_line" => Column::new(
                name.as_str().into(),
                rows.iter().map(|r| r.earliest_cr_line).collect::<Vec<_>>(),
            ),
            "emp_title" | "title" => Column::new(
                name.as_str().into(),
                (0..n).map(|i| format!("{} {}", name, i)).collect::<Vec<_>>(),
            ),
            _ => Column::new(
                name.as_str().into(),
                (0..n)
                    .map(|i| (k * 100 + i) as f64 + 0.5)
                    .collect::<Vec<f64>>(),
            ),
        };
        columns.push(col);
    }

    let states = ["CA", "NY", "TX", "WA"];
    for name in &config.nominal_columns {
        columns.push(Column::new(
            name.as_str().into(),
            (0..n).map(|i| states[i % states.len()]).collect::<Vec<_>>(),
        ));
    }

    let ordinal_values: [(&str, [&str; 3]); 3] = [
        ("emp_length", ["< 1 year", "5 years", "10+ years"]),
        ("grade", ["A", "B", "C"]),
        ("sub_grade", ["A1", "B3", "C5"]),
    ];
    for (name, values) in ordinal_values {
        columns.push(Column::new(
            name.into(),
            (0..n).map(|i| values[i % values.len()]).collect::<Vec<_>>(),
        ));
    }

    columns.push(Column::new(
        "funded_amnt".into(),
        (0..n).map(|i| 1000.0 + i as f64).collect::<Vec<f64>>(),
    ));
    columns.push(Column::new(
        "desc".into(),
        vec![None::<&str>; n],
    ));
    columns.push(Column::new(
        "mths_since_last_delinq".into(),
        (0..n)
            .map(|i| if i % 5 < 3 { None } else { Some(i as f64) })
            .collect::<Vec<Option<f64>>>(),
    ));

    DataFrame::new(columns).unwrap()
}

/// Configuration that writes into `dir`
pub fn config_in(dir: &TempDir) -> PrepConfig {
    PrepConfig {
        input: dir.path().join("loans.csv"),
        train_output: dir.path().join("out").join("train"),
        test_output: dir.path().join("out").join("test"),
        numeric_columns_output: dir.path().join("out").join("final_num_cols.txt"),
        ..PrepConfig::default()
    }
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("loans.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a larger random loan frame for stress tests
pub fn create_large_loan_frame(rows: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
    let statuses = ["Fully Paid", "Charged Off", "Current"];

    let ids: Vec<String> = (0..rows)
        .map(|i| {
            if rng.gen_bool(0.1) {
                format!("Total amount funded in policy code 1: {}", 500_000 + i)
            } else {
                (500_000 + i).to_string()
            }
        })
        .collect();
    let status: Vec<&str> = (0..rows).map(|_| statuses[rng.gen_range(0..3)]).collect();
    let issue: Vec<String> = (0..rows)
        .map(|_| format!("{}-{}", months[rng.gen_range(0..12)], rng.gen_range(2012..2018)))
        .collect();
    let earliest: Vec<String> = (0..rows)
        .map(|_| format!("{}-{}", months[rng.gen_range(0..12)], rng.gen_range(1980..2010)))
        .collect();
    let income: Vec<f64> = (0..rows).map(|_| rng.gen_range(20_000.0..200_000.0)).collect();

    df! {
        "id" => ids,
        "loan_status" => status,
        "issue_d" => issue,
        "earliest_cr_line" => earliest,
        "annual_inc" => income,
    }
    .unwrap()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Float64 id values of a frame
pub fn ids(df: &DataFrame) -> Vec<f64> {
    df.column("id")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}
