//! End-to-end runs over temporary data files.

use std::{fs, path::PathBuf};

use cdfplot_core::{
    CdfError, CdfPlot, CdfPlotBuilder, Column, FileErrorCode, SampleValue, StatisticsScanner,
};
use cdfplot_test_support::{fixtures::DataDir, tracing::RecordingLayer};
use rstest::{fixture, rstest};
use tracing::Level;

#[fixture]
fn data_dir() -> DataDir {
    DataDir::new().expect("temp dir")
}

fn with_meta() -> CdfPlot {
    CdfPlotBuilder::new()
        .with_show_meta(true)
        .build()
        .expect("configuration is valid")
}

#[rstest]
fn one_to_ten_with_meta(data_dir: DataDir) {
    let input = data_dir
        .write_rows("lat.txt", [7, 3, 10, 1, 5, 9, 2, 8, 4, 6])
        .expect("write input");
    let outcome = with_meta()
        .run(&data_dir.join("fig"), &[input])
        .expect("run must succeed");

    let [stats] = outcome.results() else {
        panic!("expected one result, got {}", outcome.results().len());
    };
    let summary = stats.summary().expect("metadata requested");
    assert_eq!(stats.total_rows().get(), 10);
    assert_eq!(summary.mean(), 5.5);
    assert_eq!(summary.median(), SampleValue::Int(5));
    assert_eq!(summary.p99(), SampleValue::Int(9));
    assert_eq!(summary.mean_row().map(|row| row.get()), Some(6));

    assert_eq!(
        data_dir.read("sorted_lat.txt").expect("sorted copy"),
        "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n"
    );
    assert_eq!(outcome.script_path(), data_dir.join("fig.gnu"));
    assert_eq!(outcome.output_name(), "fig.pdf");
    let script = data_dir.read("fig.gnu").expect("script written");
    assert!(script.starts_with("# input: sorted_lat.txt\n# output: fig.pdf\n\n"));
    assert!(script.contains("set label 1 \"Medium\" at 5,0.5 "));
    assert!(script.contains("set label 2 \"Avg\" at 5.5,0.60 "));
    assert!(script.contains("set label 3 \"P99\" at 9,0.99 "));
}

#[rstest]
fn without_meta_only_rows_are_counted(data_dir: DataDir) {
    let input = data_dir.write_rows("a.txt", ["x", "2", "y"]).expect("write input");
    let plot = CdfPlotBuilder::new().build().expect("defaults are valid");
    let outcome = plot.run(&data_dir.join("fig"), &[input]).expect("run must succeed");

    let stats = outcome.results().first().expect("one result");
    assert_eq!(stats.total_rows().get(), 3);
    assert!(stats.summary().is_none());
    assert_eq!(stats.mean(), 0.0);
    assert_eq!(stats.median_value(), SampleValue::ZERO);
    assert_eq!(stats.p99_value(), SampleValue::ZERO);
    let script = data_dir.read("fig.gnu").expect("script written");
    assert!(!script.contains("set label"));
}

#[rstest]
fn two_inputs_share_one_plot(data_dir: DataDir) {
    let first = data_dir.write_rows("a.txt", 1..=10).expect("write a");
    let second = data_dir.write_rows("b.txt", 1..=10).expect("write b");
    let outcome = with_meta()
        .run(&data_dir.join("fig"), &[first, second])
        .expect("run must succeed");

    let names: Vec<&str> = outcome.results().iter().map(|stats| stats.name()).collect();
    assert_eq!(names, ["a", "b"]);
    let script = data_dir.read("fig.gnu").expect("script written");
    assert_eq!(script.matches("plot ").count(), 1);
    assert!(script.contains("title 'a' lw 2 lt 1 smooth cumulative,\\\n\t\"sorted_b.txt\""));
    assert!(script.contains("title 'b' lw 2 lt 2 smooth cumulative\n"));
    for id in 1..=6 {
        assert!(script.contains(&format!("set label {id} ")), "label {id} missing");
    }
}

#[rstest]
fn invalid_file_is_dropped_and_sibling_kept(data_dir: DataDir) {
    let bad = data_dir.write_rows("bad.txt", ["1", "abc"]).expect("write bad");
    let good = data_dir.write_rows("good.txt", 1..=4).expect("write good");
    let layer = RecordingLayer::default();
    let outcome = tracing::subscriber::with_default(layer.subscriber(), || {
        with_meta().run(&data_dir.join("fig"), &[bad.clone(), good])
    })
    .expect("one usable input is enough");

    let [failure] = outcome.failures() else {
        panic!("expected one failure");
    };
    assert_eq!(failure.path(), bad);
    assert_eq!(failure.error().code(), FileErrorCode::InvalidNumber);

    let script = data_dir.read("fig.gnu").expect("script written");
    assert!(!script.contains("sorted_bad.txt"));
    assert!(script.contains("\"sorted_good.txt\" using (($1)):(1./4.)"));
    assert!(script.contains(" lt 1 "));
    assert!(!script.contains(" lt 2 "));

    // Without the `parallel` feature every stage runs on this thread, so the
    // recorder also sees anything the sort and scan spans would report.
    let errors = layer.events_at(Level::ERROR);
    assert_eq!(layer.messages_at(Level::ERROR), ["input dropped"]);
    assert_eq!(errors[0].field("code"), Some("FILE_INVALID_NUMBER"));
    assert_eq!(errors[0].field("input"), Some(bad.display().to_string().as_str()));
    assert_eq!(errors[0].target, "cdfplot_core::pipeline");
    assert!(layer.saw_span("cdf.run"));
}

#[rstest]
fn every_input_failing_is_fatal(data_dir: DataDir) {
    let empty = data_dir.write("empty.txt", "").expect("write empty");
    let missing = data_dir.join("missing.txt");
    let err = with_meta()
        .run(&data_dir.join("fig"), &[empty, missing])
        .expect_err("nothing usable");
    assert!(matches!(err, CdfError::NoUsableInputs { attempted: 2 }));
    assert!(!data_dir.join("fig.gnu").exists());
}

#[rstest]
fn duplicate_file_names_are_rejected_up_front(data_dir: DataDir) {
    fs::create_dir(data_dir.join("other")).expect("create subdir");
    let first = data_dir.write_rows("a.txt", [1]).expect("write a");
    let second = data_dir.write_rows("other/a.txt", [2]).expect("write other a");
    let err = with_meta()
        .run(&data_dir.join("fig"), &[first, second])
        .expect_err("duplicate sorted path");
    assert!(matches!(err, CdfError::DuplicateSortedPath { .. }));
    assert!(!data_dir.join("sorted_a.txt").exists());
}

#[rstest]
fn single_row_reports_its_value(data_dir: DataDir) {
    let input = data_dir.write_rows("one.txt", [42]).expect("write input");
    let outcome = with_meta()
        .run(&data_dir.join("fig"), &[input])
        .expect("run must succeed");
    let stats = outcome.results().first().expect("one result");
    assert_eq!(stats.median_value(), SampleValue::Int(42));
    assert_eq!(stats.p99_value(), SampleValue::Int(42));
    assert_eq!(stats.mean_fraction(), Some(1.0));
}

#[rstest]
fn scanning_sorted_copy_twice_is_stable(data_dir: DataDir) {
    let input = data_dir.write_rows("a.txt", [5.5, 0.25, 3.0, 8.75]).expect("write input");
    with_meta()
        .run(&data_dir.join("fig"), &[input])
        .expect("run must succeed");
    let sorted: PathBuf = data_dir.join("sorted_a.txt");
    let scanner = StatisticsScanner::new(Column::FIRST, true);
    let first = scanner.scan_path(&sorted).expect("first scan");
    let second = scanner.scan_path(&sorted).expect("second scan");
    assert_eq!(first, second);
}

#[rstest]
fn missing_column_is_a_warning(data_dir: DataDir) {
    let sorted = data_dir.write("sorted.txt", "1 10\n2\n3 30\n").expect("write input");
    let scanner = StatisticsScanner::new(Column::new(2).expect("non-zero"), true);
    let layer = RecordingLayer::default();
    let report = tracing::subscriber::with_default(layer.subscriber(), || {
        scanner.scan_path(&sorted)
    })
    .expect("missing column is not fatal");

    let summary = report.summary().expect("metadata requested");
    assert_eq!(summary.median(), SampleValue::Int(10));
    assert_eq!(summary.p99(), SampleValue::Int(2));
    let warnings = layer.events_at(Level::WARN);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("row"), Some("2"));
    assert_eq!(warnings[0].field("column"), Some("2"));
    assert!(layer.saw_span("cdf.scan"));
}
