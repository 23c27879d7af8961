//! End-to-end tests: file on disk → filter → aggregate → rendered output.

use std::io::Write;

use rusty_tabula::cli::OutputFormat;
use rusty_tabula::render::{render, NO_MATCHES};
use rusty_tabula::{
    apply_aggregation, apply_filter, load_file, run_query, AggFunction, AggregationError,
    AggregationResult, FilterError, LoadOptions, Output, ParseError, Query,
};
use tempfile::NamedTempFile;

const PHONES: &str = "name,brand,price,rating\n\
    iphone 15 pro,apple,999,4.9\n\
    galaxy s23 ultra,samsung,1199,4.8\n\
    redmi note 12,xiaomi,199,4.6\n\
    poco x5 pro,xiaomi,299,4.4\n";

fn phones_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(PHONES.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn query(file: &NamedTempFile, condition: &str, aggregation: &str) -> Query {
    Query {
        file: file.path().to_path_buf(),
        condition: condition.to_string(),
        aggregation: aggregation.to_string(),
        load: LoadOptions::default(),
    }
}

fn rows(output: Output) -> Vec<String> {
    match output {
        Output::Rows(ds) => ds
            .rows
            .iter()
            .map(|r| r.get("name").unwrap().to_string())
            .collect(),
        other => panic!("expected rows, got {other:?}"),
    }
}

fn value(function: AggFunction, value: f64) -> AggregationResult {
    AggregationResult::Value { function, value }
}

fn aggregate(output: Output) -> AggregationResult {
    match output {
        Output::Aggregate(res) => res,
        other => panic!("expected aggregate, got {other:?}"),
    }
}

#[test]
fn loads_every_row_in_order() {
    let file = phones_file();
    let out = run_query(&query(&file, "", "")).unwrap();
    assert_eq!(
        rows(out),
        ["iphone 15 pro", "galaxy s23 ultra", "redmi note 12", "poco x5 pro"]
    );
}

#[test]
fn numeric_and_text_filters() {
    let file = phones_file();
    assert_eq!(
        rows(run_query(&query(&file, "price>1000", "")).unwrap()),
        ["galaxy s23 ultra"]
    );
    assert_eq!(
        rows(run_query(&query(&file, "brand=apple", "")).unwrap()),
        ["iphone 15 pro"]
    );
    assert_eq!(
        rows(run_query(&query(&file, "rating>=4.6", "")).unwrap()),
        ["iphone 15 pro", "galaxy s23 ultra", "redmi note 12"]
    );
}

#[test]
fn no_matches_is_an_empty_result() {
    let file = phones_file();
    let out = run_query(&query(&file, "brand=nokia", "")).unwrap();
    assert_eq!(render(&out, OutputFormat::Table).unwrap(), NO_MATCHES);
}

#[test]
fn filter_then_aggregate() {
    let file = phones_file();
    let cases = [
        ("", "rating=avg", value(AggFunction::Avg, 4.68)),
        ("", "price=sum", value(AggFunction::Sum, 2696.0)),
        ("brand=xiaomi", "price=max", value(AggFunction::Max, 299.0)),
        ("", "brand=count", AggregationResult::Count(4)),
        ("brand=nokia", "price=avg", AggregationResult::NoData),
    ];
    for (condition, aggregation, expected) in cases {
        let out = run_query(&query(&file, condition, aggregation)).unwrap();
        assert_eq!(aggregate(out), expected, "{condition} / {aggregation}");
    }
}

#[test]
fn aggregate_table_output() {
    let file = phones_file();
    let out = run_query(&query(&file, "price<300", "price=count")).unwrap();
    let table = render(&out, OutputFormat::Table).unwrap();
    assert!(table.contains("count"), "{table}");
    assert!(table.contains('2'), "{table}");
}

#[test]
fn errors_surface_with_their_kind() {
    let file = phones_file();

    let err = run_query(&query(&file, "invalid_condition", "")).unwrap_err();
    assert_eq!(
        err.downcast_ref::<FilterError>(),
        Some(&FilterError::Condition(ParseError::NoOperator(
            "invalid_condition".into()
        )))
    );

    let err = run_query(&query(&file, "", "brand=avg")).unwrap_err();
    assert_eq!(
        err.downcast_ref::<AggregationError>(),
        Some(&AggregationError::NonNumeric("brand".into()))
    );

    let err = run_query(&query(&file, "", "price")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AggregationError>(),
        Some(AggregationError::Format(_))
    ));
}

#[test]
fn grouped_digits_compare_numerically() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(b"name,price\na,1_000\nb,999\n").unwrap();
    file.flush().unwrap();

    assert_eq!(rows(run_query(&query(&file, "price>999", "")).unwrap()), ["a"]);
    let out = run_query(&query(&file, "", "price=sum")).unwrap();
    assert_eq!(aggregate(out), value(AggFunction::Sum, 1999.0));
}

#[test]
fn stages_compose_directly() {
    let file = phones_file();
    let ds = load_file(file.path(), &LoadOptions::default()).unwrap();
    let filtered = apply_filter(ds.clone(), "").unwrap();
    assert_eq!(filtered, ds);

    let filtered = apply_filter(ds, "price<=299").unwrap();
    let result = apply_aggregation(&filtered, "rating=min").unwrap();
    assert_eq!(result.as_f64(), Some(4.4));
}

#[test]
fn json_rows_missing_a_column_abort_the_filter() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"[{"name": "a", "price": 5}, {"name": "b"}]"#)
        .unwrap();
    file.flush().unwrap();

    let err = run_query(&query(&file, "price>1", "")).unwrap_err();
    assert_eq!(
        err.downcast_ref::<FilterError>(),
        Some(&FilterError::ColumnNotFound("price".into()))
    );
}
