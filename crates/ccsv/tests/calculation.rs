//! Tests for calculating whole grids

use ccsv::{
    calculate, calculate_with_stats, run, CalculationOptions, CellAddress, Error, FormulaError,
    DEFAULT_MAX_DEPTH,
};
use pretty_assertions::assert_eq;

fn calc(lines: &[&str]) -> String {
    run(&lines.join("\n"), ',').unwrap()
}

fn calc_err(lines: &[&str]) -> Error {
    run(&lines.join("\n"), ',').unwrap_err()
}

/// Plain data comes back unchanged
#[test]
fn test_no_calculations() {
    let lines = ["header1,header2", "0,10,10", "10,0,0", "0,10,0", "10,0,10"];
    assert_eq!(calc(&lines), lines.join("\n"));
}

/// Test `name:line` references
#[test]
fn test_cell_assignment() {
    let output = calc(&[
        "header1,header2",
        "0,10,=header1:1",
        "10,0,=header1:2",
        "0,10,=header2:1",
        "10,0,=header2:2",
    ]);
    assert_eq!(output, "header1,header2\n0,10,0\n10,0,10\n0,10,10\n10,0,0");
}

/// An unknown header aborts the run
#[test]
fn test_wrong_reference() {
    let err = calc_err(&[
        "header1,header2",
        "0,10,=header1:1",
        "10,0,=header3:2",
        "10,0,=header1:2",
    ]);

    assert_eq!(err.cell(), Some(CellAddress::new(1, 2)));
    assert!(matches!(
        err.formula_error(),
        Some(FormulaError::UnknownHeader { name, .. }) if name == "header3"
    ));
}

#[test]
fn test_sum() {
    let output = calc(&[
        "header1,header2",
        "0,10,=header1:1+header1:1",
        "10,0,=header2:1+header2:1",
        "10,0,=header1:3+header2:1",
    ]);
    assert_eq!(output, "header1,header2\n0,10,0\n10,0,20\n10,0,20");
}

#[test]
fn test_difference() {
    let output = calc(&["header1", "30,=header1:1-header1:2", "10,=header1:2-header1:1"]);
    assert_eq!(output, "header1\n30,20\n10,-20");
}

#[test]
fn test_product() {
    let output = calc(&["header1", "30,=header1:1*header1:2", "10,=header1:2*header1:1"]);
    assert_eq!(output, "header1\n30,300\n10,300");
}

#[test]
fn test_quotient() {
    let output = calc(&["header1", "30,=header1:1/header1:2", "10,=header1:2/header1:1"]);
    assert_eq!(output, "header1\n30,3\n10,0.3333333333333333");
}

#[test]
fn test_multiple_operators() {
    let output = calc(&["header1", "30,=header1:1+header1:2+header1:2", "10,=header1:2"]);
    assert_eq!(output, "header1\n30,50\n10,10");
}

/// No precedence: operators apply strictly left to right
#[test]
fn test_left_to_right() {
    let output = calc(&["a", "2,=a:1+3*4", "3,=a:2-1/2"]);
    assert_eq!(output, "a\n2,20\n3,1");
}

#[test]
fn test_negating() {
    let output = calc(&["header1", "30,=-header1:1", "0,=header1:1"]);
    assert_eq!(output, "header1\n30,-30\n0,30");
}

#[test]
fn test_numbers() {
    let output = calc(&["header1,header2", "30,=50+header1:1", "0,=header2:1"]);
    assert_eq!(output, "header1,header2\n30,80\n0,80");
}

#[test]
fn test_chained_references() {
    let output = calc(&["header1,header2", "30,=header1:1", "0,=header2:1"]);
    assert_eq!(output, "header1,header2\n30,30\n0,30");
}

#[test]
fn test_chained_references_and_operators() {
    let output = calc(&[
        "header1,header2",
        "30,=header1:1+header1:1",
        "0,=header2:1",
        "10,=header2:1+70",
        "10,=header2:3+header1:4",
    ]);
    assert_eq!(output, "header1,header2\n30,60\n0,60\n10,130\n10,140");
}

#[test]
fn test_relative_line_references() {
    let output = calc(&[
        "header1,header2",
        "30,=header1:#0",
        "20,=header1:#0",
        "10,=header1:#1",
        "0,=header1:#-1",
    ]);
    assert_eq!(output, "header1,header2\n30,30\n20,20\n10,0\n0,10");
}

#[test]
fn test_relative_column_references() {
    let output = calc(&[
        "header1,header2,header3",
        "30,=#-1:#0,50",
        "20,=#1:#0,60",
        "10,=#1:1,5",
        "0,=#-1:1,10",
    ]);
    assert_eq!(
        output,
        "header1,header2,header3\n30,30,50\n20,60,60\n10,50,5\n0,30,10"
    );
}

#[test]
fn test_references_and_calculations() {
    let output = calc(&["header1", "10", "=#0:#-1", "=#0:#-2", "=#0:#-3", "=#0:#-4"]);
    assert_eq!(output, "header1\n10\n10\n10\n10\n10");
}

#[test]
fn test_relative_reference_to_relative_reference() {
    let output = calc(&["header1", "10", "=#0:#-1", "=#0:#-1"]);
    assert_eq!(output, "header1\n10\n10\n10");
}

#[test]
fn test_sum_function() {
    let output = calc(&[
        "header1,header2",
        "10,=#-1:#0",
        "20,=#-1:#0",
        "30,=#-1:#0",
        "=sum(header1),=sum(header2)",
    ]);
    assert_eq!(output, "header1,header2\n10,10\n20,20\n30,30\n60,60");
}

/// Whole-row and whole-column wildcards skip the calling cell's own row
/// or column
#[test]
fn test_sum_function_relative() {
    let output = calc(&[
        "header1,header2,header3,header4",
        "10,=#-1:#0",
        "20,=#-1:#0",
        "30,=#-1:#0",
        "40,30,20,10,=sum(##:#0)",
        "=sum(#0:##),=sum(#0:##)",
    ]);
    assert_eq!(
        output,
        "header1,header2,header3,header4\n10,10\n20,20\n30,30\n40,30,20,10,100\n100,90"
    );
}

#[test]
fn test_sum_with_empty_columns() {
    let output = calc(&[
        ",header1,header2,sum",
        ",0,=header1:2,=sum(##:#0)",
        ",10,=header2:1,=sum(##:#0)",
    ]);
    assert_eq!(output, ",header1,header2,sum\n,0,10,10\n,10,10,20");
}

/// `len` counts empty cells and `avg` divides by that count
#[test]
fn test_avg_len_min_max() {
    let output = calc(&[
        ",,header1,header2,header3",
        ",,-1,0,1,=header1:2,=min(##:#0)",
        ",,10,=header2:1,=max(##:#0)",
        "sumo,=len(#0:##),=avg(#0:##),,=avg(#0:##)",
    ]);
    assert_eq!(
        output,
        ",,header1,header2,header3\n,,-1,0,1,10,-1\n,,10,0,10\nsumo,2,4.5,,5.5"
    );
}

#[test]
fn test_functions_with_operators() {
    let output = calc(&["header1", "10", "20", "30", "=sum(#0:##)*2"]);
    assert_eq!(output, "header1\n10\n20\n30\n120");
}

#[test]
fn test_range_order_does_not_matter() {
    let forward = calc(&["a,b", "1", "2", "3", "4,=sum(a:1>a:3)"]);
    let backward = calc(&["a,b", "1", "2", "3", "4,=sum(a:3>a:1)"]);
    assert_eq!(forward, "a,b\n1\n2\n3\n4,6");
    assert_eq!(forward, backward);
}

#[test]
fn test_function_names_ignore_case() {
    let output = calc(&["a", "1", "2", "=SUM(a)+Len(a)"]);
    assert_eq!(output, "a\n1\n2\n5");
}

#[test]
fn test_division_by_zero_and_empty() {
    let output = calc(&["a,b", "30,0,=a:1/b:1", ",0,=a:2/b:2", "0,0,=a:3/b:3"]);
    assert_eq!(output, "a,b\n30,0,Infinity\n,0,NaN\n0,0,NaN");
}

/// Dates and other text pass through untouched, even when referenced
#[test]
fn test_text_passes_through() {
    let output = calc(&["day,copy", "2021-03-04,=day:1", "hello world,=#-1:#0"]);
    assert_eq!(output, "day,copy\n2021-03-04,2021-03-04\nhello world,hello world");
}

/// Plain cells keep their exact spelling
#[test]
fn test_plain_numbers_keep_spelling() {
    let lines = ["a,b", "1.50, 2 ,1e3,007"];
    assert_eq!(calc(&lines), lines.join("\n"));
}

#[test]
fn test_crlf_and_trailing_newline() {
    let text = "a,b\r\n1,=a:1*2\r\n2,=a:2*2\r\n";
    assert_eq!(run(text, ',').unwrap(), "a,b\r\n1,2\r\n2,4\r\n");

    let text = "a\n1\n";
    assert_eq!(run(text, ',').unwrap(), text);
}

/// Each line keeps its own terminator
#[test]
fn test_mixed_line_endings() {
    for text in ["a\r\n1\n", "a\n1\r\n2", "a\r\n1\r\n2\n"] {
        assert_eq!(run(text, ',').unwrap(), text);
    }

    let text = "a,b\n1,=a:1*2\r\n2,=a:2*2\n";
    assert_eq!(run(text, ',').unwrap(), "a,b\n1,2\r\n2,4\n");
}

#[test]
fn test_custom_separator() {
    let text = "a;b\n1;=a:1+1\n2;=sum(a)";
    assert_eq!(run(text, ';').unwrap(), "a;b\n1;2\n2;1");
}

#[test]
fn test_rows_keep_their_length() {
    let output = calc(&["a,b,c", "1", "1,2,3,4,=sum(##:#0)"]);
    assert_eq!(output, "a,b,c\n1\n1,2,3,4,10");
}

#[test]
fn test_circular_reference() {
    let err = calc_err(&["a,b", "=b:1,=a:1"]);
    assert!(matches!(
        err.formula_error(),
        Some(FormulaError::CircularReference { .. })
    ));
    assert_eq!(err.cell(), Some(CellAddress::new(0, 0)));
}

#[test]
fn test_out_of_bounds_line() {
    let err = calc_err(&["a", "1,=a:#1"]);
    assert!(matches!(
        err.formula_error(),
        Some(FormulaError::RowOutOfBounds { line: 2, rows: 1, .. })
    ));
}

#[test]
fn test_huge_offsets_are_out_of_bounds() {
    let err = run("a\n1\n=a:#9223372036854775807", ',').unwrap_err();
    assert!(matches!(
        err.formula_error(),
        Some(FormulaError::RowOutOfBounds { .. })
    ));

    let err = run("a,b\n1,=#9223372036854775807:1", ',').unwrap_err();
    assert!(matches!(
        err.formula_error(),
        Some(FormulaError::ColumnOutOfBounds { .. })
    ));
}

#[test]
fn test_malformed_formula() {
    let err = calc_err(&["a", "1,=a:1+"]);
    assert!(err.formula_error().unwrap().is_malformed());
}

#[test]
fn test_depth_limit() {
    let mut lines = vec!["a".to_string(), "1".to_string()];
    lines.extend((0..20).map(|_| "=#0:#-1".to_string()));
    let text = lines.join("\n");

    let options = CalculationOptions {
        memoize: false,
        max_depth: 8,
        ..Default::default()
    };
    let err = calculate(&text, &options).unwrap_err();
    assert!(matches!(
        err.formula_error(),
        Some(FormulaError::DepthLimitExceeded { limit: 8, .. })
    ));

    // rows evaluated top-down with a cache never nest deeply
    let output = calculate(&text, &CalculationOptions::default()).unwrap();
    assert!(output.lines().skip(1).all(|line| line == "1"));
}

/// Each row reads the row below it, so evaluating the first row nests once
/// per formula
fn downward_chain(formula: &str, formulas: usize) -> String {
    let mut lines = vec!["a".to_string()];
    lines.extend((0..formulas).map(|_| formula.to_string()));
    lines.push("1".to_string());
    lines.join("\n")
}

/// Chains run with default options on a thread with the default stack size
#[test]
fn test_deep_chains_on_spawned_thread() {
    for formula in ["=#0:#1", "=sum(#0:#1>#0:#1)"] {
        let within = downward_chain(formula, DEFAULT_MAX_DEPTH);
        let beyond = downward_chain(formula, DEFAULT_MAX_DEPTH + 100);

        let (within, beyond) = std::thread::spawn(move || (run(&within, ','), run(&beyond, ',')))
            .join()
            .unwrap();

        let output = within.unwrap();
        assert!(output.lines().skip(1).all(|line| line == "1"), "{formula}");

        let err = beyond.unwrap_err();
        assert_eq!(err.cell(), Some(CellAddress::new(0, 0)));
        assert!(matches!(
            err.formula_error(),
            Some(FormulaError::DepthLimitExceeded { limit: DEFAULT_MAX_DEPTH, .. })
        ));
    }
}

#[test]
fn test_memoization_does_not_change_output() {
    let text = [
        "a,b,c",
        "1,=a:1*2,=sum(b)",
        "2,=a:2*2+b:1,=avg(b)",
        "3,=a:3*2+b:2,=max(a;b)",
        "4,=sum(a:1>a:3),=len(##:#0)",
    ]
    .join("\n");

    let cached = CalculationOptions::default();
    let uncached = CalculationOptions {
        memoize: false,
        ..Default::default()
    };

    let (with_cache, cached_stats) = calculate_with_stats(&text, &cached).unwrap();
    let (without_cache, uncached_stats) = calculate_with_stats(&text, &uncached).unwrap();

    assert_eq!(with_cache, without_cache);
    assert_eq!(cached_stats.formula_count, uncached_stats.formula_count);
    assert!(cached_stats.cells_evaluated < uncached_stats.cells_evaluated);
    assert!(cached_stats.cache_hits > 0);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn plain_field() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z ]{0,6}",
            (-1000i32..1000).prop_map(|n| n.to_string()),
            "[0-9]{1,3}\\.[0-9]{1,3}",
        ]
    }

    fn plain_grid() -> impl Strategy<Value = String> {
        (
            prop::collection::vec("[a-z]{1,5}", 1..5),
            prop::collection::vec(prop::collection::vec(plain_field(), 0..6), 0..6),
            prop::collection::vec(prop_oneof![Just("\n"), Just("\r\n")], 7),
            any::<bool>(),
        )
            .prop_map(|(headers, rows, endings, trailing)| {
                let mut lines = vec![headers.join(",")];
                lines.extend(rows.iter().map(|row| row.join(",")));
                let last = lines.len() - 1;

                let mut text = String::new();
                for (i, line) in lines.iter().enumerate() {
                    text.push_str(line);
                    if i < last || trailing {
                        text.push_str(endings[i]);
                    }
                }
                text
            })
    }

    proptest! {
        #[test]
        fn plain_data_is_identity(text in plain_grid()) {
            prop_assert_eq!(run(&text, ',').unwrap(), text);
        }

        #[test]
        fn relative_matches_absolute(
            values in prop::collection::vec(-1000i32..1000, 1..8),
            target in 0usize..8,
            current in 0usize..8,
        ) {
            let rows = values.len();
            let (target, current) = (target % rows, current % rows);
            let offset = target as i64 - current as i64;

            let grid = |formula: &str| {
                let mut lines = vec!["n,f".to_string()];
                for (row, value) in values.iter().enumerate() {
                    if row == current {
                        lines.push(format!("{},{}", value, formula));
                    } else {
                        lines.push(value.to_string());
                    }
                }
                lines.join("\n")
            };

            let absolute = run(&grid(&format!("=n:{}", target + 1)), ',').unwrap();
            let relative = run(&grid(&format!("=#-1:#{}", offset)), ',').unwrap();
            prop_assert_eq!(&absolute, &relative);

            let expected = format!("{},{}", values[current], values[target]);
            prop_assert_eq!(absolute.lines().nth(current + 1), Some(expected.as_str()));
        }

        #[test]
        fn len_counts_every_value(column in prop::collection::vec(plain_field(), 0..10)) {
            let mut lines = vec!["a".to_string()];
            lines.extend(column.iter().cloned());
            lines.push("=len(a)".to_string());

            let output = run(&lines.join("\n"), ',').unwrap();
            let expected = column.len().to_string();
            prop_assert_eq!(output.lines().last(), Some(expected.as_str()));
        }
    }
}
