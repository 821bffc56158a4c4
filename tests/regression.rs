//! Common code for running regression tests.
use float_cmp::approx_eq;
use itertools::Itertools;
use lcoe_tables::cli::RunOpts;
use lcoe_tables::cli::example::handle_example_run_command;
use lcoe_tables::settings::Settings;
use std::fs::{File, read_dir};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FLOAT_CMP_TOLERANCE: f64 = 1e-10;

/// Run a regression test for an example, comparing only the CSV files found in the test data
/// folder
#[allow(dead_code)]
pub fn run_regression_test(example_name: &str, scenario: &str) {
    unsafe { std::env::set_var("LCOE_TABLES_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        scenario: scenario.parse().unwrap(),
        output_dir: Some(tempdir.path().to_path_buf()),
        overwrite: false,
        lenient: false,
        threads: None,
    };
    handle_example_run_command(example_name, &opts, Some(Settings::default())).unwrap();

    let test_data_dir = PathBuf::from(format!("tests/data/{example_name}"));
    compare_output_dirs(&tempdir.path().join(scenario), &test_data_dir);
}

fn compare_output_dirs(output_dir: &Path, expected_dir: &Path) {
    let file_names = get_csv_file_names(expected_dir);
    assert!(!file_names.is_empty());

    let mut errors = Vec::new();
    for file_name in file_names {
        compare_lines(output_dir, expected_dir, &file_name, &mut errors);
    }

    assert!(
        errors.is_empty(),
        "The following errors occurred:\n  * {}",
        errors.join("\n  * ")
    );
}

fn compare_lines(output_dir: &Path, expected_dir: &Path, file_name: &str, errors: &mut Vec<String>) {
    let lines1 = read_lines(&output_dir.join(file_name));
    let lines2 = read_lines(&expected_dir.join(file_name));

    // Check for different number of lines
    if lines1.len() != lines2.len() {
        errors.push(format!(
            "{}: Different number of lines: {} vs {}",
            file_name,
            lines1.len(),
            lines2.len()
        ));
    }

    // Compare each line
    for (num, (line1, line2)) in lines1.into_iter().zip(lines2).enumerate() {
        if !compare_line(num, &line1, &line2, file_name, errors) {
            errors.push(format!(
                "{file_name}: line {num}:\n    + \"{line1}\"\n    - \"{line2}\""
            ));
        }
    }
}

fn compare_line(
    num: usize,
    line1: &str,
    line2: &str,
    file_name: &str,
    errors: &mut Vec<String>,
) -> bool {
    let fields1 = line1.split(',').collect_vec();
    let fields2 = line2.split(',').collect_vec();
    if fields1.len() != fields2.len() {
        errors.push(format!(
            "{}: line {}: Different number of fields: {} vs {}",
            file_name,
            num,
            fields1.len(),
            fields2.len()
        ));
    }

    // Check every field matches
    fields1.into_iter().zip(fields2).all(|(f1, f2)| {
        // First try to compare fields as floating-point values, falling back on string comparison
        try_compare_floats(f1, f2).unwrap_or_else(|| f1 == f2)
    })
}

/// Parse a string into an `f64`, returning `None` if parsing fails or value is infinite/NaN
fn parse_finite(s: &str) -> Option<f64> {
    s.parse().ok().filter(|value: &f64| value.is_finite())
}

/// Compare two fields as floats, returning `None` if either is not a finite number
fn try_compare_floats(f1: &str, f2: &str) -> Option<bool> {
    let value1 = parse_finite(f1)?;
    let value2 = parse_finite(f2)?;
    Some(approx_eq!(f64, value1, value2, epsilon = FLOAT_CMP_TOLERANCE))
}

fn get_csv_file_names(dir_path: &Path) -> Vec<String> {
    let entries = read_dir(dir_path).unwrap();
    let mut file_names = Vec::new();
    for entry in entries {
        let file_name = entry.unwrap().file_name();
        let file_name = file_name.to_str().unwrap();
        if file_name.ends_with(".csv") {
            file_names.push(file_name.to_string());
        }
    }

    file_names.sort();
    file_names
}

// Read all lines from a file into a `Vec`
fn read_lines(path: &Path) -> Vec<String> {
    let file = File::open(path).unwrap();
    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .collect()
}
