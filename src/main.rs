use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use csv_tolerant_diff::csv::Csv;
use csv_tolerant_diff::csv_row_diff::CsvRowDiffBuilder;
use csv_tolerant_diff::csv_writer::write_rows_to_path;
use csv_tolerant_diff::diff_result::ComparisonResult;
use csv_tolerant_diff::error::RowDiffError;
use csv_tolerant_diff::logging::init_logging;
use csv_tolerant_diff::report::render_summary;
use csv_tolerant_diff::source_kind::SourceKind;

mod cli;

const ONLY_IN_LEFT_FILE: &str = "only_in_file1.csv";
const ONLY_IN_RIGHT_FILE: &str = "only_in_file2.csv";

const EXIT_DIFFER: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_DIFFER),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Returns whether the files match.
fn run(args: &cli::Args) -> anyhow::Result<bool> {
    for path in [&args.file1, &args.file2] {
        if SourceKind::detect(path) == SourceKind::Spreadsheet {
            return Err(RowDiffError::UnsupportedSource { path: path.clone() }.into());
        }
    }

    let config = args.diff_config();
    let decimal_digits = config.decimal_digits;
    let (delimiter, quote) = (config.delimiter, config.quote);
    let differ = CsvRowDiffBuilder::from_config(config)
        .build()
        .context("invalid settings")?;

    let mut result = differ.diff(Csv::from_path(&args.file1)?, Csv::from_path(&args.file2)?)?;
    result.sort();

    let left_name = args.file1.display().to_string();
    let right_name = args.file2.display().to_string();
    println!();
    print!(
        "{}",
        render_summary(&result, &left_name, &right_name, decimal_digits)
    );

    if !args.no_write {
        write_output_files(&args.output_dir, &result, delimiter, quote)?;
    }
    Ok(result.is_match())
}

/// A match clears difference files left over from earlier runs.
fn write_output_files(
    dir: &Path,
    result: &ComparisonResult,
    delimiter: char,
    quote: char,
) -> anyhow::Result<()> {
    let left = dir.join(ONLY_IN_LEFT_FILE);
    let right = dir.join(ONLY_IN_RIGHT_FILE);

    if result.is_match() {
        remove_if_present(&left)?;
        remove_if_present(&right)?;
        return Ok(());
    }

    write_rows_to_path(&left, result.only_in_left(), delimiter, quote)?;
    write_rows_to_path(&right, result.only_in_right(), delimiter, quote)?;
    println!();
    println!("Output files created:");
    println!("  {} ({} rows)", left.display(), result.only_in_left().len());
    println!("  {} ({} rows)", right.display(), result.only_in_right().len());
    Ok(())
}

fn remove_if_present(path: &Path) -> anyhow::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("could not remove `{}`", path.display())),
    }
}
