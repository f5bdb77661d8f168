use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use iv3_dataset_builder::{build_dataset, write_dataset, write_dataset_csv, BuildConfig};

/// Build the begroting/jaarrekening comparison dataset from Iv3 extracts.
#[derive(Parser)]
#[command(name = "iv3-dataset")]
#[command(version)]
struct Cli {
    /// Directory containing Iv3 CSVs like 2017000.csv
    #[arg(long, value_name = "DIR")]
    iv3_dir: PathBuf,

    /// CSV with Provincie/Grootteklasse (+ optional population) per municipality
    #[arg(long, value_name = "FILE")]
    classes_csv: PathBuf,

    /// Iv3 value column to read
    #[arg(long, default_value = "k_2ePlaatsing_2")]
    value_col: String,

    #[arg(long, default_value_t = 2017)]
    year_start: i32,

    #[arg(long, default_value_t = 2024)]
    year_end: i32,

    /// Output path for the JSON artifact
    #[arg(long, default_value = "begroting_rekening.json")]
    out: PathBuf,

    /// Also write a comma-delimited rendering
    #[arg(long, value_name = "FILE")]
    out_csv: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = BuildConfig::new(cli.iv3_dir, cli.classes_csv);
    config.value_col = cli.value_col;
    config.year_start = cli.year_start;
    config.year_end = cli.year_end;

    let rows = match build_dataset(&config) {
        Ok(rows) => rows,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = write_dataset(&rows, &cli.out) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    println!("Wrote {} rows to {}", rows.len(), cli.out.display());

    if let Some(out_csv) = &cli.out_csv {
        if let Err(err) = write_dataset_csv(&rows, out_csv) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
        println!("Wrote CSV to {}", out_csv.display());
    }

    ExitCode::SUCCESS
}
