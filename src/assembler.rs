//! Orchestrates the full dataset build: per (year, document) slice the raw
//! extract is loaded, pivoted, classified and merger-reconciled; the
//! slices are then concatenated, stands attached and rollups appended.

use crate::aggregate::{add_aggregates, add_stands};
use crate::classifier::{is_balance_sheet_code, TaakveldClassifier};
use crate::error::{DatasetError, Result};
use crate::ingestion::{load_classes, load_iv3_file};
use crate::mergers::{apply_merger_rules, MunicipalitySeries};
use crate::pivot::pivot_records;
use crate::schema::{Category, DatasetRow, DocumentType, Stand, DEFAULT_VALUE_COL};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Configuration of one dataset build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding the Iv3 extracts, named `{year}{code}.csv`.
    pub iv3_dir: PathBuf,
    /// Municipality classification file.
    pub classes_path: PathBuf,
    /// Iv3 value column to read; varies across reporting years.
    pub value_col: String,
    pub year_start: i32,
    pub year_end: i32,
}

impl BuildConfig {
    pub fn new(iv3_dir: impl Into<PathBuf>, classes_path: impl Into<PathBuf>) -> Self {
        Self {
            iv3_dir: iv3_dir.into(),
            classes_path: classes_path.into(),
            value_col: DEFAULT_VALUE_COL.to_string(),
            year_start: 2017,
            year_end: 2024,
        }
    }

    fn iv3_path(&self, year: i32, document: DocumentType) -> PathBuf {
        self.iv3_dir.join(format!("{}{}.csv", year, document.code()))
    }
}

/// Builds the long-format rows for one (year, document) slice.
///
/// Merger reconciliation operates on a single value series, so it is
/// applied independently per (domain group, category) slice.
pub fn build_year_document(
    config: &BuildConfig,
    year: i32,
    document: DocumentType,
    classifier: &TaakveldClassifier,
) -> Result<Vec<DatasetRow>> {
    let path = config.iv3_path(year, document);
    let records = load_iv3_file(&path, year, document, &config.value_col)?;
    let pivoted = pivot_records(&records);

    // Series per (group table position, category); the group index keeps
    // output in classifier table order.
    let mut series: BTreeMap<(usize, Category), MunicipalitySeries> = BTreeMap::new();

    for row in &pivoted {
        if is_balance_sheet_code(&row.taakveld) {
            continue;
        }
        let Some((group_idx, _)) = classifier.classify_entry(&row.taakveld) else {
            debug!("Unclassified taakveld '{}' dropped", row.taakveld);
            continue;
        };

        for category in Category::ALL {
            *series
                .entry((group_idx, category))
                .or_default()
                .entry(row.municipality.clone())
                .or_insert(0.0) += row.category_value(category);
        }
    }

    let mut rows = Vec::new();
    for ((group_idx, category), values) in series {
        let group = classifier.groups()[group_idx].name;
        let reconciled = apply_merger_rules(&values, year);
        for (municipality, value) in reconciled {
            rows.push(DatasetRow {
                municipality,
                year,
                stand: Stand::Totaal,
                taakveld: group.to_string(),
                document,
                category,
                value,
            });
        }
    }

    debug!(
        "Built {} rows for {} {}",
        rows.len(),
        year,
        document.label()
    );
    Ok(rows)
}

/// Runs the whole pipeline and returns the final table. Any missing input
/// file for an in-range year aborts the build; no partial table is ever
/// returned.
pub fn build_dataset(config: &BuildConfig) -> Result<Vec<DatasetRow>> {
    if config.year_start > config.year_end {
        return Err(DatasetError::InvalidYearRange {
            start: config.year_start,
            end: config.year_end,
        });
    }

    info!(
        "Building dataset for {}..={} from {}",
        config.year_start,
        config.year_end,
        config.iv3_dir.display()
    );

    let classifier = TaakveldClassifier::new();
    let classes = load_classes(&config.classes_path)?;

    let mut rows = Vec::new();
    for year in config.year_start..=config.year_end {
        for document in DocumentType::ALL {
            rows.extend(build_year_document(config, year, document, &classifier)?);
        }
    }

    let rows = add_stands(rows, &classes);
    let rows = add_aggregates(rows, &classes);

    info!("Dataset complete: {} rows", rows.len());
    Ok(rows)
}

/// Persists the table as the JSON artifact the dashboard loads.
pub fn write_dataset(rows: &[DatasetRow], out_path: &Path) -> Result<()> {
    let file = File::create(out_path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), rows)?;
    info!("Wrote {} rows to {}", rows.len(), out_path.display());
    Ok(())
}

/// Optional delimited rendering alongside the JSON artifact, values at
/// fixed 4-decimal precision.
pub fn write_dataset_csv(rows: &[DatasetRow], out_path: &Path) -> Result<()> {
    let file = File::create(out_path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "Gemeenten,Jaar,Stand,Taakveld,Document,Categorie,Waarde")?;

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for row in rows {
        csv_writer.write_record(&[
            row.municipality.clone(),
            row.year.to_string(),
            row.stand.label().to_string(),
            row.taakveld.clone(),
            row.document.label().to_string(),
            row.category.label().to_string(),
            format!("{:.4}", row.value),
        ])?;
    }
    csv_writer.flush()?;
    info!("Wrote CSV rendering to {}", out_path.display());
    Ok(())
}
