//! Reads the Iv3 extracts and the municipality classification side-table.

use crate::aggregate::ClassTable;
use crate::error::{DatasetError, Result};
use crate::schema::{
    DocumentType, MunicipalityClass, RawRecord, COL_CATEGORIE, COL_GEMEENTE, COL_TAAKVELD,
};
use csv::StringRecord;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Column names the classification file may use for the population count.
const POPULATION_COLUMNS: [&str; 4] = ["Inwoners", "Inwonertal", "Population", "Populatie"];

const COL_PROVINCIE: &str = "Provincie";
const COL_GROOTTEKLASSE: &str = "Grootteklasse";
const COL_STEDELIJKHEID: &str = "Stedelijkheid";

fn column_index(headers: &StringRecord, column: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| DatasetError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
}

/// Loads one Iv3 extract for a (year, document) pair. A missing file is a
/// hard error: silently skipping a slice would corrupt every downstream
/// rollup without detection.
///
/// Rows with an empty value cell are skipped (the extract is sparse);
/// unparseable values abort the build.
pub fn load_iv3_file(
    path: &Path,
    year: i32,
    document: DocumentType,
    value_col: &str,
) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(DatasetError::MissingInputFile {
            year,
            document: document.label().to_string(),
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let gemeente_idx = column_index(&headers, COL_GEMEENTE, path)?;
    let taakveld_idx = column_index(&headers, COL_TAAKVELD, path)?;
    let categorie_idx = column_index(&headers, COL_CATEGORIE, path)?;
    let value_idx = column_index(&headers, value_col, path)?;

    let mut records = Vec::new();
    for (position, result) in reader.records().enumerate() {
        let record = result?;
        let raw_value = record.get(value_idx).unwrap_or("").trim();
        if raw_value.is_empty() {
            continue;
        }
        let value = raw_value
            .parse::<f64>()
            .map_err(|_| DatasetError::InvalidValue {
                value: raw_value.to_string(),
                path: path.to_path_buf(),
                record: position as u64 + 2,
            })?;

        records.push(RawRecord {
            municipality: record.get(gemeente_idx).unwrap_or("").trim().to_string(),
            taakveld: record.get(taakveld_idx).unwrap_or("").trim().to_string(),
            category: record.get(categorie_idx).unwrap_or("").trim().to_string(),
            value,
        });
    }

    debug!(
        "Loaded {} records from {} ({} {})",
        records.len(),
        path.display(),
        year,
        document.label()
    );
    Ok(records)
}

/// Class files come in both comma- and semicolon-delimited flavors; sniff
/// on the header line.
fn sniff_delimiter(path: &Path) -> Result<u8> {
    let contents = fs::read_to_string(path)?;
    let header = contents.lines().next().unwrap_or("");
    if header.contains(';') {
        Ok(b';')
    } else {
        Ok(b',')
    }
}

/// Semicolon-delimited class files write decimal commas.
fn parse_population(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

/// Loads the municipality classification side-table. Only the municipality
/// column is required; province, size class, urbanisation and population
/// are picked up when present and the corresponding aggregation dimension
/// is skipped when they are not.
pub fn load_classes(path: &Path) -> Result<ClassTable> {
    let delimiter = sniff_delimiter(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let gemeente_idx = column_index(&headers, COL_GEMEENTE, path)?;
    let provincie_idx = headers.iter().position(|h| h.trim() == COL_PROVINCIE);
    let grootteklasse_idx = headers.iter().position(|h| h.trim() == COL_GROOTTEKLASSE);
    let stedelijkheid_idx = headers.iter().position(|h| h.trim() == COL_STEDELIJKHEID);
    let population_idx = POPULATION_COLUMNS
        .iter()
        .find_map(|col| headers.iter().position(|h| h.trim() == *col));

    if population_idx.is_none() {
        warn!(
            "No population column in {}; per-inwoner output will be absent",
            path.display()
        );
    }

    let get = |record: &StringRecord, idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let mut classes = ClassTable::new();
    for result in reader.records() {
        let record = result?;
        let municipality = record.get(gemeente_idx).unwrap_or("").trim().to_string();
        if municipality.is_empty() {
            continue;
        }
        let population = record
            .get(population_idx.unwrap_or(usize::MAX))
            .and_then(parse_population);

        classes.insert(
            municipality.clone(),
            MunicipalityClass {
                municipality,
                province: get(&record, provincie_idx),
                size_class: get(&record, grootteklasse_idx),
                urbanisation: get(&record, stedelijkheid_idx),
                population,
            },
        );
    }

    debug!("Loaded {} class entries from {}", classes.len(), path.display());
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_iv3_file() {
        let file = write_temp(
            "Gemeenten,TaakveldBalanspost,Categorie,k_2ePlaatsing_2,Ignored\n\
             Utrecht,1.1 Crisisbeheersing,B1,10.5,x\n\
             Utrecht,1.1 Crisisbeheersing,L1,3.25,y\n\
             Zwolle,4.2 Onderwijshuisvesting,L2,,z\n",
        );

        let records =
            load_iv3_file(file.path(), 2022, DocumentType::Begroting, "k_2ePlaatsing_2").unwrap();

        // The empty-value Zwolle row is skipped.
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].municipality, "Utrecht");
        assert_eq!(records[0].category, "B1");
        assert_eq!(records[0].value, 10.5);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_iv3_file(
            Path::new("/nonexistent/2022000.csv"),
            2022,
            DocumentType::Begroting,
            "k_2ePlaatsing_2",
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::MissingInputFile { year: 2022, .. }));
    }

    #[test]
    fn test_missing_value_column() {
        let file = write_temp("Gemeenten,TaakveldBalanspost,Categorie\nUtrecht,1.1,B1\n");
        let err = load_iv3_file(file.path(), 2022, DocumentType::Begroting, "k_2ePlaatsing_2")
            .unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { .. }));
    }

    #[test]
    fn test_invalid_value_is_fatal() {
        let file = write_temp(
            "Gemeenten,TaakveldBalanspost,Categorie,k_2ePlaatsing_2\nUtrecht,1.1,B1,oops\n",
        );
        let err = load_iv3_file(file.path(), 2022, DocumentType::Begroting, "k_2ePlaatsing_2")
            .unwrap_err();
        assert!(matches!(err, DatasetError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_classes_semicolon_decimal_comma() {
        let file = write_temp(
            "Gemeenten;Provincie;Grootteklasse;Inwonertal\n\
             Utrecht;Utrecht;> 100.000;361,92\n\
             Goes;Zeeland;25.000 - 50.000;38\n",
        );

        let classes = load_classes(file.path()).unwrap();
        let utrecht = classes.get("Utrecht").unwrap();
        assert_eq!(utrecht.province.as_deref(), Some("Utrecht"));
        assert_eq!(utrecht.population, Some(361.92));
        assert_eq!(classes.get("Goes").unwrap().population, Some(38.0));
    }

    #[test]
    fn test_load_classes_with_urbanisation() {
        let file = write_temp(
            "Gemeenten;Provincie;Stedelijkheid;Inwonertal\n\
             Utrecht;Utrecht;Zeer sterk stedelijk;361,92\n\
             Goes;Zeeland;Weinig stedelijk;38\n",
        );

        let classes = load_classes(file.path()).unwrap();
        assert_eq!(
            classes.get("Utrecht").unwrap().urbanisation.as_deref(),
            Some("Zeer sterk stedelijk")
        );
        assert_eq!(
            classes.get("Goes").unwrap().urbanisation.as_deref(),
            Some("Weinig stedelijk")
        );
    }

    #[test]
    fn test_load_classes_population_alias() {
        // "Inwoners" sits before "Inwonertal" in the detection order.
        let file = write_temp(
            "Gemeenten,Provincie,Inwoners\n\
             Goes,Zeeland,38\n",
        );
        let classes = load_classes(file.path()).unwrap();
        assert_eq!(classes.get("Goes").unwrap().population, Some(38.0));
    }

    #[test]
    fn test_load_classes_without_population() {
        let file = write_temp("Gemeenten,Provincie,Grootteklasse\nGoes,Zeeland,25.000 - 50.000\n");
        let classes = load_classes(file.path()).unwrap();
        let goes = classes.get("Goes").unwrap();
        assert_eq!(goes.population, None);
        assert_eq!(goes.size_class.as_deref(), Some("25.000 - 50.000"));
        assert_eq!(goes.urbanisation, None);
    }
}
