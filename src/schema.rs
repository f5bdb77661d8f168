use serde::{Deserialize, Serialize};

/// Iv3 column names as they appear in the CBS extracts.
pub const COL_GEMEENTE: &str = "Gemeenten";
pub const COL_TAAKVELD: &str = "TaakveldBalanspost";
pub const COL_CATEGORIE: &str = "Categorie";

/// Default value column. Some reporting years use a different placement
/// column, selectable via `BuildConfig::value_col`.
pub const DEFAULT_VALUE_COL: &str = "k_2ePlaatsing_2";

/// One raw Iv3 line after ingestion: a single (municipality, taakveld,
/// categorie) cell. Read-only input to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub municipality: String,
    pub taakveld: String,
    pub category: String,
    pub value: f64,
}

/// The two Iv3 document kinds: budgeted versus realized spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentType {
    Begroting,
    Jaarrekening,
}

impl DocumentType {
    pub const ALL: [DocumentType; 2] = [DocumentType::Begroting, DocumentType::Jaarrekening];

    /// Iv3 file-name suffix, e.g. `2019000.csv` for the 2019 Begroting.
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::Begroting => "000",
            DocumentType::Jaarrekening => "005",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Begroting => "Begroting",
            DocumentType::Jaarrekening => "Jaarrekening",
        }
    }
}

/// Income / expense / net, in Iv3 terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Baten,
    Lasten,
    Saldo,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Baten, Category::Lasten, Category::Saldo];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Baten => "Baten",
            Category::Lasten => "Lasten",
            Category::Saldo => "Saldo",
        }
    }
}

/// Reporting basis of a row: absolute totals or euros per inhabitant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stand {
    Totaal,
    #[serde(rename = "Per inwoner")]
    PerInwoner,
}

impl Stand {
    pub fn label(&self) -> &'static str {
        match self {
            Stand::Totaal => "Totaal",
            Stand::PerInwoner => "Per inwoner",
        }
    }
}

/// One pivoted cell: all categories for a (municipality, taakveld) pair
/// summed into Baten / Lasten, with Saldo derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotedRow {
    pub municipality: String,
    pub taakveld: String,
    pub baten: f64,
    pub lasten: f64,
    pub saldo: f64,
}

impl PivotedRow {
    /// Saldo is always recomputed from Baten and Lasten, never stored
    /// independently.
    pub fn new(municipality: String, taakveld: String, baten: f64, lasten: f64) -> Self {
        Self {
            municipality,
            taakveld,
            baten,
            lasten,
            saldo: baten - lasten,
        }
    }

    pub fn category_value(&self, category: Category) -> f64 {
        match category {
            Category::Baten => self.baten,
            Category::Lasten => self.lasten,
            Category::Saldo => self.saldo,
        }
    }
}

/// Classification side-table entry for one municipality. Every field past
/// the name is optional: class files vary, and a dimension that is absent
/// from the file is skipped during aggregation rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityClass {
    pub municipality: String,
    pub province: Option<String>,
    pub size_class: Option<String>,
    pub urbanisation: Option<String>,
    pub population: Option<f64>,
}

/// One row of the final long-format dataset. Serialized field names match
/// the columns the dashboard expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    #[serde(rename = "Gemeenten")]
    pub municipality: String,
    #[serde(rename = "Jaar")]
    pub year: i32,
    #[serde(rename = "Stand")]
    pub stand: Stand,
    #[serde(rename = "Taakveld")]
    pub taakveld: String,
    #[serde(rename = "Document")]
    pub document: DocumentType,
    #[serde(rename = "Categorie")]
    pub category: Category,
    #[serde(rename = "Waarde")]
    pub value: f64,
}
