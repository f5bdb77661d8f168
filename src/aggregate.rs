//! Stand expansion and rollup rows.
//!
//! Rollups (Nederland, per province, per size class, per urbanisation
//! class) are always derived from the absolute Totaal values plus the
//! population side-table. Per-inwoner rollups divide summed totals by
//! summed populations; averaging already per-capita rows would weight a
//! village the same as a city.

use crate::schema::{Category, DatasetRow, DocumentType, MunicipalityClass, Stand};
use std::collections::BTreeMap;

/// Classification side-table keyed by municipality name.
pub type ClassTable = BTreeMap<String, MunicipalityClass>;

/// Scale factor: Waarde is reported in EUR 1.000, per-inwoner values in
/// whole euros.
const PER_INWONER_SCALE: f64 = 1000.0;

/// Appends a "Per inwoner" row for every Totaal row whose municipality has
/// a known population. Municipalities without population data keep their
/// Totaal rows and simply get no per-inwoner counterpart.
pub fn add_stands(rows: Vec<DatasetRow>, classes: &ClassTable) -> Vec<DatasetRow> {
    let mut out = rows;
    let mut per_inwoner = Vec::new();

    for row in &out {
        if row.stand != Stand::Totaal {
            continue;
        }
        let Some(population) = classes
            .get(&row.municipality)
            .and_then(|class| class.population)
        else {
            continue;
        };
        if population <= 0.0 {
            continue;
        }
        per_inwoner.push(DatasetRow {
            stand: Stand::PerInwoner,
            value: PER_INWONER_SCALE * row.value / population,
            ..row.clone()
        });
    }

    out.extend(per_inwoner);
    out
}

type RollupKey = (String, i32, DocumentType, Category, String);

struct RollupSums {
    total: f64,
    // Numerator and denominator of the per-inwoner ratio, restricted to
    // municipalities with known population.
    pop_weighted_total: f64,
    population: f64,
}

/// Appends rollup rows over the municipality-level Totaal rows in `rows`:
/// one Nederland group, one group per province, one per size class, and
/// one per urbanisation class where the side-table carries it. A dimension
/// with no classification data contributes no rows and is otherwise a
/// no-op.
pub fn add_aggregates(rows: Vec<DatasetRow>, classes: &ClassTable) -> Vec<DatasetRow> {
    let mut out = rows;

    let nederland = rollup_dimension(&out, classes, |_, _| Some("Nederland".to_string()));
    let provincie = rollup_dimension(&out, classes, |_, class| {
        class.and_then(|c| c.province.clone())
    });
    let grootteklasse = rollup_dimension(&out, classes, |_, class| {
        class.and_then(|c| c.size_class.clone())
    });
    let stedelijkheid = rollup_dimension(&out, classes, |_, class| {
        class.and_then(|c| c.urbanisation.clone())
    });

    out.extend(nederland);
    out.extend(provincie);
    out.extend(grootteklasse);
    out.extend(stedelijkheid);
    out
}

fn rollup_dimension(
    rows: &[DatasetRow],
    classes: &ClassTable,
    group_label: impl Fn(&str, Option<&MunicipalityClass>) -> Option<String>,
) -> Vec<DatasetRow> {
    let mut groups: BTreeMap<RollupKey, RollupSums> = BTreeMap::new();

    for row in rows {
        if row.stand != Stand::Totaal {
            continue;
        }
        let class = classes.get(&row.municipality);
        let Some(label) = group_label(&row.municipality, class) else {
            continue;
        };

        let key = (
            label,
            row.year,
            row.document,
            row.category,
            row.taakveld.clone(),
        );
        let sums = groups.entry(key).or_insert(RollupSums {
            total: 0.0,
            pop_weighted_total: 0.0,
            population: 0.0,
        });
        sums.total += row.value;
        if let Some(population) = class.and_then(|c| c.population) {
            sums.pop_weighted_total += row.value;
            sums.population += population;
        }
    }

    let mut rollups = Vec::new();
    for ((label, year, document, category, taakveld), sums) in groups {
        rollups.push(DatasetRow {
            municipality: label.clone(),
            year,
            stand: Stand::Totaal,
            taakveld: taakveld.clone(),
            document,
            category,
            value: sums.total,
        });
        if sums.population > 0.0 {
            rollups.push(DatasetRow {
                municipality: label,
                year,
                stand: Stand::PerInwoner,
                taakveld,
                document,
                category,
                value: PER_INWONER_SCALE * sums.pop_weighted_total / sums.population,
            });
        }
    }
    rollups
}
