//! Pivots raw long-format Iv3 records into one Baten/Lasten/Saldo row per
//! (municipality, taakveld) pair.

use crate::schema::{PivotedRow, RawRecord};
use std::collections::BTreeMap;

/// Category codes on the raw records start with "B" for baten and "L" for
/// lasten. Anything else is ignored by the pivot.
const BATEN_MARKER: char = 'B';
const LASTEN_MARKER: char = 'L';

/// Groups records by (municipality, taakveld) and sums the baten and lasten
/// sides separately. A pair with no records on one side gets 0.0 for that
/// side. Empty input yields empty output.
///
/// Output is ordered by (municipality, taakveld) so rebuilds are
/// reproducible.
pub fn pivot_records(records: &[RawRecord]) -> Vec<PivotedRow> {
    let mut sums: BTreeMap<(String, String), (f64, f64)> = BTreeMap::new();

    for record in records {
        let key = (record.municipality.clone(), record.taakveld.clone());
        let entry = sums.entry(key).or_insert((0.0, 0.0));
        if record.category.starts_with(BATEN_MARKER) {
            entry.0 += record.value;
        } else if record.category.starts_with(LASTEN_MARKER) {
            entry.1 += record.value;
        }
    }

    sums.into_iter()
        .map(|((municipality, taakveld), (baten, lasten))| {
            PivotedRow::new(municipality, taakveld, baten, lasten)
        })
        .collect()
}
