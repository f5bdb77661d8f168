//! Municipal merger ("herindeling") reconciliation.
//!
//! Raw Iv3 records are keyed by the municipality names in use at record
//! time. To compare years across boundary reorganizations, historical
//! predecessor municipalities are folded into their present-day successors,
//! with fractional weights for municipalities that were split across
//! multiple successors.

use std::collections::{BTreeMap, BTreeSet};

/// One reorganization: a successor municipality, the year the
/// reorganization took effect, and the predecessors folded into it with
/// their allocation weights.
///
/// A split predecessor appears in several rules (Littenseradiel in three,
/// Haaren in four, Winsum in two). The Winsum weights sum to 0.9997, not
/// 1.0; they are reproduced literally from the historical configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MergerRule {
    pub successor: &'static str,
    pub effective_year: i32,
    pub predecessors: &'static [(&'static str, f64)],
}

/// The reorganization table, 2017 through 2023, in declaration order.
/// Shared by every consumer; never re-declared per module.
pub const MERGER_RULES: &[MergerRule] = &[
    MergerRule {
        successor: "Meierijstad",
        effective_year: 2017,
        predecessors: &[("Schijndel", 1.0), ("Sint-Oedenrode", 1.0), ("Veghel", 1.0)],
    },
    MergerRule {
        successor: "Leeuwarden",
        effective_year: 2018,
        predecessors: &[
            ("Leeuwarden", 1.0),
            ("Leeuwarderadeel", 1.0),
            ("Littenseradiel", 0.32),
        ],
    },
    MergerRule {
        successor: "Midden-Groningen",
        effective_year: 2018,
        predecessors: &[
            ("Hoogezand-Sappemeer", 1.0),
            ("Menterwolde", 1.0),
            ("Slochteren", 1.0),
        ],
    },
    MergerRule {
        successor: "Waadhoeke",
        effective_year: 2018,
        predecessors: &[
            ("Franekeradeel", 1.0),
            ("het Bildt", 1.0),
            ("Menameradiel", 1.0),
            ("Littenseradiel", 0.17),
        ],
    },
    MergerRule {
        successor: "Westerwolde",
        effective_year: 2018,
        predecessors: &[("Bellingwedde", 1.0), ("Vlagtwedde", 1.0)],
    },
    MergerRule {
        successor: "Zevenaar",
        effective_year: 2018,
        predecessors: &[("Rijnwaarden", 1.0), ("Zevenaar", 1.0)],
    },
    MergerRule {
        successor: "Súdwest-Fryslân",
        effective_year: 2018,
        predecessors: &[
            ("Bolsward", 1.0),
            ("Nijefurd", 1.0),
            ("Sneek", 1.0),
            ("Wonseradeel", 1.0),
            ("Wûnseradiel", 1.0),
            ("Wymbritseradiel", 1.0),
            ("Wymbritseradeel", 1.0),
            ("Littenseradiel", 0.51),
            ("Súdwest-Fryslân", 1.0),
        ],
    },
    MergerRule {
        successor: "Groningen (gemeente)",
        effective_year: 2019,
        predecessors: &[
            ("Groningen (gemeente)", 1.0),
            ("Haren", 1.0),
            ("Ten Boer", 1.0),
        ],
    },
    MergerRule {
        successor: "Het Hogeland",
        effective_year: 2019,
        predecessors: &[
            ("Bedum", 1.0),
            ("De Marne", 1.0),
            ("Eemsmond", 1.0),
            ("Winsum", 0.884),
        ],
    },
    MergerRule {
        successor: "Westerkwartier",
        effective_year: 2019,
        predecessors: &[
            ("Grootegast", 1.0),
            ("Leek", 1.0),
            ("Marum", 1.0),
            ("Zuidhorn", 1.0),
            ("Winsum", 0.1157),
        ],
    },
    MergerRule {
        successor: "Altena",
        effective_year: 2019,
        predecessors: &[("Aalburg", 1.0), ("Werkendam", 1.0), ("Woudrichem", 1.0)],
    },
    MergerRule {
        successor: "Beekdaelen",
        effective_year: 2019,
        predecessors: &[("Nuth", 1.0), ("Onderbanken", 1.0), ("Schinnen", 1.0)],
    },
    MergerRule {
        successor: "Haarlemmermeer",
        effective_year: 2019,
        predecessors: &[
            ("Haarlemmerliede en Spaarnwoude", 1.0),
            ("Haarlemmermeer", 1.0),
        ],
    },
    MergerRule {
        successor: "Hoeksche Waard",
        effective_year: 2019,
        predecessors: &[
            ("Binnenmaas", 1.0),
            ("Cromstrijen", 1.0),
            ("Korendijk", 1.0),
            ("Oud-Beijerland", 1.0),
            ("Strijen", 1.0),
            ("'s-Gravendeel", 1.0),
        ],
    },
    MergerRule {
        successor: "Noardeast-Fryslân",
        effective_year: 2019,
        predecessors: &[
            ("Dongeradeel", 1.0),
            ("Ferwerderadiel", 1.0),
            ("Kollumerland en Nieuwkruisland", 1.0),
        ],
    },
    MergerRule {
        successor: "Molenlanden",
        effective_year: 2019,
        predecessors: &[
            ("Graafstroom", 1.0),
            ("Liesveld", 1.0),
            ("Nieuw-Lekkerland", 1.0),
            ("Molenwaard", 1.0),
            ("Giessenlanden", 1.0),
        ],
    },
    MergerRule {
        successor: "Noordwijk",
        effective_year: 2019,
        predecessors: &[("Noordwijk", 1.0), ("Noordwijkerhout", 1.0)],
    },
    MergerRule {
        successor: "Vijfheerenlanden",
        effective_year: 2019,
        predecessors: &[("Leerdam", 1.0), ("Zederik", 1.0), ("Vianen", 1.0)],
    },
    MergerRule {
        successor: "West Betuwe",
        effective_year: 2019,
        predecessors: &[("Geldermalsen", 1.0), ("Lingewaal", 1.0), ("Neerijnen", 1.0)],
    },
    MergerRule {
        successor: "Eemsdelta",
        effective_year: 2021,
        predecessors: &[("Appingedam", 1.0), ("Delfzijl", 1.0), ("Loppersum", 1.0)],
    },
    MergerRule {
        successor: "Boxtel",
        effective_year: 2021,
        predecessors: &[("Boxtel", 1.0), ("Haaren", 0.25)],
    },
    MergerRule {
        successor: "Tilburg",
        effective_year: 2021,
        predecessors: &[("Tilburg", 1.0), ("Haaren", 0.25)],
    },
    MergerRule {
        successor: "Vught",
        effective_year: 2021,
        predecessors: &[("Vught", 1.0), ("Haaren", 0.25)],
    },
    MergerRule {
        successor: "Oisterwijk",
        effective_year: 2021,
        predecessors: &[("Oisterwijk", 1.0), ("Haaren", 0.25)],
    },
    MergerRule {
        successor: "Dijk en Waard",
        effective_year: 2022,
        predecessors: &[("Heerhugowaard", 1.0), ("Langedijk", 1.0)],
    },
    MergerRule {
        successor: "Land van Cuijk",
        effective_year: 2022,
        predecessors: &[
            ("Boxmeer", 1.0),
            ("Cuijk", 1.0),
            ("Grave", 1.0),
            ("Mill en Sint Hubert", 1.0),
            ("Sint Anthonis", 1.0),
        ],
    },
    MergerRule {
        successor: "Purmerend",
        effective_year: 2022,
        predecessors: &[("Beemster", 1.0), ("Purmerend", 1.0)],
    },
    MergerRule {
        successor: "Amsterdam",
        effective_year: 2022,
        predecessors: &[("Amsterdam", 1.0), ("Weesp", 1.0)],
    },
    MergerRule {
        successor: "Maashorst",
        effective_year: 2022,
        predecessors: &[("Landerd", 1.0), ("Uden", 1.0)],
    },
    // Effective 2023; keyed 2022 so records from the transition year fold.
    MergerRule {
        successor: "Voorne aan Zee",
        effective_year: 2022,
        predecessors: &[
            ("Brielle", 1.0),
            ("Hellevoetsluis", 1.0),
            ("Westvoorne", 1.0),
        ],
    },
];

/// A per-year value series indexed by municipality name.
pub type MunicipalitySeries = BTreeMap<String, f64>;

/// Folds predecessor municipalities into their successors for a series of
/// `year` data. A rule applies when `year <= effective_year`: records are
/// keyed by the names current at record time, so for later years the
/// predecessors simply never occur and the rule is a natural no-op.
///
/// Contributions are read against the pre-reconciliation values and
/// predecessors are removed only after every rule has been processed.
/// This keeps a predecessor that is split across several rules visible to
/// each of them, and makes a municipality listed as its own predecessor
/// with weight 1 fold onto itself unchanged. Contributions to the same
/// successor accumulate across rules in table-declaration order.
///
/// Never errors: a predecessor absent from the series is a silent no-op.
pub fn apply_mergers(series: &MunicipalitySeries, year: i32, rules: &[MergerRule]) -> MunicipalitySeries {
    let mut folded: BTreeMap<&str, f64> = BTreeMap::new();
    let mut consumed: BTreeSet<&str> = BTreeSet::new();

    for rule in rules {
        if year > rule.effective_year {
            continue;
        }
        for (predecessor, weight) in rule.predecessors {
            let Some(value) = series.get(*predecessor) else {
                continue;
            };
            *folded.entry(rule.successor).or_insert(0.0) += weight * value;
            consumed.insert(*predecessor);
        }
    }

    let mut out: MunicipalitySeries = series
        .iter()
        .filter(|(name, _)| !consumed.contains(name.as_str()))
        .map(|(name, value)| (name.clone(), *value))
        .collect();

    for (successor, contribution) in folded {
        *out.entry(successor.to_string()).or_insert(0.0) += contribution;
    }

    out
}

/// Applies the shared [`MERGER_RULES`] table.
pub fn apply_merger_rules(series: &MunicipalitySeries, year: i32) -> MunicipalitySeries {
    apply_mergers(series, year, MERGER_RULES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(entries: &[(&str, f64)]) -> MunicipalitySeries {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_single_predecessor_conservation() {
        // Meierijstad 2017: three weight-1 predecessors, successor name new.
        let input = series(&[
            ("Schijndel", 10.0),
            ("Sint-Oedenrode", 20.0),
            ("Veghel", 30.0),
            ("Utrecht", 5.0),
        ]);
        let out = apply_merger_rules(&input, 2017);

        assert_eq!(out.get("Meierijstad"), Some(&60.0));
        assert!(!out.contains_key("Schijndel"));
        assert!(!out.contains_key("Sint-Oedenrode"));
        assert!(!out.contains_key("Veghel"));
        assert_eq!(out.get("Utrecht"), Some(&5.0));
    }

    #[test]
    fn test_idempotent_on_reconciled_series() {
        let input = series(&[("Meierijstad", 60.0), ("Utrecht", 5.0)]);
        let out = apply_merger_rules(&input, 2017);
        assert_eq!(out, input);
    }

    #[test]
    fn test_rule_is_noop_after_effective_year() {
        // 2018 data no longer contains the Meierijstad predecessors, and
        // even if it did, the 2017 rule must not fire for year 2018.
        let input = series(&[("Schijndel", 10.0), ("Meierijstad", 60.0)]);
        let out = apply_mergers(
            &input,
            2018,
            &[MergerRule {
                successor: "Meierijstad",
                effective_year: 2017,
                predecessors: &[("Schijndel", 1.0)],
            }],
        );
        assert_eq!(out, input);
    }

    #[test]
    fn test_haaren_four_way_split() {
        let input = series(&[
            ("Boxtel", 200.0),
            ("Tilburg", 300.0),
            ("Vught", 400.0),
            ("Oisterwijk", 500.0),
            ("Haaren", 100.0),
        ]);
        let out = apply_merger_rules(&input, 2020);

        assert_eq!(out.get("Boxtel"), Some(&225.0));
        assert_eq!(out.get("Tilburg"), Some(&325.0));
        assert_eq!(out.get("Vught"), Some(&425.0));
        assert_eq!(out.get("Oisterwijk"), Some(&525.0));
        assert!(!out.contains_key("Haaren"));
    }

    #[test]
    fn test_littenseradiel_split_conserves_total() {
        let original = 1234.5;
        let input = series(&[("Littenseradiel", original)]);
        let out = apply_merger_rules(&input, 2017);

        let attributed: f64 = out.get("Leeuwarden").copied().unwrap_or(0.0)
            + out.get("Waadhoeke").copied().unwrap_or(0.0)
            + out.get("Súdwest-Fryslân").copied().unwrap_or(0.0);
        assert!((attributed - original).abs() < 1e-9);
        assert!(!out.contains_key("Littenseradiel"));
    }

    #[test]
    fn test_winsum_literal_weights() {
        // Winsum's weights sum to 0.9997 in the historical table; they must
        // not be normalized.
        let input = series(&[("Winsum", 1000.0)]);
        let out = apply_merger_rules(&input, 2018);

        let hogeland = out.get("Het Hogeland").copied().unwrap();
        let westerkwartier = out.get("Westerkwartier").copied().unwrap();
        assert!((hogeland - 884.0).abs() < 1e-9);
        assert!((westerkwartier - 115.7).abs() < 1e-9);
        // The 0.03% remainder is not reallocated.
        assert!((hogeland + westerkwartier - 999.7).abs() < 1e-9);
        assert!(!out.contains_key("Winsum"));
    }

    #[test]
    fn test_self_referential_predecessor() {
        // Amsterdam absorbs Weesp in 2022 and is listed as its own
        // predecessor; its own value must not double.
        let input = series(&[("Amsterdam", 500.0), ("Weesp", 50.0)]);
        let out = apply_merger_rules(&input, 2022);

        assert_eq!(out.get("Amsterdam"), Some(&550.0));
        assert!(!out.contains_key("Weesp"));
    }

    #[test]
    fn test_missing_predecessor_is_noop() {
        // Partial taakveld coverage: only one of Meierijstad's predecessors
        // reported a value. No error, the present one folds.
        let input = series(&[("Veghel", 30.0)]);
        let out = apply_merger_rules(&input, 2017);
        assert_eq!(out.get("Meierijstad"), Some(&30.0));
    }

    #[test]
    fn test_empty_series() {
        let out = apply_merger_rules(&MunicipalitySeries::new(), 2017);
        assert!(out.is_empty());
    }

    #[test]
    fn test_haaren_lone_record_splits_evenly() {
        // Record year 2020, reconciled at 2021 rules: 100 split as 4 x 25.
        let input = series(&[("Haaren", 100.0)]);
        let out = apply_merger_rules(&input, 2020);

        for successor in ["Boxtel", "Tilburg", "Vught", "Oisterwijk"] {
            assert_eq!(out.get(successor), Some(&25.0), "{successor}");
        }
        assert!(!out.contains_key("Haaren"));
    }
}
