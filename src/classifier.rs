//! Maps fine-grained taakveld codes to the coarse policy-domain groups the
//! dashboard compares on.

/// A named policy-domain bucket and the taakveld code prefixes it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainGroup {
    pub name: &'static str,
    pub prefixes: &'static [&'static str],
}

/// The ordered group table. Prefixes are curated to be non-overlapping;
/// matching is first-wins in table order and no overlap detection is done,
/// so historical results stay reproducible.
///
/// Note the trailing space in "0.1 ": it keeps 0.10..0.19 out of the
/// Bestuur en burgerzaken bucket.
pub const DOMAIN_GROUPS: &[DomainGroup] = &[
    DomainGroup {
        name: "Bestuur en burgerzaken",
        prefixes: &["0.1 ", "0.2"],
    },
    DomainGroup {
        name: "Overhead",
        prefixes: &["0.4"],
    },
    DomainGroup {
        name: "Belastingen",
        prefixes: &["0.6"],
    },
    DomainGroup {
        name: "Gemeentefonds",
        prefixes: &["0.7"],
    },
    DomainGroup {
        name: "Overig bestuur en ondersteuning",
        prefixes: &["0.3", "0.5", "0.8", "0.9"],
    },
    DomainGroup {
        name: "Veiligheid",
        prefixes: &["1."],
    },
    DomainGroup {
        name: "Verkeer en vervoer",
        prefixes: &["2."],
    },
    DomainGroup {
        name: "Economie",
        prefixes: &["3."],
    },
    DomainGroup {
        name: "Onderwijs",
        prefixes: &["4."],
    },
    DomainGroup {
        name: "SCR",
        prefixes: &["5."],
    },
    DomainGroup {
        name: "Algemene voorzieningen",
        prefixes: &["6.1", "6.2"],
    },
    DomainGroup {
        name: "Inkomensregelingen",
        prefixes: &["6.3"],
    },
    DomainGroup {
        name: "Participatie",
        prefixes: &["6.4", "6.5"],
    },
    DomainGroup {
        name: "Maatwerk Wmo",
        prefixes: &["6.6", "6.71", "6.81"],
    },
    DomainGroup {
        name: "Maatwerk Jeugd",
        prefixes: &["6.72", "6.73", "6.74", "6.82"],
    },
    DomainGroup {
        name: "Volksgezondheid en milieu",
        prefixes: &["7."],
    },
    DomainGroup {
        name: "Grondexploitatie",
        prefixes: &["8.2"],
    },
    DomainGroup {
        name: "Wonen en bouwen",
        prefixes: &["8.1", "8.3"],
    },
];

/// Balance-sheet (Activa/Passiva) codes carry no operational spending and
/// are filtered out before classification.
pub fn is_balance_sheet_code(taakveld: &str) -> bool {
    taakveld.starts_with('A') || taakveld.starts_with('P')
}

/// Ordered prefix classifier over a domain-group table.
#[derive(Debug, Clone)]
pub struct TaakveldClassifier {
    groups: Vec<DomainGroup>,
}

impl Default for TaakveldClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TaakveldClassifier {
    pub fn new() -> Self {
        Self {
            groups: DOMAIN_GROUPS.to_vec(),
        }
    }

    pub fn with_groups(groups: Vec<DomainGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[DomainGroup] {
        &self.groups
    }

    /// Returns the first group whose prefix matches, in table order.
    /// Non-totalizing: `None` means the code is unclassified.
    pub fn classify(&self, taakveld: &str) -> Option<&'static str> {
        self.classify_entry(taakveld).map(|(_, name)| name)
    }

    /// As [`classify`](Self::classify), but also yields the group's table
    /// position for callers that key output on table order.
    pub fn classify_entry(&self, taakveld: &str) -> Option<(usize, &'static str)> {
        self.groups
            .iter()
            .position(|group| group.prefixes.iter().any(|p| taakveld.starts_with(p)))
            .map(|idx| (idx, self.groups[idx].name))
    }
}
