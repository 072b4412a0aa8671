//! Fixed-vocabulary sensitivity classification
//!
//! Text is lowercased and scanned for every vocabulary term as a plain
//! substring. There is no word-boundary check: a longer word containing a
//! term still matches (e.g. "dextroamphetamine" also yields "amphetamine").

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Controlled substances and other terms that make a row sensitive
pub const SENSITIVE_TERMS: &[&str] = &[
    "fentanyl",
    "oxycodone",
    "morphine",
    "heroin",
    "cocaine",
    "methamphetamine",
    "amphetamine",
    "ketamine",
    "pcp",
    "ecstasy",
    "lsd",
    "mdma",
    "modafinil",
    "clonazepam",
    "alprazolam",
    "zolpidem",
    "gabapentin",
    "pregabalin",
    "psilocybin",
    "dxm",
    "lorazepam",
    "diazepam",
    "dextroamphetamine",
    "methylphenidate",
    "tramadol",
    "tapentadol",
];

/// Common medications recorded as explicitly non-sensitive
pub const NON_SENSITIVE_TERMS: &[&str] = &[
    "aspirin",
    "ibuprofen",
    "acetaminophen",
    "paracetamol",
    "naproxen",
    "celecoxib",
    "amoxicillin",
    "azithromycin",
    "ciprofloxacin",
    "doxycycline",
    "metronidazole",
    "loratadine",
    "cetirizine",
    "fexofenadine",
    "diphenhydramine",
    "atorvastatin",
    "metformin",
    "lisinopril",
    "levothyroxine",
    "sertraline",
    "omeprazole",
    "ranitidine",
    "loperamide",
    "vitamin",
    "calcium",
];

/// Term → sensitivity verdicts collected from one or more text fragments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classification(BTreeMap<String, bool>);

impl Classification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a verdict unless the term already has one
    pub fn insert_if_absent(&mut self, term: impl Into<String>, sensitive: bool) {
        self.0.entry(term.into()).or_insert(sensitive);
    }

    /// Merge another classification; verdicts already present are kept
    pub fn merge(&mut self, other: Classification) {
        for (term, sensitive) in other.0 {
            self.insert_if_absent(term, sensitive);
        }
    }

    /// Verdict for a term, if it has been seen
    pub fn get(&self, term: &str) -> Option<bool> {
        self.0.get(term).copied()
    }

    /// True if any recorded term is sensitive
    pub fn is_sensitive(&self) -> bool {
        self.0.values().any(|sensitive| *sensitive)
    }

    pub fn sensitive_terms(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, sensitive)| **sensitive)
            .map(|(term, _)| term.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(term, sensitive)| (term.as_str(), *sensitive))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Classify a text fragment against both vocabularies
///
/// Every term found (case-insensitively, as a substring) gets one entry with
/// its fixed verdict. Terms absent from the text produce no entry.
pub fn classify(text: &str) -> Classification {
    let haystack = text.to_lowercase();
    let mut classification = Classification::new();

    let vocabulary = SENSITIVE_TERMS
        .iter()
        .map(|term| (*term, true))
        .chain(NON_SENSITIVE_TERMS.iter().map(|term| (*term, false)));

    for (term, sensitive) in vocabulary {
        if haystack.contains(term) {
            classification.insert_if_absent(term, sensitive);
        }
    }

    classification
}
