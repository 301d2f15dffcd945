//! Duration-column detection.
//!
//! Exports are inconsistent about the duration header: accents come and go,
//! spaces turn into underscores, and some sheets only say "TIEMPO". Passes
//! run in priority order over every column; the first hit wins.

use serde::Serialize;

use crate::types::Dataset;

const EXACT_NAMES: &[&str] = &[
    "DURACION EN MINUTOS",
    "DURACIÓN EN MINUTOS",
    "DURACION_EN_MINUTOS",
    "duracion en minutos",
    "Duracion en Minutos",
];

const DURATION_AND_MINUTES: &[&str] = &["DURACION", "MINUTO"];

const TIME_TOKENS: &[&str] = &["TIEMPO", "MINUTO", "DURACION", "DURATION"];

/// Which pass located the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchRule {
    /// Trimmed header is one of the known spellings.
    Exact,
    /// Upper-cased header mentions both duration and minutes.
    Contains,
    /// Header mentions a time word and the column holds numbers.
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ColumnResolution {
    Found {
        index: usize,
        header: String,
        rule: MatchRule,
    },
    NotFound,
}

impl ColumnResolution {
    pub fn index(&self) -> Option<usize> {
        match self {
            ColumnResolution::Found { index, .. } => Some(*index),
            ColumnResolution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.index().is_some()
    }
}

enum HeaderPredicate {
    ExactOneOf(&'static [&'static str]),
    ContainsAll(&'static [&'static str]),
    ContainsAnyWithNumbers(&'static [&'static str]),
}

const PASSES: [(MatchRule, HeaderPredicate); 3] = [
    (MatchRule::Exact, HeaderPredicate::ExactOneOf(EXACT_NAMES)),
    (MatchRule::Contains, HeaderPredicate::ContainsAll(DURATION_AND_MINUTES)),
    (MatchRule::Heuristic, HeaderPredicate::ContainsAnyWithNumbers(TIME_TOKENS)),
];

impl HeaderPredicate {
    fn matches(&self, dataset: &Dataset, index: usize) -> bool {
        let header = dataset.headers[index].trim();
        match self {
            HeaderPredicate::ExactOneOf(names) => names.contains(&header),
            HeaderPredicate::ContainsAll(tokens) => {
                let upper = header.to_uppercase();
                tokens.iter().all(|t| upper.contains(t))
            }
            HeaderPredicate::ContainsAnyWithNumbers(tokens) => {
                let upper = header.to_uppercase();
                tokens.iter().any(|t| upper.contains(t))
                    && dataset.column(index).any(|c| c.as_number().is_some())
            }
        }
    }
}

/// Locate the column holding event duration in minutes.
pub fn resolve_duration_column(dataset: &Dataset) -> ColumnResolution {
    for (rule, predicate) in &PASSES {
        for index in 0..dataset.headers.len() {
            if predicate.matches(dataset, index) {
                return ColumnResolution::Found {
                    index,
                    header: dataset.headers[index].clone(),
                    rule: *rule,
                };
            }
        }
    }
    ColumnResolution::NotFound
}
