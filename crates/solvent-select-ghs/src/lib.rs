use std::collections::BTreeMap;

use serde::Serialize;
use solvent_select_core::LabelSet;
use thiserror::Error;

pub const BUILTIN_STATEMENTS_TSV: &str = include_str!("../../../data/ghs/statements.tsv");

pub const COMPOSITE_SEPARATOR: char = '+';
pub const UNKNOWN_STATEMENT: &str = "[unknown statement]";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatementError {
    #[error("malformed statement line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("duplicate statement code: {0}")]
    Duplicate(String),
}

/// One rendered hazard or precaution line: the code as written on the
/// solvent and its full text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementLine {
    pub code: String,
    pub text: String,
    pub known: bool,
}

/// Read-only lookup from hazard/precaution code to its full text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementTable {
    entries: BTreeMap<String, String>,
}

impl StatementTable {
    /// The GHS statements bundled with the crate.
    pub fn builtin() -> Result<Self, StatementError> {
        Self::parse_tsv(BUILTIN_STATEMENTS_TSV)
    }

    /// Parses `code<TAB>text` lines. Blank lines and `#` comments are skipped.
    pub fn parse_tsv(raw: &str) -> Result<Self, StatementError> {
        let mut entries = BTreeMap::new();
        for (idx, line) in raw.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((code, text)) = trimmed.split_once('\t') else {
                return Err(StatementError::Malformed {
                    line: idx + 1,
                    reason: "expected code and text separated by a tab".to_string(),
                });
            };
            let (code, text) = (code.trim(), text.trim());
            if code.is_empty() || text.is_empty() {
                return Err(StatementError::Malformed {
                    line: idx + 1,
                    reason: "empty code or text".to_string(),
                });
            }
            if entries.insert(code.to_string(), text.to_string()).is_some() {
                return Err(StatementError::Duplicate(code.to_string()));
            }
        }
        Ok(Self { entries })
    }

    pub fn from_pairs<I, C, T>(pairs: I) -> Result<Self, StatementError>
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<String>,
        T: Into<String>,
    {
        let mut entries = BTreeMap::new();
        for (code, text) in pairs {
            let code = code.into();
            if entries.contains_key(&code) {
                return Err(StatementError::Duplicate(code));
            }
            entries.insert(code, text.into());
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn text(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// Full text for a single or `+`-joined code. Parts of a composite code
    /// apply jointly, so their texts are concatenated in order.
    pub fn describe(&self, code: &str) -> StatementLine {
        let mut known = true;
        let parts = code
            .split(COMPOSITE_SEPARATOR)
            .map(|part| {
                self.text(part).unwrap_or_else(|| {
                    log::warn!("no statement text for code {part}");
                    known = false;
                    UNKNOWN_STATEMENT
                })
            })
            .collect::<Vec<_>>();
        StatementLine {
            code: code.to_string(),
            text: parts.join(" "),
            known,
        }
    }

    /// One line per code in the label set; sentinel sets yield a single line.
    pub fn describe_labels(&self, labels: &LabelSet) -> Vec<StatementLine> {
        match labels {
            LabelSet::Codes(codes) => codes.iter().map(|c| self.describe(c)).collect(),
            LabelSet::NoData | LabelSet::NotHazardous => vec![self.describe(&labels.to_string())],
        }
    }

    /// Hazard codes (`H…`, `EUH…`) a caller may offer for exclusion.
    pub fn hazard_codes(&self) -> Vec<&str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|code| is_hazard_code(code))
            .collect()
    }
}

fn is_hazard_code(code: &str) -> bool {
    let digits = code
        .strip_prefix("EUH")
        .or_else(|| code.strip_prefix('H'));
    digits.is_some_and(|rest| rest.chars().next().is_some_and(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_parses() {
        let table = StatementTable::builtin().expect("builtin statements");
        assert!(table.len() > 100);
        assert_eq!(table.text("H225"), Some("Highly flammable liquid and vapour."));
        assert!(table.text("No Data").is_some());
    }

    #[test]
    fn composite_codes_concatenate_parts() {
        let table = StatementTable::from_pairs([
            ("P305", "IF IN EYES:"),
            ("P351", "Rinse cautiously with water for several minutes."),
        ])
        .expect("table");
        let line = table.describe("P305+P351");
        assert!(line.known);
        assert_eq!(
            line.text,
            "IF IN EYES: Rinse cautiously with water for several minutes."
        );
    }

    #[test]
    fn unknown_part_is_marked() {
        let table = StatementTable::from_pairs([("P305", "IF IN EYES:")]).expect("table");
        let line = table.describe("P305+P999");
        assert!(!line.known);
        assert!(line.text.ends_with(UNKNOWN_STATEMENT));
    }

    #[test]
    fn sentinel_labels_render_single_line() {
        let table = StatementTable::builtin().expect("builtin statements");
        let lines = table.describe_labels(&LabelSet::NotHazardous);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.code.as_str()), Some("Not Hazardous"));
        assert!(lines.iter().all(|l| l.known));
    }

    #[test]
    fn hazard_codes_exclude_precautions_and_sentinels() {
        let table = StatementTable::builtin().expect("builtin statements");
        let codes = table.hazard_codes();
        assert!(codes.contains(&"H319"));
        assert!(codes.contains(&"EUH066"));
        assert!(!codes.iter().any(|c| c.starts_with('P')));
        assert!(!codes.contains(&"No Data"));
    }

    #[test]
    fn rejects_malformed_and_duplicate_lines() {
        assert!(matches!(
            StatementTable::parse_tsv("H225 no tab here"),
            Err(StatementError::Malformed { line: 1, .. })
        ));
        assert_eq!(
            StatementTable::parse_tsv("H225\ta\nH225\tb"),
            Err(StatementError::Duplicate("H225".to_string()))
        );
    }
}
