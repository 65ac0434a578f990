use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use solvent_select_core::{
    CompositeScorer, PhysicalProperty, ScoreGroups, ScoredSolvent, SolventRecord,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("duplicate solvent name: {0}")]
    DuplicateName(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Dataset {
    solvents: Vec<SolventRecord>,
}

/// The solvent set for one load. Records are immutable once loaded; derived
/// values live in per-request views.
#[derive(Debug, Clone)]
pub struct SolventTable {
    records: Vec<SolventRecord>,
    index: HashMap<String, usize>,
    baseline_scores: Vec<Option<f64>>,
}

impl SolventTable {
    pub fn open(
        path: impl AsRef<Path>,
        groups: &ScoreGroups,
        scorer: &CompositeScorer,
    ) -> Result<Self, TableError> {
        let bytes = fs::read(path.as_ref())?;
        let dataset: Dataset = serde_json::from_slice(&bytes)?;
        log::debug!(
            "loaded {} solvents from {}",
            dataset.solvents.len(),
            path.as_ref().display()
        );
        Self::from_records(dataset.solvents, groups, scorer)
    }

    pub fn from_json(
        raw: &str,
        groups: &ScoreGroups,
        scorer: &CompositeScorer,
    ) -> Result<Self, TableError> {
        let dataset: Dataset = serde_json::from_str(raw)?;
        Self::from_records(dataset.solvents, groups, scorer)
    }

    /// Indexes the records by name and computes the baseline score with
    /// every group and metric included.
    pub fn from_records(
        records: Vec<SolventRecord>,
        groups: &ScoreGroups,
        scorer: &CompositeScorer,
    ) -> Result<Self, TableError> {
        let mut index = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(TableError::InvalidInput(format!(
                    "solvent at row {idx} has no name"
                )));
            }
            if index.insert(record.name.clone(), idx).is_some() {
                return Err(TableError::DuplicateName(record.name.clone()));
            }
        }
        let baseline_scores = scorer.scores(&records, &groups.full_selection());
        Ok(Self {
            records,
            index,
            baseline_scores,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SolventRecord] {
        &self.records
    }

    pub fn baseline_scores(&self) -> &[Option<f64>] {
        &self.baseline_scores
    }

    pub fn get(&self, name: &str) -> Option<&SolventRecord> {
        self.index.get(name).and_then(|idx| self.records.get(*idx))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Smallest and largest defined value of a property across the table.
    pub fn property_span(&self, property: PhysicalProperty) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.property(property))
            .fold(None, |span, v| match span {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Distance,
    Score,
    BaselineScore,
    Name,
    MeltingPoint,
    BoilingPoint,
    Viscosity,
    SurfaceTension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortOrder {
    #[serde(default)]
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// Keeps masked-in rows, sorts them and truncates to `limit`.
///
/// Missing sort values go last in either direction; equal values keep table
/// order. A `limit` of `None` returns every surviving row.
pub fn rank_solvents(
    rows: &[ScoredSolvent],
    mask: &[bool],
    order: SortOrder,
    limit: Option<usize>,
) -> Vec<ScoredSolvent> {
    let mut kept = rows
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(row, _)| row)
        .collect::<Vec<_>>();

    kept.sort_by(|a, b| compare_rows(a, b, order));

    let limit = limit.unwrap_or(kept.len());
    kept.into_iter().take(limit).cloned().collect()
}

fn compare_rows(a: &ScoredSolvent, b: &ScoredSolvent, order: SortOrder) -> Ordering {
    let ordering = match order.key {
        SortKey::Name => Some(a.record.name.cmp(&b.record.name)),
        _ => compare_missing_last(sort_value(a, order.key), sort_value(b, order.key)),
    };
    match (ordering, order.direction) {
        (Some(o), SortDirection::Ascending) => o,
        (Some(o), SortDirection::Descending) => o.reverse(),
        (None, _) => missing_last(sort_value(a, order.key), sort_value(b, order.key)),
    }
}

fn sort_value(row: &ScoredSolvent, key: SortKey) -> Option<f64> {
    match key {
        SortKey::Distance => row.distance,
        SortKey::Score => row.score,
        SortKey::BaselineScore => row.baseline_score,
        SortKey::Name => None,
        SortKey::MeltingPoint => row.record.property(PhysicalProperty::MeltingPoint),
        SortKey::BoilingPoint => row.record.property(PhysicalProperty::BoilingPoint),
        SortKey::Viscosity => row.record.property(PhysicalProperty::Viscosity),
        SortKey::SurfaceTension => row.record.property(PhysicalProperty::SurfaceTension),
    }
}

/// Direction-sensitive comparison when both values are present.
fn compare_missing_last(a: Option<f64>, b: Option<f64>) -> Option<Ordering> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.total_cmp(&y)),
        _ => None,
    }
}

/// Direction-independent placement of missing values.
fn missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
