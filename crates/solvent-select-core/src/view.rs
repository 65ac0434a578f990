use serde::{Deserialize, Serialize};

use crate::distance::{distances, ReferencePoint};
use crate::model::{HansenCoordinate, SolventRecord};
use crate::score::{CompositeScorer, ScoreSelection};

/// A record together with the values derived for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSolvent {
    pub record: SolventRecord,
    /// Ra to the current reference.
    pub distance: Option<f64>,
    /// Score with every group and metric included.
    pub baseline_score: Option<f64>,
    /// Score for the current group selection.
    pub score: Option<f64>,
}

impl ScoredSolvent {
    pub fn name(&self) -> &str {
        &self.record.name
    }
}

/// Request-scoped derived columns over the shared, read-only table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredView {
    pub reference: Option<HansenCoordinate>,
    pub rows: Vec<ScoredSolvent>,
}

impl ScoredView {
    pub fn compute(
        records: &[SolventRecord],
        baseline_scores: &[Option<f64>],
        reference: &ReferencePoint,
        selection: &ScoreSelection,
        scorer: &CompositeScorer,
    ) -> Self {
        let ras = distances(records, reference);
        let rows = records
            .iter()
            .zip(ras)
            .enumerate()
            .map(|(idx, (record, distance))| ScoredSolvent {
                record: record.clone(),
                distance,
                baseline_score: baseline_scores.get(idx).copied().flatten(),
                score: scorer.score(record, selection),
            })
            .collect();
        Self {
            reference: reference.resolve(),
            rows,
        }
    }

    pub fn has_reference(&self) -> bool {
        self.reference.is_some()
    }

    pub fn scores(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.score).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ScoredSolvent> {
        self.rows.iter().find(|r| r.record.name == name)
    }

    /// Rows whose mask entry is true, in table order.
    pub fn retain(&self, mask: &[bool]) -> Vec<ScoredSolvent> {
        self.rows
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(row, _)| row.clone())
            .collect()
    }
}
