use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::HansenCoordinate;
use crate::view::ScoredSolvent;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPolicy {
    /// Threshold the first step must beat when no seed solvent is given.
    pub min_score: f64,
    /// Secondary bound on search iterations; the strictly rising threshold
    /// already ends the search.
    pub max_steps: usize,
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self {
            min_score: 1.0,
            max_steps: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    /// 1-based label shown next to the solvent.
    pub position: usize,
    pub name: String,
    pub coordinate: HansenCoordinate,
    pub distance: f64,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedPath {
    pub steps: Vec<PathStep>,
    pub reason: &'static str,
}

impl SuggestedPath {
    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Keeps the `limit` nearest steps and renumbers them from 1.
    pub fn truncate(&mut self, limit: usize) {
        self.steps.truncate(limit);
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.position = i + 1;
        }
    }
}

pub struct PathSuggester {
    policy: PathPolicy,
}

impl PathSuggester {
    pub fn new(policy: PathPolicy) -> Self {
        Self { policy }
    }

    /// Greedy walk towards greener solvents: each step takes the nearest
    /// candidate whose score beats the previous step. Candidates sitting on
    /// the reference (distance 0) are never taken. The result is ordered by
    /// distance, ties in selection order.
    pub fn suggest(
        &self,
        candidates: &[ScoredSolvent],
        seed: Option<&ScoredSolvent>,
    ) -> Result<SuggestedPath, CoreError> {
        let seed_undefined = seed.is_some_and(|s| s.distance.is_none());
        if seed_undefined || candidates.iter().any(|c| c.distance.is_none()) {
            log::warn!("path requested without solute coordinates");
            return Err(CoreError::SoluteUndefined);
        }

        let mut chosen: Vec<&ScoredSolvent> = seed.into_iter().collect();
        // An unscored seed cannot be beaten, so the path is the seed alone.
        let reason = match seed {
            Some(s) if s.score.is_none() => "seed_unscored",
            _ => self.walk(candidates, seed, &mut chosen),
        };

        chosen.sort_by(|a, b| cmp_distance(a, b));
        let steps = chosen
            .into_iter()
            .enumerate()
            .map(|(i, s)| PathStep {
                position: i + 1,
                name: s.record.name.clone(),
                coordinate: s.record.coordinate,
                distance: s.distance.unwrap_or_default(),
                score: s.score,
            })
            .collect::<Vec<_>>();
        log::debug!("suggested path of {} steps ({reason})", steps.len());

        Ok(SuggestedPath { steps, reason })
    }

    fn walk<'a>(
        &self,
        candidates: &'a [ScoredSolvent],
        seed: Option<&ScoredSolvent>,
        chosen: &mut Vec<&'a ScoredSolvent>,
    ) -> &'static str {
        let mut threshold = seed
            .and_then(|s| s.score)
            .unwrap_or(self.policy.min_score);
        let mut taken = 0;
        loop {
            let next = candidates
                .iter()
                .filter(|c| c.score.is_some_and(|s| s > threshold))
                .filter(|c| c.distance.is_some_and(|d| d > 0.0))
                .min_by(|a, b| cmp_distance(a, b));
            let Some(next) = next else {
                return "no_greener_candidate";
            };
            if taken == self.policy.max_steps {
                log::warn!(
                    "path search hit step cap of {} with {} steps",
                    self.policy.max_steps,
                    chosen.len()
                );
                return "step_cap_reached";
            }
            threshold = next.score.unwrap_or(threshold);
            chosen.push(next);
            taken += 1;
        }
    }
}

impl Default for PathSuggester {
    fn default() -> Self {
        Self::new(PathPolicy::default())
    }
}

fn cmp_distance(a: &ScoredSolvent, b: &ScoredSolvent) -> Ordering {
    let da = a.distance.unwrap_or(f64::INFINITY);
    let db = b.distance.unwrap_or(f64::INFINITY);
    da.total_cmp(&db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SolventRecord;

    fn candidate(name: &str, dispersion: f64, distance: Option<f64>, score: f64) -> ScoredSolvent {
        ScoredSolvent {
            record: SolventRecord::new(name, "", HansenCoordinate::new(dispersion, 0.0, 0.0)),
            distance,
            baseline_score: Some(score),
            score: Some(score),
        }
    }

    #[test]
    fn walks_from_seed_to_greener_neighbours() {
        let x = candidate("X", 1.0, Some(0.0), 4.0);
        let y = candidate("Y", 2.0, Some(2.0), 6.0);
        let z = candidate("Z", 10.0, Some(18.0), 9.0);
        let table = vec![x.clone(), y, z];

        let path = PathSuggester::default()
            .suggest(&table, Some(&x))
            .expect("path");
        assert_eq!(path.names(), vec!["X", "Y", "Z"]);
        assert_eq!(
            path.steps.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(path.reason, "no_greener_candidate");
    }

    #[test]
    fn skips_nearer_but_less_green_candidates() {
        let seed = candidate("seed", 0.0, Some(0.0), 5.0);
        let table = vec![
            candidate("near-dirty", 0.1, Some(0.2), 4.0),
            candidate("mid-green", 1.0, Some(2.0), 7.0),
            candidate("mid-greener", 1.5, Some(3.0), 6.5),
            candidate("far-greenest", 5.0, Some(10.0), 8.0),
        ];
        let path = PathSuggester::default()
            .suggest(&table, Some(&seed))
            .expect("path");
        assert_eq!(path.names(), vec!["seed", "mid-green", "far-greenest"]);
    }

    #[test]
    fn without_seed_starts_from_min_score() {
        let table = vec![
            candidate("a", 1.0, Some(1.0), 0.5),
            candidate("b", 2.0, Some(2.0), 3.0),
            candidate("c", 3.0, Some(3.0), 2.0),
        ];
        let path = PathSuggester::default().suggest(&table, None).expect("path");
        assert_eq!(path.names(), vec!["b"]);

        let strict = PathSuggester::new(PathPolicy {
            min_score: 5.0,
            ..PathPolicy::default()
        });
        assert!(strict.suggest(&table, None).expect("path").is_empty());
    }

    #[test]
    fn zero_distance_candidates_are_skipped() {
        let table = vec![
            candidate("on-reference", 0.0, Some(0.0), 9.0),
            candidate("away", 1.0, Some(2.0), 3.0),
        ];
        let path = PathSuggester::default().suggest(&table, None).expect("path");
        assert_eq!(path.names(), vec!["away"]);
    }

    #[test]
    fn equal_distance_tie_keeps_table_order() {
        let table = vec![
            candidate("first", 1.0, Some(2.0), 6.0),
            candidate("second", 1.0, Some(2.0), 8.0),
        ];
        let path = PathSuggester::default().suggest(&table, None).expect("path");
        assert_eq!(path.names(), vec!["first", "second"]);
    }

    #[test]
    fn scores_strictly_increase_along_path() {
        let table: Vec<ScoredSolvent> = (0..40_u32)
            .map(|i| {
                let d = f64::from(i);
                let score = f64::from((i * 7) % 10) + 0.5;
                candidate(&format!("s{i}"), d, Some(d + 0.5), score)
            })
            .collect();
        let path = PathSuggester::default().suggest(&table, None).expect("path");
        assert!(path.steps.len() <= table.len());
        for pair in path.steps.windows(2) {
            if let [a, b] = pair {
                assert!(b.score > a.score);
                assert!(b.distance >= a.distance);
            }
        }
    }

    #[test]
    fn undefined_distance_is_a_precondition_failure() {
        let table = vec![
            candidate("a", 1.0, None, 5.0),
            candidate("b", 2.0, None, 6.0),
        ];
        assert_eq!(
            PathSuggester::default().suggest(&table, None),
            Err(CoreError::SoluteUndefined)
        );
    }

    #[test]
    fn step_cap_bounds_the_walk() {
        let table = vec![
            candidate("a", 1.0, Some(1.0), 2.0),
            candidate("b", 2.0, Some(2.0), 3.0),
            candidate("c", 3.0, Some(3.0), 4.0),
        ];
        let capped = PathSuggester::new(PathPolicy {
            max_steps: 2,
            ..PathPolicy::default()
        });
        let path = capped.suggest(&table, None).expect("path");
        assert_eq!(path.names(), vec!["a", "b"]);
        assert_eq!(path.reason, "step_cap_reached");
    }

    #[test]
    fn last_step_on_cap_is_not_a_cap_hit() {
        let table = vec![
            candidate("a", 1.0, Some(1.0), 2.0),
            candidate("b", 2.0, Some(2.0), 3.0),
            candidate("c", 3.0, Some(3.0), 4.0),
        ];
        let exact = PathSuggester::new(PathPolicy {
            max_steps: 3,
            ..PathPolicy::default()
        });
        let path = exact.suggest(&table, None).expect("path");
        assert_eq!(path.names(), vec!["a", "b", "c"]);
        assert_eq!(path.reason, "no_greener_candidate");
    }

    #[test]
    fn unscored_seed_ends_path_at_seed() {
        let mut seed = candidate("seed", 0.0, Some(0.0), 0.0);
        seed.score = None;
        let table = vec![seed.clone(), candidate("g", 1.0, Some(2.0), 3.0)];
        let path = PathSuggester::default()
            .suggest(&table, Some(&seed))
            .expect("path");
        assert_eq!(path.names(), vec!["seed"]);
        assert_eq!(path.reason, "seed_unscored");
    }

    #[test]
    fn truncate_keeps_nearest_and_renumbers() {
        let table = vec![
            candidate("a", 1.0, Some(1.0), 2.0),
            candidate("b", 2.0, Some(2.0), 3.0),
            candidate("c", 3.0, Some(3.0), 4.0),
        ];
        let mut path = PathSuggester::default().suggest(&table, None).expect("path");
        path.truncate(2);
        assert_eq!(path.names(), vec!["a", "b"]);
        assert_eq!(
            path.steps.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![1, 2]
        );
        path.truncate(10);
        assert_eq!(path.steps.len(), 2);
    }
}
