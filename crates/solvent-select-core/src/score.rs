use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{round_to, SolventRecord};

pub const GROUP_COUNT: usize = 4;

pub const WASTE: &str = "Waste";
pub const HEALTH: &str = "Health";
pub const ENVIRONMENT: &str = "Environment";
pub const SAFETY: &str = "Safety";

pub const WASTE_METRICS: [&str; 4] = ["Incineration", "Recycling", "Biotreatment", "VOC Emissions"];
pub const HEALTH_METRICS: [&str; 2] = ["Health Hazard", "Exposure Potential"];
pub const ENVIRONMENT_METRICS: [&str; 2] = ["Aquatic Impact", "Air Impact"];
pub const SAFETY_METRICS: [&str; 2] = ["Flammability and Explosion", "Reactivity and Stability"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricGroup {
    pub name: String,
    pub metrics: Vec<String>,
}

impl MetricGroup {
    pub fn new(name: impl Into<String>, metrics: &[&str]) -> Self {
        Self {
            name: name.into(),
            metrics: metrics.iter().map(|m| (*m).to_string()).collect(),
        }
    }
}

/// The four sub-category groups; every raw metric belongs to exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreGroups {
    groups: Vec<MetricGroup>,
}

impl ScoreGroups {
    pub fn new(groups: Vec<MetricGroup>) -> Result<Self, CoreError> {
        if groups.len() != GROUP_COUNT {
            return Err(CoreError::InvalidGroups(format!(
                "expected {GROUP_COUNT} groups, got {}",
                groups.len()
            )));
        }
        let mut names = HashSet::new();
        let mut metrics = HashSet::new();
        for group in &groups {
            if !names.insert(group.name.as_str()) {
                return Err(CoreError::InvalidGroups(format!(
                    "duplicate group name {}",
                    group.name
                )));
            }
            if group.metrics.is_empty() {
                return Err(CoreError::InvalidGroups(format!(
                    "group {} has no metrics",
                    group.name
                )));
            }
            for metric in &group.metrics {
                if !metrics.insert(metric.as_str()) {
                    return Err(CoreError::InvalidGroups(format!(
                        "metric {metric} belongs to more than one group"
                    )));
                }
            }
        }
        Ok(Self { groups })
    }

    /// Waste, Health, Environment and Safety as used by the GSK solvent guide.
    pub fn gsk() -> Self {
        Self {
            groups: vec![
                MetricGroup::new(WASTE, &WASTE_METRICS),
                MetricGroup::new(HEALTH, &HEALTH_METRICS),
                MetricGroup::new(ENVIRONMENT, &ENVIRONMENT_METRICS),
                MetricGroup::new(SAFETY, &SAFETY_METRICS),
            ],
        }
    }

    pub fn groups(&self) -> &[MetricGroup] {
        &self.groups
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.metrics.iter().map(String::as_str))
    }

    pub fn full_selection(&self) -> ScoreSelection {
        ScoreSelection {
            groups: self.groups.clone(),
        }
    }

    /// Narrows groups to the picked metrics. A group missing from `picks`
    /// stays whole; a group mapped to an empty list is excluded.
    pub fn select(
        &self,
        picks: &BTreeMap<String, Vec<String>>,
    ) -> Result<ScoreSelection, CoreError> {
        if let Some(unknown) = picks
            .keys()
            .find(|name| !self.groups.iter().any(|g| &g.name == *name))
        {
            return Err(CoreError::UnknownGroup(unknown.clone()));
        }

        let mut groups = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let Some(picked) = picks.get(&group.name) else {
                groups.push(group.clone());
                continue;
            };
            if let Some(metric) = picked.iter().find(|m| !group.metrics.contains(*m)) {
                return Err(CoreError::UnknownMetric {
                    group: group.name.clone(),
                    metric: metric.clone(),
                });
            }
            groups.push(MetricGroup {
                name: group.name.clone(),
                metrics: group
                    .metrics
                    .iter()
                    .filter(|m| picked.contains(*m))
                    .cloned()
                    .collect(),
            });
        }
        Ok(ScoreSelection { groups })
    }
}

impl Default for ScoreGroups {
    fn default() -> Self {
        Self::gsk()
    }
}

/// Groups currently contributing to the user score. Empty groups are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSelection {
    pub groups: Vec<MetricGroup>,
}

impl ScoreSelection {
    pub fn active(&self) -> impl Iterator<Item = &MetricGroup> {
        self.groups.iter().filter(|g| !g.metrics.is_empty())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ScoreRounding {
    /// Round only the composite result.
    FinalOnly { decimals: u32 },
    /// Round every group mean and the composite result.
    PerGroup { decimals: u32 },
}

impl Default for ScoreRounding {
    fn default() -> Self {
        Self::FinalOnly { decimals: 1 }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeScorer {
    rounding: ScoreRounding,
}

impl CompositeScorer {
    pub fn new(rounding: ScoreRounding) -> Self {
        Self { rounding }
    }

    pub fn rounding(&self) -> ScoreRounding {
        self.rounding
    }

    /// Geometric mean of the active group means; `None` if no group is
    /// active or any contributing metric is missing.
    pub fn score(&self, record: &SolventRecord, selection: &ScoreSelection) -> Option<f64> {
        let mut product = 1.0_f64;
        let mut count = 0_i32;
        for group in selection.active() {
            let mut mean = group_mean(record, &group.metrics)?;
            if let ScoreRounding::PerGroup { decimals } = self.rounding {
                mean = round_to(mean, decimals);
            }
            product *= mean;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let composite = product.powf(1.0 / f64::from(count));
        let decimals = match self.rounding {
            ScoreRounding::FinalOnly { decimals } | ScoreRounding::PerGroup { decimals } => {
                decimals
            }
        };
        Some(round_to(composite, decimals))
    }

    pub fn scores(
        &self,
        records: &[SolventRecord],
        selection: &ScoreSelection,
    ) -> Vec<Option<f64>> {
        records.iter().map(|r| self.score(r, selection)).collect()
    }
}

/// Unrounded geometric mean of one group's metrics for a record.
pub fn group_mean(record: &SolventRecord, metrics: &[String]) -> Option<f64> {
    if metrics.is_empty() {
        return None;
    }
    let mut product = 1.0_f64;
    for metric in metrics {
        product *= record.metric(metric)?;
    }
    let n = u32::try_from(metrics.len()).ok()?;
    Some(product.powf(1.0 / f64::from(n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HansenCoordinate;

    fn blank(name: &str) -> SolventRecord {
        SolventRecord::new(name, "", HansenCoordinate::new(0.0, 0.0, 0.0))
    }

    fn rated(name: &str, values: [f64; 10]) -> SolventRecord {
        ScoreGroups::gsk()
            .metric_names()
            .zip(values)
            .fold(blank(name), |r, (m, v)| r.with_metric(m, v))
    }

    fn only(groups: &ScoreGroups, keep: &[&str]) -> ScoreSelection {
        let picks = groups
            .groups()
            .iter()
            .filter(|g| !keep.contains(&g.name.as_str()))
            .map(|g| (g.name.clone(), Vec::new()))
            .collect();
        groups.select(&picks).expect("valid selection")
    }

    #[test]
    fn gsk_groups_partition_ten_metrics() {
        let groups = ScoreGroups::gsk();
        assert_eq!(groups.metric_names().count(), 10);
        assert!(ScoreGroups::new(groups.groups().to_vec()).is_ok());
    }

    #[test]
    fn rejects_metric_in_two_groups() {
        let groups = vec![
            MetricGroup::new(WASTE, &["Incineration"]),
            MetricGroup::new(HEALTH, &["Incineration"]),
            MetricGroup::new(ENVIRONMENT, &["Air Impact"]),
            MetricGroup::new(SAFETY, &["Reactivity and Stability"]),
        ];
        assert!(matches!(
            ScoreGroups::new(groups),
            Err(CoreError::InvalidGroups(_))
        ));
    }

    #[test]
    fn rejects_wrong_group_count() {
        let groups = vec![MetricGroup::new(WASTE, &["Incineration"])];
        assert!(ScoreGroups::new(groups).is_err());
    }

    #[test]
    fn select_rejects_foreign_metric() {
        let groups = ScoreGroups::gsk();
        let mut picks = BTreeMap::new();
        picks.insert(HEALTH.to_string(), vec!["Recycling".to_string()]);
        assert_eq!(
            groups.select(&picks),
            Err(CoreError::UnknownMetric {
                group: HEALTH.to_string(),
                metric: "Recycling".to_string(),
            })
        );
    }

    #[test]
    fn zero_groups_selected_is_undefined() {
        let groups = ScoreGroups::gsk();
        let selection = only(&groups, &[]);
        assert_eq!(selection.active_count(), 0);
        let record = rated("a", [5.0; 10]);
        assert_eq!(CompositeScorer::default().score(&record, &selection), None);
    }

    #[test]
    fn single_group_score_equals_group_mean() {
        let groups = ScoreGroups::gsk();
        let selection = only(&groups, &[HEALTH]);
        let record = blank("a")
            .with_metric("Health Hazard", 8.0)
            .with_metric("Exposure Potential", 8.0);
        assert_eq!(CompositeScorer::default().score(&record, &selection), Some(8.0));
    }

    #[test]
    fn missing_metric_propagates() {
        let groups = ScoreGroups::gsk();
        let record = blank("a").with_metric("Health Hazard", 8.0);
        let scorer = CompositeScorer::default();
        assert_eq!(scorer.score(&record, &only(&groups, &[HEALTH])), None);
        assert_eq!(scorer.score(&record, &groups.full_selection()), None);
    }

    #[test]
    fn composite_lies_between_group_means() {
        let groups = ScoreGroups::gsk();
        let selection = groups.full_selection();
        let scorer = CompositeScorer::new(ScoreRounding::FinalOnly { decimals: 6 });
        let rows = [
            rated("a", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]),
            rated("b", [10.0, 10.0, 10.0, 10.0, 1.0, 1.0, 4.0, 9.0, 3.0, 7.0]),
            rated("c", [6.0, 6.0, 6.0, 6.0, 6.0, 6.0, 6.0, 6.0, 6.0, 6.0]),
        ];
        for row in &rows {
            let means: Vec<f64> = selection
                .active()
                .filter_map(|g| group_mean(row, &g.metrics))
                .collect();
            let lo = means.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let score = scorer.score(row, &selection).expect("defined");
            assert!(score >= lo - 1e-6 && score <= hi + 1e-6, "{}: {score}", row.name);
        }
    }

    #[test]
    fn rounding_point_changes_result() {
        let groups = ScoreGroups::gsk();
        let selection = only(&groups, &[HEALTH, ENVIRONMENT]);
        let record = blank("a")
            .with_metric("Health Hazard", 1.0)
            .with_metric("Exposure Potential", 1.0)
            .with_metric("Aquatic Impact", 1.0)
            .with_metric("Air Impact", 6.0);

        let final_only = CompositeScorer::new(ScoreRounding::FinalOnly { decimals: 1 });
        let per_group = CompositeScorer::new(ScoreRounding::PerGroup { decimals: 1 });
        assert_eq!(final_only.score(&record, &selection), Some(1.6));
        assert_eq!(per_group.score(&record, &selection), Some(1.5));
    }

    #[test]
    fn narrowed_group_uses_only_picked_metrics() {
        let groups = ScoreGroups::gsk();
        let mut picks = BTreeMap::new();
        for name in [WASTE, ENVIRONMENT, SAFETY] {
            picks.insert(name.to_string(), Vec::new());
        }
        picks.insert(HEALTH.to_string(), vec!["Health Hazard".to_string()]);
        let selection = groups.select(&picks).expect("valid");
        let record = blank("a").with_metric("Health Hazard", 7.0);
        assert_eq!(CompositeScorer::default().score(&record, &selection), Some(7.0));
    }
}
