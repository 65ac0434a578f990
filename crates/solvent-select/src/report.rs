use serde::Serialize;
use solvent_select_core::{HansenCoordinate, ScoreGroups, ScoredSolvent};
use solvent_select_ghs::{StatementLine, StatementTable};

const MISSING: &str = "n/a";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub group: String,
    pub metric: String,
    pub value: Option<f64>,
}

/// Everything known about one solvent, with label codes expanded to text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolventReport {
    pub name: String,
    pub cas: String,
    pub coordinate: HansenCoordinate,
    pub melting_point: Option<f64>,
    pub boiling_point: Option<f64>,
    pub viscosity: Option<f64>,
    pub surface_tension: Option<f64>,
    pub distance: Option<f64>,
    pub baseline_score: Option<f64>,
    pub score: Option<f64>,
    pub metrics: Vec<MetricValue>,
    pub hazards: Vec<StatementLine>,
    pub precautions: Vec<StatementLine>,
}

impl SolventReport {
    pub fn build(row: &ScoredSolvent, groups: &ScoreGroups, statements: &StatementTable) -> Self {
        let record = &row.record;
        let metrics = groups
            .groups()
            .iter()
            .flat_map(|group| {
                group.metrics.iter().map(|metric| MetricValue {
                    group: group.name.clone(),
                    metric: metric.clone(),
                    value: record.metric(metric),
                })
            })
            .collect();
        Self {
            name: record.name.clone(),
            cas: record.cas.clone(),
            coordinate: record.coordinate,
            melting_point: record.melting_point,
            boiling_point: record.boiling_point,
            viscosity: record.viscosity,
            surface_tension: record.surface_tension,
            distance: row.distance,
            baseline_score: row.baseline_score,
            score: row.score,
            metrics,
            hazards: statements.describe_labels(&record.hazard_labels),
            precautions: statements.describe_labels(&record.precautionary_labels),
        }
    }

    /// Plain-text rendering, one line per fact.
    pub fn render_lines(&self) -> Vec<String> {
        let cas = if self.cas.is_empty() { MISSING } else { &self.cas };
        let mut lines = vec![
            format!("{} (CAS {cas})", self.name),
            format!("Hansen parameters: {}", self.coordinate),
            format!("Distance to solute: {}", fmt_value(self.distance, 2)),
            format!(
                "G-score: {} (all metrics {})",
                fmt_value(self.score, 1),
                fmt_value(self.baseline_score, 1)
            ),
            format!("Melting point: {} °C", fmt_value(self.melting_point, 1)),
            format!("Boiling point: {} °C", fmt_value(self.boiling_point, 1)),
            format!("Viscosity: {} mPa·s", fmt_value(self.viscosity, 3)),
            format!("Surface tension: {} mN/m", fmt_value(self.surface_tension, 2)),
        ];
        lines.extend(self.metrics.iter().map(|m| {
            format!("{} / {}: {}", m.group, m.metric, fmt_value(m.value, 1))
        }));
        lines.push("Hazard statements:".to_string());
        lines.extend(self.hazards.iter().map(statement_line));
        lines.push("Precautionary statements:".to_string());
        lines.extend(self.precautions.iter().map(statement_line));
        lines
    }
}

fn fmt_value(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.decimals$}"))
}

fn statement_line(line: &StatementLine) -> String {
    format!("  {}: {}", line.code, line.text)
}
