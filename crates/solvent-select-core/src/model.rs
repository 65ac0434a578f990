use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a substance in Hansen space, in MPa^0.5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HansenCoordinate {
    pub dispersion: f64,
    pub polarity: f64,
    pub hydrogen_bonding: f64,
}

impl HansenCoordinate {
    pub const fn new(dispersion: f64, polarity: f64, hydrogen_bonding: f64) -> Self {
        Self {
            dispersion,
            polarity,
            hydrogen_bonding,
        }
    }
}

impl fmt::Display for HansenCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dD = {:.1}, dP = {:.1}, dH = {:.1}",
            self.dispersion, self.polarity, self.hydrogen_bonding
        )
    }
}

pub const NO_DATA_LABEL: &str = "No Data";
pub const NOT_HAZARDOUS_LABEL: &str = "Not Hazardous";

/// Hazard or precautionary statement codes attached to a solvent.
///
/// Precautionary codes may be composite (`P305+P351+P338`); they are kept
/// verbatim here and expanded by the statement table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum LabelSet {
    #[default]
    NoData,
    NotHazardous,
    Codes(Vec<String>),
}

impl LabelSet {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_DATA_LABEL) {
            return Self::NoData;
        }
        if trimmed.eq_ignore_ascii_case(NOT_HAZARDOUS_LABEL) {
            return Self::NotHazardous;
        }
        Self::Codes(trimmed.split_whitespace().map(str::to_string).collect())
    }

    pub fn codes(&self) -> &[String] {
        match self {
            Self::Codes(codes) => codes,
            Self::NoData | Self::NotHazardous => &[],
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes().iter().any(|c| c == code)
    }
}

impl From<String> for LabelSet {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<LabelSet> for String {
    fn from(labels: LabelSet) -> Self {
        labels.to_string()
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => f.write_str(NO_DATA_LABEL),
            Self::NotHazardous => f.write_str(NOT_HAZARDOUS_LABEL),
            Self::Codes(codes) => f.write_str(&codes.join(" ")),
        }
    }
}

/// One candidate solvent as materialized from the dataset.
///
/// Physical properties are `None` when the dataset has no value. Raw
/// sustainability metrics are keyed by column name; an absent key is a
/// missing metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolventRecord {
    pub name: String,
    #[serde(default)]
    pub cas: String,
    pub coordinate: HansenCoordinate,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub melting_point: Option<f64>,
    #[serde(default)]
    pub boiling_point: Option<f64>,
    #[serde(default)]
    pub viscosity: Option<f64>,
    #[serde(default)]
    pub surface_tension: Option<f64>,
    #[serde(default)]
    pub hazard_labels: LabelSet,
    #[serde(default)]
    pub precautionary_labels: LabelSet,
}

impl SolventRecord {
    pub fn new(
        name: impl Into<String>,
        cas: impl Into<String>,
        coordinate: HansenCoordinate,
    ) -> Self {
        Self {
            name: name.into(),
            cas: cas.into(),
            coordinate,
            metrics: BTreeMap::new(),
            melting_point: None,
            boiling_point: None,
            viscosity: None,
            surface_tension: None,
            hazard_labels: LabelSet::NoData,
            precautionary_labels: LabelSet::NoData,
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        if let Some(v) = measured(value) {
            self.metrics.insert(name.into(), v);
        }
        self
    }

    pub fn with_boiling_point(mut self, value: f64) -> Self {
        self.boiling_point = measured(value);
        self
    }

    pub fn with_viscosity(mut self, value: f64) -> Self {
        self.viscosity = measured(value);
        self
    }

    pub fn with_surface_tension(mut self, value: f64) -> Self {
        self.surface_tension = measured(value);
        self
    }

    pub fn with_hazards(mut self, raw: &str) -> Self {
        self.hazard_labels = LabelSet::parse(raw);
        self
    }

    pub fn with_precautions(mut self, raw: &str) -> Self {
        self.precautionary_labels = LabelSet::parse(raw);
        self
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied().and_then(measured)
    }

    pub fn property(&self, property: PhysicalProperty) -> Option<f64> {
        let value = match property {
            PhysicalProperty::MeltingPoint => self.melting_point,
            PhysicalProperty::BoilingPoint => self.boiling_point,
            PhysicalProperty::Viscosity => self.viscosity,
            PhysicalProperty::SurfaceTension => self.surface_tension,
        };
        value.and_then(measured)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalProperty {
    MeltingPoint,
    BoilingPoint,
    Viscosity,
    SurfaceTension,
}

/// Maps non-finite values to `None` so that absence is never carried as NaN.
pub fn measured(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Rounds half to even at `decimals` places, matching spreadsheet-style
/// numeric rounding of the reference dataset tooling.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    (value * factor).round_ties_even() / factor
}
