use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use solvent_select_core::{PhysicalProperty, RangeFilter, ReferencePoint};
use solvent_select_table::{SolventTable, SortOrder};

/// Offset applied on each side of the table's boiling point span for the
/// default boiling point window.
pub const BOILING_POINT_MARGIN: f64 = 5.0;

/// Where the solute's Hansen coordinate comes from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    #[default]
    Unset,
    Coordinates(ReferencePoint),
    /// Known functional solvents; their mean coordinate is the reference.
    Solvents(Vec<String>),
}

impl ReferenceSource {
    /// The single known solvent, which also seeds a suggested path.
    pub fn single_solvent(&self) -> Option<&str> {
        match self {
            Self::Solvents(names) if names.len() == 1 => names.first().map(String::as_str),
            _ => None,
        }
    }
}

/// Everything the user picked for one interaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub reference: ReferenceSource,
    /// Included metrics per group; groups not listed are fully included and
    /// an empty list excludes the group.
    #[serde(default)]
    pub metrics: BTreeMap<String, Vec<String>>,
    /// Keep only scores strictly above this; zero disables the filter.
    #[serde(default)]
    pub greenness_threshold: f64,
    #[serde(default)]
    pub excluded_hazards: Vec<String>,
    #[serde(default)]
    pub boiling_point: RangeFilter,
    /// Usually given on a log10 scale.
    #[serde(default)]
    pub viscosity: RangeFilter,
    #[serde(default)]
    pub surface_tension: RangeFilter,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub order: SortOrder,
}

impl FilterSpec {
    /// Initial state for a freshly loaded table: nothing filtered, every
    /// solvent shown, nearest first.
    pub fn reset(table: &SolventTable) -> Self {
        let boiling_point = table
            .property_span(PhysicalProperty::BoilingPoint)
            .map_or_else(RangeFilter::unbounded, |(lo, hi)| {
                RangeFilter::linear(lo - BOILING_POINT_MARGIN, hi + BOILING_POINT_MARGIN)
            });
        Self {
            boiling_point,
            limit: Some(table.len()),
            ..Self::default()
        }
    }

    pub fn with_coordinates(mut self, reference: ReferencePoint) -> Self {
        self.reference = ReferenceSource::Coordinates(reference);
        self
    }

    pub fn with_solvents<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference = ReferenceSource::Solvents(names.into_iter().map(Into::into).collect());
        self
    }
}
