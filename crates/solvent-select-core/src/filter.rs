use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{measured, SolventRecord};

/// Keep-mask excluding every record that carries any of the given hazard codes.
/// Codes are compared verbatim, one whitespace-separated token at a time.
pub fn hazard_mask(records: &[SolventRecord], excluded: &[String]) -> Vec<bool> {
    if excluded.is_empty() {
        return vec![true; records.len()];
    }
    records
        .iter()
        .map(|r| {
            !r.hazard_labels
                .codes()
                .iter()
                .any(|code| excluded.contains(code))
        })
        .collect()
}

/// Keep-mask for the greenness threshold. A threshold of zero or below
/// disables the filter; otherwise the score must be defined and strictly
/// above it.
pub fn greenness_mask(scores: &[Option<f64>], threshold: f64) -> Vec<bool> {
    if threshold <= 0.0 {
        return vec![true; scores.len()];
    }
    scores
        .iter()
        .map(|s| s.is_some_and(|v| v > threshold))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeBounds {
    #[default]
    Exclusive,
    Inclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeScale {
    #[default]
    Linear,
    /// Bounds are given as base-10 exponents of the underlying value.
    Log10,
}

/// Numeric window on one physical property. An absent bound is open;
/// missing property values always pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeFilter {
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub scale: RangeScale,
}

impl RangeFilter {
    pub fn linear(low: f64, high: f64) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
            scale: RangeScale::Linear,
        }
    }

    pub fn log10(low_exponent: f64, high_exponent: f64) -> Self {
        Self {
            low: Some(low_exponent),
            high: Some(high_exponent),
            scale: RangeScale::Log10,
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.low.is_some_and(f64::is_nan) || self.high.is_some_and(f64::is_nan) {
            return Err(CoreError::InvalidRange("bound is NaN".to_string()));
        }
        if let (Some(low), Some(high)) = (self.low, self.high) {
            if low > high {
                return Err(CoreError::InvalidRange(format!(
                    "low {low} exceeds high {high}"
                )));
            }
        }
        Ok(())
    }

    /// Bounds on the linear scale the property is stored in.
    pub fn linear_bounds(&self) -> (f64, f64) {
        let convert = |bound: f64| match self.scale {
            RangeScale::Linear => bound,
            RangeScale::Log10 => 10_f64.powf(bound),
        };
        (
            self.low.map_or(f64::NEG_INFINITY, convert),
            self.high.map_or(f64::INFINITY, convert),
        )
    }

    pub fn keeps(&self, value: Option<f64>, bounds: RangeBounds) -> bool {
        let Some(v) = value.and_then(measured) else {
            return true;
        };
        let (low, high) = self.linear_bounds();
        match bounds {
            RangeBounds::Exclusive => v > low && v < high,
            RangeBounds::Inclusive => v >= low && v <= high,
        }
    }

    pub fn mask(
        &self,
        values: impl IntoIterator<Item = Option<f64>>,
        bounds: RangeBounds,
    ) -> Vec<bool> {
        values.into_iter().map(|v| self.keeps(v, bounds)).collect()
    }
}

/// Element-wise AND of equally long masks.
pub fn combine_masks(len: usize, masks: &[&[bool]]) -> Vec<bool> {
    (0..len)
        .map(|i| masks.iter().all(|m| m.get(i).copied().unwrap_or(false)))
        .collect()
}
