use serde::{Deserialize, Serialize};

use crate::model::{measured, round_to, HansenCoordinate, SolventRecord};

pub const DISTANCE_DECIMALS: u32 = 2;
const DISPERSION_WEIGHT: f64 = 4.0;

/// Solute position as entered by the user; any component may be unset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub dispersion: Option<f64>,
    pub polarity: Option<f64>,
    pub hydrogen_bonding: Option<f64>,
}

impl ReferencePoint {
    pub const fn unset() -> Self {
        Self {
            dispersion: None,
            polarity: None,
            hydrogen_bonding: None,
        }
    }

    pub const fn at(coordinate: HansenCoordinate) -> Self {
        Self {
            dispersion: Some(coordinate.dispersion),
            polarity: Some(coordinate.polarity),
            hydrogen_bonding: Some(coordinate.hydrogen_bonding),
        }
    }

    /// The full coordinate, or `None` unless all three components are set.
    pub fn resolve(&self) -> Option<HansenCoordinate> {
        Some(HansenCoordinate::new(
            self.dispersion.and_then(measured)?,
            self.polarity.and_then(measured)?,
            self.hydrogen_bonding.and_then(measured)?,
        ))
    }

    /// Component-wise mean of the given solvents' coordinates, rounded to
    /// two decimals. No solvents leaves the reference unset.
    pub fn mean_of<'a>(records: impl IntoIterator<Item = &'a SolventRecord>) -> Self {
        let mut count = 0_u32;
        let mut sum = [0.0_f64; 3];
        for record in records {
            count += 1;
            sum[0] += record.coordinate.dispersion;
            sum[1] += record.coordinate.polarity;
            sum[2] += record.coordinate.hydrogen_bonding;
        }
        if count == 0 {
            return Self::unset();
        }
        let n = f64::from(count);
        let [d, p, h] = sum.map(|s| round_to(s / n, DISTANCE_DECIMALS));
        Self::at(HansenCoordinate::new(d, p, h))
    }
}

/// Ra between two points: `sqrt(4·ΔD² + ΔP² + ΔH²)`, rounded to two decimals.
pub fn hansen_distance(a: &HansenCoordinate, b: &HansenCoordinate) -> f64 {
    let dd = a.dispersion - b.dispersion;
    let dp = a.polarity - b.polarity;
    let dh = a.hydrogen_bonding - b.hydrogen_bonding;
    let squared = DISPERSION_WEIGHT * dd * dd + dp * dp + dh * dh;
    round_to(squared.sqrt(), DISTANCE_DECIMALS)
}

/// One Ra per record, in table order. An incomplete reference yields `None`
/// for every record.
pub fn distances(records: &[SolventRecord], reference: &ReferencePoint) -> Vec<Option<f64>> {
    match reference.resolve() {
        Some(origin) => records
            .iter()
            .map(|r| Some(hansen_distance(&r.coordinate, &origin)))
            .collect(),
        None => vec![None; records.len()],
    }
}
