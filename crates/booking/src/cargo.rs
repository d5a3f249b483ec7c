//! Cargo lines.

use serde::{Deserialize, Serialize};

use freightdesk_core::numeric::parse_decimal;

use crate::chargeable::{Chargeable, Measurements};

/// One cargo line as typed by the user.
///
/// Measurements stay as text; numbers are extracted on computation and on
/// serialization. The two chargeable fields are derived, never typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoLine {
    pub packages: String,
    pub gross_weight: String,
    pub volume_weight: String,
    pub volume: String,
    pub chargeable_weight: Option<f64>,
    pub chargeable_volume: Option<f64>,
    /// FCL only.
    pub container_type: Option<String>,
    /// FCL only.
    pub container_count: String,
}

/// Editable cargo-line fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CargoField {
    Packages(String),
    GrossWeight(String),
    VolumeWeight(String),
    Volume(String),
    ContainerType(Option<String>),
    ContainerCount(String),
}

impl CargoField {
    /// Whether a change to this field should schedule a chargeable recomputation.
    pub fn affects_chargeable(&self) -> bool {
        matches!(
            self,
            CargoField::GrossWeight(_) | CargoField::VolumeWeight(_) | CargoField::Volume(_)
        )
    }
}

impl CargoLine {
    pub fn measurements(&self) -> Measurements {
        Measurements {
            gross_weight: parse_decimal(&self.gross_weight),
            volume_weight: parse_decimal(&self.volume_weight),
            volume: parse_decimal(&self.volume),
        }
    }

    pub fn chargeable(&self) -> Chargeable {
        Chargeable {
            chargeable_weight: self.chargeable_weight,
            chargeable_volume: self.chargeable_volume,
        }
    }

    pub(crate) fn set(&mut self, field: CargoField) {
        match field {
            CargoField::Packages(v) => self.packages = v,
            CargoField::GrossWeight(v) => self.gross_weight = v,
            CargoField::VolumeWeight(v) => self.volume_weight = v,
            CargoField::Volume(v) => self.volume = v,
            CargoField::ContainerType(v) => self.container_type = v,
            CargoField::ContainerCount(v) => self.container_count = v,
        }
    }

    pub(crate) fn clear_container(&mut self) {
        self.container_type = None;
        self.container_count.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurements_treat_blank_and_garbage_as_unset() {
        let line = CargoLine {
            gross_weight: "1200".into(),
            volume_weight: "".into(),
            volume: "n/a".into(),
            ..CargoLine::default()
        };
        let m = line.measurements();
        assert_eq!(m.gross_weight, Some(1200.0));
        assert_eq!(m.volume_weight, None);
        assert_eq!(m.volume, None);
    }

    #[test]
    fn only_measure_fields_affect_chargeable() {
        assert!(CargoField::Volume("1".into()).affects_chargeable());
        assert!(!CargoField::Packages("1".into()).affects_chargeable());
        assert!(!CargoField::ContainerCount("2".into()).affects_chargeable());
    }
}
