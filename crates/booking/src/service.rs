//! Booking header enumerations.

use serde::{Deserialize, Serialize};

/// Shipment service mode. Decides which cargo measurements are billable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceMode {
    /// Less-than-container-load ocean freight.
    Lcl,
    /// Full-container-load ocean freight.
    Fcl,
    /// Air freight.
    Air,
}

impl ServiceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMode::Lcl => "LCL",
            ServiceMode::Fcl => "FCL",
            ServiceMode::Air => "AIR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LCL" => Some(ServiceMode::Lcl),
            "FCL" => Some(ServiceMode::Fcl),
            "AIR" => Some(ServiceMode::Air),
            _ => None,
        }
    }

    /// Only FCL bookings carry more than one cargo line.
    pub fn allows_multiple_cargo_lines(&self) -> bool {
        matches!(self, ServiceMode::Fcl)
    }
}

/// Who pays the freight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Freight {
    Prepaid,
    Collect,
}

impl Freight {
    pub fn as_str(&self) -> &'static str {
        match self {
            Freight::Prepaid => "Prepaid",
            Freight::Collect => "Collect",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prepaid" => Some(Freight::Prepaid),
            "collect" => Some(Freight::Collect),
            _ => None,
        }
    }
}

/// Who owns the routing of the shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Routed {
    #[serde(rename = "Self")]
    Own,
    Agent,
}

impl Routed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Routed::Own => "Self",
            Routed::Agent => "Agent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "self" => Some(Routed::Own),
            "agent" => Some(Routed::Agent),
            _ => None,
        }
    }
}
