//! Shipment parties and their address lookup.
//!
//! Each role holds a party code and one address chosen from that party's own
//! address list. The list is resolved from the party directory when the code
//! is selected; until then no address can be chosen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use freightdesk_core::{DomainError, DomainResult};

/// Party roles on an export shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Shipper,
    Consignee,
    Forwarder,
    DestinationAgent,
    BillingCustomer,
    NotifyCustomer,
    Cha,
}

impl PartyRole {
    pub const ALL: [PartyRole; 7] = [
        PartyRole::Shipper,
        PartyRole::Consignee,
        PartyRole::Forwarder,
        PartyRole::DestinationAgent,
        PartyRole::BillingCustomer,
        PartyRole::NotifyCustomer,
        PartyRole::Cha,
    ];

    /// Field prefix used in the wire payload.
    pub fn key(&self) -> &'static str {
        match self {
            PartyRole::Shipper => "shipper",
            PartyRole::Consignee => "consignee",
            PartyRole::Forwarder => "forwarder",
            PartyRole::DestinationAgent => "destination_agent",
            PartyRole::BillingCustomer => "billing_customer",
            PartyRole::NotifyCustomer => "notify_customer",
            PartyRole::Cha => "cha",
        }
    }
}

/// Address row nested in party directory entries (`addresses_data`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyAddress {
    pub id: i64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Reference-data row for customers, shippers, consignees, agents, CHAs...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDirectoryEntry {
    #[serde(alias = "customer_code", alias = "party_code")]
    pub code: String,
    #[serde(default, alias = "customer_name", alias = "party_name")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub addresses_data: Vec<PartyAddress>,
}

/// Resolve the address list of the party with `code`.
pub fn addresses_for(entries: &[PartyDirectoryEntry], code: &str) -> DomainResult<Vec<PartyAddress>> {
    entries
        .iter()
        .find(|e| e.code == code)
        .map(|e| e.addresses_data.clone())
        .ok_or_else(|| DomainError::not_found(format!("party {code}")))
}

/// Selection for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySelection {
    pub code: String,
    pub address_id: Option<i64>,
    pub email: String,
    /// Addresses of the selected party; empty until the lookup completed.
    pub addresses: Vec<PartyAddress>,
}

impl PartySelection {
    pub fn address(&self) -> Option<&PartyAddress> {
        let id = self.address_id?;
        self.addresses.iter().find(|a| a.id == id)
    }
}

/// All party selections of a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parties {
    entries: BTreeMap<PartyRole, PartySelection>,
}

impl Parties {
    pub fn get(&self, role: PartyRole) -> Option<&PartySelection> {
        self.entries.get(&role)
    }

    pub fn code(&self, role: PartyRole) -> &str {
        self.get(role).map(|p| p.code.as_str()).unwrap_or("")
    }

    /// Choose a party; its address list replaces the previous one and the
    /// address selection is reset. A single address is auto-selected.
    pub(crate) fn select(&mut self, role: PartyRole, code: String, addresses: Vec<PartyAddress>) {
        let entry = self.entries.entry(role).or_default();
        entry.address_id = match addresses.as_slice() {
            [only] => Some(only.id),
            _ => None,
        };
        entry.code = code;
        entry.addresses = addresses;
    }

    pub(crate) fn select_address(&mut self, role: PartyRole, address_id: Option<i64>) -> DomainResult<()> {
        let entry = self.entries.entry(role).or_default();
        if let Some(id) = address_id {
            if entry.code.is_empty() {
                return Err(DomainError::validation(format!(
                    "select a {} before choosing its address",
                    role.key()
                )));
            }
            if !entry.addresses.iter().any(|a| a.id == id) {
                return Err(DomainError::validation(format!(
                    "address {id} does not belong to {} {}",
                    role.key(),
                    entry.code
                )));
            }
        }
        entry.address_id = address_id;
        Ok(())
    }

    pub(crate) fn set_email(&mut self, role: PartyRole, email: String) {
        self.entries.entry(role).or_default().email = email;
    }

    /// Used when hydrating from a stored booking, where addresses are not
    /// re-fetched and the stored id is trusted.
    pub(crate) fn restore(&mut self, role: PartyRole, selection: PartySelection) {
        if selection != PartySelection::default() {
            self.entries.insert(role, selection);
        }
    }
}
