//! Master-data entities shown on the generic list screens.
//!
//! Each entity names its list endpoint, an optional server-side filter
//! endpoint, and the text its client-side search runs over.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use freightdesk_core::Entity;

/// A row type managed by [`crate::list::ListController`].
pub trait MasterRecord: Entity<Id = i64> + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Key prefix used by filter memory and in log fields.
    const ENTITY: &'static str;
    /// GET (list) and DELETE (`{ENDPOINT}{id}/`) path.
    const ENDPOINT: &'static str;
    /// POST `{filters: {...}}` path, when the screen filters server-side.
    const FILTER_ENDPOINT: Option<&'static str> = None;

    /// Fields the local search box matches against.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match over [`Self::search_fields`].
    fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    #[serde(default, alias = "branch_code")]
    pub code: String,
    #[serde(default, alias = "branch_name")]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    #[serde(default, alias = "company_code")]
    pub code: String,
    #[serde(default, alias = "company_name")]
    pub name: String,
    #[serde(default)]
    pub gst_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default, alias = "service_type")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerType {
    pub id: i64,
    #[serde(default, alias = "container_type_code")]
    pub code: String,
    #[serde(default, alias = "container_type_name")]
    pub name: String,
    #[serde(default)]
    pub teu: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMode {
    pub id: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default, alias = "call_mode")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerType {
    pub id: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default, alias = "customer_type")]
    pub name: String,
}

/// Port of loading master row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub id: i64,
    #[serde(default, alias = "origin_code")]
    pub code: String,
    #[serde(default, alias = "origin_name")]
    pub name: String,
    #[serde(default)]
    pub country: String,
}

/// Port of discharge master row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: i64,
    #[serde(default, alias = "destination_code")]
    pub code: String,
    #[serde(default, alias = "destination_name")]
    pub name: String,
    #[serde(default)]
    pub country: String,
}

macro_rules! id_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Entity for $ty {
                type Id = i64;

                fn id(&self) -> &i64 {
                    &self.id
                }
            }
        )+
    };
}

id_entity!(Branch, Company, ServiceType, ContainerType, CallMode, CustomerType, Origin, Destination);

impl MasterRecord for Branch {
    const ENTITY: &'static str = "branch";
    const ENDPOINT: &'static str = "branch/";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str(), self.city.as_str()]
    }
}

impl MasterRecord for Company {
    const ENTITY: &'static str = "company";
    const ENDPOINT: &'static str = "company/";

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.code.as_str(), self.name.as_str()];
        fields.extend(self.gst_number.as_deref());
        fields
    }
}

impl MasterRecord for ServiceType {
    const ENTITY: &'static str = "service-type";
    const ENDPOINT: &'static str = "service-type/";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }
}

impl MasterRecord for ContainerType {
    const ENTITY: &'static str = "container-type";
    const ENDPOINT: &'static str = "container-type/";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }
}

impl MasterRecord for CallMode {
    const ENTITY: &'static str = "call-mode";
    const ENDPOINT: &'static str = "call-mode/";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }
}

impl MasterRecord for CustomerType {
    const ENTITY: &'static str = "customer-type";
    const ENDPOINT: &'static str = "customer-type/";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }
}

impl MasterRecord for Origin {
    const ENTITY: &'static str = "origin";
    const ENDPOINT: &'static str = "origin/";
    const FILTER_ENDPOINT: Option<&'static str> = Some("filter_origin");

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str(), self.country.as_str()]
    }
}

impl MasterRecord for Destination {
    const ENTITY: &'static str = "destination";
    const ENDPOINT: &'static str = "destination/";
    const FILTER_ENDPOINT: Option<&'static str> = Some("filter_destination");

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str(), self.country.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_decode_with_field_aliases() {
        let origin: Origin =
            serde_json::from_value(json!({"id": 3, "origin_code": "INNSA", "origin_name": "Nhava Sheva"}))
                .unwrap();
        assert_eq!(origin.code, "INNSA");
        assert_eq!(origin.country, "");
        assert_eq!(*origin.id(), 3);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let branch = Branch {
            id: 1,
            code: "BOM".into(),
            name: "Mumbai Head Office".into(),
            city: "Mumbai".into(),
            company: None,
        };
        assert!(branch.matches("head"));
        assert!(branch.matches("bom"));
        assert!(branch.matches("  "));
        assert!(!branch.matches("delhi"));
    }

    #[test]
    fn optional_fields_join_search() {
        let company = Company {
            id: 1,
            code: "ACME".into(),
            name: "Acme Exports".into(),
            gst_number: Some("27AAACA1234Z1Z5".into()),
        };
        assert!(company.matches("aaaca"));
    }

    #[test]
    fn only_port_screens_filter_server_side() {
        assert_eq!(Origin::FILTER_ENDPOINT, Some("filter_origin"));
        assert_eq!(Destination::FILTER_ENDPOINT, Some("filter_destination"));
        assert_eq!(Branch::FILTER_ENDPOINT, None);
    }
}
