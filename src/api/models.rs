//! Records served by the property and alarm-management API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::table::sort::{RowFields, SortKey};

/// Agency summary embedded in other records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyRef {
    /// Agency identifier.
    pub id: u64,
    /// Trading name.
    pub name: String,
}

/// Letting agency managing rental properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agency {
    /// Agency identifier.
    pub id: u64,
    /// Trading name.
    pub name: String,
    /// Primary contact at the agency.
    pub contact_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Number of properties managed by the agency.
    pub property_count: Option<u32>,
}

/// Occupant of a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tenant {
    /// Server identifier; `None` for tenants not yet saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Full name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// Rental or private property with its smoke alarms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    /// Property identifier.
    pub id: u64,
    /// Street address.
    pub address: String,
    /// Suburb.
    pub suburb: Option<String>,
    /// Postcode.
    pub postcode: Option<String>,
    /// `rental` or `private`.
    pub property_type: Option<String>,
    /// Managing agency, absent for private properties.
    pub agency: Option<AgencyRef>,
    /// Owner's name.
    pub owner_name: Option<String>,
    /// Current tenants.
    pub tenants: Vec<Tenant>,
    /// Date the next alarm service is due.
    pub next_service_date: Option<NaiveDate>,
    /// Compliance status label.
    pub status: Option<String>,
}

/// Smoke-alarm service job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmJob {
    /// Job identifier.
    pub id: u64,
    /// Address of the serviced property.
    pub property_address: String,
    /// Assigned technician.
    pub technician: Option<String>,
    /// Workflow status (`scheduled`, `completed`, …).
    pub status: String,
    /// Booked service date.
    pub scheduled_date: Option<NaiveDate>,
    /// Date the job was signed off.
    pub completed_date: Option<NaiveDate>,
    /// Number of alarms serviced.
    pub alarm_count: Option<u32>,
}

/// Maintenance ticket raised for a beeping alarm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeepingAlarm {
    /// Ticket identifier.
    pub id: u64,
    /// Address of the affected property.
    pub property_address: String,
    /// Where in the property the alarm is.
    pub location: Option<String>,
    /// Date the ticket was raised.
    pub reported_date: Option<NaiveDate>,
    /// `open`, `in_progress` or `resolved`.
    pub status: String,
    /// Free-form notes from the caller.
    pub notes: Option<String>,
}

fn text(value: Option<&str>) -> SortKey {
    value.map_or(SortKey::Missing, SortKey::text)
}

fn date(value: Option<NaiveDate>) -> SortKey {
    value.map_or(SortKey::Missing, SortKey::Date)
}

fn number(value: Option<u64>) -> SortKey {
    value
        .and_then(|raw| i64::try_from(raw).ok())
        .map_or(SortKey::Missing, SortKey::Number)
}

impl RowFields for Agency {
    fn field(&self, name: &str) -> SortKey {
        match name {
            "id" => number(Some(self.id)),
            "name" => SortKey::text(&self.name),
            "contact_name" => text(self.contact_name.as_deref()),
            "email" => text(self.email.as_deref()),
            "property_count" => number(self.property_count.map(u64::from)),
            _ => SortKey::Missing,
        }
    }
}

impl RowFields for Property {
    fn field(&self, name: &str) -> SortKey {
        match name {
            "id" => number(Some(self.id)),
            "address" => SortKey::text(&self.address),
            "suburb" => text(self.suburb.as_deref()),
            "postcode" => text(self.postcode.as_deref()),
            "property_type" => text(self.property_type.as_deref()),
            "agency" | "agency__name" => text(self.agency.as_ref().map(|agency| agency.name.as_str())),
            "owner_name" => text(self.owner_name.as_deref()),
            "tenant_count" => number(u64::try_from(self.tenants.len()).ok()),
            "next_service_date" => date(self.next_service_date),
            "status" => text(self.status.as_deref()),
            _ => SortKey::Missing,
        }
    }
}

impl RowFields for AlarmJob {
    fn field(&self, name: &str) -> SortKey {
        match name {
            "id" => number(Some(self.id)),
            "property_address" => SortKey::text(&self.property_address),
            "technician" => text(self.technician.as_deref()),
            "status" => SortKey::text(&self.status),
            "scheduled_date" => date(self.scheduled_date),
            "completed_date" => date(self.completed_date),
            "alarm_count" => number(self.alarm_count.map(u64::from)),
            _ => SortKey::Missing,
        }
    }
}

impl RowFields for BeepingAlarm {
    fn field(&self, name: &str) -> SortKey {
        match name {
            "id" => number(Some(self.id)),
            "property_address" => SortKey::text(&self.property_address),
            "location" => text(self.location.as_deref()),
            "reported_date" => date(self.reported_date),
            "status" => SortKey::text(&self.status),
            _ => SortKey::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::{Property, Tenant};
    use crate::table::sort::{RowFields, SortKey};

    #[test]
    fn property_tolerates_missing_optional_fields() {
        let property: Property = serde_json::from_value(json!({
            "id": 3,
            "address": "12 Beach Rd",
            "next_service_date": "2024-05-01"
        }))
        .expect("property should decode");

        assert_eq!(property.id, 3);
        assert!(property.tenants.is_empty());
        assert_eq!(
            property.next_service_date,
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
    }

    #[test]
    fn property_fields_expose_sort_keys() {
        let property = Property {
            id: 1,
            address: "9 Elm St".to_owned(),
            tenants: vec![Tenant::default(), Tenant::default()],
            ..Property::default()
        };

        assert_eq!(property.field("address"), SortKey::text("9 Elm St"));
        assert_eq!(property.field("tenant_count"), SortKey::Number(2));
        assert_eq!(property.field("agency"), SortKey::Missing);
        assert_eq!(property.field("unknown"), SortKey::Missing);
    }

    #[test]
    fn unsaved_tenants_serialise_without_id() {
        let tenant = Tenant {
            name: "Ada".to_owned(),
            ..Tenant::default()
        };
        let value = serde_json::to_value(&tenant).expect("tenant should serialise");
        assert!(value.get("id").is_none());
    }
}
