use diesel::{
    deserialize::{self, FromSql},
    pg::{Pg, PgValue},
    prelude::*,
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Text,
    AsExpression, FromSqlRow,
};
use std::io::Write;

#[derive(Identifiable, Queryable, Selectable, serde::Serialize)]
#[diesel(table_name = crate::schema::equiptrack::tenant)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub domain: Option<String>,
    pub plan: String,
    pub is_active: bool,
    #[serde(with = "ts")]
    pub created_at: jiff_diesel::Timestamp,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::equiptrack::tenant)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTenant {
    pub id: String,
    pub name: String,
    pub domain: Option<String>,
    pub plan: String,
    pub is_active: bool,
    pub created_at: jiff_diesel::Timestamp,
}

#[derive(Debug, Identifiable, Queryable, Selectable, Associations, serde::Serialize)]
#[diesel(table_name = crate::schema::equiptrack::user)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(belongs_to(Tenant))]
pub struct User {
    pub id: String,
    pub email: String,
    /// Never leaves the process boundary.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub tenant_id: String,
    #[serde(with = "ts")]
    pub created_at: jiff_diesel::Timestamp,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::equiptrack::user)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub tenant_id: String,
    pub created_at: jiff_diesel::Timestamp,
}

#[derive(Identifiable, Queryable, Selectable, Associations, serde::Serialize)]
#[diesel(table_name = crate::schema::equiptrack::customer)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(belongs_to(Tenant))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tenant_id: String,
}

/// Create payload for a customer. The identifier and owning tenant are
/// assigned by the store and cannot be supplied by the caller.
#[derive(Insertable, serde::Deserialize)]
#[diesel(table_name = crate::schema::equiptrack::customer)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCustomer {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(skip)]
    pub tenant_id: String,
}

/// Partial-update payload for a customer. An omitted field keeps its
/// current value; an explicit `null` clears a nullable field.
#[derive(AsChangeset, serde::Deserialize)]
#[diesel(table_name = crate::schema::equiptrack::customer)]
pub struct CustomerChanges {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
}

#[derive(Identifiable, Queryable, Selectable, Associations, serde::Serialize)]
#[diesel(table_name = crate::schema::equiptrack::product)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(belongs_to(Tenant))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub cost: f64,
    pub stock_min: i32,
    pub stock_max: i32,
    pub stock_current: i32,
    pub tenant_id: String,
}

#[derive(Insertable, serde::Deserialize)]
#[diesel(table_name = crate::schema::equiptrack::product)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProduct {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub stock_min: i32,
    #[serde(default)]
    pub stock_max: i32,
    #[serde(default)]
    pub stock_current: i32,
    #[serde(skip)]
    pub tenant_id: String,
}

#[derive(AsChangeset, serde::Deserialize)]
#[diesel(table_name = crate::schema::equiptrack::product)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub stock_min: Option<i32>,
    pub stock_max: Option<i32>,
    pub stock_current: Option<i32>,
}

/// Machinery categories, stored as their kebab-case tokens.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, AsExpression, FromSqlRow, serde::Serialize, serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "kebab-case")]
pub enum MachineryType {
    Excavator,
    Loader,
    Bulldozer,
    Backhoe,
    Crane,
    Compactor,
    Grader,
    DumpTruck,
    Drill,
    Other,
}

impl MachineryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excavator => "excavator",
            Self::Loader => "loader",
            Self::Bulldozer => "bulldozer",
            Self::Backhoe => "backhoe",
            Self::Crane => "crane",
            Self::Compactor => "compactor",
            Self::Grader => "grader",
            Self::DumpTruck => "dump-truck",
            Self::Drill => "drill",
            Self::Other => "other",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "excavator" => Some(Self::Excavator),
            "loader" => Some(Self::Loader),
            "bulldozer" => Some(Self::Bulldozer),
            "backhoe" => Some(Self::Backhoe),
            "crane" => Some(Self::Crane),
            "compactor" => Some(Self::Compactor),
            "grader" => Some(Self::Grader),
            "dump-truck" => Some(Self::DumpTruck),
            "drill" => Some(Self::Drill),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl ToSql<Text, Pg> for MachineryType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for MachineryType {
    fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
        let token = std::str::from_utf8(value.as_bytes())?;
        Self::from_token(token).ok_or_else(|| format!("unrecognized machinery type: {token}").into())
    }
}

/// Operational status of a machinery asset, stored as kebab-case tokens.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, AsExpression, FromSqlRow, serde::Serialize, serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "kebab-case")]
pub enum MachineryStatus {
    Operational,
    InMaintenance,
    OutOfService,
    InRepair,
}

impl MachineryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::InMaintenance => "in-maintenance",
            Self::OutOfService => "out-of-service",
            Self::InRepair => "in-repair",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "operational" => Some(Self::Operational),
            "in-maintenance" => Some(Self::InMaintenance),
            "out-of-service" => Some(Self::OutOfService),
            "in-repair" => Some(Self::InRepair),
            _ => None,
        }
    }
}

impl ToSql<Text, Pg> for MachineryStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for MachineryStatus {
    fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
        let token = std::str::from_utf8(value.as_bytes())?;
        Self::from_token(token)
            .ok_or_else(|| format!("unrecognized machinery status: {token}").into())
    }
}

#[derive(Identifiable, Queryable, Selectable, Associations, serde::Serialize)]
#[diesel(table_name = crate::schema::equiptrack::machinery)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(belongs_to(Tenant))]
pub struct Machinery {
    pub id: String,
    pub name: String,
    pub code: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub year: Option<i32>,
    pub machinery_type: MachineryType,
    pub status: MachineryStatus,
    pub current_location: Option<String>,
    pub current_project: Option<String>,
    pub horometer: f64,
    pub odometer: f64,
    pub operator_name: Option<String>,
    pub operator_id: Option<String>,
    pub next_maintenance_hours: Option<f64>,
    pub maintenance_interval_hours: f64,
    #[serde(with = "ts_opt")]
    pub last_maintenance_date: Option<jiff_diesel::Timestamp>,
    pub acquisition_cost: f64,
    pub hourly_rate: f64,
    pub fuel_consumption_rate: f64,
    pub capacity: Option<String>,
    pub engine_power: Option<String>,
    pub weight: Option<f64>,
    pub plate_number: Option<String>,
    pub is_available: bool,
    pub is_active: bool,
    pub tenant_id: String,
}

#[derive(Insertable, serde::Deserialize)]
#[diesel(table_name = crate::schema::equiptrack::machinery)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMachinery {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    pub machinery_type: MachineryType,
    #[serde(default = "default_status")]
    pub status: MachineryStatus,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub current_project: Option<String>,
    #[serde(default)]
    pub horometer: f64,
    #[serde(default)]
    pub odometer: f64,
    #[serde(default)]
    pub operator_name: Option<String>,
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub next_maintenance_hours: Option<f64>,
    #[serde(default = "default_maintenance_interval")]
    pub maintenance_interval_hours: f64,
    #[serde(default, with = "ts_opt")]
    pub last_maintenance_date: Option<jiff_diesel::Timestamp>,
    #[serde(default)]
    pub acquisition_cost: f64,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub fuel_consumption_rate: f64,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub engine_power: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub plate_number: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(skip, default = "default_true")]
    pub is_active: bool,
    #[serde(skip)]
    pub tenant_id: String,
}

/// Partial-update payload for machinery. The soft-delete marker is not
/// part of this set; a deleted asset cannot be resurrected by update.
#[derive(AsChangeset, serde::Deserialize)]
#[diesel(table_name = crate::schema::equiptrack::machinery)]
pub struct MachineryChanges {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub brand: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub model: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub serial_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub year: Option<Option<i32>>,
    pub machinery_type: Option<MachineryType>,
    pub status: Option<MachineryStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_project: Option<Option<String>>,
    pub horometer: Option<f64>,
    pub odometer: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub operator_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub operator_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub next_maintenance_hours: Option<Option<f64>>,
    pub maintenance_interval_hours: Option<f64>,
    #[serde(default, deserialize_with = "double_option_ts")]
    pub last_maintenance_date: Option<Option<jiff_diesel::Timestamp>>,
    pub acquisition_cost: Option<f64>,
    pub hourly_rate: Option<f64>,
    pub fuel_consumption_rate: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub capacity: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub engine_power: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub plate_number: Option<Option<String>>,
    pub is_available: Option<bool>,
}

/// Field report of a fresh horometer reading. The stored value is
/// overwritten as-is; readings lower than the current value are accepted.
#[derive(Debug, AsChangeset, serde::Deserialize)]
#[diesel(table_name = crate::schema::equiptrack::machinery)]
pub struct HorometerUpdate {
    pub horometer: f64,
    #[serde(default)]
    pub operator_name: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct MachineryStats {
    pub total: i64,
    pub operational: i64,
    pub in_maintenance: i64,
    pub needs_maintenance: i64,
    pub total_hours: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warning,
}

#[derive(Debug, serde::Serialize)]
pub struct MaintenanceAlert {
    pub machinery_id: String,
    pub machinery_name: String,
    pub machinery_code: String,
    pub current_hours: f64,
    pub next_maintenance_hours: f64,
    /// Negative once the asset is overdue.
    pub hours_until_maintenance: f64,
    pub alert_level: AlertLevel,
}

fn default_status() -> MachineryStatus {
    MachineryStatus::Operational
}

fn default_maintenance_interval() -> f64 {
    250.0
}

fn default_true() -> bool {
    true
}

/// Deserializes a field so that "absent" and "explicit null" stay apart:
/// a missing field (via `#[serde(default)]`) is `None`, a `null` is
/// `Some(None)`, and a value is `Some(Some(_))`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

fn double_option_ts<'de, D>(
    deserializer: D,
) -> Result<Option<Option<jiff_diesel::Timestamp>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Option::<jiff::Timestamp>::deserialize(deserializer).map(|value| Some(value.map(Into::into)))
}

mod ts {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &jiff_diesel::Timestamp,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        jiff::Timestamp::from(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<jiff_diesel::Timestamp, D::Error> {
        jiff::Timestamp::deserialize(deserializer).map(Into::into)
    }
}

mod ts_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<jiff_diesel::Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value
            .as_ref()
            .map(|value| jiff::Timestamp::from(*value))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<jiff_diesel::Timestamp>, D::Error> {
        Ok(Option::<jiff::Timestamp>::deserialize(deserializer)?.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machinery_enums_round_trip_their_tokens() {
        assert_eq!(MachineryType::DumpTruck.as_str(), "dump-truck");
        assert_eq!(
            MachineryType::from_token("dump-truck"),
            Some(MachineryType::DumpTruck)
        );
        assert_eq!(MachineryType::from_token("helicopter"), None);
        assert_eq!(MachineryStatus::InMaintenance.as_str(), "in-maintenance");
        assert_eq!(
            MachineryStatus::from_token("out-of-service"),
            Some(MachineryStatus::OutOfService)
        );
        assert_eq!(MachineryStatus::from_token("parked"), None);

        let parsed: MachineryType =
            serde_json::from_str("\"dump-truck\"").expect("token should deserialize");
        assert_eq!(parsed, MachineryType::DumpTruck);
        assert_eq!(
            serde_json::to_string(&MachineryStatus::InRepair).expect("status should serialize"),
            "\"in-repair\""
        );
    }

    #[test]
    fn omitted_and_null_fields_are_distinguished() {
        let omitted: CustomerChanges =
            serde_json::from_str(r#"{ "name": "Acme Norte" }"#).expect("payload should parse");
        assert_eq!(omitted.name.as_deref(), Some("Acme Norte"));
        assert!(omitted.email.is_none(), "omitted field must stay untouched");

        let cleared: CustomerChanges =
            serde_json::from_str(r#"{ "email": null }"#).expect("payload should parse");
        assert!(cleared.name.is_none());
        assert_eq!(cleared.email, Some(None), "explicit null must clear");

        let replaced: CustomerChanges =
            serde_json::from_str(r#"{ "email": "ops@acme.test" }"#).expect("payload should parse");
        assert_eq!(replaced.email, Some(Some("ops@acme.test".to_owned())));
    }

    #[test]
    fn new_machinery_fills_documented_defaults() {
        let payload = r#"{ "name": "CAT 320", "code": "EXC-001", "machinery_type": "excavator" }"#;
        let new_machinery: NewMachinery =
            serde_json::from_str(payload).expect("minimal payload should parse");
        assert_eq!(new_machinery.status, MachineryStatus::Operational);
        assert_eq!(new_machinery.horometer, 0.0);
        assert_eq!(new_machinery.maintenance_interval_hours, 250.0);
        assert!(new_machinery.is_available);
        assert!(new_machinery.is_active);
        assert!(new_machinery.id.is_empty(), "id is assigned by the store");
        assert!(
            new_machinery.tenant_id.is_empty(),
            "tenant is assigned by the store"
        );
    }

    #[test]
    fn create_payloads_cannot_smuggle_identity_fields() {
        let payload = r#"{
            "id": "cust-hijacked",
            "tenant_id": "tenant-hijacked",
            "name": "Mallory"
        }"#;
        let new_customer: NewCustomer =
            serde_json::from_str(payload).expect("payload should parse");
        assert!(new_customer.id.is_empty());
        assert!(new_customer.tenant_id.is_empty());
    }
}
