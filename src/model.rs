use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceType {
    Vehicle,
    Health,
}

impl fmt::Display for InsuranceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsuranceType::Vehicle => write!(f, "vehicle"),
            InsuranceType::Health => write!(f, "health"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceCover {
    Full,
    ThirdParty,
}

impl fmt::Display for InsuranceCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsuranceCover::Full => write!(f, "full"),
            InsuranceCover::ThirdParty => write!(f, "third party"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FloaterType {
    Individual,
    Family,
}

impl fmt::Display for FloaterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloaterType::Individual => write!(f, "individual"),
            FloaterType::Family => write!(f, "family"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Rc,
    Aadhaar,
    Policy,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Rc => write!(f, "rc"),
            DocumentType::Aadhaar => write!(f, "aadhaar"),
            DocumentType::Policy => write!(f, "policy"),
        }
    }
}

// ==========================================
// Records owned by the remote store
// ==========================================

#[derive(Debug, Deserialize, Clone)]
pub struct Client {
    pub id: u64,
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub place: String,
    pub insurance_type: InsuranceType,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_converted: bool,
    #[serde(default)]
    pub vehicle_details: Option<VehicleDetail>,
    #[serde(default)]
    pub health_details: Option<HealthDetail>,
}

impl Client {
    /// Renewal date from whichever detail record the client carries.
    pub fn renewal_date(&self) -> Option<NaiveDate> {
        self.vehicle_details
            .as_ref()
            .and_then(|v| v.renewal_date)
            .or_else(|| self.health_details.as_ref().and_then(|h| h.renewal_date))
    }
}

/// Retrieve-endpoint shape: the client plus everything attached to it.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientDetail {
    pub id: u64,
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub place: String,
    pub insurance_type: InsuranceType,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_converted: bool,
    #[serde(default)]
    pub vehicle_details: Option<VehicleDetail>,
    #[serde(default)]
    pub health_details: Option<HealthDetail>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub conversions: Vec<ConversionRecord>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VehicleDetail {
    pub id: u64,
    pub client: u64,
    pub vehicle_type: String,
    pub insurance_cover: InsuranceCover,
    pub renewal_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HealthDetail {
    pub id: u64,
    pub client: u64,
    pub floater_type: FloaterType,
    /// Comma-joined on the wire ("30,28,5"); parse with `validate::parse_ages`.
    pub ages: String,
    #[serde(default)]
    pub ped: String,
    pub renewal_date: Option<NaiveDate>,
    #[serde(default)]
    pub renewal_dismissed: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Note {
    pub id: u64,
    pub client: u64,
    pub text: String,
    pub follow_up_date: NaiveDate,
    #[serde(default)]
    pub reminder: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Quote {
    pub id: u64,
    pub client: u64,
    pub company_name: String,
    pub premium_amount: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Document {
    pub id: u64,
    pub client: u64,
    pub document_type: DocumentType,
    pub file: String,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConversionRecord {
    pub id: u64,
    pub client: u64,
    pub posp_code: String,
    pub customer_name: String,
    pub customer_mobile: String,
    pub company_name: String,
    pub premium_amount: f64,
    pub policy_number: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Counts returned by `GET /notes/summary/`.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct NotesSummary {
    pub today: u32,
    pub overdue: u32,
    pub upcoming: u32,
}

// ==========================================
// Typed request payloads
// ==========================================

#[derive(Debug, Serialize, Clone)]
pub struct ClientCreateRequest {
    pub name: String,
    pub mobile: String,
    pub place: String,
    pub insurance_type: InsuranceType,
}

/// Partial update of a client's identity fields; detail records are untouched.
#[derive(Debug, Serialize, Clone)]
pub struct ClientUpdateRequest {
    pub name: String,
    pub mobile: String,
    pub place: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct VehicleCreateRequest {
    pub client: u64,
    pub vehicle_type: String,
    pub insurance_cover: InsuranceCover,
    pub renewal_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Clone)]
pub struct HealthCreateRequest {
    pub client: u64,
    pub floater_type: FloaterType,
    pub ages: String,
    pub ped: String,
    pub renewal_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Clone)]
pub struct NoteCreateRequest {
    pub client: u64,
    pub text: String,
    pub follow_up_date: NaiveDate,
    pub reminder: bool,
}

#[derive(Debug, Serialize, Clone)]
pub struct NoteTextPatch {
    pub text: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct QuoteCreateRequest {
    pub client: u64,
    pub company_name: String,
    pub premium_amount: f64,
}

#[derive(Debug, Serialize, Clone)]
pub struct ConvertRequest {
    pub posp_code: String,
    pub customer_name: String,
    pub customer_mobile: String,
    pub company_name: String,
    pub premium_amount: f64,
    pub policy_number: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct RenewRequest {
    pub next_renewal_date: NaiveDate,
}

#[derive(Debug, Serialize, Clone)]
pub struct SetRenewalRequest {
    pub renewal_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn health_create_request_wire_shape() {
        let req = HealthCreateRequest {
            client: 7,
            floater_type: FloaterType::Family,
            ages: "30,28,5".into(),
            ped: String::new(),
            renewal_date: NaiveDate::from_ymd_opt(2024, 7, 15),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "client": 7,
                "floater_type": "family",
                "ages": "30,28,5",
                "ped": "",
                "renewal_date": "2024-07-15",
            })
        );
    }

    #[test]
    fn client_update_request_patches_identity_fields_only() {
        let req = ClientUpdateRequest {
            name: "Asha Menon".into(),
            mobile: "9876543210".into(),
            place: "Kochi".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "name": "Asha Menon",
                "mobile": "9876543210",
                "place": "Kochi",
            })
        );
    }

    #[test]
    fn renew_request_uses_iso_date() {
        let req = RenewRequest {
            next_renewal_date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"next_renewal_date":"2025-01-03"}"#
        );
    }

    #[test]
    fn vehicle_create_request_null_renewal() {
        let req = VehicleCreateRequest {
            client: 1,
            vehicle_type: "Car".into(),
            insurance_cover: InsuranceCover::ThirdParty,
            renewal_date: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["insurance_cover"], "third_party");
        assert_eq!(json["renewal_date"], serde_json::Value::Null);
    }

    #[test]
    fn client_deserializes_with_nested_details() {
        let raw = r#"{
            "id": 12,
            "name": "Asha",
            "mobile": "9876543210",
            "place": "Kochi",
            "insurance_type": "health",
            "created_at": "2024-06-01T09:30:00Z",
            "is_converted": false,
            "vehicle_details": null,
            "health_details": {
                "id": 4,
                "client": 12,
                "floater_type": "individual",
                "ages": "28",
                "ped": "",
                "renewal_date": "2024-08-01",
                "renewal_dismissed": false
            }
        }"#;
        let client: Client = serde_json::from_str(raw).unwrap();
        assert_eq!(client.insurance_type, InsuranceType::Health);
        assert_eq!(client.renewal_date(), NaiveDate::from_ymd_opt(2024, 8, 1));
        let health = client.health_details.unwrap();
        assert_eq!(health.floater_type, FloaterType::Individual);
        assert_eq!(health.ages, "28");
    }

    #[test]
    fn client_tolerates_missing_optional_fields() {
        let raw = r#"{"id":1,"name":"Ravi","mobile":"111","insurance_type":"vehicle"}"#;
        let client: Client = serde_json::from_str(raw).unwrap();
        assert_eq!(client.place, "");
        assert!(!client.is_converted);
        assert_eq!(client.renewal_date(), None);
    }
}
