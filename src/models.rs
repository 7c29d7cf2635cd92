//! Domain models and data structures
//!
//! Records are schema-flexible JSON objects. Only the handful of fields an
//! operation names are ever inspected; everything else passes through as-is.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::infrastructure::store::ID_FIELD;

/// A schema-flexible document as it crosses the HTTP boundary
pub type Record = Map<String, Value>;

pub const RESORT_ID: &str = "resort_ID";
pub const LOCATION: &str = "location";
pub const PLACE_NAME: &str = "place_name";

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const IS_ADMIN: &str = "isAdmin";
pub const AGE: &str = "age";
pub const SECURITY_DEPOSIT: &str = "securityDeposit";
pub const ID_NUMBER: &str = "idNumber";

/// Fields matched by the resort search
pub const RESORT_SEARCH_FIELDS: &[&str] = &[LOCATION, RESORT_ID, PLACE_NAME];

/// Fields overwritten by the profile update
pub const PROFILE_FIELDS: &[&str] = &[AGE, SECURITY_DEPOSIT, ID_NUMBER];

/// One page of the resort catalog
#[derive(Debug, Serialize)]
pub struct ResortPage {
    pub resorts: Vec<Record>,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    #[serde(rename = "currentPage")]
    pub current_page: u64,
    #[serde(rename = "totalResorts")]
    pub total_resorts: u64,
}

/// Body returned by the patch endpoints
#[derive(Debug, Serialize)]
pub struct SuccessMessage {
    pub success: bool,
    pub message: String,
}

impl SuccessMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Drops a client-supplied identifier so the store always assigns one
pub fn without_id(mut record: Record) -> Record {
    record.remove(ID_FIELD);
    record
}

/// Non-empty string value of `field`, if any
pub fn non_empty_str<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}
