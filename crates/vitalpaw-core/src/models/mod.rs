//! Domain models for the VitalPaw clinic.

mod appointment;
mod medical_record;
mod pet;
mod shop;
mod user;

pub use appointment::*;
pub use medical_record::*;
pub use pet::*;
pub use shop::*;
pub use user::*;

use chrono::{SecondsFormat, Utc};

/// Current UTC time as RFC 3339 with fixed microsecond precision.
///
/// Fixed width keeps stored timestamps lexically sortable.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Generate a new record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
