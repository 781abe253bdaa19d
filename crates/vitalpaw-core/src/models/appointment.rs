//! Appointment models.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Service requested for an appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Grooming,
    Consultation,
    Emergency,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Grooming => "grooming",
            Service::Consultation => "consultation",
            Service::Emergency => "emergency",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "grooming" => Some(Service::Grooming),
            "consultation" => Some(Service::Consultation),
            "emergency" => Some(Service::Emergency),
            _ => None,
        }
    }
}

/// A booked appointment.
///
/// `veterinarian_id` must always reference a user whose role is
/// veterinarian; the reassignment flow restores this whenever a
/// veterinarian is demoted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Local UUID
    pub id: String,
    /// Client who booked
    pub owner_id: String,
    pub pet_id: String,
    /// Pet name at booking time
    pub pet_name: String,
    /// Assigned veterinarian
    pub veterinarian_id: String,
    pub service: Service,
    pub description: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Local time of day, `HH:MM`
    pub time: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Client-supplied booking request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAppointment {
    pub pet_id: String,
    pub service: Service,
    pub description: String,
    pub date: String,
    pub time: String,
}

/// Fields a veterinarian may change on an assigned appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentEdit {
    pub service: Service,
    pub description: String,
    pub date: String,
    pub time: String,
}

impl Appointment {
    /// Build an appointment for `owner_id`'s pet, assigned to `veterinarian_id`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: String,
        pet_id: String,
        pet_name: String,
        veterinarian_id: String,
        service: Service,
        description: String,
        date: String,
        time: String,
    ) -> Self {
        let now = super::now_timestamp();
        Self {
            id: super::new_id(),
            owner_id,
            pet_id,
            pet_name,
            veterinarian_id,
            service,
            description,
            date,
            time,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Apply a veterinarian's edit.
    pub fn apply_edit(&mut self, edit: AppointmentEdit) {
        self.service = edit.service;
        self.description = edit.description.trim().to_string();
        self.date = edit.date;
        self.time = edit.time;
        self.updated_at = super::now_timestamp();
    }
}

/// Schedule fields in stored form: trimmed description, `YYYY-MM-DD` date and
/// zero-padded `HH:MM` time.
///
/// Listings order on the stored text, so `9:30` must become `09:30`.
pub fn normalize_schedule_fields(
    description: &str,
    date: &str,
    time: &str,
) -> Result<(String, String, String), String> {
    let description = description.trim();
    if description.is_empty() {
        return Err("description is required".into());
    }
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", date))?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| format!("invalid time '{}', expected HH:MM", time))?;
    Ok((
        description.to_string(),
        date.format("%Y-%m-%d").to_string(),
        time.format("%H:%M").to_string(),
    ))
}

impl NewAppointment {
    pub fn validate(&self) -> Result<(), String> {
        self.clone().normalize().map(|_| ())
    }

    /// Validate and convert to stored form.
    pub fn normalize(self) -> Result<Self, String> {
        if self.pet_id.trim().is_empty() {
            return Err("pet is required".into());
        }
        let (description, date, time) =
            normalize_schedule_fields(&self.description, &self.date, &self.time)?;
        Ok(Self {
            description,
            date,
            time,
            ..self
        })
    }
}

impl AppointmentEdit {
    pub fn validate(&self) -> Result<(), String> {
        self.clone().normalize().map(|_| ())
    }

    /// Validate and convert to stored form.
    pub fn normalize(self) -> Result<Self, String> {
        let (description, date, time) =
            normalize_schedule_fields(&self.description, &self.date, &self.time)?;
        Ok(Self {
            service: self.service,
            description,
            date,
            time,
        })
    }
}
