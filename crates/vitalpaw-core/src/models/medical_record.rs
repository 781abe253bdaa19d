//! Medical record models.

use serde::{Deserialize, Serialize};

use super::{Appointment, Service};

/// Notes and treatment recorded by a veterinarian after a visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecord {
    /// Local UUID
    pub id: String,
    pub pet_id: String,
    /// Source appointment; cleared if the appointment is later deleted
    pub appointment_id: Option<String>,
    /// Clinical notes
    pub notes: String,
    /// Prescribed treatment
    pub treatment: String,
    pub service: Service,
    pub description: String,
    pub date: String,
    pub time: String,
    /// Creation timestamp
    pub created_at: String,
}

impl MedicalRecord {
    /// Create a record for the visit described by `appointment`.
    pub fn from_appointment(appointment: &Appointment, notes: String, treatment: String) -> Self {
        Self {
            id: super::new_id(),
            pet_id: appointment.pet_id.clone(),
            appointment_id: Some(appointment.id.clone()),
            notes,
            treatment,
            service: appointment.service,
            description: appointment.description.clone(),
            date: appointment.date.clone(),
            time: appointment.time.clone(),
            created_at: super::now_timestamp(),
        }
    }
}
