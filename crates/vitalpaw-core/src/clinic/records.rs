//! Medical records written by veterinarians.

use tracing::info;

use super::{require_role, Clinic, ClinicError, ClinicResult};
use crate::models::{MedicalRecord, Role, User};

impl<'a> Clinic<'a> {
    /// Record notes and treatment for the visit behind `appointment_id`.
    pub fn add_medical_record(
        &self,
        actor: &User,
        appointment_id: &str,
        notes: &str,
        treatment: &str,
    ) -> ClinicResult<MedicalRecord> {
        require_role(actor, &[Role::Veterinarian], "write medical records")?;
        if notes.trim().is_empty() || treatment.trim().is_empty() {
            return Err(ClinicError::InvalidInput(
                "notes and treatment are required".into(),
            ));
        }

        let appointment = self.get_appointment(appointment_id)?;
        let record = MedicalRecord::from_appointment(
            &appointment,
            notes.trim().to_string(),
            treatment.trim().to_string(),
        );
        self.db.insert_medical_record(&record)?;
        info!(record_id = %record.id, pet_id = %record.pet_id, "medical record added");
        Ok(record)
    }

    /// All records, newest visit first.
    pub fn list_medical_records(&self, actor: &User) -> ClinicResult<Vec<MedicalRecord>> {
        require_role(actor, &[Role::Veterinarian], "read medical records")?;
        Ok(self.db.list_medical_records()?)
    }

    pub fn medical_records_for_pet(&self, actor: &User, pet_id: &str) -> ClinicResult<Vec<MedicalRecord>> {
        require_role(actor, &[Role::Veterinarian], "read medical records")?;
        Ok(self.db.list_medical_records_for_pet(pet_id)?)
    }
}
