//! Booking and appointment management.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{not_found, require_role, Clinic, ClinicError, ClinicResult};
use crate::models::{Appointment, AppointmentEdit, NewAppointment, Role, User};
use crate::scheduling::{AssignmentService, LoadTally};

/// A veterinarian with their current appointment count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VeterinarianLoad {
    pub veterinarian: User,
    pub appointments: u64,
}

impl<'a> Clinic<'a> {
    /// Book an appointment for one of the actor's pets.
    ///
    /// The veterinarian is chosen by current load.
    pub fn book_appointment(&self, actor: &User, request: NewAppointment) -> ClinicResult<Appointment> {
        require_role(actor, &[Role::Client], "book appointments")?;
        let request = request.normalize().map_err(ClinicError::InvalidInput)?;

        let pet = self
            .db
            .get_pet(&request.pet_id)?
            .filter(|pet| pet.is_owned_by(&actor.id))
            .ok_or_else(|| not_found("pet", &request.pet_id))?;

        let appointment = AssignmentService::new(self.db).create_appointment(|veterinarian_id| {
            Appointment::new(
                actor.id.clone(),
                pet.id.clone(),
                pet.name.clone(),
                veterinarian_id,
                request.service,
                request.description.clone(),
                request.date.clone(),
                request.time.clone(),
            )
        })?;
        Ok(appointment)
    }

    pub fn get_appointment(&self, id: &str) -> ClinicResult<Appointment> {
        self.db
            .get_appointment(id)?
            .ok_or_else(|| not_found("appointment", id))
    }

    pub fn list_appointments(&self, actor: &User) -> ClinicResult<Vec<Appointment>> {
        require_role(actor, &[Role::Admin], "list all appointments")?;
        Ok(self.db.list_appointments()?)
    }

    pub fn list_appointments_for_owner(&self, actor: &User, owner_id: &str) -> ClinicResult<Vec<Appointment>> {
        require_role(actor, &[Role::Admin], "list a client's appointments")?;
        Ok(self.db.list_appointments_for_owner(owner_id)?)
    }

    /// The actor's own schedule, by date then time.
    pub fn list_veterinarian_schedule(&self, actor: &User) -> ClinicResult<Vec<Appointment>> {
        require_role(actor, &[Role::Veterinarian], "view a schedule")?;
        Ok(self.db.list_schedule_for_veterinarian(&actor.id)?)
    }

    /// Appointments the actor booked, by date then time.
    pub fn list_client_appointments(&self, actor: &User) -> ClinicResult<Vec<Appointment>> {
        require_role(actor, &[Role::Client], "view booked appointments")?;
        Ok(self.db.list_appointments_for_owner(&actor.id)?)
    }

    /// Update an appointment assigned to the acting veterinarian.
    pub fn edit_appointment(&self, actor: &User, id: &str, edit: AppointmentEdit) -> ClinicResult<Appointment> {
        require_role(actor, &[Role::Veterinarian], "edit appointments")?;
        let edit = edit.normalize().map_err(ClinicError::InvalidInput)?;

        let mut appointment = self.get_appointment(id)?;
        if appointment.veterinarian_id != actor.id {
            return Err(ClinicError::Forbidden(format!(
                "appointment {} is assigned to another veterinarian",
                id
            )));
        }

        appointment.apply_edit(edit);
        if !self.db.update_appointment_details(&appointment)? {
            return Err(not_found("appointment", id));
        }
        info!(appointment_id = %id, "appointment edited");
        Ok(appointment)
    }

    /// Delete an appointment.
    ///
    /// Admins may delete any appointment, veterinarians only those assigned to
    /// them and clients only those they booked.
    pub fn delete_appointment(&self, actor: &User, id: &str) -> ClinicResult<()> {
        let appointment = self.get_appointment(id)?;

        let deleted = match actor.role {
            Role::Admin => self.db.delete_appointment(id)?,
            Role::Veterinarian if appointment.veterinarian_id == actor.id => {
                self.db.delete_appointment_for_veterinarian(id, &actor.id)?
            }
            Role::Client if appointment.owner_id == actor.id => {
                self.db.delete_appointment_for_owner(id, &actor.id)?
            }
            _ => {
                return Err(ClinicError::Forbidden(format!(
                    "{} may not delete appointment {}",
                    actor.role, id
                )))
            }
        };

        if !deleted {
            return Err(not_found("appointment", id));
        }
        info!(appointment_id = %id, actor_id = %actor.id, "appointment deleted");
        Ok(())
    }

    /// Appointment counts for every veterinarian, in registration order.
    pub fn veterinarian_loads(&self, actor: &User) -> ClinicResult<Vec<VeterinarianLoad>> {
        require_role(actor, &[Role::Admin], "view veterinarian loads")?;

        let veterinarians = self.db.list_users_by_role(Role::Veterinarian)?;
        let ids: Vec<String> = veterinarians.iter().map(|v| v.id.clone()).collect();
        let counts = self.db.count_appointments_by_veterinarian(&ids)?;
        let tally = LoadTally::new(ids, &counts);

        Ok(veterinarians
            .into_iter()
            .map(|veterinarian| {
                let appointments = tally.count(&veterinarian.id).unwrap_or(0);
                VeterinarianLoad {
                    veterinarian,
                    appointments,
                }
            })
            .collect())
    }
}
