//! Store capabilities consumed by the scheduler.
//!
//! The scheduler never reaches for a global store; callers pass something
//! implementing these traits. [`Database`] is the production implementation.

use std::collections::HashMap;

use crate::db::{Database, DbResult};
use crate::models::{Appointment, Role, User};

/// Lookup and role updates for users.
pub trait UserDirectory {
    /// User by local ID.
    fn find_user(&self, id: &str) -> DbResult<Option<User>>;

    /// User by identity-provider subject.
    fn find_by_external_id(&self, external_id: &str) -> DbResult<Option<User>>;

    /// Users holding `role`, in a stable order.
    fn find_by_role(&self, role: Role) -> DbResult<Vec<User>>;

    /// Persist a role change; false if the user does not exist.
    fn set_role(&self, id: &str, role: Role) -> DbResult<bool>;
}

/// Appointment queries and writes needed for load balancing.
pub trait AppointmentDirectory {
    /// Appointments assigned to a veterinarian, ascending by ID.
    fn appointments_for_veterinarian(&self, veterinarian_id: &str) -> DbResult<Vec<Appointment>>;

    /// Grouped appointment counts for the given veterinarians.
    fn appointment_counts(&self, veterinarian_ids: &[String]) -> DbResult<HashMap<String, u64>>;

    /// Persist a new appointment as one unit.
    fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()>;

    /// Point one appointment at another veterinarian; false if it no longer exists.
    fn assign_veterinarian(&self, appointment_id: &str, veterinarian_id: &str) -> DbResult<bool>;
}

impl UserDirectory for Database {
    fn find_user(&self, id: &str) -> DbResult<Option<User>> {
        self.get_user(id)
    }

    fn find_by_external_id(&self, external_id: &str) -> DbResult<Option<User>> {
        self.get_user_by_external_id(external_id)
    }

    fn find_by_role(&self, role: Role) -> DbResult<Vec<User>> {
        self.list_users_by_role(role)
    }

    fn set_role(&self, id: &str, role: Role) -> DbResult<bool> {
        self.update_user_role(id, role)
    }
}

impl AppointmentDirectory for Database {
    fn appointments_for_veterinarian(&self, veterinarian_id: &str) -> DbResult<Vec<Appointment>> {
        self.list_appointments_for_veterinarian(veterinarian_id)
    }

    fn appointment_counts(&self, veterinarian_ids: &[String]) -> DbResult<HashMap<String, u64>> {
        self.count_appointments_by_veterinarian(veterinarian_ids)
    }

    fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        Database::insert_appointment(self, appointment)
    }

    fn assign_veterinarian(&self, appointment_id: &str, veterinarian_id: &str) -> DbResult<bool> {
        self.update_appointment_veterinarian(appointment_id, veterinarian_id)
    }
}
