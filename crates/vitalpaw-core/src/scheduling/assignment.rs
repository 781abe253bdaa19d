//! Appointment assignment: booking and bulk reassignment.

use tracing::{debug, info, warn};

use super::{
    select_least_loaded, AppointmentDirectory, LoadTally, SchedulingError, SchedulingResult,
    UserDirectory,
};
use crate::models::{Appointment, Role};

/// Assigns appointments to veterinarians by current load.
///
/// Counts are read fresh from the directory on every call; nothing is cached
/// between operations.
pub struct AssignmentService<'a, D> {
    directory: &'a D,
}

impl<'a, D> AssignmentService<'a, D>
where
    D: UserDirectory + AppointmentDirectory,
{
    /// Create a new assignment service over `directory`.
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// IDs of every current veterinarian, in registration order.
    pub fn veterinarian_ids(&self) -> SchedulingResult<Vec<String>> {
        Ok(self
            .directory
            .find_by_role(Role::Veterinarian)?
            .into_iter()
            .map(|user| user.id)
            .collect())
    }

    /// Current load of every veterinarian.
    pub fn current_loads(&self) -> SchedulingResult<LoadTally> {
        let candidates = self.veterinarian_ids()?;
        let counts = self.directory.appointment_counts(&candidates)?;
        Ok(LoadTally::new(candidates, &counts))
    }

    /// Choose the veterinarian for a new appointment among `candidates`.
    pub fn assign_veterinarian(&self, candidates: &[String]) -> SchedulingResult<String> {
        if candidates.is_empty() {
            return Err(SchedulingError::NoVeterinariansAvailable);
        }

        let counts = self.directory.appointment_counts(candidates)?;
        select_least_loaded(candidates, &counts)
            .map(str::to_string)
            .ok_or(SchedulingError::NoVeterinariansAvailable)
    }

    /// Assign a veterinarian, build the appointment with `build` and persist it.
    ///
    /// The appointment is written as a single row; if the write fails nothing
    /// is left behind.
    pub fn create_appointment<F>(&self, build: F) -> SchedulingResult<Appointment>
    where
        F: FnOnce(String) -> Appointment,
    {
        let candidates = self.veterinarian_ids()?;
        let veterinarian_id = self.assign_veterinarian(&candidates)?;
        let appointment = build(veterinarian_id);

        self.directory.insert_appointment(&appointment)?;
        info!(
            appointment_id = %appointment.id,
            veterinarian_id = %appointment.veterinarian_id,
            candidates = candidates.len(),
            "assigned new appointment"
        );
        Ok(appointment)
    }

    /// Move every appointment of `from_veterinarian` to the other veterinarians.
    ///
    /// Returns the number of appointments moved.
    pub fn reassign_appointments(&self, from_veterinarian: &str) -> SchedulingResult<usize> {
        let pending = self.directory.appointments_for_veterinarian(from_veterinarian)?;
        if pending.is_empty() {
            return Ok(0);
        }

        let others: Vec<String> = self
            .veterinarian_ids()?
            .into_iter()
            .filter(|id| id != from_veterinarian)
            .collect();

        self.redistribute(from_veterinarian, &pending, &others)
    }

    /// Move every appointment of `from_veterinarian` onto `others`.
    ///
    /// `from_veterinarian` is never chosen even if it appears in `others`.
    pub fn reassign_appointments_to(
        &self,
        from_veterinarian: &str,
        others: &[String],
    ) -> SchedulingResult<usize> {
        let pending = self.directory.appointments_for_veterinarian(from_veterinarian)?;
        if pending.is_empty() {
            return Ok(0);
        }

        let others: Vec<String> = others
            .iter()
            .filter(|id| id.as_str() != from_veterinarian)
            .cloned()
            .collect();

        self.redistribute(from_veterinarian, &pending, &others)
    }

    fn redistribute(
        &self,
        from_veterinarian: &str,
        pending: &[Appointment],
        others: &[String],
    ) -> SchedulingResult<usize> {
        if others.is_empty() {
            return Err(SchedulingError::NoAlternateVeterinarian {
                veterinarian_id: from_veterinarian.to_string(),
                pending: pending.len(),
            });
        }

        let counts = self.directory.appointment_counts(others)?;
        let mut tally = LoadTally::new(others.iter().cloned(), &counts);

        info!(
            veterinarian_id = %from_veterinarian,
            appointments = pending.len(),
            destinations = tally.len(),
            "reassigning appointments"
        );

        let mut moved = 0;
        for appointment in pending {
            let target = match tally.least_loaded() {
                Some(target) => target.to_string(),
                None => {
                    return Err(SchedulingError::NoAlternateVeterinarian {
                        veterinarian_id: from_veterinarian.to_string(),
                        pending: pending.len() - moved,
                    })
                }
            };

            match self.directory.assign_veterinarian(&appointment.id, &target) {
                Ok(true) => {
                    tally.record_assignment(&target);
                    moved += 1;
                    debug!(appointment_id = %appointment.id, to = %target, "moved appointment");
                }
                Ok(false) => {
                    debug!(appointment_id = %appointment.id, "appointment deleted mid-batch, skipped");
                }
                Err(source) => {
                    warn!(
                        veterinarian_id = %from_veterinarian,
                        moved,
                        remaining = pending.len() - moved,
                        error = %source,
                        "reassignment batch failed"
                    );
                    return Err(SchedulingError::PartialFailure { moved, source });
                }
            }
        }

        info!(veterinarian_id = %from_veterinarian, moved, "reassignment complete");
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{AgeUnit, NewPet, Pet, Service, Sex, User};

    struct Fixture {
        db: Database,
        owner: User,
        pet: Pet,
    }

    fn setup() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let owner = User::new("o".into(), "o@example.com".into(), "O".into(), "male".into(), 100);
        db.insert_user(&owner).unwrap();
        let pet = Pet::new(
            owner.id.clone(),
            NewPet {
                name: "Max".into(),
                species: "canine".into(),
                breed: "Beagle".into(),
                age: 2,
                age_unit: Some(AgeUnit::Years),
                weight_kg: 10.0,
                sex: Sex::Male,
            },
        );
        db.insert_pet(&pet).unwrap();
        Fixture { db, owner, pet }
    }

    fn add_vet(clinic: &Fixture, id: &str, seq: u32) -> String {
        let mut vet = User::new(
            format!("ext-{}", id),
            format!("{}@example.com", id),
            id.to_uppercase(),
            "female".into(),
            100,
        )
        .with_role(Role::Veterinarian);
        vet.id = id.to_string();
        vet.created_at = format!("2026-01-{:02}T00:00:00.000000Z", seq);
        clinic.db.insert_user(&vet).unwrap();
        vet.id
    }

    fn book(clinic: &Fixture, id: &str, vet: &str) {
        let mut appt = Appointment::new(
            clinic.owner.id.clone(),
            clinic.pet.id.clone(),
            clinic.pet.name.clone(),
            vet.to_string(),
            Service::Grooming,
            "Bath".into(),
            "2026-11-01".into(),
            "10:00".into(),
        );
        appt.id = id.to_string();
        clinic.db.insert_appointment(&appt).unwrap();
    }

    fn vet_of(clinic: &Fixture, appointment_id: &str) -> String {
        clinic
            .db
            .get_appointment(appointment_id)
            .unwrap()
            .unwrap()
            .veterinarian_id
    }

    #[test]
    fn test_assign_with_no_candidates() {
        let clinic = setup();
        let service = AssignmentService::new(&clinic.db);
        assert!(matches!(
            service.assign_veterinarian(&[]),
            Err(SchedulingError::NoVeterinariansAvailable)
        ));
    }

    #[test]
    fn test_booking_goes_to_least_loaded() {
        let clinic = setup();
        let v1 = add_vet(&clinic, "v1", 1);
        let v2 = add_vet(&clinic, "v2", 2);
        for id in ["a1", "a2", "a3"] {
            book(&clinic, id, &v1);
        }
        book(&clinic, "a4", &v2);

        let service = AssignmentService::new(&clinic.db);
        let created = service
            .create_appointment(|vet| {
                Appointment::new(
                    clinic.owner.id.clone(),
                    clinic.pet.id.clone(),
                    clinic.pet.name.clone(),
                    vet,
                    Service::Consultation,
                    "Checkup".into(),
                    "2026-11-02".into(),
                    "09:00".into(),
                )
            })
            .unwrap();

        assert_eq!(created.veterinarian_id, v2);
        let loads = service.current_loads().unwrap();
        assert_eq!(loads.count(&v1), Some(3));
        assert_eq!(loads.count(&v2), Some(2));
    }

    #[test]
    fn test_booking_without_veterinarians_writes_nothing() {
        let clinic = setup();
        let service = AssignmentService::new(&clinic.db);
        let result = service.create_appointment(|vet| {
            Appointment::new(
                clinic.owner.id.clone(),
                clinic.pet.id.clone(),
                clinic.pet.name.clone(),
                vet,
                Service::Emergency,
                "Bleeding".into(),
                "2026-11-02".into(),
                "09:00".into(),
            )
        });

        assert!(matches!(result, Err(SchedulingError::NoVeterinariansAvailable)));
        assert_eq!(clinic.db.count_appointments().unwrap(), 0);
    }

    #[test]
    fn test_reassignment_spreads_across_idle_veterinarians() {
        let clinic = setup();
        let v1 = add_vet(&clinic, "v1", 1);
        let v2 = add_vet(&clinic, "v2", 2);
        let v3 = add_vet(&clinic, "v3", 3);
        for id in ["a1", "a2", "a3"] {
            book(&clinic, id, &v1);
        }

        let moved = AssignmentService::new(&clinic.db)
            .reassign_appointments(&v1)
            .unwrap();

        assert_eq!(moved, 3);
        assert_eq!(vet_of(&clinic, "a1"), v2);
        assert_eq!(vet_of(&clinic, "a2"), v3);
        assert_eq!(vet_of(&clinic, "a3"), v2);
    }

    #[test]
    fn test_reassignment_accounts_for_existing_load() {
        let clinic = setup();
        let v1 = add_vet(&clinic, "v1", 1);
        let v2 = add_vet(&clinic, "v2", 2);
        let v3 = add_vet(&clinic, "v3", 3);
        book(&clinic, "b1", &v2);
        book(&clinic, "b2", &v2);
        for id in ["a1", "a2", "a3", "a4"] {
            book(&clinic, id, &v1);
        }

        AssignmentService::new(&clinic.db)
            .reassign_appointments(&v1)
            .unwrap();

        let loads = AssignmentService::new(&clinic.db).current_loads().unwrap();
        assert_eq!(loads.count(&v1), Some(0));
        assert_eq!(loads.count(&v2), Some(3));
        assert_eq!(loads.count(&v3), Some(3));
    }

    #[test]
    fn test_reassignment_without_appointments_is_trivial() {
        let clinic = setup();
        let v1 = add_vet(&clinic, "v1", 1);
        let moved = AssignmentService::new(&clinic.db)
            .reassign_appointments(&v1)
            .unwrap();
        assert_eq!(moved, 0);
    }

    #[test]
    fn test_reassignment_without_alternate_is_rejected_before_writes() {
        let clinic = setup();
        let v1 = add_vet(&clinic, "v1", 1);
        book(&clinic, "a1", &v1);
        book(&clinic, "a2", &v1);

        let err = AssignmentService::new(&clinic.db)
            .reassign_appointments(&v1)
            .unwrap_err();

        match err {
            SchedulingError::NoAlternateVeterinarian { veterinarian_id, pending } => {
                assert_eq!(veterinarian_id, v1);
                assert_eq!(pending, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(vet_of(&clinic, "a1"), v1);
        assert_eq!(vet_of(&clinic, "a2"), v1);
    }

    #[test]
    fn test_explicit_destinations_exclude_source() {
        let clinic = setup();
        let v1 = add_vet(&clinic, "v1", 1);
        let v2 = add_vet(&clinic, "v2", 2);
        book(&clinic, "a1", &v1);
        book(&clinic, "a2", &v1);

        let service = AssignmentService::new(&clinic.db);
        let moved = service
            .reassign_appointments_to(&v1, &[v1.clone(), v2.clone()])
            .unwrap();

        assert_eq!(moved, 2);
        assert_eq!(vet_of(&clinic, "a1"), v2);
        assert_eq!(vet_of(&clinic, "a2"), v2);
    }
}
