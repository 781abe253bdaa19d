//! Role transition integration tests.

use std::cell::Cell;
use std::collections::HashMap;

use vitalpaw_core::db::{Database, DbError, DbResult};
use vitalpaw_core::models::{Appointment, NewPet, Pet, Role, Service, Sex, User};
use vitalpaw_core::scheduling::{
    AppointmentDirectory, AssignmentService, RoleTransitionGuard, SchedulingError, UserDirectory,
};

/// Directory whose appointment writes start failing after `budget` successes.
struct FlakyDirectory<'a> {
    inner: &'a Database,
    budget: Cell<usize>,
}

impl<'a> FlakyDirectory<'a> {
    fn new(inner: &'a Database, budget: usize) -> Self {
        Self {
            inner,
            budget: Cell::new(budget),
        }
    }
}

impl UserDirectory for FlakyDirectory<'_> {
    fn find_user(&self, id: &str) -> DbResult<Option<User>> {
        self.inner.find_user(id)
    }

    fn find_by_external_id(&self, external_id: &str) -> DbResult<Option<User>> {
        self.inner.find_by_external_id(external_id)
    }

    fn find_by_role(&self, role: Role) -> DbResult<Vec<User>> {
        self.inner.find_by_role(role)
    }

    fn set_role(&self, id: &str, role: Role) -> DbResult<bool> {
        self.inner.set_role(id, role)
    }
}

impl AppointmentDirectory for FlakyDirectory<'_> {
    fn appointments_for_veterinarian(&self, veterinarian_id: &str) -> DbResult<Vec<Appointment>> {
        self.inner.appointments_for_veterinarian(veterinarian_id)
    }

    fn appointment_counts(&self, veterinarian_ids: &[String]) -> DbResult<HashMap<String, u64>> {
        self.inner.appointment_counts(veterinarian_ids)
    }

    fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        AppointmentDirectory::insert_appointment(self.inner, appointment)
    }

    fn assign_veterinarian(&self, appointment_id: &str, veterinarian_id: &str) -> DbResult<bool> {
        let remaining = self.budget.get();
        if remaining == 0 {
            return Err(DbError::Constraint("disk I/O error".to_string()));
        }
        self.budget.set(remaining - 1);
        self.inner.assign_veterinarian(appointment_id, veterinarian_id)
    }
}

/// Directory where one appointment is cancelled just before it gets reassigned.
struct CancellingDirectory<'a> {
    inner: &'a Database,
    cancelled: &'a str,
}

impl UserDirectory for CancellingDirectory<'_> {
    fn find_user(&self, id: &str) -> DbResult<Option<User>> {
        self.inner.find_user(id)
    }

    fn find_by_external_id(&self, external_id: &str) -> DbResult<Option<User>> {
        self.inner.find_by_external_id(external_id)
    }

    fn find_by_role(&self, role: Role) -> DbResult<Vec<User>> {
        self.inner.find_by_role(role)
    }

    fn set_role(&self, id: &str, role: Role) -> DbResult<bool> {
        self.inner.set_role(id, role)
    }
}

impl AppointmentDirectory for CancellingDirectory<'_> {
    fn appointments_for_veterinarian(&self, veterinarian_id: &str) -> DbResult<Vec<Appointment>> {
        self.inner.appointments_for_veterinarian(veterinarian_id)
    }

    fn appointment_counts(&self, veterinarian_ids: &[String]) -> DbResult<HashMap<String, u64>> {
        self.inner.appointment_counts(veterinarian_ids)
    }

    fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        AppointmentDirectory::insert_appointment(self.inner, appointment)
    }

    fn assign_veterinarian(&self, appointment_id: &str, veterinarian_id: &str) -> DbResult<bool> {
        if appointment_id == self.cancelled {
            self.inner.delete_appointment(appointment_id)?;
        }
        self.inner.assign_veterinarian(appointment_id, veterinarian_id)
    }
}

struct Fixture {
    db: Database,
    admin: User,
    owner: User,
    pet: Pet,
    seq: Cell<u32>,
}

impl Fixture {
    fn new() -> Self {
        let db = Database::open_in_memory().unwrap();
        let admin = User::new(
            "auth0|admin".to_string(),
            "admin@vitalpaw.test".to_string(),
            "Admin".to_string(),
            String::new(),
            0,
        )
        .with_role(Role::Admin);
        db.insert_user(&admin).unwrap();

        let owner = User::new(
            "auth0|owner".to_string(),
            "owner@example.com".to_string(),
            "Owner".to_string(),
            "female".to_string(),
            100,
        );
        db.insert_user(&owner).unwrap();

        let pet = Pet::new(
            owner.id.clone(),
            NewPet {
                name: "Nala".to_string(),
                species: "feline".to_string(),
                breed: "Persian".to_string(),
                age: 3,
                age_unit: None,
                weight_kg: 4.1,
                sex: Sex::Female,
            },
        );
        db.insert_pet(&pet).unwrap();

        Self {
            db,
            admin,
            owner,
            pet,
            seq: Cell::new(0),
        }
    }

    fn veterinarian(&self, id: &str) -> String {
        let seq = self.seq.get() + 1;
        self.seq.set(seq);
        let mut vet = User::new(
            format!("auth0|{}", id),
            format!("{}@vitalpaw.test", id),
            format!("Dr. {}", id),
            String::new(),
            0,
        )
        .with_role(Role::Veterinarian);
        vet.id = id.to_string();
        vet.created_at = format!("2026-03-01T00:00:{:02}.000000Z", seq);
        self.db.insert_user(&vet).unwrap();
        vet.id
    }

    fn appointment(&self, id: &str, veterinarian_id: &str) {
        let mut appt = Appointment::new(
            self.owner.id.clone(),
            self.pet.id.clone(),
            self.pet.name.clone(),
            veterinarian_id.to_string(),
            Service::Emergency,
            "Not eating".to_string(),
            "2026-11-12".to_string(),
            "08:30".to_string(),
        );
        appt.id = id.to_string();
        self.db.insert_appointment(&appt).unwrap();
    }

    fn role_of(&self, id: &str) -> Role {
        self.db.get_user(id).unwrap().unwrap().role
    }

    fn veterinarian_of(&self, appointment_id: &str) -> String {
        self.db
            .get_appointment(appointment_id)
            .unwrap()
            .unwrap()
            .veterinarian_id
    }
}

#[test]
fn test_demotion_to_client_hands_off_appointments() {
    let fx = Fixture::new();
    let v1 = fx.veterinarian("v1");
    let v2 = fx.veterinarian("v2");
    fx.appointment("a1", &v1);
    fx.appointment("a2", &v1);

    let updated = RoleTransitionGuard::new(&fx.db)
        .request_role_change(&v1, "client", &fx.admin)
        .unwrap();

    assert_eq!(updated.role, Role::Client);
    assert_eq!(fx.veterinarian_of("a1"), v2);
    assert_eq!(fx.veterinarian_of("a2"), v2);
}

#[test]
fn test_demotion_to_admin_also_hands_off() {
    let fx = Fixture::new();
    let v1 = fx.veterinarian("v1");
    let v2 = fx.veterinarian("v2");
    fx.appointment("a1", &v1);

    RoleTransitionGuard::new(&fx.db)
        .request_role_change(&v1, "admin", &fx.admin)
        .unwrap();

    assert_eq!(fx.role_of(&v1), Role::Admin);
    assert_eq!(fx.veterinarian_of("a1"), v2);
}

#[test]
fn test_same_role_request_touches_nothing() {
    let fx = Fixture::new();
    let v1 = fx.veterinarian("v1");
    fx.appointment("a1", &v1);

    let updated = RoleTransitionGuard::new(&fx.db)
        .request_role_change(&fx.owner.id, "client", &fx.admin)
        .unwrap();
    assert_eq!(updated.role, Role::Client);

    let updated = RoleTransitionGuard::new(&fx.db)
        .request_role_change(&v1, "veterinarian", &fx.admin)
        .unwrap();
    assert_eq!(updated.role, Role::Veterinarian);
    assert_eq!(fx.veterinarian_of("a1"), v1);
}

#[test]
fn test_lone_veterinarian_with_appointments_is_kept() {
    let fx = Fixture::new();
    let v1 = fx.veterinarian("v1");
    fx.appointment("a1", &v1);
    fx.appointment("a2", &v1);

    let err = RoleTransitionGuard::new(&fx.db)
        .request_role_change(&v1, "client", &fx.admin)
        .unwrap_err();

    assert!(matches!(
        err,
        SchedulingError::NoAlternateVeterinarian { pending: 2, .. }
    ));
    assert_eq!(fx.role_of(&v1), Role::Veterinarian);
    assert_eq!(fx.veterinarian_of("a1"), v1);
    assert_eq!(fx.veterinarian_of("a2"), v1);
}

#[test]
fn test_non_admin_cannot_change_roles() {
    let fx = Fixture::new();
    let v1 = fx.veterinarian("v1");
    let v2 = fx.veterinarian("v2");
    let acting_vet = fx.db.get_user(&v2).unwrap().unwrap();

    let err = RoleTransitionGuard::new(&fx.db)
        .request_role_change(&v1, "client", &acting_vet)
        .unwrap_err();
    assert!(matches!(err, SchedulingError::Forbidden(_)));

    let err = RoleTransitionGuard::new(&fx.db)
        .request_role_change(&fx.owner.id, "admin", &fx.owner)
        .unwrap_err();
    assert!(matches!(err, SchedulingError::Forbidden(_)));
    assert_eq!(fx.role_of(&fx.owner.id), Role::Client);
}

#[test]
fn test_partial_failure_keeps_role_and_reports_progress() {
    let fx = Fixture::new();
    let v1 = fx.veterinarian("v1");
    let v2 = fx.veterinarian("v2");
    let v3 = fx.veterinarian("v3");
    for id in ["a1", "a2", "a3", "a4"] {
        fx.appointment(id, &v1);
    }

    let flaky = FlakyDirectory::new(&fx.db, 2);
    let err = RoleTransitionGuard::new(&flaky)
        .request_role_change(&v1, "client", &fx.admin)
        .unwrap_err();

    match err {
        SchedulingError::PartialFailure { moved, source } => {
            assert_eq!(moved, 2);
            assert!(matches!(source, DbError::Constraint(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(fx.role_of(&v1), Role::Veterinarian);
    assert_eq!(fx.veterinarian_of("a1"), v2);
    assert_eq!(fx.veterinarian_of("a2"), v3);
    assert_eq!(fx.veterinarian_of("a3"), v1);
    assert_eq!(fx.veterinarian_of("a4"), v1);

    // Retrying against a healthy store finishes the hand-off.
    RoleTransitionGuard::new(&fx.db)
        .request_role_change(&v1, "client", &fx.admin)
        .unwrap();
    assert_eq!(fx.role_of(&v1), Role::Client);
    assert!(fx.db.list_appointments_for_veterinarian(&v1).unwrap().is_empty());
    assert_eq!(fx.db.count_appointments().unwrap(), 4);
}

#[test]
fn test_appointment_cancelled_mid_batch_is_skipped() {
    let fx = Fixture::new();
    let v1 = fx.veterinarian("v1");
    let v2 = fx.veterinarian("v2");
    let v3 = fx.veterinarian("v3");
    for id in ["a1", "a2", "a3", "a4"] {
        fx.appointment(id, &v1);
    }

    let directory = CancellingDirectory {
        inner: &fx.db,
        cancelled: "a2",
    };
    let moved = AssignmentService::new(&directory)
        .reassign_appointments(&v1)
        .unwrap();

    assert_eq!(moved, 3);
    assert!(fx.db.get_appointment("a2").unwrap().is_none());
    // The skipped appointment does not count toward v3's load.
    assert_eq!(fx.veterinarian_of("a1"), v2);
    assert_eq!(fx.veterinarian_of("a3"), v3);
    assert_eq!(fx.veterinarian_of("a4"), v2);
}

#[test]
fn test_role_change_commits_when_appointment_cancelled_mid_batch() {
    let fx = Fixture::new();
    let v1 = fx.veterinarian("v1");
    let v2 = fx.veterinarian("v2");
    let v3 = fx.veterinarian("v3");
    for id in ["a1", "a2", "a3", "a4"] {
        fx.appointment(id, &v1);
    }

    let directory = CancellingDirectory {
        inner: &fx.db,
        cancelled: "a2",
    };
    let updated = RoleTransitionGuard::new(&directory)
        .request_role_change(&v1, "client", &fx.admin)
        .unwrap();

    assert_eq!(updated.role, Role::Client);
    assert_eq!(fx.role_of(&v1), Role::Client);
    assert!(fx.db.list_appointments_for_veterinarian(&v1).unwrap().is_empty());
    assert_eq!(fx.db.count_appointments().unwrap(), 3);
    assert_eq!(fx.veterinarian_of("a1"), v2);
    assert_eq!(fx.veterinarian_of("a3"), v3);
    assert_eq!(fx.veterinarian_of("a4"), v2);
}

#[test]
fn test_unknown_role_leaves_target_untouched() {
    let fx = Fixture::new();
    let v1 = fx.veterinarian("v1");
    fx.appointment("a1", &v1);

    let err = RoleTransitionGuard::new(&fx.db)
        .request_role_change(&v1, "groomer", &fx.admin)
        .unwrap_err();
    assert!(matches!(err, SchedulingError::InvalidRole(ref role) if role == "groomer"));
    assert_eq!(fx.role_of(&v1), Role::Veterinarian);
    assert_eq!(fx.veterinarian_of("a1"), v1);
}
