//! VitalPaw Core Library
//!
//! Veterinary clinic backend: user roles, pets, appointments, medical records
//! and the VitalCoin shop, with appointments balanced across veterinarians.
//!
//! # Architecture
//!
//! ```text
//!   Booking request ──────────────┐
//!                                 ▼
//!                     Load Tally (fresh counts)
//!                                 │
//!                     Least-Loaded Selection
//!                                 │
//!                     appointments.veterinarian_id
//!                                 ▲
//!   Role change (vet → other) ────┘  one update per appointment,
//!                                    role written only after all moved
//! ```
//!
//! # Core Principle
//!
//! **Every appointment points at a current veterinarian.** A veterinarian is
//! only demoted once all of their appointments have been handed off.
//!
//! # Modules
//!
//! - [`db`]: SQLite directory store
//! - [`models`]: Domain types (User, Pet, Appointment, MedicalRecord, shop)
//! - [`scheduling`]: Load balancer, assignment service, role transition guard
//! - [`clinic`]: Role-checked clinic operations
//! - [`config`]: JSON configuration with environment overrides
//! - [`logging`]: Tracing subscriber setup

pub mod clinic;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod scheduling;

// Re-export commonly used types
pub use clinic::{Clinic, ClinicError, ClinicResult, VeterinarianLoad};
pub use config::{AdminSeed, ClinicConfig, ConfigError};
pub use db::{Database, DbError};
pub use models::{
    AgeUnit, Appointment, AppointmentEdit, Cart, CartLine, CheckoutReceipt, MedicalRecord,
    NewAppointment, NewPet, Pet, Product, PurchaseSummary, Role, Service, Sex, User,
};
pub use scheduling::{
    select_least_loaded, AppointmentDirectory, AssignmentService, LoadTally,
    RoleTransitionGuard, SchedulingError, UserDirectory,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum VitalPawError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Insufficient VitalCoins: need {required}, have {available}")]
    InsufficientCoins { required: i64, available: i64 },

    #[error("No veterinarians available")]
    NoVeterinariansAvailable,

    #[error("No alternate veterinarian for {pending} appointment(s) of {veterinarian_id}")]
    NoAlternateVeterinarian { veterinarian_id: String, pending: u64 },

    #[error("Reassignment stopped after {moved} appointment(s): {reason}")]
    PartialFailure { moved: u64, reason: String },
}

impl From<db::DbError> for VitalPawError {
    fn from(e: db::DbError) -> Self {
        VitalPawError::DatabaseError(e.to_string())
    }
}

impl From<config::ConfigError> for VitalPawError {
    fn from(e: config::ConfigError) -> Self {
        VitalPawError::ConfigError(e.to_string())
    }
}

impl From<SchedulingError> for VitalPawError {
    fn from(e: SchedulingError) -> Self {
        match e {
            SchedulingError::Database(e) => e.into(),
            SchedulingError::Forbidden(msg) => VitalPawError::Forbidden(msg),
            SchedulingError::NotFound(msg) => VitalPawError::NotFound(msg),
            SchedulingError::InvalidRole(role) => VitalPawError::InvalidRole(role),
            SchedulingError::NoVeterinariansAvailable => VitalPawError::NoVeterinariansAvailable,
            SchedulingError::NoAlternateVeterinarian {
                veterinarian_id,
                pending,
            } => VitalPawError::NoAlternateVeterinarian {
                veterinarian_id,
                pending: pending as u64,
            },
            SchedulingError::PartialFailure { moved, source } => VitalPawError::PartialFailure {
                moved: moved as u64,
                reason: source.to_string(),
            },
        }
    }
}

impl From<ClinicError> for VitalPawError {
    fn from(e: ClinicError) -> Self {
        match e {
            ClinicError::Forbidden(msg) => VitalPawError::Forbidden(msg),
            ClinicError::NotFound(msg) => VitalPawError::NotFound(msg),
            ClinicError::InvalidInput(msg) => VitalPawError::InvalidInput(msg),
            ClinicError::AlreadyRegistered(msg) => VitalPawError::AlreadyRegistered(msg),
            ClinicError::InsufficientCoins {
                required,
                available,
            } => VitalPawError::InsufficientCoins {
                required,
                available,
            },
            ClinicError::Scheduling(e) => e.into(),
            ClinicError::Database(e) => e.into(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for VitalPawError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        VitalPawError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path with default settings.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<VitalPawCore>, VitalPawError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(VitalPawCore::new(db, ClinicConfig::default())))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<VitalPawCore>, VitalPawError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(VitalPawCore::new(db, ClinicConfig::default())))
}

/// Open from a JSON config, install logging and seed bootstrap data.
#[uniffi::export]
pub fn open_with_config(config_json: String) -> Result<Arc<VitalPawCore>, VitalPawError> {
    let config = ClinicConfig::from_json_str(&config_json)?.with_env_overrides();
    logging::init_tracing(&config.log_filter);

    let db = match &config.database_path {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    Clinic::new(&db, &config).bootstrap()?;
    tracing::info!(
        database = ?config.database_path,
        "VitalPaw core ready v{}",
        env!("CARGO_PKG_VERSION")
    );

    Ok(Arc::new(VitalPawCore::new(db, config)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic handle for FFI.
///
/// Every method that acts on behalf of a user takes the identity-provider
/// subject of the already-authenticated caller.
#[derive(uniffi::Object)]
pub struct VitalPawCore {
    db: Arc<Mutex<Database>>,
    config: ClinicConfig,
}

impl VitalPawCore {
    fn new(db: Database, config: ClinicConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config,
        }
    }

    /// Run `op` with the clinic and the caller resolved from `subject`.
    fn as_actor<T, F>(&self, subject: &str, op: F) -> Result<T, VitalPawError>
    where
        F: FnOnce(&Clinic<'_>, &User) -> ClinicResult<T>,
    {
        let db = self.db.lock()?;
        let clinic = Clinic::new(&db, &self.config);
        let actor = clinic.resolve_actor(subject)?;
        Ok(op(&clinic, &actor)?)
    }

    /// Run `op` with the clinic only.
    fn with_clinic<T, F>(&self, op: F) -> Result<T, VitalPawError>
    where
        F: FnOnce(&Clinic<'_>) -> ClinicResult<T>,
    {
        let db = self.db.lock()?;
        let clinic = Clinic::new(&db, &self.config);
        Ok(op(&clinic)?)
    }
}

#[uniffi::export]
impl VitalPawCore {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Register the caller as a new client.
    pub fn register(
        &self,
        subject: String,
        email: String,
        name: String,
        gender: String,
    ) -> Result<FfiUser, VitalPawError> {
        self.with_clinic(|clinic| clinic.register(&subject, &email, &name, &gender))
            .map(Into::into)
    }

    /// The caller's own profile.
    pub fn current_user(&self, subject: String) -> Result<FfiUser, VitalPawError> {
        self.with_clinic(|clinic| clinic.resolve_actor(&subject))
            .map(Into::into)
    }

    pub fn get_user(&self, subject: String, user_id: String) -> Result<FfiUser, VitalPawError> {
        self.as_actor(&subject, |clinic, actor| clinic.get_user(actor, &user_id))
            .map(Into::into)
    }

    pub fn search_clients(
        &self,
        subject: String,
        email_fragment: String,
    ) -> Result<Vec<FfiUser>, VitalPawError> {
        let users = self.as_actor(&subject, |clinic, actor| {
            clinic.search_clients(actor, &email_fragment)
        })?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub fn list_veterinarians(&self, subject: String) -> Result<Vec<FfiUser>, VitalPawError> {
        let users = self.as_actor(&subject, |clinic, actor| clinic.list_veterinarians(actor))?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Change a user's role; demoting a veterinarian hands off their appointments.
    pub fn change_user_role(
        &self,
        subject: String,
        target_user_id: String,
        new_role: String,
    ) -> Result<FfiUser, VitalPawError> {
        self.as_actor(&subject, |clinic, actor| {
            clinic.change_role(actor, &target_user_id, &new_role)
        })
        .map(Into::into)
    }

    pub fn grant_vital_coins(
        &self,
        subject: String,
        target_user_id: String,
        amount: i64,
    ) -> Result<FfiUser, VitalPawError> {
        self.as_actor(&subject, |clinic, actor| {
            clinic.grant_vital_coins(actor, &target_user_id, amount)
        })
        .map(Into::into)
    }

    // =========================================================================
    // Pet Operations
    // =========================================================================

    pub fn create_pet(&self, subject: String, pet: FfiNewPet) -> Result<FfiPet, VitalPawError> {
        let details = NewPet::try_from(pet)?;
        self.as_actor(&subject, |clinic, actor| clinic.create_pet(actor, details))
            .map(Into::into)
    }

    pub fn get_pet(&self, subject: String, pet_id: String) -> Result<FfiPet, VitalPawError> {
        self.as_actor(&subject, |clinic, actor| clinic.get_pet(actor, &pet_id))
            .map(Into::into)
    }

    pub fn list_pets(&self, subject: String) -> Result<Vec<FfiPet>, VitalPawError> {
        let pets = self.as_actor(&subject, |clinic, actor| clinic.list_pets(actor))?;
        Ok(pets.into_iter().map(Into::into).collect())
    }

    pub fn list_own_pets(&self, subject: String) -> Result<Vec<FfiPet>, VitalPawError> {
        let pets = self.as_actor(&subject, |clinic, actor| clinic.list_own_pets(actor))?;
        Ok(pets.into_iter().map(Into::into).collect())
    }

    /// Delete a pet along with its appointments and medical records.
    pub fn delete_pet(&self, subject: String, pet_id: String) -> Result<(), VitalPawError> {
        self.as_actor(&subject, |clinic, actor| clinic.delete_pet(actor, &pet_id))
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    /// Book an appointment; the least-loaded veterinarian is assigned.
    pub fn book_appointment(
        &self,
        subject: String,
        request: FfiNewAppointment,
    ) -> Result<FfiAppointment, VitalPawError> {
        let request = NewAppointment::try_from(request)?;
        self.as_actor(&subject, |clinic, actor| clinic.book_appointment(actor, request))
            .map(Into::into)
    }

    pub fn get_appointment(&self, appointment_id: String) -> Result<FfiAppointment, VitalPawError> {
        self.with_clinic(|clinic| clinic.get_appointment(&appointment_id))
            .map(Into::into)
    }

    pub fn list_appointments(&self, subject: String) -> Result<Vec<FfiAppointment>, VitalPawError> {
        let appointments =
            self.as_actor(&subject, |clinic, actor| clinic.list_appointments(actor))?;
        Ok(appointments.into_iter().map(Into::into).collect())
    }

    pub fn list_appointments_for_owner(
        &self,
        subject: String,
        owner_id: String,
    ) -> Result<Vec<FfiAppointment>, VitalPawError> {
        let appointments = self.as_actor(&subject, |clinic, actor| {
            clinic.list_appointments_for_owner(actor, &owner_id)
        })?;
        Ok(appointments.into_iter().map(Into::into).collect())
    }

    pub fn list_veterinarian_schedule(
        &self,
        subject: String,
    ) -> Result<Vec<FfiAppointment>, VitalPawError> {
        let appointments = self.as_actor(&subject, |clinic, actor| {
            clinic.list_veterinarian_schedule(actor)
        })?;
        Ok(appointments.into_iter().map(Into::into).collect())
    }

    pub fn list_client_appointments(
        &self,
        subject: String,
    ) -> Result<Vec<FfiAppointment>, VitalPawError> {
        let appointments = self.as_actor(&subject, |clinic, actor| {
            clinic.list_client_appointments(actor)
        })?;
        Ok(appointments.into_iter().map(Into::into).collect())
    }

    pub fn edit_appointment(
        &self,
        subject: String,
        appointment_id: String,
        edit: FfiAppointmentEdit,
    ) -> Result<FfiAppointment, VitalPawError> {
        let edit = AppointmentEdit::try_from(edit)?;
        self.as_actor(&subject, |clinic, actor| {
            clinic.edit_appointment(actor, &appointment_id, edit)
        })
        .map(Into::into)
    }

    pub fn delete_appointment(
        &self,
        subject: String,
        appointment_id: String,
    ) -> Result<(), VitalPawError> {
        self.as_actor(&subject, |clinic, actor| {
            clinic.delete_appointment(actor, &appointment_id)
        })
    }

    /// Current appointment count per veterinarian.
    pub fn veterinarian_loads(
        &self,
        subject: String,
    ) -> Result<Vec<FfiVeterinarianLoad>, VitalPawError> {
        let loads = self.as_actor(&subject, |clinic, actor| clinic.veterinarian_loads(actor))?;
        Ok(loads.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Medical Record Operations
    // =========================================================================

    pub fn add_medical_record(
        &self,
        subject: String,
        appointment_id: String,
        notes: String,
        treatment: String,
    ) -> Result<FfiMedicalRecord, VitalPawError> {
        self.as_actor(&subject, |clinic, actor| {
            clinic.add_medical_record(actor, &appointment_id, &notes, &treatment)
        })
        .map(Into::into)
    }

    pub fn list_medical_records(
        &self,
        subject: String,
    ) -> Result<Vec<FfiMedicalRecord>, VitalPawError> {
        let records = self.as_actor(&subject, |clinic, actor| clinic.list_medical_records(actor))?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub fn medical_records_for_pet(
        &self,
        subject: String,
        pet_id: String,
    ) -> Result<Vec<FfiMedicalRecord>, VitalPawError> {
        let records = self.as_actor(&subject, |clinic, actor| {
            clinic.medical_records_for_pet(actor, &pet_id)
        })?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Shop Operations
    // =========================================================================

    pub fn catalog(&self) -> Result<Vec<FfiProduct>, VitalPawError> {
        let products = self.with_clinic(|clinic| clinic.catalog())?;
        Ok(products.into_iter().map(Into::into).collect())
    }

    pub fn get_product(&self, product_id: String) -> Result<FfiProduct, VitalPawError> {
        self.with_clinic(|clinic| clinic.get_product(&product_id))
            .map(Into::into)
    }

    pub fn cart(&self, subject: String) -> Result<FfiCart, VitalPawError> {
        self.as_actor(&subject, |clinic, actor| clinic.cart(actor))
            .map(Into::into)
    }

    pub fn add_to_cart(
        &self,
        subject: String,
        product_id: String,
        quantity: u32,
    ) -> Result<FfiCart, VitalPawError> {
        self.as_actor(&subject, |clinic, actor| {
            clinic.add_to_cart(actor, &product_id, quantity)
        })
        .map(Into::into)
    }

    pub fn update_cart_item(
        &self,
        subject: String,
        product_id: String,
        quantity: u32,
    ) -> Result<FfiCart, VitalPawError> {
        self.as_actor(&subject, |clinic, actor| {
            clinic.update_cart_item(actor, &product_id, quantity)
        })
        .map(Into::into)
    }

    pub fn remove_from_cart(
        &self,
        subject: String,
        product_id: String,
    ) -> Result<FfiCart, VitalPawError> {
        self.as_actor(&subject, |clinic, actor| {
            clinic.remove_from_cart(actor, &product_id)
        })
        .map(Into::into)
    }

    /// Redeem the caller's cart.
    pub fn checkout(&self, subject: String) -> Result<FfiCheckoutReceipt, VitalPawError> {
        self.as_actor(&subject, |clinic, actor| clinic.checkout(actor))
            .map(Into::into)
    }

    /// Latest purchases, up to the configured feed size.
    pub fn recent_purchases(&self) -> Result<Vec<FfiPurchaseSummary>, VitalPawError> {
        let limit = self.config.recent_purchases_limit;
        let purchases = self.with_clinic(|clinic| clinic.recent_purchases(limit))?;
        Ok(purchases.into_iter().map(Into::into).collect())
    }

    pub fn total_redeemed(&self) -> Result<i64, VitalPawError> {
        self.with_clinic(|clinic| clinic.total_redeemed())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

fn parse_service(value: &str) -> Result<Service, VitalPawError> {
    Service::parse(value)
        .ok_or_else(|| VitalPawError::InvalidInput(format!("unknown service '{}'", value)))
}

/// FFI-safe user.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUser {
    pub id: String,
    pub external_id: String,
    pub email: String,
    pub name: String,
    pub gender: String,
    pub role: String,
    pub vital_coins: i64,
    pub created_at: String,
}

impl From<User> for FfiUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            external_id: user.external_id,
            email: user.email,
            name: user.name,
            gender: user.gender,
            role: user.role.as_str().to_string(),
            vital_coins: user.vital_coins,
            created_at: user.created_at,
        }
    }
}

/// FFI-safe pet.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPet {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: u32,
    pub age_unit: Option<String>,
    pub weight_kg: f64,
    pub sex: String,
}

impl From<Pet> for FfiPet {
    fn from(pet: Pet) -> Self {
        Self {
            id: pet.id,
            owner_id: pet.owner_id,
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            age: pet.age,
            age_unit: pet.age_unit.map(|unit| unit.as_str().to_string()),
            weight_kg: pet.weight_kg,
            sex: pet.sex.as_str().to_string(),
        }
    }
}

/// FFI-safe pet registration.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: u32,
    pub age_unit: Option<String>,
    pub weight_kg: f64,
    pub sex: String,
}

impl TryFrom<FfiNewPet> for NewPet {
    type Error = VitalPawError;

    fn try_from(pet: FfiNewPet) -> Result<Self, Self::Error> {
        let sex = Sex::parse(&pet.sex)
            .ok_or_else(|| VitalPawError::InvalidInput(format!("unknown sex '{}'", pet.sex)))?;
        let age_unit = match pet.age_unit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(unit) => Some(AgeUnit::parse(unit).ok_or_else(|| {
                VitalPawError::InvalidInput(format!("unknown age unit '{}'", unit))
            })?),
        };
        Ok(NewPet {
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            age: pet.age,
            age_unit,
            weight_kg: pet.weight_kg,
            sex,
        })
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub owner_id: String,
    pub pet_id: String,
    pub pet_name: String,
    pub veterinarian_id: String,
    pub service: String,
    pub description: String,
    pub date: String,
    pub time: String,
}

impl From<Appointment> for FfiAppointment {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            owner_id: appointment.owner_id,
            pet_id: appointment.pet_id,
            pet_name: appointment.pet_name,
            veterinarian_id: appointment.veterinarian_id,
            service: appointment.service.as_str().to_string(),
            description: appointment.description,
            date: appointment.date,
            time: appointment.time,
        }
    }
}

/// FFI-safe booking request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewAppointment {
    pub pet_id: String,
    pub service: String,
    pub description: String,
    pub date: String,
    pub time: String,
}

impl TryFrom<FfiNewAppointment> for NewAppointment {
    type Error = VitalPawError;

    fn try_from(request: FfiNewAppointment) -> Result<Self, Self::Error> {
        Ok(NewAppointment {
            pet_id: request.pet_id,
            service: parse_service(&request.service)?,
            description: request.description,
            date: request.date,
            time: request.time,
        })
    }
}

/// FFI-safe appointment edit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointmentEdit {
    pub service: String,
    pub description: String,
    pub date: String,
    pub time: String,
}

impl TryFrom<FfiAppointmentEdit> for AppointmentEdit {
    type Error = VitalPawError;

    fn try_from(edit: FfiAppointmentEdit) -> Result<Self, Self::Error> {
        Ok(AppointmentEdit {
            service: parse_service(&edit.service)?,
            description: edit.description,
            date: edit.date,
            time: edit.time,
        })
    }
}

/// FFI-safe veterinarian load.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVeterinarianLoad {
    pub veterinarian: FfiUser,
    pub appointments: u64,
}

impl From<VeterinarianLoad> for FfiVeterinarianLoad {
    fn from(load: VeterinarianLoad) -> Self {
        Self {
            veterinarian: load.veterinarian.into(),
            appointments: load.appointments,
        }
    }
}

/// FFI-safe medical record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicalRecord {
    pub id: String,
    pub pet_id: String,
    pub appointment_id: Option<String>,
    pub notes: String,
    pub treatment: String,
    pub service: String,
    pub description: String,
    pub date: String,
    pub time: String,
}

impl From<MedicalRecord> for FfiMedicalRecord {
    fn from(record: MedicalRecord) -> Self {
        Self {
            id: record.id,
            pet_id: record.pet_id,
            appointment_id: record.appointment_id,
            notes: record.notes,
            treatment: record.treatment,
            service: record.service.as_str().to_string(),
            description: record.description,
            date: record.date,
            time: record.time,
        }
    }
}

/// FFI-safe product.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProduct {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub image_url: Option<String>,
}

impl From<Product> for FfiProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
        }
    }
}

/// FFI-safe cart line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCartLine {
    pub product: FfiProduct,
    pub quantity: u32,
    pub subtotal: i64,
}

/// FFI-safe cart.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCart {
    pub vital_coins: i64,
    pub lines: Vec<FfiCartLine>,
    pub total: i64,
}

impl From<Cart> for FfiCart {
    fn from(cart: Cart) -> Self {
        let total = cart.total();
        Self {
            vital_coins: cart.vital_coins,
            lines: cart
                .lines
                .into_iter()
                .map(|line| FfiCartLine {
                    subtotal: line.subtotal(),
                    quantity: line.quantity,
                    product: line.product.into(),
                })
                .collect(),
            total,
        }
    }
}

/// FFI-safe checkout receipt.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCheckoutReceipt {
    pub purchase_id: String,
    pub points: i64,
    pub remaining_coins: i64,
    pub created_at: String,
}

impl From<CheckoutReceipt> for FfiCheckoutReceipt {
    fn from(receipt: CheckoutReceipt) -> Self {
        Self {
            purchase_id: receipt.purchase.id,
            points: receipt.purchase.points,
            remaining_coins: receipt.remaining_coins,
            created_at: receipt.purchase.created_at,
        }
    }
}

/// FFI-safe purchase feed entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPurchaseSummary {
    pub user_name: String,
    pub points: i64,
    pub date: String,
}

impl From<PurchaseSummary> for FfiPurchaseSummary {
    fn from(summary: PurchaseSummary) -> Self {
        Self {
            user_name: summary.user_name,
            points: summary.points,
            date: summary.date,
        }
    }
}
