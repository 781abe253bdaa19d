//! Clinic operations around the scheduling core.
//!
//! Every operation takes the verified actor and enforces role rules before
//! touching the store.
//!
//! - [`users`]: registration, lookup, role changes, VitalCoin grants
//! - [`pets`]: pet registry
//! - [`appointments`]: booking, schedules, edits
//! - [`records`]: medical records
//! - [`shop`]: catalogue, cart and checkout

mod appointments;
mod pets;
mod records;
mod shop;
mod users;

pub use appointments::VeterinarianLoad;
pub use shop::DEFAULT_CATALOGUE;

use thiserror::Error;

use crate::config::ClinicConfig;
use crate::db::{Database, DbError};
use crate::models::{Role, User};
use crate::scheduling::SchedulingError;

/// Clinic errors.
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Insufficient VitalCoins: need {required}, have {available}")]
    InsufficientCoins { required: i64, available: i64 },

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type ClinicResult<T> = Result<T, ClinicError>;

/// Clinic operations over a borrowed store.
pub struct Clinic<'a> {
    db: &'a Database,
    config: &'a ClinicConfig,
}

impl<'a> Clinic<'a> {
    pub fn new(db: &'a Database, config: &'a ClinicConfig) -> Self {
        Self { db, config }
    }

    /// Seed the bootstrap admin and default catalogue as configured.
    pub fn bootstrap(&self) -> ClinicResult<()> {
        if let Some(seed) = &self.config.bootstrap_admin {
            self.ensure_admin(seed)?;
        }
        if self.config.seed_products {
            self.seed_products_if_empty()?;
        }
        Ok(())
    }
}

/// Fail with `Forbidden` unless `actor` holds one of `allowed`.
fn require_role(actor: &User, allowed: &[Role], action: &str) -> ClinicResult<()> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(ClinicError::Forbidden(format!(
            "{} may not {}",
            actor.role, action
        )))
    }
}

fn not_found(kind: &str, id: &str) -> ClinicError {
    ClinicError::NotFound(format!("{} {}", kind, id))
}
