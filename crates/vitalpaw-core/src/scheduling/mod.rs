//! Veterinarian load balancing and appointment reassignment.
//!
//! Pipeline: Directory Store → Load Tally → Least-Loaded Selection → Write-back
//!
//! - [`balancer`]: pure selection over a [`LoadTally`]
//! - [`directory`]: the store capabilities the scheduler depends on
//! - [`assignment`]: booking assignment and bulk reassignment
//! - [`roles`]: role transitions that trigger reassignment

mod assignment;
mod balancer;
mod directory;
mod roles;

pub use assignment::*;
pub use balancer::*;
pub use directory::*;
pub use roles::*;

use thiserror::Error;

use crate::db::DbError;

/// Scheduling errors.
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("No veterinarians available")]
    NoVeterinariansAvailable,

    #[error("No alternate veterinarian for {pending} appointment(s) of {veterinarian_id}")]
    NoAlternateVeterinarian {
        veterinarian_id: String,
        pending: usize,
    },

    /// A reassignment batch stopped partway; the source role is unchanged.
    #[error("Reassignment stopped after {moved} appointment(s): {source}")]
    PartialFailure {
        moved: usize,
        #[source]
        source: DbError,
    },
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;
