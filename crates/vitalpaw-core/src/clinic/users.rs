//! User registration and administration.

use tracing::info;

use super::{not_found, require_role, Clinic, ClinicError, ClinicResult};
use crate::config::AdminSeed;
use crate::models::{Role, User};
use crate::scheduling::{RoleTransitionGuard, UserDirectory};

impl<'a> Clinic<'a> {
    /// User for an identity-provider subject.
    pub fn resolve_actor(&self, external_id: &str) -> ClinicResult<User> {
        self.db
            .find_by_external_id(external_id)?
            .ok_or_else(|| not_found("user with subject", external_id))
    }

    /// Register a new client with the configured starting balance.
    pub fn register(
        &self,
        external_id: &str,
        email: &str,
        name: &str,
        gender: &str,
    ) -> ClinicResult<User> {
        if external_id.trim().is_empty() {
            return Err(ClinicError::InvalidInput("subject is required".into()));
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err(ClinicError::InvalidInput(format!("invalid email '{}'", email)));
        }
        if name.trim().is_empty() {
            return Err(ClinicError::InvalidInput("name is required".into()));
        }
        if self.db.get_user_by_external_id(external_id)?.is_some() {
            return Err(ClinicError::AlreadyRegistered(format!("subject {}", external_id)));
        }
        if self.db.get_user_by_email(email)?.is_some() {
            return Err(ClinicError::AlreadyRegistered(format!("email {}", email)));
        }

        let user = User::new(
            external_id.to_string(),
            email.trim().to_string(),
            name.trim().to_string(),
            gender.trim().to_string(),
            self.config.starting_vital_coins,
        );
        self.db.insert_user(&user)?;
        info!(user_id = %user.id, "registered client");
        Ok(user)
    }

    /// Create the bootstrap admin unless a user already has its email.
    ///
    /// Returns the created admin, or `None` when nothing was written.
    pub fn ensure_admin(&self, seed: &AdminSeed) -> ClinicResult<Option<User>> {
        if self.db.get_user_by_email(&seed.email)?.is_some() {
            return Ok(None);
        }

        let admin = User::new(
            seed.external_id.clone(),
            seed.email.clone(),
            seed.name.clone(),
            seed.gender.clone(),
            self.config.starting_vital_coins,
        )
        .with_role(Role::Admin);
        self.db.insert_user(&admin)?;
        info!(user_id = %admin.id, email = %admin.email, "seeded bootstrap admin");
        Ok(Some(admin))
    }

    pub fn get_user(&self, actor: &User, id: &str) -> ClinicResult<User> {
        require_role(actor, &[Role::Admin, Role::Veterinarian], "view users")?;
        self.db.get_user(id)?.ok_or_else(|| not_found("user", id))
    }

    /// Clients whose email contains `fragment`, ignoring case.
    pub fn search_clients(&self, actor: &User, fragment: &str) -> ClinicResult<Vec<User>> {
        require_role(actor, &[Role::Admin, Role::Veterinarian], "search clients")?;
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(ClinicError::InvalidInput("search text is required".into()));
        }
        Ok(self.db.search_users_by_email(fragment, Role::Client)?)
    }

    pub fn list_veterinarians(&self, actor: &User) -> ClinicResult<Vec<User>> {
        require_role(actor, &[Role::Admin], "list veterinarians")?;
        Ok(self.db.list_users_by_role(Role::Veterinarian)?)
    }

    /// Change a user's role, handing off appointments on demotion.
    pub fn change_role(&self, actor: &User, target_user_id: &str, new_role: &str) -> ClinicResult<User> {
        Ok(RoleTransitionGuard::new(self.db).request_role_change(target_user_id, new_role, actor)?)
    }

    /// Credit VitalCoins to a user.
    pub fn grant_vital_coins(&self, actor: &User, target_user_id: &str, amount: i64) -> ClinicResult<User> {
        require_role(actor, &[Role::Admin], "grant VitalCoins")?;
        if amount <= 0 {
            return Err(ClinicError::InvalidInput("amount must be positive".into()));
        }
        if !self.db.add_vital_coins(target_user_id, amount)? {
            return Err(not_found("user", target_user_id));
        }
        info!(user_id = %target_user_id, amount, "granted VitalCoins");
        self.db
            .get_user(target_user_id)?
            .ok_or_else(|| not_found("user", target_user_id))
    }
}
