//! Role transitions.
//!
//! Demoting a veterinarian moves their appointments away first; the role
//! write only happens once every appointment has a new owner.

use tracing::info;

use super::{
    AppointmentDirectory, AssignmentService, SchedulingError, SchedulingResult, UserDirectory,
};
use crate::models::{Role, UnknownRole, User};

/// Whether moving from `from` to `to` strands appointments.
pub fn requires_reassignment(from: Role, to: Role) -> bool {
    from == Role::Veterinarian && to != Role::Veterinarian
}

/// Admin-only role changes with appointment hand-off.
pub struct RoleTransitionGuard<'a, D> {
    directory: &'a D,
}

impl<'a, D> RoleTransitionGuard<'a, D>
where
    D: UserDirectory + AppointmentDirectory,
{
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Change a user's role from a raw role name.
    ///
    /// Checks run in order: actor authorization, role name, target existence.
    pub fn request_role_change(
        &self,
        target_user_id: &str,
        new_role: &str,
        actor: &User,
    ) -> SchedulingResult<User> {
        Self::authorize(actor)?;
        let new_role: Role = new_role
            .parse()
            .map_err(|UnknownRole(name)| SchedulingError::InvalidRole(name))?;
        self.apply(target_user_id, new_role, actor)
    }

    /// Change a user's role.
    pub fn change_role(
        &self,
        target_user_id: &str,
        new_role: Role,
        actor: &User,
    ) -> SchedulingResult<User> {
        Self::authorize(actor)?;
        self.apply(target_user_id, new_role, actor)
    }

    fn authorize(actor: &User) -> SchedulingResult<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(SchedulingError::Forbidden(format!(
                "user {} may not change roles",
                actor.id
            )))
        }
    }

    fn apply(&self, target_user_id: &str, new_role: Role, actor: &User) -> SchedulingResult<User> {
        let target = self
            .directory
            .find_user(target_user_id)?
            .ok_or_else(|| SchedulingError::NotFound(format!("user {}", target_user_id)))?;

        if requires_reassignment(target.role, new_role) {
            // Any failure here leaves the role untouched.
            let moved = AssignmentService::new(self.directory).reassign_appointments(&target.id)?;
            info!(veterinarian_id = %target.id, moved, "appointments handed off before demotion");
        }

        if target.role != new_role && !self.directory.set_role(&target.id, new_role)? {
            return Err(SchedulingError::NotFound(format!("user {}", target.id)));
        }

        info!(
            user_id = %target.id,
            actor_id = %actor.id,
            from = %target.role,
            to = %new_role,
            "role changed"
        );

        self.directory
            .find_user(&target.id)?
            .ok_or_else(|| SchedulingError::NotFound(format!("user {}", target.id)))
    }
}
