//! Pet registry.

use tracing::info;

use super::{not_found, require_role, Clinic, ClinicError, ClinicResult};
use crate::models::{NewPet, Pet, Role, User};

impl<'a> Clinic<'a> {
    /// Register a pet owned by the actor.
    pub fn create_pet(&self, actor: &User, details: NewPet) -> ClinicResult<Pet> {
        require_role(actor, &[Role::Admin, Role::Client], "register pets")?;
        details.validate().map_err(ClinicError::InvalidInput)?;

        let pet = Pet::new(actor.id.clone(), details);
        self.db.insert_pet(&pet)?;
        info!(pet_id = %pet.id, owner_id = %pet.owner_id, "registered pet");
        Ok(pet)
    }

    /// A pet visible to its owner and to clinic staff.
    pub fn get_pet(&self, actor: &User, id: &str) -> ClinicResult<Pet> {
        let pet = self.db.get_pet(id)?.ok_or_else(|| not_found("pet", id))?;
        if actor.is_client() && !pet.is_owned_by(&actor.id) {
            return Err(not_found("pet", id));
        }
        Ok(pet)
    }

    pub fn list_pets(&self, actor: &User) -> ClinicResult<Vec<Pet>> {
        require_role(actor, &[Role::Admin], "list all pets")?;
        Ok(self.db.list_pets()?)
    }

    pub fn list_own_pets(&self, actor: &User) -> ClinicResult<Vec<Pet>> {
        Ok(self.db.list_pets_for_owner(&actor.id)?)
    }

    /// Delete a pet with its appointments and medical records.
    pub fn delete_pet(&self, actor: &User, id: &str) -> ClinicResult<()> {
        let pet = self.db.get_pet(id)?.ok_or_else(|| not_found("pet", id))?;
        if !actor.is_admin() && !pet.is_owned_by(&actor.id) {
            return Err(ClinicError::Forbidden(format!(
                "pet {} belongs to another owner",
                id
            )));
        }
        if !self.db.delete_pet_cascade(id)? {
            return Err(not_found("pet", id));
        }
        info!(pet_id = %id, actor_id = %actor.id, "deleted pet");
        Ok(())
    }
}
