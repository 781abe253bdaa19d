//! Pet database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{AgeUnit, Pet, Sex};

const PET_COLUMNS: &str =
    "id, owner_id, name, species, breed, age, age_unit, weight_kg, sex, created_at, updated_at";

impl Database {
    /// Insert a new pet.
    pub fn insert_pet(&self, pet: &Pet) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO pets (
                id, owner_id, name, species, breed, age, age_unit,
                weight_kg, sex, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                pet.id,
                pet.owner_id,
                pet.name,
                pet.species,
                pet.breed,
                pet.age,
                pet.age_unit.map(|u| u.as_str()),
                pet.weight_kg,
                pet.sex.as_str(),
                pet.created_at,
                pet.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a pet by ID.
    pub fn get_pet(&self, id: &str) -> DbResult<Option<Pet>> {
        let sql = format!("SELECT {} FROM pets WHERE id = ?", PET_COLUMNS);
        self.conn
            .query_row(&sql, [id], pet_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all pets.
    pub fn list_pets(&self) -> DbResult<Vec<Pet>> {
        let sql = format!("SELECT {} FROM pets ORDER BY name, id", PET_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], pet_row)?;

        let mut pets: Vec<Pet> = Vec::new();
        for row in rows {
            pets.push(row?.try_into()?);
        }
        Ok(pets)
    }

    /// List pets belonging to one owner.
    pub fn list_pets_for_owner(&self, owner_id: &str) -> DbResult<Vec<Pet>> {
        let sql = format!(
            "SELECT {} FROM pets WHERE owner_id = ? ORDER BY name, id",
            PET_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([owner_id], pet_row)?;

        let mut pets: Vec<Pet> = Vec::new();
        for row in rows {
            pets.push(row?.try_into()?);
        }
        Ok(pets)
    }

    /// Delete a pet together with its appointments and medical records.
    ///
    /// Runs in a single transaction; returns false if the pet did not exist.
    pub fn delete_pet_cascade(&self, id: &str) -> DbResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM medical_records WHERE pet_id = ?", [id])?;
        tx.execute("DELETE FROM appointments WHERE pet_id = ?", [id])?;
        let rows_affected = tx.execute("DELETE FROM pets WHERE id = ?", [id])?;
        tx.commit()?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct PetRow {
    id: String,
    owner_id: String,
    name: String,
    species: String,
    breed: String,
    age: u32,
    age_unit: Option<String>,
    weight_kg: f64,
    sex: String,
    created_at: String,
    updated_at: String,
}

fn pet_row(row: &Row<'_>) -> rusqlite::Result<PetRow> {
    Ok(PetRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        species: row.get(3)?,
        breed: row.get(4)?,
        age: row.get(5)?,
        age_unit: row.get(6)?,
        weight_kg: row.get(7)?,
        sex: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl TryFrom<PetRow> for Pet {
    type Error = DbError;

    fn try_from(row: PetRow) -> Result<Self, Self::Error> {
        let sex = Sex::parse(&row.sex)
            .ok_or_else(|| DbError::Constraint(format!("Unknown pet sex: {}", row.sex)))?;
        let age_unit = match row.age_unit {
            Some(unit) => Some(
                AgeUnit::parse(&unit)
                    .ok_or_else(|| DbError::Constraint(format!("Unknown age unit: {}", unit)))?,
            ),
            None => None,
        };

        Ok(Pet {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            species: row.species,
            breed: row.breed,
            age: row.age,
            age_unit,
            weight_kg: row.weight_kg,
            sex,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Appointment, MedicalRecord, NewPet, Service, User};

    fn setup_db() -> (Database, User) {
        let db = Database::open_in_memory().unwrap();
        let owner = User::new(
            "ext-owner".into(),
            "owner@example.com".into(),
            "Owner".into(),
            "male".into(),
            100,
        );
        db.insert_user(&owner).unwrap();
        (db, owner)
    }

    fn max(owner_id: &str) -> Pet {
        Pet::new(
            owner_id.into(),
            NewPet {
                name: "Max".into(),
                species: "canine".into(),
                breed: "Golden Retriever".into(),
                age: 8,
                age_unit: Some(AgeUnit::Months),
                weight_kg: 12.5,
                sex: Sex::Male,
            },
        )
    }

    #[test]
    fn test_insert_and_get() {
        let (db, owner) = setup_db();
        let pet = max(&owner.id);
        db.insert_pet(&pet).unwrap();

        let retrieved = db.get_pet(&pet.id).unwrap().unwrap();
        assert_eq!(retrieved, pet);
        assert_eq!(retrieved.age_unit, Some(AgeUnit::Months));
    }

    #[test]
    fn test_list_for_owner() {
        let (db, owner) = setup_db();
        db.insert_pet(&max(&owner.id)).unwrap();

        let other = User::new(
            "ext-other".into(),
            "other@example.com".into(),
            "Other".into(),
            "female".into(),
            100,
        );
        db.insert_user(&other).unwrap();
        db.insert_pet(&max(&other.id)).unwrap();

        assert_eq!(db.list_pets_for_owner(&owner.id).unwrap().len(), 1);
        assert_eq!(db.list_pets().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_cascades_to_appointments_and_records() {
        let (db, owner) = setup_db();
        let vet = User::new(
            "ext-vet".into(),
            "vet@example.com".into(),
            "Vet".into(),
            "female".into(),
            100,
        )
        .with_role(crate::models::Role::Veterinarian);
        db.insert_user(&vet).unwrap();

        let pet = max(&owner.id);
        db.insert_pet(&pet).unwrap();

        let appt = Appointment::new(
            owner.id.clone(),
            pet.id.clone(),
            pet.name.clone(),
            vet.id.clone(),
            Service::Consultation,
            "Cough".into(),
            "2026-11-01".into(),
            "11:00".into(),
        );
        db.insert_appointment(&appt).unwrap();
        let record = MedicalRecord::from_appointment(&appt, "Mild".into(), "Syrup".into());
        db.insert_medical_record(&record).unwrap();

        assert!(db.delete_pet_cascade(&pet.id).unwrap());
        assert!(db.get_pet(&pet.id).unwrap().is_none());
        assert!(db.get_appointment(&appt.id).unwrap().is_none());
        assert!(db.list_medical_records_for_pet(&pet.id).unwrap().is_empty());

        assert!(!db.delete_pet_cascade(&pet.id).unwrap());
    }
}
