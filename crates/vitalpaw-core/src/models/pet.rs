//! Pet models.

use serde::{Deserialize, Serialize};

/// Biological sex of a pet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Unit the pet's age is expressed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgeUnit {
    Months,
    Years,
}

impl AgeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeUnit::Months => "months",
            AgeUnit::Years => "years",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "months" => Some(AgeUnit::Months),
            "years" => Some(AgeUnit::Years),
            _ => None,
        }
    }
}

/// A pet registered by a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    /// Local UUID
    pub id: String,
    /// Owning user ID
    pub owner_id: String,
    /// Pet name
    pub name: String,
    /// Species (e.g., "canine", "feline")
    pub species: String,
    /// Breed
    pub breed: String,
    /// Age, in `age_unit` (years when unset)
    pub age: u32,
    pub age_unit: Option<AgeUnit>,
    /// Weight in kg
    pub weight_kg: f64,
    pub sex: Sex,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Fields a user supplies when registering a pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: u32,
    pub age_unit: Option<AgeUnit>,
    pub weight_kg: f64,
    pub sex: Sex,
}

impl Pet {
    /// Create a pet owned by `owner_id`.
    pub fn new(owner_id: String, details: NewPet) -> Self {
        let now = super::now_timestamp();
        Self {
            id: super::new_id(),
            owner_id,
            name: details.name,
            species: details.species,
            breed: details.breed,
            age: details.age,
            age_unit: details.age_unit,
            weight_kg: details.weight_kg,
            sex: details.sex,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether `user_id` owns this pet.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

impl NewPet {
    /// Check required fields; returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("pet name is required".into());
        }
        if self.species.trim().is_empty() {
            return Err("pet species is required".into());
        }
        if self.breed.trim().is_empty() {
            return Err("pet breed is required".into());
        }
        if self.age == 0 {
            return Err("pet age must be positive".into());
        }
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err("pet weight must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luna() -> NewPet {
        NewPet {
            name: "Luna".into(),
            species: "feline".into(),
            breed: "Siamese".into(),
            age: 3,
            age_unit: Some(AgeUnit::Years),
            weight_kg: 4.2,
            sex: Sex::Female,
        }
    }

    #[test]
    fn test_new_pet() {
        let pet = Pet::new("owner-1".into(), luna());
        assert_eq!(pet.name, "Luna");
        assert!(pet.is_owned_by("owner-1"));
        assert!(!pet.is_owned_by("owner-2"));
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert!(luna().validate().is_ok());

        let mut pet = luna();
        pet.breed = "  ".into();
        assert!(pet.validate().is_err());

        let mut pet = luna();
        pet.weight_kg = 0.0;
        assert!(pet.validate().is_err());

        let mut pet = luna();
        pet.age = 0;
        assert!(pet.validate().is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(Sex::parse("Female"), Some(Sex::Female));
        assert_eq!(AgeUnit::parse("months"), Some(AgeUnit::Months));
        assert_eq!(AgeUnit::parse("weeks"), None);
    }
}
