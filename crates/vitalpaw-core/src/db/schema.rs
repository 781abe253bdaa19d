//! SQLite schema definition.

/// Complete database schema for the clinic.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Users
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    external_id TEXT NOT NULL UNIQUE,            -- identity provider subject
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    gender TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'client'
        CHECK (role IN ('client', 'veterinarian', 'admin')),
    vital_coins INTEGER NOT NULL DEFAULT 100 CHECK (vital_coins >= 0),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_role ON users(role, created_at);

-- ============================================================================
-- Pets
-- ============================================================================

CREATE TABLE IF NOT EXISTS pets (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL REFERENCES users(id),
    name TEXT NOT NULL,
    species TEXT NOT NULL,
    breed TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age > 0),
    age_unit TEXT CHECK (age_unit IN ('months', 'years')),
    weight_kg REAL NOT NULL CHECK (weight_kg > 0),
    sex TEXT NOT NULL CHECK (sex IN ('male', 'female')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pets_owner ON pets(owner_id);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL REFERENCES users(id),
    pet_id TEXT NOT NULL REFERENCES pets(id),
    pet_name TEXT NOT NULL,
    veterinarian_id TEXT NOT NULL REFERENCES users(id),
    service TEXT NOT NULL CHECK (service IN ('grooming', 'consultation', 'emergency')),
    description TEXT NOT NULL,
    date TEXT NOT NULL,                          -- YYYY-MM-DD
    time TEXT NOT NULL,                          -- HH:MM
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Grouped load counts scan this index
CREATE INDEX IF NOT EXISTS idx_appointments_veterinarian ON appointments(veterinarian_id);
CREATE INDEX IF NOT EXISTS idx_appointments_owner ON appointments(owner_id);
CREATE INDEX IF NOT EXISTS idx_appointments_pet ON appointments(pet_id);

-- ============================================================================
-- Medical Records
-- ============================================================================

CREATE TABLE IF NOT EXISTS medical_records (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL REFERENCES pets(id),
    appointment_id TEXT REFERENCES appointments(id) ON DELETE SET NULL,
    notes TEXT NOT NULL,
    treatment TEXT NOT NULL,
    service TEXT NOT NULL CHECK (service IN ('grooming', 'consultation', 'emergency')),
    description TEXT NOT NULL,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_medical_records_pet ON medical_records(pet_id);

-- ============================================================================
-- VitalCoin Shop
-- ============================================================================

CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    price INTEGER NOT NULL CHECK (price >= 0),
    image_url TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cart_items (
    user_id TEXT NOT NULL REFERENCES users(id),
    product_id TEXT NOT NULL REFERENCES products(id),
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    PRIMARY KEY (user_id, product_id)
);

CREATE TABLE IF NOT EXISTS redeemed_purchases (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    points INTEGER NOT NULL CHECK (points >= 0),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_redeemed_created ON redeemed_purchases(created_at);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn insert_user(conn: &Connection, id: &str, role: &str) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO users (id, external_id, email, name, gender, role, created_at, updated_at)
             VALUES (?1, ?1, ?1 || '@example.com', 'Test', 'other', ?2, 'now', 'now')",
            [id, role],
        )
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_role_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        assert!(insert_user(&conn, "u1", "veterinarian").is_ok());
        assert!(insert_user(&conn, "u2", "groomer").is_err());
    }

    #[test]
    fn test_negative_balance_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        insert_user(&conn, "u1", "client").unwrap();

        let result = conn.execute("UPDATE users SET vital_coins = -1 WHERE id = 'u1'", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_appointment_requires_existing_veterinarian_row() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        insert_user(&conn, "owner", "client").unwrap();
        conn.execute(
            "INSERT INTO pets (id, owner_id, name, species, breed, age, weight_kg, sex, created_at, updated_at)
             VALUES ('p1', 'owner', 'Max', 'canine', 'Beagle', 2, 11.0, 'male', 'now', 'now')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO appointments (id, owner_id, pet_id, pet_name, veterinarian_id, service,
                                       description, date, time, created_at, updated_at)
             VALUES ('a1', 'owner', 'p1', 'Max', 'ghost', 'grooming', 'Bath', '2026-11-01', '10:00', 'now', 'now')",
            [],
        );
        assert!(result.is_err());
    }
}
