//! Appointment database operations.

use std::collections::HashMap;

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{now_timestamp, Appointment, Service};

const APPOINTMENT_COLUMNS: &str = "id, owner_id, pet_id, pet_name, veterinarian_id, service, \
     description, date, time, created_at, updated_at";

impl Database {
    /// Insert a new appointment.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                id, owner_id, pet_id, pet_name, veterinarian_id, service,
                description, date, time, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                appointment.id,
                appointment.owner_id,
                appointment.pet_id,
                appointment.pet_name,
                appointment.veterinarian_id,
                appointment.service.as_str(),
                appointment.description,
                appointment.date,
                appointment.time,
                appointment.created_at,
                appointment.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        let sql = format!("SELECT {} FROM appointments WHERE id = ?", APPOINTMENT_COLUMNS);
        self.conn
            .query_row(&sql, [id], appointment_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List every appointment, soonest first.
    pub fn list_appointments(&self) -> DbResult<Vec<Appointment>> {
        self.query_appointments("1 = 1", "date, time, id", &[])
    }

    /// List appointments booked by one client, soonest first.
    pub fn list_appointments_for_owner(&self, owner_id: &str) -> DbResult<Vec<Appointment>> {
        self.query_appointments("owner_id = ?1", "date, time, id", &[owner_id])
    }

    /// A veterinarian's schedule, soonest first.
    pub fn list_schedule_for_veterinarian(&self, veterinarian_id: &str) -> DbResult<Vec<Appointment>> {
        self.query_appointments("veterinarian_id = ?1", "date, time, id", &[veterinarian_id])
    }

    /// Appointments assigned to a veterinarian, ascending by appointment ID.
    ///
    /// The fixed order makes reassignment batches reproducible.
    pub fn list_appointments_for_veterinarian(
        &self,
        veterinarian_id: &str,
    ) -> DbResult<Vec<Appointment>> {
        self.query_appointments("veterinarian_id = ?1", "id", &[veterinarian_id])
    }

    /// Grouped appointment counts for the given veterinarians.
    ///
    /// Veterinarians with no appointments are absent from the result.
    pub fn count_appointments_by_veterinarian(
        &self,
        veterinarian_ids: &[String],
    ) -> DbResult<HashMap<String, u64>> {
        if veterinarian_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders: Vec<&str> = veterinarian_ids.iter().map(|_| "?").collect();
        let sql = format!(
            r#"
            SELECT veterinarian_id, COUNT(*)
            FROM appointments
            WHERE veterinarian_id IN ({})
            GROUP BY veterinarian_id
            "#,
            placeholders.join(", ")
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(veterinarian_ids.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (veterinarian_id, count) = row?;
            counts.insert(veterinarian_id, count.max(0) as u64);
        }
        Ok(counts)
    }

    /// Total number of appointments.
    pub fn count_appointments(&self) -> DbResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Point an appointment at a different veterinarian.
    pub fn update_appointment_veterinarian(
        &self,
        id: &str,
        veterinarian_id: &str,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET veterinarian_id = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, veterinarian_id, now_timestamp()],
        )?;
        Ok(rows_affected > 0)
    }

    /// Persist service, description, date and time of an appointment.
    pub fn update_appointment_details(&self, appointment: &Appointment) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE appointments SET
                service = ?2,
                description = ?3,
                date = ?4,
                time = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                appointment.id,
                appointment.service.as_str(),
                appointment.description,
                appointment.date,
                appointment.time,
                appointment.updated_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete an appointment.
    pub fn delete_appointment(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Delete an appointment only if it is assigned to `veterinarian_id`.
    pub fn delete_appointment_for_veterinarian(
        &self,
        id: &str,
        veterinarian_id: &str,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM appointments WHERE id = ?1 AND veterinarian_id = ?2",
            [id, veterinarian_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete an appointment only if it was booked by `owner_id`.
    pub fn delete_appointment_for_owner(&self, id: &str, owner_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM appointments WHERE id = ?1 AND owner_id = ?2",
            [id, owner_id],
        )?;
        Ok(rows_affected > 0)
    }

    fn query_appointments(
        &self,
        filter: &str,
        order_by: &str,
        args: &[&str],
    ) -> DbResult<Vec<Appointment>> {
        let sql = format!(
            "SELECT {} FROM appointments WHERE {} ORDER BY {}",
            APPOINTMENT_COLUMNS, filter, order_by
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), appointment_row)?;

        let mut appointments: Vec<Appointment> = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }
}

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: String,
    owner_id: String,
    pet_id: String,
    pet_name: String,
    veterinarian_id: String,
    service: String,
    description: String,
    date: String,
    time: String,
    created_at: String,
    updated_at: String,
}

fn appointment_row(row: &Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        pet_id: row.get(2)?,
        pet_name: row.get(3)?,
        veterinarian_id: row.get(4)?,
        service: row.get(5)?,
        description: row.get(6)?,
        date: row.get(7)?,
        time: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let service = Service::parse(&row.service)
            .ok_or_else(|| DbError::Constraint(format!("Unknown service: {}", row.service)))?;

        Ok(Appointment {
            id: row.id,
            owner_id: row.owner_id,
            pet_id: row.pet_id,
            pet_name: row.pet_name,
            veterinarian_id: row.veterinarian_id,
            service,
            description: row.description,
            date: row.date,
            time: row.time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
