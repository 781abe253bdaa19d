//! Medical record database operations.

use rusqlite::{params, Row};

use super::{Database, DbError, DbResult};
use crate::models::{MedicalRecord, Service};

const RECORD_COLUMNS: &str = "id, pet_id, appointment_id, notes, treatment, service, \
     description, date, time, created_at";

impl Database {
    /// Insert a new medical record.
    pub fn insert_medical_record(&self, record: &MedicalRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO medical_records (
                id, pet_id, appointment_id, notes, treatment, service,
                description, date, time, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                record.id,
                record.pet_id,
                record.appointment_id,
                record.notes,
                record.treatment,
                record.service.as_str(),
                record.description,
                record.date,
                record.time,
                record.created_at,
            ],
        )?;
        Ok(())
    }

    /// All medical records, most recent visit first.
    pub fn list_medical_records(&self) -> DbResult<Vec<MedicalRecord>> {
        let sql = format!(
            "SELECT {} FROM medical_records ORDER BY date DESC, time DESC, id",
            RECORD_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], record_row)?;

        let mut records: Vec<MedicalRecord> = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }

    /// Medical records of one pet, most recent visit first.
    pub fn list_medical_records_for_pet(&self, pet_id: &str) -> DbResult<Vec<MedicalRecord>> {
        let sql = format!(
            "SELECT {} FROM medical_records WHERE pet_id = ? ORDER BY date DESC, time DESC, id",
            RECORD_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([pet_id], record_row)?;

        let mut records: Vec<MedicalRecord> = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }
}

/// Intermediate row struct for database mapping.
struct RecordRow {
    id: String,
    pet_id: String,
    appointment_id: Option<String>,
    notes: String,
    treatment: String,
    service: String,
    description: String,
    date: String,
    time: String,
    created_at: String,
}

fn record_row(row: &Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        appointment_id: row.get(2)?,
        notes: row.get(3)?,
        treatment: row.get(4)?,
        service: row.get(5)?,
        description: row.get(6)?,
        date: row.get(7)?,
        time: row.get(8)?,
        created_at: row.get(9)?,
    })
}

impl TryFrom<RecordRow> for MedicalRecord {
    type Error = DbError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let service = Service::parse(&row.service)
            .ok_or_else(|| DbError::Constraint(format!("Unknown service: {}", row.service)))?;

        Ok(MedicalRecord {
            id: row.id,
            pet_id: row.pet_id,
            appointment_id: row.appointment_id,
            notes: row.notes,
            treatment: row.treatment,
            service,
            description: row.description,
            date: row.date,
            time: row.time,
            created_at: row.created_at,
        })
    }
}
