//! SQLite-backed audit log for accepted candidates.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, Row};

use super::domain::{Candidate, CandidateId, ScoreType};
use super::ledger::ExceptionLedger;
use super::repository::{CandidateStore, StoreError};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS candidates (
        id               TEXT PRIMARY KEY,
        full_name        TEXT NOT NULL,
        email            TEXT NOT NULL,
        phone            TEXT NOT NULL,
        date_of_birth    TEXT NOT NULL,
        qualification    TEXT NOT NULL,
        graduation_year  INTEGER NOT NULL,
        score_type       TEXT NOT NULL,
        score            REAL NOT NULL,
        screening_score  INTEGER NOT NULL,
        interview_status TEXT NOT NULL,
        national_id      TEXT NOT NULL,
        offer_sent       TEXT NOT NULL,
        submitted_at     TEXT NOT NULL,
        exceptions       TEXT NOT NULL DEFAULT '{}',
        flagged          INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_candidates_submitted_at ON candidates(submitted_at);
";

const SELECT_COLUMNS: &str = "id, full_name, email, phone, date_of_birth, qualification,
    graduation_year, score_type, score, screening_score, interview_status, national_id,
    offer_sent, submitted_at, exceptions, flagged";

/// Candidate store writing to a single SQLite connection.
pub struct SqliteCandidateStore {
    conn: Mutex<Connection>,
}

impl SqliteCandidateStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(unavailable)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(unavailable)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection mutex poisoned".to_string()))
    }
}

impl CandidateStore for SqliteCandidateStore {
    fn insert(&self, candidate: Candidate) -> Result<Candidate, StoreError> {
        let exceptions = serde_json::to_string(&candidate.exceptions)
            .map_err(|err| StoreError::Corrupt(err.to_string()))?;

        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO candidates (
                id, full_name, email, phone, date_of_birth, qualification,
                graduation_year, score_type, score, screening_score, interview_status,
                national_id, offer_sent, submitted_at, exceptions, flagged
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                candidate.id.as_str(),
                candidate.full_name,
                candidate.email,
                candidate.phone,
                candidate.date_of_birth.format("%Y-%m-%d").to_string(),
                candidate.qualification,
                candidate.graduation_year,
                candidate.score_type.label(),
                candidate.score,
                candidate.screening_score,
                candidate.interview_status,
                candidate.national_id,
                candidate.offer_sent,
                // Fixed-width RFC 3339 keeps text order equal to time order.
                candidate.submitted_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                exceptions,
                candidate.flagged as i32,
            ],
        )
        .map_err(|err| match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => StoreError::Conflict,
            _ => unavailable(err),
        })?;

        Ok(candidate)
    }

    fn list(&self) -> Result<Vec<Candidate>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM candidates ORDER BY submitted_at DESC"
            ))
            .map_err(unavailable)?;

        let rows = stmt.query_map([], read_row).map_err(unavailable)?;

        let mut candidates = Vec::new();
        for row in rows {
            candidates.push(row.map_err(unavailable)??);
        }
        Ok(candidates)
    }

    fn delete(&self, id: &CandidateId) -> Result<(), StoreError> {
        let conn = self.connection()?;
        let removed = conn
            .execute("DELETE FROM candidates WHERE id = ?1", params![id.as_str()])
            .map_err(unavailable)?;

        if removed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn unavailable(err: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

/// Column decoding failures surface as `Corrupt` rather than aborting the whole query.
fn read_row(row: &Row<'_>) -> rusqlite::Result<Result<Candidate, StoreError>> {
    let id: String = row.get(0)?;
    let date_of_birth: String = row.get(4)?;
    let score_type: String = row.get(7)?;
    let submitted_at: String = row.get(13)?;
    let exceptions: String = row.get(14)?;
    let flagged: i64 = row.get(15)?;

    let full_name: String = row.get(1)?;
    let email: String = row.get(2)?;
    let phone: String = row.get(3)?;
    let qualification: String = row.get(5)?;
    let graduation_year: i32 = row.get(6)?;
    let score: f64 = row.get(8)?;
    let screening_score: i32 = row.get(9)?;
    let interview_status: String = row.get(10)?;
    let national_id: String = row.get(11)?;
    let offer_sent: String = row.get(12)?;

    Ok(decode(DecodedColumns {
        id,
        date_of_birth,
        score_type,
        submitted_at,
        exceptions,
    })
    .map(|decoded| Candidate {
        id: decoded.id,
        full_name,
        email,
        phone,
        date_of_birth: decoded.date_of_birth,
        qualification,
        graduation_year,
        score_type: decoded.score_type,
        score,
        screening_score,
        interview_status,
        national_id,
        offer_sent,
        submitted_at: decoded.submitted_at,
        exceptions: decoded.exceptions,
        flagged: flagged != 0,
    }))
}

struct DecodedColumns {
    id: String,
    date_of_birth: String,
    score_type: String,
    submitted_at: String,
    exceptions: String,
}

struct Decoded {
    id: CandidateId,
    date_of_birth: NaiveDate,
    score_type: ScoreType,
    submitted_at: DateTime<Utc>,
    exceptions: ExceptionLedger,
}

fn decode(raw: DecodedColumns) -> Result<Decoded, StoreError> {
    let corrupt = |what: &str, detail: String| {
        StoreError::Corrupt(format!("candidate {}: {what} ({detail})", raw.id))
    };

    let date_of_birth = NaiveDate::parse_from_str(&raw.date_of_birth, "%Y-%m-%d")
        .map_err(|err| corrupt("date_of_birth", err.to_string()))?;
    let submitted_at = DateTime::parse_from_rfc3339(&raw.submitted_at)
        .map_err(|err| corrupt("submitted_at", err.to_string()))?
        .with_timezone(&Utc);
    let score_type = match raw.score_type.as_str() {
        "Percentage" => ScoreType::Percentage,
        "CGPA" => ScoreType::Cgpa,
        other => return Err(corrupt("score_type", other.to_string())),
    };
    let exceptions: ExceptionLedger = serde_json::from_str(&raw.exceptions)
        .map_err(|err| corrupt("exceptions", err.to_string()))?;

    Ok(Decoded {
        id: CandidateId(raw.id),
        date_of_birth,
        score_type,
        submitted_at,
        exceptions,
    })
}
