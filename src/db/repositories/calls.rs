use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    helpers::{cases_to_json, parse_cases, parse_datetime, to_i64, to_u64},
    Database,
};
use crate::models::Call;

fn row_to_call(row: &Row) -> Result<Call> {
    let start_time: String = row.get("start_time")?;
    let duration_ms: i64 = row.get("duration_ms")?;
    let cases: String = row.get("cases")?;

    Ok(Call {
        id: Some(row.get("id")?),
        phone_number: row.get("phone_number")?,
        start_time: parse_datetime(&start_time, "start_time")?,
        duration_ms: to_u64(duration_ms, "duration_ms")?,
        cases: parse_cases(&cases)?,
    })
}

impl Database {
    /// Stores a new call and returns it with the assigned id. The call must
    /// not have an id yet.
    pub async fn insert_call(&self, call: &Call) -> Result<Call> {
        if call.id.is_some() {
            bail!("cannot insert a call that already has an id");
        }

        let record = call.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO calls (phone_number, start_time, duration_ms, cases)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.phone_number,
                    record.start_time.to_rfc3339(),
                    to_i64(record.duration_ms)?,
                    cases_to_json(&record.cases)?,
                ],
            )?;

            let mut stored = record;
            stored.id = Some(conn.last_insert_rowid());
            Ok(stored)
        })
        .await
    }

    /// Overwrites a stored call. The call must already have an id.
    pub async fn update_call(&self, call: &Call) -> Result<Call> {
        let Some(id) = call.id else {
            bail!("cannot update a call without an id");
        };

        let record = call.clone();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE calls
                 SET phone_number = ?1,
                     start_time = ?2,
                     duration_ms = ?3,
                     cases = ?4
                 WHERE id = ?5",
                params![
                    record.phone_number,
                    record.start_time.to_rfc3339(),
                    to_i64(record.duration_ms)?,
                    cases_to_json(&record.cases)?,
                    id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("call {id} not found"));
            }

            Ok(record)
        })
        .await
    }

    /// Removes a call and returns it, or fails if it does not exist.
    pub async fn delete_call(&self, id: i64) -> Result<Call> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, phone_number, start_time, duration_ms, cases
                 FROM calls
                 WHERE id = ?1",
            )?;

            let mut rows = stmt.query(params![id])?;
            let call = match rows.next()? {
                Some(row) => row_to_call(row)?,
                None => return Err(anyhow!("call {id} not found")),
            };
            drop(rows);
            drop(stmt);

            conn.execute("DELETE FROM calls WHERE id = ?1", params![id])?;
            Ok(call)
        })
        .await
    }

    pub async fn get_call(&self, id: i64) -> Result<Call> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, phone_number, start_time, duration_ms, cases
                 FROM calls
                 WHERE id = ?1",
            )?;

            let mut rows = stmt.query(params![id])?;
            match rows.next()? {
                Some(row) => row_to_call(row),
                None => Err(anyhow!("call {id} not found")),
            }
        })
        .await
    }

    /// Calls whose start time falls in `[start, end]` (both bounds
    /// inclusive), ascending by start time.
    pub async fn get_calls_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Call>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, phone_number, start_time, duration_ms, cases
                 FROM calls
                 WHERE start_time BETWEEN ?1 AND ?2
                 ORDER BY start_time ASC",
            )?;

            let mut rows = stmt.query(params![start.to_rfc3339(), end.to_rfc3339()])?;
            let mut calls = Vec::new();
            while let Some(row) = rows.next()? {
                calls.push(row_to_call(row)?);
            }

            Ok(calls)
        })
        .await
    }
}
