use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{ClinicUser, NewClinicUser};

const USER_COLUMNS: &str =
    "id, name, display_name, phone, password_hash, telegram_linked, created_at";

// ── Clinic users ──

pub fn create_user(conn: &Connection, user: &NewClinicUser) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO clinic_users (name, display_name, phone, password_hash) VALUES (?1, ?2, ?3, ?4)",
        params![user.name, user.display_name, user.phone, user.password_hash],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Exact-name lookup. Stored names are lowercase.
pub fn find_user(conn: &Connection, name: &str) -> anyhow::Result<Option<ClinicUser>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM clinic_users WHERE name = ?1 COLLATE BINARY");
    let user = conn
        .query_row(&sql, params![name], |row| Ok(parse_user_row(row)))
        .optional()?;
    user.transpose()
}

pub fn find_user_ci(conn: &Connection, name: &str) -> anyhow::Result<Option<ClinicUser>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM clinic_users WHERE name = ?1 COLLATE NOCASE");
    let user = conn
        .query_row(&sql, params![name], |row| Ok(parse_user_row(row)))
        .optional()?;
    user.transpose()
}

pub fn set_telegram_linked(conn: &Connection, name: &str, linked: bool) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE clinic_users SET telegram_linked = ?1 WHERE name = ?2",
        params![linked as i32, name],
    )?;
    Ok(count > 0)
}

pub fn count_users(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM clinic_users", [], |row| row.get(0))?;
    Ok(count)
}

fn parse_user_row(row: &rusqlite::Row) -> anyhow::Result<ClinicUser> {
    let created_at_str: String = row.get(6)?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(ClinicUser {
        id: row.get(0)?,
        name: row.get(1)?,
        display_name: row.get(2)?,
        phone: row.get(3)?,
        password_hash: row.get(4)?,
        telegram_linked: row.get::<_, i32>(5)? != 0,
        created_at,
    })
}

/// True when an insert failed on the unique username index.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
