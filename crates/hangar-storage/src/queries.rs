// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System and instance queries.
//!
//! Every write runs in one transaction. Updates are guarded by the stored
//! revision, so a stale or missing record is reported as a conflict and the
//! transaction is rolled back untouched.

use std::str::FromStr;

use hangar_core::{
    HangarError, InstanceId, InstanceStatus, PersistedInstance, PersistedSystem, SystemId,
};
use rusqlite::{Connection, OptionalExtension, params};

use crate::database::{Database, map_tr_err};

const SYSTEM_COLUMNS: &str =
    "id, name, version, description, display_name, icon_name, metadata, revision";

/// Outcome of a guarded write inside the connection thread.
enum Write {
    Done(PersistedSystem),
    Conflict,
}

fn now() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

fn conversion_err(e: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(e))
}

fn read_system(row: &rusqlite::Row<'_>) -> Result<PersistedSystem, rusqlite::Error> {
    let metadata: String = row.get(6)?;
    let metadata = serde_json::from_str(&metadata).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let revision: i64 = row.get(7)?;
    Ok(PersistedSystem {
        id: SystemId(row.get(0)?),
        name: row.get(1)?,
        version: row.get(2)?,
        description: row.get(3)?,
        display_name: row.get(4)?,
        icon_name: row.get(5)?,
        metadata,
        instances: Vec::new(),
        revision: revision as u64,
    })
}

fn read_instance(row: &rusqlite::Row<'_>) -> Result<PersistedInstance, rusqlite::Error> {
    let status: String = row.get(2)?;
    Ok(PersistedInstance {
        id: InstanceId(row.get(0)?),
        name: row.get(1)?,
        status: InstanceStatus::from_str(&status).unwrap_or(InstanceStatus::Unknown),
    })
}

fn load_instances(conn: &Connection, system: &mut PersistedSystem) -> Result<(), rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT id, name, status FROM instances WHERE system_id = ?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![system.id.0], read_instance)?;
    system.instances = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(())
}

fn write_instances(conn: &Connection, system: &PersistedSystem) -> Result<(), rusqlite::Error> {
    let keep: Vec<&str> = system.instances.iter().map(|i| i.id.0.as_str()).collect();
    let existing: Vec<String> = {
        let mut stmt = conn.prepare("SELECT id FROM instances WHERE system_id = ?1")?;
        let rows = stmt.query_map(params![system.id.0], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };
    for id in existing.iter().filter(|id| !keep.contains(&id.as_str())) {
        conn.execute("DELETE FROM instances WHERE id = ?1", params![id])?;
    }

    let created_at = now();
    for (position, instance) in system.instances.iter().enumerate() {
        conn.execute(
            "INSERT INTO instances (id, system_id, name, status, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 status = excluded.status,
                 position = excluded.position",
            params![
                instance.id.0,
                system.id.0,
                instance.name,
                instance.status.to_string(),
                position as i64,
                created_at,
            ],
        )?;
    }
    Ok(())
}

/// Find a system and its instances by `(name, version)`.
pub async fn find_system(
    db: &Database,
    name: &str,
    version: &str,
) -> Result<Option<PersistedSystem>, HangarError> {
    let name = name.to_string();
    let version = version.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<PersistedSystem>, rusqlite::Error> {
            let system = conn
                .query_row(
                    &format!("SELECT {SYSTEM_COLUMNS} FROM systems WHERE name = ?1 AND version = ?2"),
                    params![name, version],
                    read_system,
                )
                .optional()?;
            match system {
                Some(mut system) => {
                    load_instances(conn, &mut system)?;
                    Ok(Some(system))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new system. An existing `(name, version)` is a conflict.
pub async fn create_system(
    db: &Database,
    system: &PersistedSystem,
) -> Result<PersistedSystem, HangarError> {
    let system = system.clone();
    let key = (system.name.clone(), system.version.clone());
    let written = db
        .connection()
        .call(move |conn| -> Result<Write, rusqlite::Error> {
            let tx = conn.transaction()?;
            let exists: Option<String> = tx
                .query_row(
                    "SELECT id FROM systems WHERE name = ?1 AND version = ?2",
                    params![system.name, system.version],
                    |row| row.get(0),
                )
                .optional()?;
            if exists.is_some() {
                return Ok(Write::Conflict);
            }

            let metadata = serde_json::to_string(&system.metadata).map_err(conversion_err)?;
            let stamp = now();
            tx.execute(
                "INSERT INTO systems (id, name, version, description, display_name, icon_name,
                                      metadata, revision, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)",
                params![
                    system.id.0,
                    system.name,
                    system.version,
                    system.description,
                    system.display_name,
                    system.icon_name,
                    metadata,
                    stamp,
                ],
            )?;
            write_instances(&tx, &system)?;
            tx.commit()?;

            let mut stored = system;
            stored.revision = 1;
            Ok(Write::Done(stored))
        })
        .await
        .map_err(map_tr_err)?;

    match written {
        Write::Done(system) => Ok(system),
        Write::Conflict => Err(HangarError::system_conflict(&key.0, &key.1)),
    }
}

/// Replace a system's fields and instance set, guarded by its revision.
pub async fn update_system(
    db: &Database,
    system: &PersistedSystem,
) -> Result<PersistedSystem, HangarError> {
    let system = system.clone();
    let key = (system.name.clone(), system.version.clone());
    let written = db
        .connection()
        .call(move |conn| -> Result<Write, rusqlite::Error> {
            let tx = conn.transaction()?;
            let metadata = serde_json::to_string(&system.metadata).map_err(conversion_err)?;
            let changed = tx.execute(
                "UPDATE systems
                 SET description = ?1, display_name = ?2, icon_name = ?3, metadata = ?4,
                     revision = revision + 1, updated_at = ?5
                 WHERE id = ?6 AND revision = ?7",
                params![
                    system.description,
                    system.display_name,
                    system.icon_name,
                    metadata,
                    now(),
                    system.id.0,
                    system.revision as i64,
                ],
            )?;
            if changed == 0 {
                return Ok(Write::Conflict);
            }
            write_instances(&tx, &system)?;
            tx.commit()?;

            let mut stored = system;
            stored.revision += 1;
            Ok(Write::Done(stored))
        })
        .await
        .map_err(map_tr_err)?;

    match written {
        Write::Done(system) => Ok(system),
        Write::Conflict => Err(HangarError::system_conflict(&key.0, &key.1)),
    }
}

/// Delete a system and its instances.
pub async fn delete_system(db: &Database, system: &PersistedSystem) -> Result<(), HangarError> {
    let id = system.id.0.clone();
    let deleted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM instances WHERE system_id = ?1", params![id])?;
            let deleted = tx.execute("DELETE FROM systems WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(deleted)
        })
        .await
        .map_err(map_tr_err)?;

    if deleted == 0 {
        return Err(HangarError::NotFound {
            kind: "system".to_string(),
            key: format!("{}-{}", system.name, system.version),
        });
    }
    Ok(())
}

/// Find an instance by id, with the id of the system that owns it.
pub async fn find_instance(
    db: &Database,
    id: &InstanceId,
) -> Result<Option<(SystemId, PersistedInstance)>, HangarError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| -> Result<Option<(SystemId, PersistedInstance)>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, name, status, system_id FROM instances WHERE id = ?1",
                params![id],
                |row| Ok((SystemId(row.get(3)?), read_instance(row)?)),
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// All systems with their instances, ordered by name then version.
pub async fn list_systems(db: &Database) -> Result<Vec<PersistedSystem>, HangarError> {
    db.connection()
        .call(|conn| -> Result<Vec<PersistedSystem>, rusqlite::Error> {
            let mut systems = {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {SYSTEM_COLUMNS} FROM systems ORDER BY name, version"
                ))?;
                let rows = stmt.query_map([], read_system)?;
                rows.collect::<Result<Vec<_>, _>>()?
            };
            for system in &mut systems {
                load_instances(conn, system)?;
            }
            Ok(systems)
        })
        .await
        .map_err(map_tr_err)
}
