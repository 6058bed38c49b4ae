//! Schema migrations for the key-value table.
//!
//! # Invariants
//! - `version` values are strictly increasing; the highest applied one is
//!   stamped into `PRAGMA user_version`.
//! - All pending steps commit together or not at all.
//! - Only the table shape is migrated. Collection blobs carry no schema
//!   version and are never rewritten here.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "kv_entries",
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    run_migrations(conn, MIGRATIONS)
}

/// Reads the schema version stamped on `conn`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn run_migrations(conn: &mut Connection, migrations: &[Migration]) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let latest = migrations.last().map_or(0, |migration| migration.version);
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = migrations
        .iter()
        .filter(|migration| migration.version > from)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            })
            .map_err(|source| DbError::Migration {
                version: migration.version,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=done from={from} to={latest}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{current_user_version, run_migrations, Migration};
    use crate::db::DbError;
    use rusqlite::Connection;

    const BROKEN: &[Migration] = &[
        Migration {
            version: 1,
            name: "kv_entries",
            sql: include_str!("0001_kv_entries.sql"),
        },
        Migration {
            version: 2,
            name: "broken",
            sql: "ALTER TABLE missing_table ADD COLUMN note TEXT;",
        },
    ];

    #[test]
    fn failing_step_names_its_version_and_rolls_back_the_batch() {
        let mut conn = Connection::open_in_memory().unwrap();

        let err = run_migrations(&mut conn, BROKEN).unwrap_err();
        assert!(matches!(err, DbError::Migration { version: 2, .. }));
        assert!(err.to_string().contains("migration 2"));

        assert_eq!(current_user_version(&conn).unwrap(), 0);
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'kv_entries';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0);
    }

    #[test]
    fn up_to_date_schema_is_left_untouched() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn, &BROKEN[..1]).unwrap();
        run_migrations(&mut conn, &BROKEN[..1]).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), 1);
    }
}
