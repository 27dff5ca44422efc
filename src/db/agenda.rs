use std::path::PathBuf;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Error as SqlError, OptionalExtension, Params, Row};
use tracing::{debug, warn};

use super::connection::{self, Location};
use crate::error::StoreError;
use crate::models::{parse_datetime, AgendaEntry, Priority, UnknownPriority};

/// Column list shared by every read so `entry_from_row` can rely on positions.
const SELECT_ENTRY: &str = "SELECT id, title, description, scheduled_at, priority FROM agenda";
/// Single source of truth for listing order. `id` breaks ties between entries
/// scheduled for the same second.
const ORDER_BY_SCHEDULE: &str = "ORDER BY scheduled_at ASC, id ASC";

/// Owner of the one SQLite connection the application uses.
///
/// The connection is opened lazily and reopened transparently when an
/// operation finds it closed, so a failed open at startup or an explicit
/// [`AgendaStore::close`] never leaves the store permanently unusable.
pub struct AgendaStore {
    location: Location,
    conn: Option<Connection>,
}

impl AgendaStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let location = Location::File(path.into());
        let conn = connection::open(&location)?;
        Ok(Self {
            location,
            conn: Some(conn),
        })
    }

    /// A store that has not connected yet. The first operation tries to open
    /// `path`; used when the startup open failed.
    pub fn detached(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: None,
        }
    }

    /// A private in-memory database. Mostly useful in tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let location = Location::Memory;
        let conn = connection::open(&location)?;
        Ok(Self {
            location,
            conn: Some(conn),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Human-readable location for status lines and logs.
    pub fn describe(&self) -> String {
        self.location.describe()
    }

    /// Close the connection. The next operation reopens it.
    pub fn close(&mut self) -> Result<(), StoreError> {
        if let Some(conn) = self.conn.take() {
            if let Err((conn, err)) = conn.close() {
                self.conn = Some(conn);
                return Err(StoreError::Close(err));
            }
            debug!(location = %self.location.describe(), "agenda database closed");
        }
        Ok(())
    }

    /// Persist a new row. Any id on `entry` is ignored; the returned entry
    /// carries the id SQLite assigned.
    pub fn create(&mut self, entry: &AgendaEntry) -> Result<AgendaEntry, StoreError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO agenda (title, description, scheduled_at, priority)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.title,
                entry.description,
                entry.scheduled_at_text(),
                entry.priority.label()
            ],
        )
        .map_err(StoreError::query("insert agenda"))?;

        let created = AgendaEntry {
            id: conn.last_insert_rowid(),
            ..entry.clone()
        };
        debug!(id = created.id, title = %created.title, "agenda created");
        Ok(created)
    }

    /// Every entry, earliest first.
    pub fn get_all(&mut self) -> Result<Vec<AgendaEntry>, StoreError> {
        self.query_entries(
            &format!("{SELECT_ENTRY} {ORDER_BY_SCHEDULE}"),
            [],
            "load agenda",
        )
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<AgendaEntry>, StoreError> {
        let conn = self.connection()?;
        conn.query_row(
            &format!("{SELECT_ENTRY} WHERE id = ?1"),
            [id],
            entry_from_row,
        )
        .optional()
        .map_err(StoreError::query("load agenda by id"))
    }

    /// Entries scheduled on `date`, whatever the time of day.
    pub fn get_by_date(&mut self, date: NaiveDate) -> Result<Vec<AgendaEntry>, StoreError> {
        self.query_entries(
            &format!("{SELECT_ENTRY} WHERE substr(scheduled_at, 1, 10) = ?1 {ORDER_BY_SCHEDULE}"),
            [date.format("%Y-%m-%d").to_string()],
            "load agenda by date",
        )
    }

    /// Case-insensitive substring match against title or description. LIKE
    /// wildcards in `keyword` match literally.
    pub fn search(&mut self, keyword: &str) -> Result<Vec<AgendaEntry>, StoreError> {
        let pattern = format!("%{}%", escape_like(keyword));
        self.query_entries(
            &format!(
                "{SELECT_ENTRY}
                 WHERE title LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'
                 {ORDER_BY_SCHEDULE}"
            ),
            [pattern],
            "search agenda",
        )
    }

    pub fn get_by_priority(&mut self, priority: Priority) -> Result<Vec<AgendaEntry>, StoreError> {
        self.query_entries(
            &format!("{SELECT_ENTRY} WHERE priority = ?1 {ORDER_BY_SCHEDULE}"),
            [priority.label()],
            "load agenda by priority",
        )
    }

    /// Rewrite every non-id field of the row matching `entry.id`. Returns
    /// `false` when no such row exists.
    pub fn update(&mut self, entry: &AgendaEntry) -> Result<bool, StoreError> {
        let conn = self.connection()?;
        let updated = conn
            .execute(
                "UPDATE agenda
                 SET title = ?1, description = ?2, scheduled_at = ?3, priority = ?4
                 WHERE id = ?5",
                params![
                    entry.title,
                    entry.description,
                    entry.scheduled_at_text(),
                    entry.priority.label(),
                    entry.id
                ],
            )
            .map_err(StoreError::query("update agenda"))?;

        if updated == 0 {
            warn!(id = entry.id, "update matched no agenda");
        } else {
            debug!(id = entry.id, "agenda updated");
        }
        Ok(updated > 0)
    }

    /// Hard delete. Returns `false` when no row has `id`.
    pub fn delete(&mut self, id: i64) -> Result<bool, StoreError> {
        let conn = self.connection()?;
        let deleted = conn
            .execute("DELETE FROM agenda WHERE id = ?1", [id])
            .map_err(StoreError::query("delete agenda"))?;

        if deleted == 0 {
            warn!(id, "delete matched no agenda");
        } else {
            debug!(id, "agenda deleted");
        }
        Ok(deleted > 0)
    }

    /// Remove every row and return how many were removed.
    pub fn delete_all(&mut self) -> Result<usize, StoreError> {
        let conn = self.connection()?;
        let deleted = conn
            .execute("DELETE FROM agenda", [])
            .map_err(StoreError::query("clear agenda"))?;
        debug!(deleted, "agenda cleared");
        Ok(deleted)
    }

    pub fn count(&mut self) -> Result<usize, StoreError> {
        let conn = self.connection()?;
        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM agenda", [], |row| row.get(0))
            .map_err(StoreError::query("count agenda"))?;
        Ok(usize::try_from(total).unwrap_or_default())
    }

    /// Hand out the live connection, reopening it first if it was closed.
    fn connection(&mut self) -> Result<&Connection, StoreError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => connection::open(&self.location)?,
        };
        Ok(self.conn.insert(conn))
    }

    fn query_entries<P: Params>(
        &mut self,
        sql: &str,
        params: P,
        action: &'static str,
    ) -> Result<Vec<AgendaEntry>, StoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql).map_err(StoreError::query(action))?;

        let entries = stmt
            .query_map(params, entry_from_row)
            .map_err(StoreError::query(action))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::query(action))?;

        Ok(entries)
    }
}

/// Hydrate an entry from the `SELECT_ENTRY` column order.
fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<AgendaEntry> {
    let scheduled_at: String = row.get(3)?;
    let scheduled_at = parse_datetime(&scheduled_at)
        .map_err(|err| SqlError::FromSqlConversionFailure(3, Type::Text, Box::new(err)))?;

    let priority: Option<String> = row.get(4)?;
    let priority = priority
        .unwrap_or_default()
        .parse::<Priority>()
        .map_err(|err: UnknownPriority| {
            SqlError::FromSqlConversionFailure(4, Type::Text, Box::new(err))
        })?;

    let description: Option<String> = row.get(2)?;

    Ok(AgendaEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        description: description.unwrap_or_default(),
        scheduled_at,
        priority,
    })
}

fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn seeded() -> AgendaStore {
        let mut store = AgendaStore::in_memory().unwrap();
        for (title, description, when, priority) in [
            ("Laporan", "kirim ke kantor", at(2025, 1, 3, 9, 0), Priority::Tinggi),
            ("Olahraga", "lari pagi", at(2025, 1, 1, 6, 30), Priority::Rendah),
            ("Belanja", "beli kopi 100%", at(2025, 1, 2, 17, 0), Priority::Sedang),
            ("Rapat tim", "", at(2025, 1, 1, 14, 0), Priority::Urgent),
        ] {
            store
                .create(&AgendaEntry::new(title, description, when, priority))
                .unwrap();
        }
        store
    }

    #[test]
    fn create_assigns_ids_and_get_by_id_returns_fields() {
        let mut store = AgendaStore::in_memory().unwrap();
        let draft = AgendaEntry::new("Dentist", "bring card", at(2025, 2, 1, 10, 15), Priority::Sedang);

        let created = store.create(&draft).unwrap();
        assert!(created.id >= 0);

        let loaded = store.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(loaded, AgendaEntry { id: created.id, ..draft });
        assert_eq!(store.get_by_id(created.id + 100).unwrap(), None);
    }

    #[test]
    fn create_ignores_incoming_id() {
        let mut store = seeded();
        let mut entry = AgendaEntry::new("Imported", "", at(2025, 3, 1, 8, 0), Priority::Rendah);
        entry.id = 1;

        let created = store.create(&entry).unwrap();
        assert_ne!(created.id, 1);
        assert_eq!(store.count().unwrap(), 5);
        assert_eq!(store.get_by_id(1).unwrap().unwrap().title, "Laporan");
    }

    #[test]
    fn listing_orders_by_schedule() {
        let mut store = seeded();
        let titles: Vec<_> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["Olahraga", "Rapat tim", "Belanja", "Laporan"]);
    }

    #[test]
    fn get_by_date_ignores_time_of_day() {
        let mut store = seeded();
        let titles: Vec<_> = store
            .get_by_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["Olahraga", "Rapat tim"]);
        assert!(store
            .get_by_date(NaiveDate::from_ymd_opt(2025, 1, 4).unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let mut store = seeded();
        let by_title: Vec<_> = store.search("RAPAT").unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(by_title, ["Rapat tim"]);

        let by_description: Vec<_> = store.search("pagi").unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(by_description, ["Olahraga"]);

        assert!(store.search("foo").unwrap().is_empty());
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let mut store = seeded();
        let hits: Vec<_> = store.search("100%").unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(hits, ["Belanja"]);
        assert!(store.search("_").unwrap().is_empty());
    }

    #[test]
    fn get_by_priority_is_exact() {
        let mut store = seeded();
        let hits = store.get_by_priority(Priority::Urgent).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Rapat tim");
    }

    #[test]
    fn update_rewrites_fields_and_reorders() {
        let mut store = seeded();
        let mut first = store.get_all().unwrap().remove(0);
        first.title = "Olahraga sore".into();
        first.scheduled_at = at(2025, 1, 5, 16, 0);
        first.priority = Priority::Sedang;

        assert!(store.update(&first).unwrap());
        let all = store.get_all().unwrap();
        assert_eq!(all.last(), Some(&first));
    }

    #[test]
    fn update_and_delete_of_missing_rows_change_nothing() {
        let mut store = seeded();
        let before = store.get_all().unwrap();

        let mut ghost = before[0].clone();
        ghost.id = 999;
        ghost.title = "ghost".into();
        assert!(!store.update(&ghost).unwrap());
        assert!(!store.delete(999).unwrap());

        assert_eq!(store.get_all().unwrap(), before);
    }

    #[test]
    fn delete_removes_one_row() {
        let mut store = seeded();
        let target = store.get_all().unwrap()[1].id;
        assert!(store.delete(target).unwrap());
        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.get_by_id(target).unwrap(), None);
    }

    #[test]
    fn delete_all_reports_removed_rows() {
        let mut store = seeded();
        assert_eq!(store.delete_all().unwrap(), 4);
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn file_store_reopens_after_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("agenda.db");
        let mut store = AgendaStore::open(&path).unwrap();
        store
            .create(&AgendaEntry::new("Persist", "", at(2025, 1, 1, 0, 0), Priority::Rendah))
            .unwrap();

        store.close().unwrap();
        assert!(!store.is_connected());
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.is_connected());
    }

    #[test]
    fn detached_store_connects_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = AgendaStore::detached(dir.path().join("agenda.db"));
        assert!(!store.is_connected());
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.is_connected());
    }

    #[test]
    fn unreadable_rows_surface_as_errors() {
        let mut store = seeded();
        store
            .connection()
            .unwrap()
            .execute(
                "INSERT INTO agenda (title, scheduled_at, priority) VALUES ('bad', 'yesterday', 'Rendah')",
                [],
            )
            .unwrap();
        assert!(matches!(store.get_all(), Err(StoreError::Query { .. })));
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
