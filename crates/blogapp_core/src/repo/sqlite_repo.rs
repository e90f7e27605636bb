//! SQLite-backed record store.
//!
//! # Responsibility
//! - Implement `RecordRepository` over the migrated `blog_posts` and
//!   `comments` tables.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Ids come from `AUTOINCREMENT`, so they are never reused.
//! - Delete is a soft delete (`deleted_at`); soft-deleted rows are invisible
//!   to every operation and report `NotFound`.
//! - The connection mutex is held for the whole operation.
//! - Read paths reject rows that violate model invariants.

use crate::clock::Clock;
use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::blog_post::BlogPost;
use crate::model::comment::Comment;
use crate::model::record::{Record, RecordId};
use crate::repo::record_repo::{RecordRepository, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

/// Connection handle shared by every SQLite store of one process.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Table mapping for a record stored in SQLite.
pub trait SqlRecord: Record {
    const TABLE: &'static str;
    /// Columns written from a create draft, in `insert_values` order.
    const INSERT_COLUMNS: &'static [&'static str];
    /// Columns replaced by an update patch, in `update_values` order.
    const UPDATE_COLUMNS: &'static [&'static str];
    /// Full projection read back by `from_row`.
    const SELECT_COLUMNS: &'static str;

    fn insert_values(draft: &Self::Draft) -> Vec<Value>;
    fn update_values(patch: &Self::Draft) -> Vec<Value>;
    /// Returns an extra `WHERE` predicate with its bind values.
    fn filter_clause(filter: &Self::Filter) -> Option<(&'static str, Vec<Value>)>;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

impl SqlRecord for BlogPost {
    const TABLE: &'static str = "blog_posts";
    const INSERT_COLUMNS: &'static [&'static str] = &["title", "content"];
    const UPDATE_COLUMNS: &'static [&'static str] = &["title", "content"];
    const SELECT_COLUMNS: &'static str = "id, title, content, created_at, updated_at";

    fn insert_values(draft: &Self::Draft) -> Vec<Value> {
        vec![
            Value::Text(draft.title.clone()),
            Value::Text(draft.content.clone()),
        ]
    }

    fn update_values(patch: &Self::Draft) -> Vec<Value> {
        Self::insert_values(patch)
    }

    fn filter_clause(_filter: &()) -> Option<(&'static str, Vec<Value>)> {
        None
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let post = Self {
            id: row.get("id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        };
        check_timestamps::<Self>(&post)?;
        Ok(post)
    }
}

impl SqlRecord for Comment {
    const TABLE: &'static str = "comments";
    const INSERT_COLUMNS: &'static [&'static str] = &["blog_post_id", "content"];
    const UPDATE_COLUMNS: &'static [&'static str] = &["content"];
    const SELECT_COLUMNS: &'static str = "id, blog_post_id, content, created_at, updated_at";

    fn insert_values(draft: &Self::Draft) -> Vec<Value> {
        vec![
            Value::Integer(draft.blog_post_id),
            Value::Text(draft.content.clone()),
        ]
    }

    fn update_values(patch: &Self::Draft) -> Vec<Value> {
        vec![Value::Text(patch.content.clone())]
    }

    fn filter_clause(filter: &Self::Filter) -> Option<(&'static str, Vec<Value>)> {
        Some(("blog_post_id = ?", vec![Value::Integer(filter.blog_post_id)]))
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let comment = Self {
            id: row.get("id")?,
            blog_post_id: row.get("blog_post_id")?,
            content: row.get("content")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        };
        if comment.blog_post_id <= 0 {
            return Err(RepoError::InvalidData(format!(
                "invalid blog_post_id `{}` in comments.id={}",
                comment.blog_post_id, comment.id
            )));
        }
        check_timestamps::<Self>(&comment)?;
        Ok(comment)
    }
}

/// SQLite record store for one entity type.
pub struct SqliteRepository<R: SqlRecord> {
    conn: SharedConnection,
    clock: Arc<dyn Clock>,
    _record: PhantomData<fn() -> R>,
}

impl<R: SqlRecord> SqliteRepository<R> {
    /// Constructs a store from a connection opened through `crate::db`.
    ///
    /// Rejects connections whose schema has not been migrated yet.
    pub fn try_new(conn: SharedConnection, clock: Arc<dyn Clock>) -> RepoResult<Self> {
        {
            let guard = lock(&conn)?;
            let version: u32 =
                guard.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
            if version < latest_version() {
                return Err(RepoError::InvalidData(format!(
                    "schema version {version} is older than required {}; open the database through db::open_db",
                    latest_version()
                )));
            }
        }

        Ok(Self {
            conn,
            clock,
            _record: PhantomData,
        })
    }

    fn select_by_id(conn: &Connection, id: RecordId) -> RepoResult<Option<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1 AND deleted_at IS NULL;",
            R::SELECT_COLUMNS,
            R::TABLE
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        let record = match rows.next()? {
            Some(row) => Some(R::from_row(row)?),
            None => None,
        };
        Ok(record)
    }

    fn select_many(&self, filter: Option<(&'static str, Vec<Value>)>) -> RepoResult<Vec<R>> {
        let mut sql = format!(
            "SELECT {} FROM {} WHERE deleted_at IS NULL",
            R::SELECT_COLUMNS,
            R::TABLE
        );
        let mut bind_values = Vec::new();
        if let Some((clause, values)) = filter {
            sql.push_str(" AND ");
            sql.push_str(clause);
            bind_values = values;
        }
        sql.push_str(" ORDER BY id ASC;");

        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(R::from_row(row)?);
        }
        Ok(records)
    }
}

impl<R: SqlRecord> RecordRepository<R> for SqliteRepository<R> {
    fn list_all(&self) -> RepoResult<Vec<R>> {
        self.select_many(None)
    }

    fn list_where(&self, filter: &R::Filter) -> RepoResult<Vec<R>> {
        self.select_many(R::filter_clause(filter))
    }

    fn get(&self, id: RecordId) -> RepoResult<R> {
        let conn = lock(&self.conn)?;
        Self::select_by_id(&conn, id)?.ok_or_else(|| RepoError::not_found::<R>(id))
    }

    fn create(&self, draft: R::Draft) -> RepoResult<R> {
        R::validate_draft(&draft)?;

        let conn = lock(&self.conn)?;
        let now = self.clock.now_ms();
        let columns = R::INSERT_COLUMNS.join(", ");
        let placeholders = vec!["?"; R::INSERT_COLUMNS.len() + 2].join(", ");
        let sql = format!(
            "INSERT INTO {} ({columns}, created_at, updated_at) VALUES ({placeholders});",
            R::TABLE
        );
        let mut values = R::insert_values(&draft);
        values.push(Value::Integer(now));
        values.push(Value::Integer(now));
        conn.execute(&sql, params_from_iter(values))?;

        let id = conn.last_insert_rowid();
        Self::select_by_id(&conn, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted row {}.id={id} not readable", R::TABLE))
        })
    }

    fn update(&self, id: RecordId, patch: R::Draft) -> RepoResult<R> {
        let conn = lock(&self.conn)?;
        let assignments = R::UPDATE_COLUMNS
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments}, updated_at = MAX(updated_at + 1, ?) WHERE id = ? AND deleted_at IS NULL;",
            R::TABLE
        );
        let mut values = R::update_values(&patch);
        values.push(Value::Integer(self.clock.now_ms()));
        values.push(Value::Integer(id));

        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(RepoError::not_found::<R>(id));
        }

        Self::select_by_id(&conn, id)?.ok_or_else(|| RepoError::not_found::<R>(id))
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        let conn = lock(&self.conn)?;
        let sql = format!(
            "UPDATE {} SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL;",
            R::TABLE
        );
        let changed = conn.execute(&sql, params![self.clock.now_ms(), id])?;
        if changed == 0 {
            return Err(RepoError::not_found::<R>(id));
        }
        Ok(())
    }
}

fn lock(conn: &SharedConnection) -> RepoResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| RepoError::StorageUnavailable(DbError::ConnectionPoisoned))
}

fn check_timestamps<R: Record>(record: &R) -> RepoResult<()> {
    if record.updated_at() < record.created_at() {
        return Err(RepoError::InvalidData(format!(
            "{} {} has updated_at {} before created_at {}",
            R::KIND,
            record.id(),
            record.updated_at(),
            record.created_at()
        )));
    }
    Ok(())
}
