use blogapp_core::db::{open_db, open_db_in_memory};
use blogapp_core::{
    BlogPost, BlogPostDraft, Comment, CommentDraft, CommentFilter, ErrorKind, ManualClock,
    RecordRepository, RepoError, SharedConnection, SqliteRepository, SystemClock,
};
use rusqlite::{Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use std::thread;

fn shared(conn: Connection) -> SharedConnection {
    Arc::new(Mutex::new(conn))
}

fn deleted_at(conn: &SharedConnection, table: &str, id: i64) -> Option<Option<i64>> {
    conn.lock()
        .unwrap()
        .query_row(
            &format!("SELECT deleted_at FROM {table} WHERE id = ?1;"),
            [id],
            |row| row.get(0),
        )
        .optional()
        .unwrap()
}

#[test]
fn records_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blogapp.db");
    let clock = Arc::new(ManualClock::new(1_000));

    {
        let posts =
            SqliteRepository::<BlogPost>::try_new(shared(open_db(&path).unwrap()), clock.clone())
                .unwrap();
        posts.create(BlogPostDraft::new("kept", "body")).unwrap();
        let dropped = posts.create(BlogPostDraft::new("dropped", "")).unwrap();
        posts.delete(dropped.id).unwrap();
    }

    let posts =
        SqliteRepository::<BlogPost>::try_new(shared(open_db(&path).unwrap()), clock).unwrap();
    let listed = posts.list_all().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "kept");
    assert_eq!(listed[0].created_at, 1_000);

    // AUTOINCREMENT keeps counting past soft-deleted and reopened rows.
    let next = posts.create(BlogPostDraft::new("next", "")).unwrap();
    assert_eq!(next.id, 3);
}

#[test]
fn delete_is_soft_and_hidden_from_the_store_api() {
    let conn = shared(open_db_in_memory().unwrap());
    let comments =
        SqliteRepository::<Comment>::try_new(conn.clone(), Arc::new(ManualClock::new(5))).unwrap();

    let comment = comments.create(CommentDraft::new(3, "bye")).unwrap();
    comments.delete(comment.id).unwrap();

    assert_eq!(deleted_at(&conn, "comments", comment.id), Some(Some(5)));
    assert!(comments
        .list_where(&CommentFilter::for_post(3))
        .unwrap()
        .is_empty());
    let err = comments.get(comment.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(deleted_at(&conn, "comments", 999), None);
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let raw = Connection::open_in_memory().unwrap();

    let err = SqliteRepository::<BlogPost>::try_new(shared(raw), Arc::new(SystemClock))
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("schema version")));
}

#[test]
fn storage_failures_surface_as_storage_unavailable() {
    let conn = shared(open_db_in_memory().unwrap());
    let posts =
        SqliteRepository::<BlogPost>::try_new(conn.clone(), Arc::new(SystemClock)).unwrap();
    conn.lock()
        .unwrap()
        .execute_batch("DROP TABLE blog_posts;")
        .unwrap();

    let err = posts.list_all().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    assert!(matches!(err, RepoError::StorageUnavailable(_)));
}

#[test]
fn corrupt_rows_are_reported_not_masked() {
    let conn = shared(open_db_in_memory().unwrap());
    let posts =
        SqliteRepository::<BlogPost>::try_new(conn.clone(), Arc::new(SystemClock)).unwrap();
    conn.lock()
        .unwrap()
        .execute_batch(
            "PRAGMA ignore_check_constraints = ON;
             INSERT INTO blog_posts (title, content, created_at, updated_at)
             VALUES ('bad', '', 200, 100);",
        )
        .unwrap();

    let err = posts.get(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn concurrent_creates_through_shared_connection_get_distinct_ids() {
    let conn = shared(open_db_in_memory().unwrap());
    let posts = Arc::new(
        SqliteRepository::<BlogPost>::try_new(conn, Arc::new(SystemClock)).unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let posts = Arc::clone(&posts);
            thread::spawn(move || {
                (0..10)
                    .map(|n| {
                        posts
                            .create(BlogPostDraft::new(format!("{worker}-{n}"), ""))
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<i64> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids, (1..=40).collect::<Vec<_>>());
}
