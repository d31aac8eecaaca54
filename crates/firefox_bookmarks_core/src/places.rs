use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::bookmark::BookmarkRecord;

pub const PLACES_DB_FILENAME: &str = "places.sqlite";

/// SQLite sidecar files that may hold committed data not yet checkpointed
/// into the main database file.
const SIDECAR_SUFFIXES: [&str; 2] = ["-wal", "-journal"];

pub const PLACES_QUERY: &str = "SELECT bookmarks.id, bookmarks.parent, places.url, bookmarks.title
     FROM moz_bookmarks AS bookmarks
     LEFT JOIN moz_places AS places ON places.id = bookmarks.fk
     ORDER BY bookmarks.id ASC";

/// Private copy of a `places.sqlite` file.
///
/// Firefox holds a lock on the live database while running, so bookmarks
/// are read from a copy in a temporary directory that is removed on drop.
#[derive(Debug)]
pub struct PlacesSnapshot {
    dir: TempDir,
    db_path: PathBuf,
}

impl PlacesSnapshot {
    pub fn create(source: &Path) -> Result<Self> {
        if !source.is_file() {
            bail!("places database not found: {}", source.display());
        }

        let dir = tempfile::Builder::new()
            .prefix("firefox-bookmarks-")
            .tempdir()
            .context("failed to create snapshot directory")?;
        let db_path = dir.path().join(PLACES_DB_FILENAME);
        copy_file(source, &db_path)?;

        for suffix in SIDECAR_SUFFIXES {
            let sidecar = sidecar_path(source, suffix);
            if sidecar.is_file() {
                copy_file(&sidecar, &sidecar_path(&db_path, suffix))?;
            }
        }

        info!(
            source = %source.display(),
            snapshot = %db_path.display(),
            "copied places database"
        );
        Ok(Self { dir, db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Read every row of `moz_bookmarks` with its place URL, if any.
pub fn fetch_bookmarks(db_path: &Path) -> Result<Vec<BookmarkRecord>> {
    let connection = open_connection(db_path)?;
    debug!(query = %collapse_whitespace(PLACES_QUERY), "bookmarks query");

    let mut statement = connection
        .prepare(PLACES_QUERY)
        .context("failed to prepare bookmarks query")?;
    let rows = statement
        .query_map([], |row| {
            Ok(BookmarkRecord {
                id: row.get(0)?,
                parent: row.get(1)?,
                url: row.get(2)?,
                title: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                folder: String::new(),
            })
        })
        .context("failed to run bookmarks query")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("failed to decode bookmarks row")?);
    }
    info!(count = out.len(), "fetched bookmarks");
    Ok(out)
}

fn open_connection(db_path: &Path) -> Result<Connection> {
    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    connection
        .busy_timeout(Duration::from_secs(5))
        .context("failed to set sqlite busy timeout")?;
    Ok(connection)
}

fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    Ok(())
}

fn sidecar_path(db_path: &Path, suffix: &str) -> PathBuf {
    let mut raw = db_path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::Path;

    use rusqlite::{Connection, params};

    const PLACES_SCHEMA_SQL: &str = r#"
CREATE TABLE moz_places (
    id INTEGER PRIMARY KEY,
    url LONGVARCHAR,
    title LONGVARCHAR
);
CREATE TABLE moz_bookmarks (
    id INTEGER PRIMARY KEY,
    type INTEGER,
    fk INTEGER DEFAULT NULL,
    parent INTEGER,
    position INTEGER,
    title LONGVARCHAR
);
"#;

    /// Minimal Firefox profile: the root, menu and toolbar folders, the
    /// shipped "Mozilla Firefox" folder with two defaults, and one user
    /// bookmark two folders deep under the toolbar.
    pub(crate) fn write_places_db(path: &Path) {
        let connection = Connection::open(path).expect("open fixture db");
        connection
            .execute_batch(PLACES_SCHEMA_SQL)
            .expect("create fixture schema");

        let places = [
            (1, "https://support.mozilla.org/products/firefox"),
            (2, "https://www.mozilla.org/about/"),
            (3, "https://github.com/vaguecoder"),
        ];
        for (id, url) in places {
            connection
                .execute(
                    "INSERT INTO moz_places (id, url) VALUES (?1, ?2)",
                    params![id, url],
                )
                .expect("insert place");
        }

        let bookmarks: [(i64, i64, Option<i64>, Option<&str>); 9] = [
            (1, 0, None, None),
            (2, 1, None, Some("menu")),
            (3, 1, None, Some("toolbar")),
            (7, 2, None, Some("Mozilla Firefox")),
            (8, 7, Some(1), Some("Get Help")),
            (9, 7, Some(2), Some("About Us")),
            (10, 3, None, Some("Profiles")),
            (11, 10, None, Some("GitHub")),
            (12, 11, Some(3), Some("Vague Coder")),
        ];
        for (id, parent, fk, title) in bookmarks {
            connection
                .execute(
                    "INSERT INTO moz_bookmarks (id, type, fk, parent, position, title)
                     VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                    params![id, if fk.is_some() { 1 } else { 2 }, fk, parent, title],
                )
                .expect("insert bookmark");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::fixtures::write_places_db;
    use super::{PlacesSnapshot, fetch_bookmarks, sidecar_path};

    #[test]
    fn fetch_bookmarks_reads_folders_and_leaves() {
        let temp = tempdir().expect("tempdir");
        let db_path = temp.path().join("places.sqlite");
        write_places_db(&db_path);

        let records = fetch_bookmarks(&db_path).expect("fetch");
        assert_eq!(records.len(), 9);

        let root = &records[0];
        assert_eq!(root.id, 1);
        assert_eq!(root.parent, 0);
        assert_eq!(root.title, "");
        assert!(root.url.is_none());

        let leaf = records
            .iter()
            .find(|record| record.id == 12)
            .expect("leaf 12");
        assert_eq!(leaf.url.as_deref(), Some("https://github.com/vaguecoder"));
        assert_eq!(leaf.title, "Vague Coder");
        assert_eq!(leaf.parent, 11);
        assert!(records.iter().all(|record| record.folder.is_empty()));
    }

    #[test]
    fn fetch_bookmarks_fails_without_bookmark_tables() {
        let temp = tempdir().expect("tempdir");
        let db_path = temp.path().join("empty.sqlite");
        rusqlite::Connection::open(&db_path).expect("create empty db");

        let error = fetch_bookmarks(&db_path).expect_err("must fail");
        assert!(error.to_string().contains("failed to prepare bookmarks query"));
    }

    #[test]
    fn snapshot_copies_database_and_sidecars() {
        let temp = tempdir().expect("tempdir");
        let source = temp.path().join("places.sqlite");
        write_places_db(&source);
        fs::write(sidecar_path(&source, "-journal"), b"").expect("write journal");

        let snapshot = PlacesSnapshot::create(&source).expect("snapshot");
        assert_ne!(snapshot.db_path(), source.as_path());
        assert!(snapshot.db_path().is_file());
        assert!(sidecar_path(snapshot.db_path(), "-journal").is_file());
        assert!(!sidecar_path(snapshot.db_path(), "-wal").exists());
        assert_eq!(fetch_bookmarks(snapshot.db_path()).expect("fetch").len(), 9);
    }

    #[test]
    fn snapshot_directory_is_removed_on_drop() {
        let temp = tempdir().expect("tempdir");
        let source = temp.path().join("places.sqlite");
        write_places_db(&source);

        let snapshot = PlacesSnapshot::create(&source).expect("snapshot");
        let dir = snapshot.dir().to_path_buf();
        assert!(dir.is_dir());
        drop(snapshot);
        assert!(!dir.exists());
    }

    #[test]
    fn snapshot_reports_missing_source() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("nope.sqlite");
        let error = PlacesSnapshot::create(&missing).expect_err("must fail");
        assert!(error.to_string().contains("places database not found"));
    }
}
