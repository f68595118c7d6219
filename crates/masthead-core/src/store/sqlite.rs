//! SQLite-backed document store.
//!
//! Translates a [`QueryPlan`] into SQL at a single boundary. Identifier
//! lists are expanded into `?` placeholder lists and bound through
//! rusqlite's parameter path; no configuration-supplied value is ever
//! concatenated into query text. Blocking rusqlite work runs on the tokio
//! blocking pool with a connection opened per operation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, ToSql};
use tokio::task;

use super::DocumentStore;
use crate::{
    error::{ListingError, Result, StoreResultExt},
    models::{CategoryRef, ImageRef, PostAuthor, PostId, PostSummary},
    plan::{Predicate, QueryPlan, SortOrder},
};

const POST_COLUMNS: &str = "p.id, p.title, p.slug, p.excerpt, p.published_at, p.created_at, \
     p.featured_image_url, p.featured_image_alt, a.id, a.name, a.image_url";

const UPSERT_AUTHOR_SQL: &str = "INSERT INTO authors (id, name, image_url) VALUES (?1, ?2, ?3) \
     ON CONFLICT(id) DO UPDATE SET name = ?2, image_url = ?3";

const UPSERT_CATEGORY_SQL: &str = "INSERT INTO categories (id, title) VALUES (?1, ?2) \
     ON CONFLICT(id) DO UPDATE SET title = ?2";

const UPSERT_POST_SQL: &str = "INSERT OR REPLACE INTO posts \
     (id, title, slug, excerpt, published_at, created_at, featured_image_url, featured_image_alt, author_id) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const DELETE_POST_CATEGORIES_SQL: &str = "DELETE FROM post_categories WHERE post_id = ?1";

const INSERT_POST_CATEGORY_SQL: &str =
    "INSERT INTO post_categories (post_id, category_id, position) VALUES (?1, ?2, ?3)";

/// Async facade over a SQLite post collection.
///
/// Cheap to clone conceptually: the store holds only the database path and
/// opens a connection per operation, so one store value can back several
/// concurrent listing sessions.
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Start building a store.
    pub fn builder() -> SqliteStoreBuilder {
        SqliteStoreBuilder::new()
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Upsert post documents (with their authors and categories) into the
    /// store. Returns the number of posts written.
    ///
    /// This is local-store tooling for seeding and fixtures; the listing
    /// engine itself only ever reads through [`DocumentStore`].
    pub async fn import_posts(&self, posts: Vec<PostSummary>) -> Result<usize> {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = StoreDb::open(&db_path)?;
            db.import_posts(&posts)
        })
        .await
        .map_err(join_error)?
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn fetch_page(&self, plan: &QueryPlan) -> Result<Vec<PostSummary>> {
        let db_path = self.db_path.clone();
        let plan = plan.clone();
        task::spawn_blocking(move || {
            let db = StoreDb::open(&db_path)?;
            db.query_page(&plan)
        })
        .await
        .map_err(join_error)?
    }

    async fn count_matching(&self, predicate: &Predicate) -> Result<u64> {
        let db_path = self.db_path.clone();
        let predicate = predicate.clone();
        task::spawn_blocking(move || {
            let db = StoreDb::open(&db_path)?;
            db.count_matching(&predicate)
        })
        .await
        .map_err(join_error)?
    }
}

fn join_error(e: task::JoinError) -> ListingError {
    ListingError::Configuration {
        message: format!("Task join error: {e}"),
    }
}

/// Builder for creating and configuring [`SqliteStore`] instances.
#[derive(Debug, Clone, Default)]
pub struct SqliteStoreBuilder {
    database_path: Option<PathBuf>,
}

impl SqliteStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/masthead/masthead.db` or
    /// `~/.local/share/masthead/masthead.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured store, creating the database file and schema
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns `ListingError::FileSystem` if the database path is invalid
    /// and `ListingError::Database` if schema initialization fails.
    pub async fn build(self) -> Result<SqliteStore> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ListingError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = StoreDb::open(&db_path_clone)?;
            Ok::<(), ListingError>(())
        })
        .await
        .map_err(join_error)??;

        Ok(SqliteStore::new(db_path))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("masthead")
            .place_data_file("masthead.db")
            .map_err(|e| ListingError::XdgDirectory(e.to_string()))
    }
}

/// Synchronous connection wrapper; all SQL lives here.
struct StoreDb {
    connection: Connection,
}

impl StoreDb {
    /// Opens a connection and initializes the schema.
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            Connection::open(path).store_context("Failed to open store connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .store_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .store_context("Failed to initialize store schema")?;

        Ok(())
    }

    /// Fetch one windowed page of posts for `plan`.
    fn query_page(&self, plan: &QueryPlan) -> Result<Vec<PostSummary>> {
        let (where_clause, mut params_vec) = predicate_clause(&plan.predicate);

        let mut query = format!("SELECT {POST_COLUMNS} FROM posts p LEFT JOIN authors a ON a.id = p.author_id");
        if !where_clause.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&where_clause);
        }
        query.push(' ');
        query.push_str(order_clause(plan.ordering));

        if let Some(window) = plan.window {
            query.push_str(" LIMIT ? OFFSET ?");
            params_vec.push(Box::new(i64::from(window.limit)));
            params_vec.push(Box::new(window.offset as i64));
        }

        let mut stmt = self
            .connection
            .prepare(&query)
            .store_context("Failed to prepare page query")?;

        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|b| &**b).collect();

        let mut posts: Vec<PostSummary> = stmt
            .query_map(&params_refs[..], post_from_row)
            .store_context("Failed to query posts")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .store_context("Failed to fetch posts")?;

        self.attach_categories(&mut posts)?;

        Ok(posts)
    }

    /// Count every post matching `predicate`, ignoring windows.
    fn count_matching(&self, predicate: &Predicate) -> Result<u64> {
        let (where_clause, params_vec) = predicate_clause(predicate);

        let mut query = "SELECT COUNT(*) FROM posts p".to_string();
        if !where_clause.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&where_clause);
        }

        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|b| &**b).collect();

        let count: i64 = self
            .connection
            .query_row(&query, &params_refs[..], |row| row.get(0))
            .store_context("Failed to count posts")?;

        Ok(count.max(0) as u64)
    }

    /// Load category rows for the fetched page in one batch and attach them
    /// in stored position order.
    fn attach_categories(&self, posts: &mut [PostSummary]) -> Result<()> {
        if posts.is_empty() {
            return Ok(());
        }

        let query = format!(
            "SELECT pc.post_id, c.id, c.title FROM post_categories pc \
             JOIN categories c ON c.id = pc.category_id \
             WHERE pc.post_id IN ({}) ORDER BY pc.post_id, pc.position",
            placeholders(posts.len())
        );

        let params_vec: Vec<Box<dyn ToSql>> = posts
            .iter()
            .map(|p| Box::new(p.id.as_str().to_string()) as Box<dyn ToSql>)
            .collect();
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|b| &**b).collect();

        let mut stmt = self
            .connection
            .prepare(&query)
            .store_context("Failed to prepare category query")?;

        let rows: Vec<(String, CategoryRef)> = stmt
            .query_map(&params_refs[..], |row| {
                let post_id: String = row.get(0)?;
                let category = CategoryRef {
                    id: PostId::from(row.get::<_, String>(1)?),
                    title: row.get(2)?,
                };
                Ok((post_id, category))
            })
            .store_context("Failed to query categories")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .store_context("Failed to fetch categories")?;

        let mut by_post: HashMap<String, Vec<CategoryRef>> = HashMap::new();
        for (post_id, category) in rows {
            by_post.entry(post_id).or_default().push(category);
        }

        for post in posts {
            if let Some(categories) = by_post.remove(post.id.as_str()) {
                post.categories = categories;
            }
        }

        Ok(())
    }

    /// Upsert posts with their authors and categories inside one
    /// transaction.
    fn import_posts(&mut self, posts: &[PostSummary]) -> Result<usize> {
        let tx = self
            .connection
            .transaction()
            .store_context("Failed to begin transaction")?;

        for post in posts {
            let author_id = match &post.author {
                Some(author) => {
                    tx.execute(
                        UPSERT_AUTHOR_SQL,
                        params![
                            author.id.as_str(),
                            author.name,
                            author.image.as_ref().map(|i| i.url.as_str())
                        ],
                    )
                    .store_context("Failed to upsert author")?;
                    Some(author.id.as_str())
                }
                None => None,
            };

            tx.execute(
                UPSERT_POST_SQL,
                params![
                    post.id.as_str(),
                    post.title,
                    post.slug,
                    post.excerpt,
                    post.published_at.map(|t| t.to_string()),
                    post.created_at.to_string(),
                    post.featured_image.as_ref().map(|i| i.url.as_str()),
                    post.featured_image.as_ref().and_then(|i| i.alt.as_deref()),
                    author_id,
                ],
            )
            .store_context("Failed to upsert post")?;

            tx.execute(DELETE_POST_CATEGORIES_SQL, params![post.id.as_str()])
                .store_context("Failed to clear post categories")?;

            for (position, category) in post.categories.iter().enumerate() {
                tx.execute(
                    UPSERT_CATEGORY_SQL,
                    params![category.id.as_str(), category.title],
                )
                .store_context("Failed to upsert category")?;
                tx.execute(
                    INSERT_POST_CATEGORY_SQL,
                    params![post.id.as_str(), category.id.as_str(), position as i64],
                )
                .store_context("Failed to link post category")?;
            }
        }

        tx.commit().store_context("Failed to commit transaction")?;

        Ok(posts.len())
    }
}

/// WHERE fragment plus bound values for a predicate. [`Predicate::MatchAll`]
/// yields an empty fragment.
fn predicate_clause(predicate: &Predicate) -> (String, Vec<Box<dyn ToSql>>) {
    match predicate {
        Predicate::MatchAll => (String::new(), Vec::new()),
        Predicate::IdIn(ids) => (
            format!("p.id IN ({})", placeholders(ids.len())),
            bind_ids(ids),
        ),
        Predicate::AuthorIn(ids) => (
            format!("p.author_id IN ({})", placeholders(ids.len())),
            bind_ids(ids),
        ),
        Predicate::CategoryIn(ids) => (
            format!(
                "EXISTS (SELECT 1 FROM post_categories pc \
                 WHERE pc.post_id = p.id AND pc.category_id IN ({}))",
                placeholders(ids.len())
            ),
            bind_ids(ids),
        ),
    }
}

fn bind_ids(ids: &[PostId]) -> Vec<Box<dyn ToSql>> {
    ids.iter()
        .map(|id| Box::new(id.as_str().to_string()) as Box<dyn ToSql>)
        .collect()
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn order_clause(ordering: SortOrder) -> &'static str {
    match ordering {
        SortOrder::PublishedDesc => {
            "ORDER BY COALESCE(p.published_at, p.created_at) DESC, p.id ASC"
        }
        SortOrder::PublishedAsc => "ORDER BY COALESCE(p.published_at, p.created_at) ASC, p.id ASC",
        SortOrder::TitleAsc => "ORDER BY p.title ASC, p.id ASC",
        SortOrder::TitleDesc => "ORDER BY p.title DESC, p.id ASC",
    }
}

fn post_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<PostSummary, rusqlite::Error> {
    let featured_image = row
        .get::<_, Option<String>>(6)?
        .map(|url| -> std::result::Result<ImageRef, rusqlite::Error> {
            Ok(ImageRef {
                url,
                alt: row.get(7)?,
            })
        })
        .transpose()?;

    let author = row
        .get::<_, Option<String>>(8)?
        .map(|id| -> std::result::Result<PostAuthor, rusqlite::Error> {
            let image = row.get::<_, Option<String>>(10)?.map(|url| ImageRef {
                url,
                alt: None,
            });
            Ok(PostAuthor {
                id: PostId::from(id),
                name: row.get(9)?,
                image,
            })
        })
        .transpose()?;

    Ok(PostSummary {
        id: PostId::from(row.get::<_, String>(0)?),
        title: row.get(1)?,
        slug: row.get(2)?,
        featured_image,
        excerpt: row.get(3)?,
        published_at: row
            .get::<_, Option<String>>(4)?
            .map(|s| parse_timestamp(4, &s))
            .transpose()?,
        created_at: {
            let s: String = row.get(5)?;
            parse_timestamp(5, &s)?
        },
        author,
        categories: Vec::new(),
    })
}

fn parse_timestamp(column: usize, value: &str) -> std::result::Result<Timestamp, rusqlite::Error> {
    value.parse::<Timestamp>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
    })
}
