//! Relational agent store
//!
//! Backed by a pooled SQLite connection. Rows are decoded column by column
//! by name, so a reordered table never shifts values between fields.

use agency_core::{parse_id, AgencyError, Agent, AgentId, AgentStore, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{error, info, instrument};

/// Default maximum connections in the pool
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Table definition for agent records
pub const AGENTS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS agents (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        gender TEXT NOT NULL,
        speed INTEGER NOT NULL,
        strength INTEGER NOT NULL,
        busy BOOLEAN NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );
"#;

const SELECT_ALL_AGENTS: &str = "SELECT id, name, age, gender, speed, strength, busy, created_at, updated_at \
     FROM agents ORDER BY id";

const SELECT_AGENT_BY_ID: &str = "SELECT id, name, age, gender, speed, strength, busy, created_at, updated_at \
     FROM agents WHERE id = ?";

/// Connection settings for [`SqlAgentStore`]
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// sqlx connection URL, e.g. `sqlite:agency.db?mode=rwc`
    pub url: String,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:agency.db?mode=rwc".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Agent store over a SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqlAgentStore {
    pool: SqlitePool,
}

impl SqlAgentStore {
    /// Wraps an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool with the given configuration
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(storage_error)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        info!("Connected to agent store at {}", config.url);
        Ok(Self { pool })
    }

    /// Single-connection in-memory database with the schema applied
    pub async fn in_memory() -> Result<Self> {
        // An in-memory database lives only as long as its one connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(storage_error)?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Creates the agents table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(AGENTS_SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Agent store closed");
    }
}

#[async_trait]
impl AgentStore for SqlAgentStore {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Agent>> {
        let rows = sqlx::query(SELECT_ALL_AGENTS)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(decode_agent).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Agent> {
        // SQLite would coerce tokens like "1.0" onto row 1; only canonical ids reach it.
        let Some(key) = parse_id(id) else {
            return Err(AgencyError::not_found(id));
        };

        let row = sqlx::query(SELECT_AGENT_BY_ID)
            .bind(to_column("id", key)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(row) => decode_agent(&row),
            None => Err(AgencyError::not_found(id)),
        }
    }

    #[instrument(skip(self, agent), fields(name = %agent.name))]
    async fn insert(&self, agent: &Agent) -> Result<AgentId> {
        let result = sqlx::query(
            r#"
            INSERT INTO agents (name, age, gender, speed, strength, busy, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&agent.name)
        .bind(i64::from(agent.age))
        .bind(&agent.gender)
        .bind(i64::from(agent.speed))
        .bind(i64::from(agent.strength))
        .bind(agent.busy)
        .bind(to_column("created_at", agent.created_at)?)
        .bind(to_column("updated_at", agent.updated_at)?)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        let id = result.last_insert_rowid();
        AgentId::try_from(id)
            .map_err(|_| AgencyError::storage(format!("backend assigned invalid id {id}")))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

/// Decodes one `agents` row by column name
fn decode_agent(row: &SqliteRow) -> Result<Agent> {
    Ok(Agent {
        id: unsigned(row, "id")?,
        name: row.try_get("name").map_err(storage_error)?,
        age: unsigned(row, "age")?,
        gender: row.try_get("gender").map_err(storage_error)?,
        speed: unsigned(row, "speed")?,
        strength: unsigned(row, "strength")?,
        busy: row.try_get("busy").map_err(storage_error)?,
        created_at: unsigned(row, "created_at")?,
        updated_at: unsigned(row, "updated_at")?,
    })
}

/// Reads an integer column and narrows it into `T`, rejecting out-of-range values
fn unsigned<T: TryFrom<i64>>(row: &SqliteRow, column: &str) -> Result<T> {
    let value: i64 = row.try_get(column).map_err(storage_error)?;
    T::try_from(value)
        .map_err(|_| AgencyError::storage(format!("column {column} holds out-of-range value {value}")))
}

fn to_column(column: &str, value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| AgencyError::storage(format!("{column} value {value} does not fit the column")))
}

fn storage_error(err: sqlx::Error) -> AgencyError {
    error!("Agent store error: {}", err);
    AgencyError::storage(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_core::{new_agent_at, SeededSource};

    async fn store() -> SqlAgentStore {
        SqlAgentStore::in_memory()
            .await
            .expect("Failed to create in-memory store")
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = store().await;
        let source = SeededSource::new(1);

        let first = store
            .insert(&new_agent_at("Shadow", "female", &source, 100))
            .await
            .unwrap();
        let second = store
            .insert(&new_agent_at("Viper", "male", &source, 100))
            .await
            .unwrap();

        assert!(first > 0);
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_find_by_id_round_trips_every_field() {
        let store = store().await;
        let agent = new_agent_at("Shadow", "female", &SeededSource::new(9), 1_700_000_000);

        let id = store.insert(&agent).await.unwrap();
        let found = store.find_by_id(&id.to_string()).await.unwrap();

        assert_eq!(found, agent.with_id(id));
    }

    #[tokio::test]
    async fn test_find_missing_agent_is_not_found() {
        let store = store().await;

        let err = store.find_by_id("999").await.unwrap_err();
        assert!(matches!(err, AgencyError::AgentNotFound { .. }));

        let err = store.find_by_id("not-a-number").await.unwrap_err();
        assert!(matches!(err, AgencyError::AgentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_id_is_bound_not_interpolated() {
        let store = store().await;
        store
            .insert(&new_agent_at("Shadow", "female", &SeededSource::new(2), 0))
            .await
            .unwrap();

        let err = store.find_by_id("1 OR 1=1").await.unwrap_err();
        assert!(matches!(err, AgencyError::AgentNotFound { .. }));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_returns_each_record_once() {
        let store = store().await;
        assert!(store.list_all().await.unwrap().is_empty());

        let source = SeededSource::new(3);
        let mut ids = Vec::new();
        for name in ["Shadow", "Viper", "Raven"] {
            ids.push(
                store
                    .insert(&new_agent_at(name, "female", &source, 5))
                    .await
                    .unwrap(),
            );
        }

        let listed: Vec<AgentId> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_decode_is_independent_of_column_order() {
        let store = store().await;
        sqlx::query("DROP TABLE agents")
            .execute(store.pool())
            .await
            .unwrap();
        sqlx::query(
            r#"
            CREATE TABLE agents (
                updated_at INTEGER NOT NULL,
                busy BOOLEAN NOT NULL DEFAULT 0,
                strength INTEGER NOT NULL,
                gender TEXT NOT NULL,
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                speed INTEGER NOT NULL,
                name TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                age INTEGER NOT NULL
            )
            "#,
        )
        .execute(store.pool())
        .await
        .unwrap();

        let agent = new_agent_at("Shadow", "female", &SeededSource::new(4), 77);
        let id = store.insert(&agent).await.unwrap();

        assert_eq!(store.find_by_id(&id.to_string()).await.unwrap(), agent.with_id(id));
    }

    #[tokio::test]
    async fn test_out_of_range_column_is_storage_error() {
        let store = store().await;
        sqlx::query(
            "INSERT INTO agents (name, age, gender, speed, strength, busy, created_at, updated_at)
             VALUES ('Broken', 70000, 'male', 1, 1, 0, 1, 1)",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, AgencyError::Storage { .. }));
        assert!(err.to_string().contains("age"));
    }

    #[tokio::test]
    async fn test_missing_table_is_storage_error() {
        let store = store().await;
        sqlx::query("DROP TABLE agents")
            .execute(store.pool())
            .await
            .unwrap();

        assert!(matches!(
            store.list_all().await.unwrap_err(),
            AgencyError::Storage { .. }
        ));
        assert!(matches!(
            store.find_by_id("1").await.unwrap_err(),
            AgencyError::Storage { .. }
        ));
    }

    #[tokio::test]
    async fn test_ping_succeeds_on_open_pool() {
        let store = store().await;
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_store_reports_storage_errors() {
        let store = store().await;
        let handle = store.clone();

        store.close().await;

        assert!(handle.pool().is_closed());
        assert!(matches!(
            handle.ping().await.unwrap_err(),
            AgencyError::Storage { .. }
        ));
    }

    #[tokio::test]
    async fn test_non_canonical_ids_do_not_match_rows() {
        let store = store().await;
        let agent = new_agent_at("Shadow", "female", &SeededSource::new(5), 0);
        let id = store.insert(&agent).await.unwrap();
        assert_eq!(id, 1);

        for token in ["1.0", " 1", "1 ", "+1", "01", "1e0"] {
            let err = store.find_by_id(token).await.unwrap_err();
            assert!(
                matches!(err, AgencyError::AgentNotFound { .. }),
                "token {token:?}: {err}"
            );
        }
        assert_eq!(store.find_by_id("1").await.unwrap(), agent.with_id(1));
    }
}
