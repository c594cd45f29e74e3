//! Database Layer with Connection Pooling
//!
//! Pooled SQLite row store exposing exactly the surface the generation
//! pipeline needs: proposal read-by-id and partial updates, client
//! lookup/insert scoped by owner. WAL mode for concurrent reader (the UI
//! poller) + single writer (the orchestrator).

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::types::{
    Client, CreateProposalInput, ForgeError, GenerationMetadata, Proposal, ProposalContent,
    ProposalStatus, Result,
};

/// Shared database handle for async contexts.
pub type SharedDatabase = Arc<Database>;

const SCHEMA: &str = include_str!("schema.sql");

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,
    /// Timeout for acquiring a connection (seconds)
    pub connection_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 8,
            connection_timeout_secs: 30,
        }
    }
}

/// Thread-safe database with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open database with connection pooling at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, PoolConfig::default())
    }

    /// Open database with custom pool configuration.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: PoolConfig) -> Result<Self> {
        let manager =
            SqliteConnectionManager::file(path.as_ref()).with_init(Self::configure_connection);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(std::time::Duration::from_secs(
                config.connection_timeout_secs,
            ))
            .build(manager)
            .map_err(|e| ForgeError::Storage(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init()?;
        Ok(db)
    }

    /// Open an in-memory database for testing or temporary use.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| ForgeError::Storage(format!("Failed to create in-memory pool: {}", e)))?;

        let db = Self { pool };
        db.init()?;
        Ok(db)
    }

    /// Configure a new connection with production-ready settings.
    fn configure_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;
        Ok(())
    }

    /// Get a connection from the pool.
    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            ForgeError::Storage(format!("Failed to acquire database connection: {}", e))
        })
    }

    /// Apply the schema.
    fn init(&self) -> Result<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    // =========================================================================
    // Proposals
    // =========================================================================

    /// Insert a new proposal row in `generating` status. This is the
    /// triggering action's write; the pipeline takes over from here.
    pub fn insert_proposal(&self, owner_id: &str, input: &CreateProposalInput) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        self.conn()?.execute(
            "INSERT INTO proposals
                 (id, owner_id, title, status, client_name, client_email, client_company,
                  created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                id,
                owner_id,
                "Untitled proposal",
                ProposalStatus::Generating.as_str(),
                input.client_name,
                input.client_email,
                input.client_company,
                now,
            ],
        )?;

        Ok(id)
    }

    /// Read a proposal row by id.
    pub fn get_proposal(&self, id: &str) -> Result<Proposal> {
        self.conn()?
            .query_row(
                "SELECT id, owner_id, title, status,
                        executive_summary, understanding, scope_of_work, deliverables,
                        timeline, investment, terms, about_us,
                        client_name, client_email, client_company, client_id,
                        generation_metadata, created_at, updated_at
                 FROM proposals WHERE id = ?1",
                params![id],
                Self::map_proposal,
            )
            .optional()?
            .ok_or_else(|| ForgeError::not_found("proposal", id))
    }

    /// Overwrite the generation metadata blob. No read-before-write merge.
    pub fn update_generation_metadata(
        &self,
        id: &str,
        metadata: &GenerationMetadata,
    ) -> Result<()> {
        let json = serde_json::to_string(metadata)?;
        let changed = self.conn()?.execute(
            "UPDATE proposals SET generation_metadata = ?1, updated_at = ?2 WHERE id = ?3",
            params![json, Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Err(ForgeError::not_found("proposal", id));
        }
        Ok(())
    }

    /// Partial update persisting client linkage, independent of the later
    /// full-content update so linkage survives a failed run.
    pub fn update_proposal_client(
        &self,
        id: &str,
        name: Option<&str>,
        email: Option<&str>,
        company: Option<&str>,
        client_id: &str,
    ) -> Result<()> {
        let changed = self.conn()?.execute(
            "UPDATE proposals
             SET client_name = ?1, client_email = ?2, client_company = ?3,
                 client_id = ?4, updated_at = ?5
             WHERE id = ?6",
            params![name, email, company, client_id, Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Err(ForgeError::not_found("proposal", id));
        }
        Ok(())
    }

    /// Terminal success write: title, status transition to draft, all content
    /// fields, and final metadata in one update.
    pub fn finalize_proposal(
        &self,
        id: &str,
        content: &ProposalContent,
        metadata: &GenerationMetadata,
    ) -> Result<()> {
        let json = serde_json::to_string(metadata)?;
        let changed = self.conn()?.execute(
            "UPDATE proposals
             SET title = ?1, status = ?2,
                 executive_summary = ?3, understanding = ?4, scope_of_work = ?5,
                 deliverables = ?6, timeline = ?7, investment = ?8,
                 terms = ?9, about_us = ?10,
                 generation_metadata = ?11, updated_at = ?12
             WHERE id = ?13",
            params![
                content.title,
                ProposalStatus::Draft.as_str(),
                content.executive_summary,
                content.understanding,
                content.scope_of_work,
                content.deliverables,
                content.timeline,
                content.investment,
                content.terms,
                content.about_us,
                json,
                Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(ForgeError::not_found("proposal", id));
        }
        Ok(())
    }

    /// Terminal failure write: status still lands on draft; the error record
    /// in the metadata is the only failure signal.
    pub fn mark_generation_failed(&self, id: &str, metadata: &GenerationMetadata) -> Result<()> {
        let json = serde_json::to_string(metadata)?;
        let changed = self.conn()?.execute(
            "UPDATE proposals
             SET status = ?1, generation_metadata = ?2, updated_at = ?3
             WHERE id = ?4",
            params![
                ProposalStatus::Draft.as_str(),
                json,
                Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(ForgeError::not_found("proposal", id));
        }
        Ok(())
    }

    // =========================================================================
    // Clients
    // =========================================================================

    /// Exact email match scoped to an owner.
    pub fn find_client_by_email(&self, owner_id: &str, email: &str) -> Result<Option<Client>> {
        Ok(self
            .conn()?
            .query_row(
                "SELECT id, owner_id, name, email, company, proposal_count,
                        created_at, updated_at
                 FROM clients WHERE owner_id = ?1 AND email = ?2",
                params![owner_id, email],
                Self::map_client,
            )
            .optional()?)
    }

    /// Exact company match scoped to an owner.
    pub fn find_client_by_company(&self, owner_id: &str, company: &str) -> Result<Option<Client>> {
        Ok(self
            .conn()?
            .query_row(
                "SELECT id, owner_id, name, email, company, proposal_count,
                        created_at, updated_at
                 FROM clients WHERE owner_id = ?1 AND company = ?2",
                params![owner_id, company],
                Self::map_client,
            )
            .optional()?)
    }

    pub fn insert_client(
        &self,
        owner_id: &str,
        name: &str,
        email: Option<&str>,
        company: Option<&str>,
    ) -> Result<Client> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        self.conn()?.execute(
            "INSERT INTO clients (id, owner_id, name, email, company, proposal_count,
                                  created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
            params![id, owner_id, name, email, company, now.to_rfc3339()],
        )?;

        Ok(Client {
            id,
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            email: email.map(String::from),
            company: company.map(String::from),
            proposal_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_client(&self, id: &str) -> Result<Client> {
        self.conn()?
            .query_row(
                "SELECT id, owner_id, name, email, company, proposal_count,
                        created_at, updated_at
                 FROM clients WHERE id = ?1",
                params![id],
                Self::map_client,
            )
            .optional()?
            .ok_or_else(|| ForgeError::not_found("client", id))
    }

    /// Count proposals referencing a client id.
    pub fn count_proposals_for_client(&self, client_id: &str) -> Result<u64> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM proposals WHERE client_id = ?1",
            params![client_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Write a recomputed proposal count. Deliberately not an atomic
    /// increment: the count-then-write pair can lose updates under concurrent
    /// generations linking the same client.
    pub fn set_client_proposal_count(&self, client_id: &str, count: u64) -> Result<()> {
        let changed = self.conn()?.execute(
            "UPDATE clients SET proposal_count = ?1, updated_at = ?2 WHERE id = ?3",
            params![count as i64, Utc::now().to_rfc3339(), client_id],
        )?;
        if changed == 0 {
            return Err(ForgeError::not_found("client", client_id));
        }
        Ok(())
    }

    // =========================================================================
    // Row Mapping
    // =========================================================================

    fn map_proposal(row: &Row<'_>) -> rusqlite::Result<Proposal> {
        let status_str: String = row.get(3)?;
        let metadata_json: Option<String> = row.get(16)?;
        let created_at: String = row.get(17)?;
        let updated_at: String = row.get(18)?;

        Ok(Proposal {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            title: row.get(2)?,
            status: ProposalStatus::from_str(&status_str)
                .map_err(|e| conversion_error(3, e))?,
            executive_summary: row.get(4)?,
            understanding: row.get(5)?,
            scope_of_work: row.get(6)?,
            deliverables: row.get(7)?,
            timeline: row.get(8)?,
            investment: row.get(9)?,
            terms: row.get(10)?,
            about_us: row.get(11)?,
            client_name: row.get(12)?,
            client_email: row.get(13)?,
            client_company: row.get(14)?,
            client_id: row.get(15)?,
            generation_metadata: metadata_json
                .map(|json| serde_json::from_str(&json).map_err(|e| conversion_error(16, e)))
                .transpose()?,
            created_at: parse_timestamp(&created_at, 17)?,
            updated_at: parse_timestamp(&updated_at, 18)?,
        })
    }

    fn map_client(row: &Row<'_>) -> rusqlite::Result<Client> {
        let proposal_count: i64 = row.get(5)?;
        let created_at: String = row.get(6)?;
        let updated_at: String = row.get(7)?;

        Ok(Client {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            company: row.get(4)?,
            proposal_count: proposal_count.max(0) as u64,
            created_at: parse_timestamp(&created_at, 6)?,
            updated_at: parse_timestamp(&updated_at, 7)?,
        })
    }
}

fn parse_timestamp(value: &str, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn conversion_error(
    idx: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, err.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_input() -> CreateProposalInput {
        CreateProposalInput {
            client_brief: "We need a complete website redesign.".to_string(),
            client_name: Some("Dana".to_string()),
            client_email: Some("dana@example.com".to_string()),
            client_company: None,
            service_type: None,
        }
    }

    #[test]
    fn test_insert_and_get_proposal() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_proposal("owner-1", &test_input()).unwrap();

        let proposal = db.get_proposal(&id).unwrap();
        assert_eq!(proposal.status, ProposalStatus::Generating);
        assert_eq!(proposal.client_email.as_deref(), Some("dana@example.com"));
        assert!(proposal.generation_metadata.is_none());
        assert!(proposal.executive_summary.is_none());
    }

    #[test]
    fn test_get_missing_proposal() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.get_proposal("nope"),
            Err(ForgeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_metadata_overwrite_is_wholesale() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_proposal("owner-1", &test_input()).unwrap();

        let first = GenerationMetadata::in_progress("Analyzing client brief", vec![], 10);
        db.update_generation_metadata(&id, &first).unwrap();

        let second = GenerationMetadata::in_progress(
            "Drafting scope of work",
            vec!["Analyzing client brief".to_string()],
            30,
        );
        db.update_generation_metadata(&id, &second).unwrap();

        let meta = db.get_proposal(&id).unwrap().generation_metadata.unwrap();
        assert_eq!(meta, second);
    }

    #[test]
    fn test_finalize_transitions_to_draft() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_proposal("owner-1", &test_input()).unwrap();

        let content = ProposalContent {
            title: "Website Redesign".to_string(),
            executive_summary: "Summary".to_string(),
            understanding: None,
            scope_of_work: "Scope".to_string(),
            deliverables: "Deliverables".to_string(),
            timeline: "Timeline".to_string(),
            investment: "Investment".to_string(),
            terms: "Terms".to_string(),
            about_us: Some("About".to_string()),
        };
        let metadata = GenerationMetadata::complete(vec!["Finalizing proposal".to_string()]);
        db.finalize_proposal(&id, &content, &metadata).unwrap();

        let proposal = db.get_proposal(&id).unwrap();
        assert_eq!(proposal.status, ProposalStatus::Draft);
        assert_eq!(proposal.title, "Website Redesign");
        assert!(proposal.understanding.is_none());
        assert_eq!(proposal.generation_metadata.unwrap().progress, 100);
    }

    #[test]
    fn test_client_lookup_scoped_by_owner() {
        let db = Database::open_in_memory().unwrap();
        db.insert_client("owner-1", "Dana", Some("dana@example.com"), None)
            .unwrap();

        assert!(
            db.find_client_by_email("owner-1", "dana@example.com")
                .unwrap()
                .is_some()
        );
        assert!(
            db.find_client_by_email("owner-2", "dana@example.com")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_proposal_count_recompute() {
        let db = Database::open_in_memory().unwrap();
        let client = db
            .insert_client("owner-1", "Dana", Some("dana@example.com"), None)
            .unwrap();

        let p1 = db.insert_proposal("owner-1", &test_input()).unwrap();
        let p2 = db.insert_proposal("owner-1", &test_input()).unwrap();
        db.update_proposal_client(&p1, Some("Dana"), None, None, &client.id)
            .unwrap();
        db.update_proposal_client(&p2, Some("Dana"), None, None, &client.id)
            .unwrap();

        let count = db.count_proposals_for_client(&client.id).unwrap();
        assert_eq!(count, 2);
        db.set_client_proposal_count(&client.id, count).unwrap();
        assert_eq!(db.get_client(&client.id).unwrap().proposal_count, 2);
    }
}
