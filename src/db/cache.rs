use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::params;

use super::Database;
use crate::roster::RosterDocument;

/// Last roster written locally for a tenant
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRoster {
    pub document: RosterDocument,
    pub saved_at: DateTime<Utc>,
    pub saved_by: Option<String>,
}

impl Database {
    /// Replace the cached copy for `tenant_id`
    pub fn save_cached_roster(
        &self,
        tenant_id: &str,
        document: &RosterDocument,
        saved_by: Option<&str>,
    ) -> Result<()> {
        let body = serde_json::to_string(document)?;
        self.conn.execute(
            r#"INSERT INTO roster_cache (tenant_id, document, saved_at, saved_by)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(tenant_id) DO UPDATE SET
                   document = excluded.document,
                   saved_at = excluded.saved_at,
                   saved_by = excluded.saved_by"#,
            params![tenant_id, body, Utc::now().to_rfc3339(), saved_by],
        )?;
        Ok(())
    }

    pub fn load_cached_roster(&self, tenant_id: &str) -> Result<Option<CachedRoster>> {
        let mut stmt = self
            .conn
            .prepare("SELECT document, saved_at, saved_by FROM roster_cache WHERE tenant_id = ?")?;

        let result = stmt.query_row([tenant_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        });

        let (body, saved_at, saved_by) = match result {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let document: RosterDocument =
            serde_json::from_str(&body).context("Cached roster is not valid JSON")?;
        let saved_at = DateTime::parse_from_rfc3339(&saved_at)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Some(CachedRoster {
            document,
            saved_at,
            saved_by,
        }))
    }
}
