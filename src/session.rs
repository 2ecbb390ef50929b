//! One editing session: owns the roster for the lifetime of a command,
//! applies role checks, and writes every change through to storage.
//!
//! Writes go to the local cache first, then to the remote store when one is
//! configured. A failed write is reported back but never rolls back the
//! in-memory change.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::error::{Result, RosterError};
use crate::identity::Identity;
use crate::persistence::RemoteStore;
use crate::roster::{Roster, RosterDocument};

/// Where the roster came from when the session opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    /// Remote unavailable (or not configured); local copy used
    Cache {
        saved_at: DateTime<Utc>,
        saved_by: Option<String>,
    },
    /// Nothing stored anywhere, or every source failed
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSave {
    Saved,
    /// No remote store configured
    Skipped,
    Failed(RosterError),
}

/// Outcome of a write-through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub cache_error: Option<String>,
    pub remote: RemoteSave,
}

impl SaveReport {
    /// Message for the user when something did not persist
    pub fn warning(&self) -> Option<String> {
        match (&self.remote, &self.cache_error) {
            (RemoteSave::Failed(e), _) => Some(format!(
                "Save failed ({}). Changes are kept locally; run `push` to retry.",
                e
            )),
            (_, Some(e)) => Some(format!("Could not update local cache: {}", e)),
            _ => None,
        }
    }
}

pub struct Session<'a> {
    roster: Roster,
    identity: Box<dyn Identity + 'a>,
    remote: Option<Box<dyn RemoteStore + 'a>>,
    cache: &'a Database,
    source: LoadSource,
    load_error: Option<RosterError>,
}

impl<'a> Session<'a> {
    /// Open a session, loading the roster from the remote store, falling
    /// back to the local cache, then to an empty roster.
    pub fn open(
        identity: Box<dyn Identity + 'a>,
        remote: Option<Box<dyn RemoteStore + 'a>>,
        cache: &'a Database,
    ) -> Self {
        let mut session = Self {
            roster: Roster::new(),
            identity,
            remote,
            cache,
            source: LoadSource::Empty,
            load_error: None,
        };
        session.initial_load();
        session
    }

    fn initial_load(&mut self) {
        let tenant = self.identity.tenant_id().to_string();

        if let Some(remote) = self.remote.as_ref() {
            match remote.load(&tenant) {
                Ok(Some(doc)) => {
                    info!(%tenant, "roster loaded from remote");
                    self.cache_document(&doc);
                    self.roster = Roster::from_document(doc);
                    self.source = LoadSource::Remote;
                    return;
                }
                Ok(None) => {
                    info!(%tenant, "no roster stored remotely, starting empty");
                    return;
                }
                Err(e) => {
                    warn!(%tenant, error = %e, "remote load failed, trying local cache");
                    self.load_error = Some(e);
                }
            }
        }

        match self.cache.load_cached_roster(&tenant) {
            Ok(Some(cached)) => {
                debug!(%tenant, saved_at = %cached.saved_at, "roster loaded from cache");
                self.roster = Roster::from_document(cached.document);
                self.source = LoadSource::Cache {
                    saved_at: cached.saved_at,
                    saved_by: cached.saved_by,
                };
            }
            Ok(None) => {
                debug!(%tenant, "no cached roster");
            }
            Err(e) => {
                warn!(%tenant, error = %e, "cache load failed, starting empty");
            }
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn identity(&self) -> &dyn Identity {
        self.identity.as_ref()
    }

    pub fn source(&self) -> &LoadSource {
        &self.source
    }

    /// Remote failure seen while opening, if the session fell back
    pub fn load_error(&self) -> Option<&RosterError> {
        self.load_error.as_ref()
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Apply an infallible change, then write through
    pub fn mutate<T, F>(&mut self, action: &str, f: F) -> Result<(T, SaveReport)>
    where
        F: FnOnce(&mut Roster) -> T,
    {
        self.try_mutate(action, |roster| Ok(f(roster)))
    }

    /// Apply a change that may be refused. A refused change is not saved.
    pub fn try_mutate<T, F>(&mut self, action: &str, f: F) -> Result<(T, SaveReport)>
    where
        F: FnOnce(&mut Roster) -> Result<T>,
    {
        self.identity.require_admin(action)?;
        let out = f(&mut self.roster)?;
        let report = self.persist();
        Ok((out, report))
    }

    /// Write the current roster again, e.g. after a failed save
    pub fn save(&mut self) -> Result<SaveReport> {
        self.identity.require_admin("save the roster")?;
        Ok(self.persist())
    }

    /// Swap in a whole roster (project import), then write through
    pub fn replace(&mut self, roster: Roster) -> Result<SaveReport> {
        self.identity.require_admin("replace the roster")?;
        self.roster = roster;
        Ok(self.persist())
    }

    /// Fetch the remote copy again, discarding in-memory state. On any
    /// failure the current roster is kept.
    pub fn reload(&mut self) -> Result<()> {
        let tenant = self.identity.tenant_id().to_string();
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| RosterError::validation("No remote store configured"))?;

        match remote.load(&tenant)? {
            Some(doc) => {
                self.cache_document(&doc);
                self.roster = Roster::from_document(doc);
                self.source = LoadSource::Remote;
                self.load_error = None;
                Ok(())
            }
            None => Err(RosterError::NotFound(format!("no roster stored for {}", tenant))),
        }
    }

    fn document(&self) -> RosterDocument {
        let mut doc = self.roster.to_document();
        doc.updated_by = self.identity.user().map(str::to_string);
        doc.updated_at = Some(Utc::now().to_rfc3339());
        doc
    }

    fn cache_document(&self, doc: &RosterDocument) -> Option<String> {
        let tenant = self.identity.tenant_id();
        match self.cache.save_cached_roster(tenant, doc, self.identity.user()) {
            Ok(()) => None,
            Err(e) => {
                warn!(%tenant, error = %e, "cache write failed");
                Some(e.to_string())
            }
        }
    }

    fn persist(&self) -> SaveReport {
        let doc = self.document();
        let cache_error = self.cache_document(&doc);

        let remote = match self.remote.as_ref() {
            None => RemoteSave::Skipped,
            Some(remote) => match remote.save(self.identity.tenant_id(), &doc) {
                Ok(()) => {
                    debug!(tenant = %self.identity.tenant_id(), "roster saved to remote");
                    RemoteSave::Saved
                }
                Err(e) => {
                    warn!(tenant = %self.identity.tenant_id(), error = %e, "remote save failed");
                    RemoteSave::Failed(e)
                }
            },
        };

        SaveReport { cache_error, remote }
    }
}
