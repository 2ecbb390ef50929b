//! Remote persistence of whole rosters, keyed by tenant.
//!
//! Saves overwrite whatever the server holds (last write wins). There is no
//! merge or version check.

use crate::error::Result;
use crate::roster::RosterDocument;

mod http;

pub use http::HttpStore;

pub trait RemoteStore {
    /// Fetch the stored roster. `Ok(None)` when nothing is stored yet.
    fn load(&self, tenant_id: &str) -> Result<Option<RosterDocument>>;

    fn save(&self, tenant_id: &str, document: &RosterDocument) -> Result<()>;
}
