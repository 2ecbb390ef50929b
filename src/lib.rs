pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod identity;
pub mod models;
pub mod persistence;
pub mod roster;
pub mod session;

pub use db::Database;
pub use error::{Result, RosterError};
pub use roster::Roster;
pub use session::Session;
