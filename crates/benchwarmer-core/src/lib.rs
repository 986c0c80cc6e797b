// Library root: re-exports all modules so integration tests and the CLI
// driver can access the crate's public API.

pub mod config;
pub mod espn;
pub mod export;
pub mod lineup;
pub mod roster;
pub mod season;
