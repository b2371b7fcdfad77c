// Library root: re-exports all modules so the simulator binary and the
// integration tests can reach the public API.

pub mod app;
pub mod card;
pub mod config;
pub mod deck;
pub mod draft;
pub mod notify;
pub mod oracle;
pub mod protocol;
