//! Persisted learning paths: storage backends, usage actions and the HTTP handlers.

pub mod handlers;
pub mod memory;
pub mod notifier;
pub mod postgres;
pub mod store;
