// Interview orchestration: plan building, question generation with a static
// fallback, answer scoring and the per-session state machine.
// Storage goes through the traits in `crate::store`; nothing here talks to
// Postgres directly.

pub mod cache;
pub mod engine;
pub mod fallback;
pub mod handlers;
pub mod plan;
pub mod questions;
pub mod scoring;
pub mod summary;
