//! Core trait abstractions.
//!
//! The engine consumes injected capabilities, never concrete
//! dependencies: a [`store::StrategyStore`] for persistence, a
//! [`page::PageSession`] to run scripts against a live page, and a
//! [`generator::ScriptGenerator`] to produce new scripts when the
//! stored ones stop working.

pub mod generator;
pub mod page;
pub mod store;
