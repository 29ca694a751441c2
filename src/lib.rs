//! Runnel: stream queries for relational data.
//!
//! Build a pipeline of typed predicates and operations over an entity table,
//! and Runnel translates the leading portion into dialect specific SQL,
//! streams the result set and applies the remainder in process. Writes go
//! through a per table persistence provider that propagates generated keys
//! back into the persisted entities.
//!
//! This crate re-exports everything from `runnel-core`; dialect plug-ins
//! (such as `runnel-sqlite`) are separate crates.

pub use runnel_core::*;
