//! abbr-settings: settings schema, validation and merge engine for the
//! markup abbreviation expander
//!
//! The expansion engine itself (abbreviation grammar, scope matching,
//! tag-context scanning) lives elsewhere; this crate owns the option
//! schema, resolves user and workspace overrides against the shipped
//! defaults, and hands the engine an immutable, typed settings snapshot.

pub mod cli;
pub mod domain;
pub mod loader;
pub mod schema;
pub mod store;
