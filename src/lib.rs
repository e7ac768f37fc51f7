//! SQLite-backed personal finance ledger: statement import with
//! deduplication, transaction splitting with a balance-preserving archive,
//! audited edits, and tagging.
//!
//! The binary wires these modules to a CLI; embedding callers can use the
//! library directly, e.g. to register [`importer::AccountSync`]
//! collaborators for api-sourced accounts.

pub mod cli;
pub mod db;
pub mod editor;
pub mod error;
pub mod fmt;
pub mod importer;
pub mod models;
pub mod query;
pub mod settings;
pub mod splitter;
pub mod tagger;
