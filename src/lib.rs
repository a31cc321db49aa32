//! minirdb - a small single-user relational database
//!
//! This crate provides:
//! - SQL parsing for CREATE TABLE, INSERT, SELECT, UPDATE and DELETE
//! - Schema, type and constraint checks against an in-memory model
//! - Single-condition WHERE clauses, including LIKE patterns
//! - Whole-database JSON persistence after every successful change
//! - An interactive shell (`shell`) driven by the `minirdb` binary

pub mod config;
pub mod error;
pub mod shell;
pub mod sql;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use sql::engine::Database;
pub use sql::executor::ResultSet;
