//! SQL processing module
//!
//! This module provides:
//! - `parser`: SQL lexer and parser
//! - `types`: column types and cell values
//! - `schema`: table and column definitions
//! - `executor`: statement executors and result sets
//! - `engine`: the database handle owning every table

pub mod engine;
pub mod executor;
pub mod parser;
pub mod schema;
pub mod types;
