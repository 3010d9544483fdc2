//! # VibeSQL
//!
//! An in-memory SQL execution engine for teaching relational queries: a
//! tokenizer, recursive-descent parser, semantic validator and executor for
//! a deliberately small SQL dialect — `SELECT` (with `DISTINCT`, a single
//! `INNER JOIN`, `WHERE`, `GROUP BY`, `ORDER BY`, `LIMIT`, and the five
//! aggregates), plus `CREATE TABLE`/`ALTER TABLE ADD COLUMN`/`DROP TABLE`
//! and `INSERT`/`UPDATE`/`DELETE`.
//!
//! ## Quick Start
//!
//! ```rust
//! use vibesql::catalog::Catalog;
//! use vibesql::engine;
//!
//! let mut catalog = Catalog::seeded();
//! let output = engine::execute("SELECT forename FROM students WHERE student_id = 1", &mut catalog)
//!     .expect("valid statement");
//! assert_eq!(output.rows.len(), 1);
//! ```
//!
//! ## Scope
//!
//! There is exactly one backend (an in-process table store) and no query
//! planner: the executor runs the fixed pipeline join → filter → group →
//! project → distinct → order → limit in that order, every time. See
//! `DESIGN.md` for what this engine deliberately does not do.

pub mod ast;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod types;
pub mod validator;

pub use ast::*;
pub use catalog::{Catalog, CatalogBuilder, ColumnDef, TableSchema, TableSchemaBuilder};
pub use engine::{execute, execute_with_options, EngineOptions};
pub use error::{Error, ErrorKind, Result};
pub use executor::{Output, OutputMeta};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use types::{SqlType, Value};
