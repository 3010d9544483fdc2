//! Top-level facade: tokenize → parse → (validate if `SELECT`) → execute.
//!
//! This is the one entry point a host needs; everything else in the crate
//! (`lexer`, `parser`, `validator`, `executor`) is implementation detail it
//! orchestrates.

use crate::ast::StatementKind;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::executor::{self, Output};
use crate::parser::Parser;
use crate::validator;

/// Configuration for [`execute_with_options`]. Currently a single
/// caller-side safety valve; `Default` matches [`execute`]'s behavior.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineOptions {
    /// Caps the number of rows a single `SELECT`'s FROM/JOIN scan may
    /// produce before the executor gives up with an
    /// [`crate::error::ErrorKind::UnsupportedFeature`] error. `None`
    /// (the default) is unbounded — there is no other cancellation
    /// mechanism (spec.md §5).
    pub max_scan_rows: Option<usize>,
}

/// Run one statement of SQL text against the catalog.
///
/// Equivalent to `execute_with_options(text, catalog, EngineOptions::default())`.
pub fn execute(text: &str, catalog: &mut Catalog) -> Result<Output> {
    execute_with_options(text, catalog, EngineOptions::default())
}

/// Run one statement of SQL text against the catalog, honoring `options`.
pub fn execute_with_options(
    text: &str,
    catalog: &mut Catalog,
    options: EngineOptions,
) -> Result<Output> {
    log::trace!("tokenizing statement ({} bytes)", text.len());

    let mut statement = Parser::new(text).parse().map_err(|err| {
        log::debug!("parse failed: {}", err);
        err
    })?;
    log::debug!("parsed statement: {:?}", statement.kind);

    if let StatementKind::Query(query) = &mut statement.kind {
        validator::validate(&mut *query, catalog).map_err(|err| {
            log::debug!("validation failed: {}", err);
            err
        })?;
        if let Some(max_rows) = options.max_scan_rows {
            check_scan_bound(&*query, catalog, max_rows)?;
        }
    }

    executor::execute_statement(&statement.kind, catalog).map_err(|err| {
        log::warn!("execution failed: {}", err);
        err
    })
}

/// Reject a `SELECT` whose FROM×JOIN cross product would exceed
/// `max_rows`, before the executor materializes it.
fn check_scan_bound(
    query: &crate::ast::Query,
    catalog: &Catalog,
    max_rows: usize,
) -> Result<()> {
    let from_rows = catalog.rows_of(&query.from.name).map(|r| r.len()).unwrap_or(0);
    let scan_size = match &query.join {
        Some(join) => {
            let join_rows = catalog.rows_of(&join.table.name).map(|r| r.len()).unwrap_or(0);
            from_rows.saturating_mul(join_rows)
        }
        None => from_rows,
    };
    if scan_size > max_rows {
        return Err(crate::error::Error::unsupported(
            format!("scan of {} rows exceeds max_scan_rows ({})", scan_size, max_rows),
            query.from.span.start,
        ));
    }
    Ok(())
}
