//! # Print Commands
//!
//! `print current`, `print all`, `print json`, `print <file>`.

use std::path::Path;

use super::Reply;
use crate::error::CliError;
use crate::state::Session;

/// Receipt of the open basket, or the last closed one.
pub fn current(session: &mut Session) -> Result<Reply, CliError> {
    Ok(Reply::Text(session.render_current()?))
}

/// `TOTAL: <sum of every basket>`
pub fn all(session: &mut Session) -> Result<Reply, CliError> {
    Ok(Reply::Text(session.history_summary()?.to_string()))
}

pub fn json(session: &mut Session) -> Result<Reply, CliError> {
    Ok(Reply::Text(session.current_json()?))
}

/// Scans the file into a new basket and prints its receipt.
///
/// Rejected lines are listed above the receipt.
pub fn file(session: &mut Session, path: &Path) -> Result<Reply, CliError> {
    let report = session.receipt_from_file(path)?;
    let receipt = session.render_current()?;

    if report.is_clean() {
        Ok(Reply::Text(receipt))
    } else {
        Ok(Reply::Text(format!("{}\n{}", report, receipt)))
    }
}
