//! CSV export of every contribution record.
//!
//! One header row, then one row per record in the order given. Every cell
//! is quoted and carries the field text exactly as stored, so any RFC 4180
//! reader gets the stored value back.

use crate::record::{ContributionKind, ContributionRecord};

pub const CSV_HEADER: &str = "email,patents,publications,conferences,events";
pub const CSV_FILENAME: &str = "contributions.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Wrap a value in double quotes, doubling any quote inside it.
#[must_use]
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row(record: &ContributionRecord) -> String {
    let mut cells = Vec::with_capacity(1 + ContributionKind::ALL.len());
    cells.push(quote_field(&record.email));
    for kind in ContributionKind::ALL {
        cells.push(quote_field(record.stored_text(kind)));
    }
    cells.join(",")
}

/// Render `records` as CSV text. An empty slice yields just the header.
#[must_use]
pub fn to_csv(records: &[ContributionRecord]) -> String {
    std::iter::once(CSV_HEADER.to_owned())
        .chain(records.iter().map(row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Value for the `Content-Disposition` header.
#[must_use]
pub fn content_disposition() -> String {
    format!("attachment; filename=\"{CSV_FILENAME}\"")
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
