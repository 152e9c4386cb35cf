//! Delimited-text parser for adjacency records.
//!
//! Format:
//! - Line 1: header naming the fields, comma-separated
//! - Following lines: one edge per line, same delimiter
//! - Line endings: `\n` or `\r\n`
//!
//! There is no quoting or escaping: a comma always separates fields.

use limitrofe_shared::{ColumnNames, LimitrofeError, Record, Result};
use tracing::{debug, warn};

/// Field delimiter.
const DELIMITER: char = ',';

/// Byte-order mark some exporters put in front of the header.
const BOM: char = '\u{feff}';

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Zero-based positions of the required fields, resolved once per load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPositions {
    pub entity: usize,
    pub neighbor: usize,
}

/// Counters gathered while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParseStats {
    /// Non-blank data lines turned into records.
    pub data_lines: usize,
    /// Lines skipped because they were empty after trimming.
    pub blank_lines: usize,
    /// Rows with fewer fields than a resolved position needs.
    pub short_rows: usize,
}

/// Output of a successful parse.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    /// Records in source order.
    pub records: Vec<Record>,
    /// Where the required fields were found in the header.
    pub positions: ColumnPositions,
    pub stats: ParseStats,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse raw dataset text into records.
///
/// Fails with [`LimitrofeError::MissingColumn`] when the header does not
/// name both required fields; no records are produced in that case. Short
/// rows never abort parsing: missing values become empty strings.
pub fn parse(text: &str, columns: &ColumnNames) -> Result<ParsedTable> {
    let mut lines = split_lines(text);

    let header_line = lines.next().unwrap_or_default();
    let header_line = header_line.strip_prefix(BOM).unwrap_or(header_line);
    let header: Vec<&str> = header_line.split(DELIMITER).collect();

    let positions = resolve_positions(&header, columns)?;
    debug!(
        entity = positions.entity,
        neighbor = positions.neighbor,
        "resolved column positions"
    );

    let mut records = Vec::new();
    let mut stats = ParseStats::default();

    for line in lines {
        if line.trim().is_empty() {
            stats.blank_lines += 1;
            continue;
        }

        let fields: Vec<&str> = line.split(DELIMITER).collect();
        let entity = fields.get(positions.entity).copied();
        let neighbor = fields.get(positions.neighbor).copied();
        if entity.is_none() || neighbor.is_none() {
            stats.short_rows += 1;
        }

        records.push(Record::new(
            entity.unwrap_or_default(),
            neighbor.unwrap_or_default(),
        ));
        stats.data_lines += 1;
    }

    if stats.short_rows > 0 {
        warn!(
            short_rows = stats.short_rows,
            "rows with missing fields were kept with empty values"
        );
    }

    Ok(ParsedTable {
        records,
        positions,
        stats,
    })
}

/// Split on `\n`, dropping one trailing `\r` per line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Find both required fields in the header by exact name (first match wins).
fn resolve_positions(header: &[&str], columns: &ColumnNames) -> Result<ColumnPositions> {
    let find = |name: &str| {
        header
            .iter()
            .position(|field| *field == name)
            .ok_or_else(|| LimitrofeError::MissingColumn {
                column: name.to_string(),
                header: header.iter().map(|f| f.to_string()).collect(),
            })
    };

    Ok(ColumnPositions {
        entity: find(&columns.entity)?,
        neighbor: find(&columns.neighbor)?,
    })
}
