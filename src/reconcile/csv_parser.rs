//! Tabular import parsing.
//!
//! The import format is comma-delimited UTF-8 text with a mandatory
//! header row. Blank rows are skipped; short rows are padded to the
//! header width and long rows truncated.

use csv::ReaderBuilder;
use log::warn;

use crate::Result;

use super::reconcile_errors::ImportError;

/// Result of parsing an import file.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parses raw import bytes into a header row plus data rows.
pub fn parse_table(content: &[u8]) -> Result<ParsedTable> {
    let content_str = decode_content(content);

    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false) // The header row is handled manually
        .flexible(true)
        .from_reader(content_str.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
                // Blank rows carry no information and are dropped
                if row.iter().all(|cell| cell.trim().is_empty()) {
                    continue;
                }
                records.push(row);
            }
            Err(e) => {
                warn!("Skipping unparseable row {}: {}", idx + 1, e);
            }
        }
    }

    if records.is_empty() {
        return Err(ImportError::Empty.into());
    }

    let mut records = records.into_iter();
    let headers: Vec<String> = records
        .next()
        .unwrap_or_default()
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let header_count = headers.len();
    let rows: Vec<Vec<String>> = records
        .map(|mut row| {
            if row.len() < header_count {
                row.resize(header_count, String::new());
            } else if row.len() > header_count {
                row.truncate(header_count);
            }
            row
        })
        .collect();

    Ok(ParsedTable { headers, rows })
}

/// Decodes content bytes to a UTF-8 string, handling a BOM if present.
fn decode_content(content: &[u8]) -> String {
    // Check for UTF-8 BOM (EF BB BF)
    let content_without_bom =
        if content.len() >= 3 && content[0] == 0xEF && content[1] == 0xBB && content[2] == 0xBF {
            &content[3..]
        } else {
            content
        };

    match std::str::from_utf8(content_without_bom) {
        Ok(s) => s.to_string(),
        Err(e) => {
            warn!(
                "Invalid UTF-8 encoding at byte {}; replacing offending characters",
                e.valid_up_to()
            );
            String::from_utf8_lossy(content_without_bom).into_owned()
        }
    }
}
