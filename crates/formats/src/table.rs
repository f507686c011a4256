//! Delimited text ingestion.
//!
//! Inputs are row-oriented with a header row; columns are addressed by name
//! only, so no fixed column order is assumed. The delimiter is sniffed from
//! the header line (comma, semicolon or tab).

use tracing::debug;

use crate::value::{RawRow, Scalar};

#[derive(Debug)]
pub enum TableError {
    Empty,
    MissingHeader,
    Csv(csv::Error),
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::Empty => write!(f, "table is empty"),
            TableError::MissingHeader => write!(f, "table has no usable header row"),
            TableError::Csv(e) => write!(f, "delimited parse error: {e}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        TableError::Csv(e)
    }
}

/// Picks the delimiter that occurs most often in the first non-empty line.
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let candidates = [b',', b';', b'\t'];
    let mut best = (b',', 0usize);
    for d in candidates {
        let count = header.bytes().filter(|b| *b == d).count();
        if count > best.1 {
            best = (d, count);
        }
    }
    best.0
}

/// Parses delimited text into dynamically typed rows.
///
/// Malformed records are skipped; only a missing header is an error.
/// Duplicate column names keep the first occurrence.
pub fn parse_delimited(text: &str) -> Result<Vec<RawRow>, TableError> {
    if text.trim().is_empty() {
        return Err(TableError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(sniff_delimiter(text))
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(TableError::MissingHeader);
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                debug!("skipping malformed record {index}: {e}");
                continue;
            }
        };

        let mut row = RawRow::new();
        for (name, cell) in headers.iter().zip(record.iter()) {
            if name.is_empty() || row.contains_key(name) {
                continue;
            }
            row.insert(name.to_string(), Scalar::parse_cell(cell));
        }
        if row.values().all(Scalar::is_null) {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::{TableError, parse_delimited, sniff_delimiter};
    use crate::value::Scalar;

    #[test]
    fn parses_rows_by_header_name() {
        let text = "h3,chlor_a_mean,n\n85560b2ffffffff,1.2,4\n85560b3ffffffff,,2\n";
        let rows = parse_delimited(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("h3"),
            Some(&Scalar::Text("85560b2ffffffff".into()))
        );
        assert_eq!(rows[0].get("chlor_a_mean"), Some(&Scalar::Number(1.2)));
        assert_eq!(rows[1].get("chlor_a_mean"), Some(&Scalar::Null));
    }

    #[test]
    fn short_rows_are_kept_and_blank_rows_dropped() {
        let text = "a,b,c\n1,2\n,,\n4,5,6\n";
        let rows = parse_delimited(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].get("c").is_none());
        assert_eq!(rows[1].get("c"), Some(&Scalar::Number(6.0)));
    }

    #[test]
    fn sniffs_semicolons() {
        assert_eq!(sniff_delimiter("lat;lon;value\n1;2;3"), b';');
        assert_eq!(sniff_delimiter("lat\tlon\n1\t2"), b'\t');
        assert_eq!(sniff_delimiter("single\n1"), b',');
        let rows = parse_delimited("lat;lon\n1;2\n").unwrap();
        assert_eq!(rows[0].get("lon"), Some(&Scalar::Number(2.0)));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_delimited("  \n"), Err(TableError::Empty)));
    }
}
