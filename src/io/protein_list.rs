//! A minimal FASTA-like protein sequence list reader, feeding the fragment index
//! (§4.5) with `(identifier, sequence)` pairs.
//!
//! Per `SPEC_FULL.md` §11 Open Question 1: this implements the modern (non-buggy)
//! behavior only. The legacy `FASTAFile::readRecordNew` off-by-one in its
//! character-removal loop is not reproduced — a line beginning with `>` starts a new
//! record and becomes its (trimmed) identifier; every subsequent line is appended to
//! the current record's sequence after stripping any byte outside `A-Z`.

use std::io::BufRead;

use crate::error::{Context, Error, ErrorKind};

/// One `>identifier` / sequence record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinRecord {
    /// The identifier line, with the leading `>` stripped and surrounding whitespace
    /// trimmed.
    pub identifier: String,
    /// The accumulated sequence, uppercase `A`-`Z` bytes only.
    pub sequence: String,
}

/// Parse a FASTA-like protein list from `input`.
///
/// A leading blank prefix (before the first `>` line) is ignored rather than treated
/// as an error, matching the modern reader's tolerant behavior.
pub fn read_protein_list<R: BufRead>(input: R) -> Result<Vec<ProteinRecord>, Error> {
    let mut records = Vec::new();
    let mut current: Option<ProteinRecord> = None;

    for (line_index, line) in input.lines().enumerate() {
        let line = line.map_err(|e| {
            Error::new(
                ErrorKind::ParseError,
                format!("I/O error reading protein list at line {}: {e}", line_index + 1),
                Context::none(),
            )
        })?;
        if let Some(rest) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(ProteinRecord {
                identifier: rest.trim().to_string(),
                sequence: String::new(),
            });
        } else if let Some(record) = current.as_mut() {
            record
                .sequence
                .extend(line.chars().filter(|c| c.is_ascii_uppercase()));
        }
        // Non-blank, non-`>` text before any identifier line is silently ignored.
    }
    if let Some(record) = current.take() {
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identifier_and_accumulates_sequence_across_lines() {
        let input = b">sp|P12345|TEST Example protein\nMSDER\nEVAEA\n>sp|P99999|OTHER\nGGG\n";
        let records = read_protein_list(&input[..]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "sp|P12345|TEST Example protein");
        assert_eq!(records[0].sequence, "MSDEREVAEA");
        assert_eq!(records[1].sequence, "GGG");
    }

    #[test]
    fn strips_non_uppercase_bytes_from_sequence_lines() {
        let input = b">id\nMS der123\n";
        let records = read_protein_list(&input[..]).unwrap();
        assert_eq!(records[0].sequence, "MS");
    }

    #[test]
    fn empty_input_yields_no_records() {
        let records = read_protein_list(&b""[..]).unwrap();
        assert!(records.is_empty());
    }
}
