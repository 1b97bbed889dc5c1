//! Audience profile table import.
//!
//! The first line is a header and is always discarded. Fields may be quoted
//! so that they can contain the delimiter; quotes themselves never end up in
//! the field text. Rows that do not carry the four profile columns are
//! skipped without error.

use adloc_models::AudienceProfile;
use tracing::debug;

/// Number of leading columns that make up a profile.
pub const PROFILE_COLUMNS: usize = 4;

/// Delimited text to [`AudienceProfile`] converter.
#[derive(Debug, Clone, Copy)]
pub struct ProfileTableImporter {
    delimiter: char,
}

impl Default for ProfileTableImporter {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl ProfileTableImporter {
    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Parse a whole table, header included.
    pub fn import(&self, text: &str) -> Vec<AudienceProfile> {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        if lines.len() < 2 {
            return Vec::new();
        }

        let mut profiles = Vec::with_capacity(lines.len() - 1);
        for (row, line) in lines.iter().enumerate().skip(1) {
            match self.parse_row(line) {
                Some(profile) => profiles.push(profile),
                None => {
                    if !line.trim().is_empty() {
                        debug!(row, "Skipping profile row without four columns");
                    }
                }
            }
        }
        profiles
    }

    /// Split one line into trimmed fields using quote-toggle scanning.
    pub fn split_row(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;

        for ch in line.chars() {
            if ch == '"' {
                in_quotes = !in_quotes;
            } else if ch == self.delimiter && !in_quotes {
                fields.push(current.trim().to_string());
                current.clear();
            } else {
                current.push(ch);
            }
        }
        fields.push(current.trim().to_string());
        fields
    }

    fn parse_row(&self, line: &str) -> Option<AudienceProfile> {
        let fields = self.split_row(line);
        // Columns are positional; a blank one is never filled from a later field
        if fields.len() < PROFILE_COLUMNS || fields[..PROFILE_COLUMNS].iter().any(String::is_empty) {
            return None;
        }

        let mut columns = fields.into_iter();
        Some(AudienceProfile {
            age: columns.next()?,
            gender: columns.next()?,
            demographic_info: columns.next()?,
            search_history: columns.next()?,
        })
    }
}

/// Parse a comma-delimited profile table.
pub fn import_profiles(text: &str) -> Vec<AudienceProfile> {
    ProfileTableImporter::default().import(text)
}
