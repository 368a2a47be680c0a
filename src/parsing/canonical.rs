use crate::catalog::abbreviations::AbbreviationDictionary;

/// Number of leading characters kept from a zip code
pub const ZIP_PREFIX_LEN: usize = 5;

/// Normalizes single text fields against an abbreviation dictionary
#[derive(Debug, Clone, Copy)]
pub struct Canonicalizer<'a> {
    dictionary: &'a AbbreviationDictionary,
}

impl<'a> Canonicalizer<'a> {
    #[must_use]
    pub fn new(dictionary: &'a AbbreviationDictionary) -> Self {
        Self { dictionary }
    }

    /// Filter, uppercase, then abbreviate the field as a whole.
    ///
    /// Abbreviation only applies when the entire field is a type spelling,
    /// e.g. a standalone `streetType` column holding `Boulevard`.
    #[must_use]
    pub fn canonicalize(&self, raw: &str) -> String {
        let cleaned = clean(raw);
        self.dictionary.lookup(&cleaned).to_string()
    }
}

/// Drop every character outside `[A-Za-z0-9 #]` and uppercase the rest
#[must_use]
pub fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '#')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// First five characters of a zip code, without padding or digit checks
#[must_use]
pub fn truncate_zip(raw: &str) -> String {
    raw.chars().take(ZIP_PREFIX_LEN).collect()
}
