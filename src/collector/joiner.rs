//! Delimited string building used by the `joining` collectors
use std::fmt;

/// Joins string pieces with a delimiter, wrapped in a prefix and suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringJoiner {
    delimiter: String,
    prefix: String,
    suffix: String,
    value: Option<String>,
    empty_value: Option<String>,
}

impl StringJoiner {
    pub fn new(delimiter: &str) -> Self {
        Self::with_affixes(delimiter, "", "")
    }

    pub fn with_affixes(delimiter: &str, prefix: &str, suffix: &str) -> Self {
        Self {
            delimiter: delimiter.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            value: None,
            empty_value: None,
        }
    }

    /// Text to produce when nothing was added, instead of `prefix + suffix`
    pub fn set_empty_value(&mut self, empty_value: &str) -> &mut Self {
        self.empty_value = Some(empty_value.to_string());
        self
    }

    pub fn add(&mut self, piece: &str) -> &mut Self {
        match &mut self.value {
            Some(value) => {
                value.push_str(&self.delimiter);
                value.push_str(piece);
            }
            None => self.value = Some(piece.to_string()),
        }
        self
    }

    /// Append the joined content of `other` (without its affixes) as one piece.
    pub fn merge(&mut self, other: &StringJoiner) -> &mut Self {
        if let Some(content) = &other.value {
            let content = content.clone();
            self.add(&content);
        }
        self
    }

    /// Length of the text `to_string` would produce
    pub fn len(&self) -> usize {
        match (&self.value, &self.empty_value) {
            (Some(value), _) => self.prefix.len() + value.len() + self.suffix.len(),
            (None, Some(empty)) => empty.len(),
            (None, None) => self.prefix.len() + self.suffix.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for StringJoiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, &self.empty_value) {
            (Some(value), _) => write!(f, "{}{}{}", self.prefix, value, self.suffix),
            (None, Some(empty)) => f.write_str(empty),
            (None, None) => write!(f, "{}{}", self.prefix, self.suffix),
        }
    }
}
