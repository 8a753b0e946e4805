//! Line preprocessing applied before parsing
//!
//! A [`Preprocessor`] turns one raw source line into the text handed to the
//! parser. [`StdPreprocessor`] performs `{name}` substitution, strips an
//! end-of-line comment and trims surrounding whitespace.

use crate::interpreter::errors::CompileError;

/// `(name, replacement)` pairs, applied in order
pub type Substitutions = Vec<(String, String)>;

/// Add or update a substitution
///
/// A name given again keeps its first position and takes the new value.
pub fn set_substitution(substitutions: &mut Substitutions, name: String, value: String) {
    match substitutions.iter_mut().find(|(existing, _)| *existing == name) {
        Some(entry) => entry.1 = value,
        None => substitutions.push((name, value)),
    }
}

pub trait Preprocessor {
    fn process_line(&self, line: &str, substitutions: &Substitutions) -> Result<String, CompileError>;
}

/// The standard preprocessor used by the command-line driver
#[derive(Debug, Clone)]
pub struct StdPreprocessor {
    /// Everything from this marker to the end of the line is dropped
    pub comment: Option<String>,
    pub trim: bool,
}

impl Default for StdPreprocessor {
    fn default() -> Self {
        Self {
            comment: None,
            trim: true,
        }
    }
}

impl StdPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        self.comment = if marker.is_empty() { None } else { Some(marker) };
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

impl Preprocessor for StdPreprocessor {
    fn process_line(&self, line: &str, substitutions: &Substitutions) -> Result<String, CompileError> {
        let mut text = line.to_string();
        for (name, value) in substitutions {
            text = text.replace(&format!("{{{}}}", name), value);
        }

        // Checked before comments are stripped, so a brace in a comment counts too
        if text.contains('{') || text.contains('}') {
            return Err(CompileError::Unsubstituted { text });
        }

        if let Some(marker) = &self.comment {
            if let Some(pos) = text.find(marker.as_str()) {
                text.truncate(pos);
            }
        }

        if self.trim {
            text = text.trim().to_string();
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs(pairs: &[(&str, &str)]) -> Substitutions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitution() {
        let pre = StdPreprocessor::new();
        let out = pre
            .process_line("A := {N} + {M}", &subs(&[("N", "5"), ("M", "[B]")]))
            .unwrap();
        assert_eq!(out, "A := 5 + [B]");
    }

    #[test]
    fn test_substitutions_apply_in_order() {
        let pre = StdPreprocessor::new();
        let out = pre
            .process_line("A := {N}", &subs(&[("N", "{M} + 1"), ("M", "B")]))
            .unwrap();
        assert_eq!(out, "A := B + 1");

        let err = pre
            .process_line("A := {N}", &subs(&[("M", "B"), ("N", "{M} + 1")]))
            .unwrap_err();
        assert!(matches!(err, CompileError::Unsubstituted { .. }));
    }

    #[test]
    fn test_set_substitution_keeps_first_position() {
        let mut substitutions = Substitutions::new();
        set_substitution(&mut substitutions, "N".to_string(), "1".to_string());
        set_substitution(&mut substitutions, "M".to_string(), "2".to_string());
        set_substitution(&mut substitutions, "N".to_string(), "3".to_string());
        assert_eq!(substitutions, subs(&[("N", "3"), ("M", "2")]));
    }

    #[test]
    fn test_unsubstituted_placeholder() {
        let pre = StdPreprocessor::new();
        let err = pre
            .process_line("A := {N}", &subs(&[("M", "1")]))
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::Unsubstituted {
                text: "A := {N}".to_string()
            }
        );
        assert!(pre.process_line("A := 1 }", &Substitutions::default()).is_err());
    }

    #[test]
    fn test_comment_and_trim() {
        let pre = StdPreprocessor::new().with_comment("#");
        let out = pre
            .process_line("  L: A := 1   # count up", &Substitutions::default())
            .unwrap();
        assert_eq!(out, "L: A := 1");
        assert_eq!(
            pre.process_line("# only a comment", &Substitutions::default())
                .unwrap(),
            ""
        );

        let raw = StdPreprocessor::new().with_trim(false);
        assert_eq!(
            raw.process_line(" halt ", &Substitutions::default()).unwrap(),
            " halt "
        );
    }

    #[test]
    fn test_multi_character_marker() {
        let pre = StdPreprocessor::new().with_comment("//");
        let out = pre
            .process_line("A := 10 / 2 // half", &Substitutions::default())
            .unwrap();
        assert_eq!(out, "A := 10 / 2");
    }
}
