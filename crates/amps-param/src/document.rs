//! Line-oriented reader for the param file format.
//!
//! ```text
//! ! comment
//! #SECTION
//! KEY value ! trailing comment
//! #END
//! ```
//!
//! Keys are the first whitespace-delimited token; the value is the rest of
//! the line up to an optional `!`. Keys may repeat within a section.

use crate::error::{ParamError, ParamResult};
use crate::sections;

#[derive(Debug, Clone, PartialEq)]
pub struct ParamEntry {
    pub key: String,
    pub value: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSection {
    pub name: String,
    pub entries: Vec<ParamEntry>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamDocument {
    pub sections: Vec<ParamSection>,
}

impl ParamDocument {
    pub fn parse(text: &str) -> ParamResult<Self> {
        let mut doc = ParamDocument::default();
        let mut ended = false;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let content = raw.split('!').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            if ended {
                return Err(ParamError::AfterEnd { line });
            }
            if let Some(name) = content.strip_prefix('#') {
                let name = name.trim().to_ascii_uppercase();
                if name == sections::END {
                    ended = true;
                } else {
                    doc.sections.push(ParamSection {
                        name,
                        entries: Vec::new(),
                    });
                }
                continue;
            }

            let (key, value) = match content.split_once(char::is_whitespace) {
                Some((k, v)) => (k, v.trim()),
                None => (content, ""),
            };
            let section = doc
                .sections
                .last_mut()
                .ok_or_else(|| ParamError::OutsideSection {
                    line,
                    key: key.to_string(),
                })?;
            section.entries.push(ParamEntry {
                key: key.to_ascii_uppercase(),
                value: value.to_string(),
                line,
            });
        }

        Ok(doc)
    }

    pub fn section(&self, name: &str) -> Option<&ParamSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn require_section(&self, name: &str) -> ParamResult<&ParamSection> {
        self.section(name).ok_or_else(|| ParamError::MissingSection {
            section: name.to_string(),
        })
    }
}

impl ParamSection {
    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Every value recorded for a repeated `key`, in file order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn require(&self, key: &str) -> ParamResult<&str> {
        self.get(key).ok_or_else(|| ParamError::MissingKey {
            section: self.name.clone(),
            key: key.to_string(),
        })
    }

    pub fn invalid(&self, key: &str, value: &str, reason: impl Into<String>) -> ParamError {
        ParamError::InvalidValue {
            section: self.name.clone(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn number(&self, key: &str) -> ParamResult<f64> {
        let raw = self.require(key)?;
        raw.parse::<f64>()
            .map_err(|_| self.invalid(key, raw, "not a number"))
    }

    /// Whitespace-separated list of numbers.
    pub fn numbers(&self, key: &str) -> ParamResult<Vec<f64>> {
        let raw = self.require(key)?;
        parse_numbers(raw).ok_or_else(|| self.invalid(key, raw, "not a list of numbers"))
    }
}

pub(crate) fn parse_numbers(raw: &str) -> Option<Vec<f64>> {
    raw.split_whitespace()
        .map(|t| t.parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
! generated
#RUN
RUN_NAME   demo_run   ! identifier
DESCRIPTION two words

#output
shell_altitudes 500.0 1000.0
POINT 1 2 3
POINT 4 5 6
#END
";

    #[test]
    fn parses_sections_and_comments() {
        let doc = ParamDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.sections.len(), 2);
        let run = doc.section("RUN").unwrap();
        assert_eq!(run.get("RUN_NAME"), Some("demo_run"));
        assert_eq!(run.get("DESCRIPTION"), Some("two words"));
    }

    #[test]
    fn names_are_case_folded() {
        let doc = ParamDocument::parse(SAMPLE).unwrap();
        let out = doc.section("OUTPUT").unwrap();
        assert_eq!(out.numbers("SHELL_ALTITUDES").unwrap(), vec![500.0, 1000.0]);
        assert_eq!(out.get_all("POINT").count(), 2);
    }

    #[test]
    fn entry_before_section_fails() {
        let err = ParamDocument::parse("KEY 1\n#RUN\n").unwrap_err();
        assert!(matches!(err, ParamError::OutsideSection { line: 1, .. }));
    }

    #[test]
    fn content_after_end_fails() {
        let err = ParamDocument::parse("#RUN\n#END\nKEY 1\n").unwrap_err();
        assert!(matches!(err, ParamError::AfterEnd { line: 3 }));
    }

    #[test]
    fn missing_key_names_section() {
        let doc = ParamDocument::parse(SAMPLE).unwrap();
        let err = doc.section("RUN").unwrap().number("CHARGE").unwrap_err();
        assert_eq!(err.to_string(), "Missing key CHARGE in #RUN");
    }

    #[test]
    fn bad_number_is_reported() {
        let doc = ParamDocument::parse("#P\nMASS heavy\n").unwrap();
        assert!(matches!(
            doc.section("P").unwrap().number("MASS"),
            Err(ParamError::InvalidValue { .. })
        ));
    }
}
