//! Authority whitelisting over table and column reference lists.
//!
//! Each pattern is a regular expression matched case-insensitively against
//! the whole entry. An entry passes when any pattern matches it.

use regex::Regex;
use tracing::debug;

use crate::options::CheckType;
use crate::{Error, Result};

/// A compiled set of authority patterns.
#[derive(Debug, Clone, Default)]
pub struct WhiteList {
    patterns: Vec<Regex>,
}

impl WhiteList {
    /// Compiles the patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for the first pattern that is not a
    /// valid regular expression.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(&format!("(?i)^(?:{pattern})$")).map_err(|source| {
                    Error::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if no pattern was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns true if some pattern matches `authority`.
    ///
    /// Entries are also tried without their `verb::` prefix, so `null::users`
    /// and `users` style patterns work alongside full entries.
    #[must_use]
    pub fn allows(&self, authority: &str) -> bool {
        let bare = authority.rsplit("::").next().unwrap_or(authority);
        let unverbed = authority.split_once("::").map_or(authority, |(_, rest)| rest);
        self.patterns
            .iter()
            .any(|re| re.is_match(authority) || re.is_match(unverbed) || re.is_match(bare))
    }

    /// Checks every entry, failing on the first one no pattern covers.
    ///
    /// An empty whitelist allows everything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WhiteListDenied`] naming the entry and `sql`.
    pub fn check(&self, kind: CheckType, entries: &[String], sql: &str) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        for entry in entries {
            if !self.allows(entry) {
                debug!(%kind, authority = %entry, "Whitelist denied");
                return Err(Error::WhiteListDenied {
                    kind,
                    authority: entry.clone(),
                    sql: sql.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_full_entry_patterns() {
        let list = WhiteList::new(["select::(.*)::users", "update::null::orders"]).unwrap();
        assert!(list.allows("select::null::users"));
        assert!(list.allows("SELECT::shop::USERS"));
        assert!(!list.allows("delete::null::users"));
    }

    #[test]
    fn test_patterns_are_anchored() {
        let list = WhiteList::new(["public"]).unwrap();
        assert!(list.allows("select::null::public"));
        assert!(!list.allows("select::null::public_keys"));
        assert!(!list.allows("select::null::notpublic"));
    }

    #[test]
    fn test_check_reports_first_denied_entry() {
        let list = WhiteList::new(["public"]).unwrap();
        let err = list
            .check(
                CheckType::Table,
                &entries(&["select::null::public", "select::null::secret"]),
                "SELECT * FROM public, secret",
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "authority = 'select::null::secret' is required in table whiteList to execute SQL = 'SELECT * FROM public, secret'"
        );
    }

    #[test]
    fn test_empty_list_is_a_no_op() {
        let list = WhiteList::new(Vec::<String>::new()).unwrap();
        assert!(list
            .check(CheckType::Column, &entries(&["select::null::x"]), "SELECT x")
            .is_ok());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = WhiteList::new(["select::(::t"]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
