//! Column rendering capabilities.
//!
//! Expression rendering needs column rendering (a `column_ref` is an
//! expression) and column rendering needs expression rendering (a column
//! definition carries a default value). The [`ColumnRenderer`] trait breaks
//! the cycle: implementations receive the calling [`Renderer`] and recurse
//! through it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::column::StandardColumns;
use super::Renderer;
use crate::ast::{ColumnDefinition, ColumnRef, FulltextSearch};
use crate::Result;

/// Renders the column-shaped nodes on behalf of a [`Renderer`].
pub trait ColumnRenderer: Send + Sync {
    /// Renders a column reference.
    ///
    /// # Errors
    ///
    /// Propagates errors from nested expressions.
    fn column_ref(&self, renderer: &Renderer, column: &ColumnRef) -> Result<String>;

    /// Renders `MATCH (..) AGAINST (..)`.
    ///
    /// # Errors
    ///
    /// Propagates errors from nested expressions.
    fn fulltext_search(&self, renderer: &Renderer, search: &FulltextSearch) -> Result<String>;

    /// Renders a column definition.
    ///
    /// # Errors
    ///
    /// Propagates errors from nested expressions.
    fn column_definition(&self, renderer: &Renderer, definition: &ColumnDefinition)
        -> Result<String>;
}

/// A registrable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    ColumnRef,
    FullTextSearch,
    ColumnDefinition,
}

impl Capability {
    /// Every capability.
    pub const ALL: [Self; 3] = [Self::ColumnRef, Self::FullTextSearch, Self::ColumnDefinition];

    /// Returns the capability's registration name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ColumnRef => "columnRefToSQL",
            Self::FullTextSearch => "fullTextSearchToSQL",
            Self::ColumnDefinition => "columnDefinitionToSQL",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown capability: {s}"))
    }
}

/// Maps capabilities to their implementations.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    entries: BTreeMap<Capability, Arc<dyn ColumnRenderer>>,
}

impl ExtensionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with [`StandardColumns`] for every capability.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_all(Arc::new(StandardColumns));
        registry
    }

    /// Registers an implementation for one capability, replacing any
    /// previous one.
    pub fn register(&mut self, capability: Capability, renderer: Arc<dyn ColumnRenderer>) {
        self.entries.insert(capability, renderer);
    }

    /// Registers one implementation for every capability.
    pub fn register_all(&mut self, renderer: Arc<dyn ColumnRenderer>) {
        for capability in Capability::ALL {
            self.register(capability, Arc::clone(&renderer));
        }
    }

    /// Returns the implementation for a capability, if registered.
    #[must_use]
    pub fn resolve(&self, capability: Capability) -> Option<&dyn ColumnRenderer> {
        self.entries.get(&capability).map(AsRef::as_ref)
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl ColumnRenderer for Upper {
        fn column_ref(&self, _: &Renderer, column: &ColumnRef) -> Result<String> {
            Ok(column.column.text().unwrap_or_default().to_uppercase())
        }

        fn fulltext_search(&self, _: &Renderer, _: &FulltextSearch) -> Result<String> {
            Ok("FTS".to_string())
        }

        fn column_definition(&self, _: &Renderer, _: &ColumnDefinition) -> Result<String> {
            Ok("DEF".to_string())
        }
    }

    #[test]
    fn test_standard_resolves_everything() {
        let registry = ExtensionRegistry::standard();
        for capability in Capability::ALL {
            assert!(registry.resolve(capability).is_some());
        }
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = ExtensionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.resolve(Capability::ColumnRef).is_none());
    }

    #[test]
    fn test_register_replaces_single_capability() {
        let mut registry = ExtensionRegistry::standard();
        registry.register(Capability::ColumnRef, Arc::new(Upper));
        let renderer = Renderer::new(super::super::RenderConfig::default());
        let column = ColumnRef::new("id");
        let custom = registry.resolve(Capability::ColumnRef).unwrap();
        assert_eq!(custom.column_ref(&renderer, &column).unwrap(), "ID");
    }

    #[test]
    fn test_capability_names() {
        assert_eq!(Capability::ColumnRef.to_string(), "columnRefToSQL");
        assert_eq!(
            "columnDefinitionToSQL".parse::<Capability>(),
            Ok(Capability::ColumnDefinition)
        );
        assert!("tableToSQL".parse::<Capability>().is_err());
    }
}
