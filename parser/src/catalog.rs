//! @ai:module:intent Immutable table of known ACP namespaces and their legal values
//! @ai:module:layer domain
//! @ai:module:public_api MARKER, NamespaceEntry, ValueSet, lookup, entries
//! @ai:module:stateless true

use crate::annotation::Category;
use crate::diagnostic::codes;

/// Prefix every annotation starts with.
pub const MARKER: &str = "@acp:";

pub const LOCK_LEVELS: &[&str] = &[
    "frozen",
    "restricted",
    "approval-required",
    "tests-required",
    "docs-required",
    "review-required",
    "normal",
    "experimental",
];

pub const LAYERS: &[&str] = &[
    "handler",
    "controller",
    "service",
    "repository",
    "model",
    "utility",
    "config",
    "middleware",
    "infrastructure",
    "domain",
    "presentation",
];

pub const STABILITY_LEVELS: &[&str] = &["stable", "experimental", "deprecated"];

/// @ai:intent Enumerated legal values for a constrained namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSet {
    pub values: &'static [&'static str],
    /// Diagnostic code reported for a value outside `values`.
    pub code: &'static str,
    /// Human name used in diagnostic messages.
    pub label: &'static str,
}

impl ValueSet {
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(&value)
    }
}

/// @ai:intent One row of the namespace catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceEntry {
    pub namespace: &'static str,
    pub category: Category,
    pub allowed: Option<ValueSet>,
}

const fn entry(namespace: &'static str, category: Category) -> NamespaceEntry {
    NamespaceEntry {
        namespace,
        category,
        allowed: None,
    }
}

const fn constrained(
    namespace: &'static str,
    category: Category,
    values: &'static [&'static str],
    code: &'static str,
    label: &'static str,
) -> NamespaceEntry {
    NamespaceEntry {
        namespace,
        category,
        allowed: Some(ValueSet {
            values,
            code,
            label,
        }),
    }
}

static CATALOG: &[NamespaceEntry] = &[
    // file-level
    entry("purpose", Category::FileLevel),
    entry("module", Category::FileLevel),
    entry("domain", Category::FileLevel),
    constrained(
        "layer",
        Category::FileLevel,
        LAYERS,
        codes::INVALID_LAYER,
        "layer",
    ),
    constrained(
        "stability",
        Category::FileLevel,
        STABILITY_LEVELS,
        codes::INVALID_STABILITY,
        "stability",
    ),
    entry("owner", Category::FileLevel),
    entry("ref", Category::FileLevel),
    entry("since", Category::FileLevel),
    // symbol-level
    entry("fn", Category::SymbolLevel),
    entry("class", Category::SymbolLevel),
    entry("method", Category::SymbolLevel),
    entry("param", Category::SymbolLevel),
    entry("returns", Category::SymbolLevel),
    entry("throws", Category::SymbolLevel),
    entry("example", Category::SymbolLevel),
    entry("deprecated", Category::SymbolLevel),
    entry("summary", Category::SymbolLevel),
    entry("type", Category::SymbolLevel),
    // constraint
    constrained(
        "lock",
        Category::Constraint,
        LOCK_LEVELS,
        codes::INVALID_LOCK_LEVEL,
        "lock level",
    ),
    entry("lock-reason", Category::Constraint),
    entry("style", Category::Constraint),
    entry("behavior", Category::Constraint),
    entry("quality", Category::Constraint),
    entry("test", Category::Constraint),
    entry("perf", Category::Constraint),
    entry("security", Category::Constraint),
    // inline
    entry("todo", Category::Inline),
    entry("fixme", Category::Inline),
    entry("hack", Category::Inline),
    entry("critical", Category::Inline),
    entry("debug", Category::Inline),
    entry("note", Category::Inline),
];

/// @ai:intent Find the catalog entry for a namespace
/// @ai:example ("lock") -> Some(constraint entry)
/// @ai:example ("nonsense") -> None
/// @ai:effects pure
pub fn lookup(namespace: &str) -> Option<&'static NamespaceEntry> {
    CATALOG.iter().find(|e| e.namespace == namespace)
}

/// @ai:intent Legal values for a constrained namespace, if any
/// @ai:effects pure
pub fn allowed_values(namespace: &str) -> Option<&'static ValueSet> {
    lookup(namespace).and_then(|e| e.allowed.as_ref())
}

pub fn entries() -> &'static [NamespaceEntry] {
    CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_namespaces_are_unique() {
        let mut seen = HashSet::new();
        for e in entries() {
            assert!(seen.insert(e.namespace), "duplicate namespace {}", e.namespace);
        }
    }

    #[test]
    fn test_constrained_namespaces() {
        let constrained: Vec<_> = entries()
            .iter()
            .filter(|e| e.allowed.is_some())
            .map(|e| e.namespace)
            .collect();
        assert_eq!(constrained, vec!["layer", "stability", "lock"]);
    }

    #[test]
    fn test_lookup_categories() {
        assert_eq!(lookup("layer").unwrap().category, Category::FileLevel);
        assert_eq!(lookup("lock").unwrap().category, Category::Constraint);
        assert_eq!(lookup("todo").unwrap().category, Category::Inline);
        assert!(lookup("LOCK").is_none());
    }

    #[test]
    fn test_allowed_values() {
        let locks = allowed_values("lock").unwrap();
        assert!(locks.contains("frozen"));
        assert!(!locks.contains("not-a-level"));
        assert!(allowed_values("purpose").is_none());
    }
}
