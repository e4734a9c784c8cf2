//! Identifier derivation: raw column/table names to unique, legal identifiers
//!
//! A raw name is cleaned, split into word fragments, recased and joined
//! (`BusinessEntityID` -> `BusinessEntityID`, `employee_name` ->
//! `EmployeeName`), guarded against leading digits and reserved words, and
//! finally disambiguated against an [`IdentifierScope`].

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{Error, Result};

/// Maximum numeric suffix tried when disambiguating a colliding identifier
pub const MAX_SUFFIX_ATTEMPTS: u32 = 100;

/// An immutable set of words that must not be emitted as bare identifiers
#[derive(Debug, Clone, Copy)]
pub struct ReservedWords {
    words: &'static [&'static str],
    escape: &'static str,
}

impl ReservedWords {
    /// Build a reserved word set; `escape` is prefixed to identifiers that
    /// would otherwise equal one of `words`.
    pub const fn new(words: &'static [&'static str], escape: &'static str) -> Self {
        Self { words, escape }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| *w == word)
    }

    pub fn escape_marker(&self) -> &'static str {
        self.escape
    }

    /// Prefix the escape marker if `word` is reserved
    pub fn escape(&self, word: &str) -> String {
        if self.contains(word) {
            format!("{}{}", self.escape, word)
        } else {
            word.to_string()
        }
    }
}

/// C# keywords, escaped with the verbatim identifier marker `@`
pub const CSHARP_RESERVED_WORDS: ReservedWords = ReservedWords::new(
    &[
        "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
        "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
        "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
        "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
        "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
        "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
        "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this",
        "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort",
        "using", "virtual", "void", "volatile", "while",
    ],
    "@",
);

/// How word fragments other than a single-letter prefix are recased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FragmentCasing {
    /// Title-case every fragment: `SSN` -> `Ssn`, `ID` -> `Id`
    TitleCase,
    /// Keep all-uppercase fragments of two or more characters (acronyms)
    /// as they are; title-case the rest: `SSN` -> `SSN`, `name` -> `Name`
    #[default]
    PreserveAcronyms,
}

/// Rules for turning raw names into identifiers
#[derive(Debug, Clone, Copy)]
pub struct NamingPolicy {
    pub reserved: ReservedWords,
    pub casing: FragmentCasing,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            reserved: CSHARP_RESERVED_WORDS,
            casing: FragmentCasing::default(),
        }
    }
}

impl NamingPolicy {
    pub fn new(reserved: ReservedWords, casing: FragmentCasing) -> Self {
        Self { reserved, casing }
    }

    /// Derive the scope-independent candidate for `raw`: clean, split,
    /// recase, join, then guard leading digits and reserved words.
    pub fn candidate(&self, raw: &str) -> Result<String> {
        let fragments = split_words(&clean(raw));
        if fragments.is_empty() {
            return Err(Error::EmptyIdentifier {
                raw: raw.to_string(),
            });
        }

        let mut name = String::new();
        for (i, fragment) in fragments.iter().enumerate() {
            if i == 0 && is_single_lowercase(fragment) {
                // single-letter prefix convention, e.g. `v` in `vEmployee`
                name.push_str(fragment);
            } else {
                name.push_str(&self.recase(fragment));
            }
        }

        if name.starts_with(char::is_numeric) {
            name.insert(0, '_');
        }

        Ok(self.reserved.escape(&name))
    }

    fn recase(&self, fragment: &str) -> String {
        let is_acronym = fragment.chars().count() > 1
            && fragment.chars().any(char::is_alphabetic)
            && !fragment.chars().any(char::is_lowercase);
        match self.casing {
            FragmentCasing::PreserveAcronyms if is_acronym => fragment.to_string(),
            _ => title_case(fragment),
        }
    }
}

/// Already-assigned identifiers inside one generated type
#[derive(Debug, Clone)]
pub struct IdentifierScope {
    owner: String,
    assigned: IndexMap<String, String>,
    used: HashSet<String>,
}

impl IdentifierScope {
    /// Create an empty scope for the type named `owner`; no identifier in the
    /// scope will ever equal `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            assigned: IndexMap::new(),
            used: HashSet::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Identifier previously assigned to `raw`, if any
    pub fn get(&self, raw: &str) -> Option<&str> {
        self.assigned.get(raw).map(String::as_str)
    }

    /// (raw name, identifier) pairs in assignment order
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assigned.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Resolve `raw` to a unique identifier in this scope.
    ///
    /// Requesting the same raw name again returns the identifier assigned
    /// the first time.
    pub fn identifier(&mut self, raw: &str, policy: &NamingPolicy) -> Result<String> {
        if let Some(existing) = self.assigned.get(raw) {
            return Ok(existing.clone());
        }

        let base = policy.candidate(raw)?;
        let name = self.disambiguate(raw, base)?;
        trace!("{}: {:?} -> {}", self.owner, raw, name);

        self.used.insert(name.clone());
        self.assigned.insert(raw.to_string(), name.clone());
        Ok(name)
    }

    fn is_taken(&self, name: &str) -> bool {
        name == self.owner || self.used.contains(name)
    }

    fn disambiguate(&self, raw: &str, base: String) -> Result<String> {
        if !self.is_taken(&base) {
            return Ok(base);
        }
        (1..=MAX_SUFFIX_ATTEMPTS)
            .map(|n| format!("{}{}", base, n))
            .find(|attempt| !self.is_taken(attempt))
            .ok_or_else(|| Error::NameExhausted {
                raw: raw.to_string(),
                scope: self.owner.clone(),
            })
    }
}

/// Replace every character that is not a letter, digit or underscore with `_`
pub fn clean(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Split a cleaned name into word fragments.
///
/// Boundaries fall between an uppercase run and a following
/// uppercase-then-lowercase/digit pair (`IDNumber` -> `ID`, `Number`),
/// before an uppercase letter that follows a non-uppercase character, and
/// wherever the text switches between alphanumeric and anything else.
/// Fragments made only of `_` or `-` are dropped.
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut fragments = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && is_boundary(chars[i - 1], c, chars.get(i + 1).copied()) {
            fragments.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        fragments.push(current);
    }

    fragments
        .into_iter()
        .filter(|f| !f.chars().all(|c| c == '_' || c == '-'))
        .collect()
}

fn is_boundary(prev: char, cur: char, next: Option<char>) -> bool {
    let acronym_to_word = prev.is_uppercase()
        && cur.is_uppercase()
        && next.is_some_and(|n| n.is_lowercase() || n.is_numeric());
    let into_upper = !prev.is_uppercase() && cur.is_uppercase();
    let alnum_switch = prev.is_alphanumeric() != cur.is_alphanumeric();
    acronym_to_word || into_upper || alnum_switch
}

fn is_single_lowercase(fragment: &str) -> bool {
    let mut chars = fragment.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_lowercase())
}

fn title_case(fragment: &str) -> String {
    let mut chars = fragment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(name: &str) -> Vec<String> {
        split_words(&clean(name))
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("first name"), "first_name");
        assert_eq!(clean("rate%"), "rate_");
        assert_eq!(clean("a-b.c"), "a_b_c");
        assert_eq!(clean("Ünïcode"), "Ünïcode");
    }

    #[test]
    fn test_split_words() {
        assert_eq!(words("BusinessEntityID"), vec!["Business", "Entity", "ID"]);
        assert_eq!(words("Employee_SSN"), vec!["Employee", "SSN"]);
        assert_eq!(words("IDNumber"), vec!["ID", "Number"]);
        assert_eq!(words("vEmployee"), vec!["v", "Employee"]);
        assert_eq!(words("first_name"), vec!["first", "name"]);
        assert_eq!(words("modifiedDate"), vec!["modified", "Date"]);
        assert_eq!(words("Address Line 2"), vec!["Address", "Line", "2"]);
        assert_eq!(words("__a__b__"), vec!["a", "b"]);
        assert!(words("$$$").is_empty());
    }

    #[test]
    fn test_candidate_preserving_acronyms() {
        let policy = NamingPolicy::default();
        assert_eq!(policy.candidate("BusinessEntityID").unwrap(), "BusinessEntityID");
        assert_eq!(policy.candidate("Employee_SSN").unwrap(), "EmployeeSSN");
        assert_eq!(policy.candidate("employee_ssn").unwrap(), "EmployeeSsn");
        assert_eq!(policy.candidate("first name").unwrap(), "FirstName");
        assert_eq!(policy.candidate("vEmployee").unwrap(), "vEmployee");
    }

    #[test]
    fn test_candidate_title_case() {
        let policy = NamingPolicy::new(CSHARP_RESERVED_WORDS, FragmentCasing::TitleCase);
        assert_eq!(policy.candidate("BusinessEntityID").unwrap(), "BusinessEntityId");
        assert_eq!(policy.candidate("Employee_SSN").unwrap(), "EmployeeSsn");
        assert_eq!(policy.candidate("NAME").unwrap(), "Name");
        assert_eq!(policy.candidate("vEmployee").unwrap(), "vEmployee");
    }

    #[test]
    fn test_single_uppercase_prefix_is_title_cased() {
        let policy = NamingPolicy::default();
        assert_eq!(policy.candidate("X").unwrap(), "X");
        assert_eq!(policy.candidate("x").unwrap(), "x");
        assert_eq!(policy.candidate("x_pos").unwrap(), "xPos");
    }

    #[test]
    fn test_leading_digit() {
        let policy = NamingPolicy::default();
        assert_eq!(policy.candidate("2ndLine").unwrap(), "_2ndLine");
        assert_eq!(policy.candidate("123").unwrap(), "_123");
    }

    #[test]
    fn test_reserved_word_is_escaped() {
        let policy = NamingPolicy::default();
        // C# keywords are lowercase, so title-cased output never hits them
        assert_eq!(policy.candidate("class").unwrap(), "Class");
        assert_eq!(policy.candidate("v").unwrap(), "v");
        let policy = NamingPolicy::new(
            ReservedWords::new(&["Class", "Event"], "@"),
            FragmentCasing::default(),
        );
        assert_eq!(policy.candidate("class").unwrap(), "@Class");
        assert_eq!(policy.candidate("EVENT").unwrap(), "EVENT");
        assert_eq!(policy.candidate("event").unwrap(), "@Event");
    }

    #[test]
    fn test_empty_names_fail() {
        let policy = NamingPolicy::default();
        for raw in ["", "$$$", "___", " - "] {
            let err = policy.candidate(raw).unwrap_err();
            assert!(matches!(err, Error::EmptyIdentifier { .. }), "{raw:?}");
        }
    }

    #[test]
    fn test_scope_suffixes_collisions() {
        let policy = NamingPolicy::default();
        let mut scope = IdentifierScope::new("Person");
        assert_eq!(scope.identifier("Name", &policy).unwrap(), "Name");
        assert_eq!(scope.identifier("name", &policy).unwrap(), "Name1");
        assert_eq!(scope.identifier("NAME_", &policy).unwrap(), "NAME");
        assert_eq!(scope.identifier("_name", &policy).unwrap(), "Name2");
    }

    #[test]
    fn test_scope_avoids_owner_name() {
        let policy = NamingPolicy::default();
        let mut scope = IdentifierScope::new("Person");
        assert_eq!(scope.identifier("person", &policy).unwrap(), "Person1");
    }

    #[test]
    fn test_scope_is_idempotent() {
        let policy = NamingPolicy::default();
        let mut scope = IdentifierScope::new("Person");
        let first = scope.identifier("name", &policy).unwrap();
        scope.identifier("Name", &policy).unwrap();
        assert_eq!(scope.identifier("name", &policy).unwrap(), first);
        assert_eq!(scope.len(), 2);
        assert_eq!(scope.get("Name"), Some("Name1"));
    }

    #[test]
    fn test_scope_exhaustion() {
        let policy = NamingPolicy::default();
        let mut scope = IdentifierScope::new("Name");
        // the owner takes the bare name, so 100 variants use up every suffix
        for i in 0..MAX_SUFFIX_ATTEMPTS {
            let raw = format!("{}name", "_".repeat(i as usize));
            assert_eq!(
                scope.identifier(&raw, &policy).unwrap(),
                format!("Name{}", i + 1)
            );
        }
        let err = scope.identifier("name__", &policy).unwrap_err();
        match err {
            Error::NameExhausted { raw, scope } => {
                assert_eq!(raw, "name__");
                assert_eq!(scope, "Name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
