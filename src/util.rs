//! Utilities to help with writing problems
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use crate::lp_format::is_reserved_word;

/// Generates unique names that are valid in the .lp format.
/// Rows and columns share one generator so that no row is named like a column.
#[derive(Debug, Default)]
pub struct UniqueNameGenerator {
    counters: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl UniqueNameGenerator {
    /// Returns a valid name, never returned before by this generator.
    ///
    /// ```
    /// use lp_modeling::util::UniqueNameGenerator;
    ///
    /// let mut gen = UniqueNameGenerator::default();
    /// assert_eq!(gen.add_variable("x"), "x");
    /// assert_eq!(gen.add_variable("y_1"), "y_1");
    /// assert_eq!(gen.add_variable("!#?/"), "v"); // "!#?/" is not a valid name
    /// assert_eq!(gen.add_variable("x"), "x2"); // x is already taken
    /// assert_eq!(gen.add_variable("x2"), "x22");
    /// assert_eq!(gen.add_variable("3d"), "v3d");
    /// ```
    pub fn add_variable<'a>(&mut self, name: &'a str) -> Cow<'a, str> {
        let stem = stem(name);
        if self.taken.insert(stem.to_string()) {
            return stem;
        }
        let counter = self.counters.entry(stem.to_string()).or_insert(1);
        loop {
            *counter += 1;
            let candidate = format!("{}{}", stem, counter);
            if self.taken.insert(candidate.clone()) {
                return Cow::Owned(candidate);
            }
        }
    }

    /// Mark a name as used without returning it, e.g. the objective row name
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn stem(name: &str) -> Cow<'_, str> {
    let starts_with_letter = name.chars().next().map_or(false, |c| !c.is_ascii_digit());
    if !name.is_empty()
        && starts_with_letter
        && name.chars().all(is_name_char)
        && !is_reserved_word(name)
    {
        return Cow::Borrowed(name);
    }
    let mut owned: String = name.chars().filter(|&c| is_name_char(c)).collect();
    if owned.is_empty()
        || owned.starts_with(|c: char| c.is_ascii_digit())
        || is_reserved_word(&owned)
    {
        owned.insert(0, 'v');
    }
    Cow::Owned(owned)
}

/// Whether `needle` appears in the raw output of a solver
pub fn buf_contains(haystack: &[u8], needle: &str) -> bool {
    let needle = needle.as_bytes();
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_are_skipped() {
        let mut gen = UniqueNameGenerator::default();
        gen.reserve("obj");
        assert_eq!(gen.add_variable("obj"), "obj2");
        assert_eq!(gen.add_variable("a b"), "ab");
    }

    #[test]
    fn keywords_and_numbers_are_prefixed() {
        let mut gen = UniqueNameGenerator::default();
        assert_eq!(gen.add_variable("end"), "vend");
        assert_eq!(gen.add_variable("INF"), "vINF");
        assert_eq!(gen.add_variable("nan"), "vnan");
        assert_eq!(gen.add_variable("Infinity"), "vInfinity");
        assert_eq!(gen.add_variable("st"), "vst");
        assert_eq!(gen.add_variable("Generals"), "vGenerals");
        assert_eq!(gen.add_variable("free"), "vfree");
        assert_eq!(gen.add_variable("e"), "e");
        assert_eq!(gen.add_variable("ending"), "ending");
    }

    #[test]
    fn finds_needle_in_stdout() {
        assert!(buf_contains(b"Optimal solution found", "solution"));
        assert!(!buf_contains(b"Model is infeasible", "Optimal"));
    }
}
