// WHY: Pure pronoun lookup isolated from the replacement engine so the table
// can be constructed once per run and shared read-only across files

use crate::span::PronounCase;
use std::collections::HashMap;

/// One pronoun table entry: neutral replacement plus the grammatical cases
/// the surface form can legitimately carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PronounEntry {
    pub neutral_form: String,
    pub applies_to_cases: Vec<PronounCase>,
}

impl PronounEntry {
    fn new(neutral_form: &str, applies_to_cases: &[PronounCase]) -> Self {
        Self {
            neutral_form: neutral_form.to_string(),
            applies_to_cases: applies_to_cases.to_vec(),
        }
    }
}

/// Immutable surface-form → neutral-form mapping, case-insensitive
///
/// The default table mirrors the standard gendered-pronoun set; honorifics
/// (mr., mrs., ms.) map to the empty string and are removed from output.
/// Callers may layer an override table that wins entry-by-entry.
#[derive(Debug, Clone)]
pub struct PronounMapper {
    entries: HashMap<String, PronounEntry>,
}

impl PronounMapper {
    /// Build the mapper with the built-in table only
    pub fn new() -> Self {
        Self {
            entries: default_table(),
        }
    }

    /// Build the mapper with caller overrides merged over the default table
    /// WHY: override precedence is entry-by-entry, not whole-table replacement
    pub fn with_overrides(overrides: HashMap<String, PronounEntry>) -> Self {
        let mut entries = default_table();
        for (surface, entry) in overrides {
            entries.insert(surface.to_lowercase(), entry);
        }
        Self { entries }
    }

    /// Resolve a pronoun surface form to its neutral replacement
    ///
    /// Returns `None` for unknown surface forms, and for known forms used in
    /// a grammatical case the entry does not cover; the caller passes the
    /// original text through unchanged and records a possible miss.
    pub fn lookup(&self, surface: &str, case: Option<PronounCase>) -> Option<&str> {
        let entry = self.entries.get(&surface.to_lowercase())?;
        match case {
            Some(c) if !entry.applies_to_cases.contains(&c) => None,
            _ => Some(&entry.neutral_form),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PronounMapper {
    fn default() -> Self {
        Self::new()
    }
}

fn default_table() -> HashMap<String, PronounEntry> {
    use PronounCase::*;

    let mut table = HashMap::new();
    let mut add = |surface: &str, neutral: &str, cases: &[PronounCase]| {
        table.insert(surface.to_string(), PronounEntry::new(neutral, cases));
    };

    add("he", "HE/SHE", &[Subject]);
    add("him", "HIM/HER", &[Object]);
    add("his", "HIS/HER", &[PossessiveDeterminer, PossessivePronoun]);
    add("himself", "HIMSELF/HERSELF", &[Reflexive]);
    add("she", "HE/SHE", &[Subject]);
    add("her", "HIM/HER", &[Object, PossessiveDeterminer]);
    add("hers", "HIS/HERS", &[PossessivePronoun]);
    add("herself", "HIMSELF/HERSELF", &[Reflexive]);
    // Honorifics are deleted outright
    add("mr.", "", &[Subject, Object]);
    add("mrs.", "", &[Subject, Object]);
    add("ms.", "", &[Subject, Object]);

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        let mapper = PronounMapper::new();
        assert_eq!(mapper.lookup("he", Some(PronounCase::Subject)), Some("HE/SHE"));
        assert_eq!(mapper.lookup("He", Some(PronounCase::Subject)), Some("HE/SHE"));
        assert_eq!(mapper.lookup("HE", Some(PronounCase::Subject)), Some("HE/SHE"));
    }

    #[test]
    fn test_lookup_without_case_attribute() {
        let mapper = PronounMapper::new();
        // No case attribute means any case is acceptable
        assert_eq!(mapper.lookup("himself", None), Some("HIMSELF/HERSELF"));
        assert_eq!(mapper.lookup("hers", None), Some("HIS/HERS"));
    }

    #[test]
    fn test_lookup_rejects_wrong_case() {
        let mapper = PronounMapper::new();
        assert_eq!(mapper.lookup("he", Some(PronounCase::Object)), None);
        assert_eq!(mapper.lookup("hers", Some(PronounCase::Subject)), None);
    }

    #[test]
    fn test_unknown_surface_form() {
        let mapper = PronounMapper::new();
        assert_eq!(mapper.lookup("they", Some(PronounCase::Subject)), None);
        assert_eq!(mapper.lookup("xe", None), None);
    }

    #[test]
    fn test_honorifics_map_to_empty() {
        let mapper = PronounMapper::new();
        assert_eq!(mapper.lookup("Mr.", None), Some(""));
        assert_eq!(mapper.lookup("mrs.", None), Some(""));
    }

    #[test]
    fn test_override_precedence() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "he".to_string(),
            PronounEntry::new("THEY", &[PronounCase::Subject]),
        );
        let mapper = PronounMapper::with_overrides(overrides);

        // Overridden entry wins
        assert_eq!(mapper.lookup("he", Some(PronounCase::Subject)), Some("THEY"));
        // Untouched entries keep their defaults
        assert_eq!(mapper.lookup("she", Some(PronounCase::Subject)), Some("HE/SHE"));
    }

    #[test]
    fn test_override_key_normalized_to_lowercase() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "SHE".to_string(),
            PronounEntry::new("THEY", &[PronounCase::Subject]),
        );
        let mapper = PronounMapper::with_overrides(overrides);
        assert_eq!(mapper.lookup("she", Some(PronounCase::Subject)), Some("THEY"));
    }
}
