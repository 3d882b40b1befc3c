use std::collections::HashMap;

use klaro_types::{AUTO_DETECT, Language};
use unicode_normalization::UnicodeNormalization;

/// Languages offered by the tool, in listing order.
///
/// Display names are derived from `use_english_names` at lookup time, so a
/// mode switch is visible to the very next [`Catalog::resolve`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    languages: Vec<Language>,
    use_english_names: bool,
}

impl Catalog {
    pub fn new(languages: Vec<Language>, use_english_names: bool) -> Self {
        Self {
            languages,
            use_english_names,
        }
    }

    pub fn use_english_names(&self) -> bool {
        self.use_english_names
    }

    pub fn set_use_english_names(&mut self, value: bool) {
        self.use_english_names = value;
    }

    /// Swap in a freshly fetched listing, keeping the display mode
    pub fn replace(&mut self, languages: Vec<Language>) {
        self.languages = languages;
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Names for the current mode, "Auto detect" first
    pub fn display_names(&self) -> Vec<String> {
        std::iter::once(AUTO_DETECT)
            .chain(
                self.languages
                    .iter()
                    .map(|l| l.display_name(self.use_english_names)),
            )
            .map(str::to_string)
            .collect()
    }

    /// Code for a display name. "Auto detect" and unknown names yield `None`.
    pub fn resolve(&self, display_name: &str) -> Option<&str> {
        if is_auto_detect(display_name) {
            return None;
        }

        let wanted = normalize_name(display_name);
        self.languages
            .iter()
            .find(|l| normalize_name(l.display_name(self.use_english_names)) == wanted)
            .map(|l| l.code.as_str())
    }

    /// Display names shared by more than one entry in the current mode
    pub fn duplicate_display_names(&self) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for lang in &self.languages {
            let name = normalize_name(lang.display_name(self.use_english_names));
            let count = seen.entry(name).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(lang.display_name(self.use_english_names).to_string());
            }
        }

        duplicates
    }
}

pub fn is_auto_detect(display_name: &str) -> bool {
    display_name.trim() == AUTO_DETECT
}

fn normalize_name(name: &str) -> String {
    name.trim().nfc().collect()
}
