//! Reference list of known city names used by the 2014 city normalizer.
//!
//! The gazetteer is built once and passed by reference into the normalizer
//! that needs it, so tests can inject small fixture gazetteers.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::normalize::transliterate;

/// Case-insensitive lookup from any known spelling of a city to its
/// canonical ASCII lowercase name.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    names: HashMap<String, String>,
}

impl Gazetteer {
    /// Empty gazetteer: every lookup misses and callers fall back to the
    /// transliterated input.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `(canonical, alternates)` entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut gazetteer = Self::default();
        for (canonical, alternates) in entries {
            gazetteer.insert(canonical.as_ref(), alternates.iter().map(|s| s.as_ref()));
        }
        gazetteer
    }

    /// Load from a file with one city per line: the canonical name first,
    /// then optional comma-separated alternate spellings. Blank lines and
    /// lines starting with `#` are ignored.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::MissingRequiredFile {
                path: path.to_path_buf(),
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_path(path)?;

        let mut gazetteer = Self::default();
        for record in rdr.records() {
            let record = record?;
            let mut fields = record.iter().filter(|f| !f.is_empty());
            let Some(canonical) = fields.next() else {
                continue;
            };
            gazetteer.insert(canonical, fields);
        }

        info!(
            event = "gazetteer_loaded",
            path = %path.display(),
            spellings = gazetteer.len(),
            "Loaded gazetteer with {} spellings",
            gazetteer.len()
        );
        Ok(gazetteer)
    }

    fn insert<'a>(&mut self, canonical: &str, alternates: impl Iterator<Item = &'a str>) {
        let canonical_key = key(canonical);
        if canonical_key.is_empty() {
            return;
        }
        for alt in alternates {
            let alt_key = key(alt);
            if !alt_key.is_empty() {
                self.names.insert(alt_key, canonical_key.clone());
            }
        }
        self.names.insert(canonical_key.clone(), canonical_key);
    }

    /// Resolve a city name; `None` when the name is not known.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let found = self.names.get(&key(name)).map(String::as_str);
        if found.is_none() {
            debug!("City not in gazetteer: {}", name);
        }
        found
    }

    /// Number of known spellings (canonical names included).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn key(name: &str) -> String {
    transliterate(name).to_lowercase().trim().to_string()
}
