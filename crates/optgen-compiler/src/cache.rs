/// Parsed option lists, cached for one generation run
///
/// Entries are keyed by an input id such as `rc:close_window` or
/// `kitten:icat` and remember the spec text they were parsed from. A lookup
/// whose text differs from the cached text reparses and replaces the entry.
/// Nothing is persisted between runs.

use crate::error::{CompileError, Result};
use optgen_spec::{parse_options, OptionSpec};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Default)]
pub struct OptionCache {
    entries: HashMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    text: String,
    options: Rc<[OptionSpec]>,
}

impl OptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the options cached under `key`, parsing `spec` unless it is
    /// the text the entry was parsed from
    pub fn get_or_parse(&mut self, key: &str, spec: &str) -> Result<Rc<[OptionSpec]>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.text == spec {
                trace!(key, "option cache hit");
                return Ok(Rc::clone(&entry.options));
            }
            trace!(key, "option spec changed, reparsing");
        }
        let options: Rc<[OptionSpec]> = parse_options(spec)
            .map_err(|e| CompileError::parse(format!("options of {}", key), e))?
            .into_options()
            .into();
        self.entries.insert(
            key.to_string(),
            Entry {
                text: spec.to_string(),
                options: Rc::clone(&options),
            },
        );
        Ok(options)
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
