use std::collections::{BTreeSet, HashMap};

/// Declared names with a fixed import statement.
const SPECIAL_IMPORTS: &[(&str, &str)] = &[
    ("time.sleep", "from time import sleep"),
    ("datetime", "from datetime import datetime"),
    ("math", "import math"),
    ("random", "import random"),
    ("os", "import os"),
    ("sys", "import sys"),
];

/// Names declared in `packages:` sections, kept sorted for deterministic output.
pub type ImportSet = BTreeSet<String>;

/// Map a declared dotted name to a Python import statement.
///
/// `a` -> `import a`, `a.b` -> `from a import b`, `a.b.c` -> `from a.b import c`.
/// A trailing `as alias` is carried onto the imported name.
pub fn resolve(name: &str) -> String {
    let name = name.trim();
    if let Some((_, statement)) = SPECIAL_IMPORTS.iter().find(|(n, _)| *n == name) {
        return statement.to_string();
    }

    let (path, alias) = match name.split_once(" as ") {
        Some((path, alias)) => (path.trim(), Some(alias.trim())),
        None => (name, None),
    };
    let alias = alias.map(|a| format!(" as {}", a)).unwrap_or_default();

    match path.rsplit_once('.') {
        None => format!("import {}{}", path, alias),
        Some((module, item)) => format!("from {} import {}{}", module, item, alias),
    }
}

/// Resolver with an optional per-run memo of already resolved names.
#[derive(Debug)]
pub struct ImportResolver {
    cache: Option<HashMap<String, String>>,
}

impl ImportResolver {
    pub fn new(cache: bool) -> Self {
        ImportResolver {
            cache: cache.then(HashMap::new),
        }
    }

    pub fn resolve(&mut self, name: &str) -> String {
        let Some(cache) = self.cache.as_mut() else {
            return resolve(name);
        };
        cache
            .entry(name.to_string())
            .or_insert_with(|| resolve(name))
            .clone()
    }

    /// Resolve every declared name, in the set's order.
    pub fn resolve_all(&mut self, imports: &ImportSet) -> Vec<String> {
        imports.iter().map(|name| self.resolve(name)).collect()
    }
}
