//! Navigation targets for Pokémon pages.

use std::fmt;

/// Path prefix of Pokémon pages.
const POKEMON_PATH: &str = "/pokemon";

/// The destination page for a selected candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationTarget {
    /// The unescaped identifier the target was built from.
    identifier: String,
    /// The escaped path, e.g. `/pokemon/mr%20mime`.
    path: String,
}

impl NavigationTarget {
    /// Target for a Pokémon identifier; the identifier is escaped as a
    /// single path segment.
    pub fn pokemon(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let path = format!("{}/{}", POKEMON_PATH, urlencoding::encode(&identifier));
        Self { identifier, path }
    }

    /// Target for a plain search form submission.
    ///
    /// The query is trimmed and lowercased; an empty query submits nothing.
    pub fn from_search(query: &str) -> Option<Self> {
        let name = query.trim().to_lowercase();
        if name.is_empty() {
            None
        } else {
            Some(Self::pokemon(name))
        }
    }

    /// The unescaped identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The escaped path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
