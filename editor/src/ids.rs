//! Entity identifiers and the generator that mints them.

#[cfg(test)]
#[path = "ids_test.rs"]
mod ids_test;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 4;

/// Unique identifier shared by primitives and connections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Mints ids of the form `<prefix>_<counter>_<suffix>`.
///
/// The counter is monotonic per generator; the four-character base-36 suffix
/// keeps ids from independently created scenes from colliding.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next id for an entity of the given kind prefix.
    pub fn next(&mut self, prefix: &str) -> EntityId {
        self.counter += 1;
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())]))
            .collect();
        EntityId(format!("{prefix}_{:03}_{suffix}", self.counter))
    }

    /// Advance the counter past an id minted by another generator, so ids
    /// loaded from a snapshot are never minted again.
    pub fn observe(&mut self, id: &EntityId) {
        if let Some(Ok(counter)) = id.0.rsplit('_').nth(1).map(str::parse::<u64>) {
            self.counter = self.counter.max(counter);
        }
    }

    /// Restart the counter. Only called when the whole scene is cleared.
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
