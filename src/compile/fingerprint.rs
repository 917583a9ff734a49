use std::fmt;

use xxhash_rust::xxh3::Xxh3;

use crate::compile::artifacts::ArtifactSet;

const XXH3_SEED: u64 = 0x3c6e_f372_fe94_f82b;

/// Stable 128-bit identity of a whole artifact set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArtifactFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl fmt::Display for ArtifactFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Hash every artifact as (path, length, bytes) in path order.
pub fn fingerprint_artifacts(set: &ArtifactSet) -> ArtifactFingerprint {
    let mut h = StableHasher::new();
    h.write_u64(set.len() as u64);
    for (path, bytes) in set.iter() {
        h.write_str(path);
        h.write_u64(bytes.len() as u64);
        h.write_bytes(bytes);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> ArtifactFingerprint {
        let v = self.inner.digest128();
        ArtifactFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
