use core::fmt;

use sha2::{Digest, Sha256};

/// Length of [`Rand`] in bytes.
pub const RAND_LENGTH: usize = 32;

/// Hierarchically derived pseudo-randomness.
///
/// A `Rand` is never mutated: every derivation produces a new value `H(r || label)` with SHA-256.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rand([u8; RAND_LENGTH]);

impl Rand {
    /// One-way hash of arbitrary input.
    pub fn from_seed(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    pub fn bytes(&self) -> &[u8; RAND_LENGTH] {
        &self.0
    }

    /// `r' = H(r || label)`
    pub fn derive(&self, label: &[u8]) -> Self {
        let mut h = Sha256::new();
        h.update(self.0);
        h.update(label);
        Self(h.finalize().into())
    }

    /// Derives along a path of string labels.
    pub fn derive_str(&self, labels: &[&str]) -> Self {
        labels.iter()
            .fold(*self, |r, label| r.derive(label.as_bytes()))
    }

    /// Derives by the decimal representation of `i`.
    pub fn derive_index(&self, i: usize) -> Self {
        self.derive(i.to_string().as_bytes())
    }

    /// Interprets the bytes as a big-endian unsigned integer and reduces it modulo `n`.
    /// The result is slightly biased unless `n` divides `2^256`.
    ///
    /// # Panics
    ///
    /// If `n` is `0`.
    pub fn modulo(&self, n: usize) -> usize {
        assert!(n > 0, "modulo zero");
        let n = n as u128;
        // 256 * n fits in u128 for any usize n
        let r = self.0.iter()
            .fold(0u128, |acc, &b| ((acc << 8) | b as u128) % n);
        r as usize
    }

    /// The first `k` entries of a partial Fisher-Yates shuffle of `0..n`.
    /// At step `i` position `i` is swapped with `j = modulo(derive_index(i), n - i) + i`.
    ///
    /// # Panics
    ///
    /// If `k > n`.
    pub fn random_perm(&self, n: usize, k: usize) -> Vec<usize> {
        assert!(k <= n, "{} out of {}", k, n);
        let mut l: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = self.derive_index(i).modulo(n - i) + i;
            l.swap(i, j);
        }
        l.truncate(k);
        l
    }
}

impl From<[u8; RAND_LENGTH]> for Rand {
    fn from(bytes: [u8; RAND_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Rand {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Rand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Rand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rand({})", hex::encode(&self.0[..4]))
    }
}
