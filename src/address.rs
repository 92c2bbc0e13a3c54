use core::fmt;

use sha2::{Digest, Sha256};

pub const ADDRESS_LENGTH: usize = 20;

/// Address of a registered entity: the low-order 20 bytes of the SHA-256 hash
/// of its canonical serialization.
/// Ordered bytewise, which is the same as ordering by the hex representation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub fn of(bytes: &[u8]) -> Self {
        Self::from_digest(Sha256::digest(bytes).as_slice())
    }

    /// Hash of the concatenation of the sorted `addresses`, independent of their order.
    pub fn of_set(addresses: &[Address]) -> Self {
        let mut sorted = addresses.to_vec();
        sorted.sort();
        let mut h = Sha256::new();
        for a in &sorted {
            h.update(a.0);
        }
        Self::from_digest(h.finalize().as_slice())
    }

    fn from_digest(digest: &[u8]) -> Self {
        let mut a = [0u8; ADDRESS_LENGTH];
        a.copy_from_slice(&digest[digest.len() - ADDRESS_LENGTH..]);
        Self(a)
    }

    pub fn bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// First bytes in hex, for one-line summaries.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..2])
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..4]))
    }
}

#[cfg(test)]
mod tests {
    use ark_std::rand::Rng;
    use ark_std::test_rng;

    use super::*;

    fn random_addresses(n: usize) -> Vec<Address> {
        let rng = &mut test_rng();
        (0..n).map(|_| Address(rng.gen())).collect()
    }

    #[test]
    fn sorting_matches_hex() {
        let mut addresses = random_addresses(10);
        addresses.sort();
        for w in addresses.windows(2) {
            assert!(w[0].to_string() <= w[1].to_string());
        }
    }

    #[test]
    fn set_address_is_permutation_invariant() {
        let addresses = random_addresses(5);
        let mut reversed = addresses.clone();
        reversed.reverse();
        assert_eq!(Address::of_set(&addresses), Address::of_set(&reversed));
        assert_ne!(Address::of_set(&addresses), Address::of_set(&addresses[1..]));
    }

    #[test]
    fn low_order_bytes() {
        let digest = Sha256::digest(b"abc");
        assert_eq!(Address::of(b"abc").bytes(), &digest[12..]);
    }
}
