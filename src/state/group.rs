use core::fmt;
use std::collections::BTreeSet;

use crate::address::Address;
use crate::bls::Pubkey;
use crate::variant::Variant;
use crate::Error;

/// A threshold group as recorded on the chain.
///
/// Created with the member list and threshold but without a public key.
/// The key is attached exactly once, when the group's DKG completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group<V: Variant> {
    members: Vec<Address>,
    threshold: usize,
    public: Option<Pubkey<V>>,
}

impl<V: Variant> Group<V> {
    /// The members must be distinct and `1 <= threshold <= members.len()`.
    pub fn new(members: Vec<Address>, threshold: usize) -> Result<Self, Error> {
        let mut seen = BTreeSet::new();
        if let Some(m) = members.iter().find(|m| !seen.insert(**m)) {
            return Err(Error::DuplicateMember(*m));
        }
        if threshold == 0 || threshold > members.len() {
            return Err(Error::InvalidThreshold { threshold, members: members.len() });
        }
        Ok(Self { members, threshold, public: None })
    }

    /// Attaches the group public key.
    pub fn finalize(mut self, public: Pubkey<V>) -> Result<Self, Error> {
        if self.public.is_some() {
            return Err(Error::GroupFinalized(self.address()));
        }
        self.public = Some(public);
        Ok(self)
    }

    /// Hash of the sorted member addresses, so the order of the members doesn't matter.
    pub fn address(&self) -> Address {
        Address::of_set(&self.members)
    }

    pub fn members(&self) -> &[Address] {
        &self.members
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn pubkey(&self) -> Option<&Pubkey<V>> {
        self.public.as_ref()
    }

    pub fn is_finalized(&self) -> bool {
        self.public.is_some()
    }

    // TODO: require the group key to be individually signed by at least `threshold` members
    pub fn is_valid(&self) -> bool {
        self.is_finalized()
    }
}

impl<V: Variant> fmt::Display for Group<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self.members.iter()
            .map(|m| m.short())
            .collect::<Vec<_>>()
            .join(",");
        let public = self.public.map(|p| p.to_string()).unwrap_or_default();
        write!(f, "GrpR: (addr){} (pub){} (n){} (k){} (mem)[{}]",
               self.address().short(), public, self.members.len(), self.threshold, members)
    }
}

#[cfg(test)]
mod tests {
    use ark_std::rand::seq::SliceRandom;
    use ark_std::test_rng;

    use super::*;
    use crate::scalar::Seckey;
    use crate::MinSig;

    fn members(n: u8) -> Vec<Address> {
        (0..n).map(|i| Address::of(&[i])).collect()
    }

    #[test]
    fn address_is_permutation_invariant() {
        let rng = &mut test_rng();
        let m = members(5);
        let g = Group::<MinSig>::new(m.clone(), 3).unwrap();
        for _ in 0..5 {
            let mut shuffled = m.clone();
            shuffled.shuffle(rng);
            assert_eq!(Group::<MinSig>::new(shuffled, 3).unwrap().address(), g.address());
        }
        assert_ne!(Group::<MinSig>::new(members(4), 3).unwrap().address(), g.address());
    }

    #[test]
    fn threshold_bounds() {
        assert_eq!(
            Group::<MinSig>::new(members(3), 0),
            Err(Error::InvalidThreshold { threshold: 0, members: 3 })
        );
        assert!(Group::<MinSig>::new(members(3), 4).is_err());
        assert!(Group::<MinSig>::new(members(3), 3).is_ok());
    }

    #[test]
    fn members_are_distinct() {
        let m = members(3);
        let (a, b, c) = (m[0], m[1], m[2]);
        assert_eq!(
            Group::<MinSig>::new(vec![a, b, a, c], 3),
            Err(Error::DuplicateMember(a))
        );
        assert_eq!(Group::<MinSig>::new(vec![c, a, b], 3).unwrap().size(), 3);
    }

    #[test]
    fn finalized_once() {
        let g = Group::<MinSig>::new(members(3), 2).unwrap();
        assert!(!g.is_valid());
        let public = Pubkey::from_seckey(&Seckey::from_u64(1));
        let g = g.finalize(public).unwrap();
        assert!(g.is_valid());
        assert_eq!(g.pubkey(), Some(&public));
        let address = g.address();
        assert_eq!(g.finalize(public), Err(Error::GroupFinalized(address)));
    }
}
