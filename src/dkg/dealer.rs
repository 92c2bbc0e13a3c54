use core::fmt;
use std::collections::BTreeMap;

use ark_std::vec::Vec;

use crate::address::Address;
use crate::dkg::transcript::Dealing;
use crate::metrics::OpCounters;
use crate::randomness::Rand;
use crate::scalar::Seckey;
use crate::sharing::share_by_address;
use crate::state::Group;
use crate::variant::Variant;
use crate::vss::VerificationVector;
use crate::Error;

/// The sharing polynomial `f_i` of the dealer `i` for one group.
///
/// The coefficients are derived from the dealer's private seed and the group address,
/// `c_l = H(H(seed, group), l), l = 0,...,k-1`,
/// so a dealer deals the same polynomial every time it is asked to by the same group.
#[derive(Clone)]
pub struct Dealer {
    address: Address,
    coeffs: Vec<Seckey>,
}

impl Dealer {
    pub fn new<V: Variant>(address: Address, seed: &Rand, group: &Group<V>) -> Self {
        let gseed = seed.derive(group.address().bytes());
        let coeffs = (0..group.threshold())
            .map(|l| Seckey::from_rand(&gseed.derive_index(l)))
            .collect();
        Self { address, coeffs }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `f_i(0)`, the dealer's contribution to the group secret.
    /// A group has a positive threshold, so the polynomial has a constant term.
    pub fn secret(&self) -> Seckey {
        self.coeffs[0]
    }

    pub fn coeffs(&self) -> &[Seckey] {
        &self.coeffs
    }

    /// Commits to `f_i` and evaluates it at the id of every member.
    pub fn deal<V: Variant>(&self, group: &Group<V>, counters: &mut OpCounters) -> Result<Dealing<V>, Error> {
        let vvec = VerificationVector::commit(&self.coeffs);
        counters.pub_gen(self.coeffs.len());
        let shares = group.members().iter()
            .map(|member| {
                counters.sec_share(self.coeffs.len());
                share_by_address(&self.coeffs, member).map(|s| (*member, s))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(Dealing {
            group: group.address(),
            dealer: self.address,
            vvec,
            shares,
        })
    }
}

impl fmt::Debug for Dealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dealer")
            .field("address", &self.address)
            .field("degree", &(self.coeffs.len() - 1))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bls::Pubkey;
    use crate::sharing::recover_by_map;
    use crate::{MinPk, MinSig};

    fn addresses(n: u8) -> Vec<Address> {
        (1..=n).map(|i| Address::from([i; 20])).collect()
    }

    fn _deal<V: Variant>() {
        let group = Group::<V>::new(addresses(5), 3).unwrap();
        let seed = Rand::from_seed(b"dealer");
        let dealer = Dealer::new(Address::from([1; 20]), &seed, &group);
        assert_eq!(dealer.coeffs().len(), 3);

        let mut counters = OpCounters::default();
        let dealing = dealer.deal(&group, &mut counters).unwrap();
        assert_eq!(dealing.group, group.address());
        assert_eq!(dealing.shares.len(), 5);
        assert_eq!(dealing.vvec.public(), Some(&Pubkey::from_seckey(&dealer.secret())));
        for (member, share) in dealing.shares.iter() {
            dealing.vvec.verify_share(&dealing.dealer, member, share).unwrap();
        }
        assert_eq!(recover_by_map(&dealing.shares, 3).unwrap(), dealer.secret());
        assert_eq!((counters.sec_share_calls, counters.sec_share_len), (5, 15));
        assert_eq!(counters.pub_gen_calls, 3);
    }

    #[test]
    fn deal() {
        _deal::<MinSig>();
        _deal::<MinPk>();
    }

    #[test]
    // same seed and group give the same polynomial, another group gives another one
    fn derivation() {
        let seed = Rand::from_seed(b"dealer");
        let me = Address::from([1; 20]);
        let g1 = Group::<MinSig>::new(addresses(3), 2).unwrap();
        let g2 = Group::<MinSig>::new(addresses(4), 2).unwrap();
        assert_eq!(Dealer::new(me, &seed, &g1).coeffs(), Dealer::new(me, &seed, &g1).coeffs());
        assert_ne!(Dealer::new(me, &seed, &g1).secret(), Dealer::new(me, &seed, &g2).secret());
        assert_ne!(
            Dealer::new(me, &seed, &g1).secret(),
            Dealer::new(me, &Rand::from_seed(b"other"), &g1).secret()
        );
    }
}
