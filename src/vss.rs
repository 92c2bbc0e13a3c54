use ark_std::vec::Vec;

use crate::address::Address;
use crate::bls::Pubkey;
use crate::scalar::{Id, Seckey};
use crate::utils::horner;
use crate::variant::Variant;
use crate::Error;

/// Feldman verifiable secret sharing.
///
/// The verification vector of a sharing polynomial `f` is `C_i = c_i.g, i = 0,...,k-1`,
/// i.e. the public keys of its coefficients. By homomorphism, `f(id).g` can be computed from the vector alone,
/// so a receiver checks its share without learning anything about the other shares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationVector<V: Variant>(Vec<Pubkey<V>>);

impl<V: Variant> VerificationVector<V> {
    /// Commits to the coefficients `c_0,...,c_{k-1}`.
    pub fn commit(coeffs: &[Seckey]) -> Self {
        Self(coeffs.iter().map(Pubkey::from_seckey).collect())
    }

    /// The number of coefficients, i.e. the threshold.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn commitments(&self) -> &[Pubkey<V>] {
        &self.0
    }

    /// `C_0`, the public key of the dealt secret.
    pub fn public(&self) -> Option<&Pubkey<V>> {
        self.0.first()
    }

    /// `f(id).g` evaluated in the public key group by Horner's rule.
    pub fn share_pubkey(&self, id: &Id) -> Result<Pubkey<V>, Error> {
        let points = self.0.iter().map(|p| p.0).collect::<Vec<_>>();
        horner(&points, id.0)
            .map(Pubkey)
            .ok_or(Error::EmptyAggregation)
    }

    /// Checks a share received by `receiver` from `dealer`.
    pub fn verify_share(&self, dealer: &Address, receiver: &Address, share: &Seckey) -> Result<(), Error> {
        let expected = self.share_pubkey(&Id::from_address(receiver))?;
        if expected != Pubkey::from_seckey(share) {
            return Err(Error::ShareMismatch { dealer: *dealer, receiver: *receiver });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ark_bls12_381::Fr;
    use ark_std::{test_rng, UniformRand};

    use super::*;
    use crate::sharing::{share, share_by_address};
    use crate::{MinPk, MinSig};

    fn _shares_match_commitments<V: Variant>() {
        let rng = &mut test_rng();
        let coeffs = (0..3).map(|_| Seckey(Fr::rand(rng))).collect::<Vec<_>>();
        let vvec = VerificationVector::<V>::commit(&coeffs);
        assert_eq!(vvec.len(), 3);
        assert_eq!(vvec.public(), Some(&Pubkey::from_seckey(&coeffs[0])));

        for i in 1..6 {
            let id = Id::from_u64(i);
            let s = share(&coeffs, &id).unwrap();
            assert_eq!(vvec.share_pubkey(&id).unwrap(), Pubkey::from_seckey(&s));
        }

        let (dealer, receiver) = (Address::from([1; 20]), Address::from([2; 20]));
        let s = share_by_address(&coeffs, &receiver).unwrap();
        assert_eq!(vvec.verify_share(&dealer, &receiver, &s), Ok(()));
        assert_eq!(
            vvec.verify_share(&dealer, &receiver, &s.add(&Seckey::from_u64(1))),
            Err(Error::ShareMismatch { dealer, receiver })
        );
        // a share for somebody else
        assert!(vvec.verify_share(&dealer, &dealer, &s).is_err());
    }

    #[test]
    fn shares_match_commitments() {
        _shares_match_commitments::<MinSig>();
        _shares_match_commitments::<MinPk>();
    }

    #[test]
    fn empty_vector() {
        let vvec = VerificationVector::<MinSig>::commit(&[]);
        assert!(vvec.is_empty());
        assert_eq!(vvec.share_pubkey(&Id::from_u64(1)), Err(Error::EmptyAggregation));
    }
}
