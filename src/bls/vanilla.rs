use core::fmt;

use ark_ec::PrimeGroup;
use ark_serialize::CanonicalDeserialize;
use ark_std::Zero;

use crate::address::Address;
use crate::bls::to_bytes;
use crate::randomness::Rand;
use crate::scalar::Seckey;
use crate::variant::Variant;
use crate::Error;

/// A BLS public key `sk.g`, in the public key group of the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pubkey<V: Variant>(pub(crate) V::Public);

/// A BLS signature `sk.H(m)`, in the signature group of the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Signature<V: Variant>(pub(crate) V::Signature);

impl<V: Variant> Pubkey<V> {
    pub fn from_seckey(sec: &Seckey) -> Self {
        Self(V::Public::generator() * sec.0)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        V::Public::deserialize_compressed(bytes)
            .map(Self)
            .map_err(|e| Error::MalformedKey(e.to_string()))
    }

    /// Compressed point encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        to_bytes(&self.0)
    }

    pub fn address(&self) -> Address {
        Address::of(&self.to_bytes())
    }

    /// Homomorphic aggregation.
    pub fn add(&self, other: &Self) -> Self {
        Self(self.0 + other.0)
    }

    /// The point at infinity is never a valid key.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn verify(&self, msg: &[u8], sig: &Signature<V>) -> bool {
        sig.verify(self, msg)
    }
}

impl<V: Variant> Signature<V> {
    /// Signs `msg` under the message domain separation tag.
    pub fn sign(sec: &Seckey, msg: &[u8]) -> Result<Self, Error> {
        Self::sign_with(V::MESSAGE, sec, msg)
    }

    pub(crate) fn sign_with(dst: &[u8], sec: &Seckey, msg: &[u8]) -> Result<Self, Error> {
        let hm = V::hash_to_signature(dst, msg)?;
        Ok(Self(hm * sec.0))
    }

    pub fn verify(&self, public: &Pubkey<V>, msg: &[u8]) -> bool {
        self.verify_with(V::MESSAGE, public, msg)
    }

    pub(crate) fn verify_with(&self, dst: &[u8], public: &Pubkey<V>, msg: &[u8]) -> bool {
        if public.is_zero() {
            return false;
        }
        match V::hash_to_signature(dst, msg) {
            Ok(hm) => V::verify(&public.0, &hm, &self.0),
            Err(_) => false,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        V::Signature::deserialize_compressed(bytes)
            .map(Self)
            .map_err(|e| Error::MalformedKey(e.to_string()))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        to_bytes(&self.0)
    }

    /// The randomness carried by the signature, `H(bytes)`.
    pub fn rand(&self) -> Rand {
        Rand::from_seed(&self.to_bytes())
    }

    pub fn add(&self, other: &Self) -> Self {
        Self(self.0 + other.0)
    }
}

/// Sums the keys; an empty list has no aggregate.
pub fn aggregate_pubkeys<V: Variant>(pubs: &[Pubkey<V>]) -> Result<Pubkey<V>, Error> {
    if pubs.is_empty() {
        return Err(Error::EmptyAggregation);
    }
    Ok(Pubkey(pubs.iter().map(|p| p.0).sum()))
}

/// Sums the signatures; an empty list has no aggregate.
pub fn aggregate_sigs<V: Variant>(sigs: &[Signature<V>]) -> Result<Signature<V>, Error> {
    if sigs.is_empty() {
        return Err(Error::EmptyAggregation);
    }
    Ok(Signature(sigs.iter().map(|s| s.0).sum()))
}

/// Verifies an aggregate of signatures on the same message against the aggregate of the keys.
pub fn verify_aggregate_sig<V: Variant>(pubs: &[Pubkey<V>], msg: &[u8], asig: &Signature<V>) -> Result<bool, Error> {
    let apub = aggregate_pubkeys(pubs)?;
    Ok(asig.verify(&apub, msg))
}

/// Verifies signatures on the same message at the cost of a single pairing check.
/// Keys must come with verified proofs of possession.
pub fn batch_verify<V: Variant>(pubs: &[Pubkey<V>], msg: &[u8], sigs: &[Signature<V>]) -> Result<bool, Error> {
    if pubs.len() != sigs.len() {
        return Err(Error::LengthMismatch(sigs.len(), pubs.len()));
    }
    verify_aggregate_sig(pubs, msg, &aggregate_sigs(sigs)?)
}

impl<V: Variant> fmt::Display for Pubkey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.to_bytes()[..4]))
    }
}

impl<V: Variant> fmt::Display for Signature<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.to_bytes()[..4]))
    }
}

#[cfg(test)]
mod tests {
    use ark_std::{test_rng, UniformRand};

    use super::*;
    use crate::{MinPk, MinSig};

    fn random_seckey() -> Seckey {
        Seckey(ark_bls12_381::Fr::rand(&mut test_rng()))
    }

    fn _round_trip<V: Variant>() {
        let sec = random_seckey();
        let public = Pubkey::<V>::from_seckey(&sec);
        let sig = Signature::<V>::sign(&sec, b"hi").unwrap();
        assert!(sig.verify(&public, b"hi"));
        assert!(public.verify(b"hi", &sig));
        assert!(!sig.verify(&public, b"ho"));
        assert!(!sig.verify(&Pubkey::from_seckey(&sec.add(&sec)), b"hi"));

        assert_eq!(Pubkey::<V>::from_bytes(&public.to_bytes()).unwrap(), public);
        assert_eq!(Signature::<V>::from_bytes(&sig.to_bytes()).unwrap(), sig);
        assert!(matches!(Pubkey::<V>::from_bytes(&[1, 2, 3]), Err(Error::MalformedKey(_))));
        assert_eq!(sig.rand(), Rand::from_seed(&sig.to_bytes()));
    }

    #[test]
    fn round_trip() {
        _round_trip::<MinSig>();
        _round_trip::<MinPk>();
    }

    fn _aggregation<V: Variant>() {
        let (sec1, sec2) = (Seckey::from_u64(5), Seckey::from_u64(11));
        let pubs = [Pubkey::<V>::from_seckey(&sec1), Pubkey::from_seckey(&sec2)];
        let sigs = [Signature::<V>::sign(&sec1, b"hi").unwrap(), Signature::sign(&sec2, b"hi").unwrap()];
        let asig = aggregate_sigs(&sigs).unwrap();
        assert!(verify_aggregate_sig(&pubs, b"hi", &asig).unwrap());
        assert!(batch_verify(&pubs, b"hi", &sigs).unwrap());
        assert!(!batch_verify(&pubs, b"ho", &sigs).unwrap());
        assert_eq!(asig, Signature::sign(&sec1.add(&sec2), b"hi").unwrap());
        assert_eq!(aggregate_pubkeys(&pubs).unwrap(), Pubkey::from_seckey(&sec1.add(&sec2)));

        assert_eq!(aggregate_pubkeys::<V>(&[]), Err(Error::EmptyAggregation));
        assert_eq!(aggregate_sigs::<V>(&[]), Err(Error::EmptyAggregation));
        assert_eq!(batch_verify(&pubs[..1], b"hi", &sigs), Err(Error::LengthMismatch(2, 1)));
    }

    #[test]
    fn aggregation() {
        _aggregation::<MinSig>();
        _aggregation::<MinPk>();
    }

    #[test]
    fn zero_key_never_verifies() {
        let zero = Seckey::default();
        let sig = Signature::<MinSig>::sign(&zero, b"hi").unwrap();
        assert!(!sig.verify(&Pubkey::from_seckey(&zero), b"hi"));
    }
}
