use std::collections::BTreeMap;

use ark_bls12_381::Fr;
use ark_ec::CurveGroup;

use crate::address::Address;
use crate::bls::vanilla::{Pubkey, Signature};
use crate::scalar::Id;
use crate::utils::lagrange_coefficients_at_zero;
use crate::variant::Variant;
use crate::Error;

/// Lagrange interpolation at `0` in a group: `sum(L_j(0).p_j)`.
/// Valid for points that are evaluations of a committed polynomial of degree `< threshold`,
/// e.g. signature shares, since signing is linear in the secret.
pub(crate) fn recover_points<G: CurveGroup<ScalarField=Fr>>(threshold: usize, points: &[G], ids: &[Id]) -> Result<G, Error> {
    if points.len() != ids.len() {
        return Err(Error::LengthMismatch(points.len(), ids.len()));
    }
    if points.is_empty() {
        return Err(Error::EmptyAggregation);
    }
    if points.len() < threshold {
        return Err(Error::InsufficientShares { required: threshold, provided: points.len() });
    }
    let xs = ids.iter().map(|id| id.0).collect::<Vec<_>>();
    let ls = lagrange_coefficients_at_zero(&xs)?;
    Ok(points.iter()
        .zip(ls)
        .map(|(&p, l)| p * l)
        .sum())
}

/// Recovers the group signature from at least `threshold` signature shares.
/// The result doesn't depend on the subset of shares used.
pub fn recover_signature<V: Variant>(threshold: usize, sigs: &[Signature<V>], ids: &[Id]) -> Result<Signature<V>, Error> {
    let points = sigs.iter().map(|s| s.0).collect::<Vec<_>>();
    recover_points(threshold, &points, ids).map(Signature)
}

/// Recovers from the first `k` shares in address order.
pub fn recover_signature_by_map<V: Variant>(sigs: &BTreeMap<Address, Signature<V>>, k: usize) -> Result<Signature<V>, Error> {
    let (ids, sigs): (Vec<_>, Vec<_>) = sigs.iter()
        .take(k)
        .map(|(a, s)| (Id::from_address(a), *s))
        .unzip();
    recover_signature(k, &sigs, &ids)
}

/// Recovers the public key behind public key shares, e.g. the group key from the members' share keys.
pub fn recover_pubkey<V: Variant>(threshold: usize, pubs: &[Pubkey<V>], ids: &[Id]) -> Result<Pubkey<V>, Error> {
    let points = pubs.iter().map(|p| p.0).collect::<Vec<_>>();
    recover_points(threshold, &points, ids).map(Pubkey)
}

#[cfg(test)]
mod tests {
    use ark_std::{test_rng, UniformRand};

    use super::*;
    use crate::scalar::Seckey;
    use crate::sharing::share;
    use crate::{MinPk, MinSig};

    fn _subset_independence<V: Variant>() {
        let rng = &mut test_rng();
        let (n, t) = (5, 3);

        let poly = (0..t).map(|_| Seckey(Fr::rand(rng))).collect::<Vec<_>>();
        let ids = (1..=n).map(|i| Id::from_u64(i as u64 * 7)).collect::<Vec<_>>();
        let shares = ids.iter().map(|id| share(&poly, id).unwrap()).collect::<Vec<_>>();
        let sigs = shares.iter()
            .map(|s| Signature::<V>::sign(s, b"beacon").unwrap())
            .collect::<Vec<_>>();

        let expected = Signature::<V>::sign(&poly[0], b"beacon").unwrap();
        let group_key = Pubkey::<V>::from_seckey(&poly[0]);
        for subset in [[0, 1, 2], [2, 3, 4], [4, 0, 2], [1, 3, 4]] {
            let sigs = subset.iter().map(|&j| sigs[j]).collect::<Vec<_>>();
            let ids = subset.iter().map(|&j| ids[j]).collect::<Vec<_>>();
            let sig = recover_signature(t, &sigs, &ids).unwrap();
            assert_eq!(sig.to_bytes(), expected.to_bytes());
            assert!(sig.verify(&group_key, b"beacon"));
        }

        let pubs = shares.iter().map(Pubkey::<V>::from_seckey).collect::<Vec<_>>();
        assert_eq!(recover_pubkey(t, &pubs[1..4], &ids[1..4]).unwrap(), group_key);

        assert_eq!(
            recover_signature(t, &sigs[..2], &ids[..2]),
            Err(Error::InsufficientShares { required: 3, provided: 2 })
        );
        assert_eq!(
            recover_signature(t, &[sigs[0], sigs[1], sigs[2]], &[ids[0], ids[1], ids[0]]),
            Err(Error::DuplicateId)
        );
        assert_eq!(recover_signature(t, &sigs[..3], &ids[..2]), Err(Error::LengthMismatch(3, 2)));
    }

    #[test]
    fn subset_independence() {
        _subset_independence::<MinSig>();
        _subset_independence::<MinPk>();
    }

    #[test]
    fn by_map() {
        let poly = [Seckey::from_u64(3), Seckey::from_u64(9)];
        let sigs = (0u8..4)
            .map(|i| {
                let a = Address::from([i + 1; 20]);
                (a, Signature::<MinSig>::sign(&share(&poly, &Id::from_address(&a)).unwrap(), b"m").unwrap())
            })
            .collect::<BTreeMap<_, _>>();
        let sig = recover_signature_by_map(&sigs, 2).unwrap();
        assert_eq!(sig, Signature::sign(&poly[0], b"m").unwrap());
        assert!(recover_signature_by_map(&sigs, 5).is_err());
    }
}
