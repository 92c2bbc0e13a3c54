use std::collections::BTreeMap;

use ark_std::vec::Vec;

use crate::address::Address;
use crate::scalar::{Id, Seckey};
use crate::utils::{horner, lagrange_coefficients_at_zero};
use crate::Error;

/// `(k, n)` Shamir secret sharing over the scalar field.
///
/// A secret is the constant term of a polynomial `f` of degree `k - 1` given by its coefficients `c_0, ..., c_{k-1}`.
/// The share of a participant is `f(id)`. Any `k` shares with distinct ids recover `f(0)`.

/// Evaluates the sharing polynomial `coeffs` at `id`.
pub fn share(coeffs: &[Seckey], id: &Id) -> Result<Seckey, Error> {
    let coeffs = coeffs.iter().map(|c| c.0).collect::<Vec<_>>();
    horner(&coeffs, id.0)
        .map(Seckey)
        .ok_or(Error::EmptyAggregation)
}

pub fn share_by_address(coeffs: &[Seckey], address: &Address) -> Result<Seckey, Error> {
    share(coeffs, &Id::from_address(address))
}

/// Lagrange interpolation at `0`: `sum(share_i * prod(id_j / (id_j - id_i), j != i))`.
///
/// `threshold` is the number of coefficients of the sharing polynomial.
/// Fewer shares than that would interpolate a wrong secret, so they are rejected.
/// Duplicate ids are rejected too.
pub fn recover(threshold: usize, shares: &[Seckey], ids: &[Id]) -> Result<Seckey, Error> {
    if shares.len() != ids.len() {
        return Err(Error::LengthMismatch(shares.len(), ids.len()));
    }
    if shares.is_empty() {
        return Err(Error::EmptyAggregation);
    }
    if shares.len() < threshold {
        return Err(Error::InsufficientShares { required: threshold, provided: shares.len() });
    }
    let xs = ids.iter().map(|id| id.0).collect::<Vec<_>>();
    let ls = lagrange_coefficients_at_zero(&xs)?;
    Ok(Seckey(shares.iter()
        .zip(ls)
        .map(|(s, l)| s.0 * l)
        .sum()))
}

/// Recovers from the first `k` shares in address order.
pub fn recover_by_map(shares: &BTreeMap<Address, Seckey>, k: usize) -> Result<Seckey, Error> {
    let (ids, shares): (Vec<_>, Vec<_>) = shares.iter()
        .take(k)
        .map(|(a, s)| (Id::from_address(a), *s))
        .unzip();
    recover(k, &shares, &ids)
}

/// Sum modulo `R`.
pub fn aggregate_seckeys(secs: &[Seckey]) -> Result<Seckey, Error> {
    if secs.is_empty() {
        return Err(Error::EmptyAggregation);
    }
    Ok(Seckey(secs.iter().map(|s| s.0).sum()))
}
