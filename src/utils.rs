use core::ops::{Add, Mul};

use ark_ff::Field;
use ark_std::vec::Vec;

use crate::Error;

/// Utilities for polynomial evaluation and Lagrange interpolation over arbitrary sets of points.

/// Evaluates `c_0 + c_1.x + ... + c_{k-1}.x^{k-1}` by Horner's rule, from the highest coefficient down.
/// The coefficients may live in any module over `F`, so the same code evaluates
/// secret polynomials and their commitments.
pub fn horner<F: Field, T>(coeffs: &[T], x: F) -> Option<T>
    where T: Copy + Mul<F, Output=T> + Add<Output=T>
{
    let (&last, rest) = coeffs.split_last()?;
    Some(rest.iter().rev()
        .fold(last, |acc, &ci| acc * x + ci))
}

/// Evaluates the Lagrange basis polynomials over the set `x_1, ..., x_n` at `0`.
/// Returns `L_j(0) = prod(x_k / (x_k - x_j), k != j), j = 1,...,n`.
/// Fails if `x_j = x_k` for `j != k`.
pub fn lagrange_coefficients_at_zero<F: Field>(xs: &[F]) -> Result<Vec<F>, Error> {
    let mut nums = Vec::with_capacity(xs.len());
    let mut dens = Vec::with_capacity(xs.len());
    for (j, xj) in xs.iter().enumerate() {
        let mut num = F::one();
        let mut den = F::one();
        for (k, xk) in xs.iter().enumerate() {
            if k != j {
                num *= xk;
                den *= *xk - xj;
            }
        }
        if den.is_zero() {
            return Err(Error::DuplicateId);
        }
        nums.push(num);
        dens.push(den);
    }
    ark_ff::batch_inversion(&mut dens);
    Ok(nums.into_iter()
        .zip(dens)
        .map(|(num, den_inv)| num * den_inv)
        .collect())
}

#[cfg(test)]
mod tests {
    use ark_poly::univariate::DensePolynomial;
    use ark_poly::{DenseUVPolynomial, Polynomial};
    use ark_std::test_rng;
    use ark_std::UniformRand;

    use super::*;

    type Fr = ark_bls12_381::Fr;

    #[test]
    fn horner_matches_dense_polynomial() {
        let rng = &mut test_rng();

        let p = DensePolynomial::<Fr>::rand(4, rng);
        let x = Fr::rand(rng);
        assert_eq!(horner(&p.coeffs, x), Some(p.evaluate(&x)));
        assert_eq!(horner::<Fr, Fr>(&[], x), None);
    }

    #[test]
    // p(0) = p(x_1).L_1(0) + ... + p(x_n).L_n(0), if deg(p) < n
    fn over_random_set() {
        let rng = &mut test_rng();

        let n = 7;
        let xs = (0..n)
            .map(|_| Fr::rand(rng))
            .collect::<Vec<_>>();
        let p = DensePolynomial::rand(n - 1, rng);
        let ys = xs.iter()
            .map(|xj| p.evaluate(xj))
            .collect::<Vec<_>>();

        let ls = lagrange_coefficients_at_zero(&xs).unwrap();
        let p_at_0: Fr = ls.iter().zip(ys).map(|(lj, yj)| *lj * yj).sum();
        assert_eq!(p_at_0, p.coeffs[0]);
    }

    #[test]
    fn rejects_duplicate_points() {
        let xs = [Fr::from(1u64), Fr::from(2u64), Fr::from(1u64)];
        assert_eq!(lagrange_coefficients_at_zero(&xs), Err(Error::DuplicateId));
    }
}
