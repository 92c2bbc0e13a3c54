use core::fmt;
use core::fmt::Debug;
use core::str::FromStr;

use ark_bls12_381::{g1, g2, Bls12_381, Fr, G1Projective, G2Projective};
use ark_ec::hashing::curve_maps::wb::WBMap;
use ark_ec::hashing::map_to_curve_hasher::MapToCurveBasedHasher;
use ark_ec::hashing::HashToCurve;
use ark_ec::pairing::Pairing;
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::field_hashers::DefaultFieldHasher;
use ark_ff::Zero;
use sha2::Sha256;

use crate::Error;

/// Curve parameterization of the BLS scheme.
///
/// Both variants live on BLS12-381 and share the scalar field `Fr`.
/// They differ in which source group holds the public keys and which one holds the signatures.
pub trait Variant: Copy + Debug + Default + Eq + core::hash::Hash + Send + Sync + 'static {
    /// Name accepted by [`CurveKind`].
    const NAME: &'static str;

    /// Domain separation tag for hashing messages.
    const MESSAGE: &'static [u8];

    /// Domain separation tag for hashing public keys in proofs of possession.
    const PROOF_OF_POSSESSION: &'static [u8];

    type Public: CurveGroup<ScalarField=Fr>;

    type Signature: CurveGroup<ScalarField=Fr>;

    /// Hashes `msg` to the signature group.
    fn hash_to_signature(dst: &[u8], msg: &[u8]) -> Result<Self::Signature, Error>;

    /// Checks `e(sig, g) = e(hm, pk)` with a single product of pairings.
    fn verify(public: &Self::Public, hm: &Self::Signature, signature: &Self::Signature) -> bool;
}

/// Public keys in G1, signatures in G2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct MinPk;

/// Public keys in G2, signatures in G1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct MinSig;

type G1Hasher = MapToCurveBasedHasher<G1Projective, DefaultFieldHasher<Sha256>, WBMap<g1::Config>>;
type G2Hasher = MapToCurveBasedHasher<G2Projective, DefaultFieldHasher<Sha256>, WBMap<g2::Config>>;

impl Variant for MinPk {
    const NAME: &'static str = "bls12381-minpk";
    const MESSAGE: &'static [u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";
    const PROOF_OF_POSSESSION: &'static [u8] = b"BLS_POP_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

    type Public = G1Projective;
    type Signature = G2Projective;

    fn hash_to_signature(dst: &[u8], msg: &[u8]) -> Result<Self::Signature, Error> {
        let hasher = G2Hasher::new(dst).map_err(|_| Error::HashToCurve)?;
        let hm = hasher.hash(msg).map_err(|_| Error::HashToCurve)?;
        Ok(hm.into())
    }

    // e(g1, sig) * e(-pk, hm) = 1
    fn verify(public: &Self::Public, hm: &Self::Signature, signature: &Self::Signature) -> bool {
        Bls12_381::multi_pairing(
            [G1Projective::generator(), -*public],
            [*signature, *hm],
        ).is_zero()
    }
}

impl Variant for MinSig {
    const NAME: &'static str = "bls12381-minsig";
    const MESSAGE: &'static [u8] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_NUL_";
    const PROOF_OF_POSSESSION: &'static [u8] = b"BLS_POP_BLS12381G1_XMD:SHA-256_SSWU_RO_POP_";

    type Public = G2Projective;
    type Signature = G1Projective;

    fn hash_to_signature(dst: &[u8], msg: &[u8]) -> Result<Self::Signature, Error> {
        let hasher = G1Hasher::new(dst).map_err(|_| Error::HashToCurve)?;
        let hm = hasher.hash(msg).map_err(|_| Error::HashToCurve)?;
        Ok(hm.into())
    }

    // e(sig, g2) * e(hm, -pk) = 1
    fn verify(public: &Self::Public, hm: &Self::Signature, signature: &Self::Signature) -> bool {
        Bls12_381::multi_pairing(
            [*signature, *hm],
            [G2Projective::generator(), -*public],
        ).is_zero()
    }
}

/// Runtime selection of a [`Variant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CurveKind {
    Bls12381MinPk,
    #[default]
    Bls12381MinSig,
}

impl CurveKind {
    pub fn name(&self) -> &'static str {
        match self {
            CurveKind::Bls12381MinPk => MinPk::NAME,
            CurveKind::Bls12381MinSig => MinSig::NAME,
        }
    }
}

impl FromStr for CurveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            MinPk::NAME => Ok(CurveKind::Bls12381MinPk),
            MinSig::NAME => Ok(CurveKind::Bls12381MinSig),
            _ => Err(Error::UnsupportedCurve(s.to_string())),
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
