use core::fmt;

use ark_bls12_381::Fr;
use ark_ff::{BigInteger, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use num_bigint::BigUint;

use crate::address::Address;
use crate::randomness::Rand;
use crate::Error;

/// Byte length of a canonically serialized scalar.
pub const SCALAR_LENGTH: usize = 32;

/// A secret key: an element of the scalar field of BLS12-381, i.e. an integer modulo `R`.
/// Reduction modulo `R` is enforced by the field type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, CanonicalSerialize, CanonicalDeserialize)]
pub struct Seckey(pub(crate) Fr);

/// The evaluation point of a participant in a sharing polynomial.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, CanonicalSerialize, CanonicalDeserialize)]
pub struct Id(pub(crate) Fr);

impl Seckey {
    /// Big-endian bytes reduced modulo `R`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    pub fn from_rand(r: &Rand) -> Self {
        Self::from_bytes(r.bytes())
    }

    pub fn from_u64(i: u64) -> Self {
        Self(Fr::from(i))
    }

    /// Parses a canonical decimal or `0x`-prefixed hex string. Values not below `R` are rejected.
    pub fn parse(s: &str) -> Result<Self, Error> {
        parse_scalar(s).map(Self)
    }

    pub fn scalar(&self) -> Fr {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Modular addition.
    pub fn add(&self, other: &Self) -> Self {
        Self(self.0 + other.0)
    }

    /// Big-endian, without leading zeros.
    pub fn to_bytes(&self) -> Vec<u8> {
        let bytes = self.0.into_bigint().to_bytes_be();
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        bytes[first..].to_vec()
    }

    /// Canonical string serialization: `0x`-prefixed, big-endian hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.into_bigint().to_bytes_be()))
    }
}

impl Id {
    pub fn from_u64(i: u64) -> Self {
        Self(Fr::from(i))
    }

    /// The address read as a big-endian integer; 160 bits always fit below `R`.
    pub fn from_address(address: &Address) -> Self {
        Self(Fr::from_be_bytes_mod_order(address.bytes()))
    }

    /// Little-endian 64-bit words, least significant first.
    pub fn from_words(words: &[u64]) -> Result<Self, Error> {
        if words.len() > SCALAR_LENGTH / 8 {
            return Err(Error::MalformedKey(format!("{} words", words.len())));
        }
        let mut le = [0u8; SCALAR_LENGTH];
        for (chunk, w) in le.chunks_mut(8).zip(words) {
            chunk.copy_from_slice(&w.to_le_bytes());
        }
        from_le_canonical(&le).map(Self)
    }

    pub fn parse(s: &str) -> Result<Self, Error> {
        parse_scalar(s).map(Self)
    }

    pub fn scalar(&self) -> Fr {
        self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.into_bigint().to_bytes_be()))
    }
}

impl From<&Address> for Id {
    fn from(address: &Address) -> Self {
        Self::from_address(address)
    }
}

fn from_le_canonical(le: &[u8; SCALAR_LENGTH]) -> Result<Fr, Error> {
    Fr::deserialize_compressed(&le[..])
        .map_err(|_| Error::MalformedKey("not below the field order".into()))
}

fn parse_scalar(s: &str) -> Result<Fr, Error> {
    let malformed = || Error::MalformedKey(s.to_string());
    let (body, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    // `parse_bytes` also takes signs and underscores
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed());
    }
    let n = BigUint::parse_bytes(body.as_bytes(), radix).ok_or_else(malformed)?;
    if n >= BigUint::from(Fr::MODULUS) {
        return Err(malformed());
    }
    Ok(Fr::from(n))
}

impl fmt::Debug for Seckey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print the secret itself
        write!(f, "Seckey(..)")
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.to_hex())
    }
}
