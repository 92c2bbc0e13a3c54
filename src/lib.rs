use thiserror::Error;

/// Threshold-BLS random beacon.
/// A chain of states whose randomness is produced, block by block, by a pseudo-randomly selected
/// `(k, n)`-threshold group. Every group sets up its key with a Joint-Feldman DKG among its members,
/// so no single party ever holds the group secret.

// There is a set of processes identified by the addresses of their BLS public keys.
// Each process knows its BLS secret key and a private seed for its protocol randomness.

// `N` -- number of processes, `m` -- number of groups
// `n <= N` -- group size, indexed by `j`
// `k <= n` -- the threshold, `deg(f) = k-1` for every dealer's sharing polynomial 'f'
// Dealers are the members of the group being set up, indexed by `i`.

pub mod address;
pub mod bls;
pub mod dkg;
pub mod metrics;
pub mod randomness;
pub mod scalar;
pub mod sharing;
pub mod sim;
pub mod state;
pub mod variant;
pub mod vss;
mod utils;

pub use address::Address;
pub use bls::{Pop, Pubkey, Signature};
pub use randomness::Rand;
pub use scalar::{Id, Seckey};
pub use variant::{CurveKind, MinPk, MinSig, Variant};

/// Errors raised by the beacon.
///
/// Configuration errors are fatal, protocol violations reject the offending contribution
/// and let the simulation continue, math domain errors are never turned into a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // configuration
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),
    #[error("malformed key: {0}")]
    MalformedKey(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid threshold {threshold} for {members} members")]
    InvalidThreshold { threshold: usize, members: usize },
    #[error("{0} appears twice among the members")]
    DuplicateMember(Address),

    // protocol violations
    #[error("share from {dealer} to {receiver} does not match the verification vector")]
    ShareMismatch { dealer: Address, receiver: Address },
    #[error("invalid proof of possession for {0}")]
    InvalidPop(Address),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("recovered secret does not match")]
    SecretMismatch,
    #[error("recovered public key does not match")]
    PubkeyMismatch,
    #[error("recovered signature does not match")]
    SignatureMismatch,
    #[error("unknown group {0}")]
    UnknownGroup(Address),
    #[error("unknown process {0}")]
    UnknownProcess(Address),
    #[error("duplicate group {0}")]
    DuplicateGroup(Address),
    #[error("group {0} already has a public key")]
    GroupFinalized(Address),
    #[error("group {0} has no public key")]
    GroupNotFinalized(Address),
    #[error("no groups registered")]
    NoGroups,
    #[error("missing share from {dealer} at {receiver}")]
    MissingShare { dealer: Address, receiver: Address },
    #[error("share from {dealer} is not meant for {receiver}")]
    MisdirectedShare { dealer: Address, receiver: Address },
    #[error("duplicate share from {0}")]
    DuplicateShare(Address),
    #[error("commitment of {0} has wrong degree")]
    CommitmentWrongDegree(Address),
    #[error("dealing from {0}, who is not a member")]
    OutsideDealer(Address),
    #[error("every dealer of group {0} is disqualified")]
    NoQualifiedDealers(Address),
    #[error("node {0} already registered")]
    DuplicateNode(Address),

    // math domain
    #[error("duplicate id in interpolation")]
    DuplicateId,
    #[error("aggregation over an empty list")]
    EmptyAggregation,
    #[error("length mismatch: {0} values, {1} ids")]
    LengthMismatch(usize, usize),
    #[error("hash to curve failed")]
    HashToCurve,

    #[error("not enough shares: {provided}/{required}")]
    InsufficientShares { required: usize, provided: usize },
}

impl Error {
    /// Errors after which no partial state may be kept.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedCurve(_)
                | Error::MalformedKey(_)
                | Error::InvalidConfig(_)
                | Error::InvalidThreshold { .. }
        )
    }

    /// Errors caused by a misbehaving participant.
    pub fn is_violation(&self) -> bool {
        matches!(
            self,
            Error::ShareMismatch { .. }
                | Error::InvalidPop(_)
                | Error::InvalidSignature
                | Error::SecretMismatch
                | Error::PubkeyMismatch
                | Error::SignatureMismatch
                | Error::MissingShare { .. }
                | Error::MisdirectedShare { .. }
                | Error::DuplicateShare(_)
                | Error::CommitmentWrongDegree(_)
                | Error::OutsideDealer(_)
                | Error::DuplicateNode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::sim::{Config, Simulator};
    use crate::{MinPk, MinSig, Variant};

    fn _it_works<V: Variant>() {
        let config = Config {
            double_check: true,
            vvec: true,
            ..Config::default()
        };
        let mut sim = Simulator::<V>::new(config).unwrap();
        sim.advance(3).unwrap();
        assert_eq!(sim.length(), 4);
        sim.verify_chain().unwrap();
        assert_eq!(sim.counters().violations, 0);
    }

    #[test]
    fn it_works() {
        _it_works::<MinSig>();
        _it_works::<MinPk>();
    }

    #[test]
    fn fatal_errors() {
        assert!(crate::Error::UnsupportedCurve("bn254".into()).is_fatal());
        assert!(!crate::Error::DuplicateId.is_fatal());
        assert!(crate::Error::InvalidSignature.is_violation());
    }
}
