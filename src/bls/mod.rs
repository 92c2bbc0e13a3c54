use ark_serialize::CanonicalSerialize;
use ark_std::vec::Vec;

/// Vanilla BLS signature scheme and aggregation.
pub mod vanilla;

/// Threshold recovery of signatures and public keys.
pub mod threshold;

/// Proofs of possession against rogue-key attacks.
pub mod pop;

pub use pop::{generate_pop, verify_pop, Pop};
pub use threshold::{recover_pubkey, recover_signature, recover_signature_by_map};
pub use vanilla::{aggregate_pubkeys, aggregate_sigs, batch_verify, verify_aggregate_sig, Pubkey, Signature};

// Compressed serialization into a `Vec`, which cannot fail.
pub(crate) fn to_bytes<T: CanonicalSerialize>(t: &T) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(t.compressed_size());
    t.serialize_compressed(&mut bytes)
        .expect("writing to a Vec is infallible");
    bytes
}
