use crate::bls::vanilla::{Pubkey, Signature};
use crate::scalar::Seckey;
use crate::variant::Variant;
use crate::Error;

/// Proof of possession: a signature over the owner's own serialized public key,
/// hashed under a separate domain tag so that it can't be replayed as a message signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pop<V: Variant>(pub(crate) Signature<V>);

impl<V: Variant> Pop<V> {
    pub fn signature(&self) -> &Signature<V> {
        &self.0
    }
}

pub fn generate_pop<V: Variant>(sec: &Seckey, public: &Pubkey<V>) -> Result<Pop<V>, Error> {
    Signature::sign_with(V::PROOF_OF_POSSESSION, sec, &public.to_bytes()).map(Pop)
}

pub fn verify_pop<V: Variant>(public: &Pubkey<V>, pop: &Pop<V>) -> bool {
    pop.0.verify_with(V::PROOF_OF_POSSESSION, public, &public.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MinPk, MinSig};

    fn _pop<V: Variant>() {
        let sec = Seckey::from_u64(42);
        let public = Pubkey::<V>::from_seckey(&sec);
        let pop = generate_pop(&sec, &public).unwrap();
        assert!(verify_pop(&public, &pop));

        let other = Pubkey::<V>::from_seckey(&Seckey::from_u64(43));
        assert!(!verify_pop(&other, &pop));

        // a rogue key `pk' - pk` has no proof
        let rogue = Pubkey(other.0 - public.0);
        assert!(!verify_pop(&rogue, &pop));

        // not a message signature
        assert!(!pop.signature().verify(&public, &public.to_bytes()));
    }

    #[test]
    fn pop() {
        _pop::<MinSig>();
        _pop::<MinPk>();
    }
}
