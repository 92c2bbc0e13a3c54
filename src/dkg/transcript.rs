use std::collections::BTreeMap;

use crate::address::Address;
use crate::bls::Pubkey;
use crate::scalar::Seckey;
use crate::variant::Variant;
use crate::vss::VerificationVector;
use crate::Error;

/// Everything the dealer `i` produces for a group:
/// the verification vector of `f_i`, broadcast to all the members,
/// and the shares `f_i(id_j)`, each sent privately to the member `j`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dealing<V: Variant> {
    pub group: Address,
    pub dealer: Address,
    pub vvec: VerificationVector<V>,
    pub shares: BTreeMap<Address, Seckey>,
}

/// A share in transit from a dealer to a receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareMessage<V: Variant> {
    pub group: Address,
    pub dealer: Address,
    pub receiver: Address,
    pub share: Seckey,
    pub vvec: VerificationVector<V>,
}

impl<V: Variant> Dealing<V> {
    /// `C_0 = f_i(0).g`, the dealer's contribution to the group public key.
    pub fn public(&self) -> Result<Pubkey<V>, Error> {
        self.vvec.public()
            .copied()
            .ok_or(Error::CommitmentWrongDegree(self.dealer))
    }

    pub fn message_for(&self, receiver: &Address) -> Option<ShareMessage<V>> {
        self.shares.get(receiver).map(|share| ShareMessage {
            group: self.group,
            dealer: self.dealer,
            receiver: *receiver,
            share: *share,
            vvec: self.vvec.clone(),
        })
    }
}
