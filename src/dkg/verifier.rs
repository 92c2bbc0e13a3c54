use std::collections::BTreeMap;

use ark_std::vec::Vec;

use crate::address::Address;
use crate::dkg::transcript::ShareMessage;
use crate::metrics::OpCounters;
use crate::scalar::Seckey;
use crate::sharing::aggregate_seckeys;
use crate::state::Group;
use crate::variant::Variant;
use crate::vss::VerificationVector;
use crate::Error;

/// The receiving side of a DKG: the shares a member `j` got for one group, keyed by the dealer.
///
/// Every share is checked against the dealer's verification vector on arrival,
/// so a faulty dealer is caught by any honest receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player<V: Variant> {
    address: Address,
    group: Address,
    threshold: usize,
    received: BTreeMap<Address, (Seckey, VerificationVector<V>)>,
}

impl<V: Variant> Player<V> {
    pub fn new(address: Address, group: &Group<V>) -> Self {
        Self {
            address,
            group: group.address(),
            threshold: group.threshold(),
            received: BTreeMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn group(&self) -> Address {
        self.group
    }

    /// Accepts a share. With `verify` unset the share is trusted,
    /// which is only sound when all the dealers are honest.
    pub fn receive(&mut self, msg: ShareMessage<V>, verify: bool, counters: &mut OpCounters) -> Result<(), Error> {
        if msg.receiver != self.address || msg.group != self.group {
            return Err(Error::MisdirectedShare { dealer: msg.dealer, receiver: self.address });
        }
        if msg.vvec.len() != self.threshold {
            return Err(Error::CommitmentWrongDegree(msg.dealer));
        }
        if self.received.contains_key(&msg.dealer) {
            return Err(Error::DuplicateShare(msg.dealer));
        }
        if verify {
            counters.pub_share(msg.vvec.len());
            counters.pub_gen(1);
            msg.vvec.verify_share(&msg.dealer, &self.address, &msg.share)?;
        }
        self.received.insert(msg.dealer, (msg.share, msg.vvec));
        Ok(())
    }

    pub fn share_from(&self, dealer: &Address) -> Option<&Seckey> {
        self.received.get(dealer).map(|(s, _)| s)
    }

    /// Received shares in dealer order.
    pub fn shares(&self) -> BTreeMap<Address, Seckey> {
        self.received.iter()
            .map(|(d, (s, _))| (*d, *s))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.received.len()
    }

    pub fn is_empty(&self) -> bool {
        self.received.is_empty()
    }

    /// The member's share of the group secret `s_j = sum(f_i(id_j), i in QUAL)`.
    pub fn finalize(&self, qualified: &[Address], counters: &mut OpCounters) -> Result<Seckey, Error> {
        let shares = qualified.iter()
            .map(|dealer| self.share_from(dealer)
                .copied()
                .ok_or(Error::MissingShare { dealer: *dealer, receiver: self.address }))
            .collect::<Result<Vec<_>, _>>()?;
        counters.sec_agg(shares.len());
        aggregate_seckeys(&shares)
    }
}
