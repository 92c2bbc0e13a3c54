use core::fmt;
use std::collections::BTreeMap;

use crate::address::Address;
use crate::bls::Signature;
use crate::dkg::{Dealer, Player};
use crate::metrics::OpCounters;
use crate::randomness::Rand;
use crate::scalar::Seckey;
use crate::state::{Group, Node};
use crate::variant::Variant;
use crate::Error;

/// A simulated process: its own key, its private seed,
/// and for every group it is a member of, the shares it received and their sum.
///
/// The seed is independent of the key and drives the process' dealings.
#[derive(Clone, Debug)]
pub struct Process<V: Variant> {
    sec: Seckey,
    node: Node<V>,
    seed: Rand,
    incoming: BTreeMap<Address, Player<V>>,
    combined: BTreeMap<Address, Seckey>,
}

impl<V: Variant> Process<V> {
    pub fn new(sec: Seckey, seed: Rand) -> Result<Self, Error> {
        Ok(Self {
            sec,
            node: Node::from_seckey(&sec)?,
            seed,
            incoming: BTreeMap::new(),
            combined: BTreeMap::new(),
        })
    }

    /// A process whose seed is derived from its own address.
    /// Its dealings are then predictable by anybody, which is only good for tests.
    pub fn deterministic(sec: Seckey) -> Result<Self, Error> {
        let node = Node::<V>::from_seckey(&sec)?;
        Self::new(sec, Rand::from_seed(node.address().bytes()))
    }

    pub fn address(&self) -> Address {
        self.node.address()
    }

    /// The registration record.
    pub fn node(&self) -> &Node<V> {
        &self.node
    }

    pub fn dealer(&self, group: &Group<V>) -> Dealer {
        Dealer::new(self.address(), &self.seed, group)
    }

    /// The own contribution to the secret of the group, a function of the seed and the group address.
    pub fn contribution(&self, group: &Group<V>) -> Seckey {
        self.dealer(group).secret()
    }

    /// Takes over the shares received during the DKG of a group and sums those of the qualified dealers.
    pub fn join(&mut self, player: Player<V>, qualified: &[Address], counters: &mut OpCounters) -> Result<(), Error> {
        if player.address() != self.address() {
            return Err(Error::UnknownProcess(player.address()));
        }
        let share = player.finalize(qualified, counters)?;
        self.combined.insert(player.group(), share);
        self.incoming.insert(player.group(), player);
        Ok(())
    }

    /// Shares received for the group, keyed by the dealer.
    pub fn incoming(&self, group: &Address) -> Option<&Player<V>> {
        self.incoming.get(group)
    }

    /// The share of the group secret.
    pub fn group_share(&self, group: &Address) -> Option<&Seckey> {
        self.combined.get(group)
    }

    /// The signature share for the group.
    pub fn sign_for_group(&self, group: &Address, msg: &[u8]) -> Result<Signature<V>, Error> {
        let share = self.group_share(group).ok_or(Error::UnknownGroup(*group))?;
        Signature::sign(share, msg)
    }

    /// An individual signature.
    pub fn sign(&self, msg: &[u8]) -> Result<Signature<V>, Error> {
        Signature::sign(&self.sec, msg)
    }
}

impl<V: Variant> fmt::Display for Process<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sec = self.sec.to_hex();
        let seed = self.seed.to_string();
        write!(f, "Proc: (sec){} (seed){} {}", &sec[2..6], &seed[..2], self.node)
    }
}
