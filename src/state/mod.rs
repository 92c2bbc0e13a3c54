use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::address::Address;
use crate::bls::{Pubkey, Signature};
use crate::randomness::Rand;
use crate::variant::Variant;
use crate::Error;

/// Data committed to the chain.
/// A state is built once, then only read: advancing the chain shares the node and group tables
/// with the previous state and attaches a new signature.

mod group;
mod node;

pub use group::Group;
pub use node::Node;

/// One chain entry: the registered nodes and groups plus the group signature that produced it.
/// The genesis state carries no signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State<V: Variant> {
    nodes: Arc<BTreeMap<Address, Node<V>>>,
    groups: Arc<BTreeMap<Address, Group<V>>>,
    sig: Option<Signature<V>>,
}

impl<V: Variant> Default for State<V> {
    fn default() -> Self {
        Self {
            nodes: Arc::new(BTreeMap::new()),
            groups: Arc::new(BTreeMap::new()),
            sig: None,
        }
    }
}

impl<V: Variant> State<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node if its proof of possession verifies and its address is new.
    pub fn add_node(&mut self, node: Node<V>) -> Result<(), Error> {
        let address = node.address();
        if !node.has_pop() {
            return Err(Error::InvalidPop(address));
        }
        if self.nodes.contains_key(&address) {
            return Err(Error::DuplicateNode(address));
        }
        Arc::make_mut(&mut self.nodes).insert(address, node);
        Ok(())
    }

    /// Registers a group once its public key is attached.
    pub fn add_group(&mut self, group: Group<V>) -> Result<(), Error> {
        let address = group.address();
        if !group.is_valid() {
            return Err(Error::GroupNotFinalized(address));
        }
        if self.groups.contains_key(&address) {
            return Err(Error::DuplicateGroup(address));
        }
        Arc::make_mut(&mut self.groups).insert(address, group);
        Ok(())
    }

    /// The successor state: same nodes and groups, new signature.
    pub fn with_signature(&self, sig: Signature<V>) -> Self {
        Self {
            nodes: Arc::clone(&self.nodes),
            groups: Arc::clone(&self.groups),
            sig: Some(sig),
        }
    }

    pub fn signature(&self) -> Option<&Signature<V>> {
        self.sig.as_ref()
    }

    pub fn is_genesis(&self) -> bool {
        self.sig.is_none()
    }

    /// The randomness of the state, derived from its signature.
    pub fn rand(&self) -> Rand {
        match &self.sig {
            Some(sig) => sig.rand(),
            None => Rand::from_seed(&[]),
        }
    }

    pub fn node(&self, address: &Address) -> Option<&Node<V>> {
        self.nodes.get(address)
    }

    pub fn group(&self, address: &Address) -> Option<&Group<V>> {
        self.groups.get(address)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Sorted.
    pub fn node_address_list(&self) -> Vec<Address> {
        self.nodes.keys().copied().collect()
    }

    /// Sorted.
    pub fn group_address_list(&self) -> Vec<Address> {
        self.groups.keys().copied().collect()
    }

    /// Picks `n` members among the registered nodes by a permutation derived from `r`.
    pub fn new_random_group(&self, r: &Rand, n: usize, threshold: usize) -> Result<Group<V>, Error> {
        let nodes = self.node_address_list();
        if n > nodes.len() {
            return Err(Error::InvalidConfig(format!("group of {} out of {} nodes", n, nodes.len())));
        }
        let members = r.random_perm(nodes.len(), n)
            .into_iter()
            .map(|i| nodes[i])
            .collect();
        Group::new(members, threshold)
    }

    /// The group that signs the next state: `groups[rand mod #groups]` in address order.
    pub fn selected_group_address(&self) -> Result<Address, Error> {
        if self.groups.is_empty() {
            return Err(Error::NoGroups);
        }
        let i = self.rand().modulo(self.groups.len());
        self.groups.keys()
            .nth(i)
            .copied()
            .ok_or(Error::NoGroups)
    }

    pub fn group_pubkey(&self, address: &Address) -> Result<Pubkey<V>, Error> {
        self.groups.get(address)
            .and_then(|g| g.pubkey().copied())
            .ok_or(Error::UnknownGroup(*address))
    }

    pub fn selected_group_pubkey(&self) -> Result<Pubkey<V>, Error> {
        self.group_pubkey(&self.selected_group_address()?)
    }

    /// Multi-line listing of the nodes and groups.
    pub fn long(&self) -> String {
        let mut s = format!("{}\n", self);
        for (i, node) in self.nodes.values().enumerate() {
            s += &format!("  {:3}. {}\n", i, node);
        }
        for (i, group) in self.groups.values().enumerate() {
            s += &format!("  {:3}. {}\n", i, group);
        }
        s
    }
}

impl<V: Variant> fmt::Display for State<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = self.sig.map(|s| s.to_string()).unwrap_or_default();
        let selected = self.selected_group_address()
            .map(|a| a.short())
            .unwrap_or_default();
        write!(f, "Stat: (sig){} (rnd){} (N){} (m){} (grp){}",
               sig, hex::encode(&self.rand().bytes()[..1]), self.nodes.len(), self.groups.len(), selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bls::{generate_pop, Pop};
    use crate::scalar::Seckey;
    use crate::MinSig;

    fn nodes(n: u64) -> Vec<Node<MinSig>> {
        (1..=n).map(|i| Node::from_seckey(&Seckey::from_u64(i)).unwrap()).collect()
    }

    #[test]
    fn node_admission_checks_pop() {
        let mut state = State::<MinSig>::new();
        for node in nodes(3) {
            state.add_node(node).unwrap();
        }
        assert_eq!(state.node_count(), 3);

        // a key registered with somebody else's proof
        let (sec, other) = (Seckey::from_u64(10), Seckey::from_u64(11));
        let public = Pubkey::from_seckey(&sec);
        let pop: Pop<MinSig> = generate_pop(&other, &Pubkey::from_seckey(&other)).unwrap();
        let rogue = Node::new(public, pop);
        assert_eq!(state.add_node(rogue), Err(Error::InvalidPop(rogue.address())));
        assert_eq!(state.node_count(), 3);

        let again = Node::from_seckey(&Seckey::from_u64(2)).unwrap();
        assert_eq!(state.add_node(again), Err(Error::DuplicateNode(again.address())));
        assert_eq!(state.node_count(), 3);
    }

    #[test]
    fn group_admission() {
        let mut state = State::<MinSig>::new();
        for node in nodes(5) {
            state.add_node(node).unwrap();
        }
        let r = Rand::from_seed(b"group");
        let group = state.new_random_group(&r, 3, 2).unwrap();
        assert_eq!(group.size(), 3);
        assert!(group.members().iter().all(|m| state.node(m).is_some()));
        assert_eq!(state.add_group(group.clone()), Err(Error::GroupNotFinalized(group.address())));

        let group = group.finalize(Pubkey::from_seckey(&Seckey::from_u64(7))).unwrap();
        state.add_group(group.clone()).unwrap();
        assert_eq!(state.add_group(group.clone()), Err(Error::DuplicateGroup(group.address())));
        assert_eq!(state.selected_group_address(), Ok(group.address()));
        assert_eq!(state.selected_group_pubkey(), Ok(Pubkey::from_seckey(&Seckey::from_u64(7))));
        assert!(state.new_random_group(&r, 6, 2).is_err());
    }

    #[test]
    fn successor_shares_tables() {
        let mut genesis = State::<MinSig>::new();
        assert_eq!(genesis.selected_group_address(), Err(Error::NoGroups));
        for node in nodes(2) {
            genesis.add_node(node).unwrap();
        }
        assert!(genesis.is_genesis());
        assert_eq!(genesis.rand(), Rand::from_seed(&[]));

        let sig = Signature::sign(&Seckey::from_u64(3), b"m").unwrap();
        let next = genesis.with_signature(sig);
        assert!(!next.is_genesis());
        assert_eq!(next.rand(), sig.rand());
        assert_eq!(next.node_address_list(), genesis.node_address_list());
        assert!(Arc::ptr_eq(&next.nodes, &genesis.nodes));
    }
}
