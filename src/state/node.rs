use core::fmt;

use crate::address::Address;
use crate::bls::{generate_pop, verify_pop, Pop, Pubkey};
use crate::scalar::{Id, Seckey};
use crate::variant::Variant;
use crate::Error;

/// The public registration record of a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node<V: Variant> {
    public: Pubkey<V>,
    pop: Pop<V>,
}

impl<V: Variant> Node<V> {
    pub fn new(public: Pubkey<V>, pop: Pop<V>) -> Self {
        Self { public, pop }
    }

    pub fn from_seckey(sec: &Seckey) -> Result<Self, Error> {
        let public = Pubkey::from_seckey(sec);
        let pop = generate_pop(sec, &public)?;
        Ok(Self { public, pop })
    }

    pub fn address(&self) -> Address {
        self.public.address()
    }

    pub fn id(&self) -> Id {
        Id::from_address(&self.address())
    }

    pub fn public(&self) -> &Pubkey<V> {
        &self.public
    }

    pub fn pop(&self) -> &Pop<V> {
        &self.pop
    }

    pub fn has_pop(&self) -> bool {
        verify_pop(&self.public, &self.pop)
    }
}

impl<V: Variant> fmt::Display for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node: (addr){} (pub){}", self.address().short(), self.public)
    }
}
