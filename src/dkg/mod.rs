use std::collections::{BTreeMap, BTreeSet};

use ark_std::vec::Vec;
use ark_std::{end_timer, start_timer};
use tracing::{debug, warn};

use crate::address::Address;
use crate::bls::aggregate_pubkeys;
use crate::metrics::OpCounters;
use crate::state::Group;
use crate::variant::Variant;
use crate::Error;

/// Joint-Feldman distributed key generation among the members of a group.
///
/// Every member `i` acts as a dealer: it samples a polynomial `f_i` of degree `k-1`,
/// broadcasts the verification vector of `f_i` and sends the share `f_i(id_j)` privately to every member `j`.
/// Every member checks the shares it receives against the verification vectors.
/// A dealer whose share fails the check at any member is disqualified for everybody.
/// For the set `QUAL` of the remaining dealers,
/// - the group secret is `s = sum(f_i(0), i in QUAL)`, never held by anybody,
/// - the share of the member `j` is `s_j = sum(f_i(id_j), i in QUAL)`, and
/// - the group public key is `s.g = sum(C_i0, i in QUAL)`.
///
/// Any `k` members can then produce a signature under `s` by Lagrange interpolation of their partial signatures.

pub mod dealer;
pub mod transcript;
pub mod verifier;

pub use dealer::Dealer;
pub use transcript::{Dealing, ShareMessage};
pub use verifier::Player;

/// An instance of the DKG for one group.
pub struct Ceremony<'a, V: Variant> {
    /// The group being set up, without a public key yet.
    pub group: &'a Group<V>,
    /// Whether receivers check the shares against the verification vectors.
    pub verify: bool,
}

/// What the ceremony leaves on the chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<V: Variant> {
    /// The group with its public key attached.
    pub group: Group<V>,
    /// Dealers whose contributions make up the group key, sorted.
    pub qualified: Vec<Address>,
    /// Dealers caught cheating, sorted.
    pub disqualified: Vec<Address>,
}

impl<'a, V: Variant> Ceremony<'a, V> {
    pub fn new(group: &'a Group<V>, verify: bool) -> Self {
        Self { group, verify }
    }

    /// A fresh receiver for every member.
    pub fn players(&self) -> BTreeMap<Address, Player<V>> {
        self.group.members().iter()
            .map(|m| (*m, Player::new(*m, self.group)))
            .collect()
    }

    /// Sends the shares of every dealing to their receivers.
    /// Returns the dealers that sent at least one share the receiver rejected.
    pub fn distribute(
        &self,
        dealings: &[Dealing<V>],
        players: &mut BTreeMap<Address, Player<V>>,
        counters: &mut OpCounters,
    ) -> Result<BTreeSet<Address>, Error> {
        let mut disqualified = BTreeSet::new();
        for dealing in dealings {
            if !players.contains_key(&dealing.dealer) || dealing.group != self.group.address() {
                let e = Error::OutsideDealer(dealing.dealer);
                warn!(group = %self.group.address(), "{}", e);
                counters.violation();
                disqualified.insert(dealing.dealer);
                continue;
            }
            for (receiver, player) in players.iter_mut() {
                let res = match dealing.message_for(receiver) {
                    Some(msg) => player.receive(msg, self.verify, counters),
                    None => Err(Error::MissingShare { dealer: dealing.dealer, receiver: *receiver }),
                };
                match res {
                    Ok(()) => {}
                    Err(e) if e.is_violation() => {
                        warn!(group = %self.group.address(), dealer = %dealing.dealer, "{}", e);
                        counters.violation();
                        disqualified.insert(dealing.dealer);
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(disqualified)
    }

    /// Computes `QUAL` and the group public key.
    pub fn complete(&self, dealings: &[Dealing<V>], disqualified: &BTreeSet<Address>, counters: &mut OpCounters) -> Result<Outcome<V>, Error> {
        let qualified = dealings.iter()
            .filter(|d| d.group == self.group.address() && self.group.members().contains(&d.dealer))
            .filter(|d| !disqualified.contains(&d.dealer))
            .collect::<Vec<_>>();
        if qualified.is_empty() {
            return Err(Error::NoQualifiedDealers(self.group.address()));
        }
        let pubs = qualified.iter()
            .map(|d| d.public())
            .collect::<Result<Vec<_>, _>>()?;
        counters.pub_agg(pubs.len());
        let public = aggregate_pubkeys(&pubs)?;
        let mut qualified = qualified.iter()
            .map(|d| d.dealer)
            .collect::<Vec<_>>();
        qualified.sort();
        Ok(Outcome {
            group: self.group.clone().finalize(public)?,
            qualified,
            disqualified: disqualified.iter().copied().collect(),
        })
    }

    /// Deals, distributes and completes.
    /// Returns the outcome and the receivers holding the shares of the qualified dealers.
    pub fn run(&self, dealers: &[Dealer], counters: &mut OpCounters) -> Result<(Outcome<V>, BTreeMap<Address, Player<V>>), Error> {
        let _t = start_timer!(|| format!("DKG, n = {}, k = {}", self.group.size(), self.group.threshold()));
        let dealings = dealers.iter()
            .map(|d| d.deal(self.group, counters))
            .collect::<Result<Vec<_>, _>>()?;
        let mut players = self.players();
        let disqualified = self.distribute(&dealings, &mut players, counters)?;
        let outcome = self.complete(&dealings, &disqualified, counters)?;
        debug!(group = %self.group.address(), qualified = outcome.qualified.len(), "key generated");
        end_timer!(_t);
        Ok((outcome, players))
    }
}
