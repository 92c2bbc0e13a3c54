use core::fmt;
use std::collections::BTreeMap;
use std::time::Instant;

use ark_std::vec::Vec;
use hashbrown::HashMap;
use tracing::{debug, info, warn};

use crate::address::Address;
use crate::bls::{recover_signature_by_map, Pubkey, Signature};
use crate::dkg::Ceremony;
use crate::metrics::OpCounters;
use crate::scalar::Seckey;
use crate::sharing::{aggregate_seckeys, recover_by_map};
use crate::sim::process::Process;
use crate::state::Group;
use crate::variant::Variant;
use crate::Error;

/// The live side of a group: its registration record,
/// plus the group secret recovered from the members' shares when double-checking.
#[derive(Clone, Debug)]
pub struct Committee<V: Variant> {
    group: Group<V>,
    sec: Option<Seckey>,
}

// Reports a failed double-check without stopping the run.
fn violation(counters: &mut OpCounters, group: &Address, e: Error) {
    warn!(group = %group, "double-check failed: {}", e);
    counters.violation();
}

impl<V: Variant> Committee<V> {
    /// Runs the DKG for `group` among its members.
    pub fn form(
        group: Group<V>,
        processes: &mut HashMap<Address, Process<V>>,
        vvec: bool,
        double_check: bool,
        counters: &mut OpCounters,
    ) -> Result<Self, Error> {
        let address = group.address();
        let k = group.threshold();
        let dealers = group.members().iter()
            .map(|m| processes.get(m)
                .map(|p| p.dealer(&group))
                .ok_or(Error::UnknownProcess(*m)))
            .collect::<Result<Vec<_>, _>>()?;

        let ceremony = Ceremony::new(&group, vvec);
        let dealings = dealers.iter()
            .map(|d| d.deal(&group, counters))
            .collect::<Result<Vec<_>, _>>()?;
        if double_check {
            // every dealt secret can be recovered from any `k` of its shares
            for (dealer, dealing) in dealers.iter().zip(&dealings) {
                counters.sec_recover(k);
                if recover_by_map(&dealing.shares, k)? != dealer.secret() {
                    violation(counters, &address, Error::SecretMismatch);
                }
            }
        }

        let mut players = ceremony.players();
        let disqualified = ceremony.distribute(&dealings, &mut players, counters)?;
        let outcome = ceremony.complete(&dealings, &disqualified, counters)?;
        for (member, player) in players {
            processes.get_mut(&member)
                .ok_or(Error::UnknownProcess(member))?
                .join(player, &outcome.qualified, counters)?;
        }

        let sec = if double_check {
            let shares = group.members().iter()
                .filter_map(|m| processes.get(m)
                    .and_then(|p| p.group_share(&address))
                    .map(|s| (*m, *s)))
                .collect::<BTreeMap<_, _>>();
            counters.sec_recover(k);
            let sec = recover_by_map(&shares, k)?;

            let contributions = dealers.iter()
                .filter(|d| outcome.qualified.contains(&d.address()))
                .map(|d| d.secret())
                .collect::<Vec<_>>();
            counters.sec_agg(contributions.len());
            if aggregate_seckeys(&contributions)? != sec {
                violation(counters, &address, Error::SecretMismatch);
            }
            counters.pub_gen(1);
            if outcome.group.pubkey() != Some(&Pubkey::from_seckey(&sec)) {
                violation(counters, &address, Error::PubkeyMismatch);
            }
            Some(sec)
        } else {
            None
        };

        debug!(group = %address, disqualified = outcome.disqualified.len(), "group formed");
        Ok(Self { group: outcome.group, sec })
    }

    pub fn address(&self) -> Address {
        self.group.address()
    }

    /// The finalized registration record.
    pub fn group(&self) -> &Group<V> {
        &self.group
    }

    /// Every member signs with its share, the signature is recovered from the first `k` shares in address order.
    pub fn sign(
        &self,
        msg: &[u8],
        processes: &HashMap<Address, Process<V>>,
        timing: bool,
        counters: &mut OpCounters,
    ) -> Result<Signature<V>, Error> {
        let address = self.address();
        let t0 = Instant::now();
        let sigs = self.group.members().iter()
            .map(|m| {
                let p = processes.get(m).ok_or(Error::UnknownProcess(*m))?;
                counters.sig_gen(1);
                p.sign_for_group(&address, msg).map(|s| (*m, s))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        let delta1 = t0.elapsed();

        let t1 = Instant::now();
        counters.sig_recover(self.group.threshold());
        let sig = recover_signature_by_map(&sigs, self.group.threshold())?;
        let delta2 = t1.elapsed();
        if timing {
            info!(
                group = %address,
                shares = sigs.len(),
                signing = ?delta1,
                per_share = ?(delta1 / sigs.len() as u32),
                recovery = ?delta2,
                "group signature"
            );
        }

        if let Some(sec) = self.sec {
            counters.sig_gen(1);
            if Signature::sign(&sec, msg)? != sig {
                violation(counters, &address, Error::SignatureMismatch);
            }
        }
        Ok(sig)
    }
}

impl<V: Variant> fmt::Display for Committee<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sec = self.sec.map(|s| s.to_hex()[2..6].to_string()).unwrap_or_else(|| "-".to_string());
        write!(f, "GrpP: (sec){} {}", sec, self.group)
    }
}
