use std::time::Instant;

use ark_std::vec::Vec;
use hashbrown::HashMap;
use tracing::{debug, info, warn};

use crate::address::Address;
use crate::metrics::OpCounters;
use crate::randomness::Rand;
use crate::scalar::Seckey;
use crate::state::State;
use crate::variant::Variant;
use crate::Error;

/// Simulation of the beacon: all the processes and groups live in one address space,
/// and the messages of the protocols are function calls.
///
/// The chain only holds committed data. The key material of the processes and the groups
/// is kept aside, in tables indexed by address.

mod committee;
mod config;
mod process;

pub use committee::Committee;
pub use config::Config;
pub use process::Process;

/// Drives the chain.
pub struct Simulator<V: Variant> {
    config: Config,
    seed: Rand,
    processes: HashMap<Address, Process<V>>,
    committees: HashMap<Address, Committee<V>>,
    chain: Vec<State<V>>,
    counters: OpCounters,
}

impl<V: Variant> Simulator<V> {
    /// Sets up the processes and the groups, and builds the genesis state.
    /// `config.curve` is ignored, the variant is `V`.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let seed = Rand::from_seed(config.seed.as_bytes());
        info!(n = config.group_size, k = config.threshold, seed = %&seed.to_string()[..16], curve = V::NAME, "simulator");
        let mut sim = Self {
            config,
            seed,
            processes: HashMap::new(),
            committees: HashMap::new(),
            chain: Vec::new(),
            counters: OpCounters::default(),
        };
        let mut genesis = sim.init_processes()?;
        sim.init_groups(&mut genesis)?;
        debug!("{}", genesis.long());
        sim.chain.push(genesis);
        Ok(sim)
    }

    // Registers the processes that pass admission.
    fn init_processes(&mut self) -> Result<State<V>, Error> {
        let rsec = self.seed.derive_str(&["InitProcs_sec"]);
        let rseed = self.seed.derive_str(&["InitProcs_seed"]);
        let mut state = State::new();
        for i in 0..self.config.processes {
            let p = Process::new(Seckey::from_rand(&rsec.derive_index(i)), rseed.derive_index(i))?;
            self.counters.pub_gen(1);
            self.counters.sig_gen(1);
            self.counters.sig_verify();
            match state.add_node(*p.node()) {
                Ok(()) => {}
                Err(e) if e.is_violation() => {
                    warn!("rejected: {}", e);
                    self.counters.violation();
                    continue;
                }
                Err(e) => return Err(e),
            }
            debug!("{}", p);
            if self.processes.insert(p.address(), p).is_some() {
                return Err(Error::InvalidConfig("duplicate process".to_string()));
            }
        }
        Ok(state)
    }

    // Derives the member sets and runs a DKG for each of them.
    fn init_groups(&mut self, state: &mut State<V>) -> Result<(), Error> {
        let r = self.seed.derive_str(&["InitGroups"]);
        for i in 0..self.config.groups {
            let ri = r.derive_index(i);
            // a member set already in use is drawn again
            let group = (0..)
                .map(|attempt| match attempt {
                    0 => ri,
                    _ => ri.derive_index(attempt),
                })
                .map(|r| state.new_random_group(&r, self.config.group_size, self.config.threshold))
                .find(|g| match g {
                    Ok(g) => !self.committees.contains_key(&g.address()),
                    Err(_) => true,
                })
                .ok_or(Error::NoGroups)??;
            let committee = Committee::form(
                group,
                &mut self.processes,
                self.config.vvec,
                self.config.double_check,
                &mut self.counters,
            )?;
            debug!("{}", committee);
            state.add_group(committee.group().clone())?;
            self.committees.insert(committee.address(), committee);
        }
        Ok(())
    }

    /// Appends `n` states, each signed by the group selected by the previous one.
    pub fn advance(&mut self, n: usize) -> Result<(), Error> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), Error> {
        let t0 = Instant::now();
        let tip = self.chain.last().ok_or(Error::NoGroups)?;
        let address = tip.selected_group_address()?;
        let committee = self.committees.get(&address).ok_or(Error::UnknownGroup(address))?;
        let msg = tip.rand();
        let sig = committee.sign(msg.bytes(), &self.processes, self.config.timing, &mut self.counters)?;
        if self.config.double_check {
            self.counters.sig_verify();
            if !tip.group_pubkey(&address)?.verify(msg.bytes(), &sig) {
                warn!(group = %address, "double-check failed: {}", Error::InvalidSignature);
                self.counters.violation();
            }
        }
        let next = tip.with_signature(sig);
        info!(height = self.chain.len(), group = %address, rand = %next.rand(), "advanced");
        if self.config.timing {
            info!(elapsed = ?t0.elapsed(), "block");
        }
        self.chain.push(next);
        Ok(())
    }

    /// Checks every signature against the key of the group selected by the previous state.
    pub fn verify_chain(&self) -> Result<(), Error> {
        let (genesis, rest) = self.chain.split_first().ok_or(Error::NoGroups)?;
        if !genesis.is_genesis() {
            return Err(Error::InvalidSignature);
        }
        let mut prev = genesis;
        for next in rest {
            let public = prev.selected_group_pubkey()?;
            let sig = next.signature().ok_or(Error::InvalidSignature)?;
            if !public.verify(prev.rand().bytes(), sig) {
                return Err(Error::InvalidSignature);
            }
            prev = next;
        }
        Ok(())
    }

    /// The number of states, the genesis included.
    pub fn length(&self) -> usize {
        self.chain.len()
    }

    pub fn tip(&self) -> &State<V> {
        // the chain always starts with the genesis
        &self.chain[self.chain.len() - 1]
    }

    pub fn genesis(&self) -> &State<V> {
        &self.chain[0]
    }

    pub fn chain(&self) -> &[State<V>] {
        &self.chain
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn counters(&self) -> &OpCounters {
        &self.counters
    }

    pub fn process(&self, address: &Address) -> Option<&Process<V>> {
        self.processes.get(address)
    }

    pub fn committee(&self, address: &Address) -> Option<&Committee<V>> {
        self.committees.get(address)
    }
}
