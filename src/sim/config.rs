use crate::variant::CurveKind;
use crate::Error;

/// Parameters of a simulation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Seed of all the randomness in the run.
    pub seed: String,
    /// `n`, the number of members of every group.
    pub group_size: usize,
    /// `k`, the number of members needed to sign for a group.
    pub threshold: usize,
    /// `N`, the number of processes.
    pub processes: usize,
    /// `m`, the number of groups.
    pub groups: usize,
    /// `l`, the number of blocks to produce after the genesis.
    pub length: usize,
    /// Recompute what the protocol never materializes and compare.
    pub double_check: bool,
    /// Check received shares against the verification vectors.
    pub vvec: bool,
    /// Log signing times.
    pub timing: bool,
    /// Only read by the driver to pick the variant.
    pub curve: CurveKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: "DFINITY".to_string(),
            group_size: 3,
            threshold: 2,
            processes: 8,
            groups: 5,
            length: 20,
            double_check: false,
            vvec: true,
            timing: false,
            curve: CurveKind::default(),
        }
    }
}

impl Config {
    /// `1 <= k <= n <= N`, `1 <= m <= C(N, n)`.
    pub fn validate(&self) -> Result<(), Error> {
        let (n, k) = (self.group_size, self.threshold);
        if k == 0 || k > n {
            return Err(Error::InvalidThreshold { threshold: k, members: n });
        }
        if n > self.processes {
            return Err(Error::InvalidConfig(format!("group size {} exceeds {} processes", n, self.processes)));
        }
        if self.groups == 0 {
            return Err(Error::InvalidConfig("no groups".to_string()));
        }
        if binomial(self.processes, n) < self.groups as u128 {
            return Err(Error::InvalidConfig(format!(
                "{} processes form fewer than {} distinct groups of {}", self.processes, self.groups, n
            )));
        }
        Ok(())
    }
}

// Saturates at `u128::MAX`.
fn binomial(n: usize, k: usize) -> u128 {
    let k = k.min(n - k);
    let mut c = 1u128;
    for i in 0..k {
        // c * (n - i) / (i + 1) stays an integer at every step
        c = match c.checked_mul((n - i) as u128) {
            Some(c) => c / (i + 1) as u128,
            None => return u128::MAX,
        };
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomials() {
        assert_eq!(binomial(8, 3), 56);
        assert_eq!(binomial(5, 5), 1);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(10_000, 5_000), u128::MAX);
    }

    #[test]
    fn validate() {
        assert_eq!(Config::default().validate(), Ok(()));
        let invalid = [
            Config { threshold: 0, ..Config::default() },
            Config { threshold: 4, ..Config::default() },
            Config { group_size: 9, threshold: 2, ..Config::default() },
            Config { groups: 0, ..Config::default() },
            Config { processes: 4, groups: 5, ..Config::default() },
        ];
        for config in invalid {
            let e = config.validate().unwrap_err();
            assert!(e.is_fatal(), "{}", e);
        }
        let tight = Config { processes: 3, groups: 1, ..Config::default() };
        assert_eq!(tight.validate(), Ok(()));
    }
}
