use core::fmt;
use core::ops::AddAssign;

/// Counts of cryptographic operations and protocol violations.
///
/// Owned by whoever drives the protocol and passed down explicitly,
/// so that independent simulations never share counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpCounters {
    pub sec_agg_calls: usize,
    pub sec_agg_len: usize,
    pub sec_share_calls: usize,
    pub sec_share_len: usize,
    pub sec_recover_calls: usize,
    pub sec_recover_len: usize,

    pub pub_gen_calls: usize,
    pub pub_agg_calls: usize,
    pub pub_agg_len: usize,
    pub pub_share_calls: usize,
    pub pub_share_len: usize,

    pub sig_gen_calls: usize,
    pub sig_verify_calls: usize,
    pub sig_recover_calls: usize,
    pub sig_recover_len: usize,

    pub violations: usize,
}

impl OpCounters {
    pub fn sec_agg(&mut self, len: usize) {
        self.sec_agg_calls += 1;
        self.sec_agg_len += len;
    }

    pub fn sec_share(&mut self, len: usize) {
        self.sec_share_calls += 1;
        self.sec_share_len += len;
    }

    pub fn sec_recover(&mut self, len: usize) {
        self.sec_recover_calls += 1;
        self.sec_recover_len += len;
    }

    pub fn pub_gen(&mut self, n: usize) {
        self.pub_gen_calls += n;
    }

    pub fn pub_agg(&mut self, len: usize) {
        self.pub_agg_calls += 1;
        self.pub_agg_len += len;
    }

    pub fn pub_share(&mut self, len: usize) {
        self.pub_share_calls += 1;
        self.pub_share_len += len;
    }

    pub fn sig_gen(&mut self, n: usize) {
        self.sig_gen_calls += n;
    }

    pub fn sig_verify(&mut self) {
        self.sig_verify_calls += 1;
    }

    pub fn sig_recover(&mut self, len: usize) {
        self.sig_recover_calls += 1;
        self.sig_recover_len += len;
    }

    pub fn violation(&mut self) {
        self.violations += 1;
    }
}

impl AddAssign for OpCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.sec_agg_calls += rhs.sec_agg_calls;
        self.sec_agg_len += rhs.sec_agg_len;
        self.sec_share_calls += rhs.sec_share_calls;
        self.sec_share_len += rhs.sec_share_len;
        self.sec_recover_calls += rhs.sec_recover_calls;
        self.sec_recover_len += rhs.sec_recover_len;
        self.pub_gen_calls += rhs.pub_gen_calls;
        self.pub_agg_calls += rhs.pub_agg_calls;
        self.pub_agg_len += rhs.pub_agg_len;
        self.pub_share_calls += rhs.pub_share_calls;
        self.pub_share_len += rhs.pub_share_len;
        self.sig_gen_calls += rhs.sig_gen_calls;
        self.sig_verify_calls += rhs.sig_verify_calls;
        self.sig_recover_calls += rhs.sig_recover_calls;
        self.sig_recover_len += rhs.sig_recover_len;
        self.violations += rhs.violations;
    }
}

// calls/total length
impl fmt::Display for OpCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "(sec:agg,shr,rec)   {}/{},{}/{},{}/{}",
                 self.sec_agg_calls, self.sec_agg_len,
                 self.sec_share_calls, self.sec_share_len,
                 self.sec_recover_calls, self.sec_recover_len)?;
        writeln!(f, "(pub:gen,shr,agg)   {},{}/{},{}/{}",
                 self.pub_gen_calls,
                 self.pub_share_calls, self.pub_share_len,
                 self.pub_agg_calls, self.pub_agg_len)?;
        writeln!(f, "(sig:gen,ver,rec)   {},{},{}/{}",
                 self.sig_gen_calls, self.sig_verify_calls,
                 self.sig_recover_calls, self.sig_recover_len)?;
        write!(f, "(violations)        {}", self.violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate() {
        let mut a = OpCounters::default();
        a.sec_share(3);
        a.sec_share(3);
        a.sig_verify();
        let mut b = OpCounters::default();
        b.sec_share(2);
        b.violation();
        a += b;
        assert_eq!((a.sec_share_calls, a.sec_share_len), (3, 8));
        assert_eq!(a.sig_verify_calls, 1);
        assert_eq!(a.violations, 1);
        assert!(a.to_string().contains("3/8"));
    }
}
