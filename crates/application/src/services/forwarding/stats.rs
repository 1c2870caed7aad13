/// Lifetime counters of one coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardingStats {
    pub queries_accepted: u64,
    pub subqueries_forwarded: u64,
    pub groups_completed: u64,
    pub groups_failed: u64,
    pub groups_timed_out: u64,
    pub stale_replies: u64,
    pub local_replies: u64,
}
