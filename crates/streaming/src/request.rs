use foundation::GroupIndex;

/// Proof of a slot reservation, handed to whoever completes the load.
///
/// Small and copyable so it can move into the async fetch continuation. The
/// sequence number lets the cache reject tickets from a slot that was already
/// rolled back and re-reserved.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket {
    group: GroupIndex,
    seq: u64,
}

impl LoadTicket {
    pub(crate) fn new(group: GroupIndex, seq: u64) -> Self {
        Self { group, seq }
    }

    pub fn group(&self) -> GroupIndex {
        self.group
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}
