use std::collections::BTreeMap;

use foundation::GroupIndex;

use crate::request::LoadTicket;
use crate::residency::ResidencyState;

#[derive(Debug)]
struct Slot<T> {
    state: ResidencyState,
    ticket: LoadTicket,
    data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    AlreadyPresent(GroupIndex),
    UnknownTicket(LoadTicket),
    AlreadyResident(GroupIndex),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::AlreadyPresent(group) => {
                write!(f, "group {group} already has a cache slot")
            }
            CacheError::UnknownTicket(ticket) => write!(
                f,
                "stale load ticket for group {} (seq {})",
                ticket.group(),
                ticket.seq()
            ),
            CacheError::AlreadyResident(group) => write!(f, "group {group} is already resident"),
        }
    }
}

impl std::error::Error for CacheError {}

/// Per-group cache with synchronous slot reservation.
///
/// Presence of a slot (reserved or resident) is the only record of "this group
/// was requested". `reserve` is the single check-and-insert point, so a second
/// request for a group cannot start while the first is in flight.
///
/// Notes on determinism:
/// - Slots are keyed in a `BTreeMap` for stable traversal order.
#[derive(Debug)]
pub struct GroupCache<T> {
    next_seq: u64,
    slots: BTreeMap<GroupIndex, Slot<T>>,
}

impl<T> Default for GroupCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GroupCache<T> {
    pub fn new() -> Self {
        Self {
            next_seq: 1,
            slots: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, group: GroupIndex) -> bool {
        self.slots.contains_key(&group)
    }

    pub fn state(&self, group: GroupIndex) -> Option<ResidencyState> {
        self.slots.get(&group).map(|s| s.state)
    }

    /// Reserves the slot for `group`, failing if one already exists.
    pub fn reserve(&mut self, group: GroupIndex) -> Result<LoadTicket, CacheError> {
        if self.slots.contains_key(&group) {
            return Err(CacheError::AlreadyPresent(group));
        }
        let ticket = LoadTicket::new(group, self.next_seq);
        self.next_seq += 1;
        self.slots.insert(
            group,
            Slot {
                state: ResidencyState::Reserved,
                ticket,
                data: None,
            },
        );
        Ok(ticket)
    }

    /// Marks the reserved slot resident with `data`.
    pub fn fill(&mut self, ticket: LoadTicket, data: T) -> Result<(), CacheError> {
        let slot = self.slot_for_mut(ticket)?;
        if slot.state == ResidencyState::Resident {
            return Err(CacheError::AlreadyResident(ticket.group()));
        }
        slot.state = ResidencyState::Resident;
        slot.data = Some(data);
        Ok(())
    }

    /// Drops a reservation so the group can be requested again.
    ///
    /// Resident slots are never released.
    pub fn release(&mut self, ticket: LoadTicket) -> Result<(), CacheError> {
        let slot = self.slot_for_mut(ticket)?;
        if slot.state == ResidencyState::Resident {
            return Err(CacheError::AlreadyResident(ticket.group()));
        }
        self.slots.remove(&ticket.group());
        Ok(())
    }

    /// True if `ticket` still names the current reservation of its group.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.slots
            .get(&ticket.group())
            .is_some_and(|s| s.ticket == ticket && s.state == ResidencyState::Reserved)
    }

    pub fn get(&self, group: GroupIndex) -> Option<&T> {
        self.slots.get(&group).and_then(|s| s.data.as_ref())
    }

    pub fn get_mut(&mut self, group: GroupIndex) -> Option<&mut T> {
        self.slots.get_mut(&group).and_then(|s| s.data.as_mut())
    }

    /// Iterates resident slots in ascending group order.
    pub fn iter_resident(&self) -> impl Iterator<Item = (GroupIndex, &T)> + '_ {
        self.slots
            .iter()
            .filter_map(|(g, s)| s.data.as_ref().map(|d| (*g, d)))
    }

    fn slot_for_mut(&mut self, ticket: LoadTicket) -> Result<&mut Slot<T>, CacheError> {
        match self.slots.get_mut(&ticket.group()) {
            Some(slot) if slot.ticket == ticket => Ok(slot),
            _ => Err(CacheError::UnknownTicket(ticket)),
        }
    }
}
