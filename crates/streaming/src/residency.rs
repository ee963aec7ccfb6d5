/// Lifecycle of a group's cache slot.
///
/// Reserved → Resident. A failed load removes the slot instead of
/// transitioning it, so "absent" doubles as the retryable state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResidencyState {
    /// A fetch is in flight; the slot blocks further fetches for the group.
    Reserved,
    /// Primitives are built and owned by the slot.
    Resident,
}
