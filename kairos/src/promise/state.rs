/// Settlement state of a promise.
///
/// A promise starts `Pending` and moves exactly once to one of the two
/// terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromiseState {
    /// Not settled yet.
    Pending,

    /// Settled with a value.
    Fulfilled,

    /// Settled with a [`PromiseError`](crate::PromiseError).
    Rejected,
}

impl PromiseState {
    /// Returns `true` for `Fulfilled` and `Rejected`.
    pub fn is_settled(self) -> bool {
        !matches!(self, PromiseState::Pending)
    }
}
