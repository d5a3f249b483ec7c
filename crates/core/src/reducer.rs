//! Reducer trait for explicit, serializable form state.

/// Pure state transition: `reduce(state, action) -> state`.
///
/// Implementors keep every cross-field side effect (derived values, cleared
/// dependents, row-count floors) inside `reduce`, so a UI layer only needs to
/// dispatch actions and render the returned state.
///
/// `reduce` must not mutate `self` and must not perform IO.
pub trait Reducer: Sized {
    type Action: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Produce the next state for `action`, or reject it leaving `self` as is.
    fn reduce(&self, action: &Self::Action) -> Result<Self, Self::Error>;

    /// Fold a sequence of actions, stopping at the first rejection.
    fn reduce_all<'a, I>(&self, actions: I) -> Result<Self, Self::Error>
    where
        I: IntoIterator<Item = &'a Self::Action>,
        Self: Clone,
        Self::Action: 'a,
    {
        let mut state = self.clone();
        for action in actions {
            state = state.reduce(action)?;
        }
        Ok(state)
    }
}
