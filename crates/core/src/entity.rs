//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Master-data rows are entities: delete calls address them by id.
pub trait Entity {
    /// Identifier as understood by the REST endpoints.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
