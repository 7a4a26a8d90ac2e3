//! Entity trait: records with a stable identity in a named collection.

/// Entity marker.
///
/// Users and posts are both entities: two records with the same id are the
/// same record, whatever their other fields say.
pub trait Entity {
    /// Name of the document collection the entity is persisted in.
    const COLLECTION: &'static str;
}
