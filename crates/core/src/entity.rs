//! Records that are told apart by their id rather than their contents.

/// A stored record with a stable identifier.
///
/// Two records with equal ids are the same record, even after one of them has
/// been patched.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;

    /// Whether this record is the one addressed by `id`.
    fn has_id(&self, id: Self::Id) -> bool {
        self.id() == id
    }
}
