//! Entity implementation

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// A generational key into the [`World`](super::World) arena. Keys of
    /// despawned objects never alias newer ones.
    pub struct Entity;
}
