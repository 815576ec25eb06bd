//! Object model for Almanac.
//!
//! Widgets participate in a parent-child tree managed by a central
//! [`ObjectRegistry`]. Each object is identified by a stable [`ObjectId`]
//! that remains valid as the tree changes, and becomes invalid when the
//! object is destroyed.
//!
//! The registry is the authority for containment questions: the focus
//! scope asks it whether the focused object is a descendant of a widget
//! boundary by walking the ancestor chain.
//!
//! # Example
//!
//! ```
//! use almanac_core::{Object, ObjectId, ObjectBase, init_global_registry};
//!
//! // Initialize the registry before creating objects
//! init_global_registry();
//!
//! struct Knob {
//!     base: ObjectBase,
//! }
//!
//! impl Knob {
//!     fn new() -> Self {
//!         Self { base: ObjectBase::new::<Self>() }
//!     }
//! }
//!
//! impl Object for Knob {
//!     fn object_id(&self) -> ObjectId {
//!         self.base.id()
//!     }
//! }
//!
//! let knob = Knob::new();
//! knob.base.set_name("volume");
//! assert_eq!(knob.base.name(), "volume");
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::OnceLock;

use parking_lot::RwLock;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for an object in the registry.
    ///
    /// `ObjectId`s are stable handles that remain valid even as the object
    /// tree changes. They become invalid when the object is destroyed.
    pub struct ObjectId;
}

impl ObjectId {
    /// Convert the ObjectId to a raw u64 value.
    ///
    /// Useful for interop with systems that need a numeric handle. The raw
    /// value can be converted back using [`ObjectId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create an ObjectId from a raw u64 value.
    ///
    /// This does not check whether the object still exists in the registry.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Errors that can occur during object operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The object ID is invalid or has been destroyed.
    InvalidObjectId,
    /// Attempted to set an object as its own parent/ancestor.
    CircularParentage,
    /// The object registry is not initialized.
    RegistryNotInitialized,
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjectId => write!(f, "Invalid or destroyed object ID"),
            Self::CircularParentage => {
                write!(f, "Cannot set an object as its own parent or ancestor")
            }
            Self::RegistryNotInitialized => write!(f, "Object registry not initialized"),
        }
    }
}

impl std::error::Error for ObjectError {}

/// Result type for object operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// Internal data stored in the registry for each object.
struct ObjectData {
    /// Human-readable name for debugging and lookup.
    name: String,
    /// The type ID of the concrete Object implementation.
    type_id: TypeId,
    /// The type name for debugging.
    type_name: &'static str,
    /// Parent object (if any).
    parent: Option<ObjectId>,
    /// Child objects (owned).
    children: Vec<ObjectId>,
}

impl ObjectData {
    fn new(type_id: TypeId, type_name: &'static str) -> Self {
        Self {
            name: String::new(),
            type_id,
            type_name,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// The central registry that manages all objects and their relationships.
///
/// Uses arena-based storage via SlotMap for stable object IDs and efficient
/// parent-child relationship management.
///
/// # Related Types
///
/// - [`SharedObjectRegistry`] - Thread-safe wrapper for concurrent access
/// - [`ObjectId`] - Keys into this registry
/// - [`ObjectBase`] - Automatically registers objects here
/// - [`global_registry`] - Access the singleton instance
pub struct ObjectRegistry {
    objects: SlotMap<ObjectId, ObjectData>,
}

impl ObjectRegistry {
    /// Create a new empty object registry.
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
        }
    }

    /// Register a new object of type `T`.
    pub fn register<T: Object + 'static>(&mut self) -> ObjectId {
        let data = ObjectData::new(TypeId::of::<T>(), std::any::type_name::<T>());
        let id = self.objects.insert(data);
        tracing::trace!(target: "almanac_core::object", ?id, type_name = std::any::type_name::<T>(), "object registered");
        id
    }

    /// Destroy an object and all of its descendants.
    pub fn destroy(&mut self, id: ObjectId) -> ObjectResult<()> {
        let parent = self
            .objects
            .get(id)
            .ok_or(ObjectError::InvalidObjectId)?
            .parent;

        // Detach from parent first so the recursive removal below never
        // observes a dangling child link.
        if let Some(parent_id) = parent
            && let Some(parent_data) = self.objects.get_mut(parent_id)
        {
            parent_data.children.retain(|&c| c != id);
        }

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(data) = self.objects.remove(current) {
                pending.extend(data.children);
            }
        }

        tracing::trace!(target: "almanac_core::object", ?id, "object destroyed");
        Ok(())
    }

    /// Check if an object exists.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Set the parent of an object.
    ///
    /// Pass `None` to detach the object from its current parent. Fails with
    /// [`ObjectError::CircularParentage`] if the new parent is the object
    /// itself or one of its descendants.
    pub fn set_parent(&mut self, id: ObjectId, new_parent: Option<ObjectId>) -> ObjectResult<()> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }

        if let Some(parent_id) = new_parent {
            if !self.objects.contains_key(parent_id) {
                return Err(ObjectError::InvalidObjectId);
            }
            if parent_id == id || self.ancestors(parent_id)?.contains(&id) {
                return Err(ObjectError::CircularParentage);
            }
        }

        // Detach from the old parent.
        let old_parent = self.objects[id].parent;
        if let Some(old_id) = old_parent
            && let Some(old) = self.objects.get_mut(old_id)
        {
            old.children.retain(|&c| c != id);
        }

        // Attach to the new parent.
        self.objects[id].parent = new_parent;
        if let Some(parent_id) = new_parent {
            self.objects[parent_id].children.push(id);
        }

        Ok(())
    }

    /// Get the parent of an object.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.objects
            .get(id)
            .map(|d| d.parent)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the children of an object.
    pub fn children(&self, id: ObjectId) -> ObjectResult<&[ObjectId]> {
        self.objects
            .get(id)
            .map(|d| d.children.as_slice())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get all ancestors from immediate parent to root.
    pub fn ancestors(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }

        let mut result = Vec::new();
        let mut current = self.objects[id].parent;
        while let Some(ancestor) = current {
            result.push(ancestor);
            current = self.objects.get(ancestor).and_then(|d| d.parent);
        }
        Ok(result)
    }

    /// Check whether `id` is `root` or one of its descendants.
    pub fn is_descendant_of(&self, id: ObjectId, root: ObjectId) -> ObjectResult<bool> {
        if id == root {
            return Ok(true);
        }
        Ok(self.ancestors(id)?.contains(&root))
    }

    /// Get the object's name.
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<&str> {
        self.objects
            .get(id)
            .map(|d| d.name.as_str())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Set the object's name.
    pub fn set_object_name(&mut self, id: ObjectId, name: String) -> ObjectResult<()> {
        self.objects
            .get_mut(id)
            .map(|d| d.name = name)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the type ID of an object.
    pub fn type_id(&self, id: ObjectId) -> ObjectResult<TypeId> {
        self.objects
            .get(id)
            .map(|d| d.type_id)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the type name of an object.
    pub fn type_name(&self, id: ObjectId) -> ObjectResult<&'static str> {
        self.objects
            .get(id)
            .map(|d| d.type_name)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the number of registered objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around [`ObjectRegistry`].
///
/// Provides concurrent read access with exclusive write access via `RwLock`.
pub struct SharedObjectRegistry {
    inner: RwLock<ObjectRegistry>,
}

impl SharedObjectRegistry {
    /// Create a new shared object registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ObjectRegistry::new()),
        }
    }

    /// Register a new object.
    pub fn register<T: Object + 'static>(&self) -> ObjectId {
        self.inner.write().register::<T>()
    }

    /// Destroy an object and its children.
    pub fn destroy(&self, id: ObjectId) -> ObjectResult<()> {
        self.inner.write().destroy(id)
    }

    /// Check if an object exists.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.inner.read().contains(id)
    }

    /// Set the parent of an object.
    pub fn set_parent(&self, id: ObjectId, parent: Option<ObjectId>) -> ObjectResult<()> {
        self.inner.write().set_parent(id, parent)
    }

    /// Get the parent of an object.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.inner.read().parent(id)
    }

    /// Get the children of an object (returns owned Vec for thread safety).
    pub fn children(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        self.inner.read().children(id).map(|c| c.to_vec())
    }

    /// Get all ancestors from immediate parent to root.
    pub fn ancestors(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        self.inner.read().ancestors(id)
    }

    /// Check whether `id` is `root` or one of its descendants.
    pub fn is_descendant_of(&self, id: ObjectId, root: ObjectId) -> ObjectResult<bool> {
        self.inner.read().is_descendant_of(id, root)
    }

    /// Get the object's name.
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<String> {
        self.inner.read().object_name(id).map(|s| s.to_string())
    }

    /// Set the object's name.
    pub fn set_object_name(&self, id: ObjectId, name: String) -> ObjectResult<()> {
        self.inner.write().set_object_name(id, name)
    }

    /// Get the type name of an object.
    pub fn type_name(&self, id: ObjectId) -> ObjectResult<&'static str> {
        self.inner.read().type_name(id)
    }

    /// Get the number of registered objects.
    pub fn object_count(&self) -> usize {
        self.inner.read().object_count()
    }
}

impl Default for SharedObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The global object registry singleton.
static GLOBAL_REGISTRY: OnceLock<SharedObjectRegistry> = OnceLock::new();

/// Initialize the global object registry.
///
/// Safe to call more than once; later calls are no-ops. Tests call this in
/// their setup, applications call it before constructing any widget.
pub fn init_global_registry() {
    GLOBAL_REGISTRY.get_or_init(SharedObjectRegistry::new);
}

/// Get a reference to the global object registry.
///
/// Returns an error if the registry hasn't been initialized.
pub fn global_registry() -> ObjectResult<&'static SharedObjectRegistry> {
    GLOBAL_REGISTRY.get().ok_or(ObjectError::RegistryNotInitialized)
}

/// The base trait that all objects must implement.
///
/// Types implementing this trait participate in the object tree and can
/// carry [`Signal`](crate::Signal)s for change notification.
///
/// # Related Types
///
/// - [`ObjectBase`] - Helper for implementing this trait
/// - [`ObjectId`] - Returned by [`object_id()`](Self::object_id)
pub trait Object: Any + Send + Sync {
    /// Get this object's unique identifier.
    fn object_id(&self) -> ObjectId;
}

/// Helper for implementing the [`Object`] trait.
///
/// Include this as a field in your object types to handle registration and
/// provide the object ID. On construction, it automatically registers the
/// object with the [`global_registry`].
pub struct ObjectBase {
    id: ObjectId,
}

impl ObjectBase {
    /// Create a new ObjectBase, registering the object in the global registry.
    ///
    /// # Panics
    ///
    /// Panics if the global registry is not initialized
    /// (call [`init_global_registry`] first).
    pub fn new<T: Object + 'static>() -> Self {
        let registry = global_registry().expect("Object registry not initialized");
        let id = registry.register::<T>();
        Self { id }
    }

    /// Get the object's ID.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Get the object's name from the registry.
    pub fn name(&self) -> String {
        global_registry()
            .and_then(|r| r.object_name(self.id))
            .unwrap_or_default()
    }

    /// Set the object's name in the registry.
    pub fn set_name(&self, name: impl Into<String>) {
        if let Ok(registry) = global_registry() {
            let _ = registry.set_object_name(self.id, name.into());
        }
    }

    /// Get the parent object ID.
    pub fn parent(&self) -> Option<ObjectId> {
        global_registry()
            .and_then(|r| r.parent(self.id))
            .ok()
            .flatten()
    }

    /// Set the parent object.
    pub fn set_parent(&self, parent: Option<ObjectId>) -> ObjectResult<()> {
        global_registry()?.set_parent(self.id, parent)
    }

    /// Get child object IDs.
    pub fn children(&self) -> Vec<ObjectId> {
        global_registry()
            .and_then(|r| r.children(self.id))
            .unwrap_or_default()
    }

    /// Get all ancestors from immediate parent to root.
    pub fn ancestors(&self) -> Vec<ObjectId> {
        global_registry()
            .and_then(|r| r.ancestors(self.id))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestObject {
        base: ObjectBase,
    }

    impl TestObject {
        fn new() -> Self {
            Self {
                base: ObjectBase::new::<Self>(),
            }
        }
    }

    impl Object for TestObject {
        fn object_id(&self) -> ObjectId {
            self.base.id()
        }
    }

    fn setup() {
        init_global_registry();
    }

    #[test]
    fn test_register_and_contains() {
        setup();
        let obj = TestObject::new();
        let registry = global_registry().unwrap();
        assert!(registry.contains(obj.object_id()));
    }

    #[test]
    fn test_parent_child() {
        setup();
        let parent = TestObject::new();
        let child = TestObject::new();

        child.base.set_parent(Some(parent.object_id())).unwrap();

        assert_eq!(child.base.parent(), Some(parent.object_id()));
        assert_eq!(parent.base.children(), vec![child.object_id()]);
    }

    #[test]
    fn test_ancestors() {
        setup();
        let root = TestObject::new();
        let mid = TestObject::new();
        let leaf = TestObject::new();

        mid.base.set_parent(Some(root.object_id())).unwrap();
        leaf.base.set_parent(Some(mid.object_id())).unwrap();

        assert_eq!(
            leaf.base.ancestors(),
            vec![mid.object_id(), root.object_id()]
        );

        let registry = global_registry().unwrap();
        assert!(registry
            .is_descendant_of(leaf.object_id(), root.object_id())
            .unwrap());
        assert!(!registry
            .is_descendant_of(root.object_id(), leaf.object_id())
            .unwrap());
    }

    #[test]
    fn test_circular_parentage_rejected() {
        setup();
        let a = TestObject::new();
        let b = TestObject::new();

        b.base.set_parent(Some(a.object_id())).unwrap();
        let result = a.base.set_parent(Some(b.object_id()));
        assert_eq!(result, Err(ObjectError::CircularParentage));
    }

    #[test]
    fn test_destroy_removes_descendants() {
        setup();
        let parent = TestObject::new();
        let child = TestObject::new();
        child.base.set_parent(Some(parent.object_id())).unwrap();

        let registry = global_registry().unwrap();
        registry.destroy(parent.object_id()).unwrap();

        assert!(!registry.contains(parent.object_id()));
        assert!(!registry.contains(child.object_id()));
    }

    #[test]
    fn test_object_name() {
        setup();
        let obj = TestObject::new();
        obj.base.set_name("picker_root");
        assert_eq!(obj.base.name(), "picker_root");
    }
}
