//! Slot and instance bookkeeping for lifecycle logging.
//!
//! A logical unit (an *owner*) may contain several logging call sites. Each
//! distinct call-site path becomes a *slot*, indexed in first-seen order;
//! slot 0 is the primary slot and is the only one that reports lifecycle
//! events. Each live activation of the owner carries an *instance marker*,
//! which gets an index among the owner's live activations.
//!
//! # Memory
//!
//! Owner entries are never dropped, even once they are empty. Their size is
//! bounded by the number of distinct call sites, not by how many times an
//! owner is activated.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;

/// Identity of a logical unit's definition. Compared by identity, never by
/// structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(OwnerKey);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum OwnerKey {
    Type(TypeId),
    Token(u64),
}

impl OwnerId {
    /// The owner identified by a Rust type, typically the component type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(OwnerKey::Type(TypeId::of::<T>()))
    }

    /// An owner identified by a host-supplied token.
    pub const fn from_token(token: u64) -> Self {
        Self(OwnerKey::Token(token))
    }
}

/// Opaque per-activation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceMarker(u64);

static NEXT_MARKER: AtomicU64 = AtomicU64::new(1);

impl InstanceMarker {
    /// Returns a marker that no other activation in this process holds.
    pub fn fresh() -> Self {
        Self(NEXT_MARKER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Registry of slots and instances per owner.
///
/// Create a fresh registry for isolation (tests, independent trees) or use
/// [`global_registry`] for the process-wide one.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    slots: HashMap<OwnerId, Vec<String>>,
    instances: HashMap<OwnerId, Vec<InstanceMarker>>,
}

/// A registry shared between loggers.
pub type SharedRegistry = Arc<Mutex<IdentityRegistry>>;

lazy_static! {
    /// The process-wide registry.
    ///
    /// Entries are created on first use and never cleared automatically.
    static ref GLOBAL_REGISTRY: SharedRegistry = Arc::new(Mutex::new(IdentityRegistry::new()));
}

/// Returns a handle to the process-wide registry.
pub fn global_registry() -> SharedRegistry {
    Arc::clone(&GLOBAL_REGISTRY)
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a fresh registry for sharing.
    pub fn shared() -> SharedRegistry {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Returns the slot index of `path` for `owner`, registering it if unseen.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lifecycle_logger::identity_registry::{IdentityRegistry, OwnerId};
    /// let mut registry = IdentityRegistry::new();
    /// let owner = OwnerId::from_token(1);
    ///
    /// assert_eq!(registry.resolve_slot(owner, "app.rs:10,"), 0);
    /// assert_eq!(registry.resolve_slot(owner, "app.rs:12,"), 1);
    /// assert_eq!(registry.resolve_slot(owner, "app.rs:10,"), 0);
    /// ```
    pub fn resolve_slot(&mut self, owner: OwnerId, path: &str) -> usize {
        let paths = self.slots.entry(owner).or_default();
        let index = match paths.iter().position(|p| p == path) {
            Some(index) => index,
            None => {
                paths.push(path.to_string());
                paths.len() - 1
            }
        };
        tracing::trace!(?owner, path, index, "resolved slot");
        index
    }

    /// Returns the index of `marker` among the owner's instances, registering
    /// it if unseen.
    pub fn resolve_instance(&mut self, owner: OwnerId, marker: InstanceMarker) -> usize {
        let index = position_or_push(self.instances.entry(owner).or_default(), marker);
        tracing::trace!(?owner, ?marker, index, "resolved instance");
        index
    }

    /// Forgets `marker`. The last instance takes over the freed index.
    pub fn release_instance(&mut self, owner: OwnerId, marker: InstanceMarker) {
        if let Some(markers) = self.instances.get_mut(&owner) {
            swap_remove_item(markers, &marker);
        }
    }

    /// Forgets `path`. The last slot takes over the freed index.
    pub fn release_slot(&mut self, owner: OwnerId, path: &str) {
        if let Some(paths) = self.slots.get_mut(&owner) {
            if let Some(index) = paths.iter().position(|p| p == path) {
                paths.swap_remove(index);
            }
        }
    }

    pub fn slot_count(&self, owner: OwnerId) -> usize {
        self.slots.get(&owner).map_or(0, Vec::len)
    }

    pub fn instance_count(&self, owner: OwnerId) -> usize {
        self.instances.get(&owner).map_or(0, Vec::len)
    }
}

fn position_or_push<T: PartialEq>(items: &mut Vec<T>, item: T) -> usize {
    match items.iter().position(|i| *i == item) {
        Some(index) => index,
        None => {
            items.push(item);
            items.len() - 1
        }
    }
}

fn swap_remove_item<T: PartialEq>(items: &mut Vec<T>, item: &T) {
    if let Some(index) = items.iter().position(|i| i == item) {
        items.swap_remove(index);
    }
}
