//! Stable 32-bit ids and the dense arenas they index into.
//!
//! Every pointer-shaped field in the original design (parent, children,
//! stacking links, history entries) becomes an `Option<NodeId>` here. The
//! arena owns storage; ids stay valid across removals because freed slots
//! are tracked separately rather than reused immediately.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(NodeId);
id_type!(MonitorId);
id_type!(DesktopId);

/// A dense arena keyed by a 32-bit id, with tombstoned removal.
///
/// Ids are never reused within the lifetime of an `Arena`; this keeps
/// history and stacking-list entries (which outlive a single mutation)
/// from silently pointing at a different, unrelated node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<T> {
    slots: HashMap<u32, T>,
    next_id: u32,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.slots.insert(id, value);
        id
    }

    /// Insert at a caller-chosen id, advancing `next_id` past it if needed.
    ///
    /// Used when restoring a snapshot, where ids must match what was dumped.
    pub fn insert_at(&mut self, id: u32, value: T) {
        self.slots.insert(id, value);
        if id >= self.next_id {
            self.next_id = id + 1;
        }
    }

    pub fn remove(&mut self, id: u32) -> Option<T> {
        self.slots.remove(&id)
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.slots.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.slots.get_mut(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.slots.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.keys().copied()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.next_id = 0;
    }
}
