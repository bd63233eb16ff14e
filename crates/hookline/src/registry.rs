//! Hook registry — callbacks registered per tag, grouped by priority.
//!
//! Storage is `tag → priority → callback id → record`. Both inner maps keep
//! insertion order; priority groups are sorted lazily, only when a new group
//! was added or something was removed since the last sort.

use std::collections::BTreeMap;

use dashmap::DashMap;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::callback::Callback;
use crate::identity::{self, CallbackId};

/// Conventional priority for callbacks that must run first.
pub const HIGHEST_PRIORITY: i32 = -1000;
/// Default priority.
pub const SYSTEM_PRIORITY: i32 = 100;
/// Conventional priority for callbacks that must run last.
pub const LOWEST_PRIORITY: i32 = 1000;

/// A stored registration.
#[derive(Debug, Clone)]
pub struct CallbackRecord {
    /// The callback representation.
    pub callback: Callback,
    /// Whether the callback chains the accumulator (filter) or is
    /// notified only (event).
    pub is_filter: bool,
}

/// A registration as seen through a snapshot.
#[derive(Debug, Clone)]
pub struct HookEntry {
    /// Callback identity.
    pub id: CallbackId,
    /// The stored record.
    pub record: CallbackRecord,
}

/// All registrations of one tag at one priority, in insertion order.
#[derive(Debug, Clone)]
pub struct PriorityGroup {
    /// Priority of this group.
    pub priority: i32,
    /// Registrations in insertion order.
    pub entries: Vec<HookEntry>,
}

/// Point-in-time copy of the whole registry, tags in lexical order and
/// priority groups ascending.
pub type RegistrySnapshot = BTreeMap<String, Vec<PriorityGroup>>;

/// Registrations for a single tag.
#[derive(Debug, Default)]
struct TagEntry {
    /// Priority → (callback id → record).
    groups: IndexMap<i32, IndexMap<CallbackId, CallbackRecord>>,
    /// Whether `groups` is currently in ascending priority order.
    sorted: bool,
}

impl TagEntry {
    fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.groups.sort_keys();
            self.sorted = true;
        }
    }

    fn to_groups(&self) -> Vec<PriorityGroup> {
        self.groups
            .iter()
            .map(|(priority, callbacks)| PriorityGroup {
                priority: *priority,
                entries: callbacks
                    .iter()
                    .map(|(id, record)| HookEntry {
                        id: id.clone(),
                        record: record.clone(),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Registry of hook callbacks organized by tag.
///
/// Tags live in a sharded map: registrations to different tags do not
/// contend, and every per-tag mutation (including the lazy sort) happens
/// under that tag's write guard.
#[derive(Debug, Default)]
pub struct HookRegistry {
    /// Tag → registrations.
    tags: DashMap<String, TagEntry>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a filter callback. Returns `false` if the callback
    /// representation is malformed, in which case nothing is stored.
    pub fn add_filter(&self, tag: &str, callback: impl Into<Callback>, priority: i32) -> bool {
        self.add(tag, callback.into(), priority, true)
    }

    /// Registers an event callback. Returns `false` if the callback
    /// representation is malformed, in which case nothing is stored.
    pub fn add_event(&self, tag: &str, callback: impl Into<Callback>, priority: i32) -> bool {
        self.add(tag, callback.into(), priority, false)
    }

    pub(crate) fn add(&self, tag: &str, callback: Callback, priority: i32, is_filter: bool) -> bool {
        let (callback, id) = identity::normalize_and_resolve(callback);
        let Some(id) = id else {
            warn!(
                tag = %tag,
                callback = ?callback,
                "Rejected callback with malformed representation"
            );
            return false;
        };

        let mut entry = self.tags.entry(tag.to_string()).or_default();
        // Only a brand-new priority group can break the ordering.
        if !entry.groups.contains_key(&priority) {
            entry.sorted = false;
        }

        debug!(
            tag = %tag,
            priority = priority,
            callback = %id,
            is_filter = is_filter,
            "Hook callback registered"
        );

        entry
            .groups
            .entry(priority)
            .or_default()
            .insert(id, CallbackRecord { callback, is_filter });

        true
    }

    /// Removes the registration at exactly `(tag, priority, callback)`.
    ///
    /// Returns whether such a registration existed.
    pub fn remove_filter(&self, tag: &str, callback: impl Into<Callback>, priority: i32) -> bool {
        let (_, id) = identity::normalize_and_resolve(callback.into());
        let Some(id) = id else {
            return false;
        };

        let Some(mut entry) = self.tags.get_mut(tag) else {
            return false;
        };
        let Some(group) = entry.groups.get_mut(&priority) else {
            return false;
        };
        if group.shift_remove(&id).is_none() {
            return false;
        }

        if group.is_empty() {
            entry.groups.shift_remove(&priority);
        }
        entry.sorted = false;
        let tag_empty = entry.groups.is_empty();
        drop(entry);

        if tag_empty {
            self.tags.remove_if(tag, |_, entry| entry.groups.is_empty());
        }

        debug!(
            tag = %tag,
            priority = priority,
            callback = %id,
            "Hook callback removed"
        );

        true
    }

    /// Alias of [`remove_filter`](Self::remove_filter).
    pub fn remove_event(&self, tag: &str, callback: impl Into<Callback>, priority: i32) -> bool {
        self.remove_filter(tag, callback, priority)
    }

    /// Removes every registration of a tag, or only its `priority` group.
    ///
    /// Always returns `true`; removing something absent is a no-op.
    pub fn remove_all_filters(&self, tag: &str, priority: Option<i32>) -> bool {
        match priority {
            None => {
                if self.tags.remove(tag).is_some() {
                    debug!(tag = %tag, "All hook callbacks removed");
                }
            }
            Some(priority) => {
                if let Some(mut entry) = self.tags.get_mut(tag) {
                    entry.groups.shift_remove(&priority);
                    entry.sorted = false;
                    let tag_empty = entry.groups.is_empty();
                    drop(entry);

                    if tag_empty {
                        self.tags.remove_if(tag, |_, entry| entry.groups.is_empty());
                    }
                    debug!(tag = %tag, priority = priority, "Hook priority group removed");
                }
            }
        }

        true
    }

    /// Alias of [`remove_all_filters`](Self::remove_all_filters).
    pub fn remove_all_events(&self, tag: &str, priority: Option<i32>) -> bool {
        self.remove_all_filters(tag, priority)
    }

    /// Returns whether anything is registered under `tag`.
    pub fn has_filter(&self, tag: &str) -> bool {
        self.tags
            .get(tag)
            .map(|entry| !entry.groups.is_empty())
            .unwrap_or(false)
    }

    /// Alias of [`has_filter`](Self::has_filter).
    pub fn has_event(&self, tag: &str) -> bool {
        self.has_filter(tag)
    }

    /// Returns the lowest priority at which `callback` is registered under
    /// `tag`, or `None` if it is not registered there.
    ///
    /// A callback registered at several priorities fires at all of them;
    /// only the lowest is reported here.
    pub fn find_filter(&self, tag: &str, callback: impl Into<Callback>) -> Option<i32> {
        let (_, id) = identity::normalize_and_resolve(callback.into());
        let id = id?;

        let mut entry = self.tags.get_mut(tag)?;
        entry.ensure_sorted();
        let lowest = entry
            .groups
            .iter()
            .find(|(_, callbacks)| callbacks.contains_key(&id))
            .map(|(priority, _)| *priority);
        lowest
    }

    /// Alias of [`find_filter`](Self::find_filter).
    pub fn find_event(&self, tag: &str, callback: impl Into<Callback>) -> Option<i32> {
        self.find_filter(tag, callback)
    }

    /// Returns a copy of a tag's priority groups in ascending order, sorting
    /// the stored groups first if needed. `None` if the tag is unregistered.
    ///
    /// The copy is what a dispatch iterates, so callbacks may mutate the
    /// registry while it runs.
    pub fn sorted_groups(&self, tag: &str) -> Option<Vec<PriorityGroup>> {
        let mut entry = self.tags.get_mut(tag)?;
        if entry.groups.is_empty() {
            return None;
        }
        entry.ensure_sorted();
        Some(entry.to_groups())
    }

    /// Returns a copy of every registration.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.tags
            .iter()
            .map(|entry| {
                let mut groups = entry.value().to_groups();
                groups.sort_by_key(|group| group.priority);
                (entry.key().clone(), groups)
            })
            .collect()
    }

    /// Returns all registered tags in lexical order.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.tags.iter().map(|entry| entry.key().clone()).collect();
        tags.sort();
        tags
    }

    /// Returns the number of registrations under a tag, across priorities.
    pub fn callback_count(&self, tag: &str) -> usize {
        self.tags
            .get(tag)
            .map(|entry| entry.groups.values().map(IndexMap::len).sum::<usize>())
            .unwrap_or(0)
    }

    /// Removes every registration.
    pub fn clear(&self) {
        self.tags.clear();
        info!("Hook registry cleared");
    }
}
