use indexmap::IndexSet;
use serde_json::{Map, Value};
use tracing::trace;

use super::{
    Path, PathSegment,
    error::{ErrorList, FieldError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone)]
struct Subscription {
    id: SubscriptionId,
    path: Path,
}

/// Owns the form data and the current error list.
///
/// Every read and write goes through a [`Path`]; widgets never hold a
/// reference into the data tree. Writes mark the subscribers of the written
/// path and of its ancestors, which the host drains with
/// [`FormStore::drain_notifications`].
#[derive(Debug, Clone)]
pub struct FormStore {
    data: Value,
    errors: ErrorList,
    subscriptions: Vec<Subscription>,
    pending: IndexSet<SubscriptionId>,
    next_id: u64,
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl FormStore {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            errors: Vec::new(),
            subscriptions: Vec::new(),
            pending: IndexSet::new(),
            next_id: 0,
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// `None` when any segment along the path is missing or has the wrong
    /// container shape.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        value_at_path(&self.data, path)
    }

    /// Writes `value` at `path`, creating objects for key segments and
    /// arrays for index segments along the way.
    pub fn set(&mut self, path: &Path, value: Value) {
        insert_path(&mut self.data, path.segments(), value);
        trace!(path = %path, "store write");
        self.notify(path);
    }

    /// Writes `value` only when nothing is stored at `path` yet.
    pub fn set_if_absent(&mut self, path: &Path, value: Value) -> bool {
        if self.get(path).is_some() {
            return false;
        }
        self.set(path, value);
        true
    }

    /// Removes the value at `path`; array elements after it shift down.
    pub fn remove(&mut self, path: &Path) -> Option<Value> {
        let (last, parent) = path.segments().split_last()?;
        let container = value_at_path_mut(&mut self.data, parent)?;
        let mut shifted = 0..0;
        let removed = match (container, last) {
            (Value::Object(map), PathSegment::Key(key)) => map.shift_remove(key),
            (Value::Array(items), PathSegment::Index(index)) if *index < items.len() => {
                shifted = *index + 1..items.len();
                Some(items.remove(*index))
            }
            _ => None,
        };
        if removed.is_some() {
            self.notify(path);
            let parent = Path::new(parent.to_vec());
            for index in shifted {
                self.notify(&parent.child(index));
            }
        }
        removed
    }

    pub fn errors(&self) -> &ErrorList {
        &self.errors
    }

    /// Errors attached exactly to `path`.
    pub fn errors_at(&self, path: &Path) -> Vec<&FieldError> {
        self.errors.iter().filter(|error| &error.path == path).collect()
    }

    /// Errors attached to `path` or anything below it.
    pub fn errors_within(&self, path: &Path) -> Vec<&FieldError> {
        self.errors
            .iter()
            .filter(|error| path.is_ancestor_or_self(&error.path))
            .collect()
    }

    /// Swaps in a new error list wholesale.
    pub fn replace_errors(&mut self, errors: ErrorList) {
        let previous = std::mem::replace(&mut self.errors, errors);
        let touched: Vec<Path> = previous
            .iter()
            .chain(self.errors.iter())
            .map(|error| error.path.clone())
            .collect();
        for path in touched {
            self.notify(&path);
        }
    }

    pub fn clear_errors(&mut self) {
        self.replace_errors(Vec::new());
    }

    pub fn subscribe(&mut self, path: Path) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, path });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.pending.shift_remove(&id);
    }

    /// Subscribers whose path was written (or had a descendant written)
    /// since the last drain, in subscription order.
    pub fn drain_notifications(&mut self) -> Vec<SubscriptionId> {
        let mut ids: Vec<_> = self.pending.drain(..).collect();
        ids.sort();
        ids
    }

    fn notify(&mut self, path: &Path) {
        for subscription in &self.subscriptions {
            if subscription.path.is_ancestor_or_self(path) {
                self.pending.insert(subscription.id);
            }
        }
    }
}

fn value_at_path<'a>(value: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.segments() {
        current = match (current, segment) {
            (Value::Object(map), PathSegment::Key(key)) => map.get(key)?,
            (Value::Array(items), PathSegment::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

fn value_at_path_mut<'a>(value: &'a mut Value, segments: &[PathSegment]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in segments {
        current = match (current, segment) {
            (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key)?,
            (Value::Array(items), PathSegment::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

fn insert_path(root: &mut Value, path: &[PathSegment], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        *root = value;
        return;
    };

    let slot = match head {
        PathSegment::Key(key) => {
            if !root.is_object() {
                *root = Value::Object(Map::new());
            }
            let Value::Object(map) = root else {
                return;
            };
            map.entry(key.clone()).or_insert(Value::Null)
        }
        PathSegment::Index(index) => {
            if !root.is_array() {
                *root = Value::Array(Vec::new());
            }
            let Value::Array(items) = root else {
                return;
            };
            if items.len() <= *index {
                items.resize(*index + 1, Value::Null);
            }
            &mut items[*index]
        }
    };
    insert_path(slot, rest, value);
}
