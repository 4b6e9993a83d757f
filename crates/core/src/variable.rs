use crate::callback::Callback;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A shared value that notifies subscribers when it changes.
///
/// Subscribers are zero-argument callbacks. They receive no payload and read
/// the value back from the variable if they need it. The subscriber list is a
/// multicast list: the same handle may be registered more than once and is
/// then invoked once per registration.
///
/// Only `value` is serialized. A deserialized variable starts with no
/// subscribers.
///
/// The variable is single-threaded. Callbacks are `Rc`-based, so the type is
/// neither `Send` nor `Sync`, and a callback must not try to mutate the
/// variable that is notifying it.
#[derive(Serialize, Deserialize)]
pub struct AssetVariable<T> {
    value: T,
    #[serde(skip)]
    subscribers: Vec<Callback>,
}

impl<T> AssetVariable<T> {
    /// Create a variable holding `value` with no subscribers.
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
        }
    }

    /// Current value. Never notifies.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store `value` and notify every subscriber.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.invoke_callback();
    }

    /// Store `value`, notify every subscriber and return the previous value.
    pub fn replace(&mut self, value: T) -> T {
        let old = std::mem::replace(&mut self.value, value);
        self.invoke_callback();
        old
    }

    /// Raw write access for persistence and inspector layers.
    ///
    /// Writes through this reference do not notify. Callers that change the
    /// value this way must follow up with [`AssetVariable::on_external_edit`].
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Manual callback trigger. Notifies every subscriber without touching
    /// the value.
    pub fn invoke_callback(&self) {
        if self.subscribers.is_empty() {
            return;
        }
        trace!(subscribers = self.subscribers.len(), "notifying subscribers");
        for callback in &self.subscribers {
            callback.call();
        }
    }

    /// Entry point for the host's editor/validation layer, called after the
    /// stored value was edited from outside (inspector, asset reload).
    pub fn on_external_edit(&self) {
        trace!("external edit");
        self.invoke_callback();
    }

    /// Register `callback`. No duplicate detection.
    pub fn subscribe(&mut self, callback: Callback) {
        self.subscribers.push(callback);
    }

    /// Remove the first registration of `callback`. Unknown callbacks are
    /// ignored.
    pub fn unsubscribe(&mut self, callback: &Callback) {
        if let Some(pos) = self.subscribers.iter().position(|c| c == callback) {
            self.subscribers.remove(pos);
        }
    }

    /// Number of registrations, counting duplicates.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Consume the variable, dropping its subscribers.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Default> Default for AssetVariable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for AssetVariable<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for AssetVariable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetVariable")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
