//! Filter state owned by the console, published to the core on every change.

use listings_core::FilterSnapshot;

type Notify = Box<dyn Fn(FilterSnapshot) + Send>;

/// Holds the operator's filter selection and notifies a subscriber with a
/// fresh snapshot whenever it actually changes.
pub struct FilterStore {
    snapshot: FilterSnapshot,
    notify: Notify,
}

impl FilterStore {
    pub fn new(notify: impl Fn(FilterSnapshot) + Send + 'static) -> Self {
        Self {
            snapshot: FilterSnapshot::new(),
            notify: Box::new(notify),
        }
    }

    pub fn set(&mut self, name: &str, value: &str) {
        if self.snapshot.set(name, value) {
            self.publish();
        }
    }

    pub fn unset(&mut self, name: &str) {
        if self.snapshot.remove(name) {
            self.publish();
        }
    }

    pub fn reset(&mut self) {
        if !self.snapshot.is_empty() {
            self.snapshot = FilterSnapshot::new();
            self.publish();
        }
    }

    fn publish(&self) {
        (self.notify)(self.snapshot.clone());
    }
}
