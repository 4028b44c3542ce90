//! Client-side state containers
//!
//! The map, chat and drawer panels only talk to each other through these
//! stores. Each one wraps an [`Observable`] so the UI layer can subscribe to
//! changes; mutations are synchronous and the last write wins.

mod chat;
mod clock;
mod context_menu;
mod drawer;
mod map;

pub use chat::*;
pub use clock::*;
pub use context_menu::*;
pub use drawer::*;
pub use map::*;

/// Handle returned by [`Observable::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Box<dyn Fn(&S)>;

/// A value plus the listeners interested in it
pub struct Observable<S> {
    state: S,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
    next_id: u64,
}

impl<S> Observable<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> &S {
        &self.state
    }

    /// Mutate the state and notify every subscriber once
    pub fn update(&mut self, f: impl FnOnce(&mut S)) {
        f(&mut self.state);
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    pub fn subscribe(&mut self, listener: impl Fn(&S) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(candidate, _)| *candidate != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<S: Default> Default for Observable<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Observable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_update_notifies_each_subscriber_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Observable::new(0);

        let sink = seen.clone();
        store.subscribe(move |v| sink.borrow_mut().push(*v));
        store.update(|v| *v = 5);
        store.update(|v| *v += 1);

        assert_eq!(*seen.borrow(), vec![5, 6]);
        assert_eq!(*store.get(), 6);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let count = Rc::new(RefCell::new(0));
        let mut store = Observable::new(String::new());

        let sink = count.clone();
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);
        store.update(|s| s.push('a'));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.update(|s| s.push('b'));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }
}
