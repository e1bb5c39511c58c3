//! Synchronous observer lists.
//!
//! Each component owns one [`Observers`] list per event type it emits.
//! Subscribers are called in registration order, inside the call that
//! changed the state, before that call returns.

use std::fmt;

type Callback<E> = Box<dyn FnMut(&E)>;

pub struct Observers<E> {
    callbacks: Vec<Callback<E>>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Registers a callback. Callbacks fire in the order they were added.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&E) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    pub fn emit(&mut self, event: &E) {
        for callback in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers: Observers<u32> = Observers::new();

        let first = Rc::clone(&log);
        observers.subscribe(move |v| first.borrow_mut().push(("first", *v)));
        let second = Rc::clone(&log);
        observers.subscribe(move |v| second.borrow_mut().push(("second", *v)));

        observers.emit(&7);

        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
        assert_eq!(observers.len(), 2);
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let mut observers: Observers<String> = Observers::default();
        assert!(observers.is_empty());
        observers.emit(&"nothing".to_string());
    }
}
