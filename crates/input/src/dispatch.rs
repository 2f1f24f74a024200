use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::binding::KeyBindings;
use crate::state::InputState;

/// A raw key event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: true,
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: false,
        }
    }
}

struct Listener {
    state: Rc<RefCell<InputState>>,
    bindings: KeyBindings,
}

type Registry = RefCell<BTreeMap<u64, Listener>>;

/// Host-side key event fan-out.
///
/// Single-threaded: the host calls [`KeyDispatcher::dispatch`] from its event
/// loop between frames. Listeners are registered with [`KeyDispatcher::subscribe`]
/// and stay registered exactly as long as the returned [`Subscription`] lives.
#[derive(Default)]
pub struct KeyDispatcher {
    registry: Rc<Registry>,
    next_id: Cell<u64>,
}

impl KeyDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `state` to receive key events filtered through `bindings`.
    pub fn subscribe(
        &self,
        state: Rc<RefCell<InputState>>,
        bindings: KeyBindings,
    ) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.registry
            .borrow_mut()
            .insert(id, Listener { state, bindings });
        tracing::debug!(id, "key listener registered");
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver one event to every listener. Returns how many listeners had the
    /// key bound; unbound keys are dropped without error.
    pub fn dispatch(&self, event: &KeyEvent) -> usize {
        let registry = self.registry.borrow();
        let mut accepted = 0;
        for listener in registry.values() {
            if listener
                .state
                .borrow_mut()
                .apply_key(&listener.bindings, &event.key, event.pressed)
            {
                accepted += 1;
            }
        }
        if accepted == 0 {
            tracing::trace!(key = %event.key, "ignored key event");
        }
        accepted
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().len()
    }
}

/// Registration guard returned by [`KeyDispatcher::subscribe`].
///
/// Dropping it deregisters the listener.
#[must_use = "dropping a Subscription deregisters its listener immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Whether the listener is still registered with a live dispatcher.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| r.borrow().contains_key(&self.id))
    }

    /// Deregister now. Same as dropping.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.borrow_mut().remove(&self.id).is_some() {
                tracing::debug!(id = self.id, "key listener deregistered");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    fn shared() -> Rc<RefCell<InputState>> {
        Rc::new(RefCell::new(InputState::new()))
    }

    #[test]
    fn dispatch_reaches_subscribed_state() {
        let dispatcher = KeyDispatcher::new();
        let state = shared();
        let _sub = dispatcher.subscribe(state.clone(), KeyBindings::default());

        assert_eq!(dispatcher.dispatch(&KeyEvent::down("w")), 1);
        assert!(state.borrow().is_held(Direction::Forward));

        assert_eq!(dispatcher.dispatch(&KeyEvent::up("w")), 1);
        assert!(!state.borrow().is_held(Direction::Forward));
    }

    #[test]
    fn unbound_key_is_not_accepted() {
        let dispatcher = KeyDispatcher::new();
        let state = shared();
        let _sub = dispatcher.subscribe(state.clone(), KeyBindings::default());

        assert_eq!(dispatcher.dispatch(&KeyEvent::down("Enter")), 0);
        assert!(!state.borrow().any_held());
    }

    #[test]
    fn dropped_subscription_stops_mutation() {
        let dispatcher = KeyDispatcher::new();
        let state = shared();
        let sub = dispatcher.subscribe(state.clone(), KeyBindings::default());
        assert!(sub.is_active());
        assert_eq!(dispatcher.listener_count(), 1);

        drop(sub);
        assert_eq!(dispatcher.listener_count(), 0);
        assert_eq!(dispatcher.dispatch(&KeyEvent::down("a")), 0);
        assert!(!state.borrow().is_held(Direction::Left));
    }

    #[test]
    fn cancel_deregisters() {
        let dispatcher = KeyDispatcher::new();
        let sub = dispatcher.subscribe(shared(), KeyBindings::default());
        sub.cancel();
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn subscription_outliving_dispatcher_is_inactive() {
        let dispatcher = KeyDispatcher::new();
        let sub = dispatcher.subscribe(shared(), KeyBindings::default());
        drop(dispatcher);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn listeners_use_their_own_bindings() {
        let dispatcher = KeyDispatcher::new();
        let wasd = shared();
        let arrows = shared();
        let _a = dispatcher.subscribe(wasd.clone(), KeyBindings::default());
        let _b = dispatcher.subscribe(
            arrows.clone(),
            KeyBindings {
                forward: "ArrowUp".into(),
                backward: "ArrowDown".into(),
                left: "ArrowLeft".into(),
                right: "ArrowRight".into(),
            },
        );

        assert_eq!(dispatcher.dispatch(&KeyEvent::down("ArrowUp")), 1);
        assert!(arrows.borrow().is_held(Direction::Forward));
        assert!(!wasd.borrow().is_held(Direction::Forward));
    }
}
