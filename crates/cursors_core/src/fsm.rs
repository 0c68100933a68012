//! State Machine Runtime
//!
//! Flat state machines driven by `Copy` events. Transitions are looked up by
//! `(state, event)`; the first match wins. Entry callbacks run after the
//! state changes and every transition taken is recorded.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Callback run when a state is entered
pub type Action = Box<dyn FnMut() + Send>;

/// An edge of the state graph
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub from: S,
    pub event: E,
    pub to: S,
}

impl<S, E> Transition<S, E> {
    pub fn new(from: S, event: E, to: S) -> Self {
        Self { from, event, to }
    }
}

/// Builder for [`StateMachine`]
pub struct StateMachineBuilder<S, E> {
    initial: S,
    transitions: Vec<Transition<S, E>>,
    on_enter: FxHashMap<S, Vec<Action>>,
}

impl<S, E> StateMachineBuilder<S, E>
where
    S: Copy + Eq + Hash,
    E: Copy + Eq,
{
    /// Add a transition (from, event, to)
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    /// Run `action` every time `state` is entered
    pub fn on_enter<F: FnMut() + Send + 'static>(mut self, state: S, action: F) -> Self {
        self.on_enter
            .entry(state)
            .or_default()
            .push(Box::new(action));
        self
    }

    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current: self.initial,
            transitions: self.transitions,
            on_enter: self.on_enter,
            history: Vec::new(),
        }
    }
}

/// A state machine instance
pub struct StateMachine<S, E> {
    current: S,
    transitions: Vec<Transition<S, E>>,
    on_enter: FxHashMap<S, Vec<Action>>,
    history: Vec<(S, E, S)>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash,
    E: Copy + Eq,
{
    /// Machine with a fixed transition table and no callbacks
    pub fn new(initial: S, transitions: Vec<Transition<S, E>>) -> Self {
        Self {
            current: initial,
            transitions,
            on_enter: FxHashMap::default(),
            history: Vec::new(),
        }
    }

    pub fn builder(initial: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder {
            initial,
            transitions: Vec::new(),
            on_enter: FxHashMap::default(),
        }
    }

    pub fn current_state(&self) -> S {
        self.current
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }

    /// Transitions taken so far as (from, event, to) triples
    pub fn history(&self) -> &[(S, E, S)] {
        &self.history
    }

    fn find(&self, event: E) -> Option<S> {
        self.transitions
            .iter()
            .find(|t| t.from == self.current && t.event == event)
            .map(|t| t.to)
    }

    /// Whether `event` would move the machine from its current state
    pub fn can_send(&self, event: E) -> bool {
        self.find(event).is_some()
    }

    /// Send an event, returning the state afterwards
    ///
    /// Events with no matching transition leave the machine untouched.
    pub fn send(&mut self, event: E) -> S {
        let from = self.current;
        let Some(to) = self.find(event) else {
            return from;
        };

        self.current = to;
        self.history.push((from, event, to));

        if let Some(callbacks) = self.on_enter.get_mut(&to) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }
        to
    }
}
