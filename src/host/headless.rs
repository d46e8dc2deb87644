//! In-process animation host with a manual clock.
//!
//! [`HeadlessHost`] models the parts of a retained animation system that
//! the dispatcher relies on:
//!
//! - [`Layer`]s hold float properties; every write goes through the
//!   installed resolver and, failing that, the host's default implicit
//!   animation
//! - transactions nest, and each carries a one-shot completion that fires
//!   once every animation started inside it has finished
//! - time only moves when [`HeadlessHost::advance`] is called
//!
//! ```ignore
//! let host = HeadlessHost::new();
//! let mut card = host.layer();
//! card.set_immediate("opacity", 1.0);
//!
//! card.set("opacity", 0.0);           // default implicit animation
//! host.advance(Duration::from_millis(125));
//! assert!(card.presentation("opacity") < 1.0);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::LazyLock;
use std::time::Duration;

use super::{
    AnimatableObject, AnimationHost, AnimationResolver, Completion, ObjectId, ResolvedAction,
};
use crate::action_table::ActionTable;
use crate::animation::{AnimationHandle, AnimationSpec, FillMode};

static EMPTY_TABLE: LazyLock<ActionTable> = LazyLock::new(ActionTable::new);

/// Behaviour of the headless host when no resolver claims a change
#[derive(Clone, Debug)]
pub struct HeadlessConfig {
    /// Animate unclaimed changes with `default_animation`
    pub implicit_animations: bool,
    /// Spec used for the default implicit animation
    pub default_animation: AnimationSpec,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            implicit_animations: true,
            default_animation: AnimationSpec::ease_in_out(Duration::from_millis(250)),
        }
    }
}

impl HeadlessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn implicit_animations(mut self, enabled: bool) -> Self {
        self.implicit_animations = enabled;
        self
    }

    pub fn default_animation(mut self, spec: AnimationSpec) -> Self {
        self.default_animation = spec;
        self
    }
}

type AnimationId = u64;

struct RunningAnimation {
    id: AnimationId,
    object: ObjectId,
    key: String,
    handle: AnimationHandle,
    from: f32,
    to: f32,
    started_at: Duration,
    finished: bool,
}

impl RunningAnimation {
    fn remaining(&self, now: Duration) -> Duration {
        (self.started_at + self.handle.duration()).saturating_sub(now)
    }
}

#[derive(Default)]
struct Transaction {
    completion: Option<Completion>,
    /// Animations started inside this transaction that have not finished yet
    animations: Vec<AnimationId>,
}

#[derive(Default)]
struct HostState {
    clock: Duration,
    next_animation_id: AnimationId,
    running: Vec<RunningAnimation>,
    open: Vec<Transaction>,
    committed: Vec<Transaction>,
}

impl HostState {
    /// Stop waiting on the given animations
    fn forget(&mut self, ids: &[AnimationId]) {
        if ids.is_empty() {
            return;
        }
        for transaction in self.open.iter_mut().chain(self.committed.iter_mut()) {
            transaction.animations.retain(|id| !ids.contains(id));
        }
    }

    /// Remove every animation attached to `key` on `object`
    fn detach(&mut self, object: ObjectId, key: &str) {
        let detached: Vec<AnimationId> = self
            .running
            .iter()
            .filter(|a| a.object == object && a.key == key)
            .map(|a| a.id)
            .collect();
        self.running.retain(|a| !detached.contains(&a.id));
        self.forget(&detached);
    }
}

struct HostInner {
    config: HeadlessConfig,
    resolver: RefCell<Option<Rc<dyn AnimationResolver>>>,
    state: RefCell<HostState>,
}

/// Headless animation host. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct HeadlessHost {
    inner: Rc<HostInner>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::with_config(HeadlessConfig::default())
    }

    pub fn with_config(config: HeadlessConfig) -> Self {
        Self {
            inner: Rc::new(HostInner {
                config,
                resolver: RefCell::new(None),
                state: RefCell::new(HostState::default()),
            }),
        }
    }

    pub fn config(&self) -> &HeadlessConfig {
        &self.inner.config
    }

    /// Create a layer owned by this host
    pub fn layer(&self) -> Layer {
        Layer {
            id: ObjectId::next(),
            host: self.clone(),
            values: HashMap::new(),
            actions: None,
        }
    }

    /// Current host time
    pub fn now(&self) -> Duration {
        self.inner.state.borrow().clock
    }

    /// Number of open (uncommitted) transactions
    pub fn transaction_depth(&self) -> usize {
        self.inner.state.borrow().open.len()
    }

    /// Committed transactions whose completion has not fired yet
    pub fn pending_completions(&self) -> usize {
        self.inner.state.borrow().committed.len()
    }

    /// Animations still attached to `object`, oldest first
    pub fn animations(&self, object: ObjectId) -> Vec<AnimationHandle> {
        self.inner
            .state
            .borrow()
            .running
            .iter()
            .filter(|a| a.object == object)
            .map(|a| a.handle.clone())
            .collect()
    }

    /// The animation attached to `object` for `key`, if any
    pub fn animation(&self, object: ObjectId, key: &str) -> Option<AnimationHandle> {
        self.inner
            .state
            .borrow()
            .running
            .iter()
            .find(|a| a.object == object && a.key == key)
            .map(|a| a.handle.clone())
    }

    /// Number of animations that have not reached their end
    pub fn in_flight(&self) -> usize {
        self.inner
            .state
            .borrow()
            .running
            .iter()
            .filter(|a| !a.finished)
            .count()
    }

    /// Move the clock forward, finishing animations and firing completions
    pub fn advance(&self, dt: Duration) {
        let ready: Vec<Completion> = {
            let mut state = self.inner.state.borrow_mut();
            state.clock += dt;
            let now = state.clock;

            let mut done = Vec::new();
            for anim in state.running.iter_mut().filter(|a| !a.finished) {
                if anim.handle.is_finished_at(now.saturating_sub(anim.started_at)) {
                    anim.finished = true;
                    done.push(anim.id);
                }
            }
            state
                .running
                .retain(|a| !(a.finished && a.handle.is_removed_on_completion()));
            state.forget(&done);

            let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut state.committed)
                .into_iter()
                .partition(|t| t.animations.is_empty());
            state.committed = waiting;
            ready.into_iter().filter_map(|t| t.completion).collect()
        };

        // Completions may start new batches, so no borrow is held here
        for completion in ready {
            completion();
        }
    }

    /// Advance exactly far enough for every in-flight animation to finish
    pub fn advance_to_end(&self) {
        let remaining = {
            let state = self.inner.state.borrow();
            state
                .running
                .iter()
                .filter(|a| !a.finished)
                .map(|a| a.remaining(state.clock))
                .max()
                .unwrap_or(Duration::ZERO)
        };
        self.advance(remaining);
    }

    /// Decide how a change to `key` on `object` animates.
    fn resolve(&self, object: &dyn AnimatableObject, key: &str) -> Option<AnimationHandle> {
        let resolver = self.inner.resolver.borrow().clone();
        match resolver.and_then(|r| r.action_for(object, key)) {
            Some(ResolvedAction::Animate(handle)) => Some(handle),
            Some(ResolvedAction::Suppress) => None,
            None if self.inner.config.implicit_animations => {
                Some(self.inner.config.default_animation.build())
            }
            None => None,
        }
    }

    fn add_animation(
        &self,
        object: ObjectId,
        key: &str,
        mut handle: AnimationHandle,
        from: f32,
        to: f32,
    ) {
        if handle.key_path().is_none() {
            handle.set_key_path(key);
        }

        let mut state = self.inner.state.borrow_mut();

        // A new animation for the same property replaces the old one
        state.detach(object, key);

        let id = state.next_animation_id;
        state.next_animation_id += 1;
        for transaction in state.open.iter_mut() {
            transaction.animations.push(id);
        }

        log::trace!(
            "Adding {:?} animation for object {} key '{}' ({} -> {})",
            handle.kind(),
            object.raw(),
            key,
            from,
            to
        );

        let started_at = state.clock;
        state.running.push(RunningAnimation {
            id,
            object,
            key: key.to_string(),
            handle,
            from,
            to,
            started_at,
            finished: false,
        });
    }

    /// The change to `key` jumps straight to its model value
    fn settle(&self, object: ObjectId, key: &str) {
        self.inner.state.borrow_mut().detach(object, key);
    }

    fn presentation_value(&self, object: ObjectId, key: &str, model: f32) -> f32 {
        let state = self.inner.state.borrow();
        let Some(anim) = state
            .running
            .iter()
            .rev()
            .find(|a| a.object == object && a.key == key)
        else {
            return model;
        };

        if !anim.finished {
            let elapsed = state.clock.saturating_sub(anim.started_at);
            let t = anim.handle.progress_at(elapsed);
            anim.from + (anim.to - anim.from) * t
        } else if anim.handle.fill_mode().contains(FillMode::FORWARDS) {
            anim.to
        } else {
            model
        }
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationHost for HeadlessHost {
    fn begin_transaction(&self) {
        self.inner
            .state
            .borrow_mut()
            .open
            .push(Transaction::default());
    }

    fn set_completion(&self, completion: Completion) {
        match self.inner.state.borrow_mut().open.last_mut() {
            Some(transaction) => transaction.completion = Some(completion),
            None => log::warn!("Completion set outside of a transaction; ignoring"),
        }
    }

    fn commit_transaction(&self) {
        let mut state = self.inner.state.borrow_mut();
        match state.open.pop() {
            Some(transaction) if transaction.completion.is_some() => {
                state.committed.push(transaction)
            }
            Some(_) => {}
            None => log::warn!("Commit without a matching begin; ignoring"),
        }
    }

    fn resolver(&self) -> Option<Rc<dyn AnimationResolver>> {
        self.inner.resolver.borrow().clone()
    }

    fn set_resolver(&self, resolver: Rc<dyn AnimationResolver>) {
        *self.inner.resolver.borrow_mut() = Some(resolver);
    }
}

/// A headless animatable object with named float properties
pub struct Layer {
    id: ObjectId,
    host: HeadlessHost,
    values: HashMap<String, f32>,
    actions: Option<ActionTable>,
}

impl Layer {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Model value of `key` (0.0 if never set)
    pub fn get(&self, key: &str) -> f32 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// Set a property, letting the host decide how the change animates
    pub fn set(&mut self, key: &str, value: f32) {
        let from = self.presentation(key);
        self.values.insert(key.to_string(), value);

        match self.host.resolve(&*self, key) {
            Some(handle) => self.host.add_animation(self.id, key, handle, from, value),
            None => {
                log::trace!("No animation for object {} key '{}'", self.id.raw(), key);
                self.host.settle(self.id, key);
            }
        }
    }

    /// Set a property without consulting the resolver (initial values)
    pub fn set_immediate(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), value);
    }

    /// The value currently on screen, taking running animations into account
    pub fn presentation(&self, key: &str) -> f32 {
        self.host.presentation_value(self.id, key, self.get(key))
    }

    /// Replace this layer's action table wholesale
    pub fn set_controlled_actions(&mut self, table: ActionTable) {
        self.actions = Some(table);
    }

    pub fn clear_controlled_actions(&mut self) {
        self.actions = None;
    }

    /// This layer's action table; empty if never set
    pub fn controlled_actions(&self) -> &ActionTable {
        self.actions.as_ref().unwrap_or(&EMPTY_TABLE)
    }

    /// Builder form of [`set_controlled_actions`](Self::set_controlled_actions)
    pub fn with_controlled_actions(mut self, table: ActionTable) -> Self {
        self.set_controlled_actions(table);
        self
    }
}

impl AnimatableObject for Layer {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn action_table(&self) -> Option<&ActionTable> {
        self.actions.as_ref()
    }
}
