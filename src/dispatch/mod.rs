//! Action-scoped dispatch of animation overrides.
//!
//! A [`DispatchContext`] ties together the set of currently active action
//! names and one host. Running a batch:
//!
//! 1. activates the requested action names
//! 2. opens a host transaction (with an optional completion)
//! 3. runs the mutation; every property change it makes is resolved by the
//!    context's interceptor against the changed object's action table
//! 4. commits the transaction and releases the action names
//!
//! The interceptor is installed into the host the first time a batch runs
//! (or when [`DispatchContext::install`] is called), wrapping whatever
//! resolver the host had before so that unclaimed changes keep their
//! default behaviour.
//!
//! The context is deliberately `!Send`: batches must all run on the thread
//! that owns the host.

mod batch;
mod interceptor;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::active::ActiveActionSet;
use crate::host::AnimationHost;

pub use interceptor::Interceptor;

/// What to do when actions are active but none configures the changed property
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissPolicy {
    /// Apply the change with no animation at all
    #[default]
    Suppress,
    /// Fall back to the host's default animation
    Defer,
}

#[derive(Clone, Debug, Default)]
pub struct DispatchConfig {
    pub miss_policy: MissPolicy,
    /// Panic when two active actions configure the same property of one
    /// object, instead of letting the higher-priority action win
    pub strict_overlap: bool,
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn miss_policy(mut self, policy: MissPolicy) -> Self {
        self.miss_policy = policy;
        self
    }

    pub fn strict_overlap(mut self, strict: bool) -> Self {
        self.strict_overlap = strict;
        self
    }
}

/// State shared between the context and its installed interceptor
pub(crate) struct DispatchState {
    pub(crate) config: DispatchConfig,
    pub(crate) active: RefCell<ActiveActionSet>,
}

/// Owns the active-action set for one host and runs animation batches.
pub struct DispatchContext {
    state: Rc<DispatchState>,
    host: Rc<dyn AnimationHost>,
    installed: Cell<bool>,
}

impl DispatchContext {
    pub fn new(host: impl AnimationHost + 'static) -> Self {
        Self::with_config(host, DispatchConfig::default())
    }

    pub fn with_config(host: impl AnimationHost + 'static, config: DispatchConfig) -> Self {
        Self {
            state: Rc::new(DispatchState {
                config,
                active: RefCell::new(ActiveActionSet::new()),
            }),
            host: Rc::new(host),
            installed: Cell::new(false),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.state.config
    }

    /// Install the interceptor into the host. Idempotent.
    pub fn install(&self) {
        if self.installed.get() {
            return;
        }
        let fallback = self.host.resolver();
        log::debug!(
            "Installing animation interceptor (fallback resolver: {})",
            fallback.is_some()
        );
        let interceptor = Interceptor::new(self.state.clone(), fallback);
        self.host.set_resolver(Rc::new(interceptor));
        self.installed.set(true);
    }

    pub fn is_installed(&self) -> bool {
        self.installed.get()
    }

    pub fn is_active(&self, action: &str) -> bool {
        self.state.active.borrow().contains(action)
    }

    /// Active action names in priority order
    pub fn active_actions(&self) -> Vec<String> {
        self.state
            .active
            .borrow()
            .iter()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::headless::HeadlessHost;

    #[test]
    fn test_install_is_idempotent() {
        let host = HeadlessHost::new();
        let ctx = DispatchContext::new(host.clone());
        assert!(!ctx.is_installed());
        assert!(host.resolver().is_none());

        ctx.install();
        let first = host.resolver();
        ctx.install();
        let second = host.resolver();

        assert!(ctx.is_installed());
        match (first, second) {
            (Some(a), Some(b)) => assert!(Rc::ptr_eq(&a, &b)),
            _ => panic!("interceptor should be installed"),
        }
    }

    #[test]
    fn test_config_builder() {
        let config = DispatchConfig::new()
            .miss_policy(MissPolicy::Defer)
            .strict_overlap(true);
        assert_eq!(config.miss_policy, MissPolicy::Defer);
        assert!(config.strict_overlap);
        assert_eq!(DispatchConfig::default().miss_policy, MissPolicy::Suppress);
    }
}
