use std::cell::RefCell;

use super::DispatchContext;
use crate::active::ActiveActionSet;
use crate::error::{Error, Result};
use crate::host::{AnimationHost, Completion};

/// Holds one batch's action names and its open transaction.
///
/// Dropping the guard commits the transaction and then releases the names,
/// so the active set is restored even if the mutation unwinds.
struct BatchGuard<'a> {
    host: &'a dyn AnimationHost,
    active: &'a RefCell<ActiveActionSet>,
    acquired: Vec<String>,
}

impl<'a> BatchGuard<'a> {
    fn begin(
        host: &'a dyn AnimationHost,
        active: &'a RefCell<ActiveActionSet>,
        actions: Vec<String>,
        completion: Option<Completion>,
    ) -> Self {
        let acquired = active.borrow_mut().activate(actions);
        log::debug!("Animation batch started: {:?}", acquired);

        host.begin_transaction();
        if let Some(completion) = completion {
            host.set_completion(completion);
        }

        Self {
            host,
            active,
            acquired,
        }
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.host.commit_transaction();
        self.active.borrow_mut().deactivate(&self.acquired);
        log::debug!("Animation batch committed: {:?}", self.acquired);
    }
}

impl DispatchContext {
    /// Run `mutate` with `actions` active.
    ///
    /// Every property change made inside `mutate` on an object whose action
    /// table configures one of the active actions animates with that
    /// configuration. Returns once the transaction is committed; animations
    /// may still be running.
    ///
    /// # Panics
    ///
    /// Panics if `actions` is empty.
    pub fn animate<I, S, M>(&self, actions: I, mutate: M)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        M: FnOnce(),
    {
        if let Err(e) = self.run(collect(actions), mutate, None) {
            panic!("{e}");
        }
    }

    /// Like [`animate`](Self::animate), calling `on_complete` once every
    /// animation started by the batch has finished.
    ///
    /// # Panics
    ///
    /// Panics if `actions` is empty.
    pub fn animate_then<I, S, M, C>(&self, actions: I, mutate: M, on_complete: C)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        M: FnOnce(),
        C: FnOnce() + 'static,
    {
        if let Err(e) = self.run(collect(actions), mutate, Some(Box::new(on_complete))) {
            panic!("{e}");
        }
    }

    /// Fallible form of [`animate`](Self::animate)
    pub fn try_animate<I, S, M>(&self, actions: I, mutate: M) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        M: FnOnce(),
    {
        self.run(collect(actions), mutate, None)
    }

    fn run<M: FnOnce()>(
        &self,
        actions: Vec<String>,
        mutate: M,
        completion: Option<Completion>,
    ) -> Result<()> {
        if actions.is_empty() {
            return Err(Error::NoActions);
        }
        self.install();

        let guard = BatchGuard::begin(&*self.host, &self.state.active, actions, completion);
        mutate();
        drop(guard);
        Ok(())
    }
}

fn collect<I, S>(actions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    actions.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;
    use crate::host::headless::HeadlessHost;

    #[test]
    fn test_empty_actions_is_an_error() {
        let ctx = DispatchContext::new(HeadlessHost::new());
        let mut ran = false;
        assert_eq!(ctx.try_animate(Vec::<String>::new(), || ran = true), Err(Error::NoActions));
        assert!(!ran);
        assert!(!ctx.is_installed());
    }

    #[test]
    #[should_panic(expected = "at least one action")]
    fn test_animate_panics_on_empty_actions() {
        let ctx = DispatchContext::new(HeadlessHost::new());
        ctx.animate(Vec::<&str>::new(), || {});
    }

    #[test]
    fn test_actions_active_only_during_mutation() {
        let host = HeadlessHost::new();
        let ctx = DispatchContext::new(host.clone());
        let mut seen = Vec::new();
        let mut depth = 0;

        ctx.animate(["fade"], || {
            seen = ctx.active_actions();
            depth = host.transaction_depth();
        });

        assert_eq!(seen, ["fade"]);
        assert_eq!(depth, 1);
        assert!(ctx.active_actions().is_empty());
        assert_eq!(host.transaction_depth(), 0);
        assert!(ctx.is_installed());
    }

    #[test]
    fn test_panicking_mutation_restores_state() {
        let host = HeadlessHost::new();
        let ctx = DispatchContext::new(host.clone());

        let result = catch_unwind(AssertUnwindSafe(|| {
            ctx.animate(["fade"], || panic!("mutation failed"));
        }));

        assert!(result.is_err());
        assert!(!ctx.is_active("fade"));
        assert_eq!(host.transaction_depth(), 0);
    }
}
