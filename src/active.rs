//! The set of action names currently in flight.
//!
//! Membership is reference counted: a name requested by two overlapping
//! batches stays active until both have released it. Iteration order is
//! defined so that the interceptor's "first match wins" rule is
//! deterministic:
//!
//! - names introduced by the most recently started batch come first
//! - within one batch, names keep the order they were requested in
//! - re-requesting a name that is already active keeps its position

#[derive(Debug)]
struct Entry {
    name: String,
    count: usize,
}

#[derive(Debug, Default)]
pub struct ActiveActionSet {
    // Front = highest priority
    entries: Vec<Entry>,
}

impl ActiveActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire every name in `names`.
    ///
    /// Returns the distinct names acquired, which must later be handed back
    /// to [`deactivate`](Self::deactivate) exactly once.
    pub fn activate<I, S>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut acquired: Vec<String> = Vec::new();
        let mut introduced = Vec::new();
        for name in names {
            let name = name.into();
            if acquired.contains(&name) {
                continue;
            }
            match self.entries.iter_mut().find(|e| e.name == name) {
                Some(entry) => entry.count += 1,
                None => introduced.push(Entry {
                    name: name.clone(),
                    count: 1,
                }),
            }
            acquired.push(name);
        }
        self.entries.splice(0..0, introduced);
        acquired
    }

    /// Release names previously returned by [`activate`](Self::activate).
    pub fn deactivate<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            let Some(index) = self.entries.iter().position(|e| e.name == name) else {
                log::warn!("Released action '{}' that was not active", name);
                continue;
            };
            let entry = &mut self.entries[index];
            entry.count -= 1;
            if entry.count == 0 {
                self.entries.remove(index);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Number of batches currently holding `name`
    pub fn count(&self, name: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map_or(0, |e| e.count)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Active names in priority order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}
