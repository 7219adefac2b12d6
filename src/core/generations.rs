use hashbrown::HashMap;

use crate::types::{Generation, RequestKind};

/// Per-operation request generations used to discard superseded replies.
#[derive(Debug, Default, Clone)]
pub struct Generations {
    latest: HashMap<RequestKind, Generation>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the generation for a newly issued request of `kind`.
    pub fn issue(&mut self, kind: RequestKind) -> Generation {
        let g = self.latest.entry(kind).or_insert(0);
        *g += 1;
        *g
    }

    /// Supersedes every in-flight request of `kind` without issuing a new one.
    pub fn invalidate(&mut self, kind: RequestKind) {
        self.issue(kind);
    }

    pub fn latest(&self, kind: RequestKind) -> Generation {
        self.latest.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_current(&self, kind: RequestKind, generation: Generation) -> bool {
        generation == self.latest(kind)
    }
}
