//! State threaded through one validation pass: where `$ref`s resolve, and how
//! deep the current reference chain is.

use std::sync::Arc;

use crate::config::DEFAULT_MAX_REF_DEPTH;
use crate::schema::ValueValidator;

/// Definition lookup plus the depth of the reference chain being followed.
///
/// Recursive schemas (a `Node` whose `next` is a `Node`) are legal; the depth
/// limit only stops chains that never bottom out in a value.
#[derive(Clone)]
pub struct ValidationContext {
    registry: Arc<dyn RegistryAccess>,
    depth: usize,
    max_depth: usize,
}

impl ValidationContext {
    pub fn new(registry: Arc<dyn RegistryAccess>, max_depth: usize) -> Self {
        Self {
            registry,
            depth: 0,
            max_depth,
        }
    }

    /// A context with no definitions; every reference is unconstrained.
    pub fn detached() -> Self {
        Self::new(Arc::new(NoDefinitions), DEFAULT_MAX_REF_DEPTH)
    }

    /// The context one reference further down, or `None` once the chain
    /// has reached `max_depth`.
    pub fn follow(&self) -> Option<Self> {
        (self.depth < self.max_depth).then(|| Self {
            registry: Arc::clone(&self.registry),
            depth: self.depth + 1,
            max_depth: self.max_depth,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn registry(&self) -> &dyn RegistryAccess {
        &*self.registry
    }
}

/// Looks up the validator of a `$defs` entry by name.
///
/// Implemented by [`ValidatorCache`](crate::cache::ValidatorCache), which
/// compiles definitions on first use.
pub trait RegistryAccess: Send + Sync {
    fn get_schema(&self, name: &str) -> Option<Arc<dyn ValueValidator>>;
}

struct NoDefinitions;

impl RegistryAccess for NoDefinitions {
    fn get_schema(&self, _name: &str) -> Option<Arc<dyn ValueValidator>> {
        None
    }
}
