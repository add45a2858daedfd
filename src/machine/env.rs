//! Environment frames, stored in an arena and addressed by integer id.
//!
//! Closures hold an `EnvRef` instead of a direct reference, so the cyclic
//! environment graphs created by the fixed-point combinator need no special
//! ownership treatment: the arena owns every frame and is dropped wholesale
//! when the machine finishes.

use std::collections::HashMap;
use std::fmt;

use super::value::Value;

/// Index of a frame in the [`EnvArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvRef(pub usize);

impl fmt::Display for EnvRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Frame {
    parent: Option<EnvRef>,
    bindings: HashMap<String, Value>,
}

pub struct EnvArena {
    frames: Vec<Frame>,
}

impl EnvArena {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Allocate a parentless frame.
    pub fn root(&mut self) -> EnvRef {
        self.push(None)
    }

    /// Allocate a frame whose lookups fall through to `parent`.
    pub fn child(&mut self, parent: EnvRef) -> EnvRef {
        self.push(Some(parent))
    }

    fn push(&mut self, parent: Option<EnvRef>) -> EnvRef {
        self.frames.push(Frame {
            parent,
            bindings: HashMap::new(),
        });
        EnvRef(self.frames.len() - 1)
    }

    pub fn bind(&mut self, env: EnvRef, name: String, value: Value) {
        self.frames[env.0].bindings.insert(name, value);
    }

    /// Resolve a name by walking the parent chain.
    pub fn lookup(&self, env: EnvRef, name: &str) -> Option<&Value> {
        let mut current = Some(env);
        while let Some(frame) = current {
            let frame = &self.frames[frame.0];
            if let Some(value) = frame.bindings.get(name) {
                return Some(value);
            }
            current = frame.parent;
        }
        None
    }
}

impl Default for EnvArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_the_parent_chain() {
        let mut arena = EnvArena::new();
        let root = arena.root();
        arena.bind(root, "x".to_string(), Value::Integer(1));
        let inner = arena.child(root);
        arena.bind(inner, "y".to_string(), Value::Integer(2));

        assert_eq!(arena.lookup(inner, "x"), Some(&Value::Integer(1)));
        assert_eq!(arena.lookup(inner, "y"), Some(&Value::Integer(2)));
        assert_eq!(arena.lookup(root, "y"), None);
    }

    #[test]
    fn inner_bindings_shadow_outer_ones() {
        let mut arena = EnvArena::new();
        let root = arena.root();
        arena.bind(root, "x".to_string(), Value::Integer(1));
        let inner = arena.child(root);
        arena.bind(inner, "x".to_string(), Value::Integer(2));

        assert_eq!(arena.lookup(inner, "x"), Some(&Value::Integer(2)));
        assert_eq!(arena.lookup(root, "x"), Some(&Value::Integer(1)));
    }
}
