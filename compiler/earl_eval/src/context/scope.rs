//! Stack of lexical scope frames.

use rustc_hash::FxHashMap;

/// Name-keyed frames; the base frame is never popped.
#[derive(Clone, Debug)]
pub struct ScopeStack<T> {
    frames: Vec<FxHashMap<String, T>>,
}

impl<T> ScopeStack<T> {
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![FxHashMap::default()],
        }
    }

    #[inline]
    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Pop the innermost frame. Popping the base frame empties it instead.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        } else if let Some(base) = self.frames.first_mut() {
            base.clear();
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Insert into the innermost frame; hands the item back if the name is
    /// already bound there. Outer frames may be shadowed freely.
    pub fn insert(&mut self, name: String, item: T) -> Result<(), T> {
        let Some(top) = self.frames.last_mut() else {
            return Err(item);
        };
        if top.contains_key(&name) {
            return Err(item);
        }
        top.insert(name, item);
        Ok(())
    }

    /// Innermost binding of `name`.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove the innermost binding of `name`.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.remove(name))
    }

    /// Drop every frame and start over with an empty base frame.
    pub fn clear(&mut self) {
        self.frames.truncate(1);
        if let Some(base) = self.frames.first_mut() {
            base.clear();
        }
    }
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}
