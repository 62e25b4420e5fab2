use std::collections::HashMap;

/// Stack of variable frames shared by the type checker and the evaluator.
///
/// Writes always land in the innermost frame, so popping a frame undoes every
/// write made while it was on top, including writes that shadowed outer names.
#[derive(Debug, Clone)]
pub struct Scopes<T> {
    frames: Vec<HashMap<String, T>>,
}

impl<T> Scopes<T> {
    pub fn new() -> Self {
        Scopes {
            frames: vec![HashMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
        debug!("scope push, depth {}", self.frames.len());
    }

    /// Drops the innermost frame. The root frame is never dropped.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
            debug!("scope pop, depth {}", self.frames.len());
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn set(&mut self, name: &str, value: T) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_owned(), value);
        }
    }
}

impl<T> Default for Scopes<T> {
    fn default() -> Self {
        Self::new()
    }
}
