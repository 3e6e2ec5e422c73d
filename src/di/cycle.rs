//! In-progress tracking for recursive resolution
//!
//! Every resolution that invokes a factory or auto-constructs a type marks its
//! [`TypeKey`] as in progress. Re-entering a marked key is a cycle; the chain
//! is also capped at a configurable depth. Marks are released by an RAII guard.

use super::TypeKey;
use crate::error::{MeshjectError, Result};
use std::cell::RefCell;

#[derive(Default)]
pub(crate) struct ResolutionStack {
    path: RefCell<Vec<TypeKey>>,
}

impl ResolutionStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as in progress until the returned guard is dropped
    pub(crate) fn enter(&self, key: TypeKey, max_depth: usize) -> Result<ResolutionGuard<'_>> {
        let mut path = self.path.borrow_mut();

        if let Some(start) = path.iter().position(|k| *k == key) {
            let cycle = path[start..]
                .iter()
                .chain(std::iter::once(&key))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(MeshjectError::CycleDetected { key, path: cycle });
        }

        if path.len() >= max_depth {
            return Err(MeshjectError::DepthExceeded {
                key,
                depth: path.len() + 1,
            });
        }

        path.push(key);
        Ok(ResolutionGuard { stack: self, key })
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.path.borrow().len()
    }
}

pub(crate) struct ResolutionGuard<'a> {
    stack: &'a ResolutionStack,
    key: TypeKey,
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        let mut path = self.stack.path.borrow_mut();
        if let Some(pos) = path.iter().rposition(|k| *k == self.key) {
            path.remove(pos);
        }
    }
}
