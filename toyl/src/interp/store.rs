//! Slot-indexed storage for program variables
//!
//! Names are mapped to slots once, while the tree is built. Evaluation only
//! ever sees slot indices. Each slot remembers which representation it
//! currently holds, and that tag only ever moves `Empty -> Fast -> Precise`.

use super::error::{InterpResult, RuntimeError};
use super::value::Value;
use crate::error::{BuildError, Result};
use bigdecimal::BigDecimal;
use std::collections::HashMap;
use tracing::trace;

/// Representation currently held by a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Empty,
    Fast,
    Precise,
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Empty,
    Fast(i64),
    Precise(BigDecimal),
}

impl Slot {
    fn kind(&self) -> SlotKind {
        match self {
            Slot::Empty => SlotKind::Empty,
            Slot::Fast(_) => SlotKind::Fast,
            Slot::Precise(_) => SlotKind::Precise,
        }
    }
}

/// Variable storage for one program evaluation
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    /// Declared name -> slot index
    names: HashMap<String, usize>,
    slots: Vec<Slot>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new `Empty` slot for `name`. Leaves the store untouched if
    /// the name is already declared.
    pub fn declare(&mut self, name: &str) -> Result<usize> {
        if self.names.contains_key(name) {
            return Err(BuildError::duplicate_declaration(name));
        }
        let slot = self.slots.len();
        self.names.insert(name.to_string(), slot);
        self.slots.push(Slot::Empty);
        Ok(slot)
    }

    /// Look up the slot for a declared name
    pub fn resolve(&self, name: &str) -> Result<usize> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| BuildError::unknown_variable(name))
    }

    pub fn read(&self, slot: usize) -> InterpResult<Value> {
        match self.slots.get(slot) {
            Some(Slot::Fast(n)) => Ok(Value::Fast(*n)),
            Some(Slot::Precise(d)) => Ok(Value::Precise(d.clone())),
            Some(Slot::Empty) | None => Err(RuntimeError::uninitialized_read(slot)),
        }
    }

    /// Store `value`, demoting the slot to `Precise` on the first precise
    /// write. A fast value written into a `Precise` slot is widened; the slot
    /// never goes back to `Fast`.
    ///
    /// # Panics
    ///
    /// If `slot` was not handed out by [`VariableStore::declare`].
    pub fn write(&mut self, slot: usize, value: &Value) {
        let entry = &mut self.slots[slot];
        *entry = match (entry.kind(), value) {
            (SlotKind::Empty | SlotKind::Fast, Value::Fast(n)) => Slot::Fast(*n),
            (SlotKind::Precise, Value::Fast(n)) => Slot::Precise(BigDecimal::from(*n)),
            (kind, Value::Precise(d)) => {
                if kind == SlotKind::Fast {
                    trace!(slot, "demoting slot to precise");
                }
                Slot::Precise(d.clone())
            }
        };
    }

    pub fn kind(&self, slot: usize) -> Option<SlotKind> {
        self.slots.get(slot).map(Slot::kind)
    }

    /// Number of declared variables
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Declared names with their slots, in slot order (for debugging)
    pub fn names(&self) -> Vec<(&str, usize)> {
        let mut names: Vec<_> = self.names.iter().map(|(n, s)| (n.as_str(), *s)).collect();
        names.sort_by_key(|(_, s)| *s);
        names
    }

    /// Same name -> slot mapping with every slot reset to `Empty`, for
    /// running a program again from scratch.
    pub fn fresh(&self) -> Self {
        VariableStore {
            names: self.names.clone(),
            slots: vec![Slot::Empty; self.slots.len()],
        }
    }
}
