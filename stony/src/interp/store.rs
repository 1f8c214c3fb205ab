//! Variable store shared across evaluations of one session

use super::value::Value;
use crate::symbols::{VariableId, VariableRef};
use std::collections::HashMap;

/// A variable and its current value
#[derive(Debug, Clone)]
pub struct Slot {
    pub symbol: VariableRef,
    pub value: Value,
}

/// Values keyed by variable identity, so shadowed and hidden variables never collide
#[derive(Debug, Default)]
pub struct VariableStore {
    slots: HashMap<VariableId, Slot>,
    /// Declaration order
    order: Vec<VariableId>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, or overwrite the value while keeping the stored symbol
    pub fn upsert(&mut self, symbol: &VariableRef, value: Value) {
        if let Some(slot) = self.slots.get_mut(&symbol.id) {
            slot.value = value;
            return;
        }
        self.order.push(symbol.id);
        self.slots.insert(
            symbol.id,
            Slot {
                symbol: VariableRef::clone(symbol),
                value,
            },
        );
    }

    /// Overwrite an existing value; `false` if the variable has no slot
    pub fn assign(&mut self, id: VariableId, value: Value) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.value = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: VariableId) -> Option<&Value> {
        self.slots.get(&id).map(|slot| &slot.value)
    }

    /// Most recently declared variable called `name`
    pub fn lookup_by_name(&self, name: &str) -> Option<&Slot> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.slots.get(id))
            .find(|slot| slot.symbol.name == name)
    }

    /// Slots in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.order.iter().filter_map(|id| self.slots.get(id))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every slot whose variable fails `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&Slot) -> bool) {
        self.slots.retain(|_, slot| keep(slot));
        let slots = &self.slots;
        self.order.retain(|id| slots.contains_key(id));
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }
}
