use super::command::Operator;
use crate::error::CalcError;

use std::collections::VecDeque;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Stack {
    store: VecDeque<f64>,
}

impl Stack {
    pub fn push(&mut self, v: f64) {
        self.store.push_back(v)
    }

    pub fn pop(&mut self) -> Option<f64> {
        self.store.pop_back()
    }

    #[cfg(test)]
    pub fn top(&self) -> Option<f64> {
        self.store.back().copied()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&mut self) {
        self.store.clear()
    }

    /// Iterate from the bottom of the stack to the top.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.store.iter().copied()
    }

    /// Move the contents out, leaving this stack empty.
    pub fn take(&mut self) -> Stack {
        std::mem::take(self)
    }

    fn require(&self, action: &'static str, needed: usize) -> Result<(), CalcError> {
        if self.len() < needed {
            Err(CalcError::StackUnderflow {
                action,
                needed,
                found: self.len(),
            })
        } else {
            Ok(())
        }
    }

    /// Swap the top two elements.
    pub fn flip(&mut self) -> Result<(), CalcError> {
        self.require("flip", 2)?;

        let len = self.len();
        self.store.swap(len - 1, len - 2);

        Ok(())
    }

    pub fn negate_top(&mut self) {
        if let Some(top) = self.store.back_mut() {
            *top *= -1.0;
        }
    }

    /// Pop `b` (the top) then `a`, push `a op b` and return it.
    ///
    /// Division by zero and invalid powers are not errors, they leave an
    /// infinity or NaN on the stack.
    pub fn apply(&mut self, op: Operator) -> Result<f64, CalcError> {
        self.require(op.name(), 2)?;

        let b = self.store.pop_back().unwrap_or_default();
        let a = self.store.pop_back().unwrap_or_default();
        let res = op.apply(a, b);

        self.push(res);

        Ok(res)
    }
}

impl FromIterator<f64> for Stack {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            store: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<f64>> for Stack {
    fn from(values: Vec<f64>) -> Self {
        values.into_iter().collect()
    }
}
