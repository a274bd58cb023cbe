//! Take-once storage for a memento's sub-object fields.

use crate::error::{Error, Result};

#[derive(Debug)]
enum State<T> {
    Vacant,
    Filled(T),
    Consumed,
}

/// Ownership moves out exactly once; any later read is an explicit `SlotConsumed`
/// error instead of a silently empty value.
#[derive(Debug)]
pub struct Slot<T> {
    name: &'static str,
    state: State<T>,
}

impl<T> Slot<T> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            state: State::Vacant,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` when a previous value was replaced.
    pub fn fill(&mut self, value: T) -> bool {
        let replaced = matches!(self.state, State::Filled(_));
        self.state = State::Filled(value);
        replaced
    }

    #[must_use]
    pub const fn is_filled(&self) -> bool {
        matches!(self.state, State::Filled(_))
    }

    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        matches!(self.state, State::Consumed)
    }

    /// Moves the value out, or `None` if it was never set. Either way the slot is consumed.
    ///
    /// # Errors
    /// `SlotConsumed` on every call after the first.
    pub fn take(&mut self, owner: &str) -> Result<Option<T>> {
        match std::mem::replace(&mut self.state, State::Consumed) {
            State::Vacant => Ok(None),
            State::Filled(value) => Ok(Some(value)),
            State::Consumed => Err(Error::SlotConsumed {
                owner: owner.to_string(),
                slot: self.name.to_string(),
            }),
        }
    }

    /// Like [`Self::take`], but an unset slot is a missing required field.
    ///
    /// # Errors
    /// `RequiredField` when never set, `SlotConsumed` when already taken.
    pub fn require(&mut self, owner: &str) -> Result<T> {
        self.take(owner)?
            .ok_or_else(|| Error::required(owner, self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_take_is_an_error() {
        let mut slot = Slot::new("formatter");
        slot.fill(String::from("pattern"));
        assert_eq!(slot.take("file_writer").unwrap().as_deref(), Some("pattern"));
        assert!(matches!(
            slot.take("file_writer"),
            Err(Error::SlotConsumed { ref slot, .. }) if slot == "formatter"
        ));
    }

    #[test]
    fn require_reports_missing_field() {
        let mut slot: Slot<u8> = Slot::new("roller");
        let err = slot.require("rolling_file_writer").unwrap_err();
        assert!(matches!(
            err,
            Error::RequiredField { ref owner, ref field }
                if owner == "rolling_file_writer" && field == "roller"
        ));
    }

    #[test]
    fn fill_reports_replacement() {
        let mut slot = Slot::new("serializer");
        assert!(!slot.fill(1));
        assert!(slot.fill(2));
        assert_eq!(slot.take("queue_writer").unwrap(), Some(2));
    }
}
