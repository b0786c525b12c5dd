//! Table/memory limits (spec §3 "Limits").

/// A capacity range used by tables (element count) and memories (page
/// count). Invariant: if `max` is present, `max >= initial` — enforced by
/// the parser at construction time, not by this type, since a malformed
/// limits literal must still produce a diagnostic rather than a panic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Limits {
    pub initial: u64,
    pub max: Option<u64>,
}

impl Limits {
    pub fn new(initial: u64, max: Option<u64>) -> Self {
        Limits { initial, max }
    }

    pub fn exact(value: u64) -> Self {
        Limits {
            initial: value,
            max: Some(value),
        }
    }

    /// Whether `max >= initial`, i.e. the limits are well-formed per
    /// spec §3.
    pub fn is_well_formed(&self) -> bool {
        match self.max {
            Some(max) => max >= self.initial,
            None => true,
        }
    }
}
