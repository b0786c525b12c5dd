//! String interner for module-level identifiers (`$foo`) and the dense
//! `Name` handles everything else in the IR compares by.

use crate::Name;
use rustc_hash::FxHashMap;

/// Owns the backing storage for every interned string produced while
/// parsing one `Script`. Not `Sync`/`Send`-optimized (no sharding, no
/// locking) because the grammar engine that drives it runs on a single
/// thread to completion (spec §5).
#[derive(Default)]
pub struct StringInterner {
    map: FxHashMap<Box<str>, u32>,
    strings: Vec<Box<str>>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut interner = StringInterner {
            map: FxHashMap::default(),
            strings: Vec::new(),
        };
        let empty: Box<str> = "".into();
        interner.map.insert(empty.clone(), 0);
        interner.strings.push(empty);
        interner
    }

    /// Intern `text`, returning the same `Name` for equal strings.
    pub fn intern(&mut self, text: &str) -> Name {
        if let Some(&idx) = self.map.get(text) {
            return Name::from_raw(idx);
        }
        let idx = u32::try_from(self.strings.len())
            .unwrap_or_else(|_| panic!("interner overflowed u32 capacity"));
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.map.insert(boxed, idx);
        Name::from_raw(idx)
    }

    /// Resolve a `Name` back to its text. Panics on a `Name` from a
    /// different interner; every `Name` in a `Script` is produced by the
    /// interner owned by the parse that built it, so this cannot happen
    /// for well-formed IR.
    pub fn resolve(&self, name: Name) -> &str {
        &self.strings[name.raw() as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_text_yields_same_name() {
        let mut interner = StringInterner::new();
        let a = interner.intern("add");
        let b = interner.intern("add");
        assert_eq!(a, b);
        assert_eq!(interner.resolve(a), "add");
    }

    #[test]
    fn empty_string_preinterned_at_zero() {
        let mut interner = StringInterner::new();
        let empty = interner.intern("");
        assert_eq!(empty, Name::EMPTY);
    }

    #[test]
    fn distinct_text_yields_distinct_names() {
        let mut interner = StringInterner::new();
        let a = interner.intern("add");
        let b = interner.intern("sub");
        assert_ne!(a, b);
    }
}
