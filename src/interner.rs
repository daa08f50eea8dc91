//! String Interning - Dense 1-Based Identifiers
//!
//! Forward lookup is a dense vector, reverse lookup a hash map; both are
//! O(1). Identifier 0 is reserved to mean "absent", so the first interned
//! string gets id 1. Ids are never reused or renumbered.

use std::collections::HashMap;

use crate::error::{RegistryError, Result};
use crate::validation::Validator;

/// Bidirectional string <-> id table.
///
/// A string that has been accepted once always resolves to its original
/// id and is never re-validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringTable {
    names: Vec<String>,
    ids: HashMap<String, u32>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name` to its id, interning it first if unseen.
    ///
    /// Returns `(id, created)`. The validator runs only for names not
    /// already in the table; a rejected name leaves the table untouched.
    pub fn intern_or_create(
        &mut self,
        name: &str,
        validator: &dyn Validator,
    ) -> Result<(u32, bool)> {
        if let Some(&id) = self.ids.get(name) {
            return Ok((id, false));
        }
        if !validator.validate(name.as_bytes()) {
            return Err(RegistryError::Validation(name.to_string()));
        }
        self.names.push(name.to_string());
        let id = self.names.len() as u32;
        self.ids.insert(name.to_string(), id);
        Ok((id, true))
    }

    /// Id of an already-interned string.
    pub fn id_of(&self, name: &str) -> Result<u32> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Number of interned strings.
    pub fn len(&self) -> u32 {
        self.names.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// String at 0-based insertion position `index`.
    pub fn name_at(&self, index: u32) -> Result<&str> {
        self.names
            .get(index as usize)
            .map(String::as_str)
            .ok_or(RegistryError::OutOfRange {
                index,
                count: self.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingValidator {
        calls: Cell<u32>,
        accept: bool,
    }

    impl CountingValidator {
        fn accepting() -> Self {
            Self { calls: Cell::new(0), accept: true }
        }

        fn rejecting() -> Self {
            Self { calls: Cell::new(0), accept: false }
        }
    }

    impl Validator for CountingValidator {
        fn validate(&self, _input: &[u8]) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.accept
        }
    }

    #[test]
    fn interning_is_idempotent() {
        let mut table = StringTable::new();
        let v = CountingValidator::accepting();

        let (id, created) = table.intern_or_create("weapons", &v).unwrap();
        assert_eq!((id, created), (1, true));

        let (id, created) = table.intern_or_create("weapons", &v).unwrap();
        assert_eq!((id, created), (1, false));
    }

    #[test]
    fn known_strings_are_never_revalidated() {
        let mut table = StringTable::new();
        let v = CountingValidator::accepting();

        table.intern_or_create("weapons", &v).unwrap();
        table.intern_or_create("weapons", &v).unwrap();
        table.intern_or_create("weapons", &v).unwrap();

        assert_eq!(v.calls.get(), 1);
    }

    #[test]
    fn ids_are_dense_from_one() {
        let mut table = StringTable::new();
        let v = CountingValidator::accepting();

        for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
            let (id, created) = table.intern_or_create(name, &v).unwrap();
            assert_eq!(id, i as u32 + 1);
            assert!(created);
        }
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn rejected_name_leaves_table_unchanged() {
        let mut table = StringTable::new();
        table.intern_or_create("kept", &CountingValidator::accepting()).unwrap();
        let before = table.clone();

        let err = table
            .intern_or_create("bad", &CountingValidator::rejecting())
            .unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));
        assert_eq!(table, before);
    }

    #[test]
    fn id_of_unknown_is_not_found() {
        let table = StringTable::new();
        assert!(matches!(
            table.id_of("ghost"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn name_at_count_is_out_of_range() {
        let mut table = StringTable::new();
        table.intern_or_create("only", &CountingValidator::accepting()).unwrap();

        assert_eq!(table.name_at(0).unwrap(), "only");
        assert!(matches!(
            table.name_at(1),
            Err(RegistryError::OutOfRange { index: 1, count: 1 })
        ));
    }
}
