//! k-mer (node label) interner: a bijection between `(k-1)`-mer strings and
//! dense integer node ids, assigned in first-seen order.
//!
//! Grounded on `original_source/phiX174_error_prone.py`'s `Kmer_Id_2Way_Map`.

use std::collections::HashMap;

pub type NodeId = usize;

#[derive(Default)]
pub struct Interner {
    label_to_id: HashMap<Vec<u8>, NodeId>,
    id_to_label: Vec<Vec<u8>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the existing id for `label`, or assign and record the next one.
    pub fn intern(&mut self, label: &[u8]) -> NodeId {
        if let Some(&id) = self.label_to_id.get(label) {
            return id;
        }
        let id = self.id_to_label.len();
        self.id_to_label.push(label.to_vec());
        self.label_to_id.insert(label.to_vec(), id);
        id
    }

    /// The label assigned to `id`. Panics if `id` was never interned — total
    /// on assigned ids, per the spec.
    pub fn label_of(&self, id: NodeId) -> &[u8] {
        &self.id_to_label[id]
    }

    pub fn len(&self) -> usize {
        self.id_to_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_label.is_empty()
    }

    /// Look up an id without interning; `None` if `label` was never seen.
    pub fn intern_readonly(&self, label: &[u8]) -> Option<NodeId> {
        self.label_to_id.get(label).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_label_returns_same_id() {
        let mut interner = Interner::new();
        let a = interner.intern(b"ACG");
        let b = interner.intern(b"TTT");
        let a2 = interner.intern(b"ACG");
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(interner.label_of(a), b"ACG");
        assert_eq!(interner.label_of(b), b"TTT");
    }

    #[test]
    fn ids_assigned_in_first_seen_order() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern(b"CCC"), 0);
        assert_eq!(interner.intern(b"AAA"), 1);
        assert_eq!(interner.intern(b"CCC"), 0);
        assert_eq!(interner.intern(b"GGG"), 2);
        assert_eq!(interner.len(), 3);
    }
}
