//! Points-to sets
//!
//! Sorted-vector set of context-sensitive objects. Sets only grow: there is
//! no removal, so every operation is monotone.
//!
//! # Performance Characteristics
//! - Contains: O(log n)
//! - Insert: O(n) worst case (shift), O(log n) search
//! - Diff-union: O(n + m) merge

use super::cs_element::CsObjId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointsToSet {
    elements: Vec<CsObjId>,
}

impl PointsToSet {
    #[inline]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    #[inline]
    pub fn singleton(obj: CsObjId) -> Self {
        Self {
            elements: vec![obj],
        }
    }

    #[inline]
    pub fn contains(&self, obj: CsObjId) -> bool {
        self.elements.binary_search(&obj).is_ok()
    }

    /// Insert `obj`. Returns true if it was not present.
    pub fn add_object(&mut self, obj: CsObjId) -> bool {
        match self.elements.binary_search(&obj) {
            Ok(_) => false,
            Err(pos) => {
                self.elements.insert(pos, obj);
                true
            }
        }
    }

    /// Union `other` into `self`, returning the objects that were new.
    pub fn add_all_diff(&mut self, other: &PointsToSet) -> PointsToSet {
        let mut delta = Vec::new();
        if other.elements.is_empty() {
            return PointsToSet::new();
        }
        if self.elements.is_empty() {
            self.elements = other.elements.clone();
            return other.clone();
        }

        let mut merged = Vec::with_capacity(self.elements.len() + other.elements.len());
        let mut i = 0;
        let mut j = 0;
        while i < self.elements.len() && j < other.elements.len() {
            match self.elements[i].cmp(&other.elements[j]) {
                Ordering::Less => {
                    merged.push(self.elements[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(other.elements[j]);
                    delta.push(other.elements[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    merged.push(self.elements[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.elements[i..]);
        merged.extend_from_slice(&other.elements[j..]);
        delta.extend_from_slice(&other.elements[j..]);

        if !delta.is_empty() {
            self.elements = merged;
        }
        PointsToSet { elements: delta }
    }

    /// True if the sets share at least one object
    pub fn intersects(&self, other: &PointsToSet) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.elements.len() && j < other.elements.len() {
            match self.elements[i].cmp(&other.elements[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => return true,
            }
        }
        false
    }

    pub fn is_subset(&self, other: &PointsToSet) -> bool {
        self.elements.len() <= other.elements.len()
            && self.elements.iter().all(|o| other.contains(*o))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Objects in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = CsObjId> + '_ {
        self.elements.iter().copied()
    }

    pub fn as_slice(&self) -> &[CsObjId] {
        &self.elements
    }
}

impl FromIterator<CsObjId> for PointsToSet {
    fn from_iter<I: IntoIterator<Item = CsObjId>>(iter: I) -> Self {
        let mut elements: Vec<CsObjId> = iter.into_iter().collect();
        elements.sort_unstable();
        elements.dedup();
        Self { elements }
    }
}

impl<'a> IntoIterator for &'a PointsToSet {
    type Item = CsObjId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, CsObjId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> PointsToSet {
        ids.iter().map(|i| CsObjId(*i)).collect()
    }

    #[test]
    fn test_add_object() {
        let mut pts = PointsToSet::new();
        assert!(pts.add_object(CsObjId(3)));
        assert!(pts.add_object(CsObjId(1)));
        assert!(!pts.add_object(CsObjId(3)));
        assert_eq!(pts.as_slice(), &[CsObjId(1), CsObjId(3)]);
        assert!(pts.contains(CsObjId(1)));
        assert!(!pts.contains(CsObjId(2)));
    }

    #[test]
    fn test_add_all_diff_returns_delta() {
        let mut pts = set(&[1, 3, 5]);
        let delta = pts.add_all_diff(&set(&[2, 3, 6]));
        assert_eq!(delta, set(&[2, 6]));
        assert_eq!(pts, set(&[1, 2, 3, 5, 6]));

        // Idempotent
        let again = pts.add_all_diff(&set(&[2, 3, 6]));
        assert!(again.is_empty());
        assert_eq!(pts.len(), 5);
    }

    #[test]
    fn test_add_all_diff_into_empty() {
        let mut pts = PointsToSet::new();
        let delta = pts.add_all_diff(&set(&[4, 7]));
        assert_eq!(delta, set(&[4, 7]));
        assert_eq!(pts, set(&[4, 7]));
    }

    #[test]
    fn test_intersects_and_subset() {
        let a = set(&[1, 4, 9]);
        let b = set(&[2, 4]);
        let c = set(&[3, 5]);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(set(&[4]).is_subset(&a));
        assert!(!b.is_subset(&a));
    }

    #[test]
    fn test_from_iter_dedups() {
        let pts = set(&[5, 1, 5, 2]);
        assert_eq!(pts.iter().collect::<Vec<_>>(), vec![CsObjId(1), CsObjId(2), CsObjId(5)]);
    }
}
