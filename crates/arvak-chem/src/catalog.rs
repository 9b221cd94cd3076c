//! Stable enumeration of the terms of an encoded Hamiltonian.

use crate::hamiltonian::TermBuckets;
use crate::term::{Term, TermKind};

/// Read-only view that enumerates terms bucket by bucket.
///
/// The order is Diagonal, OffDiagonalPair, TripleIndex, QuadIndex and,
/// within a bucket, insertion order. Indices are stable for the lifetime of
/// the borrowed buckets.
#[derive(Debug, Clone, Copy)]
pub struct TermCatalog<'a> {
    buckets: &'a TermBuckets,
}

impl<'a> TermCatalog<'a> {
    /// Create a catalog over `buckets`.
    pub fn new(buckets: &'a TermBuckets) -> Self {
        Self { buckets }
    }

    /// Total number of terms.
    pub fn count(&self) -> usize {
        self.buckets.len()
    }

    /// The `index`-th term, or `None` when `index >= count()`.
    pub fn entry_at(&self, index: usize) -> Option<&'a Term> {
        let mut rest = index;
        for kind in TermKind::ALL {
            let bucket = self.buckets.bucket(kind);
            if rest < bucket.len() {
                return Some(&bucket[rest]);
            }
            rest -= bucket.len();
        }
        None
    }

    /// Iterate all terms in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Term> + 'a {
        let buckets = self.buckets;
        TermKind::ALL
            .into_iter()
            .flat_map(move |kind| buckets.bucket(kind).iter())
    }
}

impl<'a> IntoIterator for TermCatalog<'a> {
    type Item = &'a Term;
    type IntoIter = Box<dyn Iterator<Item = &'a Term> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
