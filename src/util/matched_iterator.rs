//! `MatchedIterator` (§4.8): tolerance-based closest-match iteration over two sorted
//! sequences.

use crate::system::f64::MassOverCharge;
use crate::util::tolerance::{Tolerance, WithinTolerance};

/// Yields, for each element of a sorted reference sequence `A`, the closest element of
/// a sorted target sequence `B` that lies within `tolerance`, skipping elements of `A`
/// that have no match. Forward-only: both cursors only ever advance.
pub struct MatchedIterator<'a> {
    reference: std::slice::Iter<'a, MassOverCharge>,
    target: &'a [MassOverCharge],
    cursor: usize,
    tolerance: Tolerance<MassOverCharge>,
}

impl<'a> MatchedIterator<'a> {
    /// Build an iterator matching `reference` elements against `target`, both assumed
    /// sorted ascending.
    pub fn new(
        reference: &'a [MassOverCharge],
        target: &'a [MassOverCharge],
        tolerance: Tolerance<MassOverCharge>,
    ) -> Self {
        Self {
            reference: reference.iter(),
            target,
            cursor: 0,
            tolerance,
        }
    }

    fn closest_from(&mut self, query: MassOverCharge) -> Option<(usize, MassOverCharge)> {
        // Advance the cursor while the next target element is closer than the current one.
        while self.cursor + 1 < self.target.len()
            && (self.target[self.cursor + 1].value - query.value).abs()
                <= (self.target[self.cursor].value - query.value).abs()
        {
            self.cursor += 1;
        }
        self.target
            .get(self.cursor)
            .map(|&mz| (self.cursor, mz))
    }
}

impl Iterator for MatchedIterator<'_> {
    /// `(reference value, matched target value)`.
    type Item = (MassOverCharge, MassOverCharge);

    fn next(&mut self) -> Option<Self::Item> {
        for &query in self.reference.by_ref() {
            if self.target.is_empty() {
                continue;
            }
            if let Some((_, candidate)) = self.closest_from(query) {
                if self.tolerance.within(&query, &candidate) {
                    return Some((query, candidate));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mass_over_charge::mz;

    fn m(value: f64) -> MassOverCharge {
        MassOverCharge::new::<mz>(value)
    }

    #[test]
    fn skips_unmatched_reference_elements() {
        let reference = vec![m(100.0), m(200.0), m(300.01)];
        let target = vec![m(100.001), m(300.0)];
        let matches: Vec<_> = MatchedIterator::new(&reference, &target, Tolerance::Ppm(50.0))
            .map(|(r, _)| r.value)
            .collect();
        assert_eq!(matches, vec![100.0, 300.01]);
    }
}
