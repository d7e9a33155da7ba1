use std::cmp::Ordering;

use crate::{
    fixed::Fixed,
    trig::{self, TAU},
};

/// A set of closed arcs on the unit circle modulo 2π.
///
/// The set is stored as a non-empty list of `(boundary, present)` entries:
/// the first boundary is 0, boundaries are strictly increasing in `[0, 2π)`,
/// and entry `i`'s flag tells whether the span from `b_i` to `b_{i+1}`
/// (wrapping at 2π) belongs to the set. The represented set is the
/// topological closure of the present open spans, so an isolated boundary
/// point is never distinguishable from its neighbors.
///
/// Every public operation returns a simplified list: no two adjacent entries
/// share a flag, except that the anchor entry at 0 is always kept.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct UnitArcs {
    entries: Vec<(Fixed, bool)>,
}

impl UnitArcs {
    #[must_use]
    pub fn full() -> UnitArcs {
        UnitArcs {
            entries: vec![(Fixed::zero(), true)],
        }
    }

    #[must_use]
    pub fn empty() -> UnitArcs {
        UnitArcs {
            entries: vec![(Fixed::zero(), false)],
        }
    }

    /// The single closed arc running counterclockwise from `start` to `end`.
    /// Coincident endpoints produce the full circle.
    #[must_use]
    pub fn of(start: &Fixed, end: &Fixed) -> UnitArcs {
        let zero = Fixed::zero();
        if start == end {
            return UnitArcs::full();
        }
        let entries = if start.is_zero() {
            vec![(zero, true), (end.clone(), false)]
        } else if end.is_zero() {
            vec![(zero, false), (start.clone(), true)]
        } else if start < end {
            vec![(zero, false), (start.clone(), true), (end.clone(), false)]
        } else {
            vec![(zero, true), (end.clone(), false), (start.clone(), true)]
        };
        UnitArcs { entries }
    }

    #[must_use]
    pub fn non_empty(&self) -> bool {
        self.entries.iter().any(|(_, present)| *present)
    }

    /// Whether `angle` (already in `[0, 2π)`) lies in the closed set. At a
    /// boundary the closure semantics apply: the point is in if either
    /// adjacent span is, with the last span preceding 0 cyclically.
    #[must_use]
    pub fn contains(&self, angle: &Fixed) -> bool {
        let n = self.entries.len();
        let idx = self.entries.partition_point(|(b, _)| b <= angle);
        let idx = if idx == 0 { n - 1 } else { idx - 1 };
        if self.entries[idx].1 {
            return true;
        }
        // Exactly on the boundary: the span that ends here also closes over it.
        self.entries[idx].0 == *angle && self.entries[(idx + n - 1) % n].1
    }

    #[must_use]
    pub fn union(&self, other: &UnitArcs) -> UnitArcs {
        self.merge(other, |a, b| a || b, true)
    }

    #[must_use]
    pub fn intersection(&self, other: &UnitArcs) -> UnitArcs {
        self.merge(other, |a, b| a && b, true)
    }

    #[must_use]
    pub fn difference(&self, other: &UnitArcs) -> UnitArcs {
        self.merge(other, |a, b| a && !b, true)
    }

    #[must_use]
    pub fn symmetric_difference(&self, other: &UnitArcs) -> UnitArcs {
        self.merge(other, |a, b| a != b, true)
    }

    /// Two-pointer sweep over both boundary lists. Each emitted boundary
    /// carries `keep` applied to the flags in effect on both sides.
    fn merge(
        &self,
        other: &UnitArcs,
        keep: impl Fn(bool, bool) -> bool,
        simplify: bool,
    ) -> UnitArcs {
        let a = &self.entries;
        let b = &other.entries;
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        let (mut p1, mut p2) = (false, false);
        while i < a.len() || j < b.len() {
            let boundary = match (a.get(i), b.get(j)) {
                (Some(ea), Some(eb)) => match ea.0.cmp(&eb.0) {
                    Ordering::Less => {
                        p1 = ea.1;
                        i += 1;
                        ea.0.clone()
                    }
                    Ordering::Greater => {
                        p2 = eb.1;
                        j += 1;
                        eb.0.clone()
                    }
                    Ordering::Equal => {
                        p1 = ea.1;
                        p2 = eb.1;
                        i += 1;
                        j += 1;
                        ea.0.clone()
                    }
                },
                (Some(ea), None) => {
                    p1 = ea.1;
                    i += 1;
                    ea.0.clone()
                }
                (None, Some(eb)) => {
                    p2 = eb.1;
                    j += 1;
                    eb.0.clone()
                }
                (None, None) => unreachable!("loop condition"),
            };
            out.push((boundary, keep(p1, p2)));
        }
        if simplify {
            UnitArcs::simplified(out)
        } else {
            UnitArcs { entries: out }
        }
    }

    fn simplified(entries: Vec<(Fixed, bool)>) -> UnitArcs {
        let mut out: Vec<(Fixed, bool)> = Vec::with_capacity(entries.len());
        for (boundary, flag) in entries {
            match out.last() {
                Some((_, last)) if *last == flag => {}
                _ => out.push((boundary, flag)),
            }
        }
        UnitArcs { entries: out }
    }

    /// Shift the whole set counterclockwise by `theta`.
    #[must_use]
    pub fn rotate(&self, theta: &Fixed) -> UnitArcs {
        let theta = trig::mod_2pi(theta.clone());
        if theta.is_zero() {
            return self.clone();
        }
        let mut wrapped = Vec::new();
        let mut shifted = Vec::new();
        for (boundary, flag) in &self.entries {
            let moved = boundary.clone() + &theta;
            if moved >= *TAU {
                wrapped.push((moved - &*TAU, *flag));
            } else {
                shifted.push((moved, *flag));
            }
        }
        // The boundaries that wrapped past 2π now come first.
        let mut entries = wrapped;
        entries.extend(shifted);
        if entries[0].0.cmp_zero() == Ordering::Greater {
            let covering = entries[entries.len() - 1].1;
            entries.insert(0, (Fixed::zero(), covering));
        } else {
            // Within the rounding window of zero; pin the anchor exactly.
            entries[0].0 = Fixed::zero();
        }
        UnitArcs::simplified(entries)
    }

    /// The mirrored set `{−x mod 2π | x ∈ self}`. The span `[b_i, b_{i+1})`
    /// maps to `[2π − b_{i+1}, 2π − b_i)`.
    #[must_use]
    pub fn mirror(&self) -> UnitArcs {
        let n = self.entries.len();
        let mut entries = vec![(Fixed::zero(), self.entries[n - 1].1)];
        for i in (1..n).rev() {
            entries.push((TAU.clone() - &self.entries[i].0, self.entries[i - 1].1));
        }
        UnitArcs::simplified(entries)
    }

    /// Enumerate the present arcs as `(start, end)` angle pairs, forcing an
    /// additional (phantom) boundary at every split angle. `splits` must be
    /// sorted, deduplicated, and within `[0, 2π)`.
    ///
    /// A pair with `start == end` denotes the full circle. A present arc
    /// wrapping past 0 comes back as a single pair with `end < start`,
    /// unless 0 itself is a split.
    #[must_use]
    pub fn split_at_intersections(&self, splits: &[Fixed]) -> Vec<(Fixed, Fixed)> {
        debug_assert!(splits.windows(2).all(|pair| pair[0] < pair[1]));

        if splits.is_empty() && self.entries.len() == 1 {
            return if self.entries[0].1 {
                vec![(Fixed::zero(), Fixed::zero())]
            } else {
                Vec::new()
            };
        }

        let has_zero_split = splits.first().is_some_and(Fixed::is_zero);
        let mut phantom = vec![(Fixed::zero(), false)];
        phantom.extend(
            splits
                .iter()
                .filter(|split| !split.is_zero())
                .map(|split| (split.clone(), false)),
        );
        let phantom = UnitArcs { entries: phantom };

        let merged = self.merge(&phantom, |present, _| present, false);
        let n = merged.entries.len();
        let mut arcs = Vec::new();
        for (idx, (boundary, present)) in merged.entries.iter().enumerate() {
            if *present {
                arcs.push((boundary.clone(), merged.entries[(idx + 1) % n].0.clone()));
            }
        }

        // A present arc that crosses 0 was emitted as two pieces around the
        // anchor; stitch them unless 0 is a genuine split point.
        if arcs.len() > 1 && merged.entries[0].1 && merged.entries[n - 1].1 && !has_zero_split {
            let (_, first_end) = arcs.remove(0);
            if let Some(last) = arcs.last_mut() {
                last.1 = first_end;
            }
        }
        arcs
    }

    /// Test-facing view of the raw entries.
    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[(Fixed, bool)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::UnitArcs;
    use crate::{
        fixed::Fixed,
        trig::{FRAC_3PI_2, FRAC_PI_2, PI, TAU},
    };

    fn quarter_arc() -> UnitArcs {
        // [π/2, π]
        UnitArcs::of(&FRAC_PI_2, &PI)
    }

    fn wrapping_arc() -> UnitArcs {
        // [3π/2, π/2], crossing 0
        UnitArcs::of(&FRAC_3PI_2, &FRAC_PI_2)
    }

    fn assert_simplified(arcs: &UnitArcs) {
        let entries = arcs.entries();
        assert!(entries[0].0.is_zero());
        for pair in entries.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert_ne!(pair[0].1, pair[1].1, "adjacent flags must differ");
        }
    }

    #[test]
    fn construction() {
        assert!(UnitArcs::full().non_empty());
        assert!(!UnitArcs::empty().non_empty());
        assert_eq!(UnitArcs::of(&PI, &PI), UnitArcs::full());
        assert_simplified(&quarter_arc());
        assert_simplified(&wrapping_arc());
    }

    #[test]
    fn containment() {
        let arc = quarter_arc();
        let inside = FRAC_PI_2.clone() + &((PI.clone() - &*FRAC_PI_2) / &Fixed::from(2));
        assert!(arc.contains(&inside));
        assert!(arc.contains(&FRAC_PI_2));
        assert!(arc.contains(&PI));
        assert!(!arc.contains(&Fixed::zero()));
        assert!(!arc.contains(&FRAC_3PI_2));

        let wrap = wrapping_arc();
        assert!(wrap.contains(&Fixed::zero()));
        assert!(wrap.contains(&FRAC_3PI_2));
        assert!(!wrap.contains(&PI));
    }

    #[test]
    fn boolean_algebra() {
        let a = quarter_arc();
        let b = wrapping_arc();

        assert_eq!(a.union(&b), b.union(&a));
        assert_eq!(a.difference(&a), UnitArcs::empty());
        assert_eq!(a.intersection(&UnitArcs::full()), a);
        assert_eq!(a.union(&UnitArcs::empty()), a);
        assert_eq!(a.symmetric_difference(&a), UnitArcs::empty());

        // [π/2, π] ∩ [3π/2, π/2] is the closure point at π/2 — measure zero,
        // which this representation resolves to the empty set.
        assert_eq!(a.intersection(&b), UnitArcs::empty());

        let union = a.union(&b);
        assert_simplified(&union);
        assert!(union.contains(&Fixed::zero()));
        assert!(union.contains(&PI));
        let gap = PI.clone() + &(FRAC_PI_2.clone() / &Fixed::from(2));
        assert!(!union.contains(&gap));
    }

    #[test]
    fn complement_behavior() {
        let a = quarter_arc();
        let complement = UnitArcs::full().difference(&a);
        assert_simplified(&complement);
        assert!(complement.contains(&Fixed::zero()));
        assert!(!complement.contains(
            &(FRAC_PI_2.clone() + &(FRAC_PI_2.clone() / &Fixed::from(2)))
        ));
        assert_eq!(complement.union(&a), UnitArcs::full());
    }

    #[test]
    fn rotation() {
        let a = quarter_arc();
        let rotated = a.rotate(&FRAC_PI_2);
        // Now [π, 3π/2]
        assert!(rotated.contains(&PI));
        assert!(rotated.contains(&FRAC_3PI_2));
        assert!(!rotated.contains(&FRAC_PI_2));
        assert_simplified(&rotated);

        // Rotating across the wrap point and back is the identity.
        let there = a.rotate(&FRAC_3PI_2);
        let back = there.rotate(&FRAC_PI_2);
        assert_eq!(back, a);

        assert_eq!(a.rotate(&Fixed::zero()), a);
        assert_eq!(a.rotate(&TAU), a);
    }

    #[test]
    fn mirroring() {
        let a = quarter_arc();
        let mirrored = a.mirror();
        // −[π/2, π] = [π, 3π/2]
        assert_eq!(mirrored, UnitArcs::of(&PI, &FRAC_3PI_2));
        assert_eq!(mirrored.mirror(), a);
        assert_eq!(UnitArcs::full().mirror(), UnitArcs::full());
        assert_eq!(UnitArcs::empty().mirror(), UnitArcs::empty());
    }

    #[test]
    fn split_full_circle() {
        assert_eq!(
            UnitArcs::full().split_at_intersections(&[]),
            vec![(Fixed::zero(), Fixed::zero())]
        );
        assert_eq!(UnitArcs::empty().split_at_intersections(&[]), vec![]);

        // One split: a single arc from the split back around to itself.
        let splits = vec![FRAC_PI_2.clone()];
        assert_eq!(
            UnitArcs::full().split_at_intersections(&splits),
            vec![(FRAC_PI_2.clone(), FRAC_PI_2.clone())]
        );

        // Two splits: the circle falls into two arcs.
        let splits = vec![FRAC_PI_2.clone(), FRAC_3PI_2.clone()];
        assert_eq!(
            UnitArcs::full().split_at_intersections(&splits),
            vec![
                (FRAC_PI_2.clone(), FRAC_3PI_2.clone()),
                (FRAC_3PI_2.clone(), FRAC_PI_2.clone()),
            ]
        );
    }

    #[test]
    fn split_wrapping_arc() {
        let wrap = wrapping_arc();
        // No splits: one arc crossing 0.
        assert_eq!(
            wrap.split_at_intersections(&[]),
            vec![(FRAC_3PI_2.clone(), FRAC_PI_2.clone())]
        );

        // Splitting exactly at 0 keeps the two pieces separate.
        assert_eq!(
            wrap.split_at_intersections(&[Fixed::zero()]),
            vec![
                (Fixed::zero(), FRAC_PI_2.clone()),
                (FRAC_3PI_2.clone(), Fixed::zero()),
            ]
        );
    }

    #[test]
    fn split_with_interior_points() {
        let arc = quarter_arc();
        let mid = FRAC_PI_2.clone() + &(FRAC_PI_2.clone() / &Fixed::from(2));
        let pieces = arc.split_at_intersections(&[mid.clone()]);
        assert_eq!(
            pieces,
            vec![
                (FRAC_PI_2.clone(), mid.clone()),
                (mid.clone(), PI.clone()),
            ]
        );

        // Splits outside the present spans change nothing.
        let pieces = arc.split_at_intersections(&[FRAC_3PI_2.clone()]);
        assert_eq!(pieces, vec![(FRAC_PI_2.clone(), PI.clone())]);
    }

    #[test]
    fn split_roundtrip() {
        let set = quarter_arc().union(&wrapping_arc());
        let mut rebuilt = UnitArcs::empty();
        for (start, end) in set.split_at_intersections(&[]) {
            rebuilt = rebuilt.union(&UnitArcs::of(&start, &end));
        }
        assert_eq!(rebuilt, set);
    }
}
