//! Face extraction: split the closed cut set at its live intersections, walk
//! the arrangement into faces, and read off the permutation each move
//! induces on them.

use std::{
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
    ops::Bound,
};

use fxhash::{FxHashMap, FxHasher};
use itertools::Itertools;
use log::debug;
use puzzle_core::{Fixed, Permutation};

use crate::{
    geometry::{DiskSide, Geometry},
    moves::Move,
};

/// The boundary of one face of the arrangement, in canonical form: no two
/// neighboring arcs share a supporting circle. Equality and hashing see only
/// the multiset of boundary arcs, so the walk direction and starting corner
/// do not matter.
pub struct Part<G: Geometry> {
    arcs: Vec<G::Arc>,
}

impl<G: Geometry> Part<G> {
    fn from_walk(boundary: Vec<G::Arc>) -> Part<G> {
        Part {
            arcs: canonical::<G>(boundary),
        }
    }

    #[must_use]
    pub fn arcs(&self) -> &[G::Arc] {
        &self.arcs
    }

    fn rotated(&self, center: &G::Point, angle: &puzzle_core::Angle) -> Part<G> {
        Part::from_walk(
            self.arcs
                .iter()
                .map(|arc| G::rotate_arc(arc, center, angle))
                .collect(),
        )
    }

    fn count_of(&self, arc: &G::Arc) -> usize {
        self.arcs.iter().filter(|own| *own == arc).count()
    }
}

/// Fold neighboring same-circle arcs together, around the wrap as well,
/// until the boundary is stable.
fn canonical<G: Geometry>(mut arcs: Vec<G::Arc>) -> Vec<G::Arc> {
    loop {
        let mut merged_any = false;
        let mut out: Vec<G::Arc> = Vec::with_capacity(arcs.len());
        for arc in arcs {
            if let Some(previous) = out.last_mut() {
                if let Some(joined) = G::arc_join(previous, &arc) {
                    *previous = joined;
                    merged_any = true;
                    continue;
                }
            }
            out.push(arc);
        }
        while out.len() >= 2 {
            match G::arc_join(&out[out.len() - 1], &out[0]) {
                Some(joined) => {
                    out[0] = joined;
                    out.pop();
                    merged_any = true;
                }
                None => break,
            }
        }
        arcs = out;
        if !merged_any {
            break;
        }
    }
    arcs
}

impl<G: Geometry> Clone for Part<G> {
    fn clone(&self) -> Self {
        Part {
            arcs: self.arcs.clone(),
        }
    }
}

impl<G: Geometry> PartialEq for Part<G> {
    fn eq(&self, other: &Self) -> bool {
        self.arcs.len() == other.arcs.len()
            && self
                .arcs
                .iter()
                .all(|arc| self.count_of(arc) == other.count_of(arc))
    }
}

impl<G: Geometry> Eq for Part<G> {}

impl<G: Geometry> Hash for Part<G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sum = 0u64;
        for arc in &self.arcs {
            let mut hasher = FxHasher::default();
            arc.hash(&mut hasher);
            sum = sum.wrapping_add(hasher.finish());
        }
        state.write_u64(sum);
    }
}

impl<G: Geometry> fmt::Debug for Part<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Part").field(&self.arcs).finish()
    }
}

pub(crate) struct FaceExtraction<G: Geometry> {
    pub(crate) flat_arcs: Vec<G::Arc>,
    pub(crate) parts: Vec<Part<G>>,
    pub(crate) ids: FxHashMap<Part<G>, usize>,
}

/// Cut every supporting circle at the points where another present arc
/// crosses it, and materialize the resulting concrete arcs.
fn flatten<G: Geometry>(cuts: &FxHashMap<G::Circle, G::Arcs>) -> Vec<G::Arc> {
    let groups: Vec<&G::Arcs> = cuts.values().collect();
    let mut flat = Vec::new();
    for (i, arcs) in groups.iter().enumerate() {
        let mut splits: Vec<Fixed> = Vec::new();
        for (j, other) in groups.iter().enumerate() {
            if i == j {
                continue;
            }
            for crossing in
                G::circle_intersections(G::arcs_circle(arcs), G::arcs_circle(other))
            {
                let on_other = G::angle_of_point(other, &crossing);
                if G::unit_arcs(other).contains(&on_other) {
                    splits.push(G::angle_of_point(arcs, &crossing));
                }
            }
        }
        let splits = splits.into_iter().sorted().dedup().collect_vec();
        for (start, end) in G::unit_arcs(arcs).split_at_intersections(&splits) {
            flat.push(G::make_arc(arcs, &start, &end));
        }
    }
    flat
}

type Bucket<G> = BTreeMap<<G as Geometry>::LeaveKey, (usize, bool)>;

/// Walk the arrangement into face boundaries.
///
/// Every arc contributes a forward entry at its start point and a backward
/// entry at its end point, ordered around each point by [`Geometry::leave_key`].
/// Each walk step consumes the entry it leaves through, crosses the arc, and
/// continues with the entry cyclically after the arrival side of the same
/// arc; the walk closes when it comes back to its anchor point. Each entry
/// is consumed exactly once, so every arc ends up on exactly two faces.
fn walk_faces<G: Geometry>(flat: &[G::Arc]) -> Vec<Vec<G::Arc>> {
    let mut adjacency: FxHashMap<G::Point, Bucket<G>> = FxHashMap::default();
    for (id, arc) in flat.iter().enumerate() {
        let start = G::arc_start(arc);
        let key = G::leave_key(arc, true, &start);
        let displaced = adjacency.entry(start).or_default().insert(key, (id, true));
        debug_assert!(displaced.is_none(), "two arcs leave one point identically");
        let end = G::arc_end(arc);
        let key = G::leave_key(arc, false, &end);
        let displaced = adjacency.entry(end).or_default().insert(key, (id, false));
        debug_assert!(displaced.is_none(), "two arcs leave one point identically");
    }

    let anchors: Vec<G::Point> = adjacency.keys().cloned().collect();
    let mut faces = Vec::new();
    for anchor in &anchors {
        while let Some(&(first_arc, first_forward)) = adjacency
            .get(anchor)
            .and_then(|bucket| bucket.values().next())
        {
            let mut boundary = Vec::new();
            let (mut arc_id, mut forward) = (first_arc, first_forward);
            loop {
                let arc = &flat[arc_id];
                let trailing = if forward {
                    G::arc_start(arc)
                } else {
                    G::arc_end(arc)
                };
                let key = G::leave_key(arc, forward, &trailing);
                let removed = adjacency
                    .get_mut(&trailing)
                    .and_then(|bucket| bucket.remove(&key));
                assert!(removed.is_some(), "face walk lost an adjacency entry");
                boundary.push(arc.clone());

                let landing = if forward {
                    G::arc_end(arc)
                } else {
                    G::arc_start(arc)
                };
                if landing == *anchor {
                    break;
                }
                let Some(bucket) = adjacency.get(&landing) else {
                    break;
                };
                let probe = G::leave_key(arc, !forward, &landing);
                let next = bucket
                    .range((Bound::Excluded(probe), Bound::Unbounded))
                    .next()
                    .or_else(|| bucket.iter().next());
                let Some((_, &(next_arc, next_forward))) = next else {
                    break;
                };
                arc_id = next_arc;
                forward = next_forward;
            }
            faces.push(boundary);
        }
    }
    faces
}

pub(crate) fn extract_faces<G: Geometry>(
    cuts: &FxHashMap<G::Circle, G::Arcs>,
) -> FaceExtraction<G> {
    let flat_arcs = flatten::<G>(cuts);
    let walked = walk_faces::<G>(&flat_arcs);
    debug!(
        "{} flattened arcs walked into {} faces",
        flat_arcs.len(),
        walked.len()
    );
    let mut parts = Vec::new();
    let mut ids: FxHashMap<Part<G>, usize> = FxHashMap::default();
    for boundary in walked {
        let part = Part::<G>::from_walk(boundary);
        if !ids.contains_key(&part) {
            ids.insert(part.clone(), parts.len());
            parts.push(part);
        }
    }
    FaceExtraction {
        flat_arcs,
        parts,
        ids,
    }
}

/// Whether the move's disk interior carries this part along.
fn part_rotates<G: Geometry>(part: &Part<G>, mv: &Move<G>) -> bool {
    let disk = mv.disk();
    match part.arcs() {
        [] => false,
        [only] => G::disk_side(disk, &G::arc_start(only)) == DiskSide::Interior,
        [a, b] => [a, b]
            .into_iter()
            .any(|arc| G::disk_side(disk, &G::arc_midpoint(arc)) == DiskSide::Interior),
        arcs => arcs.iter().any(|arc| {
            G::disk_side(disk, &G::arc_start(arc)) == DiskSide::Interior
                || G::disk_side(disk, &G::arc_end(arc)) == DiskSide::Interior
        }),
    }
}

/// The permutation `mv` induces on the extracted parts.
///
/// # Panics
///
/// Panics if a rotated part's image is not itself a part, which would mean
/// the cut set was not closed.
pub(crate) fn move_permutation<G: Geometry>(
    mv: &Move<G>,
    extraction: &FaceExtraction<G>,
) -> Permutation {
    let center = G::disk_center(mv.disk());
    let images = extraction
        .parts
        .iter()
        .enumerate()
        .map(|(id, part)| {
            if part_rotates(part, mv) {
                let image = part.rotated(&center, mv.angle());
                *extraction
                    .ids
                    .get(&image)
                    .unwrap_or_else(|| panic!("rotated part left the arrangement: {image:?}"))
            } else {
                id
            }
        })
        .collect();
    Permutation::from_mapping(images)
}

#[cfg(test)]
mod tests {
    use fxhash::FxHashMap;
    use puzzle_core::Fixed;

    use super::{extract_faces, flatten, walk_faces};
    use crate::{
        geometry::Geometry,
        planar::{Circle, Planar, Point},
    };

    fn crossing_pair() -> FxHashMap<Circle, <Planar as Geometry>::Arcs> {
        let left = Circle::new(
            Point::new(Fixed::from(-1), Fixed::zero()),
            Fixed::from_ratio(5, 2),
        );
        let right = Circle::new(
            Point::new(Fixed::from(1), Fixed::zero()),
            Fixed::from_ratio(5, 2),
        );
        let mut cuts = FxHashMap::default();
        cuts.insert(left.clone(), Planar::full_arcs(&left));
        cuts.insert(right.clone(), Planar::full_arcs(&right));
        cuts
    }

    #[test]
    fn two_crossing_circles_flatten_into_four_arcs() {
        let flat = flatten::<Planar>(&crossing_pair());
        assert_eq!(flat.len(), 4);
        for arc in &flat {
            assert!(!arc.is_full());
        }
    }

    #[test]
    fn every_arc_bounds_exactly_two_faces() {
        let flat = flatten::<Planar>(&crossing_pair());
        let faces = walk_faces::<Planar>(&flat);
        // Lens, two crescents, and the unbounded face.
        assert_eq!(faces.len(), 4);
        for arc in &flat {
            let appearances: usize = faces
                .iter()
                .map(|face| face.iter().filter(|walked| *walked == arc).count())
                .sum();
            assert_eq!(appearances, 2);
        }
    }

    #[test]
    fn crossing_circles_make_four_parts() {
        let extraction = extract_faces::<Planar>(&crossing_pair());
        assert_eq!(extraction.parts.len(), 4);
        assert_eq!(extraction.ids.len(), 4);
        // Two of the faces are lens-shaped (two boundary arcs); the
        // crescents also have two after canonical folding.
        for part in &extraction.parts {
            assert_eq!(part.arcs().len(), 2);
        }
    }

    #[test]
    fn lone_circle_collapses_to_one_part() {
        let circle = Circle::new(
            Point::new(Fixed::zero(), Fixed::zero()),
            Fixed::one(),
        );
        let mut cuts = FxHashMap::default();
        cuts.insert(circle.clone(), Planar::full_arcs(&circle));
        let extraction = extract_faces::<Planar>(&cuts);
        assert_eq!(extraction.flat_arcs.len(), 1);
        // Both sides of the circle share the same canonical boundary.
        assert_eq!(extraction.parts.len(), 1);
        assert_eq!(extraction.parts[0].arcs().len(), 1);
    }
}
