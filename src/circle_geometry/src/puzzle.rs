use std::sync::OnceLock;

use fxhash::FxHashMap;
use puzzle_core::Permutation;

use crate::{
    cuts,
    geometry::Geometry,
    moves::Move,
    parts::{self, FaceExtraction, Part},
};

/// A circle puzzle: an immutable move list plus every derived view, each
/// computed on first access and memoized for the life of the puzzle.
pub struct Puzzle<G: Geometry> {
    moves: Vec<Move<G>>,
    cuts: OnceLock<FxHashMap<G::Circle, G::Arcs>>,
    faces: OnceLock<FaceExtraction<G>>,
    permutations: OnceLock<Vec<Permutation>>,
    strings: OnceLock<Vec<String>>,
}

impl<G: Geometry> Puzzle<G> {
    /// Duplicate moves are dropped; the first occurrence keeps its spot.
    #[must_use]
    pub fn new(moves: &[Move<G>]) -> Puzzle<G> {
        let mut deduped: Vec<Move<G>> = Vec::new();
        for mv in moves {
            if !deduped.contains(mv) {
                deduped.push(mv.clone());
            }
        }
        Puzzle {
            moves: deduped,
            cuts: OnceLock::new(),
            faces: OnceLock::new(),
            permutations: OnceLock::new(),
            strings: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn moves(&self) -> &[Move<G>] {
        &self.moves
    }

    /// The closed cut set, grouped by supporting circle.
    pub fn grouped_cuts(&self) -> &FxHashMap<G::Circle, G::Arcs> {
        self.cuts.get_or_init(|| cuts::closure(&self.moves))
    }

    /// Every cut, split at the points where it meets another cut.
    pub fn flat_cuts(&self) -> &[G::Arc] {
        &self.extraction().flat_arcs
    }

    /// The faces of the arrangement.
    pub fn parts(&self) -> &[Part<G>] {
        &self.extraction().parts
    }

    /// Canonical part → id, with ids dense in `[0, parts().len())`.
    pub fn part_ids(&self) -> &FxHashMap<Part<G>, usize> {
        &self.extraction().ids
    }

    /// Per move, the permutation it induces on the part ids, in move order.
    pub fn part_permutations(&self) -> &[Permutation] {
        self.permutations.get_or_init(|| {
            self.moves
                .iter()
                .map(|mv| parts::move_permutation(mv, self.extraction()))
                .collect()
        })
    }

    /// Per move, the 1-indexed transformation literal for external algebra
    /// systems.
    pub fn permutation_strings(&self) -> &[String] {
        self.strings.get_or_init(|| {
            self.part_permutations()
                .iter()
                .map(Permutation::transformation_string)
                .collect()
        })
    }

    fn extraction(&self) -> &FaceExtraction<G> {
        self.faces
            .get_or_init(|| parts::extract_faces(self.grouped_cuts()))
    }
}

#[cfg(test)]
mod tests {
    use puzzle_core::Fixed;

    use super::Puzzle;
    use crate::{
        moves::Move,
        planar::{Circle, Planar, Point},
    };

    fn lone_move() -> Move<Planar> {
        Move::new(
            Circle::new(Point::new(Fixed::zero(), Fixed::zero()), Fixed::one()),
            4,
        )
        .unwrap()
    }

    #[test]
    fn duplicate_moves_collapse() {
        let mv = lone_move();
        let once = Puzzle::new(&[mv.clone()]);
        let twice = Puzzle::new(&[mv.clone(), mv]);
        assert_eq!(twice.moves().len(), 1);
        assert_eq!(once.permutation_strings(), twice.permutation_strings());
    }

    #[test]
    fn views_are_memoized() {
        let puzzle = Puzzle::new(&[lone_move()]);
        let first: *const _ = puzzle.grouped_cuts();
        let second: *const _ = puzzle.grouped_cuts();
        assert_eq!(first, second);
        assert_eq!(puzzle.parts().len(), puzzle.part_ids().len());
        assert_eq!(
            puzzle.part_permutations().len(),
            puzzle.permutation_strings().len()
        );
    }

    #[test]
    fn a_move_alone_fixes_its_lone_part() {
        let puzzle = Puzzle::new(&[lone_move()]);
        // Both sides of an untouched circle share one canonical boundary, so
        // the arrangement has a single part and the turn fixes it.
        assert_eq!(puzzle.parts().len(), 1);
        assert!(puzzle.part_permutations()[0].is_identity());
        assert_eq!(puzzle.permutation_strings(), ["[1]"]);
    }
}
