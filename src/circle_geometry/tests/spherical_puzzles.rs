//! End-to-end spherical scenario: a half-turn cap on a face axis and a
//! third-turn cap on a body diagonal, the face+vertex configuration of a
//! cube.

use circle_geometry::{
    Move, Puzzle,
    spherical::{Disk, Point, Spherical},
};
use puzzle_core::{Fixed, trig::FRAC_PI_2};

fn cube_face_and_vertex() -> Puzzle<Spherical> {
    let face_axis = Point::new(Fixed::one(), Fixed::zero(), Fixed::zero());
    let vertex_axis = Point::new(Fixed::one(), Fixed::one(), Fixed::one());
    let half_turn = Move::new(Disk::new(face_axis, FRAC_PI_2.clone()), 2).unwrap();
    let third_turn = Move::new(Disk::new(vertex_axis, FRAC_PI_2.clone()), 3).unwrap();
    Puzzle::new(&[half_turn, third_turn])
}

#[test_log::test]
fn face_and_vertex_turns_have_their_orders() {
    let puzzle = cube_face_and_vertex();
    let permutations = puzzle.part_permutations();
    assert_eq!(permutations.len(), 2);

    let degree = puzzle.parts().len();
    assert!(degree > 2);
    for permutation in permutations {
        assert_eq!(permutation.degree(), degree);
        assert!(!permutation.is_identity());
    }

    assert_eq!(permutations[0].order(), 2);
    assert_eq!(permutations[1].order(), 3);
    assert!(permutations[0].pow(2).is_identity());
    assert!(permutations[1].pow(3).is_identity());
}

#[test_log::test]
fn hemispheres_have_no_boundary_effect_on_strings() {
    let puzzle = cube_face_and_vertex();
    let degree = puzzle.parts().len();
    for string in puzzle.permutation_strings() {
        assert!(string.starts_with('[') && string.ends_with(']'));
        assert_eq!(string.matches(',').count(), degree - 1);
    }
}
