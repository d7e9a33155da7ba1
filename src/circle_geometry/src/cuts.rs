//! The cut-set closure: the fixed point of rotating every discovered cut by
//! every move that can act on it.

use fxhash::FxHashMap;
use log::debug;

use crate::{geometry::Geometry, moves::Move};

/// Close the boundary circles of `moves` under the group the moves generate.
///
/// The result maps every supporting circle to the cuts discovered on it.
/// Termination is equivalent to the orbit being finite; a jumbling puzzle
/// spins here forever, and no bailout is attempted.
pub(crate) fn closure<G: Geometry>(moves: &[Move<G>]) -> FxHashMap<G::Circle, G::Arcs> {
    let mut all_cuts: FxHashMap<G::Circle, G::Arcs> = FxHashMap::default();
    for mv in moves {
        let circle = G::disk_circle(mv.disk());
        all_cuts
            .entry(circle.clone())
            .or_insert_with(|| G::full_arcs(&circle));
    }

    // Per move, the cuts whose images under that move are still unexpanded.
    // A move's own boundary circle is closed under it from the start.
    let mut pending: Vec<FxHashMap<G::Circle, G::Arcs>> = moves
        .iter()
        .map(|mv| {
            let own = G::disk_circle(mv.disk());
            all_cuts
                .iter()
                .filter(|(circle, _)| **circle != own)
                .map(|(circle, arcs)| (circle.clone(), arcs.clone()))
                .collect()
        })
        .collect();

    loop {
        let Some(index) = pending.iter().position(|worklist| !worklist.is_empty()) else {
            break;
        };
        let worklist = std::mem::take(&mut pending[index]);
        let mv = &moves[index];
        debug!(
            "expanding {} pending cut groups under move {index}; {} circles so far",
            worklist.len(),
            all_cuts.len()
        );

        for arcs in worklist.into_values() {
            let segment = G::disk_interior(&arcs, mv.disk());
            if !G::arcs_non_empty(&segment) {
                // Entirely outside the open disk, hence fixed by the move.
                continue;
            }
            let center = G::disk_center(mv.disk());
            for theta in mv.nonzero_angles() {
                let rotated = G::rotate_arcs(&segment, &center, theta);
                let circle = G::arcs_circle(&rotated).clone();
                let (merged, fresh) = match all_cuts.get(&circle) {
                    Some(existing) => (
                        G::same_circle_union(existing, &rotated),
                        G::same_circle_difference(&rotated, existing),
                    ),
                    None => (rotated.clone(), rotated),
                };
                all_cuts.insert(circle.clone(), merged);
                if !G::arcs_non_empty(&fresh) {
                    continue;
                }
                for (other, queue) in pending.iter_mut().enumerate() {
                    if other == index {
                        continue;
                    }
                    let entry = match queue.get(&circle) {
                        Some(queued) => G::same_circle_union(queued, &fresh),
                        None => fresh.clone(),
                    };
                    queue.insert(circle.clone(), entry);
                }
            }
        }
    }

    debug!("cut set closed with {} supporting circles", all_cuts.len());
    all_cuts
}

#[cfg(test)]
mod tests {
    use puzzle_core::Fixed;

    use super::closure;
    use crate::{
        geometry::Geometry,
        moves::Move,
        planar::{Circle, Planar, Point},
    };

    fn circle(x: i64, radius: (i64, i64)) -> Circle {
        Circle::new(
            Point::new(Fixed::from(x), Fixed::zero()),
            Fixed::from_ratio(radius.0, radius.1),
        )
    }

    #[test]
    fn lone_move_closes_immediately() {
        let mv = Move::<Planar>::new(circle(0, (1, 1)), 5).unwrap();
        let cuts = closure(&[mv]);
        assert_eq!(cuts.len(), 1);
        let arcs = cuts.values().next().unwrap();
        assert_eq!(*Planar::unit_arcs(arcs), puzzle_core::UnitArcs::full());
    }

    #[test]
    fn disjoint_moves_never_interact() {
        let a = Move::<Planar>::new(circle(0, (1, 1)), 3).unwrap();
        let b = Move::<Planar>::new(circle(10, (1, 1)), 4).unwrap();
        let cuts = closure(&[a, b]);
        assert_eq!(cuts.len(), 2);
    }

    #[test]
    fn crossing_moves_propagate_cuts() {
        let a = Move::<Planar>::new(circle(-1, (5, 2)), 3).unwrap();
        let b = Move::<Planar>::new(circle(1, (5, 2)), 3).unwrap();
        let cuts = closure(&[a.clone(), b.clone()]);
        // Both generator circles survive in the closed set, and something new
        // was discovered beyond them.
        assert!(cuts.contains_key(&Planar::disk_circle(a.disk())));
        assert!(cuts.contains_key(&Planar::disk_circle(b.disk())));
        assert!(cuts.len() > 2);
        for arcs in cuts.values() {
            assert!(Planar::arcs_non_empty(arcs));
        }
    }
}
