use std::{fmt::Debug, hash::Hash};

use puzzle_core::{Angle, Fixed, UnitArcs};

/// Where a point sits relative to a disk.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiskSide {
    Interior,
    Boundary,
    Exterior,
}

/// The kernel of operations the cut-closure and face-extraction engines need
/// from a geometry.
///
/// Implementations provide immutable value types whose equality and hashing
/// ride on [`Fixed`]'s fuzzy comparison, so geometrically equal objects
/// collide in hash maps. The engines are generic over this trait and
/// monomorphize per geometry.
pub trait Geometry: Sized + 'static {
    type Point: Clone + Eq + Hash + Debug;
    type Circle: Clone + Eq + Hash + Debug;
    type Disk: Clone + Eq + Hash + Debug;
    type Arc: Clone + Eq + Hash + Debug;
    /// The present arcs on one supporting circle.
    type Arcs: Clone + Debug;
    /// Ordering key for the entries leaving one intersection point; see
    /// [`Geometry::leave_key`].
    type LeaveKey: Ord + Clone + Debug;

    fn disk_circle(disk: &Self::Disk) -> Self::Circle;
    fn disk_center(disk: &Self::Disk) -> Self::Point;
    fn disk_side(disk: &Self::Disk, point: &Self::Point) -> DiskSide;

    fn rotate_point(point: &Self::Point, center: &Self::Point, angle: &Angle) -> Self::Point;

    /// The transverse intersection points of two circles: empty when the
    /// circles are disjoint, nested, or coincide; one point at a tangency.
    fn circle_intersections(a: &Self::Circle, b: &Self::Circle) -> Vec<Self::Point>;

    /// The whole circle as a present arc set.
    fn full_arcs(circle: &Self::Circle) -> Self::Arcs;

    fn arcs_circle(arcs: &Self::Arcs) -> &Self::Circle;
    fn unit_arcs(arcs: &Self::Arcs) -> &UnitArcs;

    fn arcs_non_empty(arcs: &Self::Arcs) -> bool {
        Self::unit_arcs(arcs).non_empty()
    }

    /// Union of two arc sets on equal circles, in `target`'s frame.
    fn same_circle_union(target: &Self::Arcs, source: &Self::Arcs) -> Self::Arcs;

    /// The part of `target` not covered by `source`, in `target`'s frame.
    fn same_circle_difference(target: &Self::Arcs, source: &Self::Arcs) -> Self::Arcs;

    /// The portion of the arcs lying strictly inside the disk.
    fn disk_interior(arcs: &Self::Arcs, disk: &Self::Disk) -> Self::Arcs;

    fn rotate_arcs(arcs: &Self::Arcs, center: &Self::Point, angle: &Angle) -> Self::Arcs;

    /// The angular coordinate of a point of the supporting circle, in the
    /// frame of `arcs`.
    ///
    /// # Panics
    ///
    /// Panics if `point` does not determine a direction from the circle
    /// center, which cannot happen for points on a circle of positive radius.
    fn angle_of_point(arcs: &Self::Arcs, point: &Self::Point) -> Fixed;

    /// Materialize the arc from `start` to `end` (angles in the frame of
    /// `arcs`); coincident endpoints produce the full circle.
    fn make_arc(arcs: &Self::Arcs, start: &Fixed, end: &Fixed) -> Self::Arc;

    fn arc_circle(arc: &Self::Arc) -> &Self::Circle;
    fn arc_start(arc: &Self::Arc) -> Self::Point;
    fn arc_end(arc: &Self::Arc) -> Self::Point;
    fn arc_midpoint(arc: &Self::Arc) -> Self::Point;

    /// Merge two arcs of one circle that meet end-to-start, if they do.
    fn arc_join(a: &Self::Arc, b: &Self::Arc) -> Option<Self::Arc>;

    fn rotate_arc(arc: &Self::Arc, center: &Self::Point, angle: &Angle) -> Self::Arc;

    /// Sort key for the arc ends incident to the point `at`, ordering them
    /// counterclockwise by the direction in which each entry leaves the
    /// point; ties between tangent arcs break so that two cyclically
    /// adjacent entries always bound the same face.
    fn leave_key(arc: &Self::Arc, starts_here: bool, at: &Self::Point) -> Self::LeaveKey;
}
