//! The Euclidean plane realization of the geometry kernel.
//!
//! Angular coordinates on a circle are global: the angle of a point is the
//! direction of the radius vector pointing at it, so every circle shares one
//! frame and arc sets on equal circles combine without realignment.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use puzzle_core::{
    Angle, Fixed, UnitArcs,
    trig::{self, FRAC_PI_2, PI},
};

use crate::geometry::{DiskSide, Geometry};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Point {
    pub x: Fixed,
    pub y: Fixed,
}

impl Point {
    #[must_use]
    pub fn new(x: Fixed, y: Fixed) -> Point {
        Point { x, y }
    }

    #[must_use]
    pub fn from_f64s(x: f64, y: f64) -> Point {
        Point::new(Fixed::from_f64(x), Fixed::from_f64(y))
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Circle {
    center: Point,
    radius: Fixed,
}

/// A planar disk is determined by its boundary circle.
pub type Disk = Circle;

impl Circle {
    /// # Panics
    ///
    /// Panics unless the radius compares above zero.
    #[must_use]
    pub fn new(center: Point, radius: Fixed) -> Circle {
        assert!(
            radius.cmp_zero() == Ordering::Greater,
            "a circle needs a positive radius"
        );
        Circle { center, radius }
    }

    #[must_use]
    pub fn center(&self) -> &Point {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> &Fixed {
        &self.radius
    }

    /// The point of the circle at the given angular coordinate.
    fn point_at(&self, angle: &Angle) -> Point {
        Point::new(
            self.center.x.clone() + &(self.radius.clone() * angle.cos()),
            self.center.y.clone() + &(self.radius.clone() * angle.sin()),
        )
    }

    /// The angular coordinate of a point of the circle.
    fn angle_of(&self, point: &Point) -> Fixed {
        trig::atan2_mod_2pi(
            &(point.y.clone() - &self.center.y),
            &(point.x.clone() - &self.center.x),
        )
        .expect("point coincides with the circle center")
    }
}

/// A counterclockwise arc from `start` to `end`; coincident endpoints denote
/// the full circle, in which case the anchor angle is not part of the value.
#[derive(Clone, Debug)]
pub struct Arc {
    circle: Circle,
    start: Angle,
    end: Angle,
}

impl Arc {
    #[must_use]
    pub fn circle(&self) -> &Circle {
        &self.circle
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.start == self.end
    }
}

impl PartialEq for Arc {
    fn eq(&self, other: &Self) -> bool {
        if self.circle != other.circle {
            return false;
        }
        if self.is_full() || other.is_full() {
            return self.is_full() && other.is_full();
        }
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Arc {}

impl Hash for Arc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.circle.hash(state);
        if self.is_full() {
            state.write_u8(1);
        } else {
            state.write_u8(0);
            self.start.hash(state);
            self.end.hash(state);
        }
    }
}

/// The present cuts on one supporting circle.
#[derive(Clone, Debug)]
pub struct ArcsOnCircle {
    circle: Circle,
    arcs: UnitArcs,
}

impl ArcsOnCircle {
    #[must_use]
    pub fn new(circle: Circle, arcs: UnitArcs) -> ArcsOnCircle {
        ArcsOnCircle { circle, arcs }
    }
}

fn rotate_point_about(point: &Point, center: &Point, angle: &Angle) -> Point {
    let dx = point.x.clone() - &center.x;
    let dy = point.y.clone() - &center.y;
    let (sin, cos) = (angle.sin(), angle.cos());
    Point::new(
        center.x.clone() + &(dx.clone() * cos - &(dy.clone() * sin)),
        center.y.clone() + &(dx * sin + &(dy * cos)),
    )
}

fn rotate_circle(circle: &Circle, center: &Point, angle: &Angle) -> Circle {
    Circle {
        center: rotate_point_about(&circle.center, center, angle),
        radius: circle.radius.clone(),
    }
}

/// The Euclidean plane.
#[derive(Clone, Copy, Debug)]
pub enum Planar {}

impl Geometry for Planar {
    type Point = Point;
    type Circle = Circle;
    type Disk = Disk;
    type Arc = Arc;
    type Arcs = ArcsOnCircle;
    type LeaveKey = (Fixed, u8, Fixed);

    fn disk_circle(disk: &Disk) -> Circle {
        disk.clone()
    }

    fn disk_center(disk: &Disk) -> Point {
        disk.center.clone()
    }

    fn disk_side(disk: &Disk, point: &Point) -> DiskSide {
        let dx = point.x.clone() - &disk.center.x;
        let dy = point.y.clone() - &disk.center.y;
        let distance_squared = dx.clone() * &dx + &(dy.clone() * &dy);
        let radius_squared = disk.radius.clone() * &disk.radius;
        match distance_squared.cmp(&radius_squared) {
            Ordering::Less => DiskSide::Interior,
            Ordering::Equal => DiskSide::Boundary,
            Ordering::Greater => DiskSide::Exterior,
        }
    }

    fn rotate_point(point: &Point, center: &Point, angle: &Angle) -> Point {
        rotate_point_about(point, center, angle)
    }

    fn circle_intersections(a: &Circle, b: &Circle) -> Vec<Point> {
        let dx = b.center.x.clone() - &a.center.x;
        let dy = b.center.y.clone() - &a.center.y;
        let d_squared = dx.clone() * &dx + &(dy.clone() * &dy);
        if d_squared.is_zero() {
            // Concentric (possibly equal) circles have no transverse crossing.
            return Vec::new();
        }
        let d = d_squared.sqrt();
        let r1_squared = a.radius.clone() * &a.radius;
        let r2_squared = b.radius.clone() * &b.radius;
        let along = (d_squared + &r1_squared - &r2_squared) / &(d.clone() + &d);
        let h_squared = r1_squared - &(along.clone() * &along);
        if h_squared.cmp_zero() == Ordering::Less {
            return Vec::new();
        }
        let mx = a.center.x.clone() + &(along.clone() * &dx / &d);
        let my = a.center.y.clone() + &(along * &dy / &d);
        if h_squared.is_zero() {
            return vec![Point::new(mx, my)];
        }
        let h = h_squared.sqrt();
        let ox = h.clone() * &dy / &d;
        let oy = h * &dx / &d;
        vec![
            Point::new(mx.clone() + &ox, my.clone() - &oy),
            Point::new(mx - &ox, my + &oy),
        ]
    }

    fn full_arcs(circle: &Circle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: circle.clone(),
            arcs: UnitArcs::full(),
        }
    }

    fn arcs_circle(arcs: &ArcsOnCircle) -> &Circle {
        &arcs.circle
    }

    fn unit_arcs(arcs: &ArcsOnCircle) -> &UnitArcs {
        &arcs.arcs
    }

    fn same_circle_union(target: &ArcsOnCircle, source: &ArcsOnCircle) -> ArcsOnCircle {
        debug_assert!(target.circle == source.circle);
        ArcsOnCircle {
            circle: target.circle.clone(),
            arcs: target.arcs.union(&source.arcs),
        }
    }

    fn same_circle_difference(target: &ArcsOnCircle, source: &ArcsOnCircle) -> ArcsOnCircle {
        debug_assert!(target.circle == source.circle);
        ArcsOnCircle {
            circle: target.circle.clone(),
            arcs: target.arcs.difference(&source.arcs),
        }
    }

    fn disk_interior(arcs: &ArcsOnCircle, disk: &Disk) -> ArcsOnCircle {
        if arcs.circle == *disk {
            // A circle is its own disk's boundary, never its interior.
            return ArcsOnCircle {
                circle: arcs.circle.clone(),
                arcs: UnitArcs::empty(),
            };
        }
        let crossings = Self::circle_intersections(&arcs.circle, disk);
        let inside = match crossings.as_slice() {
            [first, second] => {
                let t1 = arcs.circle.angle_of(first);
                let t2 = arcs.circle.angle_of(second);
                let half_way = trig::mod_2pi(t2.clone() - &t1) / &Fixed::from(2);
                let probe = arcs
                    .circle
                    .point_at(&Angle::reduced(t1.clone() + &half_way));
                if Self::disk_side(disk, &probe) == DiskSide::Interior {
                    UnitArcs::of(&t1, &t2)
                } else {
                    UnitArcs::of(&t2, &t1)
                }
            }
            [touch] => {
                // Tangency: probe the far side of the circle.
                let t = arcs.circle.angle_of(touch);
                let probe = arcs.circle.point_at(&Angle::reduced(t + &*PI));
                if Self::disk_side(disk, &probe) == DiskSide::Interior {
                    UnitArcs::full()
                } else {
                    UnitArcs::empty()
                }
            }
            _ => {
                let probe = arcs.circle.point_at(&Angle::zero());
                if Self::disk_side(disk, &probe) == DiskSide::Interior {
                    UnitArcs::full()
                } else {
                    UnitArcs::empty()
                }
            }
        };
        ArcsOnCircle {
            circle: arcs.circle.clone(),
            arcs: arcs.arcs.intersection(&inside),
        }
    }

    fn rotate_arcs(arcs: &ArcsOnCircle, center: &Point, angle: &Angle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: rotate_circle(&arcs.circle, center, angle),
            arcs: arcs.arcs.rotate(angle.radians()),
        }
    }

    fn angle_of_point(arcs: &ArcsOnCircle, point: &Point) -> Fixed {
        arcs.circle.angle_of(point)
    }

    fn make_arc(arcs: &ArcsOnCircle, start: &Fixed, end: &Fixed) -> Arc {
        Arc {
            circle: arcs.circle.clone(),
            start: Angle::reduced(start.clone()),
            end: Angle::reduced(end.clone()),
        }
    }

    fn arc_circle(arc: &Arc) -> &Circle {
        &arc.circle
    }

    fn arc_start(arc: &Arc) -> Point {
        arc.circle.point_at(&arc.start)
    }

    fn arc_end(arc: &Arc) -> Point {
        arc.circle.point_at(&arc.end)
    }

    fn arc_midpoint(arc: &Arc) -> Point {
        let half_span = if arc.is_full() {
            PI.clone()
        } else {
            trig::mod_2pi(arc.end.radians().clone() - arc.start.radians()) / &Fixed::from(2)
        };
        arc.circle
            .point_at(&Angle::reduced(arc.start.radians().clone() + &half_span))
    }

    fn arc_join(a: &Arc, b: &Arc) -> Option<Arc> {
        if a.circle != b.circle || a.is_full() || b.is_full() {
            return None;
        }
        if a.end == b.start {
            Some(Arc {
                circle: a.circle.clone(),
                start: a.start.clone(),
                end: b.end.clone(),
            })
        } else if b.end == a.start {
            Some(Arc {
                circle: a.circle.clone(),
                start: b.start.clone(),
                end: a.end.clone(),
            })
        } else {
            None
        }
    }

    fn rotate_arc(arc: &Arc, center: &Point, angle: &Angle) -> Arc {
        Arc {
            circle: rotate_circle(&arc.circle, center, angle),
            start: Angle::reduced(arc.start.radians().clone() + angle.radians()),
            end: Angle::reduced(arc.end.radians().clone() + angle.radians()),
        }
    }

    fn leave_key(arc: &Arc, starts_here: bool, _at: &Point) -> (Fixed, u8, Fixed) {
        let phi = if starts_here {
            trig::mod_2pi(arc.start.radians().clone() + &*FRAC_PI_2)
        } else {
            trig::mod_2pi(arc.end.radians().clone() - &*FRAC_PI_2)
        };
        // Tangent arcs tie on `phi`; a starting entry outranks an ending one,
        // then tighter circles outrank wider ones when both start, and the
        // other way around when both end.
        let radius_rank = if starts_here {
            -arc.circle.radius.clone()
        } else {
            arc.circle.radius.clone()
        };
        (phi, u8::from(starts_here), radius_rank)
    }
}
