//! The unit-sphere realization of the geometry kernel.
//!
//! A circle is the locus `{p : p·c = cos r}` for a unit center `c` and an
//! angular radius `r ∈ (0, π)`, which makes `(c, r)` and `(−c, π−r)` two
//! names for the same point set. Equality and hashing treat the two dual
//! representations as one circle; arcs run counterclockwise about whichever
//! center they are stored with, and every arc set carries a `zero` reference
//! point fixing its angular frame.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use puzzle_core::{
    Angle, Fixed, UnitArcs,
    trig::{self, PI},
};

use crate::geometry::{DiskSide, Geometry};

/// A not-necessarily-unit vector; the working type behind [`Point`].
#[derive(Clone, Debug)]
struct V3 {
    x: Fixed,
    y: Fixed,
    z: Fixed,
}

impl V3 {
    fn new(x: Fixed, y: Fixed, z: Fixed) -> V3 {
        V3 { x, y, z }
    }

    fn dot(&self, other: &V3) -> Fixed {
        self.x.clone() * &other.x + &(self.y.clone() * &other.y) + &(self.z.clone() * &other.z)
    }

    fn cross(&self, other: &V3) -> V3 {
        V3::new(
            self.y.clone() * &other.z - &(self.z.clone() * &other.y),
            self.z.clone() * &other.x - &(self.x.clone() * &other.z),
            self.x.clone() * &other.y - &(self.y.clone() * &other.x),
        )
    }

    fn add(&self, other: &V3) -> V3 {
        V3::new(
            self.x.clone() + &other.x,
            self.y.clone() + &other.y,
            self.z.clone() + &other.z,
        )
    }

    fn sub(&self, other: &V3) -> V3 {
        V3::new(
            self.x.clone() - &other.x,
            self.y.clone() - &other.y,
            self.z.clone() - &other.z,
        )
    }

    fn scaled(&self, factor: &Fixed) -> V3 {
        V3::new(
            self.x.clone() * factor,
            self.y.clone() * factor,
            self.z.clone() * factor,
        )
    }

    fn negated(&self) -> V3 {
        V3::new(-self.x.clone(), -self.y.clone(), -self.z.clone())
    }

    fn norm_squared(&self) -> Fixed {
        self.dot(self)
    }

    /// Normalize onto the unit sphere.
    ///
    /// # Panics
    ///
    /// Panics if the vector compares equal to zero.
    fn normalized(&self) -> Point {
        let norm = self.norm_squared().sqrt();
        assert!(!norm.is_zero(), "cannot normalize a null vector");
        Point {
            x: self.x.clone() / &norm,
            y: self.y.clone() / &norm,
            z: self.z.clone() / &norm,
        }
    }
}

/// A point on the unit sphere.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Point {
    x: Fixed,
    y: Fixed,
    z: Fixed,
}

impl Point {
    /// Build a point from any non-null vector by normalizing it.
    ///
    /// # Panics
    ///
    /// Panics if the vector compares equal to zero.
    #[must_use]
    pub fn new(x: Fixed, y: Fixed, z: Fixed) -> Point {
        V3::new(x, y, z).normalized()
    }

    #[must_use]
    pub fn from_f64s(x: f64, y: f64, z: f64) -> Point {
        Point::new(Fixed::from_f64(x), Fixed::from_f64(y), Fixed::from_f64(z))
    }

    #[must_use]
    pub fn negated(&self) -> Point {
        Point {
            x: -self.x.clone(),
            y: -self.y.clone(),
            z: -self.z.clone(),
        }
    }

    fn v3(&self) -> V3 {
        V3::new(self.x.clone(), self.y.clone(), self.z.clone())
    }

    fn lex_cmp(&self, other: &Point) -> Ordering {
        self.x
            .cmp(&other.x)
            .then_with(|| self.y.cmp(&other.y))
            .then_with(|| self.z.cmp(&other.z))
    }
}

fn fx_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = fxhash::FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// A circle on the sphere, equal to its dual representation `(−c, π−r)`.
#[derive(Clone, Debug)]
pub struct Circle {
    center: Point,
    radius: Fixed,
}

impl Circle {
    /// # Panics
    ///
    /// Panics unless the angular radius compares inside `(0, π)`.
    #[must_use]
    pub fn new(center: Point, radius: Fixed) -> Circle {
        assert!(
            radius.cmp_zero() == Ordering::Greater && radius < *PI,
            "a spherical circle needs an angular radius strictly between 0 and π"
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

    /// The other representation of the same point set.
    #[must_use]
    pub fn dual(&self) -> Circle {
        Circle {
            center: self.center.negated(),
            radius: PI.clone() - &self.radius,
        }
    }

    /// The representation whose center is lexicographically larger; a
    /// deterministic choice shared by both duals.
    fn canonical(&self) -> Circle {
        let dual = self.dual();
        if self.center.lex_cmp(&dual.center) == Ordering::Less {
            dual
        } else {
            self.clone()
        }
    }

    /// A deterministic point on the circle, derived from the canonical
    /// representation so that both duals agree on it.
    fn reference_point(&self) -> Point {
        let canonical = self.canonical();
        let center = canonical.center.v3();
        // The coordinate axis least aligned with the center keeps the cross
        // product well away from zero.
        let axes = [
            V3::new(Fixed::one(), Fixed::zero(), Fixed::zero()),
            V3::new(Fixed::zero(), Fixed::one(), Fixed::zero()),
            V3::new(Fixed::zero(), Fixed::zero(), Fixed::one()),
        ];
        let alignments = [
            center.x.clone().abs(),
            center.y.clone().abs(),
            center.z.clone().abs(),
        ];
        let pick = (0..3)
            .min_by(|&i, &j| alignments[i].cmp(&alignments[j]))
            .unwrap_or(0);
        let sideways = center.cross(&axes[pick]).normalized().v3();
        let cos_r = trig::cos(&canonical.radius);
        let sin_r = trig::sin(&canonical.radius);
        center
            .scaled(&cos_r)
            .add(&sideways.scaled(&sin_r))
            .normalized()
    }
}

impl PartialEq for Circle {
    fn eq(&self, other: &Self) -> bool {
        if self.center == other.center && self.radius == other.radius {
            return true;
        }
        let dual = other.dual();
        self.center == dual.center && self.radius == dual.radius
    }
}

impl Eq for Circle {}

impl Hash for Circle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let dual = self.dual();
        let own = fx_hash(&(&self.center, &self.radius));
        let twin = fx_hash(&(&dual.center, &dual.radius));
        state.write_u64(own.wrapping_add(twin));
    }
}

/// One side of a circle: the cap of points within `radius` of `center`.
/// Unlike [`Circle`], a disk is *not* identified with its complement.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Disk {
    center: Point,
    radius: Fixed,
}

impl Disk {
    /// # Panics
    ///
    /// Panics unless the angular radius compares inside `(0, π)`.
    #[must_use]
    pub fn new(center: Point, radius: Fixed) -> Disk {
        assert!(
            radius.cmp_zero() == Ordering::Greater && radius < *PI,
            "a spherical disk needs an angular radius strictly between 0 and π"
        );
        Disk { center, radius }
    }

    #[must_use]
    pub fn center(&self) -> &Point {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> &Fixed {
        &self.radius
    }
}

/// A counterclockwise arc about the stored center from `start` to `end`;
/// coincident endpoints denote the full circle, in which case the anchor
/// point is not part of the value.
#[derive(Clone, Debug)]
pub struct Arc {
    circle: Circle,
    start: Point,
    end: Point,
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
        match (self.is_full(), other.is_full()) {
            (true, true) => true,
            (false, false) => {
                if self.circle.center == other.circle.center {
                    self.start == other.start && self.end == other.end
                } else {
                    // Dual representations traverse the other way around.
                    self.start == other.end && self.end == other.start
                }
            }
            _ => false,
        }
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
            let dual = self.circle.dual();
            let own = fx_hash(&(&self.circle.center, &self.start, &self.end));
            let twin = fx_hash(&(&dual.center, &self.end, &self.start));
            state.write_u64(own.wrapping_add(twin));
        }
    }
}

/// The present cuts on one supporting circle, with the `zero` point fixing
/// where its angular frame starts.
#[derive(Clone, Debug)]
pub struct ArcsOnCircle {
    circle: Circle,
    zero: Point,
    arcs: UnitArcs,
}

impl ArcsOnCircle {
    fn point_at(&self, angle: &Angle) -> Point {
        rodrigues(&self.zero, &self.circle.center, angle)
    }
}

/// Rodrigues' rotation of `point` about the axis through `axis` by `angle`.
fn rodrigues(point: &Point, axis: &Point, angle: &Angle) -> Point {
    let p = point.v3();
    let k = axis.v3();
    let (sin, cos) = (angle.sin(), angle.cos());
    let radial = p.scaled(cos);
    let swirl = k.cross(&p).scaled(sin);
    let axial = k.scaled(&(k.dot(&p) * &(Fixed::one() - cos)));
    radial.add(&swirl).add(&axial).normalized()
}

/// The counterclockwise angle about the `pivot` axis from `from` to `to`,
/// both projected onto the plane orthogonal to the pivot.
///
/// # Panics
///
/// Panics if either projection collapses to zero, i.e. an argument is
/// parallel to the pivot.
fn angle_about(pivot: &V3, from: &V3, to: &V3) -> Fixed {
    let u = from.sub(&pivot.scaled(&from.dot(pivot)));
    let v = to.sub(&pivot.scaled(&to.dot(pivot)));
    let nu = u.norm_squared();
    let nv = v.norm_squared();
    assert!(
        !nu.is_zero() && !nv.is_zero(),
        "angle reference is parallel to the pivot"
    );
    let cosine = u.dot(&v) / &(nu * &nv).sqrt();
    let alpha = trig::acos(&cosine);
    if u.cross(&v).dot(pivot).cmp_zero() == Ordering::Less {
        trig::mod_2pi(trig::TAU.clone() - &alpha)
    } else {
        alpha
    }
}

/// The unit sphere.
#[derive(Clone, Copy, Debug)]
pub enum Spherical {}

impl Spherical {
    /// Translate `source`'s arc set into `target`'s frame: flip the
    /// direction if the stored representations are dual to each other, then
    /// line the zero points up.
    fn aligned(target: &ArcsOnCircle, source: &ArcsOnCircle) -> UnitArcs {
        debug_assert!(target.circle == source.circle);
        let shift = Self::angle_of_point(target, &source.zero);
        if target.circle.center == source.circle.center {
            source.arcs.rotate(&shift)
        } else {
            source.arcs.mirror().rotate(&shift)
        }
    }
}

impl Geometry for Spherical {
    type Point = Point;
    type Circle = Circle;
    type Disk = Disk;
    type Arc = Arc;
    type Arcs = ArcsOnCircle;
    type LeaveKey = (Fixed, Fixed, u8);

    fn disk_circle(disk: &Disk) -> Circle {
        Circle::new(disk.center.clone(), disk.radius.clone())
    }

    fn disk_center(disk: &Disk) -> Point {
        disk.center.clone()
    }

    fn disk_side(disk: &Disk, point: &Point) -> DiskSide {
        let separation = trig::acos(&disk.center.v3().dot(&point.v3()));
        match separation.cmp(&disk.radius) {
            Ordering::Less => DiskSide::Interior,
            Ordering::Equal => DiskSide::Boundary,
            Ordering::Greater => DiskSide::Exterior,
        }
    }

    fn rotate_point(point: &Point, center: &Point, angle: &Angle) -> Point {
        rodrigues(point, center, angle)
    }

    fn circle_intersections(a: &Circle, b: &Circle) -> Vec<Point> {
        let n1 = a.center.v3();
        let n2 = b.center.v3();
        let q = n1.dot(&n2);
        let q_squared = q.clone() * &q;
        if q_squared >= Fixed::one() {
            // Coaxial circles never cross transversally.
            return Vec::new();
        }
        let denom = Fixed::one() - &q_squared;
        let cos_r1 = trig::cos(&a.radius);
        let cos_r2 = trig::cos(&b.radius);
        let alpha = (cos_r1.clone() - &(q.clone() * &cos_r2)) / &denom;
        let beta = (cos_r2 - &(q * &cos_r1)) / &denom;
        let midpoint = n1.scaled(&alpha).add(&n2.scaled(&beta));
        let mid_norm_squared = midpoint.norm_squared();
        match mid_norm_squared.cmp(&Fixed::one()) {
            Ordering::Greater => Vec::new(),
            Ordering::Equal => vec![midpoint.normalized()],
            Ordering::Less => {
                let axis = n1.cross(&n2);
                let reach =
                    ((Fixed::one() - &mid_norm_squared) / &axis.norm_squared()).sqrt();
                let offset = axis.scaled(&reach);
                vec![
                    midpoint.add(&offset).normalized(),
                    midpoint.sub(&offset).normalized(),
                ]
            }
        }
    }

    fn full_arcs(circle: &Circle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: circle.clone(),
            zero: circle.reference_point(),
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
        ArcsOnCircle {
            circle: target.circle.clone(),
            zero: target.zero.clone(),
            arcs: target.arcs.union(&Self::aligned(target, source)),
        }
    }

    fn same_circle_difference(target: &ArcsOnCircle, source: &ArcsOnCircle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: target.circle.clone(),
            zero: target.zero.clone(),
            arcs: target.arcs.difference(&Self::aligned(target, source)),
        }
    }

    fn disk_interior(arcs: &ArcsOnCircle, disk: &Disk) -> ArcsOnCircle {
        let boundary = Self::disk_circle(disk);
        if arcs.circle == boundary {
            return ArcsOnCircle {
                circle: arcs.circle.clone(),
                zero: arcs.zero.clone(),
                arcs: UnitArcs::empty(),
            };
        }
        let crossings = Self::circle_intersections(&arcs.circle, &boundary);
        let inside = match crossings.as_slice() {
            [first, second] => {
                let t1 = Self::angle_of_point(arcs, first);
                let t2 = Self::angle_of_point(arcs, second);
                let half_way = trig::mod_2pi(t2.clone() - &t1) / &Fixed::from(2);
                let probe = arcs.point_at(&Angle::reduced(t1.clone() + &half_way));
                if Self::disk_side(disk, &probe) == DiskSide::Interior {
                    UnitArcs::of(&t1, &t2)
                } else {
                    UnitArcs::of(&t2, &t1)
                }
            }
            [touch] => {
                let t = Self::angle_of_point(arcs, touch);
                let probe = arcs.point_at(&Angle::reduced(t + &*PI));
                if Self::disk_side(disk, &probe) == DiskSide::Interior {
                    UnitArcs::full()
                } else {
                    UnitArcs::empty()
                }
            }
            _ => {
                if Self::disk_side(disk, &arcs.zero) == DiskSide::Interior {
                    UnitArcs::full()
                } else {
                    UnitArcs::empty()
                }
            }
        };
        ArcsOnCircle {
            circle: arcs.circle.clone(),
            zero: arcs.zero.clone(),
            arcs: arcs.arcs.intersection(&inside),
        }
    }

    fn rotate_arcs(arcs: &ArcsOnCircle, center: &Point, angle: &Angle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: Circle {
                center: rodrigues(&arcs.circle.center, center, angle),
                radius: arcs.circle.radius.clone(),
            },
            zero: rodrigues(&arcs.zero, center, angle),
            arcs: arcs.arcs.clone(),
        }
    }

    fn angle_of_point(arcs: &ArcsOnCircle, point: &Point) -> Fixed {
        angle_about(
            &arcs.circle.center.v3(),
            &arcs.zero.v3(),
            &point.v3(),
        )
    }

    fn make_arc(arcs: &ArcsOnCircle, start: &Fixed, end: &Fixed) -> Arc {
        let start_point = arcs.point_at(&Angle::reduced(start.clone()));
        let end_point = if start == end {
            start_point.clone()
        } else {
            arcs.point_at(&Angle::reduced(end.clone()))
        };
        Arc {
            circle: arcs.circle.clone(),
            start: start_point,
            end: end_point,
        }
    }

    fn arc_circle(arc: &Arc) -> &Circle {
        &arc.circle
    }

    fn arc_start(arc: &Arc) -> Point {
        arc.start.clone()
    }

    fn arc_end(arc: &Arc) -> Point {
        arc.end.clone()
    }

    fn arc_midpoint(arc: &Arc) -> Point {
        let half_span = if arc.is_full() {
            PI.clone()
        } else {
            let sweep = angle_about(
                &arc.circle.center.v3(),
                &arc.start.v3(),
                &arc.end.v3(),
            );
            sweep / &Fixed::from(2)
        };
        rodrigues(&arc.start, &arc.circle.center, &Angle::reduced(half_span))
    }

    fn arc_join(a: &Arc, b: &Arc) -> Option<Arc> {
        if a.circle != b.circle || a.is_full() || b.is_full() {
            return None;
        }
        let (b_start, b_end) = if a.circle.center == b.circle.center {
            (&b.start, &b.end)
        } else {
            (&b.end, &b.start)
        };
        if a.end == *b_start {
            Some(Arc {
                circle: a.circle.clone(),
                start: a.start.clone(),
                end: b_end.clone(),
            })
        } else if *b_end == a.start {
            Some(Arc {
                circle: a.circle.clone(),
                start: b_start.clone(),
                end: a.end.clone(),
            })
        } else {
            None
        }
    }

    fn rotate_arc(arc: &Arc, center: &Point, angle: &Angle) -> Arc {
        Arc {
            circle: Circle {
                center: rodrigues(&arc.circle.center, center, angle),
                radius: arc.circle.radius.clone(),
            },
            start: rodrigues(&arc.start, center, angle),
            end: rodrigues(&arc.end, center, angle),
        }
    }

    fn leave_key(arc: &Arc, starts_here: bool, at: &Point) -> (Fixed, Fixed, u8) {
        let pivot = at.v3();
        let travel = arc.circle.center.v3().cross(&pivot);
        let leave = if starts_here { travel } else { travel.negated() };
        // Any fixed direction not parallel to the pivot serves as the shared
        // reference for every entry at this point.
        let reference = if at.x.is_zero() && at.y.is_zero() {
            V3::new(Fixed::one(), Fixed::zero(), Fixed::zero())
        } else {
            V3::new(Fixed::zero(), Fixed::zero(), Fixed::one())
        };
        let phi = angle_about(&pivot, &reference, &leave);
        // Radius of the representation whose center lies to the left of the
        // leaving direction: entries walking an arc backwards take the
        // supplement, which reduces every tie to the both-start case.
        let leftward_radius = if starts_here {
            arc.circle.radius.clone()
        } else {
            PI.clone() - &arc.circle.radius
        };
        (phi, -leftward_radius, u8::from(starts_here))
    }
}
