use geo::orient::Direction;
use geo::{Area, BooleanOps, ConvexHull, Coord, MapCoords, MultiPoint, MultiPolygon, Orient, Point};

use crate::geometry::{PlanarSurface, Plane};
use crate::math::{Point2, Point3, TOLERANCE};

/// A shadow footprint lying in the shaded plane.
///
/// The footprint is stored as 2D geometry in the plane's `(u, v)` frame, so
/// area and overlap queries run on plain planar polygons. A convex hull gives
/// a single polygon; a union over a solid may give several disjoint ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPolygon {
    frame: Plane,
    footprint: MultiPolygon<f64>,
}

impl ShadowPolygon {
    /// Builds the convex hull of points given in `frame` coordinates.
    #[must_use]
    pub fn convex_hull(frame: Plane, points: &[Point2]) -> Self {
        let cloud: MultiPoint<f64> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
        let hull = cloud.convex_hull();
        Self {
            frame,
            footprint: MultiPolygon::new(vec![hull]),
        }
    }

    /// Unions several footprints into one, expressed in the first one's frame.
    ///
    /// Zero-area pieces (edge-on projections) are skipped. If every piece is
    /// degenerate, the first one is returned unchanged. Returns `None` for an
    /// empty input.
    #[must_use]
    pub fn union_all(pieces: Vec<ShadowPolygon>) -> Option<Self> {
        let frame = pieces.first()?.frame.clone();
        let merged = pieces
            .iter()
            .filter(|piece| piece.area() > TOLERANCE)
            .map(|piece| piece.footprint_in(&frame))
            .reduce(|acc, footprint| acc.union(&footprint));

        match merged {
            Some(footprint) => Some(Self { frame, footprint }),
            None => pieces.into_iter().next(),
        }
    }

    /// The plane frame the footprint is expressed in.
    #[must_use]
    pub fn frame(&self) -> &Plane {
        &self.frame
    }

    /// The footprint in frame coordinates.
    #[must_use]
    pub fn footprint(&self) -> &MultiPolygon<f64> {
        &self.footprint
    }

    /// Shadow area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.footprint.unsigned_area()
    }

    /// Area shared with another shadow in the same plane.
    #[must_use]
    pub fn intersection_area(&self, other: &ShadowPolygon) -> f64 {
        self.footprint
            .intersection(&other.footprint_in(&self.frame))
            .unsigned_area()
    }

    /// Area of the shadow that falls on `surface`, taken as the convex hull
    /// of its points.
    #[must_use]
    pub fn covered_area(&self, surface: &PlanarSurface) -> f64 {
        let uv: Vec<Point2> = surface.points().iter().map(|p| self.frame.to_uv(p)).collect();
        let target = Self::convex_hull(self.frame.clone(), &uv);
        self.intersection_area(&target)
    }

    /// Exterior rings lifted back to 3D. Each ring is closed (the last point
    /// repeats the first).
    #[must_use]
    pub fn exterior_rings(&self) -> Vec<Vec<Point3>> {
        self.footprint
            .iter()
            .map(|poly| {
                poly.exterior()
                    .coords()
                    .map(|c| self.frame.lift(&Point2::new(c.x, c.y)))
                    .collect()
            })
            .collect()
    }

    /// All distinct exterior vertices in 3D, ring after ring.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point3> {
        self.exterior_rings()
            .into_iter()
            .flat_map(|mut ring| {
                if ring.len() > 1 && ring.first() == ring.last() {
                    ring.pop();
                }
                ring
            })
            .collect()
    }

    /// Re-expresses this footprint in another plane frame.
    fn footprint_in(&self, frame: &Plane) -> MultiPolygon<f64> {
        if *frame == self.frame {
            return self.footprint.clone();
        }
        // A mirrored frame flips ring winding, so re-orient after mapping.
        self.footprint
            .map_coords(|c| {
                let uv = frame.to_uv(&self.frame.lift(&Point2::new(c.x, c.y)));
                Coord { x: uv.x, y: uv.y }
            })
            .orient(Direction::Default)
    }
}
