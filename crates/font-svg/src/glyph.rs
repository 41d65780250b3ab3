//! Outline conversion from SVG path data to TrueType contours.

use kurbo::{BezPath, CubicBez, PathEl, Point};
use read_fonts::tables::glyf::CurvePoint;
use write_fonts::tables::glyf::{Bbox, Contour, Glyph, SimpleGlyph};

use crate::parse::to_i16;

/// Maximum distance between a cubic and its quadratic approximation, in font units.
const CUBIC_TOLERANCE: f64 = 0.5;

/// A glyph outline as TrueType contours (quadratic, integer coordinates).
#[derive(Debug, Default)]
pub(crate) struct GlyphOutline {
    contours: Vec<Vec<CurvePoint>>,
}

impl GlyphOutline {
    pub(crate) fn from_path(path: &BezPath) -> Self {
        let mut outline = Self::default();
        let mut points = Vec::new();
        let mut current = Point::ZERO;
        let mut start = Point::ZERO;

        for element in path.elements() {
            match *element {
                PathEl::MoveTo(p) => {
                    outline.close(&mut points);
                    points.push(on_curve(p));
                    current = p;
                    start = p;
                }
                PathEl::LineTo(p) => {
                    resume(&mut points, current);
                    points.push(on_curve(p));
                    current = p;
                }
                PathEl::QuadTo(c, p) => {
                    resume(&mut points, current);
                    points.push(off_curve(c));
                    points.push(on_curve(p));
                    current = p;
                }
                PathEl::CurveTo(c1, c2, p) => {
                    resume(&mut points, current);
                    let cubic = CubicBez::new(current, c1, c2, p);
                    for (_, _, quad) in cubic.to_quads(CUBIC_TOLERANCE) {
                        points.push(off_curve(quad.p1));
                        points.push(on_curve(quad.p2));
                    }
                    current = p;
                }
                PathEl::ClosePath => {
                    outline.close(&mut points);
                    current = start;
                }
            }
        }
        outline.close(&mut points);
        outline
    }

    pub(crate) fn point_count(&self) -> usize {
        self.contours.iter().map(Vec::len).sum()
    }

    pub(crate) fn contour_count(&self) -> usize {
        self.contours.len()
    }

    pub(crate) fn into_glyph(self) -> Glyph {
        if self.contours.is_empty() {
            return Glyph::Empty;
        }
        let mut glyph = SimpleGlyph {
            bbox: Bbox::default(),
            contours: self.contours.into_iter().map(Contour::from).collect(),
            instructions: vec![],
        };
        glyph.recompute_bounding_box();
        Glyph::Simple(glyph)
    }

    fn close(&mut self, points: &mut Vec<CurvePoint>) {
        // The closing segment is implicit in TrueType.
        if points.len() > 1 && same_point(&points[0], &points[points.len() - 1]) {
            points.pop();
        }
        if points.len() > 1 {
            self.contours.push(std::mem::take(points));
        } else {
            points.clear();
        }
    }
}

/// Restart a contour at the current point when drawing continues after a close.
fn resume(points: &mut Vec<CurvePoint>, current: Point) {
    if points.is_empty() {
        points.push(on_curve(current));
    }
}

fn on_curve(p: Point) -> CurvePoint {
    CurvePoint::new(to_i16(p.x), to_i16(p.y), true)
}

fn off_curve(p: Point) -> CurvePoint {
    CurvePoint::new(to_i16(p.x), to_i16(p.y), false)
}

fn same_point(a: &CurvePoint, b: &CurvePoint) -> bool {
    a.x == b.x && a.y == b.y && a.on_curve == b.on_curve
}
