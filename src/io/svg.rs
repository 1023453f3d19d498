//! SVG path emission.

use crate::float_types::{Real, LINE_TURN, PI};
use crate::pen::Pen;

use svg::node::element::path::Data;
use svg::node::element::Path;
use svg::Document;

/// A pen that renders into an SVG path.
///
/// Emission is in whatever coordinate frame the caller draws in; SVG's
/// y-down convention is the caller's to establish, typically with a
/// flipping scale on a transform pen (which negates turns accordingly).
pub struct SvgPen {
    data: Option<Data>,
    cur: Option<(Real, Real)>,
}

impl Default for SvgPen {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgPen {
    pub fn new() -> Self {
        Self { data: Some(Data::new()), cur: None }
    }

    /// The accumulated path data.
    pub fn into_data(mut self) -> Data {
        self.data.take().expect("path data already taken")
    }

    /// The accumulated path as an unfilled stroked element.
    pub fn into_path(self) -> Path {
        Path::new()
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 0.01)
            .set("d", self.into_data())
    }
}

/// Wraps a path element into a standalone document with the given viewport.
pub fn document(path: Path, min: (Real, Real), size: (Real, Real)) -> Document {
    #[allow(clippy::unnecessary_cast)]
    Document::new()
        .set(
            "viewBox",
            (min.0 as f64, min.1 as f64, size.0 as f64, size.1 as f64),
        )
        .add(path)
}

impl Pen for SvgPen {
    fn move_to(&mut self, x: Real, y: Real) {
        let data = self.data.take().expect("path data already taken");
        #[allow(clippy::unnecessary_cast)]
        let data = data.move_to((x as f64, y as f64));
        self.data = Some(data);
        self.cur = Some((x, y));
    }

    fn arc_to(&mut self, x: Real, y: Real, turn: Real) {
        let (cx, cy) = self.cur.expect("arc_to with no current point");
        let data = self.data.take().expect("path data already taken");
        #[allow(clippy::unnecessary_cast)]
        let data = if turn.abs() < LINE_TURN {
            data.line_to((x as f64, y as f64))
        } else {
            let chord = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            let r = (chord / (2.0 * (turn.abs() * 0.5).sin())).abs();
            let large_arc = if turn.abs() > PI { 1.0 } else { 0.0 };
            let sweep = if turn > 0.0 { 1.0 } else { 0.0 };
            data.elliptical_arc_to((
                r as f64,
                r as f64,
                0.0,
                large_arc as f64,
                sweep as f64,
                x as f64,
                y as f64,
            ))
        };
        self.data = Some(data);
        self.cur = Some((x, y));
    }
}
