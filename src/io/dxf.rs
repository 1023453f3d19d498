//! DXF emission.
//!
//! Each subpath becomes an LWPOLYLINE. An arc is carried by the `bulge` of
//! its starting vertex, `bulge = tan(turn / 4)`, which is the native DXF
//! encoding of a circular arc between polyline vertices.

use crate::float_types::Real;
use crate::pen::Pen;

use dxf::entities::{Entity, EntityType, LwPolyline};
use dxf::Drawing;
use dxf::LwPolylineVertex;
use std::error::Error;

/// A pen that renders into a DXF drawing.
pub struct DxfPen {
    drawing: Drawing,
    vertices: Vec<LwPolylineVertex>,
    cur: Option<(Real, Real)>,
}

impl Default for DxfPen {
    fn default() -> Self {
        Self::new()
    }
}

impl DxfPen {
    pub fn new() -> Self {
        Self {
            drawing: Drawing::new(),
            vertices: Vec::new(),
            cur: None,
        }
    }

    fn flush(&mut self) {
        if self.vertices.len() < 2 {
            self.vertices.clear();
            return;
        }
        let mut polyline = LwPolyline::default();
        polyline.vertices = std::mem::take(&mut self.vertices);
        self.drawing
            .add_entity(Entity::new(EntityType::LwPolyline(polyline)));
    }

    /// Finishes the drawing and serializes it.
    pub fn finish(mut self) -> Result<Vec<u8>, Box<dyn Error>> {
        self.flush();
        let mut buffer = Vec::new();
        self.drawing.save(&mut buffer)?;
        Ok(buffer)
    }
}

#[allow(clippy::unnecessary_cast)]
fn vertex(x: Real, y: Real) -> LwPolylineVertex {
    LwPolylineVertex {
        x: x as f64,
        y: y as f64,
        ..Default::default()
    }
}

impl Pen for DxfPen {
    fn move_to(&mut self, x: Real, y: Real) {
        self.flush();
        self.cur = Some((x, y));
    }

    fn arc_to(&mut self, x: Real, y: Real, turn: Real) {
        let (cx, cy) = self.cur.expect("arc_to with no current point");
        if self.vertices.is_empty() {
            self.vertices.push(vertex(cx, cy));
        }
        if let Some(last) = self.vertices.last_mut() {
            #[allow(clippy::unnecessary_cast)]
            {
                last.bulge = (turn / 4.0).tan() as f64;
            }
        }
        self.vertices.push(vertex(x, y));
        self.cur = Some((x, y));
    }
}
