/* bus-timelapse: Frame-by-frame renderings of infections spreading on a bus

    Copyright 2020 Fabio A. Correa Duran facorread@gmail.com

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

//! Agent footprints in seat units.

/// Number of vertices used to draw a circle in data units
const CIRCLE_VERTICES: usize = 32;

/// The 2D footprint of an agent, in seat units.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Point(f64, f64),
    Circle { center: (f64, f64), radius: f64 },
    /// Closed ring; the last vertex connects back to the first.
    Polygon(Vec<(f64, f64)>),
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn padded(self, pad: f64) -> Self {
        Self::new(
            self.min_x - pad,
            self.min_y - pad,
            self.max_x + pad,
            self.max_y + pad,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl Shape {
    /// Axis-aligned square centered at `center`
    pub fn square(center: (f64, f64), side: f64) -> Self {
        let h = side / 2.0;
        let (x, y) = center;
        Shape::Polygon(vec![
            (x - h, y - h),
            (x + h, y - h),
            (x + h, y + h),
            (x - h, y + h),
        ])
    }

    /// Returns `None` for an empty polygon.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Shape::Point(x, y) => Some(Bounds::new(*x, *y, *x, *y)),
            Shape::Circle { center, radius } => {
                let r = radius.abs();
                Some(Bounds::new(
                    center.0 - r,
                    center.1 - r,
                    center.0 + r,
                    center.1 + r,
                ))
            }
            Shape::Polygon(vertices) => {
                let (first, rest) = vertices.split_first()?;
                let start = Bounds::new(first.0, first.1, first.0, first.1);
                Some(rest.iter().fold(start, |b, &(x, y)| {
                    b.union(Bounds::new(x, y, x, y))
                }))
            }
        }
    }

    /// Vertices to fill for area shapes. Points have no area and yield `None`.
    pub fn outline(&self) -> Option<Vec<(f64, f64)>> {
        match self {
            Shape::Point(..) => None,
            Shape::Circle { center, radius } => Some(
                (0..CIRCLE_VERTICES)
                    .map(|i| {
                        let theta = std::f64::consts::TAU * i as f64 / CIRCLE_VERTICES as f64;
                        (
                            center.0 + radius * theta.cos(),
                            center.1 + radius * theta.sin(),
                        )
                    })
                    .collect(),
            ),
            Shape::Polygon(vertices) if vertices.is_empty() => None,
            Shape::Polygon(vertices) => Some(vertices.clone()),
        }
    }
}

/// Bounding box of every shape, or `None` if none has extent.
pub fn bounds_of<'a, I: IntoIterator<Item = &'a Shape>>(shapes: I) -> Option<Bounds> {
    shapes
        .into_iter()
        .filter_map(Shape::bounds)
        .reduce(Bounds::union)
}
