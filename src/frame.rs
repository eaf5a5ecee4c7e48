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

//! One rendered snapshot of the bus.
//!
//! A [`Frame`] captures the agent partition at the moment it is built; drawing happens when the frame is saved or exported,
//! and the drawing backend lives only for the duration of that call.

use std::ops::Range;
use std::path::Path;

use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{drawing_error, RenderResult};
use crate::model::{Partition, SeatGeometry, Simulation};
use crate::shape::{bounds_of, Bounds, Shape};

/// Marker radius in pixels for point-shaped agents
const POINT_RADIUS: i32 = 4;

/// Linear axis whose labelled points are the seat positions
struct SeatAxis {
    span: RangedCoordf64,
    ticks: Vec<f64>,
}

impl SeatAxis {
    fn new(range: Range<f64>, ticks: Vec<f64>) -> Self {
        Self {
            span: range.into(),
            ticks,
        }
    }
}

impl Ranged for SeatAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.span.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.span.range()
    }
}

impl ValueFormatter<f64> for SeatAxis {
    fn format_ext(&self, value: &f64) -> String {
        format!("{:.0}", value)
    }
}

/// Canvas layout
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStyle {
    pub pixels_per_unit: f64,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub caption_size: u32,
    pub min_size: (u32, u32),
    pub max_size: (u32, u32),
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            pixels_per_unit: 48.0,
            margin: 10,
            x_label_area: 40,
            y_label_area: 50,
            caption_size: 22,
            min_size: (480, 360),
            max_size: (4096, 4096),
        }
    }
}

/// Infected agents in red, uninfected in green, over the seating grid.
#[derive(Clone, Debug)]
pub struct Frame {
    title: String,
    partition: Partition,
    geometry: SeatGeometry,
    style: FrameStyle,
}

impl Frame {
    pub fn new(title: String, partition: Partition, geometry: SeatGeometry) -> Self {
        Self {
            title,
            partition,
            geometry,
            style: FrameStyle::default(),
        }
    }

    /// Captures the current state of `model`.
    pub fn capture<M: Simulation>(model: &M, title: String) -> Self {
        Self::new(title, Partition::of(model), model.geometry())
    }

    pub fn with_style(mut self, style: FrameStyle) -> Self {
        self.style = style;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Plotting range: the seat grid plus every agent, padded by half a unit.
    pub fn extent(&self) -> Bounds {
        let grid = Bounds::new(
            0.0,
            0.0,
            f64::from(self.geometry.max_columns),
            f64::from(self.geometry.max_rows),
        );
        let shapes = self
            .partition
            .infected
            .iter()
            .chain(self.partition.uninfected.iter());
        bounds_of(shapes)
            .map_or(grid, |b| b.union(grid))
            .padded(0.5)
    }

    /// Canvas size fitted to the plotting range, so the image carries no slack around its content.
    pub fn canvas_size(&self) -> (u32, u32) {
        let extent = self.extent();
        let s = &self.style;
        let fit = |span: f64, chrome: u32, min: u32, max: u32| -> u32 {
            let px = (span * s.pixels_per_unit).ceil().clamp(0.0, f64::from(max)) as u32;
            px.saturating_add(chrome).clamp(min, max)
        };
        let width = fit(
            extent.width(),
            s.y_label_area + 2 * s.margin,
            s.min_size.0,
            s.max_size.0,
        );
        let height = fit(
            extent.height(),
            s.x_label_area + s.caption_size * 2 + 2 * s.margin,
            s.min_size.1,
            s.max_size.1,
        );
        (width, height)
    }

    /// Draws the frame on any plotters backend.
    pub fn draw_on<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> RenderResult<()> {
        let extent = self.extent();
        let column_ticks = self.geometry.column_ticks()?;
        let row_ticks = self.geometry.row_ticks()?;

        root.fill(&WHITE).map_err(drawing_error)?;
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", f64::from(self.style.caption_size)))
            .margin(self.style.margin)
            .x_label_area_size(self.style.x_label_area)
            .y_label_area_size(self.style.y_label_area)
            .build_cartesian_2d(
                SeatAxis::new(extent.min_x..extent.max_x, column_ticks),
                SeatAxis::new(extent.min_y..extent.max_y, row_ticks),
            )
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc("Seat Column")
            .y_desc("Seat Row")
            .draw()
            .map_err(drawing_error)?;

        for (shapes, color, label) in [
            (&self.partition.infected, RED, "infected"),
            (&self.partition.uninfected, GREEN, "uninfected"),
        ] {
            chart
                .draw_series(
                    shapes
                        .iter()
                        .filter_map(Shape::outline)
                        .map(|ring| Polygon::new(ring, color.mix(0.85).filled())),
                )
                .map_err(drawing_error)?
                .label(label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

            chart
                .draw_series(shapes.iter().filter_map(|s| match s {
                    Shape::Point(x, y) => Some(Circle::new((*x, *y), POINT_RADIUS, color.filled())),
                    _ => None,
                }))
                .map_err(drawing_error)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(drawing_error)?;

        Ok(())
    }

    /// Writes the frame as a PNG. The bitmap is released before returning, on success or failure.
    pub fn save_png(&self, path: &Path) -> RenderResult<()> {
        let root = BitMapBackend::new(path, self.canvas_size()).into_drawing_area();
        self.draw_on(&root)?;
        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Writes the frame as an SVG file.
    pub fn save_svg(&self, path: &Path) -> RenderResult<()> {
        let root = SVGBackend::new(path, self.canvas_size()).into_drawing_area();
        self.draw_on(&root)?;
        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Renders the frame into an SVG document, for display or inspection.
    pub fn to_svg(&self) -> RenderResult<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.canvas_size()).into_drawing_area();
            self.draw_on(&root)?;
            root.present().map_err(drawing_error)?;
        }
        Ok(svg)
    }
}
