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

//! Renders an infection-on-a-bus simulation into one image per breath, ready to be stitched into an animation.
//!
//! Any engine implementing [`Simulation`] can be rendered. [`render_step`] produces a single frame after a number of
//! breaths; [`Timelapse`] writes `<destination>0.png` through `<destination>N.png` for a whole trip.
//! With the `bus-model` feature, [`bus::BusModel`] provides a seeded seating model to render.

#[cfg(feature = "bus-model")]
pub mod bus;
pub mod error;
pub mod frame;
pub mod model;
pub mod shape;
pub mod timelapse;

pub use error::{RenderError, RenderResult};
pub use frame::{Frame, FrameStyle};
pub use model::{Agent, Partition, SeatGeometry, Simulation};
pub use shape::{Bounds, Shape};
pub use timelapse::{
    checked_steps, frame_path, minute_of_step, render_step, render_timelapse, FrameRecord, Timelapse,
    TimelapseReport,
};
