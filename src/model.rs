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

//! The capabilities a simulation engine must offer to be rendered.
//!
//! Any engine works as long as it can advance one breath at a time, list its agents, and describe the seating grid.

use crate::error::{RenderError, RenderResult};
use crate::shape::Shape;

/// An individual with an infection status and a footprint
pub trait Agent {
    fn infected(&self) -> bool;
    fn shape(&self) -> &Shape;
}

/// A steppable simulation of agents seated on a grid
pub trait Simulation {
    type Agent: Agent;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Advances simulated time by one breath.
    fn step(&mut self) -> Result<(), Self::Error>;

    fn agents(&self) -> Box<dyn Iterator<Item = &Self::Agent> + '_>;

    fn geometry(&self) -> SeatGeometry;
}

/// Seating grid extent, used for axis ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeatGeometry {
    pub max_rows: u32,
    pub max_columns: u32,
    pub seat_dist: u32,
}

impl SeatGeometry {
    fn ticks(limit: u32, seat_dist: u32) -> RenderResult<Vec<f64>> {
        if seat_dist == 0 {
            return Err(RenderError::InvalidArgument(
                "seat_dist must be positive".to_string(),
            ));
        }
        Ok((0..limit)
            .step_by(seat_dist as usize)
            .map(f64::from)
            .collect())
    }

    /// Column ticks: `0, seat_dist, 2 * seat_dist, ...` strictly below `max_columns`
    pub fn column_ticks(&self) -> RenderResult<Vec<f64>> {
        Self::ticks(self.max_columns, self.seat_dist)
    }

    /// Row ticks: `0, seat_dist, 2 * seat_dist, ...` strictly below `max_rows`
    pub fn row_ticks(&self) -> RenderResult<Vec<f64>> {
        Self::ticks(self.max_rows, self.seat_dist)
    }
}

/// Agent footprints split by infection status
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    pub infected: Vec<Shape>,
    pub uninfected: Vec<Shape>,
}

impl Partition {
    /// Every agent lands in exactly one of the two sets.
    pub fn of<M: Simulation>(model: &M) -> Self {
        let mut partition = Self::default();
        for agent in model.agents() {
            let shape = agent.shape().clone();
            if agent.infected() {
                partition.infected.push(shape);
            } else {
                partition.uninfected.push(shape);
            }
        }
        partition
    }

    pub fn len(&self) -> usize {
        self.infected.len() + self.uninfected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
