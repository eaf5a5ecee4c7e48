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

//! A seeded seating model: passengers breathe, infected passengers shed quanta, nearby susceptible passengers inhale them.

use std::convert::Infallible;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, NormalError};
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::model::{Agent, SeatGeometry, Simulation};
use crate::shape::Shape;

// Housekeeping
slotmap::new_key_type! {
    pub struct PassengerKey;
}

/// Errors in a bus configuration
#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus needs at least one row, one column and a positive seat distance")]
    EmptyGrid,

    #[error("a {rows} x {columns} grid spaced {seat_dist} does not fit the seat counter")]
    GridTooLarge {
        rows: u32,
        columns: u32,
        seat_dist: u32,
    },

    #[error("occupancy must lie in [0, 1], got {0}")]
    Occupancy(f64),

    #[error("{name} must be a non-negative finite number, got {value}")]
    Rate { name: &'static str, value: f64 },

    #[error("cannot infect {requested} passengers out of {seated}")]
    TooManyInfected { requested: usize, seated: usize },

    #[error("emission distribution: {0}")]
    Emission(#[from] NormalError),
}

/// Model parameters
#[derive(Clone, Debug, PartialEq)]
pub struct BusConfig {
    pub rows: u32,
    pub columns: u32,
    pub seat_dist: u32,
    /// Probability that a seat is taken
    pub occupancy: f64,
    pub initial_infected: usize,
    /// Quanta shed per breath by an infected passenger
    pub emission_mean: f64,
    pub emission_sd: f64,
    /// Distance beyond which shed quanta are not inhaled
    pub reach: f64,
    /// Infection hazard per inhaled quantum
    pub risk: f64,
    pub seed: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            rows: 12,
            columns: 4,
            seat_dist: 1,
            occupancy: 0.8,
            initial_infected: 2,
            emission_mean: 1.0,
            emission_sd: 0.3,
            reach: 2.5,
            risk: 0.05,
            seed: 42,
        }
    }
}

impl BusConfig {
    fn validate(&self) -> Result<(), BusError> {
        if self.rows == 0 || self.columns == 0 || self.seat_dist == 0 {
            return Err(BusError::EmptyGrid);
        }
        let fits = self.rows.checked_mul(self.columns).is_some()
            && self.rows.checked_mul(self.seat_dist).is_some()
            && self.columns.checked_mul(self.seat_dist).is_some();
        if !fits {
            return Err(BusError::GridTooLarge {
                rows: self.rows,
                columns: self.columns,
                seat_dist: self.seat_dist,
            });
        }
        if !(0.0..=1.0).contains(&self.occupancy) {
            return Err(BusError::Occupancy(self.occupancy));
        }
        for (name, value) in [
            ("emission_mean", self.emission_mean),
            ("emission_sd", self.emission_sd),
            ("reach", self.reach),
            ("risk", self.risk),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BusError::Rate { name, value });
            }
        }
        Ok(())
    }
}

/// A seated passenger
#[derive(Clone, Debug)]
pub struct Passenger {
    pub infected: bool,
    /// Quanta inhaled so far
    pub dose: f64,
    center: (f64, f64),
    shape: Shape,
}

impl Agent for Passenger {
    fn infected(&self) -> bool {
        self.infected
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }
}

pub struct BusModel {
    config: BusConfig,
    passengers: SlotMap<PassengerKey, Passenger>,
    emission: Normal<f64>,
    rng: rand_pcg::Pcg64,
    breaths: u64,
}

impl BusModel {
    pub fn new(config: BusConfig) -> Result<Self, BusError> {
        config.validate()?;
        let emission = Normal::new(config.emission_mean, config.emission_sd)?;
        let mut rng = rand_pcg::Pcg64::seed_from_u64(config.seed);

        let seats = (config.rows * config.columns) as usize;
        let mut passengers = SlotMap::with_capacity_and_key(seats);
        let sd = f64::from(config.seat_dist);
        for row in 0..config.rows {
            for column in 0..config.columns {
                if !rng.gen_bool(config.occupancy) {
                    continue;
                }
                let center = ((f64::from(column) + 0.5) * sd, (f64::from(row) + 0.5) * sd);
                passengers.insert(Passenger {
                    infected: false,
                    dose: 0.0,
                    center,
                    shape: Shape::square(center, 0.8 * sd),
                });
            }
        }

        if config.initial_infected > passengers.len() {
            return Err(BusError::TooManyInfected {
                requested: config.initial_infected,
                seated: passengers.len(),
            });
        }
        let keys: Vec<PassengerKey> = passengers.keys().collect();
        for key in keys.choose_multiple(&mut rng, config.initial_infected) {
            passengers[*key].infected = true;
        }
        debug!(
            seated = passengers.len(),
            infected = config.initial_infected,
            "bus boarded"
        );

        Ok(Self {
            config,
            passengers,
            emission,
            rng,
            breaths: 0,
        })
    }

    pub fn passengers(&self) -> impl Iterator<Item = (PassengerKey, &Passenger)> {
        self.passengers.iter()
    }

    pub fn breaths(&self) -> u64 {
        self.breaths
    }

    pub fn infected_count(&self) -> usize {
        self.passengers.values().filter(|p| p.infected).count()
    }
}

impl Simulation for BusModel {
    type Agent = Passenger;
    type Error = Infallible;

    fn step(&mut self) -> Result<(), Infallible> {
        // Quanta shed this breath, by source position
        let mut shed = Vec::new();
        for p in self.passengers.values().filter(|p| p.infected) {
            shed.push((p.center, self.emission.sample(&mut self.rng).max(0.0)));
        }

        let reach = self.config.reach;
        let risk = self.config.risk;
        for p in self.passengers.values_mut().filter(|p| !p.infected) {
            let (x, y) = p.center;
            p.dose += shed
                .iter()
                .map(|&((sx, sy), quanta)| (((sx - x).powi(2) + (sy - y).powi(2)).sqrt(), quanta))
                .filter(|&(d, _)| d <= reach)
                .map(|(d, quanta)| quanta / (1.0 + d))
                .sum::<f64>();
            let probability = 1.0 - (-risk * p.dose).exp();
            if self.rng.gen_bool(probability.clamp(0.0, 1.0)) {
                p.infected = true;
            }
        }

        self.breaths += 1;
        Ok(())
    }

    fn agents(&self) -> Box<dyn Iterator<Item = &Passenger> + '_> {
        Box::new(self.passengers.values())
    }

    fn geometry(&self) -> SeatGeometry {
        SeatGeometry {
            max_rows: self.config.rows * self.config.seat_dist,
            max_columns: self.config.columns * self.config.seat_dist,
            seat_dist: self.config.seat_dist,
        }
    }
}
