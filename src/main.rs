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

use std::path::PathBuf;

use bus_timelapse::bus::{BusConfig, BusModel};
use bus_timelapse::{checked_steps, render_step, Timelapse};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Renders infections spreading on a bus, one frame per breath
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    bus: BusArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Step the model and write a single frame
    Snapshot {
        /// Breaths to simulate before the frame is taken
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        steps: i64,

        /// Output image; `.svg` writes SVG, anything else PNG
        #[arg(short, long, default_value = "snapshot.png")]
        output: PathBuf,
    },
    /// Write one frame per breath for a whole trip
    Timelapse {
        #[arg(long, default_value_t = 12)]
        breaths_per_minute: u32,

        /// Trip duration in minutes
        #[arg(long, default_value_t = 15)]
        trip_duration: u32,

        /// Folder removed with all its contents before rendering. Pass a disposable folder.
        #[arg(long, default_value = "simulation_images")]
        main_folder: PathBuf,

        /// Frame N is written to <DESTINATION>N.png
        #[arg(long, default_value = "simulation_images/frame_")]
        destination: PathBuf,
    },
}

// Model parameters
#[derive(Args, Debug)]
struct BusArgs {
    #[arg(long, default_value_t = 12)]
    rows: u32,

    #[arg(long, default_value_t = 4)]
    columns: u32,

    #[arg(long, default_value_t = 1)]
    seat_dist: u32,

    /// Probability that a seat is taken
    #[arg(long, default_value_t = 0.8)]
    occupancy: f64,

    #[arg(long, default_value_t = 2)]
    initial_infected: usize,

    /// Infection hazard per inhaled quantum
    #[arg(long, default_value_t = 0.05)]
    risk: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

impl From<BusArgs> for BusConfig {
    fn from(args: BusArgs) -> Self {
        BusConfig {
            rows: args.rows,
            columns: args.columns,
            seat_dist: args.seat_dist,
            occupancy: args.occupancy,
            initial_infected: args.initial_infected,
            risk: args.risk,
            seed: args.seed,
            ..BusConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut model = BusModel::new(cli.bus.into())?;

    match cli.command {
        Command::Snapshot { steps, output } => {
            let frame = render_step(&mut model, checked_steps(steps)?)?;
            if output.extension().map_or(false, |e| e == "svg") {
                frame.save_svg(&output)?;
            } else {
                frame.save_png(&output)?;
            }
            info!(output = %output.display(), infected = model.infected_count(), "snapshot written");
        }
        Command::Timelapse {
            breaths_per_minute,
            trip_duration,
            main_folder,
            destination,
        } => {
            let report = Timelapse::new(breaths_per_minute, trip_duration, main_folder, destination)
                .render(&mut model)?;
            info!(
                frames = report.frames.len(),
                infected = model.infected_count(),
                "trip rendered"
            );
        }
    }
    Ok(())
}
