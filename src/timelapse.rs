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

//! Stepping a model and turning each breath into a frame.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, trace};

use crate::error::{RenderError, RenderResult};
use crate::frame::{Frame, FrameStyle};
use crate::model::Simulation;

const TITLE: &str = "Infections on the Bus";

/// Converts a caller-supplied signed step count; negative counts are a contract violation.
pub fn checked_steps(steps: i64) -> RenderResult<u64> {
    u64::try_from(steps).map_err(|_| {
        RenderError::InvalidArgument(format!("step count must be non-negative, got {}", steps))
    })
}

/// Elapsed minute for the 1-based breath `step`: `ceil(step / breaths_per_minute)`.
pub fn minute_of_step(step: u64, breaths_per_minute: u32) -> u64 {
    let rate = u64::from(breaths_per_minute);
    (step + rate - 1) / rate
}

/// `<destination><step>.png`, appended to the prefix rather than joined as a path component.
pub fn frame_path(destination: &Path, step: u64) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(format!("{}.png", step));
    PathBuf::from(name)
}

fn model_step<M: Simulation>(model: &mut M) -> RenderResult<()> {
    model
        .step()
        .map_err(|e| RenderError::Step(Box::new(e)))
}

/// Advances `model` by `steps` breaths and captures the result. The frame is not written anywhere.
pub fn render_step<M: Simulation>(model: &mut M, steps: u64) -> RenderResult<Frame> {
    // Fail before stepping on a degenerate grid.
    model.geometry().column_ticks()?;
    for i in 0..steps {
        trace!(step = i + 1, "stepping model");
        model_step(model)?;
    }
    Ok(Frame::capture(model, format!("{}: Step {}", TITLE, steps)))
}

/// Parameters of a timelapse over one trip
#[derive(Clone, Debug)]
pub struct Timelapse {
    pub breaths_per_minute: u32,
    /// Trip duration in minutes
    pub trip_duration: u32,
    /// Removed with all its contents before anything is written.
    pub main_folder: PathBuf,
    /// Frame `N` is written to `<destination>N.png`.
    pub destination: PathBuf,
    pub style: FrameStyle,
}

/// One frame written to disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRecord {
    pub step: u64,
    /// `None` for the initial frame
    pub minute: Option<u64>,
    pub title: String,
    pub path: PathBuf,
}

/// Every frame a timelapse wrote, in order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimelapseReport {
    pub frames: Vec<FrameRecord>,
}

impl Timelapse {
    pub fn new(
        breaths_per_minute: u32,
        trip_duration: u32,
        main_folder: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            breaths_per_minute,
            trip_duration,
            main_folder: main_folder.into(),
            destination: destination.into(),
            style: FrameStyle::default(),
        }
    }

    /// Number of breaths in the trip; the timelapse writes one more frame than this.
    pub fn total_steps(&self) -> RenderResult<u64> {
        if self.breaths_per_minute == 0 {
            return Err(RenderError::InvalidArgument(
                "breaths_per_minute must be positive".to_string(),
            ));
        }
        u64::from(self.breaths_per_minute)
            .checked_mul(u64::from(self.trip_duration))
            .ok_or_else(|| RenderError::InvalidArgument("frame count overflows".to_string()))
    }

    fn save(&self, frame: Frame, step: u64, minute: Option<u64>) -> RenderResult<FrameRecord> {
        let path = frame_path(&self.destination, step);
        frame.save_png(&path)?;
        debug!(step, path = %path.display(), "frame written");
        Ok(FrameRecord {
            step,
            minute,
            title: frame.title().to_string(),
            path,
        })
    }

    /// Renders the whole trip: frame 0 before any stepping, then one frame per breath.
    ///
    /// This deletes `main_folder` and everything in it, unconditionally, before the first frame is written.
    /// Pass a dedicated, disposable folder.
    #[instrument(skip(self, model), fields(main_folder = %self.main_folder.display()))]
    pub fn render<M: Simulation>(&self, model: &mut M) -> RenderResult<TimelapseReport> {
        let total = self.total_steps()?;
        model.geometry().column_ticks()?;
        info!(total, "rendering timelapse");

        let first = Frame::capture(model, format!("{}: Step 0", TITLE)).with_style(self.style.clone());

        clear_folder(&self.main_folder)?;
        if let Some(parent) = self.destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut report = TimelapseReport::default();
        report.frames.push(self.save(first, 0, None)?);

        for step in 1..=total {
            model_step(model)?;
            let minute = minute_of_step(step, self.breaths_per_minute);
            let frame = Frame::capture(model, format!("{}: Minute {}, Step {}", TITLE, minute, step))
                .with_style(self.style.clone());
            report.frames.push(self.save(frame, step, Some(minute))?);
        }

        info!(frames = report.frames.len(), "timelapse complete");
        Ok(report)
    }
}

/// Removes `folder` recursively if it exists. A file at that path is refused.
fn clear_folder(folder: &Path) -> RenderResult<()> {
    match fs::symlink_metadata(folder) {
        Ok(meta) if meta.is_dir() => {
            info!(folder = %folder.display(), "removing working folder");
            fs::remove_dir_all(folder)?;
            Ok(())
        }
        Ok(_) => Err(RenderError::InvalidArgument(format!(
            "{} is not a directory",
            folder.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Shorthand for [`Timelapse::render`] with the default frame style.
pub fn render_timelapse<M: Simulation>(
    model: &mut M,
    breaths_per_minute: u32,
    trip_duration: u32,
    main_folder: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> RenderResult<TimelapseReport> {
    Timelapse::new(
        breaths_per_minute,
        trip_duration,
        main_folder.as_ref(),
        destination.as_ref(),
    )
    .render(model)
}
