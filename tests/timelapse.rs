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

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use bus_timelapse::{
    render_step, render_timelapse, Agent, Frame, Partition, RenderError, SeatGeometry, Shape,
    Simulation, Timelapse,
};
use tempfile::TempDir;

struct Rider {
    infected: bool,
    shape: Shape,
}

impl Agent for Rider {
    fn infected(&self) -> bool {
        self.infected
    }
    fn shape(&self) -> &Shape {
        &self.shape
    }
}

#[derive(Debug)]
struct Breakdown;

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine broke down")
    }
}

impl std::error::Error for Breakdown {}

/// Counts steps and infects the next susceptible rider on each one.
struct CountingModel {
    riders: Vec<Rider>,
    steps: u64,
    fail_at: Option<u64>,
}

impl CountingModel {
    fn new(statuses: &[bool]) -> Self {
        let riders = statuses
            .iter()
            .enumerate()
            .map(|(i, &infected)| Rider {
                infected,
                shape: Shape::square(((i % 4) as f64 + 0.5, (i / 4) as f64 + 0.5), 0.8),
            })
            .collect();
        Self {
            riders,
            steps: 0,
            fail_at: None,
        }
    }
}

impl Simulation for CountingModel {
    type Agent = Rider;
    type Error = Breakdown;

    fn step(&mut self) -> Result<(), Breakdown> {
        if self.fail_at == Some(self.steps + 1) {
            return Err(Breakdown);
        }
        if let Some(r) = self.riders.iter_mut().find(|r| !r.infected) {
            r.infected = true;
        }
        self.steps += 1;
        Ok(())
    }

    fn agents(&self) -> Box<dyn Iterator<Item = &Rider> + '_> {
        Box::new(self.riders.iter())
    }

    fn geometry(&self) -> SeatGeometry {
        SeatGeometry {
            max_rows: 3,
            max_columns: 4,
            seat_dist: 1,
        }
    }
}

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn listing(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn expected(names: impl IntoIterator<Item = u64>) -> BTreeSet<String> {
    names.into_iter().map(|n| format!("frame_{}.png", n)).collect()
}

#[test]
fn three_riders_two_breaths() {
    let dir = tmp();
    let folder = dir.path().join("simulation_images");
    let mut model = CountingModel::new(&[true, true, false]);

    let report = render_timelapse(&mut model, 2, 1, &folder, folder.join("frame_")).unwrap();

    assert_eq!(model.steps, 2);
    assert_eq!(listing(&folder), expected(0..=2));
    let titles: Vec<&str> = report.frames.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Infections on the Bus: Step 0",
            "Infections on the Bus: Minute 1, Step 1",
            "Infections on the Bus: Minute 1, Step 2",
        ]
    );
    assert_eq!(report.frames[0].minute, None);
    assert_eq!(report.frames[2].minute, Some(1));
}

#[test]
fn frame_count_is_rate_times_duration_plus_one() {
    let dir = tmp();
    let folder = dir.path().join("frames");
    let mut model = CountingModel::new(&[false; 6]);

    let report = render_timelapse(&mut model, 4, 3, &folder, folder.join("frame_")).unwrap();

    assert_eq!(report.frames.len(), 13);
    assert_eq!(listing(&folder), expected(0..=12));
    let minutes: Vec<Option<u64>> = report.frames.iter().map(|f| f.minute).collect();
    assert_eq!(minutes[1..5], [Some(1); 4]);
    assert_eq!(minutes[5..9], [Some(2); 4]);
    assert_eq!(minutes[12], Some(3));
    for frame in &report.frames {
        assert!(frame.path.is_file());
    }
}

#[test]
fn second_run_replaces_first() {
    let dir = tmp();
    let folder = dir.path().join("simulation_images");

    render_timelapse(&mut CountingModel::new(&[true]), 3, 2, &folder, folder.join("frame_")).unwrap();
    fs::write(folder.join("notes.txt"), "left behind").unwrap();
    fs::create_dir(folder.join("nested")).unwrap();
    assert_eq!(listing(&folder).len(), 9);

    render_timelapse(&mut CountingModel::new(&[true]), 1, 1, &folder, folder.join("frame_")).unwrap();

    assert_eq!(listing(&folder), expected(0..=1));
}

#[test]
fn missing_destination_parent_is_created() {
    let dir = tmp();
    let destination = dir.path().join("out").join("deep").join("trip_");
    let mut model = CountingModel::new(&[false, true]);

    Timelapse::new(1, 2, dir.path().join("scratch"), &destination)
        .render(&mut model)
        .unwrap();

    let names = listing(&dir.path().join("out").join("deep"));
    let want: BTreeSet<String> = (0..=2).map(|n| format!("trip_{}.png", n)).collect();
    assert_eq!(names, want);
}

#[test]
fn frame_zero_is_taken_before_stepping() {
    let dir = tmp();
    let folder = dir.path().join("frames");
    let mut model = CountingModel::new(&[false, false]);

    let report = render_timelapse(&mut model, 1, 0, &folder, folder.join("frame_")).unwrap();

    assert_eq!(model.steps, 0);
    assert_eq!(report.frames.len(), 1);
    assert_eq!(listing(&folder), expected(0..=0));
}

#[test]
fn empty_bus_still_renders() {
    let dir = tmp();
    let folder = dir.path().join("frames");
    let mut model = CountingModel::new(&[]);

    render_timelapse(&mut model, 2, 2, &folder, folder.join("frame_")).unwrap();

    assert_eq!(listing(&folder), expected(0..=4));
}

#[test]
fn step_failure_aborts_the_run() {
    let dir = tmp();
    let folder = dir.path().join("frames");
    let mut model = CountingModel::new(&[true, false]);
    model.fail_at = Some(3);

    let err = render_timelapse(&mut model, 2, 2, &folder, folder.join("frame_")).unwrap_err();

    assert!(matches!(err, RenderError::Step(_)));
    assert_eq!(listing(&folder), expected(0..=2));
}

#[test]
fn folder_that_is_a_file_is_refused() {
    let dir = tmp();
    let folder = dir.path().join("frames");
    fs::write(&folder, "not a folder").unwrap();

    let err = render_timelapse(&mut CountingModel::new(&[true]), 1, 1, &folder, dir.path().join("f_"))
        .unwrap_err();

    assert!(matches!(err, RenderError::InvalidArgument(_)));
    assert!(folder.is_file());
}

#[test]
fn zero_rate_writes_nothing() {
    let dir = tmp();
    let folder = dir.path().join("frames");
    fs::create_dir(&folder).unwrap();

    let err = render_timelapse(&mut CountingModel::new(&[true]), 0, 5, &folder, folder.join("frame_"))
        .unwrap_err();

    assert!(matches!(err, RenderError::InvalidArgument(_)));
    assert!(folder.is_dir());
}

#[test]
fn single_frame_partitions_after_stepping() {
    let mut model = CountingModel::new(&[true, false, false, false]);

    let frame = render_step(&mut model, 2).unwrap();

    assert_eq!(model.steps, 2);
    assert_eq!(frame.title(), "Infections on the Bus: Step 2");
    assert_eq!(frame.partition().infected.len(), 3);
    assert_eq!(frame.partition().uninfected.len(), 1);
}

#[test]
fn single_frame_can_be_saved() {
    let dir = tmp();
    let path = dir.path().join("snapshot.png");
    let mut model = CountingModel::new(&[true, false]);

    render_step(&mut model, 1).unwrap().save_png(&path).unwrap();

    assert!(fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn png_frames_carry_their_titles() {
    let dir = tmp();
    let partition = Partition {
        infected: vec![Shape::square((0.5, 0.5), 0.8)],
        uninfected: vec![Shape::square((1.5, 0.5), 0.8)],
    };
    let geometry = SeatGeometry {
        max_rows: 2,
        max_columns: 3,
        seat_dist: 1,
    };
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");

    Frame::new("Infections on the Bus: Minute 1, Step 1".to_string(), partition.clone(), geometry)
        .save_png(&first)
        .unwrap();
    Frame::new("Infections on the Bus: Minute 9, Step 36".to_string(), partition, geometry)
        .save_png(&second)
        .unwrap();

    let first = fs::read(&first).unwrap();
    let second = fs::read(&second).unwrap();
    assert!(first.starts_with(b"\x89PNG"));
    assert_ne!(first, second);
}

#[cfg(feature = "bus-model")]
#[test]
fn bus_model_trip() {
    use bus_timelapse::bus::{BusConfig, BusModel};

    let dir = tmp();
    let folder = dir.path().join("simulation_images");
    let mut model = BusModel::new(BusConfig {
        rows: 6,
        columns: 4,
        ..BusConfig::default()
    })
    .unwrap();

    let report = render_timelapse(&mut model, 3, 2, &folder, folder.join("frame_")).unwrap();

    assert_eq!(report.frames.len(), 7);
    assert_eq!(model.breaths(), 6);
    assert_eq!(listing(&folder), expected(0..=6));
}
