//! End-to-end: scripted byte source → producer thread → ring → redraw.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serialscope::{
    AcquisitionState, ByteSource, DrawCommand, FrameRange, ReadStatus, ScopeConfig, SourceError,
    SurfaceSize, TelemetryScope,
};

enum Step {
    Chunk(&'static [u8]),
    Fail,
}

/// Replays chunks, then reports `WouldBlock` forever (or fails, if scripted).
struct ScriptedSource {
    steps: VecDeque<Step>,
}

impl ScriptedSource {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
        }
    }
}

impl ByteSource for ScriptedSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, SourceError> {
        match self.steps.pop_front() {
            Some(Step::Chunk(bytes)) => {
                buf[..bytes.len()].copy_from_slice(bytes);
                Ok(ReadStatus::Data(bytes.len()))
            }
            Some(Step::Fail) => Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "device unplugged",
            ))),
            None => Ok(ReadStatus::WouldBlock),
        }
    }
}

fn test_config(field_count: usize, capacity: usize) -> ScopeConfig {
    ScopeConfig {
        field_count,
        capacity,
        poll_interval_ms: 1,
        ..ScopeConfig::default()
    }
}

fn wait_for<F: Fn() -> bool>(what: &str, cond: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn three_lines_through_a_capacity_two_ring() {
    let mut scope = TelemetryScope::new(test_config(1, 2)).unwrap();
    scope.start(ScriptedSource::new(vec![Step::Chunk(b"0,1.0\n1,2.0\n2,3.0\n")]));

    wait_for("3 accepted samples", || scope.data_generation() >= 3);

    let snapshot = scope.snapshot();
    assert_eq!(snapshot.len(), 2, "oldest sample must have been evicted");
    assert_eq!(snapshot[0].timestamp, 1.0);
    assert_eq!(snapshot[0].values, vec![2.0]);
    assert_eq!(snapshot[1].timestamp, 2.0);
    assert_eq!(snapshot[1].values, vec![3.0]);

    let range = FrameRange::compute(&snapshot);
    assert_eq!(range.t_min, 1.0);
    assert_eq!(range.t_max, 2.0);
    assert_eq!(range.v_min, 2.0);
    assert_eq!(range.v_max, 3.0);

    scope.shutdown();
    assert_eq!(scope.acquisition_state(), AcquisitionState::Stopped);
    assert_eq!(scope.stats().accepted, 3);
    assert_eq!(scope.stats().rejected, 0);
}

#[test]
fn malformed_records_are_skipped_not_fatal() {
    let mut scope = TelemetryScope::new(test_config(2, 16)).unwrap();
    scope.start(ScriptedSource::new(vec![Step::Chunk(
        b"0,1.0,2.0\nbogus\n1,3.0\n2,x,4.0\n3,5.0,6.0\n",
    )]));

    wait_for("2 accepted samples", || scope.data_generation() >= 2);
    // Give the rejected lines time to be counted too.
    wait_for("3 rejected records", || scope.stats().rejected >= 3);

    let snapshot = scope.snapshot();
    let timestamps: Vec<f64> = snapshot.iter().map(|s| s.timestamp).collect();
    assert_eq!(
        timestamps,
        vec![0.0, 3.0],
        "only well-formed records reach the ring"
    );

    scope.shutdown();
    assert_eq!(scope.stats().accepted, 2);
    assert_eq!(scope.stats().rejected, 3);
}

#[test]
fn fatal_source_error_stops_acquisition_but_keeps_data() {
    let mut scope = TelemetryScope::new(test_config(1, 8)).unwrap();
    scope.start(ScriptedSource::new(vec![
        Step::Chunk(b"0,1.0\n1,2.0\n"),
        Step::Fail,
    ]));

    wait_for("producer failure", || {
        scope.acquisition_state() == AcquisitionState::Failed
    });

    let snapshot = scope.snapshot();
    assert_eq!(snapshot.len(), 2, "samples before the failure survive");
    assert_eq!(scope.stats().accepted, 2);
}

#[test]
fn shutdown_is_prompt() {
    let mut scope = TelemetryScope::new(test_config(1, 8)).unwrap();
    // A permanently quiet device: the producer just backs off.
    scope.start(ScriptedSource::new(vec![]));

    std::thread::sleep(Duration::from_millis(10));
    let started = Instant::now();
    scope.shutdown();
    assert!(
        started.elapsed() < Duration::from_millis(500),
        "stop must be observed within roughly one poll interval"
    );
    assert_eq!(scope.acquisition_state(), AcquisitionState::Stopped);
}

#[test]
fn redraw_reflects_surface_size_not_cached_dimensions() {
    let mut scope = TelemetryScope::new(test_config(1, 8)).unwrap();
    scope.start(ScriptedSource::new(vec![Step::Chunk(b"0,1.0\n5,3.0\n10,2.0\n")]));
    wait_for("3 accepted samples", || scope.data_generation() >= 3);
    scope.shutdown();

    let before = scope.snapshot();
    let a = scope.on_redraw(SurfaceSize {
        width: 200.0,
        height: 200.0,
    });
    let b = scope.on_redraw(SurfaceSize {
        width: 800.0,
        height: 600.0,
    });
    let after = scope.snapshot();

    assert_eq!(before, after, "redrawing never mutates the buffer");
    let pick = |commands: &Vec<DrawCommand>| -> Vec<[f32; 2]> {
        commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Polyline { points, .. } => Some(points.clone()),
                _ => None,
            })
            .expect("a trace polyline")
    };
    let pa = pick(&a);
    let pb = pick(&b);
    assert_eq!(pa.len(), pb.len());
    assert_ne!(pa, pb, "only pixel coordinates change with the surface");
}

#[test]
fn new_data_hook_tracks_generations() {
    let mut scope = TelemetryScope::new(test_config(1, 4)).unwrap();
    assert!(!scope.has_new_data_since(0), "nothing arrived yet");

    scope.start(ScriptedSource::new(vec![Step::Chunk(b"0,1.0\n")]));
    wait_for("1 accepted sample", || scope.data_generation() >= 1);

    assert!(scope.has_new_data_since(0));
    let seen = scope.data_generation();
    assert!(!scope.has_new_data_since(seen));
    scope.shutdown();
}

#[test]
fn invalid_configs_are_fatal_at_startup() {
    assert!(TelemetryScope::new(test_config(0, 8)).is_err());
    assert!(TelemetryScope::new(test_config(9, 8)).is_err());
    assert!(TelemetryScope::new(test_config(1, 0)).is_err());
    let mut bad_poll = test_config(1, 8);
    bad_poll.poll_interval_ms = 0;
    assert!(TelemetryScope::new(bad_poll).is_err());
    let mut bad_line = test_config(1, 8);
    bad_line.line_capacity = 64;
    assert!(TelemetryScope::new(bad_line).is_err());
    assert_eq!(
        TelemetryScope::new(test_config(0, 8)).err(),
        Some(serialscope::ConfigError::FieldCount(0))
    );
}
