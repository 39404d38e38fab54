//! Pipeline execution against stub and real operations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mm_convert::{
    run_pipeline, ConversionOp, ConversionStep, OpError, OperationRegistry, PipelineError,
    ToolPaths,
};

fn step(from: &str, to: &str, operation: &str) -> ConversionStep {
    ConversionStep {
        from: from.to_string(),
        to: to.to_string(),
        operation: operation.to_string(),
    }
}

/// Appends its own marker, so chained invocations are visible in the output.
struct StampOp;

impl ConversionOp for StampOp {
    fn name(&self) -> &'static str {
        "stamp"
    }

    fn run(&self, input: &Path, output: &Path) -> Result<(), OpError> {
        let mut text = fs::read_to_string(input)?;
        text.push_str("+stamp");
        fs::write(output, text)?;
        Ok(())
    }
}

/// Fails after recording where the pipeline staged its input.
struct TripwireOp {
    seen: Arc<Mutex<Option<PathBuf>>>,
}

impl ConversionOp for TripwireOp {
    fn name(&self) -> &'static str {
        "tripwire"
    }

    fn run(&self, input: &Path, _output: &Path) -> Result<(), OpError> {
        *self.seen.lock().unwrap() = Some(input.to_path_buf());
        Err(OpError::Io(std::io::Error::other("deliberate failure")))
    }
}

#[test]
fn chained_steps_deliver_only_the_final_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("note.txt");
    let output = dir.path().join("note.b");
    fs::write(&input, "base").unwrap();

    let mut registry = OperationRegistry::new();
    registry.register(StampOp);
    let steps = [step("txt", "a", "stamp"), step("a", "b", "stamp")];

    run_pipeline(&registry, &steps, &input, &output).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "base+stamp+stamp");
    assert_eq!(fs::read_to_string(&input).unwrap(), "base");
    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 2, "intermediates must not land next to the input");
}

#[test]
fn failing_step_leaves_no_output_and_no_scratch() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("note.txt");
    let output = dir.path().join("note.b");
    fs::write(&input, "base").unwrap();

    let seen = Arc::new(Mutex::new(None));
    let mut registry = OperationRegistry::new();
    registry.register(StampOp);
    registry.register(TripwireOp { seen: Arc::clone(&seen) });
    let steps = [step("txt", "a", "stamp"), step("a", "b", "tripwire")];

    let result = run_pipeline(&registry, &steps, &input, &output);

    assert!(matches!(result, Err(PipelineError::StepFailed { index: 1, .. })));
    assert!(!output.exists());

    let staged = seen.lock().unwrap().clone().unwrap();
    let workdir = staged.parent().unwrap().to_path_buf();
    assert!(!workdir.exists(), "scratch directory must be cleaned up");
}

#[test]
fn failing_step_preserves_an_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("note.txt");
    let output = dir.path().join("note.b");
    fs::write(&input, "base").unwrap();
    fs::write(&output, "previous result").unwrap();

    let seen = Arc::new(Mutex::new(None));
    let mut registry = OperationRegistry::new();
    registry.register(StampOp);
    registry.register(TripwireOp { seen: Arc::clone(&seen) });
    let steps = [step("txt", "a", "stamp"), step("a", "b", "tripwire")];

    let result = run_pipeline(&registry, &steps, &input, &output);

    assert!(matches!(result, Err(PipelineError::StepFailed { index: 1, .. })));
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous result");
    assert_eq!(fs::read_to_string(&input).unwrap(), "base");

    let staged = seen.lock().unwrap().clone().unwrap();
    let workdir = staged.parent().unwrap().to_path_buf();
    assert!(!workdir.exists(), "scratch directory must be cleaned up");
}

#[test]
fn unknown_operation_fails_before_reading_anything() {
    let registry = OperationRegistry::new();
    let steps = [step("txt", "b", "nope")];

    let result = run_pipeline(
        &registry,
        &steps,
        Path::new("/nonexistent/in.txt"),
        Path::new("/nonexistent/out.b"),
    );

    assert!(matches!(
        result,
        Err(PipelineError::UnknownOperation { index: 0, .. })
    ));
}

#[test]
fn zero_steps_copies_the_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("note.txt");
    let output = dir.path().join("copy.txt");
    fs::write(&input, "base").unwrap();

    run_pipeline(&OperationRegistry::new(), &[], &input, &output).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "base");
    assert!(input.is_file());
}

#[test]
fn raster_step_runs_through_the_default_registry() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("board.png");
    let output = dir.path().join("board.bmp");
    image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]))
        .save(&input)
        .unwrap();

    let registry = OperationRegistry::with_defaults(&ToolPaths::default(), 150);
    run_pipeline(&registry, &[step("png", "bmp", "image_convert")], &input, &output).unwrap();

    assert!(image::open(&output).is_ok());
}
