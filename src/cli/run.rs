// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::cli::args::RunArgs;
use crate::cli::logging::set_verbose;

/// Run the pose detection demo.
#[cfg(all(feature = "video", feature = "visualize", feature = "annotate"))]
#[allow(clippy::too_many_lines)]
pub fn run(args: &RunArgs) {
    use std::path::Path;
    use std::process;
    use std::str::FromStr;

    use image::RgbImage;

    use crate::device::Device;
    use crate::engine::{OnnxEngine, PoseExtractor};
    use crate::mascot::{CANVAS_SIZE, Mascot};
    use crate::pipeline::FramePipeline;
    use crate::results::{MascotPose, PoseResult};
    use crate::source::{CaptureSource, FrameSource, VideoCapture};
    use crate::visualizer::Viewer;
    use crate::{VERSION, annotate, download, error, info, verbose, warn};

    set_verbose(args.verbose);

    let device = match args.device.as_deref().map(Device::from_str).transpose() {
        Ok(d) => d.unwrap_or_default(),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    // Startup is all-or-nothing: model, camera, sprites and windows must be
    // in place before the first frame is read.
    if args.model == download::DEFAULT_MODEL && !Path::new(&args.model).exists() {
        warn!("Model '{}' not found locally, downloading it.", args.model);
    }
    let model_path = match download::ensure_model(&args.model) {
        Ok(p) => p,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let config = crate::ExtractorConfig::new().with_confidence(args.conf);
    let engine = match OnnxEngine::load(&model_path, &config, &device) {
        Ok(e) => e,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    let extractor = PoseExtractor::new(engine, config);

    let source = CaptureSource::from(args.source.as_str());
    let mut capture = match VideoCapture::open(&source) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let mut mascot = if args.no_mascot {
        None
    } else {
        match Mascot::load(Path::new(&args.assets)) {
            Ok(m) => Some(m),
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        }
    };

    let mut window = match Viewer::new("Pose Detection", 960, 540) {
        Ok(w) => w,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    let mut mascot_window = if mascot.is_some() {
        match Viewer::new("Mascot", CANVAS_SIZE as usize, CANVAS_SIZE as usize) {
            Ok(w) => Some(w),
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        }
    } else {
        None
    };

    info!("pose-mirror {VERSION} 🚀 ONNX Runtime on {device}");
    verbose!("Reading from {}", source.device_path().display());

    let pipeline = FramePipeline::spawn(extractor);

    // Prime the pipeline with the first readable frame; afterwards a new
    // frame is submitted only when the previous result has been drained, so
    // exactly one frame is in flight.
    let first = loop {
        match capture.next_frame() {
            Ok(Some(f)) if f.width() > 0 && f.height() > 0 => break f,
            Ok(Some(_)) => {}
            Ok(None) => {
                error!("Capture closed before the first frame");
                pipeline.shutdown();
                process::exit(1);
            }
            Err(e) => {
                error!("{e}");
                pipeline.shutdown();
                process::exit(1);
            }
        }
    };
    if let Err(e) = pipeline.submit_frame(&first) {
        error!("{e}");
        process::exit(1);
    }

    let mut pose_state: Option<PoseResult> = None;
    let mut mascot_frame = mascot.as_ref().map(Mascot::render);

    loop {
        let mut frame: RgbImage = match capture.next_frame() {
            Ok(Some(f)) => f,
            Ok(None) => {
                verbose!("Capture closed");
                break;
            }
            Err(e) => {
                error!("{e}");
                break;
            }
        };
        // A single empty read is transient; keep the loop alive.
        if frame.width() == 0 || frame.height() == 0 {
            continue;
        }

        match pipeline.try_take_result() {
            Some(Ok(pose)) => {
                // The worker is idle again: re-arm it with the frame we just
                // read, then keep the new pose as the display state.
                if let Err(e) = pipeline.submit_frame(&frame) {
                    error!("{e}");
                    break;
                }
                if let Some(m) = mascot.as_mut() {
                    m.apply(&MascotPose::from_pose(&pose));
                    mascot_frame = Some(m.render());
                }
                pose_state = Some(pose);
            }
            Some(Err(e)) => {
                error!("Pose extraction failed: {e}");
                break;
            }
            None => {}
        }

        if let Some(pose) = &pose_state {
            annotate::draw_pose(&mut frame, pose);
        }

        match window.update_rgb(&frame) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("{e}");
                break;
            }
        }

        if let (Some(canvas), Some(w)) = (&mascot_frame, mascot_window.as_mut()) {
            match w.update_rgba(canvas) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    error!("{e}");
                    break;
                }
            }
        }
    }

    pipeline.shutdown();
}

/// Run the pose detection demo (feature-gated stub).
#[cfg(not(all(feature = "video", feature = "visualize", feature = "annotate")))]
pub fn run(args: &RunArgs) {
    use crate::error;

    set_verbose(args.verbose);
    error!("the run command requires the 'video', 'visualize' and 'annotate' features");
    std::process::exit(1);
}
