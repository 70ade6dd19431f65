// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Frame pipeline: the handoff between the acquisition loop and the
//! extraction worker.
//!
//! Two conduits connect the halves: a bounded capacity-1 channel carrying
//! frames forward (backpressure: at most one frame is ever in flight), and
//! an unbounded channel carrying outcomes back. The display loop polls the
//! return side without blocking, so its frame rate is never gated by
//! inference latency; it re-arms the pipeline by submitting the next frame
//! only once the previous result has been drained.

use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError};
use std::thread::{self, JoinHandle};

use image::RgbImage;

use crate::engine::{InferenceEngine, PoseExtractor};
use crate::error::{PoseError, Result};
use crate::results::PoseResult;

/// Coordinator half of the pipeline: submits frames, polls outcomes.
pub struct FramePipeline {
    frame_tx: SyncSender<RgbImage>,
    result_rx: Receiver<Result<PoseResult>>,
    worker: Option<JoinHandle<()>>,
}

/// Worker half of the pipeline: takes frames, publishes outcomes.
pub struct PipelineWorker {
    frame_rx: Receiver<RgbImage>,
    result_tx: Sender<Result<PoseResult>>,
}

impl FramePipeline {
    /// Create an unconnected pipeline: the coordinator half and the worker
    /// half, not yet running on any thread.
    ///
    /// Useful for driving the worker side directly in tests; production
    /// code uses [`FramePipeline::spawn`].
    #[must_use]
    pub fn pair() -> (Self, PipelineWorker) {
        let (frame_tx, frame_rx) = mpsc::sync_channel(1);
        let (result_tx, result_rx) = mpsc::channel();
        (
            Self {
                frame_tx,
                result_rx,
                worker: None,
            },
            PipelineWorker {
                frame_rx,
                result_tx,
            },
        )
    }

    /// Create a pipeline with the worker half running an extractor on its
    /// own thread.
    ///
    /// The thread exits when the coordinator half is dropped (observed at
    /// the frame-receive suspension point) or after it publishes an
    /// extraction error.
    #[must_use]
    pub fn spawn<E>(extractor: PoseExtractor<E>) -> Self
    where
        E: InferenceEngine + Send + 'static,
    {
        let (mut pipeline, worker) = Self::pair();
        pipeline.worker = Some(thread::spawn(move || worker.run(extractor)));
        pipeline
    }

    /// Hand a frame to the extraction worker.
    ///
    /// The frame is copied at the boundary: the caller keeps reusing its
    /// working buffer, so the worker must never alias it. Blocks while a
    /// previously submitted frame is still pending and unconsumed.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::PipelineClosed`] if the worker half is gone.
    pub fn submit_frame(&self, frame: &RgbImage) -> Result<()> {
        self.frame_tx
            .send(frame.clone())
            .map_err(|_| PoseError::PipelineClosed)
    }

    /// Poll for the oldest unconsumed extraction outcome.
    ///
    /// Never blocks; returns `None` while nothing is queued. A worker-side
    /// data-format error travels through here as `Some(Err(_))` so the
    /// coordinator can shut down deliberately instead of idling forever.
    #[must_use]
    pub fn try_take_result(&self) -> Option<Result<PoseResult>> {
        match self.result_rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Shut the pipeline down: signal cancellation by closing the frame
    /// conduit, then join the worker thread if one was spawned.
    pub fn shutdown(self) {
        let Self {
            frame_tx,
            result_rx,
            worker,
        } = self;
        drop(frame_tx);
        drop(result_rx);
        if let Some(handle) = worker {
            let _ = handle.join();
        }
    }
}

impl PipelineWorker {
    /// Blocking receive of the next frame.
    ///
    /// Returns `None` when the coordinator half has been dropped, which is
    /// the cancellation signal: the worker loop exits cleanly instead of
    /// hanging until process exit.
    #[must_use]
    pub fn take_frame(&self) -> Option<RgbImage> {
        self.frame_rx.recv().ok()
    }

    /// Publish an extraction outcome back to the coordinator.
    ///
    /// Never blocks. Returns `false` when the coordinator half is gone.
    pub fn publish_result(&self, outcome: Result<PoseResult>) -> bool {
        self.result_tx.send(outcome).is_ok()
    }

    /// The worker loop: take a frame, extract, publish, repeat.
    ///
    /// An extraction error is published like any result and then ends the
    /// loop; the coordinator observes the failure through the result
    /// conduit.
    pub fn run<E: InferenceEngine>(self, mut extractor: PoseExtractor<E>) {
        while let Some(frame) = self.take_frame() {
            let outcome = extractor.extract(&frame);
            let failed = outcome.is_err();
            if !self.publish_result(outcome) || failed {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Segment;
    use crate::topology::Topology;

    #[test]
    fn test_poll_on_empty_pipeline() {
        let (pipeline, _worker) = FramePipeline::pair();
        assert!(pipeline.try_take_result().is_none());
    }

    #[test]
    fn test_frame_round_trip() {
        let (pipeline, worker) = FramePipeline::pair();
        let frame = RgbImage::new(8, 8);

        pipeline.submit_frame(&frame).unwrap();
        let taken = worker.take_frame().unwrap();
        assert_eq!(taken.dimensions(), (8, 8));

        let segments: Vec<Option<Segment>> = vec![None; Topology::Coco.pairs().len()];
        assert!(worker.publish_result(Ok(PoseResult::new(Topology::Coco, segments))));

        let outcome = pipeline.try_take_result().expect("result queued");
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_submit_after_worker_gone() {
        let (pipeline, worker) = FramePipeline::pair();
        drop(worker);
        let frame = RgbImage::new(8, 8);
        assert!(matches!(
            pipeline.submit_frame(&frame),
            Err(PoseError::PipelineClosed)
        ));
    }

    #[test]
    fn test_take_frame_sees_cancellation() {
        let (pipeline, worker) = FramePipeline::pair();
        drop(pipeline);
        assert!(worker.take_frame().is_none());
    }
}
