use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "rtrb")]
use rtrb::Producer;

/// Pipeline stages, reported as each one starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderStage {
    Trajectory,
    Panning,
    Binaural,
    Reverb,
    Mix,
    Distortion,
    Done,
}

impl RenderStage {
    pub fn label(self) -> &'static str {
        match self {
            RenderStage::Trajectory => "computing trajectory",
            RenderStage::Panning => "panning",
            RenderStage::Binaural => "binaural filtering",
            RenderStage::Reverb => "convolving reverb",
            RenderStage::Mix => "mixing dry/wet",
            RenderStage::Distortion => "waveshaping",
            RenderStage::Done => "done",
        }
    }
}

/// Receives stage transitions. Must never block the render.
pub trait ProgressSink: Send {
    fn report(&mut self, stage: RenderStage);
}

#[cfg(feature = "rtrb")]
impl ProgressSink for Producer<RenderStage> {
    fn report(&mut self, stage: RenderStage) {
        // A full ring just drops the update.
        let _ = self.push(stage);
    }
}

/// Cooperative cancellation flag, checked by the renderer between stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn test_full_ring_drops_updates() {
        let (mut producer, mut consumer) = rtrb::RingBuffer::<RenderStage>::new(2);
        producer.report(RenderStage::Trajectory);
        producer.report(RenderStage::Panning);
        producer.report(RenderStage::Reverb);
        assert_eq!(consumer.pop().ok(), Some(RenderStage::Trajectory));
        assert_eq!(consumer.pop().ok(), Some(RenderStage::Panning));
        assert!(consumer.pop().is_err());
    }
}
