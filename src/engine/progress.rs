//! Progress tracking for the normalization phase

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::info;

use crate::domain::model::ArtifactSource;

/// Progress callback trait for UI integration
pub trait ProgressCallback: Send + Sync {
    /// Called when an input starts normalizing
    fn on_start(&self, source: &ArtifactSource, clip_total: usize);

    /// Called when an input finished normalizing
    fn on_complete(&self, source: &ArtifactSource, completed: usize, total: usize);
}

/// Shared progress state for one normalization phase
pub struct NormalizeProgress {
    /// Total number of inputs, bookends included
    total: usize,
    /// Number of manifest clips
    clip_total: usize,
    completed: AtomicUsize,
    started_at: Instant,
    callbacks: Mutex<Vec<Arc<dyn ProgressCallback>>>,
}

impl NormalizeProgress {
    pub fn new(clip_total: usize) -> Self {
        Self {
            total: clip_total + 2,
            clip_total,
            completed: AtomicUsize::new(0),
            started_at: Instant::now(),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Register a callback
    pub fn add_callback(&self, callback: Arc<dyn ProgressCallback>) {
        if let Ok(mut callbacks) = self.callbacks.lock() {
            callbacks.push(callback);
        }
    }

    /// Record that `source` started normalizing
    pub fn start(&self, source: &ArtifactSource) {
        match source {
            ArtifactSource::Clip {
                position,
                descriptor,
            } => info!(
                stage = "normalize",
                clip = *position,
                total = self.clip_total,
                source = %descriptor.source_path.display(),
                "Preparing clip {}/{}",
                position,
                self.clip_total
            ),
            bookend => info!(stage = "normalize", "Preparing {}", bookend.label()),
        }
        for callback in self.snapshot() {
            callback.on_start(source, self.clip_total);
        }
    }

    /// Record that `source` finished normalizing
    pub fn complete(&self, source: &ArtifactSource) {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            stage = "normalize",
            completed,
            total = self.total,
            "{} normalized",
            source.label()
        );
        for callback in self.snapshot() {
            callback.on_complete(source, completed, self.total);
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction of inputs normalized so far (0.0 - 1.0)
    pub fn fraction(&self) -> f64 {
        self.completed() as f64 / self.total as f64
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    fn snapshot(&self) -> Vec<Arc<dyn ProgressCallback>> {
        self.callbacks
            .lock()
            .map(|callbacks| callbacks.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ClipDescriptor;

    struct TestCallback {
        started: Mutex<Vec<String>>,
        completions: AtomicUsize,
    }

    impl TestCallback {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                started: Mutex::new(Vec::new()),
                completions: AtomicUsize::new(0),
            })
        }
    }

    impl ProgressCallback for TestCallback {
        fn on_start(&self, source: &ArtifactSource, clip_total: usize) {
            self.started
                .lock()
                .unwrap()
                .push(format!("{} of {}", source.label(), clip_total));
        }

        fn on_complete(&self, _source: &ArtifactSource, _completed: usize, _total: usize) {
            self.completions.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_progress_counts_bookends() {
        let progress = NormalizeProgress::new(3);
        assert_eq!(progress.total(), 5);
        assert_eq!(progress.completed(), 0);
        assert_eq!(progress.fraction(), 0.0);
    }

    #[test]
    fn test_progress_notifies_callbacks() {
        let progress = NormalizeProgress::new(2);
        let callback = TestCallback::new();
        progress.add_callback(callback.clone());

        let clip = ArtifactSource::Clip {
            position: 1,
            descriptor: ClipDescriptor::new("a.mp4", 3.0),
        };
        progress.start(&ArtifactSource::Intro);
        progress.complete(&ArtifactSource::Intro);
        progress.start(&clip);
        progress.complete(&clip);

        assert_eq!(
            *callback.started.lock().unwrap(),
            vec!["intro of 2".to_string(), "clip 1 of 2".to_string()]
        );
        assert_eq!(callback.completions.load(Ordering::Relaxed), 2);
        assert_eq!(progress.completed(), 2);
        assert_eq!(progress.fraction(), 0.5);
    }
}
