//! Fixed-capacity analysis window.

/// Buffers gain-scaled samples into a window of fixed length.
///
/// The window is allocated once and overwritten in place. [`push`](Self::push)
/// returns `true` exactly once every `capacity` samples, at which point the
/// window holds the last `capacity` samples in order and the write position
/// has wrapped to 0.
#[derive(Debug, Clone)]
pub struct FrameAccumulator {
    window: Box<[f32]>,
    position: usize,
    sensitivity: f32,
}

impl FrameAccumulator {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "capacity must be non-zero");

        Self {
            window: vec![0.0; capacity.max(1)].into_boxed_slice(),
            position: 0,
            sensitivity: 1.0,
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    #[inline]
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Write `sample * sensitivity` and advance. Returns `true` when the window is full.
    #[inline]
    pub fn push(&mut self, sample: f32) -> bool {
        self.window[self.position] = sample * self.sensitivity;
        self.position += 1;

        if self.position == self.window.len() {
            self.position = 0;
            true
        } else {
            false
        }
    }

    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Next write index, always in `[0, capacity)`.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.window.len()
    }

    /// Rewind the write position. Window contents are left as they are.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}
