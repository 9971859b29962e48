//! Lock-free scalar cells for parameters shared with the audio thread.
//!
//! Control threads write, the audio thread reads a snapshot once per analysis
//! window. No ordering between different cells is implied.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Cache-line aligned atomic f32.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn get_relaxed(&self) -> f32 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: f32) -> f32 {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Cache-line aligned atomic bool.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: bool) -> bool {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Clone for AtomicFlag {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Cache-line aligned atomic i32, used for stepped parameters such as octave shift.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicInt {
    value: AtomicI32,
}

impl AtomicInt {
    pub fn new(value: i32) -> Self {
        Self {
            value: AtomicI32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> i32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: i32) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: i32) -> i32 {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Clone for AtomicInt {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicInt {
    fn default() -> Self {
        Self::new(0)
    }
}
