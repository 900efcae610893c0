//! Frame-by-frame interpolation between two rectangles, used to animate zooms.
//!
//! The animator is pure: [`Animator::value_for_frame`] depends only on its
//! inputs, so a paint path can re-read the current frame as often as it likes.
//! [`AnimatorHandle`] shares one animator between a frame loop and a painter
//! running on different threads.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::CoreError;
use crate::rect::Rect;

/// Frames in a standard zoom animation.
pub const ZOOM_FRAME_COUNT: u32 = 10;

/// Time between zoom animation frames.
pub const ZOOM_FRAME_INTERVAL: Duration = Duration::from_millis(60);

/// Values that can be linearly interpolated at discrete frame positions.
pub trait Interpolate: Copy {
    /// The value `frame / last` of the way from `start` to `end`.
    ///
    /// `frame` is already clamped to `0..=last` and `last >= 1`.
    fn interpolate(start: Self, end: Self, frame: u32, last: u32) -> Self;
}

/// Integer step with truncating division, so rectangles snap to whole pixels.
#[inline]
fn lerp_i32(start: i32, end: i32, frame: u32, last: u32) -> i32 {
    let delta = end as i64 - start as i64;
    (start as i64 + delta * frame as i64 / last as i64) as i32
}

impl Interpolate for Rect {
    fn interpolate(start: Self, end: Self, frame: u32, last: u32) -> Self {
        Rect {
            x: lerp_i32(start.x, end.x, frame, last),
            y: lerp_i32(start.y, end.y, frame, last),
            width: lerp_i32(start.width, end.width, frame, last),
            height: lerp_i32(start.height, end.height, frame, last),
        }
    }
}

/// Produces `total_frames` values from `start` to `end`, one frame at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Animator<T> {
    start: T,
    end: T,
    total_frames: u32,
    current_frame: u32,
}

/// The zoom animator.
pub type RectangleAnimator = Animator<Rect>;

impl<T: Interpolate> Animator<T> {
    /// `total_frames` counts both endpoints and must be at least 2.
    pub fn new(start: T, end: T, total_frames: u32) -> crate::Result<Self> {
        if total_frames < 2 {
            return Err(CoreError::InvalidFrameCount(total_frames));
        }
        Ok(Self {
            start,
            end,
            total_frames,
            current_frame: 0,
        })
    }

    pub fn start_value(&self) -> T {
        self.start
    }

    pub fn end_value(&self) -> T {
        self.end
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// The value at `frame`, clamped into `0..total_frames`.
    pub fn value_for_frame(&self, frame: i64) -> T {
        let last = self.total_frames - 1;
        let frame = frame.clamp(0, last as i64) as u32;
        T::interpolate(self.start, self.end, frame, last)
    }

    /// Step one frame forward and return the new value.
    pub fn advance_frame(&mut self) -> T {
        self.current_frame = self.current_frame.saturating_add(1);
        self.latest_value()
    }

    /// The value at the current frame, without advancing.
    pub fn latest_value(&self) -> T {
        self.value_for_frame(self.current_frame as i64)
    }

    pub fn is_finished(&self) -> bool {
        self.current_frame >= self.total_frames - 1
    }

    /// Rewind to the first frame.
    pub fn restart(&mut self) {
        self.current_frame = 0;
    }
}

/// A clonable, thread-safe handle to one [`RectangleAnimator`].
#[derive(Debug, Clone)]
pub struct AnimatorHandle {
    inner: Arc<Mutex<RectangleAnimator>>,
}

impl AnimatorHandle {
    pub fn new(start: Rect, end: Rect, total_frames: u32) -> crate::Result<Self> {
        Ok(Self::from(RectangleAnimator::new(start, end, total_frames)?))
    }

    fn lock(&self) -> MutexGuard<'_, RectangleAnimator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn advance_frame(&self) -> Rect {
        self.lock().advance_frame()
    }

    pub fn latest_value(&self) -> Rect {
        self.lock().latest_value()
    }

    pub fn is_finished(&self) -> bool {
        self.lock().is_finished()
    }

    pub fn current_frame(&self) -> u32 {
        self.lock().current_frame()
    }
}

impl From<RectangleAnimator> for AnimatorHandle {
    fn from(animator: RectangleAnimator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(animator)),
        }
    }
}

/// Advance `handle` once per `interval` on a background thread until the
/// animation finishes, calling `on_frame` with every new rectangle.
pub fn spawn_frame_loop<F>(handle: AnimatorHandle, interval: Duration, mut on_frame: F) -> JoinHandle<()>
where
    F: FnMut(Rect) + Send + 'static,
{
    thread::spawn(move || {
        let start = Instant::now();
        while !handle.is_finished() {
            let frame_start = Instant::now();
            on_frame(handle.advance_frame());
            if handle.is_finished() {
                break;
            }
            if let Some(rest) = interval.checked_sub(frame_start.elapsed()) {
                thread::sleep(rest);
            }
        }
        debug!(
            elapsed_ms = start.elapsed().as_millis(),
            frames = handle.current_frame(),
            "Zoom animation finished"
        );
    })
}
