use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Cooperative cancel flag shared by the controller and every tile.
///
/// Tiles poll [`is_cancelled`](Self::is_cancelled) once per output row. The
/// row counters let a caller display progress of the current generation.
#[derive(Debug, Default)]
pub struct RenderCancel {
    cancelled: AtomicBool,
    rows_done: AtomicUsize,
    rows_total: AtomicUsize,
}

impl RenderCancel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the in-flight generation to stop at its next row boundary.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear the flag and start counting `rows_total` rows of new work.
    pub fn reset(&self, rows_total: usize) {
        self.cancelled.store(false, Ordering::SeqCst);
        self.rows_total.store(rows_total, Ordering::Relaxed);
        self.rows_done.store(0, Ordering::Relaxed);
    }

    pub fn inc_rows(&self) {
        self.rows_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Current progress as `(rows_done, rows_total)`.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.rows_done.load(Ordering::Relaxed),
            self.rows_total.load(Ordering::Relaxed),
        )
    }
}
