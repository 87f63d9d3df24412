use std::sync::atomic::{AtomicBool, Ordering};

/// Single-flight guard: at most one holder, contenders are turned away instead of queued.
#[derive(Debug, Default)]
pub struct Latch(AtomicBool);

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<LatchGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| LatchGuard(&self.0))
    }

    pub fn is_held(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Releases the latch on drop.
#[derive(Debug)]
pub struct LatchGuard<'a>(&'a AtomicBool);

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
