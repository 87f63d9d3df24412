/// Byte counter that turns `{bytes_total, bytes_done}` into a `[0, 1]` fraction and
/// only reports it when it changed.
#[derive(Clone, Debug)]
pub struct ProgressGate {
    total: u64,
    done: u64,
    last: Option<f32>,
}

impl ProgressGate {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            done: 0,
            last: None,
        }
    }

    pub fn done(&self) -> u64 {
        self.done
    }

    /// Adds `n` bytes; returns the new fraction if it differs from the last one emitted.
    pub fn advance(&mut self, n: u64) -> Option<f32> {
        self.done = self.done.saturating_add(n);
        if self.total == 0 {
            return None;
        }
        let frac = (self.done as f64 / self.total as f64).min(1.0) as f32;
        self.emit(frac)
    }

    /// Reports completion unless `1.0` was already emitted.
    pub fn finish(&mut self) -> Option<f32> {
        self.emit(1.0)
    }

    fn emit(&mut self, frac: f32) -> Option<f32> {
        // monotonic: a shrinking estimate never moves the bar backwards
        match self.last {
            Some(prev) if frac <= prev => None,
            _ => {
                self.last = Some(frac);
                Some(frac)
            }
        }
    }
}
