// src/progress.rs
/// Progress reporting for long-running operations (resolve/extract/collate).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start of a phase with the number of items in it.
    fn begin(&mut self, _phase: &str, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One study finished.
    fn item_done(&mut self, _id: &str) {}

    /// One study was skipped.
    fn item_failed(&mut self, _id: &str, _reason: &str) {}

    /// Called at the end of a phase, successful or not.
    fn finish(&mut self) {}
}

/// Per-fetch status lines. Fetchers are shared, so a plain `Fn`.
pub type StatusFn = Box<dyn Fn(&str) + Send + Sync>;

/// Fetch status to stdout, same shape as [`ConsoleProgress`] log lines.
pub fn console_status() -> StatusFn {
    Box::new(|msg| println!("---{msg}"))
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Streams every status line to stdout (verbose mode).
#[derive(Default)]
pub struct ConsoleProgress {
    phase: String,
    total: usize,
    done: usize,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, phase: &str, total: usize) {
        self.phase = s!(phase);
        self.total = total;
        self.done = 0;
        println!("{phase}: {total} studies");
    }

    fn log(&mut self, msg: &str) {
        println!("---{msg}");
    }

    fn item_done(&mut self, id: &str) {
        self.done += 1;
        println!("[{}/{}] {} {id}", self.done, self.total, self.phase);
    }

    fn item_failed(&mut self, id: &str, reason: &str) {
        self.done += 1;
        println!("[{}/{}] {} {id}: skipped ({reason})", self.done, self.total, self.phase);
    }

    fn finish(&mut self) {
        println!("{}: done", self.phase);
    }
}
