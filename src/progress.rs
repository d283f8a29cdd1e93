// src/progress.rs
/// Lightweight progress reporting used by snapshot assembly and rival aggregation.
/// Frontends (the CLI, or an embedding service) implement this to surface status.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One page section was parsed.
    fn section(&mut self, _name: &str, _parsed: usize, _skipped: usize) {}

    /// One logical unit completed (e.g. a rival's form was built).
    fn item_done(&mut self, _label: &str) {}

    /// One logical unit failed and was left out.
    fn item_failed(&mut self, _label: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Records every call; handy in tests.
#[derive(Debug, Default)]
pub struct Recorder {
    pub total: Option<usize>,
    pub sections: Vec<(String, usize, usize)>,
    pub done: Vec<String>,
    pub failed: Vec<String>,
    pub finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) {
        self.total = Some(total);
    }

    fn section(&mut self, name: &str, parsed: usize, skipped: usize) {
        self.sections.push((s!(name), parsed, skipped));
    }

    fn item_done(&mut self, label: &str) {
        self.done.push(s!(label));
    }

    fn item_failed(&mut self, label: &str, _reason: &str) {
        self.failed.push(s!(label));
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
