/// Snapshot of how far the user got through the active path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(answered: usize, total: usize) -> Self {
        Self { answered, total }
    }

    /// `floor(100 * answered / total)`, 0 for an empty path.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = self.answered.min(self.total) * 100 / self.total;
        percent as u8
    }

    pub fn is_started(&self) -> bool {
        self.answered > 0
    }

    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.answered == self.total
    }
}
