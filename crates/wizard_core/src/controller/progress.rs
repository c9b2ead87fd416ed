use shared::domain::Question;

/// Answered-question count over the question set; display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(questions: &[Question]) -> Self {
        Self {
            answered: questions.iter().filter(|q| q.is_answered()).count(),
            total: questions.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }

    /// Rounded percentage; held at 99 while anything is unanswered so that
    /// 100 always means complete.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let rounded = (self.answered * 200 + self.total) / (self.total * 2);
        let rounded = rounded.min(100) as u8;
        if self.is_complete() {
            rounded
        } else {
            rounded.min(99)
        }
    }
}
