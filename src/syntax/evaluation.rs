//! Attachment scores

use std::{fmt, ops::AddAssign};

use serde::{Deserialize, Serialize};

/// Unlabeled and labeled attachment counts of a predicted tree against gold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentScore {
    pub total: usize,
    pub unlabeled_correct: usize,
    pub labeled_correct: usize,
}

impl AttachmentScore {
    /// Unlabeled attachment score (0.0 when no items were scored).
    pub fn uas(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.unlabeled_correct as f64 / self.total as f64
        }
    }

    /// Labeled attachment score (0.0 when no items were scored).
    pub fn las(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.labeled_correct as f64 / self.total as f64
        }
    }
}

impl AddAssign for AttachmentScore {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.unlabeled_correct += other.unlabeled_correct;
        self.labeled_correct += other.labeled_correct;
    }
}

impl fmt::Display for AttachmentScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UAS {:.2}% LAS {:.2}% ({} items)",
            self.uas() * 100.0,
            self.las() * 100.0,
            self.total
        )
    }
}
