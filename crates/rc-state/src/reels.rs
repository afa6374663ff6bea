//! Reel-stop collector
//!
//! The render layer reports each reel's final glyphs independently and in any
//! order. The collector finalizes once every reel has reported exactly once.

use rc_slot::GlyphKind;

/// Why a reel report was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReelReportRejection {
    OutOfRange { reel_index: usize, reels: usize },
    Duplicate { reel_index: usize },
    WrongHeight { reel_index: usize, expected: usize, got: usize },
}

impl std::fmt::Display for ReelReportRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { reel_index, reels } => {
                write!(f, "reel {reel_index} out of range (board has {reels})")
            }
            Self::Duplicate { reel_index } => write!(f, "reel {reel_index} already reported"),
            Self::WrongHeight {
                reel_index,
                expected,
                got,
            } => write!(f, "reel {reel_index} reported {got} glyphs, expected {expected}"),
        }
    }
}

/// Collects per-reel reports for one spin
#[derive(Debug, Clone)]
pub struct ReelStopCollector {
    rows: usize,
    columns: Vec<Option<Vec<GlyphKind>>>,
}

impl ReelStopCollector {
    pub fn new(reels: usize, rows: usize) -> Self {
        Self {
            rows,
            columns: vec![None; reels],
        }
    }

    /// Record one reel. Returns how many reels are still outstanding.
    pub fn report(&mut self, reel_index: usize, glyphs: Vec<GlyphKind>) -> Result<usize, ReelReportRejection> {
        let reels = self.columns.len();
        let Some(slot) = self.columns.get_mut(reel_index) else {
            return Err(ReelReportRejection::OutOfRange { reel_index, reels });
        };
        if slot.is_some() {
            return Err(ReelReportRejection::Duplicate { reel_index });
        }
        if glyphs.len() != self.rows {
            return Err(ReelReportRejection::WrongHeight {
                reel_index,
                expected: self.rows,
                got: glyphs.len(),
            });
        }
        *slot = Some(glyphs);
        Ok(self.outstanding())
    }

    pub fn outstanding(&self) -> usize {
        self.columns.iter().filter(|c| c.is_none()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.outstanding() == 0
    }

    /// Column-major board, once every reel has reported
    pub fn finish(self) -> Option<Vec<Vec<GlyphKind>>> {
        self.columns.into_iter().collect()
    }
}
