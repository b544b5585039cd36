//! Per-call encode state machine.

use super::EncodeError;

/// Stages one encode call moves through, in order.
///
/// `Failed` can be entered from any stage that is not terminal. Neither
/// `Done` nor `Failed` has a way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStage {
    Configured,
    /// Checks the raster's dimensions and channel layout before any pixel
    /// is read.
    Extracting,
    /// Extracts each row and filters it immediately; extraction and
    /// filtering are interleaved row by row.
    Filtering,
    Compressing,
    Assembling,
    Done,
    Failed,
}

impl EncodeStage {
    /// The stage that follows this one on success, if any.
    pub fn next(self) -> Option<EncodeStage> {
        match self {
            EncodeStage::Configured => Some(EncodeStage::Extracting),
            EncodeStage::Extracting => Some(EncodeStage::Filtering),
            EncodeStage::Filtering => Some(EncodeStage::Compressing),
            EncodeStage::Compressing => Some(EncodeStage::Assembling),
            EncodeStage::Assembling => Some(EncodeStage::Done),
            EncodeStage::Done | EncodeStage::Failed => None,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, EncodeStage::Done | EncodeStage::Failed)
    }
}

/// Tracks the stage of a single encode call.
#[derive(Debug)]
pub struct EncodeProgress {
    stage: EncodeStage,
}

impl Default for EncodeProgress {
    fn default() -> Self {
        Self {
            stage: EncodeStage::Configured,
        }
    }
}

impl EncodeProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> EncodeStage {
        self.stage
    }

    /// Move to `to`, which must be the successor of the current stage.
    pub fn advance(&mut self, to: EncodeStage) -> Result<(), EncodeError> {
        if self.stage.next() != Some(to) {
            return Err(EncodeError::CompressionFailed(format!(
                "illegal encode transition {:?} -> {:?}",
                self.stage, to
            )));
        }
        log::debug!("encode stage {:?} -> {:?}", self.stage, to);
        self.stage = to;
        Ok(())
    }

    /// Record `error` as the reason this call failed, and hand it back.
    ///
    /// Terminal stages are left unchanged.
    pub fn fail(&mut self, error: EncodeError) -> EncodeError {
        if !self.stage.is_terminal() {
            log::debug!("encode failed during {:?}: {}", self.stage, error);
            self.stage = EncodeStage::Failed;
        }
        error
    }

    /// Run `step` in stage `to`, moving to `Failed` if it errors.
    pub fn run<T>(
        &mut self,
        to: EncodeStage,
        step: impl FnOnce() -> Result<T, EncodeError>,
    ) -> Result<T, EncodeError> {
        self.advance(to).map_err(|e| self.fail(e))?;
        step().map_err(|e| self.fail(e))
    }
}
