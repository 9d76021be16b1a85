use thiserror::Error;

/// Errors produced by the analysis pipeline.
///
/// Per-file failures (`EmptyInput`, `Read`, `Decode`) are contained by the
/// batch orchestrator: they are counted and logged, and never abort sibling
/// files. `BatchExhausted` is the only terminal condition and means not a
/// single file in the batch produced features.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input payload had zero length.
    #[error("File is empty (0 bytes)")]
    EmptyInput,

    /// The file's bytes could not be read from disk.
    #[error("Failed to read audio file: {0}")]
    Read(String),

    /// The byte stream could not be decoded as audio. Carries the
    /// underlying decoder message.
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// Every file in the batch was skipped or failed to decode.
    #[error("No files could be analyzed ({failed} of {total} failed)")]
    BatchExhausted { failed: usize, total: usize },
}
