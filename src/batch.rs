use std::fs;
use std::path::PathBuf;

use crate::audio::analysis;
use crate::audio::decode::Decoder;
use crate::audio::features::FeatureRecord;
use crate::cluster;
use crate::error::AnalysisError;

/// Number of groups the orchestrator asks the cluster engine for.
pub const DEFAULT_CLUSTERS: usize = 3;

/// One input file queued for analysis. Provenance (`name`, `size`) is
/// captured here, once; the bytes themselves are read lazily when the
/// file's turn comes.
#[derive(Clone, Debug)]
pub struct TrackSource {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl TrackSource {
    pub fn from_path(path: PathBuf) -> std::io::Result<Self> {
        let size = fs::metadata(&path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, path, size })
    }
}

/// The outcome of one batch run: records in input order plus accounting
/// for the inputs that produced nothing.
#[derive(Debug)]
pub struct AnalysisBatch {
    pub records: Vec<FeatureRecord>,
    pub total: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Drives decode then extract across a file set, one file at a time, then
/// clusters whatever survived.
pub struct BatchRunner {
    decoder: Decoder,
}

impl BatchRunner {
    pub fn new() -> Self {
        Self {
            decoder: Decoder::new(),
        }
    }

    /// Analyze every source in order.
    ///
    /// Files are processed strictly sequentially: the decode context is not
    /// for concurrent use, and working one file at a time keeps at most one
    /// set of raw bytes and one decoded waveform in memory.
    ///
    /// `on_progress` fires with `(attempted, total)` after each attempted
    /// file; zero-byte sources are skipped without a callback. A failing
    /// file is logged and counted, never fatal to its siblings. Only a
    /// batch where no file at all survived returns `BatchExhausted`.
    pub fn analyze_all<F>(
        &self,
        sources: &[TrackSource],
        mut on_progress: F,
    ) -> Result<AnalysisBatch, AnalysisError>
    where
        F: FnMut(usize, usize),
    {
        let total = sources.len();
        let mut records: Vec<FeatureRecord> = Vec::new();
        let mut skipped = 0usize;
        let mut failed = 0usize;

        for (index, source) in sources.iter().enumerate() {
            if source.size == 0 {
                log::warn!("Skipping empty file: {}", source.name);
                skipped += 1;
                continue;
            }

            match self.analyze_one(source) {
                Ok(record) => records.push(record),
                Err(e) => {
                    log::warn!("Failed to analyze {}: {}", source.name, e);
                    failed += 1;
                }
            }
            on_progress(index + 1, total);
        }

        if records.is_empty() {
            return Err(AnalysisError::BatchExhausted { failed, total });
        }

        cluster::assign_clusters(&mut records, DEFAULT_CLUSTERS);

        log::info!(
            "Batch complete: {} of {} files analyzed ({} failed, {} skipped)",
            records.len(),
            total,
            failed,
            skipped
        );

        Ok(AnalysisBatch {
            records,
            total,
            skipped,
            failed,
        })
    }

    fn analyze_one(&self, source: &TrackSource) -> Result<FeatureRecord, AnalysisError> {
        let bytes = fs::read(&source.path).map_err(|e| AnalysisError::Read(e.to_string()))?;
        let ext = source.path.extension().and_then(|e| e.to_str());

        let wave = self.decoder.decode(bytes, ext)?;
        let duration = wave.duration();
        let features = analysis::extract(&wave);

        Ok(FeatureRecord::new(
            source.name.clone(),
            source.size,
            duration,
            features,
        ))
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}
