use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::batch::TrackSource;

/// Gather audio files from the given inputs: plain files are taken as-is
/// when they match the extension list, directories are walked recursively.
/// Results are sorted by path so batch order (and therefore cluster
/// seeding) is deterministic regardless of directory iteration order.
pub fn collect_sources(inputs: &[PathBuf], extensions: &[String]) -> Result<Vec<TrackSource>> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).follow_links(true) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::warn!("Skipping unreadable entry: {}", e);
                        continue;
                    }
                };
                if entry.file_type().is_file() && has_audio_extension(entry.path(), extensions) {
                    paths.push(entry.into_path());
                }
            }
        } else if input.is_file() {
            if has_audio_extension(input, extensions) {
                paths.push(input.clone());
            } else {
                log::warn!("Skipping non-audio file: {}", input.display());
            }
        } else {
            anyhow::bail!("Input path not found: {}", input.display());
        }
    }

    paths.sort();
    paths.dedup();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        match TrackSource::from_path(path) {
            Ok(source) if source.size == 0 => {
                log::warn!("Skipping empty file: {}", source.name);
            }
            Ok(source) => sources.push(source),
            Err(e) => log::warn!("Skipping unreadable file: {}", e),
        }
    }

    Ok(sources)
}

fn has_audio_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|allowed| allowed == &ext)
        })
        .unwrap_or(false)
}
