use serde::{Deserialize, Serialize};

/// The three heuristic descriptors computed from a waveform, before they
/// are attached to file provenance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawFeatures {
    /// Normalized loudness, 0-100.
    pub energy: f64,
    /// Zero-crossing-rate brightness proxy, 0-100.
    pub brightness: f64,
    /// Approximate BPM, clamped to 60-180.
    pub tempo: u32,
}

/// One analyzed track: file provenance, descriptors, and the group label
/// assigned by the cluster engine.
///
/// Provenance (`name`, `size`) is captured when the file is queued and
/// never recomputed. `cluster` stays `None` until a grouping pass runs;
/// serialization skips it so unclustered exports stay clean, and imports
/// tolerate files where it is absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub name: String,
    pub size: u64,
    /// Track length in seconds.
    pub duration: f64,
    pub energy: f64,
    pub brightness: f64,
    pub tempo: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<u32>,
}

impl FeatureRecord {
    pub fn new(name: impl Into<String>, size: u64, duration: f64, features: RawFeatures) -> Self {
        Self {
            name: name.into(),
            size,
            duration,
            energy: features.energy,
            brightness: features.brightness,
            tempo: features.tempo,
            cluster: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_starts_unclustered() {
        let features = RawFeatures {
            energy: 55.0,
            brightness: 40.0,
            tempo: 120,
        };
        let record = FeatureRecord::new("song.mp3", 1024, 180.5, features);

        assert_eq!(record.name, "song.mp3");
        assert_eq!(record.size, 1024);
        assert_eq!(record.tempo, 120);
        assert_eq!(record.cluster, None);
    }

    #[test]
    fn serialization_skips_absent_cluster() {
        let record = FeatureRecord::new(
            "a.wav",
            10,
            1.0,
            RawFeatures {
                energy: 0.0,
                brightness: 0.0,
                tempo: 60,
            },
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("cluster"));

        let parsed: FeatureRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
