use crate::audio::features::FeatureRecord;

/// Build a music-generation style prompt from a track's descriptors.
///
/// The thresholds are coarse on purpose: the output is a starting point to
/// paste into a generation service, not a precise characterization.
pub fn style_prompt(record: &FeatureRecord) -> String {
    let tempo_type = if record.tempo > 120 {
        "Fast"
    } else if record.tempo > 85 {
        "Mid-tempo"
    } else {
        "Slow"
    };

    let brightness_type = if record.brightness > 70.0 {
        "Bright, Sparkling"
    } else if record.brightness > 40.0 {
        "Balanced"
    } else {
        "Warm, Mellow"
    };

    let energy_type = if record.energy > 70.0 {
        "Intense, High-energy"
    } else if record.energy > 40.0 {
        "Moderate"
    } else {
        "Calm, Soft"
    };

    format!(
        "{}, {}, {}, {} BPM, high quality audio",
        tempo_type, energy_type, brightness_type, record.tempo
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::features::RawFeatures;

    fn rec(energy: f64, brightness: f64, tempo: u32) -> FeatureRecord {
        FeatureRecord::new(
            "t.mp3",
            1,
            1.0,
            RawFeatures {
                energy,
                brightness,
                tempo,
            },
        )
    }

    #[test]
    fn describes_a_fast_bright_track() {
        let prompt = style_prompt(&rec(85.0, 80.0, 140));
        assert_eq!(
            prompt,
            "Fast, Intense, High-energy, Bright, Sparkling, 140 BPM, high quality audio"
        );
    }

    #[test]
    fn describes_a_slow_mellow_track() {
        let prompt = style_prompt(&rec(20.0, 15.0, 70));
        assert_eq!(
            prompt,
            "Slow, Calm, Soft, Warm, Mellow, 70 BPM, high quality audio"
        );
    }

    #[test]
    fn thresholds_are_exclusive_at_the_boundary() {
        // 120 BPM is still mid-tempo; 121 tips over.
        assert!(style_prompt(&rec(50.0, 50.0, 120)).starts_with("Mid-tempo"));
        assert!(style_prompt(&rec(50.0, 50.0, 121)).starts_with("Fast"));

        // 40.0 energy is still calm; just above is moderate.
        assert!(style_prompt(&rec(40.0, 50.0, 100)).contains("Calm, Soft"));
        assert!(style_prompt(&rec(40.1, 50.0, 100)).contains("Moderate"));
    }
}
