use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::audio::features::FeatureRecord;

/// Display names for cluster ids, indexed by id. Ids past the end fall
/// back to the last entry.
pub const CLUSTER_NAMES: [&str; 5] = [
    "Energetic / Bright",
    "Mellow / Dark",
    "Rhythmic",
    "Atmospheric",
    "Other",
];

/// Japanese display names, written into JSON exports alongside the English
/// ones.
pub const CLUSTER_NAMES_JA: [&str; 5] = [
    "エネルギッシュ / 明るい",
    "メロウ / 暗め",
    "リズミカル",
    "アトモスフェリック (雰囲気重視)",
    "その他",
];

const CSV_HEADER: &str =
    "filename,tempo(BPM),brightness(%),energy(%),duration(s),clusterId,clusterName";

pub fn cluster_name(id: u32) -> &'static str {
    CLUSTER_NAMES
        .get(id as usize)
        .copied()
        .unwrap_or(CLUSTER_NAMES[CLUSTER_NAMES.len() - 1])
}

pub fn cluster_name_ja(id: u32) -> &'static str {
    CLUSTER_NAMES_JA
        .get(id as usize)
        .copied()
        .unwrap_or(CLUSTER_NAMES_JA[CLUSTER_NAMES_JA.len() - 1])
}

#[derive(Serialize)]
struct ExportRecord<'a> {
    #[serde(flatten)]
    record: &'a FeatureRecord,
    cluster_name_en: &'static str,
    cluster_name_ja: &'static str,
}

/// Write records as a pretty-printed JSON array enriched with display
/// names. The enrichment fields are ignored on import, so an exported file
/// round-trips back into the same records.
pub fn write_json(records: &[FeatureRecord], path: &Path) -> Result<()> {
    let enriched: Vec<ExportRecord> = records
        .iter()
        .map(|record| {
            let id = record.cluster.unwrap_or(0);
            ExportRecord {
                record,
                cluster_name_en: cluster_name(id),
                cluster_name_ja: cluster_name_ja(id),
            }
        })
        .collect();

    let json = serde_json::to_string_pretty(&enriched)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write JSON export: {}", path.display()))?;

    log::info!("Wrote JSON export: {} ({} records)", path.display(), records.len());
    Ok(())
}

/// Write records as CSV, prefixed with a UTF-8 BOM so spreadsheet imports
/// pick the right encoding. Name fields are quoted with inner quotes
/// doubled.
pub fn write_csv(records: &[FeatureRecord], path: &Path) -> Result<()> {
    let mut out = String::from("\u{feff}");
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        let id = record.cluster.unwrap_or(0);
        out.push_str(&format!(
            "{},{},{},{},{:.2},{},{}\n",
            csv_quote(&record.name),
            record.tempo,
            record.brightness,
            record.energy,
            record.duration,
            id,
            csv_quote(cluster_name(id)),
        ));
    }

    fs::write(path, out)
        .with_context(|| format!("Failed to write CSV export: {}", path.display()))?;

    log::info!("Wrote CSV export: {} ({} records)", path.display(), records.len());
    Ok(())
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Load a previously exported JSON array back into records. Unknown fields
/// (the display names, or anything a newer writer added) are ignored;
/// records without a cluster label come back unlabeled.
pub fn import_json(path: &Path) -> Result<Vec<FeatureRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;

    let records: Vec<FeatureRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse import file: {}", path.display()))?;

    if records.is_empty() {
        anyhow::bail!("Import file contains no records: {}", path.display());
    }

    log::info!("Imported {} records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::features::RawFeatures;

    fn rec(name: &str, cluster: Option<u32>) -> FeatureRecord {
        let mut record = FeatureRecord::new(
            name,
            4096,
            200.25,
            RawFeatures {
                energy: 72.5,
                brightness: 31.0,
                tempo: 128,
            },
        );
        record.cluster = cluster;
        record
    }

    #[test]
    fn json_round_trips_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let records = vec![rec("a.mp3", Some(0)), rec("b.flac", Some(2))];

        write_json(&records, &path).unwrap();
        let restored = import_json(&path).unwrap();

        assert_eq!(restored, records);
    }

    #[test]
    fn json_carries_display_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&[rec("a.mp3", Some(0))], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"cluster_name_en\": \"Energetic / Bright\""));
        assert!(content.contains("cluster_name_ja"));
    }

    #[test]
    fn out_of_range_cluster_ids_fall_back_to_other() {
        assert_eq!(cluster_name(2), "Rhythmic");
        assert_eq!(cluster_name(99), "Other");
        assert_eq!(cluster_name_ja(99), "その他");
    }

    #[test]
    fn csv_has_bom_header_and_quoted_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = vec![rec("say \"hi\".wav", Some(1))];

        write_csv(&records, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert!(content.starts_with("\u{feff}filename,tempo(BPM),brightness(%)"));
        assert_eq!(content.lines().count(), 2);

        let row = content.lines().nth(1).unwrap();
        assert!(row.starts_with("\"say \"\"hi\"\".wav\",128,31,72.5,200.25,1"));
        assert!(row.ends_with("\"Mellow / Dark\""));
    }

    #[test]
    fn import_rejects_empty_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(import_json(&path).is_err());
    }

    #[test]
    fn import_tolerates_missing_cluster_and_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(
            &path,
            r#"[{"name":"x.mp3","size":10,"duration":3.5,"energy":50.0,"brightness":20.0,"tempo":90,"some_future_field":true}]"#,
        )
        .unwrap();

        let records = import_json(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cluster, None);
        assert_eq!(records[0].tempo, 90);
    }
}
