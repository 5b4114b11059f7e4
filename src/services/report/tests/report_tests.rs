use super::*;
use crate::services::mapper::{aggregate, PatternRuleSet, TitleExtractor};
use crate::services::config::MapperSettings;
use crate::types::RawTitleItem;
use std::sync::Arc;

fn sample_results() -> Vec<MappingResult> {
    let extractor = TitleExtractor::new(
        Arc::new(PatternRuleSet::builtin()),
        MapperSettings::default(),
    );
    vec![
        extractor.extract(&RawTitleItem::new("a", "HVDC-ADOPT-HE-0427 Delivery DAS")),
        extractor.extract(&RawTitleItem::new("b", "no codes here")),
    ]
}

#[test]
fn test_write_json_creates_parents_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let results = sample_results();
    let (case_map, summary) = aggregate(results);

    let path = dir.path().join("nested/out/case_map.json");
    write_json(&path, &case_map).unwrap();

    let parsed: CaseMap = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed, case_map);

    let artifact = RunArtifact {
        summary: &summary,
        case_map: &case_map,
    };
    write_json(&dir.path().join("artifact.json"), &artifact).unwrap();
}

#[test]
fn test_write_results_jsonl_one_record_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let results = sample_results();

    let path = dir.path().join("results.jsonl");
    write_results_jsonl(&path, &results).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), results.len());
    for (line, result) in lines.iter().zip(&results) {
        let parsed: MappingResult = serde_json::from_str(line).unwrap();
        assert_eq!(parsed.source_id, result.source_id);
        assert_eq!(parsed.matches, result.matches);
    }
}

#[test]
fn test_write_json_unwritable_path_is_io_error() {
    let err = write_json(Path::new("/proc/forbidden/out.json"), &42).unwrap_err();
    assert!(matches!(err, crate::types::MapperError::Io(_)));
}
