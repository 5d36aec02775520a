// domain-pattern-lib/tests/integration.rs

//! Integration tests for the public classification pipeline.

use domain_pattern_lib::{
    classify, classify_file, derive_pattern, persist, run_special_pass, ClassifyConfig,
    PatternError, SpecialPassConfig, SpecialPassOutcome,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Read every `*.txt` file in `dir` into (file stem, lines).
fn read_units(dir: &Path) -> Vec<(String, Vec<String>)> {
    let mut units: Vec<(String, Vec<String>)> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().map(|e| e == "txt").unwrap_or(false))
        .map(|path| {
            let stem = path.file_stem().unwrap().to_string_lossy().to_string();
            let content = fs::read_to_string(&path).unwrap();
            let lines = content.lines().map(str::to_string).collect();
            (stem, lines)
        })
        .collect();
    units.sort();
    units
}

#[test]
fn test_reference_patterns() {
    assert_eq!(derive_pattern("").to_string(), "");
    assert_eq!(derive_pattern("aaaa").to_string(), "AAAA");
    assert_eq!(derive_pattern("abab").to_string(), "ABAB");
    assert_eq!(derive_pattern("Example"), derive_pattern("example"));
    assert_eq!(derive_pattern("foo.com"), derive_pattern("foo"));
}

#[test]
fn test_round_trip_partitions_input() {
    let dir = tempdir().unwrap();
    let input = ["aaaa.com", "bbbb.net", "abab.io", "baba.org"];

    persist(&classify(input), dir.path()).unwrap();

    let units = read_units(dir.path());
    assert_eq!(
        units,
        vec![
            (
                "AAAA".to_string(),
                vec!["aaaa.com".to_string(), "bbbb.net".to_string()]
            ),
            (
                "ABAB".to_string(),
                vec!["abab.io".to_string(), "baba.org".to_string()]
            ),
        ]
    );

    let union: BTreeSet<String> = units.into_iter().flat_map(|(_, lines)| lines).collect();
    let expected: BTreeSet<String> = input.iter().map(|s| s.to_string()).collect();
    assert_eq!(union, expected);
}

#[test]
fn test_every_domain_in_exactly_one_unit() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("domains.txt");
    let domains: Vec<String> = [
        "bun.de", "aaa.li", "xyz.li", "abba.com", "noon.io", "deed.net", "Mama.de", "papa.de",
        "q.li", "zz.li",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    fs::write(&input_path, domains.join("\n")).unwrap();

    let output = dir.path().join("out");
    let summary = classify_file(&ClassifyConfig::new(&input_path, &output)).unwrap();

    assert_eq!(summary.total_domains, domains.len());
    assert_eq!(summary.counted_domains(), domains.len());

    let units = read_units(&output);
    assert_eq!(units.len(), summary.distinct_patterns());

    for domain in &domains {
        let holders = units
            .iter()
            .filter(|(_, lines)| lines.contains(domain))
            .count();
        assert_eq!(holders, 1, "{} should be in exactly one unit", domain);
    }

    for (pattern, lines) in &units {
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(&sorted, lines, "unit {} must be sorted", pattern);
        assert_eq!(summary.pattern_counts.get(pattern), Some(&lines.len()));
        for line in lines {
            assert_eq!(&derive_pattern(line).to_string(), pattern);
        }
    }
}

#[test]
fn test_pipeline_is_idempotent() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("domains.txt");
    fs::write(&input_path, "lol.de\nmom.de\n\nxyz.de\nabc.de\n").unwrap();
    let config = ClassifyConfig::new(&input_path, dir.path().join("out"));

    let first_summary = classify_file(&config).unwrap();
    let first: Vec<(String, Vec<u8>)> = read_units(&config.output_dir)
        .into_iter()
        .map(|(stem, _)| {
            let bytes = fs::read(config.output_dir.join(format!("{}.txt", stem))).unwrap();
            (stem, bytes)
        })
        .collect();

    let second_summary = classify_file(&config).unwrap();
    for (stem, bytes) in &first {
        let again = fs::read(config.output_dir.join(format!("{}.txt", stem))).unwrap();
        assert_eq!(&again, bytes);
    }
    assert_eq!(first_summary, second_summary);
}

#[test]
fn test_missing_input_halts_without_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out");
    let err = classify_file(&ClassifyConfig::new(dir.path().join("nope.txt"), &output))
        .unwrap_err();

    assert!(matches!(err, PatternError::InputNotFound { .. }));
    assert!(!output.exists());
}

#[test]
fn test_special_pass_reuses_pipeline() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("special_status_domains_all.txt");
    fs::write(&input_path, "aa.de\nbb.de\nab.de\n").unwrap();

    let config = SpecialPassConfig::new(&input_path, dir.path().join("domain-check"));
    match run_special_pass(&config) {
        SpecialPassOutcome::Completed(summary) => {
            assert_eq!(summary.total_domains, 3);
            assert_eq!(summary.output_dir, Some(config.output_dir()));
        }
        SpecialPassOutcome::Failed(e) => panic!("special pass failed: {}", e),
    }

    let units = read_units(&config.output_dir());
    assert_eq!(units.len(), 2);
}
