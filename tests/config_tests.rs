//! Loading lowering options from configuration files.

use ktjs::{LoweringOptions, load_options, parse_options};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_load_lowering_section() {
    let file = write_config(
        r#"{
            "lowering": {
                "inlineFunctions": "false",
                "maxInlineDepth": 4,
                "runtimeNamespace": "Rt"
            },
            "unrelated": [1, 2, 3]
        }"#,
    );
    let options = load_options(file.path()).expect("valid config");
    assert!(!options.inline_functions);
    assert_eq!(options.max_inline_depth, 4);
    assert_eq!(options.runtime_namespace, "Rt");
    // Keys not given keep their defaults.
    assert_eq!(options.temp_prefix, LoweringOptions::default().temp_prefix);
    assert_eq!(options.throwable_name, "kotlin.Throwable");
}

#[test]
fn test_missing_section_uses_defaults() {
    let file = write_config("{}");
    let options = load_options(file.path()).expect("valid config");
    assert_eq!(options, LoweringOptions::default());
}

#[test]
fn test_missing_file_names_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");
    let err = load_options(&path).expect_err("file does not exist");
    let message = format!("{err:#}");
    assert!(message.contains("failed to read configuration"));
    assert!(message.contains("absent.json"));
}

#[test]
fn test_malformed_config_is_reported() {
    let file = write_config("{ \"lowering\": ");
    let err = load_options(file.path()).expect_err("truncated JSON");
    let message = format!("{err:#}");
    assert!(message.contains("failed to load configuration"));
    assert!(message.contains("failed to parse configuration JSON"));

    let err = parse_options(r#"{ "lowering": { "inlineFunctions": "maybe" } }"#)
        .expect_err("bad boolean");
    assert!(format!("{err:#}").contains("invalid boolean value"));

    assert!(parse_options("[1]").is_err());
}
