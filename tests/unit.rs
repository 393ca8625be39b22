use jpmlgen::output::{ReportFormat, format_reports, write_reports_to_file};
use jpmlgen::{
    Envelope, JpmlBuilder, JpmlError, JpmlOptions, JsonpRequest, ParseRequest, RootReport,
    Transform, generate, generate_jsonp, parse,
};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
#[test]
fn test_default_wrapper_ignores_key() {
    for key in [None, Some("a.txt"), Some("")] {
        let out = generate_jsonp(&JsonpRequest {
            content_text: "line one\nline two",
            content_key: key,
            wrapper: None,
        });
        assert_eq!(out, "line one\nline two");
    }
}
#[test]
fn test_envelope_of_empty_text() {
    let keyed = parse(&ParseRequest {
        content_text: Some(""),
        content_key: Some("K"),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(keyed, r#"loadJpml({},"K");"#);
    let unkeyed = parse(&ParseRequest {
        content_text: None,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(unkeyed, "loadJpml({});");
}
#[test]
fn test_envelope_rejects_malformed_xml() {
    let result = parse(&ParseRequest {
        content_text: Some("<root><open></root>"),
        content_key: Some("bad.xml"),
        ..Default::default()
    });
    assert!(matches!(result, Err(JpmlError::Xml(_))));
}
#[test]
fn test_builder_requires_include() {
    let err = JpmlBuilder::new().out_dir("out").build().unwrap_err();
    assert!(matches!(err, JpmlError::Config(_)));
    assert_eq!(err.to_string(), "invalid include directories");
}
#[test]
fn test_builder_requires_out_dir() {
    let err = JpmlBuilder::new().include("in").build().unwrap_err();
    assert_eq!(err.to_string(), "invalid output directories");
}
#[test]
fn test_invalid_config_touches_no_files() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let options = JpmlOptions {
        out_dir: vec![out.clone()],
        ..Default::default()
    };
    assert!(matches!(generate(options), Err(JpmlError::Config(_))));
    assert!(!out.exists());
}
#[test]
fn test_intro_switches_to_envelope() {
    let options = JpmlBuilder::new()
        .include("in")
        .out_dir("out")
        .wrapper(|text, _| text.to_uppercase())
        .intro("define(")
        .build()
        .unwrap();
    match options.transform {
        Transform::Envelope(envelope) => {
            assert_eq!(envelope.intro, "define(");
            assert_eq!(envelope.outro, ");");
        }
        other => panic!("expected envelope, got {:?}", other),
    }
}
#[test]
fn test_options_from_json() {
    let options: JpmlOptions = serde_json::from_str(
        r#"{"include":["src"],"out_dir":["dist"],"transform":{"Envelope":{"intro":"cb(","outro":")"}}}"#,
    )
    .unwrap();
    assert_eq!(options.include, vec![PathBuf::from("src")]);
    assert!(options.exclude_patterns.is_empty());
    assert!(matches!(
        options.transform,
        Transform::Envelope(Envelope { ref intro, .. }) if intro == "cb("
    ));
}
#[test]
fn test_text_report() {
    let reports = vec![
        RootReport {
            root: PathBuf::from("/a"),
            files_written: 2,
            files_skipped: 1,
            directories: 1,
        },
        RootReport {
            root: PathBuf::from("/b"),
            files_written: 3,
            files_skipped: 0,
            directories: 0,
        },
    ];
    let text = format_reports(&reports, ReportFormat::Text, false).unwrap();
    assert!(text.contains("/a: 2 written, 1 skipped, 1 directories"));
    assert!(text.ends_with("total: 5 written, 1 skipped\n"));
    let json = format_reports(&reports, ReportFormat::Json, false).unwrap();
    assert!(json.starts_with(r#"[{"root":"/a","files_written":2"#));
}
#[test]
fn test_report_file_gets_format_extension() {
    let dir = tempdir().unwrap();
    let reports = vec![RootReport {
        root: PathBuf::from("/a"),
        files_written: 1,
        ..Default::default()
    }];
    let written = write_reports_to_file(&reports, ReportFormat::Json, dir.path().join("run"), true)
        .unwrap();
    assert_eq!(written, dir.path().join("run.json"));
    assert!(fs::read_to_string(&written).unwrap().contains("\"files_written\": 1"));
    let log = dir.path().join("run.log");
    let kept = write_reports_to_file(&reports, ReportFormat::Text, &log, false).unwrap();
    assert_eq!(kept, log);
    assert_eq!(ReportFormat::Text.extension(), "txt");
}
