use std::path::Path;

use probeq::io::{Format, IoError, resolve_input_format};

#[test]
fn extension_decides_format_case_insensitively() {
    let cases = [
        ("request.json", Format::Json),
        ("response.JSON", Format::Json),
        ("monitor.yaml", Format::Yaml),
        ("monitor.yml", Format::Yaml),
    ];
    for (path, expected) in cases {
        assert_eq!(
            resolve_input_format(Path::new(path)).expect("resolve"),
            expected,
            "{path}"
        );
    }
}

#[test]
fn unknown_or_missing_extension_is_rejected() {
    for path in ["monitor.txt", "assertions"] {
        let err = resolve_input_format(Path::new(path)).expect_err("must fail");
        match err {
            IoError::UnsupportedPathExtension { kind, path: reported } => {
                assert_eq!(kind, "input");
                assert_eq!(reported, path);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
