use std::io::Write;

use kafka_client::{parse_config_str, read_config, ConfigError, ConfigFileError};

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn reads_sections_comments_and_blank_lines() {
    let file = write_config(
        "[topic]\n\
         auto.offset.reset=earliest  # trailing comment\n\
         \n\
         # full-line comment\n\
         [global]\n\
         bootstrap.servers=localhost:9092\n",
    );
    let (global, topic) = read_config(file.path()).unwrap();
    assert_eq!(global.get("bootstrap.servers"), "localhost:9092");
    let reset = topic.get("auto.offset.reset");
    assert!(reset == "earliest" || reset == "smallest", "got {reset}");
}

#[test]
fn surrounding_blanks_are_trimmed() {
    let (global, _) =
        parse_config_str("mem", "\t[global]  \n  client.id \t=\t reader-1 \n").unwrap();
    assert_eq!(global.get("client.id"), "reader-1");
}

#[test]
fn entry_before_any_header_names_the_line() {
    let err = parse_config_str("mem", "bootstrap.servers=x\n").unwrap_err();
    assert!(matches!(err, ConfigFileError::MissingSection { line: 1, .. }));
    assert_eq!(err.line(), Some(1));
    assert!(err.to_string().starts_with("[file: mem] line 1"));
}

#[test]
fn unterminated_header_is_invalid() {
    let err = parse_config_str("mem", "# intro\n[global\n").unwrap_err();
    assert!(matches!(err, ConfigFileError::InvalidHeader { line: 2, .. }));
}

#[test]
fn header_comment_is_stripped() {
    let (global, _) = parse_config_str("mem", "[global] # main\nclient.id=c\n").unwrap();
    assert_eq!(global.get("client.id"), "c");
}

#[test]
fn unknown_section_is_rejected() {
    let err = parse_config_str("mem", "[broker]\n").unwrap_err();
    match err {
        ConfigFileError::UnknownSection { line, header, .. } => {
            assert_eq!(line, 1);
            assert_eq!(header, "broker");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn entry_needs_exactly_one_equals_sign() {
    let err = parse_config_str("mem", "[global]\nclient.id\n").unwrap_err();
    assert!(matches!(err, ConfigFileError::MalformedEntry { line: 2, .. }));

    let err = parse_config_str("mem", "[global]\nclient.id=a=b\n").unwrap_err();
    assert!(matches!(err, ConfigFileError::MalformedEntry { line: 2, .. }));
}

#[test]
fn escaped_hash_is_kept_in_the_value() {
    let (global, _) =
        parse_config_str("mem", "[global]\nclient.id=team\\#7 # owner\n").unwrap();
    assert_eq!(global.get("client.id"), "team#7");
}

#[test]
fn rejected_key_aborts_with_its_line() {
    let err = parse_config_str("mem", "[global]\nclient.id=ok\nno.such.property=1\n").unwrap_err();
    match err {
        ConfigFileError::Rejected { line, source, .. } => {
            assert_eq!(line, 3);
            assert!(matches!(source, ConfigError::Rejected { kind: "GlobalConfig", .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn topic_keys_go_to_the_topic_config() {
    let err = parse_config_str("mem", "[topic]\nbootstrap.servers=x\n").unwrap_err();
    assert!(matches!(err, ConfigFileError::Rejected { line: 2, .. }));
}

#[test]
fn later_entries_override_earlier_ones() {
    let (global, _) =
        parse_config_str("mem", "[global]\nclient.id=first\n[topic]\n[global]\nclient.id=second\n")
            .unwrap();
    assert_eq!(global.get("client.id"), "second");
}

#[test]
fn empty_input_yields_default_configs() {
    let (global, topic) = parse_config_str("mem", "").unwrap();
    assert!(!global.is_released());
    assert!(!topic.is_released());
}

#[test]
fn missing_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.conf");
    let err = read_config(&path).unwrap_err();
    assert!(matches!(err, ConfigFileError::Open { .. }));
    assert_eq!(err.line(), None);
    assert!(err.to_string().contains("absent.conf"));
}
