use devdns_domain::{ConfigError, DomainError, RecordData, RecordType, ZoneFile, ZoneFormat};

mod helpers;
use helpers::{name, zone_file_with};

// ── structured formats ──

#[test]
fn test_toml_zone_loads_all_types() {
    let file = zone_file_with(
        ".toml",
        r#"
[[zones]]
host = "api.local"
type = "A"
answer = "127.0.0.1"

[[zones]]
host = "www.local"
type = "CNAME"
answer = "api.local"
ttl = 60

[[zones]]
host = "local"
type = "MX"
answer = [10, "mail.local"]

[[zones]]
host = "local"
type = "SOA"
answer = ["ns1.local", "admin.local"]
"#,
    );

    let zone = ZoneFile::load(file.path(), None).unwrap();
    assert_eq!(zone.records.len(), 4);

    assert_eq!(zone.records[0].name, name("api.local"));
    assert_eq!(zone.records[0].data, RecordData::A("127.0.0.1".parse().unwrap()));
    assert_eq!(zone.records[0].ttl, None);

    assert_eq!(zone.records[1].ttl, Some(60));
    assert_eq!(zone.records[2].record_type(), RecordType::MX);

    match &zone.records[3].data {
        RecordData::SOA { serial, refresh, .. } => {
            assert!(*serial > 0);
            assert_eq!(*refresh, 3600);
        }
        other => panic!("expected SOA, got {:?}", other),
    }
}

#[test]
fn test_json_zone_loads() {
    let file = zone_file_with(
        ".json",
        r#"{"zones": [
            {"host": "v6.local", "type": "AAAA", "answer": "::1"},
            {"host": "sip.local", "type": "SRV", "answer": "0 5 5060 sipserver.local"}
        ]}"#,
    );

    let zone = ZoneFile::load(file.path(), None).unwrap();
    assert_eq!(zone.records.len(), 2);
    assert_eq!(zone.records[1].record_type(), RecordType::SRV);
}

#[test]
fn test_mx_answers_in_every_shape() {
    let zone = ZoneFile::parse_str(
        r#"
[[zones]]
host = "example.com"
type = "MX"
answer = "mx.example.com"

[[zones]]
host = "example.com"
type = "MX"
answer = ["mx2.whatever.com.", 5]

[[zones]]
host = "example.com"
type = "MX"
answer = [20, "mx3.example.com"]
"#,
        ZoneFormat::Toml,
    )
    .unwrap();

    let mx: Vec<_> = zone
        .records
        .iter()
        .map(|r| match &r.data {
            RecordData::MX {
                preference,
                exchange,
            } => (*preference, exchange.clone()),
            other => panic!("expected MX, got {:?}", other),
        })
        .collect();
    assert_eq!(
        mx,
        vec![
            (10, name("mx.example.com")),
            (5, name("mx2.whatever.com")),
            (20, name("mx3.example.com")),
        ]
    );
}

#[test]
fn test_caa_and_naptr_entries_load() {
    let zone = ZoneFile::parse_str(
        r#"
[[zones]]
host = "example.com"
type = "CAA"
answer = [0, "issue", "letsencrypt.org"]

[[zones]]
host = "example.com"
type = "CAA"
answer = "0 iodef mailto:security@example.com"

[[zones]]
host = "sip.example.com"
type = "NAPTR"
answer = [100, 10, "U", "E2U+sip", "!^.*$!sip:info@example.com!", "."]
"#,
        ZoneFormat::Toml,
    )
    .unwrap();

    assert_eq!(
        zone.records[0].data,
        RecordData::CAA {
            flags: 0,
            tag: "issue".to_string(),
            value: "letsencrypt.org".to_string(),
        }
    );
    assert_eq!(
        zone.records[1].data,
        RecordData::CAA {
            flags: 0,
            tag: "iodef".to_string(),
            value: "mailto:security@example.com".to_string(),
        }
    );
    match &zone.records[2].data {
        RecordData::NAPTR {
            order,
            services,
            regexp,
            replacement,
            ..
        } => {
            assert_eq!(*order, 100);
            assert_eq!(services, "E2U+sip");
            assert_eq!(regexp, "!^.*$!sip:info@example.com!");
            assert!(replacement.is_root());
        }
        other => panic!("expected NAPTR, got {:?}", other),
    }
}

#[test]
fn test_naptr_with_missing_fields_reports_position() {
    let result = ZoneFile::parse_str(
        r#"{"zones": [
            {"host": "a.local", "type": "A", "answer": "10.0.0.1"},
            {"host": "sip.local", "type": "NAPTR", "answer": [100, 10, "U"]}
        ]}"#,
        ZoneFormat::Json,
    );

    match result {
        Err(ConfigError::Zone(DomainError::InvalidRecord { index, .. })) => assert_eq!(index, 2),
        other => panic!("expected invalid record error, got {:?}", other),
    }
}

#[test]
fn test_yaml_zone_loads() {
    let file = zone_file_with(
        ".yaml",
        r#"
zones:
  - host: example.com
    type: A
    answer: 1.2.3.4
  - host: example.com
    type: MX
    answer: ["mx2.whatever.com.", 5]
  - host: example.com
    type: TXT
    answer: |
      v=DKIM1; k=rsa;
      p=MIGfMA0G
    ttl: 120
"#,
    );

    let zone = ZoneFile::load(file.path(), None).unwrap();
    assert_eq!(zone.records.len(), 3);
    assert_eq!(zone.records[0].data, RecordData::A("1.2.3.4".parse().unwrap()));
    assert_eq!(
        zone.records[1].data,
        RecordData::MX {
            preference: 5,
            exchange: name("mx2.whatever.com"),
        }
    );
    assert_eq!(
        zone.records[2].data,
        RecordData::TXT(vec!["v=DKIM1; k=rsa;p=MIGfMA0G".to_string()])
    );
    assert_eq!(zone.records[2].ttl, Some(120));
}

#[test]
fn test_yaml_unknown_entry_key_rejected() {
    let result = ZoneFile::parse_str(
        "zones:\n  - host: a.local\n    type: A\n    answer: 10.0.0.1\n    weight: 3\n",
        ZoneFormat::Yaml,
    );
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_spf_maps_to_txt_and_keeps_spaces() {
    let zone = ZoneFile::parse_str(
        r#"
[[zones]]
host = "local"
type = "SPF"
answer = "v=spf1 include:_spf.local ~all"
"#,
        ZoneFormat::Toml,
    )
    .unwrap();

    assert_eq!(
        zone.records[0].data,
        RecordData::TXT(vec!["v=spf1 include:_spf.local ~all".to_string()])
    );
}

#[test]
fn test_multiline_txt_answer_is_joined() {
    let zone = ZoneFile::parse_str(
        "[[zones]]\nhost = \"local\"\ntype = \"TXT\"\nanswer = \"\"\"\nabc  \r\ndef\"\"\"\n",
        ZoneFormat::Toml,
    )
    .unwrap();

    assert_eq!(zone.records[0].data, RecordData::TXT(vec!["abcdef".to_string()]));
}

#[test]
fn test_unknown_entry_key_rejected() {
    let result = ZoneFile::parse_str(
        r#"
[[zones]]
host = "api.local"
type = "A"
answer = "127.0.0.1"
extra = true
"#,
        ZoneFormat::Toml,
    );
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_entry_reports_its_position() {
    let result = ZoneFile::parse_str(
        r#"{"zones": [
            {"host": "ok.local", "type": "A", "answer": "10.0.0.1"},
            {"host": "bad.local", "type": "A", "answer": "not-an-ip"}
        ]}"#,
        ZoneFormat::Json,
    );

    match result {
        Err(ConfigError::Zone(DomainError::InvalidRecord { index, .. })) => assert_eq!(index, 2),
        other => panic!("expected invalid record error, got {:?}", other),
    }
}

#[test]
fn test_undeclarable_type_rejected() {
    let result = ZoneFile::parse_str(
        r#"{"zones": [{"host": "x.local", "type": "HTTPS", "answer": "1"}]}"#,
        ZoneFormat::Json,
    );
    assert!(matches!(
        result,
        Err(ConfigError::Zone(DomainError::InvalidRecord { index: 1, .. }))
    ));
}

// ── line format ──

#[test]
fn test_lines_format_with_comments_quotes_and_ttl() {
    let contents = r#"
# local development zone
api.local     A      127.0.0.1
www.local     CNAME  api.local      120   ; alias
note.local    TXT    "hello world"
local         MX     10 mail.local
local         SOA    ns1.local admin.local 1 7200 3600 1209600 300
"#;

    let zone = ZoneFile::parse_str(contents, ZoneFormat::Lines).unwrap();
    assert_eq!(zone.records.len(), 5);
    assert_eq!(zone.records[1].ttl, Some(120));
    assert_eq!(
        zone.records[2].data,
        RecordData::TXT(vec!["hello world".to_string()])
    );
    match &zone.records[4].data {
        RecordData::SOA { serial, minimum, .. } => assert_eq!((*serial, *minimum), (1, 300)),
        other => panic!("expected SOA, got {:?}", other),
    }
}

#[test]
fn test_lines_format_error_carries_line_number() {
    let contents = "api.local A 127.0.0.1\n\nbroken.local MX 10\n";
    let result = ZoneFile::parse_str(contents, ZoneFormat::Lines);
    assert!(matches!(
        result,
        Err(ConfigError::Zone(DomainError::InvalidRecord { index: 3, .. }))
    ));
}

#[test]
fn test_lines_format_bad_ttl() {
    let result = ZoneFile::parse_str("api.local A 127.0.0.1 soon\n", ZoneFormat::Lines);
    assert!(result.is_err());
}

// ── detection ──

#[test]
fn test_format_detected_from_extension() {
    assert_eq!(
        ZoneFormat::from_path(std::path::Path::new("zones.JSON")),
        Some(ZoneFormat::Json)
    );
    assert_eq!(
        ZoneFormat::from_path(std::path::Path::new("dev.zone")),
        Some(ZoneFormat::Lines)
    );
    assert_eq!(
        ZoneFormat::from_path(std::path::Path::new("zones.yml")),
        Some(ZoneFormat::Yaml)
    );
    assert_eq!(ZoneFormat::from_path(std::path::Path::new("zones")), None);
}

#[test]
fn test_format_guessed_without_extension() {
    let toml = zone_file_with("", "[[zones]]\nhost = \"a.local\"\ntype = \"A\"\nanswer = \"10.0.0.1\"\n");
    let json = zone_file_with("", r#"{"zones": [{"host": "a.local", "type": "A", "answer": "10.0.0.2"}]}"#);
    let yaml = zone_file_with("", "zones:\n  - host: a.local\n    type: A\n    answer: 10.0.0.4\n");
    let lines = zone_file_with("", "# dev zone\na.local A 10.0.0.3\n");

    for (file, expected) in [
        (toml, "10.0.0.1"),
        (json, "10.0.0.2"),
        (yaml, "10.0.0.4"),
        (lines, "10.0.0.3"),
    ] {
        let zone = ZoneFile::load(file.path(), None).unwrap();
        assert_eq!(zone.records[0].data, RecordData::A(expected.parse().unwrap()));
    }
}

#[test]
fn test_explicit_format_overrides_extension() {
    let file = zone_file_with(".txt", "[[zones]]\nhost = \"a.local\"\ntype = \"A\"\nanswer = \"10.0.0.1\"\n");
    let zone = ZoneFile::load(file.path(), Some(ZoneFormat::Toml)).unwrap();
    assert_eq!(zone.records.len(), 1);
}

#[test]
fn test_missing_file_is_read_error() {
    let result = ZoneFile::load("/nonexistent/devdns/zones.toml", None);
    assert!(matches!(result, Err(ConfigError::FileRead(_, _))));
}
