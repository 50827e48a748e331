//! Basic tests for dissector matching behaviour.

use dissect_engine::{DissectError, Dissector, TrimMode, Trimmer};

fn extract(pattern: &str, input: &str) -> Vec<(String, String)> {
    Dissector::new(pattern)
        .unwrap()
        .dissect(input)
        .unwrap()
        .into_iter()
        .collect()
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_basic_extraction() {
    assert_eq!(
        extract("%{ts} %{level} %{msg}", "2024-01-01 ERROR boom"),
        owned(&[("ts", "2024-01-01"), ("level", "ERROR"), ("msg", "boom")])
    );
}

#[test]
fn test_final_segment_consumes_remainder() {
    assert_eq!(
        extract("%{x}-%{y}", "a-b-c"),
        owned(&[("x", "a"), ("y", "b-c")])
    );
}

#[test]
fn test_append_ordering() {
    assert_eq!(extract("%{+a} %{+a}", "foo bar"), owned(&[("a", "foo bar")]));
    assert_eq!(
        extract("%{+a/3} %{+a/1} %{+a/2}", "c a b"),
        owned(&[("a", "a b c")])
    );
}

#[test]
fn test_syslog_line() {
    let dissector =
        Dissector::new("%{month->} %{day} %{time} %{host} %{program}[%{pid}]: %{msg}").unwrap();
    let result = dissector
        .dissect("Oct  3 12:00:01 web01 sshd[4242]: Accepted publickey for root")
        .unwrap();

    assert_eq!(result.get("month"), Some("Oct"));
    assert_eq!(result.get("day"), Some("3"));
    assert_eq!(result.get("time"), Some("12:00:01"));
    assert_eq!(result.get("host"), Some("web01"));
    assert_eq!(result.get("program"), Some("sshd"));
    assert_eq!(result.get("pid"), Some("4242"));
    assert_eq!(result.get("msg"), Some("Accepted publickey for root"));
}

#[test]
fn test_apache_access_log() {
    let dissector = Dissector::new(
        r#"%{clientip} %{} %{user} [%{timestamp}] "%{verb} %{request} HTTP/%{httpversion}" %{status} %{size}"#,
    )
    .unwrap();
    let result = dissector
        .dissect(r#"10.0.0.7 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326"#)
        .unwrap();

    assert_eq!(result.len(), 8);
    assert_eq!(result.get("clientip"), Some("10.0.0.7"));
    assert_eq!(result.get("user"), Some("frank"));
    assert_eq!(result.get("timestamp"), Some("10/Oct/2000:13:55:36 -0700"));
    assert_eq!(result.get("request"), Some("/apache_pb.gif"));
    assert_eq!(result.get("httpversion"), Some("1.0"));
    assert_eq!(result.get("size"), Some("2326"));
}

#[test]
fn test_indirect_keys_from_input() {
    assert_eq!(
        extract("%{?k1}=%{&k1}, %{?k2}=%{&k2}", "user=alice, role=admin"),
        owned(&[("user", "alice"), ("role", "admin")])
    );
}

#[test]
fn test_unresolved_reference() {
    let dissector = Dissector::new("%{a} %{&ref}").unwrap();
    assert_eq!(
        dissector.dissect("x y"),
        Err(DissectError::UnresolvedReference("ref".to_string()))
    );
}

#[test]
fn test_no_match_does_not_leak_partial_results() {
    let dissector = Dissector::new("%{a} %{b}|%{c}").unwrap();
    assert!(matches!(
        dissector.dissect("x y z"),
        Err(DissectError::NoMatch { .. })
    ));
    let ok = dissector.dissect("x y|z").unwrap();
    assert_eq!(ok.len(), 3);
}

#[test]
fn test_trimmed_dissect() {
    let dissector = Dissector::new("%{a}|%{b}").unwrap();
    let trimmer = Trimmer::new(TrimMode::All, " ");
    let result = dissector.dissect_trimmed(" foo  | bar ", &trimmer).unwrap();
    assert_eq!(result.get("a"), Some("foo"));
    assert_eq!(result.get("b"), Some("bar"));
}

#[test]
fn test_purity() {
    let dissector = Dissector::new("%{?k}=%{&k} %{+v} %{+v}").unwrap();
    let first = dissector.dissect("name=x 1 2").unwrap();
    let second = dissector.dissect("name=x 1 2").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.get("name"), Some("x"));
    assert_eq!(first.get("v"), Some("1 2"));
}
