//! Detail dump and JSON report

use cryypt_failure::{
    detail, fields, new, opaque, translate, Context, Field, Key, Message, Report, Stack,
};
use std::fmt;
use std::io;

fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

#[derive(Debug)]
struct Tenant(&'static str);

impl Field for Tenant {
    fn key(&self) -> Key {
        Key::new("tenant")
    }

    fn format_error(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tenant={}", self.0)
    }
}

#[inline(never)]
fn low_level() -> Stack {
    let io_error = io::Error::from(io::ErrorKind::ConnectionReset);
    translate(io_error, "db_down", fields![Context::from([("table", "users")])])
}

#[inline(never)]
fn high_level() -> Stack {
    let low = low_level();
    opaque(low, fields![Message::new("try again later"), Tenant("acme")])
}

#[test]
fn test_detail_dump() {
    init_logger();
    let err = high_level();
    let text = err.detail().to_string();
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].starts_with("[report_test::high_level] "));
    assert_eq!(lines[1], "    message(\"try again later\")");
    assert_eq!(lines[2], "    tenant=acme");
    assert!(lines[3].starts_with("[report_test::low_level] "));
    assert_eq!(lines[4], "    code(db_down)");
    assert_eq!(lines[5], "    {table=users}");
    assert_eq!(lines[6], "    error(\"connection reset\")");
    assert_eq!(lines[7], "[CallStack]");
    // the origin call stack is the one captured in low_level
    assert!(lines[8].starts_with("    [report_test::low_level] "));
    assert!(lines[9].starts_with("    [report_test::high_level] "));

    assert_eq!(detail(&err).to_string(), text);
}

#[test]
fn test_detail_without_call_stack() {
    init_logger();
    let err = Stack::new(None, [fields![Message::new("bare")]]);
    assert_eq!(err.detail().to_string(), "    message(\"bare\")\n[CallStack]\n");
}

#[test]
fn test_report_entries() {
    init_logger();
    let err = high_level();
    let report = Report::from_error(&err);

    assert_eq!(report.detail.len(), 3);

    let outer = &report.detail[0];
    assert_eq!(
        outer.frame.as_ref().map(|f| f.func.as_str()),
        Some("report_test::high_level")
    );
    assert_eq!(outer.message.as_deref(), Some("try again later"));
    assert_eq!(
        outer.fields.get("tenant").map(String::as_str),
        Some("tenant=acme")
    );
    assert!(outer.code.is_none());

    let inner = &report.detail[1];
    assert_eq!(inner.code.as_deref(), Some("db_down"));
    assert_eq!(
        inner.context.as_ref().and_then(|c| c.get("table")).map(String::as_str),
        Some("users")
    );

    let raw = &report.detail[2];
    assert_eq!(raw.raw_error.as_deref(), Some("connection reset"));
    assert!(raw.frame.is_none());

    assert_eq!(
        report.call_stack.first().map(|f| f.func.as_str()),
        Some("report_test::low_level")
    );
    assert!(report.call_stack[0].source.contains("report_test.rs:"));
}

#[test]
fn test_report_json() {
    init_logger();
    let err = new("quota", fields![]);
    let report = Report::from_error(&err);

    let json = match report.to_json() {
        Ok(json) => json,
        Err(e) => panic!("report did not serialize: {e}"),
    };
    let value: serde_json::Value = match serde_json::from_str(&json) {
        Ok(value) => value,
        Err(e) => panic!("report is not valid JSON: {e}"),
    };

    assert_eq!(value["detail"][0]["code"], "quota");
    assert_eq!(
        value["detail"][0]["frame"]["func"],
        "report_test::test_report_json"
    );
    assert!(value["detail"][0].get("rawError").is_none());
    assert!(value["callStack"].is_array());

    let back: Report = match serde_json::from_str(&json) {
        Ok(report) => report,
        Err(e) => panic!("report did not deserialize: {e}"),
    };
    assert_eq!(back, report);
    assert!(report.to_json_pretty().is_ok_and(|pretty| pretty.contains('\n')));
}
