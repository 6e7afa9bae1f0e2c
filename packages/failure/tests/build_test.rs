//! Everyday constructors, macros and extension traits

use cryypt_failure::{
    bail, call_stack_of, chain, code_of, convert, ensure, error, failure, fields, forced_chain,
    is, mark_unexpected, message_of, messagef, new, opaque, translate, unexpected, wrap, Config,
    Context, Failures, Message, OptionExt, ResultExt, Stack,
};
use std::io;

fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

fn head_func(err: &Stack) -> String {
    err.call_stack()
        .map(|cs| cs.head_frame().func().to_string())
        .unwrap_or_default()
}

#[test]
fn test_new_records_the_caller() {
    init_logger();
    let err = new("not_found", fields![Message::new("no such user")]);

    assert!(is(&err, &["not_found"]));
    assert_eq!(head_func(&err), "test_new_records_the_caller");
    assert_eq!(
        err.to_string(),
        "build_test::test_new_records_the_caller(code=not_found)[message(\"no such user\")]"
    );
}

#[test]
fn test_translate_keeps_the_chain() {
    init_logger();
    let low = new("db_timeout", fields![]);
    let err = translate(low, "unavailable", fields![]);

    assert!(is(&err, &["unavailable"]));
    assert_eq!(chain(&err).count(), 2);
    assert_eq!(head_func(&err), "test_translate_keeps_the_chain");
}

#[test]
fn test_convert_hides_the_old_code() {
    init_logger();
    let low = new("db_timeout", fields![Context::from([("table", "users")])]);
    let err = convert(low, "unavailable", fields![]);

    assert!(is(&err, &["unavailable"]));
    assert_eq!(chain(&err).count(), 1);
    assert_eq!(forced_chain(&err).count(), 2);
    assert!(err.is_opaque());
}

#[test]
fn test_wrap_keeps_the_code() {
    init_logger();
    let low = new("forbidden", fields![]);
    let err = wrap(low, fields![Message::new("while saving")]);

    assert!(is(&err, &["forbidden"]));
    assert_eq!(message_of(&err), Some(&Message::new("while saving")));
}

#[test]
fn test_text_errors_and_aliases() {
    init_logger();
    let err = error("boom", fields![]);
    assert!(code_of(&err).is_none());
    assert_eq!(chain(&err).last().map(ToString::to_string).as_deref(), Some("boom"));
    assert_eq!(err.to_string(), "build_test::test_text_errors_and_aliases: boom");

    let alias = unexpected("boom", fields![]);
    assert_eq!(chain(&alias).count(), chain(&err).count());
}

#[test]
fn test_opaque_and_alias() {
    init_logger();
    let low = new("secret", fields![]);
    let err = opaque(low.clone(), fields![]);
    assert!(code_of(&err).is_none());
    assert_eq!(forced_chain(&err).count(), 2);

    let alias = mark_unexpected(low, fields![]);
    assert!(alias.is_opaque());
}

#[test]
#[should_panic(expected = "duplicate error field key: code")]
fn test_code_field_conflicts_with_code_argument() {
    init_logger();
    let _ = new("a", fields![cryypt_failure::Code::new("b")]);
}

fn find_user(id: u32) -> Result<&'static str, Stack> {
    ensure!(id != 0, "invalid_id", "id {} is reserved", id);
    if id > 100 {
        bail!("not_found");
    }
    Ok("alice")
}

#[test]
fn test_macros() {
    init_logger();
    assert_eq!(find_user(7).ok(), Some("alice"));

    let reserved = find_user(0).err();
    let reserved = reserved.as_ref();
    assert!(reserved.is_some_and(|e| is(e, &["invalid_id"])));
    assert_eq!(
        reserved.and_then(|e| message_of(e)).map(Message::as_str),
        Some("id 0 is reserved")
    );
    assert_eq!(reserved.map(head_func).as_deref(), Some("find_user"));

    let missing = find_user(101).err();
    assert!(missing.as_ref().is_some_and(|e| is(e, &["not_found"])));

    let direct = failure!("teapot");
    assert_eq!(messagef!("{}-{}", 1, 2), Message::new("1-2"));
    assert!(direct.field::<Message>().is_none());
}

#[test]
fn test_bail_into_boxed_error() {
    init_logger();
    fn check() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        bail!("boxed", "converted");
    }
    let err = check().err();
    let stack = err.as_ref().and_then(|e| e.downcast_ref::<Stack>());
    assert!(stack.is_some_and(|s| is(s, &["boxed"])));
}

fn read_config() -> Result<String, io::Error> {
    Err(io::Error::new(io::ErrorKind::NotFound, "config.toml"))
}

#[test]
fn test_result_ext() {
    init_logger();
    let err = read_config()
        .wrap_err(fields![Message::new("loading config")])
        .err();
    let err = err.as_ref();
    assert_eq!(err.map(head_func).as_deref(), Some("test_result_ext"));
    assert_eq!(err.map(|e| chain(e).count()), Some(2));

    let translated = read_config().translate_err("config_missing", fields![]).err();
    assert!(translated.as_ref().is_some_and(|e| is(e, &["config_missing"])));

    let hidden = read_config().opaque_err(fields![]).err();
    assert!(hidden.as_ref().is_some_and(Stack::is_opaque));

    let mut built = false;
    let ok: Result<u8, io::Error> = Ok(1);
    let value = ok.wrap_err_with(|| {
        built = true;
        fields![]
    });
    assert_eq!(value.ok(), Some(1));
    assert!(!built);
}

#[test]
fn test_option_ext() {
    init_logger();
    assert_eq!(Some(3).ok_or_failure("empty", fields![]).ok(), Some(3));

    let err = None::<u8>.ok_or_failure("empty", fields![]).err();
    let err = err.as_ref();
    assert!(err.is_some_and(|e| is(e, &["empty"])));
    assert_eq!(err.map(head_func).as_deref(), Some("test_option_ext"));
}

#[test]
fn test_failures_factory_config() {
    init_logger();
    let quiet = Failures::with_config(
        Config::default()
            .with_call_stack(false)
            .with_default_message("Something went wrong."),
    );
    let err = quiet.new("rate_limited", fields![]);

    assert!(call_stack_of(&err).is_none());
    assert_eq!(err.to_string(), "(code=rate_limited)");
    assert_eq!(quiet.message_or_default(&err), "Something went wrong.");

    let wrapped = quiet.wrap(err, fields![Message::new("slow down")]);
    assert_eq!(quiet.message_or_default(&wrapped), "slow down");
    assert_eq!(wrapped.to_string(), "[message(\"slow down\")]: (code=rate_limited)");
}

#[test]
fn test_default_factory_captures() {
    init_logger();
    let failures = Failures::default();
    let err = failures.error("bad input", fields![]);

    assert_eq!(head_func(&err), "test_default_factory_captures");
    assert_eq!(failures.config(), &Config::DEFAULT);
    assert_eq!(
        failures.message_or_default(&err),
        "An internal error has occurred. Please contact the developer."
    );
}

#[test]
fn test_config_from_json() {
    init_logger();
    let config: Config = match serde_json::from_str(r#"{"capture_call_stack": false}"#) {
        Ok(config) => config,
        Err(e) => panic!("config did not parse: {e}"),
    };
    assert!(!config.capture_call_stack);
    assert_eq!(config.default_message, Config::DEFAULT.default_message);

    let round = serde_json::to_value(&config).ok();
    assert_eq!(
        round.as_ref().and_then(|v| v.get("capture_call_stack")).cloned(),
        Some(serde_json::Value::Bool(false))
    );
}
