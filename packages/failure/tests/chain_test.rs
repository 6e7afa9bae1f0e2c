//! Chain traversal through stacks and foreign wrappers

use cryypt_failure::{
    cause_of, chain, fields, force_unwrap_once, forced_chain, unwrap_once, Capability, Code,
    Message, Stack, Traversal,
};
use std::error::Error;
use std::io;

fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

#[derive(Debug, thiserror::Error)]
#[error("leaf failure")]
struct Leaf;

#[derive(Debug, thiserror::Error)]
#[error("wrapped: {0}")]
struct Wrapped(#[source] Stack);

fn node(code: &'static str, under: Option<cryypt_failure::BoxError>) -> Stack {
    Stack::new(under, [fields![Code::new(code)]])
}

fn texts(errors: impl Iterator<Item = impl ToString>) -> Vec<String> {
    errors.map(|e| e.to_string()).collect()
}

#[test]
fn test_plain_chain_visits_every_node() {
    init_logger();
    let inner = node("inner", Some(Box::new(Leaf)));
    let outer = node("outer", Some(Box::new(inner)));

    let visited = texts(chain(&outer));
    assert_eq!(
        visited,
        vec![
            "(code=outer): (code=inner): leaf failure",
            "(code=inner): leaf failure",
            "leaf failure",
        ]
    );
    assert_eq!(chain(&outer).traversal(), Traversal::Plain);
    assert!(cause_of(&outer).is::<Leaf>());
}

#[test]
fn test_opaque_boundary() {
    init_logger();
    let hidden = node("hidden", Some(Box::new(Leaf)));
    let opaque = Stack::new_opaque(Box::new(hidden), [fields![Message::new("boundary")]]);

    // plain traversal ends at the opaque node
    assert_eq!(chain(&opaque).count(), 1);
    assert!(unwrap_once(&opaque).is_none());
    assert!(cause_of(&opaque).is::<Stack>());

    // forced traversal reaches the hidden error
    let forced: Vec<_> = forced_chain(&opaque).collect();
    assert_eq!(forced.len(), 3);
    assert!(forced[2].is::<Leaf>());
    assert!(force_unwrap_once(&opaque).is_some_and(|e| e.is::<Stack>()));
    assert!(forced_chain(&opaque).count() > chain(&opaque).count());
}

#[test]
fn test_foreign_wrapper_between_stacks() {
    init_logger();
    let inner = node("inner", None);
    let wrapped = Wrapped(node("middle", Some(Box::new(inner))));
    let outer = Stack::new(Some(Box::new(wrapped)), [fields![Message::new("top")]]);

    let kinds: Vec<Capability> = chain(&outer).map(Capability::of).collect();
    assert_eq!(
        kinds,
        vec![
            Capability::Node,
            Capability::Source,
            Capability::Node,
            Capability::Node,
        ]
    );
}

#[test]
fn test_io_error_payload_is_reached() {
    init_logger();
    let inner = node("io_inner", None);
    let io_error = io::Error::other(inner);
    // io::Error::source skips its payload
    assert!(io_error.source().is_none());

    let outer = Stack::new(Some(Box::new(io_error)), [fields![Code::new("outer")]]);
    let visited: Vec<_> = chain(&outer).collect();

    assert_eq!(visited.len(), 3);
    assert_eq!(Capability::of(visited[1]), Capability::CauseAccessor);
    assert!(visited[2].is::<Stack>());
    assert_eq!(visited[2].to_string(), "(code=io_inner)");
}

#[test]
fn test_plain_io_error_ends_the_chain() {
    init_logger();
    let outer = node("outer", Some(Box::new(io::Error::from(io::ErrorKind::NotFound))));
    assert_eq!(chain(&outer).count(), 2);
    assert!(cause_of(&outer).is::<io::Error>());
}

#[test]
fn test_io_error_text_payload_is_not_a_cause() {
    init_logger();
    let io_error = io::Error::new(io::ErrorKind::NotFound, "config.toml");
    assert!(io_error.get_ref().is_some());
    assert!(cause_of(&io_error).is::<io::Error>());
    assert_eq!(chain(&io_error).count(), 1);

    let outer = Stack::new(Some(Box::new(io_error)), [fields![Message::new("loading")]]);
    let visited = texts(chain(&outer));
    assert_eq!(visited, vec!["[message(\"loading\")]: config.toml", "config.toml"]);
    assert!(cause_of(&outer).is::<io::Error>());
}

#[test]
fn test_io_error_payload_with_source_is_followed() {
    init_logger();
    let io_error = io::Error::other(Wrapped(node("inner", None)));
    let visited: Vec<_> = chain(&io_error).collect();

    assert_eq!(visited.len(), 3);
    assert!(visited[1].is::<Wrapped>());
    assert!(cause_of(&io_error).is::<Stack>());
}

#[test]
fn test_anyhow_context_chain() {
    init_logger();
    let inner = node("db_down", Some(Box::new(Leaf)));
    let err = anyhow::Error::new(inner).context("loading profile");
    let root: &(dyn Error + 'static) = err.as_ref();

    let visited = texts(chain(root));
    assert_eq!(
        visited,
        vec![
            "loading profile",
            "(code=db_down): leaf failure",
            "leaf failure",
        ]
    );
}

#[test]
fn test_chain_is_fused() {
    init_logger();
    let leaf = node("leaf", None);
    let mut iter = chain(&leaf);
    assert!(iter.next().is_some());
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}
