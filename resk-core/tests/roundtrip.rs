//! Roundtrip tests for the dump codec.
//!
//! Each `#[case]` is isolated: no shared state.

use resk_core::{
    dump::{self, Dump},
    DumpError, RemoteRef, SnippetName,
};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entry(name: &str, id: &str) -> (SnippetName, RemoteRef) {
    (
        SnippetName::from(name),
        RemoteRef {
            id: id.to_string(),
            html_url: format!("https://gist.github.com/{id}"),
        },
    )
}

fn empty_dump() -> Dump {
    Dump::new()
}

fn typical_dump() -> Dump {
    [
        entry("schema.ts", "aa5a315d61ae9438b18d"),
        entry("fruits.ts", "0f3b9c1e"),
        entry("users.ts", "77e2a1"),
    ]
    .into_iter()
    .collect()
}

fn unicode_dump() -> Dump {
    [
        entry("пользователь.ts", "u1"),
        entry("日本語 & <spéçïal> \"quotes\".jsx", "u2"),
        entry("🚀.rs", "u3"),
    ]
    .into_iter()
    .collect()
}

// ---------------------------------------------------------------------------
// Parameterised roundtrip test
// ---------------------------------------------------------------------------

#[rstest]
#[case("empty", empty_dump())]
#[case("typical", typical_dump())]
#[case("unicode_names", unicode_dump())]
fn dump_roundtrip(#[case] label: &str, #[case] original: Dump) {
    let blob = dump::encode(&original).unwrap_or_else(|e| panic!("[{label}] encode failed: {e}"));
    let back = dump::decode(Some(&blob)).unwrap_or_else(|e| panic!("[{label}] decode failed: {e}"));
    assert_eq!(original, back, "[{label}] dump changed across roundtrip");
}

#[test]
fn encoding_is_deterministic() {
    let a = dump::encode(&typical_dump()).expect("encode");
    let b = dump::encode(&typical_dump()).expect("encode");
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Malformed blobs never decode to an empty dump
// ---------------------------------------------------------------------------

#[rstest]
#[case("not_base64", "%%%")]
#[case("truncated", "eyJzY2hlbWEudHMiOnsiaWQiOiJhIiwiaHRtbF91cmwiOiJ1In0")]
#[case("json_array", "WzEsMiwzXQ==")]
#[case("missing_html_url", "eyJhLnRzIjp7ImlkIjoiMSJ9fQ==")]
fn malformed_blob_is_rejected(#[case] label: &str, #[case] blob: &str) {
    let result: Result<Dump, DumpError> = dump::decode(Some(blob));
    assert!(result.is_err(), "[{label}] expected an error, got {result:?}");
}
