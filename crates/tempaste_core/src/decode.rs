//! Strict JSON request body decoding.
//!
//! Bodies must be exactly one JSON object matching the target type. Unknown
//! fields and trailing data are rejected instead of ignored, and every failure
//! is classified so the HTTP layer can pick a status and a precise message.

use serde::de::{Deserialize, DeserializeOwned, IgnoredAny};
use serde_json::error::Category;
use thiserror::Error;

/// The only media type accepted for request bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Classified request body decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Content-Type header is not application/json")]
    UnsupportedMediaType,

    #[error("Request body contains badly-formed JSON (at position {offset})")]
    Syntax { offset: usize },

    #[error("Request body contains badly-formed JSON")]
    Truncated,

    #[error("Request body contains an invalid value for the {field:?} field (at position {offset})")]
    TypeMismatch { field: String, offset: usize },

    #[error("Request body contains unknown field {0:?}")]
    UnknownField(String),

    #[error("Request body must not be empty")]
    Empty,

    #[error("Request body must only contain a single JSON object")]
    MultipleObjects,

    #[error("Request body must be a JSON object (at position {offset})")]
    NotAnObject { offset: usize },

    #[error("Request body must not be larger than {limit} bytes")]
    TooLarge { limit: usize },
}

/// Check a `Content-Type` header value against [`JSON_MEDIA_TYPE`].
///
/// Parameters such as `charset` are ignored; the media type itself is
/// compared case-insensitively.
pub fn is_json_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .eq_ignore_ascii_case(JSON_MEDIA_TYPE)
}

/// Accept an undeclared or blank `Content-Type`, or one naming JSON.
///
/// # Errors
/// [`DecodeError::UnsupportedMediaType`] for any other declared type.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), DecodeError> {
    match content_type.filter(|value| !value.trim().is_empty()) {
        Some(content_type) if !is_json_media_type(content_type) => {
            Err(DecodeError::UnsupportedMediaType)
        }
        _ => Ok(()),
    }
}

/// Decode a request body into `T`.
///
/// # Arguments
/// - `content_type`: Declared `Content-Type`, if the request carried one.
///   A blank value counts as undeclared.
/// - `body`: Raw body bytes.
/// - `max_bytes`: Size cap for `body`.
///
/// # Returns
/// The decoded value.
///
/// # Errors
/// Returns the [`DecodeError`] matching the first rule the body breaks, in
/// order: media type, size, emptiness, top-level shape, structure,
/// trailing data.
pub fn decode_json_body<T: DeserializeOwned>(
    content_type: Option<&str>,
    body: &[u8],
    max_bytes: usize,
) -> Result<T, DecodeError> {
    check_content_type(content_type)?;
    if body.len() > max_bytes {
        return Err(DecodeError::TooLarge { limit: max_bytes });
    }
    let Some(start) = body.iter().position(|byte| !is_json_whitespace(*byte)) else {
        return Err(DecodeError::Empty);
    };
    // Derived struct impls also accept the sequence form; only objects are bodies.
    if body[start] != b'{' {
        return Err(non_object_error(body, start));
    }

    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize::<_, T>(&mut deserializer)
        .map_err(|err| classify(err, body))?;

    // A second value of any shape, even a malformed one, means trailing data.
    if deserializer.into_iter::<IgnoredAny>().next().is_some() {
        return Err(DecodeError::MultipleObjects);
    }

    Ok(value)
}

fn is_json_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// A well-formed non-object value is `NotAnObject`; malformed input keeps its
/// syntax classification.
fn non_object_error(body: &[u8], start: usize) -> DecodeError {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    match IgnoredAny::deserialize(&mut deserializer) {
        Ok(_) => DecodeError::NotAnObject { offset: start + 1 },
        Err(err) => classify_json(err, body, String::new()),
    }
}

fn classify(err: serde_path_to_error::Error<serde_json::Error>, body: &[u8]) -> DecodeError {
    let field = err.path().to_string();
    classify_json(err.into_inner(), body, field)
}

fn classify_json(inner: serde_json::Error, body: &[u8], field: String) -> DecodeError {
    let offset = byte_offset(body, inner.line(), inner.column());
    match inner.classify() {
        Category::Eof => DecodeError::Truncated,
        Category::Syntax | Category::Io => DecodeError::Syntax { offset },
        Category::Data => match unknown_field_name(&inner.to_string()) {
            Some(name) => DecodeError::UnknownField(name),
            None => DecodeError::TypeMismatch { field, offset },
        },
    }
}

fn unknown_field_name(message: &str) -> Option<String> {
    let rest = message.strip_prefix("unknown field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

/// Convert serde_json's 1-based line/column into a byte offset into `body`.
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let line_start: usize = body
        .split_inclusive(|byte| *byte == b'\n')
        .take(line.saturating_sub(1))
        .map(<[u8]>::len)
        .sum();
    (line_start + column).min(body.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::paste::{CreatePasteRequest, DeletePasteRequest, EditPasteRequest};

    const LIMIT: usize = 1024;

    fn decode_create(body: &str) -> Result<CreatePasteRequest, DecodeError> {
        decode_json_body(Some("application/json"), body.as_bytes(), LIMIT)
    }

    #[test]
    fn decodes_single_object_with_known_fields() {
        let req = decode_create(
            r#"{"content":["a","b"],"name":"notes","fileType":"rust","expiresIn":3}"#,
        )
        .expect("valid body");
        assert_eq!(req.content, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(req.name.as_deref(), Some("notes"));
        assert_eq!(req.file_type.as_deref(), Some("rust"));
        assert_eq!(req.expires_in, Some(3));
    }

    #[test]
    fn accepts_lowercase_filetype_alias() {
        let req = decode_create(r#"{"content":["a"],"filetype":"go"}"#).expect("alias");
        assert_eq!(req.file_type.as_deref(), Some("go"));
    }

    #[test]
    fn content_type_matrix() {
        let body = br#"{"content":["a"]}"#;
        for accepted in [
            None,
            Some("application/json"),
            Some("application/json; charset=utf-8"),
            Some("Application/JSON"),
            Some(""),
        ] {
            decode_json_body::<CreatePasteRequest>(accepted, body, LIMIT)
                .unwrap_or_else(|err| panic!("{:?} should be accepted: {}", accepted, err));
        }
        for rejected in ["text/plain", "application/jsonp", "multipart/form-data"] {
            let err = decode_json_body::<CreatePasteRequest>(Some(rejected), body, LIMIT)
                .expect_err("non-json media type");
            assert_eq!(err, DecodeError::UnsupportedMediaType, "{}", rejected);
        }
    }

    #[test]
    fn content_type_check_stands_alone() {
        assert_eq!(check_content_type(None), Ok(()));
        assert_eq!(check_content_type(Some("  ")), Ok(()));
        assert_eq!(check_content_type(Some("application/json;charset=utf-8")), Ok(()));
        assert_eq!(
            check_content_type(Some("text/html")),
            Err(DecodeError::UnsupportedMediaType)
        );
    }

    #[test]
    fn media_type_is_checked_before_body_shape() {
        let err = decode_json_body::<CreatePasteRequest>(Some("text/plain"), b"", LIMIT)
            .expect_err("media type wins");
        assert_eq!(err, DecodeError::UnsupportedMediaType);
    }

    #[test]
    fn rejects_unknown_field_by_name() {
        let err = decode_create(r#"{"content":["x"],"bogus":1}"#).expect_err("unknown field");
        assert_eq!(err, DecodeError::UnknownField("bogus".to_string()));
        assert_eq!(
            err.to_string(),
            "Request body contains unknown field \"bogus\""
        );
    }

    #[test]
    fn rejects_two_concatenated_objects() {
        let err = decode_create(r#"{"content":["a"]}{"content":["b"]}"#)
            .expect_err("two objects");
        assert_eq!(err, DecodeError::MultipleObjects);
    }

    #[test]
    fn rejects_trailing_garbage_as_multiple_objects() {
        let err = decode_create(r#"{"content":["a"]} }"#).expect_err("trailing data");
        assert_eq!(err, DecodeError::MultipleObjects);
    }

    #[test]
    fn allows_trailing_whitespace() {
        decode_create("{\"content\":[\"a\"]}\n\r\n  ").expect("whitespace is not a value");
    }

    #[test]
    fn empty_and_whitespace_bodies_are_empty() {
        for body in ["", "   ", "\n\t"] {
            assert_eq!(decode_create(body).expect_err("empty"), DecodeError::Empty);
        }
    }

    #[test]
    fn oversized_body_is_too_large() {
        let body = format!(r#"{{"content":["{}"]}}"#, "x".repeat(LIMIT));
        let err = decode_create(&body).expect_err("over limit");
        assert_eq!(err, DecodeError::TooLarge { limit: LIMIT });
        assert_eq!(
            err.to_string(),
            format!("Request body must not be larger than {} bytes", LIMIT)
        );
    }

    #[test]
    fn syntax_error_reports_byte_offset() {
        let err = decode_create(r#"{"content" ["a"]}"#).expect_err("missing colon");
        assert_eq!(err, DecodeError::Syntax { offset: 12 });
    }

    #[test]
    fn syntax_offset_counts_previous_lines() {
        let err = decode_create("{\n\"content\" [\"a\"]}").expect_err("missing colon");
        match err {
            DecodeError::Syntax { offset } => assert_eq!(offset, 13),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn top_level_non_objects_are_rejected() {
        let err = decode_create(r#"[["a"],null,null,null,null,null]"#).expect_err("array body");
        assert_eq!(err, DecodeError::NotAnObject { offset: 1 });
        assert_eq!(
            err.to_string(),
            "Request body must be a JSON object (at position 1)"
        );

        for body in [r#""content""#, "null", "42", "true"] {
            assert_eq!(
                decode_create(body).expect_err("scalar body"),
                DecodeError::NotAnObject { offset: 1 },
                "{}",
                body
            );
        }

        let err = decode_json_body::<DeletePasteRequest>(None, br#"  ["k"]"#, LIMIT)
            .expect_err("array delete body");
        assert_eq!(err, DecodeError::NotAnObject { offset: 3 });
    }

    #[test]
    fn malformed_non_object_is_still_a_syntax_error() {
        assert!(matches!(
            decode_create("nope"),
            Err(DecodeError::Syntax { .. })
        ));
        assert_eq!(decode_create(r#"["a""#), Err(DecodeError::Truncated));
    }

    #[test]
    fn truncated_body_is_distinct_from_syntax() {
        let err = decode_create(r#"{"content": ["a""#).expect_err("truncated");
        assert_eq!(err, DecodeError::Truncated);
    }

    #[test]
    fn type_mismatch_names_the_field() {
        let err = decode_create(r#"{"content":"abc"}"#).expect_err("wrong type");
        match err {
            DecodeError::TypeMismatch { field, offset } => {
                assert_eq!(field, "content");
                assert!(offset > 0 && offset <= r#"{"content":"abc"}"#.len());
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }

        let err: DecodeError = decode_json_body::<EditPasteRequest>(
            None,
            br#"{"accessKey":"k","expiresIn":"ten"}"#,
            LIMIT,
        )
        .expect_err("wrong type");
        assert!(
            matches!(err, DecodeError::TypeMismatch { ref field, .. } if field == "expiresIn"),
            "{:?}",
            err
        );
    }

    #[test]
    fn delete_body_only_knows_access_key() {
        let req: DeletePasteRequest =
            decode_json_body(None, br#"{"accessKey":"abc"}"#, LIMIT).expect("delete body");
        assert_eq!(req.access_key.as_deref(), Some("abc"));

        let err = decode_json_body::<DeletePasteRequest>(
            None,
            br#"{"accessKey":"abc","content":["x"]}"#,
            LIMIT,
        )
        .expect_err("content is not a delete field");
        assert_eq!(err, DecodeError::UnknownField("content".to_string()));
    }

    #[test]
    fn byte_offset_clamps_to_body_length() {
        assert_eq!(byte_offset(b"abc", 1, 10), 3);
        assert_eq!(byte_offset(b"ab\ncd", 2, 1), 4);
    }
}
