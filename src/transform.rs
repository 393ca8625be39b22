//! Single-file transforms: the wrapper strategy and the XML envelope strategy.

use crate::error::JpmlError;
use crate::options::{DEFAULT_INTRO, DEFAULT_OUTRO, Envelope, Transform, WrapperFn};
use crate::xml::xml_to_json;

/// Input of [`generate_jsonp`].
#[derive(Clone, Default)]
pub struct JsonpRequest<'a> {
    pub content_text: &'a str,
    pub content_key: Option<&'a str>,
    pub wrapper: Option<WrapperFn>,
}

/// Input of [`parse`].
#[derive(Debug, Clone, Default)]
pub struct ParseRequest<'a> {
    /// `None` and `Some("")` both produce the empty-object payload.
    pub content_text: Option<&'a str>,
    pub content_key: Option<&'a str>,
    /// Defaults to `loadJpml(`.
    pub intro: Option<&'a str>,
    /// Defaults to `);`.
    pub outro: Option<&'a str>,
}

/// Wraps `content_text` with the request's wrapper, or returns it unchanged.
pub fn generate_jsonp(request: &JsonpRequest<'_>) -> String {
    match &request.wrapper {
        Some(wrapper) => wrapper(request.content_text, request.content_key),
        None => request.content_text.to_string(),
    }
}

/// Parses `content_text` as XML and embeds it as JSON between intro and outro.
///
/// The key, when present and non-empty, is appended verbatim as `,"<key>"`.
///
/// # Errors
///
/// Returns [`JpmlError::Xml`] if the text is not well-formed XML.
pub fn parse(request: &ParseRequest<'_>) -> Result<String, JpmlError> {
    let json = match request.content_text {
        None | Some("") => "{}".to_string(),
        Some(text) => serde_json::to_string(&xml_to_json(text)?)
            .map_err(|e| JpmlError::Serialization(e.to_string()))?,
    };
    let intro = request.intro.unwrap_or(DEFAULT_INTRO);
    let outro = request.outro.unwrap_or(DEFAULT_OUTRO);
    let mut out = String::with_capacity(intro.len() + json.len() + outro.len() + 16);
    out.push_str(intro);
    out.push_str(&json);
    if let Some(key) = request.content_key.filter(|k| !k.is_empty()) {
        out.push_str(",\"");
        out.push_str(key);
        out.push('"');
    }
    out.push_str(outro);
    Ok(out)
}

/// Applies the configured strategy to one file's text.
pub(crate) fn apply(
    transform: &Transform,
    content_text: &str,
    content_key: Option<&str>,
) -> Result<String, JpmlError> {
    match transform {
        Transform::Wrap { wrapper } => Ok(generate_jsonp(&JsonpRequest {
            content_text,
            content_key,
            wrapper: wrapper.clone(),
        })),
        Transform::Envelope(Envelope { intro, outro }) => parse(&ParseRequest {
            content_text: Some(content_text),
            content_key,
            intro: Some(intro.as_str()),
            outro: Some(outro.as_str()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn default_wrapper_is_identity() {
        let out = generate_jsonp(&JsonpRequest {
            content_text: "body { color: red }",
            content_key: Some("ignored.css"),
            wrapper: None,
        });
        assert_eq!(out, "body { color: red }");
    }

    #[test]
    fn custom_wrapper_sees_key() {
        let wrapper: WrapperFn = Arc::new(|text: &str, key: Option<&str>| {
            format!("define({:?},{:?});", key.unwrap_or(""), text)
        });
        let out = generate_jsonp(&JsonpRequest {
            content_text: "x",
            content_key: Some("k"),
            wrapper: Some(wrapper),
        });
        assert_eq!(out, r#"define("k","x");"#);
    }

    #[test]
    fn empty_text_yields_empty_object() {
        let keyed = parse(&ParseRequest {
            content_text: Some(""),
            content_key: Some("K"),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(keyed, r#"loadJpml({},"K");"#);
        let bare = parse(&ParseRequest::default()).unwrap();
        assert_eq!(bare, "loadJpml({});");
    }

    #[test]
    fn xml_is_embedded_with_custom_envelope() {
        let out = parse(&ParseRequest {
            content_text: Some("<t><s>hi</s></t>"),
            content_key: Some("t.xml"),
            intro: Some("cb("),
            outro: Some(")"),
        })
        .unwrap();
        assert_eq!(out, r#"cb({"t":{"s":["hi"]}},"t.xml")"#);
    }

    #[test]
    fn empty_key_is_omitted() {
        let out = parse(&ParseRequest {
            content_text: Some("<a/>"),
            content_key: Some(""),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(out, r#"loadJpml({"a":""});"#);
    }

    #[test]
    fn apply_dispatches_on_strategy() {
        let envelope = Transform::Envelope(Envelope::default());
        assert!(matches!(
            apply(&envelope, "<a>", None),
            Err(JpmlError::Xml(_))
        ));
        assert_eq!(apply(&Transform::default(), "<a>", None).unwrap(), "<a>");
    }
}
