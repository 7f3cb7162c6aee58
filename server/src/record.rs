use std::collections::BTreeMap;

use axum::http::{HeaderMap, Method, Uri, Version, header::CONTENT_TYPE, request::Parts};
use serde::{Deserialize, Serialize};

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Normalized snapshot of one inbound request, as written to `log.txt`.
///
/// Every mapping keeps the first value seen for a key. Keys serialize in
/// sorted order so identical requests produce identical documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedRequest {
    pub method: String,
    pub url: String,
    pub header: BTreeMap<String, String>,
    pub get: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub post: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
}

impl CapturedRequest {
    pub fn from_request(parts: &Parts, body: &[u8]) -> Self {
        Self::build(
            &parts.method,
            request_target(parts.version, &parts.uri),
            &parts.uri,
            &parts.headers,
            body,
        )
    }

    /// Treats `uri` as an HTTP/1 request-target.
    pub fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> Self {
        Self::build(method, uri.to_string(), uri, headers, body)
    }

    fn build(method: &Method, url: String, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> Self {
        let post = if method == Method::POST && is_form_urlencoded(headers) {
            parse_form(body).unwrap_or_default()
        } else {
            BTreeMap::new()
        };

        Self {
            method: method.as_str().to_string(),
            url,
            header: collect_headers(headers),
            get: parse_query(uri.query().unwrap_or_default()),
            post,
            data: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Two-space indented JSON.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

/// The target as the client sent it. HTTP/1 keeps origin or absolute form
/// verbatim; HTTP/2 and later carry only `:path` on the wire, the scheme and
/// authority hyper folds into the `Uri` come from separate pseudo-headers.
fn request_target(version: Version, uri: &Uri) -> String {
    if version >= Version::HTTP_2 {
        uri.path_and_query()
            .map_or("/", |path_and_query| path_and_query.as_str())
            .to_string()
    } else {
        uri.to_string()
    }
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut header = BTreeMap::new();

    for name in headers.keys() {
        let Some(value) = headers.get(name) else {
            continue;
        };

        let name = sanitize_header_name(name.as_str());
        if name.is_empty() {
            continue;
        }

        let value = String::from_utf8_lossy(value.as_bytes()).trim().to_string();
        header.entry(name).or_insert(value);
    }

    header
}

/// `user-agent` -> `User-Agent`, minus quotes and backslashes.
fn sanitize_header_name(name: &str) -> String {
    let mut upper = true;
    let canonical: String = name
        .chars()
        .map(|c| {
            let c = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            c
        })
        .collect();

    canonical.replace(['"', '\\'], "").trim().to_string()
}

fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

/// Query strings keep every well-formed pair; malformed ones are skipped.
fn parse_query(query: &str) -> BTreeMap<String, String> {
    let (pairs, _) = parse_pairs(query.as_bytes());
    first_values(pairs)
}

/// Form bodies are all-or-nothing: a single malformed pair yields `None`.
fn parse_form(body: &[u8]) -> Option<BTreeMap<String, String>> {
    match parse_pairs(body) {
        (pairs, false) => Some(first_values(pairs)),
        (_, true) => None,
    }
}

/// Splits `input` on `&` and decodes the well-formed segments. The flag
/// reports whether any segment had to be dropped.
fn parse_pairs(input: &[u8]) -> (Vec<(String, String)>, bool) {
    let mut malformed = false;
    let mut accepted: Vec<&[u8]> = Vec::new();

    for segment in input.split(|&b| b == b'&') {
        if segment.is_empty() {
            continue;
        }
        if is_well_formed(segment) {
            accepted.push(segment);
        } else {
            malformed = true;
        }
    }

    let joined = accepted.join(&b'&');
    match serde_urlencoded::from_bytes::<Vec<(String, String)>>(&joined) {
        Ok(pairs) => (pairs, malformed),
        Err(_) => (Vec::new(), true),
    }
}

fn is_well_formed(segment: &[u8]) -> bool {
    if segment.contains(&b';') {
        return false;
    }

    let mut rest = segment;
    while let Some(pos) = rest.iter().position(|&b| b == b'%') {
        match rest.get(pos + 1..pos + 3) {
            Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                rest = &rest[pos + 3..];
            }
            _ => return false,
        }
    }

    true
}

fn first_values(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();

    for (key, value) in pairs {
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        values
            .entry(key.to_string())
            .or_insert_with(|| value.trim().to_string());
    }

    values
}
