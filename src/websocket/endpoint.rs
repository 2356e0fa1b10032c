//! Endpoint URL construction.
//!
//! `http://host/api` + `/ws/chat` + token becomes
//! `ws://host/api/ws/chat?token=...`.

/// Build the socket URL from a REST base address, a sub-path and an optional token.
///
/// - trailing slashes on the base are dropped
/// - an `/api` segment is inserted when the base does not already end in one
/// - `http`/`https` map to `ws`/`wss`; `ws`/`wss` pass through
/// - the token, when present and non-empty, is URL-encoded into `?token=`
pub fn build_endpoint(api_base_url: &str, ws_path: &str, token: Option<&str>) -> String {
    let mut base = api_base_url.trim().trim_end_matches('/').to_string();
    if !base.ends_with("/api") {
        base.push_str("/api");
    }

    let path = ws_path.trim();
    let mut url = if path.starts_with('/') {
        format!("{}{}", to_ws_scheme(&base), path)
    } else {
        format!("{}/{}", to_ws_scheme(&base), path)
    };

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        let separator = if url.contains('?') { '&' } else { '?' };
        url.push(separator);
        url.push_str("token=");
        url.push_str(&urlencoding::encode(token));
    }

    url
}

fn to_ws_scheme(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if url.starts_with("ws://") || url.starts_with("wss://") {
        url.to_string()
    } else {
        // Bare host[:port]
        format!("ws://{}", url)
    }
}

/// Strip the `token` query value so URLs can be logged.
pub fn redact_token(url: &str) -> String {
    match url.find("token=") {
        Some(idx) => {
            let value_start = idx + "token=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}
