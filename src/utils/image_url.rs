use url::Url;

const SECURE_SCHEME: &str = "https://";

/// True when `value` is already a fetchable `http`/`https` URL.
pub fn has_http_scheme(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Turns a stored image path into a URL the console can render.
///
/// Absent or blank paths map to `placeholder`, absolute `http(s)` URLs pass
/// through untouched, and anything else is appended to `base_url`.
pub fn resolve_image(path: Option<&str>, base_url: &str, placeholder: &str) -> String {
    let path = match path.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => return placeholder.to_string(),
    };

    if has_http_scheme(path) {
        return path.to_string();
    }

    match (base_url.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base_url.trim_end_matches('/'), path),
        (false, false) if !base_url.is_empty() => format!("{}/{}", base_url, path),
        _ => format!("{}{}", base_url, path),
    }
}

/// Normalizes the `imageUrl` echoed back after a job is created.
pub fn normalize_returned_image_url(raw: &str) -> String {
    let fixed = raw.trim().replace('\\', "/");
    if has_http_scheme(&fixed) {
        fixed
    } else {
        format!("{}{}", SECURE_SCHEME, fixed.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    base_url: String,
    placeholder: String,
}

impl ImageResolver {
    pub fn new(base_url: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn resolve(&self, path: Option<&str>) -> String {
        resolve_image(path, &self.base_url, &self.placeholder)
    }
}
