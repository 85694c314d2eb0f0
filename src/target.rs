// Upload target: a possibly partial URL supplied on the command line.
//
// Users may pass a fully qualified URL, a host plus path without a scheme,
// or a bare API path such as `repos/owner/repo/releases/1/assets`. The
// `url` crate refuses anything that is not absolute, so the pieces are kept
// apart here and only assembled into a `Url` once defaults are filled in.

use std::fmt;

use url::form_urlencoded;
use url::Url;

use crate::error::{Result, UploadError};

/// Host used when the target does not name one.
pub const DEFAULT_HOST: &str = "uploads.github.com";
pub const DEFAULT_SCHEME: &str = "https";

/// Decomposed upload URL. `path` is stored percent-encoded, the same way
/// it will appear on the wire. `host` may include an explicit `:port`.
/// Query pairs keep their order and may repeat a key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadTarget {
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl UploadTarget {
    /// Parse a full or partial URL without applying any defaults.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(UploadError::InvalidUrl("empty URL".into()));
        }

        match Url::parse(raw) {
            Ok(url) => Ok(Self::from_url(&url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::from_relative(raw)),
            Err(e) => Err(UploadError::InvalidUrl(format!("{}: {}", raw, e))),
        }
    }

    fn from_url(url: &Url) -> Self {
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{}:{}", h, p),
            (Some(h), None) => h.to_string(),
            (None, _) => String::new(),
        };

        UploadTarget {
            scheme: url.scheme().to_string(),
            host,
            path: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
        }
    }

    // Handles `//host/path` and bare `path?query` forms.
    fn from_relative(raw: &str) -> Self {
        let raw = raw.split_once('#').map_or(raw, |(before, _)| before);
        let (rest, query) = match raw.split_once('?') {
            Some((rest, q)) => (rest, parse_query(q)),
            None => (raw, Vec::new()),
        };

        let (host, path) = match rest.strip_prefix("//") {
            Some(authority_and_path) => {
                let (authority, path) = match authority_and_path.find('/') {
                    Some(i) => authority_and_path.split_at(i),
                    None => (authority_and_path, ""),
                };
                // drop any userinfo
                let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
                (host.to_string(), path.to_string())
            }
            None => (String::new(), rest.to_string()),
        };

        UploadTarget {
            scheme: String::new(),
            host,
            path,
            query,
        }
    }

    /// Fill in missing pieces so the target is a complete absolute URL.
    ///
    /// A path without a leading slash and no host is read as
    /// `host/rest/of/path`. Afterwards host and scheme fall back to
    /// [`DEFAULT_HOST`] and [`DEFAULT_SCHEME`].
    pub fn normalize(&mut self) {
        if !self.path.starts_with('/') {
            if self.host.is_empty() {
                let (host, rest) = match self.path.split_once('/') {
                    Some((host, rest)) => (host.to_string(), rest.to_string()),
                    None => (self.path.clone(), String::new()),
                };
                self.host = host;
                self.path = rest;
            }
            self.path.insert(0, '/');
        }

        if self.host.is_empty() {
            self.host = DEFAULT_HOST.to_string();
        }

        if self.scheme.is_empty() {
            self.scheme = DEFAULT_SCHEME.to_string();
        }
    }

    /// Set a query parameter, dropping every existing value for `key`.
    /// Other parameters, repeated ones included, are left as they are.
    pub fn set_query(&mut self, key: &str, value: &str) {
        self.query.retain(|(k, _)| k != key);
        self.query.push((key.to_string(), value.to_string()));
    }

    /// First value for `key`, if any.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_url(&self) -> Result<Url> {
        Url::parse(&self.to_string())
            .map_err(|e| UploadError::InvalidUrl(format!("{}: {}", self, e)))
    }
}

impl fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)?;
        if !self.query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{}", encoded)?;
        }
        Ok(())
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(raw: &str) -> UploadTarget {
        let mut target = UploadTarget::parse(raw).unwrap();
        target.normalize();
        target
    }

    #[test]
    fn full_url_is_left_alone() {
        let target = normalized("https://example.com/repos/o/r/releases/1/assets");
        assert_eq!(target.scheme, "https");
        assert_eq!(target.host, "example.com");
        assert_eq!(target.path, "/repos/o/r/releases/1/assets");
    }

    #[test]
    fn bare_path_uses_first_segment_as_host() {
        let target = normalized("uploads.example.org/repos/o/r/releases/1/assets");
        assert_eq!(target.host, "uploads.example.org");
        assert_eq!(target.path, "/repos/o/r/releases/1/assets");
        assert_eq!(target.scheme, "https");
    }

    #[test]
    fn absolute_path_gets_default_host() {
        let target = normalized("/repos/o/r/releases/1/assets");
        assert_eq!(target.host, DEFAULT_HOST);
        assert_eq!(target.path, "/repos/o/r/releases/1/assets");
        assert_eq!(
            target.to_string(),
            "https://uploads.github.com/repos/o/r/releases/1/assets"
        );
    }

    #[test]
    fn single_segment_normalizes_to_root() {
        let target = normalized("uploads.github.com");
        assert_eq!(target.host, "uploads.github.com");
        assert_eq!(target.path, "/");
    }

    #[test]
    fn scheme_relative_keeps_host() {
        let target = normalized("//api.example.com:8443/up?x=1#frag");
        assert_eq!(target.scheme, "https");
        assert_eq!(target.host, "api.example.com:8443");
        assert_eq!(target.path, "/up");
        assert_eq!(target.query_value("x"), Some("1"));
    }

    #[test]
    fn explicit_scheme_and_port_survive() {
        let target = normalized("http://127.0.0.1:8080/assets?name=old");
        assert_eq!(target.scheme, "http");
        assert_eq!(target.host, "127.0.0.1:8080");
        assert_eq!(target.query_value("name"), Some("old"));
    }

    #[test]
    fn set_query_replaces_name() {
        let mut target = normalized("http://127.0.0.1:8080/assets?name=old&label=x");
        target.set_query("name", "new file.zip");
        let url = target.to_url().unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("label".to_string(), "x".to_string()),
                ("name".to_string(), "new file.zip".to_string()),
            ]
        );
    }

    #[test]
    fn repeated_keys_survive_set_query() {
        let mut target = normalized("https://h/a?label=x&name=old&label=y");
        target.set_query("name", "n");
        assert_eq!(target.to_string(), "https://h/a?label=x&label=y&name=n");
        assert_eq!(target.query_value("name"), Some("n"));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            UploadTarget::parse("   "),
            Err(UploadError::InvalidUrl(_))
        ));
    }

    #[test]
    fn malformed_absolute_url_is_rejected() {
        assert!(matches!(
            UploadTarget::parse("http://[::1/assets"),
            Err(UploadError::InvalidUrl(_))
        ));
    }
}
