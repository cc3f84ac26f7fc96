//! The host's current location, split the way the DOM `Location` splits it.
//!
//! Parsing and relative resolution go through the [`url`] crate, which
//! follows the WHATWG URL standard that browsers implement.

use crate::error::RouterError;
use url::Url;

/// A parsed location: `protocol//hostname:port pathname search hash`.
///
/// Field values follow DOM conventions: `protocol` keeps its trailing `:`,
/// `search` and `hash` keep their leading `?`/`#` and are empty when absent,
/// and `port` is empty for the scheme's default port.
///
/// ```
/// use spa_navigator::Location;
///
/// let loc = Location::parse("https://example.com:8443/blog/post?x=1#top").unwrap();
/// assert_eq!(loc.protocol, "https:");
/// assert_eq!(loc.port, "8443");
/// assert_eq!(loc.pathname, "/blog/post");
/// assert_eq!(loc.search, "?x=1");
/// assert_eq!(loc.hash, "#top");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub protocol: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

impl Location {
    /// Parse an absolute URL.
    pub fn parse(href: &str) -> Result<Self, RouterError> {
        let url = Url::parse(href).map_err(|err| RouterError::invalid_url(href, err))?;
        Ok(Self::from_url(&url))
    }

    /// Split an already-parsed URL.
    pub fn from_url(url: &Url) -> Self {
        Self {
            protocol: format!("{}:", url.scheme()),
            hostname: url.host_str().unwrap_or_default().to_string(),
            port: url.port().map(|port| port.to_string()).unwrap_or_default(),
            pathname: url.path().to_string(),
            search: prefixed('?', url.query()),
            hash: prefixed('#', url.fragment()),
        }
    }

    /// Resolve `href` against this location, as an anchor's `href` property
    /// would be.
    pub fn resolve(&self, href: &str) -> Result<Self, RouterError> {
        let base = Url::parse(&self.href()).map_err(|err| RouterError::invalid_url(href, err))?;
        let url = base
            .join(href)
            .map_err(|err| RouterError::invalid_url(href, err))?;
        Ok(Self::from_url(&url))
    }

    /// The full URL.
    pub fn href(&self) -> String {
        let port = if self.port.is_empty() {
            String::new()
        } else {
            format!(":{}", self.port)
        };
        format!(
            "{}//{}{}{}{}{}",
            self.protocol, self.hostname, port, self.pathname, self.search, self.hash
        )
    }

    /// `pathname + search + hash`, the form the router navigates with.
    pub fn path(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }

    /// Same protocol, hostname, and port as `other`.
    ///
    /// An empty port on `self` also accepts an explicit `80` or `443` on
    /// `other`, since some hosts report the default port as empty.
    pub fn same_origin(&self, other: &Location) -> bool {
        self.protocol == other.protocol
            && self.hostname == other.hostname
            && (self.port == other.port
                || (self.port.is_empty() && (other.port == "80" || other.port == "443")))
    }

    /// Same pathname and search as `other`, ignoring the fragment.
    pub fn same_path(&self, other: &Location) -> bool {
        self.pathname == other.pathname && self.search == other.search
    }

    /// `true` for `file:` locations.
    pub fn is_file(&self) -> bool {
        self.protocol == "file:"
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            protocol: "http:".to_string(),
            hostname: "localhost".to_string(),
            port: String::new(),
            pathname: "/".to_string(),
            search: String::new(),
            hash: String::new(),
        }
    }
}

fn prefixed(marker: char, part: Option<&str>) -> String {
    match part {
        Some(part) if !part.is_empty() => format!("{marker}{part}"),
        _ => String::new(),
    }
}
