use crate::error::{Error, Result};
use std::fmt;
use std::str;
use url::Url;

/// Port used whenever the url does not spell one out. The scheme is never consulted, so
/// `https://` urls without a port also end up here.
pub const DEFAULT_PORT: u16 = 80;

/// Where a request goes: the host and port to dial and the path to ask for.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct RequestTarget {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl RequestTarget {
    pub fn new<H: Into<String>, P: Into<String>>(host: H, port: u16, path: P) -> Self {
        RequestTarget {
            host: host.into(),
            port,
            path: path.into(),
        }
    }

    /// Break `input` into host, port and path.
    ///
    /// The path is always non-empty: a url without one resolves to `/`. Query strings and
    /// fragments are not part of the path.
    pub fn resolve(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|e| Error::malformed_url(input, e))?;

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_owned(),
            _ => return Err(Error::malformed_url(input, "missing host")),
        };

        let port = match url.port() {
            Some(port) => port,
            // The url crate drops a port that matches the scheme's default, so check whether
            // the user actually wrote one before falling back.
            None if has_explicit_port(input) => {
                url.port_or_known_default().unwrap_or(DEFAULT_PORT)
            }
            None => DEFAULT_PORT,
        };

        let path = match url.path() {
            "" => "/".to_owned(),
            p => p.to_owned(),
        };

        Ok(RequestTarget { host, port, path })
    }

    /// The `host:port` string handed to the resolver when dialing.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl str::FromStr for RequestTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RequestTarget::resolve(s)
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}{}", self.host, self.port, self.path)
    }
}

/// Whether the authority in `input` spells out a port. Only meaningful for input that already
/// parsed as a url with a host, so everything after the first `:` is the hierarchical part.
fn has_explicit_port(input: &str) -> bool {
    // Same cleanup the url parser does before it looks at anything.
    let input: String = input
        .trim_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let rest = match input.split_once(':') {
        Some((_, rest)) => rest,
        None => return false,
    };
    // Special schemes accept any run of `/` or `\` before the authority, or none at all.
    let rest = rest.trim_start_matches(['/', '\\']);
    let authority = rest.split(['/', '\\', '?', '#']).next().unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    // Skip over ipv6 literals, their colons aren't port separators.
    let after_host = match host_port.rfind(']') {
        Some(i) => &host_port[(i + 1)..],
        None => host_port,
    };
    after_host
        .split_once(':')
        .is_some_and(|(_, port)| !port.is_empty())
}
