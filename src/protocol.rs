//! Request framing and the raw bytes that come back.
use crate::url::RequestTarget;
use std::borrow::Cow;
use std::fmt;
use std::io;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct HttpVersion {
    major: u32,
    minor: u32,
}

impl HttpVersion {
    const HTTP_1_0: HttpVersion = HttpVersion::new(1, 0);

    const fn new(major: u32, minor: u32) -> Self {
        HttpVersion { major, minor }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HttpMethod {
    Get,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
        }
    }
}


/// A request as it goes out on the wire. Only ever carries a `Host` header and never a body.
#[derive(Debug, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    uri: String,
    version: HttpVersion,
    host: String,
}

impl HttpRequest {
    pub fn get(target: &RequestTarget) -> Self {
        HttpRequest {
            method: HttpMethod::Get,
            uri: target.path.clone(),
            version: HttpVersion::HTTP_1_0,
            host: target.host.clone(),
        }
    }

    /// Write the whole request to `w` and flush it.
    pub fn serialize<W: io::Write>(&self, mut w: W) -> io::Result<()> {
        w.write_all(self.to_string().as_bytes())?;
        w.flush()
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}\r\n", self.method, self.uri, self.version)?;
        write!(f, "Host: {}\r\n", self.host)?;
        write!(f, "\r\n")?;
        Ok(())
    }
}


/// Whatever came back on the connection: status line, headers and as much of the body as
/// fit. Nothing here is parsed.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct RawResponse {
    bytes: Vec<u8>,
}

impl RawResponse {
    pub fn new(bytes: Vec<u8>) -> Self {
        RawResponse { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode as text for printing; invalid UTF-8 is replaced rather than rejected.
    pub fn to_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}
