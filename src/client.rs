use crate::error::{Error, Result};
use crate::protocol::{HttpRequest, RawResponse};
use crate::url::RequestTarget;
use log::{debug, trace};
use std::io;
use std::net::TcpStream;

/// Capacity of the one read made in `ReadPolicy::Single` mode.
pub const READ_BUFFER_SIZE: usize = 1024;

/// How much of the response to collect.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReadPolicy {
    /// One read of at most `READ_BUFFER_SIZE` bytes. Anything past that is dropped.
    #[default]
    Single,
    /// Keep reading until the server closes the connection.
    Drain,
}

/// Opens the connection a request is sent over. The stream is closed when dropped.
pub trait StreamConnector {
    type Stream: io::Read + io::Write;

    fn connect(&self, target: &RequestTarget) -> Result<Self::Stream>;
}

/// Plain blocking TCP.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

impl StreamConnector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&self, target: &RequestTarget) -> Result<TcpStream> {
        let addr = target.addr();
        TcpStream::connect(addr.as_str()).map_err(|source| Error::Connection { addr, source })
    }
}

/// Send one GET for `target` over a fresh connection and return what comes back.
///
/// The connection is owned here and dropped on every path out, whether or not the read
/// succeeded.
pub fn exchange<C: StreamConnector>(
    connector: &C,
    target: &RequestTarget,
    policy: ReadPolicy,
) -> Result<RawResponse> {
    let mut stream = connector.connect(target)?;
    debug!("connected to {}", target.addr());

    let request = HttpRequest::get(target);
    trace!("sending {:?}", request.to_string());
    request.serialize(&mut stream).map_err(Error::Write)?;

    let bytes = match policy {
        ReadPolicy::Single => read_once(&mut stream),
        ReadPolicy::Drain => read_to_end(&mut stream),
    }
    .map_err(Error::Read)?;
    trace!("read {} bytes", bytes.len());

    Ok(RawResponse::new(bytes))
}

/// Resolve `url` and run `exchange` against it. Nothing is dialed if the url is malformed.
pub fn fetch<C: StreamConnector>(
    connector: &C,
    url: &str,
    policy: ReadPolicy,
) -> Result<RawResponse> {
    let target = RequestTarget::resolve(url)?;
    debug!("Host: {}", target.host);
    debug!("Port: {}", target.port);
    debug!("Path: {}", target.path);
    exchange(connector, &target, policy)
}

/// GET `url` over TCP and return the first buffer's worth of the response.
pub fn get(url: &str) -> Result<RawResponse> {
    fetch(&TcpConnector, url, ReadPolicy::Single)
}

fn read_once<R: io::Read>(stream: &mut R) -> io::Result<Vec<u8>> {
    let mut buf = vec![0; READ_BUFFER_SIZE];
    let n = loop {
        match stream.read(&mut buf) {
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    };
    buf.truncate(n);
    Ok(buf)
}

fn read_to_end<R: io::Read>(stream: &mut R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(READ_BUFFER_SIZE);
    stream.read_to_end(&mut buf)?;
    Ok(buf)
}


#[cfg(test)]
mod tests {
    use super::test_support::{test_server, Behavior, FakeConnector};
    use super::*;
    use pretty_assertions::assert_eq;

    fn target() -> RequestTarget {
        RequestTarget::new("example.com", 80, "/get")
    }

    #[test]
    fn request_bytes_are_exact() {
        let connector = FakeConnector::new(Behavior::Respond(b"HTTP/1.0 200 OK\r\n\r\n".to_vec()));
        exchange(&connector, &target(), ReadPolicy::Single).unwrap();
        assert_eq!(
            connector.record.written.borrow().as_slice(),
            b"GET /get HTTP/1.0\r\nHost: example.com\r\n\r\n"
        );
        assert_eq!(connector.record.connects.get(), 1);
        assert_eq!(connector.record.closes.get(), 1);
    }

    #[test]
    fn single_read_truncates() {
        let big = vec![b'x'; READ_BUFFER_SIZE * 3];
        let connector = FakeConnector::new(Behavior::Respond(big));
        let response = exchange(&connector, &target(), ReadPolicy::Single).unwrap();
        assert_eq!(response.len(), READ_BUFFER_SIZE);
        assert_eq!(connector.record.closes.get(), 1);
    }

    #[test]
    fn drain_reads_everything() {
        let big = vec![b'x'; READ_BUFFER_SIZE * 3 + 7];
        let connector = FakeConnector::new(Behavior::Respond(big.clone()));
        let response = exchange(&connector, &target(), ReadPolicy::Drain).unwrap();
        assert_eq!(response.into_bytes(), big);
    }

    #[test]
    fn empty_response_is_not_an_error() {
        let connector = FakeConnector::new(Behavior::Respond(vec![]));
        let response = exchange(&connector, &target(), ReadPolicy::Single).unwrap();
        assert!(response.is_empty());
    }

    #[test]
    fn read_failure_still_closes() {
        let connector = FakeConnector::new(Behavior::FailRead);
        let err = exchange(&connector, &target(), ReadPolicy::Single).unwrap_err();
        assert!(matches!(err, Error::Read(_)), "{:?}", err);
        assert_eq!(connector.record.connects.get(), 1);
        assert_eq!(connector.record.closes.get(), 1);
    }

    #[test]
    fn connection_failure() {
        let connector = FakeConnector::new(Behavior::Refuse);
        let err = exchange(&connector, &target(), ReadPolicy::Single).unwrap_err();
        assert!(matches!(err, Error::Connection { .. }), "{:?}", err);
        assert!(connector.record.written.borrow().is_empty());
        assert_eq!(connector.record.closes.get(), 0);
    }

    #[test]
    fn malformed_url_never_connects() {
        let connector = FakeConnector::new(Behavior::Respond(vec![]));
        let err = fetch(&connector, "not a url", ReadPolicy::Single).unwrap_err();
        assert!(matches!(err, Error::MalformedUrl { .. }), "{:?}", err);
        assert_eq!(connector.record.connects.get(), 0);
    }

    #[test]
    fn tcp_round_trip() {
        let (port, server) = test_server(b"HTTP/1.0 200 OK\r\n\r\nhi".to_vec()).unwrap();
        let target = RequestTarget::new("localhost", port, "/get");

        let response = exchange(&TcpConnector, &target, ReadPolicy::Single).unwrap();
        assert_eq!(response.as_bytes(), b"HTTP/1.0 200 OK\r\n\r\nhi");

        let request = server.join().unwrap();
        assert_eq!(
            String::from_utf8(request).unwrap(),
            "GET /get HTTP/1.0\r\nHost: localhost\r\n\r\n"
        );
    }

    #[test]
    fn get_over_tcp() {
        let (port, server) = test_server(b"HTTP/1.0 404 Not Found\r\n\r\n".to_vec()).unwrap();
        let response = get(&format!("http://localhost:{}/missing", port)).unwrap();
        assert_eq!(response.to_text(), "HTTP/1.0 404 Not Found\r\n\r\n");
        server.join().unwrap();
    }

    #[test]
    fn tcp_connection_refused() {
        // Bind then drop to get a port nothing is listening on.
        let port = std::net::TcpListener::bind("localhost:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let target = RequestTarget::new("localhost", port, "/");
        let err = exchange(&TcpConnector, &target, ReadPolicy::Single).unwrap_err();
        match err {
            Error::Connection { addr, .. } => assert_eq!(addr, format!("localhost:{}", port)),
            e => panic!("unexpected error {:?}", e),
        }
    }
}
