#![allow(dead_code)]

use std::{
    io::{ErrorKind, Read, Write},
    net::TcpListener,
    thread::JoinHandle,
    time::{Duration, Instant},
};

use cloudkit_assets::Error;

pub(crate) const CONTAINER: &str = "iCloud.com.example.app";

pub(crate) const CONFIRMATION_JSON: &str = r#"{
  "singleFile": {
    "wrappingKey": "d2stdmFsdWU=",
    "fileChecksum": "AZq3f2lPmYQ1",
    "receipt": "Abc123Receipt",
    "referenceChecksum": "AWx8Yy9kZz00",
    "size": 11
  }
}"#;

/// A request captured by [`OneShotServer`].
pub(crate) struct CapturedRequest {
    pub(crate) head: String,
    pub(crate) body: Vec<u8>,
}

impl CapturedRequest {
    pub(crate) fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }

    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }
}

/// Accepts a single connection, reads one request, and writes a canned response.
pub(crate) struct OneShotServer {
    pub(crate) base_url: String,
    handle: JoinHandle<Option<CapturedRequest>>,
}

impl OneShotServer {
    pub(crate) fn start(status_line: &str, body: &str) -> Result<Self, Error> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|e| Error::transport("failed to bind test server", Some(Box::new(e))))?;
        listener
            .set_nonblocking(true)
            .map_err(|e| Error::transport("failed to configure test server", Some(Box::new(e))))?;
        let addr = listener.local_addr().map_err(|e| {
            Error::transport("failed to read test server address", Some(Box::new(e)))
        })?;

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = std::thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_secs(5);
            loop {
                match listener.accept() {
                    Ok((mut stream, _)) => {
                        let _ = stream.set_nonblocking(false);
                        let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
                        let captured = read_request(&mut stream);
                        let _ = stream.write_all(response.as_bytes());
                        let _ = stream.flush();
                        return captured;
                    }
                    Err(err) if err.kind() == ErrorKind::WouldBlock => {
                        if Instant::now() >= deadline {
                            return None;
                        }
                        std::thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => return None,
                }
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            handle,
        })
    }

    pub(crate) fn finish(self) -> Result<CapturedRequest, Error> {
        self.handle
            .join()
            .map_err(|_| Error::transport("test server thread panicked", None))?
            .ok_or_else(|| Error::transport("test server received no request", None))
    }
}

fn read_request(stream: &mut impl Read) -> Option<CapturedRequest> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    };

    let head = String::from_utf8_lossy(&data[..head_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| v.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    let mut body = data[head_end + 4..].to_vec();
    while body.len() < content_length {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&buf[..n]),
        }
    }

    Some(CapturedRequest { head, body })
}

/// Returns a loopback URL nothing is listening on.
pub(crate) fn closed_port_url() -> String {
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .unwrap_or(9);
    format!("http://127.0.0.1:{port}/upload")
}

pub(crate) fn upload_urls_path(database: &str) -> String {
    format!("/database/1/{CONTAINER}/development/{database}/assets/upload")
}
