use std::sync::atomic::{AtomicU64, Ordering};

use bytes::{BufMut, Bytes, BytesMut};
use http::HeaderValue;

use crate::error::Error;

/// Name of the single form part carrying the asset data.
pub(crate) const FILE_PART_NAME: &str = "file";

static BOUNDARY_COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) struct MultipartBody {
    pub(crate) content_type: HeaderValue,
    pub(crate) body: Bytes,
}

pub(crate) fn encode_file_part(
    data: &[u8],
    file_name: &str,
    part_content_type: &str,
) -> Result<MultipartBody, Error> {
    let mut boundary = new_boundary();
    while contains(data, boundary.as_bytes()) {
        boundary = new_boundary();
    }
    encode_with_boundary(&boundary, data, file_name, part_content_type)
}

pub(crate) fn encode_with_boundary(
    boundary: &str,
    data: &[u8],
    file_name: &str,
    part_content_type: &str,
) -> Result<MultipartBody, Error> {
    let part_content_type = HeaderValue::from_str(part_content_type)
        .map_err(|_| Error::invalid_config("invalid multipart part Content-Type"))?;
    let content_type = HeaderValue::from_str(&format!("multipart/form-data; boundary={boundary}"))
        .map_err(|_| Error::invalid_config("invalid multipart boundary"))?;

    let file_name = escape_quoted(file_name);

    let mut out = BytesMut::with_capacity(data.len() + 256);
    out.put_slice(b"--");
    out.put_slice(boundary.as_bytes());
    out.put_slice(b"\r\n");
    out.put_slice(
        format!(
            "Content-Disposition: form-data; name=\"{FILE_PART_NAME}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    out.put_slice(b"Content-Type: ");
    out.put_slice(part_content_type.as_bytes());
    out.put_slice(b"\r\n\r\n");
    out.put_slice(data);
    out.put_slice(b"\r\n--");
    out.put_slice(boundary.as_bytes());
    out.put_slice(b"--\r\n");

    Ok(MultipartBody {
        content_type,
        body: out.freeze(),
    })
}

fn new_boundary() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let n = BOUNDARY_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("cloudkit-assets-{nanos:x}-{n:x}")
}

/// Form-data quoting: `"` becomes `%22`, CR and LF are dropped, the rest is kept.
fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\r' | '\n' => {}
            '"' => out.push_str("%22"),
            other => out.push(other),
        }
    }
    out
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
