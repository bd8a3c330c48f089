use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method};
use url::Url;

use crate::{
    error::Result,
    transport::HttpRequest,
    types::{UploadEncoding, UploadField},
    util,
};

pub(crate) const REQUEST_UPLOAD_URLS: &str = "request_upload_urls";
pub(crate) const UPLOAD_ASSET: &str = "upload_asset";

const DEFAULT_FILE_NAME: &str = "file";
const DEFAULT_PART_CONTENT_TYPE: &str = "application/octet-stream";

pub(crate) fn upload_urls_request(
    url: Url,
    fields: &[UploadField],
    timeout: Option<Duration>,
) -> Result<HttpRequest> {
    let body = util::json::encode_upload_urls_request(fields)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        http::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );

    Ok(HttpRequest {
        method: Method::POST,
        url,
        headers,
        body,
        timeout,
    })
}

pub(crate) struct UploadOptions {
    pub(crate) encoding: UploadEncoding,
    pub(crate) file_name: Option<String>,
    pub(crate) part_content_type: Option<String>,
    pub(crate) timeout: Option<Duration>,
}

pub(crate) fn upload_request(url: &str, data: Bytes, options: UploadOptions) -> Result<HttpRequest> {
    let url = util::url::parse_upload_url(url)?;

    let (content_type, body) = match options.encoding {
        UploadEncoding::FormUrlEncoded => (
            HeaderValue::from_static("application/x-www-form-urlencoded"),
            data,
        ),
        UploadEncoding::Multipart => {
            let encoded = util::multipart::encode_file_part(
                &data,
                options.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME),
                options
                    .part_content_type
                    .as_deref()
                    .unwrap_or(DEFAULT_PART_CONTENT_TYPE),
            )?;
            (encoded.content_type, encoded.body)
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(http::header::CONTENT_TYPE, content_type);

    Ok(HttpRequest {
        method: Method::POST,
        url,
        headers,
        body,
        timeout: options.timeout,
    })
}
