use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::{
    api::common::{self, REQUEST_UPLOAD_URLS, UPLOAD_ASSET, UploadOptions},
    client::Client,
    error::Result,
    types::{Database, UploadConfirmation, UploadEncoding, UploadField, UploadUrlsOutput},
    util,
};

/// Asset upload operations.
#[derive(Clone)]
pub struct AssetsService {
    client: Client,
}

impl AssetsService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Requests upload locations for asset fields in `database`.
    pub fn upload_urls(&self, database: Database) -> UploadUrlsRequest {
        UploadUrlsRequest {
            client: self.client.clone(),
            database,
            fields: Vec::new(),
            timeout: None,
            cancellation: None,
        }
    }

    /// Uploads asset data to a location returned by [`AssetsService::upload_urls`].
    pub fn upload(&self, url: impl Into<String>) -> UploadAssetRequest {
        UploadAssetRequest {
            client: self.client.clone(),
            url: url.into(),
            body: Bytes::new(),
            encoding: UploadEncoding::default(),
            file_name: None,
            part_content_type: None,
            timeout: None,
            cancellation: None,
        }
    }
}

pub struct UploadUrlsRequest {
    client: Client,
    database: Database,
    fields: Vec<UploadField>,
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
}

impl UploadUrlsRequest {
    pub fn field(mut self, field: UploadField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = UploadField>,
    {
        self.fields.extend(iter);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Aborts the request with [`crate::Error::Cancelled`] once `token` fires.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub async fn send(self) -> Result<UploadUrlsOutput> {
        let url = self.client.upload_urls_url(self.database)?;
        let request = common::upload_urls_request(url, &self.fields, self.timeout)?;

        let body = self
            .client
            .execute(REQUEST_UPLOAD_URLS, request, self.cancellation.as_ref())
            .await?
            .into_success_body(REQUEST_UPLOAD_URLS)?;

        util::json::parse_upload_urls(&body)
    }
}

pub struct UploadAssetRequest {
    client: Client,
    url: String,
    body: Bytes,
    encoding: UploadEncoding,
    file_name: Option<String>,
    part_content_type: Option<String>,
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
}

impl UploadAssetRequest {
    pub fn body_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn encoding(mut self, encoding: UploadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// File name of the multipart part. Defaults to `file`.
    pub fn file_name(mut self, value: impl Into<String>) -> Self {
        self.file_name = Some(value.into());
        self
    }

    /// Content type of the multipart part. Defaults to `application/octet-stream`.
    pub fn part_content_type(mut self, value: impl Into<String>) -> Self {
        self.part_content_type = Some(value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Aborts the upload with [`crate::Error::Cancelled`] once `token` fires.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub async fn send(self) -> Result<UploadConfirmation> {
        let request = common::upload_request(
            &self.url,
            self.body,
            UploadOptions {
                encoding: self.encoding,
                file_name: self.file_name,
                part_content_type: self.part_content_type,
                timeout: self.timeout,
            },
        )?;

        let body = self
            .client
            .execute(UPLOAD_ASSET, request, self.cancellation.as_ref())
            .await?
            .into_success_body(UPLOAD_ASSET)?;

        util::json::parse_upload_confirmation(&body)
    }
}
