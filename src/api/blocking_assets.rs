use std::time::Duration;

use bytes::Bytes;

use crate::{
    api::common::{self, REQUEST_UPLOAD_URLS, UPLOAD_ASSET, UploadOptions},
    client::BlockingClient,
    error::Result,
    types::{Database, UploadConfirmation, UploadEncoding, UploadField, UploadUrlsOutput},
    util,
};

#[derive(Clone)]
pub struct BlockingAssetsService {
    client: BlockingClient,
}

impl BlockingAssetsService {
    pub(crate) fn new(client: BlockingClient) -> Self {
        Self { client }
    }

    pub fn upload_urls(&self, database: Database) -> BlockingUploadUrlsRequest {
        BlockingUploadUrlsRequest {
            client: self.client.clone(),
            database,
            fields: Vec::new(),
            timeout: None,
        }
    }

    pub fn upload(&self, url: impl Into<String>) -> BlockingUploadAssetRequest {
        BlockingUploadAssetRequest {
            client: self.client.clone(),
            url: url.into(),
            body: Bytes::new(),
            encoding: UploadEncoding::default(),
            file_name: None,
            part_content_type: None,
            timeout: None,
        }
    }
}

pub struct BlockingUploadUrlsRequest {
    client: BlockingClient,
    database: Database,
    fields: Vec<UploadField>,
    timeout: Option<Duration>,
}

impl BlockingUploadUrlsRequest {
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

    pub fn send(self) -> Result<UploadUrlsOutput> {
        let url = self.client.upload_urls_url(self.database)?;
        let request = common::upload_urls_request(url, &self.fields, self.timeout)?;

        let body = self
            .client
            .execute(REQUEST_UPLOAD_URLS, request)?
            .into_success_body(REQUEST_UPLOAD_URLS)?;

        util::json::parse_upload_urls(&body)
    }
}

pub struct BlockingUploadAssetRequest {
    client: BlockingClient,
    url: String,
    body: Bytes,
    encoding: UploadEncoding,
    file_name: Option<String>,
    part_content_type: Option<String>,
    timeout: Option<Duration>,
}

impl BlockingUploadAssetRequest {
    pub fn body_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn encoding(mut self, encoding: UploadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn file_name(mut self, value: impl Into<String>) -> Self {
        self.file_name = Some(value.into());
        self
    }

    pub fn part_content_type(mut self, value: impl Into<String>) -> Self {
        self.part_content_type = Some(value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn send(self) -> Result<UploadConfirmation> {
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
            .execute(UPLOAD_ASSET, request)?
            .into_success_body(UPLOAD_ASSET)?;

        util::json::parse_upload_confirmation(&body)
    }
}
