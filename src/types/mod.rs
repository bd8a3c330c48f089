//! Shared request and response types.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{Error, Result},
    util::redact::Redacted,
};

/// Database scope addressed by a request.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Database {
    /// Data shared by all users of the container.
    Public,
    /// Data owned by the current user.
    Private,
    /// Data shared with the current user by other users.
    Shared,
}

impl Database {
    /// Returns the path segment used for this database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Shared => "shared",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Database {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "shared" => Ok(Self::Shared),
            _ => Err(Error::invalid_config(
                "database must be one of: public, private, shared",
            )),
        }
    }
}

/// Container environment.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Returns the path segment used for this environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            _ => Err(Error::invalid_config(
                "environment must be one of: development, production",
            )),
        }
    }
}

/// An asset field to request an upload location for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadField {
    /// Record name. Empty for records that do not exist yet.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub record_name: String,
    /// Record type.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub record_type: String,
    /// Name of the asset field in the record.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub field_name: String,
}

impl UploadField {
    /// Creates a field reference with the given asset field name.
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            ..Self::default()
        }
    }

    /// Sets the record name.
    pub fn record_name(mut self, value: impl Into<String>) -> Self {
        self.record_name = value.into();
        self
    }

    /// Sets the record type.
    pub fn record_type(mut self, value: impl Into<String>) -> Self {
        self.record_type = value.into();
        self
    }
}

/// Upload location returned for one asset field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrl {
    /// Record name.
    #[serde(default)]
    pub record_name: String,
    /// Asset field name in the record.
    #[serde(default)]
    pub field_name: String,
    /// Location to POST the asset data to.
    #[serde(default)]
    pub url: String,
}

/// Output from requesting upload locations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadUrlsOutput {
    /// Upload locations in the order the service returned them.
    pub urls: Vec<UploadUrl>,
}

impl UploadUrlsOutput {
    /// Finds the upload location for a record and field.
    ///
    /// The service does not promise to answer in request order, so callers
    /// should correlate by identity rather than by index.
    pub fn get(&self, record_name: &str, field_name: &str) -> Option<&UploadUrl> {
        self.urls
            .iter()
            .find(|u| u.record_name == record_name && u.field_name == field_name)
    }

    /// Number of upload locations.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns true when no upload locations were returned.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl IntoIterator for UploadUrlsOutput {
    type Item = UploadUrl;
    type IntoIter = std::vec::IntoIter<UploadUrl>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.into_iter()
    }
}

/// Confirmation returned after uploading asset data.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfirmation {
    /// Key material reference for the uploaded data.
    #[serde(default)]
    pub wrapping_key: String,
    /// Checksum of the uploaded file.
    #[serde(default)]
    pub file_checksum: String,
    /// Receipt to pass when attaching the asset to a record.
    #[serde(default)]
    pub receipt: String,
    /// Reference checksum.
    #[serde(default)]
    pub reference_checksum: String,
    /// Size of the uploaded data in bytes.
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: u64,
}

impl fmt::Debug for UploadConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfirmation")
            .field("wrapping_key", &Redacted(&self.wrapping_key))
            .field("file_checksum", &self.file_checksum)
            .field("receipt", &Redacted(&self.receipt))
            .field("reference_checksum", &self.reference_checksum)
            .field("size", &self.size)
            .finish()
    }
}

/// Body encoding used when uploading asset data.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadEncoding {
    /// Raw bytes sent as `application/x-www-form-urlencoded`.
    #[default]
    FormUrlEncoded,
    /// A `multipart/form-data` envelope with a single part named `file`.
    Multipart,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonUploadUrlsRequest<'a> {
    pub(crate) tokens: &'a [UploadField],
}

/// Both envelopes have been observed for the upload URL response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum JsonUploadUrlsResponse {
    Wrapped { tokens: Vec<UploadUrl> },
    Bare(Vec<UploadUrl>),
}

impl From<JsonUploadUrlsResponse> for UploadUrlsOutput {
    fn from(value: JsonUploadUrlsResponse) -> Self {
        let urls = match value {
            JsonUploadUrlsResponse::Wrapped { tokens } => tokens,
            JsonUploadUrlsResponse::Bare(urls) => urls,
        };
        Self { urls }
    }
}

/// Envelope around the upload confirmation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SingleFileEnvelope {
    pub(crate) single_file: UploadConfirmation,
}

fn deserialize_size<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let Some(value) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(0);
    };
    if let Some(v) = value.as_u64() {
        return Ok(v);
    }
    match value.as_f64() {
        Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Ok(v as u64),
        _ => Err(D::Error::custom(format!(
            "size must be a non-negative whole number, got {value}"
        ))),
    }
}
