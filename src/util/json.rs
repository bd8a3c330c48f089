use bytes::Bytes;

use crate::{error::Error, types};

pub(crate) fn encode_upload_urls_request(fields: &[types::UploadField]) -> Result<Bytes, Error> {
    if fields.is_empty() {
        return Err(Error::invalid_config(
            "at least one upload field is required",
        ));
    }
    if fields.iter().any(|f| f.field_name.trim().is_empty()) {
        return Err(Error::invalid_config("upload field name must not be empty"));
    }

    let body = serde_json::to_vec(&types::JsonUploadUrlsRequest { tokens: fields })
        .map_err(|e| Error::invalid_config(format!("failed to encode upload URL request: {e}")))?;
    Ok(Bytes::from(body))
}

pub(crate) fn parse_upload_urls(body: &[u8]) -> Result<types::UploadUrlsOutput, Error> {
    let parsed = serde_json::from_slice::<types::JsonUploadUrlsResponse>(body).map_err(|e| {
        Error::decode(
            "failed to parse upload URL JSON response",
            Some(Box::new(e)),
        )
    })?;
    Ok(types::UploadUrlsOutput::from(parsed))
}

pub(crate) fn parse_upload_confirmation(body: &[u8]) -> Result<types::UploadConfirmation, Error> {
    let parsed = serde_json::from_slice::<types::SingleFileEnvelope>(body).map_err(|e| {
        Error::decode(
            "failed to parse upload confirmation JSON response",
            Some(Box::new(e)),
        )
    })?;
    Ok(parsed.single_file)
}
