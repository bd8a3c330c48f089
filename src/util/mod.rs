pub(crate) mod json;
pub(crate) mod multipart;
pub(crate) mod redact;
pub(crate) mod url;
