#![cfg(feature = "blocking")]
#![allow(clippy::result_large_err)]

mod common;

use std::time::Duration;

use http::StatusCode;

use cloudkit_assets::{BlockingClient, Database, Environment, Error, UploadEncoding, UploadField};

use common::{CONFIRMATION_JSON, CONTAINER, OneShotServer, closed_port_url, upload_urls_path};

fn client(base_url: &str) -> Result<BlockingClient, Error> {
    BlockingClient::builder(base_url)?
        .container(CONTAINER)
        .timeout(Duration::from_secs(5))
        .build()
}

#[test]
fn upload_urls_posts_tokens_and_parses_locations() -> Result<(), Error> {
    let server = OneShotServer::start(
        "200 OK",
        r#"{"tokens":[
            {"recordName":"rec-1","fieldName":"image","url":"https://cvws.example.com/u/1"},
            {"recordName":"rec-2","fieldName":"image","url":"https://cvws.example.com/u/2"}
        ]}"#,
    )?;

    let result = client(&server.base_url)?
        .assets()
        .upload_urls(Database::Private)
        .fields([
            UploadField::new("image").record_name("rec-1"),
            UploadField::new("image").record_name("rec-2"),
        ])
        .send();
    let captured = server.finish()?;
    let out = result?;

    assert_eq!(
        captured.request_line(),
        format!("POST {} HTTP/1.1", upload_urls_path("private"))
    );
    assert_eq!(captured.header("content-type"), Some("application/json"));
    let sent: serde_json::Value = serde_json::from_slice(&captured.body)
        .map_err(|e| Error::decode("request body was not JSON", Some(Box::new(e))))?;
    assert_eq!(
        sent,
        serde_json::json!({
            "tokens": [
                { "recordName": "rec-1", "fieldName": "image" },
                { "recordName": "rec-2", "fieldName": "image" },
            ]
        })
    );

    assert_eq!(out.len(), 2);
    assert_eq!(
        out.get("rec-2", "image").map(|u| u.url.as_str()),
        Some("https://cvws.example.com/u/2")
    );
    Ok(())
}

#[test]
fn upload_urls_uses_configured_environment() -> Result<(), Error> {
    let server = OneShotServer::start("200 OK", "[]")?;

    let result = BlockingClient::builder(&server.base_url)?
        .container(CONTAINER)
        .environment(Environment::Production)
        .build()?
        .assets()
        .upload_urls(Database::Public)
        .field(UploadField::new("file"))
        .send();
    let captured = server.finish()?;

    assert!(result?.is_empty());
    assert!(
        captured
            .request_line()
            .contains(&format!("/database/1/{CONTAINER}/production/public/assets/upload"))
    );
    Ok(())
}

#[test]
fn upload_urls_non_success_is_api_error() -> Result<(), Error> {
    let server = OneShotServer::start(
        "503 Service Unavailable",
        r#"{"serverErrorCode":"TRY_AGAIN_LATER"}"#,
    )?;

    let result = client(&server.base_url)?
        .assets()
        .upload_urls(Database::Public)
        .field(UploadField::new("file"))
        .send();
    server.finish()?;

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert!(
        err.body()
            .is_some_and(|b| String::from_utf8_lossy(b).contains("TRY_AGAIN_LATER"))
    );
    Ok(())
}

#[test]
fn form_upload_sends_raw_bytes_and_returns_confirmation() -> Result<(), Error> {
    let server = OneShotServer::start("200 OK", CONFIRMATION_JSON)?;
    let url = format!("{}/upload/abc", server.base_url);

    let result = client(&server.base_url)?
        .assets()
        .upload(url)
        .body_bytes(&b"hello world"[..])
        .send();
    let captured = server.finish()?;
    let confirmation = result?;

    assert_eq!(captured.request_line(), "POST /upload/abc HTTP/1.1");
    assert_eq!(
        captured.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(captured.body, b"hello world");

    assert_eq!(confirmation.wrapping_key, "d2stdmFsdWU=");
    assert_eq!(confirmation.file_checksum, "AZq3f2lPmYQ1");
    assert_eq!(confirmation.receipt, "Abc123Receipt");
    assert_eq!(confirmation.reference_checksum, "AWx8Yy9kZz00");
    assert_eq!(confirmation.size, 11);
    Ok(())
}

#[test]
fn multipart_upload_sends_file_part() -> Result<(), Error> {
    let server = OneShotServer::start("201 Created", CONFIRMATION_JSON)?;
    let url = format!("{}/upload/abc", server.base_url);

    let result = client(&server.base_url)?
        .assets()
        .upload(url)
        .encoding(UploadEncoding::Multipart)
        .body_bytes(&b"hello world"[..])
        .send();
    let captured = server.finish()?;
    result?;

    let content_type = captured.header("content-type").unwrap_or_default();
    let boundary = content_type
        .strip_prefix("multipart/form-data; boundary=")
        .ok_or_else(|| Error::invalid_config("missing multipart boundary"))?;

    let body = String::from_utf8_lossy(&captured.body);
    assert!(body.starts_with(&format!("--{boundary}\r\n")));
    assert!(body.contains("name=\"file\"; filename=\"file\""));
    assert!(body.contains("Content-Type: application/octet-stream\r\n\r\nhello world\r\n"));
    assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    Ok(())
}

#[test]
fn malformed_confirmation_is_decode_error() -> Result<(), Error> {
    let server = OneShotServer::start("200 OK", "not json")?;
    let url = format!("{}/upload/abc", server.base_url);

    let result = client(&server.base_url)?
        .assets()
        .upload(url)
        .body_bytes(&b"x"[..])
        .send();
    server.finish()?;

    let err = result.unwrap_err();
    assert!(err.is_decode(), "expected decode error, got {err:?}");
    Ok(())
}

#[test]
fn unreachable_upload_url_is_transport_error() -> Result<(), Error> {
    let err = client("http://127.0.0.1:1")?
        .assets()
        .upload(closed_port_url())
        .body_bytes(&b"x"[..])
        .send()
        .unwrap_err();

    assert!(err.is_transport(), "expected transport error, got {err:?}");
    Ok(())
}

#[test]
fn invalid_upload_url_is_rejected() -> Result<(), Error> {
    let err = client("http://127.0.0.1:1")?
        .assets()
        .upload("ftp://example.com/file")
        .send()
        .unwrap_err();

    assert!(matches!(err, Error::InvalidConfig { .. }));
    Ok(())
}
