#[cfg(feature = "blocking")]
use std::env;

#[cfg(feature = "blocking")]
use cloudkit_assets::{BlockingClient, Database, UploadEncoding, UploadField};

#[cfg(feature = "blocking")]
#[allow(clippy::result_large_err)]
fn main() -> Result<(), cloudkit_assets::Error> {
    let builder = match BlockingClient::from_env() {
        Ok(v) => v,
        Err(err) => {
            eprintln!("Set CLOUDKIT_CONTAINER (and optionally CLOUDKIT_ENDPOINT): {err}");
            return Ok(());
        }
    };

    let record_name = match env::var("CLOUDKIT_RECORD_NAME") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Set CLOUDKIT_RECORD_NAME to the record that will own the asset.");
            return Ok(());
        }
    };

    let builder = match env::var("CLOUDKIT_API_TOKEN") {
        Ok(token) => builder.default_query("ckAPIToken", token)?,
        Err(_) => builder,
    };
    let client = builder.build()?;

    let urls = client
        .assets()
        .upload_urls(Database::Public)
        .field(UploadField::new("file").record_name(record_name.as_str()))
        .send()?;

    let Some(location) = urls.get(&record_name, "file") else {
        eprintln!("no upload URL returned for {record_name}");
        return Ok(());
    };

    let confirmation = client
        .assets()
        .upload(location.url.clone())
        .encoding(UploadEncoding::Multipart)
        .file_name("hello.txt")
        .part_content_type("text/plain")
        .body_bytes(&b"hello from blocking cloudkit-assets\n"[..])
        .send()?;

    println!("{confirmation:?}");
    Ok(())
}

#[cfg(not(feature = "blocking"))]
fn main() {
    eprintln!("This example requires the `blocking` feature.");
    eprintln!(
        "Try: cargo run --example blocking_upload_asset --no-default-features --features blocking,rustls"
    );
}
