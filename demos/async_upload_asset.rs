#[cfg(feature = "async")]
use std::{env, fs};

#[cfg(feature = "async")]
use cloudkit_assets::{Client, Database, UploadField};

#[cfg(feature = "async")]
#[allow(clippy::result_large_err)]
#[tokio::main]
async fn main() -> Result<(), cloudkit_assets::Error> {
    let builder = match Client::from_env() {
        Ok(v) => v,
        Err(err) => {
            eprintln!("Set CLOUDKIT_CONTAINER (and optionally CLOUDKIT_ENDPOINT): {err}");
            return Ok(());
        }
    };

    let path = match env::args().nth(1) {
        Some(v) => v,
        None => {
            eprintln!("Usage: async_upload_asset <file> [record-type] [field-name]");
            return Ok(());
        }
    };
    let record_type = env::args().nth(2).unwrap_or_else(|| "Asset".to_string());
    let field_name = env::args().nth(3).unwrap_or_else(|| "file".to_string());

    let builder = match env::var("CLOUDKIT_API_TOKEN") {
        Ok(token) => builder.default_query("ckAPIToken", token)?,
        Err(_) => builder,
    };
    let client = builder.build()?;

    let data = fs::read(&path).map_err(|e| {
        cloudkit_assets::Error::invalid_config(format!("failed to read {path}: {e}"))
    })?;

    let urls = client
        .assets()
        .upload_urls(Database::Public)
        .field(UploadField::new(field_name).record_type(record_type))
        .send()
        .await?;

    for location in urls {
        let confirmation = client
            .assets()
            .upload(location.url)
            .body_bytes(data.clone())
            .send()
            .await?;
        println!(
            "uploaded {} bytes, checksum {}",
            confirmation.size, confirmation.file_checksum
        );
    }

    Ok(())
}

#[cfg(not(feature = "async"))]
fn main() {
    eprintln!(
        "This example requires the `async` feature. Try:\n  cargo run --example async_upload_asset"
    );
}
