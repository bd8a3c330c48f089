#[cfg(all(feature = "async", feature = "providers"))]
use std::env;

#[cfg(all(feature = "async", feature = "providers"))]
use cloudkit_assets::{Database, Environment, UploadField, providers};

#[cfg(all(feature = "async", feature = "providers"))]
#[allow(clippy::result_large_err)]
#[tokio::main]
async fn main() -> Result<(), cloudkit_assets::Error> {
    let container = match env::var("CLOUDKIT_CONTAINER") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Set CLOUDKIT_CONTAINER to run this example.");
            return Ok(());
        }
    };

    let preset = match env::var("CLOUDKIT_LOCAL_PORT") {
        Ok(port) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| cloudkit_assets::Error::invalid_config("invalid CLOUDKIT_LOCAL_PORT"))?;
            providers::local(port, &container)?
        }
        Err(_) => providers::apple_cloudkit(&container, Environment::Development)?,
    };
    println!("using {} ({})", preset.endpoint(), preset.environment());

    let client = preset.async_client_builder()?.build()?;
    let urls = client
        .assets()
        .upload_urls(Database::Public)
        .field(UploadField::new("file"))
        .send()
        .await?;

    for location in urls {
        println!("{}", location.url);
    }
    Ok(())
}

#[cfg(not(all(feature = "async", feature = "providers")))]
fn main() {
    eprintln!("This example requires the `async` and `providers` features.");
    eprintln!("Try: cargo run --example providers_preset --features providers");
}
