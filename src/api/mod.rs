#[cfg(feature = "async")]
mod assets;
#[cfg(feature = "blocking")]
mod blocking_assets;
mod common;

#[cfg(feature = "async")]
pub use assets::{AssetsService, UploadAssetRequest, UploadUrlsRequest};

#[cfg(feature = "blocking")]
pub use blocking_assets::{
    BlockingAssetsService, BlockingUploadAssetRequest, BlockingUploadUrlsRequest,
};
