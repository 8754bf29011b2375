use once_cell::sync::Lazy;
use std::path::PathBuf;

pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("GALLERY_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"))
});

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("config.yaml"));
pub static DATABASE_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("gallery.sqlite"));

/// Prefix of the label given to photos uploaded without a name.
pub const GENERATED_PHOTO_NAME_PREFIX: &str = "photo-";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;
