pub mod album_photos;
pub mod hashtags;
pub mod photos;

pub use album_photos::AlbumPhotoLinkManager;
pub use hashtags::HashtagResolver;
pub use photos::PhotoLifecycleManager;
