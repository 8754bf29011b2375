mod album;
mod hashtag;
mod photo;

pub use album::*;
pub use hashtag::*;
pub use photo::*;
