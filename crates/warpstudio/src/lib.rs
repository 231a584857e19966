#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use warpstudio_image as image;

#[doc(inline)]
pub use warpstudio_imgproc as imgproc;

#[doc(inline)]
pub use warpstudio_io as io;

#[doc(inline)]
pub use warpstudio_transform as transform;
