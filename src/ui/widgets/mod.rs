//! Custom widgets

pub mod icon_thumbnail;

pub use icon_thumbnail::IconThumbnail;
