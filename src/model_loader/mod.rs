pub mod assemble;
pub mod impl_dir;
pub mod impl_fake;
pub mod impl_http;
pub mod interface;
pub mod metadata;
