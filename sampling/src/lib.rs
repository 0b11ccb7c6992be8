pub mod source;
pub mod stream;
