pub mod bytes;
pub mod decode;
pub mod encode;
