//! The mzML codec (C2, §4.2): reader, writer, binary array decode/encode, CV handling.

mod binary;
mod cv;
mod numpress;
mod reader;
mod writer;

pub use binary::{BinaryCodecError, BinaryEncoding, CompressionType};
pub use cv::ArrayType;
pub use reader::read;
pub use writer::{write, WriteOptions};
