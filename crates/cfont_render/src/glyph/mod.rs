pub mod bitmap;
pub mod charset;
pub mod table;
