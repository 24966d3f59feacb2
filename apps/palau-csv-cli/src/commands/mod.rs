pub mod clean_header;
pub mod convert;
