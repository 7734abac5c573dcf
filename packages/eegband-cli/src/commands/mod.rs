pub mod batch;
pub mod design;
pub mod filter;
pub mod info;
pub mod spectrum;
