//! Build/run tool adapters

pub mod make;

pub use make::MakeToolchain;
