//! Platform configuration adapters

pub mod traits_file;

pub use traits_file::{apply_frequency, read_frequency, DeclarationError, TraitsFile};
