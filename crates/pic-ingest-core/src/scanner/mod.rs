pub mod walk;

pub use walk::discover_files;
