pub mod file_contents;
pub mod files;
