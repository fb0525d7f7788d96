pub mod drawing_backend;
pub mod imageproc_backend;
