pub mod config;
pub mod model_download;
pub mod pipeline;
pub mod session;
pub mod types;
pub mod viewer;
