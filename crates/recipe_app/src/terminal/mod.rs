pub mod app;
pub mod batch;
pub mod effects;
pub mod input;
pub mod logging;
pub mod render;
