pub mod charts_controller;
pub mod data_controller;
pub mod health_controller;
pub mod upload_controller;

pub use charts_controller::{histogram_handler, render_handler, scatter_plot_handler};
pub use data_controller::data_handler;
pub use health_controller::health_handler;
pub use upload_controller::{upload_handler, DEFAULT_MAX_UPLOAD_SIZE, UPLOAD_FIELD};
