pub mod gpu_plot;
pub mod panels;
pub mod plot;
