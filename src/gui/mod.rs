mod app;
mod board_view;
mod components;
pub mod constants;
mod notifications;

pub use app::run_gui;
