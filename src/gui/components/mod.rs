pub mod analytics;
pub mod boards;
pub mod journal;
pub mod tracker;
