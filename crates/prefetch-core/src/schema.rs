pub mod app;

pub use app::Schema;
