pub mod project;

pub use project::handle_get_project;
