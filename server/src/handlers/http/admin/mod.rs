pub mod users;

pub use users::handle_list_users;
