pub mod login;
pub mod logout;
pub mod superadmin_login;

pub use login::{LoginKind, handle_login};
pub use logout::handle_logout;
