pub mod show_manager;
pub mod show_manager_impl;
pub mod user_manager;
pub mod user_manager_impl;

pub use show_manager::{MAX_TOP_SHOWS, ShowError, ShowManager};
pub use show_manager_impl::DefaultShowManager;
pub use user_manager::{UserError, UserManager};
pub use user_manager_impl::DefaultUserManager;
