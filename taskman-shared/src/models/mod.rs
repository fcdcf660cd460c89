/// Data model for Taskman
///
/// # Models
///
/// - `user`: Accounts and credentials
/// - `task`: Personal tasks owned by a single user
///
/// Persistence lives behind the traits in [`crate::store`]; the types here are
/// plain data shared by every backend.

pub mod task;
pub mod user;
