pub mod user_repo;
pub use user_repo::UserRepository;
pub mod contact_repo;
pub use contact_repo::{ContactRepository, ContactStore};
pub mod group_repo;
pub use group_repo::GroupRepository;
