//! Repositories for database operations

pub mod class;
pub mod friendship;
pub mod schedule;
pub mod user;

// Re-export for convenience
pub use class::ClassRepository;
pub use friendship::FriendshipRepository;
pub use schedule::ScheduleRepository;
pub use user::UserRepository;
