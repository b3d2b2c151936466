//! API service models

pub mod class;
pub mod friendship;
pub mod schedule;
pub mod user;

// Re-export for convenience
pub use class::{Class, ClassResponse, ClassSummary, CreateClassRequest, NewClass};
pub use friendship::{Friendship, FriendshipResponse, RespondRequest, SendFriendRequest};
pub use schedule::{Schedule, ScheduleResponse};
pub use user::{LoginRequest, RegisterRequest, TokenResponse, User, UserDetailResponse, UserResponse};
