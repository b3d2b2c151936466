//! Application state shared across handlers

use sqlx::PgPool;

use crate::recommendations::RecommendationEngine;
use crate::repositories::{
    ClassRepository, FriendshipRepository, ScheduleRepository, UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub friendship_repository: FriendshipRepository,
    pub schedule_repository: ScheduleRepository,
    pub class_repository: ClassRepository,
    pub recommendation_engine: RecommendationEngine,
}

impl AppState {
    /// Build the state from a connection pool
    pub fn new(pool: PgPool) -> Self {
        let user_repository = UserRepository::new(pool.clone());
        let friendship_repository = FriendshipRepository::new(pool.clone());
        let schedule_repository = ScheduleRepository::new(pool.clone());
        let class_repository = ClassRepository::new(pool.clone());

        let recommendation_engine = RecommendationEngine::new(
            user_repository.clone(),
            friendship_repository.clone(),
            schedule_repository.clone(),
            class_repository.clone(),
        );

        Self {
            db_pool: pool,
            user_repository,
            friendship_repository,
            schedule_repository,
            class_repository,
            recommendation_engine,
        }
    }
}
