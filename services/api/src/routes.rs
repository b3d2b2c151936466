//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::info;

use crate::{
    credentials,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware, bearer_token},
    models::{
        ClassResponse, CreateClassRequest, FriendshipResponse, LoginRequest, NewClass,
        RegisterRequest, RespondRequest, ScheduleResponse, SendFriendRequest, TokenResponse,
        UserDetailResponse, UserResponse,
    },
    state::AppState,
    validation::require,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/me", get(me))
        .route("/users", get(get_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id/friends", post(send_friend_request))
        .route("/users/:id/schedule", get(get_user_schedule))
        .route("/users/:id/recommendations", get(get_recommendations))
        .route("/friendships", get(get_friendships))
        .route("/friendships/:id", get(get_friendship))
        .route("/friendships/:id/respond", post(respond_to_friend_request))
        .route("/schedules", get(get_schedules))
        .route("/schedules/:id", get(get_schedule))
        .route("/schedules/:id/classes", post(add_class))
        .route("/classes", get(get_classes))
        .route("/classes/:id", get(get_class))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/session", post(renew_session))
        .route("/logout", post(logout))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "scheduler-api"
    }))
}

/// Register a new user
///
/// Issues the initial session and creates the user's empty schedule.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = require(payload.name, "name")?;
    let netid = require(payload.netid, "netid")?;
    let email = require(payload.email, "email")?;
    let password = require(payload.password, "password")?;

    let password_hash = credentials::hash_password(&password)?;
    let session = credentials::issue_session();

    let user = state
        .user_repository
        .create(&name, &netid, &email, &password_hash, &session)
        .await?;

    info!("Registered user {} ({})", user.id, user.email);

    Ok((StatusCode::CREATED, Json(TokenResponse::from(&user))))
}

/// Log a user in, regenerating both tokens
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = require(payload.email, "email")?;
    let password = require(payload.password, "password")?;

    let user = state
        .user_repository
        .find_by_email(&email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !credentials::verify_password(&password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let session = credentials::issue_session();
    state.user_repository.save_session(user.id, &session).await?;

    info!("User {} logged in", user.id);

    Ok(Json(TokenResponse {
        session_token: session.session_token,
        session_expiration: session.session_expiration.to_rfc3339(),
        update_token: session.update_token,
    }))
}

/// Renew a session by presenting the update token
///
/// The only path to a fresh session token once the old one has expired.
pub async fn renew_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let update_token = bearer_token(&headers)?;

    let user = state
        .user_repository
        .find_by_update_token(&update_token)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    let session = credentials::issue_session();
    state.user_repository.save_session(user.id, &session).await?;

    info!("Renewed session for user {}", user.id);

    Ok(Json(TokenResponse {
        session_token: session.session_token,
        session_expiration: session.session_expiration.to_rfc3339(),
        update_token: session.update_token,
    }))
}

/// Log a user out by expiring the current session
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers)?;

    let user = state
        .user_repository
        .find_by_session_token(&token)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    if !credentials::verify_session(&user, &token) {
        return Err(ApiError::InvalidToken);
    }

    state.user_repository.expire_session(user.id).await?;

    info!("User {} logged out", user.id);

    Ok(Json(json!({"message": "logged out"})))
}

/// The currently authenticated user
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(auth_user.id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(UserResponse::from(&user)))
}

/// Get all users
pub async fn get_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.user_repository.get_all().await?;

    let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(Json(users))
}

/// Get a user by ID, including their friendship edges
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let friends = state
        .friendship_repository
        .list_for_user(id)
        .await?
        .iter()
        .map(FriendshipResponse::from)
        .collect();

    Ok(Json(UserDetailResponse::new(&user, friends)))
}

/// Send a friend request from the path user to the user named by netid
pub async fn send_friend_request(
    State(state): State<AppState>,
    Path(sender_id): Path<i64>,
    Json(payload): Json<SendFriendRequest>,
) -> ApiResult<impl IntoResponse> {
    let netid = require(payload.netid, "netid")?;

    let sender = state
        .user_repository
        .find_by_id(sender_id)
        .await?
        .ok_or(ApiError::NotFound("sender"))?;

    let receiver = state
        .user_repository
        .find_by_netid(&netid)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let friendship = state
        .friendship_repository
        .create(sender.id, receiver.id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FriendshipResponse::from(&friendship)),
    ))
}

/// Get all friendships
pub async fn get_friendships(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let friendships = state.friendship_repository.get_all().await?;

    let friendships: Vec<FriendshipResponse> =
        friendships.iter().map(FriendshipResponse::from).collect();
    Ok(Json(friendships))
}

/// Get a friendship by ID
pub async fn get_friendship(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let friendship = state
        .friendship_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("friendship"))?;

    Ok(Json(FriendshipResponse::from(&friendship)))
}

/// Respond to a pending friend request
///
/// Accepting marks the edge accepted; declining deletes it permanently.
/// Any other response value is rejected, as is responding to an
/// already-resolved request.
pub async fn respond_to_friend_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RespondRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = require(payload.accepted, "accepted")?;

    match response.as_str() {
        "accepted" => {
            let friendship = state.friendship_repository.accept(id).await?;
            Ok(Json(FriendshipResponse::from(&friendship)).into_response())
        }
        "declined" => {
            state.friendship_repository.decline(id).await?;
            Ok(Json(json!({"message": "friend request declined"})).into_response())
        }
        _ => Err(ApiError::InvalidState(
            "response must be \"accepted\" or \"declined\"",
        )),
    }
}

/// Get all schedules with their classes
pub async fn get_schedules(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let schedules = state.schedule_repository.get_all().await?;

    let mut responses = Vec::with_capacity(schedules.len());
    for schedule in &schedules {
        let classes = state
            .class_repository
            .list_by_schedule(schedule.id)
            .await?
            .iter()
            .map(ClassResponse::from)
            .collect();
        responses.push(ScheduleResponse::new(schedule, classes));
    }

    Ok(Json(responses))
}

/// Get a schedule by ID with its classes
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let schedule = state
        .schedule_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("schedule"))?;

    let classes = state
        .class_repository
        .list_by_schedule(schedule.id)
        .await?
        .iter()
        .map(ClassResponse::from)
        .collect();

    Ok(Json(ScheduleResponse::new(&schedule, classes)))
}

/// Get the schedule owned by a user
pub async fn get_user_schedule(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let schedule = state
        .schedule_repository
        .find_by_user_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("schedule"))?;

    let classes = state
        .class_repository
        .list_by_schedule(schedule.id)
        .await?
        .iter()
        .map(ClassResponse::from)
        .collect();

    Ok(Json(ScheduleResponse::new(&schedule, classes)))
}

/// Add a class to a schedule
///
/// Every field is required; nothing is persisted on a partial payload.
pub async fn add_class(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
    Json(payload): Json<CreateClassRequest>,
) -> ApiResult<impl IntoResponse> {
    let schedule = state
        .schedule_repository
        .find_by_id(schedule_id)
        .await?
        .ok_or(ApiError::NotFound("schedule"))?;

    let new_class = NewClass {
        name: require(payload.name, "name")?,
        code: require(payload.code, "code")?,
        class_type: require(payload.class_type, "type")?,
        start_hour: require(payload.start_hour, "start_hour")?,
        start_minute: require(payload.start_minute, "start_minute")?,
        start_period: require(payload.start_period, "start_period")?,
        end_hour: require(payload.end_hour, "end_hour")?,
        end_minute: require(payload.end_minute, "end_minute")?,
        end_period: require(payload.end_period, "end_period")?,
        days: require(payload.days, "days")?,
    };

    let class = state.class_repository.create(schedule.id, &new_class).await?;

    Ok((StatusCode::CREATED, Json(ClassResponse::from(&class))))
}

/// Get all classes
pub async fn get_classes(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let classes = state.class_repository.get_all().await?;

    let classes: Vec<ClassResponse> = classes.iter().map(ClassResponse::from).collect();
    Ok(Json(classes))
}

/// Get a class by ID
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let class = state
        .class_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("class"))?;

    Ok(Json(ClassResponse::from(&class)))
}

/// Pairwise classes-in-common among the user's accepted friends
///
/// Rendered as a JSON object keyed by the space-joined friend id pair, in
/// pair order.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let overlaps = state
        .recommendation_engine
        .recommendations_for(user_id)
        .await?;

    let mut mapping = serde_json::Map::with_capacity(overlaps.len());
    for (pair, classes) in overlaps {
        let value = serde_json::to_value(classes).map_err(|e| {
            tracing::error!("Failed to serialize recommendations: {}", e);
            ApiError::InternalServerError
        })?;
        mapping.insert(pair, value);
    }

    Ok(Json(serde_json::Value::Object(mapping)))
}
