/// Event CRUD endpoints
///
/// All routes in this module sit behind the JWT guard; handlers receive the
/// caller's identity via the `AuthContext` request extension and scope every
/// database operation to it. An event owned by someone else is reported as
/// `404 Event not found.` rather than 403, so the API never confirms that a
/// foreign id exists.
///
/// # Endpoints
///
/// - `POST /api/events` - Create an event
/// - `GET /api/events` - List the caller's events
/// - `PUT /api/events/:id` - Partially update an owned event
/// - `DELETE /api/events/:id` - Delete an owned event

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use memora_shared::{
    auth::middleware::AuthContext,
    models::event::{parse_occurs_at, Event, NewEvent, UpdateEvent},
};
use serde::{Deserialize, Serialize};

/// Create event request
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Event title (required, non-empty)
    pub title: Option<String>,

    /// When the event occurs, as an ISO-8601 string (required)
    pub datetime: Option<String>,

    /// Optional description, defaults to empty
    pub description: Option<String>,

    /// Optional reminder flag, defaults to true
    pub reminder: Option<bool>,
}

/// Update event request
///
/// Every field is optional; absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub datetime: Option<String>,
    pub description: Option<String>,
    pub reminder: Option<bool>,
}

/// Event as serialized on the wire
#[derive(Debug, Serialize)]
pub struct EventData {
    pub id: i64,
    pub title: String,

    /// RFC 3339 UTC timestamp
    pub datetime: DateTime<Utc>,

    pub description: String,
    pub owner_id: i64,
    pub reminder: bool,
}

impl From<Event> for EventData {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            datetime: event.occurs_at,
            description: event.description,
            owner_id: event.owner_id,
            reminder: event.reminder,
        }
    }
}

/// Single-event response envelope
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub event: EventData,
}

/// Event list response envelope
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<EventData>,
}

/// Delete confirmation response
#[derive(Debug, Serialize)]
pub struct DeleteEventResponse {
    pub message: String,
}

/// Create a new event owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /api/events
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Dentist",
///   "datetime": "2025-05-01T10:00:00",
///   "description": "bring the blue folder",
///   "reminder": true
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "event": {
///     "id": 1,
///     "title": "Dentist",
///     "datetime": "2025-05-01T10:00:00Z",
///     "description": "bring the blue folder",
///     "owner_id": 1,
///     "reminder": true
///   }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing title/datetime, or unparseable datetime
/// - `401 Unauthorized`: Missing or invalid token
/// - `500 Internal Server Error`: Server error
pub async fn create_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let title = req.title.filter(|t| !t.is_empty());
    let datetime = req.datetime.filter(|d| !d.is_empty());

    let (title, datetime) = match (title, datetime) {
        (Some(title), Some(datetime)) => (title, datetime),
        _ => {
            return Err(ApiError::BadRequest {
                code: "invalid_input",
                message: "Title and datetime are required.".to_string(),
            });
        }
    };

    let occurs_at = parse_occurs_at(&datetime).map_err(|_| ApiError::BadRequest {
        code: "invalid_input",
        message: "Invalid datetime format.".to_string(),
    })?;

    let event = Event::create(
        &state.db,
        auth.user_id,
        NewEvent {
            title,
            occurs_at,
            description: req.description.unwrap_or_default(),
            reminder: req.reminder.unwrap_or(true),
        },
    )
    .await?;

    tracing::info!(user_id = auth.user_id, event_id = event.id, "Created event");

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            event: event.into(),
        }),
    ))
}

/// List all events owned by the caller
///
/// Returns events in insertion order. An empty list is a normal result for
/// a user with no events.
///
/// # Endpoint
///
/// ```text
/// GET /api/events
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "events": [ ... ]
/// }
/// ```
pub async fn list_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<EventListResponse>> {
    let events = Event::list_by_owner(&state.db, auth.user_id).await?;

    Ok(Json(EventListResponse {
        events: events.into_iter().map(EventData::from).collect(),
    }))
}

/// Partially update an owned event
///
/// Only the supplied fields change. A supplied `title` must be non-empty
/// and a supplied `datetime` must parse; the stored invariants hold on
/// every write path.
///
/// # Endpoint
///
/// ```text
/// PUT /api/events/:id
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "description": "bring the red folder"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Empty title or unparseable datetime
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No such event, or owned by someone else
/// - `500 Internal Server Error`: Server error
pub async fn update_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    // Ownership check before input validation: a foreign or missing id must
    // yield 404 regardless of payload contents
    Event::find_by_id_and_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found.".to_string()))?;

    let title = match req.title {
        Some(title) if title.is_empty() => {
            return Err(ApiError::BadRequest {
                code: "invalid_input",
                message: "Title cannot be empty.".to_string(),
            });
        }
        other => other,
    };

    let occurs_at = req
        .datetime
        .map(|datetime| parse_occurs_at(&datetime))
        .transpose()
        .map_err(|_| ApiError::BadRequest {
            code: "invalid_input",
            message: "Invalid datetime format.".to_string(),
        })?;

    let updated = Event::update(
        &state.db,
        id,
        auth.user_id,
        UpdateEvent {
            title,
            occurs_at,
            description: req.description,
            reminder: req.reminder,
        },
    )
    .await?
    // The row can vanish between the lookup and the write; same 404 either way
    .ok_or_else(|| ApiError::NotFound("Event not found.".to_string()))?;

    tracing::info!(user_id = auth.user_id, event_id = id, "Updated event");

    Ok(Json(EventResponse {
        event: updated.into(),
    }))
}

/// Delete an owned event
///
/// # Endpoint
///
/// ```text
/// DELETE /api/events/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "Event deleted successfully."
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No such event, or owned by someone else
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteEventResponse>> {
    let deleted = Event::delete_by_id_and_owner(&state.db, id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Event not found.".to_string()));
    }

    tracing::info!(user_id = auth.user_id, event_id = id, "Deleted event");

    Ok(Json(DeleteEventResponse {
        message: "Event deleted successfully.".to_string(),
    }))
}
