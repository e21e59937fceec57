use crate::errors::AppError;
use crate::models::{
    AddReminderRequest, CreateHabitRequest, DashboardResponse, Habit, NotificationPermission,
    NotificationsResponse, PermissionBody, Reminder, RemindersResponse, ThemeBody, TimeOfDay,
};
use crate::notify::Notifier;
use crate::state::AppState;
use crate::stats::build_dashboard;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    let ledger = state.ledger.lock().await;
    Json(ledger.list().to_vec())
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let habit = state.ledger.lock().await.create_habit(payload)?;
    info!(habit_id = habit.id, name = %habit.name, "habit created");
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn toggle_day(
    State(state): State<AppState>,
    Path((habit_id, day)): Path<(u64, usize)>,
) -> Result<Json<Habit>, AppError> {
    let mut ledger = state.ledger.lock().await;
    match ledger.toggle_day(habit_id, day)? {
        Some(habit) => Ok(Json(habit.clone())),
        None => Err(AppError::not_found(format!("unknown habit {habit_id}"))),
    }
}

pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let ledger = state.ledger.lock().await;
    Json(build_dashboard(ledger.list()))
}

pub async fn list_reminders(State(state): State<AppState>) -> Json<RemindersResponse> {
    let scheduler = state.scheduler.lock().await;
    Json(RemindersResponse {
        reminders: scheduler.list().to_vec(),
        unread: scheduler.unread(),
    })
}

pub async fn add_reminder(
    State(state): State<AppState>,
    Json(payload): Json<AddReminderRequest>,
) -> Result<(StatusCode, Json<Reminder>), AppError> {
    let time: TimeOfDay = payload.time.trim().parse()?;
    let snapshot = state.ledger.lock().await.snapshot(payload.habit_id);

    let reminder = {
        let mut scheduler = state.scheduler.lock().await;
        let reminder = scheduler.add_reminder(snapshot, time, payload.message.as_deref())?;
        if let Err(err) = state.persist_reminders(&scheduler).await {
            scheduler.clear_reminder(reminder.id);
            return Err(err);
        }
        reminder
    };
    info!(reminder_id = reminder.id, time = %reminder.time, habit = %reminder.habit.name, "reminder added");

    if state.notifier.permission() != NotificationPermission::Granted {
        let notifier = state.notifier.clone();
        tokio::spawn(async move {
            notifier.request_permission().await;
        });
    }

    Ok((StatusCode::CREATED, Json(reminder)))
}

pub async fn clear_reminder(
    State(state): State<AppState>,
    Path(reminder_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut scheduler = state.scheduler.lock().await;
    if let Some((index, removed)) = scheduler.take_reminder(reminder_id) {
        if let Err(err) = state.persist_reminders(&scheduler).await {
            scheduler.restore_at(index, removed);
            return Err(err);
        }
        info!(reminder_id, "reminder cleared");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_reminders_read(State(state): State<AppState>) -> Json<RemindersResponse> {
    Json(open_reminder_list(&state).await)
}

pub async fn list_notifications(State(state): State<AppState>) -> Json<NotificationsResponse> {
    Json(NotificationsResponse {
        permission: state.notifier.permission(),
        notifications: state.notifier.notifications(),
    })
}

pub async fn request_permission(State(state): State<AppState>) -> Json<PermissionBody> {
    Json(PermissionBody {
        permission: state.notifier.request_permission().await,
    })
}

pub async fn set_permission(
    State(state): State<AppState>,
    Json(payload): Json<PermissionBody>,
) -> Json<PermissionBody> {
    state.notifier.set_permission(payload.permission);
    Json(PermissionBody {
        permission: state.notifier.permission(),
    })
}

/// Clicking a notification brings the reminder list up, which also clears
/// the unread count.
pub async fn click_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<u64>,
) -> Result<Json<RemindersResponse>, AppError> {
    if state.notifier.get(notification_id).is_none() {
        return Err(AppError::not_found(format!("unknown notification {notification_id}")));
    }
    Ok(Json(open_reminder_list(&state).await))
}

pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeBody> {
    Json(ThemeBody {
        theme: state.theme().await,
    })
}

pub async fn put_theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemeBody>,
) -> Result<Json<ThemeBody>, AppError> {
    let theme = state.set_theme(payload.theme).await?;
    Ok(Json(ThemeBody { theme }))
}

pub async fn toggle_theme(State(state): State<AppState>) -> Result<Json<ThemeBody>, AppError> {
    let theme = state.toggle_theme().await?;
    Ok(Json(ThemeBody { theme }))
}

async fn open_reminder_list(state: &AppState) -> RemindersResponse {
    let mut scheduler = state.scheduler.lock().await;
    scheduler.mark_read();
    RemindersResponse {
        reminders: scheduler.list().to_vec(),
        unread: scheduler.unread(),
    }
}
