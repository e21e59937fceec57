use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route("/api/habits/:id/days/:day/toggle", post(handlers::toggle_day))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/reminders", get(handlers::list_reminders).post(handlers::add_reminder))
        .route("/api/reminders/read", post(handlers::mark_reminders_read))
        .route("/api/reminders/:id", delete(handlers::clear_reminder))
        .route("/api/notifications", get(handlers::list_notifications))
        .route(
            "/api/notifications/permission",
            post(handlers::request_permission).put(handlers::set_permission),
        )
        .route("/api/notifications/:id/click", post(handlers::click_notification))
        .route("/api/theme", get(handlers::get_theme).put(handlers::put_theme))
        .route("/api/theme/toggle", post(handlers::toggle_theme))
        .with_state(state)
}
