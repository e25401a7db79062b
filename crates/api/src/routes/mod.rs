pub mod auth;
pub mod custom_fields;
pub mod expenses;
pub mod health;
pub mod operation_logs;
pub mod projects;
pub mod tasks;
pub mod users;
pub mod work_logs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                 login (public)
/// /auth/logout                                logout (requires auth)
///
/// /users                                      list, create (manager only)
/// /users/me                                   current user
///
/// /projects                                   list, create
/// /projects/{id}                              detail read model, full-form edit
/// /projects/{id}/status                       quick status change (PUT)
/// /projects/{id}/custom-fields                field values with typed display
/// /projects/{project_id}/assignments/{id}/rate  rate update (PUT)
///
/// /work-logs                                  list, create
///
/// /expenses                                   list, submit
/// /expenses/{id}                              get, edit, delete (pending only)
/// /expenses/{id}/approve                      approval workflow (POST)
/// /expenses/{id}/reject                       rejection (POST)
///
/// /tasks                                      list, create
/// /tasks/{id}                                 get
/// /tasks/{id}/status                          status update (PUT)
///
/// /custom-fields                              list, create (manager only)
/// /custom-fields/{id}                         update, delete
///
/// /operation-logs                             filtered, paginated trail
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/projects", projects::router())
        .nest("/work-logs", work_logs::router())
        .nest("/expenses", expenses::router())
        .nest("/tasks", tasks::router())
        .nest("/custom-fields", custom_fields::router())
        .nest("/operation-logs", operation_logs::router())
}
