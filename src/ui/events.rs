//! Application event handling.
//!
//! Applies background task results to the controllers. Generation checks
//! happen inside the controllers; this layer only reacts to what they
//! accepted.

use crate::api::GENERIC_ERROR_MESSAGE;
use crate::app::{App, AppEvent};

use super::helpers::{TASK_LOCATION_SEARCH, TASK_PAGE_FETCH};

/// Handle one completion event from a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::PageLoaded { generation, result } => {
            if !app.view.apply(generation, result) {
                return;
            }
            app.fetch_handle = None;
            app.clamp_selection();
            if app.view.skipped() > 0 {
                app.set_status(format!(
                    "{} item(s) could not be displayed",
                    app.view.skipped()
                ));
            }
        }

        AppEvent::LocationsLoaded { generation, result } => {
            if app.locations.apply(generation, result) {
                app.location_handle = None;
            }
        }

        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            match task {
                TASK_PAGE_FETCH => {
                    app.fetch_handle = None;
                    app.view.fail_in_flight(GENERIC_ERROR_MESSAGE);
                }
                TASK_LOCATION_SEARCH => {
                    app.location_handle = None;
                    app.locations.fail_in_flight(GENERIC_ERROR_MESSAGE);
                }
                _ => {}
            }
            app.set_status(format!("Internal error in {task}"));
        }
    }
}
