//! Helper functions for UI operations.
//!
//! Background task spawning lives here so input handlers and the tick share
//! one way of starting fetches: abort the previous task, spawn the new one,
//! and report back over the `AppEvent` channel.

use crate::app::{App, AppEvent};
use crate::controller::{FetchTicket, LocationTicket};
use anyhow::Result;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Task name reported when a page fetch panics.
pub(super) const TASK_PAGE_FETCH: &str = "page_fetch";
/// Task name reported when a location search panics.
pub(super) const TASK_LOCATION_SEARCH: &str = "location_search";

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing, panics become `Err(String)`
/// with the panic message so the UI can leave its loading state.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Run a page fetch in the background.
///
/// The previous fetch, if any, is aborted. Its result would be stale anyway;
/// aborting also frees the connection.
pub(super) fn spawn_fetch(app: &mut App, ticket: FetchTicket, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.fetch_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous page fetch");
    }
    app.selected_item = 0;

    let client = app.client.clone();
    let tx = event_tx.clone();
    tracing::debug!(
        generation = ticket.generation,
        page = ticket.query.page_number(),
        "Spawning page fetch"
    );

    app.fetch_handle = Some(tokio::spawn(async move {
        let FetchTicket {
            generation,
            resource,
            query,
        } = ticket;
        let event = match catch_task_panic(client.fetch_page(resource, &query)).await {
            Ok(result) => AppEvent::PageLoaded { generation, result },
            Err(error) => {
                tracing::error!(error = %error, "Page fetch task panicked");
                AppEvent::TaskPanicked {
                    task: TASK_PAGE_FETCH,
                    error,
                }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send page result (receiver dropped)");
        }
    }));
}

/// Start a fetch if the controller asked for one.
pub(super) fn dispatch(
    app: &mut App,
    ticket: Option<FetchTicket>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    if let Some(ticket) = ticket {
        spawn_fetch(app, ticket, event_tx);
    }
}

/// Run a location typeahead query in the background.
pub(super) fn spawn_location_search(
    app: &mut App,
    ticket: LocationTicket,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    if let Some(handle) = app.location_handle.take() {
        handle.abort();
    }

    let client = app.client.clone();
    let tx = event_tx.clone();

    app.location_handle = Some(tokio::spawn(async move {
        let LocationTicket {
            generation,
            query,
            limit,
        } = ticket;
        let event = match catch_task_panic(client.search_locations(&query, limit)).await {
            Ok(result) => AppEvent::LocationsLoaded { generation, result },
            Err(error) => {
                tracing::error!(error = %error, "Location search task panicked");
                AppEvent::TaskPanicked {
                    task: TASK_LOCATION_SEARCH,
                    error,
                }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send location results (receiver dropped)");
        }
    }));
}

/// Open the selected item in the system browser.
pub(super) fn open_selected_item(app: &mut App) -> Result<()> {
    let Some(item) = app.selected_item() else {
        app.set_status("No item selected");
        return Ok(());
    };
    let Some(link) = app.item_link(item) else {
        app.set_status("Set web_base_url in config to open items");
        return Ok(());
    };

    match crate::util::validate_url_for_open(&link) {
        Ok(url) => {
            tracing::info!(url = %url, "Opening item in browser");
            open::that(url.as_str())?;
            app.set_status("Opened in browser");
        }
        Err(e) => {
            tracing::warn!(link = %link, error = %e, "Refusing to open item link");
            app.set_status(format!("Cannot open link: {e}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catch_task_panic_passes_value_through() {
        let result = catch_task_panic(async { 42 }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_catch_task_panic_reports_message() {
        let result: Result<(), String> = catch_task_panic(async {
            panic!("decoder exploded");
        })
        .await;
        assert_eq!(result, Err("decoder exploded".to_string()));
    }

    #[tokio::test]
    async fn test_catch_task_panic_formatted_message() {
        let page = 3;
        let result: Result<(), String> = catch_task_panic(async move {
            panic!("bad page {page}");
        })
        .await;
        assert_eq!(result, Err("bad page 3".to_string()));
    }
}
