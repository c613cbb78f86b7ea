//! Application service: listing quadlets with their live service status.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::application::ports::{ProgressReporter, QuadletFs, ServiceManager};
use crate::application::services::QuadletContext;
use crate::application::services::directories;
use crate::domain::error::QuadletError;
use crate::domain::filter::ListFilters;
use crate::domain::report::{ListEntry, NOT_LOADED};

/// List every quadlet with its status, keeping entries accepted by `filters`.
///
/// Steps:
/// 1. Connect to the service manager (fatal on failure)
/// 2. Enumerate quadlet files across all search directories
/// 3. Derive each file's service name; parse failures become the status text
/// 4. Query the status of every derived name in one batch
/// 5. Apply the filters
///
/// Entries are returned in enumeration order.
///
/// # Errors
///
/// Returns `ServiceManagerConnect`, `DirectoryUnavailable`, or the batch
/// status query error. Per-file problems never fail the call.
pub async fn list_quadlets<F, M, R>(
    ctx: &QuadletContext<'_, F, M, R>,
    filters: &ListFilters,
) -> Result<Vec<ListEntry>, QuadletError>
where
    F: QuadletFs,
    M: ServiceManager,
    R: ProgressReporter,
{
    ctx.manager.connect().await?;
    let quadlets = directories::enumerate(ctx.fs, ctx.layout)?;

    let mut entries = Vec::with_capacity(quadlets.len());
    // service name -> indices into `entries` still waiting for a status
    let mut pending: HashMap<String, Vec<usize>> = HashMap::new();
    let mut query = Vec::new();

    for quadlet in &quadlets {
        let mut entry = ListEntry {
            name: quadlet.name.clone(),
            path: quadlet.path.clone(),
            status: String::new(),
        };
        match directories::service_name(ctx.fs, quadlet) {
            Ok(service) => {
                let slot = pending.entry(service.to_string()).or_default();
                if slot.is_empty() {
                    query.push(service.to_string());
                }
                slot.push(entries.len());
            }
            Err(e) => {
                debug!(quadlet = %quadlet.name, error = %e, "cannot derive service name");
                entry.status = e.to_string();
            }
        }
        entries.push(entry);
    }

    if !query.is_empty() {
        let statuses = ctx.manager.list_units_by_names(&query).await?;
        if statuses.len() != query.len() {
            warn!(
                queried = query.len(),
                received = statuses.len(),
                "service manager did not answer for every unit"
            );
        }
        for unit in statuses {
            let Some(indices) = pending.remove(&unit.name) else {
                warn!(unit = %unit.name, "unexpected unit returned by service manager");
                continue;
            };
            debug!(
                unit = %unit.name,
                load = %unit.load_state,
                active = %unit.active_state,
                sub = %unit.sub_state,
                "unit status"
            );
            let status = unit.display_status();
            for idx in indices {
                if let Some(entry) = entries.get_mut(idx) {
                    entry.status.clone_from(&status);
                }
            }
        }
    }

    // Units the manager never mentioned are treated as unknown to it.
    for indices in pending.into_values() {
        for idx in indices {
            if let Some(entry) = entries.get_mut(idx) {
                entry.status = NOT_LOADED.to_string();
            }
        }
    }

    Ok(entries.into_iter().filter(|e| filters.matches(e)).collect())
}
