use std::cell::RefCell;

use foundation::GroupIndex;
use scene::MapSurface;
use streaming::LoadTicket;

use crate::app::{MapApp, ViewerError};
use crate::loader::LoadOutcome;
use crate::source::GroupSource;

/// Fetches the group a ticket was issued for and applies the result.
///
/// The app is only borrowed after the fetch resolves, never across it.
pub async fn run_load<M, S>(
    app: &RefCell<MapApp<M>>,
    source: &S,
    ticket: LoadTicket,
) -> LoadOutcome
where
    M: MapSurface,
    S: GroupSource + ?Sized,
{
    let result = source.fetch_group(ticket.group()).await;
    app.borrow_mut().finish_load(ticket, result)
}

/// Toggles a group and, when that started a load, drives it to completion.
pub async fn toggle_and_load<M, S>(
    app: &RefCell<MapApp<M>>,
    source: &S,
    group: GroupIndex,
) -> Result<Option<LoadOutcome>, ViewerError>
where
    M: MapSurface,
    S: GroupSource + ?Sized,
{
    let ticket = app.borrow_mut().toggle_group(group)?;
    match ticket {
        Some(ticket) => Ok(Some(run_load(app, source, ticket).await)),
        None => Ok(None),
    }
}
