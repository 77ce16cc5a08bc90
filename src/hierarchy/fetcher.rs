//! Loading candidate lists for cascading selects.

use std::future::Future;

use crate::{
    Error,
    hierarchy::{CascadePath, Entity, EntityId, Level, Lookup, SelectionController},
};

/// A source of lookup entities, implemented by the expense API client.
pub trait EntityFetcher {
    /// Fetch the entities of `lookup`, filtered by `parent_id` for lookups that
    /// depend on a parent.
    fn fetch(
        &self,
        lookup: Lookup,
        parent_id: Option<EntityId>,
    ) -> impl Future<Output = Result<Vec<Entity>, Error>> + Send;
}

/// Fetch a candidate list, degrading a failure to an empty list.
///
/// The second element is `false` when the fetch failed so the caller can show
/// a generic alert. There are no retries: the next selection change fetches again.
pub async fn fetch_candidates<F: EntityFetcher>(
    fetcher: &F,
    lookup: Lookup,
    parent_id: Option<EntityId>,
) -> (Vec<Entity>, bool) {
    match fetcher.fetch(lookup, parent_id).await {
        Ok(entities) => {
            tracing::debug!(
                "Fetched {} candidates for {lookup:?} (parent {parent_id:?})",
                entities.len()
            );
            (entities, true)
        }
        Err(error) => {
            tracing::warn!("Could not fetch {lookup:?} for parent {parent_id:?}: {error}");
            (Vec::new(), false)
        }
    }
}

/// A cascade whose candidate lists have been loaded.
#[derive(Debug, Clone)]
pub struct CascadeLoad {
    pub controller: SelectionController,
    /// Whether any candidate list could not be fetched.
    pub failed: bool,
}

/// Build the cascade for `path` from previously chosen ids.
///
/// The first level's candidates are fetched, then each selection in `selected`
/// is applied top-down, fetching the child level's candidates as it goes. This
/// is how a saved expense's hierarchy is restored for editing, and how a
/// cascade is rebuilt after the user changes one of its selects.
/// Ids do not have to appear in the fetched candidates.
pub async fn prepopulate<F: EntityFetcher>(
    path: CascadePath,
    selected: &[(Level, Option<EntityId>)],
    fetcher: &F,
) -> CascadeLoad {
    let mut controller = SelectionController::new(path);
    let mut failed = false;

    let root = controller.root_request();
    let (entities, ok) = fetch_candidates(fetcher, root.lookup, root.parent_id).await;
    failed |= !ok;
    controller.apply_fetch(root.ticket, entities);

    for level in path.levels() {
        let id = selected
            .iter()
            .find(|(selected_level, _)| *selected_level == level)
            .and_then(|(_, id)| *id);

        let Some(id) = id else {
            break;
        };

        if let Some(request) = controller.set_selection(level, Some(id)) {
            let (entities, ok) =
                fetch_candidates(fetcher, request.lookup, request.parent_id).await;
            failed |= !ok;
            controller.apply_fetch(request.ticket, entities);
        }
    }

    CascadeLoad { controller, failed }
}

/// Rebuild a cascade from the ids a browser submitted.
///
/// `changed` names the select the user just changed. The ids submitted for the
/// levels below it still belong to the previous selection, so they are dropped
/// before the cascade is restored.
pub async fn rebuild<F: EntityFetcher>(
    path: CascadePath,
    submitted: &[(Level, Option<EntityId>)],
    changed: Option<Level>,
    fetcher: &F,
) -> CascadeLoad {
    let position = |level: Level| path.levels().position(|path_level| path_level == level);
    let cutoff = changed.and_then(position);

    let selected = submitted
        .iter()
        .filter(|(level, _)| match (cutoff, position(*level)) {
            (Some(cutoff), Some(index)) => index <= cutoff,
            (None, Some(_)) => true,
            (_, None) => false,
        })
        .copied()
        .collect::<Vec<_>>();

    prepopulate(path, &selected, fetcher).await
}
