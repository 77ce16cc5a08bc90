use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    Error,
    hierarchy::{Entity, EntityFetcher, EntityId, Lookup},
};

/// An in-memory fetcher that records every request it receives.
#[derive(Default, Clone)]
pub(crate) struct StubFetcher {
    pub lists: HashMap<(Lookup, Option<EntityId>), Vec<Entity>>,
    pub failing: Vec<Lookup>,
    pub calls: Arc<Mutex<Vec<(Lookup, Option<EntityId>)>>>,
}

impl StubFetcher {
    pub(crate) fn with(
        mut self,
        lookup: Lookup,
        parent_id: Option<EntityId>,
        entities: &[(EntityId, &str)],
    ) -> Self {
        self.lists.insert(
            (lookup, parent_id),
            entities
                .iter()
                .map(|(id, name)| Entity::new(*id, name))
                .collect(),
        );
        self
    }

    pub(crate) fn failing(mut self, lookup: Lookup) -> Self {
        self.failing.push(lookup);
        self
    }
}

impl EntityFetcher for StubFetcher {
    async fn fetch(
        &self,
        lookup: Lookup,
        parent_id: Option<EntityId>,
    ) -> Result<Vec<Entity>, Error> {
        self.calls.lock().unwrap().push((lookup, parent_id));

        if self.failing.contains(&lookup) {
            return Err(Error::ApiRequest("connection refused".to_owned()));
        }

        Ok(self
            .lists
            .get(&(lookup, parent_id))
            .cloned()
            .unwrap_or_default())
    }
}

