//! # Generic Actor Server
//!
//! `ResourceActor` owns one table. It loads the rows at startup, processes
//! requests strictly one at a time, and writes the whole table back after every
//! committed change.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::{Filter, ResourceRequest};
use crate::storage::{MemoryTable, StorageError, Table};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The generic actor that manages a table of records.
///
/// # Concurrency Model
/// Each actor processes its own messages sequentially. Every read-modify-write
/// of a record happens inside a single message, so two status changes racing on
/// the same order are applied one after the other and neither is lost. No
/// `Mutex` is needed around the store.
///
/// # Commit protocol
/// Every mutation is computed on a copy first. Only when the record's hooks have
/// succeeded is the copy placed in the store and the table saved. If the save
/// fails the previous state is put back and the record's
/// [`rollback`](ActorEntity::rollback) hook undoes any side effects it had on
/// other actors.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    table: Box<dyn Table<T>>,
    entity_type: &'static str,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates an actor over an empty in-memory table, and its client.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let entity_type = entity_type_name::<T>();
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            table: Box::new(MemoryTable::<T>::new(entity_type)),
            entity_type,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Creates an actor over `table`, loading and validating its rows.
    ///
    /// # Errors
    /// Fails if the table cannot be read, a row breaks its record's invariants,
    /// or two rows share a key.
    pub fn with_table(
        buffer_size: usize,
        table: impl Table<T>,
    ) -> Result<(Self, ResourceClient<T>), FrameworkError> {
        let store = load_store(&table)?;
        let entity_type = entity_type_name::<T>();
        info!(entity_type, table = table.name(), rows = store.len(), "Table loaded");
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store,
            table: Box::new(table),
            entity_type,
        };
        Ok((actor, ResourceClient::new(sender)))
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every record hook, so dependencies
    /// created after this actor (other clients) can still be wired in.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = self.entity_type;
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(params, &context).await;
                    if let Err(e) = &result {
                        warn!(entity_type, error = %e, "Create failed");
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::CreateMany { params, respond_to } => {
                    debug!(entity_type, count = params.len(), "CreateMany");
                    let result = self.create_many(params, &context).await;
                    if let Err(e) = &result {
                        warn!(entity_type, error = %e, "CreateMany failed");
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Query { filter, respond_to } => {
                    let items = self.query(&filter);
                    debug!(entity_type, matched = items.len(), "Query");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(id.clone(), update, &context).await;
                    if let Err(e) = &result {
                        warn!(entity_type, %id, error = %e, "Update failed");
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.delete(id.clone(), &context).await;
                    if let Err(e) = &result {
                        warn!(entity_type, %id, error = %e, "Delete failed");
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = self.action(id.clone(), action, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::ActionMany {
                    actions,
                    respond_to,
                } => {
                    debug!(entity_type, ?actions, "ActionMany");
                    let result = self.action_many(actions, &context).await;
                    match &result {
                        Ok(results) => info!(entity_type, count = results.len(), "Actions ok"),
                        Err(e) => warn!(entity_type, error = %e, "Actions failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn query(&self, filter: &Filter<T>) -> Vec<T> {
        self.store
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect()
    }

    /// Assign a key, build, validate and run `on_create`. Nothing is stored yet.
    ///
    /// `pending` holds records built earlier in the same batch, which count for
    /// key and uniqueness checks.
    async fn build(
        &self,
        params: T::Create,
        pending: &[T],
        ctx: &T::Context,
    ) -> Result<T, FrameworkError> {
        let id = T::assign_id(&params);
        if self.store.contains_key(&id) || pending.iter().any(|p| p.id() == &id) {
            return Err(FrameworkError::Conflict(id.to_string()));
        }
        let mut item = T::from_create_params(id, params).map_err(FrameworkError::entity)?;
        item.validate().map_err(FrameworkError::entity)?;
        if let Some(existing) = self
            .store
            .values()
            .chain(pending.iter())
            .find(|other| item.conflicts_with(other))
        {
            return Err(FrameworkError::Conflict(existing.id().to_string()));
        }
        item.on_create(ctx).await.map_err(FrameworkError::entity)?;
        Ok(item)
    }

    async fn create(&mut self, params: T::Create, ctx: &T::Context) -> Result<T::Id, FrameworkError> {
        let item = self.build(params, &[], ctx).await?;
        let id = item.id().clone();
        self.store.insert(id.clone(), item.clone());
        if let Err(e) = self.persist() {
            self.store.remove(&id);
            self.undo(&item, None, ctx).await;
            return Err(e);
        }
        info!(entity_type = self.entity_type, %id, size = self.store.len(), "Created");
        Ok(id)
    }

    async fn create_many(
        &mut self,
        params: Vec<T::Create>,
        ctx: &T::Context,
    ) -> Result<Vec<T::Id>, FrameworkError> {
        let mut built: Vec<T> = Vec::with_capacity(params.len());
        for p in params {
            match self.build(p, &built, ctx).await {
                Ok(item) => built.push(item),
                Err(e) => {
                    for item in &built {
                        self.undo(item, None, ctx).await;
                    }
                    return Err(e);
                }
            }
        }

        let ids: Vec<T::Id> = built.iter().map(|item| item.id().clone()).collect();
        for item in &built {
            self.store.insert(item.id().clone(), item.clone());
        }
        if let Err(e) = self.persist() {
            for id in &ids {
                self.store.remove(id);
            }
            for item in &built {
                self.undo(item, None, ctx).await;
            }
            return Err(e);
        }
        info!(entity_type = self.entity_type, count = ids.len(), size = self.store.len(), "Created batch");
        Ok(ids)
    }

    async fn update(&mut self, id: T::Id, update: T::Update, ctx: &T::Context) -> Result<T, FrameworkError> {
        let Some(before) = self.store.get(&id).cloned() else {
            return Err(FrameworkError::NotFound(id.to_string()));
        };
        let mut next = before.clone();
        next.on_update(update, ctx).await.map_err(FrameworkError::entity)?;
        next.validate().map_err(FrameworkError::entity)?;
        self.commit(id.clone(), before, next.clone(), ctx).await?;
        info!(entity_type = self.entity_type, %id, "Updated");
        Ok(next)
    }

    async fn delete(&mut self, id: T::Id, ctx: &T::Context) -> Result<(), FrameworkError> {
        let Some(item) = self.store.get(&id).cloned() else {
            return Err(FrameworkError::NotFound(id.to_string()));
        };
        item.on_delete(ctx).await.map_err(FrameworkError::entity)?;
        self.store.remove(&id);
        if let Err(e) = self.persist() {
            self.store.insert(id, item);
            return Err(e);
        }
        info!(entity_type = self.entity_type, %id, size = self.store.len(), "Deleted");
        Ok(())
    }

    async fn action(
        &mut self,
        id: T::Id,
        action: T::Action,
        ctx: &T::Context,
    ) -> Result<T::ActionResult, FrameworkError> {
        let Some(before) = self.store.get(&id).cloned() else {
            return Err(FrameworkError::NotFound(id.to_string()));
        };
        let mut next = before.clone();
        let result = next
            .handle_action(action, ctx)
            .await
            .map_err(FrameworkError::entity)?;
        next.validate().map_err(FrameworkError::entity)?;
        self.commit(id, before, next, ctx).await?;
        Ok(result)
    }

    async fn action_many(
        &mut self,
        actions: Vec<(T::Id, T::Action)>,
        ctx: &T::Context,
    ) -> Result<Vec<T::ActionResult>, FrameworkError> {
        let mut originals: HashMap<T::Id, T> = HashMap::new();
        let mut working: HashMap<T::Id, T> = HashMap::new();
        let mut results = Vec::with_capacity(actions.len());
        let mut failure = None;

        for (id, action) in actions {
            let item = match working.entry(id.clone()) {
                Entry::Occupied(slot) => slot.into_mut(),
                Entry::Vacant(slot) => match self.store.get(&id) {
                    Some(current) => {
                        originals.insert(id.clone(), current.clone());
                        slot.insert(current.clone())
                    }
                    None => {
                        failure = Some(FrameworkError::NotFound(id.to_string()));
                        break;
                    }
                },
            };
            match item.handle_action(action, ctx).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    failure = Some(FrameworkError::entity(e));
                    break;
                }
            }
        }

        if failure.is_none() {
            failure = working
                .values()
                .find_map(|item| item.validate().err())
                .map(FrameworkError::entity);
        }
        if let Some(e) = failure {
            for (id, item) in &working {
                self.undo(item, originals.get(id), ctx).await;
            }
            return Err(e);
        }

        for (id, item) in &working {
            self.store.insert(id.clone(), item.clone());
        }
        if let Err(e) = self.persist() {
            for (id, item) in &originals {
                self.store.insert(id.clone(), item.clone());
            }
            for (id, item) in &working {
                self.undo(item, originals.get(id), ctx).await;
            }
            return Err(e);
        }
        Ok(results)
    }

    /// Replace `before` with `next` and save; restore and roll back on failure.
    async fn commit(&mut self, id: T::Id, before: T, next: T, ctx: &T::Context) -> Result<(), FrameworkError> {
        self.store.insert(id.clone(), next.clone());
        if let Err(e) = self.persist() {
            self.store.insert(id, before.clone());
            self.undo(&next, Some(&before), ctx).await;
            return Err(e);
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), FrameworkError> {
        let rows: Vec<&T> = self.store.values().collect();
        self.table.save(&rows).map_err(|e| {
            error!(entity_type = self.entity_type, table = self.table.name(), error = %e, "Save failed");
            FrameworkError::Storage(e)
        })
    }

    async fn undo(&self, item: &T, before: Option<&T>, ctx: &T::Context) {
        if let Err(e) = item.rollback(before, ctx).await {
            error!(entity_type = self.entity_type, id = %item.id(), error = %e, "Rollback failed");
        }
    }
}

fn load_store<T: ActorEntity>(table: &dyn Table<T>) -> Result<HashMap<T::Id, T>, StorageError> {
    let rows = table.load()?;
    let mut store = HashMap::with_capacity(rows.len());
    for row in rows {
        if let Err(e) = row.validate() {
            return Err(StorageError::InvalidRow {
                table: table.name().to_string(),
                id: row.id().to_string(),
                reason: e.to_string(),
            });
        }
        let id = row.id().clone();
        if store.insert(id.clone(), row).is_some() {
            return Err(StorageError::DuplicateId {
                table: table.name().to_string(),
                id: id.to_string(),
            });
        }
    }
    Ok(store)
}

/// Just the type name, e.g. "Product" instead of "storefront::model::product::Product".
fn entity_type_name<T>() -> &'static str {
    std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("Unknown")
}
