//! Command execution: replay, decide, append.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use common::EntityId;
use event_log::{AppendOptions, LogStore, StoredEvent, Version};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::aggregate::{Aggregate, DomainEvent, EntityCommand};
use crate::error::{ContractViolation, DomainError};

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult<A: Aggregate> {
    /// The state after folding the new events onto the replayed state.
    pub state: A,

    /// The events that were decided and appended, in order.
    pub events: Vec<A::Event>,

    /// The entity's version after the command.
    pub version: Version,
}

/// One exclusive lock per entity id.
///
/// Held from the read of the log until the append completes, so two
/// executions against the same entity never decide on the same prior state.
/// An entry lives only while some execution holds or waits for its lock.
#[derive(Default)]
struct EntityLocks {
    // The table itself is never held across an await.
    locks: StdMutex<HashMap<EntityId, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    fn table(&self) -> MutexGuard<'_, HashMap<EntityId, Arc<Mutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn acquire(&self, entity_id: EntityId) -> EntityGuard<'_> {
        let lock = Arc::clone(self.table().entry(entity_id).or_default());
        let guard = lock.lock_owned().await;
        EntityGuard {
            locks: self,
            entity_id,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table().len()
    }
}

/// Exclusive access to one entity. Dropping it releases the lock and
/// removes the table entry once nobody else holds or waits for it.
struct EntityGuard<'a> {
    locks: &'a EntityLocks,
    entity_id: EntityId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EntityGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        // Clones are only taken under the table lock, so a count of one
        // means the table holds the last reference.
        let mut table = self.locks.table();
        if let Some(lock) = table.get(&self.entity_id)
            && Arc::strong_count(lock) == 1
        {
            table.remove(&self.entity_id);
        }
    }
}

/// Executes commands against an aggregate whose events live in a log store.
///
/// For every command the executor:
/// 1. reads the entity's full log and folds it into the current state
/// 2. asks the aggregate to decide on the command
/// 3. appends the decided events, expecting the version it replayed
/// 4. returns the state with the new events folded in
///
/// A rejected command leaves the log untouched.
pub struct Executor<S, A>
where
    S: LogStore,
    A: Aggregate,
{
    store: S,
    locks: EntityLocks,
    _phantom: PhantomData<A>,
}

impl<S, A> Executor<S, A>
where
    S: LogStore,
    A: Aggregate,
{
    /// Creates a new executor over the given log store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: EntityLocks::default(),
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying log store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rebuilds the current state of an entity from its log.
    ///
    /// Returns None if the entity has no events.
    pub async fn load(&self, entity_id: EntityId) -> Result<Option<A>, DomainError> {
        let (state, _) = self.replay(entity_id).await?;
        Ok(state)
    }

    /// Executes a command and appends the resulting events.
    pub async fn execute(&self, command: A::Command) -> Result<CommandResult<A>, DomainError>
    where
        DomainError: From<A::Error>,
    {
        let entity_id = command.entity_id();
        let command_type = command.command_type();
        metrics::counter!("executor_commands_total", "command" => command_type).increment(1);

        let _guard = self.locks.acquire(entity_id).await;

        let (state, version) = self.replay(entity_id).await?;

        let events = match A::decide(&command, state.as_ref()) {
            Ok(events) => events,
            Err(e) => {
                metrics::counter!("executor_commands_rejected_total", "command" => command_type)
                    .increment(1);
                tracing::warn!(
                    aggregate = A::aggregate_type(),
                    %entity_id,
                    command = command_type,
                    error = %e,
                    "command rejected"
                );
                return Err(e.into());
            }
        };

        // Fold before appending: a batch evolve rejects must never reach the log.
        let new_state = A::fold(state, &events)?
            .ok_or(ContractViolation::NoStateProduced { entity_id })?;

        if events.is_empty() {
            return Ok(CommandResult {
                state: new_state,
                events,
                version,
            });
        }

        let records = self.build_records(entity_id, version, &events)?;
        let new_version = self
            .store
            .append_events(entity_id, records, AppendOptions::expect_version(version))
            .await?;

        metrics::counter!("executor_events_appended_total").increment(events.len() as u64);
        tracing::debug!(
            aggregate = A::aggregate_type(),
            %entity_id,
            command = command_type,
            appended = events.len(),
            %new_version,
            "command executed"
        );

        Ok(CommandResult {
            state: new_state,
            events,
            version: new_version,
        })
    }

    /// Reads and folds an entity's log, returning the state and the
    /// version it was read at.
    async fn replay(&self, entity_id: EntityId) -> Result<(Option<A>, Version), DomainError> {
        let records = self.store.read_events(entity_id).await?;
        let version = Version::from_len(records.len());
        metrics::histogram!("executor_replay_length").record(records.len() as f64);

        let mut state = None;
        for record in records {
            let event = A::Event::decode(&record.event_type, record.payload)?;
            state = Some(A::evolve(state, &event)?);
        }

        tracing::debug!(%entity_id, %version, exists = state.is_some(), "replayed log");
        Ok((state, version))
    }

    /// Wraps decided events in stored records numbered after `current`.
    fn build_records(
        &self,
        entity_id: EntityId,
        current: Version,
        events: &[A::Event],
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let mut records = Vec::with_capacity(events.len());
        let mut version = current;

        for event in events {
            version = version.next();
            let record = StoredEvent::builder()
                .entity_id(entity_id)
                .event_type(event.event_type())
                .version(version)
                .payload(event)?
                .build()?;
            records.push(record);
        }

        Ok(records)
    }
}
