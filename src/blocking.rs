//! Clients parked on keys until a write or a deadline lets them finish.

use std::collections::{BTreeSet, HashMap, VecDeque};

use tokio::{sync::oneshot, time::Instant};
use tracing::debug;

use crate::{
    commands::{RetryFn, Suspension},
    engine::ClientId,
    key_value_store::KeySpace,
    resp::RespValue,
};

/// Monotonic registration order. Lower IDs were parked earlier.
pub type WaiterId = u64;

struct Waiter {
    client: ClientId,
    keys: Vec<String>,
    deadline: Option<Instant>,
    retry: RetryFn,
    reply: oneshot::Sender<RespValue>,
}

/// Waiters indexed by ID and by every key they block on.
///
/// Each key keeps its waiters in arrival order, so the longest-waiting client
/// is always tried first. A waiter listed under several keys is removed from
/// all of them as soon as it completes, times out or disconnects.
///
/// Waiters with a deadline are also kept in deadline order, so a sweep only
/// visits the ones that actually expired.
#[derive(Default)]
pub struct BlockingRegistry {
    next_id: WaiterId,
    waiters: HashMap<WaiterId, Waiter>,
    by_key: HashMap<String, VecDeque<WaiterId>>,
    deadlines: BTreeSet<(Instant, WaiterId)>,
}

impl BlockingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        client: ClientId,
        suspension: Suspension,
        reply: oneshot::Sender<RespValue>,
    ) -> WaiterId {
        let id = self.next_id;
        self.next_id += 1;

        let mut keys: Vec<String> = Vec::with_capacity(suspension.keys.len());

        for key in suspension.keys {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        for key in &keys {
            self.by_key.entry(key.clone()).or_default().push_back(id);
        }

        if let Some(deadline) = suspension.deadline {
            self.deadlines.insert((deadline, id));
        }

        debug!(client, waiter = id, ?keys, "client suspended");

        self.waiters.insert(
            id,
            Waiter {
                client,
                keys,
                deadline: suspension.deadline,
                retry: suspension.retry,
                reply,
            },
        );

        id
    }

    fn unregister(&mut self, id: WaiterId) -> Option<Waiter> {
        let waiter = self.waiters.remove(&id)?;

        if let Some(deadline) = waiter.deadline {
            self.deadlines.remove(&(deadline, id));
        }

        for key in &waiter.keys {
            if let Some(queue) = self.by_key.get_mut(key) {
                queue.retain(|queued| *queued != id);

                if queue.is_empty() {
                    self.by_key.remove(key);
                }
            }
        }

        Some(waiter)
    }

    /// Gives the earliest waiter on `key` one chance to complete.
    ///
    /// Waiters whose client already hung up are discarded on the way. If the
    /// retry still finds nothing, the waiter stays parked and no later waiter
    /// is tried for this signal.
    ///
    /// # Returns
    ///
    /// * `Some(ClientId)` - The client that was answered
    /// * `None` - Nobody was waiting or the front waiter could not complete
    pub fn wake(&mut self, key: &str, keyspace: &mut KeySpace) -> Option<ClientId> {
        loop {
            let id = *self.by_key.get(key)?.front()?;
            let waiter = self.waiters.get_mut(&id)?;

            if waiter.reply.is_closed() {
                debug!(client = waiter.client, waiter = id, "dropping abandoned waiter");
                self.unregister(id);
                continue;
            }

            let reply = (waiter.retry)(keyspace, key)?;
            let waiter = self.unregister(id)?;

            debug!(client = waiter.client, waiter = id, key, "client woken");

            if waiter.reply.send(reply).is_err() {
                debug!(client = waiter.client, "woken client is gone");
            }

            return Some(waiter.client);
        }
    }

    /// Answers every waiter whose deadline is at or before `now` with the
    /// null-array timeout reply. Returns how many timed out.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let mut expired = 0;

        while let Some(&(deadline, id)) = self.deadlines.first() {
            if deadline > now {
                break;
            }

            self.deadlines.pop_first();

            if let Some(waiter) = self.unregister(id) {
                debug!(client = waiter.client, waiter = id, "blocking command timed out");
                let _ = waiter.reply.send(RespValue::NullArray);
                expired += 1;
            }
        }

        expired
    }

    /// Forgets every waiter owned by `client` without replying.
    pub fn remove_client(&mut self, client: ClientId) -> usize {
        let owned = self
            .waiters
            .iter()
            .filter(|(_, waiter)| waiter.client == client)
            .map(|(id, _)| *id)
            .collect::<Vec<WaiterId>>();

        for id in &owned {
            self.unregister(*id);
        }

        owned.len()
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    /// Number of waiters currently listed under `key`.
    pub fn waiting_on(&self, key: &str) -> usize {
        self.by_key.get(key).map_or(0, VecDeque::len)
    }
}
