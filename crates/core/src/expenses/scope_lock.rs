//! Per-scope async locks serializing check-then-write on a budget's spend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::budgets::BudgetScope;

type LockMap = DashMap<BudgetScope, Arc<Mutex<()>>>;

/// One async mutex per budget scope, created on first use and dropped again
/// once the last guard or waiter for that scope is gone.
#[derive(Clone, Default)]
pub struct ScopeLocks {
    locks: Arc<LockMap>,
}

/// Holds a scope's lock. Dropping it unlocks the scope and evicts the map
/// entry when nobody else holds or awaits it.
pub struct ScopeGuard {
    guard: Option<OwnedMutexGuard<()>>,
    scope: BudgetScope,
    locks: Arc<LockMap>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Serialized with `handle` on the shard lock, so a count of one
        // means no task can still reach this mutex.
        self.locks
            .remove_if(&self.scope, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl ScopeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, scope: BudgetScope) -> Arc<Mutex<()>> {
        // The shard guard is released at the end of this statement, never
        // held across an await.
        self.locks.entry(scope).or_default().clone()
    }

    pub async fn lock(&self, scope: BudgetScope) -> ScopeGuard {
        let guard = self.handle(scope).lock_owned().await;
        ScopeGuard {
            guard: Some(guard),
            scope,
            locks: Arc::clone(&self.locks),
        }
    }

    /// Locks several scopes in key order so overlapping callers cannot
    /// deadlock.
    pub async fn lock_all(
        &self,
        scopes: impl IntoIterator<Item = BudgetScope>,
    ) -> Vec<ScopeGuard> {
        let mut scopes: Vec<BudgetScope> = scopes.into_iter().collect();
        scopes.sort();
        scopes.dedup();

        let mut guards = Vec::with_capacity(scopes.len());
        for scope in scopes {
            guards.push(self.lock(scope).await);
        }
        guards
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
