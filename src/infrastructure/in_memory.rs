use crate::domain::payment::PaymentRecord;
use crate::domain::ports::PaymentStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Volatile, process-lifetime payment ledger.
///
/// A single `RwLock` guards both the id map and the idempotency index, so
/// a reader never observes an index entry pointing at a record that is
/// not yet visible, or a record without its index entry.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    inner: Arc<RwLock<Ledger>>,
}

#[derive(Default)]
struct Ledger {
    payments: HashMap<Uuid, PaymentRecord>,
    idempotency_index: HashMap<String, Uuid>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn usable_key(key: Option<&str>) -> Option<&str> {
    key.filter(|k| !k.trim().is_empty())
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn store_if_keyed(&self, record: PaymentRecord, idempotency_key: Option<&str>) {
        let Some(key) = usable_key(idempotency_key) else {
            info!(id = %record.id, "payment not stored: no idempotency key");
            return;
        };

        let mut ledger = self.inner.write().await;
        ledger.idempotency_index.insert(key.to_string(), record.id);
        info!(id = %record.id, "payment stored");
        ledger.payments.insert(record.id, record);
    }

    async fn get(&self, id: Uuid) -> Option<PaymentRecord> {
        let ledger = self.inner.read().await;
        ledger.payments.get(&id).cloned()
    }

    async fn get_by_idempotency_key(&self, key: Option<&str>) -> Option<PaymentRecord> {
        let key = usable_key(key)?;
        let ledger = self.inner.read().await;
        let id = ledger.idempotency_index.get(key)?;
        ledger.payments.get(id).cloned()
    }

    async fn reset(&self) {
        let mut ledger = self.inner.write().await;
        ledger.payments.clear();
        ledger.idempotency_index.clear();
    }
}
