use crate::domain::payment::{PaymentRecord, PaymentRequest, PaymentStatus, ProcessingResult};
use crate::domain::ports::{BankClient, BankRequest, PaymentStore};
use crate::domain::validation::PaymentValidator;
use crate::error::GatewayError;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrates a payment from idempotency lookup through persistence.
///
/// Holds no mutable state of its own; the ledger is the only shared
/// resource and synchronizes internally. Validation failures and bank
/// declines come back as [`ProcessingResult`] values, never as errors.
pub struct PaymentGateway {
    store: Arc<dyn PaymentStore>,
    bank: Arc<dyn BankClient>,
    validator: PaymentValidator,
}

impl PaymentGateway {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        bank: Arc<dyn BankClient>,
        validator: PaymentValidator,
    ) -> Self {
        Self {
            store,
            bank,
            validator,
        }
    }

    pub async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<ProcessingResult, GatewayError> {
        let key = request.idempotency_key.as_deref();

        if let Some(existing) = self.store.get_by_idempotency_key(key).await {
            info!(id = %existing.id, "returning cached response for idempotency key");
            return Ok(ProcessingResult::Processed(existing));
        }

        let errors = self.validator.validate(request);
        if !errors.is_empty() {
            warn!(?errors, "payment rejected");
            return Ok(ProcessingResult::Rejected(errors));
        }

        let card = request.card();
        let money = request.money();

        // An unavailable bank is an infrastructure failure, not a business
        // outcome; it propagates unmodified and nothing is stored.
        let bank_response = self.bank.authorize(&BankRequest::new(&card, &money)).await?;

        let status = if bank_response.authorized {
            PaymentStatus::Authorized
        } else {
            PaymentStatus::Declined
        };

        let record = PaymentRecord {
            id: Uuid::new_v4(),
            status,
            card_number_last_four: card.last_four_digits(),
            expiry_month: card.expiry_month,
            expiry_year: card.expiry_year,
            currency: money.currency,
            amount: money.amount,
        };

        // Known race: two concurrent requests with the same key can both
        // miss the lookup above, call the bank twice, and race this store.
        // The ledger insert stays atomic, but each caller returns its own
        // record, so they may observe different ids for one logical payment.
        self.store.store_if_keyed(record.clone(), key).await;

        info!(id = %record.id, status = ?status, "payment processed");
        Ok(ProcessingResult::Processed(record))
    }

    pub async fn get_payment(&self, id: Uuid) -> Result<PaymentRecord, GatewayError> {
        self.store
            .get(id)
            .await
            .ok_or(GatewayError::PaymentNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::BankResponse;
    use crate::error::BankFailure;
    use crate::infrastructure::in_memory::InMemoryPaymentStore;
    use async_trait::async_trait;
    use chrono::{Datelike, Utc};
    use std::sync::atomic::{AtomicU32, Ordering};

    enum Behavior {
        Authorize,
        Decline,
        Unavailable,
    }

    struct StubBank {
        behavior: Behavior,
        calls: AtomicU32,
    }

    impl StubBank {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BankClient for StubBank {
        async fn authorize(&self, _request: &BankRequest) -> Result<BankResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Authorize => Ok(BankResponse {
                    authorized: true,
                    authorization_code: Some("auth-123".to_string()),
                }),
                Behavior::Decline => Ok(BankResponse {
                    authorized: false,
                    authorization_code: None,
                }),
                Behavior::Unavailable => Err(GatewayError::BankUnavailable {
                    attempts: 2,
                    source: BankFailure::Interrupted,
                }),
            }
        }
    }

    fn request(idempotency_key: Option<&str>) -> PaymentRequest {
        serde_json::from_value(serde_json::json!({
            "idempotency_key": idempotency_key,
            "card_number": "2222405343248877",
            "expiry_month": 12,
            "expiry_year": Utc::now().year() + 1,
            "currency": "GBP",
            "amount": 100,
            "cvv": "123"
        }))
        .expect("deserializable request")
    }

    fn gateway(bank: Arc<StubBank>) -> (PaymentGateway, Arc<InMemoryPaymentStore>) {
        let store = Arc::new(InMemoryPaymentStore::new());
        let gateway = PaymentGateway::new(store.clone(), bank, PaymentValidator::default());
        (gateway, store)
    }

    #[tokio::test]
    async fn test_authorized_when_bank_authorizes() {
        let bank = StubBank::new(Behavior::Authorize);
        let (gateway, _) = gateway(bank.clone());

        let result = gateway
            .process_payment(&request(Some("order-123")))
            .await
            .unwrap();

        assert!(result.is_authorized());
        let ProcessingResult::Processed(record) = result else {
            panic!("expected processed record");
        };
        assert_eq!(record.card_number_last_four, "8877");
        assert_eq!(gateway.get_payment(record.id).await.unwrap(), record);
        assert_eq!(bank.calls(), 1);
    }

    #[tokio::test]
    async fn test_declined_when_bank_declines() {
        let bank = StubBank::new(Behavior::Decline);
        let (gateway, _) = gateway(bank);

        let result = gateway
            .process_payment(&request(Some("order-123")))
            .await
            .unwrap();

        assert_eq!(result.status(), PaymentStatus::Declined);
        let ProcessingResult::Processed(record) = result else {
            panic!("expected processed record");
        };
        // Declined outcomes are persisted too.
        assert_eq!(gateway.get_payment(record.id).await.unwrap().status, PaymentStatus::Declined);
    }

    #[tokio::test]
    async fn test_rejected_without_contacting_bank() {
        let bank = StubBank::new(Behavior::Authorize);
        let (gateway, store) = gateway(bank.clone());

        let mut rejected = request(Some("order-123"));
        rejected.expiry_year = 2020;

        let result = gateway.process_payment(&rejected).await.unwrap();

        assert!(result.is_rejected());
        assert_eq!(bank.calls(), 0);
        assert_eq!(store.get_by_idempotency_key(Some("order-123")).await, None);
    }

    #[tokio::test]
    async fn test_idempotent_replay_returns_identical_record() {
        let bank = StubBank::new(Behavior::Authorize);
        let (gateway, _) = gateway(bank.clone());
        let request = request(Some("order-123"));

        let first = gateway.process_payment(&request).await.unwrap();
        let second = gateway.process_payment(&request).await.unwrap();
        let third = gateway.process_payment(&request).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(bank.calls(), 1);
    }

    #[tokio::test]
    async fn test_cached_replay_skips_revalidation() {
        let bank = StubBank::new(Behavior::Authorize);
        let (gateway, store) = gateway(bank.clone());

        let first = gateway
            .process_payment(&request(Some("order-123")))
            .await
            .unwrap();
        let ProcessingResult::Processed(record) = first else {
            panic!("expected processed record");
        };

        // A now-invalid request under the same key still replays the
        // stored outcome; validation never runs on a cache hit.
        let mut invalid = request(Some("order-123"));
        invalid.expiry_year = 2020;
        let replay = gateway.process_payment(&invalid).await.unwrap();

        assert_eq!(replay, ProcessingResult::Processed(record.clone()));
        assert_eq!(bank.calls(), 1);
        assert_eq!(
            store.get_by_idempotency_key(Some("order-123")).await,
            Some(record)
        );
    }

    #[tokio::test]
    async fn test_unkeyed_payment_is_not_stored() {
        let bank = StubBank::new(Behavior::Authorize);
        let (gateway, _) = gateway(bank.clone());

        let first = gateway.process_payment(&request(None)).await.unwrap();
        let second = gateway.process_payment(&request(None)).await.unwrap();

        let (ProcessingResult::Processed(a), ProcessingResult::Processed(b)) = (first, second)
        else {
            panic!("expected processed records");
        };
        assert_ne!(a.id, b.id);
        assert_eq!(bank.calls(), 2);
        assert!(matches!(
            gateway.get_payment(a.id).await,
            Err(GatewayError::PaymentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_bank_unavailable_propagates_and_stores_nothing() {
        let bank = StubBank::new(Behavior::Unavailable);
        let (gateway, store) = gateway(bank);

        let result = gateway.process_payment(&request(Some("order-123"))).await;

        assert!(matches!(
            result,
            Err(GatewayError::BankUnavailable { attempts: 2, .. })
        ));
        assert_eq!(store.get_by_idempotency_key(Some("order-123")).await, None);
    }

    #[tokio::test]
    async fn test_get_payment_unknown_id_is_not_found() {
        let bank = StubBank::new(Behavior::Authorize);
        let (gateway, _) = gateway(bank);

        let id = Uuid::new_v4();
        let err = gateway.get_payment(id).await.unwrap_err();
        assert!(matches!(err, GatewayError::PaymentNotFound(missing) if missing == id));
    }
}
