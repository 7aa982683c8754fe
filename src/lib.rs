pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod period;
pub mod reconcile;
pub mod store;
pub mod types;

// re-export key types
pub use config::LedgerConfig;
pub use decimal::Money;
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use ledger::PaymentLedger;
pub use period::BillingPeriod;
pub use reconcile::{derive_status, split_evenly, resolve, ResolvedPeriod};
pub use store::{LedgerStore, MemoryStore};
pub use types::{
    AppliedPayment, ClientId, ClientStatus, MultiPaymentReceipt, MultiPeriodRequest, PaymentId,
    PaymentReceipt, PaymentRecord, PaymentRequest, PaymentUpdate, PendingPeriod, PeriodRecord,
    PeriodStatus, PeriodSummary, UpdateReceipt,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
