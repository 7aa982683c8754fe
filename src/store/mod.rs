pub mod memory;

pub use memory::MemoryStore;

use crate::decimal::Money;
use crate::errors::Result;
use crate::period::BillingPeriod;
use crate::types::{ClientId, ClientStatus, PaymentId, PaymentRecord, PeriodRecord, PeriodStatus};

/// persistence seam the ledger operates against
///
/// One implementation per product line gives each line its own plan lookup,
/// period table, and payment table behind the same engine. Implementations
/// must make `begin`/`commit`/`rollback` delimit a real unit of atomicity:
/// all reads and writes between `begin` and `commit` are isolated from
/// concurrent operations on the same client, and `rollback` discards every
/// write since `begin`. An in-memory implementation is provided for tests
/// and embedders without a database.
pub trait LedgerStore {
    fn begin(&mut self) -> Result<()>;
    fn commit(&mut self) -> Result<()>;
    fn rollback(&mut self) -> Result<()>;

    /// monthly price of the client's plan; None when the client has no
    /// resolvable plan
    fn plan_price(&self, client_id: ClientId) -> Result<Option<Money>>;

    /// the client's current administrative status
    fn client_status(&self, client_id: ClientId) -> Result<Option<ClientStatus>>;

    /// status of the exact (client, period) row, if one exists
    fn period_status(&self, client_id: ClientId, period: BillingPeriod)
        -> Result<Option<PeriodStatus>>;

    /// status of the most recent period row at or before `period`
    fn latest_status_on_or_before(
        &self,
        client_id: ClientId,
        period: BillingPeriod,
    ) -> Result<Option<PeriodStatus>>;

    /// all period rows with period <= `through`, most recent first
    fn periods_through(
        &self,
        client_id: ClientId,
        through: BillingPeriod,
    ) -> Result<Vec<PeriodRecord>>;

    /// insert-or-update in place; at most one row per (client, period)
    fn upsert_period(
        &mut self,
        client_id: ClientId,
        period: BillingPeriod,
        status: PeriodStatus,
    ) -> Result<()>;

    fn payment(&self, id: PaymentId) -> Result<Option<PaymentRecord>>;

    /// all payment rows applied to the given (client, period), voided included
    fn payments_for_period(
        &self,
        client_id: ClientId,
        period: BillingPeriod,
    ) -> Result<Vec<PaymentRecord>>;

    fn insert_payment(&mut self, payment: &PaymentRecord) -> Result<()>;

    fn update_payment(&mut self, payment: &PaymentRecord) -> Result<()>;

    fn delete_payment(&mut self, id: PaymentId) -> Result<()>;
}
