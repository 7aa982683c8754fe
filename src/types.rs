use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::period::BillingPeriod;

/// unique identifier for a client
pub type ClientId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// derived (or administratively set) state of one billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodStatus {
    /// no payment applied yet
    Pending,
    /// some payment applied, below the plan price
    PartiallyPaid,
    /// accumulated payments cover the plan price
    Paid,
    /// administratively blocked; never derived from payment sums
    Suspended,
}

/// administrative state of the client account, used as a suspension
/// fallback signal when a client has no period rows yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    Active,
    Suspended,
    Inactive,
}

/// one payment row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub client_id: ClientId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    /// the period the payment counts against, independent of the payment date
    pub applied_period: BillingPeriod,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub voided: bool,
}

/// one period row as stored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub client_id: ClientId,
    pub period: BillingPeriod,
    pub status: PeriodStatus,
}

/// request to apply a single payment
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub client_id: ClientId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub reference: Option<String>,
    pub note: Option<String>,
    /// Some => explicit application: the stated period is honored even if
    /// suspended. None => inferred from the payment date, subject to
    /// suspension redirection.
    pub applied_period: Option<BillingPeriod>,
}

/// request to split one total across several caller-chosen periods
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPeriodRequest {
    pub client_id: ClientId,
    pub total_amount: Money,
    pub payment_date: NaiveDate,
    pub reference: Option<String>,
    pub note: Option<String>,
    /// candidate periods in the order the split should be allocated
    pub periods: Vec<BillingPeriod>,
}

/// replacement data for an existing payment
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentUpdate {
    pub client_id: ClientId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub applied_period: Option<BillingPeriod>,
    pub voided: bool,
}

/// result of applying a single payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub payment_id: PaymentId,
    pub applied_period: BillingPeriod,
    /// true when the inferred period was suspended and the payment was moved
    /// to the most recent eligible pending period
    pub redirected: bool,
}

/// one slice of a multi-period payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedPayment {
    pub payment_id: PaymentId,
    pub period: BillingPeriod,
    pub amount: Money,
}

/// result of a multi-period payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPaymentReceipt {
    pub payments: Vec<AppliedPayment>,
    pub requested: usize,
    pub applied: usize,
    /// candidate periods dropped because they were suspended
    pub omitted: usize,
}

/// result of updating a payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateReceipt {
    pub applied_period: BillingPeriod,
    pub redirected: bool,
}

/// aggregate view of one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub plan_price: Money,
    pub total_paid: Money,
    pub status: PeriodStatus,
}

/// one row of the pending-periods listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingPeriod {
    pub period: BillingPeriod,
    pub status: PeriodStatus,
    pub plan_price: Money,
    pub total_paid: Money,
}
