use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::period::BillingPeriod;
use crate::types::{ClientId, PaymentId, PeriodStatus};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    PaymentApplied {
        payment_id: PaymentId,
        client_id: ClientId,
        period: BillingPeriod,
        amount: Money,
        redirected: bool,
        timestamp: DateTime<Utc>,
    },
    PaymentUpdated {
        payment_id: PaymentId,
        client_id: ClientId,
        period: BillingPeriod,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentDeleted {
        payment_id: PaymentId,
        client_id: ClientId,
        period: BillingPeriod,
        timestamp: DateTime<Utc>,
    },
    PeriodStatusChanged {
        client_id: ClientId,
        period: BillingPeriod,
        old_status: Option<PeriodStatus>,
        new_status: PeriodStatus,
        timestamp: DateTime<Utc>,
    },
    PeriodsSeeded {
        client_id: ClientId,
        first: BillingPeriod,
        last: BillingPeriod,
        created: u32,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_take_events_drains() {
        let mut store = EventStore::new();
        store.emit(Event::PeriodStatusChanged {
            client_id: Uuid::new_v4(),
            period: BillingPeriod::new(2024, 3).unwrap(),
            old_status: None,
            new_status: PeriodStatus::Pending,
            timestamp: Utc::now(),
        });
        assert_eq!(store.events().len(), 1);
        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::PaymentApplied {
            payment_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            period: BillingPeriod::new(2024, 5).unwrap(),
            amount: Money::from_major(150),
            redirected: true,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
