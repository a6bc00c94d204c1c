use serde::Serialize;
use std::collections::VecDeque;

use crate::events::ScheduledEvent;

/// Dense index into the engine's customer arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CustomerId(pub usize);

#[derive(Clone, Debug)]
pub struct Customer {
    pub id: CustomerId,
    pub arrival_time: f64,
    pub service_start_time: Option<f64>,
    pub service_end_time: Option<f64>,
}

impl Customer {
    pub fn new(id: CustomerId, arrival_time: f64) -> Self {
        Self {
            id,
            arrival_time,
            service_start_time: None,
            service_end_time: None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Server {
    pub id: usize,
    pub busy: bool,
    pub serving: Option<CustomerId>,
}

impl Server {
    pub fn idle(id: usize) -> Self {
        Self {
            id,
            busy: false,
            serving: None,
        }
    }
}

/// Immutable record of one completed journey through the queue.
#[derive(Clone, Debug, Serialize)]
pub struct ContactRecord {
    pub customer_id: usize,
    pub arrival_time: f64,
    pub queue_wait_time: f64,
    pub service_start_time: f64,
    pub service_end_time: f64,
    pub total_time_in_system: f64,
    pub server_id: usize,
    pub was_queued: bool,
    pub channel: String,
    pub campaign: Option<String>,
    pub skill: Option<String>,
    /// Always false here: the M/M/c model has no patience clock, so every
    /// arrival is eventually served.
    pub abandoned: bool,
}

impl ContactRecord {
    pub fn service_time(&self) -> f64 {
        self.service_end_time - self.service_start_time
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct TimeSeriesSample {
    pub time: f64,
    pub queue_length: usize,
    pub in_service: usize,
}

/// Read-only projection of the engine at its current time.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub now: f64,
    pub queue_length: usize,
    pub in_service: usize,
    pub serviced_count: usize,
    pub average_wait_time: f64,
    pub max_queue_length: usize,
    pub time_series: Vec<TimeSeriesSample>,
}

/// All mutable simulation state, owned by one engine instance and rebuilt
/// wholesale on reset.
#[derive(Debug, Default)]
pub struct EngineState {
    pub now: f64,
    pub event_seq: u64,
    pub pending: std::collections::BinaryHeap<std::cmp::Reverse<ScheduledEvent>>,
    pub waiting: VecDeque<CustomerId>,
    pub servers: Vec<Server>,
    pub customers: Vec<Customer>,
    pub records: Vec<ContactRecord>,
    pub serviced_count: usize,
    pub total_wait_time: f64,
    pub max_queue_length: usize,
    pub time_series: Vec<TimeSeriesSample>,
    pub last_sample_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_record_service_time() {
        let record = ContactRecord {
            customer_id: 0,
            arrival_time: 1.0,
            queue_wait_time: 0.5,
            service_start_time: 1.5,
            service_end_time: 4.0,
            total_time_in_system: 3.0,
            server_id: 0,
            was_queued: true,
            channel: "voice".to_string(),
            campaign: None,
            skill: None,
            abandoned: false,
        };
        assert!((record.service_time() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn idle_server_serves_nobody() {
        let server = Server::idle(3);
        assert_eq!(server.id, 3);
        assert!(!server.busy);
        assert!(server.serving.is_none());
    }
}
