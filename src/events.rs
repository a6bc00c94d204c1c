use std::cmp::Ordering;

use crate::state::CustomerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Arrival,
    ServiceEnd {
        customer: CustomerId,
        server: usize,
    },
}

/// An entry in the pending-event heap. `seq` is the scheduling order; it
/// breaks ties on equal timestamps so simultaneous events fire
/// earliest-scheduled-first.
#[derive(Clone, Copy, Debug)]
pub struct ScheduledEvent {
    pub time: f64,
    pub seq: u64,
    pub kind: EventKind,
}

impl ScheduledEvent {
    pub fn new(time: f64, seq: u64, kind: EventKind) -> Self {
        Self { time, seq, kind }
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    #[test]
    fn heap_pops_in_time_order() {
        let mut heap = BinaryHeap::new();
        heap.push(Reverse(ScheduledEvent::new(3.0, 0, EventKind::Arrival)));
        heap.push(Reverse(ScheduledEvent::new(1.0, 1, EventKind::Arrival)));
        heap.push(Reverse(ScheduledEvent::new(2.0, 2, EventKind::Arrival)));

        let times: Vec<f64> = std::iter::from_fn(|| heap.pop().map(|Reverse(ev)| ev.time)).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn simultaneous_events_pop_in_scheduling_order() {
        let mut heap = BinaryHeap::new();
        heap.push(Reverse(ScheduledEvent::new(
            5.0,
            2,
            EventKind::ServiceEnd {
                customer: CustomerId(7),
                server: 0,
            },
        )));
        heap.push(Reverse(ScheduledEvent::new(5.0, 0, EventKind::Arrival)));
        heap.push(Reverse(ScheduledEvent::new(
            5.0,
            1,
            EventKind::ServiceEnd {
                customer: CustomerId(3),
                server: 1,
            },
        )));

        let seqs: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|Reverse(ev)| ev.seq)).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }
}
