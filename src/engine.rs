use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::events::{EventKind, ScheduledEvent};
use crate::models::SimulationConfig;
use crate::state::{
    ContactRecord, Customer, CustomerId, EngineState, Server, Snapshot, TimeSeriesSample,
};

/// Minimum simulated-time gap between time-series samples.
const SAMPLE_INTERVAL: f64 = 0.5;

/// Steppable M/M/c queue simulator: Poisson arrivals, exponential service,
/// FIFO queue, `c` identical servers.
///
/// The engine is driven by repeated `process_until` calls with increasing
/// targets (an external playback loop sets the cadence); it picks up exactly
/// where the pending-event heap left off, so it never needs to run to
/// completion in one call.
pub struct SimulationEngine {
    pub config: SimulationConfig,
    state: EngineState,
    rng: StdRng,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        validate_config(&config)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut engine = Self {
            config,
            state: EngineState::default(),
            rng,
        };
        engine.initialize();
        Ok(engine)
    }

    /// Drop all simulation state and start over, optionally under a new
    /// configuration. A seeded engine replays the same run after reset.
    pub fn reset(&mut self, config: Option<SimulationConfig>) -> Result<()> {
        if let Some(config) = config {
            validate_config(&config)?;
            self.config = config;
        }
        self.rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.state = EngineState::default();
        self.initialize();
        Ok(())
    }

    fn initialize(&mut self) {
        self.state.servers = (0..self.config.servers as usize).map(Server::idle).collect();
        let first_arrival = self.sample_exponential(self.config.arrival_rate);
        if first_arrival <= self.config.horizon {
            self.schedule(first_arrival, EventKind::Arrival);
        }
    }

    /// Advance the simulation through every pending event up to `target`
    /// (clamped to the horizon). A target at or below the current time is a
    /// no-op; playback drivers may hand us stale targets while pausing.
    pub fn process_until(&mut self, target: f64) {
        let target = target.min(self.config.horizon);
        if target <= self.state.now {
            return;
        }

        while let Some(Reverse(next)) = self.state.pending.peek() {
            if next.time > target {
                break;
            }
            let Reverse(event) = self.state.pending.pop().unwrap();
            self.state.now = event.time;
            match event.kind {
                EventKind::Arrival => self.handle_arrival(),
                EventKind::ServiceEnd { customer, server } => {
                    self.handle_service_end(customer, server)
                }
            }
            self.sample_if_due();
        }

        self.state.now = target;
        if self.state.now > 0.0 && self.state.last_sample_time < self.state.now {
            self.record_sample();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.now >= self.config.horizon || self.state.pending.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        let average_wait_time = if self.state.serviced_count > 0 {
            self.state.total_wait_time / self.state.serviced_count as f64
        } else {
            0.0
        };
        Snapshot {
            now: self.state.now,
            queue_length: self.state.waiting.len(),
            in_service: self.in_service(),
            serviced_count: self.state.serviced_count,
            average_wait_time,
            max_queue_length: self.state.max_queue_length,
            time_series: self.state.time_series.clone(),
        }
    }

    pub fn servers(&self) -> &[Server] {
        &self.state.servers
    }

    pub fn waiting_queue(&self) -> &VecDeque<CustomerId> {
        &self.state.waiting
    }

    pub fn contact_records(&self) -> &[ContactRecord] {
        &self.state.records
    }

    fn handle_arrival(&mut self) {
        let id = CustomerId(self.state.customers.len());
        self.state
            .customers
            .push(Customer::new(id, self.state.now));

        match self.state.servers.iter().position(|s| !s.busy) {
            Some(server) => self.start_service(id, server),
            None => {
                self.state.waiting.push_back(id);
                if self.state.waiting.len() > self.state.max_queue_length {
                    self.state.max_queue_length = self.state.waiting.len();
                }
            }
        }

        // Chain the next arrival so the Poisson stream keeps flowing until
        // the horizon cuts it off.
        let next = self.state.now + self.sample_exponential(self.config.arrival_rate);
        if next <= self.config.horizon {
            self.schedule(next, EventKind::Arrival);
        }
    }

    fn handle_service_end(&mut self, customer: CustomerId, server: usize) {
        self.state.servers[server].busy = false;
        self.state.servers[server].serving = None;

        self.state.customers[customer.0].service_end_time = Some(self.state.now);
        self.finalize(customer, server);

        if let Some(next) = self.state.waiting.pop_front() {
            self.start_service(next, server);
        }
    }

    fn start_service(&mut self, customer: CustomerId, server: usize) {
        self.state.servers[server].busy = true;
        self.state.servers[server].serving = Some(customer);
        self.state.customers[customer.0].service_start_time = Some(self.state.now);

        let end = self.state.now + self.sample_exponential(self.config.service_rate);
        self.schedule(end, EventKind::ServiceEnd { customer, server });
    }

    fn finalize(&mut self, customer: CustomerId, server: usize) {
        let c = &self.state.customers[customer.0];
        let arrival_time = c.arrival_time;
        let service_start = c.service_start_time.unwrap_or(arrival_time);
        let service_end = c.service_end_time.unwrap_or(self.state.now);
        let queue_wait = service_start - arrival_time;

        self.state.serviced_count += 1;
        self.state.total_wait_time += queue_wait;
        self.state.records.push(ContactRecord {
            customer_id: customer.0,
            arrival_time,
            queue_wait_time: queue_wait,
            service_start_time: service_start,
            service_end_time: service_end,
            total_time_in_system: service_end - arrival_time,
            server_id: server,
            was_queued: queue_wait > 0.0,
            channel: self.config.channel.clone(),
            campaign: self.config.campaign.clone(),
            skill: self.config.skill.clone(),
            abandoned: false,
        });
    }

    fn schedule(&mut self, time: f64, kind: EventKind) {
        let seq = self.state.event_seq;
        self.state.event_seq += 1;
        self.state
            .pending
            .push(Reverse(ScheduledEvent::new(time, seq, kind)));
    }

    fn sample_if_due(&mut self) {
        if self.state.now - self.state.last_sample_time >= SAMPLE_INTERVAL {
            self.record_sample();
        }
    }

    fn record_sample(&mut self) {
        self.state.time_series.push(TimeSeriesSample {
            time: self.state.now,
            queue_length: self.state.waiting.len(),
            in_service: self.in_service(),
        });
        self.state.last_sample_time = self.state.now;
    }

    fn in_service(&self) -> usize {
        self.state.servers.iter().filter(|s| s.busy).count()
    }

    /// Inverse-transform exponential draw; the uniform is floored away from
    /// zero so `ln` never sees it.
    fn sample_exponential(&mut self, rate: f64) -> f64 {
        let mut u: f64 = self.rng.gen();
        if u <= f64::MIN_POSITIVE {
            u = f64::MIN_POSITIVE;
        }
        -u.ln() / rate
    }
}

fn validate_config(config: &SimulationConfig) -> Result<()> {
    if !(config.arrival_rate > 0.0) || !config.arrival_rate.is_finite() {
        return Err(Error::InvalidArrivalRate(config.arrival_rate));
    }
    if !(config.service_rate > 0.0) || !config.service_rate.is_finite() {
        return Err(Error::InvalidServiceRate(config.service_rate));
    }
    if config.servers == 0 {
        return Err(Error::InvalidServerCount);
    }
    if !(config.horizon > 0.0) || !config.horizon.is_finite() {
        return Err(Error::InvalidHorizon(config.horizon));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            arrival_rate: 1.0,
            service_rate: 2.0,
            servers: 3,
            horizon: 100.0,
            channel: "voice".to_string(),
            campaign: None,
            skill: None,
            seed: Some(seed),
        }
    }

    #[test]
    fn rejects_invalid_configs() {
        let mut bad = config(1);
        bad.arrival_rate = 0.0;
        assert!(SimulationEngine::new(bad).is_err());

        let mut bad = config(1);
        bad.service_rate = -1.0;
        assert!(SimulationEngine::new(bad).is_err());

        let mut bad = config(1);
        bad.servers = 0;
        assert!(SimulationEngine::new(bad).is_err());

        let mut bad = config(1);
        bad.horizon = 0.0;
        assert!(SimulationEngine::new(bad).is_err());
    }

    #[test]
    fn snapshot_agrees_with_queue_and_servers() {
        let mut engine = SimulationEngine::new(config(7)).unwrap();
        for step in 1..=20 {
            engine.process_until(step as f64 * 5.0);
            let snap = engine.snapshot();
            assert_eq!(snap.queue_length, engine.waiting_queue().len());
            assert_eq!(
                snap.in_service,
                engine.servers().iter().filter(|s| s.busy).count()
            );
            assert!(snap.max_queue_length >= snap.queue_length);
        }
    }

    #[test]
    fn time_series_is_non_decreasing_in_time() {
        let mut engine = SimulationEngine::new(config(11)).unwrap();
        engine.process_until(100.0);
        let series = engine.snapshot().time_series;
        assert!(!series.is_empty());
        for pair in series.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
    }

    #[test]
    fn stepped_run_matches_single_shot_run() {
        let mut stepped = SimulationEngine::new(config(42)).unwrap();
        let mut single = SimulationEngine::new(config(42)).unwrap();

        let mut t = 0.0;
        while !stepped.is_finished() {
            t += 3.7;
            stepped.process_until(t);
        }
        single.process_until(100.0);

        assert_eq!(
            stepped.snapshot().serviced_count,
            single.snapshot().serviced_count
        );
        assert_eq!(stepped.contact_records().len(), single.contact_records().len());
        let stepped_last = stepped.contact_records().last().unwrap();
        let single_last = single.contact_records().last().unwrap();
        assert!((stepped_last.service_end_time - single_last.service_end_time).abs() < 1e-12);
    }

    #[test]
    fn stale_target_is_a_noop() {
        let mut engine = SimulationEngine::new(config(3)).unwrap();
        engine.process_until(50.0);
        let before = engine.snapshot();
        engine.process_until(10.0);
        let after = engine.snapshot();
        assert_eq!(before.now, after.now);
        assert_eq!(before.serviced_count, after.serviced_count);
        assert_eq!(before.time_series.len(), after.time_series.len());
    }

    #[test]
    fn reset_replays_a_seeded_run() {
        let mut engine = SimulationEngine::new(config(99)).unwrap();
        engine.process_until(100.0);
        let first = engine.snapshot();

        engine.reset(None).unwrap();
        assert_eq!(engine.snapshot().now, 0.0);
        assert!(engine.contact_records().is_empty());

        engine.process_until(100.0);
        let second = engine.snapshot();
        assert_eq!(first.serviced_count, second.serviced_count);
        assert!((first.average_wait_time - second.average_wait_time).abs() < 1e-12);
    }

    #[test]
    fn reset_accepts_a_new_config() {
        let mut engine = SimulationEngine::new(config(5)).unwrap();
        engine.process_until(100.0);
        let mut swapped = config(5);
        swapped.arrival_rate = 5.0;
        swapped.servers = 1;
        swapped.horizon = 10.0;
        engine.reset(Some(swapped)).unwrap();
        assert_eq!(engine.servers().len(), 1);
        assert!(!engine.is_finished());
        engine.process_until(10.0);
        assert!(engine.is_finished());
    }

    #[test]
    fn contact_record_invariants_hold() {
        let mut engine = SimulationEngine::new(config(13)).unwrap();
        engine.process_until(100.0);
        let records = engine.contact_records();
        assert!(!records.is_empty());
        for r in records {
            assert!(r.queue_wait_time >= 0.0);
            assert!(
                (r.queue_wait_time - (r.service_start_time - r.arrival_time)).abs() < 1e-12
            );
            assert!(
                (r.total_time_in_system - (r.service_end_time - r.arrival_time)).abs() < 1e-12
            );
            assert!(r.service_time() >= 0.0);
            assert_eq!(r.was_queued, r.queue_wait_time > 0.0);
            assert!(!r.abandoned);
            assert_eq!(r.channel, "voice");
        }
    }

    #[test]
    fn finishes_at_the_horizon() {
        let mut engine = SimulationEngine::new(config(17)).unwrap();
        assert!(!engine.is_finished());
        engine.process_until(60.0);
        assert!(!engine.is_finished());
        engine.process_until(100.0);
        assert!(engine.is_finished());
    }

    #[test]
    fn stable_system_stays_in_control() {
        // rho = 1 / (3 * 2) = 1/6; the queue should barely form.
        let mut engine = SimulationEngine::new(config(2024)).unwrap();
        engine.process_until(100.0);
        let snap = engine.snapshot();
        assert!(snap.max_queue_length < 20, "max queue {}", snap.max_queue_length);
        assert!(
            snap.serviced_count > 50 && snap.serviced_count < 200,
            "serviced {}",
            snap.serviced_count
        );
    }

    #[test]
    fn overloaded_system_backs_up() {
        // rho = 5 / (2 * 1) = 2.5; the queue must keep growing.
        let overload = SimulationConfig {
            arrival_rate: 5.0,
            service_rate: 1.0,
            servers: 2,
            horizon: 10.0,
            channel: "voice".to_string(),
            campaign: None,
            skill: None,
            seed: Some(606),
        };
        let mut engine = SimulationEngine::new(overload).unwrap();
        engine.process_until(5.0);
        let midway = engine.snapshot().max_queue_length;
        engine.process_until(10.0);
        let done = engine.snapshot();
        assert!(midway > 0);
        assert!(done.max_queue_length > midway, "queue stopped growing");
        assert!(done.queue_length > 0);
    }
}
