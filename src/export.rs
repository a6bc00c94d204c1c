use crate::state::ContactRecord;

const TABLE_HEADER: &str = "Customer ID,Channel,Arrival Time,Queue Join Time,Wait Time,\
Service Start,Service End,Total Time in System,Server ID,Was Queued,Service Time,Time to Answer";

/// Tabular dump of finalized contact records: header plus one row per record,
/// numerics at exactly four decimal places. No records means no output at
/// all, not a lone header.
pub fn contact_table(records: &[ContactRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(records.len() * 96);
    out.push_str(TABLE_HEADER);
    out.push('\n');
    for r in records {
        let row = format!(
            "{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{},{},{:.4},{:.4}\n",
            r.customer_id,
            r.channel,
            r.arrival_time,
            r.arrival_time,
            r.queue_wait_time,
            r.service_start_time,
            r.service_end_time,
            r.total_time_in_system,
            r.server_id,
            r.was_queued,
            r.service_time(),
            r.queue_wait_time,
        );
        out.push_str(&row);
    }
    out
}

/// One `INSERT INTO HistoricalData` statement per record, for replaying a run
/// into a historical-data store. Pure projection; zero records yields an
/// empty batch.
pub fn historical_inserts(records: &[ContactRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            format!(
                "INSERT INTO HistoricalData (customer_id, channel, arrival_time, wait_time, \
service_start, service_end, total_time, server_id, was_queued, abandoned) \
VALUES ({}, '{}', {:.4}, {:.4}, {:.4}, {:.4}, {:.4}, {}, {}, {})",
                r.customer_id,
                r.channel,
                r.arrival_time,
                r.queue_wait_time,
                r.service_start_time,
                r.service_end_time,
                r.total_time_in_system,
                r.server_id,
                r.was_queued,
                r.abandoned,
            )
        })
        .collect()
}
