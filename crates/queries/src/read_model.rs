//! Read model trait for query-side views.

use std::time::Instant;

/// A read model answering filtered listing queries.
pub trait ReadModel: Send + Sync {
    /// Returns the name of this read model.
    fn name(&self) -> &'static str;

    /// Records how long a listing took to assemble.
    fn observe(&self, started: Instant, rows: usize) {
        let elapsed = started.elapsed();
        metrics::histogram!("listing_query_duration_seconds", "view" => self.name())
            .record(elapsed.as_secs_f64());
        tracing::debug!(view = self.name(), rows, ?elapsed, "listing assembled");
    }
}
