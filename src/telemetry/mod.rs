pub mod record;
pub mod summary;
pub mod writer;

pub use record::TelemetryRecord;
pub use writer::{CsvTelemetryWriter, TelemetrySink};
