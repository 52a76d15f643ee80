use super::record::TelemetryRecord;
use crate::errors::SimError;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Destination for per-step telemetry.
pub trait TelemetrySink {
    fn record(&mut self, record: TelemetryRecord) -> Result<(), SimError>;

    fn flush(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}

/// In-memory sink, mostly for tests and post-processing.
impl TelemetrySink for Vec<TelemetryRecord> {
    fn record(&mut self, record: TelemetryRecord) -> Result<(), SimError> {
        self.push(record);
        Ok(())
    }
}

pub struct CsvTelemetryWriter<W: Write> {
    writer: Writer<W>,
    rows: usize,
}

impl CsvTelemetryWriter<File> {
    pub fn create(path: &Path) -> Result<Self, SimError> {
        info!(path = %path.display(), "Writing telemetry");
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> CsvTelemetryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::from_writer(inner),
            rows: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> Result<W, SimError> {
        self.writer
            .into_inner()
            .map_err(|e| SimError::IoError(e.into_error()))
    }
}

impl<W: Write> TelemetrySink for CsvTelemetryWriter<W> {
    fn record(&mut self, record: TelemetryRecord) -> Result<(), SimError> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SimError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::spacecraft::SpacecraftConfig;
    use crate::models::{SatelliteState, SimulationContext, Timestamp};
    use nalgebra as na;

    #[test]
    fn header_has_every_column() {
        let sat = SatelliteState::new(&SpacecraftConfig::default()).unwrap();
        let ctx = SimulationContext::new(Timestamp::from_gregorian_utc(2025, 10, 1, 7, 0, 0, 0));

        let mut writer = CsvTelemetryWriter::new(Vec::new());
        writer
            .record(TelemetryRecord::capture(&ctx, &sat, &na::Vector3::zeros()))
            .unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.rows(), 1);

        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut lines = text.lines();
        let header: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(header.len(), TelemetryRecord::COLUMNS);
        assert_eq!(header[0], "Time");
        assert_eq!(header[1], "aux_mag_body_x(A/m)");
        assert_eq!(header[15], "mag_mmt_m(Am2)");
        assert_eq!(header[37], "ang_acc_body_m(rad/s2)");

        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row.len(), TelemetryRecord::COLUMNS);
        assert_eq!(row[0], "01 Oct 2025 07:00:00.000");
    }
}
