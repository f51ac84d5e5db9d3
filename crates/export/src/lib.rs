//! Export helpers for CSV and JSON envelope artifacts.

pub mod sweep {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use natops_envelope::EnvelopeResult;

    pub const HEADER: &str = "weight_lbf,altitude_ft,mach,configuration,sweep_deg,floor_pct,setting,rpm_pct,thrust_lbf,fuel_flow_pph,drag_lbf,aeo_gradient_ft_nm,oei_gradient_ft_nm,status";

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write the standard sweep CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row emitted by the sweep exporter.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub result: &'a EnvelopeResult,
    }

    impl<'a> Record<'a> {
        pub fn new(result: &'a EnvelopeResult) -> Self {
            Self { result }
        }

        /// Serialize the record to CSV, matching the standard header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let r = self.result;
            writeln!(
                writer,
                "{:.0},{:.0},{:.3},{},{:.1},{:.1},{},{:.1},{:.0},{:.0},{:.0},{:.1},{:.1},{}",
                r.request.weight_lbf,
                r.request.altitude_ft,
                r.request.mach,
                r.request.configuration,
                r.sweep_deg,
                r.floor_pct,
                setting_label(r),
                r.rpm_pct,
                r.thrust_lbf,
                r.fuel_flow_pph,
                r.drag_lbf,
                r.aeo_gradient_ft_nm,
                r.oei_gradient_ft_nm,
                r.status,
            )
        }
    }

    fn setting_label(result: &EnvelopeResult) -> &'static str {
        use natops_envelope::PowerSetting;
        match result.setting {
            PowerSetting::Idle => "IDLE",
            PowerSetting::Derate(_) => "DERATE",
            PowerSetting::Mil => "MIL",
            PowerSetting::Afterburner => "AB",
        }
    }

    /// Write a header plus one row per result.
    pub fn write_all(writer: &mut dyn Write, results: &[EnvelopeResult]) -> io::Result<()> {
        write_header(writer)?;
        for result in results {
            Record::new(result).write_to(writer)?;
        }
        writer.flush()
    }
}

pub mod summary {
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    use chrono::{DateTime, Utc};
    use natops_envelope::EnvelopeResult;
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    /// Provenance of the inputs a sweep was computed from.
    #[derive(Debug)]
    pub struct Metadata<'a> {
        pub aircraft: &'a str,
        pub engine_deck: &'a str,
        pub aero_table: &'a str,
        pub policy: &'a str,
    }

    #[derive(Serialize)]
    struct SummaryDocument<'a> {
        aircraft: &'a str,
        engine_deck: &'a str,
        aero_table: &'a str,
        policy: &'a str,
        generated_at: DateTime<Utc>,
        dispatchable: usize,
        unsafe_count: usize,
        results: &'a [EnvelopeResult],
    }

    /// Write the results of a sweep, with provenance, as pretty-printed JSON.
    pub fn write_summary(
        output: &Path,
        meta: &Metadata<'_>,
        results: &[EnvelopeResult],
    ) -> io::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let dispatchable = results
            .iter()
            .filter(|r| r.status.is_dispatchable())
            .count();
        let document = SummaryDocument {
            aircraft: meta.aircraft,
            engine_deck: meta.engine_deck,
            aero_table: meta.aero_table,
            policy: meta.policy,
            generated_at: Utc::now(),
            dispatchable,
            unsafe_count: results.len() - dispatchable,
            results,
        };
        to_writer_pretty(File::create(output)?, &document)?;
        Ok(())
    }
}
