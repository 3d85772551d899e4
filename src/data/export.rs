use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::{Stream, Trace, format_time};

// ---------------------------------------------------------------------------
// CSV: one trace's samples
// ---------------------------------------------------------------------------

/// Write `time,amplitude` rows for every sample, time as epoch seconds.
pub fn write_trace_csv<W: Write>(trace: &Trace, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["time", "amplitude"])
        .context("writing CSV header")?;
    for (t, y) in trace.times().zip(trace.data.iter()) {
        wtr.write_record([t.to_string(), y.to_string()])
            .context("writing CSV row")?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

pub fn export_trace_csv(trace: &Trace, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_trace_csv(trace, file)?;
    log::info!("Exported {} ({} samples) to {}", trace.id, trace.npts(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON: per-trace stats of the whole stream
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct TraceStatsRecord {
    id: String,
    starttime: String,
    endtime: String,
    sampling_rate: f64,
    npts: usize,
}

impl From<&Trace> for TraceStatsRecord {
    fn from(tr: &Trace) -> Self {
        Self {
            id: tr.id.to_string(),
            starttime: format_time(&tr.start),
            endtime: format_time(&tr.end_time()),
            sampling_rate: tr.sampling_rate,
            npts: tr.npts(),
        }
    }
}

pub fn stream_stats_json(stream: &Stream) -> Result<String> {
    let records: Vec<TraceStatsRecord> = stream.traces.iter().map(TraceStatsRecord::from).collect();
    serde_json::to_string_pretty(&records).context("serialising stream stats")
}

pub fn export_stats_json(stream: &Stream, path: &Path) -> Result<()> {
    let text = stream_stats_json(stream)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported stats of {} trace(s) to {}", stream.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::trace;

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let tr = trace("XX_A__HHZ", 100, 2.0, vec![1.0, -3.5]);
        let mut buf = Vec::new();
        write_trace_csv(&tr, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "time,amplitude\n100,1\n100.5,-3.5\n");
    }

    #[test]
    fn stats_json_lists_every_trace() {
        let st = Stream::from_traces(
            Path::new("x.mseed"),
            vec![
                trace("XX_A__HHZ", 0, 100.0, vec![0.0; 10]),
                trace("XX_B__HHN", 0, 50.0, vec![0.0; 4]),
            ],
        );
        let json = stream_stats_json(&st).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["id"], "XX.A..HHZ");
        assert_eq!(arr[1]["npts"], 4);
        assert_eq!(arr[1]["starttime"], "1970-01-01T00:00:00.000000Z");
    }

    #[test]
    fn csv_export_writes_file() {
        let tr = trace("XX_A__HHZ", 0, 1.0, vec![5.0]);
        let path = std::env::temp_dir().join("seed_view_export_test.csv");
        export_trace_csv(&tr, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("time,amplitude\n0,5"));
        let _ = std::fs::remove_file(&path);
    }
}
