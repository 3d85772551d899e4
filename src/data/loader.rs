use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mseed::{MSControlFlags, MSReader, MSSampleType, MSTraceList};
use thiserror::Error;

use super::model::{Stream, Trace, TraceId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("failed to decode {}: {}", .path.display(), .message)]
    Decode { path: PathBuf, message: String },

    #[error("unrecognised source identifier '{0}'")]
    BadSourceId(String),
}

impl LoadError {
    fn decode(path: &Path, err: impl fmt::Display) -> Self {
        LoadError::Decode {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load every trace from a MiniSEED file.
///
/// Records are decoded by libmseed and assembled in its trace list with
/// autoheal on, so records that overlap, arrive out of order or prepend a
/// segment are joined the same way libmseed joins them. Each resulting
/// segment becomes one [`Trace`]; segments without samples are not part of
/// the returned stream.
pub fn load_file(path: &Path) -> Result<Stream, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let (traces, n_records) = read_traces(path)?;
    let stream = Stream::from_traces(path, traces);

    log::info!("Read {n_records} records from {}", path.display());
    log::info!("{}", stream.summary());
    Ok(stream)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Returns the assembled traces and the number of records read.
fn read_traces(path: &Path) -> Result<(Vec<Trace>, usize), LoadError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| LoadError::NonUtf8Path(path.to_path_buf()))?;
    let reader = MSReader::new_with_flags(path_str, MSControlFlags::MSF_UNPACKDATA)
        .map_err(|e| LoadError::decode(path, e))?;
    let mut mstl = MSTraceList::new().map_err(|e| LoadError::decode(path, e))?;

    let mut n_records = 0;
    for result in reader {
        let msr = result.map_err(|e| LoadError::decode(path, e))?;
        mstl.insert(msr, true).map_err(|e| LoadError::decode(path, e))?;
        n_records += 1;
    }

    let mut traces = Vec::new();
    for tid in mstl.iter() {
        let sid = tid.sid().map_err(|e| LoadError::decode(path, e))?;
        let id = TraceId::from_sid(&sid).ok_or(LoadError::BadSourceId(sid))?;

        for seg in tid.iter() {
            let nanos = seg
                .start_time()
                .map_err(|e| LoadError::decode(path, e))?
                .unix_timestamp_nanos();
            let start = DateTime::<Utc>::from_timestamp_nanos(nanos as i64);

            let samples: Option<Vec<f64>> = match seg.sample_type() {
                MSSampleType::Integer32 => seg
                    .data_samples::<i32>()
                    .map(|s| s.iter().map(|&v| v as f64).collect()),
                MSSampleType::Float32 => seg
                    .data_samples::<f32>()
                    .map(|s| s.iter().map(|&v| v as f64).collect()),
                MSSampleType::Float64 => seg.data_samples::<f64>().map(|s| s.to_vec()),
                // text and unknown payloads carry no waveform samples
                _ => None,
            };
            if samples.as_ref().map_or(true, Vec::is_empty) {
                log::debug!("Segment of {id} at {start} has no waveform samples");
            }

            traces.push(Trace {
                id: id.clone(),
                start,
                sampling_rate: seg.sample_rate_hz(),
                data: samples.unwrap_or_default(),
            });
        }
    }
    Ok((traces, n_records))
}
