use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};

/// ISO-8601 UTC with microseconds, used for every user-visible time.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Stats keys shown as children of each trace in the tree view, in order.
pub const STATS_KEYS: [&str; 4] = ["starttime", "endtime", "sampling_rate", "npts"];

// ---------------------------------------------------------------------------
// TraceId – network / station / location / channel
// ---------------------------------------------------------------------------

/// SEED channel identity of a trace, displayed as `NET.STA.LOC.CHA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceId {
    pub network: String,
    pub station: String,
    pub location: String,
    pub channel: String,
}

impl TraceId {
    pub fn new(network: &str, station: &str, location: &str, channel: &str) -> Self {
        Self {
            network: network.to_string(),
            station: station.to_string(),
            location: location.to_string(),
            channel: channel.to_string(),
        }
    }

    /// Parse an FDSN source identifier (`FDSN:NET_STA_LOC_B_S_SS`).
    ///
    /// The legacy four-part form `NET_STA_LOC_CHA` is accepted as well.
    pub fn from_sid(sid: &str) -> Option<Self> {
        let body = sid.strip_prefix("FDSN:").unwrap_or(sid);
        let parts: Vec<&str> = body.split('_').collect();
        match parts.as_slice() {
            [net, sta, loc, band, source, subsource] => {
                let channel = format!("{band}{source}{subsource}");
                Some(Self::new(net, sta, loc, &channel))
            }
            [net, sta, loc, cha] => Some(Self::new(net, sta, loc, cha)),
            _ => None,
        }
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel
        )
    }
}

// ---------------------------------------------------------------------------
// Trace – one continuous time series
// ---------------------------------------------------------------------------

/// A single continuous run of samples from one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub id: TraceId,
    /// Time of the first sample.
    pub start: DateTime<Utc>,
    /// Samples per second.
    pub sampling_rate: f64,
    pub data: Vec<f64>,
}

impl Trace {
    pub fn npts(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample spacing in seconds (0 when the rate is unknown).
    pub fn delta(&self) -> f64 {
        if self.sampling_rate > 0.0 {
            1.0 / self.sampling_rate
        } else {
            0.0
        }
    }

    /// Time of the sample at `index`.
    pub fn time_at(&self, index: usize) -> DateTime<Utc> {
        self.start + seconds_to_delta(index as f64 * self.delta())
    }

    /// Time of the last sample.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.time_at(self.npts().saturating_sub(1))
    }

    /// Absolute sample times as epoch seconds.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        let t0 = epoch_seconds(&self.start);
        let delta = self.delta();
        (0..self.npts()).map(move |i| t0 + i as f64 * delta)
    }

    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.data.is_empty() {
            return None;
        }
        let min = self.data.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// `(key, value)` pairs for [`STATS_KEYS`].
    pub fn stats(&self) -> Vec<(&'static str, String)> {
        STATS_KEYS
            .iter()
            .map(|&key| {
                let value = match key {
                    "starttime" => format_time(&self.start),
                    "endtime" => format_time(&self.end_time()),
                    "sampling_rate" => format!("{:?}", self.sampling_rate),
                    _ => self.npts().to_string(),
                };
                (key, value)
            })
            .collect()
    }

    /// One-line description, e.g. `XX.STA..HHZ | start - end | 100.0 Hz, 3000 samples`.
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} - {} | {:?} Hz, {} samples",
            self.id,
            format_time(&self.start),
            format_time(&self.end_time()),
            self.sampling_rate,
            self.npts()
        )
    }
}

// ---------------------------------------------------------------------------
// Stream – the traces of one loaded file
// ---------------------------------------------------------------------------

/// All non-empty traces read from one file.
#[derive(Debug, Clone)]
pub struct Stream {
    pub source: PathBuf,
    pub traces: Vec<Trace>,
}

impl Stream {
    /// Build a stream, dropping traces without samples.
    pub fn from_traces(source: &Path, traces: Vec<Trace>) -> Self {
        let total = traces.len();
        let traces: Vec<Trace> = traces.into_iter().filter(|tr| !tr.is_empty()).collect();
        if traces.len() < total {
            log::debug!("Dropped {} empty trace(s)", total - traces.len());
        }
        Self {
            source: source.to_path_buf(),
            traces,
        }
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Trace> {
        self.traces.get(index)
    }

    /// Multi-line overview: a count header plus one [`Trace::summary_line`] per trace.
    pub fn summary(&self) -> String {
        let mut out = format!("{} Trace(s) in Stream:", self.len());
        for tr in &self.traces {
            out.push('\n');
            out.push_str(&tr.summary_line());
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Time helpers
// ---------------------------------------------------------------------------

pub fn format_time(t: &DateTime<Utc>) -> String {
    t.format(TIME_FORMAT).to_string()
}

pub fn epoch_seconds(t: &DateTime<Utc>) -> f64 {
    t.timestamp() as f64 + t.timestamp_subsec_nanos() as f64 * 1e-9
}

/// Inverse of [`epoch_seconds`]; `None` outside chrono's representable range.
pub fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

fn seconds_to_delta(secs: f64) -> TimeDelta {
    TimeDelta::nanoseconds((secs * 1e9).round() as i64)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn trace(id: &str, start_secs: i64, rate: f64, data: Vec<f64>) -> Trace {
        Trace {
            id: TraceId::from_sid(id).unwrap(),
            start: DateTime::from_timestamp(start_secs, 0).unwrap(),
            sampling_rate: rate,
            data,
        }
    }

    #[test]
    fn parses_fdsn_source_id() {
        let id = TraceId::from_sid("FDSN:IU_ANMO_00_B_H_Z").unwrap();
        assert_eq!(id, TraceId::new("IU", "ANMO", "00", "BHZ"));
        assert_eq!(id.to_string(), "IU.ANMO.00.BHZ");
    }

    #[test]
    fn parses_legacy_id_with_empty_location() {
        let id = TraceId::from_sid("XX_TEST__HHZ").unwrap();
        assert_eq!(id.to_string(), "XX.TEST..HHZ");
        assert!(TraceId::from_sid("garbage").is_none());
    }

    #[test]
    fn end_time_spans_npts_minus_one_samples() {
        let tr = trace("XX_A__HHZ", 0, 100.0, vec![0.0; 101]);
        assert_eq!(tr.end_time(), DateTime::from_timestamp(1, 0).unwrap());

        let single = trace("XX_A__HHZ", 5, 100.0, vec![1.0]);
        assert_eq!(single.end_time(), single.start);
    }

    #[test]
    fn times_are_absolute_epoch_seconds() {
        let tr = trace("XX_A__HHZ", 1_000, 4.0, vec![0.0; 3]);
        let t: Vec<f64> = tr.times().collect();
        assert_eq!(t, vec![1000.0, 1000.25, 1000.5]);
    }

    #[test]
    fn stats_follow_key_order_and_format() {
        let tr = trace("XX_A__HHZ", 1_262_304_000, 100.0, vec![0.0; 3000]);
        let stats = tr.stats();
        let keys: Vec<&str> = stats.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, STATS_KEYS);
        assert_eq!(stats[0].1, "2010-01-01T00:00:00.000000Z");
        assert_eq!(stats[1].1, "2010-01-01T00:00:29.990000Z");
        assert_eq!(stats[2].1, "100.0");
        assert_eq!(stats[3].1, "3000");
    }

    #[test]
    fn stream_drops_empty_traces() {
        let st = Stream::from_traces(
            Path::new("x.mseed"),
            vec![
                trace("XX_A__HHZ", 0, 1.0, vec![1.0]),
                trace("XX_B__HHZ", 0, 1.0, vec![]),
            ],
        );
        assert_eq!(st.len(), 1);
        assert!(st.traces.iter().all(|t| !t.is_empty()));
        assert!(st.summary().starts_with("1 Trace(s) in Stream:\nXX.A..HHZ | "));
    }

    #[test]
    fn min_max_of_samples() {
        let tr = trace("XX_A__HHZ", 0, 1.0, vec![3.0, -2.0, 7.5]);
        assert_eq!(tr.min_max(), Some((-2.0, 7.5)));
        assert_eq!(trace("XX_A__HHZ", 0, 1.0, vec![]).min_max(), None);
    }

    #[test]
    fn epoch_round_trip() {
        let t = from_epoch_seconds(1_262_304_000.25).unwrap();
        assert_eq!(format_time(&t), "2010-01-01T00:00:00.250000Z");
        assert_eq!(epoch_seconds(&t), 1_262_304_000.25);
        assert!(from_epoch_seconds(f64::NAN).is_none());
    }
}
