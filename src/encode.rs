//! String encodings expected by the API for dates, layers and events.

use chrono::{NaiveDateTime, Timelike};

use crate::datasource::SourceRef;
use crate::error::{Error, Result};
use crate::event::EventType;

/// Renders `dt` the way the API expects: naive ISO-8601 with a literal `Z`.
///
/// No timezone conversion happens; the `Z` is appended verbatim. Microseconds
/// are only written when non-zero.
pub fn isoformat_z(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() / 1_000 == 0 {
        format!("{}Z", dt.format("%Y-%m-%dT%H:%M:%S"))
    } else {
        format!("{}Z", dt.format("%Y-%m-%dT%H:%M:%S%.6f"))
    }
}

/// Comma-joined Unix timestamps (whole seconds) in input order.
pub fn unix_csv(dates: &[NaiveDateTime]) -> String {
    dates
        .iter()
        .map(|d| d.and_utc().timestamp().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// One layer entry: `[<sourceId>,1,<opacity>]`.
pub fn layer_string(source: impl Into<SourceRef>, opacity: i64) -> Result<String> {
    let source = SourceRef::resolve(source.into()).map_err(|e| match e {
        Error::Validation { reason, .. } => Error::validation("layers", reason),
        other => other,
    })?;
    if !(0..=100).contains(&opacity) {
        return Err(Error::validation(
            "layers",
            format!("opacity must be between 0 and 100, got {opacity}"),
        ));
    }
    Ok(format!("[{},1,{}]", source.id(), opacity))
}

/// One event entry: `[<code>,<recognition method>,1]`.
pub fn event_string(event: EventType, method: &str) -> String {
    format!("[{},{},1]", event.code(), method)
}

/// Builds the `layers` parameter from `(datasource, opacity)` pairs.
///
/// ```
/// use helioviewer::{create_layers, DataSource};
///
/// assert_eq!(create_layers([(9, 100), (11, 50)])?, "[9,1,100],[11,1,50]");
/// assert_eq!(create_layers([(DataSource::Aia171, 100)])?, "[10,1,100]");
/// # Ok::<(), helioviewer::Error>(())
/// ```
pub fn create_layers<S, I>(layers: I) -> Result<String>
where
    S: Into<SourceRef>,
    I: IntoIterator<Item = (S, i64)>,
{
    let parts = layers
        .into_iter()
        .map(|(source, opacity)| layer_string(source, opacity))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(","))
}

/// One element of an event selection: an event type, optionally narrowed to
/// a recognition method (feature recognition method or observer name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpec {
    kind: EventKind,
    method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EventKind {
    Typed(EventType),
    Code(String),
}

impl EventSpec {
    fn encode(&self) -> Result<String> {
        let event = match &self.kind {
            EventKind::Typed(e) => *e,
            EventKind::Code(code) => code.parse()?,
        };
        Ok(event_string(event, self.method.as_deref().unwrap_or("all")))
    }
}

impl From<EventType> for EventSpec {
    fn from(e: EventType) -> Self {
        EventSpec {
            kind: EventKind::Typed(e),
            method: None,
        }
    }
}

impl From<&str> for EventSpec {
    fn from(code: &str) -> Self {
        EventSpec {
            kind: EventKind::Code(code.to_string()),
            method: None,
        }
    }
}

impl From<String> for EventSpec {
    fn from(code: String) -> Self {
        EventSpec {
            kind: EventKind::Code(code),
            method: None,
        }
    }
}

impl From<(EventType, &str)> for EventSpec {
    fn from((e, method): (EventType, &str)) -> Self {
        EventSpec {
            kind: EventKind::Typed(e),
            method: Some(method.to_string()),
        }
    }
}

impl From<(EventType, String)> for EventSpec {
    fn from((e, method): (EventType, String)) -> Self {
        EventSpec {
            kind: EventKind::Typed(e),
            method: Some(method),
        }
    }
}

impl From<(&str, &str)> for EventSpec {
    fn from((code, method): (&str, &str)) -> Self {
        EventSpec {
            kind: EventKind::Code(code.to_string()),
            method: Some(method.to_string()),
        }
    }
}

/// Builds the `events` parameter.
///
/// Items without a recognition method select `all` of them.
///
/// ```
/// use helioviewer::{create_events, EventSpec, EventType};
///
/// assert_eq!(create_events(["AR"])?, "[AR,all,1]");
/// assert_eq!(create_events([("AR", "SPoCA")])?, "[AR,SPoCA,1]");
/// assert_eq!(
///     create_events([
///         EventSpec::from(EventType::ActiveRegion),
///         EventSpec::from((EventType::CoronalDimming, "ASDF")),
///     ])?,
///     "[AR,all,1],[CD,ASDF,1]"
/// );
/// # Ok::<(), helioviewer::Error>(())
/// ```
pub fn create_events<E, I>(events: I) -> Result<String>
where
    E: Into<EventSpec>,
    I: IntoIterator<Item = E>,
{
    let parts = events
        .into_iter()
        .map(|e| Into::<EventSpec>::into(e).encode())
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::DataSource;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn isoformat_appends_z() {
        assert_eq!(isoformat_z(&dt(2022, 1, 1, 23, 59, 59)), "2022-01-01T23:59:59Z");
        let with_micros = NaiveDate::from_ymd_opt(2014, 1, 1)
            .unwrap()
            .and_hms_micro_opt(0, 0, 0, 1500)
            .unwrap();
        assert_eq!(isoformat_z(&with_micros), "2014-01-01T00:00:00.001500Z");
    }

    #[test]
    fn isoformat_always_ends_with_z() {
        for year in [1970, 1995, 2010, 2038] {
            for nanos in [0, 999, 1_000, 123_456_789] {
                let d = NaiveDate::from_ymd_opt(year, 6, 15)
                    .unwrap()
                    .and_hms_nano_opt(12, 30, 0, nanos)
                    .unwrap();
                assert!(isoformat_z(&d).ends_with('Z'));
            }
        }
    }

    #[test]
    fn unix_csv_keeps_order() {
        assert_eq!(unix_csv(&[]), "");
        assert_eq!(unix_csv(&[dt(1970, 1, 1, 0, 0, 10)]), "10");
        assert_eq!(
            unix_csv(&[dt(2022, 1, 2, 0, 0, 0), dt(2022, 1, 1, 0, 0, 0)]),
            "1641081600,1640995200"
        );
    }

    #[test]
    fn layer_strings() {
        assert_eq!(layer_string(DataSource::Aia131, 100).unwrap(), "[9,1,100]");
        assert_eq!(layer_string(14, 0).unwrap(), "[14,1,0]");

        for bad in [101, -1] {
            let err = layer_string(DataSource::Aia131, bad).unwrap_err();
            assert!(err.to_string().contains("100"), "{err}");
            assert_eq!(err.field(), Some("layers"));
        }
    }

    #[test]
    fn create_layers_rejects_unknown_source() {
        assert_eq!(create_layers([(9, 100), (11, 50)]).unwrap(), "[9,1,100],[11,1,50]");
        let err = create_layers([(9, 100), (999, 100)]).unwrap_err();
        assert!(err.to_string().contains("999 is not a valid DataSource"));
        assert!(create_layers([(9, 101), (14, 100)]).is_err());
        assert!(create_layers([(9, 100), (14, -1)]).is_err());
        assert_eq!(create_layers(Vec::<(DataSource, i64)>::new()).unwrap(), "");
    }

    #[test]
    fn event_strings() {
        assert_eq!(event_string(EventType::ActiveRegion, "all"), "[AR,all,1]");
        assert_eq!(event_string(EventType::ActiveRegion, "xyz"), "[AR,xyz,1]");
    }

    #[test]
    fn create_events_mixed_forms() {
        assert_eq!(create_events(["ER"]).unwrap(), "[ER,all,1]");
        assert_eq!(create_events([EventType::ActiveRegion]).unwrap(), "[AR,all,1]");
        assert_eq!(
            create_events([(EventType::ActiveRegion, "SPoCA;NOAA_SWPC_Observer")]).unwrap(),
            "[AR,SPoCA;NOAA_SWPC_Observer,1]"
        );
        assert_eq!(
            create_events([EventType::ActiveRegion, EventType::CoronalDimming]).unwrap(),
            "[AR,all,1],[CD,all,1]"
        );
        assert_eq!(
            create_events([
                EventSpec::from((EventType::ActiveRegion, "SPoCA")),
                EventSpec::from(("ER", "NOAA_SWPC_Observer")),
            ])
            .unwrap(),
            "[AR,SPoCA,1],[ER,NOAA_SWPC_Observer,1]"
        );
        assert_eq!(
            create_events([("AR", "SPoCA"), ("ER", "NOAA_SWPC_Observer")]).unwrap(),
            "[AR,SPoCA,1],[ER,NOAA_SWPC_Observer,1]"
        );
    }

    #[test]
    fn create_events_rejects_unknown_code() {
        let err = create_events(["AR", "XYZ"]).unwrap_err();
        assert!(err.to_string().contains("XYZ is not a valid EventType"));
        assert_eq!(err.field(), Some("events"));
    }
}
