//! Step kind: the closed set of ways a step computes its fire time.

use std::{fmt, num::NonZeroU32, str::FromStr};

use jiff::civil::Weekday;
use serde::{Deserialize, Serialize};

/// How a step derives its next fire time from a base instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Fires a fixed duration after its base, optionally re-aligned to an
    /// every-N-days cadence anchored to the base's calendar day.
    Timer {
        duration_seconds: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        every_n_days: Option<NonZeroU32>,
    },
    /// Fires at base + offset. The offset may be negative.
    RelativeToPrev { offset_seconds: i64 },
    /// Fires at the next wall-clock occurrence of hour:minute, optionally
    /// restricted to a set of weekdays.
    FixedTime {
        hour: i8,
        minute: i8,
        #[serde(
            default,
            with = "weekday_list",
            skip_serializing_if = "Option::is_none"
        )]
        weekdays: Option<Vec<Weekday>>,
    },
}

impl StepKind {
    /// Fixed-time steps keep their own wall-clock schedule and never move
    /// with the chain's anchor.
    pub fn is_fixed(&self) -> bool {
        matches!(self, StepKind::FixedTime { .. })
    }

    /// Checks the parameters are in range.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            StepKind::Timer {
                duration_seconds, ..
            } if *duration_seconds < 0 => {
                Err(format!("Timer duration must not be negative: {duration_seconds}"))
            }
            StepKind::FixedTime { hour, minute, .. } => {
                if !(0..=23).contains(hour) {
                    return Err(format!("Hour out of range: {hour}"));
                }
                if !(0..=59).contains(minute) {
                    return Err(format!("Minute out of range: {minute}"));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Timer {
                duration_seconds,
                every_n_days,
            } => {
                write!(f, "timer:{duration_seconds}")?;
                if let Some(days) = every_n_days {
                    write!(f, "/{days}d")?;
                }
                Ok(())
            }
            StepKind::RelativeToPrev { offset_seconds } => write!(f, "relative:{offset_seconds}"),
            StepKind::FixedTime {
                hour,
                minute,
                weekdays,
            } => {
                write!(f, "fixed:{hour:02}:{minute:02}")?;
                if let Some(days) = weekdays {
                    let days: Vec<String> = days
                        .iter()
                        .map(|day| day.to_monday_one_offset().to_string())
                        .collect();
                    write!(f, "@{}", days.join(","))?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid step kind: {s}"))?;

        let kind = match tag {
            "timer" => {
                let (duration, cadence) = match rest.split_once('/') {
                    Some((duration, cadence)) => (duration, Some(cadence)),
                    None => (rest, None),
                };
                let duration_seconds = duration
                    .parse::<i64>()
                    .map_err(|_| format!("Invalid timer duration: {duration}"))?;
                let every_n_days = cadence
                    .map(|cadence| {
                        cadence
                            .strip_suffix('d')
                            .and_then(|days| days.parse::<NonZeroU32>().ok())
                            .ok_or_else(|| format!("Invalid day cadence: {cadence}"))
                    })
                    .transpose()?;
                StepKind::Timer {
                    duration_seconds,
                    every_n_days,
                }
            }
            "relative" => StepKind::RelativeToPrev {
                offset_seconds: rest
                    .parse::<i64>()
                    .map_err(|_| format!("Invalid relative offset: {rest}"))?,
            },
            "fixed" => {
                let (time, days) = match rest.split_once('@') {
                    Some((time, days)) => (time, Some(days)),
                    None => (rest, None),
                };
                let (hour, minute) = time
                    .split_once(':')
                    .ok_or_else(|| format!("Invalid wall-clock time: {time}"))?;
                let hour = hour
                    .parse::<i8>()
                    .map_err(|_| format!("Invalid hour: {hour}"))?;
                let minute = minute
                    .parse::<i8>()
                    .map_err(|_| format!("Invalid minute: {minute}"))?;
                let weekdays = days.map(parse_weekdays).transpose()?;
                StepKind::FixedTime {
                    hour,
                    minute,
                    weekdays,
                }
            }
            _ => return Err(format!("Invalid step kind: {s}")),
        };

        kind.validate()?;
        Ok(kind)
    }
}

fn parse_weekdays(days: &str) -> Result<Vec<Weekday>, String> {
    if days.is_empty() {
        return Ok(Vec::new());
    }
    days.split(',')
        .map(|day| {
            day.trim()
                .parse::<i8>()
                .ok()
                .and_then(|n| Weekday::from_monday_one_offset(n).ok())
                .ok_or_else(|| format!("Invalid weekday: {day}"))
        })
        .collect()
}

/// Serializes weekdays as ISO numbers (Monday = 1 .. Sunday = 7).
mod weekday_list {
    use jiff::civil::Weekday;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(days: &Option<Vec<Weekday>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match days {
            Some(days) => serializer.collect_seq(days.iter().map(|d| d.to_monday_one_offset())),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<Weekday>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<Vec<i8>> = Option::deserialize(deserializer)?;
        raw.map(|days| {
            days.into_iter()
                .map(|n| Weekday::from_monday_one_offset(n).map_err(D::Error::custom))
                .collect()
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_each_kind() {
        let cases = [
            "timer:600",
            "timer:90000/2d",
            "relative:-300",
            "fixed:07:05",
            "fixed:22:30@1,3,5",
        ];
        for case in cases {
            let kind: StepKind = case.parse().expect(case);
            assert_eq!(kind.to_string(), case);
        }
    }

    #[test]
    fn test_parse_fixed_with_weekdays() {
        let kind: StepKind = "fixed:06:45@6,7".parse().unwrap();
        assert_eq!(
            kind,
            StepKind::FixedTime {
                hour: 6,
                minute: 45,
                weekdays: Some(vec![Weekday::Saturday, Weekday::Sunday]),
            }
        );
        assert!(kind.is_fixed());
    }

    #[test]
    fn test_empty_weekday_set_is_preserved() {
        let kind: StepKind = "fixed:06:45@".parse().unwrap();
        assert_eq!(
            kind,
            StepKind::FixedTime {
                hour: 6,
                minute: 45,
                weekdays: Some(vec![]),
            }
        );
    }

    #[test]
    fn test_rejects_malformed_kinds() {
        for case in [
            "timer",
            "timer:abc",
            "timer:60/0d",
            "timer:-5",
            "relative:",
            "fixed:25:00",
            "fixed:07:60",
            "fixed:07:00@8",
            "alarm:07:00",
        ] {
            assert!(case.parse::<StepKind>().is_err(), "{case} should not parse");
        }
    }

    #[test]
    fn test_serde_uses_iso_weekday_numbers() {
        let kind = StepKind::FixedTime {
            hour: 7,
            minute: 0,
            weekdays: Some(vec![Weekday::Monday, Weekday::Friday]),
        };
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(
            json,
            r#"{"type":"fixed_time","hour":7,"minute":0,"weekdays":[1,5]}"#
        );
        let back: StepKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);

        let timer: StepKind =
            serde_json::from_str(r#"{"type":"timer","duration_seconds":120}"#).unwrap();
        assert_eq!(
            timer,
            StepKind::Timer {
                duration_seconds: 120,
                every_n_days: None,
            }
        );
    }
}
