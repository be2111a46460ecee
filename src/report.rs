//! Human readable report of the aggregated history of a day.

use crate::clock;
use crate::history::AggregatedRecord;

use std::fmt;

/// Detail shown when there are no records.
pub const NO_CHANGES: &str = "无 IP 变化";

/// Markers for the first records; the following ones use `<n>.`.
const MARKERS: [&str; 50] = [
    "①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨", "⑩", //
    "⑪", "⑫", "⑬", "⑭", "⑮", "⑯", "⑰", "⑱", "⑲", "⑳", //
    "㉑", "㉒", "㉓", "㉔", "㉕", "㉖", "㉗", "㉘", "㉙", "㉚", //
    "㉛", "㉜", "㉝", "㉞", "㉟", "㊱", "㊲", "㊳", "㊴", "㊵", //
    "㊶", "㊷", "㊸", "㊹", "㊺", "㊻", "㊼", "㊽", "㊾", "㊿",
];

/// How often an address showed up during the day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frequency {
    /// Observed once.
    Single,
    /// Observed twice.
    Caution,
    /// Observed three or more times.
    Severe,
}

impl Frequency {
    pub fn of(occurrence_count: usize) -> Self {
        match occurrence_count {
            0 | 1 => Frequency::Single,
            2 => Frequency::Caution,
            _ => Frequency::Severe,
        }
    }

    /// The annotation appended to a detail line, if any.
    fn annotation(&self, occurrence_count: usize) -> Option<String> {
        match self {
            Frequency::Single => None,
            Frequency::Caution => Some(format!("⚠️ {} 次", occurrence_count)),
            Frequency::Severe => Some(format!("🚨 {} 次", occurrence_count)),
        }
    }
}

/// The rendered summary of a day.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub distinct_address_count: usize,
    /// The most repeated record; `None` when no address repeats.
    pub most_frequent: Option<AggregatedRecord>,
    pub detail_lines: Vec<String>,
}

/// Renders `records`, keeping their order.
///
/// `most_frequent` is the record with the highest occurrence count among the
/// ones observed more than once; on ties the first one wins.
pub fn render(records: &[AggregatedRecord]) -> Report {
    if records.is_empty() {
        return Report {
            distinct_address_count: 0,
            most_frequent: None,
            detail_lines: vec![String::from(NO_CHANGES)],
        };
    }

    let mut most_frequent: Option<&AggregatedRecord> = None;
    for r in records.iter().filter(|r| r.occurrence_count() > 1) {
        match most_frequent {
            Some(m) if m.occurrence_count() >= r.occurrence_count() => {}
            _ => most_frequent = Some(r),
        }
    }

    Report {
        distinct_address_count: records.len(),
        most_frequent: most_frequent.cloned(),
        detail_lines: records
            .iter()
            .enumerate()
            .map(|(i, r)| detail_line(i, r))
            .collect(),
    }
}

fn detail_line(index: usize, record: &AggregatedRecord) -> String {
    let marker = match MARKERS.get(index) {
        Some(m) => String::from(*m),
        None => format!("{}.", index + 1),
    };

    let times: Vec<String> = record
        .timestamps
        .iter()
        .map(|t| clock::local(*t).format("%H:%M").to_string())
        .collect();

    let count = record.occurrence_count();
    let mut line = format!("{} {}  🕒 {}", marker, record.address, times.join(" / "));
    if let Some(annotation) = Frequency::of(count).annotation(count) {
        line.push_str("  ");
        line.push_str(&annotation);
    }

    line
}

impl Report {
    /// The summary line with the number of distinct addresses.
    pub fn summary(&self) -> String {
        format!("（今日共更换 {} 个 IP）", self.distinct_address_count)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        if self.distinct_address_count == 0 {
            return f.write_str(&self.detail_lines.join("\n"));
        }

        writeln!(f, "{}", self.summary())?;
        if let Some(r) = &self.most_frequent {
            writeln!(f, "最频繁：{}（{} 次）", r.address, r.occurrence_count())?;
        }
        writeln!(f)?;
        f.write_str(&self.detail_lines.join("\n"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::history::{aggregate, observation};

    fn record(address: &str, times: &[&str]) -> AggregatedRecord {
        let history: Vec<_> = times.iter().map(|t| observation(address, t)).collect();
        aggregate(&history).remove(0)
    }

    #[test]
    fn test_render_empty() {
        let report = render(&[]);
        assert_eq!(report.distinct_address_count, 0);
        assert_eq!(report.most_frequent, None);
        assert_eq!(report.detail_lines, vec![String::from(NO_CHANGES)]);
        assert_eq!(report.to_string(), NO_CHANGES);
    }

    #[test]
    fn test_frequency_thresholds() {
        assert_eq!(Frequency::of(1), Frequency::Single);
        assert_eq!(Frequency::of(2), Frequency::Caution);
        assert_eq!(Frequency::of(3), Frequency::Severe);
        assert_eq!(Frequency::of(7), Frequency::Severe);

        let once = record("1.1.1.1", &["2024-01-01T08:00:00+08:00"]);
        let twice = record(
            "2.2.2.2",
            &["2024-01-01T09:00:00+08:00", "2024-01-01T10:00:00+08:00"],
        );
        let three_times = record(
            "3.3.3.3",
            &[
                "2024-01-01T11:00:00+08:00",
                "2024-01-01T12:00:00+08:00",
                "2024-01-01T13:30:00+08:00",
            ],
        );

        let report = render(&[once, twice, three_times]);
        assert_eq!(
            report.detail_lines,
            vec![
                "① 1.1.1.1  🕒 08:00",
                "② 2.2.2.2  🕒 09:00 / 10:00  ⚠️ 2 次",
                "③ 3.3.3.3  🕒 11:00 / 12:00 / 13:30  🚨 3 次",
            ]
        );
    }

    #[test]
    fn test_render_times_use_reference_clock() {
        let r = record("1.1.1.1", &["2024-01-01T16:05:00Z"]);
        assert_eq!(render(&[r]).detail_lines, vec!["① 1.1.1.1  🕒 00:05"]);
    }

    #[test]
    fn test_render_most_frequent() {
        let single = record("1.1.1.1", &["2024-01-01T01:00:00+08:00"]);
        let report = render(&[single.clone()]);
        assert_eq!(report.most_frequent, None, "no address repeats");

        let twice_a = record(
            "2.2.2.2",
            &["2024-01-01T02:00:00+08:00", "2024-01-01T03:00:00+08:00"],
        );
        let twice_b = record(
            "3.3.3.3",
            &["2024-01-01T04:00:00+08:00", "2024-01-01T05:00:00+08:00"],
        );
        let report = render(&[single.clone(), twice_a.clone(), twice_b.clone()]);
        assert_eq!(report.most_frequent, Some(twice_a.clone()), "ties keep the first");

        let thrice = record(
            "4.4.4.4",
            &[
                "2024-01-01T06:00:00+08:00",
                "2024-01-01T07:00:00+08:00",
                "2024-01-01T08:00:00+08:00",
            ],
        );
        let report = render(&[single, twice_a, thrice.clone(), twice_b]);
        assert_eq!(report.most_frequent, Some(thrice));
        assert_eq!(report.distinct_address_count, 4);
    }

    #[test]
    fn test_render_marker_after_fifty() {
        let records: Vec<_> = (0..51)
            .map(|i| record(&format!("10.0.0.{}", i), &["2024-01-01T01:00:00+08:00"]))
            .collect();

        let report = render(&records);
        assert!(report.detail_lines[49].starts_with("㊿ 10.0.0.49"));
        assert!(report.detail_lines[50].starts_with("51. 10.0.0.50"));
    }

    #[test]
    fn test_end_to_end_day() {
        let history = vec![
            observation("1.1.1.1", "2024-01-01T00:05:00+08:00"),
            observation("2.2.2.2", "2024-01-01T00:10:00+08:00"),
            observation("1.1.1.1", "2024-01-01T00:15:00+08:00"),
        ];

        let report = render(&aggregate(&history));
        assert_eq!(report.distinct_address_count, 2);

        let most = report.most_frequent.as_ref().expect("1.1.1.1 repeats");
        assert_eq!(most.address.as_str(), "1.1.1.1");
        assert_eq!(most.occurrence_count(), 2);
        assert_eq!(report.detail_lines[0], "① 1.1.1.1  🕒 00:05 / 00:15  ⚠️ 2 次");

        assert_eq!(
            report.to_string(),
            "（今日共更换 2 个 IP）\n最频繁：1.1.1.1（2 次）\n\n\
             ① 1.1.1.1  🕒 00:05 / 00:15  ⚠️ 2 次\n\
             ② 2.2.2.2  🕒 00:10"
        );
    }
}
