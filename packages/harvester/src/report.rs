//! Rendering of display views for the terminal and for machine consumers.

use serde::Serialize;

use crate::error::Result;
use crate::types::{CandidateRegistry, DisplayView, ResultRecord};
use crate::view::build_view;

/// Default bar length for the largest value in a chart.
pub const DEFAULT_CHART_WIDTH: usize = 40;

const BAR: char = '█';

/// Output format of rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One bar chart per region.
    #[default]
    Text,
    Json,
    Yaml,
}

/// What the values of a report mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueUnit {
    Votes,
    Percent,
}

/// Display-ready results of one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReport {
    pub region_id: String,
    pub region_name: String,
    pub total_votes: u64,
    /// Name of the leading candidate, if the registry lists them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,
    pub unit: ValueUnit,
    pub results: DisplayView,
}

impl RegionReport {
    /// Build the report for one record.
    ///
    /// # Errors
    /// Propagates `MissingCandidateData` and `NoVotes` from [`build_view`].
    pub fn new(
        record: &ResultRecord,
        registry: &CandidateRegistry,
        use_percentages: bool,
    ) -> Result<Self> {
        Ok(Self {
            region_id: record.region_id().to_string(),
            region_name: record.region_name().to_string(),
            total_votes: record.total_votes(),
            leader: record
                .leader()
                .and_then(|(ordinal, _)| registry.name(ordinal))
                .map(str::to_string),
            unit: if use_percentages {
                ValueUnit::Percent
            } else {
                ValueUnit::Votes
            },
            results: build_view(record, registry, use_percentages)?,
        })
    }

    /// Render as a horizontal bar chart titled with the region name.
    pub fn to_chart(&self, width: usize) -> String {
        let title = format!(
            "{} ({}), {} votes",
            self.region_name, self.region_id, self.total_votes
        );
        render_bar_chart(&title, &self.results, self.unit, width)
    }
}

/// Render a view as a text bar chart.
///
/// Bars are scaled so the largest value spans `width` characters.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use volby_harvester::report::{render_bar_chart, ValueUnit};
/// use volby_harvester::{build_view, CandidateRegistry, ResultRecord};
///
/// let record = ResultRecord::new("CZ010", "Praha", BTreeMap::from([(1, 1), (2, 2)]));
/// let registry = CandidateRegistry::new([(1, "A"), (2, "B")]).unwrap();
/// let view = build_view(&record, &registry, false).unwrap();
///
/// let chart = render_bar_chart("Praha", &view, ValueUnit::Votes, 4);
/// assert_eq!(chart, "Praha\n  A  ██    1\n  B  ████  2\n");
/// ```
pub fn render_bar_chart(title: &str, view: &DisplayView, unit: ValueUnit, width: usize) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    let name_width = view.names().map(|n| n.chars().count()).max().unwrap_or(0);
    let max = view.values().fold(0.0_f64, f64::max);

    for (name, value) in view.iter() {
        let bar_len = if max > 0.0 {
            (value / max * width as f64).round() as usize
        } else {
            0
        };
        let bar: String = std::iter::repeat(BAR).take(bar_len).collect();
        let padding = name_width - name.chars().count();
        out.push_str(&format!(
            "  {name}{}  {bar:<width$}  {}\n",
            " ".repeat(padding),
            format_value(value, unit)
        ));
    }

    out
}

fn format_value(value: f64, unit: ValueUnit) -> String {
    match unit {
        ValueUnit::Votes => format!("{value:.0}"),
        ValueUnit::Percent => format!("{value:.1} %"),
    }
}

/// Render a batch of reports in the requested format.
pub fn render_reports(reports: &[RegionReport], format: OutputFormat, width: usize) -> Result<String> {
    let rendered = match format {
        OutputFormat::Text => reports
            .iter()
            .map(|r| r.to_chart(width))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(reports)?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yaml_ng::to_string(reports)?,
    };
    Ok(rendered)
}
