/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::io::Write;

use crate::experiment::ExperimentReport;
use crate::Result;

/// Renders an ExperimentReport somewhere durable.
pub trait Reporter {
    fn write_report(&mut self, report: &ExperimentReport) -> Result<()>;
}

pub const CSV_HEADER: [&str; 5] = [
    "Configuration",
    "Agent 1 mean",
    "Agent 1 std dev",
    "Agent 2 mean",
    "Agent 2 std dev",
];

/// One row per configuration, then an "Overall mean" row. "Agent 1" is the raw reward and
/// "Agent 2" the reward after the movement penalty.
pub struct CsvReporter<W: Write> {
    writer: W,
}

impl<W: Write> CsvReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_row(&mut self, fields: &[String]) -> Result<()> {
        let row: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
        writeln!(self.writer, "{}", row.join(","))?;
        Ok(())
    }
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn write_report(&mut self, report: &ExperimentReport) -> Result<()> {
        let header: Vec<String> = CSV_HEADER.iter().map(|s| s.to_string()).collect();
        self.write_row(&header)?;
        for summary in &report.summaries {
            self.write_row(&[
                summary.configuration.label().to_string(),
                summary.raw_reward.mean.to_string(),
                summary.raw_reward.std_dev.to_string(),
                summary.net_reward.mean.to_string(),
                summary.net_reward.std_dev.to_string(),
            ])?;
        }
        self.write_row(&[
            "Overall mean".to_string(),
            report.overall_raw_reward_mean.to_string(),
            String::new(),
            report.overall_net_reward_mean.to_string(),
            String::new(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}

/// The whole report, including seed and per-configuration probabilities, as pretty JSON.
pub struct JsonReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn write_report(&mut self, report: &ExperimentReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentKind;
    use crate::experiment::{ConfigurationSummary, MetricSummary};
    use crate::vacuum_world::DirtConfiguration;

    fn report() -> ExperimentReport {
        let summary = |index: usize, raw: f64, net: f64| ConfigurationSummary {
            configuration: DirtConfiguration::numbered(index, vec![0.3, 0.3, 0.3]).unwrap(),
            raw_reward: MetricSummary {
                mean: raw,
                std_dev: 1.5,
            },
            net_reward: MetricSummary {
                mean: net,
                std_dev: 2.25,
            },
        };
        ExperimentReport {
            agent: AgentKind::Frequency,
            base_seed: 42,
            trials_per_configuration: 10,
            steps_per_trial: 1000,
            summaries: vec![summary(0, 2500.0, 2000.5), summary(1, 2400.0, 1900.5)],
            overall_raw_reward_mean: 2450.0,
            overall_net_reward_mean: 1950.5,
        }
    }

    #[test]
    fn test_csv_report_layout() {
        let mut reporter = CsvReporter::new(Vec::new());
        reporter.write_report(&report()).expect("write failed");
        let csv = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            csv,
            "Configuration,Agent 1 mean,Agent 1 std dev,Agent 2 mean,Agent 2 std dev\n\
             Configuration 1,2500,1.5,2000.5,2.25\n\
             Configuration 2,2400,1.5,1900.5,2.25\n\
             Overall mean,2450,,1950.5,\n"
        );
    }

    #[test]
    fn test_csv_fields_with_commas_are_quoted() {
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("plain"), "plain");
    }

    #[test]
    fn test_json_report_contains_summaries() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.write_report(&report()).expect("write failed");
        let json: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(json["agent"], "frequency");
        assert_eq!(json["base_seed"], 42);
        assert_eq!(json["summaries"].as_array().unwrap().len(), 2);
        assert_eq!(
            json["summaries"][0]["configuration"]["label"],
            "Configuration 1"
        );
        assert_eq!(json["overall_net_reward_mean"], 1950.5);
    }
}
