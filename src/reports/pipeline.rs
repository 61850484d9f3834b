/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::Settings;
use crate::gl::ledger::Ledger;
use crate::gl::metrics::ReportMetrics;
use crate::parsing::filesystem::Filesystem;
use crate::parsing::request::{ReportContext, ReportRequest};
use crate::reports::chart::{BarChart, ChartRenderer};
use crate::reports::composer::compose;
use crate::reports::layout::{Document, FooterDecorator};
use crate::reports::pdf::PdfCanvas;
use crate::util::clock::Clock;
use anyhow::{anyhow, Error};
use chrono::Datelike;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a report is built from: validated context, the aggregated
/// ledger and its metrics.
#[derive(Clone, Debug)]
pub struct Report {
	pub context: ReportContext,
	pub ledger: Ledger,
	pub metrics: ReportMetrics,
}

impl Report {
	pub fn build(request: &ReportRequest, clock: &dyn Clock) -> Result<Self, Error> {
		let context = request.context(clock)?;
		let ledger =
			Ledger::aggregate(&request.expense_columns(), &request.income_columns())?;
		let metrics = ReportMetrics::from_ledger(&ledger, context.area);

		Ok(Self {
			context,
			ledger,
			metrics,
		})
	}

	pub fn chart(&self) -> BarChart {
		BarChart::new(self.metrics.total_income, self.metrics.total_expense)
	}

	pub fn layout(&self, chart: &Path, logo: Option<&Path>) -> Document {
		compose(&self.context, &self.ledger, &self.metrics, chart, logo)
	}
}

/// The finished document on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportArtifact {
	pub path: PathBuf,
	pub chart: PathBuf,
	pub pages: usize,
}

/// Builds `{crop}_{area}_{season}_{year}.pdf`, replacing characters that
/// cannot appear in a file name with `-`.
pub struct ArtifactNamer {
	unsafe_chars: Regex,
}

impl ArtifactNamer {
	pub fn new() -> Result<Self, Error> {
		let unsafe_chars = Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#)
			.map_err(|e| anyhow!("invalid file name pattern: {}", e))?;
		Ok(Self { unsafe_chars })
	}

	pub fn stem(&self, context: &ReportContext) -> String {
		let raw = format!(
			"{}_{}_{}_{}",
			context.crop_name,
			context.area_display(),
			context.season,
			context.generated_at.year()
		);
		self.unsafe_chars.replace_all(&raw, "-").into_owned()
	}

	pub fn file_name(&self, context: &ReportContext) -> String {
		format!("{}.pdf", self.stem(context))
	}
}

/// Runs one request end to end: validate, aggregate, chart, compose, write.
pub struct Pipeline<'a> {
	settings: &'a Settings,
	clock: &'a dyn Clock,
	fs: Filesystem,
	namer: ArtifactNamer,
	charts: ChartRenderer,
}

impl<'a> Pipeline<'a> {
	pub fn new(settings: &'a Settings, clock: &'a dyn Clock) -> Result<Self, Error> {
		Ok(Self {
			settings,
			clock,
			fs: Filesystem::new(),
			namer: ArtifactNamer::new()?,
			charts: ChartRenderer::new(settings.font_path.as_deref()),
		})
	}

	pub fn run(&self, request: &ReportRequest) -> Result<ReportArtifact, Error> {
		let report = Report::build(request, self.clock)?;
		let stem = self.namer.stem(&report.context);

		self.fs.ensure_dir(&self.settings.output_dir)?;
		self.fs.ensure_dir(&self.settings.chart_dir)?;

		let chart_path = self.settings.chart_dir.join(format!("{}_chart.png", stem));
		self.charts.render(&report.chart(), &chart_path)?;

		let document = report.layout(&chart_path, Some(&self.settings.logo_path));
		let mut canvas = PdfCanvas::new(&report.context.crop_name, &document.geometry)?;
		let footer = FooterDecorator {
			branding: self.settings.branding.clone(),
		};
		let pages = document.render(&mut canvas, &footer)?;
		let bytes = canvas.finish()?;

		let path = self.settings.output_dir.join(self.namer.file_name(&report.context));
		self.fs.write_atomic(&path, &bytes)?;

		info!(path = %path.display(), pages, "report written");
		Ok(ReportArtifact {
			path,
			chart: chart_path,
			pages,
		})
	}
}
