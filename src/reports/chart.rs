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
use crate::parsing::filesystem::{temp_sibling, Filesystem};
use crate::reports::theme::{self, Rgb};
use crate::util::money::{Money, CURRENCY_SYMBOL};
use crate::util::quant::Quant;
use anyhow::{anyhow, Error};
use once_cell::sync::OnceCell;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CHART_WIDTH: u32 = 900;
pub const CHART_HEIGHT: u32 = 450;

const FONT_FAMILY: &str = "cropsheet-sans";

const SYSTEM_FONTS: [&str; 5] = [
	"/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
	"/usr/share/fonts/TTF/DejaVuSans.ttf",
	"/usr/share/fonts/dejavu/DejaVuSans.ttf",
	"/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
	"/Library/Fonts/Arial.ttf",
];

/// Configured path the font was resolved for, and the font registered with
/// the rasterizer for this process, if any.
static CHART_FONT: OnceCell<(Option<PathBuf>, Option<PathBuf>)> = OnceCell::new();

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
	pub label: &'static str,
	pub value: Quant,
	pub color: Rgb,
}

/// Income and expense totals side by side.
#[derive(Clone, Debug, PartialEq)]
pub struct BarChart {
	bars: [Bar; 2],
}

impl BarChart {
	pub fn new(total_income: Quant, total_expense: Quant) -> Self {
		Self {
			bars: [
				Bar {
					label: "Income",
					value: total_income,
					color: theme::ACCENT_GREEN,
				},
				Bar {
					label: "Expense",
					value: total_expense,
					color: theme::EXPENSE_RED,
				},
			],
		}
	}

	pub fn bars(&self) -> &[Bar] {
		&self.bars
	}

	/// Top of the value axis, leaving headroom for the labels above the bars.
	pub fn y_upper_bound(&self) -> f64 {
		let max = self
			.bars
			.iter()
			.map(|b| b.value)
			.max()
			.unwrap_or_default();
		if max.is_positive() {
			max.to_f64() * 1.15
		} else {
			1.0
		}
	}

	/// `₹1,500`
	pub fn label_for(value: Quant) -> String {
		Money::new(value).whole_label()
	}
}

/// Evenly spaced gridline values from zero up to `y_max`, on a 1/2/2.5/5
/// step of at least one rupee so whole-rupee labels never repeat.
pub fn y_ticks(y_max: f64) -> Vec<f64> {
	if y_max <= 0.0 || !y_max.is_finite() {
		return vec![0.0];
	}

	let raw = y_max / 5.0;
	let magnitude = 10f64.powf(raw.log10().floor());
	let step = match raw / magnitude {
		n if n <= 1.0 => 1.0,
		n if n <= 2.0 => 2.0,
		n if n <= 2.5 => 2.5,
		n if n <= 5.0 => 5.0,
		_ => 10.0,
	} * magnitude;
	let step = step.max(1.0);

	(0..)
		.map(|i| i as f64 * step)
		.take_while(|t| *t <= y_max)
		.collect()
}

/// `₹1,500`, for a gridline value.
pub fn tick_label(value: f64) -> String {
	Money::new(Quant::from_i128(value.round() as i128)).whole_label()
}

fn rgb(color: Rgb) -> RGBColor {
	RGBColor(color.0, color.1, color.2)
}

fn chart_error<E: Display>(e: E) -> Error {
	anyhow!("chart rendering failed: {}", e)
}

/// Rasterizes a [`BarChart`] to PNG.
pub struct ChartRenderer {
	font: Option<PathBuf>,
}

impl ChartRenderer {
	/// Uses the font at `font_path`, or the first usable system font. Without
	/// one, charts are drawn without any text.
	///
	/// The font is registered with the rasterizer once per process: the first
	/// renderer created decides it, and a different `font_path` given later is
	/// ignored with a warning.
	pub fn new(font_path: Option<&Path>) -> Self {
		Self {
			font: load_font(font_path),
		}
	}

	pub fn has_text(&self) -> bool {
		self.font.is_some()
	}

	/// Renders the chart into `path`, replacing any existing file. The image
	/// is drawn under a temporary name first and renamed into place.
	pub fn render(&self, chart: &BarChart, path: &Path) -> Result<PathBuf, Error> {
		let tmp = temp_sibling(path);
		if let Err(e) = self.draw(chart, &tmp) {
			let _ = fs::remove_file(&tmp);
			return Err(e);
		}
		Filesystem::new().commit(&tmp, path)?;

		debug!(path = %path.display(), "chart written");
		Ok(path.to_path_buf())
	}

	fn draw(&self, chart: &BarChart, target: &Path) -> Result<(), Error> {
		let root = BitMapBackend::new(target, (CHART_WIDTH, CHART_HEIGHT))
			.into_drawing_area();
		root.fill(&rgb(theme::DARK_BG)).map_err(chart_error)?;

		let y_max = chart.y_upper_bound();
		let mut plot = ChartBuilder::on(&root)
			.margin_top(30)
			.margin_right(30)
			.x_label_area_size(50)
			.y_label_area_size(120)
			.build_cartesian_2d(0f64..2f64, 0f64..y_max)
			.map_err(chart_error)?;
		plot.plotting_area()
			.fill(&rgb(theme::CARD_BG))
			.map_err(chart_error)?;

		let ticks = y_ticks(y_max);
		let grid = rgb(theme::BORDER_SUBTLE).stroke_width(1);
		plot.draw_series(
			ticks
				.iter()
				.map(|&t| PathElement::new(vec![(0.0, t), (2.0, t)], grid)),
		)
		.map_err(chart_error)?;

		let edge = rgb(theme::BORDER_SUBTLE).stroke_width(2);
		for (i, bar) in chart.bars().iter().enumerate() {
			let corners = [(i as f64 + 0.2, 0.0), (i as f64 + 0.8, bar.value.to_f64())];
			plot.draw_series([
				Rectangle::new(corners, rgb(bar.color).filled()),
				Rectangle::new(corners, edge),
			])
			.map_err(chart_error)?;
		}

		let axis = rgb(theme::TEXT_MUTED).stroke_width(1);
		plot.draw_series(std::iter::once(PathElement::new(
			vec![(0.0, y_max), (0.0, 0.0), (2.0, 0.0)],
			axis,
		)))
		.map_err(chart_error)?;

		if self.has_text() {
			let muted = rgb(theme::TEXT_MUTED);
			let tick_style = (FONT_FAMILY, 15).into_font().color(&muted);
			let value_style = (FONT_FAMILY, 17).into_font().color(&rgb(theme::TEXT_MAIN));

			for &t in &ticks {
				let (x, y) = plot.backend_coord(&(0.0, t));
				root.draw(&Text::new(
					tick_label(t),
					(x - 8, y),
					tick_style.pos(Pos::new(HPos::Right, VPos::Center)),
				))
				.map_err(chart_error)?;
			}

			for (i, bar) in chart.bars().iter().enumerate() {
				let centre = i as f64 + 0.5;

				let (x, y) = plot.backend_coord(&(centre, bar.value.to_f64()));
				root.draw(&Text::new(
					BarChart::label_for(bar.value),
					(x, y - 6),
					value_style.pos(Pos::new(HPos::Center, VPos::Bottom)),
				))
				.map_err(chart_error)?;

				let (x, y) = plot.backend_coord(&(centre, 0.0));
				root.draw(&Text::new(
					bar.label,
					(x, y + 12),
					tick_style.pos(Pos::new(HPos::Center, VPos::Top)),
				))
				.map_err(chart_error)?;
			}

			let (_, top) = plot.backend_coord(&(0.0, y_max));
			let (_, bottom) = plot.backend_coord(&(0.0, 0.0));
			root.draw(&Text::new(
				format!("Amount ({})", CURRENCY_SYMBOL),
				(18, (top + bottom) / 2),
				(FONT_FAMILY, 16)
					.into_font()
					.color(&muted)
					.transform(FontTransform::Rotate270)
					.pos(Pos::new(HPos::Center, VPos::Center)),
			))
			.map_err(chart_error)?;
		}

		root.present().map_err(chart_error)?;
		Ok(())
	}
}

/// Registers the first readable TrueType font, trying the configured path
/// before the system locations. Runs once per process.
fn load_font(configured: Option<&Path>) -> Option<PathBuf> {
	let (resolved_for, font) = CHART_FONT.get_or_init(|| {
		(configured.map(Path::to_path_buf), register_first_font(configured))
	});

	if let Some(path) = configured {
		if resolved_for.as_deref() != Some(path) {
			warn!(
				path = %path.display(),
				"chart font already chosen for this process, ignoring configured font"
			);
		}
	}
	font.clone()
}

fn register_first_font(configured: Option<&Path>) -> Option<PathBuf> {
	let candidates = configured
		.map(Path::to_path_buf)
		.into_iter()
		.chain(SYSTEM_FONTS.iter().map(PathBuf::from));

	for candidate in candidates {
		let Ok(bytes) = fs::read(&candidate) else {
			continue;
		};
		let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
		match register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
			Ok(()) => {
				debug!(path = %candidate.display(), "chart font loaded");
				return Some(candidate);
			},
			Err(_) => warn!(path = %candidate.display(), "unusable chart font"),
		}
	}

	warn!("no TrueType font found, chart text will be omitted");
	None
}
