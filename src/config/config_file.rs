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
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "reports";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_LOGO_FILE: &str = "logo.png";
pub const DEFAULT_BRANDING: &str = "Proudly maintained accounting with GramIQ";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Where finished documents are written.
	pub output_dir: Option<String>,
	pub assets: Option<Assets>,
	pub chart: Option<Chart>,
	pub document: Option<Document>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assets {
	/// Optional branding image for the report header. Absence is fine.
	pub logo_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chart {
	/// Directory for intermediate chart images.
	pub dir: Option<String>,

	/// TrueType font for chart text. When unset, a few well-known system
	/// locations are tried.
	pub font_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
	/// Text centered in every page footer.
	pub branding: Option<String>,
}

/// Fully resolved settings the report pipeline runs with. Built from the
/// config file and then overridden by command line flags.
#[derive(Clone, Debug)]
pub struct Settings {
	pub output_dir: PathBuf,
	pub chart_dir: PathBuf,
	pub logo_path: PathBuf,
	pub font_path: Option<PathBuf>,
	pub branding: String,
}

impl Settings {
	pub fn from_config(config: Config) -> Self {
		let assets = config.assets.unwrap_or_default();
		let chart = config.chart.unwrap_or_default();
		let document = config.document.unwrap_or_default();

		Self {
			output_dir: PathBuf::from(
				config
					.output_dir
					.unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
			),
			chart_dir: PathBuf::from(
				chart.dir.unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
			),
			logo_path: assets.logo_path.map(PathBuf::from).unwrap_or_else(|| {
				PathBuf::from(DEFAULT_STATIC_DIR).join(DEFAULT_LOGO_FILE)
			}),
			font_path: chart.font_path.map(PathBuf::from),
			branding: document
				.branding
				.unwrap_or_else(|| DEFAULT_BRANDING.to_string()),
		}
	}
}

impl Default for Settings {
	fn default() -> Self {
		Self::from_config(Config::default())
	}
}
