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
use crate::config::config_file::Config;
use crate::parsing::request::ReportRequest;
use anyhow::{anyhow, Error};
use dirs::home_dir;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Filesystem;

impl Filesystem {
	pub fn new() -> Self {
		Self
	}

	/// Fetches the config from the given path, or the default path if none.
	/// The default file is created empty if it does not exist yet; a custom
	/// path must exist.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => home_dir()
				.ok_or_else(|| anyhow!("Unable to determine home directory"))?
				.join(".config/cropsheet/config.toml"),
			Some(p) => PathBuf::from(p),
		};

		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(&config_path)?;
		}

		debug!(path = %config_path.display(), "loading config");
		let content = fs::read_to_string(&config_path).map_err(|e| {
			anyhow!("failed to read config {}: {}", config_path.display(), e)
		})?;
		toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))
	}

	pub fn read_request(&self, file_path: &str) -> Result<ReportRequest, Error> {
		let content = fs::read_to_string(file_path)
			.map_err(|e| anyhow!("failed to read {}: {}", file_path, e))?;
		ReportRequest::from_json(&content)
	}

	/// Creates the directory and its parents if absent.
	pub fn ensure_dir(&self, dir: &Path) -> Result<(), Error> {
		if !dir.is_dir() {
			debug!(dir = %dir.display(), "creating directory");
			fs::create_dir_all(dir).map_err(|e| {
				anyhow!("failed to create {}: {}", dir.display(), e)
			})?;
		}
		Ok(())
	}

	/// Writes to a temporary sibling and renames it over the destination, so
	/// readers never see a partially written file.
	pub fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), Error> {
		let tmp = temp_sibling(path);
		fs::write(&tmp, bytes)
			.map_err(|e| anyhow!("failed to write {}: {}", tmp.display(), e))?;
		self.commit(&tmp, path)
	}

	/// Moves a finished temporary file into place, replacing any existing
	/// file of that name.
	pub fn commit(&self, tmp: &Path, path: &Path) -> Result<(), Error> {
		fs::rename(tmp, path).map_err(|e| {
			let _ = fs::remove_file(tmp);
			anyhow!("failed to move {} into place: {}", path.display(), e)
		})
	}
}

/// `dir/name.ext` -> `dir/.name.ext.<pid>.tmp`; the extension is kept at the
/// end of the stem so encoders that sniff it still work.
pub fn temp_sibling(path: &Path) -> PathBuf {
	let name = path
		.file_name()
		.map(|n| n.to_string_lossy().to_string())
		.unwrap_or_default();
	let ext = path
		.extension()
		.map(|e| format!(".{}", e.to_string_lossy()))
		.unwrap_or_default();
	path.with_file_name(format!(".{}.{}.tmp{}", name, std::process::id(), ext))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_temp_sibling_keeps_directory_and_extension() {
		let tmp = temp_sibling(Path::new("out/report.pdf"));
		assert_eq!(tmp.parent(), Some(Path::new("out")));
		let name = tmp.file_name().unwrap().to_string_lossy().to_string();
		assert!(name.starts_with(".report.pdf."), "{}", name);
		assert!(name.ends_with(".tmp.pdf"), "{}", name);
	}

	#[test]
	fn test_write_atomic_overwrites() {
		let dir = tempfile::tempdir().unwrap();
		let fs = Filesystem::new();
		let target = dir.path().join("nested/a.pdf");

		fs.ensure_dir(target.parent().unwrap()).unwrap();
		fs.write_atomic(&target, b"first").unwrap();
		fs.write_atomic(&target, b"second").unwrap();

		assert_eq!(std::fs::read(&target).unwrap(), b"second");
		let leftovers = std::fs::read_dir(target.parent().unwrap())
			.unwrap()
			.count();
		assert_eq!(leftovers, 1);
	}

	#[test]
	fn test_custom_config_must_exist() {
		let fs = Filesystem::new();
		let missing = "/nonexistent/cropsheet/config.toml".to_string();
		assert!(fs.get_config(Some(&missing)).is_err());
	}

	#[test]
	fn test_read_request() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("req.json");
		std::fs::write(&path, r#"{"crop_name": "Rice"}"#).unwrap();

		let request = Filesystem::new()
			.read_request(path.to_str().unwrap())
			.unwrap();
		assert_eq!(request.crop_name.as_deref(), Some("Rice"));
	}
}
