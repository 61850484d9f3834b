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
use crate::gl::ledger::RawColumns;
use crate::util::clock::Clock;
use crate::util::quant::Quant;
use anyhow::{anyhow, Error};
use chrono::NaiveDateTime;
use serde::Deserialize;

/// A report request exactly as the submission form posts it: every value is
/// text, and each ledger side arrives as four parallel arrays.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReportRequest {
	pub farmer_name: Option<String>,
	pub crop_name: Option<String>,
	pub season: Option<String>,
	pub acres: Option<String>,

	#[serde(rename = "expense_category[]", alias = "expense_category", default)]
	pub expense_category: Vec<String>,
	#[serde(rename = "expense_amount[]", alias = "expense_amount", default)]
	pub expense_amount: Vec<String>,
	#[serde(rename = "expense_date[]", alias = "expense_date", default)]
	pub expense_date: Vec<String>,
	#[serde(rename = "expense_desc[]", alias = "expense_desc", default)]
	pub expense_desc: Vec<String>,

	#[serde(rename = "income_category[]", alias = "income_category", default)]
	pub income_category: Vec<String>,
	#[serde(rename = "income_amount[]", alias = "income_amount", default)]
	pub income_amount: Vec<String>,
	#[serde(rename = "income_date[]", alias = "income_date", default)]
	pub income_date: Vec<String>,
	#[serde(rename = "income_desc[]", alias = "income_desc", default)]
	pub income_desc: Vec<String>,
}

/// Identifying metadata carried unchanged into the document header and the
/// artifact's file name.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportContext {
	pub farmer_name: String,
	pub crop_name: String,
	pub season: String,
	pub area: Quant,
	pub generated_at: NaiveDateTime,
}

impl ReportContext {
	/// Area as printed in the header and file name, e.g. `2.0`.
	pub fn area_display(&self) -> String {
		self.area.to_plain_string()
	}
}

impl ReportRequest {
	pub fn from_json(content: &str) -> Result<Self, Error> {
		serde_json::from_str(content)
			.map_err(|e| anyhow!("failed to parse report request: {}", e))
	}

	/// Validates the scalar fields. A missing field or an acreage that is not
	/// a number fails the whole request.
	pub fn context(&self, clock: &dyn Clock) -> Result<ReportContext, Error> {
		let acres = required("acres", &self.acres)?;
		let area = Quant::from_str(acres)
			.map_err(|e| anyhow!("Invalid acres {:?}: {}", acres, e))?;

		Ok(ReportContext {
			farmer_name: required("farmer_name", &self.farmer_name)?.to_string(),
			crop_name: required("crop_name", &self.crop_name)?.to_string(),
			season: required("season", &self.season)?.to_string(),
			area,
			generated_at: clock.now(),
		})
	}

	pub fn expense_columns(&self) -> RawColumns {
		RawColumns {
			category: self.expense_category.clone(),
			amount: self.expense_amount.clone(),
			date: self.expense_date.clone(),
			desc: self.expense_desc.clone(),
		}
	}

	pub fn income_columns(&self) -> RawColumns {
		RawColumns {
			category: self.income_category.clone(),
			amount: self.income_amount.clone(),
			date: self.income_date.clone(),
			desc: self.income_desc.clone(),
		}
	}
}

fn required<'a>(name: &str, value: &'a Option<String>) -> Result<&'a str, Error> {
	value
		.as_deref()
		.ok_or_else(|| anyhow!("Missing required field: {}", name))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::util::clock::FixedClock;
	use chrono::NaiveDate;

	fn clock() -> FixedClock {
		FixedClock(
			NaiveDate::from_ymd_opt(2024, 6, 5)
				.unwrap()
				.and_hms_opt(9, 0, 0)
				.unwrap(),
		)
	}

	#[test]
	fn test_form_field_names() {
		let request = ReportRequest::from_json(
			r#"{
				"farmer_name": "Asha",
				"crop_name": "Wheat",
				"season": "Rabi",
				"acres": "2",
				"expense_category[]": ["Seeds"],
				"expense_amount[]": ["1000.00"],
				"expense_date[]": ["2024-01-01"],
				"expense_desc[]": [""]
			}"#,
		)
		.unwrap();

		let context = request.context(&clock()).unwrap();
		assert_eq!(context.crop_name, "Wheat");
		assert_eq!(context.area_display(), "2.0");
		assert_eq!(context.generated_at, clock().0);

		let expenses = request.expense_columns();
		assert_eq!(expenses.category, vec!["Seeds"]);
		assert!(request.income_columns().category.is_empty());
	}

	#[test]
	fn test_unbracketed_aliases() {
		let request = ReportRequest::from_json(
			r#"{"income_category": ["Sale"], "income_amount": ["10"],
				"income_date": [""], "income_desc": [""]}"#,
		)
		.unwrap();
		assert_eq!(request.income_columns().amount, vec!["10"]);
	}

	#[test]
	fn test_missing_scalar_is_fatal() {
		let request = ReportRequest::from_json(
			r#"{"farmer_name": "Asha", "crop_name": "Wheat", "acres": "2"}"#,
		)
		.unwrap();
		let err = request.context(&clock()).unwrap_err().to_string();
		assert!(err.contains("season"), "{}", err);
	}

	#[test]
	fn test_bad_acres_is_fatal() {
		let request = ReportRequest {
			farmer_name: Some("Asha".into()),
			crop_name: Some("Wheat".into()),
			season: Some("Rabi".into()),
			acres: Some("two".into()),
			..Default::default()
		};
		assert!(request.context(&clock()).is_err());
	}

	#[test]
	fn test_empty_strings_are_present() {
		let request = ReportRequest {
			farmer_name: Some(String::new()),
			crop_name: Some(String::new()),
			season: Some(String::new()),
			acres: Some("0".into()),
			..Default::default()
		};
		let context = request.context(&clock()).unwrap();
		assert!(context.area.is_zero());
	}
}
