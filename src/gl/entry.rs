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
use crate::util::money::Money;
use crate::util::quant::Quant;
use std::fmt;

/// Shown in place of a missing date or description, and in the unused
/// columns of an empty table's placeholder row.
pub const PLACEHOLDER_GLYPH: &str = "—";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
	Expense,
	Income,
}

impl EntryKind {
	/// Plural noun used in headings and placeholder rows.
	pub fn plural(&self) -> &'static str {
		match self {
			EntryKind::Expense => "expenses",
			EntryKind::Income => "income",
		}
	}
}

/// One itemized, validated line of a ledger. Immutable once built.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerEntry {
	category: String,
	amount: Quant,
	date: String,
	desc: String,
}

/// Why a raw row was left out of the ledger. None of these are errors; they
/// are the data-quality policy for incomplete form rows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DropReason {
	EmptyCategory,
	EmptyAmount,
	UnparseableAmount,
	NegativeAmount,
}

impl fmt::Display for DropReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = match self {
			DropReason::EmptyCategory => "category is empty",
			DropReason::EmptyAmount => "amount is empty",
			DropReason::UnparseableAmount => "amount is not a number",
			DropReason::NegativeAmount => "amount is negative",
		};
		write!(f, "{}", text)
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowOutcome {
	Accepted,
	Dropped(DropReason),
}

impl LedgerEntry {
	/// Validates one raw row. Category and amount are trimmed; blank dates and
	/// descriptions are replaced by the placeholder glyph.
	pub fn from_raw(
		category: &str,
		amount: &str,
		date: &str,
		desc: &str,
	) -> Result<Self, DropReason> {
		let category = category.trim();
		if category.is_empty() {
			return Err(DropReason::EmptyCategory);
		}

		let amount = amount.trim();
		if amount.is_empty() {
			return Err(DropReason::EmptyAmount);
		}

		let amount = match Quant::from_str(amount) {
			Ok(q) => q,
			Err(_) => return Err(DropReason::UnparseableAmount),
		};
		if amount.is_negative() {
			return Err(DropReason::NegativeAmount);
		}

		Ok(Self {
			category: category.to_string(),
			amount,
			date: or_placeholder(date),
			desc: or_placeholder(desc),
		})
	}

	pub fn get_category(&self) -> &String {
		&self.category
	}

	pub fn get_amount(&self) -> Quant {
		self.amount
	}

	pub fn get_date(&self) -> &String {
		&self.date
	}

	pub fn get_desc(&self) -> &String {
		&self.desc
	}

	/// Currency text for tables, e.g. `₹ 1,000.00`.
	pub fn formatted_amount(&self) -> String {
		Money::new(self.amount).to_string()
	}
}

fn or_placeholder(value: &str) -> String {
	let value = value.trim();
	if value.is_empty() {
		PLACEHOLDER_GLYPH.to_string()
	} else {
		value.to_string()
	}
}
