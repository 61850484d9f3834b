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
use crate::gl::entry::{EntryKind, LedgerEntry, RowOutcome};
use crate::util::quant::Quant;
use anyhow::{bail, Error};
use tracing::debug;

/// Four parallel columns of raw form text for one side of the ledger. Index
/// i of each column together makes up row i.
#[derive(Clone, Debug, Default)]
pub struct RawColumns {
	pub category: Vec<String>,
	pub amount: Vec<String>,
	pub date: Vec<String>,
	pub desc: Vec<String>,
}

impl RawColumns {
	/// Number of rows, provided all four columns agree on it.
	fn row_count(&self, kind: EntryKind) -> Result<usize, Error> {
		let lengths = [
			self.category.len(),
			self.amount.len(),
			self.date.len(),
			self.desc.len(),
		];
		if lengths.iter().any(|&l| l != lengths[0]) {
			bail!(
				"Malformed {} columns: category/amount/date/description have {}/{}/{}/{} values",
				kind.plural(),
				lengths[0],
				lengths[1],
				lengths[2],
				lengths[3]
			);
		}
		Ok(lengths[0])
	}
}

/// Validated entries for one side of the ledger, in input order, with the
/// outcome recorded for every raw row.
#[derive(Clone, Debug)]
pub struct Side {
	kind: EntryKind,
	entries: Vec<LedgerEntry>,
	outcomes: Vec<RowOutcome>,
	total: Quant,
}

impl Side {
	fn fold(kind: EntryKind, columns: &RawColumns) -> Result<Self, Error> {
		let rows = columns.row_count(kind)?;

		let mut side = Self {
			kind,
			entries: Vec::with_capacity(rows),
			outcomes: Vec::with_capacity(rows),
			total: Quant::zero(),
		};

		for i in 0..rows {
			match LedgerEntry::from_raw(
				&columns.category[i],
				&columns.amount[i],
				&columns.date[i],
				&columns.desc[i],
			) {
				Ok(entry) => {
					side.total += entry.get_amount();
					side.entries.push(entry);
					side.outcomes.push(RowOutcome::Accepted);
				},
				Err(reason) => {
					debug!(kind = kind.plural(), row = i + 1, %reason, "dropping row");
					side.outcomes.push(RowOutcome::Dropped(reason));
				},
			}
		}

		Ok(side)
	}

	pub fn kind(&self) -> EntryKind {
		self.kind
	}

	pub fn entries(&self) -> &[LedgerEntry] {
		&self.entries
	}

	pub fn outcomes(&self) -> &[RowOutcome] {
		&self.outcomes
	}

	pub fn total(&self) -> Quant {
		self.total
	}

	pub fn dropped_count(&self) -> usize {
		self.outcomes
			.iter()
			.filter(|o| matches!(o, RowOutcome::Dropped(_)))
			.count()
	}
}

/// The validated income and expense entries of one report, created once per
/// request and discarded once the report is produced.
#[derive(Clone, Debug)]
pub struct Ledger {
	pub expenses: Side,
	pub incomes: Side,
}

impl Ledger {
	/// Folds both sides' raw columns into a ledger. Incomplete rows are dropped
	/// and recorded; columns of unequal length fail the whole request.
	pub fn aggregate(
		expenses: &RawColumns,
		incomes: &RawColumns,
	) -> Result<Self, Error> {
		let ledger = Self {
			expenses: Side::fold(EntryKind::Expense, expenses)?,
			incomes: Side::fold(EntryKind::Income, incomes)?,
		};

		debug!(
			expenses = ledger.expenses.entries.len(),
			incomes = ledger.incomes.entries.len(),
			dropped = ledger.expenses.dropped_count()
				+ ledger.incomes.dropped_count(),
			"ledger aggregated"
		);

		Ok(ledger)
	}

	pub fn total_expense(&self) -> Quant {
		self.expenses.total()
	}

	pub fn total_income(&self) -> Quant {
		self.incomes.total()
	}
}
