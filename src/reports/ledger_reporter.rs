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
use crate::gl::entry::RowOutcome;
use crate::gl::ledger::Side;
use crate::reports::pipeline::Report;
use crate::reports::table::Table;
use crate::util::money::Money;

/// Console views of a report, for checking a request before producing the
/// document.
pub struct LedgerReporter {
	report: Report,
}

impl LedgerReporter {
	pub fn new(report: Report) -> Self {
		Self { report }
	}

	/// Header facts, the four metrics, then both itemized tables.
	pub fn summary_text(&self) -> String {
		let context = &self.report.context;
		let metrics = &self.report.metrics;

		let mut lines = vec![
			format!(
				"{} | Farmer: {} | Season: {} | Area: {} acres",
				context.crop_name,
				context.farmer_name,
				context.season,
				context.area_display()
			),
			String::new(),
		];

		for (label, value) in [
			("Total Income:", metrics.total_income),
			("Total Expense:", metrics.total_expense),
			("Profit/Loss:", metrics.profit),
			("Cost per Acre:", metrics.cost_per_area),
		] {
			lines.push(format!("{:<15}{}", label, Money::new(value)));
		}

		for (title, side) in [
			("Expenses Breakdown", &self.report.ledger.expenses),
			("Income Breakdown", &self.report.ledger.incomes),
		] {
			lines.push(String::new());
			lines.push(title.to_string());
			lines.push(Table::for_entries(side.kind(), side.entries()).render_text());
		}

		lines.join("\n")
	}

	/// Every dropped row with its reason, then accepted/dropped counts per
	/// side. Row numbers are 1-based positions in the submitted columns.
	pub fn check_text(&self) -> String {
		let ledger = &self.report.ledger;
		let mut lines = vec![];

		for side in [&ledger.expenses, &ledger.incomes] {
			for (i, outcome) in side.outcomes().iter().enumerate() {
				if let RowOutcome::Dropped(reason) = outcome {
					lines.push(format!(
						"{} row {}: dropped ({})",
						side.kind().plural(),
						i + 1,
						reason
					));
				}
			}
		}

		for side in [&ledger.expenses, &ledger.incomes] {
			lines.push(counts(side));
		}

		lines.join("\n")
	}

	pub fn summary(&self) {
		println!("{}", self.summary_text());
	}

	pub fn check(&self) {
		println!("{}", self.check_text());
	}
}

fn counts(side: &Side) -> String {
	format!(
		"{}: {} accepted, {} dropped",
		side.kind().plural(),
		side.entries().len(),
		side.dropped_count()
	)
}
