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
use crate::gl::ledger::Ledger;
use crate::util::quant::Quant;

/// Summary figures derived from a ledger's totals. Never stored; recomputed
/// whenever a report is built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReportMetrics {
	pub total_income: Quant,
	pub total_expense: Quant,
	pub profit: Quant,
	pub cost_per_area: Quant,
}

impl ReportMetrics {
	/// A non-positive area is degenerate but valid: cost per area is zero.
	pub fn compute(total_income: Quant, total_expense: Quant, area: Quant) -> Self {
		let cost_per_area = if area.is_positive() {
			total_expense / area
		} else {
			Quant::zero()
		};

		Self {
			total_income,
			total_expense,
			profit: total_income - total_expense,
			cost_per_area,
		}
	}

	pub fn from_ledger(ledger: &Ledger, area: Quant) -> Self {
		Self::compute(ledger.total_income(), ledger.total_expense(), area)
	}

	pub fn is_profitable(&self) -> bool {
		!self.profit.is_negative()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn q(s: &str) -> Quant {
		Quant::from_str(s).unwrap()
	}

	#[test]
	fn test_profit_and_cost_per_area() {
		let metrics = ReportMetrics::compute(q("1500"), q("1000"), q("2"));
		assert_eq!(metrics.profit, 500);
		assert_eq!(metrics.cost_per_area, 500);
		assert!(metrics.is_profitable());
	}

	#[test]
	fn test_loss_is_signed() {
		let metrics = ReportMetrics::compute(q("200.25"), q("1000"), q("4"));
		assert_eq!(metrics.profit, q("-799.75"));
		assert_eq!(metrics.cost_per_area, 250);
		assert!(!metrics.is_profitable());
	}

	#[test]
	fn test_break_even_counts_as_profitable() {
		let metrics = ReportMetrics::compute(q("10"), q("10"), q("1"));
		assert!(metrics.profit.is_zero());
		assert!(metrics.is_profitable());
	}

	#[test]
	fn test_non_positive_area_gives_zero_cost() {
		for area in ["0", "-3.5"] {
			let metrics = ReportMetrics::compute(q("0"), q("900"), q(area));
			assert!(metrics.cost_per_area.is_zero());
			assert_eq!(metrics.profit, -900);
		}
	}

	#[test]
	fn test_largest_expense_over_smallest_area() {
		let metrics = ReportMetrics::compute(
			q("0"),
			q("999999999999999.999999999999"),
			q("0.000000000007"),
		);
		assert_eq!(
			metrics.cost_per_area.to_grouped_string(2),
			"142,857,142,857,142,857,142,857,142.71"
		);
		assert!(!metrics.is_profitable());
	}

	#[test]
	fn test_fractional_area() {
		let metrics = ReportMetrics::compute(q("0"), q("1000"), q("0.75"));
		assert_eq!(metrics.cost_per_area.to_grouped_string(2), "1,333.33");
	}
}
