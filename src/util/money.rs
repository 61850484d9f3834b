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
use crate::util::quant::Quant;
use std::fmt;

/// Reports are always in a single currency.
pub const CURRENCY_SYMBOL: &str = "₹";

/// A quant value in the report currency.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Money {
	pub value: Quant,
}

impl Money {
	pub fn new(value: Quant) -> Self {
		Self { value }
	}

	/// Compact label without decimals, as drawn above chart bars: `₹1,500`.
	pub fn whole_label(&self) -> String {
		format!("{}{}", CURRENCY_SYMBOL, self.value.to_grouped_string(0))
	}
}

impl fmt::Display for Money {
	/// `₹ 1,000.00`
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {:.2}", CURRENCY_SYMBOL, self.value)
	}
}
