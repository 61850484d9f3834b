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
use anyhow::{bail, Error};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Neg, Sub};

/// Exact decimal quantity backed by a reduced fraction of u128s. Every amount
/// typed into a ledger row is a terminating decimal, so sums and differences
/// stay exact; only division (cost per unit of area) can produce a repeating
/// fraction, and that is only ever rounded for display.
#[derive(Clone, Copy, Debug)]
pub struct Quant {
	numerator: u128,
	denominator: u128,

	/// Is always false if the numerator is zero.
	is_negative: bool,
}

/// Most fractional digits accepted from text. Keeps the denominator far from
/// overflow no matter how many rows get summed.
const MAX_INPUT_PLACES: usize = 12;

/// Most integer digits accepted from text, ignoring leading zeros. Together
/// with [`MAX_INPUT_PLACES`] this keeps sums of any realistic number of rows,
/// their quotient by an area, and the scaling done for display inside u128.
const MAX_INPUT_WHOLE_DIGITS: usize = 15;

/// Cap for rendering fractions that never terminate.
const MAX_PLAIN_PLACES: u32 = 10;

impl Quant {
	pub fn zero() -> Self {
		Self {
			numerator: 0,
			denominator: 1,
			is_negative: false,
		}
	}

	pub fn from_i128(amount: i128) -> Self {
		Self {
			numerator: amount.unsigned_abs(),
			denominator: 1,
			is_negative: amount < 0,
		}
	}

	pub fn from_frac(numerator: i128, denominator: i128) -> Self {
		if denominator == 0 {
			panic!("Denominator cannot be zero");
		}

		let mut out = Self {
			numerator: numerator.unsigned_abs(),
			denominator: denominator.unsigned_abs(),
			is_negative: (numerator < 0) ^ (denominator < 0),
		};
		out.reduce();
		out
	}

	/// Parses plain decimal text such as `1500`, `-2.75`, `+.5` or `12.`,
	/// ignoring surrounding whitespace. Exponents, grouping separators and
	/// special values like `nan` are rejected.
	pub fn from_str(input: &str) -> Result<Self, Error> {
		let trimmed = input.trim();
		let (is_negative, unsigned) = match trimmed.as_bytes().first() {
			Some(b'-') => (true, &trimmed[1..]),
			Some(b'+') => (false, &trimmed[1..]),
			_ => (false, trimmed),
		};

		let (whole, fraction) = match unsigned.split_once('.') {
			Some((w, f)) => (w, f),
			None => (unsigned, ""),
		};

		if whole.is_empty() && fraction.is_empty() {
			bail!("Not a number: {:?}", input);
		}
		if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
		{
			bail!("Not a number: {:?}", input);
		}
		if whole.trim_start_matches('0').len() > MAX_INPUT_WHOLE_DIGITS {
			bail!(
				"Number out of range (max {} integer digits): {:?}",
				MAX_INPUT_WHOLE_DIGITS,
				input
			);
		}
		if fraction.len() > MAX_INPUT_PLACES {
			bail!(
				"Too many decimal places (max {}): {:?}",
				MAX_INPUT_PLACES,
				input
			);
		}

		let scale = 10u128.pow(fraction.len() as u32);
		let whole_value = if whole.is_empty() {
			0
		} else {
			whole.parse::<u128>()?
		};
		let fraction_value = if fraction.is_empty() {
			0
		} else {
			fraction.parse::<u128>()?
		};

		let numerator = match whole_value
			.checked_mul(scale)
			.and_then(|n| n.checked_add(fraction_value))
		{
			Some(n) => n,
			None => bail!("Number out of range: {:?}", input),
		};

		let mut out = Self {
			numerator,
			denominator: scale,
			is_negative: is_negative && numerator > 0,
		};
		out.reduce();
		Ok(out)
	}

	pub fn is_zero(&self) -> bool {
		self.numerator == 0
	}

	pub fn is_negative(&self) -> bool {
		self.is_negative
	}

	pub fn is_positive(&self) -> bool {
		!self.is_negative && self.numerator > 0
	}

	/// Lossy conversion for plotting.
	pub fn to_f64(&self) -> f64 {
		let value = self.numerator as f64 / self.denominator as f64;
		if self.is_negative {
			-value
		} else {
			value
		}
	}

	/// Returns a copy rounded to the given number of decimal places using
	/// banker's rounding (nearest, ties to even).
	pub fn rounded(&self, decimal_places: u32) -> Self {
		let (units, scale) = self.scaled_units(decimal_places);
		let mut out = Self {
			numerator: units,
			denominator: scale,
			is_negative: self.is_negative && units > 0,
		};
		out.reduce();
		out
	}

	/// Renders with exactly `decimal_places` digits after the point and a
	/// comma between every group of three integer digits.
	pub fn to_grouped_string(&self, decimal_places: u32) -> String {
		let (units, scale) = self.scaled_units(decimal_places);
		let integer_part = units / scale;
		let fraction_part = units % scale;

		let mut int_str = integer_part.to_string();
		let mut i = int_str.len() as isize - 3;
		while i > 0 {
			int_str.insert(i as usize, ',');
			i -= 3;
		}

		let body = if decimal_places == 0 {
			int_str
		} else {
			format!(
				"{}.{:0>width$}",
				int_str,
				fraction_part,
				width = decimal_places as usize
			)
		};

		if self.is_negative && units > 0 {
			format!("-{}", body)
		} else {
			body
		}
	}

	/// Shortest exact decimal rendering, always with at least one digit after
	/// the point and no grouping: `2` renders as `2.0`, `2.50` as `2.5`.
	pub fn to_plain_string(&self) -> String {
		let mut numerator = self.numerator % self.denominator;
		let mut digits = String::new();
		while numerator != 0 && digits.len() < MAX_PLAIN_PLACES as usize {
			numerator *= 10;
			let digit = numerator / self.denominator;
			numerator %= self.denominator;
			digits.push(std::char::from_digit(digit as u32, 10).unwrap_or('0'));
		}

		if numerator != 0 {
			// non-terminating; fall back to rounding at the cap
			let rounded = self.rounded(MAX_PLAIN_PLACES);
			let mut out = rounded.to_grouped_string(MAX_PLAIN_PLACES).replace(',', "");
			while out.ends_with('0') && !out.ends_with(".0") {
				out.pop();
			}
			return out;
		}

		if digits.is_empty() {
			digits.push('0');
		}

		let sign = if self.is_negative { "-" } else { "" };
		format!("{}{}.{}", sign, self.numerator / self.denominator, digits)
	}

	/// The magnitude multiplied by 10^places and rounded to an integer, plus
	/// the scale that was applied.
	fn scaled_units(&self, decimal_places: u32) -> (u128, u128) {
		let scale = 10u128.pow(decimal_places);
		let scaled = self.numerator * scale;
		let quotient = scaled / self.denominator;
		let remainder = scaled % self.denominator;

		let twice = remainder * 2;
		let units = match twice.cmp(&self.denominator) {
			Ordering::Greater => quotient + 1,
			Ordering::Equal if quotient % 2 != 0 => quotient + 1,
			_ => quotient,
		};
		(units, scale)
	}

	fn reduce(&mut self) {
		let gcd = Self::gcd(self.numerator, self.denominator);
		if gcd > 1 {
			self.numerator /= gcd;
			self.denominator /= gcd;
		}
		if self.numerator == 0 {
			self.denominator = 1;
			self.is_negative = false;
		}
	}

	/// Euclid's algorithm
	fn gcd(mut a: u128, mut b: u128) -> u128 {
		while b != 0 {
			let temp = b;
			b = a % b;
			a = temp;
		}
		a
	}
}

impl Default for Quant {
	fn default() -> Self {
		Self::zero()
	}
}

impl fmt::Display for Quant {
	/// Grouped rendering; precision defaults to two places.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let places = f.precision().unwrap_or(2) as u32;
		write!(f, "{}", self.to_grouped_string(places))
	}
}

// -----------------
// -- BOILERPLATE --
// -----------------

impl Add for Quant {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		if self.numerator == 0 {
			return rhs;
		}
		if rhs.numerator == 0 {
			return self;
		}

		let gcd = Self::gcd(self.denominator, rhs.denominator);
		let lcm = self.denominator / gcd * rhs.denominator;

		let term_a = self.numerator * (lcm / self.denominator);
		let term_b = rhs.numerator * (lcm / rhs.denominator);

		let (numerator, is_negative) = if self.is_negative == rhs.is_negative {
			(term_a + term_b, self.is_negative)
		} else if term_a >= term_b {
			(term_a - term_b, self.is_negative)
		} else {
			(term_b - term_a, rhs.is_negative)
		};

		let mut out = Self {
			numerator,
			denominator: lcm,
			is_negative,
		};
		out.reduce();
		out
	}
}

impl AddAssign for Quant {
	fn add_assign(&mut self, rhs: Self) {
		*self = *self + rhs;
	}
}

impl Sum for Quant {
	fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
		iter.fold(Quant::zero(), |acc, quant| acc + quant)
	}
}

impl Sub for Quant {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		self + (-rhs)
	}
}

impl Div for Quant {
	type Output = Self;

	fn div(self, rhs: Self) -> Self::Output {
		if rhs.numerator == 0 {
			panic!("Attempt to divide by zero");
		}

		// cross-reduce first to limit overflow
		let gcd_num = Self::gcd(self.numerator, rhs.numerator);
		let gcd_den = Self::gcd(self.denominator, rhs.denominator);

		let mut out = Self {
			numerator: (self.numerator / gcd_num.max(1))
				* (rhs.denominator / gcd_den),
			denominator: (self.denominator / gcd_den)
				* (rhs.numerator / gcd_num.max(1)),
			is_negative: self.is_negative ^ rhs.is_negative,
		};
		out.reduce();
		out
	}
}

impl Neg for Quant {
	type Output = Self;

	fn neg(self) -> Self::Output {
		Self {
			is_negative: self.numerator > 0 && !self.is_negative,
			..self
		}
	}
}

impl PartialEq for Quant {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl PartialEq<i128> for Quant {
	fn eq(&self, other: &i128) -> bool {
		*self == Quant::from_i128(*other)
	}
}

impl Eq for Quant {}

impl PartialOrd for Quant {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialOrd<i128> for Quant {
	fn partial_cmp(&self, other: &i128) -> Option<Ordering> {
		Some(self.cmp(&Quant::from_i128(*other)))
	}
}

impl Ord for Quant {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self.is_negative, other.is_negative) {
			(true, false) => return Ordering::Less,
			(false, true) => return Ordering::Greater,
			_ => {},
		};

		let gcd = Self::gcd(self.denominator, other.denominator);
		let lcm = self.denominator / gcd * other.denominator;

		let left = self.numerator * (lcm / self.denominator);
		let right = other.numerator * (lcm / other.denominator);

		if self.is_negative {
			right.cmp(&left)
		} else {
			left.cmp(&right)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	mod from_str {
		use super::*;

		#[test]
		fn test_integer() {
			let quant = Quant::from_str("1500").unwrap();
			assert_eq!(quant, 1500);
		}

		#[test]
		fn test_decimal_is_reduced() {
			let quant = Quant::from_str("123.456").unwrap();
			assert_eq!(quant.numerator, 15432);
			assert_eq!(quant.denominator, 125);
			assert!(!quant.is_negative);
		}

		#[test]
		fn test_surrounding_whitespace() {
			assert_eq!(Quant::from_str("  42.50 ").unwrap(), Quant::from_frac(85, 2));
		}

		#[test]
		fn test_signs() {
			assert!(Quant::from_str("-3.5").unwrap().is_negative());
			assert_eq!(Quant::from_str("+3.5").unwrap(), Quant::from_frac(7, 2));
		}

		#[test]
		fn test_negative_zero_is_not_negative() {
			let quant = Quant::from_str("-0.00").unwrap();
			assert!(quant.is_zero());
			assert!(!quant.is_negative());
		}

		#[test]
		fn test_bare_fraction_and_trailing_point() {
			assert_eq!(Quant::from_str(".5").unwrap(), Quant::from_frac(1, 2));
			assert_eq!(Quant::from_str("12.").unwrap(), 12);
		}

		#[test]
		fn test_rejects_non_numbers() {
			for input in
				["", " ", "abc", "1,000", "1e3", "nan", "inf", "1.2.3", "-", "."]
			{
				assert!(
					Quant::from_str(input).is_err(),
					"expected {:?} to be rejected",
					input
				);
			}
		}

		#[test]
		fn test_rejects_excess_precision() {
			assert!(Quant::from_str("0.0000000000001").is_err());
			assert!(Quant::from_str("0.000000000001").is_ok());
		}

		#[test]
		fn test_rejects_excess_magnitude() {
			assert!(Quant::from_str("340282366920938463463374607431768211455").is_err());
			assert!(Quant::from_str("1000000000000000").is_err());
			assert!(Quant::from_str("999999999999999.999999999999").is_ok());
			assert_eq!(Quant::from_str("000000000000000000042").unwrap(), 42);
		}
	}

	mod rendering {
		use super::*;

		#[test]
		fn test_grouped_two_places() {
			let quant = Quant::from_str("1234567.5").unwrap();
			assert_eq!(quant.to_grouped_string(2), "1,234,567.50");
			assert_eq!(format!("{}", quant), "1,234,567.50");
		}

		#[test]
		fn test_grouped_zero_places_uses_bankers_rounding() {
			assert_eq!(Quant::from_str("2.5").unwrap().to_grouped_string(0), "2");
			assert_eq!(Quant::from_str("3.5").unwrap().to_grouped_string(0), "4");
			assert_eq!(
				Quant::from_str("1499.51").unwrap().to_grouped_string(0),
				"1,500"
			);
		}

		#[test]
		fn test_grouped_negative() {
			let quant = Quant::from_str("-1000").unwrap();
			assert_eq!(format!("{:.2}", quant), "-1,000.00");
		}

		#[test]
		fn test_grouped_rounds_to_zero_without_sign() {
			let quant = Quant::from_str("-0.001").unwrap();
			assert_eq!(quant.to_grouped_string(2), "0.00");
		}

		#[test]
		fn test_repeating_fraction_rounds() {
			let quant = Quant::from_i128(1000) / Quant::from_i128(3);
			assert_eq!(quant.to_grouped_string(2), "333.33");
		}

		#[test]
		fn test_plain_string() {
			assert_eq!(Quant::from_str("2").unwrap().to_plain_string(), "2.0");
			assert_eq!(Quant::from_str("2.50").unwrap().to_plain_string(), "2.5");
			assert_eq!(Quant::from_str("-0.75").unwrap().to_plain_string(), "-0.75");
			assert_eq!(Quant::zero().to_plain_string(), "0.0");
			assert_eq!(
				Quant::from_str("10000").unwrap().to_plain_string(),
				"10000.0"
			);
		}

		#[test]
		fn test_plain_string_non_terminating() {
			let quant = Quant::from_frac(2, 3);
			assert_eq!(quant.to_plain_string(), "0.6666666667");
		}
	}

	mod arithmetic {
		use super::*;

		#[test]
		fn test_largest_inputs_stay_in_range() {
			let largest = Quant::from_str("999999999999999.999999999999").unwrap();
			let smallest = Quant::from_str("0.000000000001").unwrap();

			let total: Quant = std::iter::repeat(largest).take(1000).sum();
			assert_eq!(
				total.to_grouped_string(2),
				"1,000,000,000,000,000,000.00"
			);

			let per_unit = total / smallest;
			assert_eq!(
				per_unit.to_grouped_string(2),
				"999,999,999,999,999,999,999,999,999,000.00"
			);
			assert!((total - largest).is_positive());
		}

		#[test]
		fn test_add_and_sub() {
			let a = Quant::from_str("1500.00").unwrap();
			let b = Quant::from_str("1000.25").unwrap();
			assert_eq!(a - b, Quant::from_str("499.75").unwrap());
			assert_eq!(b - a, Quant::from_str("-499.75").unwrap());
			assert_eq!(a + b, Quant::from_str("2500.25").unwrap());
		}

		#[test]
		fn test_sum() {
			let total: Quant = ["0.1", "0.2", "0.3"]
				.iter()
				.map(|s| Quant::from_str(s).unwrap())
				.sum();
			assert_eq!(total, Quant::from_str("0.6").unwrap());
		}

		#[test]
		fn test_div() {
			let quant = Quant::from_i128(1000) / Quant::from_str("2.0").unwrap();
			assert_eq!(quant, 500);
			let negative = Quant::from_i128(-9) / Quant::from_i128(3);
			assert_eq!(negative, -3);
		}

		#[test]
		#[should_panic(expected = "divide by zero")]
		fn test_div_by_zero() {
			let _ = Quant::from_i128(1) / Quant::zero();
		}

		#[test]
		fn test_ordering() {
			let small = Quant::from_str("-2").unwrap();
			let big = Quant::from_str("1.5").unwrap();
			assert!(small < big);
			assert!(Quant::from_str("-3").unwrap() < small);
			assert_eq!(small.max(big), big);
			assert!(Quant::zero() == Quant::from_str("-0").unwrap());
		}

		#[test]
		fn test_to_f64() {
			assert_eq!(Quant::from_str("-12.5").unwrap().to_f64(), -12.5);
		}
	}
}
