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

use std::borrow::Cow;

/// 8-bit sRGB color, shared by the chart and the document renderer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
	pub const fn hex(value: u32) -> Self {
		Self(
			((value >> 16) & 0xff) as u8,
			((value >> 8) & 0xff) as u8,
			(value & 0xff) as u8,
		)
	}

	/// Channels scaled to 0.0..=1.0, as PDF color operators expect.
	pub fn unit(&self) -> (f32, f32, f32) {
		(
			self.0 as f32 / 255.0,
			self.1 as f32 / 255.0,
			self.2 as f32 / 255.0,
		)
	}
}

// -------------
// -- PALETTE --
// -------------

pub const PRIMARY_GREEN: Rgb = Rgb::hex(0x16a34a);
pub const ACCENT_GREEN: Rgb = Rgb::hex(0x22c55e);
pub const EXPENSE_RED: Rgb = Rgb::hex(0xef4444);
pub const DARK_BG: Rgb = Rgb::hex(0x0f172a);
pub const DARKER_BG: Rgb = Rgb::hex(0x0a0f1a);
pub const CARD_BG: Rgb = Rgb::hex(0x1e293b);
pub const TEXT_MAIN: Rgb = Rgb::hex(0xe5e7eb);
pub const TEXT_MUTED: Rgb = Rgb::hex(0x9ca3af);
pub const BORDER_SUBTLE: Rgb = Rgb::hex(0x334155);
pub const FOOTER_GREY: Rgb = Rgb::hex(0x6b7280);
pub const WHITESMOKE: Rgb = Rgb::hex(0xf5f5f5);

/// Points per inch; all layout dimensions are in points.
pub const INCH: f32 = 72.0;

/// Built-in PDF faces used by the document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Face {
	Regular,
	Bold,
	Oblique,
}

/// Text as the built-in PDF fonts can show it. Those fonts are written with
/// WinAnsiEncoding, so Latin-1 letters, dashes and bullets pass through. The
/// currency symbol is spelled out and anything else is dropped.
pub fn builtin_text(text: &str) -> Cow<'_, str> {
	if text.chars().all(|c| win_ansi_widths(c).is_some()) {
		return Cow::Borrowed(text);
	}

	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'₹' => out.push_str("Rs."),
			'\u{a0}' => out.push(' '),
			c if win_ansi_widths(c).is_some() => out.push(c),
			_ => {},
		}
	}
	Cow::Owned(out)
}

/// Advance width of `text` in points once converted for the built-in fonts,
/// from the standard Helvetica metrics (per-mille of the font size).
/// Oblique shares the regular widths.
pub fn text_width(text: &str, face: Face, size: f32) -> f32 {
	let units: u32 = builtin_text(text)
		.chars()
		.filter_map(win_ansi_widths)
		.map(|(regular, bold)| match face {
			Face::Bold => bold as u32,
			Face::Regular | Face::Oblique => regular as u32,
		})
		.sum();
	units as f32 * size / 1000.0
}

/// Regular and bold Helvetica widths of a character, or `None` if
/// WinAnsiEncoding has no code for it.
fn win_ansi_widths(c: char) -> Option<(u16, u16)> {
	match c as u32 {
		code @ 32..=126 => {
			let i = (code - 32) as usize;
			Some((HELVETICA_WIDTHS[i], HELVETICA_BOLD_WIDTHS[i]))
		},
		// no-break space and soft hyphen have no code of their own
		0xa0 | 0xad => None,
		code @ 0xa1..=0xff => {
			let i = (code - 0xa0) as usize;
			Some((HELVETICA_LATIN1_WIDTHS[i], HELVETICA_BOLD_LATIN1_WIDTHS[i]))
		},
		_ => WIN_ANSI_EXTRAS
			.iter()
			.find(|(extra, ..)| *extra == c)
			.map(|&(_, regular, bold)| (regular, bold)),
	}
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
	278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
	556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
	1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
	667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
	333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
	556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
	278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
	556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
	975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
	667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
	333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
	611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// U+00A0 through U+00FF.
#[rustfmt::skip]
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
	278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
	400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
	667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
	722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
	556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
	556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
	278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
	400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
	722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
	722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
	556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
	611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// WinAnsiEncoding's 0x80..=0x9F block: character, regular and bold width.
#[rustfmt::skip]
const WIN_ANSI_EXTRAS: [(char, u16, u16); 27] = [
	('€', 556, 556), ('‚', 222, 278), ('ƒ', 556, 556), ('„', 333, 500),
	('…', 1000, 1000), ('†', 556, 556), ('‡', 556, 556), ('ˆ', 333, 333),
	('‰', 1000, 1000), ('Š', 667, 667), ('‹', 333, 333), ('Œ', 1000, 1000),
	('Ž', 611, 611), ('‘', 222, 278), ('’', 222, 278), ('“', 333, 500),
	('”', 333, 500), ('•', 350, 350), ('–', 556, 556), ('—', 1000, 1000),
	('˜', 333, 333), ('™', 1000, 1000), ('š', 500, 556), ('›', 333, 333),
	('œ', 944, 944), ('ž', 500, 500), ('Ÿ', 667, 667),
];

/// Cuts `text` down with a trailing `...` until it fits `max_width`.
pub fn fit_text(text: &str, face: Face, size: f32, max_width: f32) -> String {
	if text_width(text, face, size) <= max_width {
		return text.to_string();
	}

	let mut chars: Vec<char> = text.chars().collect();
	while !chars.is_empty() {
		chars.pop();
		let candidate: String = chars.iter().collect::<String>() + "...";
		if text_width(&candidate, face, size) <= max_width {
			return candidate;
		}
	}
	String::new()
}
