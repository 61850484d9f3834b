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
use crate::gl::entry::{EntryKind, LedgerEntry, PLACEHOLDER_GLYPH};
use crate::reports::layout::{aligned_text, Align, Canvas, Rect, TextStyle};
use crate::reports::theme::{self, fit_text, Face, Rgb, INCH};
use std::ops::Range;

pub const LEDGER_HEADERS: [&str; 4] = ["Category", "Amount", "Date", "Description"];
pub const LEDGER_WIDTHS: [f32; 4] = [1.5 * INCH, 1.2 * INCH, 1.3 * INCH, 1.2 * INCH];

/// Declarative look of a table: colors, per-column alignment and padding.
/// The table itself only holds text.
#[derive(Clone, Debug, PartialEq)]
pub struct TableStyle {
	pub header_color: Rgb,
	pub header_text: TextStyle,
	pub body_text: TextStyle,
	/// Alternating body row backgrounds, starting with the first row.
	pub row_band_colors: [Rgb; 2],
	pub grid_color: Rgb,
	pub alignments: Vec<Align>,
	pub padding_x: f32,
	pub padding_y: f32,
	pub header_padding_y: f32,
}

impl TableStyle {
	/// Style for a ledger table; only the header band differs by kind.
	pub fn for_kind(kind: EntryKind) -> Self {
		let header_color = match kind {
			EntryKind::Expense => theme::PRIMARY_GREEN,
			EntryKind::Income => theme::ACCENT_GREEN,
		};
		Self {
			header_color,
			header_text: TextStyle::new(Face::Bold, 9.0, theme::WHITESMOKE),
			body_text: TextStyle::new(Face::Regular, 9.0, theme::TEXT_MAIN),
			row_band_colors: [theme::DARK_BG, theme::DARKER_BG],
			grid_color: theme::BORDER_SUBTLE,
			alignments: vec![Align::Left, Align::Right, Align::Left, Align::Left],
			padding_x: 8.0,
			padding_y: 6.0,
			header_padding_y: 8.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
	pub title: String,
	pub width: f32,
}

/// A header row plus single-line data rows. Drawn onto a canvas for the
/// document, or printed as aligned plain text for the console.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
	columns: Vec<Column>,
	rows: Vec<Vec<String>>,
	style: TableStyle,
}

impl Table {
	pub fn new(columns: Vec<Column>, style: TableStyle) -> Self {
		Self {
			columns,
			rows: Vec::new(),
			style,
		}
	}

	/// Adds a data row.
	pub fn add_row(&mut self, row: Vec<&str>) {
		self.rows
			.push(row.into_iter().map(|s| s.to_string()).collect());
	}

	/// One row per entry, in order. An empty side gets a single placeholder
	/// row so the table never renders headerless or blank.
	pub fn for_entries(kind: EntryKind, entries: &[LedgerEntry]) -> Self {
		let columns = LEDGER_HEADERS
			.iter()
			.zip(LEDGER_WIDTHS)
			.map(|(title, width)| Column {
				title: title.to_string(),
				width,
			})
			.collect();
		let mut table = Self::new(columns, TableStyle::for_kind(kind));

		if entries.is_empty() {
			let placeholder = format!("No {} recorded", kind.plural());
			table.add_row(vec![
				&placeholder,
				PLACEHOLDER_GLYPH,
				PLACEHOLDER_GLYPH,
				PLACEHOLDER_GLYPH,
			]);
		}
		for entry in entries {
			let amount = entry.formatted_amount();
			table.add_row(vec![
				entry.get_category(),
				&amount,
				entry.get_date(),
				entry.get_desc(),
			]);
		}
		table
	}

	pub fn row_count(&self) -> usize {
		self.rows.len()
	}

	pub fn rows(&self) -> &[Vec<String>] {
		&self.rows
	}

	// --------------
	// -- GEOMETRY --
	// --------------

	pub fn width(&self) -> f32 {
		self.columns.iter().map(|c| c.width).sum()
	}

	pub fn header_height(&self) -> f32 {
		self.style.header_text.leading() + 2.0 * self.style.header_padding_y
	}

	pub fn row_height(&self) -> f32 {
		self.style.body_text.leading() + 2.0 * self.style.padding_y
	}

	/// Height of the header plus `rows` body rows.
	pub fn height_of(&self, rows: usize) -> f32 {
		self.header_height() + rows as f32 * self.row_height()
	}

	/// How many body rows fit under a header in `available` points. Zero when
	/// not even one row fits.
	pub fn rows_fitting(&self, available: f32) -> usize {
		let room = available - self.header_height();
		if room < self.row_height() {
			return 0;
		}
		(room / self.row_height()).floor() as usize
	}

	// -------------
	// -- DRAWING --
	// -------------

	/// Draws the header and the given body rows with the table's top-left
	/// corner at `(left, top)`. Row bands follow the absolute row index so a
	/// table split over pages keeps its striping.
	pub fn draw(
		&self,
		canvas: &mut dyn Canvas,
		left: f32,
		top: f32,
		rows: Range<usize>,
	) {
		let style = &self.style;
		let header_height = self.header_height();
		let header_cells: Vec<&str> =
			self.columns.iter().map(|c| c.title.as_str()).collect();

		canvas.fill_rect(
			Rect::new(left, top, self.width(), header_height),
			style.header_color,
		);
		self.draw_cells(
			canvas,
			&header_cells,
			left,
			top,
			header_height,
			&style.header_text,
			None,
		);

		let row_height = self.row_height();
		let mut y = top + header_height;
		for index in rows {
			let Some(row) = self.rows.get(index) else {
				break;
			};
			canvas.fill_rect(
				Rect::new(left, y, self.width(), row_height),
				style.row_band_colors[index % 2],
			);
			let cells: Vec<&str> = row.iter().map(|c| c.as_str()).collect();
			self.draw_cells(
				canvas,
				&cells,
				left,
				y,
				row_height,
				&style.body_text,
				Some(&style.alignments),
			);
			y += row_height;
		}
	}

	/// Text and grid for one row. `alignments` of `None` centers every cell.
	#[allow(clippy::too_many_arguments)]
	fn draw_cells(
		&self,
		canvas: &mut dyn Canvas,
		cells: &[&str],
		left: f32,
		top: f32,
		height: f32,
		text: &TextStyle,
		alignments: Option<&Vec<Align>>,
	) {
		let pad = self.style.padding_x;
		let baseline = text.baseline_in(top, height);

		let mut x = left;
		for (i, column) in self.columns.iter().enumerate() {
			let cell = Rect::new(x, top, column.width, height);
			let inner = column.width - 2.0 * pad;
			let value = cells.get(i).copied().unwrap_or("");
			let fitted = fit_text(value, text.face, text.size, inner);
			let align = alignments
				.and_then(|a| a.get(i).copied())
				.unwrap_or(Align::Center);

			aligned_text(canvas, &fitted, text, x + pad, inner, align, baseline);
			canvas.stroke_rect(cell, self.style.grid_color, 1.0);
			x += column.width;
		}
	}

	// -------------
	// -- CONSOLE --
	// -------------

	/// Plain-text rendering: centered header, a rule, then the data rows with
	/// right-aligned columns padded to the widest value.
	pub fn render_text(&self) -> String {
		let mut max_widths: Vec<usize> =
			self.columns.iter().map(|c| c.title.chars().count()).collect();
		for row in &self.rows {
			for (i, value) in row.iter().enumerate() {
				max_widths[i] = max_widths[i].max(value.chars().count());
			}
		}

		let mut lines = vec![];

		let header: Vec<String> = self
			.columns
			.iter()
			.enumerate()
			.map(|(i, c)| center_align(&c.title, max_widths[i]))
			.collect();
		lines.push(header.join(" | "));

		let total_width: usize =
			max_widths.iter().sum::<usize>() + 3 * (self.columns.len() - 1);
		lines.push("-".repeat(total_width));

		for row in &self.rows {
			let cells: Vec<String> = row
				.iter()
				.enumerate()
				.map(|(i, value)| {
					let pad = max_widths[i] - value.chars().count();
					match self.style.alignments.get(i) {
						Some(Align::Right) => format!("{}{}", " ".repeat(pad), value),
						_ => format!("{}{}", value, " ".repeat(pad)),
					}
				})
				.collect();
			lines.push(cells.join("   "));
		}

		lines
			.iter()
			.map(|l| l.trim_end().to_string())
			.collect::<Vec<_>>()
			.join("\n")
	}
}

fn center_align(value: &str, width: usize) -> String {
	let len = value.chars().count();
	if len >= width {
		return value.to_string();
	}
	let total_padding = width - len;
	let left_padding = total_padding / 2;
	let right_padding = total_padding - left_padding;

	format!(
		"{}{}{}",
		" ".repeat(left_padding),
		value,
		" ".repeat(right_padding)
	)
}
