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

//! Renderer-independent page layout. A document is an ordered list of
//! blocks that get flowed onto fixed-size pages; each finished page is then
//! handed to a page decorator. Coordinates are points with the origin at the
//! top-left corner of the page and y growing downward.

use crate::reports::table::Table;
use crate::reports::theme::{self, Face, Rgb, INCH};
use anyhow::{bail, Error};
use std::ops::Range;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f32,
	pub y: f32,
	pub width: f32,
	pub height: f32,
}

impl Rect {
	pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Align {
	Left,
	Center,
	Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
	pub face: Face,
	pub size: f32,
	pub color: Rgb,
}

impl TextStyle {
	pub const fn new(face: Face, size: f32, color: Rgb) -> Self {
		Self { face, size, color }
	}

	pub fn leading(&self) -> f32 {
		self.size * 1.2
	}

	pub fn width(&self, text: &str) -> f32 {
		theme::text_width(text, self.face, self.size)
	}

	/// Baseline that vertically centers a line of this style in a box.
	pub fn baseline_in(&self, top: f32, height: f32) -> f32 {
		top + (height + self.size * 0.7) / 2.0
	}
}

/// Drawing surface a laid-out document is rendered onto.
pub trait Canvas {
	/// Starts page `number` (1-based); later calls draw onto it.
	fn begin_page(&mut self, number: usize);

	fn fill_rect(&mut self, rect: Rect, color: Rgb);

	fn stroke_rect(&mut self, rect: Rect, color: Rgb, width: f32);

	/// Draws `text` with its left edge at `x`.
	fn text(&mut self, text: &str, x: f32, baseline: f32, style: &TextStyle);

	/// Places the image file scaled into `rect`. Unreadable or undecodable
	/// images are an error.
	fn image(&mut self, path: &Path, rect: Rect) -> Result<(), Error>;
}

/// Draws `text` aligned within the horizontal span `left..left + width`.
pub fn aligned_text(
	canvas: &mut dyn Canvas,
	text: &str,
	style: &TextStyle,
	left: f32,
	width: f32,
	align: Align,
	baseline: f32,
) {
	let x = match align {
		Align::Left => left,
		Align::Center => left + (width - style.width(text)) / 2.0,
		Align::Right => left + width - style.width(text),
	};
	canvas.text(text, x, baseline, style);
}

/// Invoked once for every emitted page, after the page's content.
pub trait PageDecorator {
	fn decorate(
		&self,
		canvas: &mut dyn Canvas,
		geometry: &PageGeometry,
		page_number: usize,
	);
}

// --------------
// -- GEOMETRY --
// --------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
	pub width: f32,
	pub height: f32,
	pub margin_top: f32,
	pub margin_bottom: f32,
	pub margin_left: f32,
	pub margin_right: f32,
}

impl PageGeometry {
	/// A4 with a deeper bottom margin to leave room for the footer.
	pub fn a4() -> Self {
		Self {
			width: 595.2756,
			height: 841.8898,
			margin_top: 0.7 * INCH,
			margin_bottom: 0.9 * INCH,
			margin_left: 0.6 * INCH,
			margin_right: 0.6 * INCH,
		}
	}

	pub fn frame_width(&self) -> f32 {
		self.width - self.margin_left - self.margin_right
	}

	pub fn frame_bottom(&self) -> f32 {
		self.height - self.margin_bottom
	}

	pub fn frame_height(&self) -> f32 {
		self.frame_bottom() - self.margin_top
	}

	/// Left edge that horizontally centers content of `width` in the frame.
	pub fn centered_left(&self, width: f32) -> f32 {
		self.margin_left + (self.frame_width() - width) / 2.0
	}
}

// ------------
// -- BLOCKS --
// ------------

/// Differently styled runs, wrapped by word to the width they are drawn in,
/// with vertical spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
	pub runs: Vec<(String, TextStyle)>,
	pub space_before: f32,
	pub space_after: f32,
}

/// One wrapped line: pieces of runs in order, each with its run index.
type Line = Vec<(usize, String, TextStyle)>;

impl Paragraph {
	pub fn new(runs: Vec<(String, TextStyle)>) -> Self {
		Self {
			runs,
			space_before: 0.0,
			space_after: 0.0,
		}
	}

	pub fn spaced(mut self, before: f32, after: f32) -> Self {
		self.space_before = before;
		self.space_after = after;
		self
	}

	/// Breaks the runs into lines no wider than `width`. Breaks fall between
	/// words; a word wider than a whole line is split between characters.
	fn lines(&self, width: f32) -> Vec<Line> {
		let mut lines: Vec<Line> = vec![vec![]];
		let mut used = 0.0;

		for (index, (text, style)) in self.runs.iter().enumerate() {
			for word in split_words(text) {
				let blank = word.trim().is_empty();
				let word_width = style.width(word);
				let line_is_empty = lines.last().map_or(true, |l| l.is_empty());

				if blank && line_is_empty && lines.len() > 1 {
					continue;
				}
				if !blank && !line_is_empty && used + word_width > width {
					trim_trailing_space(lines.last_mut());
					lines.push(vec![]);
					used = 0.0;
				}

				if !blank && word_width > width {
					for c in word.chars() {
						let mut buf = [0u8; 4];
						let piece: &str = c.encode_utf8(&mut buf);
						let piece_width = style.width(piece);
						if used > 0.0 && used + piece_width > width {
							lines.push(vec![]);
							used = 0.0;
						}
						push_piece(lines.last_mut(), index, piece, *style);
						used += piece_width;
					}
					continue;
				}

				push_piece(lines.last_mut(), index, word, *style);
				used += word_width;
			}
		}

		trim_trailing_space(lines.last_mut());
		lines
	}

	fn line_height(line: &Line) -> f32 {
		line.iter().map(|(_, _, s)| s.leading()).fold(0.0, f32::max)
	}

	/// Height once wrapped to `width`.
	pub fn height(&self, width: f32) -> f32 {
		let lines: f32 = self.lines(width).iter().map(Self::line_height).sum();
		self.space_before + lines + self.space_after
	}

	fn draw(&self, canvas: &mut dyn Canvas, left: f32, top: f32, width: f32) {
		let mut line_top = top + self.space_before;

		for line in self.lines(width) {
			let line_height = Self::line_height(&line);
			let size = line.iter().map(|(_, _, s)| s.size).fold(0.0, f32::max);
			let baseline = line_top + (line_height + size * 0.7) / 2.0;

			let mut x = left;
			for (_, text, style) in &line {
				canvas.text(text, x, baseline, style);
				x += style.width(text);
			}
			line_top += line_height;
		}
	}
}

/// Alternating runs of whitespace and non-whitespace, covering all of `text`.
fn split_words(text: &str) -> Vec<&str> {
	let mut words = vec![];
	let mut start = 0;
	let mut in_space = None;

	for (i, c) in text.char_indices() {
		let space = c.is_whitespace();
		if in_space.is_some_and(|s| s != space) {
			words.push(&text[start..i]);
			start = i;
		}
		in_space = Some(space);
	}
	if start < text.len() {
		words.push(&text[start..]);
	}
	words
}

/// Appends to the last piece when it belongs to the same run.
fn push_piece(line: Option<&mut Line>, index: usize, text: &str, style: TextStyle) {
	let Some(line) = line else {
		return;
	};
	match line.last_mut() {
		Some((last, piece, _)) if *last == index => piece.push_str(text),
		_ => line.push((index, text.to_string(), style)),
	}
}

fn trim_trailing_space(line: Option<&mut Line>) {
	let Some(line) = line else {
		return;
	};
	while let Some((_, piece, _)) = line.last_mut() {
		let trimmed = piece.trim_end().len();
		if trimmed > 0 {
			piece.truncate(trimmed);
			break;
		}
		line.pop();
	}
}

/// Report header: an optional square logo beside a stack of text lines, on
/// a solid background.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderBlock {
	pub logo: Option<PathBuf>,
	pub lines: Vec<Paragraph>,
	pub background: Rgb,
}

impl HeaderBlock {
	pub const LOGO_SIZE: f32 = 0.8 * INCH;
	const LOGO_COLUMN: f32 = 1.0 * INCH;
	const WIDTH: f32 = 6.2 * INCH;
	const PAD_X: f32 = 4.0;
	const PAD_Y: f32 = 6.0;

	/// Room for the text lines, beside the logo when there is one.
	fn text_width(&self) -> f32 {
		let logo = if self.logo.is_some() {
			Self::LOGO_COLUMN
		} else {
			0.0
		};
		Self::WIDTH - logo - 2.0 * Self::PAD_X
	}

	fn text_height(&self) -> f32 {
		let width = self.text_width();
		self.lines.iter().map(|l| l.height(width)).sum()
	}

	pub fn height(&self) -> f32 {
		let logo = if self.logo.is_some() {
			Self::LOGO_SIZE
		} else {
			0.0
		};
		2.0 * Self::PAD_Y + self.text_height().max(logo)
	}

	fn draw(
		&self,
		canvas: &mut dyn Canvas,
		geometry: &PageGeometry,
		top: f32,
	) -> Result<(), Error> {
		let left = geometry.centered_left(Self::WIDTH);
		canvas.fill_rect(
			Rect::new(left, top, Self::WIDTH, self.height()),
			self.background,
		);

		let mut text_left = left + Self::PAD_X;
		if let Some(logo) = &self.logo {
			canvas.image(
				logo,
				Rect::new(
					text_left,
					top + Self::PAD_Y,
					Self::LOGO_SIZE,
					Self::LOGO_SIZE,
				),
			)?;
			text_left = left + Self::LOGO_COLUMN + Self::PAD_X;
		}

		let width = self.text_width();
		let mut y = top + Self::PAD_Y;
		for line in &self.lines {
			line.draw(canvas, text_left, y, width);
			y += line.height(width);
		}
		Ok(())
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetricCard {
	pub label: String,
	pub value: String,
	pub value_color: Rgb,
}

/// A row of equally styled cards, each a small label above a large value.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricStrip {
	pub cards: Vec<MetricCard>,
	pub widths: Vec<f32>,
	pub background: Rgb,
	pub border: Rgb,
	pub label_style: TextStyle,
	pub value_size: f32,
}

impl MetricStrip {
	const PAD_Y: f32 = 10.0;
	const LABEL_GAP: f32 = 2.0;

	fn value_style(&self, card: &MetricCard) -> TextStyle {
		TextStyle::new(Face::Bold, self.value_size, card.value_color)
	}

	pub fn width(&self) -> f32 {
		self.widths.iter().sum()
	}

	pub fn height(&self) -> f32 {
		2.0 * Self::PAD_Y
			+ self.label_style.leading()
			+ Self::LABEL_GAP
			+ self.value_size * 1.2
	}

	fn draw(&self, canvas: &mut dyn Canvas, geometry: &PageGeometry, top: f32) {
		let height = self.height();
		let mut left = geometry.centered_left(self.width());

		for (card, &width) in self.cards.iter().zip(&self.widths) {
			let cell = Rect::new(left, top, width, height);
			canvas.fill_rect(cell, self.background);
			canvas.stroke_rect(cell, self.border, 1.0);

			let label_top = top + Self::PAD_Y;
			let label_height = self.label_style.leading();
			aligned_text(
				canvas,
				&card.label,
				&self.label_style,
				left,
				width,
				Align::Center,
				self.label_style.baseline_in(label_top, label_height),
			);

			let value_style = self.value_style(card);
			let value_top = label_top + label_height + Self::LABEL_GAP;
			aligned_text(
				canvas,
				&card.value,
				&value_style,
				left,
				width,
				Align::Center,
				value_style.baseline_in(value_top, value_style.leading()),
			);

			left += width;
		}
	}
}

/// An image file shown at a fixed size, centered in the frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlock {
	pub path: PathBuf,
	pub width: f32,
	pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
	Header(HeaderBlock),
	Metrics(MetricStrip),
	Paragraph(Paragraph),
	Image(ImageBlock),
	Table(Table),
	Spacer(f32),
}

impl Block {
	fn height(&self, frame_width: f32) -> f32 {
		match self {
			Block::Header(b) => b.height(),
			Block::Metrics(b) => b.height(),
			Block::Paragraph(b) => b.height(frame_width),
			Block::Image(b) => b.height,
			Block::Table(b) => b.height_of(b.row_count()),
			Block::Spacer(h) => *h,
		}
	}

	fn draw(
		&self,
		canvas: &mut dyn Canvas,
		geometry: &PageGeometry,
		top: f32,
		rows: Option<Range<usize>>,
	) -> Result<(), Error> {
		match self {
			Block::Header(b) => b.draw(canvas, geometry, top)?,
			Block::Metrics(b) => b.draw(canvas, geometry, top),
			Block::Paragraph(b) => {
				b.draw(canvas, geometry.margin_left, top, geometry.frame_width())
			},
			Block::Image(b) => {
				let left = geometry.centered_left(b.width);
				canvas.image(&b.path, Rect::new(left, top, b.width, b.height))?;
			},
			Block::Table(b) => {
				let rows = rows.unwrap_or(0..b.row_count());
				b.draw(canvas, geometry.centered_left(b.width()), top, rows);
			},
			Block::Spacer(_) => {},
		}
		Ok(())
	}
}

// --------------
// -- DOCUMENT --
// --------------

/// Where one block (or, for tables, one run of its rows) lands on a page.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
	pub block: usize,
	pub top: f32,
	pub rows: Option<Range<usize>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PagePlan {
	pub number: usize,
	pub placements: Vec<Placement>,
}

impl PagePlan {
	fn new(number: usize) -> Self {
		Self {
			number,
			placements: vec![],
		}
	}
}

fn place(pages: &mut [PagePlan], placement: Placement) {
	if let Some(page) = pages.last_mut() {
		page.placements.push(placement);
	}
}

pub struct Document {
	pub geometry: PageGeometry,
	pub blocks: Vec<Block>,
}

impl Document {
	pub fn new(geometry: PageGeometry) -> Self {
		Self {
			geometry,
			blocks: vec![],
		}
	}

	pub fn push(&mut self, block: Block) {
		self.blocks.push(block);
	}

	/// Flows the blocks onto pages. Blocks that do not fit the remainder of a
	/// page move to the next one; tables break between rows and repeat their
	/// header. Content taller than a whole page is an error.
	pub fn paginate(&self) -> Result<Vec<PagePlan>, Error> {
		let geometry = &self.geometry;
		let frame_top = geometry.margin_top;
		let frame_bottom = geometry.frame_bottom();

		let mut pages = vec![PagePlan::new(1)];
		let mut cursor = frame_top;

		for (index, block) in self.blocks.iter().enumerate() {
			match block {
				Block::Spacer(height) => {
					cursor = (cursor + height).min(frame_bottom);
				},
				Block::Table(table) => {
					let total = table.row_count();
					let mut next_row = 0;
					loop {
						let fit = table.rows_fitting(frame_bottom - cursor);
						let remaining = total - next_row;

						if fit == 0 && remaining > 0 {
							if cursor <= frame_top {
								bail!(
									"Table row {} does not fit on a page",
									next_row + 1
								);
							}
							pages.push(PagePlan::new(pages.len() + 1));
							cursor = frame_top;
							continue;
						}

						let end = next_row + fit.min(remaining);
						place(&mut pages, Placement {
							block: index,
							top: cursor,
							rows: Some(next_row..end),
						});
						cursor += table.height_of(end - next_row);
						next_row = end;

						if next_row >= total {
							break;
						}
						pages.push(PagePlan::new(pages.len() + 1));
						cursor = frame_top;
					}
				},
				_ => {
					let height = block.height(geometry.frame_width());
					if height > geometry.frame_height() {
						bail!(
							"Block {} is taller than a page ({:.1}pt)",
							index + 1,
							height
						);
					}
					if cursor + height > frame_bottom {
						pages.push(PagePlan::new(pages.len() + 1));
						cursor = frame_top;
					}
					place(&mut pages, Placement {
						block: index,
						top: cursor,
						rows: None,
					});
					cursor += height;
				},
			}
		}

		Ok(pages)
	}

	/// Lays out and draws every page, decorating each one after its content.
	/// Returns the number of pages.
	pub fn render(
		&self,
		canvas: &mut dyn Canvas,
		decorator: &dyn PageDecorator,
	) -> Result<usize, Error> {
		let pages = self.paginate()?;

		for page in &pages {
			canvas.begin_page(page.number);
			for placement in &page.placements {
				self.blocks[placement.block].draw(
					canvas,
					&self.geometry,
					placement.top,
					placement.rows.clone(),
				)?;
			}
			decorator.decorate(canvas, &self.geometry, page.number);
		}

		Ok(pages.len())
	}
}

// ---------------
// -- DECORATOR --
// ---------------

/// Page number at the right, branding centered below it.
pub struct FooterDecorator {
	pub branding: String,
}

impl FooterDecorator {
	const STYLE: TextStyle = TextStyle::new(Face::Oblique, 9.0, theme::FOOTER_GREY);
	const NUMBER_RIGHT: f32 = 7.5 * INCH;
	const NUMBER_FROM_BOTTOM: f32 = 0.5 * INCH;
	const BRANDING_CENTER: f32 = 4.17 * INCH;
	const BRANDING_FROM_BOTTOM: f32 = 0.25 * INCH;
}

impl PageDecorator for FooterDecorator {
	fn decorate(
		&self,
		canvas: &mut dyn Canvas,
		geometry: &PageGeometry,
		page_number: usize,
	) {
		let style = Self::STYLE;

		let number = format!("Page {}", page_number);
		canvas.text(
			&number,
			Self::NUMBER_RIGHT - style.width(&number),
			geometry.height - Self::NUMBER_FROM_BOTTOM,
			&style,
		);

		canvas.text(
			&self.branding,
			Self::BRANDING_CENTER - style.width(&self.branding) / 2.0,
			geometry.height - Self::BRANDING_FROM_BOTTOM,
			&style,
		);
	}
}


#[cfg(test)]
mod tests {
	use super::testing::{Op, RecordingCanvas};
	use super::*;
	use crate::gl::entry::{EntryKind, LedgerEntry};

	fn body() -> TextStyle {
		TextStyle::new(Face::Regular, 11.0, theme::TEXT_MAIN)
	}

	fn entries(n: usize) -> Vec<LedgerEntry> {
		(0..n)
			.map(|i| {
				LedgerEntry::from_raw(&format!("Item {}", i), "10", "", "")
					.unwrap()
			})
			.collect()
	}

	#[test]
	fn test_geometry() {
		let g = PageGeometry::a4();
		assert!(g.margin_bottom > g.margin_top);
		assert!((g.frame_width() - (595.2756 - 86.4)).abs() < 1e-3);
		assert!((g.centered_left(g.frame_width()) - g.margin_left).abs() < 1e-3);
	}

	#[test]
	fn test_blocks_flow_in_order() {
		let mut doc = Document::new(PageGeometry::a4());
		doc.push(Block::Paragraph(Paragraph::new(vec![("a".into(), body())])));
		doc.push(Block::Spacer(10.0));
		doc.push(Block::Paragraph(Paragraph::new(vec![("b".into(), body())])));

		let pages = doc.paginate().unwrap();
		assert_eq!(pages.len(), 1);
		let tops: Vec<f32> = pages[0].placements.iter().map(|p| p.top).collect();
		assert_eq!(tops[0], doc.geometry.margin_top);
		assert!((tops[1] - (tops[0] + 13.2 + 10.0)).abs() < 1e-3);
	}

	#[test]
	fn test_paragraph_wraps_by_word() {
		let bold = TextStyle::new(Face::Bold, 11.0, theme::TEXT_MAIN);
		let paragraph = Paragraph::new(vec![
			("Note:".into(), bold),
			(" drip lines laid along the north field".into(), body()),
		]);

		let wide = paragraph.height(1000.0);
		assert!((wide - 13.2).abs() < 1e-3);

		let width = 100.0;
		let mut canvas = RecordingCanvas::default();
		canvas.begin_page(1);
		paragraph.draw(&mut canvas, 0.0, 0.0, width);

		let texts = canvas.texts(0);
		assert_eq!(texts[0], "Note:");
		assert!(texts.len() > 2);
		assert!(texts.iter().skip(1).all(|t| !t.starts_with(' ') || t == &texts[1]));
		assert_eq!(
			texts.join(" ").split_whitespace().collect::<Vec<_>>(),
			"Note: drip lines laid along the north field"
				.split_whitespace()
				.collect::<Vec<_>>()
		);

		let mut lines = 0;
		for op in &canvas.pages[0] {
			if let Op::Text { text, x, style, .. } = op {
				assert!(x + style.width(text) <= width + 1e-3, "{:?}", text);
				if *x == 0.0 {
					lines += 1;
				}
			}
		}
		assert!(lines > 1);
		assert!((paragraph.height(width) - lines as f32 * 13.2).abs() < 1e-3);
	}

	#[test]
	fn test_unbroken_word_is_split() {
		let paragraph = Paragraph::new(vec![("x".repeat(40), body())]);
		let mut canvas = RecordingCanvas::default();
		canvas.begin_page(1);
		paragraph.draw(&mut canvas, 0.0, 0.0, 50.0);

		let texts = canvas.texts(0);
		assert!(texts.len() > 1);
		assert_eq!(texts.concat(), "x".repeat(40));
		assert!(texts.iter().all(|t| body().width(t) <= 50.0));
	}

	#[test]
	fn test_block_moves_to_next_page() {
		let mut doc = Document::new(PageGeometry::a4());
		let frame = doc.geometry.frame_height();
		doc.push(Block::Spacer(frame - 5.0));
		doc.push(Block::Paragraph(Paragraph::new(vec![("x".into(), body())])));

		let pages = doc.paginate().unwrap();
		assert_eq!(pages.len(), 2);
		assert_eq!(pages[1].placements[0].top, doc.geometry.margin_top);
	}

	#[test]
	fn test_oversized_block_is_an_error() {
		let mut doc = Document::new(PageGeometry::a4());
		doc.push(Block::Image(ImageBlock {
			path: "chart.png".into(),
			width: 100.0,
			height: 2000.0,
		}));
		assert!(doc.paginate().is_err());
	}

	#[test]
	fn test_long_table_splits_between_rows() {
		let table = Table::for_entries(EntryKind::Expense, &entries(80));
		let mut doc = Document::new(PageGeometry::a4());
		doc.push(Block::Table(table.clone()));

		let pages = doc.paginate().unwrap();
		assert!(pages.len() >= 2);

		let mut covered = vec![];
		for page in &pages {
			for placement in &page.placements {
				let rows = placement.rows.clone().unwrap();
				assert!(!rows.is_empty());
				let bottom = placement.top + table.height_of(rows.len());
				assert!(bottom <= doc.geometry.frame_bottom() + 1e-3);
				covered.extend(rows);
			}
		}
		assert_eq!(covered, (0..80).collect::<Vec<_>>());
	}

	#[test]
	fn test_footer_on_every_page() {
		let mut doc = Document::new(PageGeometry::a4());
		doc.push(Block::Table(Table::for_entries(
			EntryKind::Income,
			&entries(120),
		)));

		let decorator = FooterDecorator {
			branding: "Farm books".into(),
		};
		let mut canvas = RecordingCanvas::default();
		let count = doc.render(&mut canvas, &decorator).unwrap();

		assert_eq!(count, canvas.pages.len());
		assert!(count >= 3);
		for page in 0..count {
			let texts = canvas.texts(page);
			let footer = &texts[texts.len() - 2..];
			assert_eq!(footer[0], format!("Page {}", page + 1));
			assert_eq!(footer[1], "Farm books");
		}
	}

	#[test]
	fn test_footer_positions() {
		let geometry = PageGeometry::a4();
		let decorator = FooterDecorator {
			branding: "Farm books".into(),
		};
		let mut canvas = RecordingCanvas::default();
		canvas.begin_page(1);
		decorator.decorate(&mut canvas, &geometry, 1);

		match &canvas.pages[0][0] {
			testing::Op::Text {
				x, baseline, style, ..
			} => {
				let right = x + style.width("Page 1");
				assert!((right - 540.0).abs() < 1e-3);
				assert!((baseline - (geometry.height - 36.0)).abs() < 1e-3);
				assert_eq!(style.face, Face::Oblique);
			},
			other => panic!("unexpected op {:?}", other),
		}
	}

	#[test]
	fn test_aligned_text() {
		let mut canvas = RecordingCanvas::default();
		canvas.begin_page(1);
		let style = body();
		aligned_text(&mut canvas, "abc", &style, 10.0, 100.0, Align::Right, 50.0);
		aligned_text(&mut canvas, "abc", &style, 10.0, 100.0, Align::Center, 50.0);

		let xs: Vec<f32> = canvas.pages[0]
			.iter()
			.map(|op| match op {
				testing::Op::Text { x, .. } => *x,
				_ => f32::NAN,
			})
			.collect();
		let width = style.width("abc");
		assert!((xs[0] - (110.0 - width)).abs() < 1e-3);
		assert!((xs[1] - (60.0 - width / 2.0)).abs() < 1e-3);
	}
}
