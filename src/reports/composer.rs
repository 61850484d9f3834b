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
use crate::gl::entry::EntryKind;
use crate::gl::ledger::{Ledger, Side};
use crate::gl::metrics::ReportMetrics;
use crate::parsing::request::ReportContext;
use crate::reports::layout::{
	Block, Document, HeaderBlock, ImageBlock, MetricCard, MetricStrip,
	PageGeometry, Paragraph, TextStyle,
};
use crate::reports::table::Table;
use crate::reports::theme::{self, Face, Rgb, INCH};
use crate::util::clock::header_timestamp;
use crate::util::money::Money;
use std::path::Path;
use tracing::info;

pub const CHART_BOX: (f32, f32) = (5.5 * INCH, 2.75 * INCH);

fn style(face: Face, size: f32, color: Rgb) -> TextStyle {
	TextStyle::new(face, size, color)
}

fn run(text: impl Into<String>, style: TextStyle) -> (String, TextStyle) {
	(text.into(), style)
}

/// Lays out the whole report: header, metric cards, cost line, chart and
/// the two itemized tables, always in that order. The logo is included only
/// if the file exists.
pub fn compose(
	context: &ReportContext,
	ledger: &Ledger,
	metrics: &ReportMetrics,
	chart: &Path,
	logo: Option<&Path>,
) -> Document {
	let mut doc = Document::new(PageGeometry::a4());

	doc.push(Block::Header(header(context, logo)));
	doc.push(Block::Spacer(0.2 * INCH));

	doc.push(Block::Metrics(metric_strip(metrics)));
	doc.push(Block::Spacer(0.25 * INCH));

	let main = style(Face::Regular, 11.0, theme::TEXT_MAIN);
	doc.push(Block::Paragraph(Paragraph::new(vec![
		run("Cost per Acre:", style(Face::Bold, 11.0, theme::TEXT_MAIN)),
		run(format!(" {}", Money::new(metrics.cost_per_area)), main),
	])));
	doc.push(Block::Spacer(0.15 * INCH));

	doc.push(section("Income vs Expense Overview"));
	doc.push(Block::Image(ImageBlock {
		path: chart.to_path_buf(),
		width: CHART_BOX.0,
		height: CHART_BOX.1,
	}));
	doc.push(Block::Spacer(0.2 * INCH));

	push_side(&mut doc, &ledger.expenses);
	doc.push(Block::Spacer(0.25 * INCH));
	push_side(&mut doc, &ledger.incomes);

	doc
}

fn section(title: &str) -> Block {
	Block::Paragraph(
		Paragraph::new(vec![run(
			title,
			style(Face::Bold, 14.0, theme::ACCENT_GREEN),
		)])
		.spaced(12.0, 10.0),
	)
}

fn push_side(doc: &mut Document, side: &Side) {
	let title = match side.kind() {
		EntryKind::Expense => "Expenses Breakdown",
		EntryKind::Income => "Income Breakdown",
	};
	doc.push(section(title));
	doc.push(Block::Table(Table::for_entries(side.kind(), side.entries())));
}

fn header(context: &ReportContext, logo: Option<&Path>) -> HeaderBlock {
	let label = style(Face::Bold, 10.0, theme::TEXT_MUTED);
	let value = style(Face::Regular, 10.0, theme::TEXT_MUTED);

	let lines = vec![
		Paragraph::new(vec![run(
			&context.crop_name,
			style(Face::Bold, 18.0, theme::ACCENT_GREEN),
		)])
		.spaced(0.0, 4.0),
		Paragraph::new(vec![
			run("Farmer:", label),
			run(format!(" {}", context.farmer_name), value),
		]),
		Paragraph::new(vec![
			run("Season:", label),
			run(format!(" {} • ", context.season), value),
			run("Area:", label),
			run(format!(" {} acres", context.area_display()), value),
		]),
		Paragraph::new(vec![
			run("Generated:", label),
			run(format!(" {}", header_timestamp(&context.generated_at)), value),
		]),
	];

	let logo = match logo {
		Some(path) if path.is_file() => Some(path.to_path_buf()),
		Some(path) => {
			info!(path = %path.display(), "logo not found, header drawn without it");
			None
		},
		None => None,
	};

	HeaderBlock {
		logo,
		lines,
		background: theme::DARK_BG,
	}
}

fn metric_strip(metrics: &ReportMetrics) -> MetricStrip {
	let profit_color = if metrics.is_profitable() {
		theme::PRIMARY_GREEN
	} else {
		theme::EXPENSE_RED
	};
	let card = |label: &str, value, value_color| MetricCard {
		label: label.to_string(),
		value: Money::new(value).to_string(),
		value_color,
	};

	MetricStrip {
		cards: vec![
			card("Total Income", metrics.total_income, theme::ACCENT_GREEN),
			card("Total Expense", metrics.total_expense, theme::EXPENSE_RED),
			card("Profit/Loss", metrics.profit, profit_color),
		],
		widths: vec![2.0 * INCH, 2.0 * INCH, 2.2 * INCH],
		background: theme::CARD_BG,
		border: theme::BORDER_SUBTLE,
		label_style: style(Face::Bold, 9.0, theme::TEXT_MUTED),
		value_size: 16.0,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gl::ledger::tests::columns;
	use crate::reports::layout::testing::{Op, RecordingCanvas};
	use crate::reports::layout::FooterDecorator;
	use crate::util::quant::Quant;
	use chrono::NaiveDate;

	fn context(area: &str) -> ReportContext {
		ReportContext {
			farmer_name: "Asha".into(),
			crop_name: "Wheat".into(),
			season: "Rabi".into(),
			area: Quant::from_str(area).unwrap(),
			generated_at: NaiveDate::from_ymd_opt(2024, 6, 5)
				.unwrap()
				.and_hms_opt(9, 5, 0)
				.unwrap(),
		}
	}

	fn render(doc: &Document) -> RecordingCanvas {
		let mut canvas = RecordingCanvas::default();
		let footer = FooterDecorator {
			branding: "Farm books".into(),
		};
		doc.render(&mut canvas, &footer).unwrap();
		canvas
	}

	fn build(
		expenses: &[(&str, &str, &str, &str)],
		incomes: &[(&str, &str, &str, &str)],
		area: &str,
	) -> Document {
		let ledger = Ledger::aggregate(&columns(expenses), &columns(incomes)).unwrap();
		let context = context(area);
		let metrics = ReportMetrics::from_ledger(&ledger, context.area);
		compose(&context, &ledger, &metrics, Path::new("chart.png"), None)
	}

	#[test]
	fn test_block_order() {
		let doc = build(&[], &[], "1");
		let kinds: Vec<&str> = doc
			.blocks
			.iter()
			.map(|b| match b {
				Block::Header(_) => "header",
				Block::Metrics(_) => "metrics",
				Block::Paragraph(_) => "paragraph",
				Block::Image(_) => "image",
				Block::Table(_) => "table",
				Block::Spacer(_) => "spacer",
			})
			.collect();
		assert_eq!(
			kinds,
			vec![
				"header", "spacer", "metrics", "spacer", "paragraph", "spacer",
				"paragraph", "image", "spacer", "paragraph", "table", "spacer",
				"paragraph", "table",
			]
		);
	}

	#[test]
	fn test_profitable_season() {
		let doc = build(
			&[("Seeds", "1000.00", "2024-01-01", "")],
			&[("Sale", "1500.00", "2024-06-01", "")],
			"2",
		);
		let canvas = render(&doc);
		let texts = canvas.all_texts();

		assert!(texts.contains(&"Wheat".to_string()));
		assert!(texts.contains(&" 2.0 acres".to_string()));
		assert!(texts.contains(&" 05 Jun, 2024 at 09:05".to_string()));
		assert!(texts.contains(&" ₹ 500.00".to_string()));
		assert!(texts.contains(&"Seeds".to_string()));
		assert!(texts.contains(&"Sale".to_string()));

		let (_, profit) = canvas.find_text("₹ 500.00").unwrap();
		assert_eq!(profit.color, theme::PRIMARY_GREEN);
		let (_, income) = canvas.find_text("₹ 1,500.00").unwrap();
		assert_eq!(income.color, theme::ACCENT_GREEN);
	}

	#[test]
	fn test_loss_is_red() {
		let doc = build(&[("Seeds", "900", "", "")], &[("Sale", "100", "", "")], "3");
		let canvas = render(&doc);
		let (_, profit) = canvas.find_text("₹ -800.00").unwrap();
		assert_eq!(profit.color, theme::EXPENSE_RED);
	}

	#[test]
	fn test_empty_season_uses_placeholders() {
		let doc = build(&[], &[], "0");
		let canvas = render(&doc);
		let texts = canvas.all_texts();

		assert!(texts.contains(&"No expenses recorded".to_string()));
		assert!(texts.contains(&"No income recorded".to_string()));
		assert!(texts.contains(&" ₹ 0.00".to_string()));
		assert_eq!(canvas.pages.len(), 1);
	}

	#[test]
	fn test_dropped_rows_are_absent() {
		let doc = build(
			&[("", "50", "", ""), ("Fuel", "abc", "", ""), ("Seeds", "10", "", "")],
			&[],
			"1",
		);
		let texts = render(&doc).all_texts();
		assert!(!texts.contains(&"Fuel".to_string()));
		assert!(texts.contains(&"Seeds".to_string()));
	}

	#[test]
	fn test_missing_logo_is_skipped() {
		let ledger = Ledger::aggregate(&columns(&[]), &columns(&[])).unwrap();
		let metrics = ReportMetrics::from_ledger(&ledger, Quant::zero());
		let doc = compose(
			&context("1"),
			&ledger,
			&metrics,
			Path::new("chart.png"),
			Some(Path::new("/nonexistent/logo.png")),
		);
		match &doc.blocks[0] {
			Block::Header(header) => assert!(header.logo.is_none()),
			other => panic!("unexpected first block {:?}", other),
		}
	}

	#[test]
	fn test_existing_logo_is_placed() {
		let dir = tempfile::tempdir().unwrap();
		let logo = dir.path().join("logo.png");
		std::fs::write(&logo, b"png").unwrap();

		let ledger = Ledger::aggregate(&columns(&[]), &columns(&[])).unwrap();
		let metrics = ReportMetrics::from_ledger(&ledger, Quant::zero());
		let doc = compose(&context("1"), &ledger, &metrics, Path::new("c.png"), Some(&logo));

		let canvas = render(&doc);
		let images: Vec<_> = canvas.pages[0]
			.iter()
			.filter(|op| matches!(op, crate::reports::layout::testing::Op::Image(..)))
			.collect();
		assert_eq!(images.len(), 2);
	}

	#[test]
	fn test_long_names_wrap_inside_header() {
		let dir = tempfile::tempdir().unwrap();
		let logo = dir.path().join("logo.png");
		std::fs::write(&logo, b"png").unwrap();

		let context = ReportContext {
			crop_name: "Basmati Paddy (Pusa 1121, transplanted, organic certified plot)"
				.into(),
			farmer_name: "Venkata Subramanya Lakshminarasimha Chidambaram Iyer".into(),
			..context("1")
		};
		let ledger = Ledger::aggregate(&columns(&[]), &columns(&[])).unwrap();
		let metrics = ReportMetrics::from_ledger(&ledger, context.area);

		for logo in [None, Some(logo.as_path())] {
			let doc = compose(&context, &ledger, &metrics, Path::new("c.png"), logo);
			let canvas = render(&doc);

			let Some(Op::Fill(header, _)) = canvas.pages[0]
				.iter()
				.find(|op| matches!(op, Op::Fill(..)))
			else {
				panic!("header background not drawn");
			};
			assert!(header.x + header.width <= doc.geometry.width);

			let mut title_lines = 0;
			for op in &canvas.pages[0] {
				let Op::Text { text, x, baseline, style } = op else {
					continue;
				};
				if *baseline > header.y + header.height {
					break;
				}
				assert!(*x >= header.x, "{:?} starts left of the header", text);
				assert!(
					x + style.width(text) <= header.x + header.width + 1e-3,
					"{:?} runs past the header",
					text
				);
				if style.size == 18.0 {
					title_lines += 1;
				}
			}
			assert!(title_lines > 1, "title was not wrapped");
		}
	}

	#[test]
	fn test_long_ledger_spans_pages() {
		let rows: Vec<(String, String)> = (0..60)
			.map(|i| (format!("Item {}", i), format!("{}.50", i)))
			.collect();
		let raw: Vec<(&str, &str, &str, &str)> = rows
			.iter()
			.map(|(c, a)| (c.as_str(), a.as_str(), "", ""))
			.collect();
		let doc = build(&raw, &raw, "2");

		let canvas = render(&doc);
		assert!(canvas.pages.len() >= 3);

		let headers = canvas
			.all_texts()
			.iter()
			.filter(|t| t.as_str() == "Category")
			.count();
		assert!(headers > 2, "header repeated on continuation pages");

		let items = canvas.all_texts();
		for (category, _) in &rows {
			assert_eq!(items.iter().filter(|t| *t == category).count(), 2);
		}
	}
}
