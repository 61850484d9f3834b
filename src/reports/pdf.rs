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
use crate::reports::layout::{Canvas, PageGeometry, Rect, TextStyle};
use crate::reports::theme::{builtin_text, Face, Rgb, INCH};
use anyhow::{anyhow, Error};
use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::path::PaintMode;
use printpdf::{
	BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
	PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Pt,
};
use std::path::Path;

/// Resolution images are embedded at before scaling to their box.
const IMAGE_DPI: f32 = 300.0;

struct Fonts {
	regular: IndirectFontRef,
	bold: IndirectFontRef,
	oblique: IndirectFontRef,
}

impl Fonts {
	fn get(&self, face: Face) -> &IndirectFontRef {
		match face {
			Face::Regular => &self.regular,
			Face::Bold => &self.bold,
			Face::Oblique => &self.oblique,
		}
	}
}

/// [`Canvas`] backed by a printpdf document using the built-in Helvetica
/// faces. Layout coordinates (top-left origin) are flipped to PDF space.
pub struct PdfCanvas {
	doc: PdfDocumentReference,
	fonts: Fonts,
	first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
	layer: Option<PdfLayerReference>,
	width: f32,
	height: f32,
}

fn mm(points: f32) -> Mm {
	Mm::from(Pt(points))
}

fn pdf_color(color: Rgb) -> Color {
	let (r, g, b) = color.unit();
	Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

impl PdfCanvas {
	pub fn new(title: &str, geometry: &PageGeometry) -> Result<Self, Error> {
		let (doc, page, layer) = PdfDocument::new(
			builtin_text(title),
			mm(geometry.width),
			mm(geometry.height),
			"Page 1",
		);

		let font = |f: BuiltinFont| {
			doc.add_builtin_font(f)
				.map_err(|e| anyhow!("failed to load PDF font: {}", e))
		};
		let fonts = Fonts {
			regular: font(BuiltinFont::Helvetica)?,
			bold: font(BuiltinFont::HelveticaBold)?,
			oblique: font(BuiltinFont::HelveticaOblique)?,
		};

		Ok(Self {
			doc,
			fonts,
			first_page: Some((page, layer)),
			layer: None,
			width: geometry.width,
			height: geometry.height,
		})
	}

	/// Serializes the finished document.
	pub fn finish(self) -> Result<Vec<u8>, Error> {
		self.doc
			.save_to_bytes()
			.map_err(|e| anyhow!("failed to serialize PDF: {}", e))
	}

	/// PDF y coordinate of a top-down layout y.
	fn flip(&self, y: f32) -> f32 {
		self.height - y
	}

	fn pdf_rect(&self, rect: Rect, mode: PaintMode) -> printpdf::Rect {
		printpdf::Rect::new(
			mm(rect.x),
			mm(self.flip(rect.y + rect.height)),
			mm(rect.x + rect.width),
			mm(self.flip(rect.y)),
		)
		.with_mode(mode)
	}
}

impl Canvas for PdfCanvas {
	fn begin_page(&mut self, number: usize) {
		let (page, layer) = match self.first_page.take() {
			Some(first) => first,
			None => self.doc.add_page(
				mm(self.width),
				mm(self.height),
				format!("Page {}", number),
			),
		};
		self.layer = Some(self.doc.get_page(page).get_layer(layer));
	}

	fn fill_rect(&mut self, rect: Rect, color: Rgb) {
		let Some(layer) = &self.layer else {
			return;
		};
		layer.set_fill_color(pdf_color(color));
		layer.add_rect(self.pdf_rect(rect, PaintMode::Fill));
	}

	fn stroke_rect(&mut self, rect: Rect, color: Rgb, width: f32) {
		let Some(layer) = &self.layer else {
			return;
		};
		layer.set_outline_color(pdf_color(color));
		layer.set_outline_thickness(width);
		layer.add_rect(self.pdf_rect(rect, PaintMode::Stroke));
	}

	fn text(&mut self, text: &str, x: f32, baseline: f32, style: &TextStyle) {
		let Some(layer) = &self.layer else {
			return;
		};
		let text = builtin_text(text);
		if text.is_empty() {
			return;
		}
		layer.set_fill_color(pdf_color(style.color));
		layer.use_text(
			text,
			style.size,
			mm(x),
			mm(self.flip(baseline)),
			self.fonts.get(style.face),
		);
	}

	fn image(&mut self, path: &Path, rect: Rect) -> Result<(), Error> {
		let Some(layer) = &self.layer else {
			return Ok(());
		};

		let decoded = image_crate::open(path)
			.map_err(|e| anyhow!("failed to load image {}: {}", path.display(), e))?;
		let (px_width, px_height) = decoded.dimensions();
		if px_width == 0 || px_height == 0 {
			return Err(anyhow!("image {} is empty", path.display()));
		}
		let flattened = DynamicImage::ImageRgb8(decoded.to_rgb8());

		let native = |px: u32| px as f32 * INCH / IMAGE_DPI;
		Image::from_dynamic_image(&flattened).add_to_layer(
			layer.clone(),
			ImageTransform {
				translate_x: Some(mm(rect.x)),
				translate_y: Some(mm(self.flip(rect.y + rect.height))),
				scale_x: Some(rect.width / native(px_width)),
				scale_y: Some(rect.height / native(px_height)),
				dpi: Some(IMAGE_DPI),
				..Default::default()
			},
		);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reports::layout::{Block, Document, FooterDecorator, Paragraph};
	use crate::reports::theme;

	fn document(lines: usize) -> Document {
		let style = TextStyle::new(Face::Regular, 11.0, theme::TEXT_MAIN);
		let mut doc = Document::new(PageGeometry::a4());
		for i in 0..lines {
			doc.push(Block::Paragraph(Paragraph::new(vec![(
				format!("Line {} • ₹ {}", i, i * 100),
				style,
			)])));
		}
		doc
	}

	fn render(doc: &Document) -> Vec<u8> {
		let mut canvas = PdfCanvas::new("Wheat", &doc.geometry).unwrap();
		let footer = FooterDecorator {
			branding: "Farm books".into(),
		};
		doc.render(&mut canvas, &footer).unwrap();
		canvas.finish().unwrap()
	}

	#[test]
	fn test_single_page_document() {
		let bytes = render(&document(3));
		assert!(bytes.starts_with(b"%PDF"));
	}

	#[test]
	fn test_multi_page_document() {
		let doc = document(120);
		assert!(doc.paginate().unwrap().len() > 1);
		let bytes = render(&doc);
		assert!(bytes.starts_with(b"%PDF"));
	}

	#[test]
	fn test_embeds_png() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("logo.png");
		image_crate::RgbImage::from_pixel(4, 4, image_crate::Rgb([34, 197, 94]))
			.save(&path)
			.unwrap();

		let geometry = PageGeometry::a4();
		let mut canvas = PdfCanvas::new("Logo", &geometry).unwrap();
		canvas.begin_page(1);
		canvas
			.image(&path, Rect::new(50.0, 50.0, 57.6, 57.6))
			.unwrap();
		assert!(canvas.finish().unwrap().starts_with(b"%PDF"));
	}

	#[test]
	fn test_unreadable_image_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.png");
		std::fs::write(&path, b"not a png").unwrap();

		let mut canvas = PdfCanvas::new("Broken", &PageGeometry::a4()).unwrap();
		canvas.begin_page(1);
		assert!(canvas.image(&path, Rect::new(0.0, 0.0, 10.0, 10.0)).is_err());
	}
}
