//! PDF document builder
//!
//! Lays out a [`RenderedDocument`] on US Letter pages using the PDF builtin
//! Courier and Times faces. Text is wrapped on estimated glyph widths; the
//! viewer advances the pen with the real metrics while drawing.

use std::path::Path;

use printpdf::image_crate::{self, GenericImageView};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Pt, Rgb,
};
use tracing::{debug, warn};

use super::blocks::{Block, HeadingLevel};
use super::document::{Element, INCH, RenderedDocument};
use super::inline::{Span, spans};
use crate::types::{AppError, Result};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN_LEFT: f32 = 72.0;
const MARGIN_RIGHT: f32 = 72.0;
const MARGIN_TOP: f32 = 72.0;
const MARGIN_BOTTOM: f32 = 18.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

const BULLET: &str = "•";
const BULLET_INDENT: f32 = 18.0;
const SPACER_HEIGHT: f32 = 0.1 * INCH;
const IMAGE_GAP: f32 = 0.3 * INCH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Times,
    Courier,
}

impl Family {
    /// Average advance width as a fraction of the font size.
    fn em_ratio(self, bold: bool) -> f32 {
        match (self, bold) {
            (Family::Courier, _) => 0.6,
            (Family::Times, false) => 0.5,
            (Family::Times, true) => 0.54,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy)]
struct Style {
    family: Family,
    bold: bool,
    italic: bool,
    size: f32,
    leading: f32,
    color: u32,
    space_before: f32,
    space_after: f32,
    align: Align,
}

const TITLE: Style = Style {
    family: Family::Courier,
    bold: true,
    italic: false,
    size: 24.0,
    leading: 29.0,
    color: 0x817907,
    space_before: 0.0,
    space_after: 30.0,
    align: Align::Center,
};

const SUBTITLE: Style = Style {
    family: Family::Times,
    bold: false,
    italic: true,
    size: 12.0,
    leading: 15.0,
    color: 0x636e72,
    space_before: 0.0,
    space_after: 0.0,
    align: Align::Center,
};

const HEADING_1: Style = Style {
    family: Family::Courier,
    bold: true,
    italic: false,
    size: 18.0,
    leading: 22.0,
    color: 0x817907,
    space_before: 12.0,
    space_after: 12.0,
    align: Align::Left,
};

const HEADING_2: Style = Style {
    size: 14.0,
    leading: 18.0,
    color: 0x0D5503,
    space_before: 10.0,
    space_after: 10.0,
    ..HEADING_1
};

const ALERT: Style = Style {
    color: 0xc0392b,
    ..HEADING_2
};

const BODY: Style = Style {
    family: Family::Times,
    bold: false,
    italic: false,
    size: 11.0,
    leading: 16.0,
    color: 0x2d3436,
    space_before: 0.0,
    space_after: 8.0,
    align: Align::Left,
};

const LIST_ITEM: Style = Style {
    space_after: 4.0,
    ..BODY
};

const FOOTER: Style = Style {
    family: Family::Courier,
    bold: false,
    italic: false,
    size: 9.0,
    leading: 12.0,
    color: 0x636e72,
    space_before: 0.0,
    space_after: 0.0,
    align: Align::Center,
};

fn heading_style(level: HeadingLevel, alert: bool) -> Style {
    match (level, alert) {
        (_, true) => ALERT,
        (HeadingLevel::One, false) => HEADING_1,
        // Level three shares the level-two look
        (HeadingLevel::Two | HeadingLevel::Three, false) => HEADING_2,
    }
}

fn rgb(hex: u32) -> Color {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Color::Rgb(Rgb::new(channel(16), channel(8), channel(0), None))
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

/// Maps text onto what the builtin fonts can encode (WinAnsi).
pub fn sanitize(text: &str) -> String {
    const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            '―' | '‒' | '‐' | '‑' | '−' => '—',
            '′' => '\'',
            '″' => '"',
            '●' | '▪' | '◦' => '•',
            c if (' '..='~').contains(&c) || ('\u{A0}'..='\u{FF}').contains(&c) => c,
            c if WIN_ANSI_EXTRAS.contains(c) => c,
            _ => '?',
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    text: String,
    bold: bool,
    italic: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Line {
    runs: Vec<Run>,
    width: f32,
}

impl Line {
    fn push(&mut self, text: &str, bold: bool, italic: bool, width: f32) {
        match self.runs.last_mut() {
            Some(last) if last.bold == bold && last.italic == italic => last.text.push_str(text),
            _ => self.runs.push(Run {
                text: text.to_string(),
                bold,
                italic,
            }),
        }
        self.width += width;
    }

    fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

fn text_width(text: &str, style: &Style, bold: bool) -> f32 {
    text.chars().count() as f32 * style.size * style.family.em_ratio(bold)
}

/// Greedy word wrap over styled spans.
fn wrap(spans: &[Span], style: &Style, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();
    let mut pending_space: Option<(bool, bool)> = None;

    for span in spans {
        let bold = span.bold || style.bold;
        let italic = span.italic || style.italic;

        let mut rest = span.text.as_str();
        while !rest.is_empty() {
            let ws_len = rest.len() - rest.trim_start().len();
            if ws_len > 0 {
                if !line.is_empty() {
                    pending_space = Some((bold, italic));
                }
                rest = &rest[ws_len..];
                continue;
            }

            let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let mut word = &rest[..word_end];
            rest = &rest[word_end..];

            while !word.is_empty() {
                let space_width = pending_space.map_or(0.0, |_| text_width(" ", style, bold));
                let word_width = text_width(word, style, bold);

                if line.width + space_width + word_width <= max_width {
                    if let Some((sb, si)) = pending_space.take() {
                        line.push(" ", sb, si, space_width);
                    }
                    line.push(word, bold, italic, word_width);
                    break;
                }

                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    pending_space = None;
                    continue;
                }

                // Word alone is wider than the line; split it.
                let per_char = style.size * style.family.em_ratio(bold);
                let fit = ((max_width / per_char) as usize).max(1);
                let split = word
                    .char_indices()
                    .nth(fit)
                    .map_or(word.len(), |(idx, _)| idx);
                let (head, tail) = word.split_at(split);
                line.push(head, bold, italic, text_width(head, style, bold));
                lines.push(std::mem::take(&mut line));
                word = tail;
            }
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

struct Fonts {
    times: [IndirectFontRef; 4],
    courier: [IndirectFontRef; 4],
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self> {
        let add = |font: BuiltinFont| {
            let name = format!("{:?}", font);
            doc.add_builtin_font(font)
                .map_err(|e| AppError::Render(format!("font {}: {}", name, e)))
        };
        Ok(Self {
            times: [
                add(BuiltinFont::TimesRoman)?,
                add(BuiltinFont::TimesBold)?,
                add(BuiltinFont::TimesItalic)?,
                add(BuiltinFont::TimesBoldItalic)?,
            ],
            courier: [
                add(BuiltinFont::Courier)?,
                add(BuiltinFont::CourierBold)?,
                add(BuiltinFont::CourierOblique)?,
                add(BuiltinFont::CourierBoldOblique)?,
            ],
        })
    }

    fn get(&self, family: Family, bold: bool, italic: bool) -> &IndirectFontRef {
        let idx = usize::from(bold) + 2 * usize::from(italic);
        match family {
            Family::Times => &self.times[idx],
            Family::Courier => &self.courier[idx],
        }
    }
}

/// Writes elements top to bottom, starting new pages as needed.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        let fonts = Fonts::load(&doc)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            fonts,
            y: PAGE_HEIGHT - MARGIN_TOP,
            pages: 1,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN_TOP;
        self.pages += 1;
    }

    fn ensure(&mut self, height: f32) {
        if self.y - height < MARGIN_BOTTOM {
            self.new_page();
        }
    }

    fn gap(&mut self, height: f32) {
        if self.y - height < MARGIN_BOTTOM {
            self.new_page();
        } else {
            self.y -= height;
        }
    }

    fn draw_line(&mut self, line: &Line, style: &Style, x: f32) {
        self.ensure(style.leading);
        let baseline = self.y - style.size;

        self.layer.begin_text_section();
        self.layer.set_fill_color(rgb(style.color));
        self.layer.set_text_cursor(mm(x), mm(baseline));
        for run in &line.runs {
            let font = self.fonts.get(style.family, run.bold, run.italic);
            self.layer.set_font(font, style.size);
            self.layer.write_text(run.text.clone(), font);
        }
        self.layer.end_text_section();

        self.y -= style.leading;
    }

    fn paragraph(&mut self, spans: &[Span], style: &Style) {
        self.gap(style.space_before);
        for line in wrap(spans, style, CONTENT_WIDTH) {
            let x = match style.align {
                Align::Left => MARGIN_LEFT,
                Align::Center => MARGIN_LEFT + ((CONTENT_WIDTH - line.width) / 2.0).max(0.0),
            };
            self.draw_line(&line, style, x);
        }
        self.gap(style.space_after);
    }

    fn list_item(&mut self, text: &str, style: &Style) {
        let body = [plain(text)];
        let lines = wrap(&body, style, CONTENT_WIDTH - BULLET_INDENT);
        let mut bullet = Line::default();
        bullet.push(BULLET, false, false, 0.0);

        for (i, line) in lines.iter().enumerate() {
            self.ensure(style.leading);
            if i == 0 {
                // Drawn without advancing so the text lands on the same baseline.
                let y = self.y;
                self.draw_line(&bullet, style, MARGIN_LEFT + 4.0);
                self.y = y;
            }
            self.draw_line(line, style, MARGIN_LEFT + BULLET_INDENT);
        }
        self.gap(style.space_after);
    }

    fn image(&mut self, path: &Path, target_width: f32) {
        let img = match image_crate::open(path) {
            Ok(img) => img,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not load report image, skipping");
                return;
            }
        };
        let (px_w, px_h) = img.dimensions();
        if px_w == 0 || px_h == 0 {
            warn!(path = %path.display(), "Report image is empty, skipping");
            return;
        }

        let height = px_h as f32 * target_width / px_w as f32;
        self.ensure(height);
        let x = MARGIN_LEFT + (CONTENT_WIDTH - target_width) / 2.0;
        let bottom = self.y - height;

        Image::from_dynamic_image(&img).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(x)),
                translate_y: Some(mm(bottom)),
                dpi: Some(px_w as f32 * INCH / target_width),
                ..Default::default()
            },
        );
        self.y = bottom;
        self.gap(IMAGE_GAP);
    }

    fn finish(self) -> Result<Vec<u8>> {
        debug!(pages = self.pages, "Serializing PDF");
        self.doc
            .save_to_bytes()
            .map_err(|e| AppError::Render(e.to_string()))
    }
}

fn plain(text: &str) -> Span {
    Span {
        text: text.to_string(),
        bold: false,
        italic: false,
    }
}

/// Builds PDF bytes for `doc`.
pub fn build(doc: &RenderedDocument) -> Result<Vec<u8>> {
    let mut writer = PageWriter::new(&sanitize(&doc.theme.title))?;

    for element in doc.elements() {
        match element {
            Element::Image(path) => writer.image(path, doc.theme.image_width),
            Element::Title(text) => writer.paragraph(&[plain(&sanitize(text))], &TITLE),
            Element::Subtitle(text) => writer.paragraph(&[plain(&sanitize(text))], &SUBTITLE),
            Element::Gap(height) => writer.gap(height),
            Element::Block(block) => match block {
                Block::Heading { level, text, alert } => {
                    writer.paragraph(&spans(&sanitize(text)), &heading_style(*level, *alert))
                }
                Block::Emphasis(text) => writer.paragraph(&spans(&sanitize(text)), &BODY),
                Block::ListItem(text) => writer.list_item(&sanitize(text), &LIST_ITEM),
                Block::Paragraph(text) => writer.paragraph(&[plain(&sanitize(text))], &BODY),
                Block::Spacer => writer.gap(SPACER_HEIGHT),
            },
            Element::FooterRule(text) | Element::Attribution(text) => {
                writer.paragraph(&[plain(&sanitize(text))], &FOOTER)
            }
        }
    }

    writer.finish()
}
