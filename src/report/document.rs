use std::path::PathBuf;

use super::blocks::Block;

/// Points per inch.
pub const INCH: f32 = 72.0;

/// Fixed text surrounding the report body.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTheme {
    pub title: String,
    pub subtitle: String,
    pub footer_rule: String,
    pub attribution: String,
    /// Width the leading image is scaled to, in points.
    pub image_width: f32,
}

impl Default for DocumentTheme {
    fn default() -> Self {
        Self {
            title: "FINANCIAL INVESTIGATION REPORT".to_string(),
            subtitle: "Detective Agent - Ed D.".to_string(),
            footer_rule: "―".repeat(50),
            attribution: "Generated by Detective Agent - Ed D. | Financial Investigation Services"
                .to_string(),
            image_width: 2.5 * INCH,
        }
    }
}

/// One drawable item, in page order.
#[derive(Debug, Clone, PartialEq)]
pub enum Element<'a> {
    Image(&'a PathBuf),
    Title(&'a str),
    Subtitle(&'a str),
    /// Vertical gap in points.
    Gap(f32),
    Block(&'a Block),
    FooterRule(&'a str),
    Attribution(&'a str),
}

/// Classified report ready for the document builder.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub image: Option<PathBuf>,
    pub blocks: Vec<Block>,
    pub theme: DocumentTheme,
}

impl RenderedDocument {
    pub fn new(blocks: Vec<Block>, image: Option<PathBuf>, theme: DocumentTheme) -> Self {
        Self {
            image,
            blocks,
            theme,
        }
    }

    /// Image, title, subtitle, gap, blocks, gap, footer.
    pub fn elements(&self) -> Vec<Element<'_>> {
        let mut out = Vec::with_capacity(self.blocks.len() + 7);
        if let Some(image) = &self.image {
            out.push(Element::Image(image));
        }
        out.push(Element::Title(&self.theme.title));
        out.push(Element::Subtitle(&self.theme.subtitle));
        out.push(Element::Gap(0.5 * INCH));
        out.extend(self.blocks.iter().map(Element::Block));
        out.push(Element::Gap(0.5 * INCH));
        out.push(Element::FooterRule(&self.theme.footer_rule));
        out.push(Element::Attribution(&self.theme.attribution));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::blocks::HeadingLevel;

    #[test]
    fn test_elements_without_image() {
        let blocks = vec![Block::heading(HeadingLevel::One, "Tesla"), Block::Spacer];
        let doc = RenderedDocument::new(blocks.clone(), None, DocumentTheme::default());

        let elements = doc.elements();
        assert_eq!(elements.len(), 8);
        assert_eq!(elements[0], Element::Title("FINANCIAL INVESTIGATION REPORT"));
        assert_eq!(elements[1], Element::Subtitle("Detective Agent - Ed D."));
        assert_eq!(elements[3], Element::Block(&blocks[0]));
        assert_eq!(elements[4], Element::Block(&blocks[1]));
        assert!(matches!(elements[6], Element::FooterRule(_)));
        assert!(matches!(elements[7], Element::Attribution(_)));
    }

    #[test]
    fn test_image_leads() {
        let doc = RenderedDocument::new(
            vec![],
            Some(PathBuf::from("detective.png")),
            DocumentTheme::default(),
        );

        assert!(matches!(doc.elements()[0], Element::Image(_)));
        assert_eq!(doc.elements().len(), 7);
    }
}
