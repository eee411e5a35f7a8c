//! Deterministic label layout
//!
//! Lays out one label's text content onto the fixed 58x40 mm canvas as a
//! list of backend-neutral drawing instructions, then renders those through
//! the TSPL builder. The flow is strictly top-down: optional logo on the
//! left, product name (one or two lines), start date, expiry date, lot line
//! at the bottom with a font that steps down as the lot text grows.

use crate::tspl::{DOTS_PER_MM, LABEL_HEIGHT_MM, LABEL_WIDTH_MM, LogoBitmap, TsplBuilder};

/// Longest product-name line, in characters
pub const MAX_NAME_CHARS: usize = 16;

/// Logo block edge length in millimeters
const LOGO_SIZE_MM: u32 = 18;
/// Logo x position (left margin + 1 mm)
const LOGO_X_MM: u32 = 3;
/// Logo y position, vertically centered
const LOGO_Y_MM: u32 = (LABEL_HEIGHT_MM - LOGO_SIZE_MM) / 2;

/// Text start x when the logo is present / absent
const TEXT_X_LOGO_MM: u32 = 22;
const TEXT_X_PLAIN_MM: u32 = 4;

/// First text baseline from the top edge
const TOP_MM: u32 = 5;

/// Built-in TSPL bitmap fonts, largest to smallest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFont {
    /// 24x32 dots - single-line product name
    Large,
    /// 16x24 dots - wrapped product name, short lot line
    Medium,
    /// 12x20 dots - date lines, mid-length lot line
    Body,
    /// 8x12 dots - longest lot lines
    Small,
}

impl LabelFont {
    /// TSPL font name for the TEXT command
    pub fn tspl_name(&self) -> &'static str {
        match self {
            Self::Large => "4",
            Self::Medium => "3",
            Self::Body => "2",
            Self::Small => "1",
        }
    }
}

/// One drawing instruction, coordinates in dots from the top-left corner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelOp {
    Text {
        x: u32,
        y: u32,
        font: LabelFont,
        text: String,
    },
    Logo {
        x: u32,
        y: u32,
    },
}

/// Text content of one label
#[derive(Debug, Clone)]
pub struct LabelContent {
    pub name: String,
    /// Day-first display date
    pub start_date: String,
    /// Day-first display date or "N/D"
    pub expiry_date: String,
    pub lot: String,
}

impl LabelContent {
    pub fn new(
        name: impl Into<String>,
        start_date: impl Into<String>,
        expiry_date: impl Into<String>,
        lot: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            start_date: start_date.into(),
            expiry_date: expiry_date.into(),
            lot: lot.into(),
        }
    }
}

/// Wrap a product name into at most two lines of [`MAX_NAME_CHARS`]
///
/// Names that fit stay on one line. Longer names are wrapped greedily,
/// filling the first line up to the limit word by word. When greedy
/// wrapping cannot produce a first line (a single word longer than the
/// limit), both lines fall back to hard character truncation.
pub fn wrap_name(name: &str) -> (String, Option<String>) {
    let name = name.trim();
    if name.chars().count() <= MAX_NAME_CHARS {
        return (name.to_string(), None);
    }

    let mut line1 = String::new();
    let mut current = String::new();
    for word in name.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 <= MAX_NAME_CHARS {
            current.push_str(word);
            current.push(' ');
        } else if line1.is_empty() {
            line1 = current.trim_end().to_string();
            current.clear();
            current.push_str(word);
            current.push(' ');
        } else {
            current.push_str(word);
            current.push(' ');
        }
    }

    if line1.is_empty() {
        // Single word longer than the limit: hard truncation for both lines
        let l1: String = name.chars().take(MAX_NAME_CHARS).collect();
        let l2: String = name
            .chars()
            .skip(MAX_NAME_CHARS)
            .take(MAX_NAME_CHARS)
            .collect();
        let l2 = l2.trim().to_string();
        return (l1, (!l2.is_empty()).then_some(l2));
    }

    let line2: String = current.trim_end().chars().take(MAX_NAME_CHARS).collect();
    (line1, (!line2.is_empty()).then_some(line2))
}

/// Font tier for the lot line, stepping down as the text grows
fn lot_font(lot_text: &str) -> LabelFont {
    let len = lot_text.chars().count();
    if len > 24 {
        LabelFont::Small
    } else if len > 20 {
        LabelFont::Body
    } else {
        LabelFont::Medium
    }
}

/// Lay out one label as drawing instructions
///
/// Pure and deterministic: the same content always produces the same
/// instructions. `with_logo` shifts the text start to the right of the
/// logo block; a missing logo is non-fatal and simply reclaims the space.
pub fn layout_label(content: &LabelContent, with_logo: bool) -> Vec<LabelOp> {
    let mut ops = Vec::new();

    let text_x = if with_logo {
        TEXT_X_LOGO_MM
    } else {
        TEXT_X_PLAIN_MM
    } * DOTS_PER_MM;

    if with_logo {
        ops.push(LabelOp::Logo {
            x: LOGO_X_MM * DOTS_PER_MM,
            y: LOGO_Y_MM * DOTS_PER_MM,
        });
    }

    let mut y_mm = TOP_MM;
    let mut text = |ops: &mut Vec<LabelOp>, y_mm: u32, font: LabelFont, s: String| {
        ops.push(LabelOp::Text {
            x: text_x,
            y: y_mm * DOTS_PER_MM,
            font,
            text: s,
        });
    };

    let (line1, line2) = wrap_name(&content.name);
    if line2.is_none() && content.name.trim().chars().count() <= MAX_NAME_CHARS {
        // Short name: one line, large font, extra space below
        text(&mut ops, y_mm, LabelFont::Large, line1);
        y_mm += 10;
    } else {
        text(&mut ops, y_mm, LabelFont::Medium, line1);
        y_mm += 6;
        match line2 {
            Some(l2) => {
                text(&mut ops, y_mm, LabelFont::Medium, l2);
                y_mm += 5;
            }
            None => y_mm += 7,
        }
    }

    text(
        &mut ops,
        y_mm,
        LabelFont::Body,
        format!("Start: {}", content.start_date),
    );
    y_mm += 8;

    text(
        &mut ops,
        y_mm,
        LabelFont::Body,
        format!("Expiry: {}", content.expiry_date),
    );
    y_mm += 10;

    let lot_text = format!("Lot: {}", content.lot);
    let font = lot_font(&lot_text);
    text(&mut ops, y_mm, font, lot_text);

    ops
}

/// Render labels into one multi-page TSPL document
///
/// Each `(content, copies)` pair produces `copies` identical sequential
/// pages; the layout pass runs once per copy.
pub fn render_document(items: &[(LabelContent, u32)], logo: Option<&LogoBitmap>) -> Vec<u8> {
    let mut builder = TsplBuilder::new(LABEL_WIDTH_MM, LABEL_HEIGHT_MM);

    for (content, copies) in items {
        for _ in 0..(*copies).max(1) {
            builder.page();
            for op in layout_label(content, logo.is_some()) {
                match op {
                    LabelOp::Text { x, y, font, text } => {
                        builder.text(x, y, font.tspl_name(), &text);
                    }
                    LabelOp::Logo { x, y } => {
                        if let Some(bitmap) = logo {
                            builder.bitmap(x, y, bitmap);
                        }
                    }
                }
            }
            builder.print(1);
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(ops: &[LabelOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                LabelOp::Text { text, .. } => Some(text.as_str()),
                LabelOp::Logo { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_wrap_short_name() {
        assert_eq!(wrap_name("Yogurt"), ("Yogurt".to_string(), None));
    }

    #[test]
    fn test_wrap_boundary_sixteen_chars() {
        // Exactly 16 characters stays on one line
        let name = "Sixteen chars ab";
        assert_eq!(name.chars().count(), 16);
        assert_eq!(wrap_name(name), (name.to_string(), None));
    }

    #[test]
    fn test_wrap_seventeen_chars_splits() {
        let name = "Seventeen charsx!";
        assert_eq!(name.chars().count(), 17);
        let (line1, line2) = wrap_name(name);
        assert_eq!(line1, "Seventeen");
        assert_eq!(line2.as_deref(), Some("charsx!"));
    }

    #[test]
    fn test_wrap_greedy_fill() {
        let (line1, line2) = wrap_name("Raw milk blue cheese wheel");
        assert_eq!(line1, "Raw milk blue");
        assert_eq!(line2.as_deref(), Some("cheese wheel"));
    }

    #[test]
    fn test_wrap_single_long_word_truncates() {
        let (line1, line2) = wrap_name("Supercalifragilisticexpialidocious");
        assert_eq!(line1, "Supercalifragili");
        assert_eq!(line1.chars().count(), 16);
        assert_eq!(line2.as_deref(), Some("sticexpialidocio"));
    }

    #[test]
    fn test_layout_short_name_single_line() {
        let content = LabelContent::new("Yogurt", "01/03/2024", "11/03/2024", "L123");
        let ops = layout_label(&content, false);
        let lines = texts(&ops);
        assert_eq!(
            lines,
            vec!["Yogurt", "Start: 01/03/2024", "Expiry: 11/03/2024", "Lot: L123"]
        );
        // Name uses the large font on the single-line path
        assert!(matches!(
            ops[0],
            LabelOp::Text { font: LabelFont::Large, .. }
        ));
    }

    #[test]
    fn test_layout_long_name_two_lines() {
        let content = LabelContent::new(
            "Raw milk blue cheese wheel",
            "01/03/2024",
            "11/03/2024",
            "L123",
        );
        let ops = layout_label(&content, false);
        let lines = texts(&ops);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Raw milk blue");
        assert_eq!(lines[1], "cheese wheel");
    }

    #[test]
    fn test_layout_is_deterministic() {
        let content = LabelContent::new("Yogurt", "01/03/2024", "11/03/2024", "L123");
        assert_eq!(layout_label(&content, true), layout_label(&content, true));
    }

    #[test]
    fn test_logo_shifts_text_start() {
        let content = LabelContent::new("Yogurt", "01/03/2024", "N/D", "L123");
        let with_logo = layout_label(&content, true);
        let without = layout_label(&content, false);

        assert!(matches!(with_logo[0], LabelOp::Logo { .. }));
        let x_with = match &with_logo[1] {
            LabelOp::Text { x, .. } => *x,
            _ => panic!("expected text op"),
        };
        let x_without = match &without[0] {
            LabelOp::Text { x, .. } => *x,
            _ => panic!("expected text op"),
        };
        assert!(x_with > x_without);
    }

    #[test]
    fn test_lot_font_tiers() {
        // "Lot: " + 15 chars = 20 chars, largest tier
        assert_eq!(lot_font(&"x".repeat(20)), LabelFont::Medium);
        assert_eq!(lot_font(&"x".repeat(21)), LabelFont::Body);
        assert_eq!(lot_font(&"x".repeat(24)), LabelFont::Body);
        assert_eq!(lot_font(&"x".repeat(25)), LabelFont::Small);
    }

    #[test]
    fn test_lot_font_applied_to_layout() {
        let long_lot = "L1234567890123456789012345";
        let content = LabelContent::new("Yogurt", "01/03/2024", "N/D", long_lot);
        let ops = layout_label(&content, false);
        let lot_op = ops.last().unwrap();
        assert!(matches!(
            lot_op,
            LabelOp::Text { font: LabelFont::Small, .. }
        ));
    }

    #[test]
    fn test_render_document_pages() {
        let items = vec![
            (LabelContent::new("Yogurt", "01/03/2024", "N/D", "L1"), 3),
            (LabelContent::new("Cream", "01/03/2024", "N/D", "L2"), 1),
        ];
        let doc = String::from_utf8(render_document(&items, None)).unwrap();
        assert_eq!(doc.matches("CLS").count(), 4);
        assert_eq!(doc.matches("PRINT 1,1").count(), 4);
        assert_eq!(doc.matches("Yogurt").count(), 3);
        assert_eq!(doc.matches("Cream").count(), 1);
    }

    #[test]
    fn test_render_document_zero_copies_prints_one() {
        let items = vec![(LabelContent::new("Yogurt", "01/03/2024", "N/D", "L1"), 0)];
        let doc = String::from_utf8(render_document(&items, None)).unwrap();
        assert_eq!(doc.matches("CLS").count(), 1);
    }
}
