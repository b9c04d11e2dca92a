//! Pipeline tests - text in, wrapped glyph lines out

use kween_text::*;

fn catalog_of(letters: &str) -> GlyphCatalog {
    GlyphCatalog::from_entries(letters.chars().map(|c| (c, AssetId::new(format!("{c}.png"))))).unwrap()
}

fn kinds(layout: &GlyphLayout) -> Vec<(char, bool)> {
    layout.units().map(|u| (u.ch(), u.is_fallback())).collect()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_hello_world_all_images() {
    let catalog = catalog_of("HELOWRD");
    let pipeline = TextPipeline::new(50.0, WrapStyle::default()).unwrap();
    let layout = pipeline.layout("HELLO WORLD", &catalog, &FixedAdvance::default());

    assert_eq!(layout.line_count(), 1);
    assert_eq!(layout.lines[0].words.len(), 2);
    assert!(layout.units().all(|u| !u.is_fallback()));
    assert!(layout.units().all(|u| u.height() == 50.0));
    assert!(!layout.lines[0].has_fallback());
}

#[test]
fn test_hello_world_without_l() {
    let catalog = catalog_of("HEOWRD");
    let pipeline = TextPipeline::new(50.0, WrapStyle::default()).unwrap();
    let layout = pipeline.layout("HELLO WORLD", &catalog, &FixedAdvance::default());

    let fallbacks: Vec<char> = kinds(&layout)
        .into_iter()
        .filter(|(_, fallback)| *fallback)
        .map(|(c, _)| c)
        .collect();
    assert_eq!(fallbacks, ['L', 'L', 'L']);
    assert!(layout.lines[0].has_fallback());
    for unit in layout.units().filter(|u| u.ch() != 'L') {
        assert!(unit.asset().is_some(), "{} should stay an image", unit.ch());
    }
}

#[test]
fn test_digits_and_punctuation_fall_back() {
    let catalog = GlyphCatalog::standard();
    let pipeline = TextPipeline::new(20.0, WrapStyle::default()).unwrap();
    let layout = pipeline.layout("R2-D2!", &catalog, &FixedAdvance::default());

    assert_eq!(
        kinds(&layout),
        [('R', false), ('2', true), ('-', true), ('D', false), ('2', true), ('!', true)]
    );
}

// ============================================================================
// WRAP INVARIANTS
// ============================================================================

#[test]
fn test_lines_never_exceed_width_when_words_fit() {
    let catalog = GlyphCatalog::standard();
    let measure = FixedAdvance { image_aspect: 0.8, fallback_aspect: 0.6 };
    let text = "the quick brown fox jumps over the lazy dog 42 times";
    let widest = text
        .split_whitespace()
        .map(|w| GlyphRenderer::new(&catalog).render_word(w, 30.0).unwrap())
        .map(|w| measure.word_width(&w))
        .fold(0.0f32, f32::max);

    for extra in [0.0, 1.0, 17.0, 60.0, 250.0, 1000.0] {
        let style = WrapStyle { max_width: widest + extra, spacer: 7.5, align: TextAlign::Left };
        let layout = TextPipeline::new(30.0, style)
            .unwrap()
            .layout(text, &catalog, &measure);
        for line in &layout.lines {
            assert!(line.width <= style.max_width, "{} > {}", line.width, style.max_width);
        }
        let rejoined: Vec<String> = layout.lines.iter().map(DisplayLine::text).collect();
        assert_eq!(rejoined.join(" "), text);
    }
}

#[test]
fn test_over_wide_word_is_not_split() {
    let catalog = GlyphCatalog::standard();
    let style = WrapStyle { max_width: 10.0, spacer: 1.0, align: TextAlign::Center };
    let layout = TextPipeline::new(50.0, style)
        .unwrap()
        .layout("SUPERCALIFRAGILISTIC", &catalog, &FixedAdvance::default());

    assert_eq!(layout.line_count(), 1);
    assert_eq!(layout.lines[0].words.len(), 1);
    assert_eq!(layout.lines[0].width, 1000.0);
    assert_eq!(layout.width, 1000.0);
}

#[test]
fn test_lowercase_uses_uppercase_assets() {
    let catalog = GlyphCatalog::standard();
    let layout = TextPipeline::new(10.0, WrapStyle::default())
        .unwrap()
        .layout("kween", &catalog, &FixedAdvance::default());
    let assets: Vec<&str> = layout.units().filter_map(GlyphUnit::asset).map(AssetId::as_str).collect();
    assert_eq!(assets, ["K.png", "W.png", "E.png", "E.png", "N.png"]);
}
