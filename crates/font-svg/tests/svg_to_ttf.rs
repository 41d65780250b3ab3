use facepack_font_svg::svg_to_ttf;
use read_fonts::{FontRef, TableProvider, tables::glyf::Glyph, types::GlyphId};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn font(glyphs: &str) -> Vec<u8> {
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><font horiz-adv-x="500"><font-face units-per-em="2048" ascent="1638" descent="-410"/>{glyphs}</font></svg>"#
    );
    svg_to_ttf(svg.as_bytes()).expect("conversion failed")
}

#[test]
fn test_head_bounds_cover_all_glyphs() {
    init_logging();
    let data = font(
        r#"<glyph unicode="a" d="M-10 0L100 0L100 100Z"/><glyph unicode="b" d="M0 -300L50 1500L90 0Z"/>"#,
    );
    let font = FontRef::new(&data).unwrap();
    let head = font.head().unwrap();
    assert_eq!(head.units_per_em(), 2048);
    assert_eq!(head.x_min(), -10);
    assert_eq!(head.y_min(), -300);
    assert_eq!(head.x_max(), 100);
    assert_eq!(head.y_max(), 1500);

    let hhea = font.hhea().unwrap();
    assert_eq!(hhea.ascender().to_i16(), 1638);
    assert_eq!(hhea.descender().to_i16(), -410);
    assert_eq!(hhea.number_of_h_metrics(), 3);
}

#[test]
fn test_glyph_outlines_survive() {
    init_logging();
    let data = font(r#"<glyph unicode="x" d="M0 0L10 0L10 10L0 10ZM20 20L30 20L30 30Z"/>"#);
    let font = FontRef::new(&data).unwrap();
    let loca = font.loca(None).unwrap();
    let glyf = font.glyf().unwrap();

    let Some(Glyph::Simple(glyph)) = loca.get_glyf(GlyphId::new(1), &glyf).unwrap() else {
        panic!("expected a simple glyph");
    };
    assert_eq!(glyph.number_of_contours(), 2);

    // .notdef was synthesized without an outline
    assert!(loca.get_glyf(GlyphId::new(0), &glyf).unwrap().is_none());
}

#[test]
fn test_duplicate_codepoints_keep_first_glyph() {
    init_logging();
    let data = font(r#"<glyph unicode="a" d="M0 0L1 1L1 0Z"/><glyph unicode="a" horiz-adv-x="900"/>"#);
    let font = FontRef::new(&data).unwrap();
    let cmap = font.cmap().unwrap();
    assert_eq!(cmap.map_codepoint('a'), Some(GlyphId::new(1)));
    assert_eq!(font.maxp().unwrap().num_glyphs(), 3);
}

#[test]
fn test_rejects_documents_without_font() {
    init_logging();
    assert!(svg_to_ttf(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>").is_err());
}
