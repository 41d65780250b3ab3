//! TrueType table construction for a parsed SVG font.

use anyhow::Result;
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::{Cmap, Cmap12, CmapSubtable, EncodingRecord, PlatformId, SequentialMapGroup},
        glyf::{GlyfLocaBuilder, Glyph},
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::{FWord, Fixed, LongDateTime, NameId, Tag, Version16Dot16},
};

use crate::{glyph::GlyphOutline, parse::SvgFont};

const STYLE_NAME: &str = "Regular";
const VERSION_STRING: &str = "Version 1.0";

/// Font-wide extremes collected while building glyphs.
#[derive(Debug, Clone, Copy)]
struct FontBounds {
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
    min_left_side_bearing: i16,
    min_right_side_bearing: i16,
    x_max_extent: i16,
    advance_width_max: u16,
    has_outlines: bool,
}

impl FontBounds {
    fn new() -> Self {
        Self {
            x_min: i16::MAX,
            y_min: i16::MAX,
            x_max: i16::MIN,
            y_max: i16::MIN,
            min_left_side_bearing: i16::MAX,
            min_right_side_bearing: i16::MAX,
            x_max_extent: i16::MIN,
            advance_width_max: 0,
            has_outlines: false,
        }
    }

    fn update(&mut self, glyph: &Glyph, advance: u16) {
        self.advance_width_max = self.advance_width_max.max(advance);
        let Glyph::Simple(simple) = glyph else {
            return;
        };
        let bbox = &simple.bbox;
        self.has_outlines = true;
        self.x_min = self.x_min.min(bbox.x_min);
        self.y_min = self.y_min.min(bbox.y_min);
        self.x_max = self.x_max.max(bbox.x_max);
        self.y_max = self.y_max.max(bbox.y_max);

        let width = i32::from(bbox.x_max) - i32::from(bbox.x_min);
        let lsb = i32::from(bbox.x_min);
        let rsb = i32::from(advance) - lsb - width;
        self.min_left_side_bearing = self.min_left_side_bearing.min(bbox.x_min);
        self.min_right_side_bearing = self.min_right_side_bearing.min(clamp_i16(rsb));
        self.x_max_extent = self.x_max_extent.max(clamp_i16(lsb + width));
    }

    fn finalize(&mut self) {
        if !self.has_outlines {
            *self = Self {
                x_min: 0,
                y_min: 0,
                x_max: 0,
                y_max: 0,
                min_left_side_bearing: 0,
                min_right_side_bearing: 0,
                x_max_extent: 0,
                ..*self
            };
        }
    }
}

pub(crate) fn build_font(font: &SvgFont) -> Result<Vec<u8>> {
    let num_glyphs = u16::try_from(font.glyphs.len())?;

    let mut glyf_builder = GlyfLocaBuilder::new();
    let mut bounds = FontBounds::new();
    let mut h_metrics = Vec::with_capacity(font.glyphs.len());
    let mut mappings: Vec<(u32, u32)> = Vec::new();
    let mut max_points = 0usize;
    let mut max_contours = 0usize;

    for (gid, svg_glyph) in font.glyphs.iter().enumerate() {
        let outline = GlyphOutline::from_path(&svg_glyph.path);
        max_points = max_points.max(outline.point_count());
        max_contours = max_contours.max(outline.contour_count());

        let glyph = outline.into_glyph();
        let side_bearing = match &glyph {
            Glyph::Simple(simple) => simple.bbox.x_min,
            _ => 0,
        };
        bounds.update(&glyph, svg_glyph.advance);
        glyf_builder.add_glyph(&glyph)?;
        h_metrics.push(LongMetric { advance: svg_glyph.advance, side_bearing });

        if let Some(c) = svg_glyph.codepoint {
            mappings.push((u32::from(c), u32::try_from(gid)?));
        }
    }
    bounds.finalize();

    // Stable sort keeps the first glyph declared for a codepoint.
    mappings.sort_by_key(|(cp, _)| *cp);
    mappings.dedup_by_key(|(cp, _)| *cp);

    let (glyf, loca, loca_format) = glyf_builder.build();

    let head = Head::new(
        Fixed::from_f64(1.0),
        0,
        Flags::from_bits_truncate(0b1011),
        font.units_per_em,
        LongDateTime::new(0),
        LongDateTime::new(0),
        bounds.x_min,
        bounds.y_min,
        bounds.x_max,
        bounds.y_max,
        MacStyle::empty(),
        8,
        match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    );

    let hhea = Hhea::new(
        font.ascent.into(),
        font.descent.into(),
        0i16.into(),
        bounds.advance_width_max.into(),
        bounds.min_left_side_bearing.into(),
        bounds.min_right_side_bearing.into(),
        bounds.x_max_extent.into(),
        1,
        0,
        0,
        num_glyphs,
    );

    let hmtx = Hmtx { h_metrics, left_side_bearings: vec![] };

    let maxp = Maxp {
        num_glyphs,
        max_points: Some(u16::try_from(max_points)?),
        max_contours: Some(u16::try_from(max_contours)?),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(2),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };

    let os2 = build_os2(font, &bounds, &mappings);

    let mut post = Post::new(
        Fixed::from_f64(0.0),
        FWord::new(-clamp_i16(i32::from(font.units_per_em) / 10)),
        FWord::new(clamp_i16(i32::from(font.units_per_em) / 20)),
        0,
        0,
        0,
        0,
        0,
    );
    post.version = Version16Dot16::VERSION_3_0;

    let mut builder = FontBuilder::new();
    builder.add_table(&head)?;
    builder.add_table(&hhea)?;
    builder.add_table(&maxp)?;
    builder.add_table(&os2)?;
    builder.add_table(&hmtx)?;
    builder.add_table(&build_cmap(&mappings))?;
    builder.add_table(&build_name(&font.family))?;
    builder.add_table(&post)?;
    builder.add_table(&glyf)?;
    builder.add_table(&loca)?;
    Ok(builder.build())
}

fn build_os2(font: &SvgFont, bounds: &FontBounds, mappings: &[(u32, u32)]) -> Os2 {
    let advances: Vec<u32> = font
        .glyphs
        .iter()
        .map(|glyph| u32::from(glyph.advance))
        .filter(|advance| *advance > 0)
        .collect();
    let x_avg_char_width = match advances.len() {
        0 => 0,
        n => clamp_i16((advances.iter().sum::<u32>() / n as u32) as i32),
    };
    let first_char = mappings.first().map_or(0, |(cp, _)| (*cp).min(0xFFFF) as u16);
    let last_char = mappings.last().map_or(0, |(cp, _)| (*cp).min(0xFFFF) as u16);
    let upm = i32::from(font.units_per_em);

    Os2 {
        x_avg_char_width,
        us_weight_class: 400,
        us_width_class: 5,
        fs_type: 0,
        y_subscript_x_size: clamp_i16(upm * 65 / 100),
        y_subscript_y_size: clamp_i16(upm * 60 / 100),
        y_subscript_x_offset: 0,
        y_subscript_y_offset: clamp_i16(upm * 75 / 1000),
        y_superscript_x_size: clamp_i16(upm * 65 / 100),
        y_superscript_y_size: clamp_i16(upm * 60 / 100),
        y_superscript_x_offset: 0,
        y_superscript_y_offset: clamp_i16(upm * 35 / 100),
        y_strikeout_size: clamp_i16(upm / 20),
        y_strikeout_position: clamp_i16(upm * 3 / 10),
        s_family_class: 0,
        panose_10: [0; 10],
        ul_unicode_range_1: 0,
        ul_unicode_range_2: 0,
        ul_unicode_range_3: 0,
        ul_unicode_range_4: 0,
        ach_vend_id: Tag::new(b"NONE"),
        fs_selection: SelectionFlags::REGULAR,
        us_first_char_index: first_char,
        us_last_char_index: last_char,
        s_typo_ascender: font.ascent,
        s_typo_descender: font.descent,
        s_typo_line_gap: 0,
        us_win_ascent: bounds.y_max.max(font.ascent).max(0) as u16,
        us_win_descent: clamp_i16(-i32::from(bounds.y_min.min(font.descent))).max(0) as u16,
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(0),
        s_cap_height: Some(0),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        us_lower_optical_point_size: None,
        us_upper_optical_point_size: None,
    }
}

/// Build a format 12 cmap from sorted `(codepoint, glyph id)` pairs.
fn build_cmap(mappings: &[(u32, u32)]) -> Cmap {
    let mut groups: Vec<SequentialMapGroup> = Vec::new();
    let mut run: Option<(u32, u32, u32)> = None;

    for &(cp, gid) in mappings {
        run = match run {
            Some((start_cp, prev_cp, start_gid))
                if cp == prev_cp + 1 && gid == start_gid + (cp - start_cp) =>
            {
                Some((start_cp, cp, start_gid))
            }
            Some((start_cp, prev_cp, start_gid)) => {
                groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));
                Some((cp, cp, gid))
            }
            None => Some((cp, cp, gid)),
        };
    }
    if let Some((start_cp, prev_cp, start_gid)) = run {
        groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));
    }

    let cmap12 = Cmap12 { language: 0, groups };
    Cmap::new(vec![
        EncodingRecord::new(PlatformId::Unicode, 4, CmapSubtable::Format12(cmap12.clone())),
        EncodingRecord::new(PlatformId::Windows, 10, CmapSubtable::Format12(cmap12)),
    ])
}

fn build_name(family: &str) -> Name {
    let postscript_family: String = family.chars().filter(|c| !c.is_whitespace()).collect();
    let records = [
        (1, family.to_string()),
        (2, STYLE_NAME.to_string()),
        (3, format!("{family}:{STYLE_NAME}")),
        (4, format!("{family} {STYLE_NAME}")),
        (5, VERSION_STRING.to_string()),
        (6, format!("{postscript_family}-{STYLE_NAME}")),
    ]
    .into_iter()
    .map(|(name_id, string)| NameRecord::new(3, 1, 0x409, NameId::new(name_id), string.into()))
    .collect();
    Name::new(records)
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}
