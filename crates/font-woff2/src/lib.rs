//! WOFF2 conversion.
//!
//! Wraps TrueType/OpenType data in a WOFF2 container. Table data is stored
//! as a single brotli stream; `glyf` and `loca` use the null transform so
//! no outline re-encoding is needed.
//!
//! # Example
//!
//! ```no_run
//! use facepack_font_woff2::convert_to_woff2;
//!
//! let ttf_data = std::fs::read("font.ttf").unwrap();
//! let woff2 = convert_to_woff2(&ttf_data).unwrap();
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use facepack_font_ops::{Sfnt, SfntTable};
use read_fonts::types::Tag;

/// `wOF2` signature.
pub const WOFF2_SIGNATURE: u32 = 0x774F_4632;

const WOFF2_HEADER_LEN: usize = 48;

/// Transform version 3 for `glyf`/`loca` means "no transform".
const NULL_TRANSFORM: u8 = 0b1100_0000;

/// Tag value stored in the flags byte when the tag follows explicitly.
const ARBITRARY_TAG: u8 = 0x3F;

const BROTLI_BUFFER_SIZE: usize = 4096;
const BROTLI_QUALITY: u32 = 11;
const BROTLI_WINDOW: u32 = 22;

/// Tables with a one-byte shorthand in the WOFF2 table directory.
const KNOWN_TAGS: [&[u8; 4]; 63] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep", b"CFF ", b"VORG", b"EBDT", b"EBLC", b"gasp", b"hdmx", b"kern",
    b"LTSH", b"PCLT", b"VDMX", b"vhea", b"vmtx", b"BASE", b"GDEF", b"GPOS", b"GSUB", b"EBSC",
    b"JSTF", b"MATH", b"CBDT", b"CBLC", b"COLR", b"CPAL", b"SVG ", b"sbix", b"acnt", b"avar",
    b"bdat", b"bloc", b"bsln", b"cvar", b"fdsc", b"feat", b"fmtx", b"fvar", b"gvar", b"hsty",
    b"just", b"lcar", b"mort", b"morx", b"opbd", b"prop", b"trak", b"Zapf", b"Silf", b"Glat",
    b"Gloc", b"Feat", b"Sill",
];

/// Converts TrueType/OpenType data to WOFF2.
pub fn convert_to_woff2(data: &[u8]) -> Result<Vec<u8>> {
    let sfnt = Sfnt::parse(data)?;
    let tables = sfnt.tables();

    let mut directory = Vec::new();
    for table in &tables {
        write_table_entry(&mut directory, table)?;
    }

    let compressed = compress_tables(&tables)?;

    let mut length = WOFF2_HEADER_LEN + directory.len() + compressed.len();
    length = facepack_font_ops::padded_len(length);

    let mut buffer = Vec::with_capacity(length);
    buffer.extend_from_slice(&WOFF2_SIGNATURE.to_be_bytes());
    buffer.extend_from_slice(&sfnt.flavor().to_be_bytes());
    buffer.extend_from_slice(&u32::try_from(length)?.to_be_bytes());
    buffer.extend_from_slice(&u16::try_from(tables.len())?.to_be_bytes());
    buffer.extend_from_slice(&0u16.to_be_bytes()); // reserved
    buffer.extend_from_slice(&u32::try_from(sfnt.total_size())?.to_be_bytes());
    buffer.extend_from_slice(&u32::try_from(compressed.len())?.to_be_bytes());
    buffer.extend_from_slice(&1u16.to_be_bytes()); // major version
    buffer.extend_from_slice(&0u16.to_be_bytes()); // minor version
    buffer.extend_from_slice(&[0u8; 20]); // metadata and private blocks
    debug_assert_eq!(buffer.len(), WOFF2_HEADER_LEN);

    buffer.extend_from_slice(&directory);
    buffer.extend_from_slice(&compressed);
    facepack_font_ops::pad_to_4(&mut buffer);
    debug_assert_eq!(buffer.len(), length);

    Ok(buffer)
}

/// Check whether data carries the WOFF2 signature.
pub fn is_woff2(data: &[u8]) -> bool {
    data.get(..4) == Some(&WOFF2_SIGNATURE.to_be_bytes()[..])
}

fn write_table_entry(buffer: &mut Vec<u8>, table: &SfntTable<'_>) -> Result<()> {
    let known = KNOWN_TAGS
        .iter()
        .position(|tag| Tag::new(*tag) == table.tag)
        .map(|index| index as u8);

    let mut flags = known.unwrap_or(ARBITRARY_TAG);
    if table.tag == Tag::new(b"glyf") || table.tag == Tag::new(b"loca") {
        flags |= NULL_TRANSFORM;
    }
    buffer.push(flags);
    if known.is_none() {
        buffer.extend_from_slice(&table.tag.to_be_bytes());
    }
    let length = u32::try_from(table.data.len()).context("Table too large for WOFF2")?;
    write_uint_base128(buffer, length);
    Ok(())
}

/// Compress the concatenated (unpadded) table data as one brotli stream.
fn compress_tables(tables: &[SfntTable<'_>]) -> Result<Vec<u8>> {
    let mut writer = brotli::CompressorWriter::new(
        Vec::new(),
        BROTLI_BUFFER_SIZE,
        BROTLI_QUALITY,
        BROTLI_WINDOW,
    );
    for table in tables {
        writer
            .write_all(table.data)
            .with_context(|| format!("Failed to compress '{}' table", table.tag))?;
    }
    Ok(writer.into_inner())
}

fn write_uint_base128(buffer: &mut Vec<u8>, value: u32) {
    let len = uint_base128_len(value);
    for i in (0..len).rev() {
        let mut byte = ((value >> (7 * i)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        buffer.push(byte);
    }
}

fn uint_base128_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    const SVG: &str = r#"<svg><font horiz-adv-x="500">
        <glyph unicode="a" d="M0 0L400 0L400 500L0 500Z"/>
        <glyph unicode="b" d="M0 0L200 700L400 0Z"/>
    </font></svg>"#;

    fn ttf() -> Vec<u8> {
        facepack_font_svg::svg_to_ttf(SVG.as_bytes()).unwrap()
    }

    fn read_u32(data: &[u8], offset: usize) -> u32 {
        u32::from_be_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_uint_base128() {
        let encode = |value| {
            let mut buffer = vec![];
            write_uint_base128(&mut buffer, value);
            buffer
        };
        assert_eq!(encode(0), vec![0]);
        assert_eq!(encode(127), vec![0x7F]);
        assert_eq!(encode(128), vec![0x81, 0x00]);
        assert_eq!(encode(16_383), vec![0xFF, 0x7F]);
        assert_eq!(encode(u32::MAX).len(), 5);
    }

    #[test]
    fn test_header_fields() {
        let ttf = ttf();
        let woff2 = convert_to_woff2(&ttf).unwrap();
        let sfnt = Sfnt::parse(&ttf).unwrap();

        assert!(is_woff2(&woff2));
        assert_eq!(read_u32(&woff2, 4), facepack_font_ops::TRUETYPE_FLAVOR);
        assert_eq!(read_u32(&woff2, 8) as usize, woff2.len());
        assert_eq!(woff2.len() % 4, 0);
        assert_eq!(
            u16::from_be_bytes([woff2[12], woff2[13]]) as usize,
            sfnt.tables().len()
        );
        assert_eq!(read_u32(&woff2, 16) as usize, sfnt.total_size());
    }

    #[test]
    fn test_brotli_stream_holds_table_data() {
        let ttf = ttf();
        let woff2 = convert_to_woff2(&ttf).unwrap();
        let tables = Sfnt::parse(&ttf).unwrap().tables();

        let mut directory = vec![];
        for table in &tables {
            write_table_entry(&mut directory, table).unwrap();
        }
        let start = WOFF2_HEADER_LEN + directory.len();
        let compressed_len = read_u32(&woff2, 20) as usize;
        let stream = &woff2[start..start + compressed_len];

        let mut decompressed = vec![];
        brotli::Decompressor::new(stream, 4096)
            .read_to_end(&mut decompressed)
            .unwrap();
        let expected: Vec<u8> = tables.iter().flat_map(|t| t.data.iter().copied()).collect();
        assert_eq!(decompressed, expected);
    }

    #[test]
    fn test_glyf_and_loca_use_null_transform() {
        let ttf = ttf();
        let sfnt = Sfnt::parse(&ttf).unwrap();
        for table in sfnt.tables() {
            let mut entry = vec![];
            write_table_entry(&mut entry, &table).unwrap();
            let is_outline = table.tag == Tag::new(b"glyf") || table.tag == Tag::new(b"loca");
            assert_eq!(entry[0] & NULL_TRANSFORM == NULL_TRANSFORM, is_outline, "{}", table.tag);
        }
    }

    #[test]
    fn test_unknown_tags_are_written_inline() {
        let table = SfntTable { tag: Tag::new(b"ABCD"), checksum: 0, data: &[1, 2, 3] };
        let mut entry = vec![];
        write_table_entry(&mut entry, &table).unwrap();
        assert_eq!(entry, vec![ARBITRARY_TAG, b'A', b'B', b'C', b'D', 3]);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(convert_to_woff2(b"definitely not a font").is_err());
    }
}
