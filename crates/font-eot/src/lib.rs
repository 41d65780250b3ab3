//! Embedded OpenType (EOT) conversion.
//!
//! Produces an uncompressed EOT 2.1 file: a little-endian header carrying
//! OS/2 metadata and UTF-16LE name strings, followed by the font unchanged.

use anyhow::{Context, Result};
use facepack_font_ops::Sfnt;
use read_fonts::TableProvider;

/// EOT magic number stored at [`MAGIC_OFFSET`].
pub const EOT_MAGIC: u16 = 0x504C;

/// Byte offset of the magic number within the header.
pub const MAGIC_OFFSET: usize = 34;

const EOT_VERSION: u32 = 0x0002_0001;
const DEFAULT_CHARSET: u8 = 0x01;

/// Name ids stored in the header, in header order.
const FAMILY_NAME: u16 = 1;
const STYLE_NAME: u16 = 2;
const VERSION_NAME: u16 = 5;
const FULL_NAME: u16 = 4;

#[derive(Debug, Default)]
struct Os2Fields {
    panose: [u8; 10],
    italic: u8,
    weight: u32,
    fs_type: u16,
    unicode_range: [u32; 4],
    code_page_range: [u32; 2],
}

/// Converts TrueType/OpenType data to EOT.
pub fn convert_to_eot(data: &[u8]) -> Result<Vec<u8>> {
    let sfnt = Sfnt::parse(data)?;
    let os2 = read_os2(&sfnt);
    let checksum_adjustment = sfnt
        .font()
        .head()
        .context("Font has no head table")?
        .checksum_adjustment();
    let font_data_size = u32::try_from(data.len()).context("Font too large for EOT")?;

    let mut names = Vec::new();
    for name_id in [FAMILY_NAME, STYLE_NAME, VERSION_NAME, FULL_NAME] {
        let encoded = utf16_le(&sfnt.name_string(name_id).unwrap_or_default());
        write_u16(&mut names, 0); // padding
        write_u16(&mut names, u16::try_from(encoded.len()).context("Name string too long")?);
        names.extend_from_slice(&encoded);
    }
    write_u16(&mut names, 0); // padding
    write_u16(&mut names, 0); // root string size

    let mut header = Vec::with_capacity(80 + names.len());
    write_u32(&mut header, 0); // total size, patched below
    write_u32(&mut header, font_data_size);
    write_u32(&mut header, EOT_VERSION);
    write_u32(&mut header, 0); // flags
    header.extend_from_slice(&os2.panose);
    header.push(DEFAULT_CHARSET);
    header.push(os2.italic);
    write_u32(&mut header, os2.weight);
    write_u16(&mut header, os2.fs_type);
    debug_assert_eq!(header.len(), MAGIC_OFFSET);
    write_u16(&mut header, EOT_MAGIC);
    for range in os2.unicode_range {
        write_u32(&mut header, range);
    }
    for range in os2.code_page_range {
        write_u32(&mut header, range);
    }
    write_u32(&mut header, checksum_adjustment);
    header.extend_from_slice(&[0u8; 16]); // reserved
    header.extend_from_slice(&names);

    let total = u32::try_from(header.len() + data.len()).context("Font too large for EOT")?;
    header[..4].copy_from_slice(&total.to_le_bytes());
    header.extend_from_slice(data);
    Ok(header)
}

/// Check whether data has the EOT magic number in its header.
pub fn is_eot(data: &[u8]) -> bool {
    data.get(MAGIC_OFFSET..MAGIC_OFFSET + 2) == Some(&EOT_MAGIC.to_le_bytes()[..])
}

fn read_os2(sfnt: &Sfnt<'_>) -> Os2Fields {
    let Ok(os2) = sfnt.font().os2() else {
        return Os2Fields { weight: 400, ..Default::default() };
    };
    let mut panose = [0u8; 10];
    let source = os2.panose_10();
    let len = source.len().min(panose.len());
    panose[..len].copy_from_slice(&source[..len]);

    Os2Fields {
        panose,
        italic: u8::from(os2.fs_selection().bits() & 1 != 0),
        weight: u32::from(os2.us_weight_class()),
        fs_type: os2.fs_type(),
        unicode_range: [
            os2.ul_unicode_range_1(),
            os2.ul_unicode_range_2(),
            os2.ul_unicode_range_3(),
            os2.ul_unicode_range_4(),
        ],
        code_page_range: [
            os2.ul_code_page_range_1().unwrap_or(0),
            os2.ul_code_page_range_2().unwrap_or(0),
        ],
    }
}

fn utf16_le(value: &str) -> Vec<u8> {
    value.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn write_u16(buffer: &mut Vec<u8>, value: u16) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

fn write_u32(buffer: &mut Vec<u8>, value: u32) {
    buffer.extend_from_slice(&value.to_le_bytes());
}
