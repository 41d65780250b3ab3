//! WOFF 1.0 conversion.
//!
//! Each sfnt table is zlib-compressed on its own and stored only when that
//! makes it smaller; otherwise the raw table bytes are kept.

use std::io::Write;

use anyhow::{Context, Result};
use facepack_font_ops::{Sfnt, SfntTable};
use flate2::{Compression, write::ZlibEncoder};

/// `wOFF` signature.
pub const WOFF_SIGNATURE: u32 = 0x774F_4646;

const WOFF_HEADER_LEN: usize = 44;
const WOFF_TABLE_ENTRY_LEN: usize = 20;

struct EncodedTable<'a> {
    table: SfntTable<'a>,
    data: Vec<u8>,
}

/// Converts TrueType/OpenType data to WOFF.
pub fn convert_to_woff(data: &[u8]) -> Result<Vec<u8>> {
    let sfnt = Sfnt::parse(data)?;
    let tables = sfnt.tables();

    let encoded = tables
        .iter()
        .map(|table| {
            Ok(EncodedTable {
                table: *table,
                data: compress_table(table)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut offset = WOFF_HEADER_LEN + encoded.len() * WOFF_TABLE_ENTRY_LEN;
    let mut directory = Vec::with_capacity(encoded.len() * WOFF_TABLE_ENTRY_LEN);
    for entry in &encoded {
        directory.extend_from_slice(&entry.table.tag.to_be_bytes());
        directory.extend_from_slice(&u32::try_from(offset)?.to_be_bytes());
        directory.extend_from_slice(&u32::try_from(entry.data.len())?.to_be_bytes());
        directory.extend_from_slice(&u32::try_from(entry.table.data.len())?.to_be_bytes());
        directory.extend_from_slice(&entry.table.checksum.to_be_bytes());
        offset += facepack_font_ops::padded_len(entry.data.len());
    }
    let length = offset;

    let mut buffer = Vec::with_capacity(length);
    buffer.extend_from_slice(&WOFF_SIGNATURE.to_be_bytes());
    buffer.extend_from_slice(&sfnt.flavor().to_be_bytes());
    buffer.extend_from_slice(&u32::try_from(length)?.to_be_bytes());
    buffer.extend_from_slice(&u16::try_from(encoded.len())?.to_be_bytes());
    buffer.extend_from_slice(&0u16.to_be_bytes()); // reserved
    buffer.extend_from_slice(&u32::try_from(sfnt.total_size())?.to_be_bytes());
    buffer.extend_from_slice(&1u16.to_be_bytes()); // major version
    buffer.extend_from_slice(&0u16.to_be_bytes()); // minor version
    buffer.extend_from_slice(&[0u8; 20]); // metadata and private blocks
    debug_assert_eq!(buffer.len(), WOFF_HEADER_LEN);

    buffer.extend_from_slice(&directory);
    for entry in &encoded {
        buffer.extend_from_slice(&entry.data);
        facepack_font_ops::pad_to_4(&mut buffer);
    }
    debug_assert_eq!(buffer.len(), length);

    Ok(buffer)
}

/// Check whether data carries the WOFF signature.
pub fn is_woff(data: &[u8]) -> bool {
    data.get(..4) == Some(&WOFF_SIGNATURE.to_be_bytes()[..])
}

fn compress_table(table: &SfntTable<'_>) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    let compressed = encoder
        .write_all(table.data)
        .and_then(|()| encoder.finish())
        .with_context(|| format!("Failed to compress '{}' table", table.tag))?;

    if compressed.len() < table.data.len() {
        Ok(compressed)
    } else {
        Ok(table.data.to_vec())
    }
}
