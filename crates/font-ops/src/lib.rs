//! sfnt container helpers shared by the web font encoders.
//!
//! The WOFF, WOFF2 and EOT encoders all start from the same place: a parsed
//! TrueType/OpenType table directory. This crate exposes that directory as
//! plain byte slices so each encoder only has to care about its own wrapper.

use anyhow::{Context, Result};
use read_fonts::{FontRef, TableProvider, types::Tag};

/// Size of the sfnt offset table (header before the table records).
pub const SFNT_HEADER_LEN: usize = 12;

/// Size of a single sfnt table record.
pub const SFNT_TABLE_RECORD_LEN: usize = 16;

/// `sfntVersion` for TrueType outlines.
pub const TRUETYPE_FLAVOR: u32 = 0x0001_0000;

/// A single table in an sfnt font.
#[derive(Debug, Clone, Copy)]
pub struct SfntTable<'a> {
    pub tag: Tag,
    pub checksum: u32,
    pub data: &'a [u8],
}

impl SfntTable<'_> {
    /// Table length rounded up to a 4-byte boundary.
    pub fn padded_len(&self) -> usize {
        padded_len(self.data.len())
    }
}

/// A parsed sfnt font, exposing its flavor and raw tables.
pub struct Sfnt<'a> {
    font: FontRef<'a>,
}

impl<'a> Sfnt<'a> {
    /// Parse raw TrueType/OpenType data.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let font = FontRef::new(data).context("Failed to parse font")?;
        Ok(Self { font })
    }

    pub fn font(&self) -> &FontRef<'a> {
        &self.font
    }

    /// The `sfntVersion` of the font (TrueType or `OTTO`).
    pub fn flavor(&self) -> u32 {
        self.font.table_directory.sfnt_version()
    }

    /// All tables, sorted by tag.
    pub fn tables(&self) -> Vec<SfntTable<'a>> {
        let mut tables: Vec<SfntTable<'a>> = self
            .font
            .table_directory
            .table_records()
            .iter()
            .filter_map(|record| {
                let data = self.font.table_data(record.tag())?;
                Some(SfntTable {
                    tag: record.tag(),
                    checksum: record.checksum(),
                    data: data.as_bytes(),
                })
            })
            .collect();
        tables.sort_by_key(|table| table.tag);
        tables
    }

    /// Size of the equivalent uncompressed sfnt file (header, records, padded tables).
    pub fn total_size(&self) -> usize {
        total_sfnt_size(&self.tables())
    }

    /// Look up a name table string, preferring Windows Unicode records.
    pub fn name_string(&self, name_id: u16) -> Option<String> {
        let name = self.font.name().ok()?;
        let mut fallback = None;
        for record in name.name_record() {
            if record.name_id().to_u16() != name_id {
                continue;
            }
            let Ok(string) = record.string(name.string_data()) else {
                continue;
            };
            let string = string.chars().collect::<String>();
            if record.platform_id() == 3 {
                return Some(string);
            }
            fallback.get_or_insert(string);
        }
        fallback
    }
}

/// Round a table length up to the 4-byte sfnt alignment.
pub fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// Append zero bytes until `buffer` is 4-byte aligned.
pub fn pad_to_4(buffer: &mut Vec<u8>) {
    let len = buffer.len();
    buffer.resize(padded_len(len), 0);
}

/// Size of an sfnt file holding `tables`.
pub fn total_sfnt_size(tables: &[SfntTable<'_>]) -> usize {
    SFNT_HEADER_LEN
        + tables.len() * SFNT_TABLE_RECORD_LEN
        + tables.iter().map(SfntTable::padded_len).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use write_fonts::FontBuilder;

    use super::*;

    #[test]
    fn padded_len_rounds_up() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 4);
        assert_eq!(padded_len(4), 4);
        assert_eq!(padded_len(5), 8);
    }

    #[test]
    fn tables_are_sorted_and_sized() {
        let mut builder = FontBuilder::new();
        builder.add_raw(Tag::new(b"zzzz"), &[1u8, 2, 3][..]);
        builder.add_raw(Tag::new(b"aaaa"), &[4u8, 5, 6, 7, 8][..]);
        let data = builder.build();

        let sfnt = Sfnt::parse(&data).unwrap();
        let tables = sfnt.tables();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].tag, Tag::new(b"aaaa"));
        assert_eq!(tables[0].data, &[4, 5, 6, 7, 8]);
        assert_eq!(tables[1].tag, Tag::new(b"zzzz"));
        assert_eq!(sfnt.total_size(), 12 + 2 * 16 + 8 + 4);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Sfnt::parse(b"not a font").is_err());
    }
}
