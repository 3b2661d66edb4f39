use binary_reader::BinaryReader;
use log::debug;

use crate::io::reader::DirectorExt;

/// Ordered name table (LNAM) shared by every script of a cast.
#[derive(Clone, Debug, Default)]
pub struct ScriptNamesChunk {
    pub names: Vec<String>,
}

impl ScriptNamesChunk {
    pub fn from_bytes(data: &[u8]) -> Result<ScriptNamesChunk, String> {
        let mut reader = BinaryReader::from_u8(data);
        Self::from_reader(&mut reader)
    }

    pub fn from_reader(reader: &mut BinaryReader) -> Result<ScriptNamesChunk, String> {
        reader.set_endian(binary_reader::Endian::Big);

        let read_err = |e: std::io::Error| format!("truncated LNAM header: {}", e);
        let /*  0 */ unknown0 = reader.read_u32().map_err(read_err)?;
        let /*  4 */ unknown1 = reader.read_u32().map_err(read_err)?;
        let /*  8 */ len1 = reader.read_u32().map_err(read_err)?;
        let /* 12 */ len2 = reader.read_u32().map_err(read_err)?;
        let /* 16 */ names_offset = reader.read_u16().map_err(read_err)?;
        let /* 18 */ names_count = reader.read_u16().map_err(read_err)?;

        debug!(
            "LNAM unknown0={:08x} unknown1={:08x} len1={} len2={} names_offset={} names_count={}",
            unknown0, unknown1, len1, len2, names_offset, names_count
        );

        if len1 != len2 {
            return Err(format!("Bad file size! ({} != {})", len2, len1));
        }

        let mut names = Vec::with_capacity(names_count as usize);
        for i in 0..names_count {
            let name = reader
                .read_pascal_string()
                .map_err(|e| format!("truncated LNAM name {}: {}", i, e))?;
            debug!("name_list[{}] = {}", i, name);
            names.push(name);
        }

        Ok(ScriptNamesChunk { names })
    }
}
