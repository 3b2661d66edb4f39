use binary_reader::BinaryReader;
use log::debug;

use crate::io::reader::DirectorExt;

/// Size in bytes of one entry of the function record block.
pub const HANDLER_RECORD_SIZE: usize = 42;

#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct HandlerRecord {
    pub name_id: i16,
    unknown0: i16,
    pub compiled_len: usize,
    pub compiled_offset: usize,
    pub argument_count: usize,
    pub argument_offset: usize,
    pub locals_count: usize,
    pub locals_offset: usize,
    count_c: i16,
    unknown3: i32,
    unknown4: i32,
    unknown5: i16,
    count_d: i16,
    unknown6: i32,
    /// Offset just past the record, used as the function's own position.
    pub end_offset: usize,
}

/// Name table index of one argument or local, with the offset it was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarNameRef {
    pub name_id: i16,
    pub offset: usize,
}

#[derive(Clone, Debug)]
pub struct HandlerDef {
    pub record: HandlerRecord,
    pub argument_names: Vec<VarNameRef>,
    pub local_names: Vec<VarNameRef>,
    pub bytecode: Vec<u8>,
}

impl HandlerRecord {
    pub fn read_record(reader: &mut BinaryReader) -> Result<HandlerRecord, String> {
        let start = reader.pos;
        let read_err = |e: std::io::Error| format!("truncated handler record at {}: {}", start, e);

        let /*  0 */ name_id = reader.read_i16().map_err(read_err)?;
        let /*  2 */ unknown0 = reader.read_i16().map_err(read_err)?;
        let /*  4 */ compiled_len = reader.read_i32().map_err(read_err)? as usize;
        let /*  8 */ compiled_offset = reader.read_i32().map_err(read_err)? as usize;
        let /* 12 */ argument_count = reader.read_i16().map_err(read_err)?.max(0) as usize;
        let /* 14 */ argument_offset = reader.read_i32().map_err(read_err)? as usize;
        let /* 18 */ locals_count = reader.read_i16().map_err(read_err)?.max(0) as usize;
        let /* 20 */ locals_offset = reader.read_i32().map_err(read_err)? as usize;
        let /* 24 */ count_c = reader.read_i16().map_err(read_err)?;
        let /* 26 */ unknown3 = reader.read_i32().map_err(read_err)?;
        let /* 30 */ unknown4 = reader.read_i32().map_err(read_err)?;
        let /* 34 */ unknown5 = reader.read_i16().map_err(read_err)?;
        let /* 36 */ count_d = reader.read_i16().map_err(read_err)?;
        let /* 38 */ unknown6 = reader.read_i32().map_err(read_err)?;

        debug_assert_eq!(reader.pos - start, HANDLER_RECORD_SIZE);
        let record = HandlerRecord {
            name_id,
            unknown0,
            compiled_len,
            compiled_offset,
            argument_count,
            argument_offset,
            locals_count,
            locals_offset,
            count_c,
            unknown3,
            unknown4,
            unknown5,
            count_d,
            unknown6,
            end_offset: reader.pos,
        };
        debug!("handler record at {:x}: {:?}", start, record);
        Ok(record)
    }

    pub fn read_data(reader: &mut BinaryReader, record: &HandlerRecord) -> Result<HandlerDef, String> {
        let local_names = read_varnames_table(reader, record.locals_count, record.locals_offset)?;
        let argument_names = read_varnames_table(reader, record.argument_count, record.argument_offset)?;

        reader.jmp(record.compiled_offset);
        let bytecode = reader
            .read_bytes(record.compiled_len)
            .map_err(|e| format!("truncated bytecode at {}: {}", record.compiled_offset, e))?
            .to_vec();

        Ok(HandlerDef {
            record: record.clone(),
            argument_names,
            local_names,
            bytecode,
        })
    }
}

pub fn read_varnames_table(reader: &mut BinaryReader, count: usize, offset: usize) -> Result<Vec<VarNameRef>, String> {
    (0..count)
        .map(|i| {
            let offset = offset + 2 * i;
            reader
                .read_i16_at(offset)
                .map(|name_id| VarNameRef { name_id, offset })
                .map_err(|e| format!("truncated name table at {}: {}", offset, e))
        })
        .collect()
}
