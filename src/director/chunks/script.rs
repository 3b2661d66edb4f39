use binary_reader::BinaryReader;
use itertools::Itertools;
use log::{debug, error};

use super::handler::{HandlerDef, HandlerRecord};
use super::literal::{Literal, LiteralStore};
use crate::io::reader::DirectorExt;

/// Block offsets found in the fixed LSCR header.
#[derive(Clone, Debug, Default)]
pub struct ScriptHeader {
    pub script_type: i32,
    pub prb_offset: usize,
    pub grb_nrecords: usize,
    pub grb_offset: usize,
    pub frb_nrecords: usize,
    pub frb_offset: usize,
    pub crb_nconstants: usize,
    pub crb_offset: usize,
    pub con_offset: usize,
}

#[derive(Clone, Debug)]
pub struct ScriptChunk {
    pub header: ScriptHeader,
    pub literals: Vec<Literal>,
    pub bytes_per_constant: usize,
    pub property_name_ids: Vec<i16>,
    pub global_name_ids: Vec<i16>,
    pub handlers: Vec<HandlerDef>,
}

impl ScriptChunk {
    pub fn from_bytes(data: &[u8]) -> Result<ScriptChunk, String> {
        let mut reader = BinaryReader::from_u8(data);
        Self::from_reader(&mut reader)
    }

    #[allow(unused_variables)]
    pub fn from_reader(reader: &mut BinaryReader) -> Result<ScriptChunk, String> {
        // Lingo scripts are always big endian regardless of file endianness
        reader.set_endian(binary_reader::Endian::Big);
        let header = Self::read_header(reader)?;

        let store = LiteralStore::from_reader(
            reader,
            header.crb_nconstants,
            header.crb_offset,
            header.con_offset,
        )?;

        let property_name_ids = read_name_block(reader, header.prb_offset, header.grb_offset)?;
        let global_name_ids = read_name_block(reader, header.grb_offset, header.frb_offset)?;

        reader.jmp(header.frb_offset);
        let handler_records = (0..header.frb_nrecords)
            .map(|_| HandlerRecord::read_record(reader))
            .collect::<Result<Vec<_>, _>>()?;

        let handlers = handler_records
            .iter()
            .map(|record| HandlerRecord::read_data(reader, record))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "LSCR properties={} globals={} handlers=[{}]",
            property_name_ids.len(),
            global_name_ids.len(),
            handler_records.iter().map(|record| record.name_id).join(", ")
        );

        Ok(ScriptChunk {
            header,
            literals: store.literals,
            bytes_per_constant: store.bytes_per_constant,
            property_name_ids,
            global_name_ids,
            handlers,
        })
    }

    #[allow(unused_variables)]
    fn read_header(reader: &mut BinaryReader) -> Result<ScriptHeader, String> {
        let read_err = |e: std::io::Error| format!("truncated LSCR header: {}", e);

        let /*  0 */ script_type = reader.read_i32().map_err(read_err)?;
        let /*  4 */ unknown_01 = reader.read_i32().map_err(read_err)?;
        let /*  8 */ total_length = reader.read_i32().map_err(read_err)?;
        let /* 12 */ total_length2 = reader.read_i32().map_err(read_err)?;
        let unknown = (4..16)
            .map(|_| reader.read_i32())
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;

        if total_length != total_length2 || total_length as usize != reader.length {
            error!(
                "bad filesize ({}, {}, {})",
                total_length2, total_length, reader.length
            );
            return Err("Bad file size!".to_owned());
        }

        let /* 64 */ prb_offset = reader.read_i16().map_err(read_err)?;
        let /* 66 */ grb_nrecords = reader.read_i16().map_err(read_err)?;
        let /* 68 */ unknown_18 = reader.read_i16().map_err(read_err)?;
        let /* 70 */ grb_offset = reader.read_i16().map_err(read_err)?;
        let /* 72 */ frb_nrecords = reader.read_i16().map_err(read_err)?;
        let /* 74 */ unknown_19 = reader.read_i16().map_err(read_err)?;
        let /* 76 */ frb_offset = reader.read_i16().map_err(read_err)?;
        let /* 78 */ crb_nconstants = reader.read_i16().map_err(read_err)?;
        let /* 80 */ unknown_20 = reader.read_i16().map_err(read_err)?;
        let /* 82 */ crb_offset = reader.read_i16().map_err(read_err)?;
        let /* 84 */ unknown_21 = reader.read_i16().map_err(read_err)?;
        let /* 86 */ unknown_22 = reader.read_i16().map_err(read_err)?;
        let /* 88 */ unknown_23 = reader.read_i16().map_err(read_err)?;
        let /* 90 */ con_offset = reader.read_i16().map_err(read_err)?;

        let header = ScriptHeader {
            script_type,
            prb_offset: to_offset(prb_offset),
            grb_nrecords: to_offset(grb_nrecords),
            grb_offset: to_offset(grb_offset),
            frb_nrecords: to_offset(frb_nrecords),
            frb_offset: to_offset(frb_offset),
            crb_nconstants: to_offset(crb_nconstants),
            crb_offset: to_offset(crb_offset),
            con_offset: to_offset(con_offset),
        };
        debug!("LSCR header: {:?}", header);
        Ok(header)
    }
}

// Header fields are signed 16-bit on disk but address up to 64k.
fn to_offset(value: i16) -> usize {
    value as u16 as usize
}

/// Reads the i16 name indices stored between `start` and `end`.
fn read_name_block(reader: &mut BinaryReader, start: usize, end: usize) -> Result<Vec<i16>, String> {
    (start..end)
        .step_by(2)
        .map(|offset| {
            reader
                .read_i16_at(offset)
                .map_err(|e| format!("truncated name block at {}: {}", offset, e))
        })
        .collect()
}
