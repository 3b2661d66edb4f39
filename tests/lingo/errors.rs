use lingo_decompiler::{decompile, DecompileError};

use crate::builder::{Constant, Handler, NameTable, ScriptBuilder};

fn names() -> NameTable {
    NameTable::new(&["h", "x"])
}

/// Runs `code` as the only handler and returns the error with the bytecode's offset.
fn fail(code: &[u8]) -> (DecompileError, usize) {
    let names = names();
    let built = ScriptBuilder::new()
        .handler(Handler::new(names.id("h"), code).locals(&[names.id("x")]))
        .build();
    let err = decompile(&names.lnam(), &built.lscr).expect_err("bytecode should be rejected");
    (err, built.code_offsets[0])
}

#[test]
fn test_unknown_opcode() {
    let (err, base) = fail(&[0x41, 0x01, 0x02]);
    assert!(matches!(err, DecompileError::UnknownOpcode { opcode: 0x02, .. }));
    assert_eq!(err.offset(), Some(base + 2));
    assert_eq!(err.opcode(), Some(0x02));
}

#[test]
fn test_unknown_opcode_pair() {
    let (err, base) = fail(&[0x5c, 0x0e]);
    assert!(matches!(
        err,
        DecompileError::UnknownOpcodePair {
            prefix: 0x5c,
            sub: 0x0e,
            ..
        }
    ));
    assert_eq!(err.offset(), Some(base));
    assert_eq!(err.opcode(), Some(0x5c));
}

#[test]
fn test_stack_underflow() {
    let (err, base) = fail(&[0x41, 0x01, 0x41, 0x02, 0x05, 0x05]);
    assert!(matches!(err, DecompileError::StackUnderflow { .. }));
    assert_eq!(err.offset(), Some(base + 5));
    assert_eq!(err.opcode(), Some(0x05));
}

#[test]
fn test_truncated_instruction() {
    let (err, base) = fail(&[0x41, 0x01, 0x81, 0x00]);
    assert!(matches!(err, DecompileError::TruncatedInstruction { opcode: 0x81, .. }));
    assert_eq!(err.offset(), Some(base + 2));
}

#[test]
fn test_unmatched_tell_end() {
    let (err, base) = fail(&[0x1d]);
    assert!(matches!(err, DecompileError::UnmatchedTellEnd { .. }));
    assert_eq!(err.offset(), Some(base));
}

#[test]
fn test_constant_index_out_of_range() {
    let (err, base) = fail(&[0x44, 0x06]);
    match err {
        DecompileError::IndexOutOfRange {
            offset,
            opcode,
            table,
            index,
        } => {
            assert_eq!(offset, base);
            assert_eq!(opcode, 0x44);
            assert_eq!(table, "constants");
            assert_eq!(index, 1);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_non_list_call_arguments() {
    let (err, _) = fail(&[0x41, 0x01, 0x57, 0x01]);
    assert!(matches!(err, DecompileError::UnexpectedOperand { opcode: 0x57, .. }));
}

#[test]
fn test_stray_jump_is_unresolved() {
    let (err, base) = fail(&[0x93, 0x00, 0x03, 0x01]);
    match err {
        DecompileError::UnresolvedJump { position, address } => {
            assert_eq!(position, base);
            assert_eq!(address, base + 3);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_bad_lscr_size() {
    let names = names();
    let mut lscr = ScriptBuilder::new()
        .handler(Handler::new(names.id("h"), &[0x01]))
        .build()
        .lscr;
    lscr[11] = lscr[11].wrapping_add(1);
    let err = decompile(&names.lnam(), &lscr).unwrap_err();
    assert!(matches!(&err, DecompileError::MalformedChunk(message) if message.contains("Bad file size!")));
    assert_eq!(err.offset(), None);
}

#[test]
fn test_bad_lnam_size() {
    let names = names();
    let lscr = ScriptBuilder::new()
        .handler(Handler::new(names.id("h"), &[0x01]))
        .build()
        .lscr;
    let mut lnam = names.lnam();
    lnam[15] = lnam[15].wrapping_add(1);
    let err = decompile(&lnam, &lscr).unwrap_err();
    assert!(matches!(&err, DecompileError::MalformedChunk(message) if message.starts_with("Bad file size!")));
}

#[test]
fn test_unknown_constant_type() {
    let names = names();
    let mut lscr = ScriptBuilder::new()
        .constant(Constant::Int(1))
        .handler(Handler::new(names.id("h"), &[0x01]))
        .build()
        .lscr;
    // header, then one handler record, then the constant record
    let record = 92 + 42;
    lscr[record] = 0x00;
    lscr[record + 1] = 0x07;
    let err = decompile(&names.lnam(), &lscr).unwrap_err();
    assert!(matches!(&err, DecompileError::MalformedChunk(message) if message == "Unknown constant type!"));
}

#[test]
fn test_names_past_the_table_render_as_noname() {
    let names = names();
    let lscr = ScriptBuilder::new()
        .global(9)
        .handler(Handler::new(names.id("h"), &[0x01]))
        .build()
        .lscr;
    let script = decompile(&names.lnam(), &lscr).unwrap();
    assert_eq!(script.global_vars, vec!["noname".to_string()]);
}
