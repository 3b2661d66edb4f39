use lingo_decompiler::{generate_js, generate_lingo};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::builder::{decompile, Handler, NameTable, ScriptBuilder};

const CALLS: [&str; 3] = ["c1", "c2", "c3"];

#[test]
fn test_if_inside_repeat_exits_the_loop() {
    let names = NameTable::new(&["h", "x"]);
    #[rustfmt::skip]
    let code = [
        0x4c, 0x00,             // loop: get x
        0x41, 0x05,
        0x0c,
        0x95, 0x00, 0x17,       // jz end
        0x4c, 0x00,
        0x41, 0x02,
        0x0f,
        0x95, 0x00, 0x06,       // jz next
        0x93, 0x00, 0x0c,       // jmp end
        0x4c, 0x00,             // next:
        0x41, 0x01,
        0x05,
        0x52, 0x00,
        0x54, 0x1a,             // back to loop
        0x01,                   // end: exit
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new().handler(Handler::new(names.id("h"), &code).locals(&[names.id("x")])),
    );

    assert_eq!(
        generate_lingo(&script),
        "on h\n    repeat while x < 5\n        if (x = 2) then\n            exit repeat\n        end if\n        set x = (x + 1)\n    end repeat\nend\n"
    );
    assert_eq!(
        generate_js(&script),
        "function h() {\n    var x;\n\n    while (x < 5) {\n        if (x == 2) {\n            break;\n        }\n        x = (x + 1);\n    }\n}\n"
    );
}

#[test]
fn test_repeat_with_in_list() {
    let names = NameTable::new(&["h", "v", "myList", "count", "getAt", "put"]);
    #[rustfmt::skip]
    let code = [
        0x41, 0x01,             // loop:
        0x4c, 0x06,             // get myList
        0x43, 0x01,
        0x57, names.id("count"),
        0x0d,
        0x95, 0x00, 0x15,       // jz end
        0x4c, 0x06,
        0x41, 0x01,
        0x43, 0x02,
        0x57, names.id("getAt"),
        0x52, 0x00,             // set v
        0x4c, 0x00,
        0x42, 0x01,
        0x57, names.id("put"),
        0x54, 0x1c,             // back to loop
        0x01,                   // end: exit
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new().handler(
            Handler::new(names.id("h"), &code).locals(&[names.id("v"), names.id("myList")]),
        ),
    );

    assert_eq!(
        generate_lingo(&script),
        "on h\n    repeat with v in myList\n        put v\n    end repeat\nend\n"
    );
    assert_eq!(
        generate_js(&script),
        "function h() {\n    var v;\n    var myList;\n\n    for(v of myList) {\n        put(v);\n    }\n}\n"
    );
}

#[derive(Clone, Debug)]
enum Block {
    Call(usize),
    If {
        then_blocks: Vec<Block>,
        else_blocks: Vec<Block>,
    },
    Tell(Vec<Block>),
}

fn block_strategy() -> impl Strategy<Value = Block> {
    let leaf = (0..CALLS.len()).prop_map(Block::Call);
    leaf.prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            (
                proptest::collection::vec(inner.clone(), 1..3),
                proptest::collection::vec(inner.clone(), 0..3),
            )
                .prop_map(|(then_blocks, else_blocks)| Block::If {
                    then_blocks,
                    else_blocks,
                }),
            proptest::collection::vec(inner, 1..3).prop_map(Block::Tell),
        ]
    })
}

/// Compiles blocks the way Director lays out `if` statements: a `jz` over the
/// then branch and, when there is an else branch, a `jmp` over it. Tell blocks
/// push their target and bracket the body with `0x1c`/`0x1d`.
fn compile(names: &NameTable, blocks: &[Block]) -> Vec<u8> {
    let mut code = vec![];
    for block in blocks {
        match block {
            Block::Call(index) => code.extend([0x42, 0x00, 0x57, names.id(CALLS[*index])]),
            Block::If {
                then_blocks,
                else_blocks,
            } => {
                let then_code = compile(names, then_blocks);
                let else_code = compile(names, else_blocks);
                let skip = if else_code.is_empty() { 0 } else { 3 };
                let jz = (3 + then_code.len() + skip) as u16;
                code.extend([0x41, 0x01, 0x95]);
                code.extend(jz.to_be_bytes());
                code.extend(then_code);
                if !else_code.is_empty() {
                    code.push(0x93);
                    code.extend(((3 + else_code.len()) as u16).to_be_bytes());
                    code.extend(else_code);
                }
            }
            Block::Tell(body) => {
                code.extend([0x49, names.id("gWin"), 0x1c]);
                code.extend(compile(names, body));
                code.push(0x1d);
            }
        }
    }
    code
}

fn has_tell(blocks: &[Block]) -> bool {
    blocks.iter().any(|block| match block {
        Block::Call(_) => false,
        Block::If {
            then_blocks,
            else_blocks,
        } => has_tell(then_blocks) || has_tell(else_blocks),
        Block::Tell(_) => true,
    })
}

fn expected_lingo(blocks: &[Block], depth: usize, out: &mut String) {
    let indent = "    ".repeat(depth);
    for block in blocks {
        match block {
            Block::Call(index) => {
                out.push_str(&format!("{}{}\n", indent, CALLS[*index]));
            }
            Block::If {
                then_blocks,
                else_blocks,
            } => {
                out.push_str(&format!("{}if 1 then\n", indent));
                expected_lingo(then_blocks, depth + 1, out);
                if !else_blocks.is_empty() {
                    out.push_str(&format!("{}else\n", indent));
                    expected_lingo(else_blocks, depth + 1, out);
                }
                out.push_str(&format!("{}end if\n", indent));
            }
            Block::Tell(body) => {
                out.push_str(&format!("{}tell gWin\n", indent));
                expected_lingo(body, depth + 1, out);
                out.push_str(&format!("{}end tell\n", indent));
            }
        }
    }
}

proptest! {
    #[test]
    fn test_every_jump_is_lifted(blocks in proptest::collection::vec(block_strategy(), 1..4)) {
        let names = NameTable::new(&["h", "c1", "c2", "c3", "gWin"]);
        let mut code = compile(&names, &blocks);
        code.push(0x01);
        let built = ScriptBuilder::new().handler(Handler::new(names.id("h"), &code)).build();
        let script = lingo_decompiler::decompile(&names.lnam(), &built.lscr)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let mut expected = String::from("on h\n");
        if has_tell(&blocks) {
            expected.push_str("    global gWin\n\n");
        }
        expected_lingo(&blocks, 1, &mut expected);
        expected.push_str("end\n");
        prop_assert_eq!(generate_lingo(&script), expected);
        prop_assert!(!generate_js(&script).contains("/* j"));
    }
}
