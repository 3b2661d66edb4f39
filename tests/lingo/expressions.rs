use lingo_decompiler::{generate_js, generate_lingo};
use pretty_assertions::assert_eq;

use crate::builder::{decompile, Constant, Handler, NameTable, ScriptBuilder};

const ZERO_BOUNDS: [u8; 8] = [0x03; 8];

/// Decompiles a single handler named `h` and returns its Lingo and JS bodies,
/// one statement per line without indentation.
fn bodies(names: &NameTable, constants: Vec<Constant>, locals: &[&str], code: &[u8]) -> (String, String) {
    let mut builder = ScriptBuilder::new();
    for constant in constants {
        builder = builder.constant(constant);
    }
    let locals: Vec<u8> = locals.iter().map(|name| names.id(name)).collect();
    let script = decompile(
        names,
        builder.handler(Handler::new(names.id("h"), code).locals(&locals)),
    );
    (body_lines(&generate_lingo(&script)), body_lines(&generate_js(&script)))
}

/// Keeps the statement lines of a rendered handler.
fn body_lines(source: &str) -> String {
    source
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != "end" && *line != "}" && !line.starts_with("var "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_put_into_after_before() {
    let names = NameTable::new(&["h", "s"]);
    let mut code = vec![0x44, 0x00, 0x52, 0x00];
    for sub in [0x25, 0x35] {
        code.extend([0x44, 0x06]);
        code.extend(ZERO_BOUNDS);
        code.extend([0x41, 0x00, 0x5a, sub]);
    }
    let (lingo, js) = bodies(
        &names,
        vec![Constant::Str("hello"), Constant::Str("!")],
        &["s"],
        &code,
    );
    assert_eq!(
        lingo,
        "set s = \"hello\"\nput \"!\" after s\nput \"!\" before s"
    );
    assert_eq!(
        js,
        "s = new LingoString(\"hello\");\ns = s + new LingoString(\"!\");\ns = new LingoString(\"!\") + s;"
    );
}

#[test]
fn test_put_into_field() {
    let names = NameTable::new(&["h"]);
    let mut code = vec![0x44, 0x00];
    code.extend(ZERO_BOUNDS);
    code.extend([0x41, 0x01, 0x5a, 0x06]);
    let (lingo, js) = bodies(&names, vec![Constant::Str("hi")], &[], &code);
    assert_eq!(lingo, "put \"hi\" into field 1");
    assert_eq!(js, "field(1).text = new LingoString(\"hi\");");
}

#[test]
fn test_string_chunks() {
    let names = NameTable::new(&["h", "s", "c"]);
    let mut code = vec![0x41, 0x02];
    code.extend([0x03; 7]);
    code.extend([0x4c, 0x00, 0x17, 0x52, 0x06]);
    let (lingo, js) = bodies(&names, vec![], &["s", "c"], &code);
    assert_eq!(lingo, "set c = char 2 of s");
    assert_eq!(js, "c = s.getProp(\"char\", 2);");
}

#[test]
fn test_word_range_delete() {
    let names = NameTable::new(&["h", "s"]);
    // first/last char, then first/last word
    let mut code = vec![0x03, 0x03, 0x41, 0x01, 0x41, 0x03];
    code.extend([0x03; 4]);
    code.extend([0x4c, 0x00, 0x5b, 0x02]);
    let (lingo, js) = bodies(&names, vec![], &["s"], &code);
    assert_eq!(lingo, "delete word 1 to 3 of s");
    assert_eq!(js, "delete(s.getPropRef(\"word\", 1, 3));");
}

#[test]
fn test_sprite_properties() {
    let names = NameTable::new(&["h", "x"]);
    #[rustfmt::skip]
    let code = [
        0x41, 0x03, 0x41, 0x0d, 0x5c, 0x06, 0x52, 0x00,   // x = locH of sprite 3
        0x41, 0x03, 0x41, 0x64, 0x41, 0x0e, 0x5d, 0x06,   // locV of sprite 3 = 100
    ];
    let (lingo, js) = bodies(&names, vec![], &["x"], &code);
    assert_eq!(
        lingo,
        "set x = the locH of sprite 3\nset the locV of sprite 3 = 100"
    );
    assert_eq!(js, "x = sprite(3).locH;\nsprite(3).locV = 100;");
}

#[test]
fn test_system_and_key_properties() {
    let names = NameTable::new(&["h", "x", "keyCode"]);
    #[rustfmt::skip]
    let code = [
        0x41, 0x01, 0x5c, 0x07, 0x52, 0x00,
        0x42, 0x00, 0x66, names.id("keyCode"), 0x52, 0x00,
    ];
    let (lingo, js) = bodies(&names, vec![], &["x"], &code);
    assert_eq!(lingo, "set x = the beepOn\nset x = the keyCode");
    assert_eq!(js, "x = _movie.beepOn;\nx = _key.keyCode;");
}

#[test]
fn test_calls_with_and_without_results() {
    let names = NameTable::new(&["h", "x", "abs", "alert"]);
    #[rustfmt::skip]
    let code = [
        0x41, 0x02, 0x43, 0x01, 0x57, names.id("abs"), 0x52, 0x00,
        0x4c, 0x00, 0x42, 0x01, 0x57, names.id("alert"),
    ];
    let (lingo, js) = bodies(&names, vec![], &["x"], &code);
    assert_eq!(lingo, "set x = abs(2)\nalert x");
    assert_eq!(js, "x = abs(2);\nalert(x);");
}

#[test]
fn test_sound_and_go_commands() {
    let names = NameTable::new(&["h", "playFile", "sound", "next", "go"]);
    #[rustfmt::skip]
    let code = [
        0x45, names.id("playFile"), 0x41, 0x01, 0x42, 0x02, 0x57, names.id("sound"),
        0x45, names.id("next"), 0x42, 0x01, 0x57, names.id("go"),
    ];
    let (lingo, js) = bodies(&names, vec![], &[], &code);
    assert_eq!(lingo, "sound playFile 1\ngo next");
    assert_eq!(js, "sound(symbol('playFile'), 1);\n_movie.goNext();");
}

#[test]
fn test_list_literals() {
    let names = NameTable::new(&["h", "p", "a"]);
    #[rustfmt::skip]
    let code = [
        0x45, names.id("a"), 0x41, 0x01, 0x43, 0x02, 0x1f, 0x52, 0x00,
        0x41, 0x01, 0x41, 0x02, 0x43, 0x02, 0x1e, 0x52, 0x00,
        0x43, 0x00, 0x1f, 0x52, 0x00,
    ];
    let (lingo, js) = bodies(&names, vec![], &["p"], &code);
    assert_eq!(lingo, "set p = [#a: 1]\nset p = [1, 2]\nset p = [:]");
    assert_eq!(
        js,
        "p = propList(symbol('a'), 1);\np = list(1, 2);\np = propList();"
    );
}

#[test]
fn test_method_calls_take_their_receiver_last() {
    let names = NameTable::new(&["h", "o", "setPos"]);
    #[rustfmt::skip]
    let code = [
        0x41, 0x05, 0x41, 0x07, 0x4c, 0x00, 0x42, 0x03, 0x1e, 0x67, names.id("setPos"),
    ];
    let (lingo, js) = bodies(&names, vec![], &["o"], &code);
    assert_eq!(lingo, "tell o to setPos(5, 7)");
    assert_eq!(js, "o.setPos(5, 7);");
}

#[test]
fn test_global_call_reads_matching_symbol_as_global() {
    let names = NameTable::new(&["h", "x", "gList", "findPos"]);
    #[rustfmt::skip]
    let code = [
        0x45, names.id("gList"), 0x41, 0x07, 0x43, 0x02,
        0x46, names.id("findPos"),
        0x58, names.id("gList"),
        0x52, 0x00,
    ];
    let (lingo, js) = bodies(&names, vec![], &["x"], &code);
    assert_eq!(lingo, "set x = findPos(gList, 7)");
    assert_eq!(js, "x = findPos(_global.gList, 7);");
}

#[test]
fn test_arithmetic_and_logic() {
    let names = NameTable::new(&["h", "x"]);
    #[rustfmt::skip]
    let code = [
        0x41, 0x02, 0x41, 0x03, 0x04, 0x09, 0x52, 0x00,    // -(2 * 3)
        0x4c, 0x00, 0x41, 0x00, 0x0e, 0x14, 0x52, 0x00,    // not (x <> 0)
    ];
    let (lingo, js) = bodies(&names, vec![], &["x"], &code);
    assert_eq!(lingo, "set x = -(2 * 3)\nset x = not (x <> 0)");
    assert_eq!(js, "x = -((2 * 3));\nx = !((x != 0));");
}
