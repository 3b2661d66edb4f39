use lingo_decompiler::{
    decompile_with, generate_js, generate_lingo, render, DecompilerConfig, OutputTarget,
};
use pretty_assertions::assert_eq;

use crate::builder::{decompile, Constant, Handler, NameTable, ScriptBuilder};

#[test]
fn test_simple_assignment() {
    let names = NameTable::new(&["startMovie", "x"]);
    let script = decompile(
        &names,
        ScriptBuilder::new().handler(
            Handler::new(names.id("startMovie"), &[0x41, 0x05, 0x52, 0x00])
                .locals(&[names.id("x")]),
        ),
    );

    assert_eq!(generate_lingo(&script), "on startMovie\n    set x = 5\nend\n");
    assert_eq!(
        generate_js(&script),
        "function startMovie() {\n    var x;\n\n    x = 5;\n}\n"
    );
}

#[test]
fn test_counted_loop() {
    let names = NameTable::new(&["countUp", "i", "beep"]);
    #[rustfmt::skip]
    let code = [
        0x41, 0x01,             // push 1
        0x52, 0x00,             // set i
        0x4c, 0x00,             // loop: get i
        0x41, 0x0a,             // push 10
        0x0d,                   // <=
        0x95, 0x00, 0x10,       // jz end
        0x42, 0x00,
        0x57, names.id("beep"),
        0x41, 0x01,
        0x4c, 0x00,
        0x05,                   // 1 + i
        0x52, 0x00,             // set i
        0x54, 0x13,             // back to loop
        0x01,                   // end: exit
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new()
            .handler(Handler::new(names.id("countUp"), &code).locals(&[names.id("i")])),
    );

    assert_eq!(
        generate_lingo(&script),
        "on countUp\n    repeat with i = 1 to 10\n        beep\n    end repeat\nend\n"
    );
    assert_eq!(
        generate_js(&script),
        "function countUp() {\n    var i;\n\n    for(i = 1; i <= 10; i++) {\n        beep();\n    }\n}\n"
    );
}

#[test]
fn test_if_else_on_parameter() {
    let names = NameTable::new(&["check", "a", "beep", "halt"]);
    #[rustfmt::skip]
    let code = [
        0x4b, 0x00,             // get a
        0x41, 0x01,
        0x10,                   // >
        0x95, 0x00, 0x0a,       // jz else
        0x42, 0x00,
        0x57, names.id("beep"),
        0x93, 0x00, 0x07,       // jmp end
        0x42, 0x00,             // else:
        0x57, names.id("halt"),
        0x01,                   // end: exit
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new().handler(Handler::new(names.id("check"), &code).args(&[names.id("a")])),
    );

    assert_eq!(
        generate_lingo(&script),
        "on check a\n    if (a > 1) then\n        beep\n    else\n        halt\n    end if\nend\n"
    );
    assert_eq!(
        generate_js(&script),
        "function check(a) {\n    if (a > 1) {\n        beep();\n    } else {\n        halt();\n    }\n}\n"
    );
}

#[test]
fn test_repeat_while() {
    let names = NameTable::new(&["wait", "x"]);
    #[rustfmt::skip]
    let code = [
        0x4c, 0x00,             // loop: get x
        0x41, 0x05,
        0x0c,                   // <
        0x95, 0x00, 0x0c,       // jz end
        0x4c, 0x00,
        0x41, 0x01,
        0x05,                   // x + 1
        0x52, 0x00,
        0x54, 0x0f,             // back to loop
        0x01,
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new().handler(Handler::new(names.id("wait"), &code).locals(&[names.id("x")])),
    );

    assert_eq!(
        generate_lingo(&script),
        "on wait\n    repeat while x < 5\n        set x = (x + 1)\n    end repeat\nend\n"
    );
    assert_eq!(
        generate_js(&script),
        "function wait() {\n    var x;\n\n    while (x < 5) {\n        x = (x + 1);\n    }\n}\n"
    );
}

#[test]
fn test_tell_block() {
    let names = NameTable::new(&["act", "gWin", "go"]);
    #[rustfmt::skip]
    let code = [
        0x49, names.id("gWin"),
        0x1c,                   // tell
        0x41, 0x05,
        0x42, 0x01,
        0x63, names.id("go"),
        0x1d,                   // end tell
        0x01,
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new().handler(Handler::new(names.id("act"), &code)),
    );

    assert_eq!(
        generate_lingo(&script),
        "on act\n    global gWin\n\n    tell gWin\n        go 5\n    end tell\nend\n"
    );
    assert_eq!(
        generate_js(&script),
        "function act() {\n    with (_global.gWin) {\n        go(5);\n    }\n}\n"
    );
}

#[test]
fn test_if_inside_tell_block() {
    let names = NameTable::new(&["act", "gWin", "go"]);
    #[rustfmt::skip]
    let code = [
        0x49, names.id("gWin"),
        0x1c,                   // tell
        0x41, 0x01,
        0x95, 0x00, 0x09,       // jz end tell
        0x41, 0x05,
        0x42, 0x01,
        0x63, names.id("go"),
        0x1d,                   // end tell
        0x01,
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new().handler(Handler::new(names.id("act"), &code)),
    );

    assert_eq!(
        generate_lingo(&script),
        "on act\n    global gWin\n\n    tell gWin\n        if 1 then\n            go 5\n        end if\n    end tell\nend\n"
    );
    assert_eq!(
        generate_js(&script),
        "function act() {\n    with (_global.gWin) {\n        if (1) {\n            go(5);\n        }\n    }\n}\n"
    );
}

#[test]
fn test_repeat_inside_tell_block() {
    let names = NameTable::new(&["wait", "gWin", "x"]);
    #[rustfmt::skip]
    let code = [
        0x49, names.id("gWin"),
        0x1c,                   // tell
        0x4c, 0x00,             // loop: get x
        0x41, 0x05,
        0x0c,
        0x95, 0x00, 0x0c,       // jz end tell
        0x4c, 0x00,
        0x41, 0x01,
        0x05,
        0x52, 0x00,
        0x54, 0x0f,             // back to loop
        0x1d,                   // end tell
        0x01,
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new().handler(Handler::new(names.id("wait"), &code).locals(&[names.id("x")])),
    );

    assert_eq!(
        generate_lingo(&script),
        "on wait\n    global gWin\n\n    tell gWin\n        repeat while x < 5\n            set x = (x + 1)\n        end repeat\n    end tell\nend\n"
    );
    assert_eq!(
        generate_js(&script),
        "function wait() {\n    var x;\n\n    with (_global.gWin) {\n        while (x < 5) {\n            x = (x + 1);\n        }\n    }\n}\n"
    );
}

#[test]
fn test_script_header_globals_and_properties() {
    let names = NameTable::new(&["tick", "gCount", "pX"]);
    #[rustfmt::skip]
    let code = [
        0x49, names.id("gCount"),
        0x41, 0x01,
        0x05,
        0x4f, names.id("gCount"),
        0x49, names.id("gCount"),
        0x4f, names.id("gCount"),
        0x41, 0x03,
        0x50, names.id("pX"),
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new()
            .property(names.id("pX"))
            .global(names.id("gCount"))
            .handler(Handler::new(names.id("tick"), &code)),
    );

    assert_eq!(script.functions[0].global_vars, vec!["gCount".to_string()]);
    assert_eq!(
        generate_lingo(&script),
        "property pX\nglobal gCount\n\non tick\n    set gCount = (gCount + 1)\n    set gCount = gCount\n    set pX = 3\nend\n"
    );
    assert_eq!(
        generate_js(&script),
        "function tick() {\n    _global.gCount = (_global.gCount + 1);\n    _global.gCount = _global.gCount;\n    me.pX = 3;\n}\n"
    );
}

#[test]
fn test_handlers_are_separated_by_blank_lines() {
    let names = NameTable::new(&["one", "two"]);
    let script = decompile(
        &names,
        ScriptBuilder::new()
            .handler(Handler::new(names.id("one"), &[0x01]))
            .handler(Handler::new(names.id("two"), &[0x01])),
    );

    assert_eq!(generate_lingo(&script), "on one\nend\n\non two\nend\n");
    assert_eq!(
        generate_js(&script),
        "function one() {\n}\n\nfunction two() {\n}\n"
    );
}

#[test]
fn test_factory_class() {
    let names = NameTable::new(&["mNew", "mPut"]);
    let lscr = ScriptBuilder::new()
        .handler(Handler::new(names.id("mNew"), &[0x42, 0x00, 0x56, 0x01, 0x01]))
        .handler(Handler::new(names.id("mPut"), &[0x01]))
        .build()
        .lscr;
    let config = DecompilerConfig {
        indent_width: 2,
        ..DecompilerConfig::default()
    }
    .with_factory("Bird")
    .with_target(OutputTarget::Js);

    let script = decompile_with(&names.lnam(), &lscr, &config).unwrap();
    assert!(script.functions.iter().all(|function| function.is_method));
    assert_eq!(
        render(&script, &config),
        "class Factory__Bird extends FactoryBase {\n  mNew() {\n    this.mPut();\n  }\n\n  mPut() {\n  }\n}\n\nfunction Bird(methodName, ...args) {\n  return factoryCall('Bird', methodName, args);\n}\n"
    );
}

#[test]
fn test_render_honours_indent_width() {
    let names = NameTable::new(&["startMovie", "x"]);
    let lscr = ScriptBuilder::new()
        .handler(
            Handler::new(names.id("startMovie"), &[0x41, 0x05, 0x52, 0x00])
                .locals(&[names.id("x")]),
        )
        .build()
        .lscr;
    let config = DecompilerConfig::from_toml_str("indent_width = 1").unwrap();
    let script = decompile_with(&names.lnam(), &lscr, &config).unwrap();
    assert_eq!(render(&script, &config), "on startMovie\n set x = 5\nend\n");
}

#[test]
fn test_constant_table_layouts() {
    let names = NameTable::new(&["init", "a", "b", "c"]);
    #[rustfmt::skip]
    let code = [
        0x44, 0x00, 0x52, 0x00,
        0x44, 0x06, 0x52, 0x06,
        0x44, 0x0c, 0x52, 0x0c,
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new()
            .constant(Constant::Str("hello"))
            .constant(Constant::Int(70000))
            .constant(Constant::Float(1.5))
            .handler(
                Handler::new(names.id("init"), &code)
                    .locals(&[names.id("a"), names.id("b"), names.id("c")]),
            ),
    );
    assert_eq!(
        generate_lingo(&script),
        "on init\n    set a = \"hello\"\n    set b = 70000\n    set c = 1.5\nend\n"
    );

    #[rustfmt::skip]
    let wide_code = [
        0x44, 0x00, 0x52, 0x00,
        0x44, 0x08, 0x52, 0x06,
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new()
            .wide_constants()
            .constant(Constant::Str(""))
            .constant(Constant::Float(-2.0))
            .handler(
                Handler::new(names.id("init"), &wide_code)
                    .locals(&[names.id("a"), names.id("b")]),
            ),
    );
    assert_eq!(
        generate_lingo(&script),
        "on init\n    set a = EMPTY\n    set b = -2.0\nend\n"
    );
}

#[test]
fn test_rendering_is_idempotent() {
    let names = NameTable::new(&["wait", "x"]);
    let code = [
        0x4c, 0x00, 0x41, 0x05, 0x0c, 0x95, 0x00, 0x0c, 0x4c, 0x00, 0x41, 0x01, 0x05, 0x52,
        0x00, 0x54, 0x0f, 0x01,
    ];
    let script = decompile(
        &names,
        ScriptBuilder::new().handler(Handler::new(names.id("wait"), &code).locals(&[names.id("x")])),
    );
    assert_eq!(generate_lingo(&script), generate_lingo(&script));
    assert_eq!(generate_js(&script), generate_js(&script));
}
