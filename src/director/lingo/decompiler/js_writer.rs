// JavaScript source generator
//
// Statements are first rendered into a nested writer so the whole text,
// including the lines of any block it opens, can be post-processed before it
// lands in the output.

use itertools::Itertools;

use super::ast::*;
use super::code_writer::{CodeWriter, DEFAULT_INDENT};
use super::enums::{PutType, UnaryOpType};
use crate::director::lingo::constants::{is_list_function, JS_PROPERTY_OWNERS};

pub fn generate_js(script: &Script) -> String {
    generate_js_with_indent(script, DEFAULT_INDENT)
}

pub fn generate_js_with_indent(script: &Script, indent: &str) -> String {
    let mut code = CodeWriter::with_indent_unit(indent);
    write_script(&mut code, script);
    code.into_string()
}

/// Rendering options shared by every node of one script.
struct JsScope<'a> {
    factory: Option<&'a str>,
    handlers: Vec<&'a str>,
}

impl<'a> JsScope<'a> {
    fn new(script: &'a Script) -> Self {
        Self {
            factory: script.factory.as_deref(),
            handlers: script.functions.iter().map(|function| function.name.as_str()).collect(),
        }
    }

    fn in_factory(&self) -> bool {
        self.factory.is_some()
    }

    fn is_method(&self, name: &str) -> bool {
        self.in_factory() && self.handlers.contains(&name)
    }
}

pub fn write_script(code: &mut CodeWriter, script: &Script) {
    let scope = JsScope::new(script);
    match scope.factory {
        Some(factory) => write_factory(code, script, factory, &scope),
        None => {
            for (i, function) in script.functions.iter().enumerate() {
                if i > 0 {
                    code.end_line();
                }
                code.writeln(&format!(
                    "function {}({}) {{",
                    js_function_name(&function.name),
                    function.parameter_names().join(", ")
                ));
                write_function_body(code, function, &scope);
                code.writeln("}");
            }
        }
    }
}

fn write_factory(code: &mut CodeWriter, script: &Script, factory: &str, scope: &JsScope) {
    code.writeln(&format!("class Factory__{} extends FactoryBase {{", factory));
    code.indent();
    for (i, function) in script.functions.iter().enumerate() {
        if i > 0 {
            code.end_line();
        }
        code.writeln(&format!(
            "{}({}) {{",
            js_function_name(&function.name),
            function.parameter_names().join(", ")
        ));
        write_function_body(code, function, scope);
        code.writeln("}");
    }
    code.unindent();
    code.writeln("}");
    code.end_line();
    code.writeln(&format!("function {}(methodName, ...args) {{", factory));
    code.indent();
    code.writeln(&format!("return factoryCall('{}', methodName, args);", factory));
    code.unindent();
    code.writeln("}");
}

fn js_function_name(name: &str) -> &str {
    if name == "new" {
        "birth"
    } else {
        name
    }
}

fn write_function_body(code: &mut CodeWriter, function: &Function, scope: &JsScope) {
    code.indent();
    let locals = function.local_names();
    for local in &locals {
        code.writeln(&format!("var {};", local));
    }
    if !locals.is_empty() {
        code.end_line();
    }
    for st in function.body() {
        write_statement(code, &st.node, scope);
    }
    code.unindent();
}

fn write_statement(code: &mut CodeWriter, node: &AstNode, scope: &JsScope) {
    let mut inner = code.nested();
    write_statement_text(&mut inner, node, scope);
    let text = finish_statement(inner.into_string());
    code.write(&text);
    code.end_line();
}

fn write_block(code: &mut CodeWriter, body: &[Statement], scope: &JsScope) {
    code.indent();
    for st in body {
        write_statement(code, &st.node, scope);
    }
    code.unindent();
}

fn write_statement_text(code: &mut CodeWriter, node: &AstNode, scope: &JsScope) {
    match node {
        AstNode::Repeat(repeat) => {
            code.write(&repeat_header(repeat, scope));
            code.end_line();
            write_block(code, &repeat.body, scope);
            code.write("}");
        }
        AstNode::If(block) => {
            code.write(&format!("if {} {{", wrap_parens(render_js(&block.condition, scope))));
            code.end_line();
            write_block(code, &block.then_body, scope);
            if !block.else_body.is_empty() {
                code.write("} else {");
                code.end_line();
                write_block(code, &block.else_body, scope);
            }
            code.write("}");
        }
        AstNode::Tell { target, body } => {
            code.write(&format!("with {} {{", wrap_parens(render_js(target, scope))));
            code.end_line();
            write_block(code, body, scope);
            code.write("}");
        }
        other => code.write(&render_js(other, scope)),
    }
}

/// Chunk references read as values unless they are assigned or deleted, then
/// every statement that does not close a block gets its semicolon.
fn finish_statement(mut text: String) -> String {
    if let Some(index) = text.rfind("getPropRef") {
        if !text.starts_with("delete(") && !text[index..].contains('=') {
            text.replace_range(index..index + "getPropRef".len(), "getProp");
        }
    }
    if !text.ends_with('}') {
        text.push(';');
    }
    text
}

fn wrap_parens(text: String) -> String {
    if text.starts_with('(') {
        text
    } else {
        format!("({})", text)
    }
}

fn repeat_header(repeat: &Repeat, scope: &JsScope) -> String {
    let condition = wrap_parens(render_js(&repeat.condition, scope));
    match &repeat.kind {
        RepeatKind::While => format!("while {} {{", condition),
        RepeatKind::For {
            variable,
            start,
            up,
            ..
        } => {
            let mut inner = condition.chars();
            inner.next();
            inner.next_back();
            format!(
                "for({} = {}; {}; {}{}) {{",
                variable,
                render_js(start, scope),
                inner.as_str(),
                variable,
                if *up { "++" } else { "--" }
            )
        }
        RepeatKind::ForIn { variable, list } => {
            format!("for({} of {}) {{", variable, render_js(list, scope))
        }
    }
}

/// Appends `.text` to every `field(...)` reference, matching up to the first
/// closing parenthesis.
fn field_text(text: &str) -> String {
    const OPEN: &str = "field(";
    let mut out = String::with_capacity(text.len() + 8);
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        match after.find(')') {
            Some(close) if close > 0 => {
                let end = start + OPEN.len() + close + 1;
                out.push_str(&rest[..end]);
                out.push_str(".text");
                rest = &rest[end..];
            }
            _ => {
                out.push_str(&rest[..start + OPEN.len()]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn render_args(name: &str, args: &[NodeRef], scope: &JsScope) -> String {
    let global_as_symbol = is_list_function(name);
    args.iter()
        .enumerate()
        .map(|(i, arg)| match arg.as_ref() {
            AstNode::Symbol(leaf) if i == 0 && global_as_symbol => leaf.name.clone(),
            _ => render_js(arg, scope),
        })
        .join(", ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn render_call(name: &str, args: &[NodeRef], in_tell: bool, scope: &JsScope) -> String {
    let mut params = render_args(name, args, scope);
    let callee = match name {
        "birth" => "_movie.newScript".to_owned(),
        "new" if params.starts_with("symbol(") => "_movie.newMember".to_owned(),
        "new" => "_movie.newScript".to_owned(),
        "go" => {
            let prefix = if in_tell { "" } else { "_movie." };
            match params
                .strip_prefix("symbol('")
                .and_then(|rest| rest.get(..rest.len().checked_sub(2)?))
            {
                Some(target) => {
                    let callee = format!("{}go{}", prefix, capitalize(target));
                    params.clear();
                    callee
                }
                None => format!("{}go", prefix),
            }
        }
        "cast" => "member".to_owned(),
        "continue" => "resume".to_owned(),
        "return" => {
            return if params.is_empty() {
                "return".to_owned()
            } else {
                format!("return {}", params)
            };
        }
        other if scope.is_method(other) => format!("this.{}", other),
        other => other.to_owned(),
    };
    format!("{}({})", callee, params)
}

fn render_js(node: &AstNode, scope: &JsScope) -> String {
    match node {
        AstNode::Constant(leaf) => {
            if leaf.name.starts_with('"') {
                format!("new LingoString({})", leaf.name)
            } else {
                leaf.name.clone()
            }
        }
        AstNode::Symbol(leaf) => format!("symbol('{}')", leaf.name),
        AstNode::LocalVariable(leaf) | AstNode::ParameterName(leaf) => leaf.name.clone(),
        AstNode::Raw(leaf) => {
            if leaf.name == "me" && scope.in_factory() {
                "this".to_owned()
            } else {
                leaf.name.clone()
            }
        }
        AstNode::GlobalVariable(leaf) => format!("_global.{}", leaf.name),
        AstNode::PropertyName(leaf) | AstNode::DefinedPropertyName(leaf) => {
            let owner = JS_PROPERTY_OWNERS.get(leaf.name.as_str()).copied().unwrap_or("me");
            let owner = if owner == "me" && scope.in_factory() {
                "this"
            } else {
                owner
            };
            format!("{}.{}", owner, leaf.name)
        }
        AstNode::DateTimeFunction(leaf) => format!("_system.date('{}')", leaf.name),
        AstNode::Menu(leaf) => format!("_menuBar.menu[{}]", leaf.name),
        AstNode::MenuItem(leaf) => format!("item[{}]", leaf.name),
        AstNode::SoundChannel(leaf) => format!("sound({})", leaf.name),
        AstNode::Sprite(leaf) => format!("sprite({})", leaf.name),
        AstNode::Cast(leaf) => format!("member({})", leaf.name),

        AstNode::Unary { op, operand } => format!("{}({})", op.js_name(), render_js(operand, scope)),
        AstNode::Binary { op, left, right } => {
            let symbol = op.js_symbol();
            if symbol.starts_with('.') {
                format!(
                    "sprite({}){}(sprite({}))",
                    render_js(left, scope),
                    symbol,
                    render_js(right, scope)
                )
            } else {
                format!("({} {} {})", render_js(left, scope), symbol, render_js(right, scope))
            }
        }
        AstNode::Assign { left, right } => {
            format!("{} = {}", render_js(left, scope), render_js(right, scope))
        }
        AstNode::SpAssign { mode, left, right } => {
            let mut left = render_js(left, scope);
            if left.starts_with("field(") && left.ends_with(')') {
                left = field_text(&left);
            }
            let right = render_js(right, scope);
            match mode {
                PutType::After => format!("{} = {} + {}", left, left, right),
                PutType::Before => format!("{} = {} + {}", left, right, left),
                PutType::Into => format!("{} = {}", left, right),
            }
        }
        AstNode::StringOp { chunk, start, end, of } => match end {
            Some(end) => format!(
                "{}.getPropRef(\"{}\", {}, {})",
                render_js(of, scope),
                chunk.name(),
                render_js(start, scope),
                render_js(end, scope)
            ),
            None => format!(
                "{}.getPropRef(\"{}\", {})",
                render_js(of, scope),
                chunk.name(),
                render_js(start, scope)
            ),
        },
        AstNode::UnaryString { op, chunk, of } => match chunk {
            Some(chunk) if *op == UnaryOpType::Last => {
                format!("{}.getProp(\"{}\", \"last\")", render_js(of, scope), chunk)
            }
            Some(chunk) => format!("{}.{}.{}", render_js(of, scope), chunk, op.js_name()),
            None => {
                let of = if of.name() == Some("menus") {
                    "_menuBar.menu".to_owned()
                } else {
                    render_js(of, scope)
                };
                format!("{}.{}", of, op.js_name())
            }
        },
        AstNode::PropertyAccessor { object, property } => {
            let object = render_js(object, scope);
            if object == "tell_obj" {
                property.clone()
            } else {
                format!("{}.{}", object, property)
            }
        }
        AstNode::KeyPropertyAccessor { property } => match property.as_str() {
            "date" | "time" => format!("_system.date('{}')", property),
            _ => format!("_key.{}", property),
        },
        AstNode::MenuitemAccessor { menu, item } => {
            format!("{}.{}", render_js(menu, scope), render_js(item, scope))
        }
        AstNode::MenuitemsAccessor { menu } => format!("{}.item", render_js(menu, scope)),
        AstNode::LoadList { args, .. } => args.iter().map(|arg| render_js(arg, scope)).join(", "),
        AstNode::ToList { list } => format!("list({})", render_js(list, scope)),
        AstNode::ToDict { list } => format!("propList({})", render_js(list, scope)),
        AstNode::Call {
            name, args, in_tell, ..
        } => render_call(name, args, *in_tell, scope),
        AstNode::CallMethod {
            name, object, args, ..
        } => format!(
            "{}.{}({})",
            render_js(object, scope),
            name,
            args.iter().map(|arg| render_js(arg, scope)).join(", ")
        ),
        AstNode::ExitRepeat => "break".to_owned(),
        // Unreachable from `decompile_script`, see `control_flow::ensure_resolved`.
        AstNode::Jump { address } => format!("/* jump {:#x} */", address),
        AstNode::Jz { condition, address } => {
            format!("/* jz {:#x} {} */", address, render_js(condition, scope))
        }
        AstNode::Repeat(_) | AstNode::If(_) | AstNode::Tell { .. } => {
            let mut code = CodeWriter::new();
            write_statement_text(&mut code, node, scope);
            code.into_string()
        }
    }
}
