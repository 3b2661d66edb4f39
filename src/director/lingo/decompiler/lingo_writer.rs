// Lingo source generator

use itertools::Itertools;

use super::ast::*;
use super::code_writer::{CodeWriter, DEFAULT_INDENT};
use super::enums::UnaryOpType;
use crate::director::lingo::constants::{is_list_function, KNOWN_SYMBOLS, PREDEFINED_CONSTANTS};

pub fn generate_lingo(script: &Script) -> String {
    generate_lingo_with_indent(script, DEFAULT_INDENT)
}

pub fn generate_lingo_with_indent(script: &Script, indent: &str) -> String {
    let mut code = CodeWriter::with_indent_unit(indent);
    write_script(&mut code, script);
    code.into_string()
}

pub fn write_script(code: &mut CodeWriter, script: &Script) {
    if !script.properties.is_empty() {
        code.writeln(&format!("property {}", script.properties.join(", ")));
    }
    if !script.global_vars.is_empty() {
        for global in &script.global_vars {
            code.writeln(&format!("global {}", global));
        }
        code.end_line();
    }

    for (i, function) in script.functions.iter().enumerate() {
        if i > 0 {
            code.end_line();
        }
        write_function(code, function, &script.global_vars);
    }
}

fn write_function(code: &mut CodeWriter, function: &Function, script_globals: &[String]) {
    let params = function.parameter_names();
    if params.is_empty() {
        code.writeln(&format!("on {}", function.name));
    } else {
        code.writeln(&format!("on {} {}", function.name, params.join(", ")));
    }

    code.indent();
    let globals = function
        .global_vars
        .iter()
        .filter(|global| !script_globals.contains(global))
        .sorted()
        .collect_vec();
    for global in &globals {
        code.writeln(&format!("global {}", global));
    }
    if !globals.is_empty() {
        code.end_line();
    }

    for st in function.body() {
        write_statement(code, &st.node);
    }
    code.unindent();
    code.writeln("end");
}

fn write_block(code: &mut CodeWriter, body: &[Statement]) {
    code.indent();
    for st in body {
        write_statement(code, &st.node);
    }
    code.unindent();
}

pub fn write_statement(code: &mut CodeWriter, node: &AstNode) {
    match node {
        AstNode::Repeat(repeat) => {
            code.writeln(&repeat_header(repeat));
            write_block(code, &repeat.body);
            code.writeln("end repeat");
        }
        AstNode::If(block) => {
            code.writeln(&format!("if {} then", render_expression(&block.condition)));
            write_block(code, &block.then_body);
            if !block.else_body.is_empty() {
                code.writeln("else");
                write_block(code, &block.else_body);
            }
            code.writeln("end if");
        }
        AstNode::Tell { target, body } => {
            code.writeln(&format!("tell {}", render_expression(target)));
            write_block(code, body);
            code.writeln("end tell");
        }
        AstNode::Call { name, args, .. } => code.writeln(&render_call(name, args, true)),
        other => code.writeln(&render_expression(other)),
    }
}

fn repeat_header(repeat: &Repeat) -> String {
    match &repeat.kind {
        RepeatKind::While => {
            let condition = render_expression(&repeat.condition);
            format!("repeat while {}", strip_parens(&condition))
        }
        RepeatKind::For {
            variable,
            start,
            end,
            up,
        } => format!(
            "repeat with {} = {} {} {}",
            variable,
            render_expression(start),
            if *up { "to" } else { "down to" },
            render_expression(end)
        ),
        RepeatKind::ForIn { variable, list } => {
            format!("repeat with {} in {}", variable, render_expression(list))
        }
    }
}

/// Drops one pair of outer parentheses from a rendered binary operation.
fn strip_parens(text: &str) -> &str {
    match text.strip_prefix('(') {
        Some(inner) => {
            let mut chars = inner.chars();
            chars.next_back();
            chars.as_str()
        }
        None => text,
    }
}

fn render_args(name: &str, args: &[NodeRef]) -> Vec<String> {
    let global_as_symbol = is_list_function(name);
    args.iter()
        .enumerate()
        .map(|(i, arg)| match arg.as_ref() {
            AstNode::Symbol(leaf) if i == 0 && global_as_symbol => leaf.name.clone(),
            _ => render_expression(arg),
        })
        .collect()
}

/// Calls read as commands at statement level and as functions in expressions.
fn render_call(name: &str, args: &[NodeRef], statement: bool) -> String {
    if args.is_empty() {
        return name.to_owned();
    }
    if name == "sound" {
        let channel = match args[0].name() {
            Some(name) => name.to_owned(),
            None => render_expression(&args[0]),
        };
        let rest = render_args(name, &args[1..]);
        return format!("sound {} {}", channel, rest.join(", "));
    }
    let params = render_args(name, args).join(", ");
    if statement {
        format!("{} {}", name, params)
    } else {
        format!("{}({})", name, params)
    }
}

fn render_list_pairs(list: &AstNode) -> String {
    match list {
        AstNode::LoadList { args, .. } if !args.is_empty() => args
            .iter()
            .tuples()
            .map(|(key, value)| format!("{}: {}", render_expression(key), render_expression(value)))
            .join(", "),
        AstNode::LoadList { .. } => ":".to_owned(),
        other => render_expression(other),
    }
}

pub fn render_expression(node: &AstNode) -> String {
    match node {
        AstNode::Constant(leaf) => PREDEFINED_CONSTANTS
            .get(leaf.name.as_str())
            .map(|constant| constant.to_string())
            .unwrap_or_else(|| leaf.name.clone()),
        AstNode::Symbol(leaf) => {
            if KNOWN_SYMBOLS.contains(&leaf.name.as_str()) {
                leaf.name.clone()
            } else {
                format!("#{}", leaf.name)
            }
        }
        AstNode::PropertyName(leaf) => {
            if leaf.name == "ancestor" {
                leaf.name.clone()
            } else {
                format!("the {}", leaf.name)
            }
        }
        AstNode::DefinedPropertyName(leaf)
        | AstNode::LocalVariable(leaf)
        | AstNode::GlobalVariable(leaf)
        | AstNode::ParameterName(leaf)
        | AstNode::Raw(leaf) => leaf.name.clone(),
        AstNode::DateTimeFunction(leaf) => format!("the {}", leaf.name),
        AstNode::Menu(leaf) => format!("menu {}", leaf.name),
        AstNode::MenuItem(leaf) => format!("menuItem {}", leaf.name),
        AstNode::SoundChannel(leaf) => format!("sound {}", leaf.name),
        AstNode::Sprite(leaf) => format!("sprite {}", leaf.name),
        AstNode::Cast(leaf) => format!("cast {}", leaf.name),

        AstNode::Unary { op, operand } => match op {
            UnaryOpType::Minus => format!("-{}", render_expression(operand)),
            _ => format!("{} {}", op.name(), render_expression(operand)),
        },
        AstNode::Binary { op, left, right } => {
            if op.is_sprite_predicate() {
                format!(
                    "sprite {} {} {}",
                    render_expression(left),
                    op.lingo_symbol(),
                    render_expression(right)
                )
            } else {
                format!(
                    "({} {} {})",
                    render_expression(left),
                    op.lingo_symbol(),
                    render_expression(right)
                )
            }
        }
        AstNode::Assign { left, right } => {
            let left = render_expression(left);
            let right = render_expression(right);
            if left.starts_with("field(") && left.ends_with(')') {
                format!("put {} into {}", right, left)
            } else {
                format!("set {} = {}", left, right)
            }
        }
        AstNode::SpAssign { mode, left, right } => format!(
            "put {} {} {}",
            render_expression(right),
            mode.name(),
            render_expression(left)
        ),
        AstNode::StringOp { chunk, start, end, of } => match end {
            Some(end) => format!(
                "{} {} to {} of {}",
                chunk.name(),
                render_expression(start),
                render_expression(end),
                render_expression(of)
            ),
            None => format!("{} {} of {}", chunk.name(), render_expression(start), render_expression(of)),
        },
        AstNode::UnaryString { op, chunk, of } => match chunk {
            Some(chunk) if *op == UnaryOpType::Last => {
                format!("the last {} of {}", chunk, render_expression(of))
            }
            Some(chunk) => format!("the {} of {}s of {}", op.name(), chunk, render_expression(of)),
            None => format!("the {} of {}", op.name(), render_expression(of)),
        },
        AstNode::PropertyAccessor { object, property } => {
            let object = render_expression(object);
            if object == "me" {
                property.clone()
            } else if object.starts_with('_') || object == "tell_obj" {
                format!("the {}", property)
            } else {
                format!("the {} of {}", property, object)
            }
        }
        AstNode::KeyPropertyAccessor { property } => format!("the {}", property),
        AstNode::MenuitemAccessor { menu, item } => {
            format!("{} of {}", render_expression(item), render_expression(menu))
        }
        AstNode::MenuitemsAccessor { menu } => format!("menuItems of {}", render_expression(menu)),
        AstNode::LoadList { args, .. } => args.iter().map(|arg| render_expression(arg)).join(", "),
        AstNode::ToList { list } => format!("[{}]", render_expression(list)),
        AstNode::ToDict { list } => format!("[{}]", render_list_pairs(list)),
        AstNode::Call { name, args, .. } => render_call(name, args, false),
        AstNode::CallMethod {
            name, object, args, ..
        } => format!(
            "tell {} to {}({})",
            render_expression(object),
            name,
            args.iter().map(|arg| render_expression(arg)).join(", ")
        ),
        AstNode::ExitRepeat => "exit repeat".to_owned(),
        // Only hand-built trees get here: decompilation fails with
        // `UnresolvedJump` before rendering any leftover marker.
        AstNode::Jump { address } => format!("-- jump {:#x}", address),
        AstNode::Jz { condition, address } => {
            format!("-- jz {:#x} {}", address, render_expression(condition))
        }
        AstNode::Repeat(_) | AstNode::If(_) | AstNode::Tell { .. } => {
            let mut code = CodeWriter::new();
            write_statement(&mut code, node);
            code.into_string().trim_end().to_owned()
        }
    }
}
