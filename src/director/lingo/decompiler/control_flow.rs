// Lingo bytecode decompiler - control flow recovery
//
// Works on the flat statement lists produced by the interpreter, where every
// statement is tagged with the offset of the instruction that emitted it and
// loops have already been cut out at their backward jumps.

use std::rc::Rc;

use log::trace;

use super::ast::*;
use super::enums::{BinaryOpType, UnaryOpType};
use super::error::DecompileError;

/// Runs every pass over a handler's top-level statements.
pub fn lift(statements: &mut Vec<Statement>) -> Result<(), DecompileError> {
    condition_detect(statements, None);
    loop_detect(statements);
    resolve_loop_exits(statements, None);
    ensure_resolved(statements)
}

/// Turns conditional jumps into if/else blocks. `loop_end` is the offset of
/// the backward jump of the innermost enclosing loop.
pub fn condition_detect(statements: &mut Vec<Statement>, loop_end: Option<usize>) {
    let mut conditions: Vec<usize> = vec![];
    let mut address: Option<usize> = None;
    let mut previous_jump: Option<usize> = None;
    let mut in_else = false;

    for st in statements.iter_mut() {
        match &mut st.node {
            AstNode::Repeat(repeat) => {
                let end = repeat.end_position;
                condition_detect(&mut repeat.body, Some(end));
            }
            AstNode::Tell { body, .. } => condition_detect(body, loop_end),
            _ => {}
        }

        if let Some(limit) = address {
            if st.position < limit {
                previous_jump = match st.node {
                    AstNode::Jump { address } => Some(address),
                    _ => None,
                };
                continue;
            }
        }

        if in_else {
            previous_jump = None;
            address = None;
            in_else = false;
        }

        if let Some(target) = previous_jump {
            address = Some(target);
            in_else = true;
            continue;
        }

        if let AstNode::Jz { address: target, .. } = st.node {
            address = Some(target);
            conditions.push(st.position);
            if loop_end.is_some_and(|end| end < target) {
                address = None;
            }
        }
    }

    for position in conditions {
        lift_condition(statements, position, loop_end);
    }
}

fn lift_condition(statements: &mut Vec<Statement>, position: usize, loop_end: Option<usize>) {
    let Some(index) = statements
        .iter()
        .position(|st| st.position == position && matches!(st.node, AstNode::Jz { .. }))
    else {
        return;
    };
    let (condition, end) = match &statements[index].node {
        AstNode::Jz { condition, address } => (condition.clone(), *address),
        _ => return,
    };

    if loop_end.is_some_and(|loop_end| loop_end < end) {
        trace!("jz at {:#x} leaves the loop", position);
        statements[index].node = AstNode::If(IfBlock {
            condition: Rc::new(AstNode::Unary {
                op: UnaryOpType::Not,
                operand: condition,
            }),
            then_body: vec![Statement::new(position, AstNode::ExitRepeat)],
            else_body: vec![],
        });
        return;
    }

    let count = statements[index + 1..]
        .iter()
        .take_while(|st| st.position < end)
        .count();
    let mut then_body: Vec<Statement> = statements.drain(index + 1..index + 1 + count).collect();
    break_detect(&mut then_body, loop_end);
    condition_detect(&mut then_body, loop_end);

    let mut else_body = vec![];
    let else_jump = match then_body.last() {
        Some(Statement {
            position,
            node: AstNode::Jump { address },
        }) => Some((*position, *address)),
        _ => None,
    };
    if let Some((else_start, else_end)) = else_jump {
        if loop_end.is_some_and(|loop_end| loop_end < else_end) {
            then_body.pop();
            then_body.push(Statement::new(else_start, AstNode::ExitRepeat));
        } else {
            let count = statements[index + 1..]
                .iter()
                .take_while(|st| st.position < else_end)
                .count();
            else_body = statements.drain(index + 1..index + 1 + count).collect();
            then_body.pop();
            break_detect(&mut else_body, loop_end);
            condition_detect(&mut else_body, loop_end);
        }
    }

    statements[index].node = AstNode::If(IfBlock {
        condition,
        then_body,
        else_body,
    });
}

/// A jump past the loop end just before a block's closing jump is an
/// `exit repeat`.
pub fn break_detect(statements: &mut [Statement], loop_end: Option<usize>) {
    let Some(end) = loop_end else {
        return;
    };
    let len = statements.len();
    if len < 2 {
        return;
    }
    let candidate = &mut statements[len - 2];
    if let AstNode::Jump { address } = candidate.node {
        if end < address {
            candidate.node = AstNode::ExitRepeat;
        }
    }
}

/// Recognises `repeat while`, `repeat with x = a to b` and
/// `repeat with x in list` in the generic loops built by the interpreter.
pub fn loop_detect(statements: &mut Vec<Statement>) {
    let mut removed: Vec<usize> = vec![];

    for i in 0..statements.len() {
        let (before, rest) = statements.split_at_mut(i);
        let previous = before.last();
        let st = &mut rest[0];

        match &mut st.node {
            AstNode::Repeat(repeat) => {
                detect_while(repeat);
                if let Some(previous) = previous {
                    if detect_for(repeat, previous) {
                        removed.push(i - 1);
                    }
                }
                detect_for_in(repeat);
                loop_detect(&mut repeat.body);
            }
            AstNode::If(block) => {
                loop_detect(&mut block.then_body);
                loop_detect(&mut block.else_body);
            }
            AstNode::Tell { body, .. } => loop_detect(body),
            _ => {}
        }
    }

    for index in removed.into_iter().rev() {
        statements.remove(index);
    }
}

fn detect_while(repeat: &mut Repeat) {
    let Some(first) = repeat.body.first() else {
        return;
    };
    let AstNode::If(block) = &first.node else {
        return;
    };
    if !block.else_body.is_empty() || block.then_body.len() != 1 {
        return;
    }
    if !matches!(block.then_body[0].node, AstNode::ExitRepeat) {
        return;
    }
    let AstNode::Unary {
        op: UnaryOpType::Not,
        operand,
    } = block.condition.as_ref()
    else {
        return;
    };
    repeat.condition = operand.clone();
    repeat.body.remove(0);
}

fn detect_for(repeat: &mut Repeat, previous: &Statement) -> bool {
    let AstNode::Assign {
        left: init_var,
        right: start,
    } = &previous.node
    else {
        return false;
    };
    let Some(variable) = init_var.name() else {
        return false;
    };
    let AstNode::Binary {
        left: cond_var,
        right: end,
        ..
    } = repeat.condition.as_ref()
    else {
        return false;
    };
    if cond_var.name() != Some(variable) {
        return false;
    }
    let Some(last) = repeat.body.last() else {
        return false;
    };
    let AstNode::Assign {
        left: inc_var,
        right: step,
    } = &last.node
    else {
        return false;
    };
    if inc_var.name() != Some(variable) {
        return false;
    }
    let AstNode::Binary {
        op: BinaryOpType::Add,
        left: increment,
        right: step_var,
    } = step.as_ref()
    else {
        return false;
    };
    if step_var.name() != Some(variable) {
        return false;
    }

    let up = !increment.is_constant("-1");
    repeat.kind = RepeatKind::For {
        variable: variable.to_owned(),
        start: start.clone(),
        end: end.clone(),
        up,
    };
    repeat.body.pop();
    true
}

fn detect_for_in(repeat: &mut Repeat) {
    let AstNode::Binary { left, right, .. } = repeat.condition.as_ref() else {
        return;
    };
    if !left.is_constant("1") || !right.is_call_named("count") {
        return;
    }
    let Some(count_target) = right.call_args().and_then(|args| args.first()) else {
        return;
    };
    let Some(first) = repeat.body.first() else {
        return;
    };
    let AstNode::Assign {
        left: var,
        right: get_at,
    } = &first.node
    else {
        return;
    };
    if !get_at.is_call_named("getAt") {
        return;
    }
    let Some([list, index, ..]) = get_at.call_args() else {
        return;
    };
    if !same_reference(count_target, list) || index.name() != Some("1") {
        return;
    }
    let Some(variable) = var.name() else {
        return;
    };

    repeat.kind = RepeatKind::ForIn {
        variable: variable.to_owned(),
        list: list.clone(),
    };
    repeat.body.remove(0);
}

/// Jumps still left inside a loop that target past its end are exits.
pub fn resolve_loop_exits(statements: &mut [Statement], loop_end: Option<usize>) {
    for st in statements.iter_mut() {
        match &mut st.node {
            AstNode::Jump { address } if loop_end.is_some_and(|end| end < *address) => {
                st.node = AstNode::ExitRepeat;
            }
            AstNode::Repeat(repeat) => {
                let end = repeat.end_position;
                resolve_loop_exits(&mut repeat.body, Some(end));
            }
            AstNode::If(block) => {
                resolve_loop_exits(&mut block.then_body, loop_end);
                resolve_loop_exits(&mut block.else_body, loop_end);
            }
            AstNode::Tell { body, .. } => resolve_loop_exits(body, loop_end),
            _ => {}
        }
    }
}

/// Fails on the first jump no pass could place.
pub fn ensure_resolved(statements: &[Statement]) -> Result<(), DecompileError> {
    for st in statements {
        match &st.node {
            AstNode::Jump { address } | AstNode::Jz { address, .. } => {
                return Err(DecompileError::UnresolvedJump {
                    position: st.position,
                    address: *address,
                });
            }
            AstNode::Repeat(repeat) => ensure_resolved(&repeat.body)?,
            AstNode::If(block) => {
                ensure_resolved(&block.then_body)?;
                ensure_resolved(&block.else_body)?;
            }
            AstNode::Tell { body, .. } => ensure_resolved(body)?,
            _ => {}
        }
    }
    Ok(())
}
