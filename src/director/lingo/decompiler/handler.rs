// Lingo bytecode decompiler - stack interpreter for one handler

use std::rc::Rc;

use log::{debug, trace};

use super::ast::*;
use super::context::Context;
use super::control_flow;
use super::enums::*;
use super::error::DecompileError;
use super::lingo_writer::render_expression;
use crate::director::chunks::handler::HandlerDef;
use crate::director::chunks::literal::Literal;
use crate::director::chunks::script::ScriptChunk;
use crate::director::chunks::script_names::ScriptNamesChunk;
use crate::director::lingo::constants::*;
use crate::director::lingo::opcode::{OpCode, PairOpCode};

type Result<T> = std::result::Result<T, DecompileError>;

/// Decompiles every handler of an LSCR chunk against its LNAM name table.
pub fn decompile_script(names: &ScriptNamesChunk, chunk: &ScriptChunk) -> Result<Script> {
    let constants = chunk.literals.iter().map(Literal::to_source).collect();
    let mut context = Context::new(names.names.clone(), constants, chunk.bytes_per_constant);

    let properties: Vec<String> = chunk
        .property_name_ids
        .iter()
        .map(|&id| context.resolve_name(id))
        .collect();
    let global_vars: Vec<String> = chunk
        .global_name_ids
        .iter()
        .map(|&id| context.resolve_name(id))
        .collect();
    let local_func_names: Vec<String> = chunk
        .handlers
        .iter()
        .map(|handler| context.resolve_name(handler.record.name_id))
        .collect();
    context.properties = properties.clone();
    context.local_func_names = local_func_names;

    let functions = chunk
        .handlers
        .iter()
        .map(|handler| decompile_handler(&mut context, handler))
        .collect::<Result<Vec<_>>>()?;

    Ok(Script {
        properties,
        global_vars,
        functions,
        factory: None,
    })
}

pub fn decompile_handler(context: &mut Context, handler: &HandlerDef) -> Result<Function> {
    let record = &handler.record;
    let mut function = Function::new(context.resolve_name(record.name_id), record.end_offset);
    function.local_vars = handler
        .local_names
        .iter()
        .map(|var| {
            Rc::new(AstNode::LocalVariable(Leaf::new(
                context.resolve_name(var.name_id),
                var.offset,
            )))
        })
        .collect();
    function.parameters = handler
        .argument_names
        .iter()
        .map(|var| {
            Rc::new(AstNode::ParameterName(Leaf::new(
                context.resolve_name(var.name_id),
                var.offset,
            )))
        })
        .collect();

    debug!(
        "decompiling {}: {} bytes at {:#x}, {} params, {} locals",
        function.name,
        handler.bytecode.len(),
        record.compiled_offset,
        function.parameters.len(),
        function.local_vars.len()
    );

    context.reset_tells();
    let mut state = HandlerState::new(context, function);
    state.run(&handler.bytecode, record.compiled_offset)?;

    let mut function = state.function;
    control_flow::lift(&mut function.statements)?;
    Ok(function)
}

/// Interpreter state while walking one handler's bytecode.
struct HandlerState<'a> {
    context: &'a mut Context,
    function: Function,
    stack: Vec<NodeRef>,
    /// Offset of the instruction being translated.
    position: usize,
    opcode: u8,
}

impl<'a> HandlerState<'a> {
    fn new(context: &'a mut Context, function: Function) -> Self {
        Self {
            context,
            function,
            stack: Vec::new(),
            position: 0,
            opcode: 0,
        }
    }

    fn run(&mut self, bytecode: &[u8], base: usize) -> Result<()> {
        let mut offset = 0;
        while offset < bytecode.len() {
            let byte = bytecode[offset];
            self.position = base + offset;
            self.opcode = byte;

            let opcode = OpCode::from_byte(byte).ok_or(DecompileError::UnknownOpcode {
                offset: self.position,
                opcode: byte,
            })?;
            let width = opcode.operand_width();
            let operand = bytecode
                .get(offset + 1..offset + 1 + width)
                .ok_or(DecompileError::TruncatedInstruction {
                    offset: self.position,
                    opcode: byte,
                })?
                .iter()
                .fold(0usize, |acc, &b| (acc << 8) | b as usize);

            trace!(
                "[{:#06x}] {} {:#x} (stack {})",
                self.position,
                opcode.name(),
                operand,
                self.stack.len()
            );
            self.translate(opcode, operand)?;
            offset += 1 + width;
        }

        if !self.stack.is_empty() {
            debug!(
                "{} values left on the stack after {}",
                self.stack.len(),
                self.function.name
            );
        }
        Ok(())
    }

    fn pop(&mut self) -> Result<NodeRef> {
        self.stack.pop().ok_or(DecompileError::StackUnderflow {
            offset: self.position,
            opcode: self.opcode,
        })
    }

    fn push(&mut self, node: AstNode) {
        self.stack.push(Rc::new(node));
    }

    fn add_statement(&mut self, node: AstNode) {
        self.function.statements.push(Statement::new(self.position, node));
    }

    fn leaf(&self, name: impl Into<String>) -> Leaf {
        Leaf::new(name, self.position)
    }

    fn out_of_range(&self, table: &'static str, index: usize) -> DecompileError {
        DecompileError::IndexOutOfRange {
            offset: self.position,
            opcode: self.opcode,
            table,
            index,
        }
    }

    fn unexpected(&self, reason: impl Into<String>) -> DecompileError {
        DecompileError::UnexpectedOperand {
            offset: self.position,
            opcode: self.opcode,
            reason: reason.into(),
        }
    }

    fn name_at(&self, index: usize) -> Result<String> {
        self.context
            .name(index)
            .map(str::to_owned)
            .ok_or_else(|| self.out_of_range("name_list", index))
    }

    fn lookup(&self, table: &[&'static str], table_name: &'static str, index: usize) -> Result<&'static str> {
        table
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range(table_name, index))
    }

    fn local(&self, index: usize) -> Result<NodeRef> {
        self.function
            .local_vars
            .get(index)
            .cloned()
            .ok_or_else(|| self.out_of_range("local_vars", index))
    }

    fn parameter(&self, index: usize) -> Result<NodeRef> {
        self.function
            .parameters
            .get(index)
            .cloned()
            .ok_or_else(|| self.out_of_range("parameters", index))
    }

    /// Pops a constant holding a non-negative integer.
    fn pop_int(&mut self) -> Result<usize> {
        let node = self.pop()?;
        match node.as_ref() {
            AstNode::Constant(leaf) => leaf
                .name
                .parse::<usize>()
                .map_err(|_| self.unexpected(format!("expected an integer constant, found {}", leaf.name))),
            _ => Err(self.unexpected("expected an integer constant")),
        }
    }

    /// Pops the identifier of a sprite, cast member, menu or sound channel.
    fn pop_object_id(&mut self) -> Result<String> {
        let node = self.pop()?;
        Ok(match node.name() {
            Some(name) => name.to_owned(),
            None => render_expression(&node),
        })
    }

    fn pop_list(&mut self) -> Result<(ListKind, Vec<NodeRef>)> {
        let node = self.pop()?;
        match node.as_ref() {
            AstNode::LoadList { kind, args } => Ok((*kind, args.clone())),
            _ => Err(self.unexpected("expected an argument list")),
        }
    }

    fn pop_field(&mut self) -> Result<NodeRef> {
        let operand = self.pop()?;
        Ok(Rc::new(AstNode::Unary {
            op: UnaryOpType::Field,
            operand,
        }))
    }

    fn binary(&mut self, op: BinaryOpType) -> Result<()> {
        let right = self.pop()?;
        let left = self.pop()?;
        self.push(AstNode::Binary { op, left, right });
        Ok(())
    }

    fn unary(&mut self, op: UnaryOpType) -> Result<()> {
        let operand = self.pop()?;
        self.push(AstNode::Unary { op, operand });
        Ok(())
    }

    fn load_list(&mut self, kind: ListKind, count: usize) -> Result<()> {
        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            args.push(self.pop()?);
        }
        args.reverse();
        self.push(AstNode::LoadList { kind, args });
        Ok(())
    }

    /// A call whose arguments were loaded with `ArgList` yields a value.
    fn call(&mut self, name: String, kind: ListKind, args: Vec<NodeRef>) {
        let node = AstNode::Call {
            name,
            kind,
            args,
            in_tell: false,
        };
        match kind {
            ListKind::ArgList => self.push(node),
            ListKind::ArgListNoRet => self.add_statement(node),
        }
    }

    fn translate(&mut self, opcode: OpCode, operand: usize) -> Result<()> {
        match opcode {
            OpCode::Exit => self.add_statement(AstNode::Call {
                name: "exit".to_owned(),
                kind: ListKind::ArgListNoRet,
                args: vec![],
                in_tell: false,
            }),
            OpCode::PushZero => self.push(AstNode::Constant(self.leaf("0"))),

            OpCode::Mul => self.binary(BinaryOpType::Mul)?,
            OpCode::Add => self.binary(BinaryOpType::Add)?,
            OpCode::Sub => self.binary(BinaryOpType::Sub)?,
            OpCode::Div => self.binary(BinaryOpType::Div)?,
            OpCode::Mod => self.binary(BinaryOpType::Mod)?,
            OpCode::JoinStr => self.binary(BinaryOpType::Concat)?,
            OpCode::JoinPadStr => self.binary(BinaryOpType::ConcatSpaces)?,
            OpCode::Lt => self.binary(BinaryOpType::Lt)?,
            OpCode::LtEq => self.binary(BinaryOpType::LtEq)?,
            OpCode::NtEq => self.binary(BinaryOpType::NtEq)?,
            OpCode::Eq => self.binary(BinaryOpType::Eq)?,
            OpCode::Gt => self.binary(BinaryOpType::Gt)?,
            OpCode::GtEq => self.binary(BinaryOpType::GtEq)?,
            OpCode::And => self.binary(BinaryOpType::And)?,
            OpCode::Or => self.binary(BinaryOpType::Or)?,
            OpCode::ContainsStr => self.binary(BinaryOpType::Contains)?,
            OpCode::Contains0Str => self.binary(BinaryOpType::Start)?,
            OpCode::OntoSpr => self.binary(BinaryOpType::Intersects)?,
            OpCode::IntoSpr => self.binary(BinaryOpType::Within)?,

            OpCode::Inv => self.unary(UnaryOpType::Minus)?,
            OpCode::Not => self.unary(UnaryOpType::Not)?,
            OpCode::GetField => self.unary(UnaryOpType::Field)?,

            OpCode::GetChunk => {
                let string = self.pop()?;
                let chunk = self.add_modifiers(string)?;
                self.stack.push(chunk);
            }
            OpCode::HiliteChunk => {
                let field = self.pop_field()?;
                let operand = self.add_modifiers(field)?;
                self.add_statement(AstNode::Unary {
                    op: UnaryOpType::Hilite,
                    operand,
                });
            }

            OpCode::StartTell => {
                let target = self.pop()?;
                self.context.open_tell(self.position, target.clone());
                self.add_statement(AstNode::Tell { target, body: vec![] });
            }
            OpCode::EndTell => self.end_tell()?,

            OpCode::PushList => {
                let list = self.pop()?;
                if !matches!(list.as_ref(), AstNode::LoadList { .. }) {
                    return Err(self.unexpected("list literal without an argument list"));
                }
                self.push(AstNode::ToList { list });
            }
            OpCode::PushPropList => {
                let list = self.pop()?;
                match list.as_ref() {
                    AstNode::LoadList { args, .. } if args.len() % 2 == 0 => {}
                    AstNode::LoadList { args, .. } => {
                        return Err(self.unexpected(format!("property list with {} values", args.len())));
                    }
                    _ => return Err(self.unexpected("property list without an argument list")),
                }
                self.push(AstNode::ToDict { list });
            }

            OpCode::PushInt8 => {
                let value = operand as u8 as i8;
                self.push(AstNode::Constant(self.leaf(value.to_string())));
            }
            OpCode::PushInt16 => {
                let value = operand as u16 as i16;
                self.push(AstNode::Constant(self.leaf(value.to_string())));
            }
            OpCode::PushArgListNoRet | OpCode::PushArgListNoRet16 => {
                self.load_list(ListKind::ArgListNoRet, operand)?
            }
            OpCode::PushArgList | OpCode::PushArgList16 => self.load_list(ListKind::ArgList, operand)?,
            OpCode::PushCons | OpCode::PushCons16 => {
                let index = self.context.descale(operand);
                let value = self
                    .context
                    .constants
                    .get(index)
                    .cloned()
                    .ok_or_else(|| self.out_of_range("constants", index))?;
                self.push(AstNode::Constant(self.leaf(value)));
            }
            OpCode::PushSymb => {
                let name = self.name_at(operand)?;
                self.push(AstNode::Symbol(self.leaf(name)));
            }
            OpCode::PushPropName => {
                let name = self.name_at(operand)?;
                self.push(AstNode::PropertyName(self.leaf(name)));
            }
            OpCode::PushVarRef => {
                let name = self.name_at(operand)?;
                let node = if self.function.has_global(&name) {
                    AstNode::GlobalVariable(self.leaf(name))
                } else {
                    AstNode::LocalVariable(self.leaf(name))
                };
                self.push(node);
            }

            OpCode::GetGlobal | OpCode::GetGlobal2 => {
                let name = self.name_at(operand)?;
                self.function.add_global(&name);
                self.push(AstNode::GlobalVariable(self.leaf(name)));
            }
            OpCode::GetProp => {
                let name = self.name_at(operand)?;
                self.push(AstNode::DefinedPropertyName(self.leaf(name)));
            }
            OpCode::GetParam => {
                let index = self.context.descale(operand);
                let param = self.parameter(index)?;
                let name = param.name().unwrap_or(super::context::NONAME).to_owned();
                self.push(AstNode::ParameterName(self.leaf(name)));
            }
            OpCode::GetLocal => {
                let index = self.context.descale(operand);
                let local = self.local(index)?;
                self.stack.push(local);
            }

            OpCode::SetGlobal | OpCode::SetGlobal2 => {
                let name = self.name_at(operand)?;
                self.function.add_global(&name);
                let left = Rc::new(AstNode::GlobalVariable(self.leaf(name)));
                let right = self.pop()?;
                self.add_statement(AstNode::Assign { left, right });
            }
            OpCode::SetProp | OpCode::SetMovieProp => {
                let name = self.name_at(operand)?;
                let left = if self.context.properties.contains(&name) {
                    AstNode::PropertyAccessor {
                        object: Rc::new(AstNode::Raw(self.leaf("me"))),
                        property: name,
                    }
                } else {
                    AstNode::PropertyName(self.leaf(name))
                };
                let right = self.pop()?;
                self.add_statement(AstNode::Assign {
                    left: Rc::new(left),
                    right,
                });
            }
            OpCode::SetParam => {
                let index = self.context.descale(operand);
                let left = self.parameter(index)?;
                let right = self.pop()?;
                self.add_statement(AstNode::Assign { left, right });
            }
            OpCode::SetLocal => {
                let index = self.context.descale(operand);
                let left = self.local(index)?;
                let right = self.pop()?;
                self.add_statement(AstNode::Assign { left, right });
            }

            OpCode::EndRepeat => self.end_repeat(operand)?,

            OpCode::LocalCall => {
                let name = self
                    .context
                    .local_func_names
                    .get(operand)
                    .cloned()
                    .ok_or_else(|| self.out_of_range("local_func_names", operand))?;
                let (kind, args) = self.pop_list()?;
                self.call(name, kind, args);
            }
            OpCode::ExtCall => {
                let name = self.name_at(operand)?;
                let (kind, args) = self.pop_list()?;
                self.call(name, kind, args);
            }
            OpCode::ExtGlobalCall => {
                let global = self.name_at(operand)?;
                let callee = self.pop()?;
                let name = render_expression(&callee);
                let (kind, args) = self.pop_list()?;
                let args = args
                    .into_iter()
                    .map(|arg| match arg.as_ref() {
                        AstNode::Symbol(leaf) if leaf.name == global => {
                            Rc::new(AstNode::GlobalVariable(leaf.clone()))
                        }
                        _ => arg,
                    })
                    .collect();
                self.call(name, kind, args);
            }

            OpCode::GetMovieProp => {
                let name = self.name_at(operand)?;
                let node = match MOVIE_PROPERTY_OWNERS.get(name.as_str()) {
                    Some(owner) => AstNode::PropertyAccessor {
                        object: Rc::new(AstNode::LocalVariable(self.leaf(*owner))),
                        property: name,
                    },
                    None => AstNode::PropertyName(self.leaf(name)),
                };
                self.push(node);
            }
            OpCode::GetObjProp => {
                let property = self.name_at(operand)?;
                let object = self.pop()?;
                self.push(AstNode::PropertyAccessor { object, property });
            }
            OpCode::SetObjProp => {
                let property = self.name_at(operand)?;
                let right = self.pop()?;
                let object = self.pop()?;
                self.add_statement(AstNode::Assign {
                    left: Rc::new(AstNode::PropertyAccessor { object, property }),
                    right,
                });
            }
            OpCode::TellCall => {
                let name = self.name_at(operand)?;
                let (kind, args) = self.pop_list()?;
                self.add_statement(AstNode::Call {
                    name,
                    kind,
                    args,
                    in_tell: true,
                });
            }

            OpCode::Peek => {
                let index = self
                    .stack
                    .len()
                    .checked_sub(operand + 1)
                    .ok_or_else(|| self.out_of_range("stack", operand))?;
                let node = self.stack[index].clone();
                self.stack.push(node);
            }
            OpCode::Pop => {
                for _ in 0..operand {
                    self.pop()?;
                }
            }

            OpCode::TheBuiltin => {
                let property = self.name_at(operand)?;
                let list = self.pop()?;
                if !matches!(list.as_ref(), AstNode::LoadList { args, .. } if args.is_empty()) {
                    return Err(self.unexpected("builtin property with arguments"));
                }
                self.push(AstNode::KeyPropertyAccessor { property });
            }
            OpCode::ObjCall => {
                let name = self.name_at(operand)?;
                let list = self.pop()?;
                let (kind, mut args) = match list.as_ref() {
                    AstNode::ToList { list } => match list.as_ref() {
                        AstNode::LoadList { kind, args } => (*kind, args.clone()),
                        _ => return Err(self.unexpected("method call without an argument list")),
                    },
                    _ => return Err(self.unexpected("method call without a list literal")),
                };
                // the receiver is pushed last
                let Some(object) = args.pop() else {
                    return Err(self.unexpected("method call without a receiver"));
                };
                let node = AstNode::CallMethod {
                    name,
                    object,
                    kind,
                    args,
                };
                match kind {
                    ListKind::ArgList => self.push(node),
                    ListKind::ArgListNoRet => self.add_statement(node),
                }
            }

            OpCode::Jmp => self.add_statement(AstNode::Jump {
                address: self.position + operand,
            }),
            OpCode::JmpIfZ => {
                let condition = self.pop()?;
                self.add_statement(AstNode::Jz {
                    condition,
                    address: self.position + operand,
                });
            }

            OpCode::AssignMode | OpCode::PutChunk | OpCode::DeleteChunk | OpCode::Get | OpCode::Set => {
                let sub = operand as u8;
                let pair = PairOpCode::from_pair(self.opcode, sub).ok_or(DecompileError::UnknownOpcodePair {
                    offset: self.position,
                    prefix: self.opcode,
                    sub,
                })?;
                self.translate_pair(pair)?;
            }
        }
        Ok(())
    }

    fn translate_pair(&mut self, pair: PairOpCode) -> Result<()> {
        match pair {
            PairOpCode::AssignIntoLocal => self.assign_local(PutType::Into)?,
            PairOpCode::AssignAfterLocal => self.assign_local(PutType::After)?,
            PairOpCode::AssignBeforeLocal => self.assign_local(PutType::Before)?,
            PairOpCode::AssignIntoField => self.assign_field(PutType::Into)?,
            PairOpCode::AssignAfterField => self.assign_field(PutType::After)?,
            PairOpCode::AssignBeforeField => self.assign_field(PutType::Before)?,

            PairOpCode::PutIntoField | PairOpCode::PutIntoFieldChunk => self.put_field(PutType::Into)?,
            PairOpCode::PutAfterField => self.put_field(PutType::After)?,
            PairOpCode::PutBeforeField => self.put_field(PutType::Before)?,
            PairOpCode::PutIntoVar => self.put_var(PutType::Into)?,
            PairOpCode::PutAfterVar => self.put_var(PutType::After)?,
            PairOpCode::PutBeforeVar => self.put_var(PutType::Before)?,
            PairOpCode::PutIntoLocal => self.put_local(PutType::Into)?,
            PairOpCode::PutAfterLocal => self.put_local(PutType::After)?,
            PairOpCode::PutBeforeLocal => self.put_local(PutType::Before)?,

            PairOpCode::DeleteVar => {
                let var = self.pop()?;
                let operand = self.add_modifiers(var)?;
                self.delete(operand);
            }
            PairOpCode::DeleteLocal => {
                let index = self.pop_int()?;
                let local = self.local(index)?;
                let operand = self.add_modifiers(local)?;
                self.delete(operand);
            }
            PairOpCode::DeleteField => {
                let field = self.pop_field()?;
                let operand = self.add_modifiers(field)?;
                self.delete(operand);
            }

            PairOpCode::GetSpecial => {
                let node = self.special_property()?;
                self.stack.push(node);
            }
            PairOpCode::SetSpecial => {
                let left = self.special_property()?;
                let right = self.pop()?;
                self.add_statement(AstNode::Assign { left, right });
            }
            PairOpCode::GetNumberOf => {
                let index = self.pop_int()?;
                let chunk = self.lookup(&OPERATION_TYPES, "operation_types", index)?;
                let of = self.pop()?;
                self.push(AstNode::UnaryString {
                    op: UnaryOpType::Number,
                    chunk: Some(chunk),
                    of,
                });
            }
            PairOpCode::GetMenu => {
                let kind = self.pop_int()?;
                let menu_id = self.pop_object_id()?;
                let menu = Rc::new(AstNode::Menu(self.leaf(menu_id)));
                let node = match kind {
                    1 => AstNode::UnaryString {
                        op: UnaryOpType::Name,
                        chunk: None,
                        of: menu,
                    },
                    2 => AstNode::UnaryString {
                        op: UnaryOpType::Number,
                        chunk: None,
                        of: Rc::new(AstNode::MenuitemsAccessor { menu }),
                    },
                    other => return Err(self.unexpected(format!("unknown menu property {}", other))),
                };
                self.push(node);
            }
            PairOpCode::GetMenuItem => self.menu_item_property(false)?,
            PairOpCode::SetMenuItem => self.menu_item_property(true)?,
            PairOpCode::GetSound => {
                self.object_property(&SOUND_PROPERTIES, "sound_properties", AstNode::SoundChannel, false)?
            }
            PairOpCode::SetSound => {
                self.object_property(&SOUND_PROPERTIES, "sound_properties", AstNode::SoundChannel, true)?
            }
            PairOpCode::GetSprite => {
                self.object_property(&SPRITE_PROPERTIES, "sprite_properties", AstNode::Sprite, false)?
            }
            PairOpCode::SetSprite => {
                self.object_property(&SPRITE_PROPERTIES, "sprite_properties", AstNode::Sprite, true)?
            }
            PairOpCode::GetSystem => {
                let node = self.system_property()?;
                self.stack.push(node);
            }
            PairOpCode::SetSystem => {
                let left = self.system_property()?;
                let right = self.pop()?;
                self.add_statement(AstNode::Assign { left, right });
            }
            PairOpCode::GetCastCount => {
                let index = self.pop_int()?;
                let kind = self.lookup(&NUM_OF_TYPES, "num_of_types", index)?;
                self.push(AstNode::UnaryString {
                    op: UnaryOpType::Number,
                    chunk: None,
                    of: Rc::new(AstNode::LocalVariable(self.leaf(kind))),
                });
            }
            PairOpCode::GetCast => self.object_property(&CAST_PROPERTIES, "cast_properties", AstNode::Cast, false)?,
            PairOpCode::SetCast => self.object_property(&CAST_PROPERTIES, "cast_properties", AstNode::Cast, true)?,
            PairOpCode::GetFieldProp => {
                let index = self.pop_int()?;
                let property = self.lookup(&CAST_PROPERTIES, "cast_properties", index)?;
                let object = self.pop_field()?;
                self.push(AstNode::PropertyAccessor {
                    object,
                    property: property.to_owned(),
                });
            }
            PairOpCode::SetFieldProp => {
                self.object_property(&CAST_PROPERTIES, "cast_properties", AstNode::Cast, true)?
            }
            PairOpCode::GetVideo => {
                self.object_property(&VIDEO_PROPERTIES, "video_properties", AstNode::Cast, false)?
            }
            PairOpCode::SetVideo => self.object_property(&VIDEO_PROPERTIES, "video_properties", AstNode::Cast, true)?,
        }
        Ok(())
    }

    /// Pops the eight chunk bounds (last/first for line, item, word, char) and
    /// wraps `target` in every chunk whose start is not zero.
    fn add_modifiers(&mut self, target: NodeRef) -> Result<NodeRef> {
        let last_line = self.pop()?;
        let first_line = self.pop()?;
        let last_item = self.pop()?;
        let first_item = self.pop()?;
        let last_word = self.pop()?;
        let first_word = self.pop()?;
        let last_char = self.pop()?;
        let first_char = self.pop()?;

        let mut node = target;
        for (chunk, start, end) in [
            (ChunkExprType::Line, first_line, last_line),
            (ChunkExprType::Item, first_item, last_item),
            (ChunkExprType::Word, first_word, last_word),
            (ChunkExprType::Char, first_char, last_char),
        ] {
            if is_zero(&start) {
                continue;
            }
            node = Rc::new(AstNode::StringOp {
                chunk,
                start,
                end: (!is_zero(&end)).then_some(end),
                of: node,
            });
        }
        Ok(node)
    }

    fn delete(&mut self, operand: NodeRef) {
        self.add_statement(AstNode::Unary {
            op: UnaryOpType::Delete,
            operand,
        });
    }

    fn sp_assign(&mut self, mode: PutType, left: NodeRef) -> Result<()> {
        let right = self.pop()?;
        self.add_statement(AstNode::SpAssign { mode, left, right });
        Ok(())
    }

    fn assign_local(&mut self, mode: PutType) -> Result<()> {
        let raw = self.pop_int()?;
        let index = self.context.descale(raw);
        let left = self.local(index)?;
        self.sp_assign(mode, left)
    }

    fn assign_field(&mut self, mode: PutType) -> Result<()> {
        let left = self.pop_field()?;
        self.sp_assign(mode, left)
    }

    fn put_field(&mut self, mode: PutType) -> Result<()> {
        let field = self.pop_field()?;
        let left = self.add_modifiers(field)?;
        self.sp_assign(mode, left)
    }

    fn put_var(&mut self, mode: PutType) -> Result<()> {
        let var = self.pop()?;
        let left = self.add_modifiers(var)?;
        self.sp_assign(mode, left)
    }

    fn put_local(&mut self, mode: PutType) -> Result<()> {
        let index = self.pop_int()?;
        let local = self.local(index)?;
        let left = self.add_modifiers(local)?;
        self.sp_assign(mode, left)
    }

    fn special_property(&mut self) -> Result<NodeRef> {
        let index = self.pop_int()?;
        let node = if index < SPECIAL_PROPERTIES.len() {
            AstNode::PropertyName(self.leaf(SPECIAL_PROPERTIES[index]))
        } else if index < SPECIAL_PROPERTIES.len() + DATE_TIME_FUNCTIONS.len() {
            AstNode::DateTimeFunction(self.leaf(DATE_TIME_FUNCTIONS[index - SPECIAL_PROPERTIES.len()]))
        } else {
            let chunk = self.lookup(&OPERATION_TYPES, "operation_types", index - 11)?;
            let of = self.pop()?;
            AstNode::UnaryString {
                op: UnaryOpType::Last,
                chunk: Some(chunk),
                of,
            }
        };
        Ok(Rc::new(node))
    }

    fn system_property(&mut self) -> Result<NodeRef> {
        let index = self.pop_int()?;
        let (property, owner) = SYSTEM_PROPERTIES
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range("system_properties", index))?;
        let owner = if self.context.tell_object().is_some() {
            "tell_obj"
        } else {
            owner
        };
        Ok(Rc::new(AstNode::PropertyAccessor {
            object: Rc::new(AstNode::LocalVariable(self.leaf(owner))),
            property: property.to_owned(),
        }))
    }

    fn menu_item_property(&mut self, set: bool) -> Result<()> {
        let index = self.pop_int()?;
        let property = self.lookup(&MENUITEM_PROPERTIES, "menuitem_properties", index)?;
        let value = if set { Some(self.pop()?) } else { None };
        let menu_id = self.pop_object_id()?;
        let item_id = self.pop_object_id()?;
        let accessor = Rc::new(AstNode::PropertyAccessor {
            object: Rc::new(AstNode::MenuitemAccessor {
                menu: Rc::new(AstNode::Menu(self.leaf(menu_id))),
                item: Rc::new(AstNode::MenuItem(self.leaf(item_id))),
            }),
            property: property.to_owned(),
        });
        self.finish_property(accessor, value);
        Ok(())
    }

    /// `the prop of sprite n` style access. The setter form pops the value
    /// between the property index and the object id.
    fn object_property(
        &mut self,
        table: &[&'static str],
        table_name: &'static str,
        make: fn(Leaf) -> AstNode,
        set: bool,
    ) -> Result<()> {
        let index = self.pop_int()?;
        let property = self.lookup(table, table_name, index)?;
        let value = if set { Some(self.pop()?) } else { None };
        let id = self.pop_object_id()?;
        let accessor = Rc::new(AstNode::PropertyAccessor {
            object: Rc::new(make(self.leaf(id))),
            property: property.to_owned(),
        });
        self.finish_property(accessor, value);
        Ok(())
    }

    fn finish_property(&mut self, accessor: NodeRef, value: Option<NodeRef>) {
        match value {
            Some(right) => self.add_statement(AstNode::Assign { left: accessor, right }),
            None => self.stack.push(accessor),
        }
    }

    /// Moves everything from `start` up to this instruction into a loop.
    fn end_repeat(&mut self, distance: usize) -> Result<()> {
        let start = self
            .position
            .checked_sub(distance)
            .ok_or_else(|| self.unexpected(format!("loop start {} bytes before offset 0", distance)))?;
        let statements = std::mem::take(&mut self.function.statements);
        let (outer, body): (Vec<_>, Vec<_>) = statements.into_iter().partition(|st| st.position < start);
        self.function.statements = outer;
        self.add_statement(AstNode::Repeat(Repeat {
            start_position: start,
            end_position: self.position,
            kind: RepeatKind::While,
            condition: Rc::new(AstNode::Constant(Leaf::new("TRUE", start))),
            body,
        }));
        Ok(())
    }

    fn end_tell(&mut self) -> Result<()> {
        let unmatched = DecompileError::UnmatchedTellEnd { offset: self.position };
        let Some(tell_position) = self.context.close_tell() else {
            return Err(unmatched);
        };
        let Some(index) = self
            .function
            .statements
            .iter()
            .rposition(|st| st.position == tell_position && matches!(st.node, AstNode::Tell { .. }))
        else {
            return Err(unmatched);
        };
        let inner: Vec<Statement> = self.function.statements.drain(index + 1..).collect();
        if let AstNode::Tell { body, .. } = &mut self.function.statements[index].node {
            body.extend(inner);
        }
        Ok(())
    }
}

fn is_zero(node: &NodeRef) -> bool {
    node.name() == Some("0")
}
