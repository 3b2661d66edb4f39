// Lingo AST representation

use std::rc::Rc;

use super::enums::{BinaryOpType, ChunkExprType, ListKind, PutType, UnaryOpType};

pub type NodeRef = Rc<AstNode>;

/// A named terminal together with the byte offset that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    pub name: String,
    pub position: usize,
}

impl Leaf {
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RepeatKind {
    While,
    For {
        variable: String,
        start: NodeRef,
        end: NodeRef,
        up: bool,
    },
    ForIn {
        variable: String,
        list: NodeRef,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Repeat {
    pub start_position: usize,
    pub end_position: usize,
    pub kind: RepeatKind,
    pub condition: NodeRef,
    pub body: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfBlock {
    pub condition: NodeRef,
    pub then_body: Vec<Statement>,
    pub else_body: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AstNode {
    Constant(Leaf),
    Symbol(Leaf),
    LocalVariable(Leaf),
    GlobalVariable(Leaf),
    PropertyName(Leaf),
    DefinedPropertyName(Leaf),
    ParameterName(Leaf),
    Raw(Leaf),
    DateTimeFunction(Leaf),
    Menu(Leaf),
    MenuItem(Leaf),
    SoundChannel(Leaf),
    Sprite(Leaf),
    Cast(Leaf),

    Unary {
        op: UnaryOpType,
        operand: NodeRef,
    },
    Binary {
        op: BinaryOpType,
        left: NodeRef,
        right: NodeRef,
    },
    Assign {
        left: NodeRef,
        right: NodeRef,
    },
    SpAssign {
        mode: PutType,
        left: NodeRef,
        right: NodeRef,
    },
    StringOp {
        chunk: ChunkExprType,
        start: NodeRef,
        end: Option<NodeRef>,
        of: NodeRef,
    },
    /// `the last item of x`, `the number of words of x`, `the name of menu 1`.
    UnaryString {
        op: UnaryOpType,
        chunk: Option<&'static str>,
        of: NodeRef,
    },
    PropertyAccessor {
        object: NodeRef,
        property: String,
    },
    KeyPropertyAccessor {
        property: String,
    },
    MenuitemAccessor {
        menu: NodeRef,
        item: NodeRef,
    },
    MenuitemsAccessor {
        menu: NodeRef,
    },
    /// Arguments in source order.
    LoadList {
        kind: ListKind,
        args: Vec<NodeRef>,
    },
    ToList {
        list: NodeRef,
    },
    ToDict {
        list: NodeRef,
    },
    Call {
        name: String,
        kind: ListKind,
        args: Vec<NodeRef>,
        in_tell: bool,
    },
    CallMethod {
        name: String,
        object: NodeRef,
        kind: ListKind,
        args: Vec<NodeRef>,
    },

    Repeat(Repeat),
    If(IfBlock),
    Jump {
        address: usize,
    },
    Jz {
        condition: NodeRef,
        address: usize,
    },
    ExitRepeat,
    Tell {
        target: NodeRef,
        body: Vec<Statement>,
    },
}

impl AstNode {
    pub fn leaf(&self) -> Option<&Leaf> {
        match self {
            AstNode::Constant(leaf)
            | AstNode::Symbol(leaf)
            | AstNode::LocalVariable(leaf)
            | AstNode::GlobalVariable(leaf)
            | AstNode::PropertyName(leaf)
            | AstNode::DefinedPropertyName(leaf)
            | AstNode::ParameterName(leaf)
            | AstNode::Raw(leaf)
            | AstNode::DateTimeFunction(leaf)
            | AstNode::Menu(leaf)
            | AstNode::MenuItem(leaf)
            | AstNode::SoundChannel(leaf)
            | AstNode::Sprite(leaf)
            | AstNode::Cast(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Name of a terminal node; composites have none.
    pub fn name(&self) -> Option<&str> {
        self.leaf().map(|leaf| leaf.name.as_str())
    }

    pub fn is_constant(&self, value: &str) -> bool {
        matches!(self, AstNode::Constant(leaf) if leaf.name == value)
    }

    pub fn is_call_named(&self, value: &str) -> bool {
        matches!(self, AstNode::Call { name, .. } if name == value)
    }

    pub fn call_args(&self) -> Option<&[NodeRef]> {
        match self {
            AstNode::Call { args, .. } => Some(args),
            _ => None,
        }
    }

    pub fn is_jump(&self) -> bool {
        matches!(self, AstNode::Jump { .. } | AstNode::Jz { .. })
    }

    fn same_kind(&self, other: &AstNode) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Identity test used by loop recognition. Terminals match on kind, name and
/// position, globals on name alone and composites only when shared.
pub fn same_reference(a: &NodeRef, b: &NodeRef) -> bool {
    match (a.as_ref(), b.as_ref()) {
        (AstNode::GlobalVariable(x), AstNode::GlobalVariable(y)) => x.name == y.name,
        (x, y) => match (x.leaf(), y.leaf()) {
            (Some(lx), Some(ly)) => x.same_kind(y) && lx == ly,
            _ => Rc::ptr_eq(a, b),
        },
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub position: usize,
    pub node: AstNode,
}

impl Statement {
    pub fn new(position: usize, node: AstNode) -> Self {
        Self { position, node }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub position: usize,
    pub parameters: Vec<NodeRef>,
    pub local_vars: Vec<NodeRef>,
    pub global_vars: Vec<String>,
    pub statements: Vec<Statement>,
    pub is_method: bool,
}

impl Function {
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            parameters: vec![],
            local_vars: vec![],
            global_vars: vec![],
            statements: vec![],
            is_method: false,
        }
    }

    pub fn add_global(&mut self, name: &str) {
        if !self.global_vars.iter().any(|global| global == name) {
            self.global_vars.push(name.to_owned());
        }
    }

    pub fn has_global(&self, name: &str) -> bool {
        self.global_vars.iter().any(|global| global == name)
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().filter_map(|param| param.name()).collect()
    }

    pub fn local_names(&self) -> Vec<&str> {
        self.local_vars.iter().filter_map(|local| local.name()).collect()
    }

    /// Statements to emit, without the implicit `exit` every handler ends with.
    pub fn body(&self) -> &[Statement] {
        match self.statements.split_last() {
            Some((last, rest)) if last.node.is_call_named("exit") => rest,
            _ => &self.statements,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    pub properties: Vec<String>,
    pub global_vars: Vec<String>,
    pub functions: Vec<Function>,
    /// Name of the factory this script defines, when rendered as one.
    pub factory: Option<String>,
}

impl Script {
    pub fn set_factory(&mut self, name: impl Into<String>) {
        self.factory = Some(name.into());
        for function in &mut self.functions {
            function.is_method = true;
        }
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }
}
