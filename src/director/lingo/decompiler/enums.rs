// Lingo decompiler enums

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinaryOpType {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    ConcatSpaces,
    Contains,
    Start,
    And,
    Or,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NtEq,
    Intersects,
    Within,
}

impl BinaryOpType {
    pub fn lingo_symbol(&self) -> &'static str {
        match self {
            BinaryOpType::Add => "+",
            BinaryOpType::Sub => "-",
            BinaryOpType::Mul => "*",
            BinaryOpType::Div => "/",
            BinaryOpType::Mod => "mod",
            BinaryOpType::Concat => "&",
            BinaryOpType::ConcatSpaces => "&&",
            BinaryOpType::Contains => "contains",
            BinaryOpType::Start => "start",
            BinaryOpType::And => "and",
            BinaryOpType::Or => "or",
            BinaryOpType::Lt => "<",
            BinaryOpType::LtEq => "<=",
            BinaryOpType::Gt => ">",
            BinaryOpType::GtEq => ">=",
            BinaryOpType::Eq => "=",
            BinaryOpType::NtEq => "<>",
            BinaryOpType::Intersects => "intersects",
            BinaryOpType::Within => "within",
        }
    }

    pub fn js_symbol(&self) -> &'static str {
        match self {
            BinaryOpType::Add => "+",
            BinaryOpType::Sub => "-",
            BinaryOpType::Mul => "*",
            BinaryOpType::Div => "/",
            BinaryOpType::Mod => "%",
            BinaryOpType::Concat => "+",
            BinaryOpType::ConcatSpaces => "+ \" \" +",
            BinaryOpType::Contains => ".includes",
            BinaryOpType::Start => ".startsWith",
            BinaryOpType::And => "&&",
            BinaryOpType::Or => "||",
            BinaryOpType::Lt => "<",
            BinaryOpType::LtEq => "<=",
            BinaryOpType::Gt => ">",
            BinaryOpType::GtEq => ">=",
            BinaryOpType::Eq => "==",
            BinaryOpType::NtEq => "!=",
            BinaryOpType::Intersects => ".intersects",
            BinaryOpType::Within => ".within",
        }
    }

    /// Sprite predicates read as `sprite a intersects b` in Lingo.
    pub fn is_sprite_predicate(&self) -> bool {
        matches!(self, BinaryOpType::Intersects | BinaryOpType::Within)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnaryOpType {
    Minus,
    Not,
    Field,
    Hilite,
    Delete,
    Last,
    Number,
    Name,
}

impl UnaryOpType {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryOpType::Minus => "minus",
            UnaryOpType::Not => "not",
            UnaryOpType::Field => "field",
            UnaryOpType::Hilite => "hilite",
            UnaryOpType::Delete => "delete",
            UnaryOpType::Last => "last",
            UnaryOpType::Number => "number",
            UnaryOpType::Name => "name",
        }
    }

    pub fn js_name(&self) -> &'static str {
        match self {
            UnaryOpType::Minus => "-",
            UnaryOpType::Not => "!",
            UnaryOpType::Number => "length",
            other => other.name(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChunkExprType {
    Char = 0x01,
    Word = 0x02,
    Item = 0x03,
    Line = 0x04,
}

impl ChunkExprType {
    pub fn name(&self) -> &'static str {
        match self {
            ChunkExprType::Char => "char",
            ChunkExprType::Word => "word",
            ChunkExprType::Item => "item",
            ChunkExprType::Line => "line",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PutType {
    Into = 0x01,
    After = 0x02,
    Before = 0x03,
}

impl PutType {
    pub fn name(&self) -> &'static str {
        match self {
            PutType::Into => "into",
            PutType::After => "after",
            PutType::Before => "before",
        }
    }
}

/// Flavour of a list load. `ArgList` marks a call whose result is consumed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ListKind {
    ArgList,
    ArgListNoRet,
}
