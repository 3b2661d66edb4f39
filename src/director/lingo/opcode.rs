use num_derive::{FromPrimitive, ToPrimitive};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, FromPrimitive, ToPrimitive)]
pub enum OpCode {
    // single-byte
    Exit = 0x01,
    PushZero = 0x03,
    Mul = 0x04,
    Add = 0x05,
    Sub = 0x06,
    Div = 0x07,
    Mod = 0x08,
    Inv = 0x09,
    JoinStr = 0x0a,
    JoinPadStr = 0x0b,
    Lt = 0x0c,
    LtEq = 0x0d,
    NtEq = 0x0e,
    Eq = 0x0f,
    Gt = 0x10,
    GtEq = 0x11,
    And = 0x12,
    Or = 0x13,
    Not = 0x14,
    ContainsStr = 0x15,
    Contains0Str = 0x16,
    GetChunk = 0x17,
    HiliteChunk = 0x18,
    OntoSpr = 0x19,
    IntoSpr = 0x1a,
    GetField = 0x1b,
    StartTell = 0x1c,
    EndTell = 0x1d,
    PushList = 0x1e,
    PushPropList = 0x1f,

    // one operand byte
    PushInt8 = 0x41,
    PushArgListNoRet = 0x42,
    PushArgList = 0x43,
    PushCons = 0x44,
    PushSymb = 0x45,
    PushVarRef = 0x46,
    GetGlobal2 = 0x48,
    GetGlobal = 0x49,
    GetProp = 0x4a,
    GetParam = 0x4b,
    GetLocal = 0x4c,
    SetGlobal2 = 0x4e,
    SetGlobal = 0x4f,
    SetProp = 0x50,
    SetParam = 0x51,
    SetLocal = 0x52,
    EndRepeat = 0x54,
    LocalCall = 0x56,
    ExtCall = 0x57,
    ExtGlobalCall = 0x58,
    AssignMode = 0x59,
    PutChunk = 0x5a,
    DeleteChunk = 0x5b,
    Get = 0x5c,
    Set = 0x5d,
    GetMovieProp = 0x5f,
    SetMovieProp = 0x60,
    GetObjProp = 0x61,
    SetObjProp = 0x62,
    TellCall = 0x63,
    Peek = 0x64,
    Pop = 0x65,
    TheBuiltin = 0x66,
    ObjCall = 0x67,
    PushPropName = 0x99,

    // two operand bytes
    PushInt16 = 0x81,
    PushArgListNoRet16 = 0x82,
    PushArgList16 = 0x83,
    PushCons16 = 0x84,
    Jmp = 0x93,
    JmpIfZ = 0x95,
}

impl OpCode {
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        num::FromPrimitive::from_u8(byte)
    }

    /// Number of bytes following the opcode byte. Pair prefixes carry their
    /// sub-opcode in that single byte.
    pub fn operand_width(&self) -> usize {
        match *self as u8 {
            0x00..=0x3f => 0,
            0x81..=0x84 | 0x93 | 0x95 => 2,
            _ => 1,
        }
    }

    pub fn is_pair_prefix(&self) -> bool {
        matches!(
            self,
            OpCode::AssignMode | OpCode::PutChunk | OpCode::DeleteChunk | OpCode::Get | OpCode::Set
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Exit => "exit",
            OpCode::PushZero => "pushzero",
            OpCode::Mul => "mul",
            OpCode::Add => "add",
            OpCode::Sub => "sub",
            OpCode::Div => "div",
            OpCode::Mod => "mod",
            OpCode::Inv => "inv",
            OpCode::JoinStr => "joinstr",
            OpCode::JoinPadStr => "joinpadstr",
            OpCode::Lt => "lt",
            OpCode::LtEq => "lteq",
            OpCode::NtEq => "nteq",
            OpCode::Eq => "eq",
            OpCode::Gt => "gt",
            OpCode::GtEq => "gteq",
            OpCode::And => "and",
            OpCode::Or => "or",
            OpCode::Not => "not",
            OpCode::ContainsStr => "containsstr",
            OpCode::Contains0Str => "contains0str",
            OpCode::GetChunk => "getchunk",
            OpCode::HiliteChunk => "hilitechunk",
            OpCode::OntoSpr => "ontospr",
            OpCode::IntoSpr => "intospr",
            OpCode::GetField => "getfield",
            OpCode::StartTell => "starttell",
            OpCode::EndTell => "endtell",
            OpCode::PushList => "pushlist",
            OpCode::PushPropList => "pushproplist",
            OpCode::PushInt8 => "pushint8",
            OpCode::PushArgListNoRet => "pusharglistnoret",
            OpCode::PushArgList => "pusharglist",
            OpCode::PushCons => "pushcons",
            OpCode::PushSymb => "pushsymb",
            OpCode::PushVarRef => "pushvarref",
            OpCode::GetGlobal2 => "getglobal2",
            OpCode::GetGlobal => "getglobal",
            OpCode::GetProp => "getprop",
            OpCode::GetParam => "getparam",
            OpCode::GetLocal => "getlocal",
            OpCode::SetGlobal2 => "setglobal2",
            OpCode::SetGlobal => "setglobal",
            OpCode::SetProp => "setprop",
            OpCode::SetParam => "setparam",
            OpCode::SetLocal => "setlocal",
            OpCode::EndRepeat => "endrepeat",
            OpCode::LocalCall => "localcall",
            OpCode::ExtCall => "extcall",
            OpCode::ExtGlobalCall => "extglobalcall",
            OpCode::AssignMode => "assignmode",
            OpCode::PutChunk => "putchunk",
            OpCode::DeleteChunk => "deletechunk",
            OpCode::Get => "get",
            OpCode::Set => "set",
            OpCode::GetMovieProp => "getmovieprop",
            OpCode::SetMovieProp => "setmovieprop",
            OpCode::GetObjProp => "getobjprop",
            OpCode::SetObjProp => "setobjprop",
            OpCode::TellCall => "tellcall",
            OpCode::Peek => "peek",
            OpCode::Pop => "pop",
            OpCode::TheBuiltin => "thebuiltin",
            OpCode::ObjCall => "objcall",
            OpCode::PushPropName => "pushpropname",
            OpCode::PushInt16 => "pushint16",
            OpCode::PushArgListNoRet16 => "pusharglistnoret16",
            OpCode::PushArgList16 => "pusharglist16",
            OpCode::PushCons16 => "pushcons16",
            OpCode::Jmp => "jmp",
            OpCode::JmpIfZ => "jmpifz",
        }
    }
}

/// Two-byte instructions, keyed by `(prefix << 8) | sub`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, FromPrimitive, ToPrimitive)]
pub enum PairOpCode {
    AssignIntoLocal = 0x5915,
    AssignIntoField = 0x5916,
    AssignAfterLocal = 0x5925,
    AssignAfterField = 0x5926,
    AssignBeforeLocal = 0x5935,
    AssignBeforeField = 0x5936,

    PutIntoField = 0x5a06,
    PutIntoVar = 0x5a12,
    PutIntoLocal = 0x5a15,
    PutIntoFieldChunk = 0x5a16,
    PutAfterVar = 0x5a22,
    PutAfterLocal = 0x5a25,
    PutAfterField = 0x5a26,
    PutBeforeVar = 0x5a32,
    PutBeforeLocal = 0x5a35,
    PutBeforeField = 0x5a36,

    DeleteVar = 0x5b02,
    DeleteLocal = 0x5b05,
    DeleteField = 0x5b06,

    GetSpecial = 0x5c00,
    GetNumberOf = 0x5c01,
    GetMenu = 0x5c02,
    GetMenuItem = 0x5c03,
    GetSound = 0x5c04,
    GetSprite = 0x5c06,
    GetSystem = 0x5c07,
    GetCastCount = 0x5c08,
    GetCast = 0x5c09,
    GetFieldProp = 0x5c0b,
    GetVideo = 0x5c0d,

    SetSpecial = 0x5d00,
    SetMenuItem = 0x5d03,
    SetSound = 0x5d04,
    SetSprite = 0x5d06,
    SetSystem = 0x5d07,
    SetCast = 0x5d09,
    SetFieldProp = 0x5d0b,
    SetVideo = 0x5d0d,
}

impl PairOpCode {
    pub fn from_pair(prefix: u8, sub: u8) -> Option<PairOpCode> {
        num::FromPrimitive::from_u16(((prefix as u16) << 8) | sub as u16)
    }
}
