use fxhash::FxHashMap;
use lazy_static::lazy_static;

pub const SPECIAL_PROPERTIES: [&str; 6] = [
  "floatPrecision",
  "mouseDownScript",
  "mouseUpScript",
  "keyDownScript",
  "keyUpScript",
  "timeoutScript",
];

pub const DATE_TIME_FUNCTIONS: [&str; 6] = [
  "short time",
  "abbr time",
  "long time",
  "short date",
  "abbr date",
  "long date",
];

/// Chunk kinds indexed by the operand of the "number of" and "last" builtins.
pub const OPERATION_TYPES: [&str; 5] = ["UNKNOWN", "char", "word", "item", "line"];

pub const MENUITEM_PROPERTIES: [&str; 5] = ["UNKNOWN0", "name", "checkMark", "enabled", "script"];

pub const NUM_OF_TYPES: [&str; 4] = ["UNKNOWN0", "perFrameHook", "castMembers", "menus"];

pub const SOUND_PROPERTIES: [&str; 2] = ["UNKNOWN0", "volume"];

pub const SPRITE_PROPERTIES: [&str; 35] = [
  "UNKNOWN0",
  "type",
  "backColor",
  "bottom",
  "castNum",
  "constraint",
  "cursor",
  "foreColor",
  "height",
  "UNKNOWN1",
  "ink",
  "left",
  "lineSize",
  "locH",
  "locV",
  "movieRate",
  "movieTime",
  "UNKNOWN2",
  "puppet",
  "right",
  "startTime",
  "stopTime",
  "stretch",
  "top",
  "trails",
  "visible",
  "volume",
  "width",
  "blend",
  "scriptNum",
  "moveableSprite",
  "editabletext",
  "scoreColor",
  "loc",
  "rect",
];

pub const CAST_PROPERTIES: [&str; 19] = [
  "UNKNOWN0",
  "name",
  "text",
  "textStyle",
  "textFont",
  "textHeight",
  "textAlign",
  "textSize",
  "picture",
  "hilite",
  "number",
  "size",
  "UNKNOWN8",
  "UNKNOWN9",
  "UNKNOWNA",
  "UNKNOWNB",
  "UNKNOWNC",
  "foreColor",
  "backColor",
];

pub const VIDEO_PROPERTIES: [&str; 17] = [
  "UNKNOWN0",
  "UNKNOWN1",
  "UNKNOWN2",
  "UNKNOWN3",
  "UNKNOWN4",
  "UNKNOWN5",
  "UNKNOWN6",
  "UNKNOWN7",
  "UNKNOWN8",
  "UNKNOWN9",
  "UNKNOWNA",
  "UNKNOWNB",
  "loop",
  "duration",
  "controller",
  "directToStage",
  "sound",
];

/// System properties in operand order, each with the object that owns it.
pub const SYSTEM_PROPERTIES: [(&str, &str); 35] = [
  ("UNKNOWN_SYSTEM_PROPERTY_00", "UNKNOWN"),
  ("beepOn", "_movie"),
  ("buttonStyle", "_movie"),
  ("centerStage", "_movie"),
  ("checkBoxAccess", "_system"),
  ("checkBoxType", "_system"),
  ("colorDepth", "_system"),
  ("UNKNOWN_SYSTEM_PROPERTY_07", "UNKNOWN"),
  ("exitLock", "_movie"),
  ("fixStageSize", "_movie"),
  ("UNKNOWN_SYSTEM_PROPERTY_0A", "UNKNOWN"),
  ("UNKNOWN_SYSTEM_PROPERTY_0B", "UNKNOWN"),
  ("UNKNOWN_SYSTEM_PROPERTY_0C", "UNKNOWN"),
  ("UNKNOWN_SYSTEM_PROPERTY_0D", "UNKNOWN"),
  ("UNKNOWN_SYSTEM_PROPERTY_0E", "UNKNOWN"),
  ("UNKNOWN_SYSTEM_PROPERTY_0F", "UNKNOWN"),
  ("UNKNOWN_SYSTEM_PROPERTY_10", "UNKNOWN"),
  ("UNKNOWN_SYSTEM_PROPERTY_11", "UNKNOWN"),
  ("UNKNOWN_SYSTEM_PROPERTY_12", "UNKNOWN"),
  ("timeoutLapsed", "_system"),
  ("UNKNOWN_SYSTEM_PROPERTY_14", "UNKNOWN"),
  ("UNKNOWN_SYSTEM_PROPERTY_15", "UNKNOWN"),
  ("UNKNOWN_SYSTEM_PROPERTY_16", "UNKNOWN"),
  ("selEnd", "_movie"),
  ("selStart", "_movie"),
  ("soundEnabled", "_sound"),
  ("soundLevel", "_sound"),
  ("stageColor", "_movie"),
  // 0x1c is set when dontPassEvent has been called.
  ("UNKNOWN_SYSTEM_PROPERTY_1C", "UNKNOWN"),
  ("switchColorDepth", "_player"),
  ("timeoutKeyDown", "_system"),
  ("timeoutLength", "_system"),
  ("timeoutMouse", "_system"),
  ("timeoutPlay", "_system"),
  ("timer", "_system"),
];

/// Symbols that read as plain words in Lingo source.
pub const KNOWN_SYMBOLS: [&str; 8] = [
  "loop", "next", "previous", "playFile", "fadeIn", "fadeOut", "stop", "close",
];

/// List builtins whose first symbol argument names a global.
pub const LIST_FUNCTIONS: [&str; 7] = [
  "findpos",
  "findposnear",
  "getaprop",
  "getone",
  "getpos",
  "getpropat",
  "getprop",
];

lazy_static! {
  /// Movie properties loaded through 0x5f that belong to a specific object.
  pub static ref MOVIE_PROPERTY_OWNERS: FxHashMap<&'static str, &'static str> =
    FxHashMap::from_iter([("updateMovieEnabled", "_movie")]);

  pub static ref JS_PROPERTY_OWNERS: FxHashMap<&'static str, &'static str> = FxHashMap::from_iter([
    ("actorList", "_movie"),
    ("ancestor", "me"),
    ("floatPrecision", "_system"),
    ("mouseDownScript", "_system"),
    ("mouseUpScript", "_system"),
    ("keyDownScript", "_system"),
    ("keyUpScript", "_system"),
    ("timeoutScript", "_system"),
    ("itemDelimiter", "_player"),
  ]);

  /// Escaped string literals that Lingo spells as named constants.
  pub static ref PREDEFINED_CONSTANTS: FxHashMap<&'static str, &'static str> = FxHashMap::from_iter([
    ("\"\"", "EMPTY"),
    ("\"\\x08\"", "BACKSPACE"),
    ("\"\\x03\"", "ENTER"),
    ("\"\"\"", "QUOTE"),
    ("\"\\r\"", "RETURN"),
    ("\"\\t\"", "TAB"),
  ]);
}

pub fn is_list_function(name: &str) -> bool {
  LIST_FUNCTIONS.contains(&name.to_lowercase().as_str())
}
