use js_sys::{Array, Map, Object};
use wasm_bindgen::prelude::*;

use crate::{
    config::{DecompilerConfig, OutputTarget},
    director::lingo::decompiler::DecompileError,
};

pub fn safe_string(s: &str) -> String {
    String::from_utf8_lossy(s.as_bytes()).into_owned()
}

pub fn safe_js_string(s: &str) -> JsValue {
    JsValue::from_str(&safe_string(s))
}

pub trait ToJsValue {
    fn to_js_value(&self) -> JsValue;
}

pub trait JsSerializable {
    fn to_js_object(&self) -> Object;
}

pub trait JsUtils {
    fn str_set(&self, key: &str, value: &JsValue);
}

impl JsSerializable for Map {
    fn to_js_object(&self) -> Object {
        Object::from_entries(self).unwrap_or_else(|_| Object::new())
    }
}

impl JsUtils for Map {
    fn str_set(&self, key: &str, value: &JsValue) {
        self.set(&safe_js_string(key), value);
    }
}

impl ToJsValue for DecompileError {
    fn to_js_value(&self) -> JsValue {
        let map = Map::new();
        map.str_set("message", &safe_js_string(&self.to_string()));
        if let Some(offset) = self.offset() {
            map.str_set("offset", &JsValue::from_f64(offset as f64));
        }
        if let Some(opcode) = self.opcode() {
            map.str_set("opcode", &JsValue::from_f64(opcode as f64));
        }
        map.to_js_object().into()
    }
}

fn decompile_to(
    lnam: &[u8],
    lscr: &[u8],
    config: &DecompilerConfig,
) -> Result<String, JsValue> {
    let script = crate::decompile_with(lnam, lscr, config).map_err(|err| err.to_js_value())?;
    Ok(crate::render(&script, config))
}

/// Decompiles an LNAM/LSCR pair to Lingo source. Failures throw `{message, offset, opcode}`.
#[wasm_bindgen]
pub fn decompile_to_lingo(lnam: &[u8], lscr: &[u8]) -> Result<String, JsValue> {
    decompile_to(lnam, lscr, &DecompilerConfig::default())
}

#[wasm_bindgen]
pub fn decompile_to_js(
    lnam: &[u8],
    lscr: &[u8],
    factory: Option<String>,
) -> Result<String, JsValue> {
    let mut config = DecompilerConfig::default().with_target(OutputTarget::Js);
    config.factory = factory;
    decompile_to(lnam, lscr, &config)
}

/// Lists the handler names of a script without rendering it.
#[wasm_bindgen]
pub fn list_handlers(lnam: &[u8], lscr: &[u8]) -> Result<Array, JsValue> {
    let script = crate::decompile(lnam, lscr).map_err(|err| err.to_js_value())?;
    Ok(script
        .functions
        .iter()
        .map(|function| safe_js_string(&function.name))
        .collect())
}
