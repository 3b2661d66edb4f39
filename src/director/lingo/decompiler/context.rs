use log::warn;

use super::ast::NodeRef;

/// Placeholder for name indices that fall outside the LNAM table.
pub const NONAME: &str = "noname";

/// Per-script state shared by every handler of one LSCR chunk.
pub struct Context {
    pub name_list: Vec<String>,
    /// Literal pool, already rendered to source text.
    pub constants: Vec<String>,
    pub local_func_names: Vec<String>,
    pub properties: Vec<String>,
    pub bytes_per_constant: usize,
    tell_stack: Vec<(usize, NodeRef)>,
}

impl Context {
    pub fn new(name_list: Vec<String>, constants: Vec<String>, bytes_per_constant: usize) -> Self {
        Self {
            name_list,
            constants,
            local_func_names: vec![],
            properties: vec![],
            bytes_per_constant: bytes_per_constant.max(1),
            tell_stack: vec![],
        }
    }

    /// Name for an i16 index read from the chunk header or a variable table.
    pub fn resolve_name(&self, name_id: i16) -> String {
        usize::try_from(name_id)
            .ok()
            .and_then(|index| self.name_list.get(index))
            .cloned()
            .unwrap_or_else(|| {
                warn!("name index {} outside the name table", name_id);
                NONAME.to_owned()
            })
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.name_list.get(index).map(String::as_str)
    }

    /// Turns a byte-scaled operand into a table index. A remainder narrows the
    /// scale for the rest of the script.
    pub fn descale(&mut self, raw: usize) -> usize {
        let remainder = raw % self.bytes_per_constant;
        if remainder > 0 {
            self.bytes_per_constant = remainder;
        }
        raw / self.bytes_per_constant
    }

    pub fn open_tell(&mut self, position: usize, target: NodeRef) {
        self.tell_stack.push((position, target));
    }

    /// Closes the innermost tell, returning the position of its statement.
    pub fn close_tell(&mut self) -> Option<usize> {
        self.tell_stack.pop().map(|(position, _)| position)
    }

    pub fn tell_object(&self) -> Option<&NodeRef> {
        self.tell_stack.last().map(|(_, target)| target)
    }

    pub fn reset_tells(&mut self) {
        self.tell_stack.clear();
    }
}
