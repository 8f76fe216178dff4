use std::{collections::HashMap, rc::Rc};

use tracing::trace;

use crate::{config::UnboundNames, error::EvalError, value::{Function, Value}};


/// One scope level. Constants and functions live in separate namespaces, so a name may
/// denote both at once.
#[derive(Debug, Default)]
struct Frame<'a> {
    constants: HashMap<&'a str, Value<'a>>,
    functions: HashMap<&'a str, Rc<Function<'a>>>,
    // Index of the parent in the stack; always below this frame
    parent: Option<usize>,
}

/// The stack of active frames. Frame 0 is the global frame and is never popped.
///
/// There are two ways in: [`Environment::push_call_frame`] parents the new frame at the
/// global frame, so a function body never sees its caller's locals, while
/// [`Environment::push_let_frame`] parents it at the current frame.
#[derive(Debug)]
pub struct Environment<'a> {
    frames: Vec<Frame<'a>>,
    unbound: UnboundNames,
}

impl<'a> Environment<'a> {
    pub fn new(unbound: UnboundNames) -> Self {
        Self {
            frames: vec![Frame::default()],
            unbound,
        }
    }

    /// Number of frames pushed on top of the global one.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    fn current(&self) -> usize {
        self.frames.len() - 1
    }

    fn current_mut(&mut self) -> &mut Frame<'a> {
        let current = self.current();
        &mut self.frames[current]
    }

    fn push(&mut self, parent: usize, bindings: impl IntoIterator<Item = (&'a str, Value<'a>)>) {
        self.frames.push(Frame {
            constants: bindings.into_iter().collect(),
            functions: HashMap::new(),
            parent: Some(parent),
        });
    }

    pub fn push_call_frame(&mut self, bindings: impl IntoIterator<Item = (&'a str, Value<'a>)>) {
        self.push(0, bindings)
    }

    pub fn push_let_frame(&mut self, bindings: impl IntoIterator<Item = (&'a str, Value<'a>)>) {
        self.push(self.current(), bindings)
    }

    pub fn pop_frame(&mut self) {
        debug_assert!(self.frames.len() > 1, "the global frame is never popped");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn define_constant(&mut self, name: &'a str, value: Value<'a>) {
        self.current_mut().constants.insert(name, value);
    }

    pub fn define_function(&mut self, name: &'a str, function: Function<'a>) {
        self.current_mut().functions.insert(name, Rc::new(function));
    }

    /// Walks the chain outward from the current frame.
    fn find<T>(&self, lookup: impl Fn(&Frame<'a>) -> Option<T>) -> Option<T> {
        let mut index = Some(self.current());
        while let Some(current) = index {
            let frame = &self.frames[current];
            if let Some(found) = lookup(frame) {
                return Some(found);
            }
            index = frame.parent;
        }
        None
    }

    pub fn get_constant(&self, name: &str) -> Option<Value<'a>> {
        self.find(|frame| frame.constants.get(name).cloned())
    }

    pub fn get_function(&self, name: &str) -> Option<Rc<Function<'a>>> {
        self.find(|frame| frame.functions.get(name).cloned())
    }

    /// Resolves a constant. A name bound nowhere comes back as its own symbol, unless
    /// the environment is strict.
    pub fn lookup_constant(&self, name: &str) -> Result<Value<'a>, EvalError> {
        match self.get_constant(name) {
            Some(value) => Ok(value),
            None if self.unbound == UnboundNames::Strict => Err(EvalError::UnboundName { name: name.to_owned() }),
            None => {
                trace!(name, "unbound name evaluates to itself");
                Ok(Value::symbol(name))
            }
        }
    }

    /// Resolves a function. A miss yields the name as a symbol; invoking it is what fails.
    pub fn lookup_function(&self, name: &str) -> Value<'a> {
        match self.get_function(name) {
            Some(function) => Value::Function(function),
            None => Value::symbol(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &'static str) -> Function<'static> {
        Function::new(name, vec![], &[])
    }

    #[test]
    fn lookup_walks_outward() {
        let mut env = Environment::new(UnboundNames::Permissive);
        env.define_constant("x", Value::Integer(1));
        env.push_let_frame([("y", Value::Integer(2))]);
        env.push_let_frame([]);

        assert_eq!(env.lookup_constant("x").ok(), Some(Value::Integer(1)));
        assert_eq!(env.lookup_constant("y").ok(), Some(Value::Integer(2)));
    }

    #[test]
    fn unbound_name_is_its_own_symbol() {
        let env = Environment::new(UnboundNames::Permissive);
        assert_eq!(env.lookup_constant("nowhere").ok(), Some(Value::symbol("nowhere")));
        assert_eq!(env.lookup_function("nowhere"), Value::symbol("nowhere"));
    }

    #[test]
    fn strict_environment_rejects_unbound_names() {
        let env = Environment::new(UnboundNames::Strict);
        assert!(matches!(env.lookup_constant("nowhere"), Err(EvalError::UnboundName { .. })));
    }

    #[test]
    fn call_frames_only_see_globals() {
        let mut env = Environment::new(UnboundNames::Permissive);
        env.define_constant("global", Value::Integer(1));
        env.push_let_frame([("local", Value::Integer(2))]);
        env.push_call_frame([("param", Value::Integer(3))]);

        assert_eq!(env.lookup_constant("global").ok(), Some(Value::Integer(1)));
        assert_eq!(env.lookup_constant("param").ok(), Some(Value::Integer(3)));
        assert_eq!(env.lookup_constant("local").ok(), Some(Value::symbol("local")));

        env.pop_frame();
        assert_eq!(env.lookup_constant("local").ok(), Some(Value::Integer(2)));
    }

    #[test]
    fn definitions_stay_in_the_current_frame() {
        let mut env = Environment::new(UnboundNames::Permissive);
        env.push_let_frame([]);
        env.define_constant("x", Value::Integer(5));
        env.define_function("f", function("f"));
        assert!(env.get_function("f").is_some());

        env.pop_frame();
        assert!(env.get_constant("x").is_none());
        assert!(env.get_function("f").is_none());
    }

    #[test]
    fn constants_and_functions_do_not_collide() {
        let mut env = Environment::new(UnboundNames::Permissive);
        env.define_constant("f", Value::Integer(7));
        env.define_function("f", function("f"));

        assert_eq!(env.lookup_constant("f").ok(), Some(Value::Integer(7)));
        assert!(matches!(env.lookup_function("f"), Value::Function(_)));
    }

    #[test]
    fn later_definitions_overwrite() {
        let mut env = Environment::new(UnboundNames::Permissive);
        env.define_constant("x", Value::Integer(1));
        env.define_constant("x", Value::Integer(2));
        assert_eq!(env.lookup_constant("x").ok(), Some(Value::Integer(2)));
    }

    #[test]
    fn global_frame_survives_pops() {
        let mut env = Environment::new(UnboundNames::Permissive);
        env.push_call_frame([]);
        assert_eq!(env.depth(), 1);
        env.pop_frame();
        assert_eq!(env.depth(), 0);
    }
}
