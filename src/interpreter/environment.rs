use std::collections::HashMap;
use std::rc::Rc;
use crate::interpreter::ast::FunctionDef;
use crate::interpreter::value::Value;

/// Variable bindings of the running scope plus the global function table.
///
/// A function call does not get a linked child scope. Instead, the whole variable
/// map is snapshotted before the call and put back afterwards, so the callee sees
/// every variable of its caller but none of its writes survive the call.
#[derive(Debug, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
    functions: HashMap<String, Rc<FunctionDef>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Binds `name`, silently replacing any previous value.
    pub fn set_variable(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_owned(), value);
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn find_function(&self, name: &str) -> Option<Rc<FunctionDef>> {
        self.functions.get(name).map(Rc::clone)
    }

    pub fn define_function(&mut self, function: Rc<FunctionDef>) {
        self.functions.insert(function.name.clone(), function);
    }

    /// Copies the current variable scope. Hand the result back to [`Environment::restore`].
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.variables.clone()
    }

    pub fn restore(&mut self, variables: HashMap<String, Value>) {
        self.variables = variables;
    }
}
