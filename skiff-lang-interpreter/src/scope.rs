use std::collections::HashMap;

use gc::{Finalize, Gc, GcCell, Trace};

use crate::value::{EvaluationError, Value};

#[derive(Debug, Trace, Finalize)]
struct Frame {
    symbols: HashMap<String, Gc<Value>>,
    parent: Option<Scope>,
}

/// One level of the lexical scope chain. `Scope` is a cheap handle: clones
/// share the same frame, which is how closures keep their defining scope
/// alive and visible to each other.
#[derive(Debug, Clone, Trace, Finalize)]
pub struct Scope {
    frame: Gc<GcCell<Frame>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            frame: Gc::new(GcCell::new(Frame {
                symbols: HashMap::new(),
                parent: None,
            })),
        }
    }

    pub fn nested(parent: &Scope) -> Self {
        Scope {
            frame: Gc::new(GcCell::new(Frame {
                symbols: HashMap::new(),
                parent: Some(parent.clone()),
            })),
        }
    }

    /// Binds `name` in this exact frame. Shadowing an outer binding is fine;
    /// redeclaring within the frame is not.
    pub fn declare(&self, name: &str, value: Gc<Value>) -> Result<(), EvaluationError> {
        let mut frame = self.frame.borrow_mut();
        if frame.symbols.contains_key(name) {
            return Err(EvaluationError::DuplicateBinding(name.into()));
        }
        frame.symbols.insert(name.to_owned(), value);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<Gc<Value>, EvaluationError> {
        self.resolve(name)
            .and_then(|scope| scope.frame.borrow().symbols.get(name).cloned())
            .ok_or_else(|| EvaluationError::UnresolvedSymbol(name.into()))
    }

    /// Overwrites the binding in the frame where `name` was declared. Never
    /// creates a binding.
    pub fn assign(&self, name: &str, value: Gc<Value>) -> Result<(), EvaluationError> {
        let target = self
            .resolve(name)
            .ok_or_else(|| EvaluationError::UnresolvedSymbol(name.into()))?;
        target.frame.borrow_mut().symbols.insert(name.to_owned(), value);
        Ok(())
    }

    // Iterative walk from the innermost frame outward; the first frame
    // holding the symbol wins.
    fn resolve(&self, name: &str) -> Option<Scope> {
        let mut current = self.clone();
        loop {
            if current.frame.borrow().symbols.contains_key(name) {
                return Some(current);
            }
            let parent = current.frame.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Gc::ptr_eq(&self.frame, &other.frame)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let scope = Scope::new();
        scope.declare("x", Value::integer(5)).unwrap();
        assert_eq!(scope.lookup("x"), Ok(Value::integer(5)));
        assert_eq!(
            scope.lookup("y"),
            Err(EvaluationError::UnresolvedSymbol("y".into()))
        );
    }

    #[test]
    fn test_duplicate_binding() {
        let scope = Scope::new();
        scope.declare("x", Value::integer(5)).unwrap();
        assert_eq!(
            scope.declare("x", Value::integer(6)),
            Err(EvaluationError::DuplicateBinding("x".into()))
        );
    }

    #[test]
    fn test_shadowing_is_allowed() {
        let outer = Scope::new();
        outer.declare("x", Value::integer(1)).unwrap();
        let inner = Scope::nested(&outer);
        inner.declare("x", Value::integer(2)).unwrap();
        assert_eq!(inner.lookup("x"), Ok(Value::integer(2)));
        assert_eq!(outer.lookup("x"), Ok(Value::integer(1)));
    }

    #[test]
    fn test_lookup_walks_outward() {
        let outer = Scope::new();
        outer.declare("x", Value::integer(1)).unwrap();
        let middle = Scope::nested(&outer);
        let inner = Scope::nested(&middle);
        assert_eq!(inner.lookup("x"), Ok(Value::integer(1)));
    }

    #[test]
    fn test_assign_mutates_declaring_frame() {
        let outer = Scope::new();
        outer.declare("x", Value::integer(1)).unwrap();
        let inner = Scope::nested(&outer);
        inner.assign("x", Value::integer(2)).unwrap();
        assert_eq!(outer.lookup("x"), Ok(Value::integer(2)));
    }

    #[test]
    fn test_assign_requires_declaration() {
        let scope = Scope::new();
        assert_eq!(
            scope.assign("x", Value::integer(1)),
            Err(EvaluationError::UnresolvedSymbol("x".into()))
        );
    }
}
