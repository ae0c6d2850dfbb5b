use std::rc::Rc;

use earl_ir::ClosureExpr;

use crate::context::{ContextLink, ContextRef};

/// A closure: its literal plus the context it was created in.
///
/// A captured call or instance is held strongly so a closure returned from
/// a function still sees that call's parameters and locals. A captured
/// World is held weakly, since the World usually stores the closure itself.
pub struct ClosureValue {
    pub expr: Rc<ClosureExpr>,
    captured: ContextLink,
}

impl ClosureValue {
    pub fn new(expr: Rc<ClosureExpr>, captured: &ContextRef) -> Self {
        ClosureValue {
            expr,
            captured: ContextLink::new(captured),
        }
    }

    /// The context the closure was created in, if it is still alive.
    pub fn captured(&self) -> Option<ContextRef> {
        self.captured.get()
    }

    pub fn arity(&self) -> usize {
        self.expr.params.len()
    }
}
