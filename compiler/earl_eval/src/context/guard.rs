//! RAII guards that undo context changes on every exit path, including
//! early returns through `?`.

use super::ContextRef;

/// Pushes a scope frame on creation and pops it on drop.
pub(crate) struct ScopeGuard<'a> {
    ctx: &'a ContextRef,
}

impl<'a> ScopeGuard<'a> {
    pub(crate) fn new(ctx: &'a ContextRef) -> Self {
        ctx.push_scope();
        ScopeGuard { ctx }
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.ctx.pop_scope();
    }
}

/// Clears an instance's constructor arguments on drop.
pub(crate) struct CtorTmpGuard<'a> {
    instance: &'a ContextRef,
}

impl<'a> CtorTmpGuard<'a> {
    pub(crate) fn new(instance: &'a ContextRef) -> Self {
        CtorTmpGuard { instance }
    }
}

impl Drop for CtorTmpGuard<'_> {
    fn drop(&mut self) {
        self.instance.clear_ctor_tmp();
    }
}
