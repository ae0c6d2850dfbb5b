//! Calls: intrinsics, user functions, closures and class instantiation.

use std::rc::Rc;

use earl_ir::{Attrs, ClassDecl, Param, Span};

use super::{Arg, Flow, Interpreter};
use crate::context::{ContextRef, CtorTmpGuard, Function, Variable};
use crate::diagnostics::CallFrame;
use crate::errors::{
    not_callable, undeclared_function, wrong_arg_count, EvalError, EvalResult,
};
use crate::stack::ensure_sufficient_stack;
use crate::value::{check_ann, ClosureValue, Value};

/// Build the variable a parameter is bound to.
///
/// A `ref` parameter aliases the caller's variable when the argument was a
/// bare name; otherwise it gets its own copy like any other parameter.
fn bind_param(param: &Param, arg: Arg) -> Result<Variable, EvalError> {
    if param.is_ref() {
        if let Some(var) = arg.var {
            if let Some(ty) = &param.ty {
                var.with(|v| check_ann(v.clone(), Some(ty)))?;
            }
            return Ok(var);
        }
    }
    let value = check_ann(arg.value, param.ty.as_ref())?;
    Ok(Variable::new(
        param.id.as_str(),
        value,
        param.attrs.difference(Attrs::REF),
    ))
}

fn check_arity(name: &str, params: &[Param], args: &[Arg]) -> Result<(), EvalError> {
    if params.len() == args.len() {
        Ok(())
    } else {
        Err(wrong_arg_count(name, params.len(), args.len()))
    }
}

fn bind_params(params: &[Param], args: Vec<Arg>, ctx: &ContextRef) -> Result<(), EvalError> {
    for (param, arg) in params.iter().zip(args) {
        let var = bind_param(param, arg)?;
        ctx.variable_alias(&param.id, var)?;
    }
    Ok(())
}

impl Interpreter {
    /// `id(args)`: intrinsic, then class, then user function, then a
    /// variable holding a closure.
    pub(crate) fn eval_call(
        &mut self,
        id: &str,
        args: Vec<Arg>,
        ctx: &ContextRef,
        span: Span,
    ) -> EvalResult {
        if let Some(intrinsic) = self.intrinsics.free(id) {
            let values: Vec<Value> = args.into_iter().map(|a| a.value).collect();
            return intrinsic(self, &values);
        }
        if let Some(decl) = ctx.class_lookup(id) {
            return self.instantiate(decl, &ctx.root_world(), args, span);
        }
        if let Some(func) = ctx.function_lookup(id) {
            return self.call_function(&func, args, span);
        }
        match ctx.variable_lookup(id).map(|var| var.get()) {
            Some(Value::Closure(closure)) => self.invoke_closure(&closure, args, span),
            Some(other) => Err(not_callable(id, &other.type_name())),
            None => Err(undeclared_function(id)),
        }
    }

    /// Run `f` inside a call frame. Errors leaving the frame get a
    /// backtrace and the call-site span.
    fn with_frame(
        &mut self,
        name: &str,
        span: Span,
        f: impl FnOnce(&mut Self) -> EvalResult,
    ) -> EvalResult {
        self.call_stack.push(CallFrame {
            name: name.to_string(),
            call_span: Some(span),
        })?;
        let result = ensure_sufficient_stack(|| f(self));
        let result = result.map_err(|e| self.call_stack.attach_backtrace(e).with_span(span));
        self.call_stack.pop();
        result
    }

    /// Call a user function or method.
    ///
    /// Each call gets its own Function context chained to the declaring
    /// context, so recursion never shares locals. The context, and with it
    /// every local, is released when the call returns unless a closure
    /// created during the call still holds it.
    #[tracing::instrument(level = "debug", skip_all, fields(function = func.name()))]
    pub(crate) fn call_function(
        &mut self,
        func: &Function,
        args: Vec<Arg>,
        span: Span,
    ) -> EvalResult {
        let decl = Rc::clone(func.decl());
        check_arity(&decl.id, &decl.params, &args)?;
        let owner = func
            .owner()
            .ok_or_else(|| EvalError::new(format!("`{}` outlived its declaring context", decl.id)))?;
        let call_ctx = ContextRef::function(&owner, &decl.id);
        bind_params(&decl.params, args, &call_ctx)?;

        let value = self.with_frame(&decl.id, span, |interp| {
            match interp.exec_block(&decl.body, &call_ctx)? {
                Flow::Return(value) => Ok(value),
                Flow::Normal(_) => Ok(Value::Unit),
            }
        })?;
        check_ann(value, decl.ret.as_ref()).map_err(|e| e.with_span(span))
    }

    /// Call a closure; its body sees the captured context.
    pub(crate) fn invoke_closure(
        &mut self,
        closure: &ClosureValue,
        args: Vec<Arg>,
        span: Span,
    ) -> EvalResult {
        check_arity("closure", &closure.expr.params, &args)?;
        let captured = closure
            .captured()
            .ok_or_else(|| EvalError::new("closure outlived its defining context"))?;
        let call_ctx = ContextRef::closure(&captured);
        bind_params(&closure.expr.params, args, &call_ctx)?;
        let body = &closure.expr.body;
        self.with_frame("<closure>", span, |interp| {
            match interp.exec_block(body, &call_ctx)? {
                Flow::Return(value) => Ok(value),
                Flow::Normal(_) => Ok(Value::Unit),
            }
        })
    }

    /// Build an instance of `decl`.
    ///
    /// Constructor arguments are staged in the instance's transient scope
    /// while member initialisers and the `constructor` method run, and are
    /// dropped afterwards whether or not construction succeeded.
    #[tracing::instrument(level = "debug", skip_all, fields(class = %decl.id))]
    pub(crate) fn instantiate(
        &mut self,
        decl: Rc<ClassDecl>,
        world: &ContextRef,
        args: Vec<Arg>,
        span: Span,
    ) -> EvalResult {
        check_arity(&decl.id, &decl.ctor_params, &args)?;
        let instance = ContextRef::class(world, Rc::clone(&decl));
        let ctor_tmp = CtorTmpGuard::new(&instance);

        for (param, arg) in decl.ctor_params.iter().zip(args) {
            let var = bind_param(param, arg)?;
            instance.fill_ctor_tmp(&param.id, var)?;
        }
        for method in &decl.methods {
            instance.function_add(Rc::new(Function::new(Rc::clone(method), &instance)))?;
        }

        self.with_frame(&decl.id, span, |interp| {
            for member in &decl.members {
                let value = interp.eval_expr(&member.expr, &instance)?;
                let value = check_ann(value, member.ty.as_ref()).map_err(|e| e.with_span(member.span))?;
                instance.variable_add(Variable::new(member.id.as_str(), value, member.attrs))?;
            }
            if let Some(ctor) = instance.local_function("constructor") {
                interp.call_function(&ctor, Vec::new(), span)?;
            }
            Ok(Value::Unit)
        })?;

        drop(ctor_tmp);
        tracing::trace!(members = instance.member_names().len(), "instance built");
        Ok(Value::Class(instance))
    }
}
