//! Member access and method dispatch.
//!
//! `receiver.name` reads a field of a class instance or a global of an
//! imported module. `receiver.name(args)` resolves, in order, by the kind
//! of the receiver:
//!
//! - module: a function, class or closure-valued global of that module,
//! - class instance: a method, or a member holding a closure,
//! - anything else: a member intrinsic keyed by the receiver's kind.
//!
//! Non-`pub` members are only reachable from code running inside the
//! instance (or module) itself.

use earl_ir::{Expr, ExprKind, Span};

use super::place::Place;
use super::{Arg, Interpreter};
use crate::context::ContextRef;
use crate::errors::{no_such_member, not_callable, private_member, EvalError, EvalResult};
use crate::intrinsics::MemberFn;
use crate::value::{Value, ValueKind};

fn module_label(world: &ContextRef) -> String {
    match world.module_name() {
        Some(name) => format!("module {name}"),
        None => "module".to_string(),
    }
}

impl Interpreter {
    pub(crate) fn eval_get(&mut self, left: &Expr, right: &Expr, ctx: &ContextRef) -> EvalResult {
        match &right.kind {
            ExprKind::Ident(_) => self.eval_field_place(left, right, ctx)?.get(),
            ExprKind::FuncCall { id, args } => {
                self.eval_method_call(left, id, args, ctx, right.span)
            }
            _ => Err(EvalError::new(
                "the right side of `.` must be a name or a call",
            )),
        }
    }

    /// The place behind `left.field`.
    pub(crate) fn eval_field_place(
        &mut self,
        left: &Expr,
        right: &Expr,
        ctx: &ContextRef,
    ) -> Result<Place, EvalError> {
        let field = right.as_ident().unwrap_or_default();
        match self.eval_expr(left, ctx)? {
            Value::Class(instance) => {
                let class = instance.class_name().unwrap_or_default();
                let var = instance
                    .member(field)
                    .ok_or_else(|| no_such_member(field, &class))?;
                if !var.is_pub() && !ctx.is_within(&instance) {
                    return Err(private_member(field, &class));
                }
                Ok(Place::var(var))
            }
            Value::Module(world) => {
                let var = world
                    .local_variable(field)
                    .ok_or_else(|| no_such_member(field, &module_label(&world)))?;
                if !var.is_pub() && !ctx.root_world().ptr_eq(&world) {
                    return Err(private_member(field, &module_label(&world)));
                }
                Ok(Place::var(var))
            }
            other => Err(no_such_member(field, &other.type_name())),
        }
    }

    #[tracing::instrument(level = "trace", skip(self, left, args, ctx, span))]
    fn eval_method_call(
        &mut self,
        left: &Expr,
        name: &str,
        args: &[Expr],
        ctx: &ContextRef,
        span: Span,
    ) -> EvalResult {
        let receiver = self.eval_place(left, ctx)?;
        let args = self.eval_args(args, ctx)?;
        match receiver.read(|v| Ok(v.kind()))? {
            ValueKind::Class => match receiver.get()? {
                Value::Class(instance) => self.call_method(&instance, name, args, ctx, span),
                other => Err(no_such_member(name, &other.type_name())),
            },
            ValueKind::Module => match receiver.get()? {
                Value::Module(world) => self.call_module_member(&world, name, args, ctx, span),
                other => Err(no_such_member(name, &other.type_name())),
            },
            kind => self.call_member_intrinsic(&receiver, kind, name, args, span),
        }
    }

    fn call_method(
        &mut self,
        instance: &ContextRef,
        name: &str,
        args: Vec<Arg>,
        ctx: &ContextRef,
        span: Span,
    ) -> EvalResult {
        let class = instance.class_name().unwrap_or_default();
        let inside = ctx.is_within(instance);
        if let Some(method) = instance.local_function(name) {
            if !method.is_pub() && !inside {
                return Err(private_member(name, &class));
            }
            return self.call_function(&method, args, span);
        }
        if let Some(member) = instance.member(name) {
            if !member.is_pub() && !inside {
                return Err(private_member(name, &class));
            }
            return match member.get() {
                Value::Closure(closure) => self.invoke_closure(&closure, args, span),
                other => Err(not_callable(name, &other.type_name())),
            };
        }
        Err(no_such_member(name, &class))
    }

    fn call_module_member(
        &mut self,
        world: &ContextRef,
        name: &str,
        args: Vec<Arg>,
        ctx: &ContextRef,
        span: Span,
    ) -> EvalResult {
        let inside = ctx.root_world().ptr_eq(world);
        if let Some(func) = world.local_function(name) {
            if !func.is_pub() && !inside {
                return Err(private_member(name, &module_label(world)));
            }
            return self.call_function(&func, args, span);
        }
        if let Some(decl) = world.class_lookup(name) {
            if !decl.attrs.is_pub() && !inside {
                return Err(private_member(name, &module_label(world)));
            }
            return self.instantiate(decl, world, args, span);
        }
        if let Some(var) = world.local_variable(name) {
            if !var.is_pub() && !inside {
                return Err(private_member(name, &module_label(world)));
            }
            return match var.get() {
                Value::Closure(closure) => self.invoke_closure(&closure, args, span),
                other => Err(not_callable(name, &other.type_name())),
            };
        }
        Err(no_such_member(name, &module_label(world)))
    }

    /// Member intrinsics read or edit the receiver where it lives, so
    /// `xs.append(1)` changes `xs` itself.
    fn call_member_intrinsic(
        &mut self,
        receiver: &Place,
        kind: ValueKind,
        name: &str,
        args: Vec<Arg>,
        span: Span,
    ) -> EvalResult {
        let Some(member) = self.intrinsics.member(kind, name) else {
            return Err(no_such_member(name, kind.as_str()));
        };
        let values: Vec<Value> = args.into_iter().map(|a| a.value).collect();
        match member {
            MemberFn::Read(f) => receiver.read(|v| f(v, &values)),
            MemberFn::Mutate(f) => receiver.modify(|v| f(v, &values)),
            MemberFn::Apply(f) => {
                let snapshot = receiver.get()?;
                f(self, &snapshot, &values, span)
            }
        }
    }
}
