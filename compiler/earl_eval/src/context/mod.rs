//! Execution contexts and name resolution.
//!
//! Every piece of running code sits in a context:
//!
//! - **World**: one per program or imported module. Holds globals,
//!   top-level functions, class blueprints and imports.
//! - **Function**: one per call, owned by the context the function was
//!   declared in (a World, a class instance or another call).
//! - **Class**: one per class instance. Its variables are the members,
//!   its functions are the methods bound to it.
//! - **Closure**: one per closure invocation, owned by the captured
//!   context.
//!
//! Variables resolve in the current context first and then outwards along
//! the owner chain to the World, so functions see globals and closures see
//! the locals of the call that created them. Inside methods the instance
//! members are consulted before the method's own locals.
//!
//! Links to a World are weak. Globals hold most of the values that point
//! back at their World (instances, closures), so a strong link would keep
//! every World alive after the program finishes. Links to calls and
//! instances stay strong: a closure returned from a call must still see
//! that call's locals. A closure stored in the locals of the very call it
//! captures still forms a cycle and is leaked.
//!
//! Functions resolve owner-first: a call made inside a function finds the
//! enclosing class's methods, then outer functions, then the World, and
//! only then functions declared locally.

mod function;
mod guard;
mod scope;
mod variable;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use earl_ir::ClassDecl;
use rustc_hash::FxHashMap;

pub use function::Function;
pub(crate) use guard::{CtorTmpGuard, ScopeGuard};
pub use scope::ScopeStack;
pub use variable::Variable;

use crate::errors::{
    redeclared, undeclared_function, undeclared_module, undeclared_variable, EvalError,
};

/// Which of the four context kinds a [`ContextRef`] is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContextTag {
    World,
    Function,
    Class,
    Closure,
}

pub struct WorldData {
    module: Option<String>,
    classes: FxHashMap<String, Rc<ClassDecl>>,
    imports: FxHashMap<String, ContextRef>,
}

pub struct ClassData {
    /// The World the class was declared in.
    owner: ContextLink,
    decl: Rc<ClassDecl>,
    /// Constructor arguments, visible only while the instance is built.
    ctor_tmp: FxHashMap<String, Variable>,
    /// Member names in declaration order.
    members: Vec<String>,
}

pub enum ContextKind {
    World(WorldData),
    Function { owner: ContextLink, name: String },
    Class(ClassData),
    Closure { owner: ContextLink },
}

pub struct Context {
    kind: ContextKind,
    vars: ScopeStack<Variable>,
    funcs: ScopeStack<Rc<Function>>,
}

impl Context {
    fn new(kind: ContextKind) -> Self {
        Context {
            kind,
            vars: ScopeStack::new(),
            funcs: ScopeStack::new(),
        }
    }

    fn owner(&self) -> Option<ContextRef> {
        match &self.kind {
            ContextKind::World(_) => None,
            ContextKind::Function { owner, .. } | ContextKind::Closure { owner } => owner.get(),
            ContextKind::Class(data) => data.owner.get(),
        }
    }

    fn insert_variable(&mut self, name: String, var: Variable) -> Result<(), EvalError> {
        let member = matches!(self.kind, ContextKind::Class(_)).then(|| name.clone());
        self.vars
            .insert(name, var)
            .map_err(|var| redeclared("variable", var.name()))?;
        if let (Some(name), ContextKind::Class(data)) = (member, &mut self.kind) {
            data.members.push(name);
        }
        Ok(())
    }
}

/// Shared handle to a context.
///
/// All accessors take short borrows and hand back owned values, so no
/// `RefCell` borrow is ever held while user code runs.
#[derive(Clone)]
pub struct ContextRef(Rc<RefCell<Context>>);

/// Non-owning handle, used by functions to point back at their owner.
#[derive(Clone)]
pub struct WeakContextRef(Weak<RefCell<Context>>);

impl WeakContextRef {
    pub fn upgrade(&self) -> Option<ContextRef> {
        self.0.upgrade().map(ContextRef)
    }
}

/// Link to an enclosing context: weak when it points at a World, strong
/// otherwise.
#[derive(Clone)]
pub enum ContextLink {
    Strong(ContextRef),
    World(WeakContextRef),
}

impl ContextLink {
    pub fn new(target: &ContextRef) -> Self {
        if target.is_world() {
            ContextLink::World(target.downgrade())
        } else {
            ContextLink::Strong(target.clone())
        }
    }

    /// The linked context; `None` once a weakly linked World is gone.
    pub fn get(&self) -> Option<ContextRef> {
        match self {
            ContextLink::Strong(ctx) => Some(ctx.clone()),
            ContextLink::World(world) => world.upgrade(),
        }
    }
}

impl ContextRef {
    fn new(kind: ContextKind) -> Self {
        ContextRef(Rc::new(RefCell::new(Context::new(kind))))
    }

    pub fn world() -> Self {
        Self::new(ContextKind::World(WorldData {
            module: None,
            classes: FxHashMap::default(),
            imports: FxHashMap::default(),
        }))
    }

    pub fn function(owner: &ContextRef, name: &str) -> Self {
        Self::new(ContextKind::Function {
            owner: ContextLink::new(owner),
            name: name.to_string(),
        })
    }

    /// A fresh, empty instance of `decl` declared in `owner`.
    pub fn class(owner: &ContextRef, decl: Rc<ClassDecl>) -> Self {
        Self::new(ContextKind::Class(ClassData {
            owner: ContextLink::new(owner),
            decl,
            ctor_tmp: FxHashMap::default(),
            members: Vec::new(),
        }))
    }

    pub fn closure(owner: &ContextRef) -> Self {
        Self::new(ContextKind::Closure {
            owner: ContextLink::new(owner),
        })
    }

    pub fn downgrade(&self) -> WeakContextRef {
        WeakContextRef(Rc::downgrade(&self.0))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ContextRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn tag(&self) -> ContextTag {
        match self.0.borrow().kind {
            ContextKind::World(_) => ContextTag::World,
            ContextKind::Function { .. } => ContextTag::Function,
            ContextKind::Class(_) => ContextTag::Class,
            ContextKind::Closure { .. } => ContextTag::Closure,
        }
    }

    pub fn owner(&self) -> Option<ContextRef> {
        self.0.borrow().owner()
    }

    /// The World at the end of the owner chain.
    pub fn root_world(&self) -> ContextRef {
        let mut current = self.clone();
        while let Some(owner) = current.owner() {
            current = owner;
        }
        current
    }

    /// The nearest class instance on the owner chain, including `self`.
    pub fn enclosing_class(&self) -> Option<ContextRef> {
        let mut current = Some(self.clone());
        while let Some(ctx) = current {
            if ctx.tag() == ContextTag::Class {
                return Some(ctx);
            }
            current = ctx.owner();
        }
        None
    }

    /// Whether `target` is `self` or appears on its owner chain.
    pub fn is_within(&self, target: &ContextRef) -> bool {
        let mut current = Some(self.clone());
        while let Some(ctx) = current {
            if ctx.ptr_eq(target) {
                return true;
            }
            current = ctx.owner();
        }
        false
    }

    // Scopes

    pub fn push_scope(&self) {
        let mut ctx = self.0.borrow_mut();
        ctx.vars.push();
        ctx.funcs.push();
    }

    pub fn pop_scope(&self) {
        let mut ctx = self.0.borrow_mut();
        ctx.vars.pop();
        ctx.funcs.pop();
    }

    pub fn scope_depth(&self) -> usize {
        self.0.borrow().vars.depth()
    }

    // Variables

    /// Declare `var` in the innermost scope of this context.
    ///
    /// Redeclaring a name already bound in that same scope is an error;
    /// shadowing an outer scope or an outer context is not.
    pub fn variable_add(&self, var: Variable) -> Result<(), EvalError> {
        let name = var.name().to_string();
        self.0.borrow_mut().insert_variable(name, var)
    }

    /// Bind an existing cell under another name (`ref` parameters).
    pub fn variable_alias(&self, name: &str, var: Variable) -> Result<(), EvalError> {
        self.0.borrow_mut().insert_variable(name.to_string(), var)
    }

    pub fn variable_lookup(&self, id: &str) -> Option<Variable> {
        let ctx = self.0.borrow();
        let owner = ctx.owner();
        let outer = || owner.as_ref().and_then(|owner| owner.variable_lookup(id));
        match &ctx.kind {
            ContextKind::World(_) => ctx.vars.get(id).cloned(),
            ContextKind::Function { .. } => owner
                .as_ref()
                .and_then(ContextRef::enclosing_class)
                .and_then(|class| class.member(id))
                .or_else(|| ctx.vars.get(id).cloned())
                .or_else(outer),
            ContextKind::Class(data) => ctx
                .vars
                .get(id)
                .or_else(|| data.ctor_tmp.get(id))
                .cloned()
                .or_else(outer),
            ContextKind::Closure { .. } => ctx.vars.get(id).cloned().or_else(outer),
        }
    }

    pub fn variable_get(&self, id: &str) -> Result<Variable, EvalError> {
        self.variable_lookup(id)
            .ok_or_else(|| undeclared_variable(id))
    }

    pub fn variable_exists(&self, id: &str) -> bool {
        self.variable_lookup(id).is_some()
    }

    /// Remove the innermost binding of `id` from this context's own scopes.
    pub fn variable_remove(&self, id: &str) -> Option<Variable> {
        self.0.borrow_mut().vars.remove(id)
    }

    /// A variable bound in this context itself, ignoring owners.
    pub fn local_variable(&self, id: &str) -> Option<Variable> {
        self.0.borrow().vars.get(id).cloned()
    }

    /// Instance member `id`; `None` unless this is a class context.
    pub fn member(&self, id: &str) -> Option<Variable> {
        let ctx = self.0.borrow();
        match ctx.kind {
            ContextKind::Class(_) => ctx.vars.get(id).cloned(),
            _ => None,
        }
    }

    // Functions

    pub fn function_add(&self, func: Rc<Function>) -> Result<(), EvalError> {
        let name = func.name().to_string();
        self.0
            .borrow_mut()
            .funcs
            .insert(name, func)
            .map_err(|func| redeclared("function", func.name()))
    }

    pub fn function_lookup(&self, id: &str) -> Option<Rc<Function>> {
        let ctx = self.0.borrow();
        let owner = ctx.owner();
        let outer = || owner.as_ref().and_then(|owner| owner.function_lookup(id));
        match &ctx.kind {
            ContextKind::World(_) => ctx.funcs.get(id).cloned(),
            ContextKind::Function { .. } | ContextKind::Closure { .. } => {
                outer().or_else(|| ctx.funcs.get(id).cloned())
            }
            ContextKind::Class(_) => ctx.funcs.get(id).cloned().or_else(outer),
        }
    }

    pub fn function_get(&self, id: &str) -> Result<Rc<Function>, EvalError> {
        self.function_lookup(id)
            .ok_or_else(|| undeclared_function(id))
    }

    pub fn function_exists(&self, id: &str) -> bool {
        self.function_lookup(id).is_some()
    }

    /// A function declared in this context itself (methods of an instance,
    /// top-level functions of a module).
    pub fn local_function(&self, id: &str) -> Option<Rc<Function>> {
        self.0.borrow().funcs.get(id).cloned()
    }

    // Class instances

    pub fn class_decl(&self) -> Option<Rc<ClassDecl>> {
        match &self.0.borrow().kind {
            ContextKind::Class(data) => Some(Rc::clone(&data.decl)),
            _ => None,
        }
    }

    pub fn class_name(&self) -> Option<String> {
        self.class_decl().map(|decl| decl.id.clone())
    }

    /// Member names in declaration order.
    pub fn member_names(&self) -> Vec<String> {
        match &self.0.borrow().kind {
            ContextKind::Class(data) => data.members.clone(),
            _ => Vec::new(),
        }
    }

    /// Make a constructor argument visible while members are initialised.
    pub fn fill_ctor_tmp(&self, name: &str, var: Variable) -> Result<(), EvalError> {
        match &mut self.0.borrow_mut().kind {
            ContextKind::Class(data) => {
                if data.ctor_tmp.contains_key(name) {
                    return Err(redeclared("parameter", name));
                }
                data.ctor_tmp.insert(name.to_string(), var);
                Ok(())
            }
            _ => Err(EvalError::new("constructor arguments outside a class")),
        }
    }

    pub fn clear_ctor_tmp(&self) {
        if let ContextKind::Class(data) = &mut self.0.borrow_mut().kind {
            data.ctor_tmp.clear();
        }
    }

    /// Duplicate a class instance: members are deep-copied and methods are
    /// rebound to the new instance.
    pub fn copy_instance(&self) -> ContextRef {
        let ctx = self.0.borrow();
        let ContextKind::Class(data) = &ctx.kind else {
            return self.clone();
        };
        let copy = ContextRef::new(ContextKind::Class(ClassData {
            owner: data.owner.clone(),
            decl: Rc::clone(&data.decl),
            ctor_tmp: FxHashMap::default(),
            members: Vec::new(),
        }));
        {
            let mut inner = copy.0.borrow_mut();
            for name in &data.members {
                if let Some(var) = ctx.vars.get(name) {
                    let value = var.with(crate::value::Value::copy);
                    let member = Variable::new(name.as_str(), value, var.attrs());
                    inner.vars.insert(name.clone(), member).ok();
                    if let ContextKind::Class(copy_data) = &mut inner.kind {
                        copy_data.members.push(name.clone());
                    }
                }
            }
            for method in &data.decl.methods {
                let func = Rc::new(Function::new(Rc::clone(method), &copy));
                inner.funcs.insert(method.id.clone(), func).ok();
            }
        }
        copy
    }

    // Worlds

    pub fn is_world(&self) -> bool {
        self.tag() == ContextTag::World
    }

    /// Register a class blueprint in the root World.
    pub fn define_class(&self, decl: Rc<ClassDecl>) -> Result<(), EvalError> {
        let world = self.root_world();
        let mut ctx = world.0.borrow_mut();
        let ContextKind::World(data) = &mut ctx.kind else {
            return Err(EvalError::new("class declared outside a world"));
        };
        if data.classes.contains_key(&decl.id) {
            return Err(redeclared("class", &decl.id));
        }
        data.classes.insert(decl.id.clone(), decl);
        Ok(())
    }

    pub fn class_lookup(&self, id: &str) -> Option<Rc<ClassDecl>> {
        let world = self.root_world();
        let ctx = world.0.borrow();
        match &ctx.kind {
            ContextKind::World(data) => data.classes.get(id).cloned(),
            _ => None,
        }
    }

    pub fn set_module_name(&self, name: &str) {
        let world = self.root_world();
        let mut ctx = world.0.borrow_mut();
        if let ContextKind::World(data) = &mut ctx.kind {
            data.module = Some(name.to_string());
        }
    }

    pub fn module_name(&self) -> Option<String> {
        let world = self.root_world();
        let ctx = world.0.borrow();
        match &ctx.kind {
            ContextKind::World(data) => data.module.clone(),
            _ => None,
        }
    }

    pub fn add_import(&self, name: &str, module: ContextRef) -> Result<(), EvalError> {
        let world = self.root_world();
        let mut ctx = world.0.borrow_mut();
        let ContextKind::World(data) = &mut ctx.kind else {
            return Err(EvalError::new("import outside a world"));
        };
        if data.imports.contains_key(name) {
            return Err(redeclared("module", name));
        }
        data.imports.insert(name.to_string(), module);
        Ok(())
    }

    pub fn import_lookup(&self, name: &str) -> Option<ContextRef> {
        let world = self.root_world();
        let ctx = world.0.borrow();
        match &ctx.kind {
            ContextKind::World(data) => data.imports.get(name).cloned(),
            _ => None,
        }
    }

    pub fn get_import(&self, name: &str) -> Result<ContextRef, EvalError> {
        self.import_lookup(name)
            .ok_or_else(|| undeclared_module(name))
    }
}

impl fmt::Debug for ContextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = self.0.borrow();
        match &ctx.kind {
            ContextKind::World(data) => write!(f, "World({:?})", data.module),
            ContextKind::Function { name, .. } => write!(f, "Function({name})"),
            ContextKind::Class(data) => write!(f, "Class({})", data.decl.id),
            ContextKind::Closure { .. } => f.write_str("Closure"),
        }
    }
}
