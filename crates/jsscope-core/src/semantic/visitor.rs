//! Scope-building visitor
//!
//! Walks an swc `Module` once, registers every scope-opening node with the
//! [`SymbolModelBuilder`] and declares every binding it finds. Built-in
//! globals are declared in the global scope before any user code so that
//! user declarations cannot pre-empt their built-in flag.

use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CatchClause, Class, ClassMember, Decl, DefaultDecl,
    Expr, ForHead, ForInStmt, ForOfStmt, ForStmt, Function, GetterProp, Ident, ImportSpecifier,
    JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementChild, JSXExpr, MemberProp, Module,
    ModuleDecl, ModuleItem, ObjectPatProp, OptChainBase, ParamOrTsParamProp, Pat, Prop,
    PropName, PropOrSpread, SetterProp, StaticBlock, Stmt, SwitchStmt, TsParamPropParam, VarDecl,
    VarDeclKind, VarDeclOrExpr,
};
use swc_common::Span;
use tracing::{debug, instrument};

use super::globals::{ARGUMENTS, ECMASCRIPT_GLOBALS, Environment};
use super::model::{ModelError, SymbolModel, SymbolModelBuilder};
use super::scope::ScopeId;
use super::symbol::SymbolKind;
use super::tree::{NodeIdGenerator, ScopeNode};

/// Which built-in globals to declare before visiting user code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOptions {
    pub environments: Vec<Environment>,
    pub globals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Current,
    Hoisted,
}

pub struct SymbolVisitor {
    builder: SymbolModelBuilder,
    ids: NodeIdGenerator,
    current_scope: Option<ScopeId>,
}

impl SymbolVisitor {
    fn new() -> Self {
        Self {
            builder: SymbolModelBuilder::new(),
            ids: NodeIdGenerator::new(),
            current_scope: None,
        }
    }

    #[instrument(skip_all, fields(items = module.body.len()))]
    pub fn build(module: &Module, options: &BuildOptions) -> Result<SymbolModel, ModelError> {
        let mut visitor = Self::new();
        visitor.visit_module(module, options)?;
        visitor.builder.finish()
    }

    fn visit_module(
        &mut self,
        module: &Module,
        options: &BuildOptions,
    ) -> Result<(), ModelError> {
        self.enter_scope(module)?;
        let global = self.current()?;
        self.declare_built_ins(global, options)?;

        for item in &module.body {
            self.hoist_module_item(item)?;
        }
        for item in &module.body {
            self.visit_module_item(item)?;
        }

        self.current_scope = None;
        Ok(())
    }

    fn declare_built_ins(
        &mut self,
        global: ScopeId,
        options: &BuildOptions,
    ) -> Result<(), ModelError> {
        for &(name, kind) in ECMASCRIPT_GLOBALS {
            self.builder.declare_built_in_symbol(name, kind, global)?;
        }
        for environment in &options.environments {
            let globals = environment.globals();
            for &(name, kind) in globals {
                self.builder.declare_built_in_symbol(name, kind, global)?;
            }
            debug!(
                environment = environment.as_str(),
                globals = globals.len(),
                "declared environment globals"
            );
        }
        for name in &options.globals {
            self.builder
                .declare_built_in_symbol(name, SymbolKind::Variable, global)?;
        }
        Ok(())
    }

    fn hoist_module_item(&mut self, item: &ModuleItem) -> Result<(), ModelError> {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export_decl)) => {
                if let Decl::Fn(fn_decl) = &export_decl.decl {
                    self.declare_ident(&fn_decl.ident, SymbolKind::Function, Placement::Current)?;
                }
                Ok(())
            }
            ModuleItem::Stmt(stmt) => self.hoist_stmt(stmt),
            _ => Ok(()),
        }
    }

    fn hoist_stmt(&mut self, stmt: &Stmt) -> Result<(), ModelError> {
        if let Stmt::Decl(Decl::Fn(fn_decl)) = stmt {
            self.declare_ident(&fn_decl.ident, SymbolKind::Function, Placement::Current)?;
        }
        Ok(())
    }

    fn visit_module_item(&mut self, item: &ModuleItem) -> Result<(), ModelError> {
        match item {
            ModuleItem::ModuleDecl(decl) => self.visit_module_decl(decl),
            ModuleItem::Stmt(stmt) => self.visit_stmt(stmt),
        }
    }

    fn visit_module_decl(&mut self, decl: &ModuleDecl) -> Result<(), ModelError> {
        match decl {
            ModuleDecl::Import(import) => {
                for specifier in &import.specifiers {
                    let local = match specifier {
                        ImportSpecifier::Named(named) => &named.local,
                        ImportSpecifier::Default(default) => &default.local,
                        ImportSpecifier::Namespace(namespace) => &namespace.local,
                    };
                    self.declare_ident(local, SymbolKind::Import, Placement::Current)?;
                }
                Ok(())
            }
            ModuleDecl::ExportDecl(export_decl) => self.visit_decl(&export_decl.decl),
            ModuleDecl::ExportDefaultDecl(export_default) => match &export_default.decl {
                DefaultDecl::Fn(fn_expr) => {
                    if let Some(ident) = &fn_expr.ident {
                        self.declare_ident(ident, SymbolKind::Function, Placement::Current)?;
                    }
                    self.visit_function(&fn_expr.function, None)
                }
                DefaultDecl::Class(class_expr) => {
                    if let Some(ident) = &class_expr.ident {
                        self.declare_ident(ident, SymbolKind::Class, Placement::Current)?;
                    }
                    self.visit_class(&class_expr.class, None)
                }
                _ => Ok(()),
            },
            ModuleDecl::ExportDefaultExpr(export_expr) => self.visit_expr(&export_expr.expr),
            _ => Ok(()),
        }
    }

    fn visit_stmts(&mut self, stmts: &[Stmt]) -> Result<(), ModelError> {
        for stmt in stmts {
            self.hoist_stmt(stmt)?;
        }
        for stmt in stmts {
            self.visit_stmt(stmt)?;
        }
        Ok(())
    }

    /// Body of a non-arrow function. Function declarations are registered
    /// before the implicit `arguments` binding so that they shadow it, and a
    /// top-level `let`, `const` or `class` named `arguments` suppresses it.
    fn visit_function_body(&mut self, stmts: &[Stmt]) -> Result<(), ModelError> {
        for stmt in stmts {
            self.hoist_stmt(stmt)?;
        }
        if !stmts.iter().any(lexically_declares_arguments) {
            self.declare_arguments()?;
        }
        for stmt in stmts {
            self.visit_stmt(stmt)?;
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<(), ModelError> {
        match stmt {
            Stmt::Decl(decl) => self.visit_decl(decl),
            Stmt::Block(block) => self.visit_block(block),
            Stmt::Expr(expr_stmt) => self.visit_expr(&expr_stmt.expr),
            Stmt::If(if_stmt) => {
                self.visit_expr(&if_stmt.test)?;
                self.visit_stmt(&if_stmt.cons)?;
                if let Some(alt) = &if_stmt.alt {
                    self.visit_stmt(alt)?;
                }
                Ok(())
            }
            Stmt::For(for_stmt) => self.visit_for_stmt(for_stmt),
            Stmt::ForIn(for_in) => self.visit_for_in_stmt(for_in),
            Stmt::ForOf(for_of) => self.visit_for_of_stmt(for_of),
            Stmt::While(while_stmt) => {
                self.visit_expr(&while_stmt.test)?;
                self.visit_stmt(&while_stmt.body)
            }
            Stmt::DoWhile(do_while) => {
                self.visit_stmt(&do_while.body)?;
                self.visit_expr(&do_while.test)
            }
            Stmt::Switch(switch_stmt) => self.visit_switch_stmt(switch_stmt),
            Stmt::Try(try_stmt) => {
                self.visit_block(&try_stmt.block)?;
                if let Some(handler) = &try_stmt.handler {
                    self.visit_catch_clause(handler)?;
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.visit_block(finalizer)?;
                }
                Ok(())
            }
            Stmt::Return(ret) => match &ret.arg {
                Some(arg) => self.visit_expr(arg),
                None => Ok(()),
            },
            Stmt::Throw(throw_stmt) => self.visit_expr(&throw_stmt.arg),
            Stmt::Labeled(labeled) => self.visit_stmt(&labeled.body),
            Stmt::With(with_stmt) => {
                self.visit_expr(&with_stmt.obj)?;
                self.visit_stmt(&with_stmt.body)
            }
            _ => Ok(()),
        }
    }

    fn visit_decl(&mut self, decl: &Decl) -> Result<(), ModelError> {
        match decl {
            Decl::Var(var_decl) => self.visit_var_decl(var_decl),
            Decl::Using(using_decl) => {
                for declarator in &using_decl.decls {
                    self.declare_pat(
                        &declarator.name,
                        SymbolKind::ConstVariable,
                        Placement::Current,
                    )?;
                    if let Some(init) = &declarator.init {
                        self.visit_expr(init)?;
                    }
                }
                Ok(())
            }
            Decl::Fn(fn_decl) => {
                self.declare_ident(&fn_decl.ident, SymbolKind::Function, Placement::Current)?;
                self.visit_function(&fn_decl.function, None)
            }
            Decl::Class(class_decl) => {
                self.declare_ident(&class_decl.ident, SymbolKind::Class, Placement::Current)?;
                self.visit_class(&class_decl.class, None)
            }
            Decl::TsInterface(interface) => {
                self.declare_ident(&interface.id, SymbolKind::TypeAlias, Placement::Current)
            }
            Decl::TsTypeAlias(alias) => {
                self.declare_ident(&alias.id, SymbolKind::TypeAlias, Placement::Current)
            }
            Decl::TsEnum(ts_enum) => {
                self.declare_ident(&ts_enum.id, SymbolKind::Enum, Placement::Current)
            }
            _ => Ok(()),
        }
    }

    fn visit_var_decl(&mut self, var_decl: &VarDecl) -> Result<(), ModelError> {
        let (kind, placement) = var_decl_binding(var_decl.kind);
        for declarator in &var_decl.decls {
            self.declare_pat(&declarator.name, kind, placement)?;
            if let Some(init) = &declarator.init {
                self.visit_expr(init)?;
            }
        }
        Ok(())
    }

    fn visit_block(&mut self, block: &BlockStmt) -> Result<(), ModelError> {
        let parent = self.enter_scope(block)?;
        self.visit_stmts(&block.stmts)?;
        self.exit_scope(parent);
        Ok(())
    }

    fn visit_for_stmt(&mut self, for_stmt: &ForStmt) -> Result<(), ModelError> {
        let parent = self.enter_scope(for_stmt)?;

        match &for_stmt.init {
            Some(VarDeclOrExpr::VarDecl(var_decl)) => self.visit_var_decl(var_decl)?,
            Some(VarDeclOrExpr::Expr(expr)) => self.visit_expr(expr)?,
            None => {}
        }
        if let Some(test) = &for_stmt.test {
            self.visit_expr(test)?;
        }
        if let Some(update) = &for_stmt.update {
            self.visit_expr(update)?;
        }
        self.visit_stmt(&for_stmt.body)?;

        self.exit_scope(parent);
        Ok(())
    }

    fn visit_for_in_stmt(&mut self, for_in: &ForInStmt) -> Result<(), ModelError> {
        let parent = self.enter_scope(for_in)?;
        self.visit_for_head(&for_in.left)?;
        self.visit_expr(&for_in.right)?;
        self.visit_stmt(&for_in.body)?;
        self.exit_scope(parent);
        Ok(())
    }

    fn visit_for_of_stmt(&mut self, for_of: &ForOfStmt) -> Result<(), ModelError> {
        let parent = self.enter_scope(for_of)?;
        self.visit_for_head(&for_of.left)?;
        self.visit_expr(&for_of.right)?;
        self.visit_stmt(&for_of.body)?;
        self.exit_scope(parent);
        Ok(())
    }

    fn visit_for_head(&mut self, head: &ForHead) -> Result<(), ModelError> {
        match head {
            ForHead::VarDecl(var_decl) => {
                let (kind, placement) = var_decl_binding(var_decl.kind);
                for declarator in &var_decl.decls {
                    self.declare_pat(&declarator.name, kind, placement)?;
                }
                Ok(())
            }
            ForHead::UsingDecl(using_decl) => {
                for declarator in &using_decl.decls {
                    self.declare_pat(
                        &declarator.name,
                        SymbolKind::ConstVariable,
                        Placement::Current,
                    )?;
                }
                Ok(())
            }
            ForHead::Pat(_) => Ok(()),
        }
    }

    fn visit_switch_stmt(&mut self, switch_stmt: &SwitchStmt) -> Result<(), ModelError> {
        self.visit_expr(&switch_stmt.discriminant)?;

        let parent = self.enter_scope(switch_stmt)?;
        for case in &switch_stmt.cases {
            for stmt in &case.cons {
                self.hoist_stmt(stmt)?;
            }
        }
        for case in &switch_stmt.cases {
            if let Some(test) = &case.test {
                self.visit_expr(test)?;
            }
            for stmt in &case.cons {
                self.visit_stmt(stmt)?;
            }
        }
        self.exit_scope(parent);
        Ok(())
    }

    fn visit_catch_clause(&mut self, catch: &CatchClause) -> Result<(), ModelError> {
        let parent = self.enter_scope(catch)?;
        if let Some(param) = &catch.param {
            self.declare_pat(param, SymbolKind::Parameter, Placement::Current)?;
        }
        self.visit_stmts(&catch.body.stmts)?;
        self.exit_scope(parent);
        Ok(())
    }

    /// Opens a function scope. `own_name` is the name of a function
    /// expression, which is only visible inside the function itself.
    fn visit_function(
        &mut self,
        func: &Function,
        own_name: Option<&Ident>,
    ) -> Result<(), ModelError> {
        // Overload signatures have no body and bind nothing.
        let Some(body) = &func.body else {
            return Ok(());
        };

        let parent = self.enter_scope(func)?;
        if let Some(ident) = own_name {
            self.declare_ident(ident, SymbolKind::Function, Placement::Current)?;
        }
        for param in &func.params {
            self.declare_pat(&param.pat, SymbolKind::Parameter, Placement::Current)?;
        }
        self.visit_function_body(&body.stmts)?;
        self.exit_scope(parent);
        Ok(())
    }

    fn visit_arrow_expr(&mut self, arrow: &ArrowExpr) -> Result<(), ModelError> {
        let parent = self.enter_scope(arrow)?;
        for param in &arrow.params {
            self.declare_pat(param, SymbolKind::Parameter, Placement::Current)?;
        }
        match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => self.visit_stmts(&block.stmts)?,
            BlockStmtOrExpr::Expr(expr) => self.visit_expr(expr)?,
        }
        self.exit_scope(parent);
        Ok(())
    }

    /// Opens a class scope. `own_name` is the name of a class expression.
    fn visit_class(
        &mut self,
        class: &Class,
        own_name: Option<&Ident>,
    ) -> Result<(), ModelError> {
        if let Some(super_class) = &class.super_class {
            self.visit_expr(super_class)?;
        }

        let parent = self.enter_scope(class)?;
        if let Some(ident) = own_name {
            self.declare_ident(ident, SymbolKind::Class, Placement::Current)?;
        }

        for member in &class.body {
            match member {
                ClassMember::Method(method) => {
                    if let PropName::Ident(name) = &method.key {
                        self.declare_name(&name.sym, SymbolKind::Method, name.span)?;
                    }
                    self.visit_prop_name(&method.key)?;
                    self.visit_function(&method.function, None)?;
                }
                ClassMember::PrivateMethod(method) => {
                    self.visit_function(&method.function, None)?;
                }
                ClassMember::Constructor(ctor) => {
                    let Some(body) = &ctor.body else {
                        continue;
                    };
                    let class_scope = self.enter_scope(ctor)?;
                    for param in &ctor.params {
                        match param {
                            ParamOrTsParamProp::Param(p) => {
                                self.declare_pat(
                                    &p.pat,
                                    SymbolKind::Parameter,
                                    Placement::Current,
                                )?;
                            }
                            ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                                TsParamPropParam::Ident(binding) => {
                                    self.declare_ident(
                                        &binding.id,
                                        SymbolKind::Parameter,
                                        Placement::Current,
                                    )?;
                                }
                                TsParamPropParam::Assign(assign) => {
                                    self.declare_pat(
                                        &assign.left,
                                        SymbolKind::Parameter,
                                        Placement::Current,
                                    )?;
                                    self.visit_expr(&assign.right)?;
                                }
                            },
                        }
                    }
                    self.visit_function_body(&body.stmts)?;
                    self.exit_scope(class_scope);
                }
                ClassMember::ClassProp(prop) => {
                    self.visit_prop_name(&prop.key)?;
                    if let Some(value) = &prop.value {
                        self.visit_expr(value)?;
                    }
                }
                ClassMember::PrivateProp(prop) => {
                    if let Some(value) = &prop.value {
                        self.visit_expr(value)?;
                    }
                }
                ClassMember::StaticBlock(block) => self.visit_static_block(block)?,
                _ => {}
            }
        }

        self.exit_scope(parent);
        Ok(())
    }

    fn visit_static_block(&mut self, block: &StaticBlock) -> Result<(), ModelError> {
        let parent = self.enter_scope(block)?;
        self.visit_stmts(&block.body.stmts)?;
        self.exit_scope(parent);
        Ok(())
    }

    fn visit_prop_name(&mut self, key: &PropName) -> Result<(), ModelError> {
        match key {
            PropName::Computed(computed) => self.visit_expr(&computed.expr),
            _ => Ok(()),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<(), ModelError> {
        match expr {
            Expr::Arrow(arrow) => self.visit_arrow_expr(arrow),
            Expr::Fn(fn_expr) => self.visit_function(&fn_expr.function, fn_expr.ident.as_ref()),
            Expr::Class(class_expr) => {
                self.visit_class(&class_expr.class, class_expr.ident.as_ref())
            }
            Expr::Call(call) => {
                if let Some(callee) = call.callee.as_expr() {
                    self.visit_expr(callee)?;
                }
                for arg in &call.args {
                    self.visit_expr(&arg.expr)?;
                }
                Ok(())
            }
            Expr::New(new_expr) => {
                self.visit_expr(&new_expr.callee)?;
                for arg in new_expr.args.iter().flatten() {
                    self.visit_expr(&arg.expr)?;
                }
                Ok(())
            }
            Expr::Member(member) => {
                self.visit_expr(&member.obj)?;
                if let MemberProp::Computed(computed) = &member.prop {
                    self.visit_expr(&computed.expr)?;
                }
                Ok(())
            }
            Expr::Array(arr) => {
                for elem in arr.elems.iter().flatten() {
                    self.visit_expr(&elem.expr)?;
                }
                Ok(())
            }
            Expr::Object(obj) => {
                for prop in &obj.props {
                    match prop {
                        PropOrSpread::Spread(spread) => self.visit_expr(&spread.expr)?,
                        PropOrSpread::Prop(prop) => self.visit_prop(prop)?,
                    }
                }
                Ok(())
            }
            Expr::Assign(assign) => self.visit_expr(&assign.right),
            Expr::Bin(bin) => {
                self.visit_expr(&bin.left)?;
                self.visit_expr(&bin.right)
            }
            Expr::Unary(unary) => self.visit_expr(&unary.arg),
            Expr::Update(update) => self.visit_expr(&update.arg),
            Expr::Cond(cond) => {
                self.visit_expr(&cond.test)?;
                self.visit_expr(&cond.cons)?;
                self.visit_expr(&cond.alt)
            }
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.visit_expr(expr)?;
                }
                Ok(())
            }
            Expr::Paren(paren) => self.visit_expr(&paren.expr),
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.visit_expr(expr)?;
                }
                Ok(())
            }
            Expr::TaggedTpl(tagged) => {
                self.visit_expr(&tagged.tag)?;
                for expr in &tagged.tpl.exprs {
                    self.visit_expr(expr)?;
                }
                Ok(())
            }
            Expr::Yield(yield_expr) => match &yield_expr.arg {
                Some(arg) => self.visit_expr(arg),
                None => Ok(()),
            },
            Expr::Await(await_expr) => self.visit_expr(&await_expr.arg),
            Expr::OptChain(opt_chain) => match &*opt_chain.base {
                OptChainBase::Member(member) => self.visit_expr(&member.obj),
                OptChainBase::Call(call) => {
                    self.visit_expr(&call.callee)?;
                    for arg in &call.args {
                        self.visit_expr(&arg.expr)?;
                    }
                    Ok(())
                }
            },
            Expr::TsAs(ts_as) => self.visit_expr(&ts_as.expr),
            Expr::TsTypeAssertion(assertion) => self.visit_expr(&assertion.expr),
            Expr::TsNonNull(non_null) => self.visit_expr(&non_null.expr),
            Expr::TsSatisfies(satisfies) => self.visit_expr(&satisfies.expr),
            Expr::TsConstAssertion(const_assert) => self.visit_expr(&const_assert.expr),
            Expr::JSXElement(element) => self.visit_jsx_element(element),
            Expr::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_child(child)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn visit_prop(&mut self, prop: &Prop) -> Result<(), ModelError> {
        match prop {
            Prop::KeyValue(kv) => {
                self.visit_prop_name(&kv.key)?;
                self.visit_expr(&kv.value)
            }
            Prop::Method(method) => {
                self.visit_prop_name(&method.key)?;
                self.visit_function(&method.function, None)
            }
            Prop::Getter(getter) => {
                let Some(body) = &getter.body else {
                    return Ok(());
                };
                let getter: &GetterProp = getter;
                let parent = self.enter_scope(getter)?;
                self.visit_function_body(&body.stmts)?;
                self.exit_scope(parent);
                Ok(())
            }
            Prop::Setter(setter) => {
                let Some(body) = &setter.body else {
                    return Ok(());
                };
                let setter: &SetterProp = setter;
                let parent = self.enter_scope(setter)?;
                self.declare_pat(&setter.param, SymbolKind::Parameter, Placement::Current)?;
                self.visit_function_body(&body.stmts)?;
                self.exit_scope(parent);
                Ok(())
            }
            Prop::Assign(assign) => self.visit_expr(&assign.value),
            Prop::Shorthand(_) => Ok(()),
        }
    }

    fn visit_jsx_element(&mut self, element: &JSXElement) -> Result<(), ModelError> {
        for attr in &element.opening.attrs {
            match attr {
                JSXAttrOrSpread::JSXAttr(attr) => {
                    if let Some(JSXAttrValue::JSXExprContainer(container)) = &attr.value {
                        self.visit_jsx_expr(&container.expr)?;
                    }
                }
                JSXAttrOrSpread::SpreadElement(spread) => self.visit_expr(&spread.expr)?,
            }
        }
        for child in &element.children {
            self.visit_jsx_child(child)?;
        }
        Ok(())
    }

    fn visit_jsx_child(&mut self, child: &JSXElementChild) -> Result<(), ModelError> {
        match child {
            JSXElementChild::JSXExprContainer(container) => self.visit_jsx_expr(&container.expr),
            JSXElementChild::JSXSpreadChild(spread) => self.visit_expr(&spread.expr),
            JSXElementChild::JSXElement(element) => self.visit_jsx_element(element),
            JSXElementChild::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_child(child)?;
                }
                Ok(())
            }
            JSXElementChild::JSXText(_) => Ok(()),
        }
    }

    fn visit_jsx_expr(&mut self, expr: &JSXExpr) -> Result<(), ModelError> {
        match expr {
            JSXExpr::Expr(expr) => self.visit_expr(expr),
            JSXExpr::JSXEmptyExpr(_) => Ok(()),
        }
    }

    fn declare_pat(
        &mut self,
        pat: &Pat,
        kind: SymbolKind,
        placement: Placement,
    ) -> Result<(), ModelError> {
        match pat {
            Pat::Ident(binding) => self.declare_ident(&binding.id, kind, placement),
            Pat::Array(array_pat) => {
                for elem in array_pat.elems.iter().flatten() {
                    self.declare_pat(elem, kind, placement)?;
                }
                Ok(())
            }
            Pat::Object(object_pat) => {
                for prop in &object_pat.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.visit_prop_name(&kv.key)?;
                            self.declare_pat(&kv.value, kind, placement)?;
                        }
                        ObjectPatProp::Assign(assign) => {
                            self.declare_ident(&assign.key.id, kind, placement)?;
                            if let Some(value) = &assign.value {
                                self.visit_expr(value)?;
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.declare_pat(&rest.arg, kind, placement)?,
                    }
                }
                Ok(())
            }
            Pat::Rest(rest) => self.declare_pat(&rest.arg, kind, placement),
            Pat::Assign(assign) => {
                self.declare_pat(&assign.left, kind, placement)?;
                self.visit_expr(&assign.right)
            }
            Pat::Invalid(_) | Pat::Expr(_) => Ok(()),
        }
    }

    fn declare_ident(
        &mut self,
        ident: &Ident,
        kind: SymbolKind,
        placement: Placement,
    ) -> Result<(), ModelError> {
        let scope = match placement {
            Placement::Current => self.current()?,
            Placement::Hoisted => self.hoisting_scope()?,
        };
        self.builder
            .declare_symbol(&ident.sym, kind, scope, ident.span)?;
        Ok(())
    }

    fn declare_name(
        &mut self,
        name: &str,
        kind: SymbolKind,
        span: Span,
    ) -> Result<(), ModelError> {
        let scope = self.current()?;
        self.builder.declare_symbol(name, kind, scope, span)?;
        Ok(())
    }

    /// Declares the implicit `arguments` binding. Runs after the parameters so
    /// that a parameter named `arguments` keeps its ordinary symbol.
    fn declare_arguments(&mut self) -> Result<(), ModelError> {
        let scope = self.current()?;
        self.builder
            .declare_built_in_symbol(ARGUMENTS, SymbolKind::Variable, scope)?;
        Ok(())
    }

    fn enter_scope<N: ScopeNode>(&mut self, node: &N) -> Result<Option<ScopeId>, ModelError> {
        let parent = self.current_scope;
        let tree = self.ids.next_id();
        let scope = self
            .builder
            .add_scope(N::KIND, tree, parent, node.scope_span())?;
        self.current_scope = Some(scope);
        Ok(parent)
    }

    fn exit_scope(&mut self, parent: Option<ScopeId>) {
        self.current_scope = parent;
    }

    fn current(&self) -> Result<ScopeId, ModelError> {
        match self.current_scope {
            Some(scope) => Ok(scope),
            None => self.builder.global_scope(),
        }
    }

    fn hoisting_scope(&self) -> Result<ScopeId, ModelError> {
        let current = self.current()?;
        Ok(self
            .builder
            .ancestors(current)
            .find(|scope| scope.kind.is_hoisting_target())
            .map(|scope| scope.id)
            .unwrap_or(current))
    }
}

fn lexically_declares_arguments(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Decl(Decl::Class(class_decl)) => &*class_decl.ident.sym == ARGUMENTS,
        Stmt::Decl(Decl::Var(var_decl)) if var_decl.kind != VarDeclKind::Var => var_decl
            .decls
            .iter()
            .any(|declarator| pat_binds(&declarator.name, ARGUMENTS)),
        _ => false,
    }
}

fn pat_binds(pat: &Pat, name: &str) -> bool {
    match pat {
        Pat::Ident(binding) => &*binding.id.sym == name,
        Pat::Array(array_pat) => array_pat.elems.iter().flatten().any(|p| pat_binds(p, name)),
        Pat::Object(object_pat) => object_pat.props.iter().any(|prop| match prop {
            ObjectPatProp::KeyValue(kv) => pat_binds(&kv.value, name),
            ObjectPatProp::Assign(assign) => &*assign.key.id.sym == name,
            ObjectPatProp::Rest(rest) => pat_binds(&rest.arg, name),
        }),
        Pat::Rest(rest) => pat_binds(&rest.arg, name),
        Pat::Assign(assign) => pat_binds(&assign.left, name),
        Pat::Invalid(_) | Pat::Expr(_) => false,
    }
}

fn var_decl_binding(kind: VarDeclKind) -> (SymbolKind, Placement) {
    match kind {
        VarDeclKind::Var => (SymbolKind::Variable, Placement::Hoisted),
        VarDeclKind::Let => (SymbolKind::LetVariable, Placement::Current),
        VarDeclKind::Const => (SymbolKind::ConstVariable, Placement::Current),
    }
}
