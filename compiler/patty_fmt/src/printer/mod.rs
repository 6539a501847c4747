//! Statement printing and the [`Printer`] state.

mod expr;

use patty_ir::{
    BindingKind, BindingId, ExprArena, FunctionBody, FunctionId, FunctionKind, ImportKind,
    ParamRange, Program, PropKey, StmtId, StmtKind, StmtRange, StringInterner,
};

use crate::emitter::{Emitter, StringEmitter};
use crate::literals::{format_number, quote_str};
use crate::parens::{starts_ambiguous, PREC_ASSIGN};

/// Renders syntax tree nodes through an [`Emitter`].
pub struct Printer<'a, E: Emitter = StringEmitter> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    out: E,
    indent: usize,
}

impl<'a> Printer<'a, StringEmitter> {
    pub fn new(arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        Printer::with_emitter(arena, interner, StringEmitter::new())
    }
}

impl<'a, E: Emitter> Printer<'a, E> {
    pub fn with_emitter(arena: &'a ExprArena, interner: &'a StringInterner, out: E) -> Self {
        Printer {
            arena,
            interner,
            out,
            indent: 0,
        }
    }

    pub fn into_emitter(self) -> E {
        self.out
    }

    #[inline]
    fn name(&self, name: patty_ir::Name) -> &'static str {
        self.interner.lookup(name)
    }

    #[inline]
    fn emit(&mut self, text: &str) {
        self.out.emit(text);
    }

    // ── Statements ──────────────────────────────────────────────────

    pub fn print_program(&mut self, program: Program) {
        self.print_stmt_list(program.body);
    }

    pub fn print_stmt_list(&mut self, stmts: StmtRange) {
        for &stmt in self.arena.list(stmts) {
            self.print_stmt(stmt);
        }
    }

    /// One statement on its own line(s) at the current indent.
    pub fn print_stmt(&mut self, id: StmtId) {
        self.out.emit_indent(self.indent);
        self.stmt_inline(id);
        self.out.emit_newline();
    }

    /// A statement without leading indent or trailing newline.
    fn stmt_inline(&mut self, id: StmtId) {
        match self.arena.stmt_kind(id) {
            StmtKind::Expr(expr) => {
                if starts_ambiguous(self.arena, expr) {
                    self.emit("(");
                    self.print_expr(expr, 0);
                    self.emit(")");
                } else {
                    self.print_expr(expr, 0);
                }
                self.emit(";");
            }
            StmtKind::VarDecl { kind, declarators } => {
                self.emit(kind.as_str());
                self.emit(" ");
                for (i, decl) in self.arena.list(declarators).iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.print_binding(decl.target);
                    if let Some(init) = decl.init {
                        self.emit(" = ");
                        self.print_expr(init, PREC_ASSIGN);
                    }
                }
                self.emit(";");
            }
            StmtKind::FunctionDecl(function) => self.print_function(function),
            StmtKind::Return(value) => {
                self.emit("return");
                if let Some(value) = value {
                    self.emit(" ");
                    self.print_expr(value, 0);
                }
                self.emit(";");
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.emit("if (");
                self.print_expr(cond, 0);
                self.emit(")");
                self.sub_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    if matches!(self.arena.stmt_kind(then_branch), StmtKind::Block(_)) {
                        self.emit(" ");
                    } else {
                        self.out.emit_newline();
                        self.out.emit_indent(self.indent);
                    }
                    self.emit("else");
                    if matches!(self.arena.stmt_kind(else_branch), StmtKind::If { .. }) {
                        self.emit(" ");
                        self.stmt_inline(else_branch);
                    } else {
                        self.sub_stmt(else_branch);
                    }
                }
            }
            StmtKind::Block(stmts) => self.print_block(stmts),
            StmtKind::Labeled { label, body } => {
                self.emit(self.name(label));
                self.emit(": ");
                self.stmt_inline(body);
            }
            StmtKind::Break(label) => self.jump("break", label),
            StmtKind::Continue(label) => self.jump("continue", label),
            StmtKind::Throw(value) => {
                self.emit("throw ");
                self.print_expr(value, 0);
                self.emit(";");
            }
            StmtKind::Try {
                block,
                param,
                handler,
                finalizer,
            } => {
                self.emit("try ");
                self.print_block(block);
                if let Some(handler) = handler {
                    self.emit(" catch ");
                    if let Some(param) = param {
                        self.emit("(");
                        self.print_binding(param);
                        self.emit(") ");
                    }
                    self.print_block(handler);
                }
                if let Some(finalizer) = finalizer {
                    self.emit(" finally ");
                    self.print_block(finalizer);
                }
            }
            StmtKind::While { cond, body } => {
                self.emit("while (");
                self.print_expr(cond, 0);
                self.emit(")");
                self.sub_stmt(body);
            }
            StmtKind::Import { specifiers, source } => {
                self.print_import(specifiers, source);
            }
            StmtKind::Empty => self.emit(";"),
        }
    }

    /// Body of `if`/`else`/`while`: a block stays on the same line, any
    /// other statement goes on the next line, indented.
    fn sub_stmt(&mut self, id: StmtId) {
        if let StmtKind::Block(stmts) = self.arena.stmt_kind(id) {
            self.emit(" ");
            self.print_block(stmts);
        } else {
            self.out.emit_newline();
            self.indent += 1;
            self.out.emit_indent(self.indent);
            self.stmt_inline(id);
            self.indent -= 1;
        }
    }

    fn jump(&mut self, keyword: &str, label: Option<patty_ir::Name>) {
        self.emit(keyword);
        if let Some(label) = label {
            self.emit(" ");
            self.emit(self.name(label));
        }
        self.emit(";");
    }

    /// `{ .. }` with the closing brace at the current indent.
    fn print_block(&mut self, stmts: StmtRange) {
        if stmts.is_empty() {
            self.emit("{}");
            return;
        }
        self.emit("{");
        self.out.emit_newline();
        self.indent += 1;
        self.print_stmt_list(stmts);
        self.indent -= 1;
        self.out.emit_indent(self.indent);
        self.emit("}");
    }

    fn print_import(&mut self, specifiers: patty_ir::SpecifierRange, source: patty_ir::Name) {
        self.emit("import ");
        let specs = self.arena.list(specifiers);
        if specs.is_empty() {
            self.emit(&quote_str(self.name(source)));
            self.emit(";");
            return;
        }

        let mut wrote = false;
        let mut named = Vec::new();
        for spec in specs {
            match spec.kind {
                ImportKind::Default => {
                    self.emit(self.name(spec.local));
                    wrote = true;
                }
                ImportKind::Namespace => {
                    if wrote {
                        self.emit(", ");
                    }
                    self.emit("* as ");
                    self.emit(self.name(spec.local));
                    wrote = true;
                }
                ImportKind::Named => named.push(*spec),
            }
        }
        if !named.is_empty() {
            if wrote {
                self.emit(", ");
            }
            self.emit("{ ");
            for (i, spec) in named.iter().enumerate() {
                if i > 0 {
                    self.emit(", ");
                }
                self.emit(self.name(spec.imported));
                if spec.imported != spec.local {
                    self.emit(" as ");
                    self.emit(self.name(spec.local));
                }
            }
            self.emit(" }");
        }
        self.emit(" from ");
        self.emit(&quote_str(self.name(source)));
        self.emit(";");
    }

    // ── Functions and bindings ──────────────────────────────────────

    fn print_function(&mut self, id: FunctionId) {
        let function = *self.arena.get_function(id);
        if function.is_async {
            self.emit("async ");
        }
        if function.kind == FunctionKind::Arrow {
            self.print_params(function.params);
            self.emit(" => ");
            match function.body {
                FunctionBody::Expr(body) => {
                    if starts_ambiguous(self.arena, body) {
                        self.emit("(");
                        self.print_expr(body, 0);
                        self.emit(")");
                    } else {
                        self.print_expr(body, PREC_ASSIGN);
                    }
                }
                FunctionBody::Block(stmts) => self.print_block(stmts),
            }
            return;
        }

        self.emit("function");
        if function.is_generator {
            self.emit("*");
        }
        match function.name {
            Some(name) => {
                self.emit(" ");
                self.emit(self.name(name));
            }
            None => self.emit(" "),
        }
        self.print_params(function.params);
        self.emit(" ");
        match function.body {
            FunctionBody::Block(stmts) => self.print_block(stmts),
            FunctionBody::Expr(body) => {
                // Only arrows have expression bodies; print an equivalent block.
                self.emit("{ return ");
                self.print_expr(body, 0);
                self.emit("; }");
            }
        }
    }

    fn print_params(&mut self, params: ParamRange) {
        self.emit("(");
        for (i, param) in self.arena.list(params).iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            if param.rest {
                self.emit("...");
            }
            self.print_binding(param.target);
            if let Some(default) = param.default {
                self.emit(" = ");
                self.print_expr(default, PREC_ASSIGN);
            }
        }
        self.emit(")");
    }

    pub fn print_binding(&mut self, id: BindingId) {
        match self.arena.get_binding(id).kind {
            BindingKind::Ident(name) => self.emit(self.name(name)),
            BindingKind::Array(elems) => {
                let elems = self.arena.list(elems);
                self.emit("[");
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    if elem.rest {
                        self.emit("...");
                    }
                    if let Some(target) = elem.target {
                        self.print_binding(target);
                    }
                    if let Some(default) = elem.default {
                        self.emit(" = ");
                        self.print_expr(default, PREC_ASSIGN);
                    }
                }
                if elems.last().is_some_and(|elem| elem.target.is_none()) {
                    self.emit(",");
                }
                self.emit("]");
            }
            BindingKind::Object(props) => {
                let props = self.arena.list(props);
                if props.is_empty() {
                    self.emit("{}");
                    return;
                }
                self.emit("{ ");
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    if prop.rest {
                        self.emit("...");
                        self.print_binding(prop.value);
                        continue;
                    }
                    let shorthand = prop.shorthand
                        && matches!(
                            (prop.key, self.arena.get_binding(prop.value).kind),
                            (PropKey::Ident(key), BindingKind::Ident(value)) if key == value
                        );
                    if !shorthand {
                        self.print_prop_key(prop.key);
                        self.emit(": ");
                    }
                    self.print_binding(prop.value);
                    if let Some(default) = prop.default {
                        self.emit(" = ");
                        self.print_expr(default, PREC_ASSIGN);
                    }
                }
                self.emit(" }");
            }
        }
    }

    fn print_prop_key(&mut self, key: PropKey) {
        match key {
            PropKey::Ident(name) => self.emit(self.name(name)),
            PropKey::Str(name) => self.emit(&quote_str(self.name(name))),
            PropKey::Num(bits) => self.emit(&format_number(f64::from_bits(bits))),
            PropKey::Computed(expr) => {
                self.emit("[");
                self.print_expr(expr, PREC_ASSIGN);
                self.emit("]");
            }
        }
    }
}
