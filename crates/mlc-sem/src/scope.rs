//! Scope tree and symbol table.
//!
//! Scopes live in an arena (`Vec<Scope>`) indexed by [`ScopeId`], with
//! child-to-parent links used only for name lookup. Each variable is
//! assigned a slot index within its owning scope at analysis time, so the
//! interpreter addresses storage as `(ScopeId, slot)` and never looks up
//! names at runtime.

use indexmap::IndexMap;

use mlc_util::{Span, Symbol};

use crate::types::Ty;

/// Index of a scope in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// Stable index of a symbol table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

/// Index of a function in the analyzed program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub u32);

/// Why a scope exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The root scope: function declarations and top-level variables.
    Program,
    /// A function body, binding its parameters.
    Function,
    /// A `{ ... }` block statement.
    Block,
    /// A `for` header, owning the loop variable.
    ForHeader,
    /// A then/else branch of an `if`.
    Branch,
}

/// One scope: a name-to-symbol mapping plus runtime slot layout.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Bindings in declaration order (insertion-ordered for stable
    /// symbol table output).
    pub bindings: IndexMap<Symbol, SymbolId>,
    /// Types of this scope's runtime slots, in slot order. Used by the
    /// interpreter to default-initialize storage on scope entry.
    pub slot_tys: Vec<Ty>,
}

/// A named entity.
#[derive(Debug, Clone)]
pub enum SymbolInfo {
    Variable {
        name: Symbol,
        ty: Ty,
        defined_at: Span,
        is_parameter: bool,
        /// Owning scope of the runtime slot.
        scope: ScopeId,
        /// Slot index within the owning scope.
        slot: u32,
    },
    Function {
        name: Symbol,
        func: FuncId,
        params: Vec<(Ty, Symbol)>,
        /// `Ty::Void` for void functions.
        ret: Ty,
        defined_at: Span,
    },
}

impl SymbolInfo {
    pub fn name(&self) -> Symbol {
        match self {
            SymbolInfo::Variable { name, .. } | SymbolInfo::Function { name, .. } => *name,
        }
    }
}

/// The scope tree plus the flat list of symbols it binds.
pub struct SymbolTable {
    pub scopes: Vec<Scope>,
    pub symbols: Vec<SymbolInfo>,
    current: ScopeId,
}

impl SymbolTable {
    /// Creates a table holding only the program scope.
    pub fn new() -> Self {
        let root = Scope {
            kind: ScopeKind::Program,
            parent: None,
            bindings: IndexMap::new(),
            slot_tys: Vec::new(),
        };
        Self {
            scopes: vec![root],
            symbols: Vec::new(),
            current: ScopeId(0),
        }
    }

    /// The root scope id.
    pub fn program_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    /// The scope currently being analyzed.
    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    /// Pushes a child of the current scope and makes it current.
    pub fn enter_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent: Some(self.current),
            bindings: IndexMap::new(),
            slot_tys: Vec::new(),
        });
        self.current = id;
        id
    }

    /// Returns to the parent of the current scope.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0 as usize].parent {
            self.current = parent;
        }
    }

    /// Declares a variable in the current scope, assigning it the next
    /// slot.
    ///
    /// Fails with the existing entry's id when the name is already bound
    /// in the current scope (shadowing outer scopes is fine; redeclaring
    /// within one scope is not).
    pub fn declare_variable(
        &mut self,
        name: Symbol,
        ty: Ty,
        defined_at: Span,
        is_parameter: bool,
    ) -> Result<SymbolId, SymbolId> {
        let scope_id = self.current;
        let scope = &mut self.scopes[scope_id.0 as usize];
        if let Some(&existing) = scope.bindings.get(&name) {
            return Err(existing);
        }

        let slot = scope.slot_tys.len() as u32;
        scope.slot_tys.push(ty.clone());

        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolInfo::Variable {
            name,
            ty,
            defined_at,
            is_parameter,
            scope: scope_id,
            slot,
        });
        scope.bindings.insert(name, id);
        Ok(id)
    }

    /// Declares a function in the program scope.
    pub fn declare_function(
        &mut self,
        name: Symbol,
        func: FuncId,
        params: Vec<(Ty, Symbol)>,
        ret: Ty,
        defined_at: Span,
    ) -> Result<SymbolId, SymbolId> {
        let root = self.program_scope();
        let scope = &mut self.scopes[root.0 as usize];
        if let Some(&existing) = scope.bindings.get(&name) {
            return Err(existing);
        }

        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolInfo::Function {
            name,
            func,
            params,
            ret,
            defined_at,
        });
        scope.bindings.insert(name, id);
        Ok(id)
    }

    /// Resolves a name from the current scope outward.
    pub fn resolve(&self, name: Symbol) -> Option<SymbolId> {
        self.resolve_from(self.current, name)
    }

    /// Resolves a name from a given scope outward.
    pub fn resolve_from(&self, scope: ScopeId, name: Symbol) -> Option<SymbolId> {
        let mut scope_id = scope;
        loop {
            let scope = &self.scopes[scope_id.0 as usize];
            if let Some(&id) = scope.bindings.get(&name) {
                return Some(id);
            }
            match scope.parent {
                Some(parent) => scope_id = parent,
                None => return None,
            }
        }
    }

    /// Looks up a symbol entry by id.
    pub fn symbol(&self, id: SymbolId) -> &SymbolInfo {
        &self.symbols[id.0 as usize]
    }

    /// Looks up a scope by id.
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::intern(s)
    }

    #[test]
    fn test_declare_and_resolve() {
        let mut table = SymbolTable::new();
        let id = table
            .declare_variable(sym("x"), Ty::Int, Span::DUMMY, false)
            .unwrap();
        assert_eq!(table.resolve(sym("x")), Some(id));
        assert!(table.resolve(sym("y")).is_none());
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut table = SymbolTable::new();
        let first = table
            .declare_variable(sym("x"), Ty::Int, Span::DUMMY, false)
            .unwrap();
        let err = table
            .declare_variable(sym("x"), Ty::Float, Span::DUMMY, false)
            .unwrap_err();
        assert_eq!(err, first);
    }

    #[test]
    fn test_shadowing_in_child_scope() {
        let mut table = SymbolTable::new();
        let outer = table
            .declare_variable(sym("x"), Ty::Int, Span::DUMMY, false)
            .unwrap();

        table.enter_scope(ScopeKind::Block);
        let inner = table
            .declare_variable(sym("x"), Ty::Str, Span::DUMMY, false)
            .unwrap();
        assert_eq!(table.resolve(sym("x")), Some(inner));

        table.exit_scope();
        assert_eq!(table.resolve(sym("x")), Some(outer));
    }

    #[test]
    fn test_lookup_walks_parents() {
        let mut table = SymbolTable::new();
        let id = table
            .declare_variable(sym("g"), Ty::Bool, Span::DUMMY, false)
            .unwrap();

        table.enter_scope(ScopeKind::Function);
        table.enter_scope(ScopeKind::Block);
        assert_eq!(table.resolve(sym("g")), Some(id));
    }

    #[test]
    fn test_slots_are_per_scope() {
        let mut table = SymbolTable::new();
        table
            .declare_variable(sym("a"), Ty::Int, Span::DUMMY, false)
            .unwrap();
        table
            .declare_variable(sym("b"), Ty::Int, Span::DUMMY, false)
            .unwrap();

        table.enter_scope(ScopeKind::Block);
        let id = table
            .declare_variable(sym("c"), Ty::Int, Span::DUMMY, false)
            .unwrap();

        let SymbolInfo::Variable { scope, slot, .. } = table.symbol(id) else {
            panic!("expected variable");
        };
        assert_eq!(*slot, 0, "child scope slots start at zero");
        assert_eq!(table.scope(*scope).slot_tys.len(), 1);
        assert_eq!(table.scope(table.program_scope()).slot_tys.len(), 2);
    }

    #[test]
    fn test_functions_live_in_program_scope() {
        let mut table = SymbolTable::new();
        table.enter_scope(ScopeKind::Block);
        let id = table
            .declare_function(sym("f"), FuncId(0), Vec::new(), Ty::Void, Span::DUMMY)
            .unwrap();
        // Declared at the root even while a child scope is current.
        assert_eq!(table.resolve(sym("f")), Some(id));
        table.exit_scope();
        assert_eq!(table.resolve(sym("f")), Some(id));
    }
}
