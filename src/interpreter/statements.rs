//! Statement execution
//!
//! Statement methods are `pub(crate)` methods on [`Interpreter`]. A snapshot
//! is taken before each statement runs. Blocks open a scope in the current
//! frame; leaving the block releases every object declared inside it, so
//! pointers to those objects become dangling.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;
use crate::semantic::Storage;
use std::sync::Arc;

impl Interpreter {
    /// Run `stmts` in a fresh scope
    pub(crate) fn execute_block(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        if let Some(frame) = self.stack.current_frame_mut() {
            frame.push_scope();
        }

        let result = stmts.iter().try_for_each(|stmt| self.execute_statement(stmt));

        let released = self
            .stack
            .current_frame_mut()
            .map(|frame| frame.pop_scope())
            .unwrap_or_default();
        for object in released {
            self.store.release(object);
        }
        result
    }

    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        self.current_location = stmt.location;
        self.take_snapshot();

        match &stmt.kind {
            StmtKind::VarDecl(decl) => {
                self.execute_var_decl(decl);
                Ok(())
            }

            StmtKind::Expr(expr) => self.evaluate_expr(expr).map(|_| ()),

            StmtKind::Block(stmts) => self.execute_block(stmts),

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate_condition(condition)? {
                    self.execute_statement(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_statement(else_branch)
                } else {
                    Ok(())
                }
            }

            StmtKind::While { condition, body } => {
                while self.evaluate_condition(condition)? {
                    self.execute_statement(body)?;
                    self.current_location = stmt.location;
                }
                Ok(())
            }

            StmtKind::Read(target) => self.execute_read(target),

            StmtKind::Write(expr) => {
                let value = self.evaluate_expr(expr)?;
                self.emit(value, stmt.location)
            }
        }
    }

    /// Allocate a zero-initialized object for a local and bind its slot
    fn execute_var_decl(&mut self, decl: &VarDecl) {
        let compiled = Arc::clone(&self.compiled);
        let Some(&symbol_id) = compiled.resolution.decls.get(&decl.id) else {
            return;
        };
        let symbol = compiled.resolution.symbol(symbol_id);
        let Storage::Local(slot) = symbol.storage else {
            return;
        };

        let object = self.store.allocate(&symbol.name, &symbol.ty);
        if let Some(frame) = self.stack.current_frame_mut() {
            frame.bind(slot, symbol_id, object);
        }
    }

    fn execute_read(&mut self, target: &Expr) -> Result<(), RuntimeError> {
        let location = target.location;
        let address = self.evaluate_lvalue(target)?;

        let token = self
            .input
            .next_token()
            .map_err(|err| RuntimeError::InputFailed {
                message: err.to_string(),
                location,
            })?
            .ok_or(RuntimeError::InputExhausted { location })?;

        let value = match self.type_of(target) {
            Some(Type::Bool) => parse_bool(&token).ok_or_else(|| RuntimeError::InputMismatch {
                expected: "bool",
                found: token.clone(),
                location,
            })?,
            _ => token
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|_| RuntimeError::InputMismatch {
                    expected: "int",
                    found: token.clone(),
                    location,
                })?,
        };

        self.store
            .store(address, value)
            .map_err(|reason| RuntimeError::BoundsFault { reason, location })
    }
}

fn parse_bool(token: &str) -> Option<Value> {
    match token {
        "true" | "1" => Some(Value::Bool(true)),
        "false" | "0" => Some(Value::Bool(false)),
        _ => None,
    }
}
