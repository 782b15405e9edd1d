//! Expression evaluation
//!
//! Expressions are evaluated strictly left to right. An lvalue evaluates to
//! the pointer designating its cell ([`Interpreter::evaluate_lvalue`]); an
//! rvalue loads through that pointer, except for arrays, whose value is the
//! address of their first element.
//!
//! Assignment computes the target's address before the right-hand side and
//! yields the stored value, so `x = (y = y + 1) * y` observes the updated `y`.
//!
//! Integer arithmetic wraps on overflow. Division by zero is a runtime fault.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::pointer_add;
use crate::memory::store::BoundsReason;
use crate::memory::value::{Address, Value};
use crate::parser::ast::*;
use crate::semantic::Storage;
use std::cmp::Ordering;
use std::sync::Arc;

impl Interpreter {
    /// The checked type of `expr`
    pub(crate) fn type_of(&self, expr: &Expr) -> Option<&Type> {
        self.compiled.types.get(&expr.id)
    }

    /// Evaluate an expression and return its value
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        let location = expr.location;

        match &expr.kind {
            ExprKind::IntLiteral(n) => Ok(Value::Int(*n)),

            ExprKind::BoolLiteral(b) => Ok(Value::Bool(*b)),

            ExprKind::Variable(_) | ExprKind::Deref(_) | ExprKind::Index { .. } => {
                let address = self.evaluate_lvalue(expr)?;
                if self.type_of(expr).is_some_and(Type::is_array) {
                    return Ok(address);
                }
                self.store
                    .load(address)
                    .map_err(|reason| RuntimeError::BoundsFault { reason, location })
            }

            ExprKind::UnaryOp { op, operand } => {
                let value = self.evaluate_expr(operand)?;
                match op {
                    UnOp::Neg => Ok(Value::Int(value.as_int().unwrap_or(0).wrapping_neg())),
                    UnOp::Not => Ok(Value::Bool(!value.as_bool().unwrap_or(false))),
                }
            }

            ExprKind::BinaryOp { op, left, right } => {
                self.evaluate_binary(*op, left, right, location)
            }

            ExprKind::AddressOf(operand) => self.evaluate_lvalue(operand),

            ExprKind::Assign { target, value } => {
                let address = self.evaluate_lvalue(target)?;
                let value = self.evaluate_expr(value)?;
                self.store
                    .store(address, value)
                    .map_err(|reason| RuntimeError::BoundsFault { reason, location })?;
                Ok(value)
            }

            ExprKind::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate_expr(arg)?);
                }
                self.call_function(name, values, Some(location))?;
                // Calls have no value; they only appear as statements
                Ok(Value::Null)
            }
        }
    }

    /// Evaluate a condition to a boolean
    pub(crate) fn evaluate_condition(&mut self, expr: &Expr) -> Result<bool, RuntimeError> {
        Ok(self.evaluate_expr(expr)?.as_bool().unwrap_or(false))
    }

    /// Evaluate an lvalue to the pointer designating its first cell.
    ///
    /// The pointer is not checked here; the access that uses it is.
    pub(crate) fn evaluate_lvalue(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        let location = expr.location;

        match &expr.kind {
            ExprKind::Variable(name) => {
                let compiled = Arc::clone(&self.compiled);
                let object = compiled.resolution.use_of(expr.id).and_then(|symbol| {
                    match symbol.storage {
                        Storage::Global(index) => self.globals.get(index).copied(),
                        Storage::Local(slot) | Storage::Parameter(slot) => {
                            self.stack.current_frame().and_then(|frame| frame.slot(slot))
                        }
                    }
                });
                object
                    .map(|object| Value::Pointer(Address::new(object, 0)))
                    .ok_or_else(|| RuntimeError::BoundsFault {
                        reason: BoundsReason::Dangling { name: name.clone() },
                        location,
                    })
            }

            // The pointer itself designates the object; `*a` on an array
            // designates its first element
            ExprKind::Deref(operand) => self.evaluate_expr(operand),

            ExprKind::Index { array, index } => {
                let base = self.evaluate_expr(array)?;
                let offset = self.evaluate_expr(index)?.as_int().unwrap_or(0);
                let element = self.type_of(expr).cloned().unwrap_or(Type::Int);
                Ok(pointer_add(base, offset, &element))
            }

            // Not addressable; rejected by the checker
            _ => self.evaluate_expr(expr),
        }
    }

    fn evaluate_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            // Short-circuit: the right operand runs only when needed
            BinOp::And => Ok(Value::Bool(
                self.evaluate_condition(left)? && self.evaluate_condition(right)?,
            )),
            BinOp::Or => Ok(Value::Bool(
                self.evaluate_condition(left)? || self.evaluate_condition(right)?,
            )),

            BinOp::Add | BinOp::Sub => {
                let lhs = self.evaluate_expr(left)?;
                let rhs = self.evaluate_expr(right)?;
                let left_ty = self.type_of(left).map(Type::decay);
                let right_ty = self.type_of(right).map(Type::decay);
                let negate = op == BinOp::Sub;

                match (left_ty, right_ty) {
                    (Some(Type::Pointer(pointee)), _) => {
                        let n = rhs.as_int().unwrap_or(0);
                        let n = if negate { n.wrapping_neg() } else { n };
                        Ok(pointer_add(lhs, n, &pointee))
                    }
                    (_, Some(Type::Pointer(pointee))) => {
                        Ok(pointer_add(rhs, lhs.as_int().unwrap_or(0), &pointee))
                    }
                    _ => {
                        let (a, b) = int_operands(lhs, rhs);
                        Ok(Value::Int(if negate {
                            a.wrapping_sub(b)
                        } else {
                            a.wrapping_add(b)
                        }))
                    }
                }
            }

            BinOp::Mul => {
                let (a, b) = self.evaluate_ints(left, right)?;
                Ok(Value::Int(a.wrapping_mul(b)))
            }

            BinOp::Div => {
                let (a, b) = self.evaluate_ints(left, right)?;
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero { location });
                }
                Ok(Value::Int(a.wrapping_div(b)))
            }

            BinOp::Eq | BinOp::Ne => {
                let lhs = self.evaluate_expr(left)?;
                let rhs = self.evaluate_expr(right)?;
                Ok(Value::Bool((lhs == rhs) == (op == BinOp::Eq)))
            }

            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let lhs = self.evaluate_expr(left)?;
                let rhs = self.evaluate_expr(right)?;
                let ordering = compare(lhs, rhs);
                Ok(Value::Bool(match op {
                    BinOp::Lt => ordering == Ordering::Less,
                    BinOp::Le => ordering != Ordering::Greater,
                    BinOp::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                }))
            }
        }
    }

    fn evaluate_ints(&mut self, left: &Expr, right: &Expr) -> Result<(i32, i32), RuntimeError> {
        let lhs = self.evaluate_expr(left)?;
        let rhs = self.evaluate_expr(right)?;
        Ok(int_operands(lhs, rhs))
    }
}

#[inline]
fn int_operands(lhs: Value, rhs: Value) -> (i32, i32) {
    (lhs.as_int().unwrap_or(0), rhs.as_int().unwrap_or(0))
}

/// Order two ints or two bools (`false < true`)
#[inline]
fn compare(lhs: Value, rhs: Value) -> Ordering {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(&b),
        _ => {
            let (a, b) = int_operands(lhs, rhs);
            a.cmp(&b)
        }
    }
}
