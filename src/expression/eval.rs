use std::collections::BTreeMap;

use crate::expression::ast::{BinaryOp, Expr, UnaryOp};
use crate::expression::error::ExprError;
use crate::foundation::math::HashSequence;

/// Largest list an expression may build.
pub const MAX_LIST_LEN: usize = 100_000;

// total node visits allowed for one evaluation
const MAX_STEPS: u64 = 5_000_000;

/// Result of evaluating an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Scalar number.
    Number(f64),
    /// Boolean produced by comparisons and `and`/`or`/`not`.
    Bool(bool),
    /// List or tuple.
    List(Vec<Value>),
}

impl Value {
    /// Numeric view of a scalar value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::List(_) => None,
        }
    }

    /// Interpret the value as a list of `(x, y)` pairs.
    pub fn as_points(&self) -> Option<Vec<(f64, f64)>> {
        let Self::List(items) = self else {
            return None;
        };
        items
            .iter()
            .map(|item| match item {
                Self::List(pair) if pair.len() == 2 => {
                    Some((pair[0].as_number()?, pair[1].as_number()?))
                }
                _ => None,
            })
            .collect()
    }

    fn truthy(&self) -> bool {
        match self {
            Self::Number(v) => *v != 0.0,
            Self::Bool(b) => *b,
            Self::List(items) => !items.is_empty(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
        }
    }
}

/// Variable bindings and the deterministic random source of an evaluation.
#[derive(Clone, Debug)]
pub struct Environment {
    vars: BTreeMap<String, Value>,
    rng: HashSequence,
    steps: u64,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Environment {
    /// Empty environment; `pi` is always bound.
    pub fn new(seed: u64) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert("pi".to_owned(), Value::Number(std::f64::consts::PI));
        Self {
            vars,
            rng: HashSequence::new(seed),
            steps: 0,
        }
    }

    /// Bind a variable, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    /// Bind a numeric variable.
    pub fn set_number(&mut self, name: impl Into<String>, value: f64) {
        self.set(name, Value::Number(value));
    }

    /// Look a variable up.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub(crate) fn eval(&mut self, expr: &Expr) -> Result<Value, ExprError> {
        self.steps = 0;
        self.eval_node(expr)
    }

    fn tick(&mut self) -> Result<(), ExprError> {
        self.steps += 1;
        if self.steps > MAX_STEPS {
            return Err(ExprError::new(0, "evaluation step budget exhausted"));
        }
        Ok(())
    }

    fn eval_node(&mut self, expr: &Expr) -> Result<Value, ExprError> {
        self.tick()?;
        match expr {
            Expr::Number(v) => Ok(Value::Number(*v)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Var(name) => self
                .vars
                .get(name)
                .cloned()
                .ok_or_else(|| ExprError::new(0, format!("unknown variable '{name}'"))),
            Expr::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.eval_node(item)?);
                }
                Ok(Value::List(out))
            }
            Expr::Unary { op, expr } => {
                let v = self.eval_node(expr)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!v.truthy())),
                    UnaryOp::Plus => Ok(Value::Number(number(&v)?)),
                    UnaryOp::Neg => Ok(Value::Number(-number(&v)?)),
                }
            }
            Expr::Binary { op, left, right } => match op {
                BinaryOp::And => {
                    let l = self.eval_node(left)?;
                    if !l.truthy() {
                        return Ok(l);
                    }
                    self.eval_node(right)
                }
                BinaryOp::Or => {
                    let l = self.eval_node(left)?;
                    if l.truthy() {
                        return Ok(l);
                    }
                    self.eval_node(right)
                }
                _ => {
                    let l = self.eval_node(left)?;
                    let r = self.eval_node(right)?;
                    binary(*op, l, r)
                }
            },
            Expr::Call { func, args } => {
                let mut values = Vec::with_capacity(args.len());
                for a in args {
                    values.push(self.eval_node(a)?);
                }
                self.call(func, values)
            }
            Expr::Index { target, index } => {
                let t = self.eval_node(target)?;
                let i = number(&self.eval_node(index)?)?;
                let items = match t {
                    Value::List(items) => items,
                    other => {
                        return Err(ExprError::new(
                            0,
                            format!("cannot index a {}", other.type_name()),
                        ));
                    }
                };
                let len = items.len() as i64;
                let mut k = i as i64;
                if k < 0 {
                    k += len;
                }
                if k < 0 || k >= len {
                    return Err(ExprError::new(0, format!("index {i} out of range")));
                }
                Ok(items[k as usize].clone())
            }
            Expr::Comprehension { body, var, iter } => {
                let it = self.eval_node(iter)?;
                let items = match it {
                    Value::List(items) => items,
                    other => {
                        return Err(ExprError::new(
                            0,
                            format!("cannot iterate over a {}", other.type_name()),
                        ));
                    }
                };
                let shadowed = self.vars.remove(var);
                let mut out = Vec::with_capacity(items.len());
                let mut result: Result<(), ExprError> = Ok(());
                for item in items {
                    self.vars.insert(var.clone(), item);
                    match self.eval_node(body) {
                        Ok(v) => out.push(v),
                        Err(e) => {
                            result = Err(e);
                            break;
                        }
                    }
                }
                match shadowed {
                    Some(v) => {
                        self.vars.insert(var.clone(), v);
                    }
                    None => {
                        self.vars.remove(var);
                    }
                }
                result?;
                Ok(Value::List(out))
            }
        }
    }

    fn call(&mut self, func: &str, args: Vec<Value>) -> Result<Value, ExprError> {
        let unary = |args: &[Value], f: fn(f64) -> f64| -> Result<Value, ExprError> {
            expect_arity(func, args, 1)?;
            Ok(Value::Number(f(number(&args[0])?)))
        };
        match func {
            "sin" => unary(&args, f64::sin),
            "cos" => unary(&args, f64::cos),
            "tan" => unary(&args, f64::tan),
            "tanh" => unary(&args, f64::tanh),
            "exp" => unary(&args, f64::exp),
            "abs" => unary(&args, f64::abs),
            "floor" => unary(&args, f64::floor),
            "ceil" => unary(&args, f64::ceil),
            "int" => unary(&args, f64::trunc),
            "sqrt" => {
                expect_arity(func, &args, 1)?;
                let v = number(&args[0])?;
                if v < 0.0 {
                    return Err(ExprError::new(0, "math domain error in sqrt"));
                }
                Ok(Value::Number(v.sqrt()))
            }
            "log" => {
                expect_arity(func, &args, 1)?;
                let v = number(&args[0])?;
                if v <= 0.0 {
                    return Err(ExprError::new(0, "math domain error in log"));
                }
                Ok(Value::Number(v.ln()))
            }
            "atan2" => {
                expect_arity(func, &args, 2)?;
                Ok(Value::Number(number(&args[0])?.atan2(number(&args[1])?)))
            }
            "round" => match args.len() {
                1 => Ok(Value::Number(round_half_even(number(&args[0])?))),
                2 => {
                    let scale = 10f64.powi(number(&args[1])? as i32);
                    Ok(Value::Number(
                        round_half_even(number(&args[0])? * scale) / scale,
                    ))
                }
                n => Err(ExprError::new(
                    0,
                    format!("round() takes 1 or 2 arguments ({n} given)"),
                )),
            },
            "min" | "max" => {
                let items = if args.len() == 1 {
                    match &args[0] {
                        Value::List(items) => items.clone(),
                        other => vec![other.clone()],
                    }
                } else {
                    args
                };
                let mut best: Option<f64> = None;
                for item in &items {
                    let v = number(item)?;
                    best = Some(match best {
                        None => v,
                        Some(b) if func == "min" => b.min(v),
                        Some(b) => b.max(v),
                    });
                }
                best.map(Value::Number)
                    .ok_or_else(|| ExprError::new(0, format!("{func}() of an empty sequence")))
            }
            "sum" => {
                expect_arity(func, &args, 1)?;
                let Value::List(items) = &args[0] else {
                    return Err(ExprError::new(0, "sum() expects a list"));
                };
                let mut total = 0.0;
                for item in items {
                    total += number(item)?;
                }
                Ok(Value::Number(total))
            }
            "len" => {
                expect_arity(func, &args, 1)?;
                match &args[0] {
                    Value::List(items) => Ok(Value::Number(items.len() as f64)),
                    other => Err(ExprError::new(
                        0,
                        format!("len() of a {}", other.type_name()),
                    )),
                }
            }
            "range" => range(&args),
            "rnd" => {
                expect_arity(func, &args, 0)?;
                Ok(Value::Number(self.rng.next_unit()))
            }
            _ => Err(ExprError::new(0, format!("unknown function '{func}'"))),
        }
    }
}

fn expect_arity(func: &str, args: &[Value], n: usize) -> Result<(), ExprError> {
    if args.len() != n {
        return Err(ExprError::new(
            0,
            format!("{func}() takes {n} argument(s) ({} given)", args.len()),
        ));
    }
    Ok(())
}

fn number(v: &Value) -> Result<f64, ExprError> {
    v.as_number()
        .ok_or_else(|| ExprError::new(0, format!("expected a number, found a {}", v.type_name())))
}

fn round_half_even(v: f64) -> f64 {
    let r = v.round();
    if (v - v.trunc()).abs() == 0.5 {
        2.0 * (v / 2.0).round()
    } else {
        r
    }
}

fn range(args: &[Value]) -> Result<Value, ExprError> {
    let nums = args.iter().map(number).collect::<Result<Vec<_>, _>>()?;
    let (start, stop, step) = match nums.as_slice() {
        [stop] => (0.0, *stop, 1.0),
        [start, stop] => (*start, *stop, 1.0),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(ExprError::new(0, "range() takes 1 to 3 arguments")),
    };
    let (start, stop, step) = (start.trunc(), stop.trunc(), step.trunc());
    if step == 0.0 {
        return Err(ExprError::new(0, "range() step must not be zero"));
    }
    let count = ((stop - start) / step).ceil().max(0.0);
    if count > MAX_LIST_LEN as f64 {
        return Err(ExprError::new(0, "range() too large"));
    }
    Ok(Value::List(
        (0..count as usize)
            .map(|i| Value::Number(start + i as f64 * step))
            .collect(),
    ))
}

fn binary(op: BinaryOp, l: Value, r: Value) -> Result<Value, ExprError> {
    match (op, l, r) {
        (BinaryOp::Add, Value::List(mut a), Value::List(b)) => {
            if a.len() + b.len() > MAX_LIST_LEN {
                return Err(ExprError::new(0, "list too large"));
            }
            a.extend(b);
            Ok(Value::List(a))
        }
        (BinaryOp::Mul, Value::List(a), n) | (BinaryOp::Mul, n, Value::List(a)) => {
            let times = number(&n)?.max(0.0) as usize;
            if a.len().saturating_mul(times) > MAX_LIST_LEN {
                return Err(ExprError::new(0, "list too large"));
            }
            let mut out = Vec::with_capacity(a.len() * times);
            for _ in 0..times {
                out.extend(a.iter().cloned());
            }
            Ok(Value::List(out))
        }
        (BinaryOp::Eq, a, b) => Ok(Value::Bool(equal(&a, &b))),
        (BinaryOp::Ne, a, b) => Ok(Value::Bool(!equal(&a, &b))),
        (op, a, b) => {
            let x = number(&a)?;
            let y = number(&b)?;
            Ok(match op {
                BinaryOp::Add => Value::Number(x + y),
                BinaryOp::Sub => Value::Number(x - y),
                BinaryOp::Mul => Value::Number(x * y),
                BinaryOp::Div => {
                    if y == 0.0 {
                        return Err(ExprError::new(0, "division by zero"));
                    }
                    Value::Number(x / y)
                }
                BinaryOp::Mod => {
                    if y == 0.0 {
                        return Err(ExprError::new(0, "modulo by zero"));
                    }
                    // result takes the sign of the divisor
                    Value::Number(x - y * (x / y).floor())
                }
                BinaryOp::Pow => {
                    if x == 0.0 && y < 0.0 {
                        return Err(ExprError::new(0, "zero raised to a negative power"));
                    }
                    Value::Number(x.powf(y))
                }
                BinaryOp::Lt => Value::Bool(x < y),
                BinaryOp::Le => Value::Bool(x <= y),
                BinaryOp::Gt => Value::Bool(x > y),
                BinaryOp::Ge => Value::Bool(x >= y),
                BinaryOp::Eq | BinaryOp::Ne | BinaryOp::And | BinaryOp::Or => {
                    return Err(ExprError::new(0, format!("unsupported operator {op:?}")));
                }
            })
        }
    }
}

fn equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| equal(p, q))
        }
        (Value::List(_), _) | (_, Value::List(_)) => false,
        _ => a.as_number() == b.as_number(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/eval.rs"]
mod tests;
