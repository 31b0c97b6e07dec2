use std::f64::consts::{E, PI};

use crate::error::CalcError;

/// Every function the catalogue knows, as a closed tag the parser
/// resolves names into. Dispatch is a single match, never by string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Function {
    Sqrt,
    Root,
    Ln,
    Log,
    Exp,
    Fact,
    Deg,
    Rad,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Sec,
    Csc,
    Cot,
    Abs,
    Round,
    Ceil,
    Floor,
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Sqrt => "sqrt",
            Function::Root => "root",
            Function::Ln => "ln",
            Function::Log => "log",
            Function::Exp => "exp",
            Function::Fact => "fact",
            Function::Deg => "deg",
            Function::Rad => "rad",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Asinh => "asinh",
            Function::Acosh => "acosh",
            Function::Atanh => "atanh",
            Function::Sec => "sec",
            Function::Csc => "csc",
            Function::Cot => "cot",
            Function::Abs => "abs",
            Function::Round => "round",
            Function::Ceil => "ceil",
            Function::Floor => "floor",
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Name → tag and required argument count. The parser checks both here,
/// so the evaluator never sees an unknown name or a wrong arity.
pub const CATALOGUE: &[(&str, Function, usize)] = &[
    ("sqrt", Function::Sqrt, 1),
    ("root", Function::Root, 2),
    ("ln", Function::Ln, 1),
    ("log", Function::Log, 2),
    ("exp", Function::Exp, 1),
    ("fact", Function::Fact, 1),
    ("factorial", Function::Fact, 1),
    ("deg", Function::Deg, 1),
    ("rad", Function::Rad, 1),
    ("sin", Function::Sin, 1),
    ("cos", Function::Cos, 1),
    ("tan", Function::Tan, 1),
    ("asin", Function::Asin, 1),
    ("acos", Function::Acos, 1),
    ("atan", Function::Atan, 1),
    ("sinh", Function::Sinh, 1),
    ("cosh", Function::Cosh, 1),
    ("tanh", Function::Tanh, 1),
    ("asinh", Function::Asinh, 1),
    ("acosh", Function::Acosh, 1),
    ("atanh", Function::Atanh, 1),
    ("sec", Function::Sec, 1),
    ("csc", Function::Csc, 1),
    ("cot", Function::Cot, 1),
    ("abs", Function::Abs, 1),
    ("round", Function::Round, 1),
    ("ceil", Function::Ceil, 1),
    ("floor", Function::Floor, 1),
];

pub fn lookup(name: &str) -> Option<(Function, usize)> {
    CATALOGUE
        .iter()
        .find(|(entry, _, _)| *entry == name)
        .map(|&(_, function, arity)| (function, arity))
}

/// Named constants usable wherever a number literal is.
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "π" => Some(PI),
        _ if name.eq_ignore_ascii_case("pi") => Some(PI),
        _ if name.eq_ignore_ascii_case("e") => Some(E),
        _ => None,
    }
}

// 171! already exceeds f64::MAX.
const FACTORIAL_CEILING: f64 = 170.0;

/// Shared by the `fact`/`factorial` catalogue entries and the postfix
/// `!` operator.
pub fn factorial(value: f64) -> Result<f64, CalcError> {
    if value < 0.0 || value.fract() != 0.0 {
        return Err(CalcError::domain(
            "factorial is only defined for non-negative integers",
        ));
    }
    if value > FACTORIAL_CEILING {
        return Err(CalcError::Overflow);
    }

    let n = value as u64;
    let mut product = 1.0;
    for k in 2..=n {
        product *= k as f64;
    }
    Ok(product)
}

fn root(base: f64, order: f64) -> Result<f64, CalcError> {
    if order == 0.0 {
        return Err(CalcError::domain("zeroth root is undefined"));
    }
    if base < 0.0 {
        let odd_order = order.fract() == 0.0 && (order as i64) % 2 != 0;
        if !odd_order {
            return Err(CalcError::domain(
                "even-order root of a negative number is not real",
            ));
        }
        return Ok(-(-base).powf(order.recip()));
    }
    Ok(base.powf(order.recip()))
}

fn reciprocal(denominator: f64, name: &str) -> Result<f64, CalcError> {
    if denominator == 0.0 {
        return Err(CalcError::domain(format!("{name} is undefined at this angle")));
    }
    Ok(denominator.recip())
}

/// Applies one catalogue entry to already-evaluated arguments.
///
/// `args` has the arity the catalogue declares; the parser enforced it.
pub fn apply(function: Function, args: &[f64]) -> Result<f64, CalcError> {
    let value = match function {
        Function::Sqrt => {
            if args[0] < 0.0 {
                return Err(CalcError::domain(
                    "square root of a negative number is not real",
                ));
            }
            args[0].sqrt()
        }
        Function::Root => root(args[0], args[1])?,
        Function::Ln => {
            if args[0] <= 0.0 {
                return Err(CalcError::domain(
                    "logarithm is only defined for positive numbers",
                ));
            }
            args[0].ln()
        }
        Function::Log => {
            let (value, base) = (args[0], args[1]);
            if value <= 0.0 {
                return Err(CalcError::domain(
                    "logarithm is only defined for positive numbers",
                ));
            }
            if base <= 0.0 || base == 1.0 {
                return Err(CalcError::domain(
                    "logarithm base must be positive and not 1",
                ));
            }
            value.ln() / base.ln()
        }
        Function::Exp => args[0].exp(),
        Function::Fact => factorial(args[0])?,
        Function::Deg => args[0].to_radians(),
        Function::Rad => args[0].to_degrees(),
        Function::Sin => args[0].sin(),
        Function::Cos => args[0].cos(),
        Function::Tan => args[0].tan(),
        Function::Asin => {
            if !(-1.0..=1.0).contains(&args[0]) {
                return Err(CalcError::domain("asin is only defined on [-1, 1]"));
            }
            args[0].asin()
        }
        Function::Acos => {
            if !(-1.0..=1.0).contains(&args[0]) {
                return Err(CalcError::domain("acos is only defined on [-1, 1]"));
            }
            args[0].acos()
        }
        Function::Atan => args[0].atan(),
        Function::Sinh => args[0].sinh(),
        Function::Cosh => args[0].cosh(),
        Function::Tanh => args[0].tanh(),
        Function::Asinh => args[0].asinh(),
        Function::Acosh => {
            if args[0] < 1.0 {
                return Err(CalcError::domain("acosh is only defined for numbers >= 1"));
            }
            args[0].acosh()
        }
        Function::Atanh => {
            if args[0] <= -1.0 || args[0] >= 1.0 {
                return Err(CalcError::domain("atanh is only defined on (-1, 1)"));
            }
            args[0].atanh()
        }
        Function::Sec => reciprocal(args[0].cos(), "sec")?,
        Function::Csc => reciprocal(args[0].sin(), "csc")?,
        Function::Cot => reciprocal(args[0].tan(), "cot")?,
        Function::Abs => args[0].abs(),
        Function::Round => args[0].round(),
        Function::Ceil => args[0].ceil(),
        Function::Floor => args[0].floor(),
    };
    Ok(value)
}
