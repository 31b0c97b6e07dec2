use crate::{
    error::CalcError,
    functions::{self, Function},
    parser::{BinOp, Expr, UnaryOp},
};

/// Post-order walk over a parsed tree.
///
/// Pure and stateless: the same tree always produces the same value or
/// the same error. Any non-finite intermediate result is reported as
/// `Overflow` instead of letting infinities or NaN propagate.
pub fn eval(expr: &Expr) -> Result<f64, CalcError> {
    let value = match expr {
        Expr::Literal(n) => *n,
        Expr::Unary(op, operand) => {
            let x = eval(operand)?;
            match op {
                UnaryOp::Neg => -x,
                UnaryOp::Fact => functions::factorial(x)?,
                UnaryOp::Deg => functions::apply(Function::Deg, &[x])?,
                UnaryOp::Rad => functions::apply(Function::Rad, &[x])?,
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let a = eval(lhs)?;
            let b = eval(rhs)?;
            match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => {
                    if b == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    a / b
                }
                BinOp::Pow => pow(a, b)?,
            }
        }
        Expr::Call(function, args) => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval(arg)?);
            }
            functions::apply(*function, &values)?
        }
    };

    if !value.is_finite() {
        return Err(CalcError::Overflow);
    }
    Ok(value)
}

// Real-valued power: a negative base takes only integer exponents.
// 0^0 is 1, matching f64::powf.
fn pow(base: f64, exponent: f64) -> Result<f64, CalcError> {
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(CalcError::domain(
            "fractional exponent on a negative base is not real",
        ));
    }
    Ok(base.powf(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn eval_str(input: &str) -> Result<f64, CalcError> {
        let expr = Parser::new(input).parse()?;
        eval(&expr)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_str("1 + 2 * 3"), Ok(7.0));
        assert_eq!(eval_str("10 - 3 - 2"), Ok(5.0));
        assert_eq!(eval_str("7 / 2"), Ok(3.5));
        assert_eq!(eval_str("3 - -2"), Ok(5.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval_str("1 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(eval_str("1 / (2 - 2)"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_power() {
        assert_eq!(eval_str("2 ^ 10"), Ok(1024.0));
        assert_eq!(eval_str("2 ^ -2"), Ok(0.25));
        assert_eq!(eval_str("(-2) ^ 3"), Ok(-8.0));
        assert_eq!(eval_str("0 ^ 0"), Ok(1.0));
        assert_eq!(eval_str("-2 ^ 2"), Ok(-4.0));
    }

    #[test]
    fn test_fractional_power_of_negative_base() {
        assert!(matches!(
            eval_str("(-8) ^ 0.5"),
            Err(CalcError::Domain { .. })
        ));
    }

    #[test]
    fn test_factorial_postfix() {
        assert_eq!(eval_str("5!"), Ok(120.0));
        assert_eq!(eval_str("0!"), Ok(1.0));
        assert_eq!(eval_str("3! ^ 2"), Ok(36.0));
        assert_eq!(eval_str("2 ^ 3!"), Ok(64.0));
        assert!(matches!(eval_str("(-1)!"), Err(CalcError::Domain { .. })));
        assert!(matches!(eval_str("2.5!"), Err(CalcError::Domain { .. })));
        assert_eq!(eval_str("171!"), Err(CalcError::Overflow));
    }

    #[test]
    fn test_overflow_is_reported_not_infinite() {
        assert_eq!(eval_str("10 ^ 400"), Err(CalcError::Overflow));
        assert_eq!(eval_str("exp(1000)"), Err(CalcError::Overflow));
        assert_eq!(eval_str("10 ^ 308 * 100"), Err(CalcError::Overflow));
    }

    #[test]
    fn test_zero_to_negative_power_overflows() {
        assert_eq!(eval_str("0 ^ -1"), Err(CalcError::Overflow));
    }

    #[test]
    fn test_unit_prefixes() {
        let result = eval_str("sin(deg 90)").unwrap();
        assert!((result - 1.0).abs() < 1e-12);

        let result = eval_str("cos(deg 180)").unwrap();
        assert!((result + 1.0).abs() < 1e-12);

        // rad is the inverse annotation.
        let result = eval_str("rad(deg(45))").unwrap();
        assert!((result - 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_deep_error_aborts_whole_evaluation() {
        assert!(matches!(
            eval_str("1 + sqrt(-1) * 3"),
            Err(CalcError::Domain { .. })
        ));
    }

    #[test]
    fn test_constants() {
        assert_eq!(eval_str("pi"), Ok(std::f64::consts::PI));
        let result = eval_str("sin(pi / 2)").unwrap();
        assert!((result - 1.0).abs() < 1e-12);
    }
}
