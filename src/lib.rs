pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;

pub use error::CalcError;
pub use lexer::*;
pub use parser::{Expr, Parser};

/// Lexes, parses and evaluates one expression.
///
/// This is the whole boundary the surrounding chat layer calls: one
/// immutable string in, one finite number or one typed error out. No
/// state survives between invocations.
pub fn evaluate_expression(input: &str) -> Result<f64, CalcError> {
    let mut parser = Parser::new(input);
    let expr = parser.parse()?;
    evaluator::eval(&expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(input: &str, expected: f64) {
        let result = evaluate_expression(input).unwrap();
        assert!(
            (result - expected).abs() < 1e-9,
            "{input} evaluated to {result}, expected {expected}"
        );
    }

    #[test]
    fn test_literals_evaluate_to_themselves() {
        assert_eq!(evaluate_expression("42"), Ok(42.0));
        assert_eq!(evaluate_expression("3.25"), Ok(3.25));
        assert_eq!(evaluate_expression("0"), Ok(0.0));
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(evaluate_expression("2 + 3 * 4"), Ok(14.0));
        assert_eq!(evaluate_expression("(2 + 3) * 4"), Ok(20.0));
    }

    #[test]
    fn test_right_associative_power() {
        assert_eq!(evaluate_expression("2 ^ 3 ^ 2"), Ok(512.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate_expression("1 / 0"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_domain_errors() {
        assert!(matches!(
            evaluate_expression("sqrt(-1)"),
            Err(CalcError::Domain { .. })
        ));
        assert!(matches!(
            evaluate_expression("ln(0)"),
            Err(CalcError::Domain { .. })
        ));
        assert!(matches!(
            evaluate_expression("asin(2)"),
            Err(CalcError::Domain { .. })
        ));
    }

    #[test]
    fn test_arity_mismatch() {
        assert!(matches!(
            evaluate_expression("root(2)"),
            Err(CalcError::ArityMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_function() {
        assert!(matches!(
            evaluate_expression("frobnicate(1)"),
            Err(CalcError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(matches!(
            evaluate_expression("(1 + 2"),
            Err(CalcError::Syntax { .. })
        ));
        assert!(matches!(
            evaluate_expression("1 + 2)"),
            Err(CalcError::Syntax { .. })
        ));
    }

    #[test]
    fn test_idempotence() {
        let input = "sqrt(16) + log(100, 10) * sin(deg 90)";
        assert_eq!(evaluate_expression(input), evaluate_expression(input));

        let input = "root(2)";
        assert_eq!(evaluate_expression(input), evaluate_expression(input));
    }

    #[test]
    fn test_degree_radian_round_trip() {
        assert_close("deg(rad(90))", 90.0);
        assert_close("rad(deg(90))", 90.0);
    }

    #[test]
    fn test_readme_expression() {
        // sqrt(16) = 4, log(100, 10) = 2, sin(deg 90) = 1.
        assert_close("sqrt(16) + log(100, 10) * sin(deg 90)", 6.0);
    }

    #[test]
    fn test_unary_minus_spacing() {
        assert_eq!(evaluate_expression("3-2"), Ok(1.0));
        assert_eq!(evaluate_expression("3 - -2"), Ok(5.0));
        assert_eq!(evaluate_expression("-5 + 3"), Ok(-2.0));
    }

    #[test]
    fn test_factorial_and_roots() {
        assert_eq!(evaluate_expression("fact(5)"), Ok(120.0));
        assert_eq!(evaluate_expression("factorial(5)"), Ok(120.0));
        assert_eq!(evaluate_expression("5!"), Ok(120.0));
        assert_close("root(27, 3)", 3.0);
    }
}
