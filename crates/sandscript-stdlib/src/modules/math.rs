//! Pure-math module.

use super::{expect_args, number_arg};
use crate::error::{StdlibError, StdlibResult};
use crate::Value;

pub fn call(func: &str, args: Vec<Value>) -> StdlibResult {
    match func {
        "floor" => unary(func, &args, f64::floor),
        "ceil" => unary(func, &args, f64::ceil),
        "round" => unary(func, &args, f64::round),
        "sqrt" => {
            expect_args(func, &args, 1)?;
            let n = number_arg(func, &args, 0)?;
            if n < 0.0 {
                return Err(StdlibError::bad_argument(
                    func,
                    "cannot take the square root of a negative number",
                ));
            }
            Ok(Value::Number(n.sqrt()))
        }
        "pow" => {
            expect_args(func, &args, 2)?;
            let base = number_arg(func, &args, 0)?;
            let exp = number_arg(func, &args, 1)?;
            let result = base.powf(exp);
            if result.is_nan() || result.is_infinite() {
                return Err(StdlibError::bad_argument(
                    func,
                    "result is not a finite number",
                ));
            }
            Ok(Value::Number(result))
        }
        "clamp" => {
            expect_args(func, &args, 3)?;
            let n = number_arg(func, &args, 0)?;
            let lo = number_arg(func, &args, 1)?;
            let hi = number_arg(func, &args, 2)?;
            if lo > hi {
                return Err(StdlibError::bad_argument(func, "lower bound exceeds upper"));
            }
            Ok(Value::Number(n.clamp(lo, hi)))
        }
        "pi" => {
            expect_args(func, &args, 0)?;
            Ok(Value::Number(std::f64::consts::PI))
        }
        other => Err(StdlibError::UnknownFunction {
            module: "math".to_string(),
            func: other.to_string(),
        }),
    }
}

fn unary(func: &str, args: &[Value], op: fn(f64) -> f64) -> StdlibResult {
    expect_args(func, args, 1)?;
    Ok(Value::Number(op(number_arg(func, args, 0)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_family() {
        assert_eq!(call("floor", vec![Value::Number(1.9)]), Ok(Value::Number(1.0)));
        assert_eq!(call("ceil", vec![Value::Number(1.1)]), Ok(Value::Number(2.0)));
        assert_eq!(call("round", vec![Value::Number(1.5)]), Ok(Value::Number(2.0)));
    }

    #[test]
    fn sqrt_rejects_negative() {
        assert_eq!(call("sqrt", vec![Value::Number(9.0)]), Ok(Value::Number(3.0)));
        assert!(call("sqrt", vec![Value::Number(-1.0)]).is_err());
    }

    #[test]
    fn pow_rejects_non_finite() {
        assert_eq!(
            call("pow", vec![Value::Number(2.0), Value::Number(10.0)]),
            Ok(Value::Number(1024.0))
        );
        assert!(call("pow", vec![Value::Number(1e308), Value::Number(2.0)]).is_err());
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(
            call(
                "clamp",
                vec![Value::Number(5.0), Value::Number(0.0), Value::Number(3.0)]
            ),
            Ok(Value::Number(3.0))
        );
        assert!(call(
            "clamp",
            vec![Value::Number(1.0), Value::Number(3.0), Value::Number(0.0)]
        )
        .is_err());
    }

    #[test]
    fn unknown_function() {
        assert!(call("hypot", vec![]).is_err());
    }
}
