//! Pseudo-random numbers backed by `rand`. Not cryptographic; scripts
//! get dice rolls, not key material.

use super::{expect_args, list_arg, number_arg};
use crate::error::{StdlibError, StdlibResult};
use crate::Value;
use rand::seq::SliceRandom;
use rand::Rng;

pub fn call(func: &str, args: Vec<Value>) -> StdlibResult {
    let mut rng = rand::thread_rng();
    match func {
        "float" => {
            expect_args(func, &args, 0)?;
            Ok(Value::Number(rng.gen::<f64>()))
        }
        "int" => {
            expect_args(func, &args, 2)?;
            let lo = number_arg(func, &args, 0)? as i64;
            let hi = number_arg(func, &args, 1)? as i64;
            if lo > hi {
                return Err(StdlibError::bad_argument(func, "lower bound exceeds upper"));
            }
            Ok(Value::Number(rng.gen_range(lo..=hi) as f64))
        }
        "choice" => {
            expect_args(func, &args, 1)?;
            let items = list_arg(func, &args, 0)?;
            items
                .choose(&mut rng)
                .cloned()
                .ok_or_else(|| StdlibError::bad_argument(func, "list is empty"))
        }
        "shuffle" => {
            expect_args(func, &args, 1)?;
            let mut items = list_arg(func, &args, 0)?.to_vec();
            items.shuffle(&mut rng);
            Ok(Value::List(items))
        }
        other => Err(StdlibError::UnknownFunction {
            module: "random".to_string(),
            func: other.to_string(),
        }),
    }
}
