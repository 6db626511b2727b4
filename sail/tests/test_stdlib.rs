// Tests for the standard primitive library

use pretty_assertions::assert_eq;
use sail::{EvalError, Evaluator, StandardLibrary, Value};

fn sym(name: &str) -> Value {
    Value::symbol(name)
}

fn int(n: i64) -> Value {
    Value::Integer(n)
}

fn list(items: Vec<Value>) -> Value {
    Value::list(items)
}

fn eval(evaluator: &mut Evaluator, expr: Value) -> Result<Value, EvalError> {
    let global = evaluator.global();
    evaluator.evaluate(&expr, global)
}

fn evaluator() -> Evaluator {
    let mut evaluator = Evaluator::new();
    StandardLibrary::install(&mut evaluator);
    evaluator
}

#[test]
fn integer_arithmetic() {
    let mut evaluator = evaluator();
    assert_eq!(
        eval(&mut evaluator, list(vec![sym("+"), int(1), int(2), int(3)])),
        Ok(int(6))
    );
    assert_eq!(
        eval(&mut evaluator, list(vec![sym("-"), int(10), int(4)])),
        Ok(int(6))
    );
    assert_eq!(
        eval(&mut evaluator, list(vec![sym("-"), int(5)])),
        Ok(int(-5))
    );
    assert_eq!(
        eval(&mut evaluator, list(vec![sym("*"), int(2), int(3), int(4)])),
        Ok(int(24))
    );
    assert_eq!(
        eval(&mut evaluator, list(vec![sym("/"), int(7), int(2)])),
        Ok(int(3))
    );
}

#[test]
fn a_float_anywhere_promotes_the_result() {
    let mut evaluator = evaluator();
    assert_eq!(
        eval(
            &mut evaluator,
            list(vec![sym("+"), int(1), Value::Float(2.5)])
        ),
        Ok(Value::Float(3.5))
    );
    assert_eq!(
        eval(
            &mut evaluator,
            list(vec![sym("/"), Value::Float(7.0), int(2)])
        ),
        Ok(Value::Float(3.5))
    );
}

#[test]
fn division_by_integer_zero_is_a_primitive_error() {
    let mut evaluator = evaluator();
    assert_eq!(
        eval(&mut evaluator, list(vec![sym("/"), int(1), int(0)])),
        Err(EvalError::PrimitiveError {
            name: "/".to_string(),
            message: "division by zero".to_string(),
        })
    );
}

#[test]
fn type_errors_travel_through_the_primitive_channel() {
    let mut evaluator = evaluator();
    let result = eval(
        &mut evaluator,
        list(vec![sym("+"), int(1), Value::string("two")]),
    );
    assert_eq!(
        result,
        Err(EvalError::PrimitiveError {
            name: "+".to_string(),
            message: "+ expects numbers, got string".to_string(),
        })
    );
}

#[test]
fn comparisons_and_equality() {
    let mut evaluator = evaluator();
    assert_eq!(
        eval(&mut evaluator, list(vec![sym("<"), int(1), int(2)])),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        eval(&mut evaluator, list(vec![sym(">="), int(2), int(2)])),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        eval(&mut evaluator, list(vec![sym(">"), int(1), Value::Float(1.5)])),
        Ok(Value::Boolean(false))
    );
    // Equality is structural
    assert_eq!(
        eval(
            &mut evaluator,
            list(vec![
                sym("="),
                list(vec![sym("list"), int(1), int(2)]),
                list(vec![sym("list"), int(1), int(2)]),
            ])
        ),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        eval(&mut evaluator, list(vec![sym("="), int(1), int(2)])),
        Ok(Value::Boolean(false))
    );
}

#[test]
fn not_follows_the_single_sentinel_rule() {
    let mut evaluator = evaluator();
    assert_eq!(
        eval(
            &mut evaluator,
            list(vec![sym("not"), Value::Boolean(false)])
        ),
        Ok(Value::Boolean(true))
    );
    // Unit is truthy, so its negation is false
    assert_eq!(
        eval(
            &mut evaluator,
            list(vec![sym("not"), list(vec![sym("quote"), Value::Unit])])
        ),
        Ok(Value::Boolean(false))
    );
}

#[test]
fn pair_and_list_operations() {
    let mut evaluator = evaluator();
    assert_eq!(
        eval(
            &mut evaluator,
            list(vec![sym("head"), list(vec![sym("pair"), int(1), int(2)])])
        ),
        Ok(int(1))
    );
    assert_eq!(
        eval(
            &mut evaluator,
            list(vec![sym("tail"), list(vec![sym("pair"), int(1), int(2)])])
        ),
        Ok(int(2))
    );
    assert_eq!(
        eval(
            &mut evaluator,
            list(vec![sym("head"), list(vec![sym("list"), int(1), int(2)])])
        ),
        Ok(int(1))
    );
    assert_eq!(
        eval(&mut evaluator, list(vec![sym("head"), int(1)])),
        Err(EvalError::PrimitiveError {
            name: "head".to_string(),
            message: "head expects a pair, got integer".to_string(),
        })
    );
}

#[test]
fn vectors_are_shared_and_mutable_in_place() {
    let mut evaluator = evaluator();
    let result = evaluator
        .eval_program(&[
            list(vec![
                sym("def"),
                sym("v"),
                list(vec![sym("vector"), int(1), int(2), int(3)]),
            ]),
            list(vec![sym("vec-set!"), sym("v"), int(1), int(9)]),
            list(vec![sym("vec-get"), sym("v"), int(1)]),
        ])
        .unwrap();
    assert_eq!(result, int(9));

    let result = evaluator
        .eval_program(&[list(vec![
            sym("vec-len"),
            list(vec![sym("vector"), int(1), int(2), int(3)]),
        ])])
        .unwrap();
    assert_eq!(result, int(3));
}

#[test]
fn vector_indexing_is_bounds_checked() {
    let mut evaluator = evaluator();
    let result = eval(
        &mut evaluator,
        list(vec![
            sym("vec-get"),
            list(vec![sym("vector"), int(1)]),
            int(5),
        ]),
    );
    assert_eq!(
        result,
        Err(EvalError::PrimitiveError {
            name: "vec-get".to_string(),
            message: "index 5 out of bounds for length 1".to_string(),
        })
    );
}

#[test]
fn print_returns_unit() {
    let mut evaluator = evaluator();
    assert_eq!(
        eval(
            &mut evaluator,
            list(vec![sym("print"), Value::string("hello"), int(1)])
        ),
        Ok(Value::Unit)
    );
}
