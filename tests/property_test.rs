//! Randomised checks of evaluation, rewriting and composition.

use exprtree::expression::builder::*;
use exprtree::expression::{
    combine_predicates, evaluate_lambda, map_tree, substitute_parameter, Connective,
    ConstantRewrite, Expression, Parameter,
};
use exprtree::value::{DataType, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CASES: usize = 200;

/// Reference model of a generated arithmetic tree
#[derive(Debug, Clone)]
enum Shadow {
    Arg(usize),
    Const(i32),
    Add(Box<Shadow>, Box<Shadow>),
    Sub(Box<Shadow>, Box<Shadow>),
    Mul(Box<Shadow>, Box<Shadow>),
}

impl Shadow {
    fn random(rng: &mut StdRng, depth: usize, arity: usize) -> Self {
        if depth == 0 || rng.gen_bool(0.3) {
            return if rng.gen_bool(0.5) {
                Shadow::Arg(rng.gen_range(0..arity))
            } else {
                Shadow::Const(rng.gen_range(-20..20))
            };
        }
        let left = Box::new(Shadow::random(rng, depth - 1, arity));
        let right = Box::new(Shadow::random(rng, depth - 1, arity));
        match rng.gen_range(0..3) {
            0 => Shadow::Add(left, right),
            1 => Shadow::Sub(left, right),
            _ => Shadow::Mul(left, right),
        }
    }

    fn build(&self, params: &[Parameter]) -> Expression {
        match self {
            Shadow::Arg(i) => param(&params[*i]),
            Shadow::Const(n) => int(*n),
            Shadow::Add(l, r) => add(l.build(params), r.build(params)).unwrap(),
            Shadow::Sub(l, r) => subtract(l.build(params), r.build(params)).unwrap(),
            Shadow::Mul(l, r) => multiply(l.build(params), r.build(params)).unwrap(),
        }
    }

    fn compute(&self, args: &[i32]) -> i32 {
        match self {
            Shadow::Arg(i) => args[*i],
            Shadow::Const(n) => *n,
            Shadow::Add(l, r) => l.compute(args).wrapping_add(r.compute(args)),
            Shadow::Sub(l, r) => l.compute(args).wrapping_sub(r.compute(args)),
            Shadow::Mul(l, r) => l.compute(args).wrapping_mul(r.compute(args)),
        }
    }
}

fn int_params(names: &[&str]) -> Vec<Parameter> {
    names
        .iter()
        .map(|name| parameter(*name, DataType::Int32))
        .collect()
}

fn random_args(rng: &mut StdRng, n: usize) -> Vec<i32> {
    (0..n).map(|_| rng.gen_range(-50..50)).collect()
}

fn to_values(args: &[i32]) -> Vec<Value> {
    args.iter().map(|n| Value::Int32(*n)).collect()
}

#[test]
fn test_evaluation_matches_reference() {
    let mut rng = StdRng::seed_from_u64(7);
    let params = int_params(&["a", "b", "c"]);

    for _ in 0..CASES {
        let shadow = Shadow::random(&mut rng, 4, params.len());
        let f = lambda(params.clone(), shadow.build(&params)).unwrap();
        let args = random_args(&mut rng, params.len());
        let expected = Value::Int32(shadow.compute(&args));

        assert_eq!(evaluate_lambda(&f, &to_values(&args)).unwrap(), expected, "{}", f);
        assert_eq!(f.compile().unwrap().call(&to_values(&args)).unwrap(), expected, "{}", f);
    }
}

#[test]
fn test_combined_predicate_matches_connective() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..CASES {
        let p = parameter("p", DataType::Int32);
        let q = parameter("q", DataType::Int32);
        let left = lambda(
            vec![p.clone()],
            greater_than(param(&p), int(rng.gen_range(-30..30))).unwrap(),
        )
        .unwrap();
        let right = lambda(
            vec![q.clone()],
            less_than(
                add(param(&q), int(rng.gen_range(-5..5))).unwrap(),
                int(rng.gen_range(-30..30)),
            )
            .unwrap(),
        )
        .unwrap();

        for connective in [Connective::And, Connective::Or] {
            let combined = combine_predicates(&left, &right, connective).unwrap();
            let v = vec![Value::Int32(rng.gen_range(-40..40))];

            let l = evaluate_lambda(&left, &v).unwrap().as_bool().unwrap();
            let r = evaluate_lambda(&right, &v).unwrap().as_bool().unwrap();
            assert_eq!(
                evaluate_lambda(&combined, &v).unwrap(),
                Value::Boolean(connective.apply(l, r)),
                "{}",
                combined
            );
        }
    }
}

#[test]
fn test_rewrite_of_absent_type_is_identity() {
    let mut rng = StdRng::seed_from_u64(23);
    let params = int_params(&["a", "b"]);

    for _ in 0..CASES {
        let expr = Shadow::random(&mut rng, 4, params.len()).build(&params);
        let mut rewrite =
            ConstantRewrite::new(DataType::Varchar, |_: &Value| Value::from("changed"));

        let rewritten = map_tree(&expr, &mut rewrite).unwrap();
        assert_eq!(rewritten, expr);

        let args = to_values(&random_args(&mut rng, params.len()));
        assert_eq!(
            evaluate_lambda(&lambda(params.clone(), rewritten).unwrap(), &args).unwrap(),
            evaluate_lambda(&lambda(params.clone(), expr).unwrap(), &args).unwrap()
        );
    }
}

#[test]
fn test_substitution_preserves_meaning_at_every_position() {
    let mut rng = StdRng::seed_from_u64(31);
    let params = int_params(&["a", "b", "c"]);

    for _ in 0..CASES {
        let shadow = Shadow::random(&mut rng, 4, params.len());
        let expr = shadow.build(&params);
        let args = to_values(&random_args(&mut rng, params.len()));
        let expected =
            evaluate_lambda(&lambda(params.clone(), expr.clone()).unwrap(), &args).unwrap();

        for position in 0..params.len() {
            let fresh = parameter("fresh", DataType::Int32);
            let rewritten = substitute_parameter(&expr, &params[position], &fresh).unwrap();
            assert!(!rewritten.references(&params[position]));

            let mut rebound = params.clone();
            rebound[position] = fresh;
            let f = lambda(rebound, rewritten).unwrap();
            assert_eq!(evaluate_lambda(&f, &args).unwrap(), expected, "{}", f);
        }
    }
}
