//! Walkthrough scenarios run by the `exprtree` binary.
//!
//! Each scenario builds a few trees, runs them through the library and
//! collects what it saw into a [`Report`].

use crate::expression::builder::{
    add, and_also, call, greater_than, int, lambda, less_than, member, multiply, param,
    parameter, string,
};
use crate::expression::{
    combine_predicates, evaluate_lambda, rewrite_constants, Connective, ExpressionResult, Lambda,
    Method,
};
use crate::memo::MemoizedLambda;
use crate::render::{outline_lambda, SqlRenderer};
use crate::value::{DataType, Record, RecordSchema, Value};
use serde::Serialize;
use std::sync::Arc;

/// A named walkthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scenario {
    /// Build and evaluate (x, y) => x * y + 10
    Build,
    /// Outline the structure of num => num > 5 && num < 10
    Analyze,
    /// Filter products with a dynamically built price predicate
    Filter,
    /// Add one to every integer constant of x => x + 5
    Rewrite,
    /// Combine two price predicates with AND and OR
    Combine,
    /// Render predicates as SQL
    Sql,
    /// Cache results of a compiled lambda
    Memo,
}

impl Scenario {
    pub const ALL: [Scenario; 7] = [
        Scenario::Build,
        Scenario::Analyze,
        Scenario::Filter,
        Scenario::Rewrite,
        Scenario::Combine,
        Scenario::Sql,
        Scenario::Memo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Build => "build",
            Scenario::Analyze => "analyze",
            Scenario::Filter => "filter",
            Scenario::Rewrite => "rewrite",
            Scenario::Combine => "combine",
            Scenario::Sql => "sql",
            Scenario::Memo => "memo",
        }
    }

    pub fn run(&self) -> ExpressionResult<Report> {
        let mut report = Report::new(self.name());
        match self {
            Scenario::Build => build(&mut report)?,
            Scenario::Analyze => analyze(&mut report)?,
            Scenario::Filter => filter(&mut report)?,
            Scenario::Rewrite => rewrite(&mut report)?,
            Scenario::Combine => combine(&mut report)?,
            Scenario::Sql => sql(&mut report)?,
            Scenario::Memo => memo(&mut report)?,
        }
        Ok(report)
    }
}

/// What a scenario produced, in order
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub scenario: &'static str,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub label: String,
    pub text: String,
}

impl Report {
    fn new(scenario: &'static str) -> Self {
        Self {
            scenario,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, label: impl Into<String>, text: impl ToString) {
        self.entries.push(Entry {
            label: label.into(),
            text: text.to_string(),
        });
    }

    /// Text of the first entry with this label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.text.as_str())
    }
}

pub fn product_schema() -> Arc<RecordSchema> {
    RecordSchema::new(
        "Product",
        vec![
            ("Id", DataType::Int32),
            ("Name", DataType::Varchar),
            ("Price", DataType::Int32),
        ],
    )
}

/// Sample rows used by the product scenarios
pub fn products() -> ExpressionResult<Vec<Value>> {
    let schema = product_schema();
    [
        (1, "Laptop", 30000),
        (2, "Mouse", 500),
        (3, "Keyboard", 1500),
        (4, "Monitor", 8000),
    ]
    .into_iter()
    .map(|(id, name, price)| {
        Record::new(schema.clone(), vec![id.into(), name.into(), price.into()]).map(Value::Record)
    })
    .collect()
}

/// p => p.Price > min_price
pub fn price_above(min_price: i32) -> ExpressionResult<Lambda> {
    let p = parameter("p", DataType::Record(product_schema()));
    lambda(
        vec![p.clone()],
        greater_than(member(param(&p), "Price")?, int(min_price))?,
    )
}

/// p => p.Price < max_price
pub fn price_below(max_price: i32) -> ExpressionResult<Lambda> {
    let p = parameter("p", DataType::Record(product_schema()));
    lambda(
        vec![p.clone()],
        less_than(member(param(&p), "Price")?, int(max_price))?,
    )
}

fn list_rows(rows: &[&Value]) -> String {
    rows.iter()
        .map(|row| row.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn build(report: &mut Report) -> ExpressionResult<()> {
    let x = parameter("x", DataType::Int32);
    let y = parameter("y", DataType::Int32);
    let f = lambda(
        vec![x.clone(), y.clone()],
        add(multiply(param(&x), param(&y))?, int(10))?,
    )?;

    report.push("expression", &f);
    report.push("evaluate (5, 3)", evaluate_lambda(&f, &[5.into(), 3.into()])?);
    report.push("compiled (5, 3)", f.compile()?.call(&[5.into(), 3.into()])?);
    Ok(())
}

fn analyze(report: &mut Report) -> ExpressionResult<()> {
    let num = parameter("num", DataType::Int32);
    let f = lambda(
        vec![num.clone()],
        and_also(
            greater_than(param(&num), int(5))?,
            less_than(param(&num), int(10))?,
        )?,
    )?;

    report.push("expression", &f);
    report.push("outline", outline_lambda(&f));
    let compiled = f.compile()?;
    report.push("num = 7", compiled.call(&[7.into()])?);
    report.push("num = 12", compiled.call(&[12.into()])?);
    Ok(())
}

fn filter(report: &mut Report) -> ExpressionResult<()> {
    let rows = products()?;
    let predicate = price_above(1000)?;

    report.push("predicate", &predicate);
    report.push("all", list_rows(&rows.iter().collect::<Vec<_>>()));
    report.push("matching", list_rows(&predicate.compile()?.filter(&rows)?));
    Ok(())
}

fn rewrite(report: &mut Report) -> ExpressionResult<()> {
    let x = parameter("x", DataType::Int32);
    let original = lambda(vec![x.clone()], add(param(&x), int(5))?)?;
    let modified = rewrite_constants(&original, DataType::Int32, |value| match value {
        Value::Int32(n) => Value::Int32(n.wrapping_add(1)),
        other => other.clone(),
    })?;

    report.push("original", &original);
    report.push("modified", &modified);
    report.push("original (10)", evaluate_lambda(&original, &[10.into()])?);
    report.push("modified (10)", evaluate_lambda(&modified, &[10.into()])?);
    Ok(())
}

fn combine(report: &mut Report) -> ExpressionResult<()> {
    let above = price_above(1000)?;
    let below = price_below(10000)?;
    let both = combine_predicates(&above, &below, Connective::And)?;
    let either = combine_predicates(&above, &below, Connective::Or)?;

    report.push("condition 1", &above);
    report.push("condition 2", &below);
    report.push("and", &both);
    report.push("or", &either);

    let rows = products()?;
    report.push("and matches", list_rows(&both.compile()?.filter(&rows)?));
    report.push("or matches", list_rows(&either.compile()?.filter(&rows)?));
    Ok(())
}

fn sql(report: &mut Report) -> ExpressionResult<()> {
    let renderer = SqlRenderer::new("Products");
    let range = combine_predicates(&price_above(1000)?, &price_below(10000)?, Connective::And)?;
    report.push("range", &range);
    report.push("range sql", renderer.render_select(&range)?);

    // Method calls are outside the SQL grammar and must be refused
    let p = parameter("p", DataType::Record(product_schema()));
    let with_call = lambda(
        vec![p.clone()],
        and_also(
            greater_than(member(param(&p), "Price")?, int(1000))?,
            call(Method::Contains, member(param(&p), "Name")?, vec![string("top")])?,
        )?,
    )?;
    report.push("with call", &with_call);
    match renderer.render_select(&with_call) {
        Ok(sql) => report.push("with call sql", sql),
        Err(err) => report.push("with call sql", format!("refused: {}", err)),
    }
    Ok(())
}

fn memo(report: &mut Report) -> ExpressionResult<()> {
    let n = parameter("n", DataType::Int32);
    let square = lambda(vec![n.clone()], multiply(param(&n), param(&n))?)?;
    let cached = MemoizedLambda::new(square.compile()?);

    report.push("expression", &square);
    for input in [4, 4, 9, 4] {
        report.push(format!("n = {}", input), cached.call(&[input.into()])?);
    }
    report.push("cached entries", cached.len());
    report.push("cache hits", cached.hits());
    Ok(())
}
