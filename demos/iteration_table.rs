//! Print the iteration table for a Riemann sum
//!
//! ```text
//! cargo run --example iteration_table -- "x**2" 0 5 10 midpoint
//! RUST_LOG=debug cargo run --example iteration_table -- "y + 1"
//! ```

use riemann_anafis::{Request, Rule};
use std::env;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let function_text = args.next().unwrap_or_else(|| "x**2".to_string());
    let a: f64 = args.next().map_or(Ok(0.0), |s| s.parse())?;
    let b: f64 = args.next().map_or(Ok(5.0), |s| s.parse())?;
    let n: usize = args.next().map_or(Ok(10), |s| s.parse())?;
    let rule: Rule = args.next().map_or(Ok(Rule::Left), |s| s.parse())?;

    let report = Request::new(function_text, a, b, n, rule).run()?;

    match (&report.display, &report.parse_error) {
        (Some(latex), _) => println!("f(x) = {latex}"),
        (None, Some(err)) => println!("Invalid function ({err}); integrating f(x) = 0"),
        (None, None) => {}
    }
    println!("{rule} sum over [{a}, {b}] with n = {n}, dx = {}", report.result.step);
    println!();
    println!("{:>6}  {:>14}  {:>14}  {:>14}  {:>14}", "i", "x_i", "f(x_i)", "area", "cumulative");

    for row in report.result.rows() {
        println!(
            "{:>6}  {:>14.6}  {:>14.6}  {:>14.6}  {:>14.6}",
            row.iteration, row.abscissa, row.height, row.area, row.cumulative
        );
    }

    println!();
    println!("Estimated integral: {:.6}", report.result.total);
    for err in &report.result.errors {
        println!("warning: {err}");
    }

    Ok(())
}
