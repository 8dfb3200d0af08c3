//! Filter listing command.

#![allow(clippy::print_literal)]

use ajuste_core::FilterKind;
use clap::Args;

use super::common::parse_kind;

#[derive(Args)]
pub struct FiltersArgs {
    /// Show details for a specific filter
    #[arg(value_name = "FILTER", value_parser = parse_kind)]
    filter: Option<FilterKind>,
}

pub fn run(args: FiltersArgs) -> anyhow::Result<()> {
    if let Some(kind) = args.filter {
        println!("{}", kind.name());
        println!("{}", "=".repeat(kind.name().len()));
        println!();
        println!("{}", kind.description());
        println!();
        println!("Parameters:");
        println!();
        println!("  {:6}  {}", "Name", "Range");
        println!("  {:6}  {}", "----", "-----");
        println!("  {:6}  {}", "n", "[1, ∞)");
        println!("  {:6}  {}", "mu", kind.mu_range());
        if let Some(eps) = kind.eps_range() {
            println!("  {:6}  {}", "eps", eps);
        }
        if kind == FilterKind::Ap {
            println!("  {:6}  {}", "order", "[1, ∞)");
        }
        println!();
        println!("Example usage:");
        println!();
        println!("  ajuste identify --kind {} -n 8 --mu 0.5", kind.id());
        println!("  ajuste explore --kind {} -n 8 --mu-start 0.01 --mu-end 1.0", kind.id());
        return Ok(());
    }

    println!("Available Filters");
    println!("=================");
    println!();
    println!("  {:6}  {:10}  {:10}  {}", "Name", "mu", "eps", "Description");
    println!("  {:6}  {:10}  {:10}  {}", "----", "--", "---", "-----------");
    for kind in FilterKind::ALL {
        let mu = kind.mu_range().to_string();
        let eps = kind
            .eps_range()
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        println!(
            "  {:6}  {:10}  {:10}  {}",
            kind.id(),
            mu,
            eps,
            kind.description()
        );
    }
    println!();
    println!("Use 'ajuste filters <name>' for details.");

    Ok(())
}
