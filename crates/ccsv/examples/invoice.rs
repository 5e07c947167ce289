//! Calculate a small invoice and print the result
//!
//! Run with `cargo run -p ccsv --example invoice`.

use ccsv::prelude::*;

fn main() -> Result<()> {
    let text = "\
item,price,quantity,total
apples,0.5,12,=#-2:#0*#-1:#0
pears,0.75,4,=#-2:#0*#-1:#0
cherries,3,1,=#-2:#0*#-1:#0
,,=sum(quantity),=sum(total)
";

    let grid = Grid::parse(text, &GridOptions::default())?;
    let (output, stats) = grid.calculate_with_options(&CalculationOptions::default())?;

    print!("{}", output);
    eprintln!(
        "{} rows, {} formulas, {} cells evaluated",
        stats.rows, stats.formula_count, stats.cells_evaluated
    );
    Ok(())
}
