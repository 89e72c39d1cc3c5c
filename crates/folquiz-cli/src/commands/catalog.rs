//! The `folquiz catalog` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use folquiz_core::catalog::Catalog;
use folquiz_core::model::Stage;

pub fn execute(stage: Option<String>) -> Result<()> {
    let catalog = Catalog::builtin();
    let templates = match stage {
        Some(s) => catalog.list_templates(s.parse::<Stage>()?),
        None => catalog.list_all(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Id", "Stage", "Pattern", "Asks for", "Description"]);

    for t in &templates {
        let asks_for = match (t.requires_witness, t.requires_counterexample) {
            (true, _) => "witness",
            (_, true) => "counterexample",
            _ => "",
        };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(t.stage.index()),
            Cell::new(t.pattern),
            Cell::new(asks_for),
            Cell::new(t.description),
        ]);
    }

    println!("{table}");
    println!("{} template(s)", templates.len());

    Ok(())
}
