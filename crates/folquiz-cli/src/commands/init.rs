//! The `folquiz init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("folquiz.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("answers.toml"), SAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Edit folquiz.toml to choose how many problems each stage gets");
    println!("  2. Run: folquiz generate");
    println!("  3. Fill in answers.toml, then run: folquiz grade --quiz <quiz.json> --answers answers.toml");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# folquiz configuration

# Number of individuals in each model (3-5). Leave unset for a random size.
# domain_size = 4

# Fix the seed to regenerate the same quiz.
# seed = 42

output_dir = "./folquiz-output"

[stage_counts]
stage0 = 1  # atomic sentences about a constant
stage1 = 2  # existential
stage2 = 2  # universal
stage3 = 2  # scope and mixed quantifiers
"#;

const SAMPLE_ANSWERS: &str = r#"# One [[answers]] entry per problem, in order.
# witness names an individual when a true existential needs a witness
# or a false universal needs a counterexample; leave it out otherwise.

[answer_sheet]
student = "your name"

[[answers]]
truth_value = true

[[answers]]
truth_value = true
witness = "alice"

[[answers]]
truth_value = false
"#;
