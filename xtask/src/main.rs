//! Build automation tasks for pgsplit
//!
//! This tool provides automation tasks for the pgsplit project:
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for pgsplit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<pgsplit_cli::Cli>();

    let content = format!(
        r#"# pgsplit CLI Reference

pgsplit reads the output of `pg_dump` or `pg_dumpall` and writes every
database object to its own file below a destination directory.

## Quick Start

```bash
# Split a whole cluster, one directory per database
pg_dumpall --schema-only | pgsplit --dst structure

# Keep the dump's object type names and only look at one database
pgsplit -f cluster.sql --mode origin --whitelist-db '^shop$'

# Copy cluster roles into every database directory
pg_dumpall --schema-only | pgsplit --mc --clean
```

## Layout Modes

- `custom` (default): constraints, indexes, triggers, defaults and grants are
  appended to the file of the table they belong to. Type directories are
  lower-case.
- `origin`: every object type keeps its own directory named as in the dump.

## Options

{}

## Environment Variables

- `PGSPLIT_CONFIG` - TOML file with splitter settings
- `PGSPLIT_LOG` - Log level (`trace`, `debug`, `info`, `warn`, `error`)
- `PGSPLIT_LOG_FORMAT` - `text` or `json`
- `PGSPLIT_LOG_FILE` - File that receives a copy of the log
- `PGSPLIT_LOG_FILTER` - Extra filter directives (e.g., `pgsplit_core=trace`)

## Configuration File

```toml
mode = "custom"
dest = "structure"
exclude_db = "^(template|postgres)"
whitelist_db = "^shop"
relocate_roles = true
acl_files = false
```

Flags given on the command line override the file.

---

*This file is generated. To update, run `cargo xtask generate-cli-docs`.*
"#,
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("CLI.md");
    fs::write(&file_path, content)?;

    println!("Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
