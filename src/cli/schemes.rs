use clap::Args;

use crate::cli::{ConfigArgs, OutputFormat};
use crate::core::scheme::Scheme;

#[derive(Args)]
pub struct SchemesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute schemes subcommand
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SchemesArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let config = args.config.load()?;

    match format {
        OutputFormat::Text => print!("{}", render_text(&config.schemes)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config.schemes)?),
        OutputFormat::Tsv | OutputFormat::Profiles => {
            println!("id\tdisplay_name\tloci\thits_suffix\tprofiles");
            for s in &config.schemes {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    s.id,
                    s.display_name,
                    s.loci.join(","),
                    s.hits_suffix,
                    s.profiles.display()
                );
            }
        }
    }
    Ok(())
}

fn render_text(schemes: &[Scheme]) -> String {
    let mut out = String::new();
    for s in schemes {
        out.push_str(&format!(
            "{} ({}): {} loci\n",
            s.display_name,
            s.id,
            s.locus_count()
        ));
        out.push_str(&format!("  Loci:     {}\n", s.loci.join(", ")));
        out.push_str(&format!("  Hits:     <sample>.{}\n", s.hits_suffix));
        out.push_str(&format!("  Profiles: {}\n", s.profiles.display()));
    }
    out
}
