use almoji_icon::icon_gen::{self, IconConfig, DEFAULT_OUTPUT};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "almoji-icon",
    about = "Generate the icon for the Almoji Alfred workflow"
)]
struct Args {
    /// Where to write the PNG icon.
    #[clap(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = IconConfig::new(args.output)?;
    icon_gen::generate_icon(&config)?;

    println!("Icon created successfully!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_write_to_the_fixed_path() {
        let args = Args::try_parse_from(["almoji-icon"]).expect("Failed to parse empty args");
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn output_flag_overrides_the_path() {
        let args = Args::try_parse_from(["almoji-icon", "-o", "/tmp/icon.png"])
            .expect("Failed to parse -o");
        assert_eq!(args.output, PathBuf::from("/tmp/icon.png"));
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(Args::try_parse_from(["almoji-icon", "--size", "512"]).is_err());
    }
}
