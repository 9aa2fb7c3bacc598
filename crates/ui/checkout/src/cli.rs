use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "checkout", version, about = "Donation form for Assembleia de Deus - Foz do Iguaçu")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

impl Cli {
    pub fn command(&self) -> Cmd {
        self.cmd.clone().unwrap_or_default()
    }
}

#[derive(Subcommand, Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// Fill in the donation form interactively
    #[default]
    Run,
    /// Print the federative units known to the geography service
    Regions,
    /// Print the municipalities of one federative unit
    Divisions {
        /// Two-letter code, e.g. PR
        uf: String,
    },
    /// Validate a JSON file of form values without opening the form
    Validate {
        /// Flat (`{"user.name": ".."}`) or nested (`{"user": {"name": ".."}}`) values
        values: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_is_the_default() {
        let cli = Cli::try_parse_from(["checkout"]).unwrap();
        assert_eq!(cli.command(), Cmd::Run);
    }

    #[test]
    fn divisions_takes_a_uf() {
        let cli = Cli::try_parse_from(["checkout", "divisions", "PR"]).unwrap();
        assert_eq!(cli.command(), Cmd::Divisions { uf: "PR".into() });
    }

    #[test]
    fn validate_takes_a_path() {
        let cli = Cli::try_parse_from(["checkout", "validate", "values.json"]).unwrap();
        assert_eq!(
            cli.command(),
            Cmd::Validate {
                values: PathBuf::from("values.json")
            }
        );
    }
}
