// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command line arguments.

use crate::config::CONFIG_ENV;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about)]
pub struct Cli {
    /// Settings file (YAML or JSON); defaults are used when omitted
    #[arg(env = CONFIG_ENV)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_positional() {
        let cli = Cli::try_parse_from(["moodjar", "settings.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("settings.yaml")));
    }

    #[test]
    fn test_help_is_not_taken_as_a_path() {
        let err = Cli::try_parse_from(["moodjar", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = Cli::try_parse_from(["moodjar", "--colour", "red"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
