//! CLI argument definitions using clap
//!
//! pagefix [OPTIONS] <PAGE_NUMBER> <RELATION> <SOURCE> <DESTINATION>

use clap::Parser;
use std::path::PathBuf;

use crate::recovery::{Mode, RecoveryRequest};
use crate::target::TargetRef;

/// Repair one corrupted page by copying it from a healthy replica
#[derive(Parser, Debug, Clone)]
#[command(name = "pagefix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Page number within the relation
    pub page_number: u64,

    /// Relation file path relative to the data directory, e.g. base/16384/16385
    pub relation: String,

    /// Data directory holding the good page: [user@host:]path
    pub source: TargetRef,

    /// Data directory holding the damaged page: [user@host:]path
    /// (with --dump, the file to extract the source page into)
    pub destination: TargetRef,

    /// Log every decoded header and every safety check
    #[arg(short, long)]
    pub verbose: bool,

    /// Evaluate every check but never write
    #[arg(short = 'n', long)]
    pub pretend: bool,

    /// Extract the source page into DESTINATION instead of replacing
    #[arg(short, long)]
    pub dump: bool,

    /// Command template for remote targets; {host} is replaced by the host
    #[arg(long, value_name = "TEMPLATE")]
    pub remote_shell: Option<String>,

    /// Path to a JSON configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append a JSON audit record of this run to PATH
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The recovery request these arguments describe
    pub fn request(&self) -> RecoveryRequest {
        RecoveryRequest {
            page_number: self.page_number,
            relation: self.relation.clone(),
            source: self.source.clone(),
            destination: self.destination.clone(),
            mode: if self.dump { Mode::Dump } else { Mode::Replace },
            pretend: self.pretend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from([
            "pagefix",
            "131073",
            "base/16384/16385",
            "postgres@replica:/var/lib/db",
            "/var/lib/db",
        ])
        .unwrap();

        let request = cli.request();
        assert_eq!(request.page_number, 131073);
        assert_eq!(request.relation, "base/16384/16385");
        assert_eq!(request.source.host.as_deref(), Some("postgres@replica"));
        assert!(request.destination.is_local());
        assert_eq!(request.mode, Mode::Replace);
        assert!(!request.pretend);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "pagefix",
            "-v",
            "-n",
            "--dump",
            "--remote-shell",
            "ssh -p 2222 {host}",
            "0",
            "rel",
            "/src",
            "/tmp/out.page",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.remote_shell.as_deref(), Some("ssh -p 2222 {host}"));
        let request = cli.request();
        assert_eq!(request.mode, Mode::Dump);
        assert!(request.pretend);
    }

    #[test]
    fn test_rejects_bad_page_number() {
        assert!(Cli::try_parse_from(["pagefix", "-1", "rel", "/a", "/b"]).is_err());
        assert!(Cli::try_parse_from(["pagefix", "x", "rel", "/a", "/b"]).is_err());
    }

    #[test]
    fn test_rejects_empty_target_path() {
        assert!(Cli::try_parse_from(["pagefix", "0", "rel", "host:", "/b"]).is_err());
    }
}
