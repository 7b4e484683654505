//! Tests for once and root.

use super::parse;
use crate::cli::{CliCommand, EligibilityArg};

#[test]
fn cli_parse_once() {
    match parse(&["dlmon", "once"]) {
        CliCommand::Once {
            root,
            eligibility,
            json,
        } => {
            assert!(root.is_none());
            assert!(eligibility.is_none());
            assert!(!json);
        }
        _ => panic!("expected Once"),
    }
}

#[test]
fn cli_parse_once_json_either_mode() {
    match parse(&[
        "dlmon",
        "once",
        "--json",
        "--eligibility",
        "non-empty-or-manifest",
    ]) {
        CliCommand::Once {
            eligibility, json, ..
        } => {
            assert!(json);
            assert_eq!(eligibility, Some(EligibilityArg::NonEmptyOrManifest));
        }
        _ => panic!("expected Once with flags"),
    }
}

#[test]
fn cli_parse_root() {
    match parse(&["dlmon", "root", "--root", "/tmp"]) {
        CliCommand::Root { root } => {
            assert_eq!(root.as_deref(), Some(std::path::Path::new("/tmp")));
        }
        _ => panic!("expected Root"),
    }
}
