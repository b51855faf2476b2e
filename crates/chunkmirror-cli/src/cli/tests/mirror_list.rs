//! Tests for the mirror-list subcommand.

use super::parse;
use crate::cli::CliCommand;
use std::path::PathBuf;

#[test]
fn cli_parse_mirror_list() {
    match parse(&["chunkmirror", "mirror-list", "images.txt"]) {
        CliCommand::MirrorList {
            list,
            out,
            user_agent,
        } => {
            assert_eq!(list, PathBuf::from("images.txt"));
            assert_eq!(out, PathBuf::from("images_out"));
            assert!(user_agent.is_none());
        }
        _ => panic!("expected MirrorList"),
    }
}

#[test]
fn cli_parse_mirror_list_out() {
    match parse(&["chunkmirror", "mirror-list", "images.txt", "--out", "imgs"]) {
        CliCommand::MirrorList { out, .. } => assert_eq!(out, PathBuf::from("imgs")),
        _ => panic!("expected MirrorList with --out"),
    }
}
