use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["alkoteka-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_targets_command() {
    let cli = Cli::try_parse_from(["alkoteka-cli", "targets"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Targets)));
}

#[test]
fn crawl_defaults() {
    let cli = Cli::try_parse_from(["alkoteka-cli", "crawl"]).expect("expected valid cli args");
    match cli.command {
        Some(Commands::Crawl(args)) => {
            assert_eq!(args.target, "products_by_category");
            assert!(args.city.is_none());
            assert!(args.links.is_none());
            assert!(args.output.is_none());
            assert!(!args.strict);
        }
        other => panic!("expected crawl command, got {other:?}"),
    }
}

#[test]
fn crawl_with_all_options() {
    let cli = Cli::try_parse_from([
        "alkoteka-cli",
        "crawl",
        "--target",
        "other",
        "--city",
        "Москва",
        "--links",
        "seeds.txt",
        "-o",
        "out.jsonl",
        "--strict",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Crawl(args)) => {
            assert_eq!(args.target, "other");
            assert_eq!(args.city.as_deref(), Some("Москва"));
            assert_eq!(args.links, Some(PathBuf::from("seeds.txt")));
            assert_eq!(args.output, Some(PathBuf::from("out.jsonl")));
            assert!(args.strict);
        }
        other => panic!("expected crawl command, got {other:?}"),
    }
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(Cli::try_parse_from(["alkoteka-cli", "crawl", "--pages", "3"]).is_err());
}
