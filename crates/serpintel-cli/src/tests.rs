use super::*;

#[test]
fn parses_analyze_with_defaults() {
    let cli = Cli::try_parse_from(["serpintel", "analyze", "trail shoes"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Analyze {
            keyword,
            domain,
            compact,
        } => {
            assert_eq!(keyword, "trail shoes");
            assert!(domain.is_none());
            assert!(!compact);
        }
        Commands::Status { .. } => panic!("expected analyze"),
    }
}

#[test]
fn parses_analyze_with_domain_and_compact() {
    let cli = Cli::try_parse_from([
        "serpintel",
        "analyze",
        "trail shoes",
        "--domain",
        "example.com",
        "--compact",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Analyze {
            domain: Some(ref d),
            compact: true,
            ..
        } if d == "example.com"
    ));
}

#[test]
fn parses_status_command() {
    let cli = Cli::try_parse_from(["serpintel", "status"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Status { compact: false }));
}

#[test]
fn analyze_requires_keyword() {
    assert!(Cli::try_parse_from(["serpintel", "analyze"]).is_err());
}

#[test]
fn missing_command_is_rejected() {
    assert!(Cli::try_parse_from(["serpintel"]).is_err());
}
