use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("repo-facets").chain(args.iter().copied())).unwrap()
}

#[test]
fn list_command_parses() {
    let cli = parse(&["--token", "ghp_abc", "list"]);

    assert_eq!(cli.token, "ghp_abc");
    assert!(matches!(cli.command, Command::List));
}

#[test]
fn details_command_collects_names() {
    let cli = parse(&["--token", "t", "details", "alpha", "beta"]);

    match cli.command {
        Command::Details { names } => assert_eq!(names, vec!["alpha", "beta"]),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn details_requires_at_least_one_name() {
    let result = Cli::try_parse_from(["repo-facets", "--token", "t", "details"]);
    assert!(result.is_err());
}

#[test]
fn flags_map_onto_engine_config() {
    let cli = parse(&["--concurrency", "4", "--page-size", "25", "list"]);
    let engine = cli.engine_config();

    assert_eq!(engine.max_concurrent_jobs, 4);
    assert_eq!(engine.page_size, 25);
    assert_eq!(engine.ci_config_path, ".github/workflows");
}

#[test]
fn flags_map_onto_client_config() {
    let cli = parse(&[
        "--api-url",
        "https://ghe.example.com/api/v3",
        "--timeout-secs",
        "5",
        "list",
    ]);
    let client = cli.client_config();

    assert_eq!(client.api_url, "https://ghe.example.com/api/v3");
    assert_eq!(client.timeout, Duration::from_secs(5));
}

#[test]
fn zero_concurrency_is_rejected_by_validation() {
    let cli = parse(&["--concurrency", "0", "list"]);
    assert!(cli.engine_config().validate().is_err());
}

#[test]
fn page_size_above_github_cap_is_rejected_by_validation() {
    let cli = parse(&["--page-size", "200", "list"]);
    assert!(cli.engine_config().validate().is_err());

    let cli = parse(&["--page-size", "100", "list"]);
    assert!(cli.engine_config().validate().is_ok());
}

#[test]
fn log_format_accepts_json() {
    let cli = parse(&["--log-format", "json", "list"]);
    assert_eq!(cli.logging.log_format, LogFormat::Json);

    assert!(Cli::try_parse_from(["repo-facets", "--log-format", "xml", "list"]).is_err());
}
