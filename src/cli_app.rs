use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::command_logic::filters::list_filters;
use crate::command_logic::init::init_config;
use crate::command_logic::launches::list_launches;
use crate::config::{default_config_path, Config};
use crate::external_api::ApiError;

#[derive(Parser)]
#[command(
    name = "rpq",
    version,
    about = "CLI application for ReportPortal launch queries. rpq - ReportPortal Query",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Path to config file [default: ~/.config/rpq/config.json]
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
    /// Print the decoded page as JSON
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create config interactively
    Init,
    /// List launches of the project
    Launches(LaunchesArgs),
    /// Find saved filters by name
    Filters(FiltersArgs),
}

#[derive(Args, Debug, Default)]
pub struct LaunchesArgs {
    /// Use the filter saved on the server under this name
    #[arg(long, short = 'n', conflicts_with_all = ["query", "params"])]
    pub filter_name: Option<String>,
    /// Raw query string, e.g. "filter.eq.status=FAILED&page.sort=number,DESC"
    #[arg(long, short, conflicts_with = "params")]
    pub query: Option<String>,
    /// Query parameter as key=value, repeatable
    #[arg(long = "param", short, value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct FiltersArgs {
    /// Filter name
    #[arg(long, short, required = true)]
    pub name: String,
}

fn parse_key_val(value: &str) -> Result<(String, String), ApiError> {
    match value.split_once('=') {
        Some((key, val)) if !key.is_empty() => Ok((key.to_string(), val.to_string())),
        _ => Err(ApiError::Parse(format!("expected key=value, got '{value}'"))),
    }
}

impl Cli {
    fn config_path(&self) -> Result<PathBuf, ApiError> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => default_config_path(),
        }
    }
}

/// Run the parsed command, returning the text for stdout
pub async fn handle_command<R, W>(cli: Cli, stdin: R, prompt_output: W) -> Result<String, ApiError>
where
    R: std::io::BufRead,
    W: std::io::Write,
{
    let config_path = cli.config_path()?;
    match &cli.command {
        Commands::Init => init_config(&config_path, stdin, prompt_output),
        Commands::Launches(args) => {
            let report_portal_api = Config::get_config(&config_path)?.api_client()?;
            list_launches(args, &report_portal_api, cli.json).await
        }
        Commands::Filters(args) => {
            let report_portal_api = Config::get_config(&config_path)?.api_client()?;
            list_filters(&args.name, &report_portal_api, cli.json).await
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("-n")]
    #[case("--filter-name")]
    fn test_launches_filter_name(#[case] flag: String) {
        let args = Cli::parse_from(["rpq", "launches", &flag, "failed-only"]);
        match args.command {
            Commands::Launches(value) => {
                assert_eq!(value.filter_name.as_deref(), Some("failed-only"));
                assert!(value.query.is_none());
                assert!(value.params.is_empty());
            }
            _ => panic!("Ожидали команду launches"),
        }
    }

    #[test]
    fn test_launches_params() {
        let args = Cli::parse_from([
            "rpq", "launches", "-p", "filter.eq.status=FAILED", "--param", "page.sort=number,DESC", "--json",
        ]);
        assert!(args.json);
        match args.command {
            Commands::Launches(value) => assert_eq!(
                value.params,
                vec![
                    ("filter.eq.status".to_string(), "FAILED".to_string()),
                    ("page.sort".to_string(), "number,DESC".to_string()),
                ]
            ),
            _ => panic!("Ожидали команду launches"),
        }
    }

    #[rstest]
    #[case(&["rpq", "launches", "-n", "a", "-q", "filter.eq.name=b"])]
    #[case(&["rpq", "launches", "-n", "a", "-p", "k=v"])]
    #[case(&["rpq", "launches", "-q", "k=v", "-p", "k=v"])]
    #[case(&["rpq", "launches", "-p", "novalue"])]
    #[case(&["rpq", "filters"])]
    fn test_invalid_args(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let args = Cli::parse_from(["rpq", "filters", "--name", "x", "--config", "/tmp/rpq.json"]);
        assert_eq!(args.config_path().unwrap(), PathBuf::from("/tmp/rpq.json"));
    }

    #[rstest]
    #[case("a=b", ("a", "b"))]
    #[case("a=", ("a", ""))]
    #[case("filter.in.tags=x=y", ("filter.in.tags", "x=y"))]
    fn test_parse_key_val(#[case] value: &str, #[case] expected: (&str, &str)) {
        let (key, val) = parse_key_val(value).unwrap();
        assert_eq!((key.as_str(), val.as_str()), expected);
    }

    #[rstest]
    #[case("")]
    #[case("=b")]
    #[case("ab")]
    fn test_parse_key_val_error(#[case] value: &str) {
        assert!(matches!(parse_key_val(value), Err(ApiError::Parse(_))));
    }

    #[tokio::test]
    async fn test_handle_command_missing_config() {
        let path = std::env::temp_dir().join(format!("rpq_missing_{}.json", uuid::Uuid::new_v4()));
        let cli = Cli::parse_from(["rpq", "launches", "--config", path.to_str().unwrap()]);
        let result = handle_command(cli, std::io::empty(), std::io::sink()).await;
        assert!(matches!(result, Err(ApiError::ConfigNotFound(_))));
    }

    fn rpq() -> assert_cmd::Command {
        assert_cmd::Command::cargo_bin("rpq").unwrap()
    }

    #[rstest]
    #[case("-h")]
    #[case("--help")]
    fn test_help_output(#[case] flag: String) {
        rpq()
            .arg(flag)
            .assert()
            .success()
            .stdout(predicates::str::contains("Usage: rpq [OPTIONS] <COMMAND>"))
            .stdout(predicates::str::contains("launches"))
            .stdout(predicates::str::contains("filters"))
            .stdout(predicates::str::contains("init"));
    }

    #[test]
    fn test_launches_help_output() {
        rpq()
            .args(["launches", "--help"])
            .assert()
            .success()
            .stdout(predicates::str::contains("--filter-name <FILTER_NAME>"))
            .stdout(predicates::str::contains("--query <QUERY>"))
            .stdout(predicates::str::contains("--param <PARAMS>"));
    }

    #[test]
    fn test_filters_missing_name() {
        rpq()
            .arg("filters")
            .assert()
            .failure()
            .stderr(predicates::str::contains("required"));
    }

    #[test]
    fn test_conflicting_launch_args() {
        rpq()
            .args(["launches", "--filter-name", "a", "--query", "page.page=1"])
            .assert()
            .failure()
            .stderr(predicates::str::contains("cannot be used with"));
    }

    #[test]
    fn test_binary_missing_config() {
        rpq()
            .args(["launches", "--config", "/nonexistent/rpq/config.json"])
            .assert()
            .failure()
            .stderr(predicates::str::contains("Config not found at path: </nonexistent/rpq/config.json>"));
    }

    #[test]
    fn test_init_rejects_invalid_url() {
        rpq()
            .args(["init", "--config", "/nonexistent/rpq/config.json"])
            .write_stdin("not a url\n")
            .assert()
            .failure()
            .stderr(predicates::str::contains("The string entered must be a URL"));
    }
}
