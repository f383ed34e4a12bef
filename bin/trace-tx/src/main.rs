use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tx_tracer::{Config, TraceFetcher, ENDPOINT_ENV, OUTPUT_DIR_ENV};

#[derive(Debug, Parser)]
#[command(version, about = "Fetch a transaction's traces and its block timestamp")]
struct Opt {
    /// JSON config file, see `Config`
    #[clap(short, long)]
    cfg: Option<String>,
    /// JSON-RPC endpoint of a node serving `trace_transaction`
    #[clap(long, env = ENDPOINT_ENV)]
    endpoint: Option<String>,
    /// Where `<tx>_trace.json` files are written
    #[clap(long, env = OUTPUT_DIR_ENV)]
    output_dir: Option<PathBuf>,
    /// Also print each result to stdout
    #[clap(long, default_value = "false")]
    print: bool,
    #[clap(short, long, default_value = "false")]
    verbose: bool,
    #[clap(required = true)]
    tx: Vec<String>,
}

impl Opt {
    /// Flag or env first, then the config file, then defaults.
    fn config(&self) -> Result<Config, String> {
        let cfg = match &self.cfg {
            Some(path) => {
                Config::read_file(path).map_err(|err| format!("load config {}: {}", path, err))?
            }
            None => Config::default(),
        };
        Ok(cfg.with_overrides(self.endpoint.clone(), self.output_dir.clone()))
    }
}

/// True when every hash was fetched and written.
async fn run(opt: Opt) -> bool {
    let cfg = match opt.config() {
        Ok(cfg) => cfg,
        Err(err) => {
            log::error!("{}", err);
            return false;
        }
    };

    let fetcher = match TraceFetcher::new(&cfg) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            log::error!("invalid endpoint {}: {}", cfg.endpoint, err);
            return false;
        }
    };

    let mut stdout = std::io::stdout();
    let print = match opt.print {
        true => Some(&mut stdout as &mut dyn std::io::Write),
        false => None,
    };
    fetcher.fetch_all(&opt.tx, print).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let opt = Opt::parse();
    base::init_log_with(if opt.verbose { "debug" } else { "info" });
    if run(opt).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn parse(args: &[&str]) -> Opt {
        Opt::try_parse_from(std::iter::once("trace-tx").chain(args.iter().copied())).unwrap()
    }

    fn clear_env() {
        std::env::remove_var(ENDPOINT_ENV);
        std::env::remove_var(OUTPUT_DIR_ENV);
    }

    fn cfg_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", body).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_requires_a_hash() {
        clear_env();
        assert!(Opt::try_parse_from(["trace-tx"]).is_err());

        let opt = parse(&["0xabc", "0xdef"]);
        assert_eq!(opt.tx, vec!["0xabc".to_owned(), "0xdef".to_owned()]);
        assert!(!opt.print);
        assert_eq!(opt.config().unwrap(), Config::default());
    }

    #[test]
    #[serial]
    fn test_config_precedence() {
        clear_env();
        let file = cfg_file(r#"{"endpoint": "http://from-file:8545", "output_dir": "file-out"}"#);
        let path = file.path().to_str().unwrap();

        let cfg = parse(&["-c", path, "0xabc"]).config().unwrap();
        assert_eq!(cfg.endpoint, "http://from-file:8545");
        assert_eq!(cfg.output_dir, PathBuf::from("file-out"));

        std::env::set_var(ENDPOINT_ENV, "http://from-env:8545");
        let cfg = parse(&["-c", path, "0xabc"]).config().unwrap();
        assert_eq!(cfg.endpoint, "http://from-env:8545");
        assert_eq!(cfg.output_dir, PathBuf::from("file-out"));

        let cfg = parse(&["-c", path, "--endpoint", "http://from-flag:8545", "0xabc"])
            .config()
            .unwrap();
        assert_eq!(cfg.endpoint, "http://from-flag:8545");

        std::env::set_var(OUTPUT_DIR_ENV, "env-out");
        let cfg = parse(&["0xabc"]).config().unwrap();
        assert_eq!(cfg.endpoint, "http://from-env:8545");
        assert_eq!(cfg.output_dir, PathBuf::from("env-out"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_bad_config_file() {
        clear_env();
        let opt = parse(&["-c", "/nonexistent/trace-tx.json", "0xabc"]);
        assert!(opt.config().is_err());

        let file = cfg_file("not json");
        let opt = parse(&["-c", file.path().to_str().unwrap(), "0xabc"]);
        assert!(opt.config().is_err());
    }

    #[tokio::test]
    #[serial]
    async fn test_run_fails() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();

        let opt = parse(&["--endpoint", "http://127.0.0.1:1", "--output-dir", out, "0xabc"]);
        assert!(!run(opt).await);

        let opt = parse(&["--endpoint", "not a url", "0xabc"]);
        assert!(!run(opt).await);

        let opt = parse(&["-c", "/nonexistent/trace-tx.json", "0xabc"]);
        assert!(!run(opt).await);
    }
}
