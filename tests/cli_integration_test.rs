//! CLI integration tests.
//!
//! Tests cover:
//! - Config loading and validation from INI files on disk
//! - Bar resolution from `--csv` and from `--code` + `[data] csv_dir`
//! - Review store selection
//! - Command dispatch exit codes

mod common;

use clap::Parser;
use common::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tplan::cli::{self, BarSource, Cli};
use tplan::domain::error::TplanError;
use tplan::domain::review::{self, ReviewKey};
use tplan::ports::review_port::ReviewStore;

fn exit_debug(code: ExitCode) -> String {
    format!("{code:?}")
}

fn assert_exit(code: ExitCode, expected: u8) {
    assert_eq!(exit_debug(code), exit_debug(ExitCode::from(expected)));
}

fn csv_source(path: &std::path::Path) -> BarSource {
    BarSource {
        csv: Some(path.to_path_buf()),
        code: None,
        config: None,
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn valid_ini_loads() {
        let ini = write_temp_file(
            "[plan]\nmax_trades = 3\n[review]\nbackend = memory\n[watchlist]\ncodes = 600519:Moutai\n",
            ".ini",
        );
        let config = cli::load_config(ini.path()).unwrap();
        assert_eq!(tplan::domain::config_validation::max_trades(&config), 3);
    }

    #[test]
    fn invalid_ini_is_rejected() {
        let ini = write_temp_file("[plan]\nmax_trades = 99\n", ".ini");
        let err = cli::load_config(ini.path()).unwrap_err();
        assert!(matches!(err, TplanError::ConfigInvalid { .. }));
    }

    #[test]
    fn missing_file_is_config_parse_error() {
        let err = cli::load_config(&PathBuf::from("/nonexistent/tplan.ini")).unwrap_err();
        assert!(matches!(err, TplanError::ConfigParse { .. }));
    }
}

mod bar_resolution {
    use super::*;

    #[test]
    fn csv_path_gives_code_from_stem() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("600519.csv");
        std::fs::write(&path, REFERENCE_CSV).unwrap();

        let (code, bar) = cli::resolve_bar(&csv_source(&path), None).unwrap();
        assert_eq!(code, "600519");
        assert_eq!(bar.close, 11.0);
        assert_eq!(bar.date, date(2024, 3, 1));
    }

    #[test]
    fn code_uses_csv_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("ABC.csv"), REFERENCE_CSV).unwrap();
        let config = MockConfigPort::new().with("data", "csv_dir", &dir.path().to_string_lossy());

        let source = BarSource {
            csv: None,
            code: Some("abc".to_string()),
            config: None,
        };
        let (code, bar) = cli::resolve_bar(&source, Some(&config)).unwrap();
        assert_eq!(code, "ABC");
        assert_eq!(bar.high, 12.0);
    }

    #[test]
    fn code_without_csv_dir_is_config_missing() {
        let source = BarSource {
            csv: None,
            code: Some("ABC".to_string()),
            config: None,
        };
        let err = cli::resolve_bar(&source, Some(&MockConfigPort::new())).unwrap_err();
        assert!(matches!(err, TplanError::ConfigMissing { key, .. } if key == "csv_dir"));
    }

    #[test]
    fn missing_csv_file_is_io_error() {
        let err = cli::resolve_bar(&csv_source(&PathBuf::from("/nonexistent/x.csv")), None)
            .unwrap_err();
        assert!(matches!(err, TplanError::Io(_)));
    }
}

mod review_store {
    use super::*;

    #[test]
    fn memory_backend() {
        let config = MockConfigPort::new().with("review", "backend", "memory");
        let store = cli::open_review_store(&config).unwrap();
        let key = ReviewKey::new("ABC", date(2024, 3, 4));
        assert!(store.get(&key).unwrap().is_none());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_backend_persists_between_opens() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = dir.path().join("review.db");
        let config = MockConfigPort::new()
            .with("review", "backend", "sqlite")
            .with("sqlite", "path", &db.to_string_lossy());
        let key = ReviewKey::new("ABC", date(2024, 3, 4));

        {
            let store = cli::open_review_store(&config).unwrap();
            review::apply(store.as_ref(), &key, review::ReviewAction::RecordTrade).unwrap();
        }

        let store = cli::open_review_store(&config).unwrap();
        assert_eq!(review::load_or_default(store.as_ref(), &key).unwrap().t_count, 1);
    }
}

mod dispatch {
    use super::*;

    fn run_args(args: &[&str]) -> ExitCode {
        cli::run(Cli::try_parse_from(args).unwrap())
    }

    fn reference_csv() -> tempfile::NamedTempFile {
        write_temp_file(REFERENCE_CSV, ".csv")
    }

    #[test]
    fn levels_succeeds() {
        let csv = reference_csv();
        let path = csv.path().to_string_lossy().into_owned();
        assert_exit(run_args(&["tplan", "levels", "--csv", &path]), 0);
    }

    #[test]
    fn plan_writes_card() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv = dir.path().join("600519.csv");
        std::fs::write(&csv, REFERENCE_CSV).unwrap();
        let out = dir.path().join("card.txt");
        let path = csv.to_string_lossy().into_owned();
        let out_str = out.to_string_lossy().into_owned();

        assert_exit(run_args(&["tplan", "plan", "--csv", &path, "-o", &out_str]), 0);
        let card = std::fs::read_to_string(&out).unwrap();
        assert!(card.contains("Security: 600519"));
        assert!(card.contains("Pullback buy zone: 10.6 - 11"));
    }

    #[test]
    fn signal_exit_codes_follow_light() {
        let csv = reference_csv();
        let path = csv.path().to_string_lossy().into_owned();

        assert_exit(run_args(&["tplan", "signal", "--csv", &path, "--price", "11.2"]), 10);
        assert_exit(run_args(&["tplan", "signal", "--csv", &path, "--price", "11.05"]), 11);
        assert_exit(run_args(&["tplan", "signal", "--csv", &path, "--price", ""]), 12);
        assert_exit(
            run_args(&["tplan", "signal", "--csv", &path, "--price", "11.2", "--trades", "2"]),
            11,
        );
    }

    #[test]
    fn bad_csv_maps_to_price_exit_code() {
        let csv = write_temp_file("date,high,low,close\n2024-03-01,10,12,11\n", ".csv");
        let path = csv.path().to_string_lossy().into_owned();
        assert_exit(run_args(&["tplan", "levels", "--csv", &path]), 4);
    }

    #[test]
    fn memory_backend_rejects_review_writes() {
        let ini = write_temp_file("[plan]\nmax_trades = 2\n", ".ini");
        let path = ini.path().to_string_lossy().into_owned();
        assert_exit(run_args(&["tplan", "review", "-c", &path, "--code", "abc", "trade"]), 2);
        assert_exit(run_args(&["tplan", "review", "-c", &path, "--code", "abc", "show"]), 0);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn review_trades_persist_across_runs() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = dir.path().join("review.db");
        let ini = write_temp_file(&format!("[sqlite]\npath = {}\n", db.display()), ".ini");
        let path = ini.path().to_string_lossy().into_owned();
        let args: [&str; 9] = ["tplan", "review", "-c", &path, "--code", "abc", "--date", "2024-03-04", "trade"];

        assert_exit(run_args(&args), 0);
        assert_exit(run_args(&args), 0);

        let config = MockConfigPort::new().with("sqlite", "path", &db.to_string_lossy());
        let store = cli::open_review_store(&config).unwrap();
        let key = ReviewKey::new("ABC", date(2024, 3, 4));
        assert_eq!(review::load_or_default(store.as_ref(), &key).unwrap().t_count, 2);
    }

    #[test]
    fn flat_bar_signal_is_red() {
        let csv = write_temp_file("date,high,low,close\n2024-03-01,5,5,5\n", ".csv");
        let path = csv.path().to_string_lossy().into_owned();
        assert_exit(run_args(&["tplan", "signal", "--csv", &path, "--price", "5"]), 11);
    }

    #[test]
    fn signal_run_ignores_hold_bias() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("ABC.csv"), REFERENCE_CSV).unwrap();
        let ini = write_temp_file(
            &format!(
                "[plan]\nhold_bias = true\n[data]\ncsv_dir = {}\n",
                dir.path().display()
            ),
            ".ini",
        );
        let path = ini.path().to_string_lossy().into_owned();
        let run = |price: &str| {
            run_args(&["tplan", "signal", "-c", &path, "--code", "ABC", "--price", price, "--trades", "0"])
        };
        assert_exit(run("11.2"), 10);
        assert_exit(run("10.9"), 11);
    }

    #[test]
    fn watchlist_with_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("600519.csv"), REFERENCE_CSV).unwrap();
        let ini = write_temp_file(
            &format!(
                "[data]\ncsv_dir = {}\n[watchlist]\ncodes = 600519:Moutai,000001\n",
                dir.path().display()
            ),
            ".ini",
        );
        let path = ini.path().to_string_lossy().into_owned();
        assert_exit(run_args(&["tplan", "watchlist", "-c", &path]), 0);
    }

    #[test]
    fn watchlist_with_bad_entries_fails() {
        let ini = write_temp_file("[watchlist]\ncodes = A,A\n", ".ini");
        let path = ini.path().to_string_lossy().into_owned();
        assert_exit(run_args(&["tplan", "watchlist", "-c", &path]), 2);
    }
}
