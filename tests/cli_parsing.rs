use clap::Parser;
use freqprof::cli::{Cli, Commands};
use std::path::PathBuf;

#[test]
fn test_parse_search_defaults() {
    let cli = Cli::try_parse_from(["freqprof", "search"]).unwrap();
    assert!(!cli.json);

    match cli.command {
        Commands::Search(args) => {
            assert_eq!(args.low, None);
            assert_eq!(args.high, None);
            assert_eq!(args.step, None);
            assert_eq!(args.measurements, None);
            assert_eq!(args.application, None);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_search_overrides() {
    let cli = Cli::try_parse_from([
        "freqprof",
        "search",
        "--low",
        "500",
        "--high",
        "8000",
        "--step",
        "25",
        "-m",
        "5",
        "--application",
        "philosophers_dinner",
        "--json",
    ])
    .unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Search(args) => {
            assert_eq!(args.low, Some(500));
            assert_eq!(args.high, Some(8000));
            assert_eq!(args.step, Some(25));
            assert_eq!(args.measurements, Some(5));
            assert_eq!(args.application.as_deref(), Some("philosophers_dinner"));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_testbench() {
    let cli =
        Cli::try_parse_from(["freqprof", "testbench", "--runs", "20", "-o", "fail.txt"]).unwrap();

    match cli.command {
        Commands::Testbench(args) => {
            assert_eq!(args.runs, Some(20));
            assert_eq!(args.output, Some(PathBuf::from("fail.txt")));
            assert_eq!(args.application, None);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_validate_requires_file() {
    assert!(Cli::try_parse_from(["freqprof", "validate"]).is_err());

    let cli = Cli::try_parse_from(["freqprof", "--config", "bench.yaml", "validate", "img/ea_test.log"])
        .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("bench.yaml")));
    match cli.command {
        Commands::Validate(args) => assert_eq!(args.file, PathBuf::from("img/ea_test.log")),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_rejects_non_numeric_frequency() {
    assert!(Cli::try_parse_from(["freqprof", "search", "--high", "fast"]).is_err());
}
