use drugcounter::{run, Error, RunConfig};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

const LEDGER: &str = "\
id,prescriber_last_name,prescriber_first_name,drug_name,drug_cost
1000000001,Smith,James,AMBIEN,100
1000000002,Garcia,Maria,AMBIEN,200
1000000003,Johnson,James,CHLORPROMAZINE,1000
1000000004,Rodriguez,Maria,CHLORPROMAZINE,2000
1000000005,Smith,David,BENZTROPINE MESYLATE,1500
";

fn write_ledger(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("itcont.txt");
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path
}

fn config_in(dir: &Path, input: &Path) -> RunConfig {
    let mut config = RunConfig::new(input, dir.join("top_cost_drug.txt"));
    config.log_path = dir.join("log.txt");
    config
}

#[test]
fn writes_report_and_audit_log() {
    let tmp = tempdir().unwrap();
    let input = write_ledger(tmp.path(), LEDGER);
    let config = config_in(tmp.path(), &input);

    let summary = run(&config).unwrap();
    assert_eq!(summary.written, 3);

    let report = fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(
        report,
        "drug_name,num_prescriber,total_cost\n\
         CHLORPROMAZINE,2,3000.0\n\
         BENZTROPINE MESYLATE,1,1500.0\n\
         AMBIEN,2,300.0\n"
    );

    let log = fs::read_to_string(&config.log_path).unwrap();
    let last = log.lines().last().unwrap();
    assert_eq!(last.split('\t').nth(1), Some("NORMAL"));
    assert_eq!(last.split('\t').nth(2), Some("Program finished successfully."));
}

#[test]
fn names_with_embedded_commas_count_as_one_prescriber() {
    let tmp = tempdir().unwrap();
    let input = write_ledger(
        tmp.path(),
        "header\n1,Smith,John,ASPIRIN,10.00\n2,Doe,Jane,ASPIRIN,15.00\n3,Smith,John,ASPIRIN,5\n",
    );
    let mut config = config_in(tmp.path(), &input);
    config.logging = false;

    run(&config).unwrap();
    let report = fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(report, "drug_name,num_prescriber,total_cost\nASPIRIN,2,30.0\n");
}

#[test]
fn skipped_lines_are_logged_with_number_and_text() {
    let tmp = tempdir().unwrap();
    let input = write_ledger(
        tmp.path(),
        "header\n1,Smith,John,ASPIRIN,10.00\nid,Doe,Jane,ASPIRIN,15.00\n3,Roe,Rick,ASPIRIN,n/a\n",
    );
    let config = config_in(tmp.path(), &input);

    let summary = run(&config).unwrap();
    assert_eq!(summary.rejected, 2);

    let report = fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(report, "drug_name,num_prescriber,total_cost\nASPIRIN,1,10.0\n");

    let log = fs::read_to_string(&config.log_path).unwrap();
    let warnings: Vec<Vec<&str>> = log
        .lines()
        .map(|l| l.split('\t').collect::<Vec<_>>())
        .filter(|cols| cols[1] == "WARNING")
        .collect();
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0][2..], ["Missing record number.", "2", "id,Doe,Jane,ASPIRIN,15.00"]);
    assert_eq!(warnings[1][2..], ["Missing drug price.", "3", "3,Roe,Rick,ASPIRIN,n/a"]);
}

#[test]
fn top_k_bounds_report_rows() {
    let tmp = tempdir().unwrap();
    let input = write_ledger(tmp.path(), LEDGER);
    let mut config = config_in(tmp.path(), &input);
    config.top_k = Some(2);
    config.logging = false;

    run(&config).unwrap();
    let report = fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(report.lines().count(), 3);
    assert!(report.ends_with("BENZTROPINE MESYLATE,1,1500.0\n"));
}

#[test]
fn logging_disabled_creates_no_log_file() {
    let tmp = tempdir().unwrap();
    let input = write_ledger(tmp.path(), LEDGER);
    let mut config = config_in(tmp.path(), &input);
    config.logging = false;

    run(&config).unwrap();
    assert!(config.output_path.exists());
    assert!(!config.log_path.exists());
}

#[test]
fn missing_input_fails_before_opening_anything() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path(), &tmp.path().join("absent.txt"));

    let err = run(&config).unwrap_err();
    assert!(matches!(err, Error::InputNotFound(_)));
    assert!(!config.output_path.exists());
    assert!(!config.log_path.exists());
}

#[test]
fn unwritable_report_logs_terminal_error() {
    let tmp = tempdir().unwrap();
    let input = write_ledger(tmp.path(), LEDGER);
    let mut config = config_in(tmp.path(), &input);
    config.output_path = tmp.path().join("no_such_dir").join("out.txt");

    let err = run(&config).unwrap_err();
    assert!(matches!(err, Error::Open { .. }));

    let log = fs::read_to_string(&config.log_path).unwrap();
    let last = log.lines().last().unwrap();
    assert_eq!(last.split('\t').nth(1), Some("ERROR"));
    assert_eq!(last.split('\t').nth(2), Some("Program was terminated unexpectedly."));
}

#[test]
fn latin1_name_does_not_end_the_run() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("latin1.txt");
    fs::write(
        &input,
        b"header\n1,Smith,John,ASPIRIN,10\n2,M\xfcller,Ann,ASPIRIN,5\n3,Doe,Jane,IBU,7\n",
    )
    .unwrap();
    let config = config_in(tmp.path(), &input);

    let summary = run(&config).unwrap();
    assert_eq!(summary.accepted, 3);

    let report = fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(report, "drug_name,num_prescriber,total_cost\nASPIRIN,2,15.0\nIBU,1,7.0\n");

    let log = fs::read_to_string(&config.log_path).unwrap();
    assert!(!log.contains("\tERROR\t"));
}
