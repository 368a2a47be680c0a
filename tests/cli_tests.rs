//! Command-line tests for the addr-match binary.
//!
//! Fixture tables and job files are written to temporary directories so each
//! test runs the binary end to end against real files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const DATASET1: &str = "\
id,address1,address2,city,zip_code,name
y1,100 Main Street,,Irvine,90210,Acme Cafe
y2,5 Elm Ave,Suite 3,Irvine,92618,Zed Books
";

const DATASET2: &str = "\
ACCT_ID,ADDRESS,CITY,POSTAL,CUST_NAME
a1,100 Main St Ste 4,Irvine,90210-1111,ACME CAFE
a2,100 Main St Ste 9,Irvine,90210,Beta Shop
a3,77 Oak Blvd,Irvine,11111,Nobody
";

const JOB: &str = r#"
[dataset1]
file = "dataset1.csv"
keep_columns = ["id"]
address_columns = ["address1", "address2", "city", "zip_code", "name"]
address_roles = ["address1", "address2", "city", "zip", "name"]

[dataset2]
file = "dataset2.csv"
keep_columns = ["ACCT_ID"]
address_columns = ["CITY", "ADDRESS", "POSTAL", "CUST_NAME"]
address_roles = ["city", "address", "zip", "name"]

[match]
keep = "2"
hard_keys = ["zip", "streetName", "streetNumber"]
soft_keys = ["unitNumber", "name"]
check_name = true
jaro_threshold = 0.9

[output]
file = "matched.csv"
"#;

fn addr_match() -> Command {
    Command::cargo_bin("addr-match").unwrap()
}

fn write_job(dir: &Path) {
    std::fs::write(dir.join("dataset1.csv"), DATASET1).unwrap();
    std::fs::write(dir.join("dataset2.csv"), DATASET2).unwrap();
    std::fs::write(dir.join("job.toml"), JOB).unwrap();
}

#[test]
fn test_parse_street_line() {
    addr_match()
        .args(["parse", "123 N Main Street", "--mode", "street"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed 3 fields (street only)"))
        .stdout(predicate::str::contains("streetName     MAIN"))
        .stdout(predicate::str::contains("streetType     ST"));
}

#[test]
fn test_parse_full_address_line() {
    addr_match()
        .args(["parse", "500 Main St Ste 2", "--mode", "both"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed 5 fields (full address)"))
        .stdout(predicate::str::contains("unitNumber     2"));
}

#[test]
fn test_parse_json_output() {
    addr_match()
        .args(["--format", "json", "parse", "Suite 200", "--mode", "unit"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""unitType": "STE""#))
        .stdout(predicate::str::contains(r#""field_count": 2"#));
}

#[test]
fn test_parse_unhinted_line_without_markers() {
    addr_match()
        .args(["parse", "Acme Cafe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No street or unit components found"));
}

#[test]
fn test_dictionary_lookup() {
    addr_match()
        .args(["dictionary", "--lookup", "Boulevard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Boulevard -> BLVD"))
        .stdout(predicate::str::contains("street type"));
}

#[test]
fn test_dictionary_tsv_listing() {
    addr_match()
        .args(["-f", "tsv", "dictionary", "--kind", "unit"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("kind\tlong\tmedium\tabbrev"))
        .stdout(predicate::str::contains("unit\tSUITE\t\tSTE"))
        .stdout(predicate::str::contains("street\t").not());
}

#[test]
fn test_custom_tables_require_both_files() {
    let dir = TempDir::new().unwrap();
    let street = dir.path().join("street.csv");
    std::fs::write(&street, "long,medium,abbrev\nSTREET,STRT,ST\n").unwrap();

    addr_match()
        .args(["dictionary", "--street-suffixes"])
        .arg(&street)
        .assert()
        .failure();
}

#[test]
fn test_custom_tables_are_used() {
    let dir = TempDir::new().unwrap();
    let street = dir.path().join("street.csv");
    let unit = dir.path().join("unit.csv");
    std::fs::write(&street, "long,medium,abbrev\nCALLE,CALL,CL\n").unwrap();
    std::fs::write(&unit, "long,abbrev\nPISO,PS\n").unwrap();

    addr_match()
        .args(["parse", "12 Calle Mayor Piso 3", "--mode", "both"])
        .arg("--street-suffixes")
        .arg(&street)
        .arg("--unit-designators")
        .arg(&unit)
        .assert()
        .success()
        .stdout(predicate::str::contains("streetType     CL"))
        .stdout(predicate::str::contains("unitType       PS"));
}

#[test]
fn test_malformed_custom_table_fails() {
    let dir = TempDir::new().unwrap();
    let street = dir.path().join("street.csv");
    let unit = dir.path().join("unit.csv");
    std::fs::write(&street, "long,abbrev\nSTREET,ST\n").unwrap();
    std::fs::write(&unit, "long,abbrev\nSUITE,STE\n").unwrap();

    addr_match()
        .args(["dictionary", "--street-suffixes"])
        .arg(&street)
        .arg("--unit-designators")
        .arg(&unit)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing column 'medium'"));
}

#[test]
fn test_normalize_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset1.csv");
    std::fs::write(&input, DATASET1).unwrap();

    addr_match()
        .arg("normalize")
        .arg(&input)
        .args([
            "--columns",
            "address1,address2,city,zip_code,name",
            "--roles",
            "address1,address2,city,zip,name",
            "--keep",
            "id",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "streetNumber,streetName,streetType,unitType,unitNumber,city,zip,name,id\n",
        ))
        .stdout(predicate::str::contains("100,MAIN,ST,,,IRVINE,90210,ACME CAFE,y1"))
        .stdout(predicate::str::contains("5,ELM,AVE,STE,3,IRVINE,92618,ZED BOOKS,y2"));
}

#[test]
fn test_normalize_to_tsv_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset2.csv");
    let output = dir.path().join("normalized.tsv");
    std::fs::write(&input, DATASET2).unwrap();

    addr_match()
        .arg("normalize")
        .arg(&input)
        .args(["--columns", "ADDRESS,POSTAL", "--roles", "address,zip"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Normalization Summary"))
        .stdout(predicate::str::contains("normalized"));

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("streetNumber\tstreetName\t"));
    assert!(written.contains("77\tOAK\tBLVD\t\t\t11111"));
}

#[test]
fn test_normalize_rejects_unknown_role() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset1.csv");
    std::fs::write(&input, DATASET1).unwrap();

    addr_match()
        .arg("normalize")
        .arg(&input)
        .args(["--columns", "address1", "--roles", "street"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown address role 'street'"));
}

#[test]
fn test_normalize_rejects_missing_column() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset1.csv");
    std::fs::write(&input, DATASET1).unwrap();

    addr_match()
        .arg("normalize")
        .arg(&input)
        .args(["--columns", "ADDRESS", "--roles", "address"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no column 'ADDRESS'"));
}

#[test]
fn test_match_job_writes_output() {
    let dir = TempDir::new().unwrap();
    write_job(dir.path());

    addr_match()
        .arg("match")
        .arg(dir.path().join("job.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Match Summary"))
        .stdout(predicate::str::contains("ambiguous_groups"));

    let written = std::fs::read_to_string(dir.path().join("matched.csv")).unwrap();
    let mut lines = written.lines();
    assert_eq!(
        lines.next().unwrap(),
        "streetNumber,streetName,streetType_x,unitType_x,unitNumber_x,city_x,zip,name_x,id,\
         streetType_y,unitType_y,unitNumber_y,city_y,name_y,ACCT_ID,_merge,match,check"
    );
    assert_eq!(
        lines.next().unwrap(),
        "100,MAIN,ST,,,IRVINE,90210,ACME CAFE,y1,ST,STE,4,IRVINE,ACME CAFE,a1,both,1,1"
    );
    assert!(lines.next().is_none());
}

#[test]
fn test_match_json_report() {
    let dir = TempDir::new().unwrap();
    write_job(dir.path());
    let output = dir.path().join("out.csv");

    addr_match()
        .args(["--format", "json", "match"])
        .arg(dir.path().join("job.toml"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""run_at""#))
        .stdout(predicate::str::contains(r#""matched": 1"#))
        .stdout(predicate::str::contains(r#""ACCT_ID": "a1""#));

    assert!(output.exists());
}

#[test]
fn test_match_overrides() {
    let dir = TempDir::new().unwrap();
    write_job(dir.path());

    // Units disagree across the whole group, so only a name can promote a pair;
    // at the default threshold no name ever matches
    addr_match()
        .args(["--format", "json", "match"])
        .arg(dir.path().join("job.toml"))
        .args(["--jaro-threshold", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""matched": 0"#));

    addr_match()
        .arg("match")
        .arg(dir.path().join("job.toml"))
        .args(["--jaro-threshold", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Jaro threshold"));
}

#[test]
fn test_match_missing_input_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("job.toml"), JOB).unwrap();

    addr_match()
        .arg("match")
        .arg(dir.path().join("job.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("dataset1.csv"));
}
