// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestEnv {
    dir: TempDir,
    config: PathBuf,
}

impl TestEnv {
    fn new(server: &MockServer) -> Self {
        Self::with_base(&server.uri())
    }

    fn with_base(base: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let config = dir.path().join("config.toml");
        fs::write(
            &config,
            format!(
                "[http]\nsales_endpoint = \"{0}/sales/v1\"\nfinance_endpoint = \"{0}/finance/v1\"\n",
                base
            ),
        )
        .expect("write config");
        Self { dir, config }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("reporter").expect("binary built");
        cmd.env_remove("REPORTER_USERID")
            .env_remove("RUST_LOG")
            .arg("--no-color")
            .arg("-c")
            .arg(&self.config)
            .arg("-o")
            .arg(self.dir.path());
        cmd
    }
}

// The binary blocks, so it runs off the runtime that drives the mock server.
async fn run(mut cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .expect("command thread")
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn help_lists_report_commands() {
    Command::cargo_bin("reporter")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("getFinancialReport"))
        .stdout(predicate::str::contains("getSpecificDemographicsReport"));
}

#[test]
fn secret_flags_are_mutually_exclusive() {
    Command::cargo_bin("reporter")
        .unwrap()
        .args(["-T", "token", "-P", "password", "getVendors"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_secret_fails_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    let mut cmd = env.cmd();
    cmd.args(["getStatus", "Sales"]);

    run(cmd)
        .await
        .code(2)
        .stderr(predicate::str::contains("one of -t/-T/-p/-P"));
}

#[tokio::test(flavor = "multi_thread")]
async fn financial_report_without_account_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    let mut cmd = env.cmd();
    cmd.args(["-T", "token", "getFinancialReport", "12345", "US", "2023", "6"]);

    run(cmd).await.code(2).stderr(predicate::str::contains(
        "Argument -a/--account is needed for command 'getFinancialReport'",
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn monthly_report_with_daily_date_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    let mut cmd = env.cmd();
    cmd.args(["-T", "token", "getSalesReport", "85012345", "Monthly", "20240401"]);

    run(cmd).await.code(2).stderr(predicate::str::contains(
        "Date must be specified as YYYYMM for monthly reports",
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn vendor_list_is_printed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sales/v1"))
        .and(body_string_contains("Sales.getVendors"))
        .and(body_string_contains("\"account\":\"42\""))
        .respond_with(ResponseTemplate::new(200).set_body_string("85012345\n85067890"))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    let mut cmd = env.cmd();
    cmd.args(["-T", "token", "-a", "42", "getVendors"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("85012345\n85067890"));
}

#[tokio::test(flavor = "multi_thread")]
async fn sales_report_is_written_inflated() {
    let server = MockServer::start().await;
    let report = b"Provider\tSKU\tUnits\nAPPLE\tcom.example.app\t3\n";
    Mock::given(method("POST"))
        .and(path("/sales/v1"))
        .and(body_string_contains("Sales.getReport"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("filename", "S_D_85012345_20240401.txt.gz")
                .insert_header(
                    "downloadmsg",
                    "Your report S_D_85012345_20240401.txt.gz has been downloaded",
                )
                .set_body_raw(gzip(report), "application/a-gzip"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    let mut cmd = env.cmd();
    cmd.args(["-T", "token", "getSalesReport", "85012345", "Daily", "20240401"]);

    run(cmd).await.success().stdout(predicate::str::contains(
        "Your report S_D_85012345_20240401.txt has been downloaded",
    ));

    let written = fs::read(env.dir.path().join("S_D_85012345_20240401.txt")).unwrap();
    assert_eq!(written, report.to_vec());
}

#[tokio::test(flavor = "multi_thread")]
async fn service_error_message_is_shown_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/finance/v1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    let mut cmd = env.cmd();
    cmd.args(["-T", "token", "getStatus", "Finance"]);

    run(cmd)
        .await
        .code(1)
        .stderr(predicate::str::contains("Invalid credentials"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unexplained_status_is_reported_generically() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal details"))
        .mount(&server)
        .await;

    let env = TestEnv::new(&server);
    let mut cmd = env.cmd();
    cmd.args(["-T", "token", "getStatus", "Sales"]);

    run(cmd)
        .await
        .code(1)
        .stderr(predicate::str::contains("HTTP Error 500"))
        .stderr(predicate::str::contains("internal details").not());
}

#[test]
fn unreachable_service_suggests_checking_the_network() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("bind local port");
    let env = TestEnv::with_base(&format!("http://{}", addr));
    let mut cmd = env.cmd();
    cmd.args(["-T", "token", "getStatus", "Sales"]);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Network error"))
        .stderr(predicate::str::contains("proxy setting"));
}
