//! Test support utilities for PGPT CLI behavioural coverage.
//!
//! Supplies the fake server harness, captured CLI output, and golden fixture
//! loading so step definitions and unit tests remain focused on their
//! assertions.

mod fake_server;

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use pgpt_config::Config;
use rstest::fixture;
use serde_json::Value;

use crate::errors::AppError;
use crate::{ConfigLoader, IoStreams, run_with_loader};

pub(super) use fake_server::{FakeServer, Reply, unused_port};

/// Placeholder replaced by the fake server's port in scripted command lines.
pub(super) const PORT_PLACEHOLDER: &str = "{port}";

pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        self.config.validate().map_err(AppError::InvalidConfiguration)?;
        Ok(self.config.clone())
    }
}

#[derive(Default)]
pub(super) struct TestWorld {
    pub config: Config,
    pub server: Option<FakeServer>,
    pub port: Option<u16>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
    pub requests: Vec<Value>,
}

impl TestWorld {
    pub fn start_server(&mut self, reply: Reply) -> Result<()> {
        let server = FakeServer::spawn(reply)?;
        self.port = Some(server.port());
        self.server = Some(server);
        Ok(())
    }

    pub fn point_at_closed_port(&mut self) -> Result<()> {
        self.port = Some(unused_port()?);
        Ok(())
    }

    pub fn run(&mut self, command: &str) -> Result<()> {
        self.stdout.clear();
        self.stderr.clear();
        self.requests.clear();
        let args = self.build_args(command);
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut io = IoStreams::new(&mut self.stdout, &mut self.stderr);
        let exit = run_with_loader(args, &mut io, &loader);
        self.exit_code = Some(exit);
        if let Some(server) = self.server.as_mut() {
            self.requests = server.take_requests()?;
        }
        self.server = None;
        Ok(())
    }

    fn build_args(&self, command: &str) -> Vec<OsString> {
        let port = self.port.map(|port| port.to_string()).unwrap_or_default();
        let mut args = vec![OsString::from("pgpt")];
        args.extend(command.split_whitespace().map(|token| {
            OsString::from(token.trim_matches('"').replace(PORT_PLACEHOLDER, &port))
        }));
        args
    }

    pub fn stdout_text(&self) -> Result<String> {
        decode_utf8(self.stdout.clone(), "stdout")
    }

    pub fn stderr_text(&self) -> Result<String> {
        decode_utf8(self.stderr.clone(), "stderr")
    }

    pub fn assert_exit_code(&self, expected: u8) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(
            exit == ExitCode::from(expected),
            "expected exit code {expected}, got {exit:?}; stderr: {:?}",
            self.stderr_text()?
        );
        Ok(())
    }

    pub fn assert_golden_request(&self, fixture: &str) -> Result<()> {
        ensure!(
            self.requests.len() == 1,
            "expected single request but found {}",
            self.requests.len()
        );
        let expected: Value =
            serde_json::from_str(&read_fixture(fixture)?).context("golden fixture json")?;
        let actual = self.requests.first().context("request missing")?;
        ensure!(
            actual == &expected,
            "request mismatch: expected {expected}, got {actual}"
        );
        Ok(())
    }

    pub fn assert_no_requests(&self) -> Result<()> {
        ensure!(
            self.requests.is_empty(),
            "expected no server requests but found {:?}",
            self.requests
        );
        Ok(())
    }
}

// ── Helper functions ───────────────────────────────────────────────────────────

pub(super) fn read_fixture(name: &str) -> Result<String> {
    let normalized = name.trim().trim_matches('"');
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("golden");
    path.push(normalized);
    fs::read_to_string(&path).with_context(|| format!("read fixture at {}", path.display()))
}

pub(super) fn decode_utf8(buffer: Vec<u8>, label: &str) -> Result<String> {
    String::from_utf8(buffer).with_context(|| format!("{label} utf8"))
}

// ── Fixtures ───────────────────────────────────────────────────────────────────

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
