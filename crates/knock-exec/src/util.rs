use std::{net::IpAddr, process::Stdio};

use knock_model::CommandSpec;
use tokio::process::Command;

/// Placeholder values for one invocation.
pub struct Vars<'a> {
    pub task: &'a str,
    pub ip: IpAddr,
    pub ttl: Option<u16>,
}

impl Vars<'_> {
    pub fn expand(&self, template: &str) -> String {
        let ttl = self.ttl.map(|t| t.to_string()).unwrap_or_default();
        template
            .replace("{ip}", &self.ip.to_string())
            .replace("{ttl}", &ttl)
            .replace("{task}", self.task)
    }
}

/// Build the command with placeholders expanded; output is captured and the child dies with the handle.
pub fn cmd_program(spec: &CommandSpec, vars: &Vars<'_>) -> Command {
    let mut cmd = Command::new(&spec.program);
    cmd.args(spec.args.iter().map(|a| vars.expand(a)));
    for (k, v) in &spec.env {
        cmd.env(k, vars.expand(v));
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}
