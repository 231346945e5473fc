//! Default candidate list
//!
//! Builds the ordered [`InvocationCandidate`]s for the configured CLI:
//! PATH lookup, login-shell alias, fixed install paths, the npm global bin
//! directory and finally an `npx` fetch-and-run.

use super::candidate::{Arg, CandidateError, InvocationCandidate, Program, alias_script};
use crate::config::FileCliConfig;
use std::path::PathBuf;

/// Build the candidates described by `config`, in probe order.
pub fn default_candidates(
    config: &FileCliConfig,
) -> Result<Vec<InvocationCandidate>, CandidateError> {
    let exe = config.executable.trim();
    let invoke_args: Vec<Arg> = config.invoke_args.iter().map(|a| Arg::parse(a)).collect();
    let probe_args = config.probe_args.clone();
    let marker = config.marker.as_str();

    let mut candidates = vec![
        InvocationCandidate::new(
            format!("{} (PATH)", exe),
            Program::Named(exe.to_string()),
            Vec::new(),
            probe_args.clone(),
            invoke_args.clone(),
            marker,
        )?,
        InvocationCandidate::new(
            format!("{} (shell alias)", exe),
            Program::LoginShell,
            vec!["-lic".to_string(), alias_script(exe)?, exe.to_string()],
            probe_args.clone(),
            invoke_args.clone(),
            marker,
        )?,
    ];

    for path in config.install_paths.iter().chain(config.extra_paths.iter()) {
        candidates.push(InvocationCandidate::new(
            path.clone(),
            Program::Path(PathBuf::from(path)),
            Vec::new(),
            probe_args.clone(),
            invoke_args.clone(),
            marker,
        )?);
    }

    candidates.push(InvocationCandidate::new(
        format!("{} (npm global)", exe),
        Program::NpmGlobalBin(exe.to_string()),
        Vec::new(),
        probe_args.clone(),
        invoke_args.clone(),
        marker,
    )?);

    if let Some(package) = &config.npm_package {
        candidates.push(InvocationCandidate::new(
            format!("npx {}", package),
            Program::Named("npx".to_string()),
            vec!["-y".to_string(), package.clone()],
            probe_args,
            invoke_args,
            marker,
        )?);
    }

    Ok(candidates)
}
