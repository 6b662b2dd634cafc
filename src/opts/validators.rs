use crate::{
    common::error::{
        HelmCommand, HelmVersion, HelmVersionCommand, NotADirectory, NotAFile, ReadingFile,
        RegexCompile, Result, U8VectorToString, ValidateDirPath, ValidateFilePath,
        YamlParseFromFile,
    },
    helm::chart::Chart,
    vec_to_strings,
};
use regex::bytes::Regex;
use snafu::{ensure, ResultExt};
use std::{fs, path::PathBuf, process::Command, str};
use tracing::debug;

/// Validate that the helm v3 binary is present in the shell's $PATH.
pub(crate) fn validate_helmv3_in_path() -> Result<()> {
    let command: &str = "helm";
    let args: Vec<String> = vec_to_strings!["version", "--short"];

    debug!(%command, ?args, "Helm version command");

    // Execute `helm version` to verify if the binary exists.
    let output = Command::new(command)
        .args(args.clone())
        .output()
        .context(HelmCommand {
            command: command.to_string(),
            args: args.clone(),
        })?;

    let stdout_str = str::from_utf8(output.stdout.as_slice()).context(U8VectorToString)?;
    debug!(stdout=%stdout_str, "Helm version command standard output");
    ensure!(
        output.status.success(),
        HelmVersionCommand {
            command: command.to_string(),
            args,
            std_err: str::from_utf8(output.stderr.as_slice())
                .context(U8VectorToString)?
                .to_string()
        }
    );

    // Parse based on regex, to validate if the version string (semver) is v3.x.
    let regex: &str = r"^(v3\.[0-9]+\.[0-9])";
    if !Regex::new(regex)
        .context(RegexCompile {
            expression: regex.to_string(),
        })?
        .is_match(output.stdout.as_slice())
    {
        return HelmVersion {
            version: stdout_str.to_string(),
        }
        .fail();
    }

    Ok(())
}

/// Validate the input helm chart directory path:
/// - validate if the path exists and is a directory.
/// - validate if a parseable Chart.yaml file is present.
pub(crate) fn validate_chart_dir(dir_path: PathBuf) -> Result<()> {
    let is_dir = fs::metadata(dir_path.as_path())
        .map(|m| m.is_dir())
        .context(ValidateDirPath {
            path: dir_path.clone(),
        })?;
    ensure!(is_dir, NotADirectory { path: dir_path });

    let chart_yaml_path = dir_path.join("Chart.yaml");
    let is_file = fs::metadata(chart_yaml_path.as_path())
        .map(|m| m.is_file())
        .context(ValidateFilePath {
            path: chart_yaml_path.clone(),
        })?;
    ensure!(
        is_file,
        NotAFile {
            path: chart_yaml_path.clone()
        }
    );

    let chart_yaml_file = fs::read(chart_yaml_path.as_path()).context(ReadingFile {
        filepath: chart_yaml_path.clone(),
    })?;
    let chart_yaml: Chart =
        serde_yaml::from_slice(chart_yaml_file.as_slice()).context(YamlParseFromFile {
            filepath: chart_yaml_path,
        })?;
    debug!(
        name = %chart_yaml.name(),
        version = %chart_yaml.version(),
        "Validated chart directory"
    );

    Ok(())
}

/// Validate that the Helm values file exists and is a file.
pub(crate) fn validate_values_file(file_path: PathBuf) -> Result<()> {
    let is_file = fs::metadata(file_path.as_path())
        .map(|m| m.is_file())
        .context(ValidateFilePath {
            path: file_path.clone(),
        })?;
    ensure!(is_file, NotAFile { path: file_path });

    Ok(())
}
