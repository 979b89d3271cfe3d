//! Runs the xlquery engine program for one query.
//!
//! The program is invoked the way the xlquery command line expects:
//!
//! ```text
//! <program> [args..] -sheet <sheet> -datapath <path> [-overwrite] <workbook.xlsx> <query col> <result col>
//! ```
//!
//! with the search endpoint in `EPRINTS_SEARCH_URL`. It updates the workbook in
//! place and reports problems on stderr, one per line. Any stderr output fails
//! the run, whatever the exit status; a non-zero exit without output fails it
//! too.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use common::engine::QueryEngine;
use common::model::column::ColumnReference;
use common::model::run::RunResult;
use common::model::workbook::EncodedWorkbook;
use log::{info, warn};

pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn try_run(
        &self,
        search_url: &str,
        data_path: &str,
        sheet_name: &str,
        query_column: &ColumnReference,
        result_column: &ColumnReference,
        overwrite: bool,
        encoded_workbook: &EncodedWorkbook,
        workbook_name: &str,
    ) -> Result<EncodedWorkbook, Vec<String>> {
        let bytes = encoded_workbook
            .decode()
            .map_err(|e| vec![format!("No se pudo decodificar el libro {}: {}", workbook_name, e)])?;

        let dir = tempfile::tempdir()
            .map_err(|e| vec![format!("No se pudo crear el directorio de trabajo: {}", e)])?;
        let path = workbook_path(dir.path(), workbook_name);
        fs::write(&path, &bytes)
            .map_err(|e| vec![format!("No se pudo escribir {}: {}", path.display(), e)])?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg("-sheet")
            .arg(sheet_name)
            .arg("-datapath")
            .arg(data_path);
        if overwrite {
            command.arg("-overwrite");
        }
        command
            .arg(&path)
            .arg(query_column.as_str())
            .arg(result_column.as_str())
            .env("EPRINTS_SEARCH_URL", search_url)
            .current_dir(dir.path());

        let output = command
            .output()
            .map_err(|e| vec![format!("No se pudo iniciar {}: {}", self.program, e)])?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            info!("engine: {}", line);
        }

        // xlquery reports per-row problems on stderr and still exits 0, so any
        // stderr line fails the run.
        let messages: Vec<String> = stderr
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if !messages.is_empty() {
            if output.status.success() {
                warn!("engine: exited 0 with {} error line(s)", messages.len());
            }
            return Err(messages);
        }
        if !output.status.success() {
            return Err(vec![format!("{} terminó con {}", self.program, output.status)]);
        }

        let updated = fs::read(&path)
            .map_err(|e| vec![format!("No se pudo leer {}: {}", path.display(), e)])?;
        EncodedWorkbook::from_bytes(&updated)
            .ok_or_else(|| vec![format!("{} dejó vacío el libro {}", self.program, workbook_name)])
    }
}

impl QueryEngine for CommandEngine {
    fn run(
        &self,
        search_url: &str,
        data_path: &str,
        sheet_name: &str,
        query_column: &ColumnReference,
        result_column: &ColumnReference,
        overwrite: bool,
        encoded_workbook: &EncodedWorkbook,
        workbook_name: &str,
    ) -> RunResult {
        match self.try_run(
            search_url,
            data_path,
            sheet_name,
            query_column,
            result_column,
            overwrite,
            encoded_workbook,
            workbook_name,
        ) {
            Ok(workbook) => RunResult::updated(workbook),
            Err(messages) => RunResult::failed(messages),
        }
    }
}

/// Where the workbook is written inside the work directory. Only the final
/// path component of the browser-supplied name is used.
fn workbook_path(dir: &Path, workbook_name: &str) -> PathBuf {
    let file_name = Path::new(workbook_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("workbook.xlsx");
    dir.join(file_name)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Write;

    fn script(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", body).unwrap();
        file
    }

    fn engine_for(script: &tempfile::NamedTempFile) -> CommandEngine {
        CommandEngine::new("sh", vec![script.path().display().to_string()])
    }

    fn run(engine: &CommandEngine, overwrite: bool) -> RunResult {
        let workbook = EncodedWorkbook::from_bytes(b"original").unwrap();
        engine.run(
            "http://eprints.example.org/cgi/search/advanced/",
            ".item[].title",
            "Authors",
            &"A".parse().unwrap(),
            &"c".parse().unwrap(),
            overwrite,
            &workbook,
            "../authors.xlsx",
        )
    }

    #[test]
    fn passes_the_xlquery_arguments_and_reads_the_workbook_back() {
        // Replaces the workbook with a dump of what the engine received.
        let s = script(
            r#"for a in "$@"; do last3="$last2"; last2="$last1"; last1="$a"; done
wb="$last3"
{ for a in "$@"; do [ "$a" = "$wb" ] && a=$(basename "$a"); printf '%s|' "$a"; done; printf '%s' "$EPRINTS_SEARCH_URL"; } > "$wb""#,
        );
        let result = run(&engine_for(&s), true);

        let workbook = result.into_result().unwrap();
        let received = String::from_utf8(workbook.decode().unwrap()).unwrap();
        assert_eq!(
            received,
            "-sheet|Authors|-datapath|.item[].title|-overwrite|authors.xlsx|A|c|http://eprints.example.org/cgi/search/advanced/"
        );
    }

    #[test]
    fn overwrite_flag_is_omitted_when_unset() {
        let s = script(r#"for a in "$@"; do last3="$last2"; last2="$last1"; last1="$a"; done; printf '%s ' "$@" > "$last3""#);
        let workbook = run(&engine_for(&s), false).into_result().unwrap();
        let received = String::from_utf8(workbook.decode().unwrap()).unwrap();
        assert!(!received.contains("-overwrite"), "{received}");
    }

    #[test]
    fn failure_reports_stderr_lines() {
        let s = script("echo 'row 3: no match' >&2\necho '' >&2\nexit 1");
        assert_eq!(
            run(&engine_for(&s), false),
            RunResult::Failed { errors: vec!["row 3: no match".to_string()] }
        );
    }

    #[test]
    fn silent_failure_reports_the_exit_status() {
        let s = script("exit 3");
        let errors = match run(&engine_for(&s), false) {
            RunResult::Failed { errors } => errors,
            other => panic!("expected a failure, got {other:?}"),
        };
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("sh terminó con"), "{}", errors[0]);
    }

    #[test]
    fn stderr_fails_the_run_even_on_a_zero_exit() {
        let s = script(
            "echo 'http://x request failed, timeout' >&2\necho \"Can't parse response\" >&2\nexit 0",
        );
        assert_eq!(
            run(&engine_for(&s), false),
            RunResult::Failed {
                errors: vec![
                    "http://x request failed, timeout".to_string(),
                    "Can't parse response".to_string(),
                ]
            }
        );
    }

    #[test]
    fn unchanged_workbook_is_returned_as_is() {
        let s = script("echo 'No results for \"x\"'");
        let workbook = run(&engine_for(&s), false).into_result().unwrap();
        assert_eq!(workbook.decode().unwrap(), b"original");
    }

    #[test]
    fn missing_program_is_a_failure() {
        let engine = CommandEngine::new("/nonexistent/xlquery", Vec::new());
        let errors = match run(&engine, false) {
            RunResult::Failed { errors } => errors,
            other => panic!("expected a failure, got {other:?}"),
        };
        assert!(errors[0].starts_with("No se pudo iniciar /nonexistent/xlquery"), "{}", errors[0]);
    }

    #[test]
    fn workbook_names_are_confined_to_the_work_directory() {
        let dir = Path::new("/tmp/run");
        assert_eq!(workbook_path(dir, "../../etc/passwd"), dir.join("passwd"));
        assert_eq!(workbook_path(dir, "authors.xlsx"), dir.join("authors.xlsx"));
        assert_eq!(workbook_path(dir, ""), dir.join("workbook.xlsx"));
        assert_eq!(workbook_path(dir, ".."), dir.join("workbook.xlsx"));
    }
}
