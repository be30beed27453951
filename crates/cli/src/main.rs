// sheetcheck CLI - grade submissions and generate personalized instructions

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sheetcheck_rules::{GradingOptions, RuleKind, ScorePolicy};

const EXIT_SUCCESS: u8 = 0;
const EXIT_INCORRECT: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "sheetcheck")]
#[command(about = "Spreadsheet exercise correction and randomized instructions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a submission workbook against a solution workbook
    #[command(after_help = "\
Examples:
  sheetcheck grade --solution solution.xlsx --submission student.xlsx
  sheetcheck grade --solution solution.xlsx --submission student.xlsx --json
  sheetcheck grade --solution s.xlsx --submission x.xlsx --values-only")]
    Grade {
        /// Reference solution workbook
        #[arg(long)]
        solution: PathBuf,

        /// Student submission workbook
        #[arg(long)]
        submission: PathBuf,

        /// Emit feedback as JSON instead of plain text
        #[arg(long)]
        json: bool,

        /// Skip the formula-usage rule (compare recalculated values only)
        #[arg(long)]
        values_only: bool,

        /// Partial-credit pass mark (0..=1); default is strict all-checks
        #[arg(long)]
        pass_mark: Option<f64>,
    },

    /// Generate a personalized instruction bundle for one student
    #[command(after_help = "\
Examples:
  sheetcheck generate --document task.docx --workbook task.xlsx \\
      --solution solution.xlsx --login k12345678 --out-dir generated/")]
    Generate {
        /// Master instruction document
        #[arg(long)]
        document: PathBuf,

        /// Template task workbook
        #[arg(long)]
        workbook: PathBuf,

        /// Template solution workbook
        #[arg(long)]
        solution: PathBuf,

        /// Requesting student login (drives the deterministic draw)
        #[arg(long)]
        login: String,

        /// Output directory for the three generated artifacts
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Grade { solution, submission, json, values_only, pass_mark } => {
            cmd_grade(&solution, &submission, json, values_only, pass_mark)
        }
        Commands::Generate { document, workbook, solution, login, out_dir } => {
            cmd_generate(&document, &workbook, &solution, &login, &out_dir)
        }
    };
    ExitCode::from(code)
}

fn cmd_grade(
    solution: &PathBuf,
    submission: &PathBuf,
    json: bool,
    values_only: bool,
    pass_mark: Option<f64>,
) -> u8 {
    let solution_bytes = match fs::read(solution) {
        Ok(b) => b,
        Err(e) => return fail(&format!("cannot read {}: {e}", solution.display())),
    };
    let submission_bytes = match fs::read(submission) {
        Ok(b) => b,
        Err(e) => return fail(&format!("cannot read {}: {e}", submission.display())),
    };

    let mut options = GradingOptions::default();
    if values_only {
        options.rules.retain(|r| *r != RuleKind::FormulaUsage);
    }
    if let Some(pass_mark) = pass_mark {
        options.policy = ScorePolicy::Weighted { pass_mark };
    }

    let feedback =
        match sheetcheck_api::run_correction_with(&solution_bytes, &submission_bytes, &options) {
            Ok(fb) => fb,
            Err(e) => return fail(&e.to_string()),
        };

    if json {
        match serde_json::to_string_pretty(&feedback) {
            Ok(out) => println!("{out}"),
            Err(e) => return fail(&format!("cannot serialize feedback: {e}")),
        }
    } else {
        println!("{}", feedback.text);
        println!("verdict: {}", if feedback.is_correct { "correct" } else { "incorrect" });
    }

    if feedback.is_correct {
        EXIT_SUCCESS
    } else {
        EXIT_INCORRECT
    }
}

fn cmd_generate(
    document: &PathBuf,
    workbook: &PathBuf,
    solution: &PathBuf,
    login: &str,
    out_dir: &PathBuf,
) -> u8 {
    let read = |path: &PathBuf| {
        fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
    };
    let document_bytes = match read(document) {
        Ok(b) => b,
        Err(e) => return fail(&e),
    };
    let workbook_bytes = match read(workbook) {
        Ok(b) => b,
        Err(e) => return fail(&e),
    };
    let solution_bytes = match read(solution) {
        Ok(b) => b,
        Err(e) => return fail(&e),
    };

    let bundle = match sheetcheck_api::create_instruction(
        &document_bytes,
        &workbook_bytes,
        &solution_bytes,
        login,
    ) {
        Ok(b) => b,
        Err(e) => return fail(&e.to_string()),
    };

    if let Err(e) = fs::create_dir_all(out_dir) {
        return fail(&format!("cannot create {}: {e}", out_dir.display()));
    }
    for (name, bytes) in [
        ("instruction.docx", &bundle.document),
        ("instruction.xlsx", &bundle.instruction_workbook),
        ("solution.xlsx", &bundle.solution_workbook),
    ] {
        let path = out_dir.join(name);
        if let Err(e) = fs::write(&path, bytes) {
            return fail(&format!("cannot write {}: {e}", path.display()));
        }
        println!("wrote {}", path.display());
    }
    println!("generated for login {login}");
    EXIT_SUCCESS
}

fn fail(message: &str) -> u8 {
    eprintln!("sheetcheck: {message}");
    EXIT_ERROR
}
