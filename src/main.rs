use clap::Parser;
use lisp_llm_sandbox::config::{FsConfig, VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use lisp_llm_sandbox::sandbox::Sandbox;
use lisp_llm_sandbox::value::Value;
use lisp_llm_sandbox::{builtins, rep, root_environment};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::path::PathBuf;

/// A tree-walking Lisp interpreter with sandboxed I/O
#[derive(Parser, Debug)]
#[command(name = "lisp-llm-sandbox")]
#[command(version = VERSION)]
#[command(about = "A tree-walking Lisp interpreter with sandboxed I/O")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Add allowed filesystem path for `slurp` (can be repeated)
    #[arg(long = "fs-sandbox", value_name = "PATH", action = clap::ArgAction::Append)]
    fs_paths: Vec<PathBuf>,

    /// Maximum file size in bytes for `slurp`
    #[arg(long = "max-file-size", value_name = "BYTES", default_value = "10485760")]
    max_file_size: usize,

    /// Arguments passed through to the script as `*ARGV*`
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let fs_config = build_fs_config(&args);
    let sandbox = Sandbox::new(fs_config)?;
    builtins::set_sandbox(sandbox);

    let env = root_environment();
    env.set(
        "*ARGV*".to_string(),
        Value::List(args.args.iter().cloned().map(Value::String).collect()),
    );

    if let Some(script_path) = args.script {
        return run_script(&script_path, &env);
    }

    run_repl(&env)
}

fn build_fs_config(args: &CliArgs) -> FsConfig {
    let default = FsConfig::default();
    let allowed_paths = if args.fs_paths.is_empty() {
        default.allowed_paths
    } else {
        args.fs_paths.clone()
    };
    FsConfig {
        allowed_paths,
        max_file_size: args.max_file_size,
    }
}

fn run_script(
    path: &PathBuf,
    env: &std::rc::Rc<lisp_llm_sandbox::env::Environment>,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read script file {}: {}", path.display(), e))?;
    let wrapped = format!("(do {}\nnil)", contents);
    match rep(&wrapped, env) {
        Ok(_) => Ok(()),
        Err(e) => Err(format!("Evaluation error: {}", e).into()),
    }
}

fn run_repl(env: &std::rc::Rc<lisp_llm_sandbox::env::Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = DefaultEditor::with_config(config)
        .map_err(|e| format!("Failed to initialize REPL: {}", e))?;

    let history_file = ".mal_history";
    let _ = rl.load_history(history_file);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    loop {
        let readline = rl.readline("user> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                match rep(&line, env) {
                    Ok(result) => println!("{}", result),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    Ok(())
}
