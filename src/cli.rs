use crate::mend::{AbortReason, Outcome};
use crate::options::Options;
use std::env;

fn print_help(program: &str) {
    eprintln!(
        "Usage: {prog} [OPTIONS] FILE\n\
         \n\
         FILE: the JSON file to repair. Overwritten in place only when the\n\
         repair succeeds; left untouched otherwise.\n\
         \n\
         Options:\n\
           --max-iterations N   Repair iterations before giving up (default 10)\n\
           --model NAME         Chat model asked for fixes (default gpt-4o)\n\
           -h, --help           Show this help\n\
         \n\
         Environment:\n\
           OPENAI_API_KEY       API credential (required)\n\
           JSONMEND_API_URL     Override the Chat Completions endpoint\n\
           RUST_LOG             Log filter, e.g. jsonmend=debug\n",
        prog = program
    );
}

fn parse_args() -> (Options, String) {
    let mut args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "jsonmend".to_string());
    args.remove(0);

    let mut opts = Options::default();
    let mut file: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help(&program);
                std::process::exit(0);
            }
            "--max-iterations" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Missing N for --max-iterations");
                    std::process::exit(2);
                }
                match args[i].parse() {
                    Ok(n) => opts.max_iterations = n,
                    Err(_) => {
                        eprintln!("Invalid N for --max-iterations: {}", args[i]);
                        std::process::exit(2);
                    }
                }
            }
            "--model" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Missing NAME for --model");
                    std::process::exit(2);
                }
                opts.model = args[i].clone();
            }
            s if s.starts_with('-') => {
                eprintln!("Unknown option: {}", s);
                std::process::exit(2);
            }
            path => {
                file = Some(path.to_string());
            }
        }
        i += 1;
    }

    let Some(file) = file else {
        print_help(&program);
        std::process::exit(2);
    };
    (opts, file)
}

/// Run the CLI. Returns the process exit code: 0 on success, 1 when the
/// repair gave up, 2 on usage or configuration errors.
pub fn run() -> i32 {
    let (opts, path) = parse_args();

    let report = match crate::mend_file(&path, &opts) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("jsonmend: {}", e);
            return 2;
        }
    };

    match report.outcome {
        Outcome::Success => {
            if report.fixes_applied == 0 {
                eprintln!("{} is already valid JSON.", path);
            } else {
                eprintln!(
                    "Repaired {} with {} fix(es) in {} iteration(s).",
                    path, report.fixes_applied, report.iterations
                );
            }
            0
        }
        Outcome::Exhausted => {
            eprintln!(
                "Gave up after {} iteration(s); {} left unchanged.",
                report.iterations, path
            );
            if let Some(diag) = &report.last_diagnostic {
                eprintln!("Last error: {}", diag);
            }
            // The last attempt goes to stdout for manual repair.
            println!("{}", report.content);
            1
        }
        Outcome::Aborted(reason) => {
            match reason {
                AbortReason::Service(msg) => eprintln!("Fix service failed: {}", msg),
                AbortReason::Stagnant => eprintln!(
                    "No progress across consecutive fixes; {} left unchanged.",
                    path
                ),
            }
            if let Some(diag) = &report.last_diagnostic {
                eprintln!("Last error: {}", diag);
            }
            1
        }
    }
}
